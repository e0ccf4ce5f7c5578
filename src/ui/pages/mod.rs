pub mod book;
pub mod parcels;
pub mod settings;

pub use book::BookPage;
pub use parcels::ParcelsPage;
pub use settings::SettingsPage;

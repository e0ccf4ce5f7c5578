pub mod district_picker;
pub mod kpi_card;
pub mod parcel_table;
pub mod price_estimate;
pub mod status_badge;
pub mod toast;

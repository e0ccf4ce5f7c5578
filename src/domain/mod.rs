//! Parcel pricing, booking and record types. No UI or network code lives here.

pub mod app_state;
pub mod booking;
pub mod parcel;
pub mod pricing;
pub mod service_area;

pub use app_state::{AppState, CacheResource, ClientSettings};
pub use booking::{BookingForm, Party};
pub use parcel::{sort_newest_first, summarize_parcels, DeliveryStatus, NewParcel, Parcel, PaymentStatus};
pub use pricing::{calculate_price, ParcelType, PriceBreakdown};
pub use service_area::ServiceAreas;

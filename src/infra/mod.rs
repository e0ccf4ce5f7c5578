pub mod parcel_api;

use serde::{Deserialize, Deserializer, Serialize};
use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime};
use uuid::Uuid;

use super::pricing::ParcelType;

pub type ParcelId = String;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    NotCollected,
    RiderAssigned,
    InTransit,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl DeliveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::NotCollected => "Not collected",
            DeliveryStatus::RiderAssigned => "Rider assigned",
            DeliveryStatus::InTransit => "In transit",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Unknown => "Unknown",
        }
    }

    /// Parcels can only be withdrawn before a rider picks them up.
    pub fn allows_cancellation(&self) -> bool {
        matches!(self, DeliveryStatus::NotCollected)
    }
}

/// Body of the parcel-creation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParcel {
    pub title: String,
    pub parcel_type: ParcelType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcel_weight: Option<f64>,
    pub sender_name: String,
    pub sender_contact: String,
    pub sender_region: String,
    pub sender_district: String,
    pub pickup_address: String,
    pub pickup_instruction: String,
    pub receiver_name: String,
    pub receiver_contact: String,
    pub receiver_region: String,
    pub receiver_district: String,
    pub delivery_address: String,
    pub delivery_instruction: String,
    pub created_by: String,
    pub total_price: u32,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub tracking_id: String,
    pub creation_date: String,
}

/// Parcel record as stored by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parcel {
    #[serde(rename = "_id")]
    pub id: ParcelId,
    pub title: String,
    /// `None` when the backend sent a type this client does not know.
    #[serde(deserialize_with = "lenient_parcel_type")]
    pub parcel_type: Option<ParcelType>,
    pub parcel_weight: Option<f64>,
    pub sender_name: String,
    pub sender_contact: String,
    pub sender_region: String,
    pub sender_district: String,
    pub pickup_address: String,
    pub pickup_instruction: String,
    pub receiver_name: String,
    pub receiver_contact: String,
    pub receiver_region: String,
    pub receiver_district: String,
    pub delivery_address: String,
    pub delivery_instruction: String,
    pub created_by: String,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub tracking_id: String,
    pub creation_date: String,
}

impl Parcel {
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.creation_date, &Rfc3339).ok()
    }

    pub fn type_label(&self) -> &'static str {
        self.parcel_type.map_or("Unknown", |parcel_type| parcel_type.label())
    }

    pub fn route_label(&self) -> String {
        format!("{} → {}", self.sender_district, self.receiver_district)
    }

    pub fn is_unpaid(&self) -> bool {
        self.payment_status == PaymentStatus::Unpaid
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParcelSummary {
    pub count: usize,
    pub unpaid_count: usize,
    pub unpaid_total: f64,
    pub delivered_count: usize,
}

pub fn summarize_parcels(parcels: &[Parcel]) -> ParcelSummary {
    parcels.iter().fold(
        ParcelSummary::default(),
        |mut summary, parcel| {
            summary.count += 1;
            if parcel.is_unpaid() {
                summary.unpaid_count += 1;
                summary.unpaid_total += parcel.total_price;
            }
            if parcel.delivery_status == DeliveryStatus::Delivered {
                summary.delivered_count += 1;
            }
            summary
        },
    )
}

fn lenient_parcel_type<'de, D>(deserializer: D) -> Result<Option<ParcelType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    match serde_json::from_value::<ParcelType>(raw.clone()) {
        Ok(parcel_type) => Ok(Some(parcel_type)),
        Err(_) => {
            tracing::warn!(value = %raw, "unrecognised parcel type");
            Ok(None)
        }
    }
}

/// Newest first; parcels without a readable date go last.
pub fn sort_newest_first(parcels: &mut [Parcel]) {
    parcels.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// `PCL-YYYYMMDD-XXXXXXXX` with the creation date in UTC.
pub fn generate_tracking_id(now: OffsetDateTime) -> String {
    let date_format = format_description!("[year][month][day]");
    let date = now
        .to_offset(time::UtcOffset::UTC)
        .format(date_format)
        .unwrap_or_else(|_| "00000000".to_string());
    let entropy = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("PCL-{date}-{}", &entropy[..8])
}

pub fn format_timestamp(now: OffsetDateTime) -> String {
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

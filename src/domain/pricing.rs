//! Delivery pricing for booked parcels. All amounts are whole Taka.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_WEIGHT_KG: f64 = 0.1;
pub const MAX_WEIGHT_KG: f64 = 100.0;

const DOCUMENT_SAME_DISTRICT: u32 = 80;
const DOCUMENT_CROSS_DISTRICT: u32 = 100;
const PARCEL_BASE_SAME_DISTRICT: u32 = 110;
const PARCEL_BASE_CROSS_DISTRICT: u32 = 150;
const FREE_WEIGHT_KG: f64 = 3.0;
const PER_EXTRA_KG: f64 = 40.0;
const CROSS_DISTRICT_EXTRA_SURCHARGE: u32 = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParcelType {
    #[default]
    #[serde(rename = "document")]
    Document,
    #[serde(rename = "not-document", alias = "notDocument")]
    NotDocument,
}

impl ParcelType {
    pub fn label(&self) -> &'static str {
        match self {
            ParcelType::Document => "Document",
            ParcelType::NotDocument => "Non-document",
        }
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self, ParcelType::NotDocument)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PricingInput {
    pub parcel_type: ParcelType,
    pub weight_kg: Option<f64>,
    pub sender_district: String,
    pub receiver_district: String,
}

impl PricingInput {
    /// Exact, case-sensitive comparison of the selected district labels.
    pub fn is_same_district(&self) -> bool {
        self.sender_district == self.receiver_district
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PriceBreakdown {
    pub base_charge: u32,
    pub extra_weight_kg: f64,
    pub extra_weight_charge: u32,
    pub cross_district_surcharge: u32,
    pub total: u32,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("parcel weight is required for non-document parcels")]
    MissingWeight,
    #[error("parcel weight {0} kg is not a number")]
    InvalidWeight(f64),
    /// Both 0.1 kg and 100 kg are accepted.
    #[error("parcel weight {0} kg must be from 0.1 to 100 kg inclusive")]
    WeightOutOfRange(f64),
    #[error("{0} district is not selected")]
    MissingDistrict(&'static str),
}

/// Price for already validated input.
pub fn calculate_price(parcel_type: ParcelType, weight_kg: f64, same_district: bool) -> u32 {
    price_breakdown(parcel_type, weight_kg, same_district).total
}

pub fn price_breakdown(parcel_type: ParcelType, weight_kg: f64, same_district: bool) -> PriceBreakdown {
    match parcel_type {
        ParcelType::Document => {
            let base_charge = if same_district {
                DOCUMENT_SAME_DISTRICT
            } else {
                DOCUMENT_CROSS_DISTRICT
            };
            PriceBreakdown {
                base_charge,
                total: base_charge,
                ..PriceBreakdown::default()
            }
        }
        ParcelType::NotDocument => {
            let base_charge = if same_district {
                PARCEL_BASE_SAME_DISTRICT
            } else {
                PARCEL_BASE_CROSS_DISTRICT
            };

            if weight_kg < FREE_WEIGHT_KG {
                return PriceBreakdown {
                    base_charge,
                    total: base_charge,
                    ..PriceBreakdown::default()
                };
            }

            let extra_weight_kg = weight_kg - FREE_WEIGHT_KG;
            let extra_weight_charge = to_taka(extra_weight_kg * PER_EXTRA_KG);
            // Charged once on top of the elevated cross-district base.
            let cross_district_surcharge = if same_district {
                0
            } else {
                CROSS_DISTRICT_EXTRA_SURCHARGE
            };

            PriceBreakdown {
                base_charge,
                extra_weight_kg,
                extra_weight_charge,
                cross_district_surcharge,
                total: base_charge + extra_weight_charge + cross_district_surcharge,
            }
        }
    }
}

/// Checked entry point used by the booking form.
pub fn quote(input: &PricingInput) -> Result<PriceBreakdown, PricingError> {
    if input.sender_district.trim().is_empty() {
        return Err(PricingError::MissingDistrict("sender"));
    }
    if input.receiver_district.trim().is_empty() {
        return Err(PricingError::MissingDistrict("receiver"));
    }

    let weight_kg = match input.parcel_type {
        ParcelType::Document => input.weight_kg.unwrap_or_default(),
        ParcelType::NotDocument => validate_weight(input.weight_kg)?,
    };

    Ok(price_breakdown(
        input.parcel_type,
        weight_kg,
        input.is_same_district(),
    ))
}

pub fn validate_weight(weight_kg: Option<f64>) -> Result<f64, PricingError> {
    let weight = weight_kg.ok_or(PricingError::MissingWeight)?;
    if !weight.is_finite() {
        return Err(PricingError::InvalidWeight(weight));
    }
    if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight) {
        return Err(PricingError::WeightOutOfRange(weight));
    }
    Ok(weight)
}

fn to_taka(amount: f64) -> u32 {
    amount.max(0.0).round() as u32
}

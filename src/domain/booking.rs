//! Client-side state of the "book a parcel" form.
//!
//! Unselected regions and districts are `None` rather than placeholder strings. The
//! price estimate is derived from the current fields on every read and computed once
//! more when the submission payload is assembled.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use super::{
    parcel::{format_timestamp, generate_tracking_id, DeliveryStatus, NewParcel, PaymentStatus},
    pricing::{quote, ParcelType, PriceBreakdown, PricingError, PricingInput},
    service_area::ServiceAreas,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyDetails {
    pub name: String,
    pub contact: String,
    pub region: Option<String>,
    pub district: Option<String>,
    pub address: String,
    pub instruction: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Party {
    Sender,
    Receiver,
}

impl Party {
    fn label(&self) -> &'static str {
        match self {
            Party::Sender => "sender",
            Party::Receiver => "receiver",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingField {
    Title,
    Weight,
    Name(Party),
    Contact(Party),
    Region(Party),
    District(Party),
    Address(Party),
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingField::Title => write!(f, "parcel name"),
            BookingField::Weight => write!(f, "weight"),
            BookingField::Name(party) => write!(f, "{} name", party.label()),
            BookingField::Contact(party) => write!(f, "{} contact", party.label()),
            BookingField::Region(party) => write!(f, "{} region", party.label()),
            BookingField::District(party) => write!(f, "{} district", party.label()),
            BookingField::Address(party) => match party {
                Party::Sender => write!(f, "pickup address"),
                Party::Receiver => write!(f, "delivery address"),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BookingError {
    #[error("missing {}", join_fields(.0))]
    MissingFields(Vec<BookingField>),
    #[error("weight '{0}' is not a number")]
    UnparsableWeight(String),
    #[error("{district} is not a district of {region}")]
    DistrictOutsideRegion { region: String, district: String },
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

fn join_fields(fields: &[BookingField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub title: String,
    pub parcel_type: ParcelType,
    /// Raw text of the weight input; parsed on demand.
    pub weight_input: String,
    pub sender: PartyDetails,
    pub receiver: PartyDetails,
}

impl BookingForm {
    pub fn party(&self, party: Party) -> &PartyDetails {
        match party {
            Party::Sender => &self.sender,
            Party::Receiver => &self.receiver,
        }
    }

    pub fn party_mut(&mut self, party: Party) -> &mut PartyDetails {
        match party {
            Party::Sender => &mut self.sender,
            Party::Receiver => &mut self.receiver,
        }
    }

    /// Picks a region and drops the district if it no longer belongs to it.
    pub fn set_region(&mut self, party: Party, region: Option<String>, areas: &ServiceAreas) {
        let details = self.party_mut(party);
        let keep_district = match (&region, &details.district) {
            (Some(region), Some(district)) => areas.contains(region, district),
            _ => false,
        };
        if !keep_district {
            details.district = None;
        }
        details.region = region;
    }

    /// Picks a district; a missing region is filled in from the district.
    pub fn set_district(&mut self, party: Party, district: Option<String>, areas: &ServiceAreas) {
        let details = self.party_mut(party);
        if details.region.is_none() {
            details.region = district
                .as_deref()
                .and_then(|name| areas.region_of(name))
                .map(str::to_string);
        }
        details.district = district;
    }

    pub fn parsed_weight(&self) -> Result<Option<f64>, BookingError> {
        let raw = self.weight_input.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| BookingError::UnparsableWeight(raw.to_string()))
    }

    fn pricing_input(&self) -> Result<PricingInput, BookingError> {
        let mut missing = Vec::new();
        let weight_kg = match self.parcel_type {
            ParcelType::Document => None,
            ParcelType::NotDocument => {
                let weight = self.parsed_weight()?;
                if weight.is_none() {
                    missing.push(BookingField::Weight);
                }
                weight
            }
        };
        if self.sender.district.is_none() {
            missing.push(BookingField::District(Party::Sender));
        }
        if self.receiver.district.is_none() {
            missing.push(BookingField::District(Party::Receiver));
        }
        if !missing.is_empty() {
            return Err(BookingError::MissingFields(missing));
        }

        Ok(PricingInput {
            parcel_type: self.parcel_type,
            weight_kg,
            sender_district: self.sender.district.clone().unwrap_or_default(),
            receiver_district: self.receiver.district.clone().unwrap_or_default(),
        })
    }

    /// Live estimate; `None` until every pricing field holds a usable value.
    pub fn estimate(&self) -> Option<PriceBreakdown> {
        let input = self.pricing_input().ok()?;
        quote(&input).ok()
    }

    /// Checks every required field and returns the pricing input on success.
    pub fn validate(&self, areas: &ServiceAreas) -> Result<PricingInput, BookingError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(BookingField::Title);
        }
        for party in [Party::Sender, Party::Receiver] {
            let details = self.party(party);
            if details.name.trim().is_empty() {
                missing.push(BookingField::Name(party));
            }
            if details.contact.trim().is_empty() {
                missing.push(BookingField::Contact(party));
            }
            if details.region.is_none() {
                missing.push(BookingField::Region(party));
            }
            if details.address.trim().is_empty() {
                missing.push(BookingField::Address(party));
            }
        }

        let input = match self.pricing_input() {
            Ok(input) => Some(input),
            Err(BookingError::MissingFields(fields)) => {
                missing.extend(fields);
                None
            }
            Err(err) => return Err(err),
        };

        if !missing.is_empty() {
            return Err(BookingError::MissingFields(missing));
        }

        for party in [Party::Sender, Party::Receiver] {
            let details = self.party(party);
            if let (Some(region), Some(district)) = (&details.region, &details.district) {
                if !areas.contains(region, district) {
                    return Err(BookingError::DistrictOutsideRegion {
                        region: region.clone(),
                        district: district.clone(),
                    });
                }
            }
        }

        let input = input.ok_or(BookingError::MissingFields(Vec::new()))?;
        quote(&input)?;
        Ok(input)
    }

    /// Builds the creation payload with a freshly computed `totalPrice`.
    pub fn prepare_submission(
        &self,
        created_by: &str,
        now: OffsetDateTime,
        areas: &ServiceAreas,
    ) -> Result<NewParcel, BookingError> {
        let input = self.validate(areas)?;
        let breakdown = quote(&input)?;

        tracing::debug!(
            parcel_type = ?input.parcel_type,
            same_district = input.is_same_district(),
            total = breakdown.total,
            "priced parcel for submission"
        );

        Ok(NewParcel {
            title: self.title.trim().to_string(),
            parcel_type: input.parcel_type,
            parcel_weight: input.weight_kg,
            sender_name: self.sender.name.trim().to_string(),
            sender_contact: self.sender.contact.trim().to_string(),
            sender_region: self.sender.region.clone().unwrap_or_default(),
            sender_district: input.sender_district,
            pickup_address: self.sender.address.trim().to_string(),
            pickup_instruction: self.sender.instruction.trim().to_string(),
            receiver_name: self.receiver.name.trim().to_string(),
            receiver_contact: self.receiver.contact.trim().to_string(),
            receiver_region: self.receiver.region.clone().unwrap_or_default(),
            receiver_district: input.receiver_district,
            delivery_address: self.receiver.address.trim().to_string(),
            delivery_instruction: self.receiver.instruction.trim().to_string(),
            created_by: created_by.to_string(),
            total_price: breakdown.total,
            payment_status: PaymentStatus::Unpaid,
            delivery_status: DeliveryStatus::NotCollected,
            tracking_id: generate_tracking_id(now),
            creation_date: format_timestamp(now),
        })
    }

    pub fn reset(&mut self) {
        *self = BookingForm::default();
    }

    /// Clears the draft after `submitted` was booked, unless it has been edited
    /// since. Returns whether the draft was cleared.
    pub fn reset_if_unchanged(&mut self, submitted: &BookingForm) -> bool {
        if self != submitted {
            return false;
        }
        self.reset();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn party(region: &str, district: &str) -> PartyDetails {
        PartyDetails {
            name: "Rahim".to_string(),
            contact: "01700000000".to_string(),
            region: Some(region.to_string()),
            district: Some(district.to_string()),
            address: "House 1, Road 2".to_string(),
            instruction: String::new(),
        }
    }

    fn complete_form() -> BookingForm {
        BookingForm {
            title: "Winter clothes".to_string(),
            parcel_type: ParcelType::NotDocument,
            weight_input: "5".to_string(),
            sender: party("Dhaka", "Dhaka"),
            receiver: party("Chattogram", "Feni"),
        }
    }

    #[test]
    fn estimate_waits_for_pricing_fields() {
        let mut form = BookingForm {
            parcel_type: ParcelType::NotDocument,
            ..BookingForm::default()
        };
        assert_eq!(form.estimate(), None);

        form.sender.district = Some("Dhaka".to_string());
        form.receiver.district = Some("Dhaka".to_string());
        assert_eq!(form.estimate(), None, "weight still missing");

        form.weight_input = "5".to_string();
        assert_eq!(form.estimate().map(|b| b.total), Some(190));

        form.weight_input = "five".to_string();
        assert_eq!(form.estimate(), None);

        form.weight_input = "250".to_string();
        assert_eq!(form.estimate(), None, "out of range weight");
    }

    #[test]
    fn estimate_recomputes_on_type_change() {
        let mut form = complete_form();
        assert_eq!(form.estimate().map(|b| b.total), Some(270));

        form.parcel_type = ParcelType::Document;
        assert_eq!(form.estimate().map(|b| b.total), Some(100));

        form.receiver.district = Some("Dhaka".to_string());
        assert_eq!(form.estimate().map(|b| b.total), Some(80));
    }

    #[test]
    fn changing_region_clears_foreign_district() {
        let areas = ServiceAreas::embedded();
        let mut form = complete_form();

        form.set_region(Party::Receiver, Some("Chattogram".to_string()), areas);
        assert_eq!(form.receiver.district.as_deref(), Some("Feni"));

        form.set_region(Party::Receiver, Some("Sylhet".to_string()), areas);
        assert_eq!(form.receiver.region.as_deref(), Some("Sylhet"));
        assert_eq!(form.receiver.district, None);

        form.set_region(Party::Sender, None, areas);
        assert_eq!(form.sender.district, None);
    }

    #[test]
    fn edits_made_during_submission_survive() {
        let submitted = complete_form();

        let mut untouched = submitted.clone();
        assert!(untouched.reset_if_unchanged(&submitted));
        assert_eq!(untouched, BookingForm::default());

        let mut edited = submitted.clone();
        edited.title = "Second parcel".to_string();
        assert!(!edited.reset_if_unchanged(&submitted));
        assert_eq!(edited.title, "Second parcel");
        assert_eq!(edited.receiver, submitted.receiver);
    }

    #[test]
    fn picking_a_district_fills_an_empty_region() {
        let areas = ServiceAreas::embedded();
        let mut form = BookingForm::default();

        form.set_district(Party::Sender, Some("Cox's Bazar".to_string()), areas);
        assert_eq!(form.sender.region.as_deref(), Some("Chattogram"));

        form.set_district(Party::Sender, None, areas);
        assert_eq!(form.sender.region.as_deref(), Some("Chattogram"));
        assert_eq!(form.sender.district, None);
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let areas = ServiceAreas::embedded();
        let form = BookingForm {
            parcel_type: ParcelType::NotDocument,
            ..BookingForm::default()
        };

        let Err(BookingError::MissingFields(fields)) = form.validate(areas) else {
            panic!("expected missing fields");
        };
        assert!(fields.contains(&BookingField::Title));
        assert!(fields.contains(&BookingField::Weight));
        assert!(fields.contains(&BookingField::District(Party::Sender)));
        assert!(fields.contains(&BookingField::Address(Party::Receiver)));
        assert_eq!(fields.len(), 12);
    }

    #[test]
    fn missing_fields_render_readably() {
        let err = BookingError::MissingFields(vec![
            BookingField::Title,
            BookingField::Region(Party::Receiver),
            BookingField::Address(Party::Sender),
        ]);
        assert_eq!(err.to_string(), "missing parcel name, receiver region, pickup address");
    }

    #[test]
    fn validate_rejects_district_outside_region() {
        let areas = ServiceAreas::embedded();
        let mut form = complete_form();
        form.receiver.region = Some("Sylhet".to_string());

        assert_eq!(
            form.validate(areas),
            Err(BookingError::DistrictOutsideRegion {
                region: "Sylhet".to_string(),
                district: "Feni".to_string(),
            })
        );
    }

    #[test]
    fn validate_surfaces_weight_range_errors() {
        let areas = ServiceAreas::embedded();
        let mut form = complete_form();
        form.weight_input = "0.05".to_string();
        assert_eq!(
            form.validate(areas),
            Err(BookingError::Pricing(PricingError::WeightOutOfRange(0.05)))
        );

        form.weight_input = "abc".to_string();
        assert_eq!(
            form.validate(areas),
            Err(BookingError::UnparsableWeight("abc".to_string()))
        );
    }

    #[test]
    fn submission_carries_recomputed_price() {
        let areas = ServiceAreas::embedded();
        let form = complete_form();
        let now = datetime!(2025-06-10 08:15 UTC);

        let payload = form
            .prepare_submission("customer@example.com", now, areas)
            .expect("form is complete");

        assert_eq!(payload.total_price, 270);
        assert_eq!(payload.parcel_weight, Some(5.0));
        assert_eq!(payload.sender_district, "Dhaka");
        assert_eq!(payload.receiver_region, "Chattogram");
        assert_eq!(payload.created_by, "customer@example.com");
        assert_eq!(payload.payment_status, PaymentStatus::Unpaid);
        assert!(payload.tracking_id.starts_with("PCL-20250610-"));
        assert_eq!(payload.creation_date, "2025-06-10T08:15:00Z");

        let json = serde_json::to_value(&payload).expect("payload serializes");
        assert_eq!(json["totalPrice"], 270);
        assert_eq!(json["parcelType"], "not-document");
        assert_eq!(json["deliveryStatus"], "not_collected");
    }

    #[test]
    fn document_submission_omits_weight() {
        let areas = ServiceAreas::embedded();
        let mut form = complete_form();
        form.parcel_type = ParcelType::Document;
        form.weight_input = "12".to_string();

        let payload = form
            .prepare_submission("customer@example.com", datetime!(2025-06-10 08:15 UTC), areas)
            .expect("form is complete");
        assert_eq!(payload.total_price, 100);
        assert_eq!(payload.parcel_weight, None);

        let json = serde_json::to_value(&payload).expect("payload serializes");
        assert!(json.get("parcelWeight").is_none());
    }

    #[test]
    fn reset_clears_the_draft() {
        let mut form = complete_form();
        form.reset();
        assert_eq!(form, BookingForm::default());
    }
}

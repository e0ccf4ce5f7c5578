//! Fixed region → district table offered by the sender and receiver pickers.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::assets;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "region")]
    pub name: String,
    pub districts: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceAreas {
    regions: Vec<Region>,
}

#[derive(Debug, Error)]
pub enum ServiceAreaError {
    #[error("service area table is not bundled")]
    Missing,
    #[error("malformed service area table: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("district {district} is listed under both {first} and {second}")]
    DuplicateDistrict {
        district: String,
        first: String,
        second: String,
    },
}

static EMBEDDED: OnceLock<ServiceAreas> = OnceLock::new();

impl ServiceAreas {
    pub fn from_json(raw: &str) -> Result<Self, ServiceAreaError> {
        let regions: Vec<Region> = serde_json::from_str(raw)?;
        let areas = Self { regions };
        areas.check_unique_districts()?;
        Ok(areas)
    }

    /// The table compiled into the binary. Falls back to an empty table when it cannot be read.
    pub fn embedded() -> &'static ServiceAreas {
        EMBEDDED.get_or_init(|| {
            let loaded = assets::service_areas_json()
                .ok_or(ServiceAreaError::Missing)
                .and_then(|raw| Self::from_json(&raw));
            match loaded {
                Ok(areas) => {
                    tracing::debug!(
                        regions = areas.regions.len(),
                        districts = areas.district_count(),
                        "loaded service areas"
                    );
                    areas
                }
                Err(err) => {
                    tracing::error!(%err, "service areas unavailable");
                    ServiceAreas::default()
                }
            }
        })
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|region| region.name.as_str())
    }

    pub fn districts_in(&self, region: &str) -> &[String] {
        self.regions
            .iter()
            .find(|candidate| candidate.name == region)
            .map(|candidate| candidate.districts.as_slice())
            .unwrap_or(&[])
    }

    pub fn region_of(&self, district: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|region| region.districts.iter().any(|name| name == district))
            .map(|region| region.name.as_str())
    }

    pub fn contains(&self, region: &str, district: &str) -> bool {
        self.districts_in(region).iter().any(|name| name == district)
    }

    pub fn district_count(&self) -> usize {
        self.regions.iter().map(|region| region.districts.len()).sum()
    }

    fn check_unique_districts(&self) -> Result<(), ServiceAreaError> {
        let mut seen: std::collections::HashMap<&str, &str> = std::collections::HashMap::new();
        for region in &self.regions {
            for district in &region.districts {
                if let Some(first) = seen.insert(district.as_str(), region.name.as_str()) {
                    return Err(ServiceAreaError::DuplicateDistrict {
                        district: district.clone(),
                        first: first.to_string(),
                        second: region.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_covers_all_divisions() {
        let areas = ServiceAreas::embedded();
        assert_eq!(areas.regions().count(), 8);
        assert_eq!(areas.district_count(), 64);
    }

    #[test]
    fn lookups_use_exact_labels() {
        let areas = ServiceAreas::embedded();
        assert!(areas.contains("Chattogram", "Cox's Bazar"));
        assert!(!areas.contains("Chattogram", "cox's bazar"));
        assert_eq!(areas.region_of("Sylhet"), Some("Sylhet"));
        assert_eq!(areas.region_of("Atlantis"), None);
        assert!(areas.districts_in("Atlantis").is_empty());
    }

    #[test]
    fn duplicate_districts_are_rejected() {
        let raw = r#"[
            {"region": "North", "districts": ["Alpha", "Beta"]},
            {"region": "South", "districts": ["Beta"]}
        ]"#;
        match ServiceAreas::from_json(raw) {
            Err(ServiceAreaError::DuplicateDistrict { district, first, second }) => {
                assert_eq!(district, "Beta");
                assert_eq!(first, "North");
                assert_eq!(second, "South");
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_table_is_an_error() {
        assert!(matches!(
            ServiceAreas::from_json("{\"region\": 1}"),
            Err(ServiceAreaError::Malformed(_))
        ));
    }
}

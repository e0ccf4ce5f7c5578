use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::{booking::BookingForm, parcel::Parcel};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/";

/// Connection details for the parcel backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub api_base_url: String,
    /// Email the backend files parcels under.
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_email: String::new(),
            access_token: None,
        }
    }
}

impl ClientSettings {
    pub fn has_identity(&self) -> bool {
        !self.user_email.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub settings: ClientSettings,
    pub booking: BookingForm,
    pub parcels: Vec<Parcel>,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.settings = persisted.settings;
        self.booking = persisted.draft;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
            draft: self.booking.clone(),
        }
    }

    pub fn forget_parcels(&mut self) {
        self.parcels.clear();
        self.cache.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    /// Parcel list of one customer, keyed by email.
    Parcels(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: ClientSettings,
    #[serde(default)]
    pub draft: BookingForm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_resources_are_stale() {
        let cache = CacheTimestamps::default();
        assert!(cache.is_stale(&CacheResource::Parcels("a@b.c".into()), Duration::from_secs(60)));
    }

    #[test]
    fn recent_fetch_is_fresh_until_ttl() {
        let mut cache = CacheTimestamps::default();
        let resource = CacheResource::Parcels("a@b.c".into());
        cache.record_fetch(resource.clone(), SystemTime::now());
        assert!(!cache.is_stale(&resource, Duration::from_secs(60)));

        cache.record_fetch(resource.clone(), SystemTime::now() - Duration::from_secs(120));
        assert!(cache.is_stale(&resource, Duration::from_secs(60)));
    }

    #[test]
    fn persisted_state_round_trips_draft_and_settings() {
        let mut state = AppState::default();
        state.settings.user_email = "customer@example.com".to_string();
        state.booking.title = "Gift box".to_string();
        state.parcels.push(Parcel::default());

        let mut restored = AppState::default();
        restored.apply_persisted(state.to_persisted());
        assert_eq!(restored.settings, state.settings);
        assert_eq!(restored.booking.title, "Gift box");
        assert!(restored.parcels.is_empty(), "parcels are fetched, not persisted");
    }

    #[test]
    fn older_settings_files_fill_defaults() {
        let persisted: PersistedState =
            serde_json::from_str(r#"{"settings": {"api_base_url": "https://api.example.com/"}}"#)
                .expect("decodes");
        assert_eq!(persisted.settings.api_base_url, "https://api.example.com/");
        assert_eq!(persisted.settings.access_token, None);
        assert!(!persisted.settings.has_identity());
        assert_eq!(persisted.draft, BookingForm::default());
    }
}

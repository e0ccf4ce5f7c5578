//! Saved-settings cleanup plus environment overrides layered on top.

use url::Url;

use crate::domain::{app_state::DEFAULT_API_BASE_URL, ClientSettings};

pub const ENV_API_URL: &str = "PARCEL_DESK_API_URL";
pub const ENV_USER_EMAIL: &str = "PARCEL_DESK_USER_EMAIL";
pub const ENV_TOKEN: &str = "PARCEL_DESK_TOKEN";

pub fn apply_env_overrides(settings: &mut ClientSettings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(raw) = lookup(ENV_API_URL) {
        match normalize_base_url(&raw) {
            Ok(url) => {
                tracing::info!(%url, "{} overrides the backend URL", ENV_API_URL);
                settings.api_base_url = url;
            }
            Err(err) => {
                tracing::warn!(value = %raw, %err, "invalid {}, keeping saved URL", ENV_API_URL);
            }
        }
    }

    if let Some(email) = lookup(ENV_USER_EMAIL).filter(|value| !value.trim().is_empty()) {
        tracing::info!("{} overrides the customer email", ENV_USER_EMAIL);
        settings.user_email = email.trim().to_string();
    }

    if let Some(token) = lookup(ENV_TOKEN).filter(|value| !value.trim().is_empty()) {
        tracing::info!("{} provides the access token", ENV_TOKEN);
        settings.access_token = Some(token.trim().to_string());
    }
}

/// Brings a hand-edited or older saved URL into the joinable form; an unusable
/// one falls back to the default backend.
pub fn normalize_saved_url(settings: &mut ClientSettings) {
    match normalize_base_url(&settings.api_base_url) {
        Ok(url) => settings.api_base_url = url,
        Err(err) => {
            tracing::warn!(
                value = %settings.api_base_url,
                %err,
                "saved backend URL is invalid, using {}",
                DEFAULT_API_BASE_URL
            );
            settings.api_base_url = DEFAULT_API_BASE_URL.to_string();
        }
    }
}

/// Parses a backend URL and makes sure relative endpoint paths join below it.
pub fn normalize_base_url(raw: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1").as_deref(),
            Ok("https://api.example.com/v1/")
        );
        assert_eq!(
            normalize_base_url(" http://localhost:3000 ").as_deref(),
            Ok("http://localhost:3000/")
        );
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn saved_url_keeps_its_path_prefix() {
        let mut settings = ClientSettings {
            api_base_url: "https://host/v1".to_string(),
            ..ClientSettings::default()
        };
        normalize_saved_url(&mut settings);
        assert_eq!(settings.api_base_url, "https://host/v1/");

        let joined = url::Url::parse(&settings.api_base_url)
            .and_then(|base| base.join("parcels"))
            .map(String::from);
        assert_eq!(joined.as_deref(), Ok("https://host/v1/parcels"));
    }

    #[test]
    fn unusable_saved_url_falls_back_to_default() {
        let mut settings = ClientSettings {
            api_base_url: "localhost without scheme".to_string(),
            ..ClientSettings::default()
        };
        normalize_saved_url(&mut settings);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn environment_wins_over_saved_settings() {
        let mut settings = ClientSettings::default();
        apply_overrides(
            &mut settings,
            overrides(&[
                (ENV_API_URL, "https://parcels.example.com/api"),
                (ENV_USER_EMAIL, " rider@example.com "),
                (ENV_TOKEN, "abc123"),
            ]),
        );
        assert_eq!(settings.api_base_url, "https://parcels.example.com/api/");
        assert_eq!(settings.user_email, "rider@example.com");
        assert_eq!(settings.access_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn invalid_or_blank_values_are_ignored() {
        let mut settings = ClientSettings {
            api_base_url: "https://saved.example.com/".to_string(),
            user_email: "saved@example.com".to_string(),
            access_token: None,
        };
        apply_overrides(
            &mut settings,
            overrides(&[(ENV_API_URL, "::bogus"), (ENV_USER_EMAIL, "   ")]),
        );
        assert_eq!(settings.api_base_url, "https://saved.example.com/");
        assert_eq!(settings.user_email, "saved@example.com");
    }
}

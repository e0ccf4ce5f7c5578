use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "ParcelDesk";
const APP_NAME: &str = "ParcelDesk";

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    let path = data_file()?;
    load_from(&path)
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    save_to(&path, state)
}

pub fn load_from(path: &Path) -> Option<PersistedState> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no saved settings yet");
            return None;
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to read saved settings");
            return None;
        }
    };
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable saved settings");
            None
        }
    }
}

pub fn save_to(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "saved settings");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::ParcelType;

    #[test]
    fn saved_state_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");

        let mut state = PersistedState::default();
        state.settings.user_email = "customer@example.com".to_string();
        state.settings.access_token = Some("secret".to_string());
        state.draft.parcel_type = ParcelType::NotDocument;
        state.draft.weight_input = "4.5".to_string();
        state.draft.sender.district = Some("Gazipur".to_string());

        save_to(&path, &state).expect("saves");
        assert_eq!(load_from(&path), Some(state));
    }

    #[test]
    fn missing_or_corrupt_files_load_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        assert_eq!(load_from(&path), None);

        fs::write(&path, "{not json").expect("writes");
        assert_eq!(load_from(&path), None);
    }
}

use crate::error::AppError;
use crate::model::AppState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "state.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    #[serde(default = "schema_version_default")]
    schema_version: u32,
    #[serde(flatten)]
    state: AppState,
}

fn schema_version_default() -> u32 {
    SCHEMA_VERSION
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("LIFERPG_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("liferpg").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("liferpg")
            .join(STORE_FILE_NAME))
    }
}

/// Loads the persisted state. The load path never rejects data:
/// a missing file or malformed JSON falls back to defaults, missing
/// fields are filled in structurally, and invariants are repaired.
pub fn load_state(path: &Path) -> Result<AppState, AppError> {
    if !path.exists() {
        return Ok(AppState::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let mut state = match serde_json::from_str::<StoredState>(&content) {
        Ok(stored) => stored.state,
        Err(_) => AppState::default(),
    };
    state.repair();
    Ok(state)
}

pub fn save_state(path: &Path, state: &AppState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredState {
        schema_version: SCHEMA_VERSION,
        state: state.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}

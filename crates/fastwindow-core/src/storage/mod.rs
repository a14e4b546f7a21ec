mod config;
pub mod database;

pub use config::{
    validate_duration, Config, FastingConfig, NotificationSettings, DEFAULT_DURATION_HOURS,
};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StoreError;
use crate::records::{DietRecord, WeightRecord};

/// Durable persistence for record collections.
///
/// Each save is a whole-collection overwrite; callers re-read before
/// writing so same-process edits from another screen are not clobbered
/// (last-writer-wins). Load failures degrade to empty collections.
pub trait RecordStore {
    fn load_weight_records(&self) -> Result<Vec<WeightRecord>, StoreError>;
    fn save_weight_records(&self, records: &[WeightRecord]) -> Result<(), StoreError>;
    fn load_diet_records(&self) -> Result<Vec<DietRecord>, StoreError>;
    fn save_diet_records(&self, records: &[DietRecord]) -> Result<(), StoreError>;
    /// Persisted fasting duration preference; `None` when never set.
    fn load_fasting_duration(&self) -> Result<Option<f64>, StoreError>;
    fn save_fasting_duration(&self, hours: f64) -> Result<(), StoreError>;
    /// Drop both record collections. Preferences survive.
    fn clear_all(&self) -> Result<(), StoreError>;
    fn has_data(&self) -> Result<bool, StoreError>;
}

/// Returns `~/.config/fastwindow[-dev]/` based on FASTWINDOW_ENV.
///
/// Set FASTWINDOW_ENV=dev to use the development data directory, or
/// FASTWINDOW_DATA_DIR to point somewhere else entirely (tests use this).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var("FASTWINDOW_DATA_DIR") {
        Ok(custom) => PathBuf::from(custom),
        Err(_) => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FASTWINDOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("fastwindow-dev")
            } else {
                base_dir.join("fastwindow")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
    Ok(dir)
}

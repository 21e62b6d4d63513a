//! Run configuration: the maps credential and the fixed dataset table.

use std::{fmt, path::PathBuf, time::Duration};

use clap::ValueEnum;
use thiserror::Error;

/// Environment variable holding the static maps API key.
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

const TRAIN_URL: &str =
    "https://1drv.ms/x/c/8cf6803adf7941c3/IQBue1q4w4TETL_7xWMGhcD_AejALtdsXTBejVUjRA9qeM8?download=1";
const TEST_URL: &str =
    "https://1drv.ms/x/c/8cf6803adf7941c3/IQAwCVfSggmjQ4DJH51zJK-tARwRQWE9fl0bPlwo1mRF2PQ?download=1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("GOOGLE_MAPS_API_KEY not found in the environment")]
    MissingCredential,
}

/// API key for the static maps service.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// An empty key is treated the same as a missing one.
    pub fn from_option(key: Option<String>) -> Result<Self, ConfigError> {
        match key {
            Some(key) if !key.trim().is_empty() => Ok(Credential(key)),
            _ => Err(ConfigError::MissingCredential),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the key out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// One of the two logical groups of rows, each with its own source and output folder.
pub enum DatasetKind {
    Train,
    Test,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Train, DatasetKind::Test];

    pub fn url(&self) -> &'static str {
        match self {
            DatasetKind::Train => TRAIN_URL,
            DatasetKind::Test => TEST_URL,
        }
    }

    pub fn spreadsheet_name(&self) -> &'static str {
        match self {
            DatasetKind::Train => "train.xlsx",
            DatasetKind::Test => "test.xlsx",
        }
    }

    pub fn output_dir_name(&self) -> &'static str {
        match self {
            DatasetKind::Train => "satellite_images",
            DatasetKind::Test => "test_images",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Train => "Train",
            DatasetKind::Test => "Test",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub delay: Duration,
    pub datasets: Vec<DatasetKind>,
}

impl Settings {
    pub fn spreadsheet_path(&self, dataset: DatasetKind) -> PathBuf {
        self.data_dir.join(dataset.spreadsheet_name())
    }

    pub fn output_dir(&self, dataset: DatasetKind) -> PathBuf {
        self.data_dir.join(dataset.output_dir_name())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("."),
            delay: Duration::from_millis(100),
            datasets: DatasetKind::ALL.to_vec(),
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_missing_or_empty_key() {
        assert_eq!(
            Credential::from_option(None).unwrap_err(),
            ConfigError::MissingCredential
        );
        assert_eq!(
            Credential::from_option(Some("  ".to_string())).unwrap_err(),
            ConfigError::MissingCredential
        );
    }

    #[test]
    fn should_hide_key_in_debug_output() {
        let credential = Credential::from_option(Some("secret".to_string())).unwrap();

        assert_eq!(credential.as_str(), "secret");
        assert!(!format!("{:?}", credential).contains("secret"));
    }

    #[test]
    fn should_lay_out_dataset_paths() {
        let settings = Settings {
            data_dir: PathBuf::from("/data"),
            ..Settings::default()
        };

        assert_eq!(
            settings.spreadsheet_path(DatasetKind::Train),
            PathBuf::from("/data/train.xlsx")
        );
        assert_eq!(
            settings.output_dir(DatasetKind::Test),
            PathBuf::from("/data/test_images")
        );
        assert_eq!(settings.delay, Duration::from_millis(100));
        assert_eq!(settings.datasets, vec![DatasetKind::Train, DatasetKind::Test]);
    }
}

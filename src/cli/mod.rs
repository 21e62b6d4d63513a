//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::config::{DatasetKind, Settings, API_KEY_VAR};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Downloads the train/test spreadsheets and a satellite image for every row
pub struct Cli {
    /// Static maps API key
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Folder holding the spreadsheets and image folders
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Pause after every image request, in milliseconds
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub delay_ms: u64,

    /// Datasets to process (default: all)
    #[arg(long = "dataset", value_enum)]
    pub datasets: Vec<DatasetKind>,
}

impl Cli {
    /// Parses the command line after loading `.env` from the working
    /// directory, so the API key may live there.
    pub fn parse_with_dotenv() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Could not read .env: {}", e);
            }
        }

        Cli::parse()
    }

    pub fn settings(&self) -> Settings {
        let datasets = if self.datasets.is_empty() {
            DatasetKind::ALL.to_vec()
        } else {
            self.datasets.clone()
        };

        Settings {
            data_dir: self.data_dir.clone(),
            delay: Duration::from_millis(self.delay_ms),
            datasets,
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    ProgressBar::new(size).with_message(message).with_style(style)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_fixed_behaviour() {
        let cli = Cli::try_parse_from(["satfetch", "--api-key", "abc"]).unwrap();
        let settings = cli.settings();

        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(settings.data_dir, PathBuf::from("."));
        assert_eq!(settings.delay, Duration::from_millis(100));
        assert_eq!(settings.datasets, vec![DatasetKind::Train, DatasetKind::Test]);
    }

    #[test]
    fn should_select_datasets() {
        let cli = Cli::try_parse_from([
            "satfetch",
            "--dataset",
            "test",
            "--delay-ms",
            "250",
            "--data-dir",
            "/tmp/sat",
        ])
        .unwrap();
        let settings = cli.settings();

        assert_eq!(settings.datasets, vec![DatasetKind::Test]);
        assert_eq!(settings.delay, Duration::from_millis(250));
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/sat"));
    }

    #[test]
    fn should_reject_zero_delay() {
        assert!(Cli::try_parse_from(["satfetch", "--delay-ms", "0"]).is_err());
    }

    #[test]
    fn should_read_api_key_from_env_file() {
        // A key already in the environment takes precedence over `.env`.
        if std::env::var(API_KEY_VAR).is_ok() {
            return;
        }
        let temp_dir = tempfile::TempDir::new().unwrap();
        let env_file = temp_dir.path().join(".env");
        std::fs::write(&env_file, format!("{}=from-dotenv\n", API_KEY_VAR)).unwrap();

        dotenvy::from_path(&env_file).unwrap();
        let cli = Cli::try_parse_from(["satfetch"]).unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("from-dotenv"));
    }

    #[test]
    fn should_create_progress_bar() {
        let pb = create_progress_bar(3, "Downloading to satellite_images".to_string());
        pb.inc(2);

        assert_eq!(pb.length(), Some(3));
        assert_eq!(pb.position(), 2);
        pb.finish_and_clear();
    }
}

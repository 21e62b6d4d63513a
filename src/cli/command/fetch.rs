//! Downloads the spreadsheets, then the satellite images for each dataset.

use anyhow::Result;
use reqwest::Client;
use tracing::{debug, error};

use crate::{
    batch::{download_images, BatchSummary},
    config::{Credential, DatasetKind, Settings},
    download::download_spreadsheet,
    maps::{ImageFetcher, StaticMapClient},
    table::Table,
};

pub async fn fetch(api_key: Option<String>, settings: &Settings) -> Result<()> {
    // Nothing is touched until the key is known.
    let credential = Credential::from_option(api_key)?;
    let client = Client::new();
    let maps = StaticMapClient::new(client.clone(), credential);

    println!("--- Step 1: Checking Data Files ---");
    for dataset in &settings.datasets {
        let status =
            download_spreadsheet(&client, dataset.url(), &settings.spreadsheet_path(*dataset))
                .await;
        debug!("{:?} spreadsheet: {:?}", dataset, status);
    }

    for (step, dataset) in settings.datasets.iter().enumerate() {
        println!(
            "\n--- Step {}: Processing {} Images ---",
            step + 2,
            dataset.label()
        );
        process_dataset(*dataset, settings, &maps).await;
    }

    Ok(())
}

/// Loads one dataset's spreadsheet and fetches its images. Errors are
/// reported here so the other dataset still runs.
pub async fn process_dataset<F: ImageFetcher>(
    dataset: DatasetKind,
    settings: &Settings,
    fetcher: &F,
) -> Option<BatchSummary> {
    let spreadsheet = settings.spreadsheet_path(dataset);

    if !spreadsheet.exists() {
        println!("{} not found.", spreadsheet.display());
        return None;
    }

    let result = match Table::load(&spreadsheet) {
        Ok(table) => {
            download_images(&table, &settings.output_dir(dataset), fetcher, settings.delay).await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(summary) => Some(summary),
        Err(e) => {
            error!("Error processing {}: {}", spreadsheet.display(), e);
            None
        }
    }
}

// -- Tests -------------------------------------------------------------------

//! Downloads the dataset spreadsheets, skipping any that are already on disk.

use std::{fs::File, io::Write, path::Path};

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use tracing::error;

use crate::cli::create_spinner;

#[derive(Debug, Clone, PartialEq)]
/// What happened to a single spreadsheet.
pub enum DownloadStatus {
    Skipped,
    Downloaded,
    Failed(String),
}

/// Downloads `url` to `file_path` unless the file already exists.
///
/// Failures are reported and returned as [`DownloadStatus::Failed`]; bytes
/// already written before a failure are left in place.
pub async fn download_spreadsheet(client: &Client, url: &str, file_path: &Path) -> DownloadStatus {
    let file_name = file_path.display();

    if file_path.exists() {
        println!("{} already exists. Skipping download.", file_name);
        return DownloadStatus::Skipped;
    }

    println!("Downloading {} from {}...", file_name, url);
    let bar = create_spinner(format!("Downloading {}...", file_name));

    match download_with_progress(client, url, file_path, &bar).await {
        Ok(()) => {
            bar.finish_with_message(format!("Successfully downloaded {}", file_name));
            DownloadStatus::Downloaded
        }
        Err(e) => {
            bar.abandon_with_message(format!("Failed to download {}", file_name));
            error!("Error downloading {}: {}", file_name, e);
            DownloadStatus::Failed(e.to_string())
        }
    }
}

/// Streams the body of a 200 response to `file_path`, switching the spinner
/// to a byte bar when the server sends a content length.
async fn download_with_progress(
    client: &Client,
    url: &str,
    file_path: &Path,
    progress_bar: &ProgressBar,
) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;

    let status = response.status();
    if status != StatusCode::OK {
        bail!("server answered with status code {}", status.as_u16());
    }

    if let Some(total_size) = response.content_length().filter(|&len| len > 0) {
        progress_bar.set_length(total_size);
        progress_bar.set_style(byte_style()?);
    }

    let mut file = File::create(file_path)
        .with_context(|| format!("cannot create {}", file_path.display()))?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("connection dropped mid-download")?;
        file.write_all(&chunk)?;
        progress_bar.inc(chunk.len() as u64);
    }

    Ok(())
}

fn byte_style() -> Result<ProgressStyle> {
    let style = ProgressStyle::with_template("{msg} {bar:40.green/white} {bytes}/{total_bytes} {eta}")?
        .progress_chars("=> ");

    Ok(style)
}

// -- Tests -------------------------------------------------------------------

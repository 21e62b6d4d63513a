//! Fetches one image per table row into an output folder.

use std::{fmt, fs, path::Path, time::Duration};

use anyhow::Result;
use tracing::debug;

use crate::{cli::create_progress_bar, maps::ImageFetcher, table::Table};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved: {} | Skipped: {} | Failed: {}",
            self.saved, self.skipped, self.failed
        )
    }
}

/// Downloads an image for every row of `table` into `output_dir`.
///
/// Rows whose image already exists are skipped, rows without both
/// coordinates count as failed without a request. Every attempted fetch is
/// followed by `delay`. Fails before touching anything if the coordinate
/// columns cannot be found.
pub async fn download_images<F: ImageFetcher>(
    table: &Table,
    output_dir: &Path,
    fetcher: &F,
    delay: Duration,
) -> Result<BatchSummary> {
    let columns = table.resolve_columns()?;

    fs::create_dir_all(output_dir)?;
    println!(
        "Target Folder: {} | Records: {}",
        output_dir.display(),
        table.len()
    );

    let pb = create_progress_bar(
        table.len() as u64,
        format!("Downloading to {}", output_dir.display()),
    );
    let mut summary = BatchSummary::default();

    for record in table.records(&columns) {
        pb.inc(1);
        let output_path = output_dir.join(format!("{}.jpg", record.id));

        if output_path.exists() {
            summary.skipped += 1;
            continue;
        }

        let Some(coordinate) = record.coordinate() else {
            debug!("Row {} is missing coordinates", record.id);
            summary.failed += 1;
            continue;
        };

        if fetcher.fetch_image(coordinate, &output_path).await {
            summary.saved += 1;
        } else {
            summary.failed += 1;
        }

        tokio::time::sleep(delay).await;
    }

    pb.finish_and_clear();
    println!("Done. {}\n", summary);

    Ok(summary)
}

// -- Tests -------------------------------------------------------------------

//! Fetches satellite images from the static maps endpoint.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use futures::StreamExt;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

use crate::{config::Credential, table::Coordinate};

const STATIC_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";
const ZOOM: u8 = 19;
const SIZE: &str = "600x600";
const MAP_TYPE: &str = "satellite";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Exception fetching image: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Expected an image but got content type '{0}'")]
    NotAnImage(String),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can save an image of the ground at a coordinate.
pub trait ImageFetcher {
    /// Returns `true` once the image is written to `output_path`. On failure
    /// nothing is left at `output_path`.
    async fn fetch_image(&self, coordinate: Coordinate, output_path: &Path) -> bool;
}

pub struct StaticMapClient {
    client: Client,
    credential: Credential,
    base_url: String,
}

impl StaticMapClient {
    pub fn new(client: Client, credential: Credential) -> Self {
        Self {
            client,
            credential,
            base_url: STATIC_MAP_URL.to_string(),
        }
    }

    pub fn request_url(&self, coordinate: Coordinate) -> Result<Url, FetchError> {
        let center = format!("{},{}", coordinate.lat, coordinate.long);
        let zoom = ZOOM.to_string();
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("center", center.as_str()),
                ("zoom", zoom.as_str()),
                ("size", SIZE),
                ("maptype", MAP_TYPE),
                ("key", self.credential.as_str()),
            ],
        )?;

        Ok(url)
    }

    async fn try_fetch(&self, coordinate: Coordinate, output_path: &Path) -> Result<(), FetchError> {
        let response = self.client.get(self.request_url(coordinate)?).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        check_content_type(&response)?;

        if let Err(e) = write_body(response, output_path).await {
            let _ = fs::remove_file(output_path);
            return Err(e);
        }

        Ok(())
    }
}

impl ImageFetcher for StaticMapClient {
    async fn fetch_image(&self, coordinate: Coordinate, output_path: &Path) -> bool {
        match self.try_fetch(coordinate, output_path).await {
            Ok(()) => true,
            Err(e @ FetchError::NotAnImage(_)) => {
                warn!("{} for {}", e, output_path.display());
                false
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }
}

/// A missing content type is accepted; anything declared that is not an
/// image is not.
fn check_content_type(response: &Response) -> Result<(), FetchError> {
    let Some(value) = response.headers().get(CONTENT_TYPE) else {
        return Ok(());
    };
    let content_type = value.to_str().unwrap_or_default().to_ascii_lowercase();

    if content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(FetchError::NotAnImage(content_type))
    }
}

async fn write_body(response: Response, output_path: &Path) -> Result<(), FetchError> {
    let mut file = File::create(output_path)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?)?;
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------

//! Snapshot retrieval: local files, stdin, or `http(s)://` URLs.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::AppError;
use crate::io::ingest::SnapshotFormat;

const USER_AGENT: &str = concat!("pennant-charts/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// Raw snapshot text plus the format it should be parsed as.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub location: String,
    pub text: String,
    pub format: SnapshotFormat,
}

pub struct SnapshotClient {
    client: Client,
}

impl SnapshotClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Request for {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Request for {url} failed with status {}.", resp.status()),
            ));
        }

        resp.text()
            .map_err(|e| AppError::new(4, format!("Failed to read response body from {url}: {e}")))
    }
}

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read a snapshot from a URL, `-` (stdin), or a file path.
pub fn read_snapshot(location: &str) -> Result<Snapshot, AppError> {
    let text = if is_url(location) {
        info!(url = location, "fetching snapshot");
        SnapshotClient::new()?.fetch_text(location)?
    } else if location == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::new(2, format!("Failed to read snapshot from stdin: {e}")))?;
        buf
    } else {
        std::fs::read_to_string(location)
            .map_err(|e| AppError::new(2, format!("Failed to read snapshot '{location}': {e}")))?
    };
    let format = SnapshotFormat::detect(location, &text);
    Ok(Snapshot {
        location: location.to_string(),
        text,
        format,
    })
}

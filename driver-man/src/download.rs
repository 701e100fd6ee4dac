use std::path::Path;

use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::request::RequestConfig;

const NOTIFY_EVERY: u64 = 1024 * 1024;

/// Fetches a short text resource, such as a `LATEST_RELEASE` pointer.
pub async fn fetch_text(config: &RequestConfig) -> Result<String> {
    let url = config.url.as_str();
    let client = config.client()?;
    let response = config
        .request(&client)
        .send()
        .await
        .map_err(|e| Error::http(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| Error::http(url, e))?;
    Ok(body.trim().to_string())
}

/// Streams the response body into `dest`, returning the number of bytes written.
///
/// `dest` is only created once the server has answered with a success status,
/// and is removed again if the transfer fails part-way.
pub async fn fetch_to_file(config: &RequestConfig, dest: &Path) -> Result<u64> {
    let url = config.url.as_str();
    let client = config.client()?;
    let response = config
        .request(&client)
        .send()
        .await
        .map_err(|e| Error::http(url, e))?;

    let status = response.status();
    if !status.is_success() {
        error!("Error status code: {}", status.as_u16());
        if let Ok(body) = response.text().await {
            if !body.is_empty() {
                error!("{}", body);
            }
        }
        return Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let result = stream_to_file(response, url, dest).await;
    if result.is_err() {
        let _ = fs::remove_file(dest).await;
    }
    result
}

async fn stream_to_file(response: reqwest::Response, url: &str, dest: &Path) -> Result<u64> {
    let mut file = File::create(dest)
        .await
        .map_err(|e| Error::io("create", dest, e))?;
    let mut state = DownloadState::default();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::http(url, e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io("write", dest, e))?;
        if let Some(received) = state.record(chunk.len() as u64) {
            info!("Received {}K...", received / 1024);
        }
    }
    file.flush().await.map_err(|e| Error::io("flush", dest, e))?;

    info!("Received {}K total.", state.received / 1024);
    Ok(state.received)
}

#[derive(Debug, Default)]
struct DownloadState {
    received: u64,
    notified: u64,
}

impl DownloadState {
    /// Adds `len` bytes and returns the running total when a progress line is due.
    fn record(&mut self, len: u64) -> Option<u64> {
        self.received += len;
        if self.received - self.notified > NOTIFY_EVERY {
            self.notified = self.received;
            return Some(self.received);
        }
        None
    }
}

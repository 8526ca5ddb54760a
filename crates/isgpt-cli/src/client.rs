//! HTTP client for `POST /infer`

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct InferRequest<'a> {
    sentence: &'a str,
    verbose: bool,
}

/// Client for a running isgpt server
#[derive(Debug, Clone)]
pub struct IsgptClient {
    http: reqwest::Client,
    base_url: String,
}

impl IsgptClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        // Long documents take a while on CPU.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send `text` for analysis and return the response body as-is
    pub async fn analyze(&self, text: &str, verbose: bool) -> Result<String> {
        let url = format!("{}/infer", self.base_url);
        debug!(%url, chars = text.len(), verbose, "Sending inference request");

        let response = self
            .http
            .post(&url)
            .json(&InferRequest {
                sentence: text,
                verbose,
            })
            .send()
            .await
            .context("failed to connect to server")?;

        let status = response.status();
        let body = response.text().await.context("failed to read response")?;

        if !status.is_success() {
            bail!("server returned error {}: {}", status.as_u16(), body);
        }

        Ok(body)
    }
}

/// Read the input file, rejecting whitespace-only content
pub fn read_input(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;

    if text.trim().is_empty() {
        bail!("File is empty");
    }

    Ok(text)
}

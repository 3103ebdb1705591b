use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::{RunCodeRequest, RunCodeResponse};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to reach code runner: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Code runner answered with status {0}")]
    Status(u16),
}

/// Client for the external code runner. The runner is opaque: it takes
/// `{code, languageId}` and answers `{stdout, stderr}`.
#[derive(Debug, Clone)]
pub struct RunnerClient {
    client: Client,
    url: String,
}

impl RunnerClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, RunnerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub async fn run(&self, request: &RunCodeRequest) -> Result<RunCodeResponse, RunnerError> {
        debug!(
            "Forwarding {} bytes of language {} to {}",
            request.code.len(),
            request.language_id,
            self.url
        );
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Code runner at {} returned {}", self.url, status);
            return Err(RunnerError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

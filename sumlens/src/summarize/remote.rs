use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationParams, SummaryOutput, SummaryProvider};

/// Remote summarization provider speaking the hosted-inference HTTP API
/// for seq2seq summarization checkpoints.
pub struct RemoteSummarizer {
    base_url: String,
    api_key: String,
    model: String,
    default_timeout: Duration,
    client: reqwest::Client,
}

impl RemoteSummarizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            default_timeout: Duration::from_secs(30),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.default_timeout = Duration::from_secs(timeout_secs);
        self
    }

    /// Checkpoint id this provider was built for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Hosted endpoints address a checkpoint as `<base>/models/<id>`; a
    /// base URL that already names one is used as-is.
    fn endpoint(&self) -> String {
        if self.base_url.contains("/models/") || self.base_url.ends_with(self.model.as_str()) {
            self.base_url.clone()
        } else {
            format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model)
        }
    }
}

#[async_trait::async_trait]
impl SummaryProvider for RemoteSummarizer {
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<SummaryOutput> {
        let timeout = params
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let req_body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: params.max_length,
                min_length: params.min_length,
                do_sample: params.do_sample,
                temperature: params.temperature,
                top_p: params.top_p,
                repetition_penalty: params.repetition_penalty,
                length_penalty: params.length_penalty,
                early_stopping: params.early_stopping,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        // Public endpoints accept anonymous calls, so the header is only
        // sent when a key was configured.
        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&req_body);
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        // Make HTTP request with timeout
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .context("summarization request timed out")?
            .context("summarization HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("summarization API error {}: {}", status, body);
        }

        let body_text = response
            .text()
            .await
            .context("failed to read summarization response body")?;

        // Standard shape is a one-element array of generated summaries.
        match serde_json::from_str::<Vec<GeneratedSummary>>(&body_text) {
            Ok(items) => {
                let first = items
                    .first()
                    .context("summarization response has no entries")?;
                Ok(SummaryOutput {
                    summary: first.summary_text.clone(),
                    model: self.model.clone(),
                })
            }
            Err(e) => {
                // Some deployments return a bare object instead of an array.
                if let Ok(single) = serde_json::from_str::<GeneratedSummary>(&body_text) {
                    return Ok(SummaryOutput {
                        summary: single.summary_text,
                        model: self.model.clone(),
                    });
                }
                if let Ok(api_err) = serde_json::from_str::<InferenceError>(&body_text) {
                    anyhow::bail!("summarization API returned an error: {}", api_err.error);
                }
                anyhow::bail!(
                    "failed to parse summarization response: {} (body: {})",
                    e,
                    body_text
                );
            }
        }
    }
}

// Inference API request/response structures
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    length_penalty: f32,
    early_stopping: bool,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedSummary {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

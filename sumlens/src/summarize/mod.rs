use anyhow::Result;
use tracing::{info, warn};

/// Core trait for summarization backends (remote today, local later)
#[async_trait::async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Generate a summary of `text` with the given generation parameters
    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<SummaryOutput>;
}

/// Generation parameters forwarded to the inference pipeline
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub length_penalty: f32,
    pub early_stopping: bool,
    /// Per-request override of the provider's default timeout
    pub timeout_seconds: Option<u64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 100,
            min_length: 30,
            do_sample: false,
            temperature: 1.0,
            top_p: 1.0,
            repetition_penalty: 1.0,
            length_penalty: 1.0,
            early_stopping: true,
            timeout_seconds: None,
        }
    }
}

impl GenerationParams {
    /// Build parameters from the configuration section, keeping the
    /// application defaults for anything left unset.
    pub fn from_config(cfg: Option<&common::SummarizerConfig>) -> Self {
        let defaults = Self::default();
        let Some(cfg) = cfg else { return defaults };
        Self {
            max_length: cfg.max_length.unwrap_or(defaults.max_length),
            min_length: cfg.min_length.unwrap_or(defaults.min_length),
            do_sample: cfg.do_sample.unwrap_or(defaults.do_sample),
            temperature: cfg.temperature.unwrap_or(defaults.temperature),
            top_p: cfg.top_p.unwrap_or(defaults.top_p),
            repetition_penalty: cfg.repetition_penalty.unwrap_or(defaults.repetition_penalty),
            length_penalty: cfg.length_penalty.unwrap_or(defaults.length_penalty),
            early_stopping: cfg.early_stopping.unwrap_or(defaults.early_stopping),
            timeout_seconds: None,
        }
    }
}

/// Raw result returned by a provider
#[derive(Debug, Clone)]
pub struct SummaryOutput {
    pub summary: String,
    /// Checkpoint id that produced the summary
    pub model: String,
}

/// Input-length bounds checked before any network call
#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_chars: 50,
            max_chars: 10_000,
        }
    }
}

impl InputLimits {
    pub fn from_config(cfg: Option<&common::LimitsConfig>) -> Self {
        let defaults = Self::default();
        let Some(cfg) = cfg else { return defaults };
        Self {
            min_chars: cfg.min_text_chars.unwrap_or(defaults.min_chars),
            max_chars: cfg.max_text_chars.unwrap_or(defaults.max_chars),
        }
    }
}

/// A completed summarization run with the length bookkeeping the
/// presentation layer reports.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub summary: String,
    pub model_used: String,
    pub original_chars: usize,
    pub summary_chars: usize,
}

impl SummaryReport {
    /// Summary length as a fraction of the original length.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_chars == 0 {
            0.0
        } else {
            self.summary_chars as f64 / self.original_chars as f64
        }
    }
}

/// Validate and summarize a single text through the given provider.
///
/// The input is trimmed before validation; texts outside the configured
/// length bounds are rejected without touching the network.
pub async fn summarize_text<P: SummaryProvider + ?Sized>(
    provider: &P,
    text: &str,
    params: &GenerationParams,
    limits: &InputLimits,
) -> Result<SummaryReport> {
    let text = text.trim();
    let original_chars = text.chars().count();
    if original_chars < limits.min_chars {
        anyhow::bail!(
            "text must be at least {} characters long for summarization",
            limits.min_chars
        );
    }
    if original_chars > limits.max_chars {
        anyhow::bail!(
            "text is too long, please limit input to {} characters",
            limits.max_chars
        );
    }

    let output = provider.summarize(text, params).await?;
    let summary_chars = output.summary.chars().count();
    info!(
        model = %output.model,
        original_chars,
        summary_chars,
        "summary generated"
    );

    Ok(SummaryReport {
        summary: output.summary,
        model_used: output.model,
        original_chars,
        summary_chars,
    })
}

/// Summarize several texts in sequence, capturing each failure per item
/// instead of aborting the whole batch.
pub async fn summarize_batch<P: SummaryProvider + ?Sized>(
    provider: &P,
    texts: &[String],
    params: &GenerationParams,
    limits: &InputLimits,
) -> Vec<Result<SummaryReport>> {
    let mut results = Vec::with_capacity(texts.len());
    for text in texts {
        match summarize_text(provider, text, params, limits).await {
            Ok(report) => results.push(Ok(report)),
            Err(e) => {
                warn!("batch summarization item failed: {e:#}");
                results.push(Err(e));
            }
        }
    }
    results
}

pub mod remote;

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(&'static str);

    #[async_trait::async_trait]
    impl SummaryProvider for FixedProvider {
        async fn summarize(&self, _text: &str, _params: &GenerationParams) -> Result<SummaryOutput> {
            Ok(SummaryOutput {
                summary: self.0.to_string(),
                model: "fixed".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn rejects_text_below_minimum_length() {
        let provider = FixedProvider("unused");
        let result = summarize_text(
            &provider,
            "   too short   ",
            &GenerationParams::default(),
            &InputLimits::default(),
        )
        .await;

        let err = result.expect_err("short input must be rejected");
        assert!(err.to_string().contains("at least 50 characters"));
    }

    #[tokio::test]
    async fn rejects_text_above_maximum_length() {
        let provider = FixedProvider("unused");
        let limits = InputLimits {
            min_chars: 10,
            max_chars: 20,
        };
        let result = summarize_text(
            &provider,
            &"x".repeat(21),
            &GenerationParams::default(),
            &limits,
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn report_counts_trimmed_input() {
        let provider = FixedProvider("a concise summary");
        let text = format!("  {}  ", "word ".repeat(20).trim());
        let report = summarize_text(
            &provider,
            &text,
            &GenerationParams::default(),
            &InputLimits::default(),
        )
        .await
        .expect("summarization succeeds");

        assert_eq!(report.original_chars, text.trim().chars().count());
        assert_eq!(report.summary, "a concise summary");
        assert_eq!(report.model_used, "fixed");
        assert!(report.compression_ratio() < 1.0);
    }

    #[tokio::test]
    async fn batch_keeps_going_after_a_failure() {
        let provider = FixedProvider("summary");
        let texts = vec![
            "too short".to_string(),
            "word ".repeat(20).trim().to_string(),
        ];
        let results = summarize_batch(
            &provider,
            &texts,
            &GenerationParams::default(),
            &InputLimits::default(),
        )
        .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn params_from_config_keep_defaults_for_unset_fields() {
        let cfg = common::SummarizerConfig {
            api_url: None,
            api_key_env: None,
            model: None,
            timeout_seconds: None,
            max_length: Some(64),
            min_length: None,
            do_sample: Some(true),
            temperature: None,
            top_p: None,
            repetition_penalty: None,
            length_penalty: None,
            early_stopping: None,
        };

        let params = GenerationParams::from_config(Some(&cfg));
        assert_eq!(params.max_length, 64);
        assert_eq!(params.min_length, 30);
        assert!(params.do_sample);
        assert!(params.early_stopping);
    }
}

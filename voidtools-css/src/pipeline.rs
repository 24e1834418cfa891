//! One conversion cycle: preprocess → convert → clean → analyze.

use crate::config::PipelineConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::tailwind::{check_unsupported, clean_up_output, fix_figma_css_with, Converter};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Typing,
    Converting,
    Done,
    Error,
}

impl Status {
    /// `true` once nothing more will happen without new input.
    pub fn is_settled(self) -> bool {
        matches!(self, Status::Idle | Status::Done | Status::Error)
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub output: String,
    pub unsupported_props: Vec<String>,
    pub status: Status,
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn done(output: String, unsupported_props: Vec<String>) -> Self {
        Self {
            output,
            unsupported_props,
            status: Status::Done,
            error: None,
        }
    }

    /// Error results carry only the fixed user-facing label.
    pub fn failed(err: &ConvertError) -> Self {
        Self {
            output: String::new(),
            unsupported_props: Vec::new(),
            status: Status::Error,
            error: Some(err.user_message().to_string()),
        }
    }
}

/// Runs `raw` through every stage. Never fails: converter errors and
/// timeouts come back as a result with [`Status::Error`].
pub async fn run_pipeline<C: Converter>(
    converter: &C,
    raw: &str,
    config: &PipelineConfig,
) -> ConversionResult {
    if raw.trim().is_empty() {
        return ConversionResult::idle();
    }

    let css = fix_figma_css_with(raw, &config.wrapper_selector);
    match convert_with_timeout(converter, &css, config).await {
        Ok(converted) => {
            let output = clean_up_output(&converted);
            let unsupported = check_unsupported(&css, &output);
            debug!(
                classes = output.split_whitespace().count(),
                unsupported = unsupported.len(),
                "conversion finished"
            );
            ConversionResult::done(output, unsupported)
        }
        Err(err) => {
            warn!(error = %err, "conversion failed");
            ConversionResult::failed(&err)
        }
    }
}

async fn convert_with_timeout<C: Converter>(
    converter: &C,
    css: &str,
    config: &PipelineConfig,
) -> ConvertResult<String> {
    match tokio::time::timeout(config.timeout(), converter.convert(css)).await {
        Ok(result) => result,
        Err(_) => Err(ConvertError::Timeout {
            timeout_ms: config.timeout_ms,
        }),
    }
}

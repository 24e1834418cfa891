use crate::error::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_WRAPPER_SELECTOR: &str = ".temp-wrapper";

/// Pipeline tuning, usually loaded from a small YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Delay before a conversion cycle starts. `0` defers to the next scheduler tick.
    pub debounce_ms: u64,
    /// Deadline for a single converter call.
    pub timeout_ms: u64,
    /// Selector wrapped around bare declaration lists.
    pub wrapper_selector: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            wrapper_selector: DEFAULT_WRAPPER_SELECTOR.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml(yaml: &str) -> ConvertResult<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> ConvertResult<()> {
        if self.timeout_ms == 0 {
            return Err(ConvertError::Config(
                "timeoutMs must be greater than zero".to_string(),
            ));
        }
        let selector = self.wrapper_selector.trim();
        if selector.is_empty() || selector.contains(['{', '}', ';']) {
            return Err(ConvertError::Config(format!(
                "wrapperSelector '{}' is not a usable selector",
                self.wrapper_selector
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = PipelineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.debounce(), Duration::ZERO);
    }

    #[test]
    fn camel_case_keys() {
        let yaml = "debounceMs: 250\ntimeoutMs: 3000\nwrapperSelector: .paste\n";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.timeout_ms, 3000);
        assert_eq!(config.wrapper_selector, ".paste");
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = PipelineConfig::from_yaml("timeoutMs: 0").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn selector_with_braces_rejected() {
        let err = PipelineConfig::from_yaml("wrapperSelector: '.a {'").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = PipelineConfig::from_yaml("timeoutMs: [").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }
}

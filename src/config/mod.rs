use crate::error::{FaultlineError, Result};
use dashmap::DashMap;
use serde::Deserialize;
use std::env;
use std::sync::Arc;

/// Key controlling whether the translator logs the full cause chain.
pub const PRINT_STACK_TRACE_KEY: &str = "FAULTLINE_PRINT_STACK_TRACE";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Create a service seeded from the process environment.
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Read a boolean key, falling back to `default` when it is unset.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => parse_bool(&raw).ok_or(FaultlineError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings read by the error translator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Log the full cause chain of domain errors in addition to the summary line.
    pub print_stack_trace: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            print_stack_trace: true,
        }
    }
}

impl TranslatorConfig {
    /// Load from a config service. An unparsable value keeps the default
    /// and is reported through the log.
    pub fn from_config(config: &ConfigService) -> Self {
        let defaults = Self::default();
        let print_stack_trace = config
            .get_bool(PRINT_STACK_TRACE_KEY, defaults.print_stack_trace)
            .unwrap_or_else(|e| {
                tracing::warn!("{}; using default", e);
                defaults.print_stack_trace
            });

        Self { print_stack_trace }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_stack_trace_defaults_to_true() {
        let config = ConfigService::default();
        assert!(TranslatorConfig::from_config(&config).print_stack_trace);
    }

    #[test]
    fn test_print_stack_trace_parses_false_values() {
        for raw in ["false", "0", "no", " OFF "] {
            let config = ConfigService::default();
            config.set(PRINT_STACK_TRACE_KEY, raw);
            assert!(!TranslatorConfig::from_config(&config).print_stack_trace, "{raw}");
        }
    }

    #[test]
    fn test_invalid_value_keeps_default() {
        let config = ConfigService::default();
        config.set(PRINT_STACK_TRACE_KEY, "sometimes");
        assert!(config.get_bool(PRINT_STACK_TRACE_KEY, true).is_err());
        assert!(TranslatorConfig::from_config(&config).print_stack_trace);
    }

    #[test]
    fn test_deserialize_with_missing_field() {
        let config: TranslatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TranslatorConfig::default());

        let config: TranslatorConfig =
            serde_json::from_str(r#"{"print_stack_trace": false}"#).unwrap();
        assert!(!config.print_stack_trace);
    }
}

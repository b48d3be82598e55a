//! Environment-driven configuration.

use std::time::Duration;

use crate::api::anthropic::{AnthropicClient, AnthropicModel, ANTHROPIC_VERSION};
use crate::client::ClientError;
use crate::options::{ModelOptions, TransportOptions};
use crate::providers::anthropic::ANTHROPIC_BASE_URL;

pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Settings for talking to the model endpoint.
///
/// | Variable                 | Default                          |
/// |--------------------------|----------------------------------|
/// | `ANTHROPIC_API_KEY`      | required                         |
/// | `ANTHROPIC_BASE_URL`     | `https://api.anthropic.com/v1`   |
/// | `ANTHROPIC_MODEL`        | `claude-3-5-haiku-latest`        |
/// | `ANTHROPIC_VERSION`      | `2023-06-01`                     |
/// | `ANTHROPIC_MAX_TOKENS`   | `1024`                           |
/// | `ANTHROPIC_TIMEOUT_SECS` | none                             |
/// | `AGENT_MAX_ITERATIONS`   | none (uncapped)                  |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub api_version: String,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
    pub max_iterations: Option<usize>,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("ANTHROPIC_API_KEY")
            .ok_or_else(|| ClientError::Config("ANTHROPIC_API_KEY must be set".to_string()))?;

        Ok(Self {
            api_key,
            base_url: get("ANTHROPIC_BASE_URL").unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
            model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_version: get("ANTHROPIC_VERSION").unwrap_or_else(|| ANTHROPIC_VERSION.to_string()),
            max_tokens: parse(&get, "ANTHROPIC_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: parse(&get, "ANTHROPIC_TIMEOUT_SECS")?.map(Duration::from_secs),
            max_iterations: parse(&get, "AGENT_MAX_ITERATIONS")?,
        })
    }

    /// Build a client from these settings.
    pub fn client(&self) -> AnthropicClient {
        let model_options =
            ModelOptions::<AnthropicModel>::new(&self.model).with_max_tokens(self.max_tokens);
        let mut transport_options = TransportOptions::new();
        if let Some(timeout) = self.timeout {
            transport_options = transport_options.with_timeout(timeout);
        }

        AnthropicClient::new(
            self.api_key.clone(),
            self.base_url.clone(),
            model_options,
            transport_options,
        )
        .with_api_version(&self.api_version)
    }
}

fn parse<T, G>(get: &G, key: &str) -> Result<Option<T>, ClientError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ClientError::Config(format!("{} is invalid: {}", key, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, ANTHROPIC_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_version, ANTHROPIC_VERSION);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_MODEL", "claude-test"),
            ("ANTHROPIC_TIMEOUT_SECS", "30"),
            ("AGENT_MAX_ITERATIONS", "8"),
        ]))
        .unwrap();

        assert_eq!(config.model, "claude-test");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_iterations, Some(8));
        assert_eq!(config.client().model_options().model, "claude-test");
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("AGENT_MAX_ITERATIONS", "many"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("AGENT_MAX_ITERATIONS"));
    }
}

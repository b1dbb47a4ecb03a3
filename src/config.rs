use crate::types::GenerationSettings;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Model configuration
    pub model_path: String,
    pub tokenizer_path: String,
    pub device: DeviceConfig,
    pub stub_mode: bool,
    pub seed: Option<u64>,
    pub eos_token: Option<String>,

    // Generation defaults and limits
    pub default_settings: GenerationSettings,
    pub prompt_token_budget: usize,
    pub generation_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceConfig {
    Auto,
    Cpu,
    Cuda(usize),
    Metal,
}

impl FromStr for DeviceConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(DeviceConfig::Auto),
            "cpu" => Ok(DeviceConfig::Cpu),
            "metal" => Ok(DeviceConfig::Metal),
            "cuda" => Ok(DeviceConfig::Cuda(0)),
            other => match other.strip_prefix("cuda:") {
                Some(idx) => Ok(DeviceConfig::Cuda(
                    idx.parse().with_context(|| format!("invalid CUDA ordinal '{}'", idx))?,
                )),
                None => anyhow::bail!("unknown device '{}'", s),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            model_path: "models/model.gguf".to_string(),
            tokenizer_path: "models/tokenizer.json".to_string(),
            device: DeviceConfig::Auto,
            stub_mode: false,
            seed: None,
            eos_token: None,
            default_settings: GenerationSettings::default(),
            prompt_token_budget: 2048,
            generation_timeout: Some(Duration::from_secs(300)),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let default_settings = GenerationSettings {
            max_new_tokens: parse_or(&lookup, "DEFAULT_MAX_NEW_TOKENS", defaults.default_settings.max_new_tokens)?,
            temperature: parse_or(&lookup, "DEFAULT_TEMPERATURE", defaults.default_settings.temperature)?,
        };
        default_settings
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid default generation settings: {}", e))?;

        let timeout_secs: u64 = parse_or(&lookup, "GENERATION_TIMEOUT_SECS", 300)?;

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,

            model_path: lookup("MODEL_PATH").unwrap_or(defaults.model_path),
            tokenizer_path: lookup("TOKENIZER_PATH").unwrap_or(defaults.tokenizer_path),
            device: match lookup("DEVICE") {
                Some(d) => d.parse()?,
                None => DeviceConfig::Auto,
            },
            stub_mode: lookup("STUB_MODE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
            seed: match lookup("SEED") {
                Some(v) => Some(v.parse().with_context(|| format!("invalid SEED '{}'", v))?),
                None => None,
            },
            eos_token: lookup("EOS_TOKEN").filter(|t| !t.is_empty()),

            default_settings,
            prompt_token_budget: parse_or(&lookup, "PROMPT_TOKEN_BUDGET", defaults.prompt_token_budget)?,
            generation_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_settings.max_new_tokens, 200);
        assert_eq!(config.default_settings.temperature, 0.5);
        assert_eq!(config.device, DeviceConfig::Auto);
        assert_eq!(config.generation_timeout, Some(Duration::from_secs(300)));
        assert!(!config.stub_mode);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DEVICE", "cuda:1"),
            ("STUB_MODE", "true"),
            ("GENERATION_TIMEOUT_SECS", "0"),
            ("SEED", "7"),
            ("DEFAULT_MAX_NEW_TOKENS", "400"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.device, DeviceConfig::Cuda(1));
        assert!(config.stub_mode);
        assert_eq!(config.generation_timeout, None);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_settings.max_new_tokens, 400);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DEVICE", "tpu")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DEFAULT_TEMPERATURE", "3.0")])).is_err());
    }
}

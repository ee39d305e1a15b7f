use anyhow::Context;
use serde::Deserialize;
use std::{
    collections::HashMap,
    path::Path,
};
use url::Url;

/// The CLI config
#[derive(Deserialize, Debug, Default)]
pub struct Config {
    /// The site to search, if not the public one
    pub base_url: Option<Url>,

    /// A custom user agent
    pub user_agent: Option<String>,

    #[serde(flatten)]
    extra: HashMap<String, toml::Value>,
}

impl Config {
    /// Load a config from a path
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        std::fs::read(path)
            .with_context(|| format!("failed to read config from '{}'", path.display()))
            .and_then(|bytes| Self::load_from_bytes(&bytes))
    }

    /// Load a config from bytes
    pub fn load_from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes).context("config is not utf8")?;
        toml::from_str(text).context("failed to parse config")
    }

    /// Validate a config
    pub fn validate(&self) -> Vec<ValidationMessage> {
        let mut errors = Vec::new();

        if let Some(base_url) = self.base_url.as_ref() {
            if !matches!(base_url.scheme(), "http" | "https") {
                errors.push(ValidationMessage {
                    severity: Severity::Error,
                    error: ValidationError::InvalidBaseUrlScheme(base_url.scheme().to_string()),
                });
            }
        }

        if let Some(user_agent) = self.user_agent.as_deref() {
            if user_agent.trim().is_empty() {
                errors.push(ValidationMessage {
                    severity: Severity::Error,
                    error: ValidationError::EmptyUserAgent,
                });
            }
        }

        for key in self.extra.keys() {
            errors.push(ValidationMessage {
                severity: Severity::Warn,
                error: ValidationError::UnknownKey(key.clone()),
            });
        }

        errors
    }
}

#[derive(Debug)]
pub struct ValidationMessage {
    severity: Severity,
    error: ValidationError,
}

impl ValidationMessage {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn error(&self) -> &ValidationError {
        &self.error
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("base url scheme '{0}' is not http or https")]
    InvalidBaseUrlScheme(String),

    #[error("user agent is empty")]
    EmptyUserAgent,

    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

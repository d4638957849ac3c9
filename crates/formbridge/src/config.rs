// File: src/config.rs
// Purpose: Configuration parsing from formbridge.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::token::TokenSecret;

/// Target client library whose mapping tables drive conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLibrary {
    #[default]
    Jquery,
    Html5,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormbridgeConfig {
    /// Which client library's mapping tables to use
    #[serde(default)]
    pub target_library: TargetLibrary,

    /// Emit server-authoritative messages alongside rule directives
    #[serde(default = "default_true")]
    pub use_server_messages: bool,

    /// URL prefix the remote validation endpoint is mounted under
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Secret for signing remote-validation parameter tokens. Override
    /// in production; the default is only good for local development.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
}

// Default values
fn default_route_prefix() -> String {
    "/formbridge".to_string()
}

fn default_token_secret() -> String {
    "formbridge-dev-secret".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FormbridgeConfig {
    fn default() -> Self {
        Self {
            target_library: TargetLibrary::default(),
            use_server_messages: true,
            route_prefix: default_route_prefix(),
            token_secret: default_token_secret(),
        }
    }
}

impl FormbridgeConfig {
    /// Load configuration from a TOML file. A missing or empty file
    /// yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: FormbridgeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from the default path (./formbridge.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("formbridge.toml")
    }

    pub fn secret(&self) -> TokenSecret {
        TokenSecret::new(self.token_secret.as_bytes().to_vec())
    }

    /// True when the signing secret is still the development default.
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == default_token_secret()
    }
}

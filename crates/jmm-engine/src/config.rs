//! Compiler configuration (jmm.toml)
//!
//! Every key is optional; a missing file section falls back to its default.
//!
//! ```toml
//! [check]
//! continue_on_error = false
//!
//! [codegen]
//! increment_fusion = true
//! emit_ollir = true
//! emit_jasmin = true
//!
//! [output]
//! dir = "out"
//! diagnostics_format = "text"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Full compiler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompilerConfig {
    pub check: CheckConfig,
    pub codegen: CodegenConfig,
    pub output: OutputConfig,
}

/// Semantic analysis settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckConfig {
    /// Lower and emit even when the checker reported errors
    pub continue_on_error: bool,
}

/// Code generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodegenConfig {
    /// Rewrite `x := x + k` into `iinc`
    pub increment_fusion: bool,
    pub emit_ollir: bool,
    pub emit_jasmin: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            increment_fusion: true,
            emit_ollir: true,
            emit_jasmin: true,
        }
    }
}

/// How diagnostics are reported
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsFormat {
    #[default]
    Text,
    Json,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for `.ollir` and `.j` files (defaults to the input's directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    pub diagnostics_format: DiagnosticsFormat,
}

impl CompilerConfig {
    /// Parse a configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.codegen.emit_ollir && !self.codegen.emit_jasmin {
            tracing::warn!("both emit_ollir and emit_jasmin are disabled; only checking will run");
        }
        if let Some(dir) = &self.output.dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "output.dir cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

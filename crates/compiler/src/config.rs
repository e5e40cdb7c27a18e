//! Compiler configuration
//!
//! Diagnostic switches and pass selection for the Tacit passes. Configurations
//! are built in code with the builder methods or loaded from a TOML file:
//!
//! ```toml
//! show_point_free_conversion = true
//! verbose_inference = false
//! show_inferred_type = true
//! partial_evaluation = true
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tacitc::{CompilerConfig, optimize_program};
//!
//! let config = CompilerConfig::new()
//!     .with_point_free_output(true)
//!     .with_partial_evaluation(false);
//!
//! optimize_program(&mut program, &interpreter, &config)?;
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Error loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the Tacit compiler passes
///
/// Diagnostics are reported through `tracing`; the flags only decide whether
/// the events are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Log every definition after point-free conversion
    pub show_point_free_conversion: bool,

    /// Log each binding dereference during unification
    pub verbose_inference: bool,

    /// Log the normalized kind produced by each unification
    pub show_inferred_type: bool,

    /// Run the folding pass after conversion
    pub partial_evaluation: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            show_point_free_conversion: false,
            verbose_inference: false,
            show_inferred_type: false,
            partial_evaluation: true,
        }
    }
}

impl CompilerConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        CompilerConfig::default()
    }

    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Log converted definitions (builder pattern)
    pub fn with_point_free_output(mut self, enabled: bool) -> Self {
        self.show_point_free_conversion = enabled;
        self
    }

    /// Log unifier dereferences (builder pattern)
    pub fn with_verbose_inference(mut self, enabled: bool) -> Self {
        self.verbose_inference = enabled;
        self
    }

    /// Log normalized kinds (builder pattern)
    pub fn with_inferred_types(mut self, enabled: bool) -> Self {
        self.show_inferred_type = enabled;
        self
    }

    /// Enable or disable the folding pass (builder pattern)
    pub fn with_partial_evaluation(mut self, enabled: bool) -> Self {
        self.partial_evaluation = enabled;
        self
    }
}

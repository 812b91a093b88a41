//! Configuration loading for rebfmt.
//!
//! `defaults/rebfmt.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. Callers layer user files and command-line overrides on top of
//! those defaults via [`Loader`] before deserializing into [`FmtConfig`].

use crate::dialect::Dialect;
use crate::formatter::{FormatOptions, IndentStyle};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/rebfmt.default.toml");

/// File name picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "rebfmt.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FmtConfig {
    pub formatting: FormattingConfig,
    pub dialects: DialectsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub indent: IndentStyle,
}

/// Which dialect applies to which files.
#[derive(Debug, Clone, Deserialize)]
pub struct DialectsConfig {
    pub default: Dialect,
    pub model_extensions: Vec<String>,
    pub property_extensions: Vec<String>,
}

impl DialectsConfig {
    /// Pick the dialect for a path from its extension, falling back to the default.
    pub fn for_path(&self, path: &Path) -> Dialect {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return self.default;
        };
        let matches = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(ext));
        if matches(&self.property_extensions) {
            Dialect::Property
        } else if matches(&self.model_extensions) {
            Dialect::Model
        } else {
            self.default
        }
    }
}

impl FmtConfig {
    /// Formatting options for one input; `None` means stdin.
    pub fn options_for(&self, path: Option<&Path>) -> FormatOptions {
        let dialect = match path {
            Some(path) => self.dialects.for_path(path),
            None => self.dialects.default,
        };
        FormatOptions {
            dialect,
            indent: self.formatting.indent.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FmtConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FmtConfig, ConfigError> {
    Loader::new().build()
}

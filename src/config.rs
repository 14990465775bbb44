//! Compiler configuration loaded from JSON.
//!
//! ```json
//! {
//!     "fileName": "app.js",
//!     "blockBinding": false,
//!     "runtimeName": "$runtime",
//!     "globals": ["console", "window"],
//!     "log": { "filter": "lowerjs_lowering=debug", "format": "tree" }
//! }
//! ```

use crate::tracing_config::LogSettings;
use anyhow::{Context, Result, bail};
use lowerjs_common::LoweringOptions;
use lowerjs_common::options::DEFAULT_RUNTIME_NAME;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// File name used for diagnostics when the config does not name one.
pub const DEFAULT_FILE_NAME: &str = "input.js";

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles configs that contain `"blockBinding": "true"` instead of `true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// The config file as written. Every field is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub block_binding: Option<bool>,
    #[serde(default)]
    pub runtime_name: Option<String>,
    /// Extra ambient names on top of the ES5 globals
    #[serde(default)]
    pub globals: Option<Vec<String>>,
    #[serde(default)]
    pub log: Option<LogSettings>,
}

/// Resolved configuration for one compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub file_name: String,
    pub lowering: LoweringOptions,
    pub globals: Vec<String>,
    pub log: LogSettings,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            file_name: DEFAULT_FILE_NAME.to_string(),
            lowering: LoweringOptions::default(),
            globals: Vec::new(),
            log: LogSettings::default(),
        }
    }
}

impl CompilerConfig {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_lowering(mut self, lowering: LoweringOptions) -> Self {
        self.lowering = lowering;
        self
    }

    pub fn with_globals<I, S>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globals = globals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_log(mut self, log: LogSettings) -> Self {
        self.log = log;
        self
    }
}

impl ConfigFile {
    /// Apply defaults and validate.
    pub fn resolve(self) -> Result<CompilerConfig> {
        let runtime_name = self
            .runtime_name
            .unwrap_or_else(|| DEFAULT_RUNTIME_NAME.to_string());
        if !is_identifier(&runtime_name) {
            bail!("runtimeName '{runtime_name}' is not a valid identifier");
        }

        let globals = self.globals.unwrap_or_default();
        if let Some(bad) = globals.iter().find(|name| !is_identifier(name)) {
            bail!("global '{bad}' is not a valid identifier");
        }

        Ok(CompilerConfig {
            file_name: self
                .file_name
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            lowering: LoweringOptions {
                block_binding: self.block_binding.unwrap_or(false),
                runtime_name,
            },
            globals,
            log: self.log.unwrap_or_default(),
        })
    }
}

/// ASCII identifier check: `[A-Za-z_$][A-Za-z0-9_$]*`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Parse and resolve a config from JSON text.
pub fn parse_config(source: &str) -> Result<CompilerConfig> {
    let file: ConfigFile =
        serde_json::from_str(source).context("failed to parse lowerjs config")?;
    file.resolve()
}

/// Read, parse and resolve a config file.
pub fn load_config(path: &Path) -> Result<CompilerConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config file {}", path.display()))
}

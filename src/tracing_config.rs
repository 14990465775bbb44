//! Log output for a compile.
//!
//! A [`Pipeline`](crate::Pipeline) whose [`LogSettings`] carry a filter runs
//! each compile under its own subscriber. The filter and format come from the
//! `"log"` section of the config file:
//!
//! ```json
//! { "log": { "filter": "lowerjs_lowering=trace", "format": "tree" } }
//! ```
//!
//! and can be overridden from the environment:
//!
//! ```bash
//! # Class push/pop and temp allocation as a tree
//! LOWERJS_LOG=lowerjs_lowering=trace LOWERJS_LOG_FORMAT=tree cargo test
//!
//! # Scope promotion in the checker, one JSON object per event
//! LOWERJS_LOG=lowerjs_checker=trace LOWERJS_LOG_FORMAT=json cargo test
//! ```
//!
//! Formats:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented output via `tracing-tree`, one level per span
//! - `json`: one JSON object per span/event

use serde::Deserialize;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "LOWERJS_LOG";
const LOG_FORMAT_VAR: &str = "LOWERJS_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Lenient parse for environment values; unknown values are
    /// [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Log filter and format for a compile. No filter means no compile-scoped
/// subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSettings {
    /// `RUST_LOG`-style directives: `debug`, `lowerjs_checker=trace`
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

impl LogSettings {
    /// `LOWERJS_LOG` and `LOWERJS_LOG_FORMAT` take precedence over the
    /// configured values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(LOG_VAR).ok(),
            std::env::var(LOG_FORMAT_VAR).ok(),
        )
    }

    pub fn with_overrides(mut self, filter: Option<String>, format: Option<String>) -> Self {
        if let Some(filter) = filter {
            self.filter = Some(filter);
        }
        if let Some(format) = format {
            self.format = LogFormat::parse(&format);
        }
        self
    }
}

/// Build a dispatcher writing to `writer`, or `None` when `settings` has no
/// filter.
pub fn build_dispatch<W>(settings: &LogSettings, writer: W) -> Option<Dispatch>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::builder().parse_lossy(settings.filter.as_deref()?);

    let dispatch = match settings.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(writer)
                .with_ansi(false)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Dispatch::new(Registry::default().with(filter).with(tree_layer))
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(writer);
            Dispatch::new(Registry::default().with(filter).with(json_layer))
        }
        LogFormat::Text => Dispatch::new(
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .finish(),
        ),
    };
    Some(dispatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }

    #[test]
    fn overrides_replace_configured_values() {
        let configured = LogSettings {
            filter: Some("info".to_string()),
            format: LogFormat::Json,
        };

        let unchanged = configured.clone().with_overrides(None, None);
        assert_eq!(unchanged, configured);

        let overridden = configured.with_overrides(
            Some("lowerjs_checker=trace".to_string()),
            Some("tree".to_string()),
        );
        assert_eq!(overridden.filter.as_deref(), Some("lowerjs_checker=trace"));
        assert_eq!(overridden.format, LogFormat::Tree);
    }

    #[test]
    fn no_filter_builds_no_dispatch() {
        assert!(build_dispatch(&LogSettings::default(), std::io::sink).is_none());

        let settings = LogSettings {
            filter: Some("debug".to_string()),
            format: LogFormat::Tree,
        };
        assert!(build_dispatch(&settings, std::io::sink).is_some());
    }
}

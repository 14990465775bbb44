//! lowerjs: class lowering and free-variable checking for a JavaScript
//! down-level compiler.
//!
//! The passes live in the member crates; this crate wires them into a
//! [`Pipeline`] driven by a [`CompilerConfig`].

pub use lowerjs_ast as ast;
pub use lowerjs_checker as checker;
pub use lowerjs_common as common;
pub use lowerjs_lowering as lowering;

// JSON configuration
pub mod config;
pub use config::{CompilerConfig, ConfigFile, load_config, parse_config};

// Class lowering -> extra passes -> free-variable check
pub mod pipeline;
pub use pipeline::{CompileOutput, Pipeline};

// Compile-scoped log output (config "log" section, LOWERJS_LOG overrides)
pub mod tracing_config;
pub use tracing_config::{LogFormat, LogSettings};

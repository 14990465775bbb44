//! Common types and utilities for the lowerjs compiler passes.
//!
//! This crate provides foundational types used across all lowerjs crates:
//! - Position/Range types for source locations (`Position`, `SourceRange`)
//! - Diagnostics, the message table and the error sink (`DiagnosticBag`)
//! - The internal (compiler-bug) error type shared by every pass
//! - Lowering feature options

// Position/Range types for line/column source locations
pub mod position;
pub use position::{Position, SourceRange};

// User-facing diagnostics and the accumulating error sink
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticBag, DiagnosticCategory, DiagnosticMessage, ErrorReporter,
    format_message,
};

// Internal invariant violations
pub mod errors;
pub use errors::InternalError;

// Read-only feature configuration consumed by the passes
pub mod options;
pub use options::LoweringOptions;

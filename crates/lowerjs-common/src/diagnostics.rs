//! Diagnostic types, the message table and the accumulating error sink.
//!
//! Passes never abort on a user-facing problem: they hand a location, a
//! message template and its substitution values to an [`ErrorReporter`] and
//! keep going, so a single compile can report every unresolved name at once.

use crate::position::SourceRange;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    pub const fn name(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A user-facing diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    /// `None` only for diagnostics raised against synthesized code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        range: Option<SourceRange>,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            range,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    /// Renders as `file(3:7): error LJS5001: x is not defined`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{}({}): ", self.file, range)?,
            None => write!(f, "{}: ", self.file)?,
        }
        write!(
            f,
            "{} LJS{}: {}",
            self.category.name(),
            self.code,
            self.message_text
        )
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Message table
// =============================================================================

pub mod diagnostic_codes {
    pub const NAME_IS_NOT_DEFINED: u32 = 5001;
    pub const SUPER_CALL_OUTSIDE_CONSTRUCTOR: u32 = 5002;
    pub const SUPER_OUTSIDE_CLASS_MEMBER: u32 = 5003;
    pub const SUPER_MUST_BE_CALLED_OR_ACCESSED: u32 = 5004;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const NAME_IS_NOT_DEFINED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::NAME_IS_NOT_DEFINED,
        category: DiagnosticCategory::Error,
        message: "{0} is not defined",
    };

    pub const SUPER_CALL_OUTSIDE_CONSTRUCTOR: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SUPER_CALL_OUTSIDE_CONSTRUCTOR,
        category: DiagnosticCategory::Error,
        message: "'super' call is only valid inside a class constructor",
    };

    pub const SUPER_OUTSIDE_CLASS_MEMBER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SUPER_OUTSIDE_CLASS_MEMBER,
        category: DiagnosticCategory::Error,
        message: "'super' is only valid inside a class member",
    };

    pub const SUPER_MUST_BE_CALLED_OR_ACCESSED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::SUPER_MUST_BE_CALLED_OR_ACCESSED,
        category: DiagnosticCategory::Error,
        message: "'super' must be followed by an argument list or member access",
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::NAME_IS_NOT_DEFINED,
    diagnostic_messages::SUPER_CALL_OUTSIDE_CONSTRUCTOR,
    diagnostic_messages::SUPER_OUTSIDE_CLASS_MEMBER,
    diagnostic_messages::SUPER_MUST_BE_CALLED_OR_ACCESSED,
];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

// =============================================================================
// Error sink
// =============================================================================

/// Receives user-facing diagnostics from a pass.
pub trait ErrorReporter {
    fn report(&mut self, range: Option<SourceRange>, message: &DiagnosticMessage, args: &[&str]);
}

/// A collection of diagnostics for one compile unit.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    /// File name stamped on every reported diagnostic
    default_file: String,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn with_file(file_name: impl Into<String>) -> Self {
        DiagnosticBag {
            default_file: file_name.into(),
            ..DiagnosticBag::default()
        }
    }

    pub fn default_file(&self) -> &str {
        &self.default_file
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorReporter for DiagnosticBag {
    fn report(&mut self, range: Option<SourceRange>, message: &DiagnosticMessage, args: &[&str]) {
        let diagnostic = Diagnostic {
            file: self.default_file.clone(),
            range,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
        };
        self.add(diagnostic);
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;

//! Internal invariant violations.
//!
//! An `InternalError` means a bug in this pass or in an earlier one. It aborts
//! the pass that raised it and is never turned into a user diagnostic.

use crate::position::SourceRange;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// A class body contained a member kind the class lowering cannot handle.
    UnexpectedClassMember {
        kind: &'static str,
        range: Option<SourceRange>,
    },
    /// A node index that does not exist in the arena.
    MissingNode { index: u32 },
    /// A node of the wrong kind where a specific kind is required.
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },
    /// The class-context stack was popped while empty.
    UnbalancedClassContext,
    /// A scope was popped that is not the innermost one.
    ScopeMismatch { expected: u32, actual: u32 },
    /// A declaration or reference was recorded with no scope pushed.
    NoActiveScope,
    /// An identifier introduced by a lowering pass reached the root scope unbound.
    UnboundSyntheticIdentifier { name: String },
    /// A `let`/`const` declaration survived to the free-variable check.
    BlockScopedDeclaration {
        kind: &'static str,
        range: Option<SourceRange>,
    },
    /// A class node survived to the free-variable check.
    UnloweredClass { range: Option<SourceRange> },
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalError::UnexpectedClassMember { kind, range } => {
                write!(f, "unexpected class member kind `{kind}`")?;
                write_range(f, *range)
            }
            InternalError::MissingNode { index } => {
                write!(f, "node #{index} is not in the arena")
            }
            InternalError::UnexpectedNode { expected, found } => {
                write!(f, "expected {expected} node, found {found}")
            }
            InternalError::UnbalancedClassContext => {
                write!(f, "class context stack popped while empty")
            }
            InternalError::ScopeMismatch { expected, actual } => write!(
                f,
                "scope push/pop mismatch: popping scope #{expected} but #{actual} is innermost"
            ),
            InternalError::NoActiveScope => write!(f, "no active scope"),
            InternalError::UnboundSyntheticIdentifier { name } => {
                write!(f, "synthesized identifier `{name}` is not bound")
            }
            InternalError::BlockScopedDeclaration { kind, range } => {
                write!(f, "`{kind}` declaration was not lowered")?;
                write_range(f, *range)
            }
            InternalError::UnloweredClass { range } => {
                write!(f, "class was not lowered")?;
                write_range(f, *range)
            }
        }
    }
}

fn write_range(f: &mut fmt::Formatter<'_>, range: Option<SourceRange>) -> fmt::Result {
    match range {
        Some(range) => write!(f, " at {range}"),
        None => Ok(()),
    }
}

impl std::error::Error for InternalError {}

//! Free-variable checking for lowered programs.
//!
//! Runs after every lowering pass: the tree may only contain plain functions,
//! object literals and `var` declarations. Every identifier reference must
//! resolve to a declaration in an enclosing scope or in the ambient (global)
//! environment.

pub mod globals;
pub use globals::DEFAULT_GLOBALS;

pub mod scope;
pub use scope::{Scope, ScopeArena, ScopeId, ScopeKind, UnresolvedReference};

pub mod free_variables;
pub use free_variables::FreeVariableChecker;

//! Lexical scopes for the free-variable check.
//!
//! Scopes live in a [`ScopeArena`] and link to their parent by [`ScopeId`].
//! Push/pop is strictly nested; popping anything but the innermost scope is
//! an internal error.

use lowerjs_common::{InternalError, SourceRange};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Program root, seeded with the ambient names
    Root,
    /// Function, arrow or method
    Function,
    /// Getter or setter
    Accessor,
    /// `catch (e) { ... }`
    Catch,
}

impl ScopeKind {
    /// Scopes that receive `var` and hoisted function declarations.
    pub const fn is_function_boundary(self) -> bool {
        !matches!(self, ScopeKind::Catch)
    }
}

/// Name to first-seen location. `None` marks a synthesized node.
type NameMap = FxHashMap<String, Option<SourceRange>>;

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    declarations: NameMap,
    /// References not yet matched against a declaration
    references: NameMap,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            declarations: FxHashMap::default(),
            references: FxHashMap::default(),
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// First-seen location of a pending reference to `name`.
    pub fn pending_reference(&self, name: &str) -> Option<Option<SourceRange>> {
        self.references.get(name).copied()
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }
}

/// A reference that reached the root scope without a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub name: String,
    pub loc: Option<SourceRange>,
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    current: Option<ScopeId>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ScopeId> {
        self.current
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Open a scope nested in the current one.
    pub fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, self.current));
        self.current = Some(id);
        trace!(scope = id.0, ?kind, "push scope");
        id
    }

    fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope, InternalError> {
        self.scopes
            .get_mut(id.0 as usize)
            .ok_or(InternalError::ScopeMismatch {
                expected: id.0,
                actual: self.current.map_or(u32::MAX, |c| c.0),
            })
    }

    fn current_id(&self) -> Result<ScopeId, InternalError> {
        self.current.ok_or(InternalError::NoActiveScope)
    }

    /// Declare `name` in the current scope. The first location wins.
    pub fn declare(&mut self, name: &str, loc: Option<SourceRange>) -> Result<(), InternalError> {
        let id = self.current_id()?;
        declare_in(self.scope_mut(id)?, name, loc);
        Ok(())
    }

    /// Declare `name` in the nearest enclosing function (or root) scope, where
    /// `var` and function declarations live.
    pub fn declare_var(&mut self, name: &str, loc: Option<SourceRange>) -> Result<(), InternalError> {
        let mut id = self.current_id()?;
        loop {
            let scope = self.scope_mut(id)?;
            match scope.parent {
                Some(parent) if !scope.kind.is_function_boundary() => id = parent,
                _ => {
                    declare_in(scope, name, loc);
                    return Ok(());
                }
            }
        }
    }

    /// Record a reference in the current scope unless one is already pending.
    pub fn reference(&mut self, name: &str, loc: Option<SourceRange>) -> Result<(), InternalError> {
        let id = self.current_id()?;
        let scope = self.scope_mut(id)?;
        if !scope.references.contains_key(name) {
            scope.references.insert(name.to_string(), loc);
        }
        Ok(())
    }

    /// Close `expected`, which must be the innermost scope.
    ///
    /// References it does not declare move to the parent, unless the parent
    /// already has one pending for that name. Popping the root returns its
    /// unresolved references instead.
    pub fn pop(&mut self, expected: ScopeId) -> Result<Vec<UnresolvedReference>, InternalError> {
        let actual = self.current_id()?;
        if actual != expected {
            return Err(InternalError::ScopeMismatch {
                expected: expected.0,
                actual: actual.0,
            });
        }

        let scope = self.scope_mut(expected)?;
        let parent = scope.parent;
        let references = std::mem::take(&mut scope.references);
        let unresolved: Vec<UnresolvedReference> = references
            .into_iter()
            .filter(|(name, _)| !scope.declarations.contains_key(name))
            .map(|(name, loc)| UnresolvedReference { name, loc })
            .collect();
        self.current = parent;
        trace!(scope = expected.0, unresolved = unresolved.len(), "pop scope");

        let Some(parent) = parent else {
            return Ok(unresolved);
        };
        let parent_scope = self.scope_mut(parent)?;
        for reference in unresolved {
            if !parent_scope.references.contains_key(&reference.name) {
                trace!(name = %reference.name, scope = parent.0, "promote reference");
                parent_scope.references.insert(reference.name, reference.loc);
            }
        }
        Ok(Vec::new())
    }
}

fn declare_in(scope: &mut Scope, name: &str, loc: Option<SourceRange>) {
    if !scope.declarations.contains_key(name) {
        scope.declarations.insert(name.to_string(), loc);
    }
}

#[cfg(test)]
#[path = "../tests/scope.rs"]
mod tests;

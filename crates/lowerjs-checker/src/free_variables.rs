//! Free-variable checker.
//!
//! | Construct | Declares in its own scope | Declares in the enclosing scope |
//! |---|---|---|
//! | program | ambient names | |
//! | function declaration | own name, `arguments`, parameters | own name (hoisted) |
//! | function expression | own name if named, `arguments`, parameters | |
//! | arrow, method | `arguments`, parameters | |
//! | getter | | |
//! | setter | its parameter | |
//! | catch clause | the caught binding | |
//!
//! Blocks do not open a scope. `var` declarations go to the nearest function
//! scope. Unresolved references are reported once per name, at the first
//! reference, in source order.

use crate::scope::{ScopeArena, ScopeId, ScopeKind, UnresolvedReference};
use lowerjs_ast::{NodeArena, NodeData, NodeIndex, for_each_child};
use lowerjs_common::diagnostics::diagnostic_messages;
use lowerjs_common::{ErrorReporter, InternalError};
use tracing::debug;

pub struct FreeVariableChecker {
    ambient: Vec<String>,
    scopes: ScopeArena,
}

impl FreeVariableChecker {
    /// A checker whose root scope declares every name in `ambient`.
    pub fn new<I, S>(ambient: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FreeVariableChecker {
            ambient: ambient.into_iter().map(Into::into).collect(),
            scopes: ScopeArena::new(),
        }
    }

    pub fn with_default_globals() -> Self {
        Self::new(crate::globals::DEFAULT_GLOBALS.iter().copied())
    }

    /// Check `program`, reporting each unresolved name to `reporter`.
    ///
    /// Fails on a synthesized identifier that resolves nowhere, on a surviving
    /// `let`/`const` or class, and on unbalanced scopes.
    #[tracing::instrument(level = "debug", skip_all, fields(program = program.0))]
    pub fn check_program(
        &mut self,
        arena: &NodeArena,
        program: NodeIndex,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<(), InternalError> {
        self.scopes = ScopeArena::new();
        let root = self.scopes.push(ScopeKind::Root);
        for name in &self.ambient {
            self.scopes.declare(name, None)?;
        }

        self.visit(arena, program)?;

        let mut unresolved = self.scopes.pop(root)?;
        if let Some(synthetic) = unresolved
            .iter()
            .filter(|r| r.loc.is_none())
            .min_by(|a, b| a.name.cmp(&b.name))
        {
            return Err(InternalError::UnboundSyntheticIdentifier {
                name: synthetic.name.clone(),
            });
        }

        unresolved.sort_by_key(|r| r.loc);
        debug!(count = unresolved.len(), "unresolved references");
        for UnresolvedReference { name, loc } in &unresolved {
            reporter.report(*loc, &diagnostic_messages::NAME_IS_NOT_DEFINED, &[name.as_str()]);
        }
        Ok(())
    }

    // =========================================================================
    // Scope helpers
    // =========================================================================

    fn declare_binding(&mut self, arena: &NodeArena, binding: NodeIndex) -> Result<(), InternalError> {
        let name = arena.identifier_text(binding)?;
        self.scopes.declare(name, arena.loc(binding))
    }

    fn declare_var_binding(
        &mut self,
        arena: &NodeArena,
        binding: NodeIndex,
    ) -> Result<(), InternalError> {
        let name = arena.identifier_text(binding)?;
        self.scopes.declare_var(name, arena.loc(binding))
    }

    fn declare_parameters(
        &mut self,
        arena: &NodeArena,
        parameters: &[NodeIndex],
    ) -> Result<(), InternalError> {
        for &param in parameters {
            self.visit(arena, param)?;
        }
        Ok(())
    }

    /// Push a function scope, declare `own_name` and `arguments` and the
    /// parameters, visit the body, pop.
    fn visit_function(
        &mut self,
        arena: &NodeArena,
        own_name: Option<NodeIndex>,
        parameters: &[NodeIndex],
        body: NodeIndex,
    ) -> Result<(), InternalError> {
        let scope = self.scopes.push(ScopeKind::Function);
        if let Some(name) = own_name {
            self.declare_binding(arena, name)?;
        }
        self.scopes.declare("arguments", None)?;
        self.declare_parameters(arena, parameters)?;
        self.visit(arena, body)?;
        self.pop(scope)
    }

    fn pop(&mut self, scope: ScopeId) -> Result<(), InternalError> {
        let unresolved = self.scopes.pop(scope)?;
        debug_assert!(unresolved.is_empty(), "only the root scope reports");
        Ok(())
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Hoist function declarations, then visit each statement.
    fn visit_statements(
        &mut self,
        arena: &NodeArena,
        statements: &[NodeIndex],
    ) -> Result<(), InternalError> {
        for &stmt in statements {
            if let NodeData::FunctionDeclaration { name, .. } = &arena.node(stmt)?.data {
                self.declare_var_binding(arena, *name)?;
            }
        }
        for &stmt in statements {
            self.visit(arena, stmt)?;
        }
        Ok(())
    }

    fn visit(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<(), InternalError> {
        let node = arena.node(idx)?;
        match &node.data {
            NodeData::Program { statements } | NodeData::Block { statements } => {
                self.visit_statements(arena, statements)
            }
            NodeData::VariableStatement { kind, declarations } => {
                if kind.is_block_scoped() {
                    return Err(InternalError::BlockScopedDeclaration {
                        kind: kind.as_str(),
                        range: node.loc,
                    });
                }
                declarations
                    .iter()
                    .try_for_each(|&decl| self.visit(arena, decl))
            }
            NodeData::VariableDeclaration { name, initializer } => {
                self.declare_var_binding(arena, *name)?;
                match initializer {
                    Some(init) => self.visit(arena, *init),
                    None => Ok(()),
                }
            }
            NodeData::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                // Already hoisted when reached through a statement list.
                self.declare_var_binding(arena, *name)?;
                self.visit_function(arena, Some(*name), parameters, *body)
            }
            NodeData::FunctionExpression {
                name,
                parameters,
                body,
            } => self.visit_function(arena, *name, parameters, *body),
            NodeData::ArrowFunction { parameters, body }
            | NodeData::PropertyMethodAssignment {
                parameters, body, ..
            } => self.visit_function(arena, None, parameters, *body),
            NodeData::GetAccessor { body, .. } => {
                let scope = self.scopes.push(ScopeKind::Accessor);
                self.visit(arena, *body)?;
                self.pop(scope)
            }
            NodeData::SetAccessor {
                parameter, body, ..
            } => {
                let scope = self.scopes.push(ScopeKind::Accessor);
                self.visit(arena, *parameter)?;
                self.visit(arena, *body)?;
                self.pop(scope)
            }
            NodeData::CatchClause { binding, body } => {
                let scope = self.scopes.push(ScopeKind::Catch);
                self.declare_binding(arena, *binding)?;
                self.visit(arena, *body)?;
                self.pop(scope)
            }
            NodeData::FormalParameter {
                name, initializer, ..
            } => {
                self.declare_binding(arena, *name)?;
                match initializer {
                    Some(init) => self.visit(arena, *init),
                    None => Ok(()),
                }
            }
            NodeData::IdentifierExpression { name } => self.scopes.reference(name, node.loc),
            NodeData::ClassDeclaration { .. } | NodeData::ClassExpression { .. } => {
                Err(InternalError::UnloweredClass { range: node.loc })
            }
            // Declared by the parent construct.
            NodeData::BindingIdentifier { .. } => Ok(()),
            data => for_each_child(data, |child| self.visit(arena, child)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/free_variables.rs"]
mod tests;

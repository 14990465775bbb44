//! Class lowering.
//!
//! ```javascript
//! class B extends A {
//!     m() { return super.m(); }
//! }
//! ```
//!
//! Becomes:
//!
//! ```javascript
//! var B = $runtime.createClass({
//!     m: function () {
//!         return $runtime.superCall(this, B, "m", []);
//!     },
//!     constructor: function (...args) {
//!         $runtime.superCall(this, B, "constructor", [...args]);
//!     }
//! }, A, false, true);
//! ```
//!
//! Class expressions have no binding for `super` rewrites to refer to, so the
//! class is bound to a temporary when one of its members uses `super`:
//!
//! ```javascript
//! f(($__0 = $runtime.createClass({ ... }, A, false, true)));
//! ```

use crate::LoweringPass;
use crate::runtime::{Runtime, RuntimeHelper};
use crate::super_transformer::{MemberKind, SuperTransformer};
use crate::temp_vars::TempVarAllocator;
use lowerjs_ast::{NodeArena, NodeData, NodeIndex, PropertyName, Transformer, VarKind, walk_node};
use lowerjs_common::{ErrorReporter, InternalError, LoweringOptions};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Per-class state while its members are lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassContext {
    pub class_node: NodeIndex,
    /// Expression naming the class inside member bodies (its binding or a temp)
    pub name_expr: NodeIndex,
    /// Some member of this class (not of a nested class) used `super`
    pub has_super: bool,
}

pub struct ClassTransformer<'a> {
    options: &'a LoweringOptions,
    runtime: Runtime,
    reporter: &'a mut dyn ErrorReporter,
    class_stack: SmallVec<[ClassContext; 4]>,
    temp_vars: TempVarAllocator,
}

/// How `transform_any` handles a node.
enum Visit {
    ClassDeclaration,
    ClassExpression,
    /// Program or function-like node: owns a temp-var scope
    TempScope,
    Other,
}

impl<'a> ClassTransformer<'a> {
    pub fn new(options: &'a LoweringOptions, reporter: &'a mut dyn ErrorReporter) -> Self {
        ClassTransformer {
            options,
            runtime: Runtime::new(options.runtime_name.as_str()),
            reporter,
            class_stack: SmallVec::new(),
            temp_vars: TempVarAllocator::new(),
        }
    }

    /// Lower every class in `program`.
    #[tracing::instrument(level = "debug", skip_all, fields(program = program.0))]
    pub fn transform_program(
        &mut self,
        arena: &mut NodeArena,
        program: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let result = self.transform_any(arena, program)?;
        debug!(changed = result != program, "class lowering done");
        Ok(result)
    }

    /// Number of classes currently being lowered.
    pub fn class_depth(&self) -> usize {
        self.class_stack.len()
    }

    // =========================================================================
    // Class context stack
    // =========================================================================

    fn push_class(&mut self, class_node: NodeIndex, name_expr: NodeIndex) {
        self.class_stack.push(ClassContext {
            class_node,
            name_expr,
            has_super: false,
        });
        trace!(class = class_node.0, depth = self.class_stack.len(), "push class context");
    }

    fn pop_class(&mut self) -> Result<ClassContext, InternalError> {
        let context = self
            .class_stack
            .pop()
            .ok_or(InternalError::UnbalancedClassContext)?;
        trace!(
            class = context.class_node.0,
            has_super = context.has_super,
            depth = self.class_stack.len(),
            "pop class context"
        );
        Ok(context)
    }

    fn current_class(&mut self) -> Result<&mut ClassContext, InternalError> {
        self.class_stack
            .last_mut()
            .ok_or(InternalError::UnbalancedClassContext)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    fn transform_class_declaration(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let node = arena.node(idx)?.clone();
        let found = node.data.kind_name();
        let NodeData::ClassDeclaration { name, .. } = node.data else {
            return Err(InternalError::UnexpectedNode {
                expected: "ClassDeclaration",
                found,
            });
        };

        let class_name = arena.identifier_text(name)?.to_string();
        let name_expr = arena.id(class_name);
        let (call, _) = self.transform_class_shared(arena, idx, name_expr)?;

        let kind = if self.options.block_binding {
            VarKind::Let
        } else {
            VarKind::Var
        };
        let declaration = arena.add(
            NodeData::VariableDeclaration {
                name,
                initializer: Some(call),
            },
            node.loc,
        );
        Ok(arena.add(
            NodeData::VariableStatement {
                kind,
                declarations: vec![declaration],
            },
            node.loc,
        ))
    }

    fn transform_class_expression(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let loc = arena.loc(idx);
        let temp = self.temp_vars.add_temp_var();
        let name_expr = arena.id(temp.as_str());
        let (call, has_super) = self.transform_class_shared(arena, idx, name_expr)?;

        if !has_super {
            self.temp_vars.remove_temp_var(&temp);
            return Ok(call);
        }

        let target = arena.id(temp);
        let assignment = arena.assign(target, call);
        Ok(arena.add(NodeData::ParenExpression { expression: assignment }, loc))
    }

    /// Lower the class at `idx` into a `createClass` call. `name_expr` is the
    /// expression member bodies use to refer to the class. Returns the call
    /// and whether any member used `super`.
    fn transform_class_shared(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
        name_expr: NodeIndex,
    ) -> Result<(NodeIndex, bool), InternalError> {
        let node = arena.node(idx)?.clone();
        let (super_class, members) = match node.data {
            NodeData::ClassDeclaration {
                super_class,
                members,
                ..
            }
            | NodeData::ClassExpression {
                super_class,
                members,
                ..
            } => (super_class, members),
            other => {
                return Err(InternalError::UnexpectedNode {
                    expected: "class",
                    found: other.kind_name(),
                });
            }
        };

        // The heritage clause belongs to the enclosing context.
        let super_class = super_class
            .map(|expr| self.transform_any(arena, expr))
            .transpose()?;

        self.push_class(idx, name_expr);
        let lowered = self.transform_members(arena, &members, super_class.is_some());
        let context = self.pop_class()?;
        let (properties, has_constructor) = lowered?;

        let members_object = arena.object(properties);
        let super_arg = match super_class {
            Some(expr) => expr,
            None => arena.null(),
        };
        let has_constructor_arg = arena.boolean(has_constructor);
        let has_extends_arg = arena.boolean(super_class.is_some());
        let callee = self.runtime.helper(arena, RuntimeHelper::CreateClass);
        let call = arena.add(
            NodeData::CallExpression {
                callee,
                arguments: vec![members_object, super_arg, has_constructor_arg, has_extends_arg],
            },
            node.loc,
        );

        debug!(
            class = idx.0,
            has_constructor,
            has_extends = super_class.is_some(),
            has_super = context.has_super,
            "lowered class"
        );
        Ok((call, context.has_super))
    }

    /// Lower the members of the innermost class. Returns the member object
    /// properties and whether the class declared its own constructor.
    fn transform_members(
        &mut self,
        arena: &mut NodeArena,
        members: &[NodeIndex],
        has_extends: bool,
    ) -> Result<(Vec<NodeIndex>, bool), InternalError> {
        let mut properties = Vec::with_capacity(members.len() + 1);
        let mut has_constructor = false;

        for &member in members {
            let member_node = arena.node(member)?;
            let kind = match &member_node.data {
                NodeData::PropertyMethodAssignment { name, .. } if name.is_constructor() => {
                    MemberKind::Constructor
                }
                NodeData::PropertyMethodAssignment { .. } => MemberKind::Method,
                NodeData::GetAccessor { .. } | NodeData::SetAccessor { .. } => MemberKind::Accessor,
                other => {
                    return Err(InternalError::UnexpectedClassMember {
                        kind: other.kind_name(),
                        range: member_node.loc,
                    });
                }
            };
            let lowered = match kind {
                MemberKind::Constructor => {
                    has_constructor = true;
                    self.transform_constructor(arena, member)?
                }
                kind => self.transform_method(arena, member, kind)?,
            };
            properties.push(lowered);
        }

        if !has_constructor {
            let constructor = self.default_constructor(arena, has_extends);
            properties.push(self.transform_constructor(arena, constructor)?);
        }

        Ok((properties, has_constructor))
    }

    /// Rewrite `super` in one member, then lower whatever the member contains.
    /// Both share the member's temp scope.
    fn transform_method(
        &mut self,
        arena: &mut NodeArena,
        member: NodeIndex,
        kind: MemberKind,
    ) -> Result<NodeIndex, InternalError> {
        self.in_temp_scope(arena, member, |this, arena, member| {
            let rewritten = this.rewrite_super(arena, member, kind)?;
            walk_node(this, arena, rewritten)
        })
    }

    /// `constructor(params) { body }` -> `constructor: function (params) { body }`
    fn transform_constructor(
        &mut self,
        arena: &mut NodeArena,
        member: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let lowered = self.transform_method(arena, member, MemberKind::Constructor)?;
        let node = arena.node(lowered)?.clone();
        let found = node.data.kind_name();
        let NodeData::PropertyMethodAssignment {
            parameters, body, ..
        } = node.data
        else {
            return Err(InternalError::UnexpectedNode {
                expected: "PropertyMethodAssignment",
                found,
            });
        };

        let function = arena.add(
            NodeData::FunctionExpression {
                name: None,
                parameters,
                body,
            },
            node.loc,
        );
        Ok(arena.add(
            NodeData::PropertyNameAssignment {
                name: PropertyName::Identifier("constructor".to_string()),
                value: function,
            },
            node.loc,
        ))
    }

    /// Run the `super` rewrite over `member` against the innermost class.
    fn rewrite_super(
        &mut self,
        arena: &mut NodeArena,
        member: NodeIndex,
        kind: MemberKind,
    ) -> Result<NodeIndex, InternalError> {
        let name_expr = self.current_class()?.name_expr;
        let super_transformer = SuperTransformer::new(
            name_expr,
            &self.runtime,
            &mut *self.reporter,
            &mut self.temp_vars,
        );
        let (rewritten, used_super) = super_transformer.transform_member(arena, member, kind)?;
        if used_super {
            self.current_class()?.has_super = true;
        }
        Ok(rewritten)
    }

    /// `constructor(...args) { super(...args); }` when the class extends
    /// something, `constructor() {}` otherwise.
    fn default_constructor(&mut self, arena: &mut NodeArena, has_extends: bool) -> NodeIndex {
        let (parameters, statements) = if has_extends {
            let args_param = arena.rest_param("args");
            let callee = arena.super_();
            let args = arena.id("args");
            let spread = arena.spread(args);
            let super_call = arena.call(callee, vec![spread]);
            let statement = arena.expr_stmt(super_call);
            (vec![args_param], vec![statement])
        } else {
            (Vec::new(), Vec::new())
        };
        let body = arena.block(statements);
        arena.synth(NodeData::PropertyMethodAssignment {
            name: PropertyName::Identifier("constructor".to_string()),
            parameters,
            body,
        })
    }

    // =========================================================================
    // Temp var scopes
    // =========================================================================

    fn transform_function_like(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        self.in_temp_scope(arena, idx, |this, arena, idx| walk_node(this, arena, idx))
    }

    /// Run `lower` on the program or function-like node `idx` inside a fresh
    /// temp scope, then declare the temps it left allocated.
    fn in_temp_scope<F>(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
        lower: F,
    ) -> Result<NodeIndex, InternalError>
    where
        F: FnOnce(&mut Self, &mut NodeArena, NodeIndex) -> Result<NodeIndex, InternalError>,
    {
        self.temp_vars.push_scope();
        let result = lower(self, arena, idx);
        let temps = self.temp_vars.pop_scope();
        let result = result?;
        if temps.is_empty() {
            return Ok(result);
        }
        declare_temps(arena, result, temps)
    }
}

/// Prepend `var <temps>;` to the body of the program or function at `idx`.
fn declare_temps(
    arena: &mut NodeArena,
    idx: NodeIndex,
    temps: Vec<String>,
) -> Result<NodeIndex, InternalError> {
    trace!(node = idx.0, ?temps, "declaring temp vars");
    let declaration = arena.var_names(temps);
    let node = arena.node(idx)?.clone();

    let data = match node.data {
        NodeData::Program { statements } => NodeData::Program {
            statements: prepend(declaration, statements),
        },
        NodeData::FunctionDeclaration {
            name,
            parameters,
            body,
        } => NodeData::FunctionDeclaration {
            name,
            parameters,
            body: prepend_to_body(arena, body, declaration)?,
        },
        NodeData::FunctionExpression {
            name,
            parameters,
            body,
        } => NodeData::FunctionExpression {
            name,
            parameters,
            body: prepend_to_body(arena, body, declaration)?,
        },
        NodeData::ArrowFunction { parameters, body } => NodeData::ArrowFunction {
            parameters,
            body: prepend_to_body(arena, body, declaration)?,
        },
        NodeData::PropertyMethodAssignment {
            name,
            parameters,
            body,
        } => NodeData::PropertyMethodAssignment {
            name,
            parameters,
            body: prepend_to_body(arena, body, declaration)?,
        },
        NodeData::GetAccessor { name, body } => NodeData::GetAccessor {
            name,
            body: prepend_to_body(arena, body, declaration)?,
        },
        NodeData::SetAccessor {
            name,
            parameter,
            body,
        } => NodeData::SetAccessor {
            name,
            parameter,
            body: prepend_to_body(arena, body, declaration)?,
        },
        other => {
            return Err(InternalError::UnexpectedNode {
                expected: "function-like",
                found: other.kind_name(),
            });
        }
    };
    Ok(arena.add(data, node.loc))
}

fn prepend(first: NodeIndex, rest: Vec<NodeIndex>) -> Vec<NodeIndex> {
    let mut statements = Vec::with_capacity(rest.len() + 1);
    statements.push(first);
    statements.extend(rest);
    statements
}

/// Prepend `declaration` to a block body; an expression body (arrow) becomes
/// `{ declaration; return expr; }`.
fn prepend_to_body(
    arena: &mut NodeArena,
    body: NodeIndex,
    declaration: NodeIndex,
) -> Result<NodeIndex, InternalError> {
    let node = arena.node(body)?.clone();
    let statements = match node.data {
        NodeData::Block { statements } => prepend(declaration, statements),
        _ => {
            let ret = arena.add(NodeData::ReturnStatement { expression: Some(body) }, node.loc);
            vec![declaration, ret]
        }
    };
    Ok(arena.add(NodeData::Block { statements }, node.loc))
}

fn classify(data: &NodeData) -> Visit {
    match data {
        NodeData::ClassDeclaration { .. } => Visit::ClassDeclaration,
        NodeData::ClassExpression { .. } => Visit::ClassExpression,
        NodeData::Program { .. } => Visit::TempScope,
        data if data.is_function_like() => Visit::TempScope,
        _ => Visit::Other,
    }
}

impl Transformer for ClassTransformer<'_> {
    fn transform_any(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let visit = classify(&arena.node(idx)?.data);
        match visit {
            Visit::ClassDeclaration => self.transform_class_declaration(arena, idx),
            Visit::ClassExpression => self.transform_class_expression(arena, idx),
            Visit::TempScope => self.transform_function_like(arena, idx),
            Visit::Other => walk_node(self, arena, idx),
        }
    }
}

// =============================================================================
// Pipeline pass
// =============================================================================

/// [`ClassTransformer`] as a pipeline stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassLowering;

impl LoweringPass for ClassLowering {
    fn name(&self) -> &'static str {
        "class-lowering"
    }

    fn run(
        &mut self,
        arena: &mut NodeArena,
        program: NodeIndex,
        options: &LoweringOptions,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<NodeIndex, InternalError> {
        ClassTransformer::new(options, reporter).transform_program(arena, program)
    }
}

#[cfg(test)]
#[path = "../tests/class_transformer.rs"]
mod tests;

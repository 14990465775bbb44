//! `super` rewrite for a single class member.
//!
//! ```javascript
//! super(a, ...b)      // in a constructor
//! super.m(a)
//! super.x
//! super.x = v
//! super.x += v
//! ++super.x
//! super.x ||= v
//! super[k()] *= v
//! ```
//!
//! Becomes:
//!
//! ```javascript
//! $runtime.superCall(this, C, "constructor", [a, ...b])
//! $runtime.superCall(this, C, "m", [a])
//! $runtime.superGet(this, C, "x")
//! $runtime.superSet(this, C, "x", v)
//! $runtime.superSet(this, C, "x", $runtime.superGet(this, C, "x") + v)
//! $runtime.superSet(this, C, "x", +$runtime.superGet(this, C, "x") + 1)
//! $runtime.superGet(this, C, "x") || $runtime.superSet(this, C, "x", v)
//! ($__0 = k(), $runtime.superSet(this, C, $__0, $runtime.superGet(this, C, $__0) * v))
//! ```
//!
//! A computed key read and written by the same expression is evaluated once
//! into a temporary from the member's temp scope.
//!
//! `C` is the class name-expression supplied by the class lowering. Arrow
//! functions keep the member's `super`, so they are rewritten too. Nested
//! functions and object-literal methods are not: a `super` found there is
//! reported and left in place.

use crate::runtime::{Runtime, RuntimeHelper};
use crate::temp_vars::TempVarAllocator;
use lowerjs_ast::{NodeArena, NodeData, NodeIndex, Transformer, walk_node};
use lowerjs_common::diagnostics::diagnostic_messages;
use lowerjs_common::{DiagnosticMessage, ErrorReporter, InternalError, SourceRange};
use tracing::debug;

/// Which kind of class member is being rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Constructor,
    Method,
    Accessor,
}

pub struct SuperTransformer<'r> {
    class_ref: NodeIndex,
    runtime: &'r Runtime,
    reporter: &'r mut dyn ErrorReporter,
    temp_vars: &'r mut TempVarAllocator,
    member_kind: MemberKind,
    /// Nesting depth of non-arrow functions inside the member.
    function_depth: u32,
    has_super: bool,
}

/// Key of a `super.name` / `super[index]` access.
#[derive(Debug, Clone)]
enum MemberKey {
    Named(String),
    Computed(NodeIndex),
}

/// A key that can be emitted more than once without re-evaluating it.
#[derive(Debug, Clone)]
enum StableKey {
    Named(String),
    /// Temporary holding an evaluated computed key
    Temp(String),
}

impl StableKey {
    fn emit(&self, arena: &mut NodeArena) -> NodeIndex {
        match self {
            StableKey::Named(name) => arena.string(name.as_str()),
            StableKey::Temp(temp) => arena.id(temp.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct SuperMember {
    super_node: NodeIndex,
    key: MemberKey,
}

/// What `transform_any` does with a node.
enum Visit {
    /// `super(args)`
    Call {
        super_node: NodeIndex,
        arguments: Vec<NodeIndex>,
    },
    /// `super.m(args)`
    MethodCall {
        member: SuperMember,
        arguments: Vec<NodeIndex>,
    },
    /// `super.x = v`
    Assign { member: SuperMember, value: NodeIndex },
    /// `super.x += v`, `super.x ??= v`; `operator` is the binary operator
    Compound {
        member: SuperMember,
        operator: String,
        value: NodeIndex,
    },
    /// `++super.x`, `--super.x`
    Update { member: SuperMember, operator: &'static str },
    /// `super.x`
    Get { member: SuperMember },
    /// `super` on its own
    Bare,
    NestedFunction,
    NestedClass,
    Other,
}

impl Visit {
    fn super_node(&self, idx: NodeIndex) -> Option<NodeIndex> {
        match self {
            Visit::Call { super_node, .. } => Some(*super_node),
            Visit::MethodCall { member, .. }
            | Visit::Assign { member, .. }
            | Visit::Compound { member, .. }
            | Visit::Update { member, .. }
            | Visit::Get { member } => Some(member.super_node),
            Visit::Bare => Some(idx),
            Visit::NestedFunction | Visit::NestedClass | Visit::Other => None,
        }
    }
}

impl<'r> SuperTransformer<'r> {
    pub fn new(
        class_ref: NodeIndex,
        runtime: &'r Runtime,
        reporter: &'r mut dyn ErrorReporter,
        temp_vars: &'r mut TempVarAllocator,
    ) -> Self {
        SuperTransformer {
            class_ref,
            runtime,
            reporter,
            temp_vars,
            member_kind: MemberKind::Method,
            function_depth: 0,
            has_super: false,
        }
    }

    /// Rewrite every `super` in `member` (a method, accessor or constructor
    /// node). Returns the new member and whether any `super` was rewritten.
    pub fn transform_member(
        mut self,
        arena: &mut NodeArena,
        member: NodeIndex,
        kind: MemberKind,
    ) -> Result<(NodeIndex, bool), InternalError> {
        self.member_kind = kind;
        // The member itself is function-like; only functions below it count as nested.
        let result = walk_node(&mut self, arena, member)?;
        Ok((result, self.has_super))
    }

    fn report(&mut self, loc: Option<SourceRange>, message: DiagnosticMessage) {
        debug!(code = message.code, ?loc, "invalid super");
        self.reporter.report(loc, &message, &[]);
    }

    /// A fresh copy of the class name-expression.
    fn class_ref(&self, arena: &mut NodeArena) -> Result<NodeIndex, InternalError> {
        let data = arena.node(self.class_ref)?.data.clone();
        Ok(arena.synth(data))
    }

    fn member_key(
        &mut self,
        arena: &mut NodeArena,
        key: MemberKey,
    ) -> Result<NodeIndex, InternalError> {
        match key {
            MemberKey::Named(name) => Ok(arena.string(name)),
            MemberKey::Computed(index) => self.transform_any(arena, index),
        }
    }

    /// `<runtime>.<helper>(this, C, key, ...rest)`
    fn helper_call(
        &mut self,
        arena: &mut NodeArena,
        helper: RuntimeHelper,
        key: NodeIndex,
        rest: Vec<NodeIndex>,
        loc: Option<SourceRange>,
    ) -> Result<NodeIndex, InternalError> {
        let callee = self.runtime.helper(arena, helper);
        let mut arguments = Vec::with_capacity(3 + rest.len());
        arguments.push(arena.this());
        arguments.push(self.class_ref(arena)?);
        arguments.push(key);
        arguments.extend(rest);
        self.has_super = true;
        Ok(arena.add(NodeData::CallExpression { callee, arguments }, loc))
    }

    fn call(
        &mut self,
        arena: &mut NodeArena,
        key: NodeIndex,
        arguments: &[NodeIndex],
        loc: Option<SourceRange>,
    ) -> Result<NodeIndex, InternalError> {
        let elements = self.transform_list(arena, arguments)?;
        let args = arena.array(elements);
        self.helper_call(arena, RuntimeHelper::SuperCall, key, vec![args], loc)
    }

    fn get(
        &mut self,
        arena: &mut NodeArena,
        key: NodeIndex,
        loc: Option<SourceRange>,
    ) -> Result<NodeIndex, InternalError> {
        self.helper_call(arena, RuntimeHelper::SuperGet, key, Vec::new(), loc)
    }

    fn set(
        &mut self,
        arena: &mut NodeArena,
        key: NodeIndex,
        value: NodeIndex,
        loc: Option<SourceRange>,
    ) -> Result<NodeIndex, InternalError> {
        self.helper_call(arena, RuntimeHelper::SuperSet, key, vec![value], loc)
    }

    /// Make `key` safe to read and write. A computed key is rewritten and
    /// assigned to a fresh temporary; the `$__N = key` assignment is returned
    /// alongside.
    fn bind_key(
        &mut self,
        arena: &mut NodeArena,
        key: MemberKey,
    ) -> Result<(StableKey, Option<NodeIndex>), InternalError> {
        match key {
            MemberKey::Named(name) => Ok((StableKey::Named(name), None)),
            MemberKey::Computed(index) => {
                let index = self.transform_any(arena, index)?;
                let temp = self.temp_vars.add_temp_var();
                let target = arena.id(temp.as_str());
                let init = arena.assign(target, index);
                Ok((StableKey::Temp(temp), Some(init)))
            }
        }
    }

    /// `super.x op= v`:
    /// - arithmetic and bitwise: `superSet(.., superGet(..) op v)`
    /// - `&&=`, `||=`, `??=`: `superGet(..) op superSet(.., v)`, so the setter
    ///   only runs when the assignment happens
    fn compound(
        &mut self,
        arena: &mut NodeArena,
        member: SuperMember,
        operator: String,
        value: NodeIndex,
        loc: Option<SourceRange>,
    ) -> Result<NodeIndex, InternalError> {
        let (key, key_init) = self.bind_key(arena, member.key)?;
        let value = self.transform_any(arena, value)?;
        let outer_loc = if key_init.is_some() { None } else { loc };

        let get_key = key.emit(arena);
        let current = self.get(arena, get_key, None)?;
        let set_key = key.emit(arena);
        let expr = if is_logical(&operator) {
            let set = self.set(arena, set_key, value, None)?;
            arena.add(
                NodeData::BinaryExpression {
                    left: current,
                    operator,
                    right: set,
                },
                outer_loc,
            )
        } else {
            let next = arena.binary(current, operator, value);
            self.set(arena, set_key, next, outer_loc)?
        };
        Ok(sequence(arena, key_init, expr, loc))
    }

    /// `++super.x` -> `superSet(.., +superGet(..) + 1)`
    fn update(
        &mut self,
        arena: &mut NodeArena,
        member: SuperMember,
        operator: &'static str,
        loc: Option<SourceRange>,
    ) -> Result<NodeIndex, InternalError> {
        let (key, key_init) = self.bind_key(arena, member.key)?;
        let outer_loc = if key_init.is_some() { None } else { loc };

        let get_key = key.emit(arena);
        let current = self.get(arena, get_key, None)?;
        let numeric = arena.synth(NodeData::UnaryExpression {
            operator: "+".to_string(),
            operand: current,
        });
        let one = arena.number("1");
        let next = arena.binary(numeric, operator, one);
        let set_key = key.emit(arena);
        let expr = self.set(arena, set_key, next, outer_loc)?;
        Ok(sequence(arena, key_init, expr, loc))
    }

    /// Rewrite the heritage clause of a class nested in the member. Its body
    /// is lowered with its own class context later.
    fn transform_class_heritage(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let node = arena.node(idx)?.clone();
        let data = match node.data {
            NodeData::ClassDeclaration {
                name,
                super_class: Some(super_class),
                members,
            } => {
                let new_super = self.transform_any(arena, super_class)?;
                if new_super == super_class {
                    return Ok(idx);
                }
                NodeData::ClassDeclaration {
                    name,
                    super_class: Some(new_super),
                    members,
                }
            }
            NodeData::ClassExpression {
                name,
                super_class: Some(super_class),
                members,
            } => {
                let new_super = self.transform_any(arena, super_class)?;
                if new_super == super_class {
                    return Ok(idx);
                }
                NodeData::ClassExpression {
                    name,
                    super_class: Some(new_super),
                    members,
                }
            }
            _ => return Ok(idx),
        };
        Ok(arena.add(data, node.loc))
    }
}

fn is_super(arena: &NodeArena, idx: NodeIndex) -> bool {
    matches!(
        arena.get(idx).map(|n| &n.data),
        Some(NodeData::SuperExpression)
    )
}

fn super_member(arena: &NodeArena, idx: NodeIndex) -> Option<SuperMember> {
    match &arena.get(idx)?.data {
        NodeData::MemberExpression { object, name } if is_super(arena, *object) => {
            Some(SuperMember {
                super_node: *object,
                key: MemberKey::Named(name.clone()),
            })
        }
        NodeData::MemberLookupExpression { object, index } if is_super(arena, *object) => {
            Some(SuperMember {
                super_node: *object,
                key: MemberKey::Computed(*index),
            })
        }
        _ => None,
    }
}

/// `(key_init, expr)` when a computed key was bound to a temporary.
fn sequence(
    arena: &mut NodeArena,
    key_init: Option<NodeIndex>,
    expr: NodeIndex,
    loc: Option<SourceRange>,
) -> NodeIndex {
    let Some(init) = key_init else {
        return expr;
    };
    let expressions = arena.synth(NodeData::CommaExpression {
        expressions: vec![init, expr],
    });
    arena.add(NodeData::ParenExpression { expression: expressions }, loc)
}

fn is_logical(operator: &str) -> bool {
    matches!(operator, "&&" | "||" | "??")
}

/// Binary operator of a compound assignment: `+=` -> `+`, `>>>=` -> `>>>`.
fn compound_operator(operator: &str) -> Option<&str> {
    match operator {
        "==" | "===" | "!=" | "!==" | "<=" | ">=" => None,
        _ => operator.strip_suffix('=').filter(|op| !op.is_empty()),
    }
}

fn classify(arena: &NodeArena, idx: NodeIndex) -> Result<Visit, InternalError> {
    let visit = match &arena.node(idx)?.data {
        NodeData::CallExpression { callee, arguments } if is_super(arena, *callee) => Visit::Call {
            super_node: *callee,
            arguments: arguments.clone(),
        },
        NodeData::CallExpression { callee, arguments } => match super_member(arena, *callee) {
            Some(member) => Visit::MethodCall {
                member,
                arguments: arguments.clone(),
            },
            None => Visit::Other,
        },
        NodeData::BinaryExpression {
            left,
            operator,
            right,
        } => match super_member(arena, *left) {
            Some(member) if operator == "=" => Visit::Assign {
                member,
                value: *right,
            },
            Some(member) => match compound_operator(operator) {
                Some(op) => Visit::Compound {
                    member,
                    operator: op.to_string(),
                    value: *right,
                },
                None => Visit::Other,
            },
            None => Visit::Other,
        },
        NodeData::UnaryExpression { operator, operand } => {
            let op = match operator.as_str() {
                "++" => Some("+"),
                "--" => Some("-"),
                _ => None,
            };
            match (op, super_member(arena, *operand)) {
                (Some(operator), Some(member)) => Visit::Update { member, operator },
                _ => Visit::Other,
            }
        }
        NodeData::MemberExpression { .. } | NodeData::MemberLookupExpression { .. } => {
            match super_member(arena, idx) {
                Some(member) => Visit::Get { member },
                None => Visit::Other,
            }
        }
        NodeData::SuperExpression => Visit::Bare,
        NodeData::ArrowFunction { .. } => Visit::Other,
        data if data.is_function_like() => Visit::NestedFunction,
        NodeData::ClassDeclaration { .. } | NodeData::ClassExpression { .. } => Visit::NestedClass,
        _ => Visit::Other,
    };
    Ok(visit)
}

impl Transformer for SuperTransformer<'_> {
    fn transform_any(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        let visit = classify(arena, idx)?;

        if self.function_depth > 0
            && let Some(super_node) = visit.super_node(idx)
        {
            let loc = arena.loc(super_node);
            self.report(loc, diagnostic_messages::SUPER_OUTSIDE_CLASS_MEMBER);
            return Ok(idx);
        }

        let loc = arena.loc(idx);
        match visit {
            Visit::Call {
                super_node,
                arguments,
            } => {
                if self.member_kind != MemberKind::Constructor {
                    self.report(
                        arena.loc(super_node),
                        diagnostic_messages::SUPER_CALL_OUTSIDE_CONSTRUCTOR,
                    );
                    // The arguments may still hold valid `super.x` uses.
                    let new_arguments = self.transform_list(arena, &arguments)?;
                    if new_arguments == arguments {
                        return Ok(idx);
                    }
                    return Ok(arena.add(
                        NodeData::CallExpression {
                            callee: super_node,
                            arguments: new_arguments,
                        },
                        loc,
                    ));
                }
                let key = arena.string("constructor");
                self.call(arena, key, &arguments, loc)
            }
            Visit::MethodCall { member, arguments } => {
                let key = self.member_key(arena, member.key)?;
                self.call(arena, key, &arguments, loc)
            }
            Visit::Assign { member, value } => {
                let key = self.member_key(arena, member.key)?;
                let value = self.transform_any(arena, value)?;
                self.set(arena, key, value, loc)
            }
            Visit::Compound {
                member,
                operator,
                value,
            } => self.compound(arena, member, operator, value, loc),
            Visit::Update { member, operator } => self.update(arena, member, operator, loc),
            Visit::Get { member } => {
                let key = self.member_key(arena, member.key)?;
                self.get(arena, key, loc)
            }
            Visit::Bare => {
                self.report(loc, diagnostic_messages::SUPER_MUST_BE_CALLED_OR_ACCESSED);
                Ok(idx)
            }
            Visit::NestedFunction => {
                self.function_depth += 1;
                let result = walk_node(self, arena, idx);
                self.function_depth -= 1;
                result
            }
            Visit::NestedClass => self.transform_class_heritage(arena, idx),
            Visit::Other => walk_node(self, arena, idx),
        }
    }
}

#[cfg(test)]
#[path = "../tests/super_transformer.rs"]
mod tests;

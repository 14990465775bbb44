//! Visit-and-reconstruct rewrite base.
//!
//! A [`Transformer`] overrides [`Transformer::transform_any`] for the node
//! kinds it rewrites and delegates everything else to [`walk_node`], which
//! transforms each child and rebuilds the parent only when a child changed.
//! An unchanged subtree keeps its original `NodeIndex`.

use crate::arena::NodeArena;
use crate::node::{NodeData, NodeIndex};
use lowerjs_common::InternalError;

pub trait Transformer {
    fn transform_any(
        &mut self,
        arena: &mut NodeArena,
        idx: NodeIndex,
    ) -> Result<NodeIndex, InternalError> {
        walk_node(self, arena, idx)
    }

    fn transform_list(
        &mut self,
        arena: &mut NodeArena,
        list: &[NodeIndex],
    ) -> Result<Vec<NodeIndex>, InternalError> {
        list.iter()
            .map(|&idx| self.transform_any(arena, idx))
            .collect()
    }
}

fn child<T: Transformer + ?Sized>(
    t: &mut T,
    arena: &mut NodeArena,
    idx: NodeIndex,
    changed: &mut bool,
) -> Result<NodeIndex, InternalError> {
    let new_idx = t.transform_any(arena, idx)?;
    *changed |= new_idx != idx;
    Ok(new_idx)
}

fn opt_child<T: Transformer + ?Sized>(
    t: &mut T,
    arena: &mut NodeArena,
    idx: Option<NodeIndex>,
    changed: &mut bool,
) -> Result<Option<NodeIndex>, InternalError> {
    idx.map(|idx| child(t, arena, idx, changed)).transpose()
}

fn list<T: Transformer + ?Sized>(
    t: &mut T,
    arena: &mut NodeArena,
    nodes: &[NodeIndex],
    changed: &mut bool,
) -> Result<Vec<NodeIndex>, InternalError> {
    let new_nodes = t.transform_list(arena, nodes)?;
    *changed |= new_nodes.as_slice() != nodes;
    Ok(new_nodes)
}

/// Transform every child of `idx` and rebuild it if any child changed.
pub fn walk_node<T: Transformer + ?Sized>(
    t: &mut T,
    arena: &mut NodeArena,
    idx: NodeIndex,
) -> Result<NodeIndex, InternalError> {
    let node = arena.node(idx)?.clone();
    let mut changed = false;
    let c = &mut changed;

    let data = match node.data {
        NodeData::Program { statements } => NodeData::Program {
            statements: list(t, arena, &statements, c)?,
        },
        NodeData::Block { statements } => NodeData::Block {
            statements: list(t, arena, &statements, c)?,
        },
        NodeData::VariableStatement { kind, declarations } => NodeData::VariableStatement {
            kind,
            declarations: list(t, arena, &declarations, c)?,
        },
        NodeData::VariableDeclaration { name, initializer } => NodeData::VariableDeclaration {
            name: child(t, arena, name, c)?,
            initializer: opt_child(t, arena, initializer, c)?,
        },
        NodeData::FunctionDeclaration {
            name,
            parameters,
            body,
        } => NodeData::FunctionDeclaration {
            name: child(t, arena, name, c)?,
            parameters: list(t, arena, &parameters, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::ClassDeclaration {
            name,
            super_class,
            members,
        } => NodeData::ClassDeclaration {
            name: child(t, arena, name, c)?,
            super_class: opt_child(t, arena, super_class, c)?,
            members: list(t, arena, &members, c)?,
        },
        NodeData::ExpressionStatement { expression } => NodeData::ExpressionStatement {
            expression: child(t, arena, expression, c)?,
        },
        NodeData::ReturnStatement { expression } => NodeData::ReturnStatement {
            expression: opt_child(t, arena, expression, c)?,
        },
        NodeData::IfStatement {
            condition,
            then_statement,
            else_statement,
        } => NodeData::IfStatement {
            condition: child(t, arena, condition, c)?,
            then_statement: child(t, arena, then_statement, c)?,
            else_statement: opt_child(t, arena, else_statement, c)?,
        },
        NodeData::WhileStatement { condition, body } => NodeData::WhileStatement {
            condition: child(t, arena, condition, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::ForStatement {
            initializer,
            condition,
            incrementor,
            body,
        } => NodeData::ForStatement {
            initializer: opt_child(t, arena, initializer, c)?,
            condition: opt_child(t, arena, condition, c)?,
            incrementor: opt_child(t, arena, incrementor, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::ThrowStatement { expression } => NodeData::ThrowStatement {
            expression: child(t, arena, expression, c)?,
        },
        NodeData::TryStatement {
            body,
            catch_clause,
            finally_block,
        } => NodeData::TryStatement {
            body: child(t, arena, body, c)?,
            catch_clause: opt_child(t, arena, catch_clause, c)?,
            finally_block: opt_child(t, arena, finally_block, c)?,
        },
        NodeData::CatchClause { binding, body } => NodeData::CatchClause {
            binding: child(t, arena, binding, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::FormalParameter {
            name,
            initializer,
            rest,
        } => NodeData::FormalParameter {
            name: child(t, arena, name, c)?,
            initializer: opt_child(t, arena, initializer, c)?,
            rest,
        },
        NodeData::ArrayLiteral { elements } => NodeData::ArrayLiteral {
            elements: list(t, arena, &elements, c)?,
        },
        NodeData::ObjectLiteral { properties } => NodeData::ObjectLiteral {
            properties: list(t, arena, &properties, c)?,
        },
        NodeData::PropertyNameAssignment { name, value } => NodeData::PropertyNameAssignment {
            name,
            value: child(t, arena, value, c)?,
        },
        NodeData::PropertyMethodAssignment {
            name,
            parameters,
            body,
        } => NodeData::PropertyMethodAssignment {
            name,
            parameters: list(t, arena, &parameters, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::GetAccessor { name, body } => NodeData::GetAccessor {
            name,
            body: child(t, arena, body, c)?,
        },
        NodeData::SetAccessor {
            name,
            parameter,
            body,
        } => NodeData::SetAccessor {
            name,
            parameter: child(t, arena, parameter, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::FunctionExpression {
            name,
            parameters,
            body,
        } => NodeData::FunctionExpression {
            name: opt_child(t, arena, name, c)?,
            parameters: list(t, arena, &parameters, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::ArrowFunction { parameters, body } => NodeData::ArrowFunction {
            parameters: list(t, arena, &parameters, c)?,
            body: child(t, arena, body, c)?,
        },
        NodeData::ClassExpression {
            name,
            super_class,
            members,
        } => NodeData::ClassExpression {
            name: opt_child(t, arena, name, c)?,
            super_class: opt_child(t, arena, super_class, c)?,
            members: list(t, arena, &members, c)?,
        },
        NodeData::CallExpression { callee, arguments } => NodeData::CallExpression {
            callee: child(t, arena, callee, c)?,
            arguments: list(t, arena, &arguments, c)?,
        },
        NodeData::NewExpression { callee, arguments } => NodeData::NewExpression {
            callee: child(t, arena, callee, c)?,
            arguments: list(t, arena, &arguments, c)?,
        },
        NodeData::MemberExpression { object, name } => NodeData::MemberExpression {
            object: child(t, arena, object, c)?,
            name,
        },
        NodeData::MemberLookupExpression { object, index } => NodeData::MemberLookupExpression {
            object: child(t, arena, object, c)?,
            index: child(t, arena, index, c)?,
        },
        NodeData::BinaryExpression {
            left,
            operator,
            right,
        } => NodeData::BinaryExpression {
            left: child(t, arena, left, c)?,
            operator,
            right: child(t, arena, right, c)?,
        },
        NodeData::UnaryExpression { operator, operand } => NodeData::UnaryExpression {
            operator,
            operand: child(t, arena, operand, c)?,
        },
        NodeData::ConditionalExpression {
            condition,
            when_true,
            when_false,
        } => NodeData::ConditionalExpression {
            condition: child(t, arena, condition, c)?,
            when_true: child(t, arena, when_true, c)?,
            when_false: child(t, arena, when_false, c)?,
        },
        NodeData::ParenExpression { expression } => NodeData::ParenExpression {
            expression: child(t, arena, expression, c)?,
        },
        NodeData::CommaExpression { expressions } => NodeData::CommaExpression {
            expressions: list(t, arena, &expressions, c)?,
        },
        NodeData::SpreadExpression { expression } => NodeData::SpreadExpression {
            expression: child(t, arena, expression, c)?,
        },
        // Leaves
        NodeData::EmptyStatement
        | NodeData::BindingIdentifier { .. }
        | NodeData::IdentifierExpression { .. }
        | NodeData::ThisExpression
        | NodeData::SuperExpression
        | NodeData::Literal(_) => return Ok(idx),
    };

    if changed {
        Ok(arena.add(data, node.loc))
    } else {
        Ok(idx)
    }
}

/// Call `f` on every child of `data`, in source order.
pub fn for_each_child<E>(
    data: &NodeData,
    mut f: impl FnMut(NodeIndex) -> Result<(), E>,
) -> Result<(), E> {
    fn each<E>(
        nodes: &[NodeIndex],
        f: &mut impl FnMut(NodeIndex) -> Result<(), E>,
    ) -> Result<(), E> {
        nodes.iter().try_for_each(|&idx| f(idx))
    }

    match data {
        NodeData::Program { statements } | NodeData::Block { statements } => {
            each(statements, &mut f)
        }
        NodeData::VariableStatement { declarations, .. } => each(declarations, &mut f),
        NodeData::VariableDeclaration { name, initializer } => {
            f(*name)?;
            initializer.map_or(Ok(()), &mut f)
        }
        NodeData::FunctionDeclaration {
            name,
            parameters,
            body,
        } => {
            f(*name)?;
            each(parameters, &mut f)?;
            f(*body)
        }
        NodeData::ClassDeclaration {
            name,
            super_class,
            members,
        } => {
            f(*name)?;
            super_class.map_or(Ok(()), &mut f)?;
            each(members, &mut f)
        }
        NodeData::ClassExpression {
            name,
            super_class,
            members,
        } => {
            name.map_or(Ok(()), &mut f)?;
            super_class.map_or(Ok(()), &mut f)?;
            each(members, &mut f)
        }
        NodeData::ExpressionStatement { expression }
        | NodeData::ThrowStatement { expression }
        | NodeData::ParenExpression { expression }
        | NodeData::SpreadExpression { expression } => f(*expression),
        NodeData::ReturnStatement { expression } => expression.map_or(Ok(()), &mut f),
        NodeData::IfStatement {
            condition,
            then_statement,
            else_statement,
        } => {
            f(*condition)?;
            f(*then_statement)?;
            else_statement.map_or(Ok(()), &mut f)
        }
        NodeData::WhileStatement { condition, body } => {
            f(*condition)?;
            f(*body)
        }
        NodeData::ForStatement {
            initializer,
            condition,
            incrementor,
            body,
        } => {
            initializer.map_or(Ok(()), &mut f)?;
            condition.map_or(Ok(()), &mut f)?;
            incrementor.map_or(Ok(()), &mut f)?;
            f(*body)
        }
        NodeData::TryStatement {
            body,
            catch_clause,
            finally_block,
        } => {
            f(*body)?;
            catch_clause.map_or(Ok(()), &mut f)?;
            finally_block.map_or(Ok(()), &mut f)
        }
        NodeData::CatchClause { binding, body } => {
            f(*binding)?;
            f(*body)
        }
        NodeData::FormalParameter {
            name, initializer, ..
        } => {
            f(*name)?;
            initializer.map_or(Ok(()), &mut f)
        }
        NodeData::ArrayLiteral { elements } => each(elements, &mut f),
        NodeData::ObjectLiteral { properties } => each(properties, &mut f),
        NodeData::CommaExpression { expressions } => each(expressions, &mut f),
        NodeData::PropertyNameAssignment { value, .. } => f(*value),
        NodeData::PropertyMethodAssignment {
            parameters, body, ..
        }
        | NodeData::ArrowFunction { parameters, body } => {
            each(parameters, &mut f)?;
            f(*body)
        }
        NodeData::FunctionExpression {
            name,
            parameters,
            body,
        } => {
            name.map_or(Ok(()), &mut f)?;
            each(parameters, &mut f)?;
            f(*body)
        }
        NodeData::GetAccessor { body, .. } => f(*body),
        NodeData::SetAccessor {
            parameter, body, ..
        } => {
            f(*parameter)?;
            f(*body)
        }
        NodeData::CallExpression { callee, arguments }
        | NodeData::NewExpression { callee, arguments } => {
            f(*callee)?;
            each(arguments, &mut f)
        }
        NodeData::MemberExpression { object, .. } => f(*object),
        NodeData::MemberLookupExpression { object, index } => {
            f(*object)?;
            f(*index)
        }
        NodeData::BinaryExpression { left, right, .. } => {
            f(*left)?;
            f(*right)
        }
        NodeData::UnaryExpression { operand, .. } => f(*operand),
        NodeData::ConditionalExpression {
            condition,
            when_true,
            when_false,
        } => {
            f(*condition)?;
            f(*when_true)?;
            f(*when_false)
        }
        NodeData::EmptyStatement
        | NodeData::BindingIdentifier { .. }
        | NodeData::IdentifierExpression { .. }
        | NodeData::ThisExpression
        | NodeData::SuperExpression
        | NodeData::Literal(_) => Ok(()),
    }
}

#[cfg(test)]
#[path = "../tests/transform.rs"]
mod tests;

//! Node storage and node-factory helpers.

use crate::node::{Literal, Node, NodeData, NodeIndex, PropertyName, VarKind};
use lowerjs_common::{InternalError, SourceRange};

/// Append-only storage for tree nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and return its index.
    pub fn add(&mut self, data: NodeData, loc: Option<SourceRange>) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node { data, loc });
        idx
    }

    /// Append a synthesized (location-less) node.
    pub fn synth(&mut self, data: NodeData) -> NodeIndex {
        self.add(data, None)
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.0 as usize)
    }

    /// Like [`get`](Self::get) but a dangling index is an internal error.
    pub fn node(&self, idx: NodeIndex) -> Result<&Node, InternalError> {
        self.get(idx)
            .ok_or(InternalError::MissingNode { index: idx.0 })
    }

    pub fn loc(&self, idx: NodeIndex) -> Option<SourceRange> {
        self.get(idx).and_then(|n| n.loc)
    }

    /// Name carried by a `BindingIdentifier` or `IdentifierExpression`.
    pub fn identifier_text(&self, idx: NodeIndex) -> Result<&str, InternalError> {
        match &self.node(idx)?.data {
            NodeData::BindingIdentifier { name } | NodeData::IdentifierExpression { name } => {
                Ok(name)
            }
            other => Err(InternalError::UnexpectedNode {
                expected: "identifier",
                found: other.kind_name(),
            }),
        }
    }

    // =========================================================================
    // Factory helpers
    // =========================================================================

    /// Identifier reference: `name`
    pub fn id(&mut self, name: impl Into<String>) -> NodeIndex {
        self.synth(NodeData::IdentifierExpression { name: name.into() })
    }

    /// Declared name: `name`
    pub fn binding(&mut self, name: impl Into<String>) -> NodeIndex {
        self.synth(NodeData::BindingIdentifier { name: name.into() })
    }

    /// Plain formal parameter: `name`
    pub fn param(&mut self, name: impl Into<String>) -> NodeIndex {
        let name = self.binding(name);
        self.synth(NodeData::FormalParameter {
            name,
            initializer: None,
            rest: false,
        })
    }

    /// Rest parameter: `...name`
    pub fn rest_param(&mut self, name: impl Into<String>) -> NodeIndex {
        let name = self.binding(name);
        self.synth(NodeData::FormalParameter {
            name,
            initializer: None,
            rest: true,
        })
    }

    pub fn this(&mut self) -> NodeIndex {
        self.synth(NodeData::ThisExpression)
    }

    pub fn super_(&mut self) -> NodeIndex {
        self.synth(NodeData::SuperExpression)
    }

    pub fn null(&mut self) -> NodeIndex {
        self.synth(NodeData::Literal(Literal::Null))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.synth(NodeData::Literal(Literal::Boolean(value)))
    }

    pub fn number(&mut self, value: impl Into<String>) -> NodeIndex {
        self.synth(NodeData::Literal(Literal::Number(value.into())))
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeIndex {
        self.synth(NodeData::Literal(Literal::String(value.into())))
    }

    /// `callee(args)`
    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.synth(NodeData::CallExpression { callee, arguments })
    }

    /// `object.name`
    pub fn member(&mut self, object: NodeIndex, name: impl Into<String>) -> NodeIndex {
        self.synth(NodeData::MemberExpression {
            object,
            name: name.into(),
        })
    }

    /// `left op right`
    pub fn binary(&mut self, left: NodeIndex, operator: impl Into<String>, right: NodeIndex) -> NodeIndex {
        self.synth(NodeData::BinaryExpression {
            left,
            operator: operator.into(),
            right,
        })
    }

    /// `target = value`
    pub fn assign(&mut self, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.binary(target, "=", value)
    }

    /// `(expression)`
    pub fn paren(&mut self, expression: NodeIndex) -> NodeIndex {
        self.synth(NodeData::ParenExpression { expression })
    }

    /// `...expression`
    pub fn spread(&mut self, expression: NodeIndex) -> NodeIndex {
        self.synth(NodeData::SpreadExpression { expression })
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.synth(NodeData::ArrayLiteral { elements })
    }

    pub fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.synth(NodeData::ObjectLiteral { properties })
    }

    /// `name: value`
    pub fn property(&mut self, name: impl Into<String>, value: NodeIndex) -> NodeIndex {
        self.synth(NodeData::PropertyNameAssignment {
            name: PropertyName::Identifier(name.into()),
            value,
        })
    }

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.synth(NodeData::Block { statements })
    }

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.synth(NodeData::ExpressionStatement { expression })
    }

    pub fn ret(&mut self, expression: Option<NodeIndex>) -> NodeIndex {
        self.synth(NodeData::ReturnStatement { expression })
    }

    /// `function (params) { body }`; `body` must be a `Block`
    pub fn func_expr(&mut self, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.synth(NodeData::FunctionExpression {
            name: None,
            parameters,
            body,
        })
    }

    /// `kind name = init;`
    pub fn var_statement(
        &mut self,
        kind: VarKind,
        name: impl Into<String>,
        initializer: Option<NodeIndex>,
    ) -> NodeIndex {
        let name = self.binding(name);
        let decl = self.synth(NodeData::VariableDeclaration { name, initializer });
        self.synth(NodeData::VariableStatement {
            kind,
            declarations: vec![decl],
        })
    }

    /// `var a, b, c;` with no initializers
    pub fn var_names<I, S>(&mut self, names: I) -> NodeIndex
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let declarations = names
            .into_iter()
            .map(|name| {
                let name = self.binding(name);
                self.synth(NodeData::VariableDeclaration {
                    name,
                    initializer: None,
                })
            })
            .collect();
        self.synth(NodeData::VariableStatement {
            kind: VarKind::Var,
            declarations,
        })
    }
}

#[cfg(test)]
#[path = "../tests/arena.rs"]
mod tests;

//! Node kinds.
//!
//! `NodeData` is a closed sum type: every pass matches it exhaustively, so a
//! new node kind is a compile-time decision in each of them.

use lowerjs_common::SourceRange;

/// Index of a node in a [`NodeArena`](crate::NodeArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

/// A tree node: kind-specific data plus an optional source range.
///
/// `loc` is `None` for nodes synthesized by a lowering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub loc: Option<SourceRange>,
}

/// Declaration keyword of a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }

    pub const fn is_block_scoped(self) -> bool {
        matches!(self, VarKind::Let | VarKind::Const)
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    /// Numeric literal kept as written: `42`, `3.14`
    Number(String),
    String(String),
}

/// Name of an object-literal property or class member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),
}

impl PropertyName {
    /// The property key as a string value.
    pub fn text(&self) -> &str {
        match self {
            PropertyName::Identifier(s)
            | PropertyName::StringLiteral(s)
            | PropertyName::NumericLiteral(s) => s,
        }
    }

    /// `constructor` and `"constructor"` both name the class constructor.
    pub fn is_constructor(&self) -> bool {
        matches!(
            self,
            PropertyName::Identifier(s) | PropertyName::StringLiteral(s) if s == "constructor"
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    // =========================================================================
    // Program
    // =========================================================================
    Program {
        statements: Vec<NodeIndex>,
    },

    // =========================================================================
    // Statements
    // =========================================================================
    /// `{ statements }`
    Block {
        statements: Vec<NodeIndex>,
    },

    /// `var a = 1, b;`
    VariableStatement {
        kind: VarKind,
        declarations: Vec<NodeIndex>,
    },

    /// One declarator of a variable statement. `name` is a `BindingIdentifier`.
    VariableDeclaration {
        name: NodeIndex,
        initializer: Option<NodeIndex>,
    },

    /// `function name(params) { body }`
    FunctionDeclaration {
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    },

    /// `class Name extends Base { members }`
    ClassDeclaration {
        name: NodeIndex,
        super_class: Option<NodeIndex>,
        members: Vec<NodeIndex>,
    },

    ExpressionStatement {
        expression: NodeIndex,
    },

    ReturnStatement {
        expression: Option<NodeIndex>,
    },

    IfStatement {
        condition: NodeIndex,
        then_statement: NodeIndex,
        else_statement: Option<NodeIndex>,
    },

    WhileStatement {
        condition: NodeIndex,
        body: NodeIndex,
    },

    /// `for (init; cond; incr) body`; `initializer` is a variable statement or expression
    ForStatement {
        initializer: Option<NodeIndex>,
        condition: Option<NodeIndex>,
        incrementor: Option<NodeIndex>,
        body: NodeIndex,
    },

    ThrowStatement {
        expression: NodeIndex,
    },

    TryStatement {
        body: NodeIndex,
        catch_clause: Option<NodeIndex>,
        finally_block: Option<NodeIndex>,
    },

    /// `catch (binding) body`
    CatchClause {
        binding: NodeIndex,
        body: NodeIndex,
    },

    EmptyStatement,

    // =========================================================================
    // Bindings
    // =========================================================================
    /// A declared name.
    BindingIdentifier {
        name: String,
    },

    /// `name = initializer` or `...name`
    FormalParameter {
        name: NodeIndex,
        initializer: Option<NodeIndex>,
        rest: bool,
    },

    // =========================================================================
    // Expressions
    // =========================================================================
    /// A reference to a name.
    IdentifierExpression {
        name: String,
    },

    ThisExpression,

    SuperExpression,

    Literal(Literal),

    ArrayLiteral {
        elements: Vec<NodeIndex>,
    },

    ObjectLiteral {
        properties: Vec<NodeIndex>,
    },

    /// `name: value`
    PropertyNameAssignment {
        name: PropertyName,
        value: NodeIndex,
    },

    /// `name(params) { body }` in an object literal or class body
    PropertyMethodAssignment {
        name: PropertyName,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    },

    /// `get name() { body }`
    GetAccessor {
        name: PropertyName,
        body: NodeIndex,
    },

    /// `set name(parameter) { body }`
    SetAccessor {
        name: PropertyName,
        parameter: NodeIndex,
        body: NodeIndex,
    },

    /// `function name(params) { body }`; `name` is a `BindingIdentifier`
    FunctionExpression {
        name: Option<NodeIndex>,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    },

    /// `(params) => body`; `body` is a `Block` or an expression
    ArrowFunction {
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    },

    ClassExpression {
        name: Option<NodeIndex>,
        super_class: Option<NodeIndex>,
        members: Vec<NodeIndex>,
    },

    CallExpression {
        callee: NodeIndex,
        arguments: Vec<NodeIndex>,
    },

    NewExpression {
        callee: NodeIndex,
        arguments: Vec<NodeIndex>,
    },

    /// `object.name`
    MemberExpression {
        object: NodeIndex,
        name: String,
    },

    /// `object[index]`
    MemberLookupExpression {
        object: NodeIndex,
        index: NodeIndex,
    },

    /// `left op right`, including assignments (`=`, `+=`, ...)
    BinaryExpression {
        left: NodeIndex,
        operator: String,
        right: NodeIndex,
    },

    /// Prefix unary: `!x`, `-x`, `typeof x`, `++x`
    UnaryExpression {
        operator: String,
        operand: NodeIndex,
    },

    ConditionalExpression {
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    },

    ParenExpression {
        expression: NodeIndex,
    },

    CommaExpression {
        expressions: Vec<NodeIndex>,
    },

    /// `...expression` in an argument list or array literal
    SpreadExpression {
        expression: NodeIndex,
    },
}

impl NodeData {
    /// Stable kind name for diagnostics, tracing and internal errors.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            NodeData::Program { .. } => "Program",
            NodeData::Block { .. } => "Block",
            NodeData::VariableStatement { .. } => "VariableStatement",
            NodeData::VariableDeclaration { .. } => "VariableDeclaration",
            NodeData::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeData::ClassDeclaration { .. } => "ClassDeclaration",
            NodeData::ExpressionStatement { .. } => "ExpressionStatement",
            NodeData::ReturnStatement { .. } => "ReturnStatement",
            NodeData::IfStatement { .. } => "IfStatement",
            NodeData::WhileStatement { .. } => "WhileStatement",
            NodeData::ForStatement { .. } => "ForStatement",
            NodeData::ThrowStatement { .. } => "ThrowStatement",
            NodeData::TryStatement { .. } => "TryStatement",
            NodeData::CatchClause { .. } => "CatchClause",
            NodeData::EmptyStatement => "EmptyStatement",
            NodeData::BindingIdentifier { .. } => "BindingIdentifier",
            NodeData::FormalParameter { .. } => "FormalParameter",
            NodeData::IdentifierExpression { .. } => "IdentifierExpression",
            NodeData::ThisExpression => "ThisExpression",
            NodeData::SuperExpression => "SuperExpression",
            NodeData::Literal(_) => "Literal",
            NodeData::ArrayLiteral { .. } => "ArrayLiteral",
            NodeData::ObjectLiteral { .. } => "ObjectLiteral",
            NodeData::PropertyNameAssignment { .. } => "PropertyNameAssignment",
            NodeData::PropertyMethodAssignment { .. } => "PropertyMethodAssignment",
            NodeData::GetAccessor { .. } => "GetAccessor",
            NodeData::SetAccessor { .. } => "SetAccessor",
            NodeData::FunctionExpression { .. } => "FunctionExpression",
            NodeData::ArrowFunction { .. } => "ArrowFunction",
            NodeData::ClassExpression { .. } => "ClassExpression",
            NodeData::CallExpression { .. } => "CallExpression",
            NodeData::NewExpression { .. } => "NewExpression",
            NodeData::MemberExpression { .. } => "MemberExpression",
            NodeData::MemberLookupExpression { .. } => "MemberLookupExpression",
            NodeData::BinaryExpression { .. } => "BinaryExpression",
            NodeData::UnaryExpression { .. } => "UnaryExpression",
            NodeData::ConditionalExpression { .. } => "ConditionalExpression",
            NodeData::ParenExpression { .. } => "ParenExpression",
            NodeData::CommaExpression { .. } => "CommaExpression",
            NodeData::SpreadExpression { .. } => "SpreadExpression",
        }
    }

    /// Functions, arrows, methods and accessors: every node that owns a body
    /// with its own `var` scope.
    pub const fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeData::FunctionDeclaration { .. }
                | NodeData::FunctionExpression { .. }
                | NodeData::ArrowFunction { .. }
                | NodeData::PropertyMethodAssignment { .. }
                | NodeData::GetAccessor { .. }
                | NodeData::SetAccessor { .. }
        )
    }
}

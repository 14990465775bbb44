//! Compact JavaScript printer.
//!
//! Renders a tree as source text for tests and pipeline output. Parentheses
//! are printed only where the tree has a `ParenExpression`, so passes that
//! need grouping must synthesize one.

use crate::arena::NodeArena;
use crate::node::{Literal, NodeData, NodeIndex, PropertyName};

const INDENT: &str = "    ";

/// Print `idx` (and everything under it) as JavaScript.
pub fn print_node(arena: &NodeArena, idx: NodeIndex) -> String {
    let mut printer = Printer {
        arena,
        out: String::new(),
        indent: 0,
    };
    printer.emit(idx);
    printer.out
}

struct Printer<'a> {
    arena: &'a NodeArena,
    out: String,
    indent: usize,
}

impl Printer<'_> {
    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn emit_separated(&mut self, nodes: &[NodeIndex], separator: &str) {
        for (i, &idx) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            self.emit(idx);
        }
    }

    fn emit_statements(&mut self, statements: &[NodeIndex]) {
        for (i, &stmt) in statements.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.emit(stmt);
        }
    }

    fn emit_block(&mut self, statements: &[NodeIndex]) {
        if statements.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        self.newline();
        self.emit_statements(statements);
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn emit_params(&mut self, parameters: &[NodeIndex]) {
        self.write("(");
        self.emit_separated(parameters, ", ");
        self.write(")");
    }

    fn emit_property_name(&mut self, name: &PropertyName) {
        match name {
            PropertyName::Identifier(s) | PropertyName::NumericLiteral(s) => self.write(s),
            PropertyName::StringLiteral(s) => self.emit_string(s),
        }
    }

    fn emit_string(&mut self, value: &str) {
        self.out.push('"');
        for ch in value.chars() {
            match ch {
                '"' => self.write("\\\""),
                '\\' => self.write("\\\\"),
                '\n' => self.write("\\n"),
                _ => self.out.push(ch),
            }
        }
        self.out.push('"');
    }

    fn emit_class_parts(
        &mut self,
        name: Option<NodeIndex>,
        super_class: Option<NodeIndex>,
        members: &[NodeIndex],
    ) {
        self.write("class");
        if let Some(name) = name {
            self.write(" ");
            self.emit(name);
        }
        if let Some(super_class) = super_class {
            self.write(" extends ");
            self.emit(super_class);
        }
        self.write(" ");
        self.emit_block(members);
    }

    fn emit(&mut self, idx: NodeIndex) {
        let Some(node) = self.arena.get(idx) else {
            self.write("/* missing node */");
            return;
        };
        match &node.data {
            NodeData::Program { statements } => self.emit_statements(statements),
            NodeData::Block { statements } => self.emit_block(statements),
            NodeData::VariableStatement { kind, declarations } => {
                self.write(kind.as_str());
                self.write(" ");
                self.emit_separated(declarations, ", ");
                self.write(";");
            }
            NodeData::VariableDeclaration { name, initializer } => {
                self.emit(*name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit(*init);
                }
            }
            NodeData::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                self.write("function ");
                self.emit(*name);
                self.emit_params(parameters);
                self.write(" ");
                self.emit(*body);
            }
            NodeData::ClassDeclaration {
                name,
                super_class,
                members,
            } => self.emit_class_parts(Some(*name), *super_class, members),
            NodeData::ClassExpression {
                name,
                super_class,
                members,
            } => self.emit_class_parts(*name, *super_class, members),
            NodeData::ExpressionStatement { expression } => {
                self.emit(*expression);
                self.write(";");
            }
            NodeData::ReturnStatement { expression } => {
                self.write("return");
                if let Some(expr) = expression {
                    self.write(" ");
                    self.emit(*expr);
                }
                self.write(";");
            }
            NodeData::IfStatement {
                condition,
                then_statement,
                else_statement,
            } => {
                self.write("if (");
                self.emit(*condition);
                self.write(") ");
                self.emit(*then_statement);
                if let Some(else_stmt) = else_statement {
                    self.write(" else ");
                    self.emit(*else_stmt);
                }
            }
            NodeData::WhileStatement { condition, body } => {
                self.write("while (");
                self.emit(*condition);
                self.write(") ");
                self.emit(*body);
            }
            NodeData::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                self.write("for (");
                if let Some(init) = initializer {
                    self.emit(*init);
                    // A variable statement already printed its own `;`
                    if !self.out.ends_with(';') {
                        self.write(";");
                    }
                } else {
                    self.write(";");
                }
                if let Some(cond) = condition {
                    self.write(" ");
                    self.emit(*cond);
                }
                self.write(";");
                if let Some(incr) = incrementor {
                    self.write(" ");
                    self.emit(*incr);
                }
                self.write(") ");
                self.emit(*body);
            }
            NodeData::ThrowStatement { expression } => {
                self.write("throw ");
                self.emit(*expression);
                self.write(";");
            }
            NodeData::TryStatement {
                body,
                catch_clause,
                finally_block,
            } => {
                self.write("try ");
                self.emit(*body);
                if let Some(catch) = catch_clause {
                    self.write(" ");
                    self.emit(*catch);
                }
                if let Some(finally) = finally_block {
                    self.write(" finally ");
                    self.emit(*finally);
                }
            }
            NodeData::CatchClause { binding, body } => {
                self.write("catch (");
                self.emit(*binding);
                self.write(") ");
                self.emit(*body);
            }
            NodeData::EmptyStatement => self.write(";"),
            NodeData::BindingIdentifier { name } | NodeData::IdentifierExpression { name } => {
                self.write(name)
            }
            NodeData::FormalParameter {
                name,
                initializer,
                rest,
            } => {
                if *rest {
                    self.write("...");
                }
                self.emit(*name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit(*init);
                }
            }
            NodeData::ThisExpression => self.write("this"),
            NodeData::SuperExpression => self.write("super"),
            NodeData::Literal(lit) => match lit {
                Literal::Null => self.write("null"),
                Literal::Boolean(true) => self.write("true"),
                Literal::Boolean(false) => self.write("false"),
                Literal::Number(n) => self.write(n),
                Literal::String(s) => self.emit_string(s),
            },
            NodeData::ArrayLiteral { elements } => {
                self.write("[");
                self.emit_separated(elements, ", ");
                self.write("]");
            }
            NodeData::ObjectLiteral { properties } => {
                if properties.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{");
                self.indent += 1;
                for (i, &prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.write(",");
                    }
                    self.newline();
                    self.emit(prop);
                }
                self.indent -= 1;
                self.newline();
                self.write("}");
            }
            NodeData::PropertyNameAssignment { name, value } => {
                self.emit_property_name(name);
                self.write(": ");
                self.emit(*value);
            }
            NodeData::PropertyMethodAssignment {
                name,
                parameters,
                body,
            } => {
                self.emit_property_name(name);
                self.emit_params(parameters);
                self.write(" ");
                self.emit(*body);
            }
            NodeData::GetAccessor { name, body } => {
                self.write("get ");
                self.emit_property_name(name);
                self.write("() ");
                self.emit(*body);
            }
            NodeData::SetAccessor {
                name,
                parameter,
                body,
            } => {
                self.write("set ");
                self.emit_property_name(name);
                self.write("(");
                self.emit(*parameter);
                self.write(") ");
                self.emit(*body);
            }
            NodeData::FunctionExpression {
                name,
                parameters,
                body,
            } => {
                self.write("function");
                if let Some(name) = name {
                    self.write(" ");
                    self.emit(*name);
                } else {
                    self.write(" ");
                }
                self.emit_params(parameters);
                self.write(" ");
                self.emit(*body);
            }
            NodeData::ArrowFunction { parameters, body } => {
                self.emit_params(parameters);
                self.write(" => ");
                self.emit(*body);
            }
            NodeData::CallExpression { callee, arguments } => {
                self.emit(*callee);
                self.emit_params(arguments);
            }
            NodeData::NewExpression { callee, arguments } => {
                self.write("new ");
                self.emit(*callee);
                self.emit_params(arguments);
            }
            NodeData::MemberExpression { object, name } => {
                self.emit(*object);
                self.write(".");
                self.write(name);
            }
            NodeData::MemberLookupExpression { object, index } => {
                self.emit(*object);
                self.write("[");
                self.emit(*index);
                self.write("]");
            }
            NodeData::BinaryExpression {
                left,
                operator,
                right,
            } => {
                self.emit(*left);
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.emit(*right);
            }
            NodeData::UnaryExpression { operator, operand } => {
                self.write(operator);
                // Word operators need a separating space: `typeof x`, `void 0`
                if operator.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.write(" ");
                }
                self.emit(*operand);
            }
            NodeData::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                self.emit(*condition);
                self.write(" ? ");
                self.emit(*when_true);
                self.write(" : ");
                self.emit(*when_false);
            }
            NodeData::ParenExpression { expression } => {
                self.write("(");
                self.emit(*expression);
                self.write(")");
            }
            NodeData::CommaExpression { expressions } => self.emit_separated(expressions, ", "),
            NodeData::SpreadExpression { expression } => {
                self.write("...");
                self.emit(*expression);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/printer.rs"]
mod tests;

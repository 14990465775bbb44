use super::*;
use crate::node::VarKind;

#[test]
fn test_print_var_statement_with_call() {
    let mut arena = NodeArena::new();
    let runtime = arena.id("$runtime");
    let callee = arena.member(runtime, "createClass");
    let object = arena.object(vec![]);
    let null = arena.null();
    let f = arena.boolean(false);
    let call = arena.call(callee, vec![object, null, f]);
    let stmt = arena.var_statement(VarKind::Var, "Foo", Some(call));

    assert_eq!(
        print_node(&arena, stmt),
        "var Foo = $runtime.createClass({}, null, false);"
    );
}

#[test]
fn test_print_object_literal_members() {
    let mut arena = NodeArena::new();
    let this = arena.this();
    let x = arena.member(this, "x");
    let ret = arena.ret(Some(x));
    let body = arena.block(vec![ret]);
    let getter = arena.synth(NodeData::GetAccessor {
        name: PropertyName::Identifier("x".into()),
        body,
    });
    let empty = arena.block(vec![]);
    let func = arena.func_expr(vec![], empty);
    let ctor = arena.property("constructor", func);
    let object = arena.object(vec![ctor, getter]);

    assert_eq!(
        print_node(&arena, object),
        "{\n    constructor: function () {},\n    get x() {\n        return this.x;\n    }\n}"
    );
}

#[test]
fn test_print_string_escapes_and_spread() {
    let mut arena = NodeArena::new();
    let s = arena.string("a\"b");
    let args = arena.id("args");
    let spread = arena.spread(args);
    let array = arena.array(vec![s, spread]);
    assert_eq!(print_node(&arena, array), "[\"a\\\"b\", ...args]");
}

#[test]
fn test_print_word_unary_operator() {
    let mut arena = NodeArena::new();
    let x = arena.id("x");
    let typeof_x = arena.synth(NodeData::UnaryExpression {
        operator: "typeof".into(),
        operand: x,
    });
    let y = arena.id("y");
    let not_y = arena.synth(NodeData::UnaryExpression {
        operator: "!".into(),
        operand: y,
    });
    let both = arena.synth(NodeData::CommaExpression {
        expressions: vec![typeof_x, not_y],
    });
    assert_eq!(print_node(&arena, both), "typeof x, !y");
}

use super::*;
use lowerjs_ast::{PropertyName, print_node};
use lowerjs_common::diagnostics::diagnostic_codes;
use lowerjs_common::{DiagnosticBag, SourceRange};

fn method(arena: &mut NodeArena, name: &str, statements: Vec<NodeIndex>) -> NodeIndex {
    let body = arena.block(statements);
    arena.synth(NodeData::PropertyMethodAssignment {
        name: PropertyName::Identifier(name.to_string()),
        parameters: Vec::new(),
        body,
    })
}

fn rewrite(
    arena: &mut NodeArena,
    member: NodeIndex,
    kind: MemberKind,
    bag: &mut DiagnosticBag,
) -> (NodeIndex, bool) {
    let (result, used, _) = rewrite_with_temps(arena, member, kind, bag);
    (result, used)
}

/// Like `rewrite`, also returning the temps the member's scope must declare.
fn rewrite_with_temps(
    arena: &mut NodeArena,
    member: NodeIndex,
    kind: MemberKind,
    bag: &mut DiagnosticBag,
) -> (NodeIndex, bool, Vec<String>) {
    let runtime = Runtime::new("$runtime");
    let class_ref = arena.id("C");
    let mut temps = TempVarAllocator::new();
    temps.push_scope();
    let (result, used) = SuperTransformer::new(class_ref, &runtime, bag, &mut temps)
        .transform_member(arena, member, kind)
        .expect("super rewrite should succeed");
    (result, used, temps.pop_scope())
}

/// `super[key]`
fn super_lookup(arena: &mut NodeArena, key: NodeIndex) -> NodeIndex {
    let sup = arena.super_();
    arena.synth(NodeData::MemberLookupExpression {
        object: sup,
        index: key,
    })
}

/// `super.<name>` with a source location on the `super` keyword.
fn super_dot(arena: &mut NodeArena, name: &str, column: u32) -> NodeIndex {
    let sup = arena.add(
        NodeData::SuperExpression,
        Some(SourceRange::on_line(0, column, 5)),
    );
    arena.member(sup, name)
}

#[test]
fn method_call_becomes_super_call() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let callee = super_dot(&mut arena, "m", 4);
    let one = arena.number("1");
    let call = arena.call(callee, vec![one]);
    let ret = arena.ret(Some(call));
    let member = method(&mut arena, "m", vec![ret]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used);
    assert_ne!(result, member);
    assert!(bag.is_empty());
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"return $runtime.superCall(this, C, "m", [1]);"#),
        "got:\n{text}"
    );
}

#[test]
fn constructor_super_call_targets_constructor() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let sup = arena.super_();
    let a = arena.id("a");
    let call = arena.call(sup, vec![a]);
    let stmt = arena.expr_stmt(call);
    let member = method(&mut arena, "constructor", vec![stmt]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Constructor, &mut bag);

    assert!(used);
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"$runtime.superCall(this, C, "constructor", [a]);"#),
        "got:\n{text}"
    );
}

#[test]
fn spread_arguments_stay_spread() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let sup = arena.super_();
    let args = arena.id("args");
    let spread = arena.spread(args);
    let call = arena.call(sup, vec![spread]);
    let stmt = arena.expr_stmt(call);
    let member = method(&mut arena, "constructor", vec![stmt]);

    let (result, _) = rewrite(&mut arena, member, MemberKind::Constructor, &mut bag);

    let text = print_node(&arena, result);
    assert!(text.contains(r#""constructor", [...args])"#), "got:\n{text}");
}

#[test]
fn super_call_outside_constructor_is_reported() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let sup = arena.add(
        NodeData::SuperExpression,
        Some(SourceRange::on_line(2, 8, 5)),
    );
    let call = arena.call(sup, vec![]);
    let stmt = arena.expr_stmt(call);
    let member = method(&mut arena, "m", vec![stmt]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(!used);
    assert_eq!(result, member);
    assert_eq!(bag.len(), 1);
    let diag = &bag.diagnostics()[0];
    assert_eq!(diag.code, diagnostic_codes::SUPER_CALL_OUTSIDE_CONSTRUCTOR);
    assert_eq!(diag.range, Some(SourceRange::on_line(2, 8, 5)));
}

#[test]
fn misplaced_super_call_still_rewrites_its_arguments() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let sup = arena.add(
        NodeData::SuperExpression,
        Some(SourceRange::on_line(0, 8, 5)),
    );
    let read = super_dot(&mut arena, "x", 14);
    let call = arena.call(sup, vec![read]);
    let stmt = arena.expr_stmt(call);
    let member = method(&mut arena, "m", vec![stmt]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used, "the argument's super.x is a valid use");
    assert_eq!(bag.len(), 1);
    assert_eq!(
        bag.diagnostics()[0].code,
        diagnostic_codes::SUPER_CALL_OUTSIDE_CONSTRUCTOR
    );
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"super($runtime.superGet(this, C, "x"));"#),
        "got:\n{text}"
    );
}

#[test]
fn property_read_becomes_super_get() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let read = super_dot(&mut arena, "x", 11);
    let ret = arena.ret(Some(read));
    let getter_body = arena.block(vec![ret]);
    let getter = arena.synth(NodeData::GetAccessor {
        name: PropertyName::Identifier("x".to_string()),
        body: getter_body,
    });

    let (result, used) = rewrite(&mut arena, getter, MemberKind::Accessor, &mut bag);

    assert!(used);
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"return $runtime.superGet(this, C, "x");"#),
        "got:\n{text}"
    );
}

#[test]
fn assignment_becomes_super_set() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let target = super_dot(&mut arena, "x", 4);
    let value = arena.id("v");
    let assign = arena.assign(target, value);
    let stmt = arena.expr_stmt(assign);
    let member = method(&mut arena, "m", vec![stmt]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used);
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"$runtime.superSet(this, C, "x", v);"#),
        "got:\n{text}"
    );
}

#[test]
fn compound_assignment_reads_then_sets() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let target = super_dot(&mut arena, "n", 4);
    let step = arena.id("step");
    let assign = arena.binary(target, "+=", step);
    let stmt = arena.expr_stmt(assign);
    let member = method(&mut arena, "m", vec![stmt]);

    let (result, _, temps) =
        rewrite_with_temps(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(temps.is_empty(), "named keys need no temp: {temps:?}");
    let text = print_node(&arena, result);
    assert!(
        text.contains(
            r#"$runtime.superSet(this, C, "n", $runtime.superGet(this, C, "n") + step);"#
        ),
        "got:\n{text}"
    );
}

#[test]
fn increment_converts_to_number_before_adding() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let target = super_dot(&mut arena, "x", 6);
    let increment = arena.synth(NodeData::UnaryExpression {
        operator: "++".to_string(),
        operand: target,
    });
    let inc_stmt = arena.expr_stmt(increment);
    let target = super_dot(&mut arena, "y", 6);
    let decrement = arena.synth(NodeData::UnaryExpression {
        operator: "--".to_string(),
        operand: target,
    });
    let dec_stmt = arena.expr_stmt(decrement);
    let member = method(&mut arena, "m", vec![inc_stmt, dec_stmt]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used);
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"$runtime.superSet(this, C, "x", +$runtime.superGet(this, C, "x") + 1);"#),
        "got:\n{text}"
    );
    assert!(
        text.contains(r#"$runtime.superSet(this, C, "y", +$runtime.superGet(this, C, "y") - 1);"#),
        "got:\n{text}"
    );
}

#[test]
fn logical_assignment_only_sets_when_it_assigns() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let mut statements = Vec::new();
    for (name, operator) in [("a", "&&="), ("b", "||="), ("c", "??=")] {
        let target = super_dot(&mut arena, name, 4);
        let value = arena.id("v");
        let assign = arena.binary(target, operator, value);
        statements.push(arena.expr_stmt(assign));
    }
    let member = method(&mut arena, "m", statements);

    let (result, _) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    let text = print_node(&arena, result);
    for expected in [
        r#"$runtime.superGet(this, C, "a") && $runtime.superSet(this, C, "a", v);"#,
        r#"$runtime.superGet(this, C, "b") || $runtime.superSet(this, C, "b", v);"#,
        r#"$runtime.superGet(this, C, "c") ?? $runtime.superSet(this, C, "c", v);"#,
    ] {
        assert!(text.contains(expected), "missing {expected}\ngot:\n{text}");
    }
}

#[test]
fn computed_key_is_evaluated_once() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let k = arena.id("k");
    let key = arena.call(k, Vec::new());
    let target = super_lookup(&mut arena, key);
    let one = arena.number("1");
    let assign = arena.binary(target, "+=", one);
    let stmt = arena.expr_stmt(assign);
    let member = method(&mut arena, "m", vec![stmt]);

    let (result, used, temps) =
        rewrite_with_temps(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used);
    assert_eq!(temps, ["$__0"]);
    let text = print_node(&arena, result);
    assert!(
        text.contains(concat!(
            "($__0 = k(), ",
            r#"$runtime.superSet(this, C, $__0, $runtime.superGet(this, C, $__0) + 1));"#
        )),
        "got:\n{text}"
    );
    assert_eq!(text.matches("k()").count(), 1, "got:\n{text}");
}

#[test]
fn computed_key_increment_uses_one_temp_per_access() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let mut statements = Vec::new();
    for name in ["i", "j"] {
        let key = arena.id(name);
        let target = super_lookup(&mut arena, key);
        let increment = arena.synth(NodeData::UnaryExpression {
            operator: "++".to_string(),
            operand: target,
        });
        statements.push(arena.expr_stmt(increment));
    }
    let member = method(&mut arena, "m", statements);

    let (result, _, temps) =
        rewrite_with_temps(&mut arena, member, MemberKind::Method, &mut bag);

    assert_eq!(temps, ["$__0", "$__1"]);
    let text = print_node(&arena, result);
    assert!(
        text.contains(concat!(
            "($__1 = j, ",
            r#"$runtime.superSet(this, C, $__1, +$runtime.superGet(this, C, $__1) + 1));"#
        )),
        "got:\n{text}"
    );
}

#[test]
fn computed_member_call_uses_key_expression() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let sup = arena.super_();
    let key = arena.id("key");
    let lookup = arena.synth(NodeData::MemberLookupExpression {
        object: sup,
        index: key,
    });
    let call = arena.call(lookup, vec![]);
    let stmt = arena.expr_stmt(call);
    let member = method(&mut arena, "m", vec![stmt]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used);
    let text = print_node(&arena, result);
    assert!(
        text.contains("$runtime.superCall(this, C, key, []);"),
        "got:\n{text}"
    );
}

#[test]
fn arrow_functions_are_rewritten() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let read = super_dot(&mut arena, "x", 10);
    let arrow = arena.synth(NodeData::ArrowFunction {
        parameters: Vec::new(),
        body: read,
    });
    let ret = arena.ret(Some(arrow));
    let member = method(&mut arena, "m", vec![ret]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(used);
    assert!(bag.is_empty());
    let text = print_node(&arena, result);
    assert!(
        text.contains(r#"() => $runtime.superGet(this, C, "x")"#),
        "got:\n{text}"
    );
}

#[test]
fn nested_function_super_is_reported_and_kept() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let read = super_dot(&mut arena, "x", 20);
    let ret = arena.ret(Some(read));
    let body = arena.block(vec![ret]);
    let function = arena.func_expr(Vec::new(), body);
    let outer_ret = arena.ret(Some(function));
    let member = method(&mut arena, "m", vec![outer_ret]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(!used);
    assert_eq!(result, member);
    assert_eq!(bag.len(), 1);
    let diag = &bag.diagnostics()[0];
    assert_eq!(diag.code, diagnostic_codes::SUPER_OUTSIDE_CLASS_MEMBER);
    assert_eq!(diag.range, Some(SourceRange::on_line(0, 20, 5)));
}

#[test]
fn bare_super_is_reported() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let sup = arena.add(
        NodeData::SuperExpression,
        Some(SourceRange::on_line(1, 6, 5)),
    );
    let f = arena.id("f");
    let call = arena.call(f, vec![sup]);
    let stmt = arena.expr_stmt(call);
    let member = method(&mut arena, "m", vec![stmt]);

    let (_, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(!used);
    assert_eq!(bag.len(), 1);
    assert_eq!(
        bag.diagnostics()[0].code,
        diagnostic_codes::SUPER_MUST_BE_CALLED_OR_ACCESSED
    );
}

#[test]
fn member_without_super_is_unchanged() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let this = arena.this();
    let read = arena.member(this, "x");
    let ret = arena.ret(Some(read));
    let member = method(&mut arena, "m", vec![ret]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(!used);
    assert_eq!(result, member);
}

#[test]
fn nested_class_body_is_left_alone() {
    let mut arena = NodeArena::new();
    let mut bag = DiagnosticBag::new();
    let inner_read = super_dot(&mut arena, "y", 30);
    let inner_ret = arena.ret(Some(inner_read));
    let inner_method = method(&mut arena, "n", vec![inner_ret]);
    let base = arena.id("Base");
    let inner = arena.synth(NodeData::ClassExpression {
        name: None,
        super_class: Some(base),
        members: vec![inner_method],
    });
    let ret = arena.ret(Some(inner));
    let member = method(&mut arena, "m", vec![ret]);

    let (result, used) = rewrite(&mut arena, member, MemberKind::Method, &mut bag);

    assert!(!used);
    assert_eq!(result, member);
    assert!(bag.is_empty());
}

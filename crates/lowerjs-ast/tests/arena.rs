use super::*;
use lowerjs_common::SourceRange;

#[test]
fn test_add_returns_sequential_indices() {
    let mut arena = NodeArena::new();
    let a = arena.id("a");
    let b = arena.id("b");
    assert_eq!(a, NodeIndex(0));
    assert_eq!(b, NodeIndex(1));
    assert_eq!(arena.len(), 2);
}

#[test]
fn test_synthesized_nodes_have_no_location() {
    let mut arena = NodeArena::new();
    let synthesized = arena.id("tmp");
    let user = arena.add(
        NodeData::IdentifierExpression {
            name: "x".to_string(),
        },
        Some(SourceRange::on_line(0, 4, 1)),
    );
    assert_eq!(arena.loc(synthesized), None);
    assert_eq!(arena.loc(user), Some(SourceRange::on_line(0, 4, 1)));
}

#[test]
fn test_missing_node_is_internal_error() {
    let arena = NodeArena::new();
    let err = arena.node(NodeIndex(7)).expect_err("index 7 does not exist");
    assert_eq!(err, InternalError::MissingNode { index: 7 });
}

#[test]
fn test_identifier_text() {
    let mut arena = NodeArena::new();
    let binding = arena.binding("x");
    let reference = arena.id("y");
    let this = arena.this();
    assert_eq!(arena.identifier_text(binding), Ok("x"));
    assert_eq!(arena.identifier_text(reference), Ok("y"));
    assert!(matches!(
        arena.identifier_text(this),
        Err(InternalError::UnexpectedNode {
            found: "ThisExpression",
            ..
        })
    ));
}

#[test]
fn test_var_names_builds_single_statement() {
    let mut arena = NodeArena::new();
    let stmt = arena.var_names(["$__0", "$__1"]);
    let node = arena.node(stmt).expect("statement exists");
    let NodeData::VariableStatement { kind, declarations } = &node.data else {
        panic!("expected variable statement, got {:?}", node.data);
    };
    assert_eq!(*kind, VarKind::Var);
    assert_eq!(declarations.len(), 2);
}

#[test]
fn test_property_name_constructor_detection() {
    assert!(PropertyName::Identifier("constructor".into()).is_constructor());
    assert!(PropertyName::StringLiteral("constructor".into()).is_constructor());
    assert!(!PropertyName::NumericLiteral("0".into()).is_constructor());
    assert!(!PropertyName::Identifier("construct".into()).is_constructor());
}

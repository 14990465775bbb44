use super::*;
use crate::position::Position;

#[test]
fn test_format_message_substitutes_positional_args() {
    assert_eq!(format_message("{0} is not defined", &["foo"]), "foo is not defined");
    assert_eq!(format_message("{1} before {0}", &["a", "b"]), "b before a");
    assert_eq!(format_message("no placeholders", &["x"]), "no placeholders");
}

#[test]
fn test_bag_accumulates_and_counts_errors() {
    let mut bag = DiagnosticBag::with_file("main.js");
    let range = SourceRange::on_line(2, 4, 3);
    bag.report(Some(range), &diagnostic_messages::NAME_IS_NOT_DEFINED, &["foo"]);
    bag.report(None, &diagnostic_messages::NAME_IS_NOT_DEFINED, &["bar"]);

    assert_eq!(bag.len(), 2);
    assert_eq!(bag.error_count(), 2);
    assert!(bag.has_errors());

    let first = &bag.diagnostics()[0];
    assert_eq!(first.file, "main.js");
    assert_eq!(first.message_text, "foo is not defined");
    assert_eq!(first.code, diagnostic_codes::NAME_IS_NOT_DEFINED);
    assert_eq!(first.range.map(|r| r.start), Some(Position::new(2, 4)));
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(
        "main.js",
        Some(SourceRange::on_line(0, 6, 1)),
        "x is not defined",
        diagnostic_codes::NAME_IS_NOT_DEFINED,
    );
    assert_eq!(diag.to_string(), "main.js(1:7): error LJS5001: x is not defined");
}

#[test]
fn test_message_table_lookup() {
    let msg = get_diagnostic_message(diagnostic_codes::SUPER_CALL_OUTSIDE_CONSTRUCTOR)
        .expect("message should be registered");
    assert_eq!(msg.category, DiagnosticCategory::Error);
    assert!(get_diagnostic_message(1).is_none());
}

#[test]
fn test_diagnostic_serializes_without_missing_range() {
    let diag = Diagnostic::error("a.js", None, "oops", 1);
    let json = serde_json::to_string(&diag).expect("serialize diagnostic");
    assert!(!json.contains("range"));
    assert!(json.contains("\"message_text\":\"oops\""));
}

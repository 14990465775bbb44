//! Default ambient environment.

/// Names visible without a declaration in an ES5 global environment.
pub const DEFAULT_GLOBALS: &[&str] = &[
    // Value properties
    "Infinity",
    "NaN",
    "undefined",
    // Function properties
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "escape",
    "eval",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "unescape",
    // Constructors
    "Array",
    "Boolean",
    "Date",
    "Error",
    "EvalError",
    "Function",
    "Number",
    "Object",
    "RangeError",
    "ReferenceError",
    "RegExp",
    "String",
    "SyntaxError",
    "TypeError",
    "URIError",
    // Namespaces
    "JSON",
    "Math",
];

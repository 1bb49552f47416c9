//! C# identifier rules used for accessor, class and namespace names.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Letter or underscore start, then letters, digits, connectors, combining and formatting marks.
    static ref IDENTIFIER_REGEX: Regex =
        Regex::new(r"^[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Nd}\p{Pc}\p{Mn}\p{Mc}\p{Cf}]*$").unwrap();
    static ref INVALID_SEGMENT_CHARS: Regex =
        Regex::new(r"[^\p{L}\p{Nl}\p{Nd}\p{Pc}\p{Mn}\p{Mc}\p{Cf}]").unwrap();

    /// Reserved words that need the verbatim `@` prefix to be used as identifiers.
    static ref KEYWORDS: HashSet<&'static str> = [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
        "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
        "using", "virtual", "void", "volatile", "while",
    ]
    .into_iter()
    .collect();
}

/// Returns true when `name` can be written as a C# identifier (optionally after `@`).
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(name)
}

/// Renders `name` as it must appear in source: keywords get the verbatim `@` prefix.
///
/// Returns `None` when `name` is not a valid identifier at all.
pub fn escape_identifier(name: &str) -> Option<String> {
    if !is_valid_identifier(name) {
        return None;
    }
    if is_keyword(name) {
        Some(format!("@{name}"))
    } else {
        Some(name.to_string())
    }
}

/// Renders a dotted name (`App.Resources`) segment by segment.
pub fn escape_qualified_name(name: &str) -> Option<String> {
    name.split('.')
        .map(escape_identifier)
        .collect::<Option<Vec<_>>>()
        .map(|segments| segments.join("."))
}

/// Turns an arbitrary directory or file name into a usable namespace segment.
///
/// Invalid characters become `_` and a leading digit gets an `_` prefix, the way
/// MSBuild derives manifest resource names.
pub fn sanitize_segment(segment: &str) -> String {
    let mut sanitized = INVALID_SEGMENT_CHARS.replace_all(segment, "_").into_owned();
    if sanitized
        .chars()
        .next()
        .is_none_or(|c| !(c.is_alphabetic() || c == '_'))
    {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// Renders `value` as a regular C# string literal.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            '\0' => literal.push_str("\\0"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04x}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

//! Synthesis of one documented string accessor per resource entry.

use quick_xml::escape::escape;

use crate::{
    error::Error,
    ident,
    types::{ResourceEntry, StringAccessor},
};

/// Prefix of the first summary line.
pub const SUMMARY_PREFIX: &str = "Looks up a localized string similar to ";

/// Property exposing the cached lookup object.
pub const RESOURCE_MANAGER_PROPERTY: &str = "ResourceManager";

/// Property holding the culture override passed to every lookup.
pub const CULTURE_PROPERTY: &str = "CultureInfo";

/// Builds the accessor for `entry`.
///
/// The key is referenced through `nameof(<accessor>)` in the generated body, so the
/// accessor name is the key itself (keywords get the `@` prefix, which `nameof` drops).
///
/// Keys coming from [`ResxReader`](crate::ResxReader) are already validated against the
/// element's byte offset. An entry built by hand with an invalid key fails here with an
/// [`Error::InputFormat`] at position 0, since it has no place in any document.
pub fn synthesize(entry: &ResourceEntry) -> Result<StringAccessor, Error> {
    let identifier = ident::escape_identifier(&entry.key).ok_or_else(|| {
        Error::input_format(
            0,
            format!("resource key `{}` is not a valid identifier", entry.key),
        )
    })?;

    Ok(StringAccessor {
        identifier,
        key: entry.key.clone(),
        doc: summary_lines(&entry.value),
        lookup_member: RESOURCE_MANAGER_PROPERTY.to_string(),
        culture_member: CULTURE_PROPERTY.to_string(),
    })
}

/// Produces the `<summary>` body lines for a resource value.
///
/// Trims, folds every line terminator C# recognises into `\n`, XML-escapes, then splits
/// so each visible line becomes its own `///` line. The first line carries
/// [`SUMMARY_PREFIX`] and the last one the closing period.
pub fn summary_lines(value: &str) -> Vec<String> {
    let normalized = normalize_line_endings(value.trim());
    let escaped = escape(normalized.as_str());

    let mut lines: Vec<String> = escaped.split('\n').map(str::to_string).collect();
    if let Some(first) = lines.first_mut() {
        first.insert_str(0, SUMMARY_PREFIX);
    }
    if let Some(last) = lines.last_mut() {
        last.push('.');
    }
    lines
}

fn normalize_line_endings(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace(['\r', '\u{85}', '\u{2028}', '\u{2029}'], "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_summary() {
        assert_eq!(
            summary_lines("Hello, world!"),
            vec!["Looks up a localized string similar to Hello, world!."]
        );
    }

    #[test]
    fn test_empty_value_summary() {
        assert_eq!(
            summary_lines(""),
            vec!["Looks up a localized string similar to ."]
        );
        assert_eq!(
            summary_lines(" \r\n\t "),
            vec!["Looks up a localized string similar to ."]
        );
    }

    #[test]
    fn test_crlf_is_split_into_lines() {
        assert_eq!(
            summary_lines("Line1\r\nLine2"),
            vec!["Looks up a localized string similar to Line1", "Line2."]
        );
    }

    #[test]
    fn test_mixed_line_endings() {
        let lines = summary_lines("a\rb\nc\r\nd\u{2028}e");
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| !l.contains(['\r', '\n', '\u{2028}'])));
    }

    #[test]
    fn test_blank_lines_are_kept() {
        assert_eq!(
            summary_lines("first\n\nthird"),
            vec!["Looks up a localized string similar to first", "", "third."]
        );
    }

    #[test]
    fn test_markup_is_escaped() {
        assert_eq!(
            summary_lines(r#"<b>"Tom" & 'Jerry'</b>"#),
            vec![
                "Looks up a localized string similar to &lt;b&gt;&quot;Tom&quot; &amp; &apos;Jerry&apos;&lt;/b&gt;."
            ]
        );
    }

    #[test]
    fn test_trim_happens_before_split() {
        assert_eq!(
            summary_lines("\n  indented\n"),
            vec!["Looks up a localized string similar to indented."]
        );
    }

    #[test]
    fn test_synthesize_keyword_key() {
        let accessor = synthesize(&ResourceEntry::new("class", "x")).unwrap();
        assert_eq!(accessor.identifier, "@class");
        assert_eq!(accessor.lookup_key(), "class");
        assert_eq!(accessor.lookup_member, "ResourceManager");
        assert_eq!(accessor.culture_member, "CultureInfo");
    }

    #[test]
    fn test_synthesize_rejects_invalid_key() {
        let err = synthesize(&ResourceEntry::new("not valid", "x")).unwrap_err();
        assert!(matches!(err, Error::InputFormat { position: 0, .. }));
    }
}

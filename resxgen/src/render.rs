//! Rendering of a [`CompilationUnit`] to canonical C# text.
//!
//! Output is fully determined by the unit and the [`RenderOptions`]: four-space
//! indentation, braces on their own lines, one blank line between class members, no
//! trailing whitespace and exactly one final line break.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    ident::string_literal,
    types::{CompilationUnit, MemberDecl, StringAccessor},
};

const INDENT: &str = "    ";

/// Line break written between output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    /// What the .NET toolchain writes by default.
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "lf"),
            LineEnding::CrLf => write!(f, "crlf"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lf" | "unix" => Ok(LineEnding::Lf),
            "crlf" | "windows" => Ok(LineEnding::CrLf),
            _ => Err(format!("Unknown line ending: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub line_ending: LineEnding,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}

/// Collects lines at a tracked indentation level.
struct LineBuffer {
    lines: Vec<String>,
    level: usize,
}

impl LineBuffer {
    fn push(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.lines.push(String::new());
        } else {
            let indented = format!("{}{}", INDENT.repeat(self.level), line);
            self.lines.push(indented.trim_end().to_string());
        }
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn open(&mut self) {
        self.push("{");
        self.level += 1;
    }

    fn close(&mut self) {
        self.level -= 1;
        self.push("}");
    }
}

/// Renders `unit` to source text.
pub fn render(unit: &CompilationUnit, options: &RenderOptions) -> String {
    let mut out = LineBuffer {
        lines: Vec::new(),
        level: 0,
    };

    for line in unit.banner.lines() {
        out.push(line);
    }
    out.blank();
    if unit.nullable_enabled {
        out.push("#nullable enable");
        out.blank();
    }

    let namespace = &unit.namespace;
    out.push(format!("namespace {}", namespace.name));
    out.open();
    for using in &namespace.usings {
        out.push(format!("using {using};"));
    }
    if !namespace.usings.is_empty() {
        out.blank();
    }

    let class = &namespace.class;
    out.push(format!("public static class {}", class.name));
    out.open();
    for (i, member) in class.members.iter().enumerate() {
        if i > 0 {
            out.blank();
        }
        render_member(&mut out, member);
    }
    out.close();
    out.close();

    let eol = options.line_ending.as_str();
    let mut text = out.lines.join(eol);
    text.push_str(eol);
    text
}

fn render_member(out: &mut LineBuffer, member: &MemberDecl) {
    match member {
        MemberDecl::LookupField { field } => {
            out.push(format!("private static ResourceManager? {field};"));
        }
        MemberDecl::LookupAccessor {
            name,
            field,
            identity,
            owner_type,
        } => {
            out.push(format!(
                "public static ResourceManager {name} => {field} ??= new ResourceManager({}, typeof({owner_type}).Assembly);",
                string_literal(identity)
            ));
        }
        MemberDecl::CultureAccessor { name } => {
            out.push(format!("public static CultureInfo? {name} {{ get; set; }}"));
        }
        MemberDecl::StringAccessor(accessor) => render_accessor(out, accessor),
    }
}

fn render_accessor(out: &mut LineBuffer, accessor: &StringAccessor) {
    out.push("/// <summary>");
    for line in &accessor.doc {
        out.push(format!("/// {line}"));
    }
    out.push("/// </summary>");
    out.push(format!(
        "public static string? {id} => {lookup}.GetString(nameof({id}), {culture});",
        id = accessor.identifier,
        lookup = accessor.lookup_member,
        culture = accessor.culture_member,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assemble::assemble,
        member::synthesize,
        options::GeneratorOptions,
        types::ResourceEntry,
    };

    fn unit(entries: &[ResourceEntry]) -> CompilationUnit {
        let accessors = entries.iter().map(|e| synthesize(e).unwrap()).collect();
        assemble(&GeneratorOptions::new("App.Resources", "Strings"), accessors).unwrap()
    }

    #[test]
    fn test_line_ending_from_str() {
        assert_eq!("LF".parse::<LineEnding>().unwrap(), LineEnding::Lf);
        assert_eq!("crlf".parse::<LineEnding>().unwrap(), LineEnding::CrLf);
        assert!("cr".parse::<LineEnding>().is_err());
        assert_eq!(LineEnding::CrLf.to_string(), "crlf");
    }

    #[test]
    fn test_blank_doc_lines_have_no_trailing_whitespace() {
        let text = render(
            &unit(&[ResourceEntry::new("Paragraphs", "one\n\ntwo")]),
            &RenderOptions::default(),
        );
        assert!(text.contains("        /// Looks up a localized string similar to one\n        ///\n        /// two.\n"));
        assert!(text.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn test_crlf_output() {
        let text = render(
            &unit(&[ResourceEntry::new("A", "a")]),
            &RenderOptions::new().with_line_ending(LineEnding::CrLf),
        );
        assert!(text.ends_with("}\r\n"));
        assert!(!text.replace("\r\n", "").contains(['\r', '\n']));
    }

    #[test]
    fn test_single_final_newline() {
        let text = render(&unit(&[]), &RenderOptions::default());
        assert!(text.ends_with("}\n}\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_members_separated_by_one_blank_line() {
        let text = render(
            &unit(&[ResourceEntry::new("A", "a"), ResourceEntry::new("B", "b")]),
            &RenderOptions::default(),
        );
        assert!(!text.contains("\n\n\n"));
        assert!(text.contains("nameof(A), CultureInfo);\n\n        /// <summary>"));
    }
}

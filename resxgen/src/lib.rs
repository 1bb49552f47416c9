#![forbid(unsafe_code)]
//! Strongly-typed C# accessors for `.resx` localization files.
//!
//! Reads the `<data>` entries of a resource file and generates one C# static class with
//! a documented `string?` accessor per key, backed by a lazily created
//! `System.Resources.ResourceManager` and an optional culture override.
//!
//! # Quick Start
//!
//! ```rust
//! use resxgen::{GeneratorOptions, generate};
//!
//! let xml = r#"<root><data name="Greeting"><value>Hello, world!</value></data></root>"#;
//! let source = generate(xml.as_bytes(), GeneratorOptions::new("App.Resources", "Strings"))?;
//!
//! assert!(source.contains("namespace App.Resources"));
//! assert!(source.contains("/// Looks up a localized string similar to Hello, world!."));
//! assert!(source.contains(
//!     "public static string? Greeting => ResourceManager.GetString(nameof(Greeting), CultureInfo);"
//! ));
//! # Ok::<(), resxgen::Error>(())
//! ```
//!
//! # Pipeline
//!
//! - [`resx`]: streams `(key, value)` entries out of the XML document
//! - [`member`]: turns each entry into a documented accessor
//! - [`assemble`]: wraps accessors in the namespace and static class
//! - [`render`]: prints the unit with canonical, deterministic whitespace
//!
//! Regenerating from unchanged input and options always yields byte-identical text.

pub mod assemble;
pub mod culture;
pub mod error;
pub mod generator;
pub mod ident;
pub mod member;
pub mod options;
pub mod render;
pub mod resx;
pub mod sink;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    generator::{Generator, generate, generate_file},
    options::GeneratorOptions,
    render::{LineEnding, RenderOptions},
    resx::ResxReader,
    types::{CompilationUnit, MemberDecl, ResourceEntry, StringAccessor},
};

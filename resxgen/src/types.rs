//! Core types shared by the extraction, synthesis and rendering stages.
//!
//! Extraction decodes into [`ResourceEntry`]; synthesis and assembly build a
//! [`CompilationUnit`], which is rendered to text as the last step.

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    render::{RenderOptions, render},
};

/// A single `<data>` entry of a resource file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceEntry {
    /// The `name` attribute. Becomes the accessor name.
    pub key: String,

    /// Text of the first `<value>` child, unescaped but otherwise untouched.
    pub value: String,
}

impl ResourceEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The generated source file as a tree of declarations, prior to text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Comment block emitted verbatim at the top of the file.
    pub banner: &'static str,

    /// Whether `#nullable enable` follows the banner.
    pub nullable_enabled: bool,

    pub namespace: NamespaceDecl,
}

impl CompilationUnit {
    /// Renders the unit with the default [`RenderOptions`].
    pub fn to_source(&self) -> String {
        render(self, &RenderOptions::default())
    }

    /// Renders the unit with explicit formatting options.
    pub fn to_source_with(&self, options: &RenderOptions) -> String {
        render(self, options)
    }

    /// All string accessors in declaration order.
    pub fn accessors(&self) -> impl Iterator<Item = &StringAccessor> {
        self.namespace
            .class
            .members
            .iter()
            .filter_map(|member| match member {
                MemberDecl::StringAccessor(accessor) => Some(accessor),
                _ => None,
            })
    }

    /// Checks that every accessor resolves to the resource key it was generated from.
    ///
    /// The generated lookup passes `nameof(<accessor>)`, so an accessor whose name no
    /// longer equals its key would look up the wrong resource.
    pub fn verify_key_mapping(&self) -> Result<(), Error> {
        for accessor in self.accessors() {
            if accessor.lookup_key() != accessor.key {
                return Err(Error::invalid_options(format!(
                    "accessor `{}` resolves to key `{}` but was generated from `{}`",
                    accessor.identifier,
                    accessor.lookup_key(),
                    accessor.key
                )));
            }
        }
        Ok(())
    }
}

/// `namespace X { using ...; class ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Source form of the namespace name (keyword segments already `@`-escaped).
    pub name: String,
    pub usings: Vec<String>,
    pub class: ClassDecl,
}

/// `public static class X { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Source form of the class name.
    pub name: String,
    pub members: Vec<MemberDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl {
    /// `private static ResourceManager? <field>;`
    LookupField { field: String },

    /// Lazily constructs the lookup object on first access and caches it in `field`.
    LookupAccessor {
        name: String,
        field: String,
        /// Manifest name passed to the lookup object, `<localNamespace>.<className>`.
        identity: String,
        /// Type whose assembly holds the embedded resources.
        owner_type: String,
    },

    /// `public static CultureInfo? <name> { get; set; }`
    CultureAccessor { name: String },

    StringAccessor(StringAccessor),
}

/// A read-only accessor returning the localized value of one resource key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringAccessor {
    /// Source form of the member name (possibly `@`-escaped).
    pub identifier: String,

    /// The resource key the accessor was generated from.
    pub key: String,

    /// Documentation summary lines, already escaped.
    pub doc: Vec<String>,

    pub lookup_member: String,
    pub culture_member: String,
}

impl StringAccessor {
    /// The key the generated `nameof(...)` lookup evaluates to.
    pub fn lookup_key(&self) -> &str {
        self.identifier.strip_prefix('@').unwrap_or(&self.identifier)
    }
}

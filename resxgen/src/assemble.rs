//! Wraps synthesized accessors into the namespace and static class.

use indoc::indoc;

use crate::{
    error::Error,
    member::{CULTURE_PROPERTY, RESOURCE_MANAGER_PROPERTY},
    options::GeneratorOptions,
    types::{ClassDecl, CompilationUnit, MemberDecl, NamespaceDecl, StringAccessor},
};

/// Banner marking the file as tool output.
pub const AUTO_GENERATED_BANNER: &str = indoc! {"
    // ------------------------------------------------------------------------------
    // <auto-generated>
    //     This code was generated by a tool.
    //
    //     Changes to this file may cause incorrect behavior and will be lost if
    //     the code is regenerated.
    // </auto-generated>
    // ------------------------------------------------------------------------------
"};

pub const USINGS: [&str; 2] = ["System.Globalization", "System.Resources"];

/// Backing field of the cached lookup object.
pub const RESOURCE_MANAGER_FIELD: &str = "s_resourceManager";

/// Builds the compilation unit around `accessors`.
///
/// The lookup accessor is `field ??= new ...`: no lock is taken, so threads racing on
/// first access may each construct a lookup object and the last store wins. The
/// constructions are equivalent and free of side effects, which makes the race benign.
pub fn assemble(
    options: &GeneratorOptions,
    accessors: Vec<StringAccessor>,
) -> Result<CompilationUnit, Error> {
    let names = options.emitted_names()?;

    for accessor in &accessors {
        let name = accessor.lookup_key();
        if name == options.class_name
            || name == RESOURCE_MANAGER_PROPERTY
            || name == CULTURE_PROPERTY
            || name == RESOURCE_MANAGER_FIELD
        {
            tracing::warn!(
                key = %accessor.key,
                class = %options.class_name,
                "accessor name collides with a member of the generated class"
            );
        }
    }

    let mut members = Vec::with_capacity(accessors.len() + 3);
    members.push(MemberDecl::LookupField {
        field: RESOURCE_MANAGER_FIELD.to_string(),
    });
    members.push(MemberDecl::LookupAccessor {
        name: RESOURCE_MANAGER_PROPERTY.to_string(),
        field: RESOURCE_MANAGER_FIELD.to_string(),
        identity: options.resource_identity(),
        owner_type: names.class.clone(),
    });
    members.push(MemberDecl::CultureAccessor {
        name: CULTURE_PROPERTY.to_string(),
    });
    members.extend(accessors.into_iter().map(MemberDecl::StringAccessor));

    tracing::debug!(
        namespace = %names.namespace,
        class = %names.class,
        members = members.len(),
        "assembled compilation unit"
    );

    Ok(CompilationUnit {
        banner: AUTO_GENERATED_BANNER,
        nullable_enabled: true,
        namespace: NamespaceDecl {
            name: names.namespace,
            usings: USINGS.iter().map(|u| u.to_string()).collect(),
            class: ClassDecl {
                name: names.class,
                members,
            },
        },
    })
}

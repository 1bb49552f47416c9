//! Options controlling names in the generated unit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::Error, ident};

/// The three host-supplied strings that shape the generated unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct GeneratorOptions {
    /// Namespace the resources are embedded under; used for the lookup-object identity.
    pub local_namespace: String,

    /// Overrides the emitted namespace when present and not blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tool_namespace: Option<String>,

    /// Name of the generated static class.
    pub class_name: String,
}

/// Source forms of the names, validated and keyword-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EmittedNames {
    pub namespace: String,
    pub class: String,
}

impl GeneratorOptions {
    pub fn new(local_namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            local_namespace: local_namespace.into(),
            custom_tool_namespace: None,
            class_name: class_name.into(),
        }
    }

    /// Sets the namespace override.
    pub fn with_custom_tool_namespace(mut self, namespace: Option<String>) -> Self {
        self.custom_tool_namespace = namespace;
        self
    }

    /// Derives options from a resource file path the way project tooling does.
    ///
    /// The class name is the file stem; the local namespace is `root_namespace`
    /// followed by the directories between `project_dir` and the file.
    pub fn from_resx_path<P: AsRef<Path>>(
        path: P,
        root_namespace: &str,
        project_dir: Option<&Path>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::invalid_options(format!(
                    "cannot derive a class name from `{}`",
                    path.display()
                ))
            })?;

        let mut segments: Vec<String> = root_namespace
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if let (Some(project_dir), Some(parent)) = (project_dir, path.parent()) {
            if let Ok(relative) = parent.strip_prefix(project_dir) {
                segments.extend(
                    relative
                        .components()
                        .filter_map(|c| c.as_os_str().to_str())
                        .filter(|c| *c != ".")
                        .map(ident::sanitize_segment),
                );
            }
        }

        Ok(Self::new(segments.join("."), ident::sanitize_segment(stem)))
    }

    /// The namespace wrapping the generated class.
    pub fn emitted_namespace(&self) -> &str {
        self.custom_tool_namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .unwrap_or(&self.local_namespace)
    }

    /// Manifest name the lookup object resolves embedded resources by.
    pub fn resource_identity(&self) -> String {
        if self.local_namespace.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.local_namespace, self.class_name)
        }
    }

    /// File identity of the generated unit, e.g. `App.Resources.Strings.g.cs`.
    pub fn hint_name(&self) -> String {
        format!("{}.g.cs", self.resource_identity())
    }

    pub(crate) fn emitted_names(&self) -> Result<EmittedNames, Error> {
        let class = ident::escape_identifier(&self.class_name).ok_or_else(|| {
            Error::invalid_options(format!(
                "class name `{}` is not a valid identifier",
                self.class_name
            ))
        })?;

        let namespace = self.emitted_namespace();
        if namespace.is_empty() {
            return Err(Error::invalid_options(
                "no namespace given: both the local and the custom tool namespace are empty",
            ));
        }
        let namespace = ident::escape_qualified_name(namespace).ok_or_else(|| {
            Error::invalid_options(format!("namespace `{namespace}` is not a valid name"))
        })?;

        Ok(EmittedNames { namespace, class })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitted_namespace_precedence() {
        let options = GeneratorOptions::new("App.Resources", "Strings");
        assert_eq!(options.emitted_namespace(), "App.Resources");

        let options = options.with_custom_tool_namespace(Some("Custom.Ns".to_string()));
        assert_eq!(options.emitted_namespace(), "Custom.Ns");
        assert_eq!(options.resource_identity(), "App.Resources.Strings");
    }

    #[test]
    fn test_blank_custom_namespace_is_ignored() {
        let options = GeneratorOptions::new("App.Resources", "Strings")
            .with_custom_tool_namespace(Some("  ".to_string()));
        assert_eq!(options.emitted_namespace(), "App.Resources");
    }

    #[test]
    fn test_hint_name() {
        assert_eq!(
            GeneratorOptions::new("App.Resources", "Strings").hint_name(),
            "App.Resources.Strings.g.cs"
        );
        assert_eq!(GeneratorOptions::new("", "Strings").hint_name(), "Strings.g.cs");
    }

    #[test]
    fn test_from_resx_path() {
        let options = GeneratorOptions::from_resx_path(
            Path::new("/src/app/Resources/my-strings/Errors.resx"),
            "App",
            Some(Path::new("/src/app")),
        )
        .unwrap();
        assert_eq!(options.local_namespace, "App.Resources.my_strings");
        assert_eq!(options.class_name, "Errors");
        assert_eq!(options.custom_tool_namespace, None);
    }

    #[test]
    fn test_from_resx_path_outside_project() {
        let options = GeneratorOptions::from_resx_path(
            Path::new("/elsewhere/Strings.resx"),
            "App",
            Some(Path::new("/src/app")),
        )
        .unwrap();
        assert_eq!(options.local_namespace, "App");
        assert_eq!(options.class_name, "Strings");
    }

    #[test]
    fn test_emitted_names_validation() {
        assert!(GeneratorOptions::new("App", "1Strings").emitted_names().is_err());
        assert!(GeneratorOptions::new("App..Res", "Strings").emitted_names().is_err());
        assert!(GeneratorOptions::new("", "Strings").emitted_names().is_err());

        let names = GeneratorOptions::new("", "Strings")
            .with_custom_tool_namespace(Some("Out".to_string()))
            .emitted_names()
            .unwrap();
        assert_eq!(names.namespace, "Out");

        let names = GeneratorOptions::new("App", "string").emitted_names().unwrap();
        assert_eq!(names.class, "@string");
    }

    #[test]
    fn test_deserialize_without_custom_namespace() {
        let options: GeneratorOptions = serde_json::from_str(
            r#"{ "local_namespace": "App.Resources", "class_name": "Strings" }"#,
        )
        .unwrap();
        assert_eq!(options, GeneratorOptions::new("App.Resources", "Strings"));
    }
}

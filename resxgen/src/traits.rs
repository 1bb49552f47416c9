//! Traits at the boundary with the host build integration.

use crate::error::Error;

/// Receives generated source text keyed by a file identity.
///
/// # Example
///
/// ```rust
/// use resxgen::{Generator, GeneratorOptions, sink::MemorySink, traits::SourceSink};
///
/// let xml = r#"<root><data name="Greeting"><value>Hello</value></data></root>"#;
/// let mut sink = MemorySink::new();
/// let hint = Generator::new(xml.as_bytes(), GeneratorOptions::new("App", "Strings"))
///     .generate_into(&mut sink, &Default::default())?;
/// assert_eq!(hint, "App.Strings.g.cs");
/// assert!(sink.get(&hint).unwrap().contains("public static string? Greeting"));
/// # Ok::<(), resxgen::Error>(())
/// ```
pub trait SourceSink {
    /// Stores `source` under `hint_name`, replacing any earlier text with that name.
    fn add_source(&mut self, hint_name: &str, source: &str) -> Result<(), Error>;
}

impl<S: SourceSink + ?Sized> SourceSink for &mut S {
    fn add_source(&mut self, hint_name: &str, source: &str) -> Result<(), Error> {
        (**self).add_source(hint_name, source)
    }
}

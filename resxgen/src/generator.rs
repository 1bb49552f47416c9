//! The end-to-end transformation: resource stream in, compilation unit out.

use std::{fs::File, io::BufRead, path::Path};

use encoding_rs::Encoding;

use crate::{
    assemble::assemble,
    error::Error,
    member::synthesize,
    options::GeneratorOptions,
    render::RenderOptions,
    resx::{DecodedReader, ResxReader, decode},
    traits::SourceSink,
    types::CompilationUnit,
};

/// One generation run over one resource stream.
///
/// The generator owns its stream; every `generate*` method consumes the generator, so
/// the stream is dropped when the call returns, whether it succeeded or not.
pub struct Generator<R: BufRead> {
    entries: ResxReader<R>,
    options: GeneratorOptions,
}

impl Generator<DecodedReader<File>> {
    /// Opens a resource file, sniffing its encoding from the BOM.
    pub fn open<P: AsRef<Path>>(path: P, options: GeneratorOptions) -> Result<Self, Error> {
        Self::open_with_encoding(path, options, None)
    }

    /// Opens a resource file, decoding BOM-less content with `encoding`.
    pub fn open_with_encoding<P: AsRef<Path>>(
        path: P,
        options: GeneratorOptions,
        encoding: Option<&'static Encoding>,
    ) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::ResourceUnavailable)?;
        Ok(Self::new(decode(file, encoding), options))
    }
}

impl<R: BufRead> Generator<R> {
    pub fn new(reader: R, options: GeneratorOptions) -> Self {
        Self {
            entries: ResxReader::from_reader(reader),
            options,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Builds the compilation unit.
    ///
    /// Options are validated before the stream is read. Any failure aborts the whole run.
    #[tracing::instrument(skip_all, fields(class = %self.options.class_name))]
    pub fn generate(self) -> Result<CompilationUnit, Error> {
        let Generator { entries, options } = self;
        options.emitted_names()?;

        let accessors = entries
            .map(|entry| entry.and_then(|entry| synthesize(&entry)))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(entries = accessors.len(), "read resource entries");

        assemble(&options, accessors)
    }

    /// Builds and renders the unit.
    pub fn generate_source(self, render: &RenderOptions) -> Result<String, Error> {
        Ok(self.generate()?.to_source_with(render))
    }

    /// Builds, renders and hands the unit to `sink`. Returns the hint name used.
    pub fn generate_into<S: SourceSink>(
        self,
        mut sink: S,
        render: &RenderOptions,
    ) -> Result<String, Error> {
        let hint_name = self.options.hint_name();
        let source = self.generate_source(render)?;
        sink.add_source(&hint_name, &source)?;
        Ok(hint_name)
    }
}

/// Generates source text for an in-memory or streamed resource document.
pub fn generate<R: BufRead>(reader: R, options: GeneratorOptions) -> Result<String, Error> {
    Generator::new(reader, options).generate_source(&RenderOptions::default())
}

/// Generates source text for a resource file on disk.
pub fn generate_file<P: AsRef<Path>>(
    path: P,
    options: GeneratorOptions,
    render: &RenderOptions,
) -> Result<String, Error> {
    Generator::open(path, options)?.generate_source(render)
}

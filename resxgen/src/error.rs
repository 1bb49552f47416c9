//! All error types for the resxgen crate.
//!
//! Every generation call either produces a complete unit or fails with one of these;
//! partial output is never returned.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a well-formed resource file.
    #[error("invalid resource file at byte {position}: {message}")]
    InputFormat { position: u64, message: String },

    /// The input stream could not be read.
    #[error("resource stream unavailable: {0}")]
    ResourceUnavailable(#[source] std::io::Error),

    /// The generator options cannot produce valid C#.
    #[error("invalid generator options: {0}")]
    InvalidOptions(String),

    /// The output sink failed to persist generated text.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new input format error at the given byte position.
    pub fn input_format(position: u64, message: impl Into<String>) -> Self {
        Error::InputFormat {
            position,
            message: message.into(),
        }
    }

    /// Creates a new invalid options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Error::InvalidOptions(message.into())
    }

    /// Maps a quick-xml failure into the resxgen taxonomy.
    ///
    /// Read failures of the underlying stream surface as [`Error::ResourceUnavailable`];
    /// everything else is a malformed document.
    pub(crate) fn from_xml(position: u64, error: quick_xml::Error) -> Self {
        match error {
            quick_xml::Error::Io(io) => {
                Error::ResourceUnavailable(std::io::Error::new(io.kind(), io.to_string()))
            }
            other => Error::input_format(position, other.to_string()),
        }
    }

    pub fn is_input_format(&self) -> bool {
        matches!(self, Error::InputFormat { .. })
    }

    pub fn is_resource_unavailable(&self) -> bool {
        matches!(self, Error::ResourceUnavailable(_))
    }
}

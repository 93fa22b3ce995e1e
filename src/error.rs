use std::io;
use std::result;

use thiserror::Error;

use crate::schema::FieldKind;

/// A type alias for `Result<T, csv_bind::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that ends a whole decoding or encoding operation.
///
/// Errors that are confined to a single data line are reported as
/// [`LineError`](struct.LineError.html) values inside the decoded stream
/// instead, and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error that occurred while reading lines or writing them.
    #[error("{0}")]
    Io(#[from] io::Error),
    /// The line source was empty, so there was no header line to resolve
    /// column names against.
    #[error("CSV error: no header line found")]
    MissingHeader,
    /// Two fields of a schema have the same name, ignoring case.
    #[error("CSV schema error: duplicate field name \"{0}\"")]
    DuplicateField(String),
    /// A field could not be resolved or encoded.
    ///
    /// When decoding, this only occurs while resolving the header line.
    #[error("CSV error: {0}")]
    Field(#[from] FieldError),
    /// A record given to the encoder does not have one value per schema
    /// field.
    #[error(
        "CSV encode error: found record with {len} values, \
         but the schema has {expected} fields"
    )]
    UnequalLengths {
        /// The number of fields in the schema.
        expected: usize,
        /// The number of values in the record.
        len: usize,
    },
    /// A custom error raised while converting a value into a record.
    #[error("CSV serialize error: {0}")]
    Serialize(String),
}

/// The cause of a failure to decode or encode a single field.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FieldError {
    /// No header column matches the field name (case-insensitively).
    #[error("no header found for field \"{0}\"")]
    MissingColumn(String),
    /// The line has too few fields to contain the resolved column.
    #[error(
        "expected a field at column {index}, but the line has {len} fields"
    )]
    IndexOutOfRange {
        /// The zero-based column index that was requested.
        index: usize,
        /// The number of fields the line actually has.
        len: usize,
    },
    /// The field's text is not a valid literal for the field's kind.
    #[error("cannot parse \"{token}\" as {kind}: {message}")]
    Parse {
        /// The name of the expected kind.
        kind: &'static str,
        /// The text that failed to parse.
        token: String,
        /// The underlying parse error.
        message: String,
    },
    /// The field's text is not one of the enum's declared names.
    #[error("enum constant: [{0}] not found")]
    UnknownEnumConstant(String),
    /// A value of one kind was given for a field of another kind.
    #[error("expected a value of kind {expected}, but got {found}")]
    TypeMismatch {
        /// The name of the field's kind.
        expected: &'static str,
        /// A description of the value that was given.
        found: String,
    },
    /// A custom error raised while converting a decoded record into
    /// another type.
    #[error("{0}")]
    Custom(String),
}

impl FieldError {
    pub(crate) fn parse<E: ToString>(
        kind: &FieldKind,
        token: &str,
        err: E,
    ) -> FieldError {
        FieldError::Parse {
            kind: kind.name(),
            token: token.to_string(),
            message: err.to_string(),
        }
    }
}

/// A failure to decode one data line.
///
/// The line number is the 1-based physical line of the source: the header
/// is line 1, so the first data line is line 2. The column is named as it
/// appears in the header line.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("unable to parse line: {line} column: \"{column}\". Error: {cause}")]
pub struct LineError {
    line: u64,
    column: String,
    #[source]
    cause: FieldError,
}

impl LineError {
    pub(crate) fn new(line: u64, column: String, cause: FieldError) -> Self {
        LineError { line, column, cause }
    }

    /// The physical line number of the data line that failed.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The header name of the column being decoded when the line failed.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The underlying cause.
    pub fn cause(&self) -> &FieldError {
        &self.cause
    }

    /// Unwrap the underlying cause.
    pub fn into_cause(self) -> FieldError {
        self.cause
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, FieldError, LineError};

    #[test]
    fn line_error_display() {
        let err = LineError::new(
            2,
            "Age".to_string(),
            FieldError::Parse {
                kind: "Int32",
                token: "x".to_string(),
                message: "invalid digit found in string".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "unable to parse line: 2 column: \"Age\". Error: \
             cannot parse \"x\" as Int32: invalid digit found in string"
        );
    }

    #[test]
    fn field_error_converts() {
        let err: Error = FieldError::MissingColumn("email".to_string()).into();
        match err {
            Error::Field(FieldError::MissingColumn(ref name)) => {
                assert_eq!(name, "email");
            }
            ref x => panic!("expected missing column but got '{:?}'", x),
        }
        assert_eq!(
            err.to_string(),
            "CSV error: no header found for field \"email\""
        );
    }
}

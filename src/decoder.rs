use crate::error::FieldError;
use crate::field;
use crate::headers::HeaderMap;
use crate::schema::Schema;
use crate::value::Record;

/// Decodes tokenized lines into records, one line at a time.
///
/// Fields are always decoded in schema order. Before each field is decoded,
/// its resolved column index is remembered as the *current column*, so that
/// after a failure [`current_column`](#method.current_column) names the
/// column that caused it.
///
/// A decoder is a per-session value. It is not meant to be shared between
/// streams.
#[derive(Clone, Debug, Default)]
pub struct RecordDecoder {
    current: usize,
}

impl RecordDecoder {
    /// Create a new decoder.
    pub fn new() -> RecordDecoder {
        RecordDecoder::default()
    }

    /// The column index of the field most recently resolved.
    ///
    /// This is reset to `0` at the start of every call to `decode`. If a
    /// field's name cannot be resolved at all, this still points to the
    /// previous field's column (or `0` for the first field).
    pub fn current_column(&self) -> usize {
        self.current
    }

    /// Decode one record from the raw fields of a line.
    ///
    /// `tokens` may have more fields than the schema; columns that no schema
    /// field refers to are ignored.
    pub fn decode<T: AsRef<str>>(
        &mut self,
        schema: &Schema,
        headers: &HeaderMap,
        tokens: &[T],
    ) -> Result<Record, FieldError> {
        self.current = 0;
        let mut record = Record::with_capacity(schema.len());
        for f in schema {
            let index = headers.lookup(f.name())?;
            self.current = index;
            let token = match tokens.get(index) {
                Some(token) => token.as_ref(),
                None => {
                    return Err(FieldError::IndexOutOfRange {
                        index,
                        len: tokens.len(),
                    })
                }
            };
            record.push(field::decode(f, token)?);
        }
        tracing::trace!(fields = record.len(), "decoded record");
        Ok(record)
    }

    /// Split a raw line and decode one record from it.
    pub fn decode_line(
        &mut self,
        schema: &Schema,
        headers: &HeaderMap,
        line: &str,
    ) -> Result<Record, FieldError> {
        let tokens = csv_bind_core::split(line);
        self.decode(schema, headers, &tokens)
    }
}

use crate::error::{Error, Result};
use crate::field;
use crate::schema::Schema;
use crate::value::Record;

/// Encodes records into lines.
///
/// Every field is wrapped in quotes, whether it needs them or not, and
/// quote characters inside a value are written as is. A value that contains
/// a `"` will therefore not decode back to itself.
#[derive(Clone, Debug, Default)]
pub struct RecordEncoder {
    fields: Vec<String>,
}

impl RecordEncoder {
    /// Create a new encoder.
    pub fn new() -> RecordEncoder {
        RecordEncoder::default()
    }

    /// Encode the header line for `schema`: its field names, in order.
    pub fn encode_header(&self, schema: &Schema) -> String {
        csv_bind_core::join(schema.iter().map(|f| f.name()))
    }

    /// Encode one record as a line, without a terminator.
    ///
    /// The record must have exactly one value per schema field, and each
    /// value must match its field's kind.
    pub fn encode_line(
        &mut self,
        schema: &Schema,
        record: &Record,
    ) -> Result<String> {
        if record.len() != schema.len() {
            return Err(Error::UnequalLengths {
                expected: schema.len(),
                len: record.len(),
            });
        }
        self.fields.resize(schema.len(), String::new());
        for ((f, value), out) in
            schema.iter().zip(record).zip(self.fields.iter_mut())
        {
            out.clear();
            field::encode(f, value, out)?;
        }
        tracing::trace!(fields = record.len(), "encoded record");
        Ok(csv_bind_core::join(&self.fields))
    }
}

/*!
A streaming CSV codec that binds typed schemas to columns by header name.

A [`Schema`](struct.Schema.html) is an ordered list of named, typed fields.
When decoding, the first line of the input is resolved as the header line,
and each schema field is bound to the column with the same name, ignoring
case. Every following line is decoded into a [`Record`](struct.Record.html)
in schema order, no matter how the columns are ordered in the data.

Decoding is lazy and fault tolerant. A line that fails to decode does not
stop the stream: it is reported as a
[`LineError`](struct.LineError.html) naming the line number and the header
column that failed, and decoding carries on with the next line. Only
problems that affect every line, such as a missing header line or a schema
field with no column, fail the whole decode.

Encoding writes the schema's field names as a header line, then one line per
record, with every field quoted.

# Example

```
use csv_bind::{Csv, DecodeOutcome, FieldKind, Schema, Value};

# fn main() -> csv_bind::Result<()> {
let schema = Schema::builder()
    .field("name", FieldKind::String)
    .field("age", FieldKind::Int32)
    .optional("color", FieldKind::enumeration(vec!["RED", "GREEN"]))
    .build()?;

let lines = vec![
    "AGE,Color,Name",
    "30,GREEN,\"Smith, Ann\"",
    "forty,RED,Bob",
    "50,,Carl",
];
let outcomes: Vec<_> = Csv::new().decode(&schema, lines)?.collect();
assert_eq!(outcomes.len(), 3);

match outcomes[0] {
    DecodeOutcome::Item(ref rec) => {
        assert_eq!(rec[0], Value::from("Smith, Ann"));
        assert_eq!(rec[1], Value::Int32(30));
        assert_eq!(rec[2], Value::Enum(1));
    }
    DecodeOutcome::Error(ref err) => panic!("{}", err),
}
match outcomes[1] {
    DecodeOutcome::Error(ref err) => {
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), "AGE");
    }
    DecodeOutcome::Item(_) => unreachable!(),
}
assert!(outcomes[2].is_item());
# Ok(())
# }
```

# Serde

With the `serde` feature, which is enabled by default, decoded streams can
be adapted to produce any `Deserialize` type with
[`Outcomes::deserialize`](struct.Outcomes.html#method.deserialize), and any
`Serialize` struct can be encoded with
[`Csv::serialize`](struct.Csv.html#method.serialize).

# Logging

This crate emits [`tracing`](https://docs.rs/tracing) events: `debug` when a
header line is resolved and when a line fails to decode, `trace` for every
record decoded or encoded, and `warn` when a header line names a column more
than once. No subscriber is installed.
*/

#![deny(missing_docs)]

pub use csv_bind_core::Terminator;

pub use crate::codec::{Csv, CsvBuilder};
pub use crate::decoder::RecordDecoder;
#[cfg(feature = "serde")]
pub use crate::deserializer::{from_record, DeserializeOutcomes};
pub use crate::encoder::RecordEncoder;
pub use crate::error::{Error, FieldError, LineError, Result};
pub use crate::headers::{HeaderIter, HeaderMap};
pub use crate::lines::{FileLines, IoLines};
pub use crate::schema::{Field, FieldKind, Schema, SchemaBuilder};
#[cfg(feature = "serde")]
pub use crate::serializer::{to_record, Serialized};
pub use crate::stream::{collect_errors, DecodeOutcome, Encoded, Outcomes};
pub use crate::value::Record;
pub use crate::value::Value;

mod codec;
mod decoder;
#[cfg(feature = "serde")]
mod deserializer;
mod encoder;
mod error;
pub mod field;
mod headers;
pub mod lines;
mod schema;
#[cfg(feature = "serde")]
mod serializer;
mod stream;
mod value;

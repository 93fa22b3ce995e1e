use std::borrow::Borrow;
use std::io;
use std::path::Path;

use csv_bind_core::Terminator;

use crate::error::{LineError, Result};
use crate::lines::{self, FileLines};
use crate::schema::Schema;
#[cfg(feature = "serde")]
use crate::serializer::Serialized;
use crate::stream::{Encoded, Outcomes};
use crate::value::Record;

/// Builds a CSV codec with various configuration knobs.
///
/// Once a `Csv` is built, its configuration cannot be changed.
#[derive(Debug, Default)]
pub struct CsvBuilder {
    csv: Csv,
}

impl CsvBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> CsvBuilder {
        CsvBuilder::default()
    }

    /// Build a codec from this configuration.
    pub fn build(&self) -> Csv {
        self.csv.clone()
    }

    /// Whether every schema field must have a header column.
    ///
    /// When enabled, a schema field without a matching column fails the
    /// whole decode with `Error::Field(FieldError::MissingColumn)` as soon
    /// as the header line is read. When disabled, the header is accepted as
    /// is and every data line fails with a `MissingColumn` line error
    /// instead.
    ///
    /// This is enabled by default.
    pub fn validate_headers(&mut self, yes: bool) -> &mut CsvBuilder {
        self.csv.validate_headers = yes;
        self
    }

    /// Whether to write a header line when encoding.
    ///
    /// This is enabled by default. Decoding always treats the first line as
    /// the header line.
    pub fn has_headers(&mut self, yes: bool) -> &mut CsvBuilder {
        self.csv.has_headers = yes;
        self
    }

    /// The record terminator written after every line by `write_records`.
    ///
    /// The default is `Terminator::Any(b'\n')`.
    pub fn terminator(&mut self, term: Terminator) -> &mut CsvBuilder {
        self.csv.term = term;
        self
    }
}

/// A configured CSV codec.
///
/// A `Csv` holds only configuration. Each call to `decode` or `encode`
/// starts a fresh session that borrows the schema, so one codec and one
/// schema may be shared by any number of sessions.
///
/// # Example
///
/// ```
/// use csv_bind::{Csv, FieldKind, Schema, Value};
///
/// # fn main() -> csv_bind::Result<()> {
/// let schema = Schema::builder()
///     .field("name", FieldKind::String)
///     .field("age", FieldKind::Int32)
///     .build()?;
/// let lines = vec!["Age,Name", "30,Ann", "x,Bob"];
///
/// let mut names = vec![];
/// let errors = Csv::new().collect_errors(&schema, lines, |rec| {
///     names.push(rec[0].clone());
/// })?;
/// assert_eq!(names, vec![Value::from("Ann")]);
/// assert_eq!(errors[0].line(), 3);
/// assert_eq!(errors[0].column(), "Age");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Csv {
    validate_headers: bool,
    has_headers: bool,
    term: Terminator,
}

impl Default for Csv {
    fn default() -> Csv {
        Csv {
            validate_headers: true,
            has_headers: true,
            term: Terminator::default(),
        }
    }
}

impl Csv {
    /// Create a codec with the default configuration.
    ///
    /// To change the configuration, use a
    /// [`CsvBuilder`](struct.CsvBuilder.html).
    pub fn new() -> Csv {
        Csv::default()
    }

    /// Start decoding `lines` with `schema`.
    ///
    /// The first line is consumed immediately and resolved as the header
    /// line. An empty source fails with `Error::MissingHeader`. Every
    /// remaining line is decoded lazily, one per call to `next` on the
    /// returned stream.
    pub fn decode<'s, L, S>(
        &self,
        schema: &'s Schema,
        lines: L,
    ) -> Result<Outcomes<'s, L::IntoIter>>
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Outcomes::new(schema, lines.into_iter(), self.validate_headers)
    }

    /// Decode every line, calling `on_item` with each record, and return
    /// every line error.
    pub fn collect_errors<L, S, F>(
        &self,
        schema: &Schema,
        lines: L,
        on_item: F,
    ) -> Result<Vec<LineError>>
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(Record),
    {
        Ok(self.decode(schema, lines)?.collect_errors(on_item))
    }

    /// Decode the lines of a buffered reader, handing the stream to `f`.
    ///
    /// A read error ends the stream and is returned in place of `f`'s
    /// result.
    pub fn decode_reader<R, F, T>(
        &self,
        schema: &Schema,
        rdr: R,
        f: F,
    ) -> Result<T>
    where
        R: io::BufRead,
        F: FnOnce(Outcomes<&mut lines::IoLines<R>>) -> T,
    {
        lines::with_reader(rdr, |lines| -> Result<T> {
            Ok(f(self.decode(schema, lines)?))
        })?
    }

    /// Decode the file at `path`, handing the stream to `f`.
    ///
    /// The file is closed when `f` returns. Failing to open or read the
    /// file is returned as `Error::Io`.
    pub fn decode_path<P, F, T>(
        &self,
        schema: &Schema,
        path: P,
        f: F,
    ) -> Result<T>
    where
        P: AsRef<Path>,
        F: FnOnce(Outcomes<&mut FileLines>) -> T,
    {
        lines::with_path(path, |lines| -> Result<T> {
            Ok(f(self.decode(schema, lines)?))
        })?
    }

    /// Decode the file at `path` in collect-errors mode.
    pub fn collect_errors_from_path<P, F>(
        &self,
        schema: &Schema,
        path: P,
        on_item: F,
    ) -> Result<Vec<LineError>>
    where
        P: AsRef<Path>,
        F: FnMut(Record),
    {
        self.decode_path(schema, path, |outcomes| {
            outcomes.collect_errors(on_item)
        })
    }

    /// Encode `records` with `schema`.
    ///
    /// The returned stream yields the header line first, unless headers
    /// are disabled, then one line per record. Lines carry no terminator.
    pub fn encode<'s, I, R>(
        &self,
        schema: &'s Schema,
        records: I,
    ) -> Encoded<'s, I::IntoIter>
    where
        I: IntoIterator<Item = R>,
        R: Borrow<Record>,
    {
        Encoded::new(schema, records.into_iter(), self.has_headers)
    }

    /// Encode `records` and write every line to `wtr`, each followed by the
    /// configured terminator.
    ///
    /// Writing stops at the first encoding or I/O error.
    pub fn write_records<W, I, R>(
        &self,
        wtr: W,
        schema: &Schema,
        records: I,
    ) -> Result<()>
    where
        W: io::Write,
        I: IntoIterator<Item = R>,
        R: Borrow<Record>,
    {
        lines::write_lines(wtr, self.encode(schema, records), self.term)
    }

    /// Encode serializable structs with `schema`.
    ///
    /// Every struct field is matched to the schema field of the same name,
    /// ignoring case, and converted to that field's kind.
    #[cfg(feature = "serde")]
    pub fn serialize<'s, I>(
        &self,
        schema: &'s Schema,
        values: I,
    ) -> Serialized<'s, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: serde::Serialize,
    {
        Serialized::new(schema, values.into_iter(), self.has_headers)
    }

    /// Serialize `values` and write every line to `wtr`, each followed by
    /// the configured terminator.
    #[cfg(feature = "serde")]
    pub fn write_serialized<W, I>(
        &self,
        wtr: W,
        schema: &Schema,
        values: I,
    ) -> Result<()>
    where
        W: io::Write,
        I: IntoIterator,
        I::Item: serde::Serialize,
    {
        lines::write_lines(wtr, self.serialize(schema, values), self.term)
    }
}

use std::borrow::Borrow;
use std::result;

use crate::decoder::RecordDecoder;
#[cfg(feature = "serde")]
use crate::deserializer::DeserializeOutcomes;
use crate::encoder::RecordEncoder;
use crate::error::{Error, FieldError, LineError, Result};
use crate::headers::HeaderMap;
use crate::schema::Schema;
use crate::value::Record;

/// The result of decoding a single data line.
///
/// Exactly one outcome is produced for every line after the header line.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeOutcome<T> {
    /// The line decoded successfully.
    Item(T),
    /// The line could not be decoded.
    Error(LineError),
}

impl<T> DecodeOutcome<T> {
    /// Returns true if and only if this outcome is an item.
    pub fn is_item(&self) -> bool {
        match *self {
            DecodeOutcome::Item(_) => true,
            DecodeOutcome::Error(_) => false,
        }
    }

    /// Returns true if and only if this outcome is an error.
    pub fn is_error(&self) -> bool {
        !self.is_item()
    }

    /// Convert this outcome into a standard `Result`.
    pub fn into_result(self) -> result::Result<T, LineError> {
        match self {
            DecodeOutcome::Item(item) => Ok(item),
            DecodeOutcome::Error(err) => Err(err),
        }
    }
}

/// Drain a stream of outcomes, calling `on_item` for every item and
/// returning every error, in line order.
pub fn collect_errors<T, I, F>(outcomes: I, mut on_item: F) -> Vec<LineError>
where
    I: IntoIterator<Item = DecodeOutcome<T>>,
    F: FnMut(T),
{
    let mut errors = vec![];
    for outcome in outcomes {
        match outcome {
            DecodeOutcome::Item(item) => on_item(item),
            DecodeOutcome::Error(err) => errors.push(err),
        }
    }
    errors
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Streaming,
    Done,
}

/// A lazy stream of decode outcomes, one per data line.
///
/// The header line has already been consumed when an `Outcomes` value
/// exists (see [`Csv::decode`](struct.Csv.html#method.decode)). Every call
/// to `next` reads exactly one more line from the source and decodes it. A
/// line that fails to decode yields a `DecodeOutcome::Error` and the stream
/// carries on with the next line. The stream ends when the source does.
///
/// Nothing is read ahead, so dropping the stream early is all it takes to
/// stop.
#[derive(Debug)]
pub struct Outcomes<'s, I> {
    schema: &'s Schema,
    lines: I,
    headers: HeaderMap,
    decoder: RecordDecoder,
    tokens: Vec<String>,
    line: u64,
    state: State,
}

impl<'s, I, S> Outcomes<'s, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Consume the header line of `lines` and return a stream over the
    /// remaining lines.
    ///
    /// When `validate` is true, every schema field must have a column in
    /// the header line, otherwise this fails before any data line is read.
    /// When it is false, a missing column is reported on every data line.
    pub(crate) fn new(
        schema: &'s Schema,
        mut lines: I,
        validate: bool,
    ) -> Result<Outcomes<'s, I>> {
        let header = match lines.next() {
            Some(header) => header,
            None => return Err(Error::MissingHeader),
        };
        let headers = HeaderMap::from_line(header.as_ref());
        if validate {
            headers.check(schema)?;
        }
        Ok(Outcomes {
            schema,
            lines,
            headers,
            decoder: RecordDecoder::new(),
            tokens: vec![],
            line: 1,
            state: State::Streaming,
        })
    }

    /// Drain this stream, calling `on_item` for every decoded record and
    /// returning every line error.
    pub fn collect_errors<F>(self, on_item: F) -> Vec<LineError>
    where
        F: FnMut(Record),
    {
        collect_errors(self, on_item)
    }

    /// Adapt this stream to deserialize every record into a `T`.
    ///
    /// Deserialization failures are reported as line errors too, naming the
    /// column of the field that was being deserialized.
    #[cfg(feature = "serde")]
    pub fn deserialize<T>(self) -> DeserializeOutcomes<'s, I, T>
    where
        T: serde::de::DeserializeOwned,
    {
        DeserializeOutcomes::new(self)
    }
}

impl<'s, I> Outcomes<'s, I> {
    /// The header map resolved from the first line.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The schema records are decoded with.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// The 1-based number of the last line read from the source.
    ///
    /// The header is line 1, so the first data line is line 2.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Return a reference to the underlying line source.
    pub fn get_ref(&self) -> &I {
        &self.lines
    }

    /// Build a line error for the current line, attributed to `column`.
    pub(crate) fn line_error(
        &self,
        column: usize,
        cause: FieldError,
    ) -> LineError {
        let name = self.headers.name(column).unwrap_or("").to_string();
        tracing::debug!(
            line = self.line,
            column = %name,
            error = %cause,
            "failed to decode line"
        );
        LineError::new(self.line, name, cause)
    }
}

impl<'s, I, S> Iterator for Outcomes<'s, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = DecodeOutcome<Record>;

    fn next(&mut self) -> Option<DecodeOutcome<Record>> {
        if self.state == State::Done {
            return None;
        }
        let line = match self.lines.next() {
            Some(line) => line,
            None => {
                self.state = State::Done;
                return None;
            }
        };
        self.line += 1;
        csv_bind_core::split_into(line.as_ref(), &mut self.tokens);
        let result =
            self.decoder.decode(self.schema, &self.headers, &self.tokens);
        Some(match result {
            Ok(record) => DecodeOutcome::Item(record),
            Err(cause) => {
                let column = self.decoder.current_column();
                DecodeOutcome::Error(self.line_error(column, cause))
            }
        })
    }
}

/// A lazy stream of encoded lines: the header line, if enabled, followed by
/// one line per record.
///
/// Encoding failures are not recoverable. The first one is yielded as an
/// `Err`, and the caller is expected to stop there.
#[derive(Debug)]
pub struct Encoded<'s, I> {
    schema: &'s Schema,
    records: I,
    encoder: RecordEncoder,
    header: bool,
}

impl<'s, I> Encoded<'s, I> {
    pub(crate) fn new(
        schema: &'s Schema,
        records: I,
        header: bool,
    ) -> Encoded<'s, I> {
        Encoded { schema, records, encoder: RecordEncoder::new(), header }
    }
}

impl<'s, I, R> Iterator for Encoded<'s, I>
where
    I: Iterator<Item = R>,
    R: Borrow<Record>,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        if self.header {
            self.header = false;
            return Some(Ok(self.encoder.encode_header(self.schema)));
        }
        let record = self.records.next()?;
        Some(self.encoder.encode_line(self.schema, record.borrow()))
    }
}

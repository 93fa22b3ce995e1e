/*!
Line sources and sinks backed by `std::io`.

A decoding session pulls lines from any iterator of strings. This module
supplies such an iterator for buffered readers and files, and the matching
sink that writes encoded lines with a record terminator.
*/

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use csv_bind_core::Terminator;

use crate::error::{Error, Result};

/// The line source returned for files opened by path.
pub type FileLines = IoLines<BufReader<File>>;

/// A lazy iterator over the lines of a buffered reader.
///
/// Each line is yielded without its trailing `\n` or `\r\n`. The iterator
/// reads one line per call to `next` and never reads ahead. Bytes that are
/// not valid UTF-8 are replaced with `U+FFFD`, so a bad line still reaches
/// the decoder and only fails on its own.
///
/// Since an iterator of strings has no room for I/O errors, the first error
/// ends iteration and is kept until [`take_error`](#method.take_error) is
/// called.
#[derive(Debug)]
pub struct IoLines<R> {
    rdr: R,
    buf: Vec<u8>,
    err: Option<io::Error>,
    done: bool,
}

impl<R: BufRead> IoLines<R> {
    /// Create a new line source reading from `rdr`.
    pub fn new(rdr: R) -> IoLines<R> {
        IoLines { rdr, buf: vec![], err: None, done: false }
    }

    /// Take the I/O error that ended iteration, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.err.take()
    }

    /// Return a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.rdr
    }
}

impl<R: BufRead> Iterator for IoLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.rdr.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(String::from_utf8_lossy(&self.buf).into_owned())
            }
            Err(err) => {
                tracing::debug!(error = %err, "line source failed");
                self.done = true;
                self.err = Some(err);
                None
            }
        }
    }
}

/// Run `f` over the lines of `rdr`.
///
/// If reading fails, the I/O error is returned instead of `f`'s result.
pub fn with_reader<R, F, T>(rdr: R, f: F) -> Result<T>
where
    R: BufRead,
    F: FnOnce(&mut IoLines<R>) -> T,
{
    let mut lines = IoLines::new(rdr);
    let out = f(&mut lines);
    match lines.take_error() {
        Some(err) => Err(Error::Io(err)),
        None => Ok(out),
    }
}

/// Open the file at `path` and run `f` over its lines.
///
/// The file is closed when `f` returns, whether or not `f` consumed every
/// line. Failing to open or read the file is returned as `Error::Io`.
pub fn with_path<P, F, T>(path: P, f: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&mut FileLines) -> T,
{
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening line source");
    let file = File::open(path)?;
    with_reader(BufReader::new(file), f)
}

/// Write every line to `wtr`, each followed by `term`.
///
/// Stops at the first error, whether it comes from `lines` or from `wtr`.
pub fn write_lines<W, I>(mut wtr: W, lines: I, term: Terminator) -> Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = Result<String>>,
{
    for line in lines {
        wtr.write_all(line?.as_bytes())?;
        wtr.write_all(term.as_bytes())?;
    }
    wtr.flush()?;
    Ok(())
}

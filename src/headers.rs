use std::collections::HashMap;
use std::slice;

use crate::error::FieldError;
use crate::schema::Schema;

/// A case-insensitive mapping from column names to column indices.
///
/// A header map is built once per stream from its first line. Names are
/// lower-cased before they are stored or looked up. If the header line names
/// the same column more than once, the last occurrence wins.
///
/// The header tokens are kept as written, so that errors can report the
/// column name the way it appears in the data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderMap {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl HeaderMap {
    /// Build a header map from the tokens of a header line.
    pub fn new(names: Vec<String>) -> HeaderMap {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let key = name.to_lowercase();
            if let Some(prev) = index.insert(key, i) {
                tracing::warn!(
                    column = %name,
                    previous = prev,
                    index = i,
                    "duplicate header column, using the last one"
                );
            }
        }
        tracing::debug!(columns = names.len(), "resolved header line");
        HeaderMap { names, index }
    }

    /// Split a raw header line and build a header map from it.
    pub fn from_line(line: &str) -> HeaderMap {
        HeaderMap::new(csv_bind_core::split(line))
    }

    /// Look up the column index of `name`, ignoring case.
    pub fn lookup(&self, name: &str) -> Result<usize, FieldError> {
        match self.index.get(&name.to_lowercase()) {
            Some(&i) => Ok(i),
            None => Err(FieldError::MissingColumn(name.to_string())),
        }
    }

    /// Return the header name of column `i`, as written in the header line.
    pub fn name(&self, i: usize) -> Option<&str> {
        self.names.get(i).map(|s| &**s)
    }

    /// Check that every field of `schema` resolves to a column.
    ///
    /// The first field, in schema order, without a column is reported.
    pub fn check(&self, schema: &Schema) -> Result<(), FieldError> {
        for field in schema {
            self.lookup(field.name())?;
        }
        Ok(())
    }

    /// Returns the number of columns in the header line.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if and only if the header line had no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns an iterator over the header names, as written.
    pub fn iter(&self) -> HeaderIter {
        HeaderIter(self.names.iter())
    }
}

/// An iterator over the names in a header map, in column order.
pub struct HeaderIter<'a>(slice::Iter<'a, String>);

impl<'a> Iterator for HeaderIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.0.next().map(|s| &**s)
    }
}

#[cfg(test)]
mod tests {
    use super::HeaderMap;
    use crate::error::FieldError;
    use crate::schema::{FieldKind, Schema};

    #[test]
    fn case_insensitive() {
        let headers = HeaderMap::from_line("Name,AGE");
        assert_eq!(headers.lookup("name"), Ok(0));
        assert_eq!(headers.lookup("age"), Ok(1));
        assert_eq!(headers.lookup("Age"), Ok(1));
        assert_eq!(headers.name(1), Some("AGE"));
    }

    #[test]
    fn last_duplicate_wins() {
        let headers = HeaderMap::from_line("id,x,ID");
        assert_eq!(headers.lookup("id"), Ok(2));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn missing() {
        let headers = HeaderMap::from_line("a,b");
        assert_eq!(
            headers.lookup("email"),
            Err(FieldError::MissingColumn("email".to_string()))
        );
    }

    #[test]
    fn quoted_and_bom() {
        let headers =
            HeaderMap::from_line("\u{FEFF}\"first name\",\"Zip\"\r\n");
        let names: Vec<&str> = headers.iter().collect();
        assert_eq!(names, vec!["first name", "Zip"]);
        assert_eq!(headers.lookup("FIRST NAME"), Ok(0));
    }

    #[test]
    fn check_reports_first_missing() {
        let schema = Schema::builder()
            .field("a", FieldKind::Int32)
            .field("email", FieldKind::String)
            .field("phone", FieldKind::String)
            .build()
            .unwrap();
        let headers = HeaderMap::from_line("A,b");
        assert_eq!(
            headers.check(&schema),
            Err(FieldError::MissingColumn("email".to_string()))
        );
        assert!(HeaderMap::from_line("phone,EMAIL,a").check(&schema).is_ok());
    }
}

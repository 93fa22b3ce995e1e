use std::collections::HashSet;
use std::fmt;
use std::slice;

use crate::error::{Error, Result};

/// The kind of value stored in a single field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// `true` or `false`.
    Bool,
    /// A signed 8-bit integer.
    Int8,
    /// A signed 16-bit integer.
    Int16,
    /// A signed 32-bit integer.
    Int32,
    /// A signed 64-bit integer.
    Int64,
    /// A 32-bit float.
    Float32,
    /// A 64-bit float.
    Float64,
    /// A single character.
    Char,
    /// Any text.
    String,
    /// One of a fixed list of names, matched case-sensitively.
    Enum(Vec<String>),
}

impl FieldKind {
    /// Create an enum kind from its declared names, in declaration order.
    pub fn enumeration<I, T>(names: I) -> FieldKind
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        FieldKind::Enum(names.into_iter().map(Into::into).collect())
    }

    /// A short name for this kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            FieldKind::Bool => "Bool",
            FieldKind::Int8 => "Int8",
            FieldKind::Int16 => "Int16",
            FieldKind::Int32 => "Int32",
            FieldKind::Int64 => "Int64",
            FieldKind::Float32 => "Float32",
            FieldKind::Float64 => "Float64",
            FieldKind::Char => "Char",
            FieldKind::String => "String",
            FieldKind::Enum(_) => "Enum",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named, typed field of a schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    name: String,
    kind: FieldKind,
    optional: bool,
}

impl Field {
    /// The field's name, as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether a blank value decodes to `Value::Null` for this field.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// An ordered list of named, typed fields.
///
/// A schema describes how one record maps to CSV columns. Fields are matched
/// to columns by name, ignoring case, and are always decoded and encoded in
/// the order they are declared here.
///
/// A schema is built once with a [`SchemaBuilder`](struct.SchemaBuilder.html)
/// and is immutable afterwards.
///
/// # Example
///
/// ```
/// use csv_bind::{FieldKind, Schema};
///
/// # fn main() -> csv_bind::Result<()> {
/// let schema = Schema::builder()
///     .field("name", FieldKind::String)
///     .field("age", FieldKind::Int32)
///     .optional("color", FieldKind::enumeration(vec!["RED", "GREEN"]))
///     .build()?;
/// assert_eq!(schema.len(), 3);
/// assert!(schema.get(2).unwrap().is_optional());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a builder for a new schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Return the field at index `i`.
    pub fn get(&self, i: usize) -> Option<&Field> {
        self.fields.get(i)
    }

    /// Returns the number of fields in this schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if and only if this schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over all fields in declaration order.
    pub fn iter(&self) -> slice::Iter<Field> {
        self.fields.iter()
    }

    /// Returns the index of the field with the given name, ignoring case.
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.fields.iter().position(|f| f.name.to_lowercase() == name)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type IntoIter = slice::Iter<'a, Field>;
    type Item = &'a Field;
    fn into_iter(self) -> slice::Iter<'a, Field> {
        self.iter()
    }
}

/// Builds a [`Schema`](struct.Schema.html) one field at a time.
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Create a new builder with no fields.
    pub fn new() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Add a required field.
    ///
    /// A blank value for a required field is handed to the kind's parser
    /// as is. For `FieldKind::String` that yields an empty string, for most
    /// other kinds it is a parse error.
    pub fn field<S: Into<String>>(
        &mut self,
        name: S,
        kind: FieldKind,
    ) -> &mut SchemaBuilder {
        self.push(name.into(), kind, false)
    }

    /// Add an optional field.
    ///
    /// An empty or all-whitespace value for an optional field decodes to
    /// `Value::Null`.
    pub fn optional<S: Into<String>>(
        &mut self,
        name: S,
        kind: FieldKind,
    ) -> &mut SchemaBuilder {
        self.push(name.into(), kind, true)
    }

    /// Build the schema.
    ///
    /// This returns an error if two fields have the same name when compared
    /// without regard to case, since such fields cannot be told apart when
    /// resolving header columns.
    pub fn build(&self) -> Result<Schema> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.to_lowercase()) {
                return Err(Error::DuplicateField(field.name.clone()));
            }
        }
        Ok(Schema { fields: self.fields.clone() })
    }

    fn push(
        &mut self,
        name: String,
        kind: FieldKind,
        optional: bool,
    ) -> &mut SchemaBuilder {
        self.fields.push(Field { name, kind, optional });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, Schema};
    use crate::error::Error;

    #[test]
    fn declaration_order() {
        let schema = Schema::builder()
            .field("b", FieldKind::Bool)
            .optional("a", FieldKind::Int64)
            .build()
            .unwrap();
        let names: Vec<&str> = schema.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(!schema.get(0).unwrap().is_optional());
        assert!(schema.get(1).unwrap().is_optional());
        assert_eq!(schema.get(1).unwrap().kind(), &FieldKind::Int64);
    }

    #[test]
    fn duplicate_names() {
        let err = Schema::builder()
            .field("Name", FieldKind::String)
            .field("NAME", FieldKind::String)
            .build()
            .unwrap_err();
        match err {
            Error::DuplicateField(name) => assert_eq!(name, "NAME"),
            x => panic!("expected duplicate field but got '{:?}'", x),
        }
    }

    #[test]
    fn position_ignores_case() {
        let schema = Schema::builder()
            .field("firstName", FieldKind::String)
            .build()
            .unwrap();
        assert_eq!(schema.position("FIRSTNAME"), Some(0));
        assert_eq!(schema.position("last"), None);
    }

    #[test]
    fn enumeration() {
        let kind = FieldKind::enumeration(vec!["RED", "GREEN"]);
        assert_eq!(
            kind,
            FieldKind::Enum(vec!["RED".to_string(), "GREEN".to_string()])
        );
        assert_eq!(kind.to_string(), "Enum");
    }
}

use std::ops;
use std::slice;
use std::vec;

/// A single decoded field value.
///
/// Each variant except `Null` corresponds to one
/// [`FieldKind`](enum.FieldKind.html). `Null` stands for an absent value of
/// an optional field.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An absent value.
    Null,
    /// A `Bool` value.
    Bool(bool),
    /// An `Int8` value.
    Int8(i8),
    /// An `Int16` value.
    Int16(i16),
    /// An `Int32` value.
    Int32(i32),
    /// An `Int64` value.
    Int64(i64),
    /// A `Float32` value.
    Float32(f32),
    /// A `Float64` value.
    Float64(f64),
    /// A `Char` value.
    Char(char),
    /// A `String` value.
    String(String),
    /// An `Enum` value, as an index into the enum's declared names.
    Enum(usize),
}

impl Value {
    /// A short name for the variant of this value.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Char(_) => "Char",
            Value::String(_) => "String",
            Value::Enum(_) => "Enum",
        }
    }

    /// Returns true if and only if this value is `Null`.
    pub fn is_null(&self) -> bool {
        *self == Value::Null
    }

    /// Returns the boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the integer, widened to 64 bits, if this is any integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(n) => Some(i64::from(n)),
            Value::Int16(n) => Some(i64::from(n)),
            Value::Int32(n) => Some(i64::from(n)),
            Value::Int64(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the float, widened to 64 bits, if this is any float.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(n) => Some(f64::from(n)),
            Value::Float64(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the character, if this is a `Char`.
    pub fn as_char(&self) -> Option<char> {
        match *self {
            Value::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the text, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// Returns the index into the declared names, if this is an `Enum`.
    pub fn as_enum(&self) -> Option<usize> {
        match *self {
            Value::Enum(i) => Some(i),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Value {
                Value::$variant(v)
            }
        }
    };
}

value_from!(bool, Bool);
value_from!(i8, Int8);
value_from!(i16, Int16);
value_from!(i32, Int32);
value_from!(i64, Int64);
value_from!(f32, Float32);
value_from!(f64, Float64);
value_from!(char, Char);
value_from!(String, String);

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Value {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        v.map_or(Value::Null, Into::into)
    }
}

/// A single typed record: one value per schema field, in schema order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(Vec<Value>);

impl Record {
    /// Create a new empty `Record`.
    pub fn new() -> Record {
        Record(vec![])
    }

    /// Create a new empty `Record` with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Record {
        Record(Vec::with_capacity(capacity))
    }

    /// Return the value at index `i`.
    ///
    /// If no value at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&Value> {
        self.0.get(i)
    }

    /// Returns true if and only if this record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of values in this record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Add a value to the end of this record.
    pub fn push<V: Into<Value>>(&mut self, value: V) {
        self.0.push(value.into());
    }

    /// Clear this record so that it has zero values.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns an iterator over all values in this record.
    pub fn iter(&self) -> slice::Iter<Value> {
        self.0.iter()
    }

    /// Convert this record into its values.
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Record {
    fn from(values: Vec<Value>) -> Record {
        Record(values)
    }
}

impl ops::Index<usize> for Record {
    type Output = Value;
    fn index(&self, i: usize) -> &Value {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a Record {
    type IntoIter = slice::Iter<'a, Value>;
    type Item = &'a Value;
    fn into_iter(self) -> slice::Iter<'a, Value> {
        self.iter()
    }
}

impl IntoIterator for Record {
    type IntoIter = vec::IntoIter<Value>;
    type Item = Value;
    fn into_iter(self) -> vec::IntoIter<Value> {
        self.0.into_iter()
    }
}

impl<V: Into<Value>> Extend<V> for Record {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

use std::convert::TryFrom;
use std::fmt;

use serde::ser::{
    Error as SerdeError, Impossible, Serialize, SerializeStruct, Serializer,
};

use crate::encoder::RecordEncoder;
use crate::error::{Error, FieldError, Result};
use crate::schema::{Field, FieldKind, Schema};
use crate::value::{Record, Value};

/// Serialize a struct into a record laid out by `schema`.
///
/// Every struct field is stored in the slot of the schema field with the
/// same name (ignoring case), converted to that field's kind. A struct field
/// with no counterpart in the schema, or a schema field that the struct does
/// not provide, is an error.
pub fn to_record<T: Serialize + ?Sized>(
    schema: &Schema,
    value: &T,
) -> Result<Record> {
    let mut ser = SeRecord { schema, slots: vec![None; schema.len()] };
    value.serialize(&mut ser)?;
    let mut record = Record::with_capacity(schema.len());
    for (field, slot) in schema.iter().zip(ser.slots) {
        match slot {
            Some(value) => record.push(value),
            None => {
                return Err(Error::custom(format_args!(
                    "missing value for field \"{}\"",
                    field.name()
                )))
            }
        }
    }
    Ok(record)
}

/// A lazy stream of encoded lines built from serializable values.
///
/// Created by [`Csv::serialize`](struct.Csv.html#method.serialize).
#[derive(Debug)]
pub struct Serialized<'s, I> {
    schema: &'s Schema,
    values: I,
    encoder: RecordEncoder,
    header: bool,
}

impl<'s, I> Serialized<'s, I> {
    pub(crate) fn new(
        schema: &'s Schema,
        values: I,
        header: bool,
    ) -> Serialized<'s, I> {
        Serialized { schema, values, encoder: RecordEncoder::new(), header }
    }
}

impl<'s, I> Iterator for Serialized<'s, I>
where
    I: Iterator,
    I::Item: Serialize,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        if self.header {
            self.header = false;
            return Some(Ok(self.encoder.encode_header(self.schema)));
        }
        let value = self.values.next()?;
        let record = match to_record(self.schema, &value) {
            Ok(record) => record,
            Err(err) => return Some(Err(err)),
        };
        Some(self.encoder.encode_line(self.schema, &record))
    }
}

struct SeRecord<'s> {
    schema: &'s Schema,
    slots: Vec<Option<Value>>,
}

fn unsupported(what: &str) -> Error {
    Error::custom(format_args!(
        "serializing {} is not supported, only structs can be records",
        what
    ))
}

impl<'a, 's> Serializer for &'a mut SeRecord<'s> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Self;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(unsupported("a bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(unsupported("an integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(unsupported("a float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(unsupported("a float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(unsupported("a char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(unsupported("a string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(unsupported("an option"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(unsupported("a unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Err(unsupported("a unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(unsupported("an enum"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(unsupported("an enum"))
    }

    fn serialize_seq(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeSeq> {
        Err(unsupported("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(unsupported("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(unsupported("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported("an enum tuple variant"))
    }

    fn serialize_map(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeMap> {
        Err(unsupported("a map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported("an enum struct variant"))
    }
}

impl<'a, 's> SerializeStruct for &'a mut SeRecord<'s> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let schema = self.schema;
        let (i, field) = match schema.position(key).and_then(|i| {
            schema.get(i).map(|f| (i, f))
        }) {
            Some(found) => found,
            None => {
                return Err(Error::custom(format_args!(
                    "field \"{}\" is not in the schema",
                    key
                )))
            }
        };
        self.slots[i] = Some(value.serialize(SeValue { field })?);
        Ok(())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Serializes a single value into the kind of its schema field.
struct SeValue<'s> {
    field: &'s Field,
}

impl<'s> SeValue<'s> {
    fn mismatch<T: fmt::Display>(&self, found: T) -> Error {
        Error::Field(FieldError::TypeMismatch {
            expected: self.field.kind().name(),
            found: found.to_string(),
        })
    }

    fn integer<N>(self, n: N) -> Result<Value>
    where
        N: Copy + fmt::Display,
        i8: TryFrom<N>,
        i16: TryFrom<N>,
        i32: TryFrom<N>,
        i64: TryFrom<N>,
    {
        let value = match *self.field.kind() {
            FieldKind::Int8 => i8::try_from(n).ok().map(Value::Int8),
            FieldKind::Int16 => i16::try_from(n).ok().map(Value::Int16),
            FieldKind::Int32 => i32::try_from(n).ok().map(Value::Int32),
            FieldKind::Int64 => i64::try_from(n).ok().map(Value::Int64),
            _ => return Err(self.mismatch(format_args!("integer {}", n))),
        };
        value.ok_or_else(|| {
            self.mismatch(format_args!("integer {} out of range", n))
        })
    }

    fn float(self, n: f64) -> Result<Value> {
        match *self.field.kind() {
            FieldKind::Float32 => {
                let narrow = n as f32;
                if f64::from(narrow) == n || n.is_nan() {
                    Ok(Value::Float32(narrow))
                } else {
                    Err(self.mismatch(format_args!(
                        "float {} as Float32",
                        n
                    )))
                }
            }
            FieldKind::Float64 => Ok(Value::Float64(n)),
            _ => Err(self.mismatch(format_args!("float {}", n))),
        }
    }

    fn text(self, s: &str) -> Result<Value> {
        match *self.field.kind() {
            FieldKind::String => Ok(Value::String(s.to_string())),
            FieldKind::Enum(ref names) => {
                match names.iter().position(|n| n == s) {
                    Some(i) => Ok(Value::Enum(i)),
                    None => {
                        let name = s.to_string();
                        Err(FieldError::UnknownEnumConstant(name).into())
                    }
                }
            }
            FieldKind::Char => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(self.mismatch(format_args!("string \"{}\"", s))),
                }
            }
            _ => Err(self.mismatch(format_args!("string \"{}\"", s))),
        }
    }
}

impl<'s> Serializer for SeValue<'s> {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = Impossible<Value, Error>;
    type SerializeTuple = Impossible<Value, Error>;
    type SerializeTupleStruct = Impossible<Value, Error>;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = Impossible<Value, Error>;
    type SerializeStruct = Impossible<Value, Error>;
    type SerializeStructVariant = Impossible<Value, Error>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        match *self.field.kind() {
            FieldKind::Bool => Ok(Value::Bool(v)),
            _ => Err(self.mismatch(format_args!("bool {}", v))),
        }
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        self.integer(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        match *self.field.kind() {
            FieldKind::Float32 => Ok(Value::Float32(v)),
            _ => self.float(f64::from(v)),
        }
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        self.float(v)
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        match *self.field.kind() {
            FieldKind::Char => Ok(Value::Char(v)),
            _ => self.text(v.encode_utf8(&mut [0; 4])),
        }
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        self.text(v)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        Err(self.mismatch("bytes"))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(
        self,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        self.text(name)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        self.text(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_seq(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeSeq> {
        Err(self.mismatch("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.mismatch("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.mismatch("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.mismatch("an enum tuple variant"))
    }

    fn serialize_map(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeMap> {
        Err(self.mismatch("a map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct> {
        Err(self.mismatch("a nested struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.mismatch("an enum struct variant"))
    }
}

impl SerdeError for Error {
    fn custom<T: fmt::Display>(msg: T) -> Error {
        Error::Serialize(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{to_record, Serialized};
    use crate::error::{Error, FieldError};
    use crate::schema::{FieldKind, Schema};
    use crate::value::{Record, Value};

    #[derive(Serialize)]
    #[allow(dead_code)]
    enum Color {
        RED,
        GREEN,
    }

    #[derive(Serialize)]
    struct Row {
        age: u32,
        name: &'static str,
        color: Color,
        score: Option<f32>,
        initial: char,
    }

    fn schema() -> Schema {
        Schema::builder()
            .field("Name", FieldKind::String)
            .field("age", FieldKind::Int8)
            .field("color", FieldKind::enumeration(vec!["RED", "GREEN"]))
            .optional("score", FieldKind::Float64)
            .field("initial", FieldKind::Char)
            .build()
            .unwrap()
    }

    fn row(age: u32) -> Row {
        Row {
            age,
            name: "ann",
            color: Color::GREEN,
            score: None,
            initial: 'a',
        }
    }

    #[test]
    fn schema_order() {
        let got = to_record(&schema(), &row(30)).unwrap();
        assert_eq!(
            got,
            Record::from(vec![
                Value::from("ann"),
                Value::Int8(30),
                Value::Enum(1),
                Value::Null,
                Value::Char('a'),
            ])
        );
    }

    #[test]
    fn out_of_range() {
        match to_record(&schema(), &row(200)) {
            Err(Error::Field(FieldError::TypeMismatch { expected, .. })) => {
                assert_eq!(expected, "Int8");
            }
            x => panic!("expected type mismatch but got '{:?}'", x),
        }
    }

    #[test]
    fn float_narrowing() {
        #[derive(Serialize)]
        struct Ratio {
            r: f64,
        }
        let schema = Schema::builder()
            .field("r", FieldKind::Float32)
            .build()
            .unwrap();
        let got = to_record(&schema, &Ratio { r: 0.5 }).unwrap();
        assert_eq!(got, Record::from(vec![Value::Float32(0.5)]));
        match to_record(&schema, &Ratio { r: 0.1 }) {
            Err(Error::Field(FieldError::TypeMismatch { expected, .. })) => {
                assert_eq!(expected, "Float32");
            }
            x => panic!("expected type mismatch but got '{:?}'", x),
        }
    }

    #[test]
    fn unknown_field() {
        #[derive(Serialize)]
        struct Other {
            email: String,
        }
        let got = to_record(&schema(), &Other { email: "x".into() });
        assert!(got.is_err());
    }

    #[test]
    fn missing_field() {
        #[derive(Serialize)]
        struct Partial {
            name: String,
        }
        match to_record(&schema(), &Partial { name: "x".into() }) {
            Err(Error::Serialize(msg)) => assert!(msg.contains("age")),
            x => panic!("expected serialize error but got '{:?}'", x),
        }
    }

    #[test]
    fn not_a_struct() {
        assert!(to_record(&schema(), &(1, 2)).is_err());
    }

    #[test]
    fn serialized_lines() {
        let schema = schema();
        let rows = vec![row(1), row(2)];
        let lines: Vec<String> = Serialized::new(&schema, rows.iter(), true)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "\"Name\",\"age\",\"color\",\"score\",\"initial\"",
                "\"ann\",\"1\",\"GREEN\",\"\",\"a\"",
                "\"ann\",\"2\",\"GREEN\",\"\",\"a\"",
            ]
        );
    }
}

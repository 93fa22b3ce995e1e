use std::marker::PhantomData;

use serde::de::{
    value::StrDeserializer, DeserializeOwned, DeserializeSeed, Deserializer,
    Error as SerdeError, IntoDeserializer, MapAccess, SeqAccess, Visitor,
};

use crate::error::{FieldError, LineError};
use crate::schema::{Field, FieldKind, Schema};
use crate::stream::{collect_errors, DecodeOutcome, Outcomes};
use crate::value::{Record, Value};

/// Deserialize a decoded record into any type that implements
/// `Deserialize`.
///
/// Structs are matched by field name, ignoring case: every schema field is
/// offered to the struct under the struct's own spelling of its name. Tuples
/// and sequences receive the values positionally, in schema order.
pub fn from_record<T: DeserializeOwned>(
    schema: &Schema,
    record: &Record,
) -> Result<T, FieldError> {
    let mut de = DeRecord::new(schema, record);
    T::deserialize(&mut de)
}

/// A stream of outcomes whose records are deserialized into `T`.
///
/// Created by
/// [`Outcomes::deserialize`](struct.Outcomes.html#method.deserialize).
pub struct DeserializeOutcomes<'s, I, T> {
    outcomes: Outcomes<'s, I>,
    _phantom: PhantomData<fn() -> T>,
}

impl<'s, I, S, T> DeserializeOutcomes<'s, I, T>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
    T: DeserializeOwned,
{
    pub(crate) fn new(outcomes: Outcomes<'s, I>) -> Self {
        DeserializeOutcomes { outcomes, _phantom: PhantomData }
    }

    /// Drain this stream, calling `on_item` for every deserialized value
    /// and returning every line error.
    pub fn collect_errors<F: FnMut(T)>(self, on_item: F) -> Vec<LineError> {
        collect_errors(self, on_item)
    }

    /// Return the underlying stream of raw records.
    pub fn get_ref(&self) -> &Outcomes<'s, I> {
        &self.outcomes
    }
}

impl<'s, I, S, T> Iterator for DeserializeOutcomes<'s, I, T>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
    T: DeserializeOwned,
{
    type Item = DecodeOutcome<T>;

    fn next(&mut self) -> Option<DecodeOutcome<T>> {
        let record = match self.outcomes.next()? {
            DecodeOutcome::Item(record) => record,
            DecodeOutcome::Error(err) => {
                return Some(DecodeOutcome::Error(err));
            }
        };
        let schema = self.outcomes.schema();
        let mut de = DeRecord::new(schema, &record);
        Some(match T::deserialize(&mut de) {
            Ok(item) => DecodeOutcome::Item(item),
            Err(cause) => {
                let headers = self.outcomes.headers();
                let column = schema
                    .get(de.field)
                    .and_then(|f| headers.lookup(f.name()).ok())
                    .unwrap_or(0);
                DecodeOutcome::Error(self.outcomes.line_error(column, cause))
            }
        })
    }
}

/// Deserializes one record. `field` is the index of the schema field most
/// recently handed out, used to attribute errors.
struct DeRecord<'r> {
    schema: &'r Schema,
    record: &'r Record,
    names: &'static [&'static str],
    next: usize,
    field: usize,
}

impl<'r> DeRecord<'r> {
    fn new(schema: &'r Schema, record: &'r Record) -> DeRecord<'r> {
        DeRecord { schema, record, names: &[], next: 0, field: 0 }
    }

    /// Advance to the next schema field and its value.
    fn next_field(&mut self) -> Option<(&'r Field, &'r Value)> {
        let field = self.schema.get(self.next)?;
        let value = self.record.get(self.next)?;
        self.field = self.next;
        self.next += 1;
        Some((field, value))
    }

    /// The struct field name that matches `field`, ignoring case.
    fn struct_name(&self, field: &Field) -> Option<&'static str> {
        let wanted = field.name().to_lowercase();
        self.names.iter().cloned().find(|n| n.to_lowercase() == wanted)
    }
}

impl<'a, 'de, 'r> Deserializer<'de> for &'a mut DeRecord<'r> {
    type Error = FieldError;

    fn deserialize_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_map(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_seq(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_seq(self)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_seq(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.names = fields;
        visitor.visit_map(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct map enum
        identifier ignored_any
    }
}

impl<'de, 'r> MapAccess<'de> for DeRecord<'r> {
    type Error = FieldError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        let field = match self.schema.get(self.next) {
            None => return Ok(None),
            Some(field) => field,
        };
        let key = match self.struct_name(field) {
            Some(name) => name,
            None => field.name(),
        };
        let key: StrDeserializer<FieldError> = key.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, Self::Error> {
        match self.next_field() {
            Some((field, value)) => seed.deserialize(DeValue { field, value }),
            None => Err(FieldError::custom("record ended before schema")),
        }
    }
}

impl<'de, 'r> SeqAccess<'de> for DeRecord<'r> {
    type Error = FieldError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        match self.next_field() {
            Some((field, value)) => {
                seed.deserialize(DeValue { field, value }).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Deserializes a single value. The field is needed to turn an enum index
/// back into its declared name.
struct DeValue<'r> {
    field: &'r Field,
    value: &'r Value,
}

impl<'r> DeValue<'r> {
    fn enum_name(&self, i: usize) -> Result<&'r str, FieldError> {
        match *self.field.kind() {
            FieldKind::Enum(ref names) if i < names.len() => Ok(&names[i]),
            _ => Err(FieldError::TypeMismatch {
                expected: self.field.kind().name(),
                found: format!("Enum({})", i),
            }),
        }
    }
}

impl<'de, 'r> Deserializer<'de> for DeValue<'r> {
    type Error = FieldError;

    fn deserialize_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match *self.value {
            Value::Null => visitor.visit_none(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int8(n) => visitor.visit_i8(n),
            Value::Int16(n) => visitor.visit_i16(n),
            Value::Int32(n) => visitor.visit_i32(n),
            Value::Int64(n) => visitor.visit_i64(n),
            Value::Float32(n) => visitor.visit_f32(n),
            Value::Float64(n) => visitor.visit_f64(n),
            Value::Char(c) => visitor.visit_char(c),
            Value::String(ref s) => visitor.visit_str(s),
            Value::Enum(i) => visitor.visit_str(self.enum_name(i)?),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match *self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let variant = match *self.value {
            Value::Enum(i) => self.enum_name(i)?,
            Value::String(ref s) => s.as_str(),
            ref v => {
                return Err(FieldError::TypeMismatch {
                    expected: "Enum",
                    found: v.kind_name().to_string(),
                })
            }
        };
        let variant: StrDeserializer<FieldError> = variant.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl SerdeError for FieldError {
    fn custom<T: std::fmt::Display>(msg: T) -> FieldError {
        FieldError::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::from_record;
    use crate::error::FieldError;
    use crate::schema::{FieldKind, Schema};
    use crate::value::{Record, Value};

    #[derive(Debug, Deserialize, PartialEq)]
    enum Color {
        RED,
        GREEN,
        BLUE,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        name: String,
        age: u8,
        color: Color,
        score: Option<f64>,
    }

    fn schema() -> Schema {
        Schema::builder()
            .field("name", FieldKind::String)
            .field("age", FieldKind::Int16)
            .field(
                "color",
                FieldKind::enumeration(vec!["RED", "GREEN", "BLUE"]),
            )
            .optional("score", FieldKind::Float64)
            .build()
            .unwrap()
    }

    fn record(age: i16, score: Option<f64>) -> Record {
        Record::from(vec![
            Value::from("ann"),
            Value::Int16(age),
            Value::Enum(2),
            Value::from(score),
        ])
    }

    #[test]
    fn struct_by_name() {
        let got: Row = from_record(&schema(), &record(30, Some(1.5))).unwrap();
        assert_eq!(
            got,
            Row {
                name: "ann".into(),
                age: 30,
                color: Color::BLUE,
                score: Some(1.5),
            }
        );
    }

    #[test]
    fn null_is_none() {
        let got: Row = from_record(&schema(), &record(30, None)).unwrap();
        assert_eq!(got.score, None);
    }

    #[test]
    fn out_of_range_for_target() {
        let got = from_record::<Row>(&schema(), &record(300, None));
        assert!(got.is_err());
    }

    #[test]
    fn tuple() {
        let got: (String, i64, String, Option<f64>) =
            from_record(&schema(), &record(1, None)).unwrap();
        assert_eq!(got, ("ann".to_string(), 1, "BLUE".to_string(), None));
    }

    #[test]
    fn struct_names_ignore_case() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Named {
            name: String,
            #[serde(rename = "AGE")]
            years: i64,
        }
        let schema = Schema::builder()
            .field("Name", FieldKind::String)
            .field("age", FieldKind::Int16)
            .build()
            .unwrap();
        let rec = Record::from(vec![Value::from("ann"), Value::Int16(4)]);
        let got: Named = from_record(&schema, &rec).unwrap();
        assert_eq!(got, Named { name: "ann".into(), years: 4 });
    }

    #[test]
    fn missing_struct_field() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wider {
            name: String,
            email: String,
        }
        match from_record::<Wider>(&schema(), &record(1, None)) {
            Err(FieldError::Custom(msg)) => assert!(msg.contains("email")),
            x => panic!("expected custom error but got '{:?}'", x),
        }
    }
}

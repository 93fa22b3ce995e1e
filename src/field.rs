/*!
Conversions between a single raw field and a typed
[`Value`](../enum.Value.html).

Decoding is driven by a schema [`Field`](../struct.Field.html): its kind
picks the parser and its optionality decides whether a blank token is an
absent value. Encoding writes each value's default textual form.
*/

use crate::error::FieldError;
use crate::schema::{Field, FieldKind};
use crate::value::Value;

/// Returns true if `token` counts as an absent value: it is empty or made
/// only of whitespace.
pub fn is_absent(token: &str) -> bool {
    token.trim().is_empty()
}

/// Decode one raw field according to a schema field.
///
/// If the field is optional and the token is absent, this returns
/// `Value::Null` without looking at the kind.
pub fn decode(field: &Field, token: &str) -> Result<Value, FieldError> {
    if field.is_optional() && is_absent(token) {
        return Ok(Value::Null);
    }
    decode_kind(field.kind(), token)
}

macro_rules! parse {
    ($kind:expr, $token:expr, $variant:ident) => {
        $token
            .parse()
            .map(Value::$variant)
            .map_err(|err| FieldError::parse($kind, $token, err))
    };
}

/// Decode one raw field as the given kind.
///
/// The token is used as is. In particular, surrounding whitespace is not
/// trimmed before parsing numbers or booleans.
pub fn decode_kind(
    kind: &FieldKind,
    token: &str,
) -> Result<Value, FieldError> {
    match *kind {
        FieldKind::Bool => parse!(kind, token, Bool),
        FieldKind::Int8 => parse!(kind, token, Int8),
        FieldKind::Int16 => parse!(kind, token, Int16),
        FieldKind::Int32 => parse!(kind, token, Int32),
        FieldKind::Int64 => parse!(kind, token, Int64),
        FieldKind::Float32 => parse!(kind, token, Float32),
        FieldKind::Float64 => parse!(kind, token, Float64),
        FieldKind::Char => match token.chars().next() {
            Some(c) => Ok(Value::Char(c)),
            None => Err(FieldError::parse(kind, token, "empty field")),
        },
        FieldKind::String => Ok(Value::String(token.to_string())),
        FieldKind::Enum(ref names) => {
            match names.iter().position(|name| name == token) {
                Some(i) => Ok(Value::Enum(i)),
                None => {
                    Err(FieldError::UnknownEnumConstant(token.to_string()))
                }
            }
        }
    }
}

/// Encode one value according to a schema field, appending it to `out`.
///
/// `Value::Null` is written as an empty field, but only for optional
/// fields. Any other value must match the field's kind exactly.
pub fn encode(
    field: &Field,
    value: &Value,
    out: &mut String,
) -> Result<(), FieldError> {
    match (field.kind(), value) {
        (_, &Value::Null) if field.is_optional() => {}
        (&FieldKind::Bool, &Value::Bool(b)) => {
            out.push_str(if b { "true" } else { "false" })
        }
        (&FieldKind::Int8, &Value::Int8(n)) => {
            out.push_str(itoa::Buffer::new().format(n))
        }
        (&FieldKind::Int16, &Value::Int16(n)) => {
            out.push_str(itoa::Buffer::new().format(n))
        }
        (&FieldKind::Int32, &Value::Int32(n)) => {
            out.push_str(itoa::Buffer::new().format(n))
        }
        (&FieldKind::Int64, &Value::Int64(n)) => {
            out.push_str(itoa::Buffer::new().format(n))
        }
        (&FieldKind::Float32, &Value::Float32(n)) => {
            out.push_str(ryu::Buffer::new().format(n))
        }
        (&FieldKind::Float64, &Value::Float64(n)) => {
            out.push_str(ryu::Buffer::new().format(n))
        }
        (&FieldKind::Char, &Value::Char(c)) => out.push(c),
        (&FieldKind::String, &Value::String(ref s)) => out.push_str(s),
        (&FieldKind::Enum(ref names), &Value::Enum(i)) => match names.get(i) {
            Some(name) => out.push_str(name),
            None => {
                return Err(FieldError::TypeMismatch {
                    expected: field.kind().name(),
                    found: format!("Enum({}) of {} names", i, names.len()),
                })
            }
        },
        (kind, value) => {
            return Err(FieldError::TypeMismatch {
                expected: kind.name(),
                found: value.kind_name().to_string(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_kind, encode, is_absent};
    use crate::error::FieldError;
    use crate::schema::{Field, FieldKind, Schema};
    use crate::value::Value;

    fn field(kind: FieldKind, optional: bool) -> Field {
        let mut builder = Schema::builder();
        if optional {
            builder.optional("f", kind);
        } else {
            builder.field("f", kind);
        }
        builder.build().unwrap().get(0).unwrap().clone()
    }

    fn de(kind: FieldKind, token: &str) -> Result<Value, FieldError> {
        decode_kind(&kind, token)
    }

    fn ser(kind: FieldKind, value: Value) -> String {
        let mut out = String::new();
        encode(&field(kind, false), &value, &mut out).unwrap();
        out
    }

    fn colors() -> FieldKind {
        FieldKind::enumeration(vec!["RED", "GREEN", "BLUE"])
    }

    #[test]
    fn absent() {
        assert!(is_absent(""));
        assert!(is_absent(" \t "));
        assert!(!is_absent(" x "));
    }

    #[test]
    fn bool() {
        assert_eq!(de(FieldKind::Bool, "true"), Ok(Value::Bool(true)));
        assert_eq!(de(FieldKind::Bool, "false"), Ok(Value::Bool(false)));
        assert!(de(FieldKind::Bool, "yes").is_err());
        assert!(de(FieldKind::Bool, "").is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(de(FieldKind::Int8, "-128"), Ok(Value::Int8(-128)));
        assert_eq!(de(FieldKind::Int16, "300"), Ok(Value::Int16(300)));
        assert_eq!(de(FieldKind::Int32, "+7"), Ok(Value::Int32(7)));
        assert_eq!(
            de(FieldKind::Int64, "9223372036854775807"),
            Ok(Value::Int64(i64::max_value()))
        );
    }

    #[test]
    fn integer_overflow() {
        match de(FieldKind::Int8, "128") {
            Err(FieldError::Parse { kind, token, .. }) => {
                assert_eq!(kind, "Int8");
                assert_eq!(token, "128");
            }
            x => panic!("expected parse error but got '{:?}'", x),
        }
    }

    #[test]
    fn integer_garbage() {
        assert!(de(FieldKind::Int32, "12a").is_err());
        assert!(de(FieldKind::Int32, " 12").is_err());
        assert!(de(FieldKind::Int32, "1.0").is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(de(FieldKind::Float64, "1.5"), Ok(Value::Float64(1.5)));
        assert_eq!(
            de(FieldKind::Float64, "-2e3"),
            Ok(Value::Float64(-2000.0))
        );
        assert_eq!(de(FieldKind::Float32, "0.25"), Ok(Value::Float32(0.25)));
        assert!(de(FieldKind::Float64, "1.5.1").is_err());
    }

    #[test]
    fn char() {
        assert_eq!(de(FieldKind::Char, "x"), Ok(Value::Char('x')));
        assert_eq!(de(FieldKind::Char, "☃abc"), Ok(Value::Char('☃')));
        assert!(de(FieldKind::Char, "").is_err());
    }

    #[test]
    fn string_passthrough() {
        assert_eq!(
            de(FieldKind::String, " a b "),
            Ok(Value::String(" a b ".to_string()))
        );
        assert_eq!(
            de(FieldKind::String, ""),
            Ok(Value::String(String::new()))
        );
    }

    #[test]
    fn enum_exact_case() {
        assert_eq!(de(colors(), "GREEN"), Ok(Value::Enum(1)));
        assert_eq!(
            de(colors(), "green"),
            Err(FieldError::UnknownEnumConstant("green".to_string()))
        );
    }

    #[test]
    fn optional_blank() {
        let f = field(FieldKind::Int32, true);
        assert_eq!(decode(&f, ""), Ok(Value::Null));
        assert_eq!(decode(&f, "  "), Ok(Value::Null));
        assert_eq!(decode(&f, "3"), Ok(Value::Int32(3)));

        let f = field(FieldKind::String, true);
        assert_eq!(decode(&f, ""), Ok(Value::Null));
    }

    #[test]
    fn required_blank() {
        let f = field(FieldKind::String, false);
        assert_eq!(decode(&f, ""), Ok(Value::String(String::new())));
        let f = field(FieldKind::Int32, false);
        assert!(decode(&f, "").is_err());
    }

    #[test]
    fn encode_defaults() {
        assert_eq!(ser(FieldKind::Bool, Value::Bool(true)), "true");
        assert_eq!(ser(FieldKind::Int8, Value::Int8(-5)), "-5");
        assert_eq!(
            ser(FieldKind::Int64, Value::Int64(1 << 40)),
            "1099511627776"
        );
        assert_eq!(ser(FieldKind::Float64, Value::Float64(1.5)), "1.5");
        assert_eq!(ser(FieldKind::Float64, Value::Float64(3.0)), "3.0");
        assert_eq!(ser(FieldKind::Float32, Value::Float32(0.1)), "0.1");
        assert_eq!(ser(FieldKind::Char, Value::Char('☃')), "☃");
        assert_eq!(ser(colors(), Value::Enum(2)), "BLUE");
    }

    #[test]
    fn encode_floats_round_trip() {
        for &n in &[0.1f64, -1e-7, 1e21, 123456.789] {
            let s = ser(FieldKind::Float64, Value::Float64(n));
            assert_eq!(de(FieldKind::Float64, &s), Ok(Value::Float64(n)));
        }
    }

    #[test]
    fn encode_null() {
        let mut out = String::new();
        let optional = field(FieldKind::Int32, true);
        encode(&optional, &Value::Null, &mut out).unwrap();
        assert_eq!(out, "");

        let required = field(FieldKind::Int32, false);
        let err = encode(&required, &Value::Null, &mut out).unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                expected: "Int32",
                found: "Null".to_string(),
            }
        );
    }

    #[test]
    fn encode_mismatch() {
        let mut out = String::new();
        let f = field(FieldKind::Int32, false);
        assert!(encode(&f, &Value::Int64(1), &mut out).is_err());
        let f = field(colors(), false);
        assert!(encode(&f, &Value::Enum(3), &mut out).is_err());
        assert_eq!(out, "");
    }
}

use serde_json::{Map, Value};

use crate::command::CommandValue;
use crate::device::DeviceResource;
use crate::error::{Error, ErrorKind, Result};
use crate::value::{Reading, TypedValue, ValueType};

/// `JSON` content type.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Plain text content type.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

// Outcome of a failed numeric parse.
#[derive(Debug, PartialEq)]
enum NumberError {
    // Not a number at all.
    Invalid,
    // A number which does not fit the declared width.
    OutOfRange,
}

fn essence(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map_or(content_type, |(essence, _)| essence)
        .trim()
}

/// Checks whether two content types share the same media type.
///
/// Parameters such as `charset` are ignored and the comparison is
/// case-insensitive.
#[must_use]
pub fn media_type_matches(expected: &str, received: &str) -> bool {
    essence(expected).eq_ignore_ascii_case(essence(received))
}

fn cast_error(resource: &DeviceResource, reason: impl std::fmt::Display) -> Error {
    Error::new(
        ErrorKind::CastError,
        format!("failed to parse {} reading, {reason}", resource.name),
    )
}

fn range_error(value_type: ValueType, value: impl std::fmt::Display) -> Error {
    Error::new(
        ErrorKind::RangeError,
        format!("value {value} for {value_type} type is out of range"),
    )
}

/// Checks that a received content type matches the expected media type.
///
/// # Errors
///
/// Returns [`ErrorKind::ContentTypeMismatch`] when the media types differ.
pub fn check_media_type(expected: &str, received: &str) -> Result<()> {
    if media_type_matches(expected, received) {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::ContentTypeMismatch,
            format!("wrong Content-Type: expected '{expected}' but received '{received}'"),
        ))
    }
}

fn number_error(
    resource: &DeviceResource,
    value_type: ValueType,
    text: &str,
    error: NumberError,
) -> Error {
    match error {
        NumberError::Invalid => cast_error(resource, format!("`{text}` is not a {value_type}")),
        NumberError::OutOfRange => range_error(value_type, text),
    }
}

fn text<'a>(resource: &DeviceResource, reading: &'a Reading) -> Result<&'a str> {
    match reading {
        Reading::Text(text) => Ok(text),
        Reading::Bytes(bytes) => {
            std::str::from_utf8(bytes).map_err(|e| cast_error(resource, format!("not text: {e}")))
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "t" | "T" => Some(true),
        "0" | "f" | "F" => Some(false),
        text if text.eq_ignore_ascii_case("true") => Some(true),
        text if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

// `0x`, `0o` and `0b` select their radix, a bare leading `0` is octal.
fn split_radix(literal: &str) -> (u32, &str) {
    let bytes = literal.as_bytes();
    match (bytes.first(), bytes.get(1).map(u8::to_ascii_lowercase)) {
        (Some(b'0'), Some(b'x')) => (16, &literal[2..]),
        (Some(b'0'), Some(b'o')) => (8, &literal[2..]),
        (Some(b'0'), Some(b'b')) => (2, &literal[2..]),
        (Some(b'0'), Some(_)) => (8, &literal[1..]),
        _ => (10, literal),
    }
}

// `12.0` is an integer, `12.` and `12.5` are not.
fn trim_zero_decimals(text: &str) -> &str {
    match text.rsplit_once('.') {
        Some((integer, decimals))
            if !decimals.is_empty() && decimals.bytes().all(|b| b == b'0') =>
        {
            integer
        }
        _ => text,
    }
}

// Every `_` must follow a digit or a radix prefix and precede a digit.
fn separators_in_place(digits: &str, prefixed: bool) -> bool {
    let mut after_digit = prefixed;
    for c in digits.chars() {
        if c == '_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
        } else {
            after_digit = true;
        }
    }
    after_digit
}

fn parse_integer(text: &str) -> std::result::Result<i128, NumberError> {
    let text = trim_zero_decimals(text.trim());
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = split_radix(unsigned);
    if !separators_in_place(digits, digits.len() < unsigned.len()) {
        return Err(NumberError::Invalid);
    }

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(NumberError::Invalid);
    }

    // Only digits are left, so a parse failure means an overflow.
    let magnitude = u128::from_str_radix(&digits, radix).map_err(|_| NumberError::OutOfRange)?;
    let magnitude = i128::try_from(magnitude).map_err(|_| NumberError::OutOfRange)?;

    Ok(if negative { -magnitude } else { magnitude })
}

fn narrow<T>(resource: &DeviceResource, value_type: ValueType, reading: &Reading) -> Result<T>
where
    T: TryFrom<i128>,
{
    let text = text(resource, reading)?;
    let wide = parse_integer(text).map_err(|e| number_error(resource, value_type, text, e))?;

    // Range check on the source value, before narrowing.
    T::try_from(wide).map_err(|_| range_error(value_type, text.trim()))
}

// Zero, or a magnitude between the smallest normal and the largest finite
// value of the width.
fn float_in_range(value: f64, min_positive: f64, max: f64) -> bool {
    value == 0.0 || (min_positive..=max).contains(&value.abs())
}

// A literal such as `1e-400` parses to zero although it is not zero.
fn has_nonzero_mantissa(text: &str) -> bool {
    text.split(['e', 'E'])
        .next()
        .is_some_and(|mantissa| mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')))
}

fn check_float(
    value_type: ValueType,
    text: &str,
    value: f64,
    min_positive: f64,
    max: f64,
) -> Result<()> {
    if (value == 0.0 && has_nonzero_mantissa(text)) || !float_in_range(value, min_positive, max) {
        return Err(range_error(value_type, text));
    }
    Ok(())
}

fn float32(resource: &DeviceResource, reading: &Reading) -> Result<f32> {
    let text = text(resource, reading)?.trim();

    // Parsing straight into the width avoids a double rounding through `f64`.
    let value = text
        .parse::<f32>()
        .map_err(|_| number_error(resource, ValueType::Float32, text, NumberError::Invalid))?;

    check_float(
        ValueType::Float32,
        text,
        f64::from(value),
        f64::from(f32::MIN_POSITIVE),
        f64::from(f32::MAX),
    )?;

    Ok(value)
}

fn float64(resource: &DeviceResource, reading: &Reading) -> Result<f64> {
    let text = text(resource, reading)?.trim();
    let value = text
        .parse::<f64>()
        .map_err(|_| number_error(resource, ValueType::Float64, text, NumberError::Invalid))?;

    check_float(ValueType::Float64, text, value, f64::MIN_POSITIVE, f64::MAX)?;

    Ok(value)
}

fn object(resource: &DeviceResource, reading: Reading, content_type: &str) -> Result<TypedValue> {
    check_media_type(CONTENT_TYPE_JSON, content_type)?;

    let Reading::Bytes(bytes) = reading else {
        return Err(cast_error(resource, "not a byte sequence"));
    };

    serde_json::from_slice::<Map<String, Value>>(&bytes)
        .map(TypedValue::Object)
        .map_err(|e| {
            Error::new(
                ErrorKind::DecodeError,
                format!("unable to decode JSON data to type Object: {e}"),
            )
        })
}

fn binary(resource: &DeviceResource, reading: Reading, content_type: &str) -> Result<TypedValue> {
    check_media_type(&resource.media_type, content_type)?;

    match reading {
        Reading::Bytes(bytes) => Ok(TypedValue::Binary(bytes)),
        Reading::Text(_) => Err(cast_error(resource, "not a byte sequence")),
    }
}

fn string(resource: &DeviceResource, reading: Reading) -> Result<TypedValue> {
    match reading {
        Reading::Text(text) => Ok(TypedValue::String(text)),
        Reading::Bytes(bytes) => String::from_utf8(bytes.into())
            .map(TypedValue::String)
            .map_err(|e| cast_error(resource, format!("not text: {e}"))),
    }
}

/// Coerces a raw [`Reading`] into a [`CommandValue`] of the given
/// [`ValueType`].
///
/// The content type is only considered for [`ValueType::Binary`], which
/// must match the resource media type, and for [`ValueType::Object`],
/// which must be `application/json`.
///
/// Numeric readings are range-checked against the width of the declared
/// type. Floats are accepted when they are zero or when their magnitude
/// lies between the smallest normal and the largest finite value.
///
/// # Errors
///
/// - [`ErrorKind::ContentTypeMismatch`] on a wrong content type
/// - [`ErrorKind::CastError`] when a reading cannot be parsed
/// - [`ErrorKind::RangeError`] when a number does not fit its type
/// - [`ErrorKind::DecodeError`] when an object is not a `JSON` object
pub fn coerce(
    resource: &DeviceResource,
    reading: Reading,
    value_type: ValueType,
    content_type: &str,
) -> Result<CommandValue> {
    let value = match value_type {
        ValueType::Binary => binary(resource, reading, content_type)?,
        ValueType::Object => object(resource, reading, content_type)?,
        ValueType::Bool => {
            let text = text(resource, &reading)?;
            TypedValue::Bool(
                parse_bool(text)
                    .ok_or_else(|| cast_error(resource, format!("`{text}` is not a Bool")))?,
            )
        }
        ValueType::String => string(resource, reading)?,
        ValueType::Int8 => TypedValue::Int8(narrow(resource, value_type, &reading)?),
        ValueType::Int16 => TypedValue::Int16(narrow(resource, value_type, &reading)?),
        ValueType::Int32 => TypedValue::Int32(narrow(resource, value_type, &reading)?),
        ValueType::Int64 => TypedValue::Int64(narrow(resource, value_type, &reading)?),
        ValueType::Uint8 => TypedValue::Uint8(narrow(resource, value_type, &reading)?),
        ValueType::Uint16 => TypedValue::Uint16(narrow(resource, value_type, &reading)?),
        ValueType::Uint32 => TypedValue::Uint32(narrow(resource, value_type, &reading)?),
        ValueType::Uint64 => TypedValue::Uint64(narrow(resource, value_type, &reading)?),
        ValueType::Float32 => TypedValue::Float32(float32(resource, &reading)?),
        ValueType::Float64 => TypedValue::Float64(float64(resource, &reading)?),
    };

    // The payload must carry exactly the declared width and signedness.
    if value.value_type() != value_type {
        return Err(range_error(value_type, &value));
    }

    Ok(CommandValue::new(resource.name.as_str(), value))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use serde_json::json;

    use crate::device::DeviceResource;
    use crate::error::ErrorKind;
    use crate::value::{Reading, TypedValue, ValueType};

    use super::{NumberError, coerce, media_type_matches, parse_integer};

    const OBJECT_JSON: &str = r#"{
  "apiVersion": "v2",
  "path" : "mqtt2",
  "secretData" : [
    {
      "key" : "username",
      "value" : "app-user"
    },
    {
      "key" : "password",
      "value" : "SuperDuperSecretPassword"
    }
  ]
}
"#;

    fn resource(media_type: &str) -> DeviceResource {
        DeviceResource::new("test", ValueType::String).media_type(media_type)
    }

    fn coerce_value(
        reading: impl Into<Reading>,
        value_type: ValueType,
        content_type: &str,
    ) -> Result<TypedValue, ErrorKind> {
        coerce(&resource(""), reading.into(), value_type, content_type)
            .map(|command_value| {
                assert_eq!(command_value.value_type(), value_type);
                assert_eq!(command_value.resource_name(), "test");
                command_value.into_value()
            })
            .map_err(|e| e.kind())
    }

    fn text(reading: &str, value_type: ValueType) -> Result<TypedValue, ErrorKind> {
        coerce_value(reading, value_type, "text/plain")
    }

    #[test]
    fn binary_values() {
        let jpeg = resource("image/jpeg");
        let payload = Bytes::from_static(&[1, 0, 0, 1]);

        let value = coerce(
            &jpeg,
            Reading::Bytes(payload.clone()),
            ValueType::Binary,
            "image/jpeg",
        )
        .unwrap();
        assert_eq!(value.value(), &TypedValue::Binary(payload.clone()));

        // A mismatched content type always wins, regardless of the payload.
        for reading in [Reading::Bytes(payload), Reading::Text("text".into())] {
            assert_eq!(
                coerce(&jpeg, reading, ValueType::Binary, "image/png").map_err(|e| e.kind()),
                Err(ErrorKind::ContentTypeMismatch)
            );
        }

        // Text is not a byte sequence.
        assert_eq!(
            coerce(&jpeg, "text".into(), ValueType::Binary, "image/jpeg").map_err(|e| e.kind()),
            Err(ErrorKind::CastError)
        );
    }

    #[test]
    fn object_values() {
        let expected = serde_json::from_str::<serde_json::Value>(OBJECT_JSON)
            .unwrap()
            .as_object()
            .cloned()
            .unwrap();

        assert_eq!(
            coerce_value(OBJECT_JSON.as_bytes().to_vec(), ValueType::Object, "application/json"),
            Ok(TypedValue::Object(expected.clone()))
        );

        // Content type parameters are ignored.
        assert_eq!(
            coerce_value(
                OBJECT_JSON.as_bytes().to_vec(),
                ValueType::Object,
                "application/json; charset=UTF-8"
            ),
            Ok(TypedValue::Object(expected))
        );

        for invalid in [&b"---"[..], &b"...."[..], &b"[1, 2]"[..], &b"\"text\""[..]] {
            assert_eq!(
                coerce_value(invalid, ValueType::Object, "application/json"),
                Err(ErrorKind::DecodeError)
            );
        }

        assert_eq!(
            coerce_value(&b"...."[..], ValueType::Object, "text/plain"),
            Err(ErrorKind::ContentTypeMismatch)
        );
        assert_eq!(
            coerce_value("---", ValueType::Object, "application/json"),
            Err(ErrorKind::CastError)
        );
    }

    #[test]
    fn object_round_trip() {
        let object = json!({ "enabled": true, "level": 3, "tags": ["a", "b"] });
        let value = coerce_value(
            object.to_string().into_bytes(),
            ValueType::Object,
            "application/json",
        )
        .unwrap();

        assert_eq!(value.to_json(), Some(object));
    }

    #[test]
    fn bool_values() {
        for truthy in ["true", "TRUE", "True", "tRuE", "1", "t", "T", " true "] {
            assert_eq!(text(truthy, ValueType::Bool), Ok(TypedValue::Bool(true)));
        }
        for falsy in ["false", "FALSE", "False", "0", "f", "F"] {
            assert_eq!(text(falsy, ValueType::Bool), Ok(TypedValue::Bool(false)));
        }
        for invalid in ["bad", "", "yes", "2"] {
            assert_eq!(text(invalid, ValueType::Bool), Err(ErrorKind::CastError));
        }
    }

    #[test]
    fn string_values() {
        assert_eq!(
            coerce_value(r#"{"name" : "My JSON"}"#, ValueType::String, ""),
            Ok(TypedValue::String(r#"{"name" : "My JSON"}"#.into()))
        );
        assert_eq!(
            text("Random Text", ValueType::String),
            Ok(TypedValue::String("Random Text".into()))
        );
        assert_eq!(
            coerce_value(&[0xffu8, 0xfe][..], ValueType::String, ""),
            Err(ErrorKind::CastError)
        );
    }

    #[test]
    fn float_values() {
        assert_eq!(
            text("123.456", ValueType::Float32),
            Ok(TypedValue::Float32(123.456))
        );
        assert_eq!(
            text("-123.456", ValueType::Float32),
            Ok(TypedValue::Float32(-123.456))
        );
        assert_eq!(text("-123.junk", ValueType::Float32), Err(ErrorKind::CastError));
        assert_eq!(
            text("456.123", ValueType::Float64),
            Ok(TypedValue::Float64(456.123))
        );
        assert_eq!(
            text("-456.123", ValueType::Float64),
            Ok(TypedValue::Float64(-456.123))
        );
        assert_eq!(text("Random", ValueType::Float64), Err(ErrorKind::CastError));
    }

    #[test]
    fn float_ranges() {
        // Zero is accepted for both widths.
        assert_eq!(text("0", ValueType::Float32), Ok(TypedValue::Float32(0.0)));
        assert_eq!(text("-0.0", ValueType::Float64), Ok(TypedValue::Float64(-0.0)));

        // Larger than the width.
        assert_eq!(text("1e39", ValueType::Float32), Err(ErrorKind::RangeError));
        assert_eq!(text("1e309", ValueType::Float64), Err(ErrorKind::RangeError));
        assert_eq!(
            text("3.5e38", ValueType::Float64),
            Ok(TypedValue::Float64(3.5e38))
        );

        // Smaller than the smallest normal value.
        assert_eq!(text("1e-40", ValueType::Float32), Err(ErrorKind::RangeError));
        assert_eq!(text("1e-310", ValueType::Float64), Err(ErrorKind::RangeError));
        assert_eq!(text("1e-400", ValueType::Float64), Err(ErrorKind::RangeError));

        // Boundaries.
        assert_eq!(
            text(&f32::MAX.to_string(), ValueType::Float32),
            Ok(TypedValue::Float32(f32::MAX))
        );
        assert_eq!(
            text(&format!("{:e}", f64::MIN_POSITIVE), ValueType::Float64),
            Ok(TypedValue::Float64(f64::MIN_POSITIVE))
        );

        // Non-finite values.
        for non_finite in ["NaN", "inf", "-inf"] {
            assert_eq!(text(non_finite, ValueType::Float64), Err(ErrorKind::RangeError));
            assert_eq!(text(non_finite, ValueType::Float32), Err(ErrorKind::RangeError));
        }
    }

    #[test]
    fn unsigned_values() {
        assert_eq!(text("255", ValueType::Uint8), Ok(TypedValue::Uint8(255)));
        assert_eq!(text("FF", ValueType::Uint8), Err(ErrorKind::CastError));
        assert_eq!(text("256", ValueType::Uint8), Err(ErrorKind::RangeError));
        assert_eq!(text("-1", ValueType::Uint8), Err(ErrorKind::RangeError));

        assert_eq!(text("65535", ValueType::Uint16), Ok(TypedValue::Uint16(65535)));
        assert_eq!(text("FFFF", ValueType::Uint16), Err(ErrorKind::CastError));
        assert_eq!(text("65536", ValueType::Uint16), Err(ErrorKind::RangeError));

        assert_eq!(
            text("4294967295", ValueType::Uint32),
            Ok(TypedValue::Uint32(4_294_967_295))
        );
        assert_eq!(text("FFFFFFFF", ValueType::Uint32), Err(ErrorKind::CastError));
        assert_eq!(text("4294967296", ValueType::Uint32), Err(ErrorKind::RangeError));

        assert_eq!(
            text("6744073709551615", ValueType::Uint64),
            Ok(TypedValue::Uint64(6_744_073_709_551_615))
        );
        assert_eq!(
            text("18446744073709551615", ValueType::Uint64),
            Ok(TypedValue::Uint64(u64::MAX))
        );
        assert_eq!(
            text("FFFFFFFFFFFFFFFF", ValueType::Uint64),
            Err(ErrorKind::CastError)
        );
        assert_eq!(
            text("18446744073709551616", ValueType::Uint64),
            Err(ErrorKind::RangeError)
        );
    }

    #[test]
    fn signed_values() {
        assert_eq!(text("101", ValueType::Int8), Ok(TypedValue::Int8(101)));
        assert_eq!(text("-101", ValueType::Int8), Ok(TypedValue::Int8(-101)));
        assert_eq!(text("-101.98", ValueType::Int8), Err(ErrorKind::CastError));
        assert_eq!(text("128", ValueType::Int8), Err(ErrorKind::RangeError));
        assert_eq!(text("-128", ValueType::Int8), Ok(TypedValue::Int8(-128)));

        assert_eq!(text("2001", ValueType::Int16), Ok(TypedValue::Int16(2001)));
        assert_eq!(text("-2001", ValueType::Int16), Ok(TypedValue::Int16(-2001)));
        assert_eq!(text("-FF", ValueType::Int16), Err(ErrorKind::CastError));

        assert_eq!(text("32000", ValueType::Int32), Ok(TypedValue::Int32(32000)));
        assert_eq!(text("-32000", ValueType::Int32), Ok(TypedValue::Int32(-32000)));
        assert_eq!(text("-32.456", ValueType::Int32), Err(ErrorKind::CastError));

        assert_eq!(
            text("214748364800", ValueType::Int64),
            Ok(TypedValue::Int64(214_748_364_800))
        );
        assert_eq!(
            text("-214748364800", ValueType::Int64),
            Ok(TypedValue::Int64(-214_748_364_800))
        );
        assert_eq!(text("-21474.99", ValueType::Int64), Err(ErrorKind::CastError));
        assert_eq!(
            text("9223372036854775808", ValueType::Int64),
            Err(ErrorKind::RangeError)
        );
    }

    #[test]
    fn integer_notations() {
        assert_eq!(text("0xFF", ValueType::Uint8), Ok(TypedValue::Uint8(255)));
        assert_eq!(text("0b101", ValueType::Int8), Ok(TypedValue::Int8(5)));
        assert_eq!(text("-0o17", ValueType::Int16), Ok(TypedValue::Int16(-15)));
        assert_eq!(text("12.00", ValueType::Int32), Ok(TypedValue::Int32(12)));
        assert_eq!(text(" 42 ", ValueType::Uint16), Ok(TypedValue::Uint16(42)));
        assert_eq!(text("+7", ValueType::Int64), Ok(TypedValue::Int64(7)));
        assert_eq!(text("", ValueType::Int32), Err(ErrorKind::CastError));
        assert_eq!(text("-", ValueType::Int32), Err(ErrorKind::CastError));
        assert_eq!(text("0x", ValueType::Int32), Err(ErrorKind::CastError));
    }

    #[test]
    fn leading_zero_is_octal() {
        assert_eq!(text("010", ValueType::Int8), Ok(TypedValue::Int8(8)));
        assert_eq!(text("-010", ValueType::Int16), Ok(TypedValue::Int16(-8)));
        assert_eq!(text("0", ValueType::Uint8), Ok(TypedValue::Uint8(0)));
        assert_eq!(text("00", ValueType::Uint8), Ok(TypedValue::Uint8(0)));
        assert_eq!(text("09", ValueType::Int32), Err(ErrorKind::CastError));
        assert_eq!(text("0777", ValueType::Uint8), Err(ErrorKind::RangeError));
    }

    #[test]
    fn digit_separators() {
        assert_eq!(text("1_000", ValueType::Int32), Ok(TypedValue::Int32(1000)));
        assert_eq!(text("0x_FF", ValueType::Uint8), Ok(TypedValue::Uint8(255)));
        assert_eq!(text("0_7", ValueType::Uint8), Ok(TypedValue::Uint8(7)));
        assert_eq!(text("-1_000.00", ValueType::Int16), Ok(TypedValue::Int16(-1000)));
        for misplaced in ["_1", "1_", "1__0", "-_1", "0x_", "1_.0"] {
            assert_eq!(text(misplaced, ValueType::Int32), Err(ErrorKind::CastError), "{misplaced}");
        }
    }

    #[test]
    fn zero_decimals() {
        assert_eq!(text("12.0", ValueType::Int32), Ok(TypedValue::Int32(12)));
        assert_eq!(text("0x10.00", ValueType::Uint8), Ok(TypedValue::Uint8(16)));
        for invalid in ["12.", ".0", "12.05", "1.0.0.5"] {
            assert_eq!(text(invalid, ValueType::Int32), Err(ErrorKind::CastError), "{invalid}");
        }
    }

    #[test]
    fn huge_integers() {
        let huge = "1".repeat(60);
        assert_eq!(parse_integer(&huge), Err(NumberError::OutOfRange));
        assert_eq!(text(&huge, ValueType::Uint64), Err(ErrorKind::RangeError));
        assert_eq!(parse_integer("12a"), Err(NumberError::Invalid));
    }

    #[test]
    fn every_value_type_accepts_well_formed_input() {
        for value_type in ValueType::ALL {
            let (reading, content_type): (Reading, &str) = match value_type {
                ValueType::Binary => (Reading::Bytes(Bytes::from_static(b"raw")), ""),
                ValueType::Object => (br#"{"a":1}"#.to_vec().into(), "application/json"),
                ValueType::Bool => ("true".into(), "text/plain"),
                ValueType::String => ("text".into(), "text/plain"),
                _ => ("1".into(), "text/plain"),
            };

            let value = coerce(&resource(""), reading, value_type, content_type).unwrap();
            assert_eq!(value.value().value_type(), value_type);
        }
    }

    #[test]
    fn media_types() {
        assert!(media_type_matches("application/json", "application/json"));
        assert!(media_type_matches(
            "application/json",
            "Application/JSON; charset=UTF-8"
        ));
        assert!(media_type_matches("", ""));
        assert!(!media_type_matches("image/jpeg", "image/png"));
        assert!(!media_type_matches("image/jpeg", ""));
    }
}

//! Canonical value serialization.
//!
//! Converts [`Value`]s to the byte representation used everywhere in the
//! emitted document, following the PDF specification syntax rules
//! (ISO 32000-1:2008, Section 7.3). Encoding is total: every accepted value
//! shape maps to bytes, there is no failure path.

use crate::object::Value;

/// Magnitudes below this threshold collapse to `0`.
pub(crate) const MIN_MAGNITUDE: f64 = 1e-6;

/// Magnitudes above this ceiling are clamped to it, keeping the sign.
///
/// The PDF numeric grammar has no scientific notation, so unbounded values
/// must be forced into a plain decimal form.
pub(crate) const MAX_MAGNITUDE: f64 = 1e10;

/// Serialize a value to its canonical bytes.
pub fn encode_value(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_value(&mut buf, value);
    buf
}

/// Append a value's canonical bytes to a buffer.
pub(crate) fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => buf.extend_from_slice(i.to_string().as_bytes()),
        Value::Real(r) => buf.extend_from_slice(format_number(*r).as_bytes()),
        Value::Name(n) => {
            buf.push(b'/');
            buf.extend_from_slice(n.as_bytes());
        },
        Value::Literal(s) => buf.extend_from_slice(s.as_bytes()),
        Value::Raw(bytes) => buf.extend_from_slice(bytes),
        Value::String(s) => buf.extend_from_slice(&s.to_bytes()),
        Value::Reference(r) => {
            buf.extend_from_slice(format!("{} {} R", r.number, r.generation).as_bytes())
        },
        Value::Dictionary(dict) => buf.extend_from_slice(&dict.to_bytes()),
        Value::Array(array) => buf.extend_from_slice(&array.to_bytes()),
    }
}

/// Format a number as a PDF numeric token.
///
/// Mathematically integral values are written as plain integers. Everything
/// else is written in fixed-point form with at most six decimals and
/// trailing zeros trimmed. Magnitudes outside
/// [[`MIN_MAGNITUDE`], [`MAX_MAGNITUDE`]] are coerced so the output never
/// needs scientific notation.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "0".to_string();
    }
    let value = if value.is_infinite() {
        MAX_MAGNITUDE.copysign(value)
    } else {
        value
    };

    let magnitude = value.abs();
    if magnitude < MIN_MAGNITUDE {
        return "0".to_string();
    }
    if magnitude > MAX_MAGNITUDE {
        return format!("{}", MAX_MAGNITUDE.copysign(value) as i64);
    }

    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.6}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

//! Lenient value coercion
//!
//! Records written by hand or by older tools carry node values as numbers,
//! numeric strings, or nothing at all. Values are kept raw in the record and
//! coerced once, when the graph is built.

use heapless::String;

/// Maximum stored length of a textual value
pub const MAX_TEXT_LEN: usize = 32;

/// A node value as found in a configuration record
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawValue {
    /// Field absent
    #[default]
    Missing,
    Number(f64),
    Text(String<MAX_TEXT_LEN>),
}

impl RawValue {
    /// Wrap a textual value
    ///
    /// Text that does not fit inline is coerced immediately; anything that
    /// fails to parse becomes NaN, which coerces to the caller's default.
    pub fn from_text(text: &str) -> Self {
        match String::try_from(text) {
            Ok(text) => RawValue::Text(text),
            Err(_) => RawValue::Number(parse_text(text).unwrap_or(f64::NAN)),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// Parse trimmed text as a finite number; blank text is zero
fn parse_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a raw value to a finite number
///
/// - missing: `default`
/// - number: itself if finite, else `default`
/// - text: trimmed and parsed; blank text is 0, unparsable or non-finite
///   text is `default`
pub fn to_number_or_default(raw: &RawValue, default: f64) -> f64 {
    match raw {
        RawValue::Missing => default,
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Number(_) => default,
        RawValue::Text(text) => parse_text(text).unwrap_or(default),
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt;

    use heapless::String;
    use serde::de::{self, Deserializer, Visitor};
    use serde::{Deserialize, Serialize, Serializer};

    use super::{RawValue, MAX_TEXT_LEN};

    /// Binary form; postcard is not self-describing
    #[derive(Serialize, Deserialize)]
    enum Tagged {
        Missing,
        Number(f64),
        Text(String<MAX_TEXT_LEN>),
    }

    impl Serialize for RawValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                return match self {
                    RawValue::Missing => serializer.serialize_none(),
                    RawValue::Number(n) => serializer.serialize_f64(*n),
                    RawValue::Text(text) => serializer.serialize_str(text),
                };
            }
            let tagged = match self {
                RawValue::Missing => Tagged::Missing,
                RawValue::Number(n) => Tagged::Number(*n),
                RawValue::Text(text) => Tagged::Text(text.clone()),
            };
            tagged.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for RawValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                return deserializer.deserialize_any(RawValueVisitor);
            }
            Ok(match Tagged::deserialize(deserializer)? {
                Tagged::Missing => RawValue::Missing,
                Tagged::Number(n) => RawValue::Number(n),
                Tagged::Text(text) => RawValue::Text(text),
            })
        }
    }

    struct RawValueVisitor;

    impl<'de> Visitor<'de> for RawValueVisitor {
        type Value = RawValue;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
            Ok(RawValue::Number(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
            Ok(RawValue::Number(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
            Ok(RawValue::Number(v as f64))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
            Ok(RawValue::Number(if v { 1.0 } else { 0.0 }))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
            Ok(RawValue::from_text(v))
        }

        fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
            Ok(RawValue::Missing)
        }

        fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
            Ok(RawValue::Missing)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawValue, D::Error> {
            RawValue::deserialize(deserializer)
        }
    }
}

//! Serde helpers for [`FlakeId`].
//!
//! `FlakeId` serializes as its native integer by default. JSON consumers
//! that parse numbers as IEEE doubles lose precision above 2^53, so
//! [`as_string`] is provided for use with `#[serde(with = "...")]`.
//!
//! [`FlakeId`]: crate::FlakeId

pub mod as_string {
    use core::fmt;

    use serde::{Deserializer, Serializer, de};

    use crate::FlakeId;

    /// Serialize an identifier as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &FlakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an identifier from a decimal string. Native integers are
    /// accepted as well, so existing payloads keep decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a valid unsigned 64-bit decimal number
    pub fn deserialize<'de, D>(d: D) -> Result<FlakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(IdVisitor)
    }

    struct IdVisitor;

    impl de::Visitor<'_> for IdVisitor {
        type Value = FlakeId;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal identifier string or an unsigned integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<FlakeId, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<FlakeId, E> {
            Ok(FlakeId::from_raw(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<FlakeId, E> {
            u64::try_from(v)
                .map(FlakeId::from_raw)
                .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }
    }
}

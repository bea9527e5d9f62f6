use core::{fmt, str::FromStr};

use crate::error::Error;

/// A packed Snowflake-style identifier.
///
/// The raw value is an unsigned 64-bit integer whose top bit is always clear
/// for identifiers produced by this crate. Identifiers compare by raw value,
/// so they sort by creation time first.
///
/// The field layout is not stored in the identifier itself; use
/// [`IdCodec::decode`] with the configuration that produced it to recover
/// the fields.
///
/// [`IdCodec::decode`]: crate::IdCodec::decode
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// The raw value reinterpreted as a signed integer, for storage in
    /// columns such as `BIGINT`.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Returns the ID as a zero-padded 20-digit string, which sorts
    /// lexicographically in the same order as the numeric value.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<u64> for FlakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl FromStr for FlakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_raw(s.trim().parse()?))
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FlakeId").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_text() {
        let id: FlakeId = " 7149597483384553472 ".parse().unwrap();
        assert_eq!(id.to_raw(), 7_149_597_483_384_553_472);
        assert_eq!(id.to_string(), "7149597483384553472");
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(matches!("0x12".parse::<FlakeId>(), Err(Error::ParseId(_))));
        assert!(matches!("-1".parse::<FlakeId>(), Err(Error::ParseId(_))));
    }

    #[test]
    fn padded_string_sorts_like_the_number() {
        let small = FlakeId::from_raw(9);
        let large = FlakeId::from_raw(10);
        assert_eq!(small.to_padded_string(), "00000000000000000009");
        assert!(small.to_padded_string() < large.to_padded_string());
        assert!(small < large);
    }
}

use crate::error::ConfigError;

/// Number of bits available to an identifier. The most significant bit of
/// the `u64` is always left clear so the value stays positive when stored
/// as a signed 64-bit integer.
pub const USABLE_BITS: u32 = 63;

/// Bit widths of the four identifier fields.
///
/// ```text
///  Bit Index:  63           63 62            22 21         17 16      12 11             0
///              +--------------+----------------+-------------+----------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter  | machine  | sequence (12) |
///              |              |                |     (5)     |   (5)    |               |
///              +--------------+----------------+-------------+----------+---------------+
///              |<----------- MSB ------------- 64 bits ------------------ LSB --------->|
/// ```
///
/// The diagram shows [`BitLayout::DEFAULT`]. Other layouts are accepted as
/// long as [`BitLayout::validate`] passes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitLayout {
    pub timestamp_bits: u32,
    pub datacenter_bits: u32,
    pub machine_bits: u32,
    pub sequence_bits: u32,
}

impl Default for BitLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitLayout {
    /// 41 bits of timestamp, 5 of datacenter, 5 of machine and 12 of
    /// sequence.
    pub const DEFAULT: Self = Self::new(41, 5, 5, 12);

    pub const fn new(
        timestamp_bits: u32,
        datacenter_bits: u32,
        machine_bits: u32,
        sequence_bits: u32,
    ) -> Self {
        Self {
            timestamp_bits,
            datacenter_bits,
            machine_bits,
            sequence_bits,
        }
    }

    /// Checks that every field fits in [`USABLE_BITS`] and that the
    /// timestamp and sequence fields are not empty.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyField`] if `timestamp_bits` or `sequence_bits`
    ///   is zero
    /// - [`ConfigError::LayoutTooWide`] if the widths sum past 63
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.timestamp_bits == 0 {
            return Err(ConfigError::EmptyField { field: "timestamp" });
        }
        if self.sequence_bits == 0 {
            return Err(ConfigError::EmptyField { field: "sequence" });
        }
        // Each width is compared first so the sum below cannot overflow.
        if self.timestamp_bits > USABLE_BITS
            || self.datacenter_bits > USABLE_BITS
            || self.machine_bits > USABLE_BITS
            || self.sequence_bits > USABLE_BITS
            || self.total_bits() > USABLE_BITS
        {
            return Err(ConfigError::LayoutTooWide {
                total: self.total_bits(),
                max: USABLE_BITS,
            });
        }
        Ok(())
    }

    /// Sum of all field widths, saturating.
    pub const fn total_bits(&self) -> u32 {
        self.timestamp_bits
            .saturating_add(self.datacenter_bits)
            .saturating_add(self.machine_bits)
            .saturating_add(self.sequence_bits)
    }

    /// Bit offset of the timestamp field.
    pub const fn timestamp_shift(&self) -> u32 {
        self.datacenter_bits + self.machine_bits + self.sequence_bits
    }

    /// Bit offset of the datacenter field.
    pub const fn datacenter_shift(&self) -> u32 {
        self.machine_bits + self.sequence_bits
    }

    /// Bit offset of the machine field.
    pub const fn machine_shift(&self) -> u32 {
        self.sequence_bits
    }

    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    pub const fn max_datacenter_id(&self) -> u64 {
        mask(self.datacenter_bits)
    }

    pub const fn max_machine_id(&self) -> u64 {
        mask(self.machine_bits)
    }

    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }
}

/// Low `bits` set. Widths of 64 and above saturate to `u64::MAX`.
pub(crate) const fn mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_fills_63_bits() {
        let layout = BitLayout::DEFAULT;
        assert_eq!(layout.total_bits(), 63);
        assert_eq!(layout.validate(), Ok(()));
        assert_eq!(layout.timestamp_shift(), 22);
        assert_eq!(layout.datacenter_shift(), 17);
        assert_eq!(layout.machine_shift(), 12);
        assert_eq!(layout.max_datacenter_id(), 31);
        assert_eq!(layout.max_machine_id(), 31);
        assert_eq!(layout.max_sequence(), 4095);
        assert_eq!(layout.max_timestamp(), (1 << 41) - 1);
    }

    #[test]
    fn rejects_layouts_wider_than_63_bits() {
        let layout = BitLayout::new(42, 5, 5, 12);
        assert_eq!(
            layout.validate(),
            Err(ConfigError::LayoutTooWide { total: 64, max: 63 })
        );

        let layout = BitLayout::new(u32::MAX, 0, 0, 1);
        assert!(matches!(
            layout.validate(),
            Err(ConfigError::LayoutTooWide { .. })
        ));
    }

    #[test]
    fn rejects_empty_timestamp_or_sequence() {
        assert_eq!(
            BitLayout::new(0, 5, 5, 12).validate(),
            Err(ConfigError::EmptyField { field: "timestamp" })
        );
        assert_eq!(
            BitLayout::new(41, 5, 5, 0).validate(),
            Err(ConfigError::EmptyField { field: "sequence" })
        );
    }

    #[test]
    fn location_fields_may_be_empty() {
        let layout = BitLayout::new(48, 0, 0, 15);
        assert_eq!(layout.validate(), Ok(()));
        assert_eq!(layout.max_datacenter_id(), 0);
        assert_eq!(layout.max_machine_id(), 0);
    }
}

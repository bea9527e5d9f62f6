use core::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::{ConfigError, Error},
    id::{BitLayout, FlakeId},
};

/// Packs and unpacks identifiers for one layout and epoch.
///
/// A codec is a pure value: it holds no generation state, so decoding never
/// touches the generator that issued an identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdCodec {
    layout: BitLayout,
    epoch: u64,
}

/// The fields recovered from a [`FlakeId`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedId {
    /// The identifier that was decoded. Serialized as a decimal string
    /// because JSON numbers lose precision above 2^53.
    #[cfg_attr(feature = "serde", serde(with = "crate::serde::as_string"))]
    pub id: FlakeId,
    /// Absolute timestamp, in milliseconds since the Unix epoch.
    pub timestamp_millis: u64,
    /// Datacenter field of the identifier.
    pub datacenter_id: u64,
    /// Machine field of the identifier.
    pub machine_id: u64,
    /// Position of the identifier within its millisecond.
    pub sequence: u64,
}

impl DecodedId {
    /// The absolute creation time as a point in time, or `None` if the
    /// platform's [`SystemTime`] cannot represent it.
    pub fn timestamp(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(Duration::from_millis(self.timestamp_millis))
    }
}

impl IdCodec {
    /// Creates a codec, validating the layout.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the layout does not fit in 63 bits.
    pub const fn new(layout: BitLayout, epoch: u64) -> Result<Self, ConfigError> {
        match layout.validate() {
            Ok(()) => Ok(Self { layout, epoch }),
            Err(e) => Err(e),
        }
    }

    pub const fn layout(&self) -> &BitLayout {
        &self.layout
    }

    /// The epoch in milliseconds since the Unix epoch.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Converts an absolute clock reading into the timestamp field value.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBeforeEpoch`] if `now` precedes the epoch
    /// - [`Error::TimestampOverflow`] if the elapsed time does not fit in the
    ///   timestamp field
    pub fn elapsed(&self, now: u64) -> Result<u64, Error> {
        let Some(elapsed) = now.checked_sub(self.epoch) else {
            return Err(Error::ClockBeforeEpoch {
                now,
                epoch: self.epoch,
            });
        };
        let max = self.layout.max_timestamp();
        if elapsed > max {
            return Err(Error::TimestampOverflow { elapsed, max });
        }
        Ok(elapsed)
    }

    /// Packs already validated field values.
    ///
    /// Values wider than their field are masked off, so callers are expected
    /// to range-check them first (the generators do).
    pub const fn pack(
        &self,
        elapsed: u64,
        datacenter_id: u64,
        machine_id: u64,
        sequence: u64,
    ) -> FlakeId {
        let l = &self.layout;
        debug_assert!(elapsed <= l.max_timestamp(), "timestamp overflow");
        debug_assert!(datacenter_id <= l.max_datacenter_id(), "datacenter_id overflow");
        debug_assert!(machine_id <= l.max_machine_id(), "machine_id overflow");
        debug_assert!(sequence <= l.max_sequence(), "sequence overflow");
        let raw = ((elapsed & l.max_timestamp()) << l.timestamp_shift())
            | ((datacenter_id & l.max_datacenter_id()) << l.datacenter_shift())
            | ((machine_id & l.max_machine_id()) << l.machine_shift())
            | (sequence & l.max_sequence());
        FlakeId::from_raw(raw)
    }

    /// Splits an identifier into its fields.
    ///
    /// The timestamp field is not masked: it takes every bit above the
    /// datacenter field. Identifiers built under another layout or epoch
    /// decode to meaningless values, never to a panic.
    pub const fn decode(&self, id: FlakeId) -> DecodedId {
        let l = &self.layout;
        let raw = id.to_raw();
        DecodedId {
            id,
            timestamp_millis: self.timestamp_millis(id),
            datacenter_id: (raw >> l.datacenter_shift()) & l.max_datacenter_id(),
            machine_id: (raw >> l.machine_shift()) & l.max_machine_id(),
            sequence: raw & l.max_sequence(),
        }
    }

    /// Absolute timestamp of an identifier in milliseconds since the Unix
    /// epoch, saturating at `u64::MAX`.
    pub const fn timestamp_millis(&self, id: FlakeId) -> u64 {
        (id.to_raw() >> self.layout.timestamp_shift()).saturating_add(self.epoch)
    }

    /// The smallest identifier this codec can produce for the given absolute
    /// millisecond, useful as a lower bound in range queries.
    ///
    /// # Errors
    ///
    /// Same as [`IdCodec::elapsed`].
    pub fn min_id_at(&self, millis: u64) -> Result<FlakeId, Error> {
        Ok(self.pack(self.elapsed(millis)?, 0, 0, 0))
    }
}

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakegen` can emit.
///
/// Every error is local to the call that produced it. None of them leave a
/// generator in a state where subsequent calls become permanently invalid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The generator configuration was rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The clock reported a time earlier than the timestamp of the last
    /// issued identifier.
    ///
    /// The generator does not attempt to compensate. The caller decides
    /// whether to retry, alert or abort.
    #[error("clock moved backwards: now {now} ms is before last issued {last} ms")]
    ClockMovedBackwards {
        /// Clock reading, in milliseconds since the Unix epoch.
        now: u64,
        /// Timestamp of the last issued identifier.
        last: u64,
    },

    /// The sequence was exhausted and the clock did not advance within the
    /// configured stall timeout.
    #[error("clock did not advance within {waited:?} after the sequence was exhausted")]
    ClockStalled {
        /// How long the generator waited before giving up.
        waited: core::time::Duration,
    },

    /// The clock reported a time earlier than the configured epoch.
    #[error("clock reading {now} ms is before the configured epoch {epoch} ms")]
    ClockBeforeEpoch {
        /// Clock reading, in milliseconds since the Unix epoch.
        now: u64,
        /// Configured epoch, in milliseconds since the Unix epoch.
        epoch: u64,
    },

    /// The elapsed time since the epoch no longer fits in the timestamp
    /// field.
    #[error("timestamp {elapsed} ms since epoch exceeds the maximum of {max}")]
    TimestampOverflow {
        /// Milliseconds elapsed since the configured epoch.
        elapsed: u64,
        /// Largest value the timestamp field can hold.
        max: u64,
    },

    /// The shared state lock was poisoned by a panicking thread.
    ///
    /// Only produced by [`LockIdGenerator`] when the `parking-lot` feature is
    /// disabled.
    ///
    /// [`LockIdGenerator`]: crate::LockIdGenerator
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A textual identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    ParseId(#[from] core::num::ParseIntError),
}

/// Reasons a [`GeneratorConfig`] is rejected.
///
/// [`GeneratorConfig`]: crate::GeneratorConfig
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The datacenter ID does not fit in the datacenter field.
    #[error("datacenter id {value} is out of range, must be 0-{max}")]
    DatacenterIdOutOfRange {
        /// Rejected value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The machine ID does not fit in the machine field.
    #[error("machine id {value} is out of range, must be 0-{max}")]
    MachineIdOutOfRange {
        /// Rejected value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The field widths do not fit in the 63 usable bits of an identifier.
    #[error("bit layout uses {total} bits, at most {max} are available")]
    LayoutTooWide {
        /// Sum of all field widths.
        total: u32,
        /// Number of usable bits.
        max: u32,
    },

    /// A field that must carry information was given zero bits.
    #[error("the {field} field must be at least one bit wide")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_field_and_range() {
        let err = Error::from(ConfigError::DatacenterIdOutOfRange { value: 32, max: 31 });
        assert_eq!(
            err.to_string(),
            "datacenter id 32 is out of range, must be 0-31"
        );

        let err = ConfigError::MachineIdOutOfRange { value: 40, max: 31 };
        assert_eq!(err.to_string(), "machine id 40 is out of range, must be 0-31");
    }

    #[test]
    fn parse_errors_convert() {
        let err: Error = "abc".parse::<u64>().unwrap_err().into();
        assert!(matches!(err, Error::ParseId(_)));
    }
}

use core::time::Duration;

use crate::{
    error::ConfigError,
    id::{BitLayout, IdCodec},
    time::DEFAULT_EPOCH,
};

/// How long [`IdGenerator::generate`] waits for the clock to advance after
/// the sequence is exhausted before failing.
///
/// [`IdGenerator::generate`]: crate::IdGenerator::generate
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(1);

/// Static configuration shared by every generator flavour.
///
/// Build one with [`GeneratorConfig::default`] and the `with_*` methods. The
/// configuration is validated when a generator is constructed and is
/// immutable afterwards.
///
/// # Example
///
/// ```
/// use flakegen::{BasicIdGenerator, GeneratorConfig, IdGenerator, SystemClock};
///
/// let config = GeneratorConfig::default()
///     .with_datacenter_id(1)
///     .with_machine_id(3);
/// let generator = BasicIdGenerator::new(config, SystemClock).unwrap();
///
/// let id = generator.generate().unwrap();
/// let decoded = generator.decode(id);
/// assert_eq!(decoded.datacenter_id, 1);
/// assert_eq!(decoded.machine_id, 3);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    /// Zero point of the timestamp field, in milliseconds since the Unix
    /// epoch. Must not be later than the clock when IDs are generated.
    pub epoch: u64,
    pub layout: BitLayout,
    pub datacenter_id: u64,
    pub machine_id: u64,
    /// Upper bound on the busy-wait after sequence exhaustion.
    pub stall_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            epoch: DEFAULT_EPOCH,
            layout: BitLayout::DEFAULT,
            datacenter_id: 0,
            machine_id: 0,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub const fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: BitLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn with_datacenter_id(mut self, datacenter_id: u64) -> Self {
        self.datacenter_id = datacenter_id;
        self
    }

    #[must_use]
    pub const fn with_machine_id(mut self, machine_id: u64) -> Self {
        self.machine_id = machine_id;
        self
    }

    #[must_use]
    pub const fn with_stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.stall_timeout = stall_timeout;
        self
    }

    /// Validates the layout and both location IDs and returns the codec for
    /// this configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::LayoutTooWide`] / [`ConfigError::EmptyField`] for an
    ///   unusable layout
    /// - [`ConfigError::DatacenterIdOutOfRange`] if `datacenter_id` exceeds
    ///   `2^datacenter_bits - 1`
    /// - [`ConfigError::MachineIdOutOfRange`] if `machine_id` exceeds
    ///   `2^machine_bits - 1`
    pub fn validate(&self) -> Result<IdCodec, ConfigError> {
        let codec = IdCodec::new(self.layout, self.epoch)?;

        let max = self.layout.max_datacenter_id();
        if self.datacenter_id > max {
            return Err(ConfigError::DatacenterIdOutOfRange {
                value: self.datacenter_id,
                max,
            });
        }

        let max = self.layout.max_machine_id();
        if self.machine_id > max {
            return Err(ConfigError::MachineIdOutOfRange {
                value: self.machine_id,
                max,
            });
        }

        Ok(codec)
    }
}

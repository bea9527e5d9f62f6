use core::cmp::Ordering;

use crate::{
    error::{Error, Result},
    generator::GeneratorConfig,
    id::{FlakeId, IdCodec},
};

/// Mutable generation state: the timestamp of the last issued identifier
/// and the sequence used with it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    /// Absolute milliseconds of the last issued ID, `None` before the first.
    pub(crate) last_timestamp: Option<u64>,
    pub(crate) sequence: u64,
}

/// Outcome of applying one clock reading to a [`State`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    Issued { id: FlakeId, next: State },
    /// The sequence for `last` is used up.
    Exhausted { last: u64 },
}

/// The immutable half of a generator: codec plus location IDs.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Node {
    pub(crate) codec: IdCodec,
    pub(crate) datacenter_id: u64,
    pub(crate) machine_id: u64,
}

impl Node {
    pub(crate) fn new(config: &GeneratorConfig) -> Result<Self> {
        let codec = config.validate()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            epoch = config.epoch,
            datacenter_id = config.datacenter_id,
            machine_id = config.machine_id,
            layout = ?config.layout,
            "id generator configured"
        );
        Ok(Self {
            codec,
            datacenter_id: config.datacenter_id,
            machine_id: config.machine_id,
        })
    }

    /// Computes the next state for a clock reading without committing it.
    pub(crate) fn advance(&self, state: State, now: u64) -> Result<Advance> {
        let Some(last) = state.last_timestamp else {
            return self.issue(now, 0);
        };

        match now.cmp(&last) {
            Ordering::Greater => self.issue(now, 0),
            Ordering::Equal => {
                if state.sequence < self.codec.layout().max_sequence() {
                    self.issue(now, state.sequence + 1)
                } else {
                    Ok(Advance::Exhausted { last })
                }
            }
            Ordering::Less => Err(Self::cold_clock_behind(now, last)),
        }
    }

    fn issue(&self, now: u64, sequence: u64) -> Result<Advance> {
        let elapsed = self.codec.elapsed(now)?;
        let id = self
            .codec
            .pack(elapsed, self.datacenter_id, self.machine_id, sequence);
        Ok(Advance::Issued {
            id,
            next: State {
                last_timestamp: Some(now),
                sequence,
            },
        })
    }

    /// Rebuilds the state from the last issued identifier.
    pub(crate) fn state_of(&self, id: FlakeId) -> State {
        let decoded = self.codec.decode(id);
        State {
            last_timestamp: Some(decoded.timestamp_millis),
            sequence: decoded.sequence,
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards");
        Error::ClockMovedBackwards { now, last }
    }
}

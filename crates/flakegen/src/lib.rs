//! Snowflake-style 64-bit identifiers: time-ordered, unique across processes
//! without coordination, and decodable back into their fields.
//!
//! An identifier packs, from the most significant bit down, a timestamp in
//! milliseconds since a custom epoch, a datacenter ID, a machine ID and a
//! per-millisecond sequence. The default [`BitLayout`] is 41/5/5/12 bits,
//! leaving the sign bit clear.
//!
//! ```
//! use flakegen::{BasicIdGenerator, IdGenerator};
//!
//! let generator = BasicIdGenerator::with_ids(1, 3).unwrap();
//! let id = generator.generate().unwrap();
//!
//! let decoded = generator.decode(id);
//! assert_eq!(decoded.datacenter_id, 1);
//! assert_eq!(decoded.machine_id, 3);
//! ```
//!
//! Three generators share the same algorithm and differ in how they guard
//! their state: [`BasicIdGenerator`] (single-threaded), [`LockIdGenerator`]
//! (mutex) and [`AtomicIdGenerator`] (compare-and-swap).
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;

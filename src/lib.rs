//! lfring - circular-array lock-free queues
//!
//! Fixed-capacity queues over a circular array, synchronized entirely through
//! atomic index updates: no locks, no blocking. Two flavors share the same
//! storage and the same multi-consumer pop protocol:
//!
//! - [`SpmcQueue`]: one producer (enforced through an exclusive [`Producer`]
//!   handle), any number of consumers. The producer publishes a slot with a
//!   single release store of the write index.
//! - [`MpmcQueue`]: any number of producers and consumers. Producers reserve a
//!   slot with a CAS on the write index and commit it in reservation order
//!   through a separate committed-index counter.
//!
//! Both flavors trade one slot for an unambiguous full/empty distinction, so a
//! queue with capacity `CAP` holds at most `CAP - 1` elements.
//!
//! `push` and `pop` never block: they return [`Full`] (handing the element
//! back) or [`Empty`] and leave retry policy to the caller.
//!
//! ```
//! use lfring::SpmcQueue;
//!
//! let queue = SpmcQueue::<u32, 8>::new();
//! let mut producer = queue.producer();
//! producer.push(7).unwrap();
//! assert_eq!(queue.pop(), Ok(7));
//! ```
#![warn(missing_docs)]

mod errors;
mod mpmc;
mod raw;
mod spmc;
mod sync;

pub use errors::{Empty, Full};
pub use mpmc::MpmcQueue;
pub use spmc::{Producer, SpmcQueue};

//! rentkit: a min-heap with remove-by-value through tombstones, and a rental
//! availability service built on it.
//!
//! - [`ds::TombstoneHeap`]: insert, remove-by-value, pop-min and a
//!   non-destructive `peek_top_k`.
//! - [`rental::RentalService`]: per-item cheapest-available queries and a
//!   global cheapest-checked-out report over a fixed price table.
//!
//! Features: `concurrency` adds lock-guarded variants, `metrics` adds
//! operation counters and a Prometheus text exporter.

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod prelude;
pub mod rental;

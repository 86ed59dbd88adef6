//! Rental availability services built on [`TombstoneHeap`].
//!
//! Each (item, supplier) pair has a fixed price and is either *available* or
//! *checked out*. Available pairs live in a per-item heap of
//! `(price, supplier)`; checked-out pairs live in one global heap of
//! `(price, supplier, item)`. A state transition tombstones the pair in one
//! heap and inserts it in the other.
//!
//! ```text
//!   prices (read-only)            per-item available heaps
//!   ┌──────────────────────┐      ┌──────────────────────────────────┐
//!   │ item 1: {2: 5,       │      │ item 1: (4,7) (5,2)† (6,5)        │
//!   │          7: 4,       │      └──────────────────────────────────┘
//!   │          5: 6}       │      global checked-out heap
//!   └──────────────────────┘      ┌──────────────────────────────────┐
//!                                 │ (5,2,1)                           │
//!     checkout(2, 1) ───────────▶ └──────────────────────────────────┘
//!                                 † tombstoned
//! ```
//!
//! - [`RentalService`]: single-threaded, `&mut self` API.
//! - `ConcurrentRentalService` (`concurrency` feature): one mutex per heap,
//!   `&self` API.

#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod service;

#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentRentalService;
pub use service::RentalService;

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::ds::TombstoneHeap;
use crate::error::{RentalError, Result};

/// Prices and available suppliers of one item.
#[derive(Debug, Clone)]
pub(crate) struct Shelf<S, P> {
    pub(crate) prices: FxHashMap<S, P>,
    pub(crate) available: TombstoneHeap<(P, S)>,
}

impl<S, P> Shelf<S, P>
where
    S: Ord + Hash + Clone,
    P: Ord + Hash + Clone,
{
    fn new() -> Self {
        Self {
            prices: FxHashMap::default(),
            available: TombstoneHeap::new(),
        }
    }
}

/// Indexes `(item, supplier, price)` triples into one shelf per item, with
/// every pair initially available.
pub(crate) fn stock_shelves<I, S, P>(
    entries: impl IntoIterator<Item = (I, S, P)>,
    capacity_hint: usize,
) -> Result<FxHashMap<I, Shelf<S, P>>>
where
    I: Ord + Hash + Clone + Debug,
    S: Ord + Hash + Clone + Debug,
    P: Ord + Hash + Clone + Debug,
{
    let mut shelves: FxHashMap<I, Shelf<S, P>> =
        FxHashMap::with_capacity_and_hasher(capacity_hint, Default::default());
    let mut pairs = 0usize;

    for (item, supplier, price) in entries {
        let duplicate = shelves
            .get(&item)
            .is_some_and(|shelf| shelf.prices.contains_key(&supplier));
        if duplicate {
            let err = RentalError::duplicate_entry(&supplier, &item);
            warn!(%err, "rejected rental entries");
            return Err(err);
        }

        let shelf = shelves.entry(item).or_insert_with(Shelf::new);
        shelf.available.insert((price.clone(), supplier.clone()));
        shelf.prices.insert(supplier, price);
        pairs += 1;
    }

    debug!(items = shelves.len(), pairs, "stocked rental shelves");
    Ok(shelves)
}

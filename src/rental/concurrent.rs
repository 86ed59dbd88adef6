//! Thread-safe rental service.
//!
//! ## Architecture
//!
//! ```text
//!   ConcurrentRentalService
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ shelves: FxHashMap<I, SharedShelf>    (structure immutable)  │
//!   │   ├─ item 1: prices (no lock) + Mutex<TombstoneHeap<(P,S)>>  │
//!   │   └─ item 2: prices (no lock) + Mutex<TombstoneHeap<(P,S)>>  │
//!   │ checked_out: Mutex<TombstoneHeap<(P,S,I)>>                   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lock order is always item heap before the checked-out heap. A transition
//! holds both locks, so no reader observes a pair in both heaps or in
//! neither. Queries hold one lock for the whole pop-then-restore sequence.

use std::fmt::Debug;
use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::builder::RentalConfig;
use crate::ds::TombstoneHeap;
use crate::error::{InvariantError, RentalError, Result};
use crate::rental::stock_shelves;

#[derive(Debug)]
struct SharedShelf<S, P> {
    prices: FxHashMap<S, P>,
    available: Mutex<TombstoneHeap<(P, S)>>,
}

/// Thread-safe counterpart of [`RentalService`](crate::rental::RentalService).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use rentkit::rental::ConcurrentRentalService;
///
/// let service = Arc::new(
///     ConcurrentRentalService::new([(1u32, 2u32, 5u32), (1, 7, 4), (1, 5, 6)]).unwrap(),
/// );
///
/// let worker = {
///     let service = Arc::clone(&service);
///     thread::spawn(move || service.checkout(2, 1))
/// };
/// worker.join().unwrap().unwrap();
///
/// assert_eq!(service.query_available(&1), vec![7, 5]);
/// assert_eq!(service.report_checked_out(), vec![(2, 1)]);
/// ```
#[derive(Debug)]
pub struct ConcurrentRentalService<I, S, P> {
    shelves: FxHashMap<I, SharedShelf<S, P>>,
    checked_out: Mutex<TombstoneHeap<(P, S, I)>>,
    config: RentalConfig,
}

impl<I, S, P> ConcurrentRentalService<I, S, P>
where
    I: Ord + Hash + Clone + Debug,
    S: Ord + Hash + Clone + Debug,
    P: Ord + Hash + Clone + Debug,
{
    /// Builds a service from `(item, supplier, price)` triples using the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::DuplicateEntry`] if an (item, supplier) pair
    /// repeats.
    pub fn new(entries: impl IntoIterator<Item = (I, S, P)>) -> Result<Self> {
        Self::with_config(RentalConfig::default(), entries)
    }

    /// Builds a service with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::Config`] for an invalid configuration and
    /// [`RentalError::DuplicateEntry`] if an (item, supplier) pair repeats.
    pub fn with_config(
        config: RentalConfig,
        entries: impl IntoIterator<Item = (I, S, P)>,
    ) -> Result<Self> {
        config.validate()?;
        let shelves = stock_shelves(entries, config.capacity_hint)?
            .into_iter()
            .map(|(item, shelf)| {
                let shared = SharedShelf {
                    prices: shelf.prices,
                    available: Mutex::new(shelf.available),
                };
                (item, shared)
            })
            .collect();
        Ok(Self {
            shelves,
            checked_out: Mutex::new(TombstoneHeap::new()),
            config,
        })
    }

    /// Returns the configured result limit for top-K queries.
    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Returns the number of distinct items.
    pub fn item_count(&self) -> usize {
        self.shelves.len()
    }

    /// Returns the price of `item` at `supplier`, if the pair exists.
    pub fn price_of(&self, supplier: &S, item: &I) -> Option<&P> {
        self.shelves.get(item)?.prices.get(supplier)
    }

    /// Returns `true` if the pair exists and is checked out.
    pub fn is_checked_out(&self, supplier: &S, item: &I) -> bool {
        self.price_of(supplier, item).is_some_and(|price| {
            self.checked_out
                .lock()
                .contains(&(price.clone(), supplier.clone(), item.clone()))
        })
    }

    /// Returns how many suppliers currently have `item` available.
    pub fn available_count(&self, item: &I) -> usize {
        self.shelves
            .get(item)
            .map_or(0, |shelf| shelf.available.lock().len())
    }

    /// Returns how many pairs are checked out.
    pub fn checked_out_count(&self) -> usize {
        self.checked_out.lock().len()
    }

    /// Returns up to `top_k` suppliers with `item` available, cheapest first.
    pub fn query_available(&self, item: &I) -> Vec<S> {
        let Some(shelf) = self.shelves.get(item) else {
            return Vec::new();
        };
        shelf
            .available
            .lock()
            .peek_top_k(self.config.top_k)
            .into_iter()
            .map(|(_, supplier)| supplier)
            .collect()
    }

    /// Checks out `item` from `supplier`.
    ///
    /// # Errors
    ///
    /// Same conditions as
    /// [`RentalService::checkout`](crate::rental::RentalService::checkout).
    pub fn checkout(&self, supplier: S, item: I) -> Result<()> {
        let Some((shelf, price)) = self.lookup(&supplier, &item) else {
            return Err(reject("checkout", RentalError::unknown_pair(&supplier, &item)));
        };

        let mut available = shelf.available.lock();
        let mut checked_out = self.checked_out.lock();
        let listing = (price.clone(), supplier);
        if !available.contains(&listing) {
            return Err(reject(
                "checkout",
                RentalError::already_checked_out(&listing.1, &item),
            ));
        }

        debug!(supplier = ?listing.1, ?item, ?price, "checkout");
        checked_out.insert((price.clone(), listing.1.clone(), item));
        available.remove(listing);
        Ok(())
    }

    /// Returns `item` to `supplier`.
    ///
    /// # Errors
    ///
    /// Same conditions as
    /// [`RentalService::checkin`](crate::rental::RentalService::checkin).
    pub fn checkin(&self, supplier: S, item: I) -> Result<()> {
        let Some((shelf, price)) = self.lookup(&supplier, &item) else {
            return Err(reject("checkin", RentalError::unknown_pair(&supplier, &item)));
        };

        let mut available = shelf.available.lock();
        let mut checked_out = self.checked_out.lock();
        let rented = (price.clone(), supplier, item);
        if !checked_out.contains(&rented) {
            return Err(reject(
                "checkin",
                RentalError::not_checked_out(&rented.1, &rented.2),
            ));
        }

        debug!(supplier = ?rented.1, item = ?rented.2, ?price, "checkin");
        available.insert((price.clone(), rented.1.clone()));
        checked_out.remove(rented);
        Ok(())
    }

    /// Returns up to `top_k` checked-out `(supplier, item)` pairs ordered by
    /// price, then supplier, then item.
    pub fn report_checked_out(&self) -> Vec<(S, I)> {
        self.checked_out
            .lock()
            .peek_top_k(self.config.top_k)
            .into_iter()
            .map(|(_, supplier, item)| (supplier, item))
            .collect()
    }

    /// Drops tombstoned entries from every heap; returns how many were removed.
    pub fn compact(&self) -> usize {
        let shelves: usize = self
            .shelves
            .values()
            .map(|shelf| shelf.available.lock().compact())
            .sum();
        shelves + self.checked_out.lock().compact()
    }

    /// Verifies that every pair is live in exactly one heap.
    ///
    /// Takes each item lock together with the checked-out lock in turn, so the
    /// check is consistent per item but not across items under concurrent
    /// writers.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first inconsistent pair.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        for (item, shelf) in &self.shelves {
            let available = shelf.available.lock();
            let checked_out = self.checked_out.lock();
            for (supplier, price) in &shelf.prices {
                let on_shelf = available.contains(&(price.clone(), supplier.clone()));
                let rented = checked_out.contains(&(price.clone(), supplier.clone(), item.clone()));
                if on_shelf == rented {
                    return Err(InvariantError::new(format!(
                        "supplier {supplier:?} item {item:?}: available={on_shelf} checked_out={rented}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, supplier: &S, item: &I) -> Option<(&SharedShelf<S, P>, &P)> {
        let shelf = self.shelves.get(item)?;
        let price = shelf.prices.get(supplier)?;
        Some((shelf, price))
    }
}

fn reject(operation: &'static str, err: RentalError) -> RentalError {
    warn!(operation, %err, "rejected rental operation");
    err
}

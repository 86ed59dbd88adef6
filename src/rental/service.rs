//! Single-threaded rental availability service.
//!
//! ## Operations
//!
//! | Method               | Description                                   | Complexity        |
//! |----------------------|-----------------------------------------------|-------------------|
//! | `query_available`    | Cheapest `top_k` suppliers of an item         | O(k log n)        |
//! | `checkout`           | Move pair from available to checked out       | O(log n)          |
//! | `checkin`            | Move pair from checked out to available       | O(log n)          |
//! | `report_checked_out` | Cheapest `top_k` checked-out pairs            | O(k log n)        |
//!
//! Queries use [`TombstoneHeap::peek_top_k`], so they take `&mut self` even
//! though they leave the observable state unchanged.
//!
//! ## Example Usage
//!
//! ```
//! use rentkit::rental::RentalService;
//!
//! // (item, supplier, price)
//! let mut service = RentalService::new([(1, 2, 5), (1, 7, 4), (1, 5, 6)]).unwrap();
//! assert_eq!(service.query_available(&1), vec![7, 2, 5]);
//!
//! service.checkout(2, 1).unwrap();
//! assert_eq!(service.report_checked_out(), vec![(2, 1)]);
//! assert_eq!(service.query_available(&1), vec![7, 5]);
//!
//! service.checkin(2, 1).unwrap();
//! assert!(service.report_checked_out().is_empty());
//! assert_eq!(service.query_available(&1), vec![7, 2, 5]);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::builder::RentalConfig;
use crate::ds::TombstoneHeap;
use crate::error::{InvariantError, RentalError, Result};
#[cfg(feature = "metrics")]
use crate::metrics::{
    MetricsReset, MetricsSnapshotProvider, RentalMetrics, RentalMetricsRecorder,
    RentalMetricsSnapshot,
};
use crate::rental::{Shelf, stock_shelves};

/// Rental service over items `I`, suppliers `S` and prices `P`.
///
/// Results are ordered by price, then supplier, then item, all ascending.
#[derive(Debug)]
pub struct RentalService<I, S, P> {
    shelves: FxHashMap<I, Shelf<S, P>>,
    checked_out: TombstoneHeap<(P, S, I)>,
    config: RentalConfig,
    #[cfg(feature = "metrics")]
    metrics: RentalMetrics,
}

impl<I, S, P> RentalService<I, S, P>
where
    I: Ord + Hash + Clone + Debug,
    S: Ord + Hash + Clone + Debug,
    P: Ord + Hash + Clone + Debug,
{
    /// Builds a service from `(item, supplier, price)` triples using the
    /// default configuration. Every pair starts available.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::DuplicateEntry`] if an (item, supplier) pair
    /// repeats.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::error::RentalError;
    /// use rentkit::rental::RentalService;
    ///
    /// let empty = RentalService::<u32, u32, u32>::new([]).unwrap();
    /// assert_eq!(empty.item_count(), 0);
    ///
    /// let dup = RentalService::new([(1, 2, 5), (1, 2, 9)]);
    /// assert!(matches!(dup, Err(RentalError::DuplicateEntry { .. })));
    /// ```
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
        let shelves = stock_shelves(entries, config.capacity_hint)?;
        Ok(Self {
            shelves,
            checked_out: TombstoneHeap::new(),
            config,
            #[cfg(feature = "metrics")]
            metrics: RentalMetrics::default(),
        })
    }

    /// Returns the configured result limit for top-K queries.
    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Returns the configuration this service was built with.
    pub fn config(&self) -> RentalConfig {
        self.config
    }

    /// Returns the number of distinct items.
    pub fn item_count(&self) -> usize {
        self.shelves.len()
    }

    /// Returns the number of (item, supplier) pairs.
    pub fn pair_count(&self) -> usize {
        self.shelves.values().map(|shelf| shelf.prices.len()).sum()
    }

    /// Returns the price of `item` at `supplier`, if the pair exists.
    pub fn price_of(&self, supplier: &S, item: &I) -> Option<&P> {
        self.shelves.get(item)?.prices.get(supplier)
    }

    /// Returns `true` if the pair exists and is checked out.
    pub fn is_checked_out(&self, supplier: &S, item: &I) -> bool {
        self.price_of(supplier, item).is_some_and(|price| {
            self.checked_out
                .contains(&(price.clone(), supplier.clone(), item.clone()))
        })
    }

    /// Returns how many suppliers currently have `item` available.
    pub fn available_count(&self, item: &I) -> usize {
        self.shelves
            .get(item)
            .map_or(0, |shelf| shelf.available.len())
    }

    /// Returns how many pairs are checked out.
    pub fn checked_out_count(&self) -> usize {
        self.checked_out.len()
    }

    /// Returns up to `top_k` suppliers with `item` available, cheapest first,
    /// ties broken by supplier.
    ///
    /// An unknown item yields an empty list.
    pub fn query_available(&mut self, item: &I) -> Vec<S> {
        #[cfg(feature = "metrics")]
        self.metrics.record_query_call();

        let top_k = self.config.top_k;
        match self.shelves.get_mut(item) {
            Some(shelf) => shelf
                .available
                .peek_top_k(top_k)
                .into_iter()
                .map(|(_, supplier)| supplier)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Checks out `item` from `supplier`.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::UnknownPair`] if no price is known for the pair
    /// and [`RentalError::AlreadyCheckedOut`] if it is already checked out.
    /// State is unchanged on error.
    pub fn checkout(&mut self, supplier: S, item: I) -> Result<()> {
        let result = self.try_checkout(supplier, item);
        match &result {
            Ok(()) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_checkout();
            },
            Err(err) => self.reject("checkout", err),
        }
        result
    }

    /// Returns `item` to `supplier`.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::UnknownPair`] if no price is known for the pair
    /// and [`RentalError::NotCheckedOut`] if it is currently available.
    /// State is unchanged on error.
    pub fn checkin(&mut self, supplier: S, item: I) -> Result<()> {
        let result = self.try_checkin(supplier, item);
        match &result {
            Ok(()) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_checkin();
            },
            Err(err) => self.reject("checkin", err),
        }
        result
    }

    /// Returns up to `top_k` checked-out `(supplier, item)` pairs ordered by
    /// price, then supplier, then item.
    pub fn report_checked_out(&mut self) -> Vec<(S, I)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_report_call();

        self.checked_out
            .peek_top_k(self.config.top_k)
            .into_iter()
            .map(|(_, supplier, item)| (supplier, item))
            .collect()
    }

    /// Drops tombstoned entries from every heap; returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let shelves: usize = self
            .shelves
            .values_mut()
            .map(|shelf| shelf.available.compact())
            .sum();
        let removed = shelves + self.checked_out.compact();
        debug!(removed, "compacted rental heaps");
        removed
    }

    /// Verifies that every pair is live in exactly one heap.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first inconsistent pair.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        let mut checked_out = 0usize;
        for (item, shelf) in &self.shelves {
            let mut on_shelf = 0usize;
            for (supplier, price) in &shelf.prices {
                let available = shelf.available.contains(&(price.clone(), supplier.clone()));
                let rented = self
                    .checked_out
                    .contains(&(price.clone(), supplier.clone(), item.clone()));
                match (available, rented) {
                    (true, false) => on_shelf += 1,
                    (false, true) => checked_out += 1,
                    (true, true) => {
                        return Err(InvariantError::new(format!(
                            "supplier {supplier:?} item {item:?} is both available and checked out"
                        )));
                    },
                    (false, false) => {
                        return Err(InvariantError::new(format!(
                            "supplier {supplier:?} item {item:?} is neither available nor checked out"
                        )));
                    },
                }
            }
            if shelf.available.len() != on_shelf {
                return Err(InvariantError::new(format!(
                    "item {item:?} heap holds {} live values but {on_shelf} suppliers are available",
                    shelf.available.len()
                )));
            }
        }
        if checked_out != self.checked_out.len() {
            return Err(InvariantError::new(format!(
                "checked-out heap holds {} live values but {checked_out} pairs are checked out",
                self.checked_out.len()
            )));
        }
        Ok(())
    }

    fn try_checkout(&mut self, supplier: S, item: I) -> Result<()> {
        let Some(shelf) = self.shelves.get_mut(&item) else {
            return Err(RentalError::unknown_pair(&supplier, &item));
        };
        let Some(price) = shelf.prices.get(&supplier).cloned() else {
            return Err(RentalError::unknown_pair(&supplier, &item));
        };
        if !shelf.available.contains(&(price.clone(), supplier.clone())) {
            return Err(RentalError::already_checked_out(&supplier, &item));
        }

        debug!(?supplier, ?item, ?price, "checkout");
        shelf.available.remove((price.clone(), supplier.clone()));
        self.checked_out.insert((price, supplier, item));
        Ok(())
    }

    fn try_checkin(&mut self, supplier: S, item: I) -> Result<()> {
        let Some(shelf) = self.shelves.get_mut(&item) else {
            return Err(RentalError::unknown_pair(&supplier, &item));
        };
        let Some(price) = shelf.prices.get(&supplier).cloned() else {
            return Err(RentalError::unknown_pair(&supplier, &item));
        };
        let rented = (price, supplier, item);
        if !self.checked_out.contains(&rented) {
            return Err(RentalError::not_checked_out(&rented.1, &rented.2));
        }

        debug!(supplier = ?rented.1, item = ?rented.2, price = ?rented.0, "checkin");
        shelf.available.insert((rented.0.clone(), rented.1.clone()));
        self.checked_out.remove(rented);
        Ok(())
    }

    fn reject(&mut self, operation: &'static str, err: &RentalError) {
        warn!(operation, %err, "rejected rental operation");
        #[cfg(feature = "metrics")]
        self.metrics.record_rejected();
    }

    #[cfg(feature = "metrics")]
    /// Returns a point-in-time snapshot of the service counters and gauges.
    pub fn metrics_snapshot(&self) -> RentalMetricsSnapshot {
        let shelves = self.shelves.values();
        RentalMetricsSnapshot {
            query_calls: self.metrics.query_calls,
            report_calls: self.metrics.report_calls,
            checkout_calls: self.metrics.checkout_calls,
            checkin_calls: self.metrics.checkin_calls,
            rejected_calls: self.metrics.rejected_calls,
            tombstones_discarded: shelves
                .clone()
                .map(|shelf| shelf.available.discarded_total())
                .sum::<u64>()
                + self.checked_out.discarded_total(),
            items: self.shelves.len(),
            available_len: shelves.clone().map(|shelf| shelf.available.len()).sum(),
            checked_out_len: self.checked_out.len(),
            buffered_len: shelves.map(|shelf| shelf.available.heap_len()).sum::<usize>()
                + self.checked_out.heap_len(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<I, S, P> MetricsSnapshotProvider<RentalMetricsSnapshot> for RentalService<I, S, P>
where
    I: Ord + Hash + Clone + Debug,
    S: Ord + Hash + Clone + Debug,
    P: Ord + Hash + Clone + Debug,
{
    fn snapshot(&self) -> RentalMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<I, S, P> MetricsReset for RentalService<I, S, P> {
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn shop() -> RentalService<u32, u32, u32> {
        RentalService::new([(1, 2, 5), (1, 7, 4), (1, 5, 6), (2, 7, 3), (2, 9, 3)]).unwrap()
    }

    #[test]
    fn query_orders_by_price_then_supplier() {
        let mut service = shop();
        assert_eq!(service.query_available(&1), vec![7, 2, 5]);
        assert_eq!(service.query_available(&2), vec![7, 9]);
        assert!(service.query_available(&3).is_empty());
    }

    #[test]
    fn checkout_moves_pair_between_heaps() {
        let mut service = shop();
        service.checkout(7, 2).unwrap();
        assert!(service.is_checked_out(&7, &2));
        assert_eq!(service.available_count(&2), 1);
        assert_eq!(service.checked_out_count(), 1);
        assert_eq!(service.query_available(&2), vec![9]);
        assert_eq!(service.report_checked_out(), vec![(7, 2)]);
        service.check_invariants().unwrap();
    }

    #[test]
    fn report_breaks_ties_by_supplier_then_item() {
        let mut service = shop();
        service.checkout(9, 2).unwrap();
        service.checkout(7, 2).unwrap();
        service.checkout(7, 1).unwrap();
        service.checkout(2, 1).unwrap();
        assert_eq!(service.report_checked_out(), vec![(7, 2), (9, 2), (7, 1), (2, 1)]);
    }

    #[test]
    fn double_checkout_is_rejected_without_state_change() {
        let mut service = shop();
        service.checkout(2, 1).unwrap();
        let err = service.checkout(2, 1).unwrap_err();
        assert!(matches!(err, RentalError::AlreadyCheckedOut { .. }));
        assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
        assert_eq!(service.report_checked_out(), vec![(2, 1)]);
        service.check_invariants().unwrap();
    }

    #[test]
    fn checkin_of_available_pair_is_rejected() {
        let mut service = shop();
        let err = service.checkin(5, 1).unwrap_err();
        assert!(matches!(err, RentalError::NotCheckedOut { .. }));
        assert_eq!(service.query_available(&1), vec![7, 2, 5]);
        service.check_invariants().unwrap();
    }

    #[test]
    fn unknown_pairs_are_rejected() {
        let mut service = shop();
        assert!(matches!(
            service.checkout(5, 2),
            Err(RentalError::UnknownPair { .. })
        ));
        assert!(matches!(
            service.checkout(1, 99),
            Err(RentalError::UnknownPair { .. })
        ));
        assert!(matches!(
            service.checkin(1, 99),
            Err(RentalError::UnknownPair { .. })
        ));
        assert_eq!(service.checked_out_count(), 0);
    }

    #[test]
    fn empty_service_answers_empty() {
        let mut service = RentalService::<u32, u32, u32>::new(Vec::new()).unwrap();
        assert!(service.query_available(&1).is_empty());
        assert!(service.report_checked_out().is_empty());
        assert!(matches!(
            service.checkout(1, 1),
            Err(RentalError::UnknownPair { .. })
        ));
        service.check_invariants().unwrap();
    }

    #[test]
    fn price_lookup() {
        let service = shop();
        assert_eq!(service.price_of(&7, &1), Some(&4));
        assert_eq!(service.price_of(&7, &3), None);
        assert_eq!(service.item_count(), 2);
        assert_eq!(service.pair_count(), 5);
    }

    #[test]
    fn compact_keeps_observable_state() {
        let mut service = shop();
        service.checkout(2, 1).unwrap();
        service.checkout(5, 1).unwrap();
        service.checkin(2, 1).unwrap();

        let before = (service.query_available(&1), service.report_checked_out());
        service.compact();
        assert_eq!(
            (service.query_available(&1), service.report_checked_out()),
            before
        );
        service.check_invariants().unwrap();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_calls_and_rejections() {
        let mut service = shop();
        service.query_available(&1);
        service.checkout(2, 1).unwrap();
        let _ = service.checkout(2, 1);
        service.checkin(2, 1).unwrap();
        service.report_checked_out();

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.query_calls, 1);
        assert_eq!(snapshot.report_calls, 1);
        assert_eq!(snapshot.checkout_calls, 1);
        assert_eq!(snapshot.checkin_calls, 1);
        assert_eq!(snapshot.rejected_calls, 1);
        assert_eq!(snapshot.items, 2);
        assert_eq!(snapshot.available_len, 5);
        assert_eq!(snapshot.checked_out_len, 0);

        service.reset_metrics();
        assert_eq!(service.snapshot().query_calls, 0);
    }
}

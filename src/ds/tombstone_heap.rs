//! Min-heap with remove-by-value via tombstones.
//!
//! A priority queue whose elements can be removed by value in O(1) without
//! searching the heap buffer. Removal records a tombstone; the buffer entry is
//! physically discarded only when it surfaces during [`pop`](TombstoneHeap::pop).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         TombstoneHeap Layout                                │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  heap: BinaryHeap<Reverse<T>>   (may hold tombstoned entries)     │    │
//! │   │                                                                   │    │
//! │   │    (4, 7)  ← current min, live                                    │    │
//! │   │    (5, 2)  ← TOMBSTONED: skipped and discarded by pop()           │    │
//! │   │    (6, 5)  ← live                                                 │    │
//! │   │                                                                   │    │
//! │   │    heap_len() = 3                                                 │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! │                                                                             │
//! │   ┌──────────────────────────────┐   ┌──────────────────────────────┐     │
//! │   │ pending: FxHashSet<T>        │   │ tombstones: FxHashSet<T>     │     │
//! │   │  {(4,7), (5,2), (6,5)}       │   │  {(5,2)}                     │     │
//! │   │  one entry per buffer value  │   │  logically removed values    │     │
//! │   └──────────────────────────────┘   └──────────────────────────────┘     │
//! │                                                                             │
//! │   len() = pending - (pending ∩ tombstones) = 2                              │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Insert Flow
//! ───────────
//!   insert(v):
//!     if v in pending:  tombstones.remove(v)    (re-activate, no new entry)
//!     else:             tombstones.remove(v)
//!                       pending.insert(v)
//!                       heap.push(v)
//!
//! Pop Flow
//! ────────
//!   pop():
//!     loop:
//!       v = heap.pop()  or return None
//!       pending.remove(v)
//!       if tombstones.remove(v): continue   (discard)
//!       return v
//! ```
//!
//! ## Key Concepts
//!
//! - **Value identity**: equal values are never distinguished. A value is
//!   pending at most once, so inserting it twice creates a single entry.
//!   Callers needing per-instance identity encode a disambiguating field in
//!   the value (e.g. a supplier id in a `(price, supplier)` tuple).
//! - **Tombstones**: `remove` never touches the buffer. A tombstone on a value
//!   that is not pending is inert; the next `insert` of that value clears it.
//! - **Pop-then-restore**: [`peek_top_k`](TombstoneHeap::peek_top_k) pops up to
//!   `k` live values and re-inserts them, giving a non-destructive top-K read.
//!
//! ## Operations
//!
//! | Operation       | Description                               | Complexity         |
//! |-----------------|-------------------------------------------|--------------------|
//! | `insert`        | Add value or clear its tombstone          | O(log n)           |
//! | `remove`        | Tombstone value                           | O(1)               |
//! | `pop`           | Pop min live value, discarding tombstones | Amortized O(log n) |
//! | `peek_top_k`    | Non-destructive k smallest live values    | O(k log n) amortized |
//! | `contains`      | Live membership                           | O(1)               |
//! | `compact`       | Drop all tombstoned entries               | O(n)               |
//!
//! ## Example Usage
//!
//! ```
//! use rentkit::ds::TombstoneHeap;
//!
//! let mut heap = TombstoneHeap::new();
//! heap.insert((5, 2));
//! heap.insert((4, 7));
//! heap.insert((6, 5));
//!
//! heap.remove((5, 2));
//! assert_eq!(heap.peek_top_k(5), vec![(4, 7), (6, 5)]);
//!
//! // Re-inserting clears the tombstone.
//! heap.insert((5, 2));
//! assert_eq!(heap.pop(), Some((4, 7)));
//! assert_eq!(heap.pop(), Some((5, 2)));
//! assert_eq!(heap.pop(), Some((6, 5)));
//! assert_eq!(heap.pop(), None);
//! ```
//!
//! ## Thread Safety
//!
//! `TombstoneHeap` is not thread-safe. With the `concurrency` feature,
//! [`ConcurrentTombstoneHeap`] guards one heap with a `parking_lot::Mutex` and
//! runs `peek_top_k` under a single lock acquisition.
//!
//! ## Implementation Notes
//!
//! - Uses `BinaryHeap<Reverse<_>>` for min-heap behavior
//! - The buffer is never compacted implicitly; `compact()` is opt-in
//! - `debug_validate_invariants()` available in debug/test builds
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::trace;

/// Min-heap with O(1) logical removal by value.
///
/// # Type Parameters
///
/// - `T`: Element type (must be `Ord + Hash + Clone`). Ordering defines both
///   pop order and tie-breaks; tuples compare lexicographically.
///
/// # Example
///
/// ```
/// use rentkit::ds::TombstoneHeap;
///
/// let mut heap = TombstoneHeap::new();
/// heap.insert(10);
/// heap.insert(20);
/// heap.insert(5);
///
/// heap.remove(5);
/// heap.insert(30);
/// heap.insert(15);
/// assert_eq!(heap.pop(), Some(10));
///
/// heap.remove(30);
/// heap.insert(5);
/// assert_eq!(heap.pop(), Some(5));
/// assert_eq!(heap.pop(), Some(15));
/// assert_eq!(heap.pop(), Some(20));
/// assert_eq!(heap.pop(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TombstoneHeap<T> {
    heap: BinaryHeap<Reverse<T>>,
    pending: FxHashSet<T>,
    tombstones: FxHashSet<T>,
    // Pending values that are also tombstoned.
    dead: usize,
    discarded: u64,
}

impl<T> TombstoneHeap<T>
where
    T: Ord + Hash + Clone,
{
    /// Creates an empty heap.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let heap: TombstoneHeap<u32> = TombstoneHeap::new();
    /// assert!(heap.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pending: FxHashSet::default(),
            tombstones: FxHashSet::default(),
            dead: 0,
            discarded: 0,
        }
    }

    /// Creates an empty heap with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            pending: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
            tombstones: FxHashSet::default(),
            dead: 0,
            discarded: 0,
        }
    }

    /// Reserves capacity for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
        self.pending.reserve(additional);
    }

    /// Shrinks internal storage to fit current contents.
    pub fn shrink_to_fit(&mut self) {
        self.heap.shrink_to_fit();
        self.pending.shrink_to_fit();
        self.tombstones.shrink_to_fit();
    }

    /// Removes every entry and tombstone.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.pending.clear();
        self.tombstones.clear();
        self.dead = 0;
    }

    /// Returns the number of live values.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let mut heap = TombstoneHeap::new();
    /// heap.insert("a");
    /// heap.insert("b");
    /// heap.remove("a");
    /// assert_eq!(heap.len(), 1);
    /// assert_eq!(heap.heap_len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.pending.len() - self.dead
    }

    /// Returns `true` if there are no live values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the buffer length, tombstoned entries included.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// Returns the number of recorded tombstones, inert ones included.
    pub fn tombstone_len(&self) -> usize {
        self.tombstones.len()
    }

    /// Returns how many tombstoned entries have been physically discarded.
    pub fn discarded_total(&self) -> u64 {
        self.discarded
    }

    /// Returns `true` if `item` is live.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let mut heap = TombstoneHeap::new();
    /// heap.insert(3);
    /// assert!(heap.contains(&3));
    ///
    /// heap.remove(3);
    /// assert!(!heap.contains(&3));
    /// assert!(heap.is_tombstoned(&3));
    /// ```
    pub fn contains(&self, item: &T) -> bool {
        self.pending.contains(item) && !self.tombstones.contains(item)
    }

    /// Returns `true` if `item` carries a tombstone.
    pub fn is_tombstoned(&self, item: &T) -> bool {
        self.tombstones.contains(item)
    }

    /// Adds `item` as live.
    ///
    /// If an equal value is already pending no second entry is created; its
    /// tombstone, if any, is cleared.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let mut heap = TombstoneHeap::new();
    /// heap.insert(5);
    /// heap.insert(3);
    /// heap.insert(5);
    ///
    /// assert_eq!(heap.heap_len(), 2);
    /// assert_eq!(heap.pop(), Some(3));
    /// assert_eq!(heap.pop(), Some(5));
    /// assert_eq!(heap.pop(), None);
    /// ```
    pub fn insert(&mut self, item: T) {
        if self.pending.contains(&item) {
            if self.tombstones.remove(&item) {
                self.dead -= 1;
            }
            return;
        }
        self.tombstones.remove(&item);
        self.pending.insert(item.clone());
        self.heap.push(Reverse(item));
    }

    /// Tombstones `item` and returns `true` if it was live.
    ///
    /// Removing a value that was never inserted is accepted; the tombstone
    /// is inert and cleared by a later `insert` of that value.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let mut heap = TombstoneHeap::new();
    /// heap.insert(10);
    /// assert!(!heap.remove(99));
    /// assert!(heap.remove(10));
    /// assert!(!heap.remove(10));
    /// assert_eq!(heap.pop(), None);
    /// ```
    pub fn remove(&mut self, item: T) -> bool {
        let was_pending = self.pending.contains(&item);
        if self.tombstones.insert(item) && was_pending {
            self.dead += 1;
            true
        } else {
            false
        }
    }

    /// Pops and returns the minimum live value, discarding tombstoned entries.
    ///
    /// Returns `None` once no live value remains.
    pub fn pop(&mut self) -> Option<T> {
        while let Some(Reverse(top)) = self.heap.pop() {
            self.pending.remove(&top);
            if self.tombstones.remove(&top) {
                self.dead -= 1;
                self.discarded += 1;
                trace!(remaining = self.heap.len(), "discarded tombstoned entry");
                continue;
            }
            return Some(top);
        }
        None
    }

    /// Returns up to `limit` smallest live values in ascending order without
    /// changing which values are live.
    ///
    /// Tombstoned entries met on the way are discarded, so `heap_len()` may
    /// shrink.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let mut heap = TombstoneHeap::new();
    /// for v in [9, 1, 5, 3, 7, 2] {
    ///     heap.insert(v);
    /// }
    /// heap.remove(2);
    ///
    /// assert_eq!(heap.peek_top_k(3), vec![1, 3, 5]);
    /// assert_eq!(heap.peek_top_k(3), vec![1, 3, 5]);
    /// assert_eq!(heap.len(), 5);
    /// ```
    pub fn peek_top_k(&mut self, limit: usize) -> Vec<T> {
        let mut top = Vec::with_capacity(limit.min(self.len()));
        while top.len() < limit {
            match self.pop() {
                Some(item) => top.push(item),
                None => break,
            }
        }
        for item in &top {
            self.insert(item.clone());
        }
        top
    }

    /// Drops every tombstoned buffer entry and all tombstones.
    ///
    /// Returns the number of buffer entries removed.
    ///
    /// # Example
    ///
    /// ```
    /// use rentkit::ds::TombstoneHeap;
    ///
    /// let mut heap = TombstoneHeap::new();
    /// for v in 0..10 {
    ///     heap.insert(v);
    /// }
    /// for v in 0..8 {
    ///     heap.remove(v);
    /// }
    /// assert_eq!(heap.compact(), 8);
    /// assert_eq!(heap.heap_len(), 2);
    /// assert_eq!(heap.pop(), Some(8));
    /// ```
    pub fn compact(&mut self) -> usize {
        let before = self.heap.len();
        if self.dead > 0 {
            let tombstones = &self.tombstones;
            self.heap.retain(|Reverse(item)| !tombstones.contains(item));
            self.pending.retain(|item| !tombstones.contains(item));
        }
        self.tombstones.clear();
        self.dead = 0;

        let removed = before - self.heap.len();
        self.discarded += removed as u64;
        removed
    }

    /// Compacts if the buffer has grown too stale relative to the live count.
    ///
    /// Triggers when `heap_len() > len() * factor`; returns the number of
    /// entries removed.
    pub fn maybe_compact(&mut self, factor: usize) -> usize {
        let factor = factor.max(1);
        if self.heap.len() > self.len().saturating_mul(factor) {
            self.compact()
        } else {
            0
        }
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.heap.capacity() * std::mem::size_of::<Reverse<T>>()
            + (self.pending.capacity() + self.tombstones.capacity()) * std::mem::size_of::<T>()
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns a debug snapshot of the internal sizes.
    pub fn debug_snapshot(&self) -> TombstoneHeapSnapshot {
        TombstoneHeapSnapshot {
            len: self.len(),
            heap_len: self.heap_len(),
            tombstone_len: self.tombstone_len(),
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates internal invariants (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.heap.len(), self.pending.len());
        for Reverse(item) in self.heap.iter() {
            assert!(self.pending.contains(item));
        }
        let dead = self
            .pending
            .iter()
            .filter(|item| self.tombstones.contains(*item))
            .count();
        assert_eq!(dead, self.dead);
    }
}

#[cfg(any(test, debug_assertions))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TombstoneHeapSnapshot {
    pub len: usize,
    pub heap_len: usize,
    pub tombstone_len: usize,
}

impl<T> Default for TombstoneHeap<T>
where
    T: Ord + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for TombstoneHeap<T>
where
    T: Ord + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        for item in iter {
            heap.insert(item);
        }
        heap
    }
}

impl<T> Extend<T> for TombstoneHeap<T>
where
    T: Ord + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

#[cfg(feature = "concurrency")]
#[derive(Debug)]
/// Thread-safe wrapper around `TombstoneHeap` using a `parking_lot::Mutex`.
///
/// Every method takes the lock once, so `peek_top_k` observes and restores
/// the heap without any interleaving writer.
pub struct ConcurrentTombstoneHeap<T> {
    inner: Mutex<TombstoneHeap<T>>,
}

#[cfg(feature = "concurrency")]
impl<T> ConcurrentTombstoneHeap<T>
where
    T: Ord + Hash + Clone,
{
    /// Creates an empty concurrent heap.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TombstoneHeap::new()),
        }
    }

    /// Creates an empty concurrent heap with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(TombstoneHeap::with_capacity(capacity)),
        }
    }

    /// Returns the number of live values.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if there are no live values.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns `true` if `item` is live.
    pub fn contains(&self, item: &T) -> bool {
        self.inner.lock().contains(item)
    }

    /// Adds `item` as live.
    pub fn insert(&self, item: T) {
        self.inner.lock().insert(item);
    }

    /// Tombstones `item`; returns `true` if it was live.
    pub fn remove(&self, item: T) -> bool {
        self.inner.lock().remove(item)
    }

    /// Pops the minimum live value.
    pub fn pop(&self) -> Option<T> {
        self.inner.lock().pop()
    }

    /// Tries to pop without blocking.
    pub fn try_pop(&self) -> Option<Option<T>> {
        let mut heap = self.inner.try_lock()?;
        Some(heap.pop())
    }

    /// Returns up to `limit` smallest live values under a single lock.
    pub fn peek_top_k(&self, limit: usize) -> Vec<T> {
        self.inner.lock().peek_top_k(limit)
    }

    /// Drops every tombstoned entry.
    pub fn compact(&self) -> usize {
        self.inner.lock().compact()
    }

    /// Compacts if `heap_len() > len() * factor`.
    pub fn maybe_compact(&self, factor: usize) -> usize {
        self.inner.lock().maybe_compact(factor)
    }

    /// Consumes the wrapper and returns the inner heap.
    pub fn into_inner(self) -> TombstoneHeap<T> {
        self.inner.into_inner()
    }
}

#[cfg(feature = "concurrency")]
impl<T> Default for ConcurrentTombstoneHeap<T>
where
    T: Ord + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "concurrency")]
impl<T> From<TombstoneHeap<T>> for ConcurrentTombstoneHeap<T> {
    fn from(heap: TombstoneHeap<T>) -> Self {
        Self {
            inner: Mutex::new(heap),
        }
    }
}

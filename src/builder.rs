//! Configured construction of rental services.
//!
//! [`RentalService::new`](crate::rental::RentalService::new) covers the common
//! case; the builder exposes the tunables and produces either the
//! single-threaded or (with the `concurrency` feature) the lock-guarded
//! service from the same configuration.
//!
//! ## Example
//!
//! ```rust
//! use rentkit::builder::RentalBuilder;
//!
//! let mut service = RentalBuilder::new()
//!     .top_k(2)
//!     .build([(1u32, 2u32, 5u32), (1, 7, 4), (1, 5, 6)])
//!     .unwrap();
//!
//! assert_eq!(service.query_available(&1), vec![7, 2]);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{ConfigError, Result};
#[cfg(feature = "concurrency")]
use crate::rental::ConcurrentRentalService;
use crate::rental::RentalService;

/// Number of results returned by top-K queries unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

/// Tunables shared by both service flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalConfig {
    /// Maximum number of results returned by `query_available` and
    /// `report_checked_out`.
    pub top_k: usize,
    /// Expected number of (item, supplier) pairs, used to pre-size maps.
    pub capacity_hint: usize,
}

impl RentalConfig {
    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `top_k` is zero.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::new("top_k must be greater than 0"));
        }
        Ok(())
    }
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            capacity_hint: 0,
        }
    }
}

/// Builder for [`RentalService`] and `ConcurrentRentalService`.
#[derive(Debug, Clone, Default)]
pub struct RentalBuilder {
    config: RentalConfig,
}

impl RentalBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of results returned by top-K queries.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Pre-sizes internal maps for `pairs` (item, supplier) pairs.
    pub fn capacity_hint(mut self, pairs: usize) -> Self {
        self.config.capacity_hint = pairs;
        self
    }

    /// Returns the configuration built so far.
    pub fn config(&self) -> RentalConfig {
        self.config
    }

    /// Builds a single-threaded service from `(item, supplier, price)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`RentalError::Config`](crate::error::RentalError::Config) for an
    /// invalid configuration and
    /// [`RentalError::DuplicateEntry`](crate::error::RentalError::DuplicateEntry)
    /// if an (item, supplier) pair repeats.
    pub fn build<I, S, P>(
        self,
        entries: impl IntoIterator<Item = (I, S, P)>,
    ) -> Result<RentalService<I, S, P>>
    where
        I: Ord + Hash + Clone + Debug,
        S: Ord + Hash + Clone + Debug,
        P: Ord + Hash + Clone + Debug,
    {
        RentalService::with_config(self.config, entries)
    }

    /// Builds a thread-safe service from `(item, supplier, price)` triples.
    ///
    /// # Errors
    ///
    /// Same conditions as [`build`](Self::build).
    #[cfg(feature = "concurrency")]
    pub fn build_concurrent<I, S, P>(
        self,
        entries: impl IntoIterator<Item = (I, S, P)>,
    ) -> Result<ConcurrentRentalService<I, S, P>>
    where
        I: Ord + Hash + Clone + Debug,
        S: Ord + Hash + Clone + Debug,
        P: Ord + Hash + Clone + Debug,
    {
        ConcurrentRentalService::with_config(self.config, entries)
    }
}

//! Error types for the rentkit library.
//!
//! ## Key Components
//!
//! - [`RentalError`]: Returned by [`RentalService`](crate::rental::RentalService)
//!   construction and state transitions. [`RentalError::kind`] classifies each
//!   variant as [`ErrorKind::InvalidInput`] or
//!   [`ErrorKind::PreconditionViolation`].
//! - [`ConfigError`]: Returned when builder parameters are invalid
//!   (e.g. a zero `top_k`).
//! - [`InvariantError`]: Returned when the dual-queue invariant is violated
//!   (`check_invariants` methods).
//!
//! Queue operations never fail; an empty queue is reported with `None`.
//!
//! ## Example Usage
//!
//! ```
//! use rentkit::error::{ErrorKind, RentalError};
//! use rentkit::rental::RentalService;
//!
//! let mut service = RentalService::new([(1u32, 2u32, 5u32)]).unwrap();
//!
//! let err = service.checkin(2, 1).unwrap_err();
//! assert!(matches!(err, RentalError::NotCheckedOut { .. }));
//! assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
//! ```

use std::fmt::Debug;

use thiserror::Error;

/// Coarse classification of a [`RentalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or duplicate construction data, or invalid configuration.
    InvalidInput,
    /// An operation was called on a pair that is unknown or in the wrong state.
    PreconditionViolation,
}

/// Errors produced by the rental services.
///
/// Keys are rendered with their `Debug` representation so the error type
/// stays independent of the service's key types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RentalError {
    /// The same (item, supplier) pair appeared twice in the construction input.
    #[error("duplicate entry for supplier {supplier} and item {item}")]
    DuplicateEntry {
        /// The supplier key.
        supplier: String,
        /// The item key.
        item: String,
    },

    /// No price is known for the (item, supplier) pair.
    #[error("supplier {supplier} does not stock item {item}")]
    UnknownPair {
        /// The supplier key.
        supplier: String,
        /// The item key.
        item: String,
    },

    /// Checkout was requested for a pair that is already checked out.
    #[error("item {item} from supplier {supplier} is already checked out")]
    AlreadyCheckedOut {
        /// The supplier key.
        supplier: String,
        /// The item key.
        item: String,
    },

    /// Checkin was requested for a pair that is not checked out.
    #[error("item {item} from supplier {supplier} is not checked out")]
    NotCheckedOut {
        /// The supplier key.
        supplier: String,
        /// The item key.
        item: String,
    },

    /// The service configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl RentalError {
    pub(crate) fn duplicate_entry(supplier: &impl Debug, item: &impl Debug) -> Self {
        Self::DuplicateEntry {
            supplier: format!("{supplier:?}"),
            item: format!("{item:?}"),
        }
    }

    pub(crate) fn unknown_pair(supplier: &impl Debug, item: &impl Debug) -> Self {
        Self::UnknownPair {
            supplier: format!("{supplier:?}"),
            item: format!("{item:?}"),
        }
    }

    pub(crate) fn already_checked_out(supplier: &impl Debug, item: &impl Debug) -> Self {
        Self::AlreadyCheckedOut {
            supplier: format!("{supplier:?}"),
            item: format!("{item:?}"),
        }
    }

    pub(crate) fn not_checked_out(supplier: &impl Debug, item: &impl Debug) -> Self {
        Self::NotCheckedOut {
            supplier: format!("{supplier:?}"),
            item: format!("{item:?}"),
        }
    }

    /// Returns the taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateEntry { .. } | Self::Config(_) => ErrorKind::InvalidInput,
            Self::UnknownPair { .. }
            | Self::AlreadyCheckedOut { .. }
            | Self::NotCheckedOut { .. } => ErrorKind::PreconditionViolation,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when service configuration parameters are invalid.
///
/// Produced by [`RentalConfig::validate`](crate::builder::RentalConfig::validate)
/// and the builder `build` methods.
///
/// # Example
///
/// ```
/// use rentkit::builder::RentalBuilder;
///
/// let err = RentalBuilder::new()
///     .top_k(0)
///     .build(Vec::<(u32, u32, u32)>::new())
///     .unwrap_err();
/// assert!(err.to_string().contains("top_k"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when a service's internal invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Type alias for `Result<T, RentalError>`.
pub type Result<T> = std::result::Result<T, RentalError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

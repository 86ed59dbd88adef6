pub use crate::builder::{RentalBuilder, RentalConfig};
pub use crate::ds::TombstoneHeap;
pub use crate::error::{ConfigError, ErrorKind, RentalError};
pub use crate::rental::RentalService;

#[cfg(feature = "concurrency")]
pub use crate::ds::ConcurrentTombstoneHeap;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::RentalMetricsSnapshot;
#[cfg(feature = "concurrency")]
pub use crate::rental::ConcurrentRentalService;

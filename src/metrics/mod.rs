//! Operation counters for the rental service (`metrics` feature).
//!
//! Recording, snapshotting and export are split into small traits so the
//! service only writes counters and consumers decide how to read them.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::RentalMetrics;
pub use snapshot::RentalMetricsSnapshot;
pub use traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider, RentalMetricsRecorder};

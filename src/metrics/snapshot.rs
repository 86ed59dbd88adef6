#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RentalMetricsSnapshot {
    pub query_calls: u64,
    pub report_calls: u64,
    pub checkout_calls: u64,
    pub checkin_calls: u64,
    pub rejected_calls: u64,
    pub tombstones_discarded: u64, // heap entries dropped at pop time across all queues

    // gauges captured at snapshot time
    pub items: usize,
    pub available_len: usize,
    pub checked_out_len: usize,
    pub buffered_len: usize, // physical heap entries, tombstoned included
}

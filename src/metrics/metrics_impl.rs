use crate::metrics::traits::{MetricsReset, RentalMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct RentalMetrics {
    pub query_calls: u64,
    pub report_calls: u64,
    pub checkout_calls: u64,
    pub checkin_calls: u64,
    pub rejected_calls: u64,
}

impl RentalMetricsRecorder for RentalMetrics {
    #[inline]
    fn record_query_call(&mut self) {
        self.query_calls += 1;
    }

    #[inline]
    fn record_report_call(&mut self) {
        self.report_calls += 1;
    }

    #[inline]
    fn record_checkout(&mut self) {
        self.checkout_calls += 1;
    }

    #[inline]
    fn record_checkin(&mut self) {
        self.checkin_calls += 1;
    }

    #[inline]
    fn record_rejected(&mut self) {
        self.rejected_calls += 1;
    }
}

impl MetricsReset for RentalMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_increments_and_resets() {
        let mut metrics = RentalMetrics::default();
        metrics.record_query_call();
        metrics.record_query_call();
        metrics.record_checkout();
        metrics.record_rejected();
        assert_eq!(metrics.query_calls, 2);
        assert_eq!(metrics.checkout_calls, 1);
        assert_eq!(metrics.rejected_calls, 1);

        metrics.reset_metrics();
        assert_eq!(metrics.query_calls, 0);
        assert_eq!(metrics.rejected_calls, 0);
    }
}

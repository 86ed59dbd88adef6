use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::RentalMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for rental metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<RentalMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &RentalMetricsSnapshot) {
        let counters = [
            ("query_calls_total", snapshot.query_calls),
            ("report_calls_total", snapshot.report_calls),
            ("checkout_calls_total", snapshot.checkout_calls),
            ("checkin_calls_total", snapshot.checkin_calls),
            ("rejected_calls_total", snapshot.rejected_calls),
            ("tombstones_discarded_total", snapshot.tombstones_discarded),
        ];
        for (suffix, value) in counters {
            self.write_metric("counter", suffix, value);
        }

        let gauges = [
            ("items", snapshot.items),
            ("available_len", snapshot.available_len),
            ("checked_out_len", snapshot.checked_out_len),
            ("buffered_len", snapshot.buffered_len),
        ];
        for (suffix, value) in gauges {
            self.write_metric("gauge", suffix, value as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("rentkit", Vec::new());
        exporter.export(&RentalMetricsSnapshot {
            checkout_calls: 3,
            checked_out_len: 2,
            ..Default::default()
        });

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE rentkit_checkout_calls_total counter"));
        assert!(text.contains("rentkit_checkout_calls_total 3"));
        assert!(text.contains("# TYPE rentkit_checked_out_len gauge"));
        assert!(text.contains("rentkit_checked_out_len 2"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&RentalMetricsSnapshot::default());
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\nquery_calls_total 0\n"));
    }
}

//! Process-wide resize counters and their Prometheus text rendering.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Mutex;

/// Content type of the text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Point-in-time copy of the counters. Labels are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub resized: BTreeMap<String, u64>,
    pub failures: u64,
}

impl CounterSnapshot {
    pub fn total_resized(&self) -> u64 {
        self.resized.values().sum()
    }
}

/// Resized-by-label and failure counters, one lock around every update.
#[derive(Debug, Default)]
pub struct Counters {
    state: Mutex<CounterSnapshot>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut CounterSnapshot) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    pub fn record_resized(&self, label: &str) {
        self.with_state(|state| {
            *state.resized.entry(label.to_string()).or_insert(0) += 1;
        });
    }

    pub fn record_failure(&self) {
        self.with_state(|state| state.failures += 1);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        self.with_state(|state| state.clone())
    }

    /// Render `resized_images_total{label}` and `errors_total`.
    pub fn render_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut out = String::new();

        let _ = writeln!(out, "# HELP resized_images_total Number of images resized");
        let _ = writeln!(out, "# TYPE resized_images_total counter");
        for (label, count) in &snapshot.resized {
            let _ = writeln!(
                out,
                "resized_images_total{{label=\"{}\"}} {}",
                escape_label_value(label),
                count
            );
        }

        let _ = writeln!(out, "# HELP errors_total Number of times an error occurred");
        let _ = writeln!(out, "# TYPE errors_total counter");
        let _ = writeln!(out, "errors_total {}", snapshot.failures);

        out
    }
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_and_snapshot() {
        let counters = Counters::new();
        counters.record_resized("640x480");
        counters.record_resized("640x480");
        counters.record_resized("original");
        counters.record_failure();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.resized["640x480"], 2);
        assert_eq!(snapshot.resized["original"], 1);
        assert_eq!(snapshot.total_resized(), 3);
        assert_eq!(snapshot.failures, 1);
    }

    #[test]
    fn test_render_prometheus() {
        let counters = Counters::new();
        counters.record_resized("original");
        counters.record_resized("320x240");
        counters.record_failure();

        let text = counters.render_prometheus();
        let expected = "\
# HELP resized_images_total Number of images resized
# TYPE resized_images_total counter
resized_images_total{label=\"320x240\"} 1
resized_images_total{label=\"original\"} 1
# HELP errors_total Number of times an error occurred
# TYPE errors_total counter
errors_total 1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_empty() {
        let text = Counters::new().render_prometheus();
        assert!(text.contains("errors_total 0"));
        assert!(!text.contains("resized_images_total{"));
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        for _ in 0..10 {
            let counters = Arc::new(Counters::new());
            let mut handles = Vec::new();
            for i in 0..100 {
                let counters = counters.clone();
                handles.push(tokio::spawn(async move {
                    counters.record_resized(if i % 2 == 0 { "even" } else { "odd" });
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }
            assert_eq!(counters.snapshot().total_resized(), 100);
        }
    }
}

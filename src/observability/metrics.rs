//! Metrics seam for the governance layer.

use metrics::{counter, histogram, Label};

/// Sink for governance metrics.
///
/// The lifecycle plugin emits through this trait so hosts can inject their
/// own collector; [`FacadeMetrics`] is the default production
/// implementation.
pub trait MetricsSink: Send + Sync {
    /// Count one occurrence of `name` with the given tags.
    fn increment(&self, name: &str, tags: &[(&str, &str)]);

    /// Record a duration in milliseconds for `name` with the given tags.
    fn timing(&self, name: &str, duration_ms: u64, tags: &[(&str, &str)]);
}

/// Forwards to the `metrics` facade (`counter!`/`histogram!`), for hosts
/// with a recorder installed (e.g. a Prometheus exporter). Without a
/// recorder the facade discards emissions, so this is always safe to use.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeMetrics;

impl MetricsSink for FacadeMetrics {
    fn increment(&self, name: &str, tags: &[(&str, &str)]) {
        counter!(name.to_string(), to_labels(tags)).increment(1);
    }

    fn timing(&self, name: &str, duration_ms: u64, tags: &[(&str, &str)]) {
        histogram!(name.to_string(), to_labels(tags)).record(duration_ms as f64);
    }
}

/// Discards every emission, for hosts that disable metric collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn increment(&self, _name: &str, _tags: &[(&str, &str)]) {}

    fn timing(&self, _name: &str, _duration_ms: u64, _tags: &[(&str, &str)]) {}
}

fn to_labels(tags: &[(&str, &str)]) -> Vec<Label> {
    tags.iter()
        .map(|(key, value)| Label::new(key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::MetricsSink;
    use parking_lot::Mutex;

    /// Records every emission for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingMetrics {
        pub(crate) counters: Mutex<Vec<(String, Vec<(String, String)>)>>,
        pub(crate) timings: Mutex<Vec<(String, u64, Vec<(String, String)>)>>,
    }

    impl MetricsSink for RecordingMetrics {
        fn increment(&self, name: &str, tags: &[(&str, &str)]) {
            self.counters.lock().push((name.to_string(), own(tags)));
        }

        fn timing(&self, name: &str, duration_ms: u64, tags: &[(&str, &str)]) {
            self.timings
                .lock()
                .push((name.to_string(), duration_ms, own(tags)));
        }
    }

    fn own(tags: &[(&str, &str)]) -> Vec<(String, String)> {
        tags.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testing::RecordingMetrics;

    #[test]
    fn test_facade_without_recorder_is_safe() {
        let sink = FacadeMetrics;
        sink.increment("governance.test", &[("operation", "Login")]);
        sink.timing("governance.test.duration", 12, &[]);
    }

    #[test]
    fn test_recording_sink_captures_emissions() {
        let sink = RecordingMetrics::default();
        sink.increment("requests", &[("outcome", "success")]);
        sink.timing("duration", 42, &[("operation", "Login")]);

        assert_eq!(sink.counters.lock().len(), 1);
        let timings = sink.timings.lock();
        assert_eq!(timings[0].0, "duration");
        assert_eq!(timings[0].1, 42);
    }
}

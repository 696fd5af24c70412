//! Publish counters for event streams
//!
//! Recorded only when a stream is created with metrics enabled.

use std::time::{Duration, Instant};

/// Counters collected for one stream
#[derive(Debug, Clone, Default)]
pub struct StreamMetrics {
    /// Values handed to `publish` while the stream was open
    pub values_published: u64,
    /// Individual subscriber invocations
    pub deliveries: u64,
    /// Values published with no subscriber attached
    pub values_dropped: u64,
    pub start_time: Option<Instant>,
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record_publish(&mut self, subscribers: usize) {
        self.values_published += 1;
        if subscribers == 0 {
            self.values_dropped += 1;
        }
    }

    pub fn record_delivery(&mut self) {
        self.deliveries += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }

    /// Average fan-out per published value
    pub fn fan_out(&self) -> f64 {
        let delivered = self.values_published - self.values_dropped;
        if delivered > 0 {
            self.deliveries as f64 / delivered as f64
        } else {
            0.0
        }
    }
}

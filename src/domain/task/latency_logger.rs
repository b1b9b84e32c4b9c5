use crate::domain::task::{SinkTask, StageTask, TaskRef, TimestampedNumber};

pub const LATENCY_LOGGER_CLASS: &str = "queue_behavior.LatencyLoggerTask";

/// Sink that records how long a number took from emission to consumption.
#[derive(Debug, Default)]
pub struct LatencyLogger {
    pub consumed: u64,
    pub total_latency_ms: i64,
    pub max_latency_ms: i64,
}

impl LatencyLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean_latency_ms(&self) -> Option<f64> {
        (self.consumed > 0).then(|| self.total_latency_ms as f64 / self.consumed as f64)
    }

    fn record(&mut self, item: TimestampedNumber, now_ms: i64) {
        // Clocks of different hosts may disagree slightly.
        let latency = (now_ms - item.emitted_at_ms).max(0);

        self.consumed += 1;
        self.total_latency_ms += latency;
        self.max_latency_ms = self.max_latency_ms.max(latency);

        log::debug!("Consumed prime {} after {} ms", item.value, latency);
    }
}

impl StageTask for LatencyLogger {
    fn task_ref(&self) -> TaskRef {
        TaskRef::new(LATENCY_LOGGER_CLASS)
    }
}

impl SinkTask for LatencyLogger {
    type Item = TimestampedNumber;

    fn consume(&mut self, item: TimestampedNumber) {
        self.record(item, chrono::Utc::now().timestamp_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_statistics() {
        let mut logger = LatencyLogger::new();
        assert_eq!(logger.mean_latency_ms(), None);

        logger.record(TimestampedNumber { value: 3, emitted_at_ms: 100 }, 110);
        logger.record(TimestampedNumber { value: 5, emitted_at_ms: 100 }, 130);
        logger.record(TimestampedNumber { value: 7, emitted_at_ms: 200 }, 190);

        assert_eq!(logger.consumed, 3);
        assert_eq!(logger.max_latency_ms, 30);
        assert_eq!(logger.mean_latency_ms(), Some(40.0 / 3.0));
    }
}

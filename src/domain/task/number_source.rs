use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::task::{SourceTask, StageTask, TaskRef, TimestampedNumber};

pub const NUMBER_SOURCE_CLASS: &str = "queue_behavior.NumberSourceTask";

/// Key under which the source vertex receives the name of the selected profile.
pub const PROFILE_PROPERTY_KEY: &str = "queuebehavior.profile";

const LOWER_BOUND: u64 = 1_000_000_000_000;
const UPPER_BOUND: u64 = 10_000_000_000_000;

/// Cheap generator of large odd numbers.
#[derive(Debug)]
pub struct NumberSource {
    rng: StdRng,
    remaining: Option<u64>,
}

impl NumberSource {
    pub fn new() -> Self {
        NumberSource { rng: StdRng::from_os_rng(), remaining: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        NumberSource { rng: StdRng::seed_from_u64(seed), remaining: None }
    }

    /// Stops the source after `count` numbers.
    pub fn limited(mut self, count: u64) -> Self {
        self.remaining = Some(count);
        self
    }
}

impl Default for NumberSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTask for NumberSource {
    fn task_ref(&self) -> TaskRef {
        TaskRef::new(NUMBER_SOURCE_CLASS)
    }
}

impl SourceTask for NumberSource {
    type Item = TimestampedNumber;

    fn produce(&mut self) -> Option<TimestampedNumber> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let value = self.rng.random_range(LOWER_BOUND..UPPER_BOUND) | 1;
        Some(TimestampedNumber { value, emitted_at_ms: chrono::Utc::now().timestamp_millis() })
    }
}

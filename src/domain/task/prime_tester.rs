use crate::domain::task::{FilterTask, StageTask, TaskRef, TimestampedNumber};

pub const PRIME_TESTER_CLASS: &str = "queue_behavior.PrimeNumberTestTask";

/// Compute intensive filter that only forwards prime numbers.
#[derive(Debug, Default)]
pub struct PrimeTester;

impl PrimeTester {
    pub fn new() -> Self {
        PrimeTester
    }
}

/// Plain trial division. Slow on purpose, the benchmark relies on the filter being
/// the bottleneck.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

impl StageTask for PrimeTester {
    fn task_ref(&self) -> TaskRef {
        TaskRef::new(PRIME_TESTER_CLASS)
    }
}

impl FilterTask for PrimeTester {
    type Input = TimestampedNumber;
    type Output = TimestampedNumber;

    fn process(&mut self, item: TimestampedNumber) -> Option<TimestampedNumber> {
        is_prime(item.value).then_some(item)
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod latency_logger;
pub mod number_source;
pub mod prime_tester;

/// Opaque reference to a task implementation known to the execution runtime.
///
/// The topology never looks inside the task; it only ships the identifier and the
/// per-vertex configuration to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub class_name: String,
    pub config: BTreeMap<String, String>,
}

impl TaskRef {
    pub fn new(class_name: impl Into<String>) -> Self {
        TaskRef { class_name: class_name.into(), config: BTreeMap::new() }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

/// Common capability of every task that can be bound to a stage.
pub trait StageTask {
    fn task_ref(&self) -> TaskRef;
}

pub trait SourceTask: StageTask {
    type Item;

    /// Emits the next item, `None` once the source is exhausted.
    fn produce(&mut self) -> Option<Self::Item>;
}

pub trait FilterTask: StageTask {
    type Input;
    type Output;

    /// Returns `None` for items that are filtered out.
    fn process(&mut self, item: Self::Input) -> Option<Self::Output>;
}

pub trait SinkTask: StageTask {
    type Item;

    fn consume(&mut self, item: Self::Item);
}

/// A number as it travels through the benchmark pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedNumber {
    pub value: u64,

    /// Wall clock time (ms since epoch) at which the source emitted the number.
    pub emitted_at_ms: i64,
}

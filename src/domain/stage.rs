use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::task::TaskRef;

/// The three vertices every benchmark topology consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageKind {
    Source,
    Filter,
    Sink,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [StageKind::Source, StageKind::Filter, StageKind::Sink];

    /// Display name the vertex carries in the submitted job graph.
    pub fn vertex_name(&self) -> &'static str {
        match self {
            StageKind::Source => "Number Source",
            StageKind::Filter => "Prime Tester",
            StageKind::Sink => "Number Sink",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertex_name())
    }
}

/// A vertex of the job graph together with its parallelism settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub kind: StageKind,

    /// Total number of parallel instances.
    pub degree: u32,

    /// Upper bound of instances scheduled onto one execution host.
    pub per_group: u32,

    pub task: TaskRef,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        self.kind.vertex_name()
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::edge::EdgeKey;

/// Maximum tolerable latency from emission at `edge.from` to receipt at `edge.to`.
///
/// The constraint is advisory metadata for the runtime's QoS monitoring. Several
/// constraints on the same edge are kept side by side; reconciling overlapping
/// thresholds is left to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConstraint {
    pub edge: EdgeKey,
    pub max_millis: u64,
}

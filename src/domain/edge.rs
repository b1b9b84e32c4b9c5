use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::stage::StageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    Network,
    InMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionPattern {
    /// Every upstream instance is connected to every downstream instance.
    Bipartite,
    PointWise,
}

/// A directed channel between two stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: StageKind,
    pub to: StageKind,
    pub channel: ChannelType,
    pub distribution: DistributionPattern,
}

impl Edge {
    pub fn network_bipartite(from: StageKind, to: StageKind) -> Self {
        Edge { from, to, channel: ChannelType::Network, distribution: DistributionPattern::Bipartite }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey { from: self.from, to: self.to }
    }
}

/// Identifies an edge by its endpoints. A benchmark topology never has two edges
/// between the same pair of stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub from: StageKind,
    pub to: StageKind,
}

impl EdgeKey {
    pub const SOURCE_TO_FILTER: EdgeKey = EdgeKey { from: StageKind::Source, to: StageKind::Filter };
    pub const FILTER_TO_SINK: EdgeKey = EdgeKey { from: StageKind::Filter, to: StageKind::Sink };
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

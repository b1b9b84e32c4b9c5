use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::constraint::LatencyConstraint;
use crate::domain::edge::{ChannelType, DistributionPattern, Edge, EdgeKey};
use crate::domain::profile::ParallelismProfile;
use crate::domain::stage::{Stage, StageKind};
use crate::domain::task::number_source::PROFILE_PROPERTY_KEY;
use crate::domain::task::{FilterTask, SinkTask, SourceTask, TaskRef};
use crate::error::ConfigurationError;

pub const JOB_NAME: &str = "Test Queue Behavior job";

/// Scheduling hint: instances of `members` should share execution instances with
/// `anchor` when the job runs on a single host. Distributed runtimes may ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collocation {
    pub anchor: StageKind,
    pub members: Vec<StageKind>,
}

/// The benchmark job graph: Source -> Filter -> Sink plus attached latency constraints.
///
/// A topology is immutable once built. Attaching a constraint consumes it and yields
/// a new topology with an identical stage and edge structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    job_id: Uuid,
    name: String,

    /// Indexed in `StageKind::ALL` order.
    stages: [Stage; 3],

    /// Source -> Filter, then Filter -> Sink.
    edges: [Edge; 2],

    /// In attachment order.
    constraints: Vec<LatencyConstraint>,

    collocation: Option<Collocation>,
}

impl Topology {
    /// Builds the benchmark topology for `profile`.
    ///
    /// The type bounds make sure the filter accepts what the source produces and the
    /// sink accepts what the filter forwards.
    pub fn build<S, F, K>(profile_name: &str, profile: &ParallelismProfile, source: &S, filter: &F, sink: &K) -> Result<Topology, ConfigurationError>
    where
        S: SourceTask,
        F: FilterTask<Input = S::Item>,
        K: SinkTask<Item = F::Output>,
    {
        profile.validate(profile_name)?;

        let source_task = source.task_ref().with_config(PROFILE_PROPERTY_KEY, profile_name);

        let stages = vec![
            Stage { kind: StageKind::Source, degree: profile.outer_dop, per_group: profile.outer_dop_per_group, task: source_task },
            Stage { kind: StageKind::Filter, degree: profile.inner_dop, per_group: profile.inner_dop_per_group, task: filter.task_ref() },
            // The sink mirrors the source, every emitted number is logged exactly once.
            Stage { kind: StageKind::Sink, degree: profile.outer_dop, per_group: profile.outer_dop_per_group, task: sink.task_ref() },
        ];

        let edges = vec![
            Edge::network_bipartite(StageKind::Source, StageKind::Filter),
            Edge::network_bipartite(StageKind::Filter, StageKind::Sink),
        ];

        let collocation = Collocation { anchor: StageKind::Source, members: vec![StageKind::Filter, StageKind::Sink] };

        let topology = Self::from_parts(Uuid::new_v4(), JOB_NAME.to_string(), stages, edges, Vec::new(), Some(collocation))?;

        log::debug!(
            "Built topology {} for profile '{}': source={}, filter={}, sink={}",
            topology.job_id,
            profile_name,
            profile.outer_dop,
            profile.inner_dop,
            profile.outer_dop
        );

        Ok(topology)
    }

    /// Assembles a topology from loose parts and checks its structure.
    ///
    /// Stages and edges may be given in any order.
    pub fn from_parts(
        job_id: Uuid,
        name: String,
        stages: Vec<Stage>,
        edges: Vec<Edge>,
        constraints: Vec<LatencyConstraint>,
        collocation: Option<Collocation>,
    ) -> Result<Topology, ConfigurationError> {
        let stages = Self::order_stages(stages)?;
        let edges = Self::order_edges(edges)?;

        let [source, _, sink] = &stages;
        if source.degree != sink.degree || source.per_group != sink.per_group {
            return Err(ConfigurationError::MalformedGraph(format!(
                "sink parallelism ({}/{}) must mirror source parallelism ({}/{})",
                sink.degree, sink.per_group, source.degree, source.per_group
            )));
        }

        if let Some(collocation) = &collocation {
            if collocation.members.contains(&collocation.anchor) {
                return Err(ConfigurationError::MalformedGraph(format!("stage {} cannot be collocated with itself", collocation.anchor)));
            }
        }

        let mut topology = Topology { job_id, name, stages, edges, constraints: Vec::with_capacity(constraints.len()), collocation };
        for constraint in constraints {
            topology = topology.with_latency_constraint(constraint.edge, constraint.max_millis)?;
        }

        Ok(topology)
    }

    fn order_stages(stages: Vec<Stage>) -> Result<[Stage; 3], ConfigurationError> {
        if stages.len() != StageKind::ALL.len() {
            return Err(ConfigurationError::MalformedGraph(format!("expected 3 stages, found {}", stages.len())));
        }

        let mut slots: [Option<Stage>; 3] = [None, None, None];
        for stage in stages {
            if stage.degree == 0 || stage.per_group == 0 || stage.per_group > stage.degree {
                return Err(ConfigurationError::InvalidStageDegree { stage: stage.kind, degree: stage.degree, per_group: stage.per_group });
            }

            let slot = &mut slots[stage.kind as usize];
            if slot.is_some() {
                return Err(ConfigurationError::MalformedGraph(format!("stage {} is defined more than once", stage.kind)));
            }
            *slot = Some(stage);
        }

        match slots {
            [Some(source), Some(filter), Some(sink)] => Ok([source, filter, sink]),
            // Three stages without duplicates always cover every kind.
            _ => Err(ConfigurationError::MalformedGraph("missing stage".to_string())),
        }
    }

    fn order_edges(edges: Vec<Edge>) -> Result<[Edge; 2], ConfigurationError> {
        let expected = [EdgeKey::SOURCE_TO_FILTER, EdgeKey::FILTER_TO_SINK];
        if edges.len() != expected.len() {
            return Err(ConfigurationError::MalformedGraph(format!("expected 2 edges, found {}", edges.len())));
        }

        let mut ordered = Vec::with_capacity(expected.len());
        for key in expected {
            let edge = edges
                .iter()
                .find(|edge| edge.key() == key)
                .ok_or_else(|| ConfigurationError::MalformedGraph(format!("missing edge {}", key)))?;

            if edge.channel != ChannelType::Network || edge.distribution != DistributionPattern::Bipartite {
                return Err(ConfigurationError::MalformedGraph(format!(
                    "edge {} must be a bipartite network channel, found {:?}/{:?}",
                    key, edge.channel, edge.distribution
                )));
            }
            ordered.push(*edge);
        }

        Ok([ordered[0], ordered[1]])
    }

    /// Returns this topology with one more latency constraint on `edge`.
    ///
    /// Existing constraints on the same edge are kept, nothing is merged.
    pub fn with_latency_constraint(mut self, edge: EdgeKey, max_millis: u64) -> Result<Topology, ConfigurationError> {
        if self.edge(edge).is_none() {
            return Err(ConfigurationError::UnknownEdge { from: edge.from, to: edge.to });
        }
        if max_millis == 0 {
            return Err(ConfigurationError::ZeroLatency { from: edge.from, to: edge.to });
        }

        self.constraints.push(LatencyConstraint { edge, max_millis });
        Ok(self)
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, kind: StageKind) -> &Stage {
        &self.stages[kind as usize]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.key() == key)
    }

    pub fn constraints(&self) -> &[LatencyConstraint] {
        &self.constraints
    }

    pub fn constraints_on(&self, edge: EdgeKey) -> impl Iterator<Item = &LatencyConstraint> {
        self.constraints.iter().filter(move |constraint| constraint.edge == edge)
    }

    pub fn collocation(&self) -> Option<&Collocation> {
        self.collocation.as_ref()
    }

    pub fn task(&self, kind: StageKind) -> &TaskRef {
        &self.stage(kind).task
    }

    /// Human readable summary, logged before the job is submitted.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Job '{}' ({})", self.name, self.job_id)?;
        for stage in &self.stages {
            writeln!(f, "  vertex {:<14} dop={:<4} per group={:<4} task={}", stage.name(), stage.degree, stage.per_group, stage.task.class_name)?;
        }
        for edge in &self.edges {
            writeln!(f, "  edge   {} [{:?}, {:?}]", edge.key(), edge.channel, edge.distribution)?;
        }
        for constraint in &self.constraints {
            writeln!(f, "  latency constraint {} <= {} ms", constraint.edge, constraint.max_millis)?;
        }
        if let Some(collocation) = &self.collocation {
            let members: Vec<&str> = collocation.members.iter().map(|kind| kind.vertex_name()).collect();
            writeln!(f, "  {} share instances with {}", members.join(", "), collocation.anchor)?;
        }
        Ok(())
    }
}

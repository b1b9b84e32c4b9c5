use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::constraint::LatencyConstraint;
use crate::domain::edge::{ChannelType, DistributionPattern, Edge, EdgeKey};
use crate::domain::stage::{Stage, StageKind};
use crate::domain::task::TaskRef;
use crate::domain::topology::{Collocation, Topology};
use crate::error::ConfigurationError;

/// Job graph description as shipped to the job manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobGraphDto {
    pub job_id: Uuid,
    pub name: String,
    pub vertices: Vec<VertexDto>,
    pub edges: Vec<EdgeDto>,
    pub latency_constraints: Vec<LatencyConstraintDto>,

    /// Vertex names mapped to the vertex they share instances with.
    pub instance_sharing: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexDto {
    pub name: String,
    pub kind: StageKind,
    pub number_of_subtasks: u32,
    pub number_of_subtasks_per_instance: u32,
    pub task_class: String,
    pub configuration: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDto {
    pub source: String,
    pub target: String,
    pub channel_type: ChannelType,
    pub distribution_pattern: DistributionPattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyConstraintDto {
    pub source: String,
    pub target: String,
    pub max_latency_ms: u64,
}

impl From<&Topology> for JobGraphDto {
    fn from(topology: &Topology) -> Self {
        let vertices = topology
            .stages()
            .iter()
            .map(|stage| VertexDto {
                name: stage.name().to_string(),
                kind: stage.kind,
                number_of_subtasks: stage.degree,
                number_of_subtasks_per_instance: stage.per_group,
                task_class: stage.task.class_name.clone(),
                configuration: stage.task.config.clone(),
            })
            .collect();

        let edges = topology
            .edges()
            .iter()
            .map(|edge| EdgeDto {
                source: edge.from.vertex_name().to_string(),
                target: edge.to.vertex_name().to_string(),
                channel_type: edge.channel,
                distribution_pattern: edge.distribution,
            })
            .collect();

        let latency_constraints = topology
            .constraints()
            .iter()
            .map(|constraint| LatencyConstraintDto {
                source: constraint.edge.from.vertex_name().to_string(),
                target: constraint.edge.to.vertex_name().to_string(),
                max_latency_ms: constraint.max_millis,
            })
            .collect();

        let instance_sharing = topology
            .collocation()
            .map(|collocation| {
                collocation.members.iter().map(|member| (member.vertex_name().to_string(), collocation.anchor.vertex_name().to_string())).collect()
            })
            .unwrap_or_default();

        JobGraphDto { job_id: topology.job_id(), name: topology.name().to_string(), vertices, edges, latency_constraints, instance_sharing }
    }
}

impl TryFrom<JobGraphDto> for Topology {
    type Error = ConfigurationError;

    fn try_from(dto: JobGraphDto) -> Result<Self, Self::Error> {
        let stages = dto
            .vertices
            .into_iter()
            .map(|vertex| {
                if kind_by_name(&vertex.name)? != vertex.kind {
                    return Err(ConfigurationError::MalformedGraph(format!("vertex '{}' is declared as {:?}", vertex.name, vertex.kind)));
                }
                Ok(Stage {
                    kind: vertex.kind,
                    degree: vertex.number_of_subtasks,
                    per_group: vertex.number_of_subtasks_per_instance,
                    task: TaskRef { class_name: vertex.task_class, config: vertex.configuration },
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let edges = dto
            .edges
            .iter()
            .map(|edge| {
                Ok(Edge {
                    from: kind_by_name(&edge.source)?,
                    to: kind_by_name(&edge.target)?,
                    channel: edge.channel_type,
                    distribution: edge.distribution_pattern,
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let constraints = dto
            .latency_constraints
            .iter()
            .map(|constraint| {
                Ok(LatencyConstraint {
                    edge: EdgeKey { from: kind_by_name(&constraint.source)?, to: kind_by_name(&constraint.target)? },
                    max_millis: constraint.max_latency_ms,
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let collocation = collocation_from_sharing(&dto.instance_sharing)?;

        Topology::from_parts(dto.job_id, dto.name, stages, edges, constraints, collocation)
    }
}

fn kind_by_name(name: &str) -> Result<StageKind, ConfigurationError> {
    StageKind::ALL
        .into_iter()
        .find(|kind| kind.vertex_name() == name)
        .ok_or_else(|| ConfigurationError::MalformedGraph(format!("unknown vertex '{}'", name)))
}

fn collocation_from_sharing(sharing: &BTreeMap<String, String>) -> Result<Option<Collocation>, ConfigurationError> {
    let mut anchor = None;
    let mut members = Vec::with_capacity(sharing.len());

    for (member, target) in sharing {
        let target = kind_by_name(target)?;
        if anchor.is_some_and(|anchor| anchor != target) {
            return Err(ConfigurationError::MalformedGraph("vertices share instances with more than one anchor".to_string()));
        }
        anchor = Some(target);
        members.push(kind_by_name(member)?);
    }
    // BTreeMap iterates by name, keep the stage order instead.
    members.sort();

    Ok(anchor.map(|anchor| Collocation { anchor, members }))
}

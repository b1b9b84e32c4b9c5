use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::job_graph_dto::JobGraphDto;

/// Messages the client sends to the job manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    SubmitJob { graph: JobGraphDto },
}

/// Messages the job manager sends back while a job is in flight.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeMessage {
    JobAccepted { job_id: Uuid },
    Rejected { reason: String },
    JobStatus { job_id: Uuid, status: JobStatus },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Scheduled,
    Running,
    Finished,
    Failed { reason: String },
    Canceled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed { .. } | JobStatus::Canceled)
    }
}

use thiserror::Error;

use crate::domain::stage::StageKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse profile JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Unknown profile: {name}. Available profiles: {available:?}")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("Invalid endpoint '{input}': {reason}")]
    InvalidEndpoint { input: String, reason: String },

    #[error("Job submission failed: {0}")]
    Submission(#[from] SubmissionError),
}

/// Errors detected while validating profiles or assembling a topology.
/// All of them are raised before any network interaction takes place.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{field} of profile '{profile}' must be positive")]
    ZeroDegree { profile: String, field: &'static str },

    #[error("{field} ({per_group}) of profile '{profile}' exceeds the total degree ({degree})")]
    PerGroupExceedsDegree { profile: String, field: &'static str, per_group: u32, degree: u32 },

    #[error("Stage {stage} must have a positive degree of parallelism, got {degree} (per group {per_group})")]
    InvalidStageDegree { stage: StageKind, degree: u32, per_group: u32 },

    #[error("Latency constraint on {from} -> {to} must be positive")]
    ZeroLatency { from: StageKind, to: StageKind },

    #[error("Topology has no edge {from} -> {to}")]
    UnknownEdge { from: StageKind, to: StageKind },

    #[error("Profile '{0}' is defined more than once")]
    DuplicateProfile(String),

    #[error("Malformed job graph: {0}")]
    MalformedGraph(String),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Connection to job manager failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Job manager closed the connection before the job terminated")]
    ConnectionClosed,

    #[error("Job manager rejected the job: {0}")]
    Rejected(String),

    #[error("Job {job_id} failed: {reason}")]
    JobFailed { job_id: uuid::Uuid, reason: String },

    #[error("Job {job_id} was canceled by the runtime")]
    JobCanceled { job_id: uuid::Uuid },

    #[error("Unexpected message from job manager: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::api::job_graph_dto::JobGraphDto;
use crate::domain::topology::Topology;
use crate::error::{Error, Result, SubmissionError};
use crate::submission::codec::ClientCodec;
use crate::submission::endpoint::HostPort;
use crate::submission::protocol::{ClientMessage, JobStatus, RuntimeMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The job manager reported that the job finished.
    Completed { job_id: Uuid },

    /// The wait was cancelled locally. The remote job may still be running.
    Cancelled { job_id: Uuid },
}

/// Hands a topology to the job manager and waits for the job to terminate.
///
/// Every call is a single attempt: no retries and no timeout.
#[derive(Debug, Clone, Default)]
pub struct SubmissionDriver {
    cancel: CancellationToken,
}

impl SubmissionDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        SubmissionDriver { cancel }
    }

    /// Token that aborts a pending wait when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Submits `topology` to the job manager at `endpoint` (`host:port`).
    ///
    /// The endpoint is validated before any connection is attempted.
    pub async fn submit(&self, topology: Topology, endpoint: &str) -> Result<SubmissionOutcome> {
        let endpoint: HostPort = endpoint.parse()?;
        let job_id = topology.job_id();
        let graph = JobGraphDto::from(&topology);

        tracing::info!(%job_id, %endpoint, "Submitting job '{}'", graph.name);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::info!(%job_id, "Stopped waiting for job, remote execution is not affected");
                Ok(SubmissionOutcome::Cancelled { job_id })
            }
            outcome = Self::submit_and_wait(graph, &endpoint) => outcome.map_err(Error::from),
        }
    }

    /// Blocking variant of [`SubmissionDriver::submit`] for callers without an async runtime.
    ///
    /// Must not be called from within a tokio runtime.
    pub fn submit_blocking(&self, topology: Topology, endpoint: &str) -> Result<SubmissionOutcome> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(SubmissionError::Io)?;

        runtime.block_on(self.submit(topology, endpoint))
    }

    async fn submit_and_wait(graph: JobGraphDto, endpoint: &HostPort) -> std::result::Result<SubmissionOutcome, SubmissionError> {
        let job_id = graph.job_id;

        let stream = TcpStream::connect(endpoint.socket_address()).await?;
        let mut framed = Framed::new(stream, ClientCodec::new());

        framed.send(ClientMessage::SubmitJob { graph }).await?;
        tracing::debug!(%job_id, "Job graph sent, waiting for job manager");

        while let Some(message) = framed.next().await {
            match message? {
                RuntimeMessage::JobAccepted { job_id: accepted } if accepted == job_id => {
                    tracing::info!(%job_id, "Job accepted by job manager");
                }
                RuntimeMessage::Rejected { reason } => {
                    tracing::error!(%job_id, "Job rejected: {}", reason);
                    return Err(SubmissionError::Rejected(reason));
                }
                RuntimeMessage::JobStatus { job_id: reported, status } if reported == job_id => {
                    if status.is_terminal() {
                        return Self::terminal_outcome(job_id, status);
                    }
                    tracing::info!(%job_id, "Job status changed to {:?}", status);
                }
                other => return Err(SubmissionError::Protocol(format!("message for a different job: {:?}", other))),
            }
        }

        Err(SubmissionError::ConnectionClosed)
    }

    fn terminal_outcome(job_id: Uuid, status: JobStatus) -> std::result::Result<SubmissionOutcome, SubmissionError> {
        match status {
            JobStatus::Finished => {
                tracing::info!(%job_id, "Job finished");
                Ok(SubmissionOutcome::Completed { job_id })
            }
            JobStatus::Failed { reason } => {
                tracing::error!(%job_id, "Job failed: {}", reason);
                Err(SubmissionError::JobFailed { job_id, reason })
            }
            JobStatus::Canceled => {
                tracing::warn!(%job_id, "Job was canceled by the job manager");
                Err(SubmissionError::JobCanceled { job_id })
            }
            status @ (JobStatus::Scheduled | JobStatus::Running) => Err(SubmissionError::Protocol(format!("{:?} is not a terminal status", status))),
        }
    }
}

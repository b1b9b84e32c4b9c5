use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

use queue_behavior_bench::domain::profile::ProfileRegistry;
use queue_behavior_bench::domain::topology::Topology;
use queue_behavior_bench::error::{Error, SubmissionError};
use queue_behavior_bench::submission::codec::RuntimeCodec;
use queue_behavior_bench::submission::driver::{SubmissionDriver, SubmissionOutcome};
use queue_behavior_bench::submission::protocol::{ClientMessage, JobStatus, RuntimeMessage};
use queue_behavior_bench::{DEFAULT_MAX_LATENCY_MS, build_benchmark_topology};

fn topology() -> Topology {
    build_benchmark_topology(&ProfileRegistry::builtin(), "local_quadcore", DEFAULT_MAX_LATENCY_MS).unwrap()
}

/// Accepts one connection and answers the submitted job with `script`.
/// Returns the endpoint to connect to and a handle yielding the received graph's job id.
async fn spawn_job_manager<F>(script: F) -> (String, tokio::task::JoinHandle<uuid::Uuid>)
where
    F: FnOnce(uuid::Uuid) -> Vec<RuntimeMessage> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut framed = Framed::new(stream, RuntimeCodec::new());
        let Some(Ok(ClientMessage::SubmitJob { graph })) = framed.next().await else { panic!("expected a job submission") };

        for message in script(graph.job_id) {
            framed.send(message).await.unwrap();
        }
        graph.job_id
    });

    (endpoint, handle)
}

#[tokio::test]
async fn test_job_completes() {
    let (endpoint, job_manager) = spawn_job_manager(|job_id| {
        vec![
            RuntimeMessage::JobAccepted { job_id },
            RuntimeMessage::JobStatus { job_id, status: JobStatus::Scheduled },
            RuntimeMessage::JobStatus { job_id, status: JobStatus::Running },
            RuntimeMessage::JobStatus { job_id, status: JobStatus::Finished },
        ]
    })
    .await;
    let topology = topology();
    let job_id = topology.job_id();

    let outcome = SubmissionDriver::new().submit(topology, &endpoint).await.unwrap();

    assert_eq!(outcome, SubmissionOutcome::Completed { job_id });
    assert_eq!(job_manager.await.unwrap(), job_id);
}

#[tokio::test]
async fn test_rejected_job() {
    let (endpoint, _job_manager) = spawn_job_manager(|_| vec![RuntimeMessage::Rejected { reason: "not enough instances".to_string() }]).await;

    let result = SubmissionDriver::new().submit(topology(), &endpoint).await;

    assert!(matches!(result, Err(Error::Submission(SubmissionError::Rejected(ref reason))) if reason == "not enough instances"), "got {:?}", result);
}

#[tokio::test]
async fn test_failed_job() {
    let (endpoint, _job_manager) = spawn_job_manager(|job_id| {
        vec![RuntimeMessage::JobAccepted { job_id }, RuntimeMessage::JobStatus { job_id, status: JobStatus::Failed { reason: "task crashed".to_string() } }]
    })
    .await;
    let topology = topology();
    let job_id = topology.job_id();

    let result = SubmissionDriver::new().submit(topology, &endpoint).await;

    match result {
        Err(Error::Submission(SubmissionError::JobFailed { job_id: failed, reason })) => {
            assert_eq!(failed, job_id);
            assert_eq!(reason, "task crashed");
        }
        other => panic!("Expected JobFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_cancellation_is_an_error() {
    let (endpoint, _job_manager) = spawn_job_manager(|job_id| vec![RuntimeMessage::JobStatus { job_id, status: JobStatus::Canceled }]).await;

    let result = SubmissionDriver::new().submit(topology(), &endpoint).await;

    assert!(matches!(result, Err(Error::Submission(SubmissionError::JobCanceled { .. }))), "got {:?}", result);
}

#[tokio::test]
async fn test_connection_closed_before_termination() {
    let (endpoint, _job_manager) = spawn_job_manager(|job_id| vec![RuntimeMessage::JobAccepted { job_id }]).await;

    let result = SubmissionDriver::new().submit(topology(), &endpoint).await;

    assert!(matches!(result, Err(Error::Submission(SubmissionError::ConnectionClosed))), "got {:?}", result);
}

#[tokio::test]
async fn test_status_for_other_job_is_a_protocol_error() {
    let (endpoint, _job_manager) =
        spawn_job_manager(|_| vec![RuntimeMessage::JobStatus { job_id: uuid::Uuid::new_v4(), status: JobStatus::Finished }]).await;

    let result = SubmissionDriver::new().submit(topology(), &endpoint).await;

    assert!(matches!(result, Err(Error::Submission(SubmissionError::Protocol(_)))), "got {:?}", result);
}

#[tokio::test]
async fn test_unreachable_job_manager() {
    // Bind and drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap().port();

    let result = SubmissionDriver::new().submit(topology(), &format!("127.0.0.1:{}", port)).await;

    assert!(matches!(result, Err(Error::Submission(SubmissionError::Io(_)))), "got {:?}", result);
}

#[tokio::test]
async fn test_malformed_endpoint_fails_before_connecting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let result = SubmissionDriver::new().submit(topology(), "localhost").await;
    assert!(matches!(result, Err(Error::InvalidEndpoint { .. })), "got {:?}", result);

    let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err(), "no connection should have been attempted");
}

#[tokio::test]
async fn test_cancelled_before_submission() {
    let driver = SubmissionDriver::new();
    driver.cancellation_token().cancel();
    let topology = topology();
    let job_id = topology.job_id();

    let outcome = driver.submit(topology, "127.0.0.1:1").await.unwrap();

    assert_eq!(outcome, SubmissionOutcome::Cancelled { job_id });
}

use crate::domain::edge::EdgeKey;
use crate::domain::profile::ProfileRegistry;
use crate::domain::task::{latency_logger::LatencyLogger, number_source::NumberSource, prime_tester::PrimeTester};
use crate::domain::topology::Topology;
use crate::error::Result;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod submission;

/// Latency bound on the Source -> Filter edge used by the benchmark.
pub const DEFAULT_MAX_LATENCY_MS: u64 = 100;

/// Builds the queue behavior benchmark for `profile_name`.
///
/// Number Source -> Prime Tester -> Number Sink, with a latency constraint of
/// `max_latency_ms` between emission at the source and receipt at the prime tester.
pub fn build_benchmark_topology(registry: &ProfileRegistry, profile_name: &str, max_latency_ms: u64) -> Result<Topology> {
    let profile = registry.lookup(profile_name)?;
    log::info!("Using profile '{}': {:?}", profile_name, profile);

    let topology = Topology::build(profile_name, &profile, &NumberSource::new(), &PrimeTester::new(), &LatencyLogger::new())?
        .with_latency_constraint(EdgeKey::SOURCE_TO_FILTER, max_latency_ms)?;

    log::info!("Topology constructed successfully.\n{}", topology.describe());

    Ok(topology)
}

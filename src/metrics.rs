use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub queries_committed: IntCounter,
    pub queries_suppressed: IntCounter,
    pub cache_hits: IntCounter,
    pub lookups_issued: IntCounter,
    pub lookup_failures: IntCounter,
    pub stale_responses: IntCounter,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    // Only called with static, well-formed names.
    IntCounter::with_opts(Opts::new(name, help)).expect("valid counter options")
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let queries_committed = counter("queries_committed", "Number of committed queries");
        let queries_suppressed = counter(
            "queries_suppressed",
            "Number of settled inputs below the minimum query length",
        );
        let cache_hits = counter("cache_hits", "Number of queries answered from the cache");
        let lookups_issued = counter("lookups_issued", "Number of entity lookups issued");
        let lookup_failures = counter("lookup_failures", "Number of failed entity lookups");
        let stale_responses = counter(
            "stale_responses",
            "Number of responses dropped because a newer query superseded them",
        );

        registry.register(Box::new(queries_committed.clone())).ok();
        registry.register(Box::new(queries_suppressed.clone())).ok();
        registry.register(Box::new(cache_hits.clone())).ok();
        registry.register(Box::new(lookups_issued.clone())).ok();
        registry.register(Box::new(lookup_failures.clone())).ok();
        registry.register(Box::new(stale_responses.clone())).ok();

        Metrics {
            queries_committed,
            queries_suppressed,
            cache_hits,
            lookups_issued,
            lookup_failures,
            stale_responses,
            registry: Arc::new(registry),
        }
    }

    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            log::warn!("Failed to encode metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

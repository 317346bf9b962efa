//! Generation-gated suggestion lookups
use crate::catalog::CatalogApi;
use crate::config::SuggestConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::suggest::{CacheEntry, QueryState, SuggestionCache, SuggestionRanker, is_queryable};
use log::{debug, warn};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// Outcome of resolving one committed query
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Below the minimum length; nothing was looked up
    Suppressed,
    Cached(Arc<CacheEntry>),
    Fresh(Arc<CacheEntry>),
    /// Superseded by a newer generation; nothing was cached
    Stale,
}

/// Issues book and author lookups for committed queries.
///
/// Every commit advances the generation and cancels the lookups of the
/// previous one. A resolution whose generation is no longer current when its
/// lookups settle is reported as [`Resolution::Stale`] and never written to
/// the cache.
pub struct RequestCoordinator {
    api: Arc<dyn CatalogApi>,
    cache: SuggestionCache,
    ranker: SuggestionRanker,
    min_chars: usize,
    generation: AtomicU64,
    in_flight: Mutex<CancellationToken>,
    metrics: Arc<Metrics>,
}

impl RequestCoordinator {
    pub fn new(api: Arc<dyn CatalogApi>, config: &SuggestConfig, metrics: Arc<Metrics>) -> Self {
        Self {
            api,
            cache: SuggestionCache::new(),
            ranker: SuggestionRanker::from_config(config),
            min_chars: config.min_query_chars,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(CancellationToken::new()),
            metrics,
        }
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    fn advance(&self) -> u64 {
        let mut token = self.in_flight.lock();
        token.cancel();
        *token = CancellationToken::new();
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a new generation for `raw`, superseding whatever is in flight
    pub fn commit(&self, raw: &str) -> QueryState {
        let generation = self.advance();
        self.metrics.queries_committed.inc();
        let query = QueryState::new(raw, generation);
        debug!(
            "Committed query {:?} as generation {generation}",
            query.normalized_text
        );
        query
    }

    /// Supersede in-flight work without starting a query
    pub fn invalidate(&self) -> u64 {
        self.advance()
    }

    /// Input settled below the minimum length
    pub fn suppress(&self) -> u64 {
        self.metrics.queries_suppressed.inc();
        self.invalidate()
    }

    pub fn cached(&self, query: &QueryState) -> Option<Arc<CacheEntry>> {
        let entry = self.cache.get(&query.normalized_text)?;
        self.metrics.cache_hits.inc();
        Some(entry)
    }

    async fn lookup<T, F>(
        &self,
        operation: &'static str,
        token: &CancellationToken,
        request: F,
    ) -> Option<(Vec<T>, bool)>
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        self.metrics.lookups_issued.inc();
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = request => match result {
                Ok(found) => Some((found, true)),
                Err(e) => {
                    warn!("{operation} failed, treating as no matches: {e}");
                    self.metrics.lookup_failures.inc();
                    Some((Vec::new(), false))
                }
            },
        }
    }

    pub async fn resolve(&self, query: &QueryState) -> Resolution {
        if !is_queryable(&query.normalized_text, self.min_chars) {
            return Resolution::Suppressed;
        }
        if let Some(entry) = self.cached(query) {
            return Resolution::Cached(entry);
        }

        let token = {
            let guard = self.in_flight.lock();
            if !self.is_current(query.generation) {
                self.metrics.stale_responses.inc();
                return Resolution::Stale;
            }
            guard.clone()
        };

        let text = query.normalized_text.as_str();
        let (books, authors) = tokio::join!(
            self.lookup("search_books", &token, self.api.search_books(text)),
            self.lookup("search_authors", &token, self.api.search_authors(text)),
        );

        let _guard = self.in_flight.lock();
        let (Some((books, books_ok)), Some((authors, authors_ok))) = (books, authors) else {
            self.metrics.stale_responses.inc();
            debug!("Lookups for generation {} were cancelled", query.generation);
            return Resolution::Stale;
        };
        if !self.is_current(query.generation) {
            self.metrics.stale_responses.inc();
            debug!(
                "Dropping response for generation {}, current is {}",
                query.generation,
                self.current_generation()
            );
            return Resolution::Stale;
        }

        let entry = Arc::new(self.ranker.merge(&books, &authors));
        if books_ok && authors_ok {
            self.cache.put(query.normalized_text.clone(), entry.clone());
        } else {
            debug!(
                "Not caching degraded result for {:?}",
                query.normalized_text
            );
        }
        Resolution::Fresh(entry)
    }
}

//! Type-ahead suggestions: debounce, cache, coordinated lookups, ranking
//! and keyboard selection
pub mod cache;
pub mod coordinator;
pub mod debounce;
pub mod ranker;
pub mod selection;
pub mod session;

use crate::catalog::ItemKind;
use serde::Serialize;

pub use cache::{CacheEntry, SuggestionCache};
pub use coordinator::{RequestCoordinator, Resolution};
pub use debounce::{DebounceSignal, QueryDebouncer};
pub use ranker::SuggestionRanker;
pub use selection::{Commit, Key, SelectionController, SelectionState};
pub use session::{PanelState, PanelView, SessionEvent, SuggestSession};

/// One candidate row of the suggestion panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: u64,
    pub label: String,
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// A committed query tagged with its generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub raw_text: String,
    pub normalized_text: String,
    pub generation: u64,
}

impl QueryState {
    pub fn new(raw_text: &str, generation: u64) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            normalized_text: normalize(raw_text).to_string(),
            generation,
        }
    }
}

/// Cache key and lookup text for raw input
pub fn normalize(raw: &str) -> &str {
    raw.trim()
}

/// Whether `raw` is long enough to be looked up
pub fn is_queryable(raw: &str, min_chars: usize) -> bool {
    normalize(raw).chars().count() >= min_chars
}

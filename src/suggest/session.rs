//! The type-ahead event loop
//!
//! [`SuggestSession`] owns the input text and the visible panel. Keystrokes
//! feed the debouncer; settled input is committed to the
//! [`RequestCoordinator`], whose lookups run on spawned tasks and report back
//! over a channel. [`SuggestSession::step`] waits for whichever comes first,
//! the debounce deadline or a lookup result.

use crate::suggest::{
    CacheEntry, Commit, DebounceSignal, Key, QueryDebouncer, QueryState, RequestCoordinator,
    Resolution, SelectionController, Suggestion, is_queryable,
};
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelState {
    Hidden,
    Loading,
    NoResults,
    Open,
}

/// Snapshot of what the suggestion panel shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub state: PanelState,
    pub text: String,
    pub candidates: Vec<Suggestion>,
    pub highlighted: Option<usize>,
    pub total_count: usize,
}

impl PanelView {
    pub fn footer(&self) -> Option<String> {
        if self.state != PanelState::Open || self.total_count == 0 {
            return None;
        }
        Some(format!(
            "{} results found — press Enter to see all",
            self.total_count
        ))
    }
}

/// What a single [`SuggestSession::step`] did
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Committed(QueryState),
    Suppressed,
    Applied { generation: u64 },
    Dropped { generation: u64 },
}

pub struct SuggestSession {
    coordinator: Arc<RequestCoordinator>,
    debouncer: QueryDebouncer,
    selection: SelectionController,
    text: String,
    entry: Option<Arc<CacheEntry>>,
    loading: bool,
    dismissed: bool,
    in_flight: usize,
    tx: UnboundedSender<(u64, Resolution)>,
    rx: UnboundedReceiver<(u64, Resolution)>,
}

impl SuggestSession {
    pub fn new(coordinator: Arc<RequestCoordinator>, debouncer: QueryDebouncer) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            coordinator,
            debouncer,
            selection: SelectionController::new(),
            text: String::new(),
            entry: None,
            loading: false,
            dismissed: false,
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn coordinator(&self) -> &RequestCoordinator {
        &self.coordinator
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    fn candidates(&self) -> &[Suggestion] {
        self.entry.as_deref().map_or(&[][..], |entry| entry.candidates.as_slice())
    }

    /// Replace the input text, as if typed
    ///
    /// Text below the minimum length clears the panel and supersedes any
    /// lookup in flight right away; the debouncer still settles it into a
    /// [`SessionEvent::Suppressed`].
    pub fn input(&mut self, raw: &str) {
        self.text = raw.to_string();
        self.selection.focus();
        self.selection.reset_highlight();
        self.dismissed = false;
        if !is_queryable(raw, self.debouncer.min_chars) {
            self.coordinator.invalidate();
            self.clear_candidates();
        }
        self.debouncer.input(raw);
    }

    fn clear_candidates(&mut self) {
        self.entry = None;
        self.loading = false;
        self.selection.clear();
    }

    pub fn focus(&mut self) {
        self.selection.focus();
        self.dismissed = false;
    }

    pub fn blur(&mut self) {
        self.selection.blur();
    }

    pub fn hover(&mut self, index: usize) {
        self.selection.hover(index);
    }

    pub fn click(&mut self, index: usize) -> Option<Commit> {
        let entry = self.entry.clone()?;
        let commit = self.selection.click(index, &entry.candidates)?;
        self.committed(&commit);
        Some(commit)
    }

    pub fn key(&mut self, key: Key) -> Option<Commit> {
        let entry = self.entry.clone();
        let candidates = entry.as_deref().map_or(&[][..], |e| e.candidates.as_slice());
        let commit = self.selection.key(key, candidates, &self.text);
        if key == Key::Escape {
            self.dismissed = true;
        }
        if let Some(commit) = &commit {
            self.committed(commit);
        }
        commit
    }

    fn committed(&mut self, commit: &Commit) {
        if let Commit::Item(item) = commit {
            self.text = item.label.clone();
        }
        self.debouncer.cancel();
        self.coordinator.invalidate();
        self.loading = false;
        self.dismissed = true;
    }

    pub fn panel(&self) -> PanelView {
        let total_count = self.entry.as_ref().map_or(0, |entry| entry.total_count);
        let state = if !self.selection.is_focused() {
            PanelState::Hidden
        } else if self.loading {
            PanelState::Loading
        } else if self.selection.is_open() {
            PanelState::Open
        } else if self.entry.is_some() && self.candidates().is_empty() && !self.dismissed {
            PanelState::NoResults
        } else {
            PanelState::Hidden
        };
        let candidates = if state == PanelState::Open {
            self.candidates().to_vec()
        } else {
            Vec::new()
        };

        PanelView {
            state,
            text: self.text.clone(),
            candidates,
            highlighted: self.selection.highlighted(),
            total_count,
        }
    }

    /// No pending input and no lookup outstanding
    pub fn is_idle(&self) -> bool {
        !self.debouncer.has_pending() && self.in_flight == 0
    }

    /// Wait for the next debounce deadline or lookup result and apply it.
    /// Returns `None` once the session is idle.
    pub async fn step(&mut self) -> Option<SessionEvent> {
        loop {
            if self.is_idle() {
                return None;
            }
            let deadline = self.debouncer.deadline();
            let settled = async {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = settled => {
                    if let Some(signal) = self.debouncer.poll_ready(Instant::now()) {
                        return Some(self.settle_input(signal));
                    }
                }
                Some((generation, resolution)) = self.rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    return Some(self.apply(generation, resolution));
                }
            }
        }
    }

    /// Step until idle, returning everything that happened
    pub async fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.step().await {
            events.push(event);
        }
        events
    }

    fn settle_input(&mut self, signal: DebounceSignal) -> SessionEvent {
        match signal {
            DebounceSignal::Suppressed => {
                self.coordinator.suppress();
                self.clear_candidates();
                SessionEvent::Suppressed
            }
            DebounceSignal::Commit(raw) => {
                let query = self.coordinator.commit(&raw);
                if let Some(entry) = self.coordinator.cached(&query) {
                    self.show(entry);
                    return SessionEvent::Committed(query);
                }

                let coordinator = self.coordinator.clone();
                let tx = self.tx.clone();
                let spawned = query.clone();
                tokio::spawn(async move {
                    let generation = spawned.generation;
                    let lookup =
                        tokio::spawn(async move { coordinator.resolve(&spawned).await });
                    let resolution = match lookup.await {
                        Ok(resolution) => resolution,
                        Err(e) => {
                            warn!("Lookup task for generation {generation} failed: {e}");
                            Resolution::Stale
                        }
                    };
                    // the session may already be gone
                    let _ = tx.send((generation, resolution));
                });
                self.in_flight += 1;
                self.loading = true;
                SessionEvent::Committed(query)
            }
        }
    }

    fn apply(&mut self, generation: u64, resolution: Resolution) -> SessionEvent {
        if !self.coordinator.is_current(generation) {
            debug!("Ignoring result for superseded generation {generation}");
            return SessionEvent::Dropped { generation };
        }
        self.loading = false;
        match resolution {
            Resolution::Cached(entry) | Resolution::Fresh(entry) => {
                self.show(entry);
                SessionEvent::Applied { generation }
            }
            Resolution::Suppressed => {
                self.clear_candidates();
                SessionEvent::Applied { generation }
            }
            Resolution::Stale => SessionEvent::Dropped { generation },
        }
    }

    fn show(&mut self, entry: Arc<CacheEntry>) {
        self.loading = false;
        self.selection.candidates_arrived(entry.candidates.len());
        self.entry = Some(entry);
    }
}

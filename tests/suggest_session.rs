use async_trait::async_trait;
use catalog_query::browse::SortKey;
use catalog_query::catalog::{Author, Book, CatalogApi, Publisher};
use catalog_query::config::SuggestConfig;
use catalog_query::error::{QueryError, Result};
use catalog_query::metrics::Metrics;
use catalog_query::suggest::{
    Key, PanelState, QueryDebouncer, RequestCoordinator, Resolution, SessionEvent, SuggestSession,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Catalog with per-query latency and call counting
#[derive(Default)]
struct FakeCatalog {
    books: Vec<Book>,
    authors: Vec<Author>,
    slow: Vec<(String, Duration)>,
    fail_books: bool,
    book_calls: AtomicUsize,
    author_calls: AtomicUsize,
}

impl FakeCatalog {
    fn latency(&self, text: &str) -> Duration {
        self.slow
            .iter()
            .find(|(slow_text, _)| slow_text == text)
            .map_or(Duration::from_millis(10), |(_, latency)| *latency)
    }

    fn book_calls(&self) -> usize {
        self.book_calls.load(Ordering::SeqCst)
    }

    fn author_calls(&self) -> usize {
        self.author_calls.load(Ordering::SeqCst)
    }
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn search_books(&self, text: &str) -> Result<Vec<Book>> {
        self.book_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency(text)).await;
        if self.fail_books {
            return Err(QueryError::transport("search_books", "503 Service Unavailable"));
        }
        Ok(self
            .books
            .iter()
            .filter(|b| matches(&b.title, text))
            .cloned()
            .collect())
    }

    async fn search_authors(&self, text: &str) -> Result<Vec<Author>> {
        self.author_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency(text)).await;
        Ok(self
            .authors
            .iter()
            .filter(|a| matches(&a.name, text))
            .cloned()
            .collect())
    }

    async fn list_active(&self, _sort: SortKey) -> Result<Vec<Book>> {
        Ok(self.books.clone())
    }

    async fn list_active_authors(&self) -> Result<Vec<Author>> {
        Ok(self.authors.clone())
    }

    async fn list_active_publishers(&self) -> Result<Vec<Publisher>> {
        Ok(Vec::new())
    }
}

fn book(id: u64, title: &str) -> Book {
    Book {
        id,
        title: title.to_string(),
        author_id: 1,
        author_name: Some("J. K. Rowling".into()),
        price: 12.0,
        category_id: 1,
        publisher_id: None,
        publisher_name: None,
        stock: 2,
        published_date: None,
    }
}

fn author(id: u64, name: &str) -> Author {
    Author {
        id,
        name: name.to_string(),
        biography: Some("Science fiction author".into()),
    }
}

fn catalog() -> FakeCatalog {
    let mut books: Vec<Book> = (1..=9)
        .map(|i| book(i, &format!("Harry Potter volume {i}")))
        .collect();
    books.push(book(20, "Dune"));
    books.push(book(21, "Dune Messiah"));
    FakeCatalog {
        books,
        authors: vec![author(100, "Harry Harrison"), author(101, "Frank Herbert")],
        ..FakeCatalog::default()
    }
}

fn session(api: Arc<FakeCatalog>) -> SuggestSession {
    let config = SuggestConfig::default();
    let coordinator = RequestCoordinator::new(api, &config, Arc::new(Metrics::new()));
    let mut session = SuggestSession::new(
        Arc::new(coordinator),
        QueryDebouncer::new(config.debounce(), config.min_query_chars),
    );
    session.focus();
    session
}

fn labels(session: &SuggestSession) -> Vec<String> {
    session
        .panel()
        .candidates
        .into_iter()
        .map(|c| c.label)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn harry_shows_seven_books_one_author_and_full_count() {
    let api = Arc::new(catalog());
    let mut session = session(api.clone());

    session.input("harry");
    session.settle().await;

    let panel = session.panel();
    assert_eq!(panel.state, PanelState::Open);
    assert_eq!(panel.candidates.len(), 8);
    assert_eq!(panel.candidates[7].label, "Harry Harrison");
    assert_eq!(panel.total_count, 10);
    assert!(panel.footer().unwrap().starts_with("10 results found"));
    assert_eq!(api.book_calls(), 1);
    assert_eq!(api.author_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_commits_once_with_final_text() {
    let api = Arc::new(catalog());
    let mut session = session(api.clone());

    for text in ["h", "ha", "har", "harr", "harry"] {
        session.input(text);
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    let events = session.settle().await;

    let committed: Vec<&SessionEvent> = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Committed(_)))
        .collect();
    assert_eq!(committed.len(), 1);
    assert!(matches!(committed[0], SessionEvent::Committed(q) if q.raw_text == "harry"));
    assert_eq!(api.book_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn short_input_issues_no_lookups() {
    let api = Arc::new(catalog());
    let mut session = session(api.clone());

    session.input(" h ");
    assert_eq!(session.settle().await, vec![SessionEvent::Suppressed]);
    session.input("");
    assert_eq!(session.settle().await, vec![SessionEvent::Suppressed]);

    assert!(session.panel().candidates.is_empty());
    assert_eq!(api.book_calls(), 0);
    assert_eq!(api.author_calls(), 0);
    assert_eq!(session.coordinator().metrics().queries_suppressed.get(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_below_minimum_clears_shown_candidates_at_once() {
    let api = Arc::new(catalog());
    let mut session = session(api.clone());

    session.input("dune");
    session.settle().await;
    assert_eq!(session.panel().state, PanelState::Open);

    session.input("d");
    let panel = session.panel();
    assert_eq!(panel.text, "d");
    assert_eq!(panel.state, PanelState::Hidden);
    assert!(panel.candidates.is_empty());
    assert_eq!(session.selection().index(), -1);

    assert_eq!(session.settle().await, vec![SessionEvent::Suppressed]);
    assert!(session.panel().candidates.is_empty());
    assert_eq!(api.book_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn lookup_in_flight_is_dropped_when_input_becomes_short() {
    let mut fake = catalog();
    fake.slow.push(("dune".into(), Duration::from_millis(100)));
    let api = Arc::new(fake);
    let mut session = session(api.clone());

    session.input("dune");
    let Some(SessionEvent::Committed(dune)) = session.step().await else {
        panic!("expected dune to commit");
    };
    session.input("d");
    assert_eq!(session.panel().state, PanelState::Hidden);

    let events = session.settle().await;
    assert!(events.contains(&SessionEvent::Dropped {
        generation: dune.generation
    }));
    assert!(!events.contains(&SessionEvent::Applied {
        generation: dune.generation
    }));
    assert_eq!(events.last(), Some(&SessionEvent::Suppressed));

    let panel = session.panel();
    assert_eq!(panel.text, "d");
    assert_eq!(panel.state, PanelState::Hidden);
    assert!(panel.candidates.is_empty());
    assert!(session.coordinator().cache().get("dune").is_none());
}

#[tokio::test(start_paused = true)]
async fn late_response_of_superseded_query_never_shows() {
    let mut fake = catalog();
    fake.slow.push(("harry".into(), Duration::from_secs(2)));
    let api = Arc::new(fake);
    let mut session = session(api.clone());

    session.input("harry");
    let Some(SessionEvent::Committed(first)) = session.step().await else {
        panic!("expected the first query to commit");
    };
    session.input("dune");
    let events = session.settle().await;

    assert!(events.contains(&SessionEvent::Dropped {
        generation: first.generation
    }));
    assert_eq!(labels(&session), vec!["Dune", "Dune Messiah"]);
    assert!(session.coordinator().cache().get("harry").is_none());
    assert!(session.coordinator().cache().get("dune").is_some());

    // nothing left to arrive later and overwrite the panel
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(session.step().await.is_none());
    assert_eq!(labels(&session), vec!["Dune", "Dune Messiah"]);
}

#[tokio::test(start_paused = true)]
async fn coordinator_marks_response_stale_when_superseded_mid_flight() {
    let mut fake = catalog();
    fake.slow.push(("harry".into(), Duration::from_millis(500)));
    let config = SuggestConfig::default();
    let coordinator = RequestCoordinator::new(Arc::new(fake), &config, Arc::new(Metrics::new()));

    let q1 = coordinator.commit("harry");
    let (resolution, q2) = tokio::join!(coordinator.resolve(&q1), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        coordinator.commit("dune")
    });

    assert_eq!(resolution, Resolution::Stale);
    assert!(q2.generation > q1.generation);
    assert!(coordinator.is_current(q2.generation));
    assert!(coordinator.cache().is_empty());
    assert_eq!(coordinator.metrics().stale_responses.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_text_is_served_from_cache() {
    let api = Arc::new(catalog());
    let mut session = session(api.clone());

    session.input("harry");
    session.settle().await;
    session.input("harr");
    session.settle().await;
    session.input("  harry ");
    let events = session.settle().await;

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], SessionEvent::Committed(q) if q.normalized_text == "harry"));
    assert_eq!(api.book_calls(), 2);
    assert_eq!(api.author_calls(), 2);
    assert_eq!(session.panel().candidates.len(), 8);
    assert_eq!(session.coordinator().metrics().cache_hits.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_book_lookup_still_shows_authors() {
    let mut fake = catalog();
    fake.fail_books = true;
    let api = Arc::new(fake);
    let mut session = session(api.clone());

    session.input("harry");
    session.settle().await;

    let panel = session.panel();
    assert_eq!(panel.state, PanelState::Open);
    assert_eq!(labels(&session), vec!["Harry Harrison"]);
    assert_eq!(panel.total_count, 1);
    assert_eq!(session.coordinator().metrics().lookup_failures.get(), 1);

    // degraded results are retried on the next commit
    session.input("harr");
    session.settle().await;
    session.input("harry");
    session.settle().await;
    assert_eq!(api.book_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn arrow_up_without_selection_stays_unselected() {
    let api = Arc::new(catalog());
    let mut session = session(api);

    session.input("dune");
    session.settle().await;
    assert_eq!(session.selection().index(), -1);

    session.key(Key::ArrowUp);
    assert_eq!(session.selection().index(), -1);
    assert_eq!(session.panel().state, PanelState::Open);

    session.key(Key::ArrowDown);
    session.key(Key::ArrowDown);
    session.key(Key::ArrowDown);
    assert_eq!(session.selection().index(), 1);
}

#[tokio::test(start_paused = true)]
async fn enter_without_selection_requests_full_results() {
    let api = Arc::new(catalog());
    let mut session = session(api);

    session.input("dune ");
    session.settle().await;
    let commit = session.key(Key::Enter);

    assert_eq!(
        commit,
        Some(catalog_query::suggest::Commit::FullResults("dune ".into()))
    );
    assert_eq!(session.text(), "dune ");
    assert_eq!(session.panel().state, PanelState::Hidden);
}

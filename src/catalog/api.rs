//! Catalog API collaborator
use crate::browse::SortKey;
use crate::catalog::{Author, Book, Publisher};
use crate::error::Result;
use async_trait::async_trait;

/// Entity lookups consumed by the query engine.
///
/// Implementations own transport, timeouts and response decoding (see
/// [`crate::catalog::decode`]). A failure is reported as
/// [`crate::error::QueryError::Transport`]; the engine degrades it to an
/// empty result. Dropping a returned future must abort the underlying request
/// where the transport allows it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search_books(&self, text: &str) -> Result<Vec<Book>>;

    async fn search_authors(&self, text: &str) -> Result<Vec<Author>>;

    /// Active books, already ordered by `sort`
    async fn list_active(&self, sort: SortKey) -> Result<Vec<Book>>;

    async fn list_active_authors(&self) -> Result<Vec<Author>>;

    async fn list_active_publishers(&self) -> Result<Vec<Publisher>>;
}

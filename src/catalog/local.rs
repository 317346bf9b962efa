//! Catalog API backed by a JSON snapshot on disk
use crate::browse::{SortKey, sort_items};
use crate::catalog::{Author, Book, CatalogApi, Publisher, decode, resolve_names};
use crate::error::{QueryError, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
    pub publishers: Vec<Publisher>,
}

/// In-process stand-in for the catalog backend
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    snapshot: CatalogSnapshot,
}

impl LocalCatalog {
    /// Author and publisher names are joined onto the books up front, the
    /// way the backend returns them.
    pub fn new(mut snapshot: CatalogSnapshot) -> Self {
        let books = std::mem::take(&mut snapshot.books);
        snapshot.books = resolve_names(books, &snapshot.authors, &snapshot.publishers);
        Self { snapshot }
    }

    /// Load a snapshot file, wrapped in an envelope or bare
    pub fn from_path(path: &Path) -> Result<Self> {
        let body = fs::read_to_string(path).map_err(|e| {
            QueryError::Config(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        let snapshot: CatalogSnapshot = decode(&body)?;
        info!(
            "Loaded catalog {} ({} books, {} authors, {} publishers)",
            path.display(),
            snapshot.books.len(),
            snapshot.authors.len(),
            snapshot.publishers.len()
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CatalogApi for LocalCatalog {
    async fn search_books(&self, text: &str) -> Result<Vec<Book>> {
        let text = text.trim();
        let found: Vec<Book> = self
            .snapshot
            .books
            .iter()
            .filter(|b| contains_ignore_case(&b.title, text))
            .cloned()
            .collect();
        debug!("search_books({text:?}) -> {}", found.len());
        Ok(found)
    }

    async fn search_authors(&self, text: &str) -> Result<Vec<Author>> {
        let text = text.trim();
        let found: Vec<Author> = self
            .snapshot
            .authors
            .iter()
            .filter(|a| contains_ignore_case(&a.name, text))
            .cloned()
            .collect();
        debug!("search_authors({text:?}) -> {}", found.len());
        Ok(found)
    }

    async fn list_active(&self, sort: SortKey) -> Result<Vec<Book>> {
        let mut books = self.snapshot.books.clone();
        sort_items(&mut books, sort);
        Ok(books)
    }

    async fn list_active_authors(&self) -> Result<Vec<Author>> {
        Ok(self.snapshot.authors.clone())
    }

    async fn list_active_publishers(&self) -> Result<Vec<Publisher>> {
        Ok(self.snapshot.publishers.clone())
    }
}

//! Catalog data model and the boundary to the catalog API
pub mod api;
pub mod local;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use api::CatalogApi;
#[cfg(test)]
pub use api::MockCatalogApi;
pub use local::{CatalogSnapshot, LocalCatalog};

/// Entity kind shared by catalog items and suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Book,
    Author,
}

impl ItemKind {
    /// Type tag used by the type facet
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Book => "book",
            ItemKind::Author => "author",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Book => write!(f, "Book"),
            ItemKind::Author => write!(f, "Author"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub price: f64,
    pub category_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_name: Option<String>,
    #[serde(default, alias = "stockQuantity")]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    #[serde(default, alias = "bio", skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: u64,
    pub name: String,
}

/// One entry of a catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogItem {
    Book(Book),
    Author(Author),
}

impl CatalogItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Book(_) => ItemKind::Book,
            CatalogItem::Author(_) => ItemKind::Author,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            CatalogItem::Book(book) => book.id,
            CatalogItem::Author(author) => author.id,
        }
    }

    /// Title for books, name for authors
    pub fn label(&self) -> &str {
        match self {
            CatalogItem::Book(book) => &book.title,
            CatalogItem::Author(author) => &author.name,
        }
    }

    pub fn price(&self) -> Option<f64> {
        match self {
            CatalogItem::Book(book) => Some(book.price),
            CatalogItem::Author(_) => None,
        }
    }

    pub fn category_id(&self) -> Option<u64> {
        match self {
            CatalogItem::Book(book) => Some(book.category_id),
            CatalogItem::Author(_) => None,
        }
    }

    /// The book's author, or the author itself
    pub fn author_id(&self) -> Option<u64> {
        match self {
            CatalogItem::Book(book) => Some(book.author_id),
            CatalogItem::Author(author) => Some(author.id),
        }
    }

    pub fn publisher_name(&self) -> Option<&str> {
        match self {
            CatalogItem::Book(book) => book.publisher_name.as_deref(),
            CatalogItem::Author(_) => None,
        }
    }

    pub fn stock(&self) -> Option<u32> {
        match self {
            CatalogItem::Book(book) => Some(book.stock),
            CatalogItem::Author(_) => None,
        }
    }

    pub fn published_date(&self) -> Option<&str> {
        match self {
            CatalogItem::Book(book) => book.published_date.as_deref(),
            CatalogItem::Author(_) => None,
        }
    }
}

impl From<Book> for CatalogItem {
    fn from(book: Book) -> Self {
        CatalogItem::Book(book)
    }
}

impl From<Author> for CatalogItem {
    fn from(author: Author) -> Self {
        CatalogItem::Author(author)
    }
}

/// Response body that is either wrapped as `{ "result": T }` or the bare `T`.
///
/// List endpoints wrap their payload, single-entity endpoints do not. Every
/// decoded response goes through [`unwrap_response`] instead of callers
/// probing for the `result` field themselves.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { result: T },
    Bare(T),
}

pub fn unwrap_response<T>(response: Envelope<T>) -> T {
    match response {
        Envelope::Wrapped { result } => result,
        Envelope::Bare(value) => value,
    }
}

/// Decode a JSON body of either envelope shape
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    Ok(unwrap_response(envelope))
}

/// Fill in author and publisher display names from the facet option lists.
///
/// Names already present are kept when the id has no match; otherwise a
/// placeholder like `Author 7` is used.
pub fn resolve_names(books: Vec<Book>, authors: &[Author], publishers: &[Publisher]) -> Vec<Book> {
    let author_names: HashMap<u64, &str> =
        authors.iter().map(|a| (a.id, a.name.as_str())).collect();
    let publisher_names: HashMap<u64, &str> =
        publishers.iter().map(|p| (p.id, p.name.as_str())).collect();

    books
        .into_iter()
        .map(|mut book| {
            match author_names.get(&book.author_id) {
                Some(name) => book.author_name = Some((*name).to_string()),
                None if book.author_name.is_none() => {
                    book.author_name = Some(format!("Author {}", book.author_id));
                }
                None => {}
            }
            if let Some(publisher_id) = book.publisher_id {
                match publisher_names.get(&publisher_id) {
                    Some(name) => book.publisher_name = Some((*name).to_string()),
                    None if book.publisher_name.is_none() => {
                        book.publisher_name = Some(format!("Publisher {publisher_id}"));
                    }
                    None => {}
                }
            }
            book
        })
        .collect()
}

//! Merging book and author lookups into one candidate list
use crate::catalog::{Author, Book, ItemKind};
use crate::config::SuggestConfig;
use crate::suggest::{CacheEntry, Suggestion};
use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone, Copy)]
pub struct SuggestionRanker {
    pub max_books: usize,
    pub max_authors: usize,
    pub subtitle_chars: usize,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self::from_config(&SuggestConfig::default())
    }
}

/// First occurrence of each key, in source order
fn distinct<T, K: Eq + Hash>(items: &[T], key: impl Fn(&T) -> K) -> Vec<&T> {
    let mut seen = HashSet::new();
    items.iter().filter(|item| seen.insert(key(*item))).collect()
}

fn biography_subtitle(biography: Option<&str>, max_chars: usize) -> Option<String> {
    let biography = biography.filter(|b| !b.is_empty())?;
    let mut subtitle: String = biography.chars().take(max_chars).collect();
    subtitle.push_str("...");
    Some(subtitle)
}

impl SuggestionRanker {
    pub fn from_config(config: &SuggestConfig) -> Self {
        Self {
            max_books: config.max_book_candidates,
            max_authors: config.max_author_candidates,
            subtitle_chars: config.subtitle_chars,
        }
    }

    /// Books first, then authors, each deduplicated by id, capped and in
    /// source order. `total_count` counts every distinct match, including
    /// those cut by the caps.
    pub fn merge(&self, books: &[Book], authors: &[Author]) -> CacheEntry {
        let books = distinct(books, |book| book.id);
        let authors = distinct(authors, |author| author.id);
        let total_count = books.len() + authors.len();

        let book_candidates = books.into_iter().take(self.max_books).map(|book| Suggestion {
            id: book.id,
            label: book.title.clone(),
            kind: ItemKind::Book,
            subtitle: book.author_name.clone().filter(|name| !name.is_empty()),
        });
        let author_candidates = authors.into_iter().take(self.max_authors).map(|author| Suggestion {
            id: author.id,
            label: author.name.clone(),
            kind: ItemKind::Author,
            subtitle: biography_subtitle(author.biography.as_deref(), self.subtitle_chars),
        });

        CacheEntry {
            candidates: book_candidates.chain(author_candidates).collect(),
            total_count,
        }
    }
}

//! Listing sort orders
use crate::catalog::{Book, CatalogItem};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Default,
    Newest,
    Oldest,
    TitleAscending,
    PriceAscending,
    PriceDescending,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Default => write!(f, "default"),
            SortKey::Newest => write!(f, "newest"),
            SortKey::Oldest => write!(f, "oldest"),
            SortKey::TitleAscending => write!(f, "title-ascending"),
            SortKey::PriceAscending => write!(f, "price-ascending"),
            SortKey::PriceDescending => write!(f, "price-descending"),
        }
    }
}

/// Fields the sort stage orders by
pub trait SortFields {
    fn sort_title(&self) -> &str;
    fn sort_price(&self) -> Option<f64>;
    fn sort_date(&self) -> Option<&str>;
}

impl SortFields for Book {
    fn sort_title(&self) -> &str {
        &self.title
    }

    fn sort_price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn sort_date(&self) -> Option<&str> {
        self.published_date.as_deref()
    }
}

impl SortFields for CatalogItem {
    fn sort_title(&self) -> &str {
        self.label()
    }

    fn sort_price(&self) -> Option<f64> {
        self.price()
    }

    fn sort_date(&self) -> Option<&str> {
        self.published_date()
    }
}

impl<T: SortFields + ?Sized> SortFields for &T {
    fn sort_title(&self) -> &str {
        (**self).sort_title()
    }

    fn sort_price(&self) -> Option<f64> {
        (**self).sort_price()
    }

    fn sort_date(&self) -> Option<&str> {
        (**self).sort_date()
    }
}

/// Parse a published date. Accepts `YYYY-MM-DD`, a naive timestamp or RFC 3339.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    None
}

// None sorts before every date, i.e. oldest-possible.
fn date_key<T: SortFields>(item: &T) -> Option<NaiveDate> {
    item.sort_date().and_then(parse_published_date)
}

// Items without a price go last in both directions.
fn compare_price(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order `items` in place. Stable, so ties keep their incoming order.
pub fn sort_items<T: SortFields>(items: &mut [T], key: SortKey) {
    match key {
        SortKey::Default => {}
        SortKey::Newest => items.sort_by(|a, b| date_key(b).cmp(&date_key(a))),
        SortKey::Oldest => items.sort_by(|a, b| date_key(a).cmp(&date_key(b))),
        SortKey::TitleAscending => {
            items.sort_by_cached_key(|item| item.sort_title().to_lowercase());
        }
        SortKey::PriceAscending => {
            items.sort_by(|a, b| compare_price(a.sort_price(), b.sort_price(), false));
        }
        SortKey::PriceDescending => {
            items.sort_by(|a, b| compare_price(a.sort_price(), b.sort_price(), true));
        }
    }
}

/// Sort stage of the listing pipeline.
///
/// `presorted_for` names the order the upstream source already applied; for
/// that key the stage passes items through untouched.
pub fn sort_stage<T: SortFields>(items: &mut [T], key: SortKey, presorted_for: Option<SortKey>) {
    if presorted_for == Some(key) {
        return;
    }
    sort_items(items, key);
}

//! Facet selection and the conjunctive listing filter
use crate::catalog::CatalogItem;
use crate::error::{QueryError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

lazy_static! {
    static ref PRICE_INPUT: Regex = Regex::new(r"^\d*(\.\d{0,2})?$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    Min,
    Max,
}

/// Active facet restrictions. An empty set means the dimension is unrestricted.
///
/// Price bounds `<= 0` are unset. Mutators validate before changing anything,
/// so a rejected mutation leaves the selection as it was.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacetSelection {
    categories: BTreeSet<u64>,
    authors: BTreeSet<u64>,
    publishers: BTreeSet<String>,
    price_min: f64,
    price_max: f64,
    available_only: bool,
    types: BTreeSet<String>,
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Parse price text typed into a bound field
pub fn parse_price_input(input: &str, max_price: f64) -> Result<f64> {
    let input = input.trim();
    if !PRICE_INPUT.is_match(input) {
        return Err(QueryError::InvalidPriceInput(input.to_string()));
    }
    let value: f64 = input
        .parse()
        .map_err(|_| QueryError::InvalidPriceInput(input.to_string()))?;
    if !(0.0..=max_price).contains(&value) {
        return Err(QueryError::PriceOutOfRange {
            value,
            max: max_price,
        });
    }
    Ok(value)
}

impl FacetSelection {
    /// Selection restricted to the given item types only
    pub fn with_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn categories(&self) -> &BTreeSet<u64> {
        &self.categories
    }

    pub fn authors(&self) -> &BTreeSet<u64> {
        &self.authors
    }

    pub fn publishers(&self) -> &BTreeSet<String> {
        &self.publishers
    }

    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn price_range(&self) -> (f64, f64) {
        (self.price_min, self.price_max)
    }

    pub fn available_only(&self) -> bool {
        self.available_only
    }

    pub fn include_category(&mut self, id: u64) {
        self.categories.insert(id);
    }

    pub fn include_author(&mut self, id: u64) {
        self.authors.insert(id);
    }

    pub fn include_publisher(&mut self, name: impl Into<String>) {
        self.publishers.insert(name.into());
    }

    pub fn include_type(&mut self, tag: impl Into<String>) {
        self.types.insert(tag.into());
    }

    pub fn toggle_category(&mut self, id: u64) {
        toggle(&mut self.categories, id);
    }

    /// Select every sub-category of a group, or deselect them all when every
    /// one of them is already selected
    pub fn toggle_category_group(&mut self, sub_categories: &[u64]) {
        let all_selected = sub_categories
            .iter()
            .all(|id| self.categories.contains(id));
        if all_selected {
            for id in sub_categories {
                self.categories.remove(id);
            }
        } else {
            self.categories.extend(sub_categories.iter().copied());
        }
    }

    pub fn toggle_author(&mut self, id: u64) {
        toggle(&mut self.authors, id);
    }

    pub fn toggle_publisher(&mut self, name: &str) {
        toggle(&mut self.publishers, name.to_string());
    }

    pub fn toggle_type(&mut self, tag: &str) {
        toggle(&mut self.types, tag.to_string());
    }

    pub fn set_available_only(&mut self, available_only: bool) {
        self.available_only = available_only;
    }

    pub fn toggle_available_only(&mut self) {
        self.available_only = !self.available_only;
    }

    /// Replace both price bounds. Rejects `min > max` when both are set.
    pub fn set_price_range(&mut self, min: f64, max: f64) -> Result<()> {
        if min.is_nan() || max.is_nan() {
            return Err(QueryError::InvalidPriceInput("NaN".to_string()));
        }
        let min = min.max(0.0);
        let max = max.max(0.0);
        if min > 0.0 && max > 0.0 && min > max {
            return Err(QueryError::InvalidFacetRange { min, max });
        }
        self.price_min = min;
        self.price_max = max;
        Ok(())
    }

    /// Set one bound from text input. Empty text unsets the bound.
    pub fn set_price_bound(&mut self, bound: PriceBound, input: &str, max_price: f64) -> Result<()> {
        let value = if input.trim().is_empty() {
            0.0
        } else {
            parse_price_input(input, max_price)?
        };
        match bound {
            PriceBound::Min => self.set_price_range(value, self.price_max),
            PriceBound::Max => self.set_price_range(self.price_min, value),
        }
    }

    /// Drop every restriction except the default type restriction
    pub fn clear_all(&mut self, default_types: &[String]) {
        *self = Self::with_types(default_types.iter().cloned());
    }

    /// Whether `item` satisfies every active restriction
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if !self.categories.is_empty()
            && !item
                .category_id()
                .is_some_and(|id| self.categories.contains(&id))
        {
            return false;
        }
        if !self.authors.is_empty()
            && !item.author_id().is_some_and(|id| self.authors.contains(&id))
        {
            return false;
        }
        if !self.publishers.is_empty()
            && !item
                .publisher_name()
                .is_some_and(|name| self.publishers.contains(name))
        {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(item.kind().as_str()) {
            return false;
        }
        if self.available_only && !item.stock().is_some_and(|stock| stock > 0) {
            return false;
        }
        if self.price_min > 0.0 || self.price_max > 0.0 {
            let in_range = item.price().is_some_and(|price| {
                (self.price_min <= 0.0 || price >= self.price_min)
                    && (self.price_max <= 0.0 || price <= self.price_max)
            });
            if !in_range {
                return false;
            }
        }
        true
    }
}

/// Items of `catalog` that pass every facet, in their original order
pub fn filter<'a>(catalog: &'a [CatalogItem], facets: &FacetSelection) -> Vec<&'a CatalogItem> {
    catalog.iter().filter(|item| facets.matches(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Author, Book};

    fn book(id: u64, price: f64) -> CatalogItem {
        CatalogItem::Book(Book {
            id,
            title: format!("Book {id}"),
            author_id: id % 3,
            author_name: None,
            price,
            category_id: id % 2,
            publisher_id: None,
            publisher_name: Some(if id % 2 == 0 { "Penguin" } else { "Tor" }.to_string()),
            stock: (id % 4) as u32,
            published_date: None,
        })
    }

    fn prices(items: &[&CatalogItem]) -> Vec<f64> {
        items.iter().filter_map(|item| item.price()).collect()
    }

    #[test]
    fn price_range_is_inclusive() {
        let catalog: Vec<_> = [5.0, 10.0, 15.0, 20.0, 25.0]
            .iter()
            .enumerate()
            .map(|(i, p)| book(i as u64, *p))
            .collect();
        let mut facets = FacetSelection::default();
        facets.set_price_range(10.0, 20.0).unwrap();

        assert_eq!(prices(&filter(&catalog, &facets)), vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn unset_bound_is_open_ended() {
        let catalog: Vec<_> = (1..=5).map(|i| book(i, i as f64 * 5.0)).collect();
        let mut facets = FacetSelection::default();
        facets.set_price_range(0.0, 15.0).unwrap();
        assert_eq!(prices(&filter(&catalog, &facets)), vec![5.0, 10.0, 15.0]);

        facets.set_price_range(15.0, 0.0).unwrap();
        assert_eq!(prices(&filter(&catalog, &facets)), vec![15.0, 20.0, 25.0]);
    }

    #[test]
    fn inverted_range_is_rejected_and_state_kept() {
        let mut facets = FacetSelection::default();
        facets.set_price_range(5.0, 30.0).unwrap();

        let err = facets.set_price_range(40.0, 30.0).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFacetRange { .. }));
        assert_eq!(facets.price_range(), (5.0, 30.0));

        assert!(facets.set_price_bound(PriceBound::Min, "31", 99.99).is_err());
        assert_eq!(facets.price_range(), (5.0, 30.0));
    }

    #[test]
    fn price_text_input_validation() {
        assert_eq!(parse_price_input("12.5", 99.99).unwrap(), 12.5);
        assert_eq!(parse_price_input(".5", 99.99).unwrap(), 0.5);
        assert!(matches!(
            parse_price_input("1.234", 99.99),
            Err(QueryError::InvalidPriceInput(_))
        ));
        assert!(matches!(
            parse_price_input("abc", 99.99),
            Err(QueryError::InvalidPriceInput(_))
        ));
        assert!(matches!(
            parse_price_input("120", 99.99),
            Err(QueryError::PriceOutOfRange { .. })
        ));

        let mut facets = FacetSelection::default();
        facets.set_price_bound(PriceBound::Max, "20", 99.99).unwrap();
        facets.set_price_bound(PriceBound::Min, "10", 99.99).unwrap();
        assert_eq!(facets.price_range(), (10.0, 20.0));
        facets.set_price_bound(PriceBound::Max, "", 99.99).unwrap();
        assert_eq!(facets.price_range(), (10.0, 0.0));
    }

    #[test]
    fn empty_facets_restrict_nothing() {
        let catalog: Vec<_> = (0..6).map(|i| book(i, 10.0)).collect();
        assert_eq!(filter(&catalog, &FacetSelection::default()).len(), 6);
    }

    #[test]
    fn facets_combine_conjunctively() {
        let catalog: Vec<_> = (0..12).map(|i| book(i, 10.0)).collect();
        let mut facets = FacetSelection::default();
        facets.include_category(0);
        facets.include_author(0);
        facets.set_available_only(true);

        let ids: Vec<u64> = filter(&catalog, &facets).iter().map(|i| i.id()).collect();
        // category 0: even ids; author 0: multiples of 3; stock id % 4 > 0
        assert_eq!(ids, vec![6]);
    }

    #[test]
    fn publisher_matches_on_display_name() {
        let catalog: Vec<_> = (0..4).map(|i| book(i, 10.0)).collect();
        let mut facets = FacetSelection::default();
        facets.toggle_publisher("Tor");
        let ids: Vec<u64> = filter(&catalog, &facets).iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![1, 3]);

        facets.toggle_publisher("Tor");
        assert!(facets.publishers().is_empty());
    }

    #[test]
    fn type_facet_and_missing_attributes() {
        let catalog = vec![
            book(1, 10.0),
            CatalogItem::Author(Author {
                id: 1,
                name: "Someone".into(),
                biography: None,
            }),
        ];
        let facets = FacetSelection::with_types(["author"]);
        assert_eq!(filter(&catalog, &facets).len(), 1);
        assert_eq!(filter(&catalog, &facets)[0].kind().as_str(), "author");

        let mut facets = FacetSelection::default();
        facets.set_available_only(true);
        let kept = filter(&catalog, &facets);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].kind().as_str(), "book");
    }

    #[test]
    fn category_group_toggles_all_or_nothing() {
        let mut facets = FacetSelection::default();
        facets.toggle_category(2);
        facets.toggle_category_group(&[1, 2, 3]);
        assert_eq!(facets.categories().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        facets.toggle_category_group(&[1, 2, 3]);
        assert!(facets.categories().is_empty());
    }

    #[test]
    fn clear_all_restores_default_types() {
        let mut facets = FacetSelection::with_types(["book"]);
        facets.toggle_type("book");
        facets.include_author(4);
        facets.set_price_range(1.0, 2.0).unwrap();

        facets.clear_all(&["book".to_string()]);
        assert_eq!(facets, FacetSelection::with_types(["book"]));
    }
}

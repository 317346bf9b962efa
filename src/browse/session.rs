//! Listing state: facets, sort order and the current page
use crate::browse::facets::{FacetSelection, filter};
use crate::browse::paginate::{PageWindow, page_window, paginate};
use crate::browse::sort::{SortKey, sort_stage};
use crate::catalog::{Author, CatalogApi, CatalogItem, Publisher, resolve_names};
use crate::config::BrowseConfig;
use crate::error::Result;
use log::{debug, warn};
use serde::Serialize;

/// Values offered by the author and publisher facet groups
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetOptions {
    pub authors: Vec<Author>,
    pub publishers: Vec<Publisher>,
}

/// The computed page shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct ListingView<'a> {
    pub items: Vec<&'a CatalogItem>,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub window: PageWindow,
    pub sort: SortKey,
}

pub struct BrowseSession {
    items: Vec<CatalogItem>,
    presorted_for: Option<SortKey>,
    facets: FacetSelection,
    sort: SortKey,
    requested_page: usize,
    options: FacetOptions,
    config: BrowseConfig,
}

impl BrowseSession {
    pub fn new(config: BrowseConfig) -> Self {
        Self {
            items: Vec::new(),
            presorted_for: None,
            facets: FacetSelection::with_types(config.default_types.iter().cloned()),
            sort: SortKey::Default,
            requested_page: 1,
            options: FacetOptions::default(),
            config,
        }
    }

    /// Replace the listing snapshot. `presorted_for` names the order the
    /// source already applied, if any.
    pub fn set_items(&mut self, items: Vec<CatalogItem>, presorted_for: Option<SortKey>) {
        self.items = items;
        self.presorted_for = presorted_for;
        self.requested_page = 1;
    }

    /// Fetch the listing pre-sorted by `sort` along with the facet options.
    ///
    /// A failed listing fetch keeps the previous snapshot and returns the
    /// error; failed option fetches leave the option lists empty.
    pub async fn load(&mut self, api: &dyn CatalogApi, sort: SortKey) -> Result<()> {
        let (books, authors, publishers) = tokio::join!(
            api.list_active(sort),
            api.list_active_authors(),
            api.list_active_publishers()
        );

        let authors = authors.unwrap_or_else(|e| {
            warn!("Failed to load author facet options: {e}");
            Vec::new()
        });
        let publishers = publishers.unwrap_or_else(|e| {
            warn!("Failed to load publisher facet options: {e}");
            Vec::new()
        });
        let books = books?;
        debug!("Loaded {} books sorted by {sort}", books.len());

        let items = resolve_names(books, &authors, &publishers)
            .into_iter()
            .map(CatalogItem::Book)
            .collect();
        self.set_items(items, Some(sort));
        self.sort = sort;
        self.options = FacetOptions {
            authors,
            publishers,
        };
        Ok(())
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn options(&self) -> &FacetOptions {
        &self.options
    }

    pub fn facets(&self) -> &FacetSelection {
        &self.facets
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    /// Apply a facet mutation. On error the previous selection is kept and the
    /// page is left alone; on success the page resets to 1.
    pub fn update_facets<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut FacetSelection) -> Result<()>,
    {
        let mut next = self.facets.clone();
        mutate(&mut next)?;
        self.facets = next;
        self.requested_page = 1;
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.facets.clear_all(&self.config.default_types);
        self.requested_page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.requested_page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.requested_page = page;
    }

    pub fn next_page(&mut self) {
        let view = self.view();
        if view.has_next {
            self.requested_page = view.current_page + 1;
        }
    }

    pub fn prev_page(&mut self) {
        let view = self.view();
        if view.has_prev {
            self.requested_page = view.current_page - 1;
        }
    }

    /// Run filter, sort and paginate over the snapshot
    pub fn view(&self) -> ListingView<'_> {
        let mut filtered = filter(&self.items, &self.facets);
        sort_stage(&mut filtered, self.sort, self.presorted_for);

        let page = paginate(&filtered, self.config.page_size, self.requested_page);
        let window = page_window(
            page.current_page,
            page.total_pages,
            self.config.max_visible_pages,
        );

        ListingView {
            items: page.items.to_vec(),
            filtered_count: filtered.len(),
            total_pages: page.total_pages,
            current_page: page.current_page,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
            window,
            sort: self.sort,
        }
    }
}

//! Faceted listing pipeline: filter, then sort, then paginate
pub mod facets;
pub mod paginate;
pub mod session;
pub mod sort;

pub use facets::{FacetSelection, PriceBound, filter, parse_price_input};
pub use paginate::{Page, PageWindow, page_window, paginate, total_pages};
pub use session::{BrowseSession, FacetOptions, ListingView};
pub use sort::{SortFields, SortKey, parse_published_date, sort_items, sort_stage};

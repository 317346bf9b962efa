//! Incremental query engine for a book catalog.
//!
//! [`suggest`] turns keystrokes into debounced, generation-gated type-ahead
//! suggestions. [`browse`] filters, sorts and paginates a catalog listing by
//! facet selection. [`catalog`] holds the data model and the API boundary.
pub mod app;
pub mod browse;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod metrics;
pub mod output;
pub mod suggest;

pub use crate::error::{QueryError, Result};
pub use clap::Parser;
pub use cli::{Cli, Commands, OutputFormat};

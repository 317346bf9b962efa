use crate::browse::SortKey;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "catalogq",
    author,
    version,
    about = "Type-ahead suggestions and faceted browsing over a book catalog",
    long_about = None
)]
pub struct Cli {
    /// Catalog snapshot (JSON with books, authors and publishers)
    #[clap(long, value_parser, global = true)]
    pub catalog: Option<PathBuf>,

    #[clap(long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub verbose: bool,

    #[clap(long, value_parser, global = true)]
    pub log: Option<PathBuf>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Print lookup counters when the command finishes
    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub metrics: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Type TEXT into the search box and print the suggestion panel
    Suggest {
        text: String,

        /// ArrowDown presses before the panel is printed
        #[clap(long, value_parser, default_value_t = 0)]
        down: usize,
    },
    /// Print one page of the filtered, sorted listing
    Browse {
        #[clap(long = "category", value_parser, use_value_delimiter = true)]
        categories: Vec<u64>,

        #[clap(long = "author", value_parser, use_value_delimiter = true)]
        authors: Vec<u64>,

        #[clap(long = "publisher", value_parser, use_value_delimiter = true)]
        publishers: Vec<String>,

        /// Item types to include; defaults to the configured types
        #[clap(long = "type", value_parser, use_value_delimiter = true)]
        types: Vec<String>,

        #[clap(long, value_parser)]
        min_price: Option<String>,

        #[clap(long, value_parser)]
        max_price: Option<String>,

        /// Only items in stock
        #[clap(long, value_parser, default_value_t = false)]
        available: bool,

        #[clap(long, value_enum, default_value_t = SortKey::Default)]
        sort: SortKey,

        #[clap(long, value_parser, default_value_t = 1)]
        page: usize,

        #[clap(long, value_parser)]
        page_size: Option<usize>,
    },
    /// Line-driven suggestion session on stdin
    Interactive,
    Completions {
        #[clap(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

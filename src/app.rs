//! Command dispatch for the `catalogq` binary
use crate::browse::{BrowseSession, PriceBound, SortKey};
use crate::catalog::LocalCatalog;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{QueryError, Result};
use crate::interactive::InteractiveSession;
use crate::metrics::Metrics;
use crate::output::OutputFormatter;
use crate::suggest::{Key, QueryDebouncer, RequestCoordinator, SuggestSession};
use clap::CommandFactory;
use log::{debug, info};
use std::io::{self, Write};
use std::sync::Arc;

/// Facet flags given to `browse`
#[derive(Debug, Clone, Default)]
pub struct BrowseRequest {
    pub categories: Vec<u64>,
    pub authors: Vec<u64>,
    pub publishers: Vec<String>,
    pub types: Vec<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub available: bool,
}

pub struct CatalogApp {
    config: Config,
    metrics: Arc<Metrics>,
}

impl CatalogApp {
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        debug!("Using configuration {config:?}");
        Ok(Self {
            config,
            metrics: Arc::new(Metrics::new()),
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn run(&self, cli: &Cli) -> Result<()> {
        let formatter = OutputFormatter::new(cli.format);
        let result = match &cli.command {
            Commands::Suggest { text, down } => {
                self.handle_suggest(cli, text, *down, &formatter).await
            }
            Commands::Browse {
                categories,
                authors,
                publishers,
                types,
                min_price,
                max_price,
                available,
                sort,
                page,
                page_size,
            } => {
                let request = BrowseRequest {
                    categories: categories.clone(),
                    authors: authors.clone(),
                    publishers: publishers.clone(),
                    types: types.clone(),
                    min_price: min_price.clone(),
                    max_price: max_price.clone(),
                    available: *available,
                };
                self.handle_browse(cli, &request, *sort, *page, *page_size, &formatter)
                    .await
            }
            Commands::Interactive => self.handle_interactive(cli, formatter).await,
            Commands::Completions { shell } => self.handle_completions(*shell),
        };

        if cli.metrics {
            eprint!("{}", self.metrics.gather());
        }
        result
    }

    fn catalog(&self, cli: &Cli) -> Result<LocalCatalog> {
        let path = cli
            .catalog
            .clone()
            .or_else(|| self.config.catalog.path.clone())
            .ok_or_else(|| {
                QueryError::Config(
                    "No catalog given; pass --catalog or set [catalog] path in the config".into(),
                )
            })?;
        LocalCatalog::from_path(&path)
    }

    fn suggest_session(&self, catalog: LocalCatalog) -> SuggestSession {
        let suggest = &self.config.suggest;
        let coordinator =
            RequestCoordinator::new(Arc::new(catalog), suggest, self.metrics.clone());
        SuggestSession::new(
            Arc::new(coordinator),
            QueryDebouncer::new(suggest.debounce(), suggest.min_query_chars),
        )
    }

    async fn handle_suggest(
        &self,
        cli: &Cli,
        text: &str,
        down: usize,
        formatter: &OutputFormatter,
    ) -> Result<()> {
        let mut session = self.suggest_session(self.catalog(cli)?);
        session.focus();
        session.input(text);
        let events = session.settle().await;
        debug!("Suggest session events: {events:?}");
        for _ in 0..down {
            session.key(Key::ArrowDown);
        }

        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", formatter.format_panel(&session.panel())?)?;
        stdout.flush()?;
        Ok(())
    }

    async fn handle_browse(
        &self,
        cli: &Cli,
        request: &BrowseRequest,
        sort: SortKey,
        page: usize,
        page_size: Option<usize>,
        formatter: &OutputFormatter,
    ) -> Result<()> {
        let catalog = self.catalog(cli)?;
        let mut browse_config = self.config.browse.clone();
        if let Some(page_size) = page_size {
            browse_config.page_size = page_size.max(1);
        }
        let max_price = browse_config.max_price;

        let mut browse = BrowseSession::new(browse_config);
        browse.load(&catalog, sort).await?;
        browse.update_facets(|facets| {
            if !request.types.is_empty() {
                facets.clear_all(&request.types);
            }
            for &id in &request.categories {
                facets.include_category(id);
            }
            for &id in &request.authors {
                facets.include_author(id);
            }
            for name in &request.publishers {
                facets.include_publisher(name.as_str());
            }
            facets.set_available_only(request.available);
            if let Some(min) = &request.min_price {
                facets.set_price_bound(PriceBound::Min, min, max_price)?;
            }
            if let Some(max) = &request.max_price {
                facets.set_price_bound(PriceBound::Max, max, max_price)?;
            }
            Ok(())
        })?;
        browse.set_page(page);

        let view = browse.view();
        info!(
            "Browse: {} of {} items match, page {} of {}",
            view.filtered_count,
            browse.items().len(),
            view.current_page,
            view.total_pages
        );
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", formatter.format_listing(&view)?)?;
        stdout.flush()?;
        Ok(())
    }

    async fn handle_interactive(&self, cli: &Cli, formatter: OutputFormatter) -> Result<()> {
        let session = self.suggest_session(self.catalog(cli)?);
        let mut interactive = InteractiveSession::new(session, formatter);
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        interactive.run(stdin.lock(), &mut stdout).await
    }

    fn handle_completions(&self, shell: clap_complete::Shell) -> Result<()> {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "catalogq", &mut io::stdout());
        Ok(())
    }
}

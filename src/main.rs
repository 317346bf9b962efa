use catalog_query::app::CatalogApp;
use catalog_query::cli::Cli;
use catalog_query::error::{QueryError, Result};
use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use log::{error, info};
use std::fs;
use std::time::Instant;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli).await {
        error!("{e}");
        eprintln!("{} {}", "Error:".red().bold(), e.to_string().red());
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    setup_logging(cli)?;

    let start_time = Instant::now();
    info!("Application started with command: {:?}", cli.command);

    let app = CatalogApp::new(cli)?;
    let result = app.run(cli).await;

    info!("Finished in {:.2?}", start_time.elapsed());
    result
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent()
            && !parent_dir.as_os_str().is_empty()
            && !parent_dir.exists()
        {
            fs::create_dir_all(parent_dir)?;
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| QueryError::Other(e.to_string()))?;
    Ok(())
}

//! Command dispatch logic for upriver

use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, Commands};
use upriver_core::config::TraceConfig;
use upriver_core::db::{Database, FilterDatabase, FilteredStore};
use upriver_core::error::{Result, UpriverError};
use upriver_core::graph::ExchangeStore;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub config: TraceConfig,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => TraceConfig::load(path)?,
            None => TraceConfig::default(),
        };

        // CLI flags override config file defaults
        if let Some(version) = &cli.dataset_version {
            config.dataset_version = version.clone();
        }
        if let Some(category) = &cli.category {
            config.category_filter = Some(category.clone());
        }

        Ok(Self { cli, config, start })
    }

    pub fn open_database(&self) -> Result<Database> {
        let path = self.cli.db.as_deref().ok_or_else(|| {
            UpriverError::UsageError(
                "no exchange database given (use --db or UPRIVER_DB)".to_string(),
            )
        })?;
        Database::open(path, &self.config.dataset_version)
    }

    /// The active category restriction, with its filter database, when
    /// one is configured. Requesting a category without a filter
    /// database is a usage error.
    pub fn open_filter(&self) -> Result<Option<(FilterDatabase, String)>> {
        let Some(category) = self.config.category_filter.clone() else {
            return Ok(None);
        };
        let path = self.cli.filter_db.as_deref().ok_or_else(|| {
            UpriverError::UsageError(
                "--category requires a category database (use --filter-db or UPRIVER_FILTER_DB)"
                    .to_string(),
            )
        })?;
        Ok(Some((FilterDatabase::open(path)?, category)))
    }

    /// Root process for a trace: explicit argument first, then the
    /// config file default.
    pub fn resolve_root(&self, arg: Option<&str>) -> Result<String> {
        arg.map(str::to_string)
            .or_else(|| self.config.root_process_id.clone())
            .ok_or_else(|| {
                UpriverError::UsageError(
                    "no root process id given (pass one or set root_process_id in the config)"
                        .to_string(),
                )
            })
    }
}

/// Open the exchange store, layering the category restriction on top
/// when one is active, and hand it to `f`.
pub(crate) fn with_store<T>(
    ctx: &CommandContext,
    f: impl FnOnce(&dyn ExchangeStore) -> Result<T>,
) -> Result<T> {
    let db = ctx.open_database()?;
    match ctx.open_filter()? {
        Some((filter, category)) => {
            debug!(category = %category, "category_filter_active");
            let store = FilteredStore::new(&db, &filter, &category);
            f(&store)
        }
        None => f(&db),
    }
}

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let ctx = CommandContext::new(cli, start)?;

    debug!(elapsed = ?start.elapsed(), "load_config");

    match &cli.command {
        None => {
            println!("upriver {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("An upstream supply-chain dependency tracer.");
            println!();
            println!("Run `upriver --help` for usage information.");
            Ok(())
        }
        Some(Commands::Init { with_filter }) => crate::commands::init::execute(&ctx, *with_filter),
        Some(Commands::Tree {
            process_id,
            full,
            output,
        }) => crate::commands::tree::execute(&ctx, process_id.as_deref(), *full, output.as_deref()),
        Some(Commands::Chain {
            process_id,
            flow,
            output,
        }) => crate::commands::chain::execute(
            &ctx,
            process_id.as_deref(),
            flow.as_deref(),
            output.as_deref(),
        ),
        Some(Commands::Stats {
            process_id,
            full,
            output,
        }) => {
            crate::commands::stats::execute(&ctx, process_id.as_deref(), *full, output.as_deref())
        }
        Some(Commands::Batch {
            roots_file,
            output_dir,
            chain,
            full,
        }) => crate::commands::batch::execute(&ctx, roots_file, output_dir, *chain, *full),
    }
}

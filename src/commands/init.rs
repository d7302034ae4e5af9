//! `upriver init` - create empty databases with the expected schema

use serde_json::json;

use super::dispatch::CommandContext;
use upriver_core::db::{Database, FilterDatabase};
use upriver_core::error::{Result, UpriverError};
use upriver_core::format::OutputFormat;

pub fn execute(ctx: &CommandContext, with_filter: bool) -> Result<()> {
    let db_path = ctx.cli.db.as_deref().ok_or_else(|| {
        UpriverError::UsageError("init requires a database path (use --db)".to_string())
    })?;
    Database::create(db_path, &ctx.config.dataset_version)?;

    let filter_path = if with_filter {
        let path = ctx.cli.filter_db.as_deref().ok_or_else(|| {
            UpriverError::UsageError("--with-filter requires --filter-db".to_string())
        })?;
        FilterDatabase::create(path)?;
        Some(path)
    } else {
        None
    };

    if ctx.cli.format == OutputFormat::Json {
        let value = json!({
            "status": "created",
            "db": db_path.display().to_string(),
            "filter_db": filter_path.map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if !ctx.cli.quiet {
        println!("Created exchange database at {}", db_path.display());
        if let Some(path) = filter_path {
            println!("Created category database at {}", path.display());
        }
    }

    Ok(())
}

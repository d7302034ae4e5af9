//! `upriver chain` - max-weight upstream chain for one process

use std::path::Path;

use tracing::debug;

use super::dispatch::{with_store, CommandContext};
use super::emit;
use upriver_core::error::Result;
use upriver_core::format::OutputFormat;
use upriver_core::graph::{ChainBuilder, NameCache};
use upriver_core::report::{compact, json, markdown, ReportMeta};

pub fn execute(
    ctx: &CommandContext,
    process_id: Option<&str>,
    flow: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let root_id = ctx.resolve_root(process_id)?;
    let root_flow = flow
        .map(str::to_string)
        .or_else(|| ctx.config.root_flow_id.clone());

    with_store(ctx, |store| {
        let chain = ChainBuilder::new(store).build(&root_id)?;

        debug!(
            elapsed = ?ctx.start.elapsed(),
            length = chain.head.len(),
            "chain_built"
        );

        let meta = ReportMeta::new(&ctx.config.dataset_version)
            .with_root_flow(root_flow.clone())
            .with_category(ctx.config.category_filter.clone());
        let mut names = NameCache::new();

        let text = match ctx.cli.format {
            OutputFormat::Human => compact::chain_compact(&chain, &meta, store, &mut names),
            OutputFormat::Markdown => markdown::chain_report(&chain, &meta, store, &mut names),
            OutputFormat::Json => {
                let value = json::chain_to_json(&chain, &meta, store, &mut names);
                serde_json::to_string_pretty(&value)?
            }
        };
        emit(&text, output)
    })
}

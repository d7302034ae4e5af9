//! `upriver tree` - full upstream dependency tree for one process

use std::path::Path;

use tracing::debug;

use super::dispatch::{with_store, CommandContext};
use super::emit;
use upriver_core::error::Result;
use upriver_core::format::OutputFormat;
use upriver_core::graph::{EdgePolicy, ExchangeStore, NameCache, TreeBuilder, TreeStats};
use upriver_core::report::{compact, json, markdown, ReportMeta};

pub fn execute(
    ctx: &CommandContext,
    process_id: Option<&str>,
    full: bool,
    output: Option<&Path>,
) -> Result<()> {
    let root_id = ctx.resolve_root(process_id)?;
    let policy = if full {
        EdgePolicy::Full
    } else {
        EdgePolicy::Single
    };

    with_store(ctx, |store| {
        let tree = TreeBuilder::new(store, policy).build(&root_id)?;
        let stats = TreeStats::analyze(&tree);

        debug!(
            elapsed = ?ctx.start.elapsed(),
            nodes = stats.total_nodes,
            depth = stats.max_depth(),
            "tree_built"
        );

        let text = render(&tree, &stats, policy, ctx, store)?;
        emit(&text, output)
    })
}

fn render(
    tree: &upriver_core::graph::TreeNode,
    stats: &TreeStats,
    policy: EdgePolicy,
    ctx: &CommandContext,
    store: &dyn ExchangeStore,
) -> Result<String> {
    let meta = ReportMeta::new(&ctx.config.dataset_version)
        .with_root_flow(ctx.config.root_flow_id.clone())
        .with_category(ctx.config.category_filter.clone());
    let mut names = NameCache::new();

    let text = match ctx.cli.format {
        OutputFormat::Human => compact::tree_compact(tree, stats, policy, &meta, store, &mut names),
        OutputFormat::Markdown => markdown::tree_report(tree, stats, policy, &meta, store, &mut names),
        OutputFormat::Json => {
            let value = json::tree_to_json(tree, stats, &meta, store, &mut names);
            serde_json::to_string_pretty(&value)?
        }
    };
    Ok(text)
}

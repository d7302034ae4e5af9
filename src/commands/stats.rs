//! `upriver stats` - structural statistics over the upstream tree

use std::fmt::Write;
use std::path::Path;

use serde_json::json;
use tracing::debug;

use super::dispatch::{with_store, CommandContext};
use super::emit;
use upriver_core::error::Result;
use upriver_core::format::OutputFormat;
use upriver_core::graph::{critical_path, EdgePolicy, NameCache, TreeBuilder, TreeStats};
use upriver_core::report::{markdown, ReportMeta};

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

        debug!(elapsed = ?ctx.start.elapsed(), nodes = stats.total_nodes, "stats_computed");

        let meta = ReportMeta::new(&ctx.config.dataset_version)
            .with_root_flow(ctx.config.root_flow_id.clone())
            .with_category(ctx.config.category_filter.clone());

        let text = match ctx.cli.format {
            OutputFormat::Human => human_summary(&root_id, &tree, &stats),
            OutputFormat::Markdown => {
                let mut names = NameCache::new();
                markdown::stats_report(&tree, &stats, &meta, store, &mut names)
            }
            OutputFormat::Json => {
                let value = json!({
                    "metadata": {
                        "version": meta.dataset_version,
                        "root_process_id": root_id,
                    },
                    "stats": stats,
                    "max_depth": stats.max_depth(),
                    "avg_fanout": stats.avg_fanout(),
                    "critical_path": critical_path(&tree),
                });
                serde_json::to_string_pretty(&value)?
            }
        };
        emit(&text, output)
    })
}

fn human_summary(root_id: &str, tree: &upriver_core::graph::TreeNode, stats: &TreeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Root process:  {}", root_id);
    let _ = writeln!(out, "Total nodes:   {}", stats.total_nodes);
    let _ = writeln!(out, "Max depth:     {}", stats.max_depth());
    let _ = writeln!(out, "Leaves:        {}", stats.leaves.len());
    let _ = writeln!(out, "Avg fan-out:   {:.2}", stats.avg_fanout());
    let _ = writeln!(out, "Critical path: {}", critical_path(tree).join(" -> "));
    out
}

//! `upriver batch` - trace many roots from a file, one report per root

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use super::dispatch::{with_store, CommandContext};
use upriver_core::error::{Result, UpriverError};
use upriver_core::format::OutputFormat;
use upriver_core::graph::{
    ChainBuilder, EdgePolicy, ExchangeStore, NameCache, TreeBuilder, TreeStats,
};
use upriver_core::report::{compact, json, markdown, ReportMeta};

/// One root to trace, parsed from the roots file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRoot {
    pub process_id: String,
    pub flow_id: Option<String>,
    pub label: Option<String>,
}

struct RootOutcome {
    root: BatchRoot,
    nodes: usize,
    depth: usize,
    elapsed_ms: u128,
    error: Option<String>,
}

pub fn execute(
    ctx: &CommandContext,
    roots_file: &Path,
    output_dir: &Path,
    chain: bool,
    full: bool,
) -> Result<()> {
    let roots = parse_roots(&fs::read_to_string(roots_file)?)?;
    fs::create_dir_all(output_dir)?;

    with_store(ctx, |store| {
        // Name lookups are shared across the whole batch.
        let mut names = NameCache::new();
        let mut outcomes = Vec::with_capacity(roots.len());

        for root in roots {
            let started = Instant::now();
            let outcome = match trace_root(ctx, store, &mut names, &root, output_dir, chain, full) {
                Ok((nodes, depth)) => RootOutcome {
                    root,
                    nodes,
                    depth,
                    elapsed_ms: started.elapsed().as_millis(),
                    error: None,
                },
                Err(e) => {
                    warn!(process_id = %root.process_id, error = %e, "batch_root_failed");
                    RootOutcome {
                        root,
                        nodes: 0,
                        depth: 0,
                        elapsed_ms: started.elapsed().as_millis(),
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let summary_path = output_dir.join("batch_summary.md");
        fs::write(&summary_path, summary_report(&outcomes, chain))?;

        debug!(elapsed = ?ctx.start.elapsed(), roots = outcomes.len(), "batch_done");

        if !ctx.cli.quiet {
            let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
            println!(
                "Traced {} roots ({} failed), reports in {}",
                outcomes.len(),
                failed,
                output_dir.display()
            );
        }
        Ok(())
    })
}

/// Trace one root and write its report. Returns (node count, max depth).
fn trace_root(
    ctx: &CommandContext,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
    root: &BatchRoot,
    output_dir: &Path,
    chain: bool,
    full: bool,
) -> Result<(usize, usize)> {
    let meta = ReportMeta::new(&ctx.config.dataset_version)
        .with_root_flow(root.flow_id.clone())
        .with_category(ctx.config.category_filter.clone());

    let (text, nodes, depth) = if chain {
        let built = ChainBuilder::new(store).build(&root.process_id)?;
        let length = built.head.len();
        let text = match ctx.cli.format {
            OutputFormat::Human => compact::chain_compact(&built, &meta, store, names),
            OutputFormat::Markdown => markdown::chain_report(&built, &meta, store, names),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&json::chain_to_json(&built, &meta, store, names))?
            }
        };
        (text, length, length.saturating_sub(1))
    } else {
        let policy = if full {
            EdgePolicy::Full
        } else {
            EdgePolicy::Single
        };
        let tree = TreeBuilder::new(store, policy).build(&root.process_id)?;
        let stats = TreeStats::analyze(&tree);
        let text = match ctx.cli.format {
            OutputFormat::Human => compact::tree_compact(&tree, &stats, policy, &meta, store, names),
            OutputFormat::Markdown => {
                markdown::tree_report(&tree, &stats, policy, &meta, store, names)
            }
            OutputFormat::Json => {
                serde_json::to_string_pretty(&json::tree_to_json(&tree, &stats, &meta, store, names))?
            }
        };
        (text, stats.total_nodes, stats.max_depth())
    };

    let path = report_path(output_dir, root, chain, ctx.cli.format);
    fs::write(&path, &text)?;
    debug!(path = %path.display(), nodes, "batch_report_written");
    Ok((nodes, depth))
}

fn report_path(output_dir: &Path, root: &BatchRoot, chain: bool, format: OutputFormat) -> PathBuf {
    let stem = root
        .label
        .as_deref()
        .map_or_else(|| short_id(&root.process_id), sanitize);
    let kind = if chain { "chain" } else { "tree" };
    let ext = match format {
        OutputFormat::Human => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    output_dir.join(format!("{stem}_{kind}.{ext}"))
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Parse the roots file: one `process_id[,flow_id][,label]` per line,
/// blank lines and `#` comments skipped.
pub fn parse_roots(content: &str) -> Result<Vec<BatchRoot>> {
    let mut roots = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split(',').map(str::trim);
        let process_id = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                UpriverError::invalid_value(&format!("roots file line {}", lineno + 1), line)
            })?
            .to_string();
        let flow_id = fields.next().filter(|s| !s.is_empty()).map(str::to_string);
        let label = fields.next().filter(|s| !s.is_empty()).map(str::to_string);
        roots.push(BatchRoot {
            process_id,
            flow_id,
            label,
        });
    }
    Ok(roots)
}

fn summary_report(outcomes: &[RootOutcome], chain: bool) -> String {
    let mut out = String::new();
    let kind = if chain { "Chain" } else { "Tree" };
    let _ = writeln!(out, "# Batch {} Summary", kind);
    out.push('\n');
    let _ = writeln!(out, "| Label | Process ID | Nodes | Depth | Time (ms) | Status |");
    let _ = writeln!(out, "|-------|------------|-------|-------|-----------|--------|");
    for o in outcomes {
        let label = o.root.label.as_deref().unwrap_or("-");
        let status = match &o.error {
            None => "ok".to_string(),
            Some(e) => format!("failed: {e}"),
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            label, o.root.process_id, o.nodes, o.depth, o.elapsed_ms, status
        );
    }
    out.push('\n');
    let ok = outcomes.iter().filter(|o| o.error.is_none()).count();
    let _ = writeln!(out, "**Succeeded:** {} / {}", ok, outcomes.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roots_fields_and_comments() {
        let content = "\
# steel roots
proc-1
proc-2,flow-9
proc-3,flow-8,billet casting

proc-4,,bare label
";
        let roots = parse_roots(content).unwrap();
        assert_eq!(roots.len(), 4);
        assert_eq!(roots[0].process_id, "proc-1");
        assert!(roots[0].flow_id.is_none());
        assert_eq!(roots[1].flow_id.as_deref(), Some("flow-9"));
        assert_eq!(roots[2].label.as_deref(), Some("billet casting"));
        assert!(roots[3].flow_id.is_none());
        assert_eq!(roots[3].label.as_deref(), Some("bare label"));
    }

    #[test]
    fn test_report_path_uses_label_or_short_id() {
        let root = BatchRoot {
            process_id: "0195b2e3-1111-2222-3333-444455556666".to_string(),
            flow_id: None,
            label: Some("billet casting".to_string()),
        };
        let path = report_path(Path::new("out"), &root, false, OutputFormat::Markdown);
        assert_eq!(path, Path::new("out/billet-casting_tree.md"));

        let unlabeled = BatchRoot {
            label: None,
            ..root
        };
        let path = report_path(Path::new("out"), &unlabeled, true, OutputFormat::Human);
        assert_eq!(path, Path::new("out/0195b2e3_chain.txt"));
    }
}

//! Markdown report rendering for trees, chains and statistics

use crate::graph::names::NameCache;
use crate::graph::provider::ExchangeStore;
use crate::graph::stats::{critical_path, TreeStats};
use crate::graph::types::{Chain, EdgePolicy, Exchange, TreeNode};
use crate::report::{short, ReportMeta};

/// Render the exhaustive-traversal tree as a markdown report.
pub fn tree_report(
    root: &TreeNode,
    stats: &TreeStats,
    policy: EdgePolicy,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> String {
    let mode_title = match policy {
        EdgePolicy::Single => "Skeleton Tree (Single Edge)",
        EdgePolicy::Full => "Full Tree (All Edges)",
    };

    let mut lines = Vec::new();
    lines.push(format!("# Process Tree Analysis - {}", mode_title));
    lines.push(String::new());
    lines.push(format!(
        "**Generated at:** {}",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("**Version:** {}", meta.dataset_version));
    lines.push(format!("**Mode:** {}", mode_title));
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    if let Some(flow_id) = &meta.root_flow_id {
        lines.push("## Product (Root Flow)".to_string());
        lines.push(format!("- **Flow ID:** `{}`", flow_id));
        lines.push(format!("- **Flow Name:** {}", names.flow_name(store, flow_id)));
        lines.push(String::new());
    }

    lines.push("## Root Process".to_string());
    lines.push(format!("- **Process ID:** `{}`", root.process_id));
    lines.push(format!(
        "- **Process Name:** {}",
        names.process_name(store, &root.process_id)
    ));
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Process Tree Structure".to_string());
    lines.push(String::new());
    match policy {
        EdgePolicy::Single => lines.push(
            "*Note: Each upstream relationship shows only one representative flow.*".to_string(),
        ),
        EdgePolicy::Full => {
            lines.push("*Note: Each upstream relationship shows ALL flows.*".to_string())
        }
    }
    lines.push(String::new());

    write_tree_node(root, &mut lines, "", true, policy, store, names);

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Statistics".to_string());
    lines.push(format!("- **Total Processes:** {}", stats.total_nodes));
    lines.push(format!("- **Max Depth:** {}", stats.max_depth()));
    if policy == EdgePolicy::Full && stats.edge_count > 0 {
        lines.push(format!("- **Total Edges:** {}", stats.edge_count));
        lines.push(format!("- **Total Flows:** {}", stats.flow_count));
        lines.push(format!(
            "- **Avg Flows per Edge:** {:.2}",
            stats.avg_flows_per_edge()
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}

fn write_tree_node(
    node: &TreeNode,
    lines: &mut Vec<String>,
    prefix: &str,
    is_last: bool,
    policy: EdgePolicy,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) {
    let connector = if is_last { "└─" } else { "├─" };
    let process_name = names.process_name(store, &node.process_id);
    let cycle_note = if node.cycle { " ↺ (already visited)" } else { "" };

    match (policy, node.representative_edge()) {
        (EdgePolicy::Single, Some(edge)) => {
            let flow_name = names.flow_name(store, &edge.flow_id);
            lines.push(format!(
                "{}{} **[{}...]** {} ← via `{}...` ({}){}",
                prefix,
                connector,
                short(&node.process_id),
                process_name,
                short(&edge.flow_id),
                flow_name,
                cycle_note,
            ));
        }
        (EdgePolicy::Full, Some(_)) => {
            lines.push(format!(
                "{}{} **[{}...]** {}{}",
                prefix,
                connector,
                short(&node.process_id),
                process_name,
                cycle_note,
            ));
            let extension = if is_last { "    " } else { "│   " };
            for edge in &node.via {
                let flow_name = names.flow_name(store, &edge.flow_id);
                lines.push(format!(
                    "{}{}  → via `{}...` ({})",
                    prefix,
                    extension,
                    short(&edge.flow_id),
                    flow_name,
                ));
            }
        }
        // Root node: no incoming edge to describe.
        (_, None) => {
            lines.push(format!(
                "{}{} **[{}...]** {}{}",
                prefix,
                connector,
                short(&node.process_id),
                process_name,
                cycle_note,
            ));
        }
    }

    let extension = if is_last { "    " } else { "│   " };
    let child_prefix = format!("{}{}", prefix, extension);
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        write_tree_node(child, lines, &child_prefix, is_last_child, policy, store, names);
    }
}

/// Render tree statistics as a standalone markdown report.
pub fn stats_report(
    root: &TreeNode,
    stats: &TreeStats,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> String {
    let mut lines = Vec::new();

    lines.push("# Process Tree Statistics".to_string());
    lines.push(String::new());
    lines.push(format!("**Version:** {}", meta.dataset_version));
    lines.push(format!("**Root:** `{}...`", short(&root.process_id)));
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!("- **Total Nodes:** {}", stats.total_nodes));
    lines.push(format!("- **Leaf Nodes:** {}", stats.leaves.len()));
    lines.push(format!(
        "- **Non-leaf Nodes:** {}",
        stats.total_nodes - stats.leaves.len()
    ));
    lines.push(format!("- **Max Depth:** {}", stats.max_depth()));
    lines.push(format!("- **Avg Fan-out:** {:.2}", stats.avg_fanout()));
    lines.push(String::new());

    lines.push("## Level Distribution".to_string());
    lines.push(String::new());
    lines.push("| Level | Nodes | Share |".to_string());
    lines.push("|-------|-------|-------|".to_string());
    for (level, count) in &stats.level_distribution {
        let share = *count as f64 / stats.total_nodes as f64 * 100.0;
        lines.push(format!("| {} | {} | {:.1}% |", level, count, share));
    }
    lines.push(String::new());

    lines.push("## Fan-out Distribution".to_string());
    lines.push(String::new());
    lines.push("| Fan-out | Nodes | Note |".to_string());
    lines.push("|---------|-------|------|".to_string());
    for (fanout, count) in &stats.fanout_distribution {
        let note = if *fanout == 0 {
            "leaf".to_string()
        } else {
            format!("{} upstream providers", fanout)
        };
        lines.push(format!("| {} | {} | {} |", fanout, count, note));
    }
    lines.push(String::new());

    let path = critical_path(root);
    lines.push("## Critical Path".to_string());
    lines.push(String::new());
    lines.push(format!("Longest path length: {}", path.len()));
    lines.push(String::new());
    for (i, process_id) in path.iter().enumerate() {
        let name = names.process_name(store, process_id);
        let indent = "  ".repeat(i);
        if i == 0 {
            lines.push(format!("{}└─ **[root]** `{}...` {}", indent, short(process_id), name));
        } else {
            lines.push(format!("{}└─ `{}...` {}", indent, short(process_id), name));
        }
    }
    lines.push(String::new());

    lines.push("## Leaf Nodes (first 10)".to_string());
    lines.push(String::new());
    lines.push("| # | Process ID | Process Name |".to_string());
    lines.push("|---|------------|--------------|".to_string());
    for (i, process_id) in stats.leaves.iter().take(10).enumerate() {
        let name = names.process_name(store, process_id);
        lines.push(format!("| {} | `{}...` | {} |", i + 1, short(process_id), name));
    }
    if stats.leaves.len() > 10 {
        lines.push(format!(
            "| ... | ... | {} more leaf nodes |",
            stats.leaves.len() - 10
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}

/// Render the single-chain traversal as a markdown report.
pub fn chain_report(
    chain: &Chain,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> String {
    let mut lines = Vec::new();

    lines.push("# Main Chain".to_string());
    lines.push(String::new());
    lines.push(format!(
        "**Generated at:** {}",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("**Version:** {}", meta.dataset_version));
    if let Some(flow_id) = &meta.root_flow_id {
        lines.push(format!("**Root Flow:** `{}`", flow_id));
    }
    lines.push(format!("**Root Process:** `{}`", chain.head.process_id));
    lines.push(String::new());
    lines.push("**Rule:** at every level the heaviest qualifying input edge is followed".to_string());
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    write_root_context(&mut lines, chain, store, names);
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Chain Path".to_string());
    lines.push(String::new());

    for node in chain.head.iter() {
        let indent = "  ".repeat(node.level);
        let name = names.process_name(store, &node.process_id);
        lines.push(format!("{}**Level {}**: Process", indent, node.level));
        lines.push(format!("{}- **ID**: `{}`", indent, node.process_id));
        lines.push(format!("{}- **Name**: {}", indent, name));
        if let Some(edge) = &node.via {
            let flow_name = names.flow_name(store, &edge.flow_id);
            let unit_name = names.unit_name(store, edge.unit_id.as_deref());
            lines.push(format!("{}- **Via Flow**: {}", indent, flow_name));
            lines.push(format!("{}- **Flow ID**: `{}`", indent, edge.flow_id));
            lines.push(format!(
                "{}- **Value**: {:.6} {}",
                indent, edge.value, unit_name
            ));
            if let Some(gwp) = edge.gwp {
                lines.push(format!("{}- **GWP**: {:.6}", indent, gwp));
            }
            if let Some(share) = edge.gwp_contribution {
                lines.push(format!("{}- **GWP Share**: {:.2}%", indent, share * 100.0));
            }
        }
        if node.cycle {
            lines.push(format!("{}- **Note**: already visited, chain ends here", indent));
        }
        lines.push(String::new());
        if node.next.is_some() {
            lines.push(format!("{}↓", indent));
            lines.push(String::new());
        }
    }

    let length = chain.head.len();
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push("## Statistics".to_string());
    lines.push(String::new());
    lines.push(format!("- **Chain Length:** {} nodes", length));
    lines.push(format!("- **Max Depth:** {} levels", length.saturating_sub(1)));
    lines.push(String::new());

    lines.join("\n")
}

fn write_root_context(
    lines: &mut Vec<String>,
    chain: &Chain,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) {
    lines.push("## Root Process (Level 0)".to_string());
    lines.push(String::new());
    lines.push(format!(
        "**Process:** {}",
        names.process_name(store, &chain.head.process_id)
    ));
    lines.push(String::new());

    lines.push(format!("### Inputs ({})", chain.root_context.inputs.len()));
    lines.push(String::new());
    if chain.root_context.inputs.is_empty() {
        lines.push("_none_".to_string());
    } else {
        lines.push("| Flow Name | Flow ID | Provider | Value | Unit | GWP | Share |".to_string());
        lines.push("|-----------|---------|----------|-------|------|-----|-------|".to_string());
        for input in &chain.root_context.inputs {
            lines.push(exchange_table_row(input, true, store, names));
        }
    }
    lines.push(String::new());

    lines.push(format!("### Outputs ({})", chain.root_context.outputs.len()));
    lines.push(String::new());
    if chain.root_context.outputs.is_empty() {
        lines.push("_none_".to_string());
    } else {
        lines.push("| Flow Name | Flow ID | Value | Unit | GWP | Share |".to_string());
        lines.push("|-----------|---------|-------|------|-----|-------|".to_string());
        for output in &chain.root_context.outputs {
            lines.push(exchange_table_row(output, false, store, names));
        }
    }
    lines.push(String::new());
}

fn exchange_table_row(
    exchange: &Exchange,
    with_provider: bool,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> String {
    let flow_name = names.flow_name(store, &exchange.flow_id);
    let unit_name = names.unit_name(store, exchange.unit_id.as_deref());
    let gwp = exchange
        .gwp
        .map(|g| format!("{:.6}", g))
        .unwrap_or_else(|| "N/A".to_string());
    let share = exchange
        .gwp_contribution
        .map(|s| format!("{:.2}%", s * 100.0))
        .unwrap_or_else(|| "N/A".to_string());

    if with_provider {
        let provider = exchange
            .provider_id
            .as_deref()
            .map(|p| format!("`{}...`", short(p)))
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "| {} | `{}...` | {} | {:.6} | {} | {} | {} |",
            flow_name,
            short(&exchange.flow_id),
            provider,
            exchange.value,
            unit_name,
            gwp,
            share,
        )
    } else {
        format!(
            "| {} | `{}...` | {:.6} | {} | {} | {} |",
            flow_name,
            short(&exchange.flow_id),
            exchange.value,
            unit_name,
            gwp,
            share,
        )
    }
}

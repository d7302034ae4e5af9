//! Compact plain-text output, tuned for feeding into downstream text
//! tooling: full IDs, space indentation, no table markup.

use std::fmt::Write;

use crate::graph::names::NameCache;
use crate::graph::provider::ExchangeStore;
use crate::graph::stats::TreeStats;
use crate::graph::types::{Chain, EdgePolicy, Exchange, TreeNode};
use crate::report::ReportMeta;

const BANNER: &str = "================================================================================";

/// Render a traversal tree in the compact line-per-node format.
///
/// Single policy puts the process and its representative flow on one
/// line; Full policy lists every flow under the process line.
pub fn tree_compact(
    root: &TreeNode,
    stats: &TreeStats,
    policy: EdgePolicy,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> String {
    let mut out = String::new();
    let mode = match policy {
        EdgePolicy::Single => "SINGLE-EDGE",
        EdgePolicy::Full => "FULL-EDGE",
    };

    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "Upstream Process Tree - {mode} MODE");
    let _ = writeln!(out, "{BANNER}");
    out.push('\n');

    let _ = writeln!(out, "## Basic Information");
    if let Some(flow_id) = &meta.root_flow_id {
        let _ = writeln!(out, "Root Product Flow: {flow_id}");
        let _ = writeln!(out, "  Name: {}", names.flow_name(store, flow_id));
        out.push('\n');
    }
    let _ = writeln!(out, "Root Process: {}", root.process_id);
    let _ = writeln!(
        out,
        "  Name: {}",
        names.process_name(store, &root.process_id)
    );
    out.push('\n');
    let _ = writeln!(out, "Version: {}", meta.dataset_version);
    let _ = writeln!(
        out,
        "Generated: {}",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push('\n');

    let _ = writeln!(out, "## Format");
    match policy {
        EdgePolicy::Single => {
            let _ = writeln!(out, "  process_id | process_name << flow_id | flow_name");
        }
        EdgePolicy::Full => {
            let _ = writeln!(out, "  process_id | process_name");
            let _ = writeln!(out, "    << flow_id | flow_name");
        }
    }
    let _ = writeln!(out, "  Indentation indicates hierarchy level");
    let _ = writeln!(out, "  [CYCLE] marks a process already seen on this branch");
    out.push('\n');
    let _ = writeln!(out, "{BANNER}");
    out.push('\n');

    write_compact_node(&mut out, root, policy, store, names);

    out.push('\n');
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "## Statistics");
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "Total Processes: {}", stats.total_nodes);
    let _ = writeln!(out, "Max Depth: {}", stats.max_depth());
    if policy == EdgePolicy::Full && stats.edge_count > 0 {
        let _ = writeln!(out, "Total Edges: {}", stats.edge_count);
        let _ = writeln!(out, "Total Flows: {}", stats.flow_count);
        let _ = writeln!(out, "Avg Flows per Edge: {:.2}", stats.avg_flows_per_edge());
    }
    let _ = writeln!(out, "{BANNER}");

    out
}

fn write_compact_node(
    out: &mut String,
    node: &TreeNode,
    policy: EdgePolicy,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) {
    let indent = "  ".repeat(node.level);
    let process_name = names.process_name(store, &node.process_id);
    let cycle_tag = if node.cycle { " [CYCLE]" } else { "" };

    match policy {
        EdgePolicy::Single => {
            if let Some(edge) = node.representative_edge() {
                let flow_name = names.flow_name(store, &edge.flow_id);
                let _ = writeln!(
                    out,
                    "{indent}{} | {process_name} << {} | {flow_name}{cycle_tag}",
                    node.process_id, edge.flow_id
                );
            } else {
                let _ = writeln!(out, "{indent}{} | {process_name}{cycle_tag}", node.process_id);
            }
        }
        EdgePolicy::Full => {
            let _ = writeln!(out, "{indent}{} | {process_name}{cycle_tag}", node.process_id);
            for edge in &node.via {
                let flow_name = names.flow_name(store, &edge.flow_id);
                let _ = writeln!(out, "{indent}  << {} | {flow_name}", edge.flow_id);
            }
        }
    }

    for child in &node.children {
        write_compact_node(out, child, policy, store, names);
    }
}

/// Render a max-weight chain as compact TXT.
pub fn chain_compact(
    chain: &Chain,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> String {
    let mut out = String::new();
    let root = &chain.head;

    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "Upstream Main Chain");
    let _ = writeln!(out, "{BANNER}");
    out.push('\n');
    if let Some(category) = &meta.category_filter {
        let _ = writeln!(out, "Category filter: category_id={category}");
    }
    let _ = writeln!(out, "Root Process ID: {}", root.process_id);
    let _ = writeln!(out, "Rule: at each level follow the edge with the largest value");
    if meta.category_filter.is_some() {
        let _ = writeln!(out, "      only exchanges in the selected category are traced");
    }
    out.push('\n');

    let _ = writeln!(out, "Format:");
    let _ = writeln!(out, "  L<level>: <process name> | <process UUID>");
    let _ = writeln!(out, "    << <flow name> | <flow UUID> | value=<number>");
    let _ = writeln!(out, "    ↓");
    out.push('\n');
    let _ = writeln!(out, "{BANNER}");
    out.push('\n');

    write_root_context(&mut out, chain, store, names);
    let _ = writeln!(out, "{BANNER}");
    out.push('\n');
    let _ = writeln!(out, "[Chain Path]");
    out.push('\n');

    let mut length = 0usize;
    for node in chain.head.iter() {
        length += 1;
        let process_name = names.process_name(store, &node.process_id);
        let cycle_tag = if node.cycle { " [CYCLE]" } else { "" };
        let _ = writeln!(out, "L{}: {process_name} | {}{cycle_tag}", node.level, node.process_id);
        if let Some(edge) = &node.via {
            let _ = writeln!(
                out,
                "  << {} | {} | {}",
                names.flow_name(store, &edge.flow_id),
                edge.flow_id,
                edge_detail(edge, store, names)
            );
        }
        if node.next.is_some() {
            let _ = writeln!(out, "  ↓");
        }
    }

    out.push('\n');
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "Chain length: {length} nodes");
    let _ = writeln!(out, "Max depth: {} levels", length.saturating_sub(1));
    let _ = writeln!(out, "{BANNER}");

    out
}

fn write_root_context(
    out: &mut String,
    chain: &Chain,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) {
    let _ = writeln!(out, "[Root Context]");
    let _ = writeln!(
        out,
        "Process: {}",
        names.process_name(store, &chain.head.process_id)
    );
    out.push('\n');

    let inputs = &chain.root_context.inputs;
    let _ = writeln!(out, "Inputs ({}):", inputs.len());
    if inputs.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for edge in inputs {
        let provider = edge
            .provider_id
            .as_deref()
            .map_or_else(|| "N/A".to_string(), |p| format!("{}...", super::short(p)));
        let _ = writeln!(
            out,
            "  ← {} | {} | provider={provider} | {}",
            names.flow_name(store, &edge.flow_id),
            edge.flow_id,
            edge_detail(edge, store, names)
        );
    }
    out.push('\n');

    let outputs = &chain.root_context.outputs;
    let _ = writeln!(out, "Outputs ({}):", outputs.len());
    if outputs.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for edge in outputs {
        let _ = writeln!(
            out,
            "  → {} | {} | {}",
            names.flow_name(store, &edge.flow_id),
            edge.flow_id,
            edge_detail(edge, store, names)
        );
    }
    out.push('\n');
}

fn edge_detail(edge: &Exchange, store: &dyn ExchangeStore, names: &mut NameCache) -> String {
    let mut parts = vec![
        format!("value={:.6}", edge.value),
        names.unit_name(store, edge.unit_id.as_deref()),
    ];
    if let Some(gwp) = edge.gwp {
        parts.push(format!("GWP={gwp:.6}"));
    }
    if let Some(share) = edge.gwp_contribution {
        parts.push(format!("share={:.2}%", share * 100.0));
    }
    parts.join(" | ")
}

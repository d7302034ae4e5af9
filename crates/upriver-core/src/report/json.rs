//! JSON export of traversal results

use serde_json::{json, Value};

use crate::graph::names::NameCache;
use crate::graph::provider::ExchangeStore;
use crate::graph::stats::TreeStats;
use crate::graph::types::{Chain, TreeNode};
use crate::report::ReportMeta;

/// Serialize a traversal tree with a metadata envelope.
pub fn tree_to_json(
    root: &TreeNode,
    stats: &TreeStats,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> Value {
    json!({
        "metadata": {
            "version": meta.dataset_version,
            "total_processes": stats.total_nodes,
            "max_depth": stats.max_depth(),
        },
        "tree": node_to_json(root, store, names),
    })
}

fn node_to_json(node: &TreeNode, store: &dyn ExchangeStore, names: &mut NameCache) -> Value {
    let mut obj = json!({
        "process_id": node.process_id,
        "process_name": names.process_name(store, &node.process_id),
        "level": node.level,
    });

    if let Some(edge) = node.representative_edge() {
        obj["flow_id"] = json!(edge.flow_id);
        obj["flow_name"] = json!(names.flow_name(store, &edge.flow_id));
    }
    if node.via.len() > 1 {
        let flows: Vec<Value> = node
            .via
            .iter()
            .map(|edge| {
                json!({
                    "flow_id": edge.flow_id,
                    "flow_name": names.flow_name(store, &edge.flow_id),
                    "value": edge.value,
                })
            })
            .collect();
        obj["flows"] = json!(flows);
    }
    if node.cycle {
        obj["cycle"] = json!(true);
    }

    let children: Vec<Value> = node
        .children
        .iter()
        .map(|child| node_to_json(child, store, names))
        .collect();
    obj["children_count"] = json!(children.len());
    obj["children"] = json!(children);

    obj
}

/// Serialize a single-chain traversal as a flat ordered list with
/// per-step annotations.
pub fn chain_to_json(
    chain: &Chain,
    meta: &ReportMeta,
    store: &dyn ExchangeStore,
    names: &mut NameCache,
) -> Value {
    let links: Vec<Value> = chain
        .head
        .iter()
        .map(|node| {
            let mut obj = json!({
                "process_id": node.process_id,
                "process_name": names.process_name(store, &node.process_id),
                "level": node.level,
            });
            if let Some(edge) = &node.via {
                obj["via"] = json!({
                    "flow_id": edge.flow_id,
                    "flow_name": names.flow_name(store, &edge.flow_id),
                    "value": edge.value,
                    "unit": names.unit_name(store, edge.unit_id.as_deref()),
                    "gwp": edge.gwp,
                    "gwp_contribution": edge.gwp_contribution,
                });
            }
            if node.cycle {
                obj["cycle"] = json!(true);
            }
            obj
        })
        .collect();

    json!({
        "metadata": {
            "version": meta.dataset_version,
            "chain_length": chain.head.len(),
            "max_depth": chain.head.len().saturating_sub(1),
        },
        "root_context": {
            "inputs": chain.root_context.inputs,
            "outputs": chain.root_context.outputs,
        },
        "chain": links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::chain::ChainBuilder;
    use crate::graph::testutil::MockStore;
    use crate::graph::tree::TreeBuilder;
    use crate::graph::types::EdgePolicy;

    #[test]
    fn test_tree_json_envelope() {
        let mut store = MockStore::new();
        store.edge("root", "a", "f1", 2.0);
        store.name("root", "Rolling mill");

        let tree = TreeBuilder::new(&store, EdgePolicy::Single)
            .build("root")
            .unwrap();
        let stats = TreeStats::analyze(&tree);
        let meta = ReportMeta::new("1.4.0");
        let mut names = NameCache::new();

        let value = tree_to_json(&tree, &stats, &meta, &store, &mut names);

        assert_eq!(value["metadata"]["version"], "1.4.0");
        assert_eq!(value["metadata"]["total_processes"], 2);
        assert_eq!(value["metadata"]["max_depth"], 1);
        assert_eq!(value["tree"]["process_name"], "Rolling mill");
        assert_eq!(value["tree"]["children_count"], 1);
        assert_eq!(value["tree"]["children"][0]["flow_id"], "f1");
    }

    #[test]
    fn test_chain_json_links() {
        let mut store = MockStore::new();
        store.edge("root", "a", "f1", 2.0);
        store.edge("a", "root", "f2", 1.0);

        let chain = ChainBuilder::new(&store).build("root").unwrap();
        let meta = ReportMeta::new("1.4.0");
        let mut names = NameCache::new();

        let value = chain_to_json(&chain, &meta, &store, &mut names);

        assert_eq!(value["metadata"]["chain_length"], 3);
        assert_eq!(value["chain"][0]["level"], 0);
        assert_eq!(value["chain"][1]["via"]["value"], 2.0);
        assert_eq!(value["chain"][2]["cycle"], true);
        assert_eq!(value["root_context"]["inputs"][0]["flow_id"], "f1");
    }
}

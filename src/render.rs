//! Human and machine readable views of a subnet tree.

use serde::Serialize;

use crate::ip::{NodeId, Selector, SubnetTree};

/// One reserved block, as reported to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRecord {
    pub cidr: String,
    pub name: String,
    pub first_ip: String,
    pub last_ip: String,
    pub addresses: u64,
}

/// Render the tree below `from` one node per line, in pre-order.
///
/// Each line reads `<cidr> (<first> to <last>) <reservation>`. Nodes are
/// indented one space per level below `from`. With `leaves_only`, only
/// unsplit nodes are printed and indentation is dropped.
pub fn render_tree(tree: &SubnetTree, from: NodeId, leaves_only: bool) -> String {
    let base_depth = tree.depth(from);

    tree.preorder(from)
        .filter(|&id| !leaves_only || tree.node(id).is_leaf())
        .map(|id| {
            let node = tree.node(id);
            let indent = if leaves_only {
                0
            } else {
                tree.depth(id) - base_depth
            };
            format!(
                "{:indent$}{} ({} to {}) {}\n",
                "",
                node.cidr(),
                node.first_ip(),
                node.last_ip(),
                node.reservation().unwrap_or_default(),
                indent = indent
            )
        })
        .collect()
}

/// Every reservation below `from`, lowest address first
pub fn reservation_records(tree: &SubnetTree, from: NodeId) -> Vec<ReservationRecord> {
    tree.collect(from, &[Selector::Reserved])
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            ReservationRecord {
                cidr: node.cidr().to_string(),
                name: node.reservation().unwrap_or_default().to_string(),
                first_ip: node.first_ip().to_string(),
                last_ip: node.last_ip().to_string(),
                addresses: node.cidr().address_count(),
            }
        })
        .collect()
}

/// Plain-text listing in the form ` - <cidr> (reservation name: <name>)`
pub fn render_reservations(network: &str, records: &[ReservationRecord]) -> String {
    let header = format!("The network {} has following subnets/reservations:\n", network);
    let lines = records
        .iter()
        .map(|record| format!(" - {} (reservation name: {})\n", record.cidr, record.name));
    std::iter::once(header).chain(lines).collect()
}

/// Pretty-printed JSON for any serializable report
pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserved_tree() -> SubnetTree {
        let mut tree = SubnetTree::parse("10.0.0.0/22").unwrap();
        let root = tree.root();
        tree.add_reservation(root, "10.0.1.0/24", "app").unwrap();
        tree.add_reservation(root, "10.0.0.0/24", "db").unwrap();
        tree
    }

    #[test]
    fn test_render_tree() {
        let tree = reserved_tree();
        let rendered = render_tree(&tree, tree.root(), false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "10.0.0.0/22 (10.0.0.1 to 10.0.3.254) ",
                " 10.0.0.0/23 (10.0.0.1 to 10.0.1.254) ",
                "  10.0.0.0/24 (10.0.0.1 to 10.0.0.254) db",
                "  10.0.1.0/24 (10.0.1.1 to 10.0.1.254) app",
                " 10.0.2.0/23 (10.0.2.1 to 10.0.3.254) ",
            ]
        );
    }

    #[test]
    fn test_render_leaves_only() {
        let tree = reserved_tree();
        let rendered = render_tree(&tree, tree.root(), true);
        let cidrs: Vec<&str> = rendered
            .lines()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(cidrs, vec!["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/23"]);
        assert!(rendered.lines().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn test_render_subtree_indent_starts_at_zero() {
        let tree = reserved_tree();
        let low = tree.root_node().low().unwrap();
        let rendered = render_tree(&tree, low, false);
        assert!(rendered.starts_with("10.0.0.0/23 "));
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_reservation_records() {
        let tree = reserved_tree();
        let records = reservation_records(&tree, tree.root());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cidr, "10.0.0.0/24");
        assert_eq!(records[0].name, "db");
        assert_eq!(records[1].name, "app");
        assert_eq!(records[1].addresses, 256);

        let text = render_reservations("10.0.0.0/22", &records);
        assert!(text.contains(" - 10.0.0.0/24 (reservation name: db)"));

        let json = render_json(&records).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1]["last_ip"], "10.0.1.254");
    }
}

//! Node predicates used with [`SubnetTree::collect`](super::tree::SubnetTree::collect)
//! and [`SubnetTree::filter`](super::tree::SubnetTree::filter).

use serde::{Deserialize, Serialize};

use super::tree::SubnetNode;

/// A pure test over a node's observable state.
///
/// Serialized in snake case, e.g. `reserved` or `!with_size 24` in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// The node itself carries a reservation
    Reserved,
    /// Neither the node nor any descendant is reserved
    Available,
    /// The node's prefix length equals the given size
    WithSize(u8),
}

impl Selector {
    pub fn matches(&self, node: &SubnetNode) -> bool {
        match *self {
            Selector::Reserved => select_reserved(node),
            Selector::Available => select_available(node),
            Selector::WithSize(size) => node.size() == size,
        }
    }
}

pub fn select_reserved(node: &SubnetNode) -> bool {
    node.is_reserved()
}

pub fn select_available(node: &SubnetNode) -> bool {
    node.is_available()
}

pub fn select_with_size(size: u8) -> impl Fn(&SubnetNode) -> bool {
    move |node| node.size() == size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_from_yaml() {
        let yaml = r#"
- reserved
- available
- !with_size 24
"#;
        let selectors: Vec<Selector> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            selectors,
            vec![Selector::Reserved, Selector::Available, Selector::WithSize(24)]
        );
        assert!(serde_yaml::from_str::<Selector>("leased").is_err());
    }

    #[test]
    fn test_selector_json() {
        let json = serde_json::to_string(&Selector::WithSize(28)).unwrap();
        assert_eq!(json, r#"{"with_size":28}"#);
        let back: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Selector::WithSize(28));
    }
}

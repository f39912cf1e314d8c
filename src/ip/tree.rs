//! Binary subnet partition tree.
//!
//! The tree is stored as an arena: every [`SubnetNode`] lives in a `Vec`
//! owned by [`SubnetTree`] and is addressed by a [`NodeId`]. A node owns the
//! ids of its two children, which are created together by [`SubnetTree::divide`]
//! and split the parent's block exactly in half. Children keep the id of their
//! parent so reservation counters can be propagated upwards.
//!
//! Nodes are never removed. Splitting is lazy: nothing below the root exists
//! until an operation needs to descend past a node's granularity.

use std::net::Ipv4Addr;

use log::trace;

use super::addr::ADDRESS_BITS;
use super::cidr::Cidr;
use super::error::SubnetError;
use super::select::Selector;

/// Handle to a node inside a [`SubnetTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// The two halves produced by splitting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Children {
    /// Lower half, same base address as the parent
    pub low: NodeId,
    /// Upper half, starting right after the lower half's last address
    pub high: NodeId,
}

/// One vertex of the partition tree
#[derive(Debug, Clone)]
pub struct SubnetNode {
    cidr: Cidr,
    parent: Option<NodeId>,
    children: Option<Children>,
    reservation: Option<String>,
    /// Reserved nodes strictly below this one
    sub_reservations: usize,
}

impl SubnetNode {
    fn new(cidr: Cidr, parent: Option<NodeId>) -> Self {
        Self {
            cidr,
            parent,
            children: None,
            reservation: None,
            sub_reservations: 0,
        }
    }

    pub fn cidr(&self) -> Cidr {
        self.cidr
    }

    /// Prefix length of the block
    pub fn size(&self) -> u8 {
        self.cidr.prefix()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<Children> {
        self.children
    }

    pub fn low(&self) -> Option<NodeId> {
        self.children.map(|c| c.low)
    }

    pub fn high(&self) -> Option<NodeId> {
        self.children.map(|c| c.high)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn reservation(&self) -> Option<&str> {
        self.reservation.as_deref()
    }

    pub fn is_reserved(&self) -> bool {
        self.reservation.is_some()
    }

    pub fn has_child_reservations(&self) -> bool {
        self.sub_reservations > 0
    }

    /// Number of reserved nodes anywhere below this node
    pub fn sub_reservations(&self) -> usize {
        self.sub_reservations
    }

    /// Neither this node nor anything below it is reserved
    pub fn is_available(&self) -> bool {
        !self.is_reserved() && !self.has_child_reservations()
    }

    pub fn network_address(&self) -> Ipv4Addr {
        self.cidr.network()
    }

    pub fn broadcast_address(&self) -> Ipv4Addr {
        self.cidr.broadcast()
    }

    /// First usable host address.
    ///
    /// For `/31` and `/32` blocks every address is usable, so this is the
    /// network address.
    pub fn first_ip(&self) -> Ipv4Addr {
        if self.size() >= ADDRESS_BITS - 1 {
            self.cidr.network()
        } else {
            Ipv4Addr::from(self.cidr.base() + 1)
        }
    }

    /// Last usable host address, the broadcast address for `/31` and `/32`
    pub fn last_ip(&self) -> Ipv4Addr {
        if self.size() >= ADDRESS_BITS - 1 {
            self.cidr.broadcast()
        } else {
            Ipv4Addr::from(self.cidr.last() - 1)
        }
    }

    pub(crate) fn set_reservation(&mut self, name: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.reservation, name)
    }

    pub(crate) fn add_sub_reservation(&mut self) {
        self.sub_reservations += 1;
    }

    pub(crate) fn remove_sub_reservation(&mut self) {
        debug_assert!(self.sub_reservations > 0, "sub-reservation underflow at {}", self.cidr);
        self.sub_reservations -= 1;
    }
}

/// Arena holding every materialised node of one address space
#[derive(Debug, Clone)]
pub struct SubnetTree {
    nodes: Vec<SubnetNode>,
}

impl SubnetTree {
    /// Create a tree with a single, unsplit root node
    pub fn new(root: Cidr) -> Self {
        Self {
            nodes: vec![SubnetNode::new(root, None)],
        }
    }

    /// Parse a CIDR such as `10.0.0.0/16` and create a tree rooted at it
    pub fn parse(network: &str) -> Result<Self, SubnetError> {
        Ok(Self::new(network.parse()?))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root_node(&self) -> &SubnetNode {
        &self.nodes[0]
    }

    /// Borrow a node.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &SubnetNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SubnetNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes materialised so far
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of every ancestor of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |&p| self.node(p).parent)
    }

    /// Number of splits between the root and `id`
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Split a node into its two halves.
    ///
    /// Idempotent: a node that already has children returns them unchanged.
    /// Fails with [`SubnetError::NotDividable`] for a `/32`.
    pub fn divide(&mut self, id: NodeId) -> Result<Children, SubnetError> {
        let node = self.node(id);
        if let Some(children) = node.children {
            return Ok(children);
        }
        let (low_cidr, high_cidr) = node
            .cidr
            .halves()
            .ok_or(SubnetError::NotDividable { cidr: node.cidr })?;

        let low = self.push(SubnetNode::new(low_cidr, Some(id)));
        let high = self.push(SubnetNode::new(high_cidr, Some(id)));
        let children = Children { low, high };
        self.node_mut(id).children = Some(children);

        trace!("Divided {} into {} and {}", self.node(id).cidr, low_cidr, high_cidr);
        Ok(children)
    }

    fn push(&mut self, node: SubnetNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Materialise every node down to `depth` levels below `from`.
    ///
    /// Branches stop early at `/32`.
    pub fn divide_recursively(&mut self, from: NodeId, depth: u8) {
        let mut pending = vec![(from, depth)];
        while let Some((id, remaining)) = pending.pop() {
            if remaining == 0 || self.node(id).size() >= ADDRESS_BITS {
                continue;
            }
            if let Ok(children) = self.divide(id) {
                pending.push((children.high, remaining - 1));
                pending.push((children.low, remaining - 1));
            }
        }
    }

    /// Materialise everything below `from` down to `/31` blocks
    pub fn initialize(&mut self, from: NodeId) {
        let depth = (ADDRESS_BITS - 1).saturating_sub(self.node(from).size());
        self.divide_recursively(from, depth);
    }

    /// Pre-order walk from `from`: node, then the whole low subtree, then the high one
    pub fn preorder(&self, from: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![from],
        }
    }

    /// Nodes under `from` (inclusive) matching every selector, in pre-order.
    ///
    /// An empty selector list matches every node.
    pub fn collect(&self, from: NodeId, selectors: &[Selector]) -> Vec<NodeId> {
        self.filter(from, |node| selectors.iter().all(|s| s.matches(node)))
    }

    /// Nodes under `from` (inclusive) for which `predicate` holds, in pre-order
    pub fn filter<F>(&self, from: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&SubnetNode) -> bool,
    {
        self.preorder(from)
            .filter(|&id| predicate(self.node(id)))
            .collect()
    }
}

/// Iterator returned by [`SubnetTree::preorder`]
pub struct Preorder<'a> {
    tree: &'a SubnetTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(children) = self.tree.node(id).children {
            self.stack.push(children.high);
            self.stack.push(children.low);
        }
        Some(id)
    }
}

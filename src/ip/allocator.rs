//! Reservation placement and free-block search.
//!
//! Reservations are placed either at an explicit block ([`SubnetTree::add_reservation`])
//! or at the lowest free block of a requested size ([`SubnetTree::find_free`]).
//! Both walk the tree top-down and split lazily along the path they visit.
//! Splits are kept even when the operation ends in an error.
//!
//! Every reserve/unreserve adjusts the sub-reservation counter of each
//! ancestor by exactly one, so the two are inverses along the whole path.

use log::debug;

use super::cidr::Cidr;
use super::error::SubnetError;
use super::tree::{NodeId, SubnetTree};

impl SubnetTree {
    /// Reserve the block written as `target` (e.g. `10.0.1.0/24`) somewhere under `from`.
    ///
    /// See [`SubnetTree::add_reservation_cidr`].
    pub fn add_reservation(
        &mut self,
        from: NodeId,
        target: &str,
        name: &str,
    ) -> Result<NodeId, SubnetError> {
        let target: Cidr = target.parse()?;
        self.add_reservation_cidr(from, target, name)
    }

    /// Reserve exactly `target` under `from`, splitting down to it as needed.
    ///
    /// Re-reserving with the same name succeeds without further changes. A
    /// block held under a different name yields [`SubnetError::AlreadyReserved`]
    /// carrying the matched node. The walk descends while the current block
    /// holds the target's base address. A target outside `from` yields
    /// [`SubnetError::DidNotFindSubnet`] at once. A target larger than `from`
    /// is searched for down to a `/32` first, and those splits are kept.
    pub fn add_reservation_cidr(
        &mut self,
        from: NodeId,
        target: Cidr,
        name: &str,
    ) -> Result<NodeId, SubnetError> {
        if name.is_empty() {
            return Err(SubnetError::EmptyReservationName);
        }

        let mut current = from;
        loop {
            let cidr = self.node(current).cidr();
            if cidr == target {
                self.reserve(current, name)?;
                return Ok(current);
            }
            if !cidr.contains_addr(target.network()) {
                return Err(self.not_found(from, target));
            }

            let children = match self.divide(current) {
                Ok(children) => children,
                Err(SubnetError::NotDividable { .. }) => return Err(self.not_found(from, target)),
                Err(e) => return Err(e),
            };
            current = if self.node(children.low).cidr().contains_addr(target.network()) {
                children.low
            } else {
                children.high
            };
        }
    }

    fn not_found(&self, from: NodeId, target: Cidr) -> SubnetError {
        SubnetError::DidNotFindSubnet {
            within: self.node(from).cidr(),
            wanted: target.to_string(),
        }
    }

    /// Reserve an already located node under `name`
    pub fn reserve(&mut self, id: NodeId, name: &str) -> Result<(), SubnetError> {
        if name.is_empty() {
            return Err(SubnetError::EmptyReservationName);
        }

        let node = self.node(id);
        match node.reservation() {
            Some(holder) if holder == name => {
                debug!("{} already reserved as '{}'", node.cidr(), name);
                Ok(())
            }
            Some(holder) => Err(SubnetError::AlreadyReserved {
                node: id,
                cidr: node.cidr(),
                holder: holder.to_string(),
            }),
            None => {
                self.node_mut(id).set_reservation(Some(name.to_string()));
                let ancestors: Vec<NodeId> = self.ancestors(id).collect();
                for ancestor in ancestors {
                    self.node_mut(ancestor).add_sub_reservation();
                }
                debug!("Reserved {} as '{}'", self.node(id).cidr(), name);
                Ok(())
            }
        }
    }

    /// Clear the reservation on `id`, returning the name it was held under
    pub fn unreserve(&mut self, id: NodeId) -> Result<String, SubnetError> {
        let name = self
            .node_mut(id)
            .set_reservation(None)
            .ok_or(SubnetError::NotReserved {
                cidr: self.node(id).cidr(),
            })?;

        let ancestors: Vec<NodeId> = self.ancestors(id).collect();
        for ancestor in ancestors {
            self.node_mut(ancestor).remove_sub_reservation();
        }
        debug!("Released {} (was '{}')", self.node(id).cidr(), name);
        Ok(name)
    }

    /// Find the lowest-addressed free `/prefix` block under `from`.
    ///
    /// A block is free when neither it nor anything below it is reserved.
    /// Low halves are searched before high halves. Fails with
    /// [`SubnetError::DidNotFindSubnet`] when no such block exists and with
    /// [`SubnetError::NotDividable`] when `prefix` is beyond `/32`.
    pub fn find_free(&mut self, from: NodeId, prefix: u8) -> Result<NodeId, SubnetError> {
        match self.search_free(from, prefix)? {
            Some(found) => {
                debug!("Found free /{} at {}", prefix, self.node(found).cidr());
                Ok(found)
            }
            None => Err(SubnetError::DidNotFindSubnet {
                within: self.node(from).cidr(),
                wanted: format!("/{}", prefix),
            }),
        }
    }

    /// [`find_free`](Self::find_free) followed by [`reserve`](Self::reserve).
    ///
    /// The two steps are not atomic; an `AlreadyReserved` from the second step
    /// means the block was taken in between and the call can be retried.
    pub fn find_free_and_reserve(
        &mut self,
        from: NodeId,
        prefix: u8,
        name: &str,
    ) -> Result<NodeId, SubnetError> {
        if name.is_empty() {
            return Err(SubnetError::EmptyReservationName);
        }
        let found = self.find_free(from, prefix)?;
        self.reserve(found, name)?;
        Ok(found)
    }

    fn search_free(&mut self, id: NodeId, prefix: u8) -> Result<Option<NodeId>, SubnetError> {
        let node = self.node(id);
        if node.size() == prefix && node.is_available() {
            return Ok(Some(id));
        }
        if node.is_reserved() || node.size() >= prefix {
            return Ok(None);
        }

        let children = self.divide(id)?;
        if let Some(found) = self.search_free(children.low, prefix)? {
            return Ok(Some(found));
        }
        self.search_free(children.high, prefix)
    }
}

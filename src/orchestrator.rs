//! Plan execution.
//!
//! Applies a validated [`Plan`] to a fresh [`SubnetTree`]: fixed reservations
//! first, then size requests, each in file order. Name conflicts on fixed
//! reservations and requests that cannot be satisfied are recorded and the
//! run continues. Any other failure aborts the run.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use serde::Serialize;

use crate::config::{Plan, SizeRequest};
use crate::ip::{Cidr, NodeId, SubnetError, SubnetTree};
use crate::render::{reservation_records, ReservationRecord};

/// Where an allocation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationSource {
    Fixed,
    Requested,
}

/// A block successfully reserved by a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub name: String,
    pub cidr: Cidr,
    pub source: AllocationSource,
    #[serde(skip)]
    pub node: NodeId,
}

/// A fixed reservation that collided with an existing holder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub cidr: Cidr,
    pub requested_by: String,
    pub held_by: String,
}

/// Result of executing a plan
#[derive(Debug)]
pub struct PlanOutcome {
    pub tree: SubnetTree,
    pub allocations: Vec<Allocation>,
    pub conflicts: Vec<Conflict>,
    pub unsatisfied: Vec<SizeRequest>,
}

impl PlanOutcome {
    /// True when every entry in the plan was honoured
    pub fn is_complete(&self) -> bool {
        self.conflicts.is_empty() && self.unsatisfied.is_empty()
    }

    /// Serializable summary of the final state
    pub fn report(&self) -> PlanReport {
        PlanReport {
            network: self.tree.root_node().cidr(),
            allocations: self.allocations.clone(),
            reservations: reservation_records(&self.tree, self.tree.root()),
            conflicts: self.conflicts.clone(),
            unsatisfied: self.unsatisfied.clone(),
        }
    }
}

/// Machine readable outcome of a plan run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub network: Cidr,
    /// What this run reserved, in plan order
    pub allocations: Vec<Allocation>,
    /// Every reservation in the tree, lowest address first
    pub reservations: Vec<ReservationRecord>,
    pub conflicts: Vec<Conflict>,
    pub unsatisfied: Vec<SizeRequest>,
}

/// Execute a plan against a new tree rooted at the plan's network
pub fn execute_plan(plan: &Plan) -> Result<PlanOutcome> {
    info!("Executing plan for network {}", plan.network);

    let mut tree = SubnetTree::new(plan.network);
    let root = tree.root();
    let mut allocations = Vec::new();
    let mut conflicts = Vec::new();
    let mut unsatisfied = Vec::new();

    for fixed in &plan.reservations {
        match tree.add_reservation_cidr(root, fixed.cidr, &fixed.name) {
            Ok(node) => {
                info!("Reserved {} for '{}'", fixed.cidr, fixed.name);
                allocations.push(Allocation {
                    name: fixed.name.clone(),
                    cidr: fixed.cidr,
                    source: AllocationSource::Fixed,
                    node,
                });
            }
            Err(SubnetError::AlreadyReserved { cidr, holder, .. }) => {
                warn!(
                    "Cannot reserve {} for '{}': already held by '{}'",
                    cidr, fixed.name, holder
                );
                conflicts.push(Conflict {
                    cidr,
                    requested_by: fixed.name.clone(),
                    held_by: holder,
                });
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| {
                    format!("Failed to reserve {} for '{}'", fixed.cidr, fixed.name)
                })
            }
        }
    }

    for request in &plan.requests {
        match tree.find_free_and_reserve(root, request.size, &request.name) {
            Ok(node) => {
                let cidr = tree.node(node).cidr();
                info!("Allocated {} for '{}'", cidr, request.name);
                allocations.push(Allocation {
                    name: request.name.clone(),
                    cidr,
                    source: AllocationSource::Requested,
                    node,
                });
            }
            Err(SubnetError::DidNotFindSubnet { .. }) => {
                warn!(
                    "No free /{} left in {} for '{}'",
                    request.size, plan.network, request.name
                );
                unsatisfied.push(request.clone());
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| {
                    format!("Failed to allocate /{} for '{}'", request.size, request.name)
                })
            }
        }
    }

    info!(
        "Plan finished: {} allocation(s), {} conflict(s), {} unsatisfied request(s)",
        allocations.len(),
        conflicts.len(),
        unsatisfied.len()
    );

    Ok(PlanOutcome {
        tree,
        allocations,
        conflicts,
        unsatisfied,
    })
}

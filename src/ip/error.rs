//! Errors raised by subnet parsing, reservation and search.

use super::cidr::Cidr;
use super::tree::NodeId;

/// Errors that can occur while building or querying a subnet tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("could not parse subnet specification '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("could not divide subnet {cidr}")]
    NotDividable { cidr: Cidr },

    /// The matched node is carried along so callers can still inspect it.
    #[error("subnet {cidr} is already reserved by '{holder}'")]
    AlreadyReserved {
        node: NodeId,
        cidr: Cidr,
        holder: String,
    },

    #[error("subnet {cidr} is not reserved")]
    NotReserved { cidr: Cidr },

    #[error("could not find suitable subnet {wanted} in {within}")]
    DidNotFindSubnet { within: Cidr, wanted: String },

    #[error("reservation name cannot be empty")]
    EmptyReservationName,
}

impl SubnetError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        SubnetError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

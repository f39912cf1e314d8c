use serde::{Deserialize, Serialize};

use crate::ip::addr::ADDRESS_BITS;
use crate::ip::Cidr;

/// An allocation plan: the network to carve up, the blocks that are already
/// spoken for, and the blocks to hand out by size
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Plan {
    /// Top-level block, e.g. `10.0.0.0/16`
    pub network: Cidr,
    /// Fixed reservations, applied first and in file order
    #[serde(default)]
    pub reservations: Vec<FixedReservation>,
    /// Size requests, served after all fixed reservations and in file order
    #[serde(default)]
    pub requests: Vec<SizeRequest>,
}

/// A block reserved at a known address
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FixedReservation {
    pub cidr: Cidr,
    pub name: String,
}

/// A request for any free block of the given prefix length
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SizeRequest {
    pub size: u8,
    pub name: String,
}

impl Plan {
    /// Validate the plan
    pub fn validate(&self) -> Result<(), ValidationError> {
        for reservation in &self.reservations {
            if reservation.name.trim().is_empty() {
                return Err(ValidationError::InvalidReservation(format!(
                    "name cannot be empty for {}",
                    reservation.cidr
                )));
            }
            if !self.network.contains(&reservation.cidr) {
                return Err(ValidationError::InvalidReservation(format!(
                    "{} ('{}') is not inside network {}",
                    reservation.cidr, reservation.name, self.network
                )));
            }
        }

        for request in &self.requests {
            if request.name.trim().is_empty() {
                return Err(ValidationError::InvalidRequest(format!(
                    "name cannot be empty for /{} request",
                    request.size
                )));
            }
            if request.size < self.network.prefix() || request.size > ADDRESS_BITS {
                return Err(ValidationError::InvalidRequest(format!(
                    "size /{} for '{}' must be between /{} and /{}",
                    request.size,
                    request.name,
                    self.network.prefix(),
                    ADDRESS_BITS
                )));
            }
        }

        Ok(())
    }
}

/// Plan validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid reservation: {0}")]
    InvalidReservation(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_parsing() {
        let yaml = r#"
network: 10.0.0.0/16
reservations:
  - cidr: 10.0.0.0/28
    name: "Preallocated 28"
requests:
  - size: 24
    name: "My new 24"
  - size: 28
    name: "Another 28"
"#;

        let plan: Plan = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plan.network.to_string(), "10.0.0.0/16");
        assert_eq!(plan.reservations.len(), 1);
        assert_eq!(plan.reservations[0].cidr.to_string(), "10.0.0.0/28");
        assert_eq!(plan.requests[1].size, 28);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_sections_are_optional() {
        let plan: Plan = serde_yaml::from_str("network: 192.168.0.0/24\n").unwrap();
        assert!(plan.reservations.is_empty());
        assert!(plan.requests.is_empty());
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_invalid_network_rejected_by_parser() {
        assert!(serde_yaml::from_str::<Plan>("network: 10.0.0.0/40\n").is_err());
        assert!(serde_yaml::from_str::<Plan>("network: not-a-network\n").is_err());
    }

    #[test]
    fn test_reservation_outside_network() {
        let yaml = r#"
network: 10.0.0.0/16
reservations:
  - cidr: 192.168.0.0/24
    name: elsewhere
"#;
        let plan: Plan = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            plan.validate(),
            Err(ValidationError::InvalidReservation(_))
        ));
    }

    #[test]
    fn test_empty_names() {
        let mut plan: Plan = serde_yaml::from_str("network: 10.0.0.0/16\n").unwrap();
        plan.reservations.push(FixedReservation {
            cidr: "10.0.0.0/24".parse().unwrap(),
            name: "  ".to_string(),
        });
        assert!(matches!(
            plan.validate(),
            Err(ValidationError::InvalidReservation(_))
        ));

        plan.reservations.clear();
        plan.requests.push(SizeRequest {
            size: 24,
            name: String::new(),
        });
        assert!(matches!(plan.validate(), Err(ValidationError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_size_bounds() {
        let mut plan: Plan = serde_yaml::from_str("network: 10.0.0.0/16\n").unwrap();
        for size in [8, 33] {
            plan.requests = vec![SizeRequest {
                size,
                name: "x".to_string(),
            }];
            assert!(matches!(plan.validate(), Err(ValidationError::InvalidRequest(_))));
        }
        for size in [16, 32] {
            plan.requests = vec![SizeRequest {
                size,
                name: "x".to_string(),
            }];
            assert!(plan.validate().is_ok());
        }
    }
}

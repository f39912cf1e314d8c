//! # Subnetcalc - hierarchical IPv4 subnet reservation
//!
//! This library tracks reservations inside a top-level IPv4 network block.
//! Callers either reserve a specific sub-block by address or ask for any free
//! block of a given size, and overlapping or duplicate reservations are
//! refused.
//!
//! ## Overview
//!
//! The address space is modelled as a binary partition tree. The root is the
//! whole network; every node can be split into a lower and an upper half one
//! prefix bit longer. Splits happen lazily, exactly along the paths that
//! reservations and searches visit, and are never undone.
//!
//! ## Architecture
//!
//! - `ip`: CIDR values, address arithmetic, the partition tree and its
//!   allocation algorithms
//! - `config`: allocation plan structures and validation
//! - `config_loader`: plan file loading
//! - `orchestrator`: applies a plan to a fresh tree
//! - `render`: tree dumps, reservation listings and JSON reports
//!
//! ## Example Usage
//!
//! ```rust
//! use subnetcalc::ip::{Selector, SubnetTree};
//!
//! let mut network = SubnetTree::parse("10.0.0.0/16")?;
//! let root = network.root();
//!
//! // Register a pre-defined subnet
//! network.add_reservation(root, "10.0.0.0/28", "Preallocated 28")?;
//!
//! // Find a free /24 and reserve it
//! let web = network.find_free_and_reserve(root, 24, "web")?;
//! assert_eq!(network.node(web).cidr().to_string(), "10.0.1.0/24");
//!
//! // Small blocks are packed next to existing ones
//! let db = network.find_free_and_reserve(root, 28, "db")?;
//! assert_eq!(network.node(db).cidr().to_string(), "10.0.0.16/28");
//!
//! let reserved = network.collect(root, &[Selector::Reserved]);
//! assert_eq!(reserved.len(), 3);
//! # Ok::<(), subnetcalc::ip::SubnetError>(())
//! ```
//!
//! ## Plan Format
//!
//! ```yaml
//! network: 10.0.0.0/16
//! reservations:
//!   - cidr: 10.0.0.0/28
//!     name: "Preallocated 28"
//! requests:
//!   - size: 24
//!     name: "My new 24"
//! ```
//!
//! ## Error Handling
//!
//! Tree operations return [`ip::SubnetError`]. Plan loading and execution
//! return `color_eyre::Result` with file and entry context attached.
//!
//! A tree has no internal locking; callers serialise all mutation.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod orchestrator;
pub mod render;

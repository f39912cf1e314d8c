//! IPv4 subnet allocation.
//!
//! This module carves a top-level network block into non-overlapping
//! reservations. A [`SubnetTree`] starts as a single root block and is split
//! in halves on demand while callers reserve specific blocks or ask for the
//! lowest free block of a given size.

pub mod addr;
pub mod allocator;
pub mod cidr;
pub mod error;
pub mod select;
pub mod tree;

// Re-export commonly used types
pub use cidr::Cidr;
pub use error::SubnetError;
pub use select::{select_available, select_reserved, select_with_size, Selector};
pub use tree::{Children, NodeId, SubnetNode, SubnetTree};

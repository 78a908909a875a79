// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Domain Models
//!
//! Value objects with validation invariants used by every construct, plus the
//! pure invariant functions that guard the resource graph.
//!
//! # Value Objects with Invariants
//!
//! - [`Ipv4Cidr`] - IPv4 block in CIDR notation (network address only)
//! - [`Port`] / [`PortSpec`] - transport port (1-65535) with protocol
//! - [`MaxAzs`] - availability zone count (1-6)
//! - [`LogicalId`] - template logical ID (alphanumeric, ≤255)
//! - [`StackName`] - stack name (letter first, alphanumeric and hyphens, ≤128)
//! - [`ResourceType`] - CloudFormation resource taxonomy

pub mod invariants;
pub mod logical_id;
pub mod network;
pub mod resource_type;

pub use invariants::{ValidationError, ValidationResult};
pub use logical_id::{LogicalId, LogicalIdError, StackName};
pub use network::{Ipv4Cidr, MaxAzs, NetworkError, Port, PortSpec, Protocol};
pub use resource_type::{ResourceCategory, ResourceType};

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Constructs
//!
//! Each construct declares one or more resources into a [`Stack`](crate::stack::Stack)
//! and returns a handle carrying the logical IDs and references that later
//! constructs wire against.

pub mod cluster;
pub mod fargate;
pub mod security_group;
pub mod vpc;

pub use cluster::Cluster;
pub use fargate::{
    ContainerImage, NetworkLoadBalancedFargateService, NetworkLoadBalancedFargateServiceProps,
    NetworkLoadBalancer, TaskDefinition,
};
pub use security_group::{IngressRule, Peer, SecurityGroup};
pub use vpc::{Subnet, SubnetType, Vpc, VpcProps};

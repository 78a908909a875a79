// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security groups and ingress rules

use serde_json::{json, Value};
use tracing::info;

use super::vpc::Vpc;
use crate::domain::{Ipv4Cidr, LogicalId, PortSpec, Protocol, ResourceType};
use crate::errors::StackResult;
use crate::stack::Stack;
use crate::template::{CfnResource, Intrinsic};

/// Source of inbound traffic
#[derive(Debug, Clone, PartialEq)]
pub enum Peer {
    /// A range resolved by the provisioning backend, e.g. a VPC's `CidrBlock`
    Ipv4(Intrinsic),
    /// A literal range
    Cidr(Ipv4Cidr),
}

impl Peer {
    /// Traffic from the range `cidr_block` resolves to
    pub fn ipv4(cidr_block: Intrinsic) -> Self {
        Self::Ipv4(cidr_block)
    }

    pub fn cidr(cidr: Ipv4Cidr) -> Self {
        Self::Cidr(cidr)
    }

    pub fn any_ipv4() -> Self {
        Self::Cidr(Ipv4Cidr::ANY)
    }

    /// Value of the rule's `CidrIp` property
    pub fn to_cidr_ip(&self) -> Value {
        match self {
            Self::Ipv4(reference) => reference.to_value(),
            Self::Cidr(cidr) => Value::String(cidr.as_cidr()),
        }
    }

    /// Whether the range is derived rather than written out
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Ipv4(_))
    }
}

/// A declared ingress rule
#[derive(Debug, Clone, PartialEq)]
pub struct IngressRule {
    pub logical_id: LogicalId,
    pub peer: Peer,
    pub port: PortSpec,
    pub description: String,
}

/// A declared security group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroup {
    logical_id: LogicalId,
}

impl SecurityGroup {
    /// Declare a group in `vpc` that allows all outbound traffic
    pub fn new(
        stack: &mut Stack,
        logical_id: LogicalId,
        description: &str,
        vpc: &Vpc,
    ) -> StackResult<Self> {
        stack.add_resource(CfnResource::new(
            logical_id.clone(),
            ResourceType::SecurityGroup,
            json!({
                "GroupDescription": description,
                "SecurityGroupEgress": [{
                    "CidrIp": "0.0.0.0/0",
                    "Description": "Allow all outbound traffic by default",
                    "IpProtocol": "-1",
                }],
                "VpcId": vpc.vpc_id(),
            }),
        ))?;

        Ok(Self { logical_id })
    }

    pub fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    pub fn group_id(&self) -> Intrinsic {
        Intrinsic::get_att(&self.logical_id, "GroupId")
    }

    /// Permit inbound `port` traffic from `peer`
    ///
    /// The rule is its own resource, named after the group, protocol and
    /// port, so opening the same port twice is rejected as a duplicate.
    pub fn add_ingress_rule(
        &self,
        stack: &mut Stack,
        peer: Peer,
        port: PortSpec,
        description: &str,
    ) -> StackResult<IngressRule> {
        let protocol = match port.protocol {
            Protocol::Tcp => "Tcp",
            Protocol::Udp => "Udp",
        };
        let logical_id = self
            .logical_id
            .child(&format!("Ingress{}{}", protocol, port.port))?;

        stack.add_resource(CfnResource::new(
            logical_id.clone(),
            ResourceType::SecurityGroupIngress,
            json!({
                "CidrIp": peer.to_cidr_ip(),
                "Description": description,
                "FromPort": port.port.value(),
                "GroupId": self.group_id(),
                "IpProtocol": port.protocol.as_ip_protocol(),
                "ToPort": port.port.value(),
            }),
        ))?;

        info!(
            stack = %stack.name(),
            group = %self.logical_id,
            rule = %logical_id,
            port = %port,
            derived_peer = peer.is_derived(),
            "Declared ingress rule"
        );

        Ok(IngressRule {
            logical_id,
            peer,
            port,
            description: description.to_string(),
        })
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Resource Type Domain Model
//!
//! Defines the taxonomy of CloudFormation resource types this crate can
//! declare, together with the category each one belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CloudFormation resource type taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    // Networking
    /// Virtual private cloud
    Vpc,
    /// Subnet inside a VPC
    Subnet,
    /// Route table
    RouteTable,
    /// Route table to subnet binding
    SubnetRouteTableAssociation,
    /// Single route entry
    Route,
    /// Internet gateway
    InternetGateway,
    /// Internet gateway to VPC binding
    VpcGatewayAttachment,
    /// Elastic IP address
    Eip,
    /// NAT gateway
    NatGateway,

    // Security
    /// Security group
    SecurityGroup,
    /// Standalone security group ingress rule
    SecurityGroupIngress,

    // Containers
    /// ECS cluster
    EcsCluster,
    /// ECS task definition
    EcsTaskDefinition,
    /// ECS service
    EcsService,

    // Load balancing
    /// Application or network load balancer
    LoadBalancer,
    /// Load balancer listener
    Listener,
    /// Load balancer target group
    TargetGroup,

    // Identity
    /// IAM role
    IamRole,
    /// IAM inline policy
    IamPolicy,

    // Logging
    /// CloudWatch Logs log group
    LogGroup,
}

impl ResourceType {
    /// Get the CloudFormation type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vpc => "AWS::EC2::VPC",
            Self::Subnet => "AWS::EC2::Subnet",
            Self::RouteTable => "AWS::EC2::RouteTable",
            Self::SubnetRouteTableAssociation => "AWS::EC2::SubnetRouteTableAssociation",
            Self::Route => "AWS::EC2::Route",
            Self::InternetGateway => "AWS::EC2::InternetGateway",
            Self::VpcGatewayAttachment => "AWS::EC2::VPCGatewayAttachment",
            Self::Eip => "AWS::EC2::EIP",
            Self::NatGateway => "AWS::EC2::NatGateway",
            Self::SecurityGroup => "AWS::EC2::SecurityGroup",
            Self::SecurityGroupIngress => "AWS::EC2::SecurityGroupIngress",
            Self::EcsCluster => "AWS::ECS::Cluster",
            Self::EcsTaskDefinition => "AWS::ECS::TaskDefinition",
            Self::EcsService => "AWS::ECS::Service",
            Self::LoadBalancer => "AWS::ElasticLoadBalancingV2::LoadBalancer",
            Self::Listener => "AWS::ElasticLoadBalancingV2::Listener",
            Self::TargetGroup => "AWS::ElasticLoadBalancingV2::TargetGroup",
            Self::IamRole => "AWS::IAM::Role",
            Self::IamPolicy => "AWS::IAM::Policy",
            Self::LogGroup => "AWS::Logs::LogGroup",
        }
    }

    /// Parse a CloudFormation type name
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    /// Every known resource type
    pub fn all() -> &'static [ResourceType] {
        &[
            Self::Vpc,
            Self::Subnet,
            Self::RouteTable,
            Self::SubnetRouteTableAssociation,
            Self::Route,
            Self::InternetGateway,
            Self::VpcGatewayAttachment,
            Self::Eip,
            Self::NatGateway,
            Self::SecurityGroup,
            Self::SecurityGroupIngress,
            Self::EcsCluster,
            Self::EcsTaskDefinition,
            Self::EcsService,
            Self::LoadBalancer,
            Self::Listener,
            Self::TargetGroup,
            Self::IamRole,
            Self::IamPolicy,
            Self::LogGroup,
        ]
    }

    /// Get the primary category for this resource type
    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::Vpc
            | Self::Subnet
            | Self::RouteTable
            | Self::SubnetRouteTableAssociation
            | Self::Route
            | Self::InternetGateway
            | Self::VpcGatewayAttachment
            | Self::Eip
            | Self::NatGateway => ResourceCategory::Network,

            Self::SecurityGroup | Self::SecurityGroupIngress => ResourceCategory::Security,

            Self::EcsCluster | Self::EcsTaskDefinition | Self::EcsService => {
                ResourceCategory::Compute
            }

            Self::LoadBalancer | Self::Listener | Self::TargetGroup => {
                ResourceCategory::LoadBalancing
            }

            Self::IamRole | Self::IamPolicy => ResourceCategory::Identity,

            Self::LogGroup => ResourceCategory::Logging,
        }
    }

    /// Attributes readable through `Fn::GetAtt` that this crate relies on
    pub fn known_attributes(&self) -> &'static [&'static str] {
        match self {
            Self::Vpc => &["CidrBlock", "DefaultSecurityGroup", "VpcId"],
            Self::Subnet => &["AvailabilityZone", "SubnetId"],
            Self::Eip => &["AllocationId", "PublicIp"],
            Self::SecurityGroup => &["GroupId", "VpcId"],
            Self::EcsCluster => &["Arn"],
            Self::EcsService => &["Name", "ServiceArn"],
            Self::LoadBalancer => &[
                "DNSName",
                "LoadBalancerArn",
                "LoadBalancerFullName",
                "CanonicalHostedZoneID",
            ],
            Self::TargetGroup => &["TargetGroupArn", "TargetGroupFullName"],
            Self::IamRole => &["Arn", "RoleId"],
            Self::LogGroup => &["Arn"],
            _ => &[],
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resource category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Network,
    Security,
    Compute,
    LoadBalancing,
    Identity,
    Logging,
}

impl ResourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Security => "security",
            Self::Compute => "compute",
            Self::LoadBalancing => "load_balancing",
            Self::Identity => "identity",
            Self::Logging => "logging",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for ty in ResourceType::all() {
            assert_eq!(ResourceType::parse(ty.as_str()), Some(*ty));
        }
        assert_eq!(ResourceType::parse("AWS::S3::Bucket"), None);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ResourceType::Vpc.category(), ResourceCategory::Network);
        assert_eq!(ResourceType::EcsService.category(), ResourceCategory::Compute);
        assert_eq!(
            ResourceType::SecurityGroupIngress.category(),
            ResourceCategory::Security
        );
        assert_eq!(
            ResourceType::LoadBalancer.category(),
            ResourceCategory::LoadBalancing
        );
    }

    #[test]
    fn test_known_attributes() {
        assert!(ResourceType::Vpc.known_attributes().contains(&"CidrBlock"));
        assert!(ResourceType::LoadBalancer.known_attributes().contains(&"DNSName"));
        assert!(ResourceType::Route.known_attributes().is_empty());
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! VPC construct
//!
//! One public and one private subnet per availability zone. Public subnets
//! route to an internet gateway; each private subnet routes through the NAT
//! gateway placed in the public subnet of the same zone.

use serde_json::json;
use tracing::info;

use crate::domain::invariants::{validate_subnet_layout, validate_vpc_cidr};
use crate::domain::{Ipv4Cidr, LogicalId, MaxAzs, ResourceType};
use crate::errors::StackResult;
use crate::stack::Stack;
use crate::template::{CfnResource, Intrinsic};

/// Destination of a default route
const ANY_IPV4: &str = "0.0.0.0/0";

/// VPC configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcProps {
    pub cidr: Ipv4Cidr,
    pub max_azs: MaxAzs,
}

impl VpcProps {
    /// Default address range of a VPC
    pub const DEFAULT_CIDR: &'static str = "10.0.0.0/16";
}

impl Default for VpcProps {
    fn default() -> Self {
        Self {
            cidr: Ipv4Cidr::DEFAULT_VPC,
            max_azs: MaxAzs::default(),
        }
    }
}

/// Whether a subnet is reachable from the internet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubnetType {
    Public,
    Private,
}

impl SubnetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
        }
    }
}

/// A declared subnet and its routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub logical_id: LogicalId,
    pub route_table: LogicalId,
    pub default_route: LogicalId,
    pub association: LogicalId,
    pub cidr: Ipv4Cidr,
    pub az_index: usize,
    pub subnet_type: SubnetType,
}

impl Subnet {
    pub fn subnet_id(&self) -> Intrinsic {
        Intrinsic::reference(&self.logical_id)
    }
}

/// A declared VPC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vpc {
    logical_id: LogicalId,
    cidr: Ipv4Cidr,
    max_azs: MaxAzs,
    internet_gateway: LogicalId,
    gateway_attachment: LogicalId,
    public_subnets: Vec<Subnet>,
    private_subnets: Vec<Subnet>,
    nat_gateways: Vec<LogicalId>,
}

impl Vpc {
    /// Declare a VPC and its subnets, gateways and routes in `stack`
    pub fn new(stack: &mut Stack, id: &str, props: VpcProps) -> StackResult<Self> {
        validate_vpc_cidr(&props.cidr)?;

        let azs = props.max_azs.value();
        let blocks = props.cidr.split(azs * 2)?;
        validate_subnet_layout(&props.cidr, &blocks)?;

        let path = stack.path(&[id]);
        let vpc_id = LogicalId::from_path(&[id])?;
        stack.add_resource(CfnResource::new(
            vpc_id.clone(),
            ResourceType::Vpc,
            json!({
                "CidrBlock": props.cidr.as_cidr(),
                "EnableDnsHostnames": true,
                "EnableDnsSupport": true,
                "InstanceTenancy": "default",
                "Tags": name_tag(path.clone()),
            }),
        ))?;

        let igw = vpc_id.child("IGW")?;
        stack.add_resource(CfnResource::new(
            igw.clone(),
            ResourceType::InternetGateway,
            json!({ "Tags": name_tag(path) }),
        ))?;

        let attachment = vpc_id.child("VPCGW")?;
        stack.add_resource(CfnResource::new(
            attachment.clone(),
            ResourceType::VpcGatewayAttachment,
            json!({
                "InternetGatewayId": Intrinsic::reference(&igw),
                "VpcId": Intrinsic::reference(&vpc_id),
            }),
        ))?;

        let mut vpc = Self {
            logical_id: vpc_id,
            cidr: props.cidr,
            max_azs: props.max_azs,
            internet_gateway: igw,
            gateway_attachment: attachment,
            public_subnets: Vec::with_capacity(azs),
            private_subnets: Vec::with_capacity(azs),
            nat_gateways: Vec::with_capacity(azs),
        };

        // Public blocks come first, then private, each in zone order.
        let (public_blocks, private_blocks) = blocks.split_at(azs);

        for (az, block) in public_blocks.iter().enumerate() {
            let subnet = vpc.declare_subnet(stack, id, SubnetType::Public, az, *block)?;
            let nat = vpc.declare_nat_gateway(stack, id, &subnet)?;
            vpc.public_subnets.push(subnet);
            vpc.nat_gateways.push(nat);
        }

        for (az, block) in private_blocks.iter().enumerate() {
            let subnet = vpc.declare_subnet(stack, id, SubnetType::Private, az, *block)?;
            vpc.private_subnets.push(subnet);
        }

        info!(
            stack = %stack.name(),
            vpc = %vpc.logical_id,
            cidr = %vpc.cidr,
            azs,
            "Declared VPC"
        );

        Ok(vpc)
    }

    fn declare_subnet(
        &self,
        stack: &mut Stack,
        id: &str,
        subnet_type: SubnetType,
        az: usize,
        cidr: Ipv4Cidr,
    ) -> StackResult<Subnet> {
        let name = format!("{}Subnet{}", subnet_type.as_str(), az + 1);
        let path = stack.path(&[id, name.as_str()]);
        let base = self.logical_id.child(&name)?;

        let subnet_id = base.child("Subnet")?;
        let is_public = subnet_type == SubnetType::Public;
        stack.add_resource(CfnResource::new(
            subnet_id.clone(),
            ResourceType::Subnet,
            json!({
                "AvailabilityZone": Intrinsic::availability_zone(az),
                "CidrBlock": cidr.as_cidr(),
                "MapPublicIpOnLaunch": is_public,
                "Tags": [
                    { "Key": "aws-cdk:subnet-name", "Value": subnet_type.as_str() },
                    { "Key": "aws-cdk:subnet-type", "Value": subnet_type.as_str() },
                    { "Key": "Name", "Value": path },
                ],
                "VpcId": self.vpc_id(),
            }),
        ))?;

        let route_table = base.child("RouteTable")?;
        stack.add_resource(CfnResource::new(
            route_table.clone(),
            ResourceType::RouteTable,
            json!({
                "Tags": name_tag(path),
                "VpcId": self.vpc_id(),
            }),
        ))?;

        let association = base.child("RouteTableAssociation")?;
        stack.add_resource(CfnResource::new(
            association.clone(),
            ResourceType::SubnetRouteTableAssociation,
            json!({
                "RouteTableId": Intrinsic::reference(&route_table),
                "SubnetId": Intrinsic::reference(&subnet_id),
            }),
        ))?;

        let default_route = base.child("DefaultRoute")?;
        let route = match subnet_type {
            SubnetType::Public => CfnResource::new(
                default_route.clone(),
                ResourceType::Route,
                json!({
                    "DestinationCidrBlock": ANY_IPV4,
                    "GatewayId": Intrinsic::reference(&self.internet_gateway),
                    "RouteTableId": Intrinsic::reference(&route_table),
                }),
            )
            .depends_on(&self.gateway_attachment),
            SubnetType::Private => CfnResource::new(
                default_route.clone(),
                ResourceType::Route,
                json!({
                    "DestinationCidrBlock": ANY_IPV4,
                    "NatGatewayId": Intrinsic::reference(&self.nat_gateways[az]),
                    "RouteTableId": Intrinsic::reference(&route_table),
                }),
            ),
        };
        stack.add_resource(route)?;

        Ok(Subnet {
            logical_id: subnet_id,
            route_table,
            default_route,
            association,
            cidr,
            az_index: az,
            subnet_type,
        })
    }

    fn declare_nat_gateway(
        &self,
        stack: &mut Stack,
        id: &str,
        subnet: &Subnet,
    ) -> StackResult<LogicalId> {
        let name = format!("PublicSubnet{}", subnet.az_index + 1);
        let path = stack.path(&[id, name.as_str()]);
        let base = self.logical_id.child(&name)?;

        let eip = base.child("EIP")?;
        stack.add_resource(CfnResource::new(
            eip.clone(),
            ResourceType::Eip,
            json!({
                "Domain": "vpc",
                "Tags": name_tag(path.clone()),
            }),
        ))?;

        let nat = base.child("NATGateway")?;
        stack.add_resource(
            CfnResource::new(
                nat.clone(),
                ResourceType::NatGateway,
                json!({
                    "AllocationId": Intrinsic::get_att(&eip, "AllocationId"),
                    "SubnetId": subnet.subnet_id(),
                    "Tags": name_tag(path),
                }),
            )
            .depends_on(&subnet.default_route)
            .depends_on(&subnet.association),
        )?;

        Ok(nat)
    }

    pub fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    /// `{"Ref": <vpc>}`
    pub fn vpc_id(&self) -> Intrinsic {
        Intrinsic::reference(&self.logical_id)
    }

    /// The address range as the provisioning backend reports it
    pub fn cidr_block(&self) -> Intrinsic {
        Intrinsic::get_att(&self.logical_id, "CidrBlock")
    }

    /// The configured address range
    pub fn cidr(&self) -> Ipv4Cidr {
        self.cidr
    }

    pub fn max_azs(&self) -> MaxAzs {
        self.max_azs
    }

    pub fn public_subnets(&self) -> &[Subnet] {
        &self.public_subnets
    }

    pub fn private_subnets(&self) -> &[Subnet] {
        &self.private_subnets
    }

    pub fn public_subnet_ids(&self) -> Vec<Intrinsic> {
        self.public_subnets.iter().map(Subnet::subnet_id).collect()
    }

    pub fn private_subnet_ids(&self) -> Vec<Intrinsic> {
        self.private_subnets.iter().map(Subnet::subnet_id).collect()
    }

    /// Routes that must exist before anything internet-facing is reachable
    pub fn public_default_routes(&self) -> impl Iterator<Item = &LogicalId> {
        self.public_subnets.iter().map(|s| &s.default_route)
    }

    /// `Fn::Select [i, Fn::GetAZs ""]` for every zone the VPC spans
    pub fn availability_zones(&self) -> Vec<Intrinsic> {
        (0..self.max_azs.value()).map(Intrinsic::availability_zone).collect()
    }
}

fn name_tag(value: String) -> serde_json::Value {
    json!([{ "Key": "Name", "Value": value }])
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! The Fargate demo stack
//!
//! Network, then cluster, then service, then the ingress rule, then the
//! output. Every later step is wired to handles returned by earlier ones, so
//! the rule's source range and the output value are references, never
//! literals.

use tracing::info;

use crate::app::App;
use crate::constructs::{
    Cluster, ContainerImage, IngressRule, NetworkLoadBalancedFargateService,
    NetworkLoadBalancedFargateServiceProps, Peer, Vpc, VpcProps,
};
use crate::domain::invariants::validate_ingress_matches_listener;
use crate::domain::{Ipv4Cidr, LogicalId, MaxAzs, Port, PortSpec, StackName};
use crate::errors::{StackError, StackResult};
use crate::stack::{Environment, Stack};
use crate::template::CfnOutput;

/// Construct ID of the VPC
pub const VPC_ID: &str = "MyVpc";

/// Construct ID of the cluster
pub const CLUSTER_ID: &str = "circleci-multiarch-demo";

/// Construct ID of the service
pub const SERVICE_ID: &str = "FargateService";

/// Logical ID of the load balancer DNS output
pub const OUTPUT_ID: &str = "LoadBalancerDNS";

/// Availability zones the VPC spans
pub const MAX_AZS: u32 = 2;

/// Image the service runs
pub const SAMPLE_IMAGE: &str = "amazon/amazon-ecs-sample";

/// Port the service listens on and the ingress rule opens
pub const SERVICE_PORT: u32 = 8080;

/// Description of the ingress rule
pub const INGRESS_DESCRIPTION: &str = "Allow http inbound from VPC";

/// Inputs of the stack besides its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FargateStackProps {
    pub environment: Environment,
    pub vpc_cidr: Ipv4Cidr,
}

impl Default for FargateStackProps {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            vpc_cidr: Ipv4Cidr::DEFAULT_VPC,
        }
    }
}

/// Handles to everything the stack declared
#[derive(Debug, Clone)]
pub struct FargateStack {
    pub name: StackName,
    pub vpc: Vpc,
    pub cluster: Cluster,
    pub service: NetworkLoadBalancedFargateService,
    pub ingress: IngressRule,
    pub load_balancer_dns: CfnOutput,
}

impl FargateStack {
    /// Define the stack in `app` with default props
    pub fn define(app: &mut App, id: &str) -> StackResult<Self> {
        Self::define_with(app, id, FargateStackProps::default())
    }

    /// Define the stack in `app`
    ///
    /// The stack is built detached and added to `app` only once every step
    /// succeeded, so a failed definition leaves `app` unchanged.
    pub fn define_with(app: &mut App, id: &str, props: FargateStackProps) -> StackResult<Self> {
        let mut stack = app.detached_stack(id, props.environment.clone())?;
        let defined = Self::declare(&mut stack, &props)?;
        app.insert(stack)?;

        info!(stack = %defined.name, "Defined Fargate stack");
        Ok(defined)
    }

    fn declare(stack: &mut Stack, props: &FargateStackProps) -> StackResult<Self> {
        let name = stack.name().clone();

        let vpc = Vpc::new(
            stack,
            VPC_ID,
            VpcProps {
                cidr: props.vpc_cidr,
                max_azs: MaxAzs::new(MAX_AZS)?,
            },
        )?;

        let cluster = Cluster::new(stack, CLUSTER_ID, &vpc)?;

        let service = NetworkLoadBalancedFargateService::new(
            stack,
            SERVICE_ID,
            NetworkLoadBalancedFargateServiceProps::new(
                &cluster,
                ContainerImage::from_registry(SAMPLE_IMAGE)?,
                Port::new(SERVICE_PORT)?,
            ),
        )?;

        let rule_port = PortSpec::tcp(SERVICE_PORT)?;
        validate_ingress_matches_listener(rule_port, service.listener_port())?;

        let security_group = service.security_groups().first().ok_or_else(|| {
            StackError::Configuration(format!("{} has no security group", SERVICE_ID))
        })?;
        let ingress = security_group.add_ingress_rule(
            stack,
            Peer::ipv4(vpc.cidr_block()),
            rule_port,
            INGRESS_DESCRIPTION,
        )?;

        let output = CfnOutput::new(
            LogicalId::new(OUTPUT_ID)?,
            service.load_balancer().load_balancer_dns_name(),
        );
        let load_balancer_dns = stack.add_output(output)?.clone();

        Ok(Self {
            name,
            vpc,
            cluster,
            service,
            ingress,
            load_balancer_dns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_define_wires_every_step() {
        let mut app = App::new();
        let defined = FargateStack::define(&mut app, "CdkStack").unwrap();

        assert_eq!(defined.name.as_str(), "CdkStack");
        assert_eq!(defined.cluster.vpc().logical_id(), defined.vpc.logical_id());
        assert_eq!(defined.ingress.port, defined.service.listener_port());
        assert_eq!(
            defined.load_balancer_dns.value,
            json!({"Fn::GetAtt": ["FargateServiceLB", "DNSName"]})
        );
        assert!(app.stack("CdkStack").unwrap().validate().is_ok());
    }

    #[test]
    fn test_define_twice_in_one_app_is_rejected() {
        let mut app = App::new();
        FargateStack::define(&mut app, "CdkStack").unwrap();
        assert!(matches!(
            FargateStack::define(&mut app, "CdkStack"),
            Err(StackError::DuplicateStack(_))
        ));
    }

    #[test]
    fn test_failed_definition_leaves_app_unchanged() {
        let mut app = App::new();
        let props = FargateStackProps {
            vpc_cidr: Ipv4Cidr::new("10.0.0.0/8").unwrap(),
            ..Default::default()
        };
        assert!(FargateStack::define_with(&mut app, "CdkStack", props).is_err());
        assert!(app.stacks().is_empty());

        FargateStack::define(&mut app, "CdkStack").unwrap();
        assert_eq!(app.stacks().len(), 1);
        assert!(app.synth().is_ok());
    }

    #[test_case("10.0.0.0/27" ; "slash 27")]
    #[test_case("10.0.0.0/28" ; "slash 28")]
    fn test_vpc_too_small_for_two_azs_is_rejected(cidr: &str) {
        let mut app = App::new();
        let props = FargateStackProps {
            vpc_cidr: Ipv4Cidr::new(cidr).unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            FargateStack::define_with(&mut app, "CdkStack", props),
            Err(StackError::Validation(ValidationError::SubnetLayout(_)))
        ));
        assert!(app.stacks().is_empty());
    }

    #[test]
    fn test_largest_accepted_prefix_for_two_azs() {
        let mut app = App::new();
        let props = FargateStackProps {
            vpc_cidr: Ipv4Cidr::new("10.0.0.0/26").unwrap(),
            ..Default::default()
        };
        let defined = FargateStack::define_with(&mut app, "CdkStack", props).unwrap();
        assert!(defined
            .vpc
            .private_subnets()
            .iter()
            .all(|s| s.cidr.prefix_length() == 28));
    }
}

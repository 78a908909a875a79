// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Stack Synthesis
//!
//! For any VPC range the stack accepts, the ingress rule keeps pointing at
//! the VPC's own range and the template stays internally consistent.

use std::net::Ipv4Addr;

use fargate_stack::domain::{Ipv4Cidr, ResourceType, ValidationError};
use fargate_stack::{App, FargateStack, FargateStackProps, StackError};
use proptest::prelude::*;
use serde_json::json;

/// Largest VPC prefix that still carves two public and two private /28s
const LARGEST_TWO_AZ_PREFIX: u8 = 26;

fn arb_vpc_cidr() -> impl Strategy<Value = Ipv4Cidr> {
    (any::<u32>(), 16u8..=LARGEST_TWO_AZ_PREFIX).prop_map(|(raw, prefix)| {
        let mask = u32::MAX << (32 - u32::from(prefix));
        Ipv4Cidr::from_parts(Ipv4Addr::from(raw & mask), prefix).unwrap()
    })
}

fn define(cidr: Ipv4Cidr) -> App {
    let mut app = App::new();
    let props = FargateStackProps {
        vpc_cidr: cidr,
        ..Default::default()
    };
    FargateStack::define_with(&mut app, "CdkStack", props).unwrap();
    app
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: the ingress source is derived from the VPC, never a literal
    #[test]
    fn prop_ingress_source_is_vpc_range(cidr in arb_vpc_cidr()) {
        let template = define(cidr).stack("CdkStack").unwrap().synthesize().unwrap();

        let rules = template.resources_of_type(ResourceType::SecurityGroupIngress);
        prop_assert_eq!(rules.len(), 1);
        prop_assert_eq!(
            &rules[0].1.properties["CidrIp"],
            &json!({"Fn::GetAtt": ["MyVpc", "CidrBlock"]})
        );
        prop_assert_eq!(
            &template.resource("MyVpc").unwrap().properties["CidrBlock"],
            &json!(cidr.as_cidr())
        );
    }

    /// Property: every subnet carved for the stack lies inside the VPC
    #[test]
    fn prop_subnets_inside_vpc(cidr in arb_vpc_cidr()) {
        let template = define(cidr).stack("CdkStack").unwrap().synthesize().unwrap();

        for (id, subnet) in template.resources_of_type(ResourceType::Subnet) {
            let block = subnet.properties["CidrBlock"].as_str().unwrap();
            let block = Ipv4Cidr::new(block).unwrap();
            prop_assert!(cidr.contains(&block), "{} ({}) not in {}", id, block, cidr);
        }
    }

    /// Property: two definitions with the same inputs synthesize identically
    #[test]
    fn prop_synthesis_is_repeatable(cidr in arb_vpc_cidr()) {
        let first = define(cidr).synth().unwrap().render().unwrap();
        let second = define(cidr).synth().unwrap().render().unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    /// Property: ranges too small for four /28 subnets are rejected and leave
    /// the app empty
    #[test]
    fn prop_small_vpc_is_rejected(
        raw in any::<u32>(),
        prefix in (LARGEST_TWO_AZ_PREFIX + 1)..=28u8,
    ) {
        let mask = u32::MAX << (32 - u32::from(prefix));
        let cidr = Ipv4Cidr::from_parts(Ipv4Addr::from(raw & mask), prefix).unwrap();

        let mut app = App::new();
        let props = FargateStackProps {
            vpc_cidr: cidr,
            ..Default::default()
        };
        let result = FargateStack::define_with(&mut app, "CdkStack", props);
        prop_assert!(
            matches!(result, Err(StackError::Validation(ValidationError::SubnetLayout(_)))),
            "{} was not rejected as a subnet layout error",
            cidr
        );
        prop_assert!(app.stacks().is_empty());
    }
}

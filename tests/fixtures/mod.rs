// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for fargate-stack
//!
//! Every test defines the stack through these helpers so the logical IDs and
//! environments used in assertions stay in one place.

#![allow(dead_code)]

use fargate_stack::domain::Ipv4Cidr;
use fargate_stack::{App, CloudAssembly, Environment, FargateStack, FargateStackProps, Template};

pub const STACK_NAME: &str = "CdkStack";

pub const VPC: &str = "MyVpc";
pub const CLUSTER: &str = "circlecimultiarchdemo";
pub const SERVICE: &str = "FargateServiceService";
pub const LOAD_BALANCER: &str = "FargateServiceLB";
pub const LISTENER: &str = "FargateServiceLBPublicListener";
pub const TARGET_GROUP: &str = "FargateServiceLBPublicListenerECSGroup";
pub const TASK_DEFINITION: &str = "FargateServiceTaskDef";
pub const SECURITY_GROUP: &str = "FargateServiceServiceSecurityGroup";
pub const INGRESS: &str = "FargateServiceServiceSecurityGroupIngressTcp8080";
pub const OUTPUT: &str = "LoadBalancerDNS";

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "us-west-2";

/// App with the stack defined under `name` and default props
pub fn app_named(name: &str) -> (App, FargateStack) {
    let mut app = App::new();
    let stack = FargateStack::define(&mut app, name).unwrap();
    (app, stack)
}

/// App with the stack defined under [`STACK_NAME`]
pub fn app() -> (App, FargateStack) {
    app_named(STACK_NAME)
}

/// App with the stack pinned to [`ACCOUNT`] and [`REGION`]
pub fn pinned_app() -> App {
    let mut app = App::new();
    let props = FargateStackProps {
        environment: Environment::new(ACCOUNT, REGION),
        ..Default::default()
    };
    FargateStack::define_with(&mut app, STACK_NAME, props).unwrap();
    app
}

/// Synthesized template of a stack defined with a custom VPC range
pub fn template_with_cidr(cidr: &str) -> Template {
    let mut app = App::new();
    let props = FargateStackProps {
        vpc_cidr: Ipv4Cidr::new(cidr).unwrap(),
        ..Default::default()
    };
    FargateStack::define_with(&mut app, STACK_NAME, props).unwrap();
    app.stack(STACK_NAME).unwrap().synthesize().unwrap()
}

pub fn assembly() -> CloudAssembly {
    app().0.synth().unwrap()
}

pub fn template() -> Template {
    assembly().template(STACK_NAME).unwrap().clone()
}

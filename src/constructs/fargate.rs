// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network-load-balanced Fargate service
//!
//! Declares, in dependency order:
//!
//! ```text
//! LB ─> TargetGroup ─> Listener
//! TaskRole, ExecutionRole ─> LogGroup ─> ExecutionRolePolicy ─> TaskDefinition
//! SecurityGroup ─> Service (private subnets, bound to TargetGroup)
//! ```

use serde_json::json;
use tracing::info;

use super::cluster::Cluster;
use super::security_group::SecurityGroup;
use crate::domain::invariants::{validate_image_reference, validate_task_size};
use crate::domain::{LogicalId, Port, PortSpec, Protocol, ResourceType};
use crate::errors::StackResult;
use crate::stack::Stack;
use crate::template::{CfnResource, Intrinsic, PseudoParameter};

/// Name of the single container in the task
pub const CONTAINER_NAME: &str = "web";

const ECS_TASKS_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";
const POLICY_VERSION: &str = "2012-10-17";

/// A container image pulled from a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    name: String,
}

impl ContainerImage {
    /// Reference an image by name, e.g. `amazon/amazon-ecs-sample`
    pub fn from_registry(name: impl Into<String>) -> StackResult<Self> {
        let name = name.into();
        validate_image_reference(&name)?;
        Ok(Self { name })
    }

    pub fn image_name(&self) -> &str {
        &self.name
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct NetworkLoadBalancedFargateServiceProps<'a> {
    pub cluster: &'a Cluster,
    pub image: ContainerImage,
    /// Port the load balancer listens on and the container serves
    pub listener_port: Port,
    pub desired_count: u32,
    /// CPU units
    pub cpu: u32,
    pub memory_mib: u32,
    pub public_load_balancer: bool,
}

impl<'a> NetworkLoadBalancedFargateServiceProps<'a> {
    /// Defaults: one task, 256 CPU units, 512 MiB, internet-facing
    pub fn new(cluster: &'a Cluster, image: ContainerImage, listener_port: Port) -> Self {
        Self {
            cluster,
            image,
            listener_port,
            desired_count: 1,
            cpu: 256,
            memory_mib: 512,
            public_load_balancer: true,
        }
    }
}

/// The task definition and its one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub logical_id: LogicalId,
    pub container_name: String,
    pub image: ContainerImage,
    pub container_port: Port,
    pub task_role: LogicalId,
    pub execution_role: LogicalId,
    pub log_group: LogicalId,
}

/// A declared network load balancer with one listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkLoadBalancer {
    pub logical_id: LogicalId,
    pub listener: LogicalId,
    pub target_group: LogicalId,
    pub listener_port: PortSpec,
}

impl NetworkLoadBalancer {
    pub fn load_balancer_arn(&self) -> Intrinsic {
        Intrinsic::reference(&self.logical_id)
    }

    pub fn load_balancer_dns_name(&self) -> Intrinsic {
        Intrinsic::get_att(&self.logical_id, "DNSName")
    }
}

/// A declared Fargate service behind a network load balancer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkLoadBalancedFargateService {
    service: LogicalId,
    cluster: LogicalId,
    load_balancer: NetworkLoadBalancer,
    task_definition: TaskDefinition,
    security_groups: Vec<SecurityGroup>,
}

impl NetworkLoadBalancedFargateService {
    pub fn new(
        stack: &mut Stack,
        id: &str,
        props: NetworkLoadBalancedFargateServiceProps<'_>,
    ) -> StackResult<Self> {
        validate_task_size(props.cpu, props.memory_mib)?;

        let base = LogicalId::from_path(&[id])?;
        let cluster = props.cluster;
        let vpc = cluster.vpc();
        let listener_port = PortSpec {
            protocol: Protocol::Tcp,
            port: props.listener_port,
        };

        let load_balancer = Self::declare_load_balancer(stack, &base, &props, listener_port)?;
        let task_definition = Self::declare_task_definition(stack, id, &base, &props)?;

        let group_description = stack.path(&[id, "Service", "SecurityGroup"]);
        let security_group = SecurityGroup::new(
            stack,
            base.child("ServiceSecurityGroup")?,
            &group_description,
            vpc,
        )?;

        let service = base.child("Service")?;
        stack.add_resource(
            CfnResource::new(
                service.clone(),
                ResourceType::EcsService,
                json!({
                    "Cluster": cluster.cluster_name(),
                    "DeploymentConfiguration": {
                        "MaximumPercent": 200,
                        "MinimumHealthyPercent": 50,
                    },
                    "DesiredCount": props.desired_count,
                    "EnableECSManagedTags": false,
                    "HealthCheckGracePeriodSeconds": 60,
                    "LaunchType": "FARGATE",
                    "LoadBalancers": [{
                        "ContainerName": task_definition.container_name,
                        "ContainerPort": task_definition.container_port.value(),
                        "TargetGroupArn": Intrinsic::reference(&load_balancer.target_group),
                    }],
                    "NetworkConfiguration": {
                        "AwsvpcConfiguration": {
                            "AssignPublicIp": "DISABLED",
                            "SecurityGroups": [security_group.group_id()],
                            "Subnets": vpc.private_subnet_ids(),
                        },
                    },
                    "TaskDefinition": Intrinsic::reference(&task_definition.logical_id),
                }),
            )
            .depends_on(&load_balancer.target_group)
            .depends_on(&load_balancer.listener)
            .depends_on(&task_definition.task_role),
        )?;

        info!(
            stack = %stack.name(),
            service = %service,
            cluster = %cluster.logical_id(),
            image = %task_definition.image.image_name(),
            port = %listener_port,
            "Declared load-balanced Fargate service"
        );

        Ok(Self {
            service,
            cluster: cluster.logical_id().clone(),
            load_balancer,
            task_definition,
            security_groups: vec![security_group],
        })
    }

    fn declare_load_balancer(
        stack: &mut Stack,
        base: &LogicalId,
        props: &NetworkLoadBalancedFargateServiceProps<'_>,
        listener_port: PortSpec,
    ) -> StackResult<NetworkLoadBalancer> {
        let vpc = props.cluster.vpc();
        let scheme = if props.public_load_balancer {
            "internet-facing"
        } else {
            "internal"
        };
        let subnets = if props.public_load_balancer {
            vpc.public_subnet_ids()
        } else {
            vpc.private_subnet_ids()
        };

        let lb = base.child("LB")?;
        let mut resource = CfnResource::new(
            lb.clone(),
            ResourceType::LoadBalancer,
            json!({
                "LoadBalancerAttributes": [{
                    "Key": "deletion_protection.enabled",
                    "Value": "false",
                }],
                "Scheme": scheme,
                "Subnets": subnets,
                "Type": "network",
            }),
        );
        if props.public_load_balancer {
            for route in vpc.public_default_routes() {
                resource = resource.depends_on(route);
            }
        }
        stack.add_resource(resource)?;

        let target_group = lb.child("PublicListenerECSGroup")?;
        stack.add_resource(CfnResource::new(
            target_group.clone(),
            ResourceType::TargetGroup,
            json!({
                "Port": listener_port.port.value(),
                "Protocol": listener_port.protocol.as_listener_protocol(),
                "TargetType": "ip",
                "VpcId": vpc.vpc_id(),
            }),
        ))?;

        let listener = lb.child("PublicListener")?;
        stack.add_resource(CfnResource::new(
            listener.clone(),
            ResourceType::Listener,
            json!({
                "DefaultActions": [{
                    "TargetGroupArn": Intrinsic::reference(&target_group),
                    "Type": "forward",
                }],
                "LoadBalancerArn": Intrinsic::reference(&lb),
                "Port": listener_port.port.value(),
                "Protocol": listener_port.protocol.as_listener_protocol(),
            }),
        ))?;

        Ok(NetworkLoadBalancer {
            logical_id: lb,
            listener,
            target_group,
            listener_port,
        })
    }

    fn declare_task_definition(
        stack: &mut Stack,
        id: &str,
        base: &LogicalId,
        props: &NetworkLoadBalancedFargateServiceProps<'_>,
    ) -> StackResult<TaskDefinition> {
        let task_def = base.child("TaskDef")?;

        let task_role = task_def.child("TaskRole")?;
        stack.add_resource(CfnResource::new(
            task_role.clone(),
            ResourceType::IamRole,
            json!({ "AssumeRolePolicyDocument": assume_role_policy() }),
        ))?;

        let execution_role = task_def.child("ExecutionRole")?;
        stack.add_resource(CfnResource::new(
            execution_role.clone(),
            ResourceType::IamRole,
            json!({ "AssumeRolePolicyDocument": assume_role_policy() }),
        ))?;

        let log_group = task_def.child(&format!("{}LogGroup", CONTAINER_NAME))?;
        stack.add_resource(
            CfnResource::new(log_group.clone(), ResourceType::LogGroup, json!({}))
                .retain_on_delete(),
        )?;

        let execution_policy = execution_role.child("DefaultPolicy")?;
        stack.add_resource(CfnResource::new(
            execution_policy.clone(),
            ResourceType::IamPolicy,
            json!({
                "PolicyDocument": {
                    "Statement": [{
                        "Action": ["logs:CreateLogStream", "logs:PutLogEvents"],
                        "Effect": "Allow",
                        "Resource": Intrinsic::get_att(&log_group, "Arn"),
                    }],
                    "Version": POLICY_VERSION,
                },
                "PolicyName": execution_policy.as_str(),
                "Roles": [Intrinsic::reference(&execution_role)],
            }),
        ))?;

        let family = format!("{}{}", stack.name().as_str().replace('-', ""), task_def);
        stack.add_resource(CfnResource::new(
            task_def.clone(),
            ResourceType::EcsTaskDefinition,
            json!({
                "ContainerDefinitions": [{
                    "Essential": true,
                    "Image": props.image.image_name(),
                    "LogConfiguration": {
                        "LogDriver": "awslogs",
                        "Options": {
                            "awslogs-group": Intrinsic::reference(&log_group),
                            "awslogs-region": Intrinsic::Pseudo(PseudoParameter::Region),
                            "awslogs-stream-prefix": id,
                        },
                    },
                    "Name": CONTAINER_NAME,
                    "PortMappings": [{
                        "ContainerPort": props.listener_port.value(),
                        "Protocol": Protocol::Tcp.as_ip_protocol(),
                    }],
                }],
                "Cpu": props.cpu.to_string(),
                "ExecutionRoleArn": Intrinsic::get_att(&execution_role, "Arn"),
                "Family": family,
                "Memory": props.memory_mib.to_string(),
                "NetworkMode": "awsvpc",
                "RequiresCompatibilities": ["FARGATE"],
                "TaskRoleArn": Intrinsic::get_att(&task_role, "Arn"),
            }),
        ))?;

        Ok(TaskDefinition {
            logical_id: task_def,
            container_name: CONTAINER_NAME.to_string(),
            image: props.image.clone(),
            container_port: props.listener_port,
            task_role,
            execution_role,
            log_group,
        })
    }

    pub fn service_logical_id(&self) -> &LogicalId {
        &self.service
    }

    pub fn cluster_logical_id(&self) -> &LogicalId {
        &self.cluster
    }

    pub fn load_balancer(&self) -> &NetworkLoadBalancer {
        &self.load_balancer
    }

    pub fn task_definition(&self) -> &TaskDefinition {
        &self.task_definition
    }

    /// Security groups attached to the service's tasks
    pub fn security_groups(&self) -> &[SecurityGroup] {
        &self.security_groups
    }

    /// Protocol and port clients reach the service on
    pub fn listener_port(&self) -> PortSpec {
        self.load_balancer.listener_port
    }
}

fn assume_role_policy() -> serde_json::Value {
    json!({
        "Statement": [{
            "Action": "sts:AssumeRole",
            "Effect": "Allow",
            "Principal": { "Service": ECS_TASKS_PRINCIPAL },
        }],
        "Version": POLICY_VERSION,
    })
}

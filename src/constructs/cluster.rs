// Copyright (c) 2025 - Cowboy AI, Inc.
//! ECS cluster construct

use serde_json::json;
use tracing::info;

use super::vpc::Vpc;
use crate::domain::{LogicalId, ResourceType};
use crate::errors::StackResult;
use crate::stack::Stack;
use crate::template::{CfnResource, Intrinsic};

/// A declared ECS cluster bound to a VPC
///
/// The cluster resource itself has no network properties; the binding is
/// recorded as an explicit dependency on the VPC and carried here so that
/// services placed on the cluster land in its subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    logical_id: LogicalId,
    vpc: Vpc,
}

impl Cluster {
    pub fn new(stack: &mut Stack, id: &str, vpc: &Vpc) -> StackResult<Self> {
        let logical_id = LogicalId::from_path(&[id])?;

        stack.add_resource(
            CfnResource::new(logical_id.clone(), ResourceType::EcsCluster, json!({}))
                .depends_on(vpc.logical_id()),
        )?;

        info!(
            stack = %stack.name(),
            cluster = %logical_id,
            vpc = %vpc.logical_id(),
            "Declared cluster"
        );

        Ok(Self {
            logical_id,
            vpc: vpc.clone(),
        })
    }

    pub fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    /// `{"Ref": <cluster>}`, the cluster name
    pub fn cluster_name(&self) -> Intrinsic {
        Intrinsic::reference(&self.logical_id)
    }

    pub fn cluster_arn(&self) -> Intrinsic {
        Intrinsic::get_att(&self.logical_id, "Arn")
    }

    pub fn vpc(&self) -> &Vpc {
        &self.vpc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructs::vpc::VpcProps;
    use crate::domain::StackName;
    use crate::stack::Environment;

    #[test]
    fn test_cluster_depends_on_vpc() {
        let mut stack = Stack::new(StackName::new("TestStack").unwrap(), Environment::default());
        let vpc = Vpc::new(&mut stack, "MyVpc", VpcProps::default()).unwrap();
        let cluster = Cluster::new(&mut stack, "circleci-multiarch-demo", &vpc).unwrap();

        assert_eq!(cluster.logical_id().as_str(), "circlecimultiarchdemo");
        let resource = stack.resource("circlecimultiarchdemo").unwrap();
        assert!(resource.depends_on.contains(vpc.logical_id()));
        assert!(resource.properties.is_empty());
    }

    #[test]
    fn test_cluster_outside_its_vpc_stack_is_rejected() {
        let mut network = Stack::new(StackName::new("Network").unwrap(), Environment::default());
        let vpc = Vpc::new(&mut network, "MyVpc", VpcProps::default()).unwrap();

        let mut other = Stack::new(StackName::new("Other").unwrap(), Environment::default());
        assert!(Cluster::new(&mut other, "Cluster", &vpc).is_err());
    }
}

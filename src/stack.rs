// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack: an ordered, validated resource graph
//!
//! Resources are kept in declaration order. A resource may only reference
//! resources declared before it, which makes declaration order a valid
//! topological order of the graph and rules out dangling references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::domain::{
    invariants::validate_reference, LogicalId, ResourceType, StackName, ValidationError,
};
use crate::errors::StackResult;
use crate::template::{CfnOutput, CfnResource, OutputBody, Reference, ResourceBody, Template};

const UNKNOWN_ACCOUNT: &str = "unknown-account";
const UNKNOWN_REGION: &str = "unknown-region";

/// Deployment target of a stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl Environment {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            region: Some(region.into()),
        }
    }

    /// `aws://<account>/<region>`, with placeholders for unset parts
    pub fn to_uri(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account.as_deref().unwrap_or(UNKNOWN_ACCOUNT),
            self.region.as_deref().unwrap_or(UNKNOWN_REGION)
        )
    }

    /// Whether both account and region are pinned
    pub fn is_resolved(&self) -> bool {
        self.account.is_some() && self.region.is_some()
    }
}

/// A named, deployable unit of declarative infrastructure
#[derive(Debug, Clone)]
pub struct Stack {
    name: StackName,
    environment: Environment,
    description: Option<String>,
    resources: Vec<CfnResource>,
    outputs: Vec<CfnOutput>,
}

impl Stack {
    pub(crate) fn new(name: StackName, environment: Environment) -> Self {
        Self {
            name,
            environment,
            description: None,
            resources: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &StackName {
        &self.name
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Resources in declaration order
    pub fn resources(&self) -> &[CfnResource] {
        &self.resources
    }

    pub fn outputs(&self) -> &[CfnOutput] {
        &self.outputs
    }

    pub fn resource(&self, logical_id: &str) -> Option<&CfnResource> {
        self.resources
            .iter()
            .find(|r| r.logical_id.as_str() == logical_id)
    }

    /// Construct path of a child, used for `Name` tags and descriptions
    pub fn path(&self, segments: &[&str]) -> String {
        std::iter::once(self.name.as_str())
            .chain(segments.iter().copied())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn is_taken(&self, logical_id: &LogicalId) -> bool {
        self.resources.iter().any(|r| &r.logical_id == logical_id)
            || self.outputs.iter().any(|o| &o.logical_id == logical_id)
    }

    fn declared(&self) -> Vec<(&str, ResourceType)> {
        self.resources
            .iter()
            .map(|r| (r.logical_id.as_str(), r.resource_type))
            .collect()
    }

    fn check_references(
        from: &LogicalId,
        position: usize,
        references: &[Reference],
        declared: &[(&str, ResourceType)],
    ) -> StackResult<()> {
        for reference in references {
            validate_reference(
                from.as_str(),
                position,
                &reference.target,
                reference.attribute.as_deref(),
                declared,
            )?;
        }
        Ok(())
    }

    /// Append a resource to the graph
    ///
    /// Fails when the logical ID is taken or when the resource references
    /// anything not already declared.
    pub fn add_resource(&mut self, resource: CfnResource) -> StackResult<&CfnResource> {
        if self.is_taken(&resource.logical_id) {
            return Err(ValidationError::DuplicateLogicalId(resource.logical_id.to_string()).into());
        }

        let declared = self.declared();
        Self::check_references(
            &resource.logical_id,
            declared.len(),
            &resource.references(),
            &declared,
        )?;

        debug!(
            stack = %self.name,
            logical_id = %resource.logical_id,
            resource_type = %resource.resource_type,
            "Declared resource"
        );

        self.resources.push(resource);
        let last = self.resources.len() - 1;
        Ok(&self.resources[last])
    }

    /// Append an output; its value may reference any declared resource
    pub fn add_output(&mut self, output: CfnOutput) -> StackResult<&CfnOutput> {
        if self.is_taken(&output.logical_id) {
            return Err(ValidationError::DuplicateLogicalId(output.logical_id.to_string()).into());
        }

        let declared = self.declared();
        Self::check_references(
            &output.logical_id,
            declared.len(),
            &output.references(),
            &declared,
        )?;

        debug!(stack = %self.name, logical_id = %output.logical_id, "Declared output");

        self.outputs.push(output);
        let last = self.outputs.len() - 1;
        Ok(&self.outputs[last])
    }

    /// Re-check every invariant of the whole graph
    pub fn validate(&self) -> StackResult<()> {
        if self.resources.is_empty() {
            return Err(ValidationError::NoResources(self.name.to_string()).into());
        }

        let declared = self.declared();
        let mut seen = std::collections::BTreeSet::new();

        for (position, resource) in self.resources.iter().enumerate() {
            if !seen.insert(resource.logical_id.as_str()) {
                return Err(
                    ValidationError::DuplicateLogicalId(resource.logical_id.to_string()).into(),
                );
            }
            Self::check_references(
                &resource.logical_id,
                position,
                &resource.references(),
                &declared,
            )?;
        }

        for output in &self.outputs {
            if !seen.insert(output.logical_id.as_str()) {
                return Err(
                    ValidationError::DuplicateLogicalId(output.logical_id.to_string()).into(),
                );
            }
            Self::check_references(
                &output.logical_id,
                declared.len(),
                &output.references(),
                &declared,
            )?;
        }

        Ok(())
    }

    /// Render the stack to its template
    pub fn synthesize(&self) -> StackResult<Template> {
        self.validate()?;

        let resources: BTreeMap<String, ResourceBody> = self
            .resources
            .iter()
            .map(|r| (r.logical_id.to_string(), ResourceBody::from(r)))
            .collect();

        let outputs: BTreeMap<String, OutputBody> = self
            .outputs
            .iter()
            .map(|o| (o.logical_id.to_string(), OutputBody::from(o)))
            .collect();

        info!(
            stack = %self.name,
            resources = resources.len(),
            outputs = outputs.len(),
            "Synthesized stack"
        );

        Ok(Template {
            description: self.description.clone(),
            resources,
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StackError;
    use crate::template::Intrinsic;
    use serde_json::json;

    fn id(s: &str) -> LogicalId {
        LogicalId::new(s).unwrap()
    }

    fn stack() -> Stack {
        Stack::new(StackName::new("TestStack").unwrap(), Environment::default())
    }

    fn vpc() -> CfnResource {
        CfnResource::new(id("MyVpc"), ResourceType::Vpc, json!({"CidrBlock": "10.0.0.0/16"}))
    }

    #[test]
    fn test_environment_uri() {
        assert_eq!(
            Environment::default().to_uri(),
            "aws://unknown-account/unknown-region"
        );
        let env = Environment::new("123456789012", "us-east-1");
        assert_eq!(env.to_uri(), "aws://123456789012/us-east-1");
        assert!(env.is_resolved());
    }

    #[test]
    fn test_path() {
        assert_eq!(stack().path(&["MyVpc", "PublicSubnet1"]), "TestStack/MyVpc/PublicSubnet1");
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut stack = stack();
        stack.add_resource(vpc()).unwrap();
        let err = stack.add_resource(vpc()).unwrap_err();
        assert!(matches!(
            err,
            StackError::Validation(ValidationError::DuplicateLogicalId(_))
        ));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let mut stack = stack();
        let cluster = CfnResource::new(id("Cluster"), ResourceType::EcsCluster, json!({}))
            .depends_on(&id("MyVpc"));
        let err = stack.add_resource(cluster).unwrap_err();
        assert!(matches!(
            err,
            StackError::Validation(ValidationError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_output_cannot_shadow_resource() {
        let mut stack = stack();
        stack.add_resource(vpc()).unwrap();
        let output = CfnOutput::new(id("MyVpc"), Intrinsic::reference(&id("MyVpc")));
        assert!(stack.add_output(output).is_err());
    }

    #[test]
    fn test_empty_stack_does_not_synthesize() {
        assert!(matches!(
            stack().synthesize(),
            Err(StackError::Validation(ValidationError::NoResources(_)))
        ));
    }

    #[test]
    fn test_synthesize() {
        let mut stack = stack();
        stack.set_description("test");
        stack.add_resource(vpc()).unwrap();
        stack
            .add_output(CfnOutput::new(
                id("VpcCidr"),
                Intrinsic::get_att(&id("MyVpc"), "CidrBlock"),
            ))
            .unwrap();

        let template = stack.synthesize().unwrap();
        assert_eq!(template.description.as_deref(), Some("test"));
        assert_eq!(template.resources.len(), 1);
        assert_eq!(
            template.output("VpcCidr").unwrap().value,
            json!({"Fn::GetAtt": ["MyVpc", "CidrBlock"]})
        );
    }
}

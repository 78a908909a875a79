// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarative Template Model
//!
//! The serialized form of a stack. Maps are ordered by key, so rendering the
//! same stack twice produces byte-identical JSON.
//!
//! ```text
//! Stack ──synthesize()──> Template ──to_json()──> "<Stack>.template.json"
//! ```

pub mod intrinsic;
pub mod resource;

pub use intrinsic::{collect_references, Intrinsic, PseudoParameter, Reference};
pub use resource::{CfnOutput, CfnResource, DeletionPolicy};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::ResourceType;
use crate::errors::StackResult;

/// A synthesized CloudFormation template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    pub resources: BTreeMap<String, ResourceBody>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub outputs: BTreeMap<String, OutputBody>,
}

/// One entry of the `Resources` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceBody {
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub properties: Map<String, Value>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deletion_policy: Option<DeletionPolicy>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub update_replace_policy: Option<DeletionPolicy>,
}

/// One entry of the `Outputs` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    pub value: Value,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub export: Option<ExportBody>,
}

/// `Export` block of an output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportBody {
    pub name: String,
}

impl From<&CfnResource> for ResourceBody {
    fn from(resource: &CfnResource) -> Self {
        Self {
            resource_type: resource.resource_type.as_str().to_string(),
            properties: resource.properties.clone(),
            depends_on: resource
                .depends_on
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            deletion_policy: resource.deletion_policy,
            update_replace_policy: resource.update_replace_policy,
        }
    }
}

impl From<&CfnOutput> for OutputBody {
    fn from(output: &CfnOutput) -> Self {
        Self {
            description: output.description.clone(),
            value: output.value.clone(),
            export: output
                .export_name
                .as_ref()
                .map(|name| ExportBody { name: name.clone() }),
        }
    }
}

impl Template {
    /// Look up a resource by logical ID
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceBody> {
        self.resources.get(logical_id)
    }

    /// Look up an output by logical ID
    pub fn output(&self, logical_id: &str) -> Option<&OutputBody> {
        self.outputs.get(logical_id)
    }

    /// All resources of one type, ordered by logical ID
    pub fn resources_of_type(&self, resource_type: ResourceType) -> Vec<(&str, &ResourceBody)> {
        self.resources
            .iter()
            .filter(|(_, body)| body.resource_type == resource_type.as_str())
            .map(|(id, body)| (id.as_str(), body))
            .collect()
    }

    /// Pretty JSON with a trailing newline
    pub fn to_json(&self) -> StackResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Parse a template previously produced by [`Template::to_json`]
    pub fn from_json(json: &str) -> StackResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogicalId;
    use serde_json::json;

    fn id(s: &str) -> LogicalId {
        LogicalId::new(s).unwrap()
    }

    #[test]
    fn test_resource_body_layout() {
        let resource = CfnResource::new(id("Logs"), ResourceType::LogGroup, json!({}))
            .retain_on_delete();
        let body = serde_json::to_value(ResourceBody::from(&resource)).unwrap();

        assert_eq!(
            body,
            json!({
                "Type": "AWS::Logs::LogGroup",
                "DeletionPolicy": "Retain",
                "UpdateReplacePolicy": "Retain"
            })
        );
    }

    #[test]
    fn test_output_body_layout() {
        let output = CfnOutput::new(id("Dns"), Intrinsic::get_att(&id("LB"), "DNSName"))
            .with_export_name("dns");
        let body = serde_json::to_value(OutputBody::from(&output)).unwrap();

        assert_eq!(
            body,
            json!({
                "Value": {"Fn::GetAtt": ["LB", "DNSName"]},
                "Export": {"Name": "dns"}
            })
        );
    }

    #[test]
    fn test_json_round_trip_and_lookup() {
        let mut template = Template {
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        };
        let vpc = CfnResource::new(
            id("MyVpc"),
            ResourceType::Vpc,
            json!({"CidrBlock": "10.0.0.0/16"}),
        );
        template.resources.insert("MyVpc".into(), ResourceBody::from(&vpc));

        let json = template.to_json().unwrap();
        assert!(json.ends_with("}\n"));
        assert!(!json.contains("Outputs"));

        let parsed = Template::from_json(&json).unwrap();
        assert_eq!(parsed, template);
        assert_eq!(parsed.resources_of_type(ResourceType::Vpc).len(), 1);
        assert!(parsed.resource("MyVpc").is_some());
    }
}

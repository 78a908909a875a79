// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declared resources and outputs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::intrinsic::{collect_references, Reference};
use crate::domain::{LogicalId, ResourceType};

/// What the backend does with a resource when it leaves the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    Snapshot,
}

/// A single resource declaration
#[derive(Debug, Clone, PartialEq)]
pub struct CfnResource {
    pub logical_id: LogicalId,
    pub resource_type: ResourceType,
    pub properties: Map<String, Value>,
    pub depends_on: BTreeSet<LogicalId>,
    pub deletion_policy: Option<DeletionPolicy>,
    pub update_replace_policy: Option<DeletionPolicy>,
}

impl CfnResource {
    /// Create a resource; `properties` must be a JSON object (anything else
    /// is treated as no properties)
    pub fn new(logical_id: LogicalId, resource_type: ResourceType, properties: Value) -> Self {
        let properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Self {
            logical_id,
            resource_type,
            properties,
            depends_on: BTreeSet::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    /// Add an explicit ordering dependency
    pub fn depends_on(mut self, id: &LogicalId) -> Self {
        self.depends_on.insert(id.clone());
        self
    }

    /// Set both deletion and replacement policies
    pub fn retain_on_delete(mut self) -> Self {
        self.deletion_policy = Some(DeletionPolicy::Retain);
        self.update_replace_policy = Some(DeletionPolicy::Retain);
        self
    }

    /// Read a property
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Every reference this resource makes, properties and `DependsOn` alike
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        for value in self.properties.values() {
            collect_references(value, &mut refs);
        }
        refs.extend(self.depends_on.iter().map(|id| Reference {
            target: id.as_str().to_string(),
            attribute: None,
        }));
        refs.sort();
        refs.dedup();
        refs
    }
}

/// A stack output
#[derive(Debug, Clone, PartialEq)]
pub struct CfnOutput {
    pub logical_id: LogicalId,
    pub value: Value,
    pub description: Option<String>,
    pub export_name: Option<String>,
}

impl CfnOutput {
    pub fn new(logical_id: LogicalId, value: impl Into<Value>) -> Self {
        Self {
            logical_id,
            value: value.into(),
            description: None,
            export_name: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_export_name(mut self, name: impl Into<String>) -> Self {
        self.export_name = Some(name.into());
        self
    }

    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        collect_references(&self.value, &mut refs);
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Intrinsic;
    use serde_json::json;

    fn id(s: &str) -> LogicalId {
        LogicalId::new(s).unwrap()
    }

    #[test]
    fn test_resource_references_include_depends_on() {
        let resource = CfnResource::new(
            id("Route"),
            ResourceType::Route,
            json!({
                "RouteTableId": Intrinsic::reference(&id("Table")),
                "GatewayId": Intrinsic::reference(&id("Igw")),
            }),
        )
        .depends_on(&id("Attachment"));

        let targets: Vec<String> = resource.references().into_iter().map(|r| r.target).collect();
        assert_eq!(targets, vec!["Attachment", "Igw", "Table"]);
    }

    #[test]
    fn test_non_object_properties_are_dropped() {
        let resource = CfnResource::new(id("Cluster"), ResourceType::EcsCluster, Value::Null);
        assert!(resource.properties.is_empty());
    }

    #[test]
    fn test_retain_sets_both_policies() {
        let resource =
            CfnResource::new(id("Logs"), ResourceType::LogGroup, json!({})).retain_on_delete();
        assert_eq!(resource.deletion_policy, Some(DeletionPolicy::Retain));
        assert_eq!(resource.update_replace_policy, Some(DeletionPolicy::Retain));
    }

    #[test]
    fn test_output_references() {
        let output = CfnOutput::new(id("Dns"), Intrinsic::get_att(&id("LB"), "DNSName"))
            .with_description("Load balancer address");
        assert_eq!(output.references().len(), 1);
        assert_eq!(output.description.as_deref(), Some("Load balancer address"));
    }
}

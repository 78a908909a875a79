// Copyright (c) 2025 - Cowboy AI, Inc.
//! Intrinsic functions and reference discovery
//!
//! Intrinsics are the only way one resource points at another, so the
//! reference walker below is what the stack uses to check the graph.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::domain::LogicalId;

/// Prefix shared by CloudFormation pseudo parameters (`AWS::Region`, ...)
const PSEUDO_PREFIX: &str = "AWS::";

/// Pseudo parameters resolved by the provisioning backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoParameter {
    AccountId,
    Region,
    StackName,
    Partition,
}

impl PseudoParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountId => "AWS::AccountId",
            Self::Region => "AWS::Region",
            Self::StackName => "AWS::StackName",
            Self::Partition => "AWS::Partition",
        }
    }
}

/// A CloudFormation intrinsic function
///
/// ```rust
/// use fargate_stack::domain::LogicalId;
/// use fargate_stack::template::Intrinsic;
/// use serde_json::json;
///
/// let vpc = LogicalId::new("MyVpc").unwrap();
/// let cidr = Intrinsic::get_att(&vpc, "CidrBlock");
/// assert_eq!(cidr.to_value(), json!({"Fn::GetAtt": ["MyVpc", "CidrBlock"]}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Intrinsic {
    /// `{"Ref": id}`
    Ref(LogicalId),
    /// `{"Ref": "AWS::..."}`
    Pseudo(PseudoParameter),
    /// `{"Fn::GetAtt": [id, attribute]}`
    GetAtt(LogicalId, String),
    /// `{"Fn::Select": [index, list]}`
    Select(usize, Box<Intrinsic>),
    /// `{"Fn::GetAZs": region}`, empty region means the stack's region
    GetAzs(String),
    /// `{"Fn::Join": [delimiter, parts]}`
    Join(String, Vec<Value>),
}

impl Intrinsic {
    pub fn reference(id: &LogicalId) -> Self {
        Self::Ref(id.clone())
    }

    pub fn get_att(id: &LogicalId, attribute: impl Into<String>) -> Self {
        Self::GetAtt(id.clone(), attribute.into())
    }

    /// The `index`-th availability zone of the stack's region
    pub fn availability_zone(index: usize) -> Self {
        Self::Select(index, Box::new(Self::GetAzs(String::new())))
    }

    /// Render to template JSON
    pub fn to_value(&self) -> Value {
        match self {
            Self::Ref(id) => json!({ "Ref": id.as_str() }),
            Self::Pseudo(param) => json!({ "Ref": param.as_str() }),
            Self::GetAtt(id, attribute) => json!({ "Fn::GetAtt": [id.as_str(), attribute] }),
            Self::Select(index, list) => json!({ "Fn::Select": [index, list.to_value()] }),
            Self::GetAzs(region) => json!({ "Fn::GetAZs": region }),
            Self::Join(delimiter, parts) => json!({ "Fn::Join": [delimiter, parts] }),
        }
    }
}

impl Serialize for Intrinsic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl From<Intrinsic> for Value {
    fn from(value: Intrinsic) -> Self {
        value.to_value()
    }
}

/// One resource-to-resource reference found in template JSON
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reference {
    /// Logical ID being referenced
    pub target: String,
    /// Attribute read through `Fn::GetAtt`, `None` for `Ref`
    pub attribute: Option<String>,
}

/// Collect every `Ref` and `Fn::GetAtt` target inside `value`
///
/// Pseudo parameters are skipped; they are not resources.
pub fn collect_references(value: &Value, out: &mut Vec<Reference>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(target)) = map.get("Ref") {
                    if !target.starts_with(PSEUDO_PREFIX) {
                        out.push(Reference {
                            target: target.clone(),
                            attribute: None,
                        });
                    }
                    return;
                }

                if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                    if let [Value::String(target), Value::String(attribute)] = parts.as_slice() {
                        out.push(Reference {
                            target: target.clone(),
                            attribute: Some(attribute.clone()),
                        });
                        return;
                    }
                }
            }

            for nested in map.values() {
                collect_references(nested, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> LogicalId {
        LogicalId::new(s).unwrap()
    }

    #[test]
    fn test_rendering() {
        assert_eq!(Intrinsic::reference(&id("MyVpc")).to_value(), json!({"Ref": "MyVpc"}));
        assert_eq!(
            Intrinsic::Pseudo(PseudoParameter::Region).to_value(),
            json!({"Ref": "AWS::Region"})
        );
        assert_eq!(
            Intrinsic::availability_zone(1).to_value(),
            json!({"Fn::Select": [1, {"Fn::GetAZs": ""}]})
        );
        assert_eq!(
            Intrinsic::Join("".into(), vec![json!("http://"), json!("x")]).to_value(),
            json!({"Fn::Join": ["", ["http://", "x"]]})
        );
    }

    #[test]
    fn test_serialize_inside_json_macro() {
        let value = json!({ "VpcId": Intrinsic::reference(&id("MyVpc")) });
        assert_eq!(value, json!({"VpcId": {"Ref": "MyVpc"}}));
    }

    #[test]
    fn test_collect_references() {
        let value = json!({
            "VpcId": {"Ref": "MyVpc"},
            "Region": {"Ref": "AWS::Region"},
            "Rules": [
                {"CidrIp": {"Fn::GetAtt": ["MyVpc", "CidrBlock"]}},
                {"Zone": {"Fn::Select": [0, {"Fn::GetAZs": ""}]}}
            ],
            "Name": "literal"
        });

        let mut refs = Vec::new();
        collect_references(&value, &mut refs);
        refs.sort();

        assert_eq!(
            refs,
            vec![
                Reference { target: "MyVpc".into(), attribute: None },
                Reference { target: "MyVpc".into(), attribute: Some("CidrBlock".into()) },
            ]
        );
    }
}

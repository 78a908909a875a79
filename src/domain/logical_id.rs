// Copyright (c) 2025 - Cowboy AI, Inc.
//! Template Identifiers with Naming Invariants
//!
//! - [`LogicalId`] - key of a resource or output inside a template
//! - [`StackName`] - name of a deployable stack

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogicalIdError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier exceeds maximum length of {max} characters: {len}")]
    TooLong { len: usize, max: usize },

    #[error("Invalid character in identifier {id:?}: {ch:?}")]
    InvalidCharacter { id: String, ch: char },

    #[error("Stack name must start with a letter: {0}")]
    InvalidStart(String),
}

/// Template logical ID
///
/// Invariants:
/// - Non-empty
/// - ASCII alphanumeric only
/// - At most 255 characters
///
/// # Examples
///
/// ```rust
/// use fargate_stack::domain::LogicalId;
///
/// let id = LogicalId::new("MyVpc").unwrap();
/// assert_eq!(id.as_str(), "MyVpc");
///
/// let derived = LogicalId::from_path(&["circleci-multiarch-demo"]).unwrap();
/// assert_eq!(derived.as_str(), "circlecimultiarchdemo");
///
/// assert!(LogicalId::new("my-vpc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalId(String);

impl LogicalId {
    /// Maximum logical ID length accepted by CloudFormation
    pub const MAX_LENGTH: usize = 255;

    /// Create a new logical ID with validation
    pub fn new(id: impl Into<String>) -> Result<Self, LogicalIdError> {
        let id = id.into();

        if id.is_empty() {
            return Err(LogicalIdError::Empty);
        }

        if id.len() > Self::MAX_LENGTH {
            return Err(LogicalIdError::TooLong {
                len: id.len(),
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(ch) = id.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(LogicalIdError::InvalidCharacter { id, ch });
        }

        Ok(Self(id))
    }

    /// Derive a logical ID from a construct path
    ///
    /// Each path segment has its non-alphanumeric characters removed and the
    /// segments are concatenated, so `["FargateService", "LB"]` becomes
    /// `FargateServiceLB`.
    pub fn from_path(path: &[&str]) -> Result<Self, LogicalIdError> {
        let joined: String = path
            .iter()
            .flat_map(|segment| segment.chars())
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        Self::new(joined)
    }

    /// Append a child segment to this ID
    pub fn child(&self, segment: &str) -> Result<Self, LogicalIdError> {
        Self::from_path(&[&self.0, segment])
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LogicalId {
    type Error = LogicalIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LogicalId {
    type Error = LogicalIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogicalId> for String {
    fn from(value: LogicalId) -> Self {
        value.0
    }
}

/// Deployable stack name
///
/// Invariants:
/// - Starts with an ASCII letter
/// - ASCII alphanumerics and hyphens only
/// - At most 128 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackName(String);

impl StackName {
    /// Maximum stack name length accepted by CloudFormation
    pub const MAX_LENGTH: usize = 128;

    /// Create a new stack name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, LogicalIdError> {
        let name = name.into();

        let first = name.chars().next().ok_or(LogicalIdError::Empty)?;

        if name.len() > Self::MAX_LENGTH {
            return Err(LogicalIdError::TooLong {
                len: name.len(),
                max: Self::MAX_LENGTH,
            });
        }

        if !first.is_ascii_alphabetic() {
            return Err(LogicalIdError::InvalidStart(name));
        }

        if let Some(ch) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
            return Err(LogicalIdError::InvalidCharacter { id: name, ch });
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this stack's template inside a cloud assembly
    pub fn template_file(&self) -> String {
        format!("{}.template.json", self.0)
    }
}

impl Default for StackName {
    /// `CdkStack`, the name the stack gets when none is configured
    fn default() -> Self {
        Self("CdkStack".to_string())
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StackName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StackName {
    type Error = LogicalIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StackName> for String {
    fn from(value: StackName) -> Self {
        value.0
    }
}

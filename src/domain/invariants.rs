// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Resource Graph Invariants
//!
//! Every function here is pure and deterministic. Stacks and constructs call
//! them before a resource is accepted, so a malformed definition fails while
//! the graph is being built instead of when the provisioning backend applies
//! the template.
//!
//! # Invariant Categories
//!
//! 1. **Value Invariants**: address ranges, ports, task sizes, image names
//! 2. **Graph Invariants**: unique IDs, no dangling references, references
//!    only point backwards in declaration order
//! 3. **Wiring Invariants**: rules open the port the service listens on

use crate::domain::{Ipv4Cidr, NetworkError, PortSpec, ResourceType};

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Network value rejected
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// Two resources or outputs share a logical ID
    #[error("Duplicate logical ID: {0}")]
    DuplicateLogicalId(String),

    /// Reference to a resource that does not exist in the stack
    #[error("{from} references undeclared resource {target}")]
    DanglingReference { from: String, target: String },

    /// Reference to a resource declared after the referrer
    #[error("{from} references {target}, which is declared after it")]
    DeclarationOrder { from: String, target: String },

    /// `Fn::GetAtt` on an attribute the target type does not expose
    #[error("{from} reads unknown attribute {attribute} of {target} ({resource_type})")]
    UnknownAttribute {
        from: String,
        target: String,
        attribute: String,
        resource_type: ResourceType,
    },

    /// Stack has nothing to deploy
    #[error("Stack {0} declares no resources")]
    NoResources(String),

    /// Subnet layout does not fit the VPC
    #[error("Invalid subnet layout: {0}")]
    SubnetLayout(String),

    /// Firewall rule and listener disagree
    #[error("Ingress rule opens {rule} but the service listens on {listener}")]
    PortMismatch { rule: PortSpec, listener: PortSpec },

    /// Unsupported Fargate CPU/memory combination
    #[error("Unsupported Fargate task size: {cpu} CPU units with {memory_mib} MiB")]
    InvalidTaskSize { cpu: u32, memory_mib: u32 },

    /// Container image reference rejected
    #[error("Invalid container image reference: {0:?}")]
    InvalidImage(String),
}

/// Smallest VPC prefix AWS accepts
pub const VPC_MIN_PREFIX: u8 = 16;

/// Largest VPC (and subnet) prefix AWS accepts
pub const VPC_MAX_PREFIX: u8 = 28;

/// Validate a VPC address range
///
/// # Rules
/// - Prefix between /16 and /28
pub fn validate_vpc_cidr(cidr: &Ipv4Cidr) -> ValidationResult {
    let prefix = cidr.prefix_length();
    if !(VPC_MIN_PREFIX..=VPC_MAX_PREFIX).contains(&prefix) {
        return Err(NetworkError::VpcPrefixOutOfRange(prefix).into());
    }
    Ok(())
}

/// Validate carved subnets against their VPC
///
/// # Rules
/// - Every subnet lies inside the VPC range
/// - No two subnets overlap
/// - No subnet is smaller than /28
pub fn validate_subnet_layout(vpc: &Ipv4Cidr, subnets: &[Ipv4Cidr]) -> ValidationResult {
    for (i, subnet) in subnets.iter().enumerate() {
        if !vpc.contains(subnet) {
            return Err(ValidationError::SubnetLayout(format!(
                "{} is outside {}",
                subnet, vpc
            )));
        }

        if subnet.prefix_length() > VPC_MAX_PREFIX {
            return Err(ValidationError::SubnetLayout(format!(
                "{} is smaller than /{}",
                subnet, VPC_MAX_PREFIX
            )));
        }

        if let Some(other) = subnets[i + 1..].iter().find(|other| subnet.overlaps(other)) {
            return Err(ValidationError::SubnetLayout(format!(
                "{} overlaps {}",
                subnet, other
            )));
        }
    }
    Ok(())
}

/// Validate that an ingress rule opens the port the service listens on
pub fn validate_ingress_matches_listener(rule: PortSpec, listener: PortSpec) -> ValidationResult {
    if rule != listener {
        return Err(ValidationError::PortMismatch { rule, listener });
    }
    Ok(())
}

/// Validate a Fargate CPU/memory pair
///
/// # Rules
/// - 256 CPU: 512, 1024 or 2048 MiB
/// - 512 CPU: 1024-4096 MiB in 1024 steps
/// - 1024 CPU: 2048-8192 MiB in 1024 steps
/// - 2048 CPU: 4096-16384 MiB in 1024 steps
/// - 4096 CPU: 8192-30720 MiB in 1024 steps
pub fn validate_task_size(cpu: u32, memory_mib: u32) -> ValidationResult {
    let in_steps = |min: u32, max: u32| {
        (min..=max).contains(&memory_mib) && memory_mib % 1024 == 0
    };

    let valid = match cpu {
        256 => matches!(memory_mib, 512 | 1024 | 2048),
        512 => in_steps(1024, 4096),
        1024 => in_steps(2048, 8192),
        2048 => in_steps(4096, 16384),
        4096 => in_steps(8192, 30720),
        _ => false,
    };

    if !valid {
        return Err(ValidationError::InvalidTaskSize { cpu, memory_mib });
    }
    Ok(())
}

/// Validate a container image reference (`[registry/]repository[:tag|@digest]`)
///
/// # Rules
/// - Non-empty
/// - No whitespace or control characters
/// - Does not start or end with a separator
pub fn validate_image_reference(image: &str) -> ValidationResult {
    let invalid = image.is_empty()
        || image.chars().any(|c| c.is_whitespace() || c.is_control())
        || image.starts_with(['/', ':', '@'])
        || image.ends_with(['/', ':', '@']);

    if invalid {
        return Err(ValidationError::InvalidImage(image.to_string()));
    }
    Ok(())
}

/// Validate one reference made by `from` against the declared resources
///
/// `declared` is the stack's resources in declaration order; `position` is
/// the index `from` occupies (or will occupy) in that order.
///
/// # Rules
/// - The target exists
/// - The target is declared before `from`
/// - A `Fn::GetAtt` attribute is one the target type exposes
pub fn validate_reference(
    from: &str,
    position: usize,
    target: &str,
    attribute: Option<&str>,
    declared: &[(&str, ResourceType)],
) -> ValidationResult {
    let Some(index) = declared.iter().position(|(id, _)| *id == target) else {
        return Err(ValidationError::DanglingReference {
            from: from.to_string(),
            target: target.to_string(),
        });
    };

    if index >= position {
        return Err(ValidationError::DeclarationOrder {
            from: from.to_string(),
            target: target.to_string(),
        });
    }

    if let Some(attribute) = attribute {
        let resource_type = declared[index].1;
        if !resource_type.known_attributes().contains(&attribute) {
            return Err(ValidationError::UnknownAttribute {
                from: from.to_string(),
                target: target.to_string(),
                attribute: attribute.to_string(),
                resource_type,
            });
        }
    }

    Ok(())
}

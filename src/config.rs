// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synthesis configuration
//!
//! Defaults can be overridden from the environment, and the CLI overrides
//! the environment.

use std::path::PathBuf;

use tracing::debug;

use crate::domain::{Ipv4Cidr, StackName};
use crate::errors::{StackError, StackResult};
use crate::fargate_stack::FargateStackProps;
use crate::stack::Environment;

/// Account the stack is pinned to
pub const ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";

/// Region the stack is pinned to
pub const REGION_VAR: &str = "CDK_DEFAULT_REGION";

/// Stack name override
pub const STACK_NAME_VAR: &str = "FARGATE_STACK_NAME";

/// Output directory override
pub const OUTDIR_VAR: &str = "CDK_OUTDIR";

/// Configuration for one synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    /// Name of the stack, also the template file stem
    pub stack_name: StackName,
    /// Directory the cloud assembly is written to
    pub out_dir: PathBuf,
    /// Target account, unresolved when `None`
    pub account: Option<String>,
    /// Target region, unresolved when `None`
    pub region: Option<String>,
    /// Address range of the VPC
    pub vpc_cidr: Ipv4Cidr,
}

impl SynthConfig {
    pub const DEFAULT_OUT_DIR: &'static str = "cdk.out";

    /// Load configuration from environment variables
    pub fn from_env() -> StackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> StackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let stack_name = match lookup(STACK_NAME_VAR).filter(|v| !v.is_empty()) {
            Some(name) => StackName::new(name).map_err(|e| {
                StackError::Configuration(format!("{}: {}", STACK_NAME_VAR, e))
            })?,
            None => defaults.stack_name,
        };

        let out_dir = lookup(OUTDIR_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.out_dir);

        let config = Self {
            stack_name,
            out_dir,
            account: lookup(ACCOUNT_VAR).filter(|v| !v.is_empty()),
            region: lookup(REGION_VAR).filter(|v| !v.is_empty()),
            vpc_cidr: defaults.vpc_cidr,
        };

        debug!(?config, "Loaded synth configuration");
        Ok(config)
    }

    /// Deployment target, unset parts left unresolved
    pub fn environment(&self) -> Environment {
        Environment {
            account: self.account.clone(),
            region: self.region.clone(),
        }
    }

    /// Props for [`FargateStack::define_with`](crate::fargate_stack::FargateStack::define_with)
    pub fn stack_props(&self) -> FargateStackProps {
        FargateStackProps {
            environment: self.environment(),
            vpc_cidr: self.vpc_cidr,
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            stack_name: StackName::default(),
            out_dir: PathBuf::from(Self::DEFAULT_OUT_DIR),
            account: None,
            region: None,
            vpc_cidr: Ipv4Cidr::DEFAULT_VPC,
        }
    }
}

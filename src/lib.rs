// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fargate stack definition and synthesis
//!
//! Declares a VPC, an ECS cluster and a network-load-balanced Fargate service
//! as a CloudFormation template, and writes it out as a cloud assembly.
//!
//! # Example
//!
//! ```
//! use fargate_stack::{App, FargateStack, MemoryWriter, AssemblyWriter};
//!
//! let mut app = App::new();
//! FargateStack::define(&mut app, "CdkStack")?;
//!
//! let assembly = app.synth()?;
//! let mut writer = MemoryWriter::new();
//! writer.write(&assembly.render()?)?;
//! assert!(writer.get("CdkStack.template.json").is_some());
//! # Ok::<(), fargate_stack::StackError>(())
//! ```

pub mod app;
pub mod assembly;
pub mod config;
pub mod constructs;
pub mod domain;
pub mod errors;
pub mod fargate_stack;
pub mod stack;
pub mod template;

// Re-export commonly used types
pub use app::App;
pub use assembly::{AssemblyFile, AssemblyWriter, CloudAssembly, DirectoryWriter, MemoryWriter};
pub use config::SynthConfig;
pub use errors::{StackError, StackResult};
pub use fargate_stack::{FargateStack, FargateStackProps};
pub use stack::{Environment, Stack};
pub use template::{CfnOutput, CfnResource, Intrinsic, Template};

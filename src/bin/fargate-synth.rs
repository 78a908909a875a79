// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fargate stack synthesizer
//!
//! Defines the Fargate demo stack and writes its cloud assembly
//! (`manifest.json` plus `<stack>.template.json`) to the output directory.
//!
//! Run with: cargo run --bin fargate-synth -- --out cdk.out
//!
//! Environment:
//! 1. CDK_DEFAULT_ACCOUNT / CDK_DEFAULT_REGION pin the stack environment
//! 2. FARGATE_STACK_NAME overrides the stack name (default: CdkStack)
//! 3. CDK_OUTDIR overrides the output directory (default: cdk.out)
//! 4. RUST_LOG overrides the log filter

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fargate_stack::domain::StackName;
use fargate_stack::{App, AssemblyWriter, DirectoryWriter, FargateStack, SynthConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Synthesize the Fargate demo stack into a cloud assembly
#[derive(Debug, Parser)]
#[command(name = "fargate-synth", version, about)]
struct Cli {
    /// Output directory of the cloud assembly
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Name of the stack
    #[arg(long)]
    stack_name: Option<String>,

    /// Account to pin the stack to
    #[arg(long)]
    account: Option<String>,

    /// Region to pin the stack to
    #[arg(long)]
    region: Option<String>,

    /// Print the template to stdout instead of writing the assembly
    #[arg(long)]
    print: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// Apply command line overrides on top of the environment
    fn apply(self, mut config: SynthConfig) -> Result<SynthConfig> {
        if let Some(name) = self.stack_name {
            config.stack_name = StackName::new(name).context("Invalid --stack-name")?;
        }
        if let Some(out) = self.out {
            config.out_dir = out;
        }
        if self.account.is_some() {
            config.account = self.account;
        }
        if self.region.is_some() {
            config.region = self.region;
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "fargate_stack=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let print = cli.print;
    let config = cli.apply(SynthConfig::from_env().context("Failed to load configuration")?)?;
    debug!(?config, "Configuration loaded");

    let mut app = App::new();
    let stack =
        FargateStack::define_with(&mut app, config.stack_name.as_str(), config.stack_props())
            .context("Failed to define stack")?;

    let assembly = app.synth().context("Failed to synthesize")?;

    if print {
        let template = assembly.template(stack.name.as_str())?;
        print!("{}", template.to_json()?);
        return Ok(());
    }

    let files = assembly.render().context("Failed to render cloud assembly")?;
    let mut writer = DirectoryWriter::new(&config.out_dir);
    writer.write(&files).with_context(|| {
        format!("Failed to write cloud assembly to {}", config.out_dir.display())
    })?;

    info!(stack = %stack.name, dir = %config.out_dir.display(), "Synthesized");
    println!("{}", config.out_dir.join(stack.name.template_file()).display());
    Ok(())
}

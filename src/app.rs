// Copyright (c) 2025 - Cowboy AI, Inc.
//! App: the root scope that owns every stack

use tracing::info;

use crate::assembly::CloudAssembly;
use crate::domain::StackName;
use crate::errors::{StackError, StackResult};
use crate::stack::{Environment, Stack};

/// Root scope; stacks are synthesized in the order they were added
#[derive(Debug, Clone, Default)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack with an unresolved environment
    pub fn add_stack(&mut self, id: &str) -> StackResult<&mut Stack> {
        self.add_stack_with_env(id, Environment::default())
    }

    /// Add a stack pinned to an account and region
    pub fn add_stack_with_env(
        &mut self,
        id: &str,
        environment: Environment,
    ) -> StackResult<&mut Stack> {
        let stack = self.detached_stack(id, environment)?;
        self.insert(stack)
    }

    /// A stack that is not yet part of the app
    ///
    /// The name is checked against the stacks already added; the stack joins
    /// the app only through [`App::insert`].
    pub fn detached_stack(&self, id: &str, environment: Environment) -> StackResult<Stack> {
        let name = StackName::new(id)?;
        self.ensure_unique(&name)?;
        Ok(Stack::new(name, environment))
    }

    /// Add a stack built with [`App::detached_stack`]
    pub fn insert(&mut self, stack: Stack) -> StackResult<&mut Stack> {
        self.ensure_unique(stack.name())?;

        info!(
            stack = %stack.name(),
            environment = %stack.environment().to_uri(),
            "Adding stack"
        );
        self.stacks.push(stack);
        let last = self.stacks.len() - 1;
        Ok(&mut self.stacks[last])
    }

    fn ensure_unique(&self, name: &StackName) -> StackResult<()> {
        if self.stacks.iter().any(|s| s.name() == name) {
            return Err(StackError::DuplicateStack(name.to_string()));
        }
        Ok(())
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn stack(&self, name: &str) -> StackResult<&Stack> {
        self.stacks
            .iter()
            .find(|s| s.name().as_str() == name)
            .ok_or_else(|| StackError::UnknownStack(name.to_string()))
    }

    /// Synthesize every stack into a cloud assembly
    pub fn synth(&self) -> StackResult<CloudAssembly> {
        let mut assembly = CloudAssembly::new();
        for stack in &self.stacks {
            assembly.add_stack(stack.name(), stack.environment(), stack.synthesize()?);
        }

        info!(stacks = self.stacks.len(), "Synthesized cloud assembly");
        Ok(assembly)
    }
}

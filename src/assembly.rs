// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Assembly
//!
//! Synthesis is pure: [`CloudAssembly::render`] turns templates into a list
//! of files without touching the filesystem. An [`AssemblyWriter`] performs
//! the actual writes.
//!
//! ```text
//! App::synth()          CloudAssembly::render()        AssemblyWriter::write()
//! ────────────          ───────────────────────        ───────────────────────
//! Stacks ──> Templates ──> [AssemblyFile] (pure) ──────> manifest.json
//!                                                        <Stack>.template.json
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::StackName;
use crate::errors::{StackError, StackResult};
use crate::stack::Environment;
use crate::template::Template;

/// Cloud assembly schema version written to the manifest
pub const MANIFEST_VERSION: &str = "36.0.0";

/// Manifest file name inside the assembly directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Artifact type of a deployable stack
pub const STACK_ARTIFACT_TYPE: &str = "aws:cloudformation:stack";

/// Top-level `manifest.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub artifacts: BTreeMap<String, ArtifactManifest>,
}

/// One artifact entry of the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub environment: String,
    pub properties: StackProperties,
}

/// Properties of a stack artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackProperties {
    pub template_file: String,
}

/// A file the assembly consists of, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Every synthesized stack plus the manifest describing them
#[derive(Debug, Clone, PartialEq)]
pub struct CloudAssembly {
    manifest: Manifest,
    templates: BTreeMap<String, Template>,
}

impl Default for CloudAssembly {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudAssembly {
    pub fn new() -> Self {
        Self {
            manifest: Manifest {
                version: MANIFEST_VERSION.to_string(),
                artifacts: BTreeMap::new(),
            },
            templates: BTreeMap::new(),
        }
    }

    pub(crate) fn add_stack(
        &mut self,
        name: &StackName,
        environment: &Environment,
        template: Template,
    ) {
        self.manifest.artifacts.insert(
            name.to_string(),
            ArtifactManifest {
                artifact_type: STACK_ARTIFACT_TYPE.to_string(),
                environment: environment.to_uri(),
                properties: StackProperties {
                    template_file: name.template_file(),
                },
            },
        );
        self.templates.insert(name.to_string(), template);
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Template of one stack
    pub fn template(&self, stack: &str) -> StackResult<&Template> {
        self.templates
            .get(stack)
            .ok_or_else(|| StackError::UnknownStack(stack.to_string()))
    }

    pub fn stack_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Render the assembly to files (pure)
    pub fn render(&self) -> StackResult<Vec<AssemblyFile>> {
        let mut manifest = serde_json::to_string_pretty(&self.manifest)?;
        manifest.push('\n');

        let mut files = vec![AssemblyFile {
            path: PathBuf::from(MANIFEST_FILE),
            contents: manifest,
        }];

        for (stack, artifact) in &self.manifest.artifacts {
            files.push(AssemblyFile {
                path: PathBuf::from(&artifact.properties.template_file),
                contents: self.template(stack)?.to_json()?,
            });
        }

        Ok(files)
    }
}

/// Destination for rendered assembly files
pub trait AssemblyWriter {
    /// Write every file; stops at the first failure
    fn write(&mut self, files: &[AssemblyFile]) -> StackResult<()>;
}

/// Writes files under a directory, creating it when missing
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    root: PathBuf,
}

impl DirectoryWriter {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssemblyWriter for DirectoryWriter {
    fn write(&mut self, files: &[AssemblyFile]) -> StackResult<()> {
        fs::create_dir_all(&self.root)?;

        for file in files {
            let path = self.root.join(&file.path);
            fs::write(&path, &file.contents)?;
            debug!(path = %path.display(), bytes = file.contents.len(), "Wrote assembly file");
        }

        info!(dir = %self.root.display(), files = files.len(), "Cloud assembly written");
        Ok(())
    }
}

/// Keeps files in memory instead of writing them
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    pub files: BTreeMap<PathBuf, String>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl AssemblyWriter for MemoryWriter {
    fn write(&mut self, files: &[AssemblyFile]) -> StackResult<()> {
        for file in files {
            self.files.insert(file.path.clone(), file.contents.clone());
        }
        Ok(())
    }
}

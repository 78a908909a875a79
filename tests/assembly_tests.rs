// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Assembly Tests
//!
//! Write the synthesized assembly to disk and in memory, and check the
//! manifest describes the stack.

mod fixtures;

use std::fs;

use fargate_stack::assembly::{Manifest, MANIFEST_FILE, MANIFEST_VERSION, STACK_ARTIFACT_TYPE};
use fargate_stack::{AssemblyWriter, DirectoryWriter, MemoryWriter, Template};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use fixtures::*;

#[test]
fn test_directory_writer_writes_manifest_and_template() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("cdk.out");

    let files = assembly().render().unwrap();
    DirectoryWriter::new(&out).write(&files).unwrap();

    let manifest: Manifest =
        serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest.version, MANIFEST_VERSION);

    let artifact = &manifest.artifacts[STACK_NAME];
    assert_eq!(artifact.artifact_type, STACK_ARTIFACT_TYPE);
    assert_eq!(artifact.properties.template_file, "CdkStack.template.json");

    let written = fs::read_to_string(out.join("CdkStack.template.json")).unwrap();
    assert_eq!(Template::from_json(&written).unwrap(), template());
}

#[test]
fn test_rewrite_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CdkStack.template.json");

    DirectoryWriter::new(dir.path()).write(&assembly().render().unwrap()).unwrap();
    let first = fs::read(&path).unwrap();

    DirectoryWriter::new(dir.path()).write(&assembly().render().unwrap()).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_unresolved_environment() {
    let assembly = assembly();
    assert_eq!(
        assembly.manifest().artifacts[STACK_NAME].environment,
        "aws://unknown-account/unknown-region"
    );
}

#[test]
fn test_pinned_environment() {
    let assembly = pinned_app().synth().unwrap();
    assert_eq!(
        assembly.manifest().artifacts[STACK_NAME].environment,
        format!("aws://{}/{}", ACCOUNT, REGION)
    );
}

#[test]
fn test_memory_writer_matches_render() {
    let files = assembly().render().unwrap();
    let mut writer = MemoryWriter::new();
    writer.write(&files).unwrap();

    assert_eq!(writer.files.len(), 2);
    for file in &files {
        assert_eq!(writer.get(&file.path), Some(file.contents.as_str()));
    }
}

#[test]
fn test_template_file_ends_with_newline() {
    let mut writer = MemoryWriter::new();
    writer.write(&assembly().render().unwrap()).unwrap();
    let contents = writer.get("CdkStack.template.json").unwrap();
    assert!(contents.ends_with("}\n"));
}

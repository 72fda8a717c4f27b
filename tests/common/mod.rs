//! Common test utilities for rigcascade scenario tests.
//!
//! `TestProject` is an isolated project: a temp root holding a JSON
//! document store, manifest scenes and a config file pointing at both.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;
use tempfile::TempDir;

use rigcascade::domain::entities::{Document, DocumentType, Query, SortOrder};
use rigcascade::domain::ports::{AssetDatabase, LoadedReference, SceneInstance};
use rigcascade::domain::value_objects::{DocumentId, VersionId};
use rigcascade::infrastructure::{JsonDocumentStore, SceneManifest};

/// Result of running the rigcascade binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub struct TestProject {
    pub root: TempDir,
    extra_config: String,
}

impl TestProject {
    pub fn new(docs: Vec<Document>) -> Self {
        let root = TempDir::new().unwrap();
        JsonDocumentStore::create(root.path().join("assets.json"), &docs).unwrap();
        let project = Self {
            root,
            extra_config: String::new(),
        };
        project.write_config();
        project
    }

    /// Append raw TOML to the generated config
    pub fn with_config(mut self, toml: &str) -> Self {
        self.extra_config = toml.to_string();
        self.write_config();
        self
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("rigcascade.toml")
    }

    fn write_config(&self) {
        let content = format!(
            "[project]\nroot = '{}'\ndatabase = 'assets.json'\n\n{}",
            self.root.path().display(),
            self.extra_config
        );
        fs::write(self.config_path(), content).unwrap();
    }

    /// Write a rig scene that references `model_version` of modelDefault
    pub fn write_rig_scene(&self, name: &str, subset: &str, model_version: &str) {
        SceneManifest {
            references: vec![LoadedReference {
                id: "modelRN".to_string(),
                subset: "modelDefault".to_string(),
                version: VersionId::from(model_version),
            }],
            instances: vec![SceneInstance {
                id: Some(format!("{}Instance", subset)),
                subset: subset.to_string(),
                family: "rig".to_string(),
                active: true,
            }],
        }
        .write(&self.path("rig").join(name))
        .unwrap();
    }

    pub fn store(&self) -> JsonDocumentStore {
        JsonDocumentStore::open(self.path("assets.json"))
    }

    pub fn document(&self, id: &str) -> Document {
        self.store()
            .find_one(&Query::by_id(&DocumentId::from(id)))
            .unwrap()
            .unwrap()
    }

    pub fn latest_version(&self, subset_id: &str) -> Document {
        self.store()
            .find_one(
                &Query::of_type(DocumentType::Version)
                    .with_parent(&DocumentId::from(subset_id))
                    .sorted(SortOrder::NameDescending),
            )
            .unwrap()
            .unwrap()
    }

    /// Run the binary from the project root with the project config
    pub fn run(&self, args: &[&str]) -> TestResult {
        let config = self.config_path();
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rigcascade"));
        cmd.current_dir(self.root.path())
            .arg("--config")
            .arg(&config)
            .args(args)
            .env_remove("RUST_LOG");
        for key in [
            "RIGCASCADE_PROJECT_ROOT",
            "RIGCASCADE_DATABASE",
            "RIGCASCADE_WORKER_EXE",
            "RIGCASCADE_SUBSET_PREFIX",
        ] {
            cmd.env_remove(key);
        }

        let output = cmd.output().unwrap();
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

// Fixtures

pub fn model_version(id: &str, index: u32) -> Document {
    Document::new(id, DocumentType::Version, index).with_parent("sm")
}

pub fn rig_version(id: &str, subset_id: &str, index: u32, model: &str, scene: &str) -> Document {
    Document::new(id, DocumentType::Version, index)
        .with_parent(subset_id)
        .with_data("dependencies", json!({ model: {} }))
        .with_data("source", json!(format!("{{root}}/rig/{}", scene)))
}

/// hero asset opted in to auto update, with modelDefault and rigA subsets
pub fn hero_documents(model_versions: u32) -> Vec<Document> {
    let mut docs = vec![
        Document::new("a1", DocumentType::Asset, "hero").with_data(
            "taskOptions",
            json!({ "rigging": { "autoModelUpdate": { "value": true } } }),
        ),
        Document::new("sm", DocumentType::Subset, "modelDefault").with_parent("a1"),
        Document::new("sa", DocumentType::Subset, "rigA").with_parent("a1"),
    ];
    for index in 1..=model_versions {
        docs.push(model_version(&format!("m{}", index), index));
    }
    docs
}

pub fn assert_path_exists(path: &Path) {
    assert!(path.exists(), "expected {} to exist", path.display());
}

//! Scenario: a model publish triggers the rig update
//!
//! Journey: a modeller publishes a new model version; the rig built
//! against the previous one is reopened, retargeted and republished
//! without anyone touching it.

use serde_json::{json, Value};

use crate::common::*;

/// SCENARIO A: modelDefault v1..v3, rigA latest depends on v2, v3 published
#[test]
fn scenario_stale_rig_is_republished() {
    let mut docs = hero_documents(3);
    docs.push(rig_version("ra1", "sa", 1, "m1", "rigA.ma"));
    docs.push(rig_version("ra2", "sa", 2, "m2", "rigA.ma"));
    let project = TestProject::new(docs);
    project.write_rig_scene("rigA.ma", "rigA", "m2");

    let result = project.run(&["trigger", "--asset", "hero", "--subset", "modelDefault"]);

    assert!(result.success, "trigger failed: {}", result.stderr);
    assert!(
        result.stdout.contains("updated 1 dependent(s): rigA"),
        "unexpected output: {}",
        result.stdout
    );

    let latest = project.latest_version("sa");
    assert_eq!(latest.name.as_index(), Some(3));
    assert!(latest.data_path("dependencies.m3").is_some());
    assert_eq!(
        latest.data_path("source"),
        Some(&json!("{root}/rig/_auto_update/rigA.auto_model_update.001.ma"))
    );
    assert_path_exists(&project.path("rig/_auto_update/rigA.auto_model_update.001.ma"));
    assert!(project.document("m3").data_path("rigAutoUpdateFailed").is_none());
}

/// SCENARIO B: the worker fails, so the published model is flagged
#[test]
fn scenario_worker_failure_flags_the_model() {
    let mut docs = hero_documents(3);
    docs.push(rig_version("ra2", "sa", 2, "m2", "rigA.ma"));
    let project = TestProject::new(docs)
        .with_config("[pipeline]\nextract_command = ['/nonexistent/exporter', '{output}']\n");
    project.write_rig_scene("rigA.ma", "rigA", "m2");

    let result = project.run(&["trigger", "--asset", "hero", "--subset", "modelDefault"]);

    assert_eq!(result.exit_code, 2, "stderr: {}", result.stderr);
    assert!(result.stderr.contains(
        "Model publish succeeded but rig auto update failed. Please inform a rigger or TD."
    ));
    assert!(result.stderr.contains("worker exited with code 1"));

    assert_eq!(
        project.document("m3").data_path("rigAutoUpdateFailed"),
        Some(&json!(true))
    );
    assert_eq!(project.latest_version("sa").name.as_index(), Some(2));
}

/// SCENARIO C: the first model version never launches a worker
#[test]
fn scenario_first_version_has_nothing_to_update() {
    let project = TestProject::new(hero_documents(1))
        .with_config("[worker]\nexecutable = '/nonexistent/rigcascade'\n");

    let result = project.run(&["trigger", "--asset", "hero", "--subset", "modelDefault"]);

    assert!(result.success, "trigger failed: {}", result.stderr);
    assert!(result.stdout.contains("first version published"));
    assert!(project.document("m1").data_path("rigAutoUpdateFailed").is_none());
}

#[test]
fn scenario_opted_out_asset_is_left_alone() {
    let mut docs = hero_documents(2);
    docs[0] = rigcascade::domain::entities::Document::new(
        "a1",
        rigcascade::domain::entities::DocumentType::Asset,
        "hero",
    );
    docs.push(rig_version("ra1", "sa", 1, "m1", "rigA.ma"));
    let project = TestProject::new(docs);

    let result = project.run(&["trigger", "--asset", "hero", "--subset", "modelDefault"]);

    assert!(result.success);
    assert!(result.stdout.contains("auto update disabled"));
    assert_eq!(project.latest_version("sa").name.as_index(), Some(1));
}

#[test]
fn scenario_trigger_json_reports_outcome() {
    let mut docs = hero_documents(2);
    docs.push(rig_version("ra1", "sa", 1, "m1", "rigA.ma"));
    let project = TestProject::new(docs);
    project.write_rig_scene("rigA.ma", "rigA", "m1");

    let result = project.run(&["--json", "trigger", "--asset", "hero", "--subset", "modelDefault"]);

    assert!(result.success, "trigger failed: {}", result.stderr);
    let last = result
        .stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .last()
        .unwrap();
    let value: Value = serde_json::from_str(last).unwrap();
    assert_eq!(value["command"], "trigger");
    assert_eq!(value["outcome"], "updated");
    assert_eq!(value["dependents"]["ra1"], "rigA");
}

#[test]
fn scenario_unknown_asset_fails() {
    let project = TestProject::new(hero_documents(2));

    let result = project.run(&["trigger", "--asset", "villain", "--subset", "modelDefault"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("asset 'villain' not found"));
}

//! Scenario: the worker invoked directly
//!
//! The worker is normally launched by `trigger`, but pipeline tooling can
//! also call it with the positional key=value form.

use serde_json::Value;

use crate::common::*;

fn project_with_stale_rig() -> TestProject {
    let mut docs = hero_documents(3);
    docs.push(rig_version("ra2", "sa", 2, "m2", "rigA.ma"));
    let project = TestProject::new(docs);
    project.write_rig_scene("rigA.ma", "rigA", "m2");
    project
}

#[test]
fn worker_accepts_key_value_arguments() {
    let project = project_with_stale_rig();

    let result = project.run(&[
        "worker",
        "asset_name=hero",
        "model_subset=modelDefault",
        r#"rig_versions={"ra2": "rigA"}"#,
    ]);

    assert!(result.success, "worker failed: {}", result.stderr);
    assert!(result.stdout.contains("republished 1 of 1 job(s)"));
    assert_eq!(project.latest_version("sa").name.as_index(), Some(3));
}

#[test]
fn worker_rejects_duplicated_keys() {
    let project = project_with_stale_rig();

    let result = project.run(&[
        "worker",
        "asset_name=hero",
        "asset_name=villain",
        "model_subset=modelDefault",
        "rig_versions={}",
    ]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("given twice"));
    assert_eq!(project.latest_version("sa").name.as_index(), Some(2));
}

#[test]
fn worker_json_streams_events() {
    let project = project_with_stale_rig();

    let result = project.run(&[
        "--json",
        "worker",
        "--payload",
        r#"{"asset_name": "hero", "base_subset": "modelDefault", "dependents": {"ra2": "rigA"}}"#,
    ]);

    assert!(result.success, "worker failed: {}", result.stderr);
    let events: Vec<Value> = result
        .stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.first().unwrap()["event"], "planned");
    assert_eq!(events.last().unwrap()["event"], "complete");
    assert!(events.iter().all(|e| e["command"] == "worker"));
}

#[test]
fn worker_missing_scene_exits_non_zero() {
    let mut docs = hero_documents(3);
    docs.push(rig_version("ra2", "sa", 2, "m2", "rigA.ma"));
    let project = TestProject::new(docs);

    let result = project.run(&[
        "worker",
        "--payload",
        r#"{"asset_name": "hero", "base_subset": "modelDefault", "dependents": {"ra2": "rigA"}}"#,
    ]);

    assert_eq!(result.exit_code, 1);
    let last_line = result.stderr.lines().last().unwrap_or_default();
    assert!(
        last_line.starts_with("error:"),
        "diagnostic should be the last stderr line: {}",
        result.stderr
    );
}

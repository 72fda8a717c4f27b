//! Scenario: inspecting stale dependents before publishing anything

use serde_json::Value;

use crate::common::*;

#[test]
fn stale_lists_dependents_without_side_effects() {
    let mut docs = hero_documents(3);
    docs.push(rig_version("ra2", "sa", 2, "m2", "rigA.ma"));
    let project = TestProject::new(docs);

    let result = project.run(&["--json", "stale", "--asset", "hero", "--subset", "modelDefault"]);

    assert!(result.success, "stale failed: {}", result.stderr);
    let value: Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(value["outcome"], "resolved");
    assert_eq!(value["dependents"]["ra2"], "rigA");
    assert_eq!(project.latest_version("sa").name.as_index(), Some(2));
}

#[test]
fn stale_on_current_rig_is_empty() {
    let mut docs = hero_documents(3);
    docs.push(rig_version("ra3", "sa", 1, "m3", "rigA.ma"));
    let project = TestProject::new(docs);

    let result = project.run(&["stale", "--asset", "hero", "--subset", "modelDefault"]);

    assert!(result.success);
    assert_eq!(result.stdout, "all dependents are up to date\n");
}

#[test]
fn stale_with_explicit_first_version() {
    let project = TestProject::new(hero_documents(3));

    let result = project.run(&[
        "stale",
        "--asset",
        "hero",
        "--subset",
        "modelDefault",
        "--version",
        "m1",
    ]);

    assert!(result.success);
    assert_eq!(result.stdout, "first version\n");
}

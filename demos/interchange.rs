use bomlogic::serial::{autosave_json, import_json};
use bomlogic::{RuleCollection, RuleMetadata, Status, Validator};

fn main() {
    let validator = Validator::default();
    let mut rules = RuleCollection::new();
    rules.commit(
        validator.validate("K001 → B100").expect("valid rule"),
        RuleMetadata::new().tags(["engine"]),
    )
    .expect("ids available");
    rules.commit(
        validator.validate("FROM B100 DELETE B200").expect("valid rule"),
        RuleMetadata::new().status(Status::Testing),
    )
    .expect("ids available");

    let saved = autosave_json(&rules).expect("rules serialize");
    println!("{saved}");

    // A file written by an older tool: legacy keys, tags as one string, one broken rule.
    let legacy = r#"[
        {"logic_id": "BL01", "selection_expression": "K010 OR K011", "logic_relation": "→",
         "impact_expression": "B300", "tags": "legacy, import"},
        {"logic_id": "BL02", "selection_expression": "K012 K013", "logic_relation": "→",
         "impact_expression": "B301"},
        {"logic_id": "", "selection_expression": "", "impact_expression": "CHANGE PRICE -15"}
    ]"#;
    let mut restored = RuleCollection::new();
    let report = import_json(legacy, &validator, &mut restored).expect("input is a rule array");
    for id in &report.imported {
        println!("imported {id}");
    }
    for skipped in &report.skipped {
        println!("skipped record {}: {}", skipped.index, skipped.reason);
    }
}

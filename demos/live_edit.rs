use bomlogic::{EditState, EnglishCatalog, RuleCollection, RuleMetadata, Validator};

fn main() {
    let validator = Validator::default();
    let target = "K001 AND (K002 OR K003) → B100";

    // Replay the expression one keystroke at a time, the way an editor would.
    let mut typed = String::new();
    for c in target.chars() {
        typed.push(c);
        let marker = match validator.assess(&typed) {
            EditState::Complete(kind) => format!("complete ({kind})"),
            EditState::Incomplete(err) => format!("typing... {}", err.kind()),
            EditState::Invalid(err) => format!("ERROR {}", err.render(&EnglishCatalog)),
        };
        println!("{typed:<34} {marker}");
    }

    for broken in ["K001 K002 → B100", "→ B100", "CHANGE PRICE 100", "K001 AND B1 → B2"] {
        let err = validator
            .validate(broken)
            .expect_err("expression should be rejected");
        println!("{broken:<34} {}", err.render(&EnglishCatalog));
        println!("{:<34} {}^", "", " ".repeat(err.position()));
    }

    let mut rules = RuleCollection::new();
    for raw in [target, "ON B100 ADD B200", "K004 → CHANGE PRICE +25"] {
        let expr = validator.validate(raw).expect("expression is valid");
        let rule = rules.commit(expr, RuleMetadata::new()).expect("ids available");
        println!("{} {:<24} {}", rule.id(), rule.kind().as_str(), rule.expression());
    }
}

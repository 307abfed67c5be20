use bomlogic::lex::TokenKind;
use bomlogic::{
    ConfigError, EditState, ErrorKind, ExpressionKind, Family, Validator, ValidatorConfig,
};

fn kind_of(raw: &str) -> ErrorKind {
    Validator::default().validate(raw).unwrap_err().kind()
}

#[test]
fn whitespace_only_is_empty() {
    let err = Validator::default().validate(" \t\n ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyExpression);
    assert_eq!(err.position(), 4);
    assert!(err.is_truncation());
}

#[test]
fn no_spaces_needed_around_parentheses() {
    assert!(Validator::default().validate("(K1)AND(K2)→(B1)").is_ok());
}

#[test]
fn positions_count_characters_not_bytes() {
    // "→" is three bytes but one character.
    let err = Validator::default().validate("K1 → B1 → B2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MultipleImplications);
    assert_eq!(err.position(), 8);
}

#[test]
fn unclosed_parenthesis_reports_innermost_opening() {
    let err = Validator::default()
        .validate("(K1 AND (K2 OR K3) AND (K4")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnclosedParenthesis);
    assert_eq!(err.position(), 23);
}

#[test]
fn deep_nesting() {
    let depth = 200;
    let raw = format!("{}K1{} → B1", "(".repeat(depth), ")".repeat(depth));
    assert!(Validator::default().validate(&raw).is_ok());
}

#[test]
fn bom_before_implication_is_always_invalid() {
    for raw in ["NOT B1 → B2", "(K1 OR B1) → B2", "K1 AND NOT B1 → B2"] {
        assert_eq!(kind_of(raw), ErrorKind::BomBeforeImplication, "{raw}");
    }
    assert_eq!(kind_of("B1 → B2"), ErrorKind::MustStartWithK);
}

#[test]
fn tuning_keywords_outside_a_directive() {
    assert_eq!(kind_of("TO B1"), ErrorKind::InvalidFirstToken);
    assert_eq!(kind_of("DELETE B1"), ErrorKind::InvalidFirstToken);
    assert_eq!(kind_of("K1 ADD B1"), ErrorKind::MisplacedTuningKeyword);
    assert_eq!(kind_of("K1 → B1 OR CHANGE PRICE +1"), ErrorKind::MisplacedTuningKeyword);
    assert_eq!(kind_of("ON B1 ADD B2 ON B3 ADD B4"), ErrorKind::MultipleTuningLogic);
    assert_eq!(kind_of("ON B1 ADD B2 → B3"), ErrorKind::ImplicationAfterTuning);
    assert_eq!(kind_of("CHANGE PRICE +1 B2"), ErrorKind::UnexpectedTokenAfterTuning);
}

#[test]
fn quantity_edge_values() {
    let v = Validator::default();
    assert!(v.validate("CHANGE QUANTITY OF B1 TO 0").is_ok());
    assert!(v.validate("CHANGE QUANTITY OF B1 TO 4294967295").is_ok());
    assert_eq!(
        kind_of("CHANGE QUANTITY OF B1 TO 4294967296"),
        ErrorKind::InvalidQuantity
    );
    assert_eq!(kind_of("CHANGE QUANTITY OF B1 TO +3"), ErrorKind::InvalidQuantity);
    assert_eq!(kind_of("CHANGE QUANTITY OF B1 TO B2"), ErrorKind::InvalidQuantity);
}

#[test]
fn literals_outside_tuning() {
    assert_eq!(kind_of("K1 → +5"), ErrorKind::UnexpectedLiteral);
    assert_eq!(kind_of("K1 AND 5 → B1"), ErrorKind::BomBeforeImplication);
    let strict = Validator::new(ValidatorConfig::default().numeric_bom_codes(false)).unwrap();
    assert_eq!(
        strict.validate("K1 → 1139101").unwrap_err().kind(),
        ErrorKind::UnexpectedLiteral
    );
    assert_eq!(
        strict.validate("ON 1 ADD B2").unwrap_err().kind(),
        ErrorKind::ExpectedBomCode
    );
}

#[test]
fn case_sensitive_keywords() {
    let strict =
        Validator::new(ValidatorConfig::default().case_sensitive_keywords(true)).unwrap();
    assert_eq!(
        strict.validate("K1 and K2 → B1").unwrap_err().kind(),
        ErrorKind::InvalidToken
    );
    assert!(Validator::default().validate("K1 and not K2 → B1").is_ok());
}

#[test]
fn custom_code_patterns() {
    let config = ValidatorConfig::default()
        .k_code_pattern(r"F\d{2}")
        .bom_code_pattern(r"ITEM-\d+");
    let v = Validator::new(config).unwrap();
    assert!(v.validate("F01 AND F02 → ITEM-7").is_ok());
    assert_eq!(
        v.validate("K001 → ITEM-7").unwrap_err().kind(),
        ErrorKind::InvalidToken
    );
    assert_eq!(v.tokenize("ITEM-7")[0].kind(), TokenKind::BomCode);
}

#[test]
fn bad_configuration() {
    let err = Validator::new(ValidatorConfig::default().bom_code_pattern("[")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { which: "BOM code", .. }));
    assert!(err.to_string().starts_with("invalid BOM code pattern '['"));
}

#[test]
fn family_is_enforced() {
    let v = Validator::default();
    let err = v
        .validate_as("K1 → CHANGE PRICE +1", Family::Boolean)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExpectedBooleanRule);
    assert_eq!(err.position(), 5);
    let expr = v.validate_as("K1 → CHANGE PRICE +1", Family::Tuning).unwrap();
    assert_eq!(expr.kind(), ExpressionKind::TuningChangePrice);
    assert_eq!(
        v.validate_as("K1 AND K2", Family::Tuning).unwrap_err().kind(),
        ErrorKind::MissingImplication
    );
}

#[test]
fn keystroke_by_keystroke() {
    let v = Validator::default();
    let target = "K001 AND (K002 OR K003) → CHANGE QUANTITY OF B100 TO 4";
    let chars: Vec<char> = target.chars().collect();
    for end in 0..chars.len() {
        let prefix: String = chars[..end].iter().collect();
        let state = v.assess(&prefix);
        assert!(state.is_viable(), "{prefix:?} -> {state:?}");
    }
    assert_eq!(
        v.assess(target),
        EditState::Complete(ExpressionKind::TuningChangeQuantity)
    );
}

#[test]
fn broken_prefix_stays_broken() {
    let v = Validator::default();
    assert!(!v.assess("K1 K2").is_viable());
    assert!(!v.assess("K1 K2 AND").is_viable());
}

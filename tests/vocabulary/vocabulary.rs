//! Tests for vocabulary construction from content packs.

use verdict_vocabulary::{ContentElement, ElementKind, Vocabulary};

fn pack() -> Vec<ContentElement> {
    vec![
        ContentElement::new("hero", "Hero", ElementKind::Player).with_attribute("strength"),
        ContentElement::new("cellar", "Damp Cellar", ElementKind::Scene),
        ContentElement::new("lamp", "Brass Lamp", ElementKind::Item)
            .with_alias("lantern")
            .with_flag("lit"),
        ContentElement::new("lamp_spare", "Spare Lamp", ElementKind::Item)
            .with_alias("lantern")
            .with_flag("broken"),
        ContentElement::new("guard", "Guard", ElementKind::Npc)
            .with_attribute("strength")
            .with_attribute("mood"),
    ]
}

#[test]
fn shared_alias_keeps_registration_order() {
    let vocab = Vocabulary::new(pack()).unwrap();
    assert_eq!(vocab.resolve("lantern"), ["lamp", "lamp_spare"]);
    assert_eq!(vocab.first_id("LANTERN"), Some("lamp"));
}

#[test]
fn phrases_ignore_case_and_spacing() {
    let vocab = Vocabulary::new(pack()).unwrap();
    assert_eq!(vocab.first_id("damp   CELLAR"), Some("cellar"));
    assert_eq!(vocab.first_id("brass lamp"), Some("lamp"));
    assert_eq!(vocab.first_id("iron lamp"), None);
}

#[test]
fn attribute_and_flag_sets_are_deduplicated() {
    let vocab = Vocabulary::new(pack()).unwrap();
    assert_eq!(
        vocab.known_attributes().collect::<Vec<_>>(),
        vec!["mood", "strength"]
    );
    assert_eq!(vocab.known_flags().collect::<Vec<_>>(), vec!["broken", "lit"]);
}

#[test]
fn scenes_are_scene_elements() {
    let vocab = Vocabulary::new(pack()).unwrap();
    assert_eq!(vocab.known_scenes().collect::<Vec<_>>(), vec!["cellar"]);
    assert_eq!(vocab.known_elements().count(), 5);
    assert_eq!(vocab.len(), 5);
}

#[test]
fn rebuilding_reflects_new_elements() {
    let mut elements = pack();
    let before = Vocabulary::new(elements.clone()).unwrap();
    elements.push(ContentElement::new("key", "Iron Key", ElementKind::Item));
    let after = Vocabulary::new(elements).unwrap();

    assert!(before.resolve("iron key").is_empty());
    assert_eq!(after.resolve("iron key"), ["key"]);
    assert!(after.is_known_id("KEY"));
}

#[test]
fn content_pack_from_json() {
    let elements: Vec<ContentElement> = serde_json::from_str(
        r#"[
            {"id": "desk", "name": "Oak Desk", "kind": "item", "aliases": ["table"]},
            {"id": "study", "name": "Study", "kind": "scene"}
        ]"#,
    )
    .unwrap();
    let vocab = Vocabulary::new(elements).unwrap();
    assert_eq!(vocab.first_id("table"), Some("desk"));
    assert_eq!(vocab.known_scenes().collect::<Vec<_>>(), vec!["study"]);
}

//! Tests for evaluation against world data and custom contexts.

use std::collections::HashMap;

use verdict_foundation::Value;
use verdict_language::{SubjectKind, SubjectRef, parse};
use verdict_runtime::{Element, EvaluationContext, Evaluator, World, WorldElement, evaluate};
use verdict_vocabulary::ElementKind;

use crate::cellar;

fn eval(source: &str) -> bool {
    evaluate(&parse(source).unwrap(), &cellar())
}

// =============================================================================
// Sample World
// =============================================================================

#[test]
fn states_fall_back_to_default() {
    assert!(eval("target is locked"));
    assert!(eval("target.state is locked"));
    assert!(eval("lamp is unlit"));
    assert!(eval("lamp.state is unlit"));
    assert!(!eval("lamp.state is lit"));
}

#[test]
fn flags_shadow_states() {
    assert!(!eval("lamp is lit"));
    assert!(eval("lamp is_not lit"));
    assert!(eval("lamp.lit is false"));
    assert!(eval("currentScene is dark"));
    assert!(eval("currentScene.flag is dark"));
}

#[test]
fn attributes_and_properties() {
    assert!(eval("player.attribute strength is_greater_than 2"));
    assert!(eval("player.attribute constitution is_equal_to 2"));
    assert!(!eval("player.attribute strength is_less_than 4"));
    assert!(eval("target.weight is_greater_than 30"));
    assert!(eval("target.weight is 40"));
}

#[test]
fn missing_attribute_is_not_comparable() {
    assert!(!eval("player.attribute luck is_less_than 100"));
    assert!(!eval("player.attribute luck is_greater_than -100"));
    assert!(eval("player.attribute luck is_not 3"));
}

#[test]
fn numeric_states_compare_without_a_field() {
    let world = World::new()
        .with_element(WorldElement::new("gauge", ElementKind::Item).with_state("5"))
        .with_element(WorldElement::new("clock", ElementKind::Item).with_default_state("12"));
    let holds = |source: &str| evaluate(&parse(source).unwrap(), &world);

    assert!(holds("gauge is_greater_than 3"));
    assert!(!holds("gauge is_greater_than 5"));
    assert!(holds("clock is_equal_to 12"));
    assert!(!eval("target is_greater_than 3"));
}

#[test]
fn identity_between_handles() {
    assert!(eval("location is currentScene"));
    assert!(eval("target is chest"));
    assert!(!eval("player is target"));
}

#[test]
fn containment() {
    assert!(eval("player has lamp"));
    assert!(!eval("player has chest"));
    assert!(eval("lamp is_in player"));
    assert!(eval("chest is_in currentScene"));
    assert!(!eval("chest is_in hall"));
}

#[test]
fn inventories() {
    assert!(!eval("target.inventory is_empty"));
    assert!(eval("not target.inventory is_empty"));
    assert!(!eval("player is_empty"));
    assert!(eval("guard.inventory is_empty"));
}

#[test]
fn typed_subjects() {
    assert!(eval("npc guard is sleeping"));
    assert!(!eval("scene guard is sleeping"));
    assert!(eval("item guard is sleeping"));
    assert!(!eval("npc nobody is sleeping"));
}

#[test]
fn visits_and_distances() {
    assert!(eval("player visits cellar is 2"));
    assert!(eval("player visits hall is_less_than 2"));
    assert!(eval("player visits attic is 0"));
    assert!(eval("player distance_from npc guard is_less_than 5"));
    assert!(eval("npc guard distance_from player is 3"));
    assert!(eval("player distance_from player is 0"));
    assert!(!eval("player distance_from lamp is 0"));
}

#[test]
fn unset_handles_fail_closed() {
    assert!(!eval("target2 is chest"));
    assert!(!eval("target2 is_not chest"));
    assert!(!eval("session.state is open"));
    assert!(!eval("log.inventory is_empty"));
}

#[test]
fn negation_and_combinators() {
    for source in [
        "lamp is unlit",
        "target is open",
        "player has lamp and not player has chest",
        "npc guard is awake or target is locked",
    ] {
        let inner = eval(source);
        assert_eq!(eval(&format!("not not ({source})")), inner, "{source}");
        assert_eq!(eval(&format!("not ({source})")), !inner, "{source}");
    }
    assert!(eval("(lamp is unlit or lamp is lit) and target is locked"));
}

// =============================================================================
// Custom Context
// =============================================================================

/// A single-room context backed by hash maps.
struct Room {
    things: Vec<Thing>,
    score: HashMap<String, i64>,
}

struct Thing {
    id: &'static str,
    state: Option<&'static str>,
    holder: Option<&'static str>,
    flags: HashMap<&'static str, bool>,
}

impl Thing {
    fn new(id: &'static str) -> Self {
        Self {
            id,
            state: None,
            holder: None,
            flags: HashMap::new(),
        }
    }
}

impl Element for Thing {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.id
    }

    fn container_id(&self) -> Option<&str> {
        self.holder
    }

    fn current_state(&self) -> Option<&str> {
        self.state
    }

    fn default_state(&self) -> Option<&str> {
        None
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    fn property(&self, _name: &str) -> Option<Value> {
        None
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        (name == "age").then(|| Value::from(30))
    }
}

impl Room {
    fn thing(&self, id: &str) -> Option<&dyn Element> {
        self.things
            .iter()
            .find(|t| t.id == id)
            .map(|t| t as &dyn Element)
    }
}

impl EvaluationContext for Room {
    fn player(&self) -> Option<&dyn Element> {
        self.thing("me")
    }

    fn target(&self) -> Option<&dyn Element> {
        self.thing("door")
    }

    fn target2(&self) -> Option<&dyn Element> {
        None
    }

    fn current_scene(&self) -> Option<&dyn Element> {
        self.thing("room")
    }

    fn session(&self) -> Option<&dyn Element> {
        None
    }

    fn log(&self) -> Option<&dyn Element> {
        None
    }

    fn element(&self, _kind: SubjectKind, id: &str) -> Option<&dyn Element> {
        self.thing(id)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Element> + '_> {
        Box::new(self.things.iter().map(|t| t as &dyn Element))
    }

    fn visit_count(&self, _subject: &SubjectRef, scene: &str) -> Option<i64> {
        self.score.get(scene).copied()
    }

    fn distance(&self, _from: &SubjectRef, _to: &SubjectRef) -> Option<i64> {
        None
    }
}

fn room() -> Room {
    let mut door = Thing::new("door");
    door.state = Some("shut");
    door.flags.insert("painted", true);
    let mut key = Thing::new("key");
    key.holder = Some("me");
    let mut me = Thing::new("me");
    me.holder = Some("room");

    Room {
        things: vec![Thing::new("room"), door, key, me],
        score: HashMap::from([("room".to_string(), 4)]),
    }
}

#[test]
fn custom_context_supplies_everything() {
    let room = room();
    let evaluator = Evaluator::new(&room);
    let check = |source: &str| evaluator.evaluate(&parse(source).unwrap());

    assert!(check("target is shut"));
    assert!(check("target is painted"));
    assert!(check("player has key"));
    assert!(check("location is currentScene"));
    assert!(check("player.attribute age is_greater_than 18"));
    assert!(check("player visits room is_greater_than 3"));
    assert!(!check("player visits cellar is 0"));
    assert!(!check("player distance_from target is 0"));
}

#[test]
fn evaluation_through_trait_objects() {
    let room = room();
    let context: &dyn EvaluationContext = &room;
    assert!(evaluate(&parse("target is_not open").unwrap(), context));
}

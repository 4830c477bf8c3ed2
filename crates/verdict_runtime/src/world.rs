//! An in-memory game world implementing [`EvaluationContext`].
//!
//! `World` is the reference host: the REPL loads one from JSON, and the tests
//! use it as a fixture. Real games implement the context traits over their own
//! storage instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use verdict_foundation::{Error, Result, Value, eq_ignore_case};
use verdict_language::{SubjectKind, SubjectRef};
use verdict_vocabulary::{ContentElement, ElementKind, Vocabulary};

use crate::context::{Element, EvaluationContext};

/// One element of a [`World`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldElement {
    /// Canonical id.
    pub id: String,
    /// Display name; the id is used when empty.
    pub name: String,
    /// Element kind.
    pub kind: ElementKind,
    /// Other names for the element, fed to the vocabulary.
    pub aliases: Vec<String>,
    /// Id of the containing element.
    pub container: Option<String>,
    /// Current state.
    pub state: Option<String>,
    /// Default state.
    pub default_state: Option<String>,
    /// Boolean flags.
    pub flags: BTreeMap<String, bool>,
    /// Custom properties.
    pub properties: BTreeMap<String, Value>,
    /// Attributes.
    pub attributes: BTreeMap<String, Value>,
}

impl WorldElement {
    /// Creates an element whose name is its id.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Self::default()
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Places the element inside `container`.
    #[must_use]
    pub fn inside(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Sets the current state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the default state.
    #[must_use]
    pub fn with_default_state(mut self, state: impl Into<String>) -> Self {
        self.default_state = Some(state.into());
        self
    }

    /// Sets a flag.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Sets a custom property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

fn lookup<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(key, _)| eq_ignore_case(key, name))
            .map(|(_, value)| value)
    })
}

impl Element for WorldElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    fn container_id(&self) -> Option<&str> {
        self.container.as_deref()
    }

    fn current_state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    fn default_state(&self) -> Option<&str> {
        self.default_state.as_deref()
    }

    fn flag(&self, name: &str) -> Option<bool> {
        lookup(&self.flags, name).copied()
    }

    fn property(&self, name: &str) -> Option<Value> {
        lookup(&self.properties, name).cloned()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        lookup(&self.attributes, name).cloned()
    }
}

/// A measured distance between two elements. Distances are symmetric.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceEntry {
    /// One end.
    pub from: String,
    /// The other end.
    pub to: String,
    /// The distance.
    pub value: i64,
}

/// A complete game state snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    /// Every element in the world.
    pub elements: Vec<WorldElement>,
    /// Id of the player element.
    pub player: Option<String>,
    /// Id of the verb's target.
    pub target: Option<String>,
    /// Id of the verb's second target.
    pub target2: Option<String>,
    /// Id of the scene the player is in.
    pub current_scene: Option<String>,
    /// Id of the session element.
    pub session: Option<String>,
    /// Id of the log element.
    pub log: Option<String>,
    /// Visit counts: visitor id, then scene id.
    pub visits: BTreeMap<String, BTreeMap<String, i64>>,
    /// Known distances.
    pub distances: Vec<DistanceEntry>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a world from JSON.
    ///
    /// # Errors
    /// Returns a serialization error if the JSON does not describe a world.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Reads and decodes a JSON world file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a serialization
    /// error if it cannot be decoded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Adds an element.
    #[must_use]
    pub fn with_element(mut self, element: WorldElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Sets the player.
    #[must_use]
    pub fn with_player(mut self, id: impl Into<String>) -> Self {
        self.player = Some(id.into());
        self
    }

    /// Sets the target.
    #[must_use]
    pub fn with_target(mut self, id: impl Into<String>) -> Self {
        self.target = Some(id.into());
        self
    }

    /// Sets the second target.
    #[must_use]
    pub fn with_target2(mut self, id: impl Into<String>) -> Self {
        self.target2 = Some(id.into());
        self
    }

    /// Sets the current scene.
    #[must_use]
    pub fn with_current_scene(mut self, id: impl Into<String>) -> Self {
        self.current_scene = Some(id.into());
        self
    }

    /// Sets the session element.
    #[must_use]
    pub fn with_session(mut self, id: impl Into<String>) -> Self {
        self.session = Some(id.into());
        self
    }

    /// Sets the log element.
    #[must_use]
    pub fn with_log(mut self, id: impl Into<String>) -> Self {
        self.log = Some(id.into());
        self
    }

    /// Records how often `visitor` has been to `scene`.
    #[must_use]
    pub fn with_visits(
        mut self,
        visitor: impl Into<String>,
        scene: impl Into<String>,
        count: i64,
    ) -> Self {
        self.visits
            .entry(visitor.into())
            .or_default()
            .insert(scene.into(), count);
        self
    }

    /// Records the distance between two elements.
    #[must_use]
    pub fn with_distance(mut self, from: impl Into<String>, to: impl Into<String>, value: i64) -> Self {
        self.distances.push(DistanceEntry {
            from: from.into(),
            to: to.into(),
            value,
        });
        self
    }

    /// Returns the element with the given id, ignoring case.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WorldElement> {
        self.elements
            .iter()
            .find(|element| eq_ignore_case(&element.id, id))
    }

    /// Builds the vocabulary for this world's elements.
    ///
    /// # Errors
    /// Returns an error if the phrase matcher cannot be compiled.
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        Vocabulary::new(self.elements.iter().map(|element| {
            let mut content =
                ContentElement::new(&element.id, Element::name(element), element.kind);
            content.aliases.clone_from(&element.aliases);
            content.attributes = element.attributes.keys().cloned().collect();
            content.flags = element.flags.keys().cloned().collect();
            content.states = element
                .state
                .iter()
                .chain(&element.default_state)
                .cloned()
                .collect();
            content
        }))
    }

    fn handle(&self, id: Option<&String>) -> Option<&dyn Element> {
        self.get(id?).map(|element| element as &dyn Element)
    }
}

/// Returns true if an element of kind `actual` can stand for a subject of kind `wanted`.
///
/// `item` subjects accept any element, since bare identifiers parse as items.
fn kind_matches(wanted: SubjectKind, actual: ElementKind) -> bool {
    match wanted {
        SubjectKind::Item => true,
        SubjectKind::Npc => matches!(actual, ElementKind::Npc | ElementKind::Other),
        SubjectKind::Scene => matches!(actual, ElementKind::Scene | ElementKind::Other),
        SubjectKind::Exit => matches!(actual, ElementKind::Exit | ElementKind::Other),
        _ => false,
    }
}

impl EvaluationContext for World {
    fn player(&self) -> Option<&dyn Element> {
        self.handle(self.player.as_ref())
    }

    fn target(&self) -> Option<&dyn Element> {
        self.handle(self.target.as_ref())
    }

    fn target2(&self) -> Option<&dyn Element> {
        self.handle(self.target2.as_ref())
    }

    fn current_scene(&self) -> Option<&dyn Element> {
        self.handle(self.current_scene.as_ref())
    }

    fn session(&self) -> Option<&dyn Element> {
        self.handle(self.session.as_ref())
    }

    fn log(&self) -> Option<&dyn Element> {
        self.handle(self.log.as_ref())
    }

    fn element(&self, kind: SubjectKind, id: &str) -> Option<&dyn Element> {
        self.get(id)
            .filter(|element| kind_matches(kind, element.kind))
            .map(|element| element as &dyn Element)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Element> + '_> {
        Box::new(self.elements.iter().map(|element| element as &dyn Element))
    }

    fn visit_count(&self, subject: &SubjectRef, scene: &str) -> Option<i64> {
        let visitor = self.resolve(subject)?.id();
        let count = lookup(&self.visits, visitor)
            .and_then(|scenes| lookup(scenes, scene))
            .copied()
            .unwrap_or(0);
        Some(count)
    }

    fn distance(&self, from: &SubjectRef, to: &SubjectRef) -> Option<i64> {
        let a = self.resolve(from)?.id();
        let b = self.resolve(to)?.id();
        if eq_ignore_case(a, b) {
            return Some(0);
        }
        self.distances
            .iter()
            .find(|entry| {
                (eq_ignore_case(&entry.from, a) && eq_ignore_case(&entry.to, b))
                    || (eq_ignore_case(&entry.from, b) && eq_ignore_case(&entry.to, a))
            })
            .map(|entry| entry.value)
    }
}

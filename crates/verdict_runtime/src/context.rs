//! The host-facing view of live game state.
//!
//! The evaluator never touches game data directly. Hosts implement
//! [`EvaluationContext`] over their own storage and hand out [`Element`]
//! handles; both traits are read-only.

use verdict_foundation::{Value, eq_ignore_case};
use verdict_language::{SubjectKind, SubjectRef};

/// A game element as seen by conditions.
///
/// Storage is a closed set of kinds: flags, custom properties, attributes and
/// the current/default state pair.
pub trait Element {
    /// Canonical id.
    fn id(&self) -> &str;

    /// Display name, matched case-insensitively by `has`.
    fn name(&self) -> &str;

    /// Id of the element that contains this one.
    fn container_id(&self) -> Option<&str>;

    /// State set during play.
    fn current_state(&self) -> Option<&str>;

    /// State the element starts in.
    fn default_state(&self) -> Option<&str>;

    /// Boolean flag, or `None` if the element has no such flag.
    fn flag(&self, name: &str) -> Option<bool>;

    /// Custom property.
    fn property(&self, name: &str) -> Option<Value>;

    /// Numeric or textual attribute such as `strength`.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// The current state if set, else the default state.
    fn state(&self) -> Option<&str> {
        self.current_state().or_else(|| self.default_state())
    }
}

/// Read-only game state a condition is evaluated against.
///
/// Lookups return `None` when something does not resolve; the evaluator turns
/// that into a `false` result.
pub trait EvaluationContext {
    /// The acting player.
    fn player(&self) -> Option<&dyn Element>;

    /// The primary target of the verb.
    fn target(&self) -> Option<&dyn Element>;

    /// The secondary target of the verb.
    fn target2(&self) -> Option<&dyn Element>;

    /// The scene the player is in.
    fn current_scene(&self) -> Option<&dyn Element>;

    /// The game session.
    fn session(&self) -> Option<&dyn Element>;

    /// The session log.
    fn log(&self) -> Option<&dyn Element>;

    /// Looks up a named element of the given kind.
    fn element(&self, kind: SubjectKind, id: &str) -> Option<&dyn Element>;

    /// Every element in the game, in no particular order.
    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Element> + '_>;

    /// How many times `subject` has visited `scene`.
    fn visit_count(&self, subject: &SubjectRef, scene: &str) -> Option<i64>;

    /// Distance between two subjects.
    fn distance(&self, from: &SubjectRef, to: &SubjectRef) -> Option<i64>;

    /// The element containing the player, falling back to the current scene.
    fn location(&self) -> Option<&dyn Element> {
        self.player()
            .and_then(|player| player.container_id())
            .and_then(|id| self.find(id))
            .or_else(|| self.current_scene())
    }

    /// Finds any element by id, ignoring case and kind.
    fn find(&self, id: &str) -> Option<&dyn Element> {
        self.elements().find(|element| eq_ignore_case(element.id(), id))
    }

    /// Resolves a subject reference to an element.
    fn resolve(&self, subject: &SubjectRef) -> Option<&dyn Element> {
        match subject.kind {
            SubjectKind::Player => self.player(),
            SubjectKind::Target => self.target(),
            SubjectKind::Target2 => self.target2(),
            SubjectKind::CurrentScene => self.current_scene(),
            SubjectKind::Location => self.location(),
            SubjectKind::Session => self.session(),
            SubjectKind::Log => self.log(),
            SubjectKind::Item | SubjectKind::Npc | SubjectKind::Scene | SubjectKind::Exit => {
                self.element(subject.kind, subject.id.as_deref()?)
            }
        }
    }

    /// Ids of the elements whose container is `container`.
    fn contents(&self, container: &str) -> Vec<String> {
        self.elements()
            .filter(|element| {
                element
                    .container_id()
                    .is_some_and(|id| eq_ignore_case(id, container))
            })
            .map(|element| element.id().to_string())
            .collect()
    }
}

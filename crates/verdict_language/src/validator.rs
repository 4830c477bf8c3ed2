//! Semantic validation of parsed conditions.
//!
//! The validator only ever produces warnings. A condition that names an
//! element the content pack does not define still parses; it simply never
//! resolves at evaluation time, which is usually an authoring mistake.
//!
//! Objects are checked against the known elements. A [`Validator`] can also
//! be given flag and state names, which `is`/`is_not` objects may name
//! instead of an element.

use std::collections::HashSet;

use crate::ast::{Comparison, Node, ObjectRef, SubjectKind, SubjectRef};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::span::Span;
use crate::visitor::{NodeVisitor, walk_node};

/// Case-insensitive name set used for lookups.
#[derive(Clone, Debug, Default)]
pub struct NameSet(HashSet<String>);

impl NameSet {
    /// Builds a set from names, folding case.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(names.into_iter().map(|n| n.as_ref().to_lowercase()).collect())
    }

    /// Returns true if `name` is present, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_lowercase())
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Known names a condition is checked against.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    elements: NameSet,
    scenes: NameSet,
    attributes: NameSet,
    flags: NameSet,
    states: NameSet,
}

impl Validator {
    /// Creates a validator from the known element ids, scene names and attribute names.
    #[must_use]
    pub fn new(elements: NameSet, scenes: NameSet, attributes: NameSet) -> Self {
        Self {
            elements,
            scenes,
            attributes,
            flags: NameSet::default(),
            states: NameSet::default(),
        }
    }

    /// Accepts these flag names as objects.
    #[must_use]
    pub fn with_flags(mut self, flags: NameSet) -> Self {
        self.flags = flags;
        self
    }

    /// Accepts these state names as objects.
    #[must_use]
    pub fn with_states(mut self, states: NameSet) -> Self {
        self.states = states;
        self
    }

    /// Walks the tree and returns one warning per unknown reference.
    #[must_use]
    pub fn validate(&self, ast: &Node) -> Vec<Diagnostic> {
        let mut walker = Walker {
            known: self,
            warnings: Vec::new(),
            span: ast.span(),
        };
        walk_node(&mut walker, ast);
        walker.warnings
    }
}

/// Validates `ast` against the given known names.
///
/// Returns advisory warnings only; never an error.
#[must_use]
pub fn validate<E, S, A>(
    ast: &Node,
    known_elements: E,
    known_scenes: S,
    known_attributes: A,
) -> Vec<Diagnostic>
where
    E: IntoIterator,
    E::Item: AsRef<str>,
    S: IntoIterator,
    S::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    Validator::new(
        NameSet::new(known_elements),
        NameSet::new(known_scenes),
        NameSet::new(known_attributes),
    )
    .validate(ast)
}

/// Visitor state for one validation pass.
struct Walker<'a> {
    known: &'a Validator,
    warnings: Vec<Diagnostic>,
    /// Span of the relation currently being visited.
    span: Span,
}

impl Walker<'_> {
    fn warn(&mut self, code: DiagnosticCode, message: String) {
        self.warnings.push(Diagnostic::warning(code, message, self.span));
    }

    fn check_element(&mut self, id: &str) {
        if !self.known.elements.contains(id) {
            self.warn(
                DiagnosticCode::UnknownElement,
                format!("unknown element '{id}'"),
            );
        }
    }
}

impl NodeVisitor for Walker<'_> {
    fn enter_node(&mut self, node: &Node) {
        self.span = node.span();
    }

    fn visit_subject(&mut self, subject: &SubjectRef) {
        let Some(id) = &subject.id else {
            return;
        };
        if subject.kind == SubjectKind::Scene {
            if !self.known.scenes.contains(id) && !self.known.elements.contains(id) {
                self.warn(DiagnosticCode::UnknownScene, format!("unknown scene '{id}'"));
            }
        } else {
            self.check_element(id);
        }
    }

    fn visit_object(&mut self, object: &ObjectRef, _comparison: Comparison, _span: Span) {
        let ObjectRef::Element(id) = object else {
            return;
        };
        if SubjectKind::from_word(id).is_some()
            || self.known.flags.contains(id)
            || self.known.states.contains(id)
        {
            return;
        }
        self.check_element(id);
    }

    fn visit_attribute(&mut self, name: &str, _span: Span) {
        if !self.known.attributes.contains(name) {
            self.warn(
                DiagnosticCode::UnknownAttribute,
                format!("unknown attribute '{name}'"),
            );
        }
    }

    fn visit_scene(&mut self, name: &str, _span: Span) {
        if !self.known.scenes.contains(name) {
            self.warn(DiagnosticCode::UnknownScene, format!("unknown scene '{name}'"));
        }
    }
}

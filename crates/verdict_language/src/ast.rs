//! Abstract Syntax Tree for the condition DSL.
//!
//! The AST is a closed set of node variants. Every consumer (evaluator,
//! validator, projection, pretty-printer) matches on it exhaustively.

use std::fmt;

use crate::span::Span;

/// What a subject reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    /// The acting player.
    Player,
    /// The primary target of the verb.
    Target,
    /// The secondary target of the verb.
    Target2,
    /// The scene the player is in.
    CurrentScene,
    /// The element containing the player.
    Location,
    /// The game session.
    Session,
    /// The session log.
    Log,
    /// A named item.
    Item,
    /// A named non-player character.
    Npc,
    /// A named scene.
    Scene,
    /// A named exit.
    Exit,
}

impl SubjectKind {
    /// Every subject kind, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Player,
        Self::Target,
        Self::Target2,
        Self::CurrentScene,
        Self::Location,
        Self::Session,
        Self::Log,
        Self::Item,
        Self::Npc,
        Self::Scene,
        Self::Exit,
    ];

    /// Looks up the subject keyword for a word, ignoring case.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "player" => Self::Player,
            "target" => Self::Target,
            "target2" => Self::Target2,
            "currentscene" | "current_scene" => Self::CurrentScene,
            "location" => Self::Location,
            "session" => Self::Session,
            "log" => Self::Log,
            "item" => Self::Item,
            "npc" => Self::Npc,
            "scene" => Self::Scene,
            "exit" => Self::Exit,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true if references of this kind must name an element id.
    #[must_use]
    pub const fn requires_id(self) -> bool {
        matches!(self, Self::Item | Self::Npc | Self::Scene | Self::Exit)
    }

    /// Canonical spelling of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Target => "target",
            Self::Target2 => "target2",
            Self::CurrentScene => "currentScene",
            Self::Location => "location",
            Self::Session => "session",
            Self::Log => "log",
            Self::Item => "item",
            Self::Npc => "npc",
            Self::Scene => "scene",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to the thing a relation talks about.
///
/// Kinds `item`, `npc`, `scene` and `exit` carry an id; the others never do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubjectRef {
    /// What kind of subject this is.
    pub kind: SubjectKind,
    /// Element id, for kinds that require one.
    pub id: Option<String>,
}

impl SubjectRef {
    /// A subject that carries no id, like `player` or `session`.
    #[must_use]
    pub const fn simple(kind: SubjectKind) -> Self {
        Self { kind, id: None }
    }

    /// A subject naming a specific element.
    #[must_use]
    pub fn with_id(kind: SubjectKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }

    /// Shorthand for the player subject.
    #[must_use]
    pub const fn player() -> Self {
        Self::simple(SubjectKind::Player)
    }

    /// Shorthand for an item subject.
    #[must_use]
    pub fn item(id: impl Into<String>) -> Self {
        Self::with_id(SubjectKind::Item, id)
    }

    /// Returns true if the id is present exactly when the kind requires one.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.kind.requires_id() == self.id.is_some()
    }

    /// The word that names this subject: its id, or its kind keyword.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.as_deref().unwrap_or(self.kind.as_str())
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {id}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// A literal operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// `true` or `false`
    Bool(bool),
    /// Numeric literal
    Number(f64),
    /// Quoted string, or the empty operand of `is_empty`
    Text(String),
}

/// The right-hand side of a relation.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectRef {
    /// A bare identifier, resolved against game elements at evaluation time.
    Element(String),
    /// A literal value.
    Literal(Literal),
}

impl ObjectRef {
    /// An element reference.
    #[must_use]
    pub fn element(id: impl Into<String>) -> Self {
        Self::Element(id.into())
    }

    /// A text literal.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Text(value.into()))
    }

    /// A numeric literal.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Literal(Literal::Number(value))
    }

    /// A boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    /// `"element"` or `"literal"`.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Element(_) => "element",
            Self::Literal(_) => "literal",
        }
    }

    /// The operand as written: the element id or the literal's text form.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Element(id) => id.clone(),
            Self::Literal(Literal::Text(text)) => text.clone(),
            Self::Literal(Literal::Number(n)) => format_number(*n),
            Self::Literal(Literal::Bool(b)) => b.to_string(),
        }
    }

    /// The numeric value of a numeric literal.
    #[must_use]
    pub const fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Literal(Literal::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value of a boolean literal.
    #[must_use]
    pub const fn bool_value(&self) -> Option<bool> {
        match self {
            Self::Literal(Literal::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

/// Formats a number without a trailing `.0` when it is integral.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Relation operators, a fixed closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `has`: the subject contains the object.
    Has,
    /// `is`
    Is,
    /// `is_not`
    IsNot,
    /// `is_less_than`
    LessThan,
    /// `is_greater_than`
    GreaterThan,
    /// `is_equal_to`
    EqualTo,
    /// `is_not_equal_to`
    NotEqualTo,
    /// `is_in`: the subject is in the object's inventory.
    In,
    /// `is_empty`
    Empty,
}

impl Comparison {
    /// Canonical spelling of this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Has => "has",
            Self::Is => "is",
            Self::IsNot => "is_not",
            Self::LessThan => "is_less_than",
            Self::GreaterThan => "is_greater_than",
            Self::EqualTo => "is_equal_to",
            Self::NotEqualTo => "is_not_equal_to",
            Self::In => "is_in",
            Self::Empty => "is_empty",
        }
    }

    /// Returns true for the operators that require comparable numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::GreaterThan | Self::EqualTo | Self::NotEqualTo
        )
    }

    /// Returns true if count and distance relations may use this operator.
    #[must_use]
    pub const fn applies_to_numbers(self) -> bool {
        matches!(self, Self::Is | Self::IsNot) || self.is_numeric()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subject/operator/object comparison, the atomic condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    /// What the relation talks about.
    pub subject: SubjectRef,
    /// The operator.
    pub comparison: Comparison,
    /// The right-hand operand.
    pub object: ObjectRef,
    /// Attribute named by an `.attribute NAME` segment.
    pub attribute: Option<String>,
    /// Field named by the last `.FIELD` segment.
    pub property: Option<String>,
    /// Source span of the whole relation.
    pub span: Span,
}

impl Relation {
    /// Returns true if no `.field` segment was written.
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.attribute.is_none() && self.property.is_none()
    }
}

/// `SUBJECT visits SCENE COMPARISON N`
#[derive(Clone, Debug, PartialEq)]
pub struct CountRelation {
    /// Whose visits are counted.
    pub subject: SubjectRef,
    /// The scene being counted.
    pub scene: String,
    /// Numeric comparison operator.
    pub comparison: Comparison,
    /// Integer operand.
    pub value: i64,
    /// Source span.
    pub span: Span,
}

/// `A distance_from B COMPARISON N`
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceRelation {
    /// Where the distance is measured from.
    pub from: SubjectRef,
    /// Where the distance is measured to.
    pub to: SubjectRef,
    /// Numeric comparison operator.
    pub comparison: Comparison,
    /// Integer operand.
    pub value: i64,
    /// Source span.
    pub span: Span,
}

/// An AST node. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// `left and right`
    And(Box<Node>, Box<Node>, Span),
    /// `left or right`
    Or(Box<Node>, Box<Node>, Span),
    /// `not inner`
    Not(Box<Node>, Span),
    /// Property, identity, containment or emptiness relation.
    Relation(Relation),
    /// Scene visit count relation.
    Count(CountRelation),
    /// Distance relation.
    Distance(DistanceRelation),
}

impl Node {
    /// Builds an `and` node spanning both operands.
    #[must_use]
    pub fn and(left: Node, right: Node) -> Self {
        let span = left.span().to(right.span());
        Self::And(Box::new(left), Box::new(right), span)
    }

    /// Builds an `or` node spanning both operands.
    #[must_use]
    pub fn or(left: Node, right: Node) -> Self {
        let span = left.span().to(right.span());
        Self::Or(Box::new(left), Box::new(right), span)
    }

    /// Builds a `not` node.
    #[must_use]
    pub fn not(inner: Node, span: Span) -> Self {
        Self::Not(Box::new(inner), span)
    }

    /// Returns the source span of this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::And(_, _, s) | Self::Or(_, _, s) | Self::Not(_, s) => *s,
            Self::Relation(r) => r.span,
            Self::Count(c) => c.span,
            Self::Distance(d) => d.span,
        }
    }

    /// The node's projection tag.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::And(..) => "AND",
            Self::Or(..) => "OR",
            Self::Not(..) => "NOT",
            Self::Relation(_) => "RELATION",
            Self::Count(_) => "COUNT",
            Self::Distance(_) => "DISTANCE",
        }
    }

    /// Returns the relation, or None if this is another kind of node.
    #[must_use]
    pub const fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(r) => Some(r),
            _ => None,
        }
    }

    /// Maximum nesting depth; a lone relation has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::And(l, r, _) | Self::Or(l, r, _) => 1 + l.depth().max(r.depth()),
            Self::Not(inner, _) => 1 + inner.depth(),
            Self::Relation(_) | Self::Count(_) | Self::Distance(_) => 1,
        }
    }
}

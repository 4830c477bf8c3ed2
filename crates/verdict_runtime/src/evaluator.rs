//! Tree-walking evaluation of condition ASTs.
//!
//! The evaluator is fail-closed: a subject or object that does not resolve
//! makes its relation `false`, never an error. `and`/`or` evaluate both
//! operands before combining them.
//!
//! Property resolution follows a fixed order over the element's storage
//! kinds:
//!
//! - no field (`desk is open`): element identity if the object names an
//!   element, else a flag named by the object, else the state;
//! - `.state`: current state, else default state;
//! - `.flag`: the flag named by the object;
//! - `.attribute NAME`: the attribute;
//! - `.inventory`: the `inventory` property, else the ids of contained
//!   elements;
//! - any other `.NAME`: custom property, then flag, then whether the state is
//!   `NAME`.

use std::cmp::Ordering;

use tracing::trace;
use verdict_foundation::{Value, eq_ignore_case};
use verdict_language::{
    Comparison, CountRelation, DistanceRelation, Literal, Node, ObjectRef, Relation, SubjectKind,
    SubjectRef,
};

use crate::context::{Element, EvaluationContext};

/// Evaluates condition trees against one context.
pub struct Evaluator<'ctx, C: EvaluationContext + ?Sized> {
    context: &'ctx C,
}

impl<'ctx, C: EvaluationContext + ?Sized> Evaluator<'ctx, C> {
    /// Creates an evaluator reading from `context`.
    #[must_use]
    pub const fn new(context: &'ctx C) -> Self {
        Self { context }
    }

    /// Evaluates a condition.
    #[must_use]
    pub fn evaluate(&self, node: &Node) -> bool {
        match node {
            Node::And(left, right, _) => {
                let left = self.evaluate(left);
                let right = self.evaluate(right);
                left && right
            }
            Node::Or(left, right, _) => {
                let left = self.evaluate(left);
                let right = self.evaluate(right);
                left || right
            }
            Node::Not(inner, _) => !self.evaluate(inner),
            Node::Relation(relation) => self.relation(relation),
            Node::Count(count) => self.count(count),
            Node::Distance(distance) => self.distance(distance),
        }
    }

    fn relation(&self, relation: &Relation) -> bool {
        let Some(subject) = self.context.resolve(&relation.subject) else {
            trace!(subject = %relation.subject, "unresolved subject");
            return false;
        };

        let result = match relation.comparison {
            Comparison::Has => self.has(subject, &relation.object),
            Comparison::Empty => self.subject_value(subject, relation).is_empty(),
            Comparison::In => self.is_in(subject, relation),
            Comparison::Is => self.equals(subject, relation),
            Comparison::IsNot => !self.equals(subject, relation),
            Comparison::LessThan
            | Comparison::GreaterThan
            | Comparison::EqualTo
            | Comparison::NotEqualTo => self.compare(subject, relation),
        };

        trace!(
            subject = %relation.subject,
            comparison = %relation.comparison,
            object = %relation.object.value(),
            result,
            "relation"
        );
        result
    }

    fn count(&self, count: &CountRelation) -> bool {
        match self.context.visit_count(&count.subject, &count.scene) {
            Some(visits) => holds(count.comparison, visits.cmp(&count.value)),
            None => {
                trace!(subject = %count.subject, scene = %count.scene, "no visit count");
                false
            }
        }
    }

    fn distance(&self, distance: &DistanceRelation) -> bool {
        match self.context.distance(&distance.from, &distance.to) {
            Some(measured) => holds(distance.comparison, measured.cmp(&distance.value)),
            None => {
                trace!(from = %distance.from, to = %distance.to, "no distance");
                false
            }
        }
    }

    /// `is` without the negation.
    fn equals(&self, subject: &dyn Element, relation: &Relation) -> bool {
        if relation.is_bare() {
            return self.bare_equals(subject, &relation.object);
        }
        if relation.attribute.is_none()
            && relation
                .property
                .as_deref()
                .is_some_and(|p| eq_ignore_case(p, "flag"))
        {
            return subject.flag(&relation.object.value()).unwrap_or(false);
        }
        self.subject_value(subject, relation)
            .loosely_equals(&self.object_value(&relation.object))
    }

    fn bare_equals(&self, subject: &dyn Element, object: &ObjectRef) -> bool {
        let name = match object {
            ObjectRef::Element(name) => {
                if let Some(other) = self.object_element(name) {
                    return eq_ignore_case(subject.id(), other.id());
                }
                name.as_str()
            }
            ObjectRef::Literal(Literal::Text(text)) => text.as_str(),
            ObjectRef::Literal(literal) => {
                return subject.state().is_some_and(|state| {
                    Value::Text(state.to_string()).loosely_equals(&literal_value(literal))
                });
            }
        };

        if let Some(flag) = subject.flag(name) {
            return flag;
        }
        subject
            .state()
            .is_some_and(|state| eq_ignore_case(state, name))
    }

    /// Numeric comparison. A bare subject compares by its state.
    fn compare(&self, subject: &dyn Element, relation: &Relation) -> bool {
        let actual = if relation.is_bare() {
            state_value(subject)
        } else {
            self.subject_value(subject, relation)
        };
        let expected = self.object_value(&relation.object);
        match actual.compare_numeric(&expected) {
            Some(ordering) => holds(relation.comparison, ordering),
            None => {
                trace!(actual = ?actual, expected = ?expected, "operands not comparable");
                false
            }
        }
    }

    fn has(&self, subject: &dyn Element, object: &ObjectRef) -> bool {
        let name = match object {
            ObjectRef::Element(name) | ObjectRef::Literal(Literal::Text(name)) => name.as_str(),
            ObjectRef::Literal(_) => return false,
        };
        let wanted = self.keyword_element(name).map_or(name, |element| element.id());

        self.context.elements().any(|element| {
            element
                .container_id()
                .is_some_and(|container| eq_ignore_case(container, subject.id()))
                && (eq_ignore_case(element.id(), wanted) || eq_ignore_case(element.name(), wanted))
        })
    }

    fn is_in(&self, subject: &dyn Element, relation: &Relation) -> bool {
        let ObjectRef::Element(name) = &relation.object else {
            return false;
        };
        let Some(container) = self.object_element(name) else {
            trace!(object = %name, "unresolved container");
            return false;
        };
        let inventory = self.inventory(container);

        if relation.is_bare() {
            inventory.contains(&Value::Text(subject.id().to_string()))
                || inventory.contains(&Value::Text(subject.name().to_string()))
        } else {
            inventory.contains(&self.subject_value(subject, relation))
        }
    }

    /// The value a field-qualified subject denotes. A bare subject denotes its
    /// inventory, which is what `is_empty` tests.
    fn subject_value(&self, subject: &dyn Element, relation: &Relation) -> Value {
        if let Some(attribute) = &relation.attribute {
            return subject.attribute(attribute).unwrap_or(Value::Nil);
        }
        let Some(field) = relation.property.as_deref() else {
            return self.inventory(subject);
        };

        if eq_ignore_case(field, "state") {
            state_value(subject)
        } else if eq_ignore_case(field, "inventory") {
            self.inventory(subject)
        } else if eq_ignore_case(field, "flag") {
            Value::Nil
        } else {
            subject
                .property(field)
                .or_else(|| subject.flag(field).map(Value::Bool))
                .unwrap_or_else(|| {
                    Value::Bool(subject.state().is_some_and(|s| eq_ignore_case(s, field)))
                })
        }
    }

    fn object_value(&self, object: &ObjectRef) -> Value {
        match object {
            ObjectRef::Literal(literal) => literal_value(literal),
            ObjectRef::Element(name) => self
                .object_element(name)
                .map_or_else(|| Value::Text(name.clone()), |e| Value::Element(e.id().to_string())),
        }
    }

    fn inventory(&self, element: &dyn Element) -> Value {
        element.property("inventory").unwrap_or_else(|| {
            Value::List(
                self.context
                    .contents(element.id())
                    .into_iter()
                    .map(Value::Element)
                    .collect(),
            )
        })
    }

    /// Resolves an object identifier: subject keywords first, then element ids.
    fn object_element(&self, name: &str) -> Option<&'ctx dyn Element> {
        match SubjectKind::from_word(name) {
            Some(kind) if !kind.requires_id() => self.context.resolve(&SubjectRef::simple(kind)),
            _ => self.context.find(name),
        }
    }

    fn keyword_element(&self, name: &str) -> Option<&'ctx dyn Element> {
        SubjectKind::from_word(name)
            .filter(|kind| !kind.requires_id())
            .and_then(|kind| self.context.resolve(&SubjectRef::simple(kind)))
    }
}

/// Evaluates `node` against `context`.
#[must_use]
pub fn evaluate<C: EvaluationContext + ?Sized>(node: &Node, context: &C) -> bool {
    Evaluator::new(context).evaluate(node)
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::Text(text) => Value::Text(text.clone()),
    }
}

/// Current state, else default state.
fn state_value(element: &dyn Element) -> Value {
    element
        .state()
        .map_or(Value::Nil, |state| Value::Text(state.to_string()))
}

/// Applies a comparison operator to an ordering.
fn holds(comparison: Comparison, ordering: Ordering) -> bool {
    match comparison {
        Comparison::LessThan => ordering == Ordering::Less,
        Comparison::GreaterThan => ordering == Ordering::Greater,
        Comparison::Is | Comparison::EqualTo => ordering == Ordering::Equal,
        Comparison::IsNot | Comparison::NotEqualTo => ordering != Ordering::Equal,
        Comparison::Has | Comparison::In | Comparison::Empty => false,
    }
}

//! Read-only traversal of condition trees.
//!
//! [`NodeVisitor`] has a no-op default for every hook, so implementors only
//! override what they care about. [`walk_node`] drives the traversal.
//!
//! # Example
//!
//! ```
//! use verdict_language::parse;
//! use verdict_language::ast::SubjectRef;
//! use verdict_language::visitor::{NodeVisitor, walk_node};
//!
//! struct SubjectCounter(usize);
//!
//! impl NodeVisitor for SubjectCounter {
//!     fn visit_subject(&mut self, _subject: &SubjectRef) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let ast = parse("player has lamp and desk is open").unwrap();
//! let mut counter = SubjectCounter(0);
//! walk_node(&mut counter, &ast);
//! assert_eq!(counter.0, 2);
//! ```

use std::collections::BTreeSet;

use crate::ast::{
    Comparison, CountRelation, DistanceRelation, Node, ObjectRef, Relation, SubjectKind,
    SubjectRef,
};
use crate::span::Span;

/// Trait for read-only AST visitors.
#[allow(unused_variables)]
pub trait NodeVisitor {
    /// Called when entering any node, before its children.
    fn enter_node(&mut self, node: &Node) {}

    /// Called when leaving any node, after its children.
    fn leave_node(&mut self, node: &Node) {}

    /// Visit a relation node (before its subject and object).
    fn visit_relation(&mut self, relation: &Relation) {}

    /// Visit a count relation (before its subject and scene).
    fn visit_count(&mut self, count: &CountRelation) {}

    /// Visit a distance relation (before its subjects).
    fn visit_distance(&mut self, distance: &DistanceRelation) {}

    /// Visit a subject reference.
    fn visit_subject(&mut self, subject: &SubjectRef) {}

    /// Visit a relation's object, with the comparison it is used with.
    fn visit_object(&mut self, object: &ObjectRef, comparison: Comparison, span: Span) {}

    /// Visit an attribute name from an `.attribute NAME` segment.
    fn visit_attribute(&mut self, name: &str, span: Span) {}

    /// Visit the scene name of a count relation.
    fn visit_scene(&mut self, name: &str, span: Span) {}
}

/// Walks a node depth-first, calling visitor hooks.
///
/// Children of `and`/`or` are visited left to right.
pub fn walk_node<V: NodeVisitor + ?Sized>(visitor: &mut V, node: &Node) {
    visitor.enter_node(node);

    match node {
        Node::And(left, right, _) | Node::Or(left, right, _) => {
            walk_node(visitor, left);
            walk_node(visitor, right);
        }
        Node::Not(inner, _) => walk_node(visitor, inner),
        Node::Relation(relation) => {
            visitor.visit_relation(relation);
            visitor.visit_subject(&relation.subject);
            if let Some(attribute) = &relation.attribute {
                visitor.visit_attribute(attribute, relation.span);
            }
            visitor.visit_object(&relation.object, relation.comparison, relation.span);
        }
        Node::Count(count) => {
            visitor.visit_count(count);
            visitor.visit_subject(&count.subject);
            visitor.visit_scene(&count.scene, count.span);
        }
        Node::Distance(distance) => {
            visitor.visit_distance(distance);
            visitor.visit_subject(&distance.from);
            visitor.visit_subject(&distance.to);
        }
    }

    visitor.leave_node(node);
}

// =============================================================================
// Utility Visitors
// =============================================================================

/// Names a condition refers to, sorted and deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct References {
    /// Element ids named by subjects and by element objects of `has`/`is_in`.
    pub elements: BTreeSet<String>,
    /// Scene names, from count relations and `scene X` subjects.
    pub scenes: BTreeSet<String>,
    /// Attribute names.
    pub attributes: BTreeSet<String>,
}

/// Collects the element, scene and attribute names a tree refers to.
///
/// Subject keywords like `player` are not names and are skipped.
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    /// What has been collected so far.
    pub references: References,
}

impl NodeVisitor for ReferenceCollector {
    fn visit_subject(&mut self, subject: &SubjectRef) {
        if let Some(id) = &subject.id {
            if subject.kind == SubjectKind::Scene {
                self.references.scenes.insert(id.clone());
            } else {
                self.references.elements.insert(id.clone());
            }
        }
    }

    fn visit_object(&mut self, object: &ObjectRef, comparison: Comparison, _span: Span) {
        if !matches!(comparison, Comparison::Has | Comparison::In) {
            return;
        }
        if let ObjectRef::Element(id) = object {
            if SubjectKind::from_word(id).is_none() {
                self.references.elements.insert(id.clone());
            }
        }
    }

    fn visit_attribute(&mut self, name: &str, _span: Span) {
        self.references.attributes.insert(name.to_string());
    }

    fn visit_scene(&mut self, name: &str, _span: Span) {
        self.references.scenes.insert(name.to_string());
    }
}

/// Computes the maximum depth of a tree.
#[derive(Debug, Default)]
pub struct DepthCalculator {
    current_depth: usize,
    /// Maximum depth encountered.
    pub max_depth: usize,
}

impl NodeVisitor for DepthCalculator {
    fn enter_node(&mut self, _node: &Node) {
        self.current_depth += 1;
        self.max_depth = self.max_depth.max(self.current_depth);
    }

    fn leave_node(&mut self, _node: &Node) {
        self.current_depth -= 1;
    }
}

/// Counts nodes by type.
#[derive(Debug, Default)]
pub struct NodeCounter {
    /// Count of `and` nodes.
    pub and_count: usize,
    /// Count of `or` nodes.
    pub or_count: usize,
    /// Count of `not` nodes.
    pub not_count: usize,
    /// Count of relation nodes.
    pub relation_count: usize,
    /// Count of count-relation nodes.
    pub count_count: usize,
    /// Count of distance-relation nodes.
    pub distance_count: usize,
}

impl NodeCounter {
    /// Returns the total number of nodes counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.and_count
            + self.or_count
            + self.not_count
            + self.relation_count
            + self.count_count
            + self.distance_count
    }
}

impl NodeVisitor for NodeCounter {
    fn enter_node(&mut self, node: &Node) {
        match node {
            Node::And(..) => self.and_count += 1,
            Node::Or(..) => self.or_count += 1,
            Node::Not(..) => self.not_count += 1,
            Node::Relation(_) => self.relation_count += 1,
            Node::Count(_) => self.count_count += 1,
            Node::Distance(_) => self.distance_count += 1,
        }
    }
}

impl Node {
    /// Collects the element, scene and attribute names this tree refers to.
    #[must_use]
    pub fn references(&self) -> References {
        let mut collector = ReferenceCollector::default();
        walk_node(&mut collector, self);
        collector.references
    }
}

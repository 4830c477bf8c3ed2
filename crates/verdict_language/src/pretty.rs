//! Pretty-printer for condition trees.
//!
//! Renders any [`Node`] back to strict canonical text. Parentheses are only
//! emitted where precedence or associativity requires them, so parsing the
//! printed text yields an equal tree (modulo spans).
//!
//! # Example
//!
//! ```
//! use verdict_language::{parse, pretty::pretty_print};
//!
//! let ast = parse("(a is x or b is x) and not c.state is open").unwrap();
//! assert_eq!(
//!     pretty_print(&ast),
//!     "(item a is x or item b is x) and not item c.state is open"
//! );
//! ```

use std::fmt;

use crate::ast::{Comparison, Literal, Node, ObjectRef, Relation};
use crate::token::TokenKind;

/// Binding strength, loosest first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Or,
    And,
    Unary,
}

/// Pretty-print a node to canonical text.
#[must_use]
pub fn pretty_print(node: &Node) -> String {
    let mut printer = PrettyPrinter::default();
    printer.print(node, Precedence::Or);
    printer.output
}

/// Pretty-printer state.
#[derive(Default)]
struct PrettyPrinter {
    output: String,
}

impl PrettyPrinter {
    /// Prints `node` in a position that needs at least `min` binding strength.
    fn print(&mut self, node: &Node, min: Precedence) {
        let own = match node {
            Node::Or(..) => Precedence::Or,
            Node::And(..) => Precedence::And,
            _ => Precedence::Unary,
        };
        let parens = own < min;
        if parens {
            self.output.push('(');
        }

        match node {
            Node::Or(left, right, _) => {
                self.print(left, Precedence::Or);
                self.output.push_str(" or ");
                self.print(right, Precedence::And);
            }
            Node::And(left, right, _) => {
                self.print(left, Precedence::And);
                self.output.push_str(" and ");
                self.print(right, Precedence::Unary);
            }
            Node::Not(inner, _) => {
                self.output.push_str("not ");
                self.print(inner, Precedence::Unary);
            }
            Node::Relation(relation) => self.print_relation(relation),
            Node::Count(count) => {
                self.output.push_str(&count.subject.to_string());
                self.output.push_str(" visits ");
                self.print_word(&count.scene);
                self.print_tail(count.comparison, count.value);
            }
            Node::Distance(distance) => {
                self.output.push_str(&distance.from.to_string());
                self.output.push_str(" distance_from ");
                self.output.push_str(&distance.to.to_string());
                self.print_tail(distance.comparison, distance.value);
            }
        }

        if parens {
            self.output.push(')');
        }
    }

    fn print_relation(&mut self, relation: &Relation) {
        self.output.push_str(&relation.subject.to_string());

        if relation.comparison == Comparison::Has {
            self.output.push_str(" has ");
            self.output.push_str(&relation.object.value());
            return;
        }

        if let Some(attribute) = &relation.attribute {
            self.output.push_str(".attribute ");
            self.output.push_str(attribute);
        }
        if let Some(property) = &relation.property {
            self.output.push('.');
            self.output.push_str(property);
        }

        self.output.push(' ');
        self.output.push_str(relation.comparison.as_str());

        match &relation.object {
            ObjectRef::Literal(Literal::Text(text))
                if text.is_empty() && relation.comparison == Comparison::Empty => {}
            ObjectRef::Literal(Literal::Text(text)) => {
                self.output.push(' ');
                self.print_string(text);
            }
            object => {
                self.output.push(' ');
                self.output.push_str(&object.value());
            }
        }
    }

    fn print_tail(&mut self, comparison: Comparison, value: i64) {
        self.output.push(' ');
        self.output.push_str(comparison.as_str());
        self.output.push(' ');
        self.output.push_str(&value.to_string());
    }

    /// Prints a name bare if it lexes as one identifier, quoted otherwise.
    fn print_word(&mut self, word: &str) {
        if is_plain_identifier(word) {
            self.output.push_str(word);
        } else {
            self.print_string(word);
        }
    }

    fn print_string(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}

/// Returns true if `word` lexes as a single non-keyword identifier.
fn is_plain_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && TokenKind::keyword(word).is_none()
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_print(self))
    }
}

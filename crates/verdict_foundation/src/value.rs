//! Dynamic value type produced while resolving condition operands.

use std::cmp::Ordering;
use std::fmt;

/// A resolved operand value.
///
/// Values are what the evaluator compares: entity storage (flags, properties,
/// attributes, states) and literal condition operands all resolve to one of
/// these variants.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Absence of a value.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// Numeric value. Integers are stored as floats.
    Number(f64),
    /// Free text (state names, string properties).
    Text(String),
    /// Ordered collection, e.g. an inventory.
    List(Vec<Value>),
    /// Reference to a game element by its canonical id.
    #[cfg_attr(feature = "serde", serde(skip))]
    Element(String),
}

impl Value {
    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns true for nil, the empty string and the empty collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) | Self::Number(_) | Self::Element(_) => false,
        }
    }

    /// Attempts to extract a boolean, accepting `"true"`/`"false"` text.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Attempts to extract a number, accepting numeric text.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Returns the textual identity of text and element values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Element(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items of a collection.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Loose equality used by `is` / `is_not`.
    ///
    /// Numbers compare numerically (numeric text included), booleans compare
    /// with boolean text, and text or element identities compare
    /// case-insensitively.
    #[must_use]
    pub fn loosely_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Nil, _) | (_, Self::Nil) => false,
            (Self::Number(_), _) | (_, Self::Number(_)) => {
                match (self.as_number(), other.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Self::Bool(_), _) | (_, Self::Bool(_)) => match (self.as_bool(), other.as_bool()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Self::List(_), _) | (_, Self::List(_)) => false,
            (a, b) => match (a.as_text(), b.as_text()) {
                (Some(a), Some(b)) => eq_ignore_case(a, b),
                _ => false,
            },
        }
    }

    /// Numeric ordering, or `None` when either side is not comparable.
    #[must_use]
    pub fn compare_numeric(&self, other: &Self) -> Option<Ordering> {
        let a = self.as_number()?;
        let b = other.as_number()?;
        a.partial_cmp(&b)
    }

    /// Returns true if this is a collection containing `needle`.
    #[must_use]
    pub fn contains(&self, needle: &Self) -> bool {
        self.as_list()
            .is_some_and(|items| items.iter().any(|item| item.loosely_equals(needle)))
    }
}

/// Unicode-aware case-insensitive comparison.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) | (Self::Element(a), Self::Element(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Element(id) => write!(f, "#{id}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

//! Token types for the condition DSL.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Returns true if the source spelling of this token is `word`, ignoring case.
    #[must_use]
    pub fn is_spelled(&self, source: &str, word: &str) -> bool {
        self.text(source).eq_ignore_ascii_case(word)
    }
}

/// Token types for the condition DSL.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `.`
    Dot,

    // Literals
    /// `true`
    True,
    /// `false`
    False,
    /// Numeric literal like `3`, `-2` or `0.5`
    Number(f64),
    /// Double-quoted string literal
    String(String),
    /// Any identifier that is not a keyword
    Identifier(String),

    // Logical keywords
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,

    // Comparison keywords
    /// `is`
    Is,
    /// `is_not`
    IsNot,
    /// `is_less_than`
    IsLessThan,
    /// `is_greater_than`
    IsGreaterThan,
    /// `is_equal_to`
    IsEqualTo,
    /// `is_not_equal_to`
    IsNotEqualTo,
    /// `is_in`, also spelled `has`
    IsIn,
    /// `is_empty`
    IsEmpty,

    // Field and relation keywords
    /// `attribute`
    Attribute,
    /// `state`
    State,
    /// `flag`
    Flag,
    /// `inventory`
    Inventory,
    /// `visits`
    Visits,
    /// `distance_from`
    DistanceFrom,

    // Meta
    /// End of input
    Eof,
    /// Unrecognized input, carrying a description for diagnostics
    Unknown(String),
}

impl TokenKind {
    /// Looks up a reserved word, ignoring case.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "is" => Self::Is,
            "is_not" => Self::IsNot,
            "is_less_than" => Self::IsLessThan,
            "is_greater_than" => Self::IsGreaterThan,
            "is_equal_to" => Self::IsEqualTo,
            "is_not_equal_to" => Self::IsNotEqualTo,
            "is_in" | "has" => Self::IsIn,
            "is_empty" => Self::IsEmpty,
            "attribute" => Self::Attribute,
            "state" => Self::State,
            "flag" => Self::Flag,
            "inventory" => Self::Inventory,
            "visits" => Self::Visits,
            "distance_from" => Self::DistanceFrom,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true if this token is a comparison operator.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Is
                | Self::IsNot
                | Self::IsLessThan
                | Self::IsGreaterThan
                | Self::IsEqualTo
                | Self::IsNotEqualTo
                | Self::IsIn
                | Self::IsEmpty
        )
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Dot => "'.'",
            Self::True => "true",
            Self::False => "false",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Identifier(_) => "identifier",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Not => "'not'",
            Self::Is => "'is'",
            Self::IsNot => "'is_not'",
            Self::IsLessThan => "'is_less_than'",
            Self::IsGreaterThan => "'is_greater_than'",
            Self::IsEqualTo => "'is_equal_to'",
            Self::IsNotEqualTo => "'is_not_equal_to'",
            Self::IsIn => "'is_in'",
            Self::IsEmpty => "'is_empty'",
            Self::Attribute => "'attribute'",
            Self::State => "'state'",
            Self::Flag => "'flag'",
            Self::Inventory => "'inventory'",
            Self::Visits => "'visits'",
            Self::DistanceFrom => "'distance_from'",
            Self::Eof => "end of input",
            Self::Unknown(_) => "unrecognized input",
        }
    }
}

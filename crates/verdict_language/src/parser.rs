//! Recursive-descent parser for the condition DSL.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! Expression := OrExpr
//! OrExpr     := AndExpr ("or" AndExpr)*
//! AndExpr    := UnaryExpr ("and" UnaryExpr)*
//! UnaryExpr  := "not" UnaryExpr | "(" Expression ")" | Relation
//! Relation   := Subject ( HasRel | DistanceRel | CountRel | PropertyRel )
//! ```
//!
//! The first grammar mismatch aborts the parse. Internally this travels as a
//! `Result<_, Diagnostic>`; [`parse_condition`] turns it into a
//! [`ParseResult`] and [`Parser::parse`] into a crate [`Error`].

use verdict_foundation::Result;

use crate::ast::{
    Comparison, CountRelation, DistanceRelation, Literal, Node, ObjectRef, Relation, SubjectKind,
    SubjectRef,
};
use crate::diagnostic::{Diagnostic, ParseResult};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Internal result type: the error is the diagnostic to report.
type ParseStep<T> = std::result::Result<T, Diagnostic>;

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting before the parse is rejected. `not`, parentheses and
    /// every `and`/`or` in a chain each count one level.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parser for canonical condition text.
pub struct Parser<'src> {
    /// Source text (for spellings and error context).
    source: &'src str,
    /// Token stream, always terminated by `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// Current nesting, including open `and`/`or` chains.
    depth: usize,
    config: ParserConfig,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    /// Creates a parser with explicit settings.
    #[must_use]
    pub fn with_config(source: &'src str, config: ParserConfig) -> Self {
        Self {
            source,
            tokens: Lexer::tokenize_all(source),
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Parses the whole source as one condition.
    ///
    /// # Errors
    /// Returns a parse error (or a limit error for excessive nesting) if the
    /// source is not a single well-formed condition.
    pub fn parse(&mut self) -> Result<Node> {
        self.parse_complete()
            .map_err(|diagnostic| diagnostic.into_error(self.source))
    }

    /// Parses the whole source, reporting failure as a [`ParseResult`].
    #[must_use]
    pub fn parse_result(&mut self) -> ParseResult {
        match self.parse_complete() {
            Ok(ast) => ParseResult::success_with(ast),
            Err(diagnostic) => ParseResult::failure(diagnostic),
        }
    }

    /// Parses an expression and requires that all input was consumed.
    fn parse_complete(&mut self) -> ParseStep<Node> {
        let node = self.parse_expression()?;
        if self.current().kind != TokenKind::Eof {
            return Err(self.unexpected());
        }
        Ok(node)
    }

    /// `Expression := OrExpr`
    fn parse_expression(&mut self) -> ParseStep<Node> {
        self.parse_or()
    }

    /// `OrExpr := AndExpr ("or" AndExpr)*`, left-associative.
    ///
    /// Each fold deepens the tree by one level and counts against the
    /// nesting limit until the chain ends.
    fn parse_or(&mut self) -> ParseStep<Node> {
        let mut left = self.parse_and()?;
        let mut folds = 0;
        while self.current().kind == TokenKind::Or {
            let span = self.current().span;
            self.enter(span)?;
            folds += 1;
            self.advance();
            let right = self.parse_and()?;
            left = Node::or(left, right);
        }
        self.depth -= folds;
        Ok(left)
    }

    /// `AndExpr := UnaryExpr ("and" UnaryExpr)*`, left-associative.
    fn parse_and(&mut self) -> ParseStep<Node> {
        let mut left = self.parse_unary()?;
        let mut folds = 0;
        while self.current().kind == TokenKind::And {
            let span = self.current().span;
            self.enter(span)?;
            folds += 1;
            self.advance();
            let right = self.parse_unary()?;
            left = Node::and(left, right);
        }
        self.depth -= folds;
        Ok(left)
    }

    /// `UnaryExpr := "not" UnaryExpr | "(" Expression ")" | Relation`
    fn parse_unary(&mut self) -> ParseStep<Node> {
        let start = self.current().span;
        match self.current().kind {
            TokenKind::Not => {
                self.enter(start)?;
                self.advance();
                let inner = self.parse_unary()?;
                self.depth -= 1;
                let span = start.to(inner.span());
                Ok(Node::not(inner, span))
            }
            TokenKind::LParen => {
                self.enter(start)?;
                self.advance();
                let inner = self.parse_expression()?;
                if self.current().kind != TokenKind::RParen {
                    return Err(self.error(format!(
                        "expected ')' to close '(' opened at {start}, found {}",
                        self.describe_current()
                    )));
                }
                self.advance();
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.parse_relation(),
        }
    }

    /// `Relation := Subject ( HasRel | DistanceRel | CountRel | PropertyRel )`
    fn parse_relation(&mut self) -> ParseStep<Node> {
        let start = self.current().span;
        let subject = self.parse_subject()?;

        if self.current().kind == TokenKind::IsIn && self.current_is_spelled("has") {
            return self.parse_has(subject, start);
        }

        if self.current().kind == TokenKind::Dot
            && matches!(
                self.peek_kind(1),
                TokenKind::DistanceFrom | TokenKind::Visits
            )
        {
            self.advance();
        }

        match self.current().kind {
            TokenKind::DistanceFrom => self.parse_distance(subject, start),
            TokenKind::Visits => self.parse_count(subject, start),
            _ => self.parse_property(subject, start),
        }
    }

    /// Parses a subject reference.
    ///
    /// `item|npc|scene|exit` take an id; the other subject keywords take
    /// none; any other identifier is an implicit item reference.
    fn parse_subject(&mut self) -> ParseStep<SubjectRef> {
        let TokenKind::Identifier(word) = &self.current().kind else {
            return Err(self.error(format!(
                "expected a subject, found {}",
                self.describe_current()
            )));
        };
        let word = word.clone();
        self.advance();

        match SubjectKind::from_word(&word) {
            Some(kind) if kind.requires_id() => {
                let id = self.expect_identifier(&format!("an id after '{word}'"))?;
                Ok(SubjectRef::with_id(kind, id))
            }
            Some(kind) => Ok(SubjectRef::simple(kind)),
            None => Ok(SubjectRef::item(word)),
        }
    }

    /// `HasRel := Subject "has" Subject2`
    fn parse_has(&mut self, subject: SubjectRef, start: Span) -> ParseStep<Node> {
        self.advance(); // consume 'has'
        let other = self.parse_subject()?;
        let end = self.previous_span();
        Ok(Node::Relation(Relation {
            subject,
            comparison: Comparison::Has,
            object: ObjectRef::Element(other.name().to_string()),
            attribute: None,
            property: None,
            span: start.to(end),
        }))
    }

    /// `DistanceRel := "distance_from" Subject2 Comparison Number`
    fn parse_distance(&mut self, from: SubjectRef, start: Span) -> ParseStep<Node> {
        self.advance(); // consume 'distance_from'
        let to = self.parse_subject()?;
        let comparison = self.parse_numeric_comparison()?;
        let (value, end) = self.expect_integer()?;
        Ok(Node::Distance(DistanceRelation {
            from,
            to,
            comparison,
            value,
            span: start.to(end),
        }))
    }

    /// `CountRel := "visits" SceneName Comparison Number`
    fn parse_count(&mut self, subject: SubjectRef, start: Span) -> ParseStep<Node> {
        self.advance(); // consume 'visits'

        // An explicit `scene` keyword before the name is allowed.
        if matches!(&self.current().kind, TokenKind::Identifier(w) if w.eq_ignore_ascii_case("scene"))
            && matches!(
                self.peek_kind(1),
                TokenKind::Identifier(_) | TokenKind::String(_)
            )
        {
            self.advance();
        }

        let scene = match &self.current().kind {
            TokenKind::Identifier(name) | TokenKind::String(name) => name.clone(),
            _ => {
                return Err(self.error(format!(
                    "expected a scene name after 'visits', found {}",
                    self.describe_current()
                )));
            }
        };
        self.advance();

        let comparison = self.parse_numeric_comparison()?;
        let (value, end) = self.expect_integer()?;
        Ok(Node::Count(CountRelation {
            subject,
            scene,
            comparison,
            value,
            span: start.to(end),
        }))
    }

    /// `PropertyRel := ("." FIELD)* Comparison Value`
    fn parse_property(&mut self, subject: SubjectRef, start: Span) -> ParseStep<Node> {
        let mut attribute = None;
        let mut property = None;

        while self.eat(&TokenKind::Dot) {
            match &self.current().kind {
                TokenKind::Attribute => {
                    self.advance();
                    self.eat(&TokenKind::Dot);
                    attribute = Some(self.expect_identifier("an attribute name")?);
                }
                TokenKind::State => {
                    self.advance();
                    property = Some("state".to_string());
                }
                TokenKind::Flag => {
                    self.advance();
                    property = Some("flag".to_string());
                }
                TokenKind::Inventory => {
                    self.advance();
                    property = Some("inventory".to_string());
                }
                TokenKind::Identifier(name) => {
                    property = Some(name.clone());
                    self.advance();
                }
                _ => {
                    return Err(self.error(format!(
                        "expected a field name after '.', found {}",
                        self.describe_current()
                    )));
                }
            }
        }

        let comparison = self.parse_comparison()?;
        let (object, end) = if comparison == Comparison::Empty && !self.at_value_start() {
            (ObjectRef::Literal(Literal::Text(String::new())), self.previous_span())
        } else {
            self.parse_value()?
        };

        Ok(Node::Relation(Relation {
            subject,
            comparison,
            object,
            attribute,
            property,
            span: start.to(end),
        }))
    }

    /// Parses one comparison operator.
    fn parse_comparison(&mut self) -> ParseStep<Comparison> {
        let comparison = match self.current().kind {
            TokenKind::IsIn if self.current_is_spelled("has") => {
                return Err(self.error("'has' must directly follow its subject"));
            }
            TokenKind::Is => Comparison::Is,
            TokenKind::IsNot => Comparison::IsNot,
            TokenKind::IsLessThan => Comparison::LessThan,
            TokenKind::IsGreaterThan => Comparison::GreaterThan,
            TokenKind::IsEqualTo => Comparison::EqualTo,
            TokenKind::IsNotEqualTo => Comparison::NotEqualTo,
            TokenKind::IsIn => Comparison::In,
            TokenKind::IsEmpty => Comparison::Empty,
            _ => {
                return Err(self.error(format!(
                    "expected a comparison, found {}",
                    self.describe_current()
                )));
            }
        };
        self.advance();
        Ok(comparison)
    }

    /// Parses a comparison usable with counts and distances.
    fn parse_numeric_comparison(&mut self) -> ParseStep<Comparison> {
        let span = self.current().span;
        let comparison = self.parse_comparison()?;
        if comparison.applies_to_numbers() {
            Ok(comparison)
        } else {
            Err(Diagnostic::syntax(
                format!("'{comparison}' cannot compare a number"),
                span,
            ))
        }
    }

    /// `Value := boolean | number | string | identifier`
    fn parse_value(&mut self) -> ParseStep<(ObjectRef, Span)> {
        let span = self.current().span;
        let object = match &self.current().kind {
            TokenKind::True => ObjectRef::boolean(true),
            TokenKind::False => ObjectRef::boolean(false),
            TokenKind::Number(n) => ObjectRef::number(*n),
            TokenKind::String(s) => ObjectRef::text(s.clone()),
            TokenKind::Identifier(word) => {
                let word = word.clone();
                // `item lamp` style references are accepted in value position too.
                let takes_id = SubjectKind::from_word(&word).is_some_and(SubjectKind::requires_id);
                if let (true, TokenKind::Identifier(id)) = (takes_id, self.peek_kind(1)) {
                    let id = id.clone();
                    self.advance();
                    let end = self.current().span;
                    self.advance();
                    return Ok((ObjectRef::Element(id), span.to(end)));
                }
                ObjectRef::Element(word)
            }
            _ => {
                return Err(self.error(format!(
                    "expected a value, found {}",
                    self.describe_current()
                )));
            }
        };
        self.advance();
        Ok((object, span))
    }

    /// Returns true if the current token can begin a value.
    fn at_value_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::True
                | TokenKind::False
                | TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Identifier(_)
        )
    }

    /// Expects an identifier and returns its name.
    fn expect_identifier(&mut self, what: &str) -> ParseStep<String> {
        if let TokenKind::Identifier(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!(
                "expected {what}, found {}",
                self.describe_current()
            )))
        }
    }

    /// Expects an integral number literal.
    #[allow(clippy::cast_possible_truncation)]
    fn expect_integer(&mut self) -> ParseStep<(i64, Span)> {
        let span = self.current().span;
        match self.current().kind {
            TokenKind::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                self.advance();
                Ok((n as i64, span))
            }
            TokenKind::Number(n) => Err(Diagnostic::syntax(
                format!("expected a whole number, found {n}"),
                span,
            )),
            _ => Err(self.error(format!(
                "expected a number, found {}",
                self.describe_current()
            ))),
        }
    }

    /// Increments nesting depth, failing past the configured limit.
    fn enter(&mut self, span: Span) -> ParseStep<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(Diagnostic::nesting_limit(self.config.max_depth, span));
        }
        Ok(())
    }

    /// Returns the current token.
    fn current(&self) -> &Token {
        // `tokens` always ends with Eof and `pos` never moves past it.
        &self.tokens[self.pos]
    }

    /// Returns the kind of the token `n` positions ahead (Eof past the end).
    fn peek_kind(&self, n: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].kind
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    /// Returns true if the current token is spelled `word` in the source.
    fn current_is_spelled(&self, word: &str) -> bool {
        self.current().is_spelled(self.source, word)
    }

    /// Advances to the next token, stopping at Eof.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Describes the current token for error messages.
    fn describe_current(&self) -> String {
        let token = self.current();
        match &token.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Unknown(reason) => reason.clone(),
            TokenKind::Identifier(_) | TokenKind::Number(_) | TokenKind::String(_) => {
                format!("{} '{}'", token.kind.name(), token.text(self.source))
            }
            kind => kind.name().to_string(),
        }
    }

    /// Error for a token that cannot appear here.
    fn unexpected(&self) -> Diagnostic {
        self.error(format!("unexpected token: {}", self.describe_current()))
    }

    /// Creates a syntax error at the current token.
    fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::syntax(message, self.current().span)
    }
}

/// Parses canonical condition text into a [`ParseResult`].
///
/// Never panics and never returns `Err`; every failure becomes an
/// error-severity diagnostic.
#[must_use]
pub fn parse_condition(source: &str) -> ParseResult {
    Parser::new(source).parse_result()
}

/// Parses canonical condition text with explicit settings.
#[must_use]
pub fn parse_condition_with(source: &str, config: ParserConfig) -> ParseResult {
    Parser::with_config(source, config).parse_result()
}

/// Parses canonical condition text, returning the AST or an error.
///
/// # Errors
/// Returns an error if the source is not a well-formed condition.
pub fn parse(source: &str) -> Result<Node> {
    Parser::new(source).parse()
}

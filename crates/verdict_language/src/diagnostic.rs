//! Structured parse and validation feedback.
//!
//! Syntax errors are fatal and leave [`ParseResult::ast`] empty; semantic
//! warnings are advisory and ride along with a successful parse.

use std::fmt;

use verdict_foundation::{Error, ErrorContext, SemanticLimit};

use crate::ast::Node;
use crate::span::Span;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Advisory authoring feedback.
    Warning,
    /// The condition could not be parsed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Machine-readable classification of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Grammar mismatch or unrecognized input.
    Syntax,
    /// Nesting deeper than the configured limit.
    NestingLimit(usize),
    /// Subject or object names no known element.
    UnknownElement,
    /// Scene name is not a known scene.
    UnknownScene,
    /// Attribute name is not a known attribute.
    UnknownAttribute,
}

/// A single piece of feedback about a condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Classification.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// Where in the canonical text the problem is.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::Syntax,
            message: message.into(),
            span,
        }
    }

    /// Creates an advisory warning.
    #[must_use]
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }

    /// Creates a nesting-limit error.
    #[must_use]
    pub fn nesting_limit(limit: usize, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::NestingLimit(limit),
            message: SemanticLimit::MaxNestingDepth { limit }.to_string(),
            span,
        }
    }

    /// Returns true if this diagnostic is fatal.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Converts this diagnostic into a crate error for `Result`-based callers.
    #[must_use]
    pub fn into_error(self, source: &str) -> Error {
        let context = ErrorContext::new()
            .with_condition(source)
            .with_offset(self.span.start);
        let error = match self.code {
            DiagnosticCode::NestingLimit(limit) => {
                Error::limit_exceeded(SemanticLimit::MaxNestingDepth { limit })
            }
            _ => Error::parse(
                self.message,
                self.span.line,
                self.span.column,
                line_at(source, self.span.start).to_string(),
            ),
        };
        error.with_context(context)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.span, self.message)
    }
}

/// Returns the line of `source` containing byte `offset`.
fn line_at(source: &str, offset: usize) -> &str {
    let offset = offset.min(source.len());
    let start = source
        .get(..offset)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |i| i + 1);
    let end = source
        .get(offset..)
        .and_then(|tail| tail.find('\n'))
        .map_or(source.len(), |i| offset + i);
    source.get(start..end).unwrap_or(source)
}

/// Outcome of parsing a condition.
///
/// `success()` is false exactly when at least one diagnostic has
/// [`Severity::Error`]; in that case `ast` is `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult {
    /// The root node, present only on success.
    pub ast: Option<Node>,
    /// Errors and warnings in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// A successful parse with no diagnostics.
    #[must_use]
    pub const fn success_with(ast: Node) -> Self {
        Self {
            ast: Some(ast),
            diagnostics: Vec::new(),
        }
    }

    /// A failed parse.
    #[must_use]
    pub fn failure(error: Diagnostic) -> Self {
        Self {
            ast: None,
            diagnostics: vec![error],
        }
    }

    /// Returns true if no error-severity diagnostic was reported.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Appends advisory warnings. Errors passed here are downgraded.
    pub fn add_warnings(&mut self, warnings: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(warnings.into_iter().map(|mut d| {
            d.severity = Severity::Warning;
            d
        }));
    }
}

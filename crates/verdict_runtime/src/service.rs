//! The DSL facade: canonicalize, parse, validate, cache, evaluate.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};
use verdict_foundation::Result;
use verdict_language::{
    Diagnostic, NameSet, Node, ParseResult, Span, Validator, parse_condition_with, project,
};
use verdict_vocabulary::{Canonicalizer, Vocabulary};

use crate::cache::{CacheStats, ExpressionCache};
use crate::config::DslConfig;
use crate::context::EvaluationContext;
use crate::evaluator::evaluate;

/// A vocabulary and the validator built from its known names.
#[derive(Debug)]
struct Catalog {
    vocabulary: Arc<Vocabulary>,
    validator: Validator,
}

impl Catalog {
    fn new(vocabulary: Vocabulary) -> Self {
        let validator = Validator::new(
            NameSet::new(vocabulary.known_elements()),
            NameSet::new(vocabulary.known_scenes()),
            NameSet::new(vocabulary.known_attributes()),
        )
        .with_flags(NameSet::new(vocabulary.known_flags()))
        .with_states(NameSet::new(vocabulary.known_states()));
        Self {
            vocabulary: Arc::new(vocabulary),
            validator,
        }
    }
}

/// One owned instance of the condition pipeline.
///
/// A service is shared by reference across game sessions. The expression
/// cache is its only mutable state; the vocabulary can be swapped when the
/// content pack changes.
#[derive(Debug)]
pub struct DslService {
    catalog: RwLock<Arc<Catalog>>,
    canonicalizer: Canonicalizer,
    cache: ExpressionCache,
    config: DslConfig,
}

impl DslService {
    /// Creates a service over `vocabulary`.
    ///
    /// # Errors
    /// Returns a usage error for an invalid configuration, or an internal
    /// error if the canonicalizer's patterns fail to compile.
    pub fn new(vocabulary: Vocabulary, config: DslConfig) -> Result<Self> {
        config.check()?;
        Ok(Self {
            catalog: RwLock::new(Arc::new(Catalog::new(vocabulary))),
            canonicalizer: Canonicalizer::new()?,
            cache: ExpressionCache::new(),
            config,
        })
    }

    /// Creates a service with the default configuration.
    ///
    /// # Errors
    /// See [`DslService::new`].
    pub fn with_vocabulary(vocabulary: Vocabulary) -> Result<Self> {
        Self::new(vocabulary, DslConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &DslConfig {
        &self.config
    }

    /// The current vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> Arc<Vocabulary> {
        Arc::clone(&self.catalog().vocabulary)
    }

    /// Replaces the vocabulary, e.g. after the content pack changed.
    ///
    /// Cached entries are keyed by canonical text, whose meaning does not
    /// depend on the vocabulary, so they stay valid.
    pub fn set_vocabulary(&self, vocabulary: Vocabulary) {
        let catalog = Arc::new(Catalog::new(vocabulary));
        debug!(elements = catalog.vocabulary.len(), "vocabulary replaced");
        *self
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner) = catalog;
    }

    /// Rewrites free text into canonical grammar.
    #[must_use]
    pub fn canonicalize(&self, text: &str) -> String {
        let catalog = self.catalog();
        self.canonicalizer.canonicalize(text, &catalog.vocabulary)
    }

    /// Canonicalizes and parses `text`, then validates it if enabled.
    ///
    /// Never consults the cache; the result carries every diagnostic.
    #[must_use]
    pub fn check(&self, text: &str) -> ParseResult {
        let catalog = self.catalog();
        let canonical = self.canonicalizer.canonicalize(text, &catalog.vocabulary);
        let mut result = parse_condition_with(&canonical, self.config.parser_config());

        if self.config.validate {
            let warnings = result
                .ast
                .as_ref()
                .map(|ast| catalog.validator.validate(ast))
                .unwrap_or_default();
            result.add_warnings(warnings);
        }
        result
    }

    /// Returns the compiled AST for `text`, or `None` if it does not parse.
    #[must_use]
    pub fn compile(&self, text: &str) -> Option<Arc<Node>> {
        self.compile_canonical(&self.canonicalize(text)).ok()
    }

    /// Evaluates `text` against `context`.
    ///
    /// A condition that does not parse evaluates to `false`.
    pub fn evaluate<C: EvaluationContext + ?Sized>(&self, text: &str, context: &C) -> bool {
        let canonical = self.canonicalize(text);
        match self.compile_canonical(&canonical) {
            Ok(ast) => evaluate(&ast, context),
            Err(diagnostic) => {
                warn!(condition = text, error = %diagnostic, "condition failed to compile");
                false
            }
        }
    }

    /// Evaluates `text` against `context`, reporting syntax errors.
    ///
    /// # Errors
    /// Returns a parse error, or a limit error for over-deep nesting, if the
    /// condition does not compile.
    pub fn try_evaluate<C: EvaluationContext + ?Sized>(
        &self,
        text: &str,
        context: &C,
    ) -> Result<bool> {
        let canonical = self.canonicalize(text);
        let ast = self
            .compile_canonical(&canonical)
            .map_err(|diagnostic| diagnostic.into_error(&canonical))?;
        Ok(evaluate(&ast, context))
    }

    /// The JSON debug projection of `text`.
    ///
    /// # Errors
    /// Returns the syntax error if the condition does not compile.
    pub fn project(&self, text: &str) -> Result<serde_json::Value> {
        let canonical = self.canonicalize(text);
        let ast = self
            .compile_canonical(&canonical)
            .map_err(|diagnostic| diagnostic.into_error(&canonical))?;
        Ok(project(&ast))
    }

    /// Drops every cached AST.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached ASTs.
    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Cache hit and miss counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn compile_canonical(&self, canonical: &str) -> std::result::Result<Arc<Node>, Diagnostic> {
        let parser_config = self.config.parser_config();
        if !self.config.cache_enabled {
            let result = parse_condition_with(canonical, parser_config);
            return match result.ast {
                Some(ast) => Ok(Arc::new(ast)),
                None => Err(first_error(result)),
            };
        }

        let mut failure = None;
        let ast = self.cache.get_or_compile(canonical, |key| {
            let mut result = parse_condition_with(key, parser_config);
            let ast = result.ast.take();
            if ast.is_none() {
                failure = Some(first_error(result));
            }
            ast
        });
        ast.ok_or_else(|| failure.unwrap_or_else(compile_failure))
    }
}

fn first_error(result: ParseResult) -> Diagnostic {
    result
        .diagnostics
        .into_iter()
        .find(Diagnostic::is_error)
        .unwrap_or_else(compile_failure)
}

fn compile_failure() -> Diagnostic {
    Diagnostic::syntax("condition did not compile", Span::default())
}

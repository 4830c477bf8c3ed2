//! Verdict - natural-language condition DSL for game verbs and triggers
//!
//! This crate re-exports all layers of the Verdict system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: verdict_runtime     - Evaluator, expression cache, DSL service, REPL
//! Layer 1: verdict_vocabulary  - Content vocabulary, canonicalizer
//!          verdict_language    - Lexer, parser, AST, semantic validator
//! Layer 0: verdict_foundation  - Core types (Value, Error)
//! ```
//!
//! # Pipeline
//!
//! ```text
//! raw text → Canonicalizer → Lexer → Parser → AST → (Validator, Cache) → Evaluator → bool
//! ```

pub use verdict_foundation as foundation;
pub use verdict_language as language;
pub use verdict_runtime as runtime;
pub use verdict_vocabulary as vocabulary;

//! Evaluation runtime, service facade, and authoring REPL for Verdict.
//!
//! This crate provides:
//! - [`EvaluationContext`] and [`Element`] - the host's read-only view of game state
//! - [`Evaluator`] - Tree-walking evaluation of condition ASTs
//! - [`ExpressionCache`] - Memoized compilation of canonical text
//! - [`DslService`] - The canonicalize/parse/validate/evaluate facade
//! - [`World`] - An in-memory, JSON-loadable reference context
//! - [`Repl`] - Interactive condition authoring

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod config;
pub mod context;
pub mod editor;
pub mod evaluator;
pub mod repl;
pub mod service;
pub mod world;

pub use cache::{CacheStats, ExpressionCache};
pub use config::DslConfig;
pub use context::{Element, EvaluationContext};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use evaluator::{Evaluator, evaluate};
pub use repl::{Repl, Report};
pub use service::DslService;
pub use world::{DistanceEntry, World, WorldElement};

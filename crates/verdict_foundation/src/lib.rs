//! Core types for Verdict.
//!
//! This crate provides:
//! - [`Value`] - Dynamic operand values resolved during evaluation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, SemanticLimit};
pub use value::{Value, eq_ignore_case};

/// Result type alias using Verdict's error type.
pub type Result<T> = std::result::Result<T, Error>;

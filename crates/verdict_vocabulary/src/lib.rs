//! Content-pack vocabulary and free-text canonicalization.
//!
//! This crate turns designer-authored condition text into the strict grammar
//! the parser accepts.
//!
//! # Architecture
//!
//! ```text
//! "the brass lamp's state is not lit"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SEGMENTER       │  → plain text / "quoted literals" (left untouched)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SUBJECT REWRITE │  → "the brass lamp.state is not lit"
//! │ DETERMINERS     │  → "brass lamp.state is not lit"
//! │ OPERATORS       │  → "brass lamp.state is_not lit"
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ VOCABULARY      │  → "lamp_01.state is_not lit"
//! │ PHRASES         │
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`vocabulary`] - Phrase tables built from a content pack's elements
//! - [`canonicalize`] - The ordered rewrite passes
//! - [`segment`] - Splitting text around quoted literals

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canonicalize;
pub mod segment;
pub mod vocabulary;

pub use canonicalize::Canonicalizer;
pub use vocabulary::{ContentElement, ElementKind, Vocabulary};

//! Integration tests for the vocabulary layer
//!
//! Tests for phrase tables and free-text canonicalization.

mod canonicalizer;
mod vocabulary;

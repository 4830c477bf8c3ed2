//! Integration tests for Layer 1: Language
//!
//! Tests for lexer, parser, validator, printer, and projection.

mod lexer;
mod parser;
mod validator;

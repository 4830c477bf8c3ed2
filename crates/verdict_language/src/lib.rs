//! Tokenizer, parser, AST, and validator for the verdict condition DSL.
//!
//! This crate provides:
//! - `Lexer` - Tokenization of canonical condition text
//! - `Parser` - Parsing tokens into a [`Node`] tree
//! - `Validator` - Advisory checks for unknown references
//! - Pretty-printing and a JSON debug projection of trees

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod projection;
pub mod span;
pub mod token;
pub mod validator;
pub mod visitor;


pub use ast::{
    Comparison, CountRelation, DistanceRelation, Literal, Node, ObjectRef, Relation, SubjectKind,
    SubjectRef,
};
pub use diagnostic::{Diagnostic, DiagnosticCode, ParseResult, Severity};
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, ParserConfig, parse, parse_condition, parse_condition_with};
pub use pretty::pretty_print;
pub use projection::project;
pub use span::Span;
pub use token::{Token, TokenKind};
pub use validator::{NameSet, Validator, validate};
pub use visitor::{NodeVisitor, References, walk_node};

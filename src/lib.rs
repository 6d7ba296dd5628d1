//! Parser and AST for BL, a small language for programming robots.
//!
//! Source text is split into a [`TokenStream`](lexer::TokenStream) by the
//! lexer, turned into a [`Program`](ast::Program) by the parser, and can then
//! be inspected by the functions in [`analysis`] or printed back as source
//! through its `Display` impl.

#[macro_use]
extern crate log;

pub mod analysis;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use crate::ast::{Program, Statement};
pub use crate::error::ParseError;
pub use crate::parser::{parse, parse_str};

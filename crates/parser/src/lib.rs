//! Go source front end: Logos lexer with semicolon insertion, a
//! declaration-level recursive-descent parser, Go comment grouping, and an
//! arena AST with visitor support.
//!
//! ```
//! let tree = goscan_syntax::parse_source("package demo\n\nvar x = 1\n").unwrap();
//! assert_eq!(tree.package_name(), "demo");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod walk;

mod comments;
mod parser;
mod tree;

pub use error::{Diag, DiagKind, ParseFailure};
pub use lexer::Lexer;
pub use tree::{ParseOptions, SyntaxTree, parse_source};

//! Hand-written recursive-descent parser for Go source files.
//!
//! The token stream is collected up front, comments are attached to token
//! indices, and the parser walks the vector with a cursor. Declarations,
//! signatures, types and expressions are parsed in full; function, struct
//! and interface bodies are skipped as balanced spans. Diagnostics
//! accumulate so one pass reports every syntax problem it can recover from.

mod expressions;
mod items;
mod support;
mod types;

use crate::ast::{AstArena, CommentGroupId, Interner, SourceFile, Span};
use crate::comments::{self, Attached};
use crate::error::Diag;
use crate::lexer::{Lexer, Tok};
use crate::tree::ParseOptions;

/// Nesting limit for types and expressions.
const MAX_DEPTH: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'src> {
    pub tok: Tok<'src>,
    pub span: Span,
}

pub(crate) struct ParseOutput {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    pub diags: Vec<Diag>,
}

pub(crate) fn parse(source: &str, options: &ParseOptions) -> ParseOutput {
    let mut lexer = Lexer::new(source);
    let mut tokens: Vec<Token<'_>> = lexer
        .by_ref()
        .filter(|(_, tok, _)| *tok != Tok::Error)
        .map(|(start, tok, end)| Token {
            tok,
            span: Span::new(start, end),
        })
        .collect();
    tokens.push(Token {
        tok: Tok::Eof,
        span: Span::empty_at(source.len()),
    });

    let diags = lexer.take_diags();
    let lexed_comments = lexer.take_comments();

    let mut arena = AstArena::default();
    let attached = if options.comments {
        comments::attach(source, &tokens, &lexed_comments, &mut arena)
    } else {
        Attached::empty(tokens.len())
    };

    tracing::trace!(
        tokens = tokens.len(),
        comment_groups = attached.groups.len(),
        "lexed source"
    );

    let mut parser = Parser::new(tokens, arena, attached, diags);
    let file = parser.parse_source_file();
    parser.finish(file)
}

struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    cursor: usize,
    depth: u32,
    arena: AstArena,
    interner: Interner,
    diags: Vec<Diag>,
    comment_groups: Vec<CommentGroupId>,
    leads: Vec<Option<CommentGroupId>>,
    trailing: Vec<Option<CommentGroupId>>,
}

impl<'src> Parser<'src> {
    fn new(
        tokens: Vec<Token<'src>>,
        arena: AstArena,
        attached: Attached,
        diags: Vec<Diag>,
    ) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
            arena,
            interner: Interner::new(),
            diags,
            comment_groups: attached.groups,
            leads: attached.leads,
            trailing: attached.trailing,
        }
    }

    fn finish(self, file: SourceFile) -> ParseOutput {
        ParseOutput {
            arena: self.arena,
            interner: self.interner,
            file,
            diags: self.diags,
        }
    }
}

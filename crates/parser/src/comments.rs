//! Groups lexed comments and attaches them to tokens.
//!
//! The rules follow Go's parser: a comment that starts on the same line as
//! the previous token opens a *line comment* group, the remaining comments of
//! a gap group while at most one newline separates them, and the last group
//! is the *lead comment* of the next token when it ends on the line directly
//! above that token.

use crate::ast::{AstArena, Comment, CommentGroup, CommentGroupId, Span};
use crate::lexer::{LexedComment, Tok};
use crate::parser::Token;

/// Byte offsets of every line start; lines are 1-based.
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(src: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(memchr::memchr_iter(b'\n', src.as_bytes()).map(|i| i + 1));
        Self { starts }
    }

    #[inline]
    pub(crate) fn line(&self, pos: usize) -> usize {
        self.starts.partition_point(|&s| s <= pos)
    }
}

/// Comment groups of one file and the tokens they attach to.
pub(crate) struct Attached {
    pub groups: Vec<CommentGroupId>,
    /// Lead comment per token index.
    pub leads: Vec<Option<CommentGroupId>>,
    /// Line comment ending the gap before each token index.
    pub trailing: Vec<Option<CommentGroupId>>,
}

impl Attached {
    pub(crate) fn empty(token_count: usize) -> Self {
        Self {
            groups: Vec::new(),
            leads: vec![None; token_count],
            trailing: vec![None; token_count],
        }
    }
}

// Inserted semicolons are zero-width and precede a comment on their line;
// EOF follows everything.
#[inline]
fn token_key(tok: &Token<'_>) -> (usize, u8) {
    let start = tok.span.start as usize;
    match tok.tok {
        Tok::Eof => (start, 3),
        _ if tok.span.is_empty() => (start, 0),
        _ => (start, 2),
    }
}

#[inline]
fn comment_key(c: &LexedComment) -> (usize, u8) {
    (c.end, 1)
}

pub(crate) fn attach(
    src: &str,
    tokens: &[Token<'_>],
    comments: &[LexedComment],
    arena: &mut AstArena,
) -> Attached {
    let lines = LineIndex::new(src);
    let mut out = Attached::empty(tokens.len());
    let mut next_comment = 0;

    for (k, tok) in tokens.iter().enumerate() {
        let gap_start = next_comment;
        while next_comment < comments.len()
            && comment_key(&comments[next_comment]) < token_key(tok)
        {
            next_comment += 1;
        }
        let mut rest = &comments[gap_start..next_comment];
        if rest.is_empty() {
            continue;
        }

        let next_line = lines.line(tok.span.start as usize);

        if k > 0 {
            let prev_line = lines.line(tokens[k - 1].span.start as usize);
            if lines.line(rest[0].start) == prev_line {
                let (id, end_line, used) = consume_group(&lines, rest, 0, arena);
                out.groups.push(id);
                if next_line != end_line || matches!(tok.tok, Tok::Semi | Tok::Eof) {
                    out.trailing[k] = Some(id);
                }
                rest = &rest[used..];
            }
        }

        let mut last = None;
        while !rest.is_empty() {
            let (id, end_line, used) = consume_group(&lines, rest, 1, arena);
            out.groups.push(id);
            last = Some((id, end_line));
            rest = &rest[used..];
        }

        if let Some((id, end_line)) = last {
            if end_line + 1 == next_line {
                out.leads[k] = Some(id);
            }
        }
    }

    out
}

/// Takes comments while each starts at most `n` lines below the end of the
/// previous one.
fn consume_group(
    lines: &LineIndex,
    comments: &[LexedComment],
    n: usize,
    arena: &mut AstArena,
) -> (CommentGroupId, usize, usize) {
    let mut end_line = lines.line(comments[0].start);
    let mut used = 0;
    for c in comments {
        if lines.line(c.start) > end_line + n {
            break;
        }
        end_line = lines.line(c.end);
        used += 1;
    }

    let ids: Vec<_> = comments[..used]
        .iter()
        .map(|c| arena.comments.alloc(Comment { kind: c.kind }, Span::new(c.start, c.end)))
        .collect();
    let span = Span::new(comments[0].start, comments[used - 1].end);
    let list = arena.list_comment_ids(ids);
    let id = arena.comment_groups.alloc(CommentGroup { comments: list }, span);
    (id, end_line, used)
}

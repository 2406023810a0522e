use super::*;
use crate::ast::IdentName;

impl<'src> Parser<'src> {
    #[inline]
    pub(super) fn current(&self) -> Tok<'src> {
        self.tokens[self.cursor].tok
    }

    #[inline]
    pub(super) fn peek(&self, n: usize) -> Tok<'src> {
        self.tokens.get(self.cursor + n).map_or(Tok::Eof, |t| t.tok)
    }

    #[inline]
    pub(super) fn current_span(&self) -> Span {
        self.tokens[self.cursor].span
    }

    /// End of the last consumed token.
    #[inline]
    pub(super) fn prev_end(&self) -> u32 {
        match self.cursor {
            0 => 0,
            n => self.tokens[n - 1].span.end,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    pub(super) fn span_from(&self, start: Span) -> Span {
        Span {
            start: start.start,
            end: self.prev_end().max(start.start),
        }
    }

    /// Consumes the current token. EOF is never consumed.
    #[inline]
    pub(super) fn bump(&mut self) -> Token<'src> {
        let token = self.tokens[self.cursor];
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    #[inline]
    pub(super) fn at(&self, tok: Tok<'_>) -> bool {
        self.current() == tok
    }

    #[inline]
    pub(super) fn eat(&mut self, tok: Tok<'_>) -> Option<Span> {
        self.at(tok).then(|| self.bump().span)
    }

    pub(super) fn push_error(&mut self, span: Span, message: impl Into<String>) {
        self.diags.push(Diag::parse(span, message));
    }

    /// Consumes `tok` or reports it missing; the returned span is empty at
    /// the current position on failure.
    pub(super) fn expect(&mut self, tok: Tok<'_>, expected: &str) -> Span {
        if let Some(span) = self.eat(tok) {
            return span;
        }
        let found = self.current();
        let span = self.current_span();
        self.push_error(span, format!("expected {expected}, found {found}"));
        Span::empty_at(span.start as usize)
    }

    /// A `;` may be omitted before a closing `)` or `}`.
    pub(super) fn expect_semi(&mut self, context: &str) {
        match self.current() {
            Tok::Semi => {
                self.bump();
            }
            Tok::RParen | Tok::RBrace | Tok::Eof => {}
            found => {
                let span = self.current_span();
                self.push_error(span, format!("expected ';' after {context}, found {found}"));
                self.sync_to_semi();
            }
        }
    }

    pub(super) fn parse_ident(&mut self, context: &str) -> IdentName {
        match self.current() {
            Tok::Ident(name) => {
                let span = self.bump().span;
                IdentName {
                    sym: self.interner.intern(name),
                    pos: span,
                }
            }
            found => {
                let span = self.current_span();
                self.push_error(span, format!("expected identifier for {context}, found {found}"));
                IdentName {
                    sym: self.interner.intern("_"),
                    pos: Span::empty_at(span.start as usize),
                }
            }
        }
    }

    /// `ident { "," ident }`
    pub(super) fn parse_ident_list(&mut self, context: &str) -> Vec<IdentName> {
        let mut names = vec![self.parse_ident(context)];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.parse_ident(context));
        }
        names
    }

    /// Skips from the current `open` token to its matching `close`.
    pub(super) fn skip_balanced(&mut self, open: Tok<'_>, close: Tok<'_>) -> (Span, Span) {
        let l = self.bump().span;
        let mut depth = 1usize;
        loop {
            let tok = self.current();
            if tok == Tok::Eof {
                let span = self.current_span();
                self.push_error(span, format!("expected {close} to close {open}"));
                return (l, span);
            }
            if tok == open {
                depth += 1;
            } else if tok == close {
                depth -= 1;
                if depth == 0 {
                    let r = self.bump().span;
                    return (l, r);
                }
            }
            self.bump();
        }
    }

    /// Index of the token closing the bracket at `cursor + offset`, if any.
    pub(super) fn matching_close(&self, offset: usize, open: Tok<'_>, close: Tok<'_>) -> Option<usize> {
        let mut depth = 0usize;
        for (i, t) in self.tokens[self.cursor + offset..].iter().enumerate() {
            if t.tok == open {
                depth += 1;
            } else if t.tok == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(offset + i);
                }
            } else if t.tok == Tok::Eof {
                break;
            }
        }
        None
    }

    /// Recovery: skip to the next `;` at bracket depth zero.
    pub(super) fn sync_to_semi(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                Tok::Eof => return,
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace if depth == 0 => return,
                Tok::RParen | Tok::RBrack | Tok::RBrace => depth -= 1,
                Tok::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Recovery: skip to the next top-level declaration keyword.
    pub(super) fn sync_to_decl(&mut self) {
        while !matches!(
            self.current(),
            Tok::Eof | Tok::KwImport | Tok::KwConst | Tok::KwVar | Tok::KwType | Tok::KwFunc
        ) {
            if self.at(Tok::LBrace) {
                self.skip_balanced(Tok::LBrace, Tok::RBrace);
                continue;
            }
            self.bump();
        }
    }

    #[inline]
    pub(super) fn lead_comment(&self) -> Option<CommentGroupId> {
        self.leads.get(self.cursor).copied().flatten()
    }

    #[inline]
    pub(super) fn trailing_comment(&self) -> Option<CommentGroupId> {
        self.trailing.get(self.cursor).copied().flatten()
    }

    /// Returns false (after reporting) when nesting is too deep to continue.
    pub(super) fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            let span = self.current_span();
            if !self.diags.iter().any(|d| d.message == "nesting too deep") {
                self.push_error(span, "nesting too deep");
            }
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub(super) fn leave(&mut self) {
        self.depth -= 1;
    }
}

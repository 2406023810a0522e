use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// One problem found while lexing or parsing, with the bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {}..{}", span.start, span.end)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    #[inline]
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

/// Returned when a file has any lex or parse diagnostic.
#[derive(Debug, Error)]
#[error("{} syntax error(s), first: {}", diags.len(), first_message(diags))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

fn first_message(diags: &[Diag]) -> String {
    diags.first().map_or_else(String::new, ToString::to_string)
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_names_first_diag() {
        let failure = ParseFailure {
            diags: vec![
                Diag::parse(Span::new(3, 4), "expected ')'"),
                Diag::parse(Span::new(9, 9), "expected declaration"),
            ],
        };
        assert_eq!(
            failure.to_string(),
            "2 syntax error(s), first: expected ')' at 3..4"
        );
    }

    #[test]
    fn lex_error_becomes_lex_diag() {
        let d = LexError {
            kind: LexErrorKind::InvalidNumber,
            span: Span::new(0, 3),
        }
        .diag();
        assert_eq!(d.kind, DiagKind::Lex);
        assert_eq!(d.message, "invalid numeric literal");
    }
}

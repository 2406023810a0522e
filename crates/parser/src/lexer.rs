use crate::ast::CommentKind;
use crate::error::{Diag, LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;
use unicode_ident::{is_xid_continue, is_xid_start};

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
const fn first_newline_offset(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'\n' | b'\r') {
            return Some(i);
        }
        i += 1;
    }

    None
}

#[inline(always)]
pub const fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline(always)]
pub const fn is_digit_in_base(b: u8, base: u32) -> bool {
    match base {
        2 => matches!(b, b'0' | b'1'),
        8 => matches!(b, b'0'..=b'7'),
        16 => b.is_ascii_hexdigit(),
        _ => b.is_ascii_digit(),
    }
}

const KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// True if `s` could name a Go declaration: an identifier that is not a
/// keyword.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c == '_' || is_xid_start(c))
        && chars.all(|c| c == '_' || is_xid_continue(c))
        && !KEYWORDS.contains(&s)
}

// =============================================================================
// 1. Block comment scanner
// =============================================================================

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr::memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. Numbers: maximal munch, then classification
// =============================================================================

pub(crate) mod num {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum NumberKind {
        Int,
        Float,
        Imag,
    }

    #[inline]
    fn base_prefix(src: &[u8]) -> Option<u32> {
        match src {
            [b'0', b'x' | b'X', ..] => Some(16),
            [b'0', b'o' | b'O', ..] => Some(8),
            [b'0', b'b' | b'B', ..] => Some(2),
            _ => None,
        }
    }

    #[inline]
    fn munch(src: &[u8], mut i: usize, accept: impl Fn(u8) -> bool) -> usize {
        while i < src.len() && (accept(src[i]) || src[i] == b'_') {
            i += 1;
        }
        i
    }

    /// Logos callback: extends the token over the longest run that can belong
    /// to a Go number. Bad digits for the base stay inside the token and are
    /// rejected by [`classify_number`], so `0b102` is one erroneous token.
    pub fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
        let start = lex.span().start;
        let src = &lex.source().as_bytes()[start..];

        let hex = matches!(base_prefix(src), Some(16));
        let mut i = if base_prefix(src).is_some() { 2 } else { 0 };
        let digit = |b: u8| if hex { b.is_ascii_hexdigit() } else { is_dec_digit(b) };

        i = munch(src, i, digit);
        if i < src.len() && src[i] == b'.' && src.get(i + 1) != Some(&b'.') {
            i = munch(src, i + 1, digit);
        }

        let exp = if hex { b'p' } else { b'e' };
        if i < src.len() && src[i].to_ascii_lowercase() == exp {
            i += 1;
            if matches!(src.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
            i = munch(src, i, is_dec_digit);
        }

        if src.get(i) == Some(&b'i') {
            i += 1;
        }

        let already = lex.span().len();
        if i > already {
            lex.bump(i - already);
        }
        Ok(())
    }

    /// Go's separator rule: `_` must sit between two digits, or between the
    /// base prefix and a digit.
    fn separators_ok(s: &[u8], base: u32) -> bool {
        let body_start = if base_prefix(s).is_some() { 2 } else { 0 };
        for (i, &b) in s.iter().enumerate() {
            if b != b'_' {
                continue;
            }
            let after_prefix = body_start == 2 && i == 2;
            let prev_digit = i > 0 && is_digit_in_base(s[i - 1], if base == 16 { 16 } else { 10 });
            let next_digit = s
                .get(i + 1)
                .is_some_and(|&n| is_digit_in_base(n, if base == 16 { 16 } else { 10 }));
            if !(prev_digit || after_prefix) || !next_digit {
                return false;
            }
        }
        true
    }

    /// Validates a munched number and says whether it is an int, float or
    /// imaginary literal.
    pub fn classify_number(s: &[u8]) -> Result<NumberKind, LexErrorKind> {
        let (body, imag) = match s.split_last() {
            Some((b'i', rest)) => (rest, true),
            _ => (s, false),
        };
        if body.is_empty() {
            return Err(LexErrorKind::InvalidNumber);
        }

        let base = base_prefix(body).unwrap_or(10);
        if !separators_ok(body, base) {
            return Err(LexErrorKind::InvalidNumber);
        }
        let digits: Vec<u8> = body.iter().copied().filter(|&b| b != b'_').collect();
        let rest = if base == 10 { &digits[..] } else { &digits[2..] };

        let (mantissa, exponent) = match rest.iter().position(|&b| {
            let l = b.to_ascii_lowercase();
            (base == 16 && l == b'p') || (base == 10 && l == b'e')
        }) {
            Some(p) => (&rest[..p], Some(&rest[p + 1..])),
            None => (rest, None),
        };
        let (int_part, frac_part) = match mantissa.iter().position(|&b| b == b'.') {
            Some(p) => (&mantissa[..p], Some(&mantissa[p + 1..])),
            None => (mantissa, None),
        };

        if let Some(exp) = exponent {
            let exp = exp.strip_prefix(b"+").or_else(|| exp.strip_prefix(b"-")).unwrap_or(exp);
            if exp.is_empty() || !exp.iter().all(|&b| is_dec_digit(b)) {
                return Err(LexErrorKind::InvalidNumber);
            }
        }

        let mantissa_digits = int_part.len() + frac_part.map_or(0, <[u8]>::len);
        if mantissa_digits == 0 {
            return Err(LexErrorKind::InvalidNumber);
        }
        if !int_part
            .iter()
            .chain(frac_part.unwrap_or_default())
            .all(|&b| is_digit_in_base(b, base))
        {
            return Err(LexErrorKind::InvalidNumber);
        }

        let is_float = frac_part.is_some() || exponent.is_some();
        match base {
            2 | 8 if is_float => return Err(LexErrorKind::InvalidNumber),
            16 if is_float && exponent.is_none() => return Err(LexErrorKind::InvalidNumber),
            10 if !is_float && !imag && int_part.len() > 1 && int_part[0] == b'0' => {
                // Legacy octal `0777`.
                if !int_part.iter().all(|&b| is_digit_in_base(b, 8)) {
                    return Err(LexErrorKind::InvalidNumber);
                }
            }
            _ => {}
        }

        Ok(match (imag, is_float) {
            (true, _) => NumberKind::Imag,
            (false, true) => NumberKind::Float,
            (false, false) => NumberKind::Int,
        })
    }
}

pub use num::NumberKind;

/// Classifies a complete number literal (as it appears in source).
#[inline]
pub fn classify_number(s: &str) -> Result<NumberKind, LexErrorKind> {
    num::classify_number(s.as_bytes())
}

// =============================================================================
// 3. Token Definition (RawTok)
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number,

    // Escapes are checked when a literal is decoded, not here.
    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'")] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

// =============================================================================
// 4. Lookup tables
// =============================================================================

macro_rules! gen_lookup_table {
    ($size:expr, $($variant:ident),* $(,)?) => {{
        let mut table = [false; $size];
        $(table[RawTok::$variant as usize] = true;)*
        table
    }};
}

const SEMI_INSERT_TABLE: [bool; 256] = gen_lookup_table!(
    256,
    Ident,
    Number,
    Rune,
    String,
    RawString,
    KwBreak,
    KwContinue,
    KwFallthrough,
    KwReturn,
    Inc,
    Dec,
    RParen,
    RBrack,
    RBrace,
);

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        SEMI_INSERT_TABLE[self as usize]
    }

    /// Maps every non-trivia, non-number raw token to its public form.
    #[inline]
    fn to_token<'src>(self, slice: &'src str) -> Tok<'src> {
        macro_rules! simple_tok {
            ($($raw:ident),* $(,)?) => {
                match self {
                    Self::Ident => Tok::Ident(slice),
                    Self::Rune => Tok::RuneLit(slice),
                    Self::String => Tok::StringLit(slice),
                    Self::RawString => Tok::RawStringLit(slice),
                    $(Self::$raw => Tok::$raw,)*
                    Self::Number | Self::Newline | Self::LineComment | Self::BlockComment
                    | Self::Bom | Self::Error => Tok::Error,
                }
            };
        }

        simple_tok! {
            KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
            KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
            KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,

            Ellipsis, ShlAssign, ShrAssign, AndNotAssign, AddAssign, SubAssign, MulAssign,
            DivAssign, ModAssign, AndAssign, OrAssign, XorAssign, Shl, Shr, AndNot, LAnd, LOr,
            EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow, Assign, Plus, Minus, Star, Slash,
            Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt,

            LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,
        }
    }
}

// =============================================================================
// 5. Public Token Definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    /// End of input. Never produced by [`Lexer`]; the parser appends it.
    Eof,
    Error,
}

impl<'input> std::fmt::Display for Tok<'input> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Comment seen by the lexer. Comments never reach the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexedComment {
    pub kind: CommentKind,
    pub start: usize,
    pub end: usize,
}

// =============================================================================
// 6. Lexer wrapper: semicolon insertion + comment side list + diags
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    comments: Vec<LexedComment>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::with_capacity(16),
            comments: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    /// Comments seen so far, in source order.
    pub fn take_comments(&mut self) -> Vec<LexedComment> {
        std::mem::take(&mut self.comments)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = crate::ast::Span::new(span.start, span.end);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    #[inline]
    fn handle_trivia(&mut self, raw: RawTok, span: &Range<usize>, slice: &str) -> bool {
        match raw {
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start);
                }
                true
            }
            RawTok::LineComment => {
                self.comments.push(LexedComment {
                    kind: CommentKind::Line,
                    start: span.start,
                    end: span.end,
                });
                true
            }
            RawTok::BlockComment => {
                self.comments.push(LexedComment {
                    kind: CommentKind::Block,
                    start: span.start,
                    end: span.end,
                });
                if self.last_can_insert_semi {
                    if let Some(off) = first_newline_offset(slice) {
                        self.last_can_insert_semi = false;
                        self.emit_semi_at(span.start + off);
                    }
                }
                true
            }
            _ => false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }

            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                // Not a return: a pending ';' may still need to go out.
                None => self.handle_eof(),
                Some(Err(kind)) => return Some(self.handle_lex_error(kind)),
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

impl<'src> Lexer<'src> {
    #[inline]
    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.emit_semi_at(self.src_len);
        }
    }

    #[inline]
    fn handle_lex_error(&mut self, kind: LexErrorKind) -> (usize, Tok<'src>, usize) {
        let span = self.logos.span();
        if kind == LexErrorKind::UnterminatedComment {
            self.comments.push(LexedComment {
                kind: CommentKind::Block,
                start: span.start,
                end: span.end,
            });
        }
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        (span.start, Tok::Error, span.end)
    }

    /// `None` means the raw token was consumed without producing output.
    #[inline]
    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        // A BOM is only legal as the very first character.
        if raw == RawTok::Bom {
            if span.start == 0 {
                return None;
            }
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        if self.handle_trivia(raw, &span, slice) {
            return None;
        }

        if raw == RawTok::Error {
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        if raw == RawTok::Number {
            return Some(self.handle_number_token(span, slice));
        }

        self.last_can_insert_semi = raw.can_insert_semicolon();
        Some((span.start, raw.to_token(slice), span.end))
    }

    #[inline]
    fn handle_number_token(&mut self, span: Range<usize>, slice: &'src str) -> (usize, Tok<'src>, usize) {
        match classify_number(slice) {
            Ok(kind) => {
                self.last_can_insert_semi = true;
                let tok = match kind {
                    NumberKind::Int => Tok::IntLit(slice),
                    NumberKind::Float => Tok::FloatLit(slice),
                    NumberKind::Imag => Tok::ImagLit(slice),
                };
                (span.start, tok, span.end)
            }
            Err(kind) => {
                self.push_lex_diag(kind, span.clone());
                self.last_can_insert_semi = false;
                (span.start, Tok::Error, span.end)
            }
        }
    }
}

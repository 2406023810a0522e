use goscan_syntax::lexer::{Lexer, NumberKind, Tok, classify_number};

fn single(input: &str) -> Tok<'_> {
    let mut lx = Lexer::new(input);
    let tok = lx.next().map(|(_, t, _)| t);
    tok.unwrap_or(Tok::Eof)
}

#[test]
fn valid_literals_are_classified() {
    let cases = [
        ("0", NumberKind::Int),
        ("42", NumberKind::Int),
        ("1_000_000", NumberKind::Int),
        ("0x_1F", NumberKind::Int),
        ("0o17", NumberKind::Int),
        ("0b1010", NumberKind::Int),
        ("0777", NumberKind::Int),
        ("3.14", NumberKind::Float),
        (".5", NumberKind::Float),
        ("1.", NumberKind::Float),
        ("1e3", NumberKind::Float),
        ("6.02E+23", NumberKind::Float),
        ("09.5", NumberKind::Float),
        ("0x1p-2", NumberKind::Float),
        ("0x1.8p1", NumberKind::Float),
        ("1i", NumberKind::Imag),
        ("0x10i", NumberKind::Imag),
    ];
    for (src, want) in cases {
        assert_eq!(classify_number(src), Ok(want), "literal {src}");
    }
}

#[test]
fn invalid_literals_are_rejected() {
    for src in ["0b102", "09", "1_", "1__0", "0x", "0x1.8", "1e", "1e+", "0o8", "0b1.0"] {
        assert!(classify_number(src).is_err(), "literal {src} accepted");
    }
}

#[test]
fn lexer_emits_one_token_per_literal() {
    assert!(matches!(single("0x1p-2"), Tok::FloatLit("0x1p-2")));
    assert!(matches!(single("123"), Tok::IntLit("123")));
    assert!(matches!(single("2.5i"), Tok::ImagLit("2.5i")));
    assert!(matches!(single("0b102"), Tok::Error));
}

#[test]
fn bad_number_is_a_lex_diagnostic() {
    let mut lx = Lexer::new("x := 0b102\n");
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].span.start, 5);
    // No semicolon after the bad token.
    assert!(!matches!(toks.last(), Some((_, Tok::Semi, _))));
}

#[test]
fn range_dots_are_not_a_fraction() {
    let toks: Vec<_> = Lexer::new("a[1:2]").map(|(_, t, _)| t).collect();
    assert!(matches!(toks[2], Tok::IntLit("1")));
    assert!(matches!(toks[4], Tok::IntLit("2")));
}

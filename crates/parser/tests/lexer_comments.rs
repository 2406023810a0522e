use goscan_syntax::ast::CommentKind;
use goscan_syntax::lexer::{LexedComment, Lexer, Tok};

fn lex(input: &str) -> (Vec<(usize, Tok<'_>, usize)>, Vec<LexedComment>, usize) {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    let comments = lx.take_comments();
    let diags = lx.take_diags().len();
    (toks, comments, diags)
}

#[test]
fn comments_go_to_the_side_list() {
    let src = "// head\nvar x = 1 /* inline */ // tail\n";
    let (toks, comments, diags) = lex(src);
    assert_eq!(diags, 0);
    assert!(toks.iter().all(|(_, t, _)| !matches!(t, Tok::Error)));

    let texts: Vec<_> = comments.iter().map(|c| &src[c.start..c.end]).collect();
    assert_eq!(texts, ["// head", "/* inline */", "// tail"]);
    assert_eq!(comments[1].kind, CommentKind::Block);
    assert_eq!(comments[2].kind, CommentKind::Line);
}

#[test]
fn line_comment_excludes_carriage_return() {
    let src = "// doc\r\nvar x\r\n";
    let (_, comments, _) = lex(src);
    assert_eq!(&src[comments[0].start..comments[0].end], "// doc");
}

#[test]
fn unterminated_block_comment() {
    let src = "var x /* never closed";
    let (toks, comments, diags) = lex(src);
    assert_eq!(diags, 1);
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].end, src.len());
    assert!(toks.iter().any(|(_, t, _)| matches!(t, Tok::Error)));
}

#[test]
fn comment_markers_inside_strings_are_not_comments() {
    let (toks, comments, _) = lex("var s = \"// not a comment\"\n");
    assert!(comments.is_empty());
    assert!(toks.iter().any(|(_, t, _)| matches!(t, Tok::StringLit("\"// not a comment\""))));
}

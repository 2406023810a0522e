use goscan_syntax::lexer::{Lexer, Tok, is_identifier};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let mut lx = Lexer::new(&s);
        let mut last_real_end = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;
        let mut steps = 0usize;

        for (start, tok, end) in lx.by_ref() {
            steps += 1;
            prop_assert!(start <= end && end <= s.len(), "bad span {start}..{end} in {s:?}");
            prop_assert!(steps <= max_steps, "no progress on {s:?}");

            let injected = matches!(tok, Tok::Semi) && start == end;
            if injected {
                prop_assert!(start >= last_real_end);
            } else {
                prop_assert!(start >= last_real_end, "token moved backwards in {s:?}");
                last_real_end = end;
            }
        }

        for c in lx.take_comments() {
            prop_assert!(c.start < c.end && c.end <= s.len());
        }
    }

    #[test]
    fn comments_never_overlap(s in "[a-z /*\n]{0,64}") {
        let mut lx = Lexer::new(&s);
        lx.by_ref().for_each(drop);
        let comments = lx.take_comments();
        for pair in comments.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn identifiers_lex_as_single_tokens(name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        prop_assume!(is_identifier(&name));
        let toks: Vec<_> = Lexer::new(&name).collect();
        prop_assert_eq!(toks.len(), 2);
        prop_assert!(matches!(toks[0].1, Tok::Ident(s) if s == name));
    }
}

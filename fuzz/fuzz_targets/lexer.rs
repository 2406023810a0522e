#![no_main]

use goscan_syntax::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let mut lx = Lexer::new(&s);

    let mut last_real_end = 0usize;
    let mut steps = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (start, tok, end) in lx.by_ref() {
        assert!(start <= end && end <= s.len());
        assert!(start >= last_real_end);
        if !(matches!(tok, Tok::Semi) && start == end) {
            last_real_end = end;
        }
        steps += 1;
        assert!(steps <= max_steps);
    }

    let comments = lx.take_comments();
    assert!(comments.windows(2).all(|w| w[0].end <= w[1].start));
});

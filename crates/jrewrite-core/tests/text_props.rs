use jrewrite_core::{apply_text_edits, minimal_text_edit, LineIndex, TextSize};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

fn arb_char() -> impl Strategy<Value = char> {
    // A small pool keeps shrinking effective while still covering line breaks and multi-byte
    // UTF-8 sequences.
    prop_oneof![
        12 => prop::sample::select(vec!['a', 'b', 'x', '0', ' ', '\t', '{', '}', ';']),
        3 => Just('\n'),
        1 => Just('\r'),
        2 => Just('é'),
        2 => Just('中'),
        1 => Just('🦀'),
    ]
}

fn arb_text(max_chars: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(arb_char(), 0..=max_chars).prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn minimal_edit_reproduces_target(before in arb_text(48), after in arb_text(48)) {
        match minimal_text_edit(&before, &after) {
            None => prop_assert_eq!(&before, &after),
            Some(edit) => {
                let applied = apply_text_edits(&before, &[edit]).unwrap();
                prop_assert_eq!(applied, after);
            }
        }
    }

    #[test]
    fn line_col_offset_round_trip(text in arb_text(64)) {
        let index = LineIndex::new(&text);
        for (offset, _) in text.char_indices() {
            let offset = TextSize::from(offset as u32);
            let pos = index.line_col(offset);
            // Offsets inside a `\r\n` pair clamp to the line end.
            if let Some(back) = index.offset(pos) {
                prop_assert!(back <= offset);
            }
        }
    }
}

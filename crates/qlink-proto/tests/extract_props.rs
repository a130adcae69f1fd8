//! Property-based tests for bit extraction.

use proptest::prelude::*;
use qlink_proto::{Reply, extract_bits};

/// Render bits the way a host might: arbitrary separators and padding.
fn arb_rendered_bits() -> impl Strategy<Value = (Vec<u8>, String)> {
    prop::collection::vec((0_u8..=1, "[ ,;a-z]{0,3}"), 0..32).prop_map(|items| {
        let bits: Vec<u8> = items.iter().map(|(b, _)| *b).collect();
        let body: String = items
            .iter()
            .map(|(b, sep)| format!("{b}{sep}"))
            .collect();
        (bits, format!("{{\"job_result\": [{body}]}}"))
    })
}

proptest! {
    #[test]
    fn capped_extraction_is_prefix((bits, text) in arb_rendered_bits(), n in 0_usize..40) {
        let extracted = extract_bits(&text, Some(n)).expect("well-formed");
        let expected: Vec<u8> = bits.iter().copied().take(n).collect();
        prop_assert_eq!(extracted, expected);
    }

    #[test]
    fn uncapped_extraction_returns_all((bits, text) in arb_rendered_bits()) {
        prop_assert_eq!(extract_bits(&text, None), Some(bits));
    }

    #[test]
    fn text_without_brackets_is_malformed(text in "[^\\[\\]]*", n in 0_usize..8) {
        prop_assert_eq!(extract_bits(&text, Some(n)), None);
    }

    #[test]
    fn close_before_open_is_malformed(prefix in "[^\\[\\]]*", body in "[01, ]*") {
        let text = format!("{prefix}]{body}[");
        prop_assert_eq!(extract_bits(&text, None), None);
    }

    #[test]
    fn reply_lines_extract_losslessly(bits in prop::collection::vec(0_u8..=1, 0..64)) {
        let line = Reply::job_result(bits.clone()).to_line().unwrap();
        prop_assert_eq!(extract_bits(&line, Some(bits.len())), Some(bits));
    }
}

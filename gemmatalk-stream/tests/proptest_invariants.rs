//! Property-based tests: reassembly is chunking-independent, and the
//! displayed prefix never runs ahead of the received reply.

use gemmatalk_stream::{LineBuffer, Session};
use gemmatalk_types::{Event, Line};
use proptest::prelude::*;

fn reassemble(chunks: &[&[u8]]) -> Vec<Line> {
    let mut buf = LineBuffer::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        lines.extend(buf.push(chunk));
    }
    lines.extend(buf.finish());
    lines
}

fn split_at_points<'a>(bytes: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut cuts: Vec<usize> = points.iter().map(|p| p % (bytes.len() + 1)).collect();
    cuts.sort_unstable();
    cuts.dedup();
    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(&bytes[start..cut]);
        start = cut;
    }
    chunks.push(&bytes[start..]);
    chunks
}

#[derive(Debug, Clone)]
enum Step {
    Token(String),
    Reveal(usize),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-zé⚠ ]{0,8}".prop_map(Step::Token),
        (0usize..12).prop_map(Step::Reveal),
    ]
}

proptest! {
    #[test]
    fn reassembly_is_independent_of_chunking(
        text in "[a-z ⚠é\r\n]{0,64}",
        points in proptest::collection::vec(any::<usize>(), 0..10),
    ) {
        let bytes = text.as_bytes();
        let whole = reassemble(&[bytes]);
        let split = reassemble(&split_at_points(bytes, &points));
        prop_assert_eq!(whole, split);
    }

    #[test]
    fn displayed_prefix_never_overtakes_reply(steps in proptest::collection::vec(arb_step(), 0..24)) {
        let mut session = Session::new();
        for step in steps {
            match step {
                Step::Token(text) => {
                    session.apply(Event::content(text));
                }
                Step::Reveal(n) => {
                    for _ in 0..n {
                        session.reveal_step();
                    }
                }
            }
            let state = session.state();
            prop_assert!(state.accumulated_reply.starts_with(&state.displayed_prefix));
        }
        session.apply(Event::EndOfStream);
        let state = session.state();
        prop_assert_eq!(&state.displayed_prefix, &state.accumulated_reply);
        prop_assert_eq!(state.accumulated_reply.trim_end(), state.accumulated_reply.as_str());
    }
}

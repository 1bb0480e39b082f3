//! Byte stream to event stream.
//!
//! The backend's `/stream` body looks like:
//! ```text
//! data: {"status":"pulling manifest"}
//! data: {"status":"pulling 6a07","digest":"sha256:6a07","total":2019377376,"completed":241970}
//! data: success
//! data: Hi there
//! data: [END]
//! ```
//! with the `data: ` prefix optional and JSON and bare text mixed freely.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use gemmatalk_types::Event;

use crate::classify::Classifier;
use crate::lines::LineBuffer;

/// Decode a raw byte stream into classified [`Event`]s.
///
/// Partial lines are buffered across chunks; the unterminated tail is
/// classified at end of input. The stream ends after `[END]`, after the
/// first transport error (which is passed through), or when `bytes` ends.
pub fn decode_stream<S, E>(
    bytes: S,
    classifier: Classifier,
) -> impl Stream<Item = Result<Event, E>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    async_stream::stream! {
        let mut bytes = std::pin::pin!(bytes);
        let mut lines = LineBuffer::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for line in lines.push(&chunk) {
                if let Some(event) = classifier.classify(&line.text) {
                    let end = event == Event::EndOfStream;
                    yield Ok(event);
                    if end {
                        return;
                    }
                }
            }
        }

        if let Some(event) = lines.finish().and_then(|line| classifier.classify(&line.text)) {
            yield Ok(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(chunks: Vec<&'static str>) -> Vec<Event> {
        let bytes = futures::stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c.as_bytes()))),
        );
        decode_stream(bytes, Classifier::new())
            .map(|r| r.expect("no transport errors"))
            .collect()
            .await
    }

    #[tokio::test]
    async fn decodes_mixed_stream() {
        let events = collect(vec![
            "data: {\"status\":\"pulling man",
            "ifest\"}\ndata: Hi\n",
            "data: [END]\n",
        ])
        .await;
        assert_eq!(
            events,
            vec![
                Event::status("pulling manifest"),
                Event::content("Hi"),
                Event::EndOfStream,
            ]
        );
    }

    #[tokio::test]
    async fn stops_after_end_marker() {
        let events = collect(vec!["[END]\nafter\n"]).await;
        assert_eq!(events, vec![Event::EndOfStream]);
    }

    #[tokio::test]
    async fn flushes_partial_tail() {
        let events = collect(vec!["one\ntwo"]).await;
        assert_eq!(events, vec![Event::content("one"), Event::content("two")]);
    }

    #[tokio::test]
    async fn passes_through_transport_error() {
        let bytes = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"a\n")),
            Err("boom"),
            Ok(Bytes::from_static(b"b\n")),
        ]);
        let results: Vec<_> = decode_stream(bytes, Classifier::new()).collect().await;
        assert_eq!(results, vec![Ok(Event::content("a")), Err("boom")]);
    }
}

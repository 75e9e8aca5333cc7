use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::errors::{AppError, BoxError};
use crate::models::ChatRequest;
use crate::relay::FragmentExtractor;
use crate::upstream::UpstreamClient;

/// One fragment in flight at a time: the client's reads pace the upstream reads.
const CHANNEL_CAPACITY: usize = 1;

/// Consumer side of a relay: UTF-8 text fragments in upstream order, ending
/// early with an `Err` if the upstream body fails mid-stream.
pub type FragmentStream = ReceiverStream<Result<Bytes, AppError>>;

#[derive(Clone)]
pub struct RelayService {
    upstream: UpstreamClient,
}

impl RelayService {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Opens the upstream call and spawns the producer task. Every failure
    /// that can still change the response status surfaces here, before any
    /// byte of the body exists.
    pub async fn relay(&self, request: ChatRequest) -> Result<FragmentStream, AppError> {
        let response = self.upstream.open_stream(&request.messages).await?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(pump(response.bytes_stream(), tx));

        Ok(ReceiverStream::new(rx))
    }
}

/// Producer loop: reads upstream chunks, extracts fragments and forwards each
/// one as soon as it is complete. Returning drops both the upstream body and
/// the sender, which closes the outbound stream exactly once.
pub async fn pump<S, E>(upstream: S, tx: mpsc::Sender<Result<Bytes, AppError>>)
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    tokio::pin!(upstream);
    let mut extractor = FragmentExtractor::new();
    let mut forwarded = 0usize;

    loop {
        let item = tokio::select! {
            _ = tx.closed() => {
                debug!(forwarded, "Client went away, releasing upstream stream");
                return;
            }
            item = upstream.next() => item,
        };

        let chunk = match item {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => {
                let err = AppError::StreamRead(e.into());
                warn!(forwarded, "Aborting relay: {err}");
                let _ = tx.send(Err(err)).await;
                return;
            }
            None => break,
        };

        if !forward(&tx, extractor.push(&chunk), &mut forwarded).await {
            return;
        }
    }

    if !forward(&tx, extractor.finish(), &mut forwarded).await {
        return;
    }

    debug!(
        forwarded,
        ignored = extractor.ignored_lines(),
        sentinel = extractor.saw_sentinel(),
        "Relay finished"
    );
}

async fn forward(
    tx: &mpsc::Sender<Result<Bytes, AppError>>,
    fragments: Vec<String>,
    forwarded: &mut usize,
) -> bool {
    for fragment in fragments {
        if tx.send(Ok(Bytes::from(fragment))).await.is_err() {
            debug!(forwarded = *forwarded, "Client went away mid-send");
            return false;
        }
        *forwarded += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::io;

    fn delta(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
        )
    }

    async fn run(chunks: Vec<Result<Bytes, io::Error>>) -> Vec<Result<Bytes, AppError>> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(pump(stream::iter(chunks), tx));
        let items = ReceiverStream::new(rx).collect::<Vec<_>>().await;
        task.await.unwrap();
        items
    }

    #[tokio::test]
    async fn forwards_fragments_in_order() {
        let body = format!("{}{}data: [DONE]\n\n", delta("Hel"), delta("lo"));
        let (a, b) = body.as_bytes().split_at(17);
        let items = run(vec![Ok(Bytes::copy_from_slice(a)), Ok(Bytes::copy_from_slice(b))]).await;

        let text: Vec<Bytes> = items.into_iter().map(Result::unwrap).collect();
        assert_eq!(text, vec![Bytes::from("Hel"), Bytes::from("lo")]);
    }

    #[tokio::test]
    async fn read_error_ends_stream_with_error() {
        let items = run(vec![
            Ok(Bytes::from(delta("partial"))),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            Ok(Bytes::from(delta("never"))),
        ])
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from("partial"));
        assert!(matches!(items[1], Err(AppError::StreamRead(_))));
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        drop(rx);
        // Never yields: only the closed channel can end the task.
        let upstream = stream::pending::<Result<Bytes, io::Error>>();
        tokio::time::timeout(std::time::Duration::from_secs(1), pump(upstream, tx))
            .await
            .expect("pump should return once the client is gone");
    }

    #[tokio::test]
    async fn empty_upstream_closes_cleanly() {
        assert!(run(vec![Ok(Bytes::from("data: [DONE]\n\n"))]).await.is_empty());
        assert!(run(vec![]).await.is_empty());
    }
}

//! Console transport.
//!
//! Publishes result events as JSON lines and subscribes to nothing. The CLI
//! prints results through it.

use futures::StreamExt;
use licdata_core::{BusScope, DomainEvent, EventKind, PublishError, SignalStream, Transport};
use serde::Serialize;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt, Stdout},
    sync::Mutex,
};

/// One published line.
#[derive(Serialize)]
struct Line<'a> {
    scope: BusScope,
    event: &'a DomainEvent,
}

/// A transport writing one JSON object per published event.
#[derive(Debug)]
pub struct ConsoleTransport<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleTransport {
    /// Write to standard output.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleTransport<W> {
    /// Write to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            out: Mutex::new(writer),
        }
    }
}

impl<W> Transport for ConsoleTransport<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    fn subscribe(&self, _kind: EventKind, _scope: BusScope) -> SignalStream {
        futures::stream::empty().boxed()
    }

    async fn publish(&self, event: &DomainEvent, scope: BusScope) -> Result<(), PublishError> {
        let mut line =
            serde_json::to_vec(&Line { scope, event }).map_err(|source| PublishError::Encode {
                kind: event.kind(),
                source: source.into(),
            })?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line)
            .await
            .map_err(|err| PublishError::Transport(err.into()))?;
        out.flush()
            .await
            .map_err(|err| PublishError::Transport(err.into()))
    }
}

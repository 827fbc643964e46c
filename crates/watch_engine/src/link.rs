//! One websocket attempt against the live channel.

use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use watch_logging::{watch_debug, watch_info};

use crate::{AttemptId, EngineEvent, LinkEvent};

pub trait LinkSink: Send + Sync {
    fn emit(&self, attempt: AttemptId, event: LinkEvent);
}

pub struct ChannelLinkSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelLinkSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl LinkSink for ChannelLinkSink {
    fn emit(&self, attempt: AttemptId, event: LinkEvent) {
        let _ = self.tx.send(EngineEvent::Link { attempt, event });
    }
}

/// Runs one attempt until the peer goes away or `cancel` fires.
///
/// Every exit that is not a cancellation ends with [`LinkEvent::Closed`], so a
/// failure is always followed by a close.
pub async fn run_link(
    attempt: AttemptId,
    url: &str,
    connect_timeout: Duration,
    sink: &dyn LinkSink,
    cancel: CancellationToken,
) {
    let handshake = tokio::time::timeout(connect_timeout, connect_async(url));
    let mut stream = tokio::select! {
        _ = cancel.cancelled() => {
            watch_debug!("Attempt {} cancelled during handshake", attempt);
            return;
        }
        outcome = handshake => match outcome {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(err)) => {
                sink.emit(attempt, LinkEvent::Failed(format!("connect failed: {err}")));
                sink.emit(attempt, LinkEvent::Closed);
                return;
            }
            Err(_) => {
                sink.emit(
                    attempt,
                    LinkEvent::Failed(format!("connect timed out after {connect_timeout:?}")),
                );
                sink.emit(attempt, LinkEvent::Closed);
                return;
            }
        },
    };

    watch_info!("Attempt {} connected to {}", attempt, url);
    sink.emit(attempt, LinkEvent::Opened);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = stream.close(None).await;
                watch_debug!("Attempt {} closed locally", attempt);
                return;
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => sink.emit(attempt, LinkEvent::Text(text)),
                Some(Ok(Message::Close(_))) | None => break,
                // Binary frames carry nothing for us; ping/pong is answered by tungstenite.
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    sink.emit(attempt, LinkEvent::Failed(err.to_string()));
                    break;
                }
            },
        }
    }

    sink.emit(attempt, LinkEvent::Closed);
}

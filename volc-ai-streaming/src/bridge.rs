//! Bridging a generation producer to a heartbeat-sustained event stream.
//!
//! A long-running generation can sit silent for many seconds while the model
//! thinks, which trips transport-level idle timeouts between the service and
//! its caller. [`EventBridge`] forwards every producer event verbatim and
//! fills idle gaps with synthetic heartbeat events, stopping all activity the
//! moment the producer ends or the subscriber goes away.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::StreamError;

/// Heartbeat cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// How often the idle check runs.
    pub tick: Duration,
    /// How long the stream must have been idle for a tick to emit a
    /// heartbeat.
    pub idle_after: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(5),
            idle_after: Duration::from_secs(3),
        }
    }
}

/// The synthetic keepalive event, serialized as
/// `{"type":"heartbeat","time":<epoch-ms>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartbeatEvent {
    /// Always `"heartbeat"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Emission time in epoch milliseconds.
    pub time: i64,
}

impl HeartbeatEvent {
    /// A heartbeat stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self {
            kind: "heartbeat",
            time: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// The wire form of this heartbeat.
    pub fn to_json(&self) -> String {
        serde_json::json!({"type": self.kind, "time": self.time}).to_string()
    }
}

/// A boxed producer of serialized events, as handed to [`EventBridge::run`].
pub type EventProducer<E = StreamError> = Pin<Box<dyn Stream<Item = Result<String, E>> + Send>>;

/// Multiplexes one producer and a heartbeat timer onto one outbound stream.
///
/// The bridge owns a [`CancellationToken`] for the lifetime of one `run`
/// call. Hand a clone of it (via [`EventBridge::cancellation_token`]) to the
/// producer's own cancellable machinery so that a subscriber going away
/// propagates all the way into the transport layer.
///
/// Ordering: cancellation is observed first, then producer events, then the
/// heartbeat tick, so a real event ready at the same instant as a tick always
/// wins and cancellation never loses to either.
#[derive(Debug, Default)]
pub struct EventBridge {
    heartbeat: HeartbeatConfig,
    cancel: CancellationToken,
}

impl EventBridge {
    /// Create a bridge with the default 5 s tick / 3 s idle window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the heartbeat cadence.
    pub fn with_heartbeat(mut self, heartbeat: HeartbeatConfig) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// The token cancelled when the subscriber unsubscribes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the forwarding task and return the subscriber-facing stream.
    ///
    /// The stream ends when the producer ends; a producer error is forwarded
    /// as the single terminal item. Dropping the returned stream cancels the
    /// bridge.
    pub fn run<S, E>(self, producer: S) -> BridgeStream<E>
    where
        S: Stream<Item = Result<String, E>> + Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        let cancel = self.cancel.clone();
        let heartbeat = self.heartbeat;

        tokio::spawn(async move {
            let mut producer = std::pin::pin!(producer);
            let start = Instant::now();
            let mut ticks = tokio::time::interval_at(start + heartbeat.tick, heartbeat.tick);
            let mut last_activity = start;

            loop {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => {
                        tracing::debug!("event bridge cancelled");
                        break;
                    }

                    event = producer.next() => match event {
                        Some(Ok(event)) => {
                            last_activity = Instant::now();
                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Some(Err(err)) => {
                            let _ = tx.send(Err(err)).await;
                            break;
                        }
                        None => break,
                    },

                    _ = ticks.tick() => {
                        if last_activity.elapsed() >= heartbeat.idle_after {
                            tracing::debug!("emitting heartbeat");
                            if tx.send(Ok(HeartbeatEvent::now().to_json())).await.is_err() {
                                break;
                            }
                            last_activity = Instant::now();
                        }
                    }
                }
            }
        });

        BridgeStream {
            rx,
            cancel: self.cancel,
        }
    }
}

/// The subscriber's end of a bridged call.
///
/// Yields forwarded events and heartbeats as serialized JSON strings; the
/// stream ending is the completion signal. Dropping it, or calling
/// [`BridgeStream::cancel`], stops the heartbeat timer and cancels the
/// bridge's token; no further events are delivered after that.
#[derive(Debug)]
pub struct BridgeStream<E = StreamError> {
    rx: mpsc::Receiver<Result<String, E>>,
    cancel: CancellationToken,
}

impl<E> BridgeStream<E> {
    /// Explicitly unsubscribe.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The bridge's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl<E> Stream for BridgeStream<E> {
    type Item = Result<String, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancel.is_cancelled() {
            // Events the forwarding task buffered before it saw the
            // cancellation are discarded, not delivered.
            this.rx.close();
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

impl<E> Drop for BridgeStream<E> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn window(tick_ms: u64, idle_ms: u64) -> HeartbeatConfig {
        HeartbeatConfig {
            tick: Duration::from_millis(tick_ms),
            idle_after: Duration::from_millis(idle_ms),
        }
    }

    async fn collect<E: std::fmt::Debug>(mut stream: BridgeStream<E>) -> Vec<String> {
        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.unwrap());
        }
        events
    }

    fn is_heartbeat(event: &str) -> bool {
        serde_json::from_str::<serde_json::Value>(event)
            .map(|value| value["type"] == "heartbeat")
            .unwrap_or(false)
    }

    #[tokio::test(start_paused = true)]
    async fn no_heartbeat_before_a_fast_completion() {
        // One event at t=0, completion at t=1000ms, window 3000/5000.
        let producer = stream::unfold(0u32, |state| async move {
            match state {
                0 => Some((Ok::<_, StreamError>("evt".to_string()), 1)),
                _ => {
                    tokio::time::sleep(Duration::from_millis(1000)).await;
                    None
                }
            }
        });

        let events = collect(EventBridge::new().run(producer)).await;
        assert_eq!(events, vec!["evt".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_fills_an_idle_gap() {
        let producer = stream::unfold(0u32, |state| async move {
            match state {
                0 => {
                    tokio::time::sleep(Duration::from_millis(9000)).await;
                    Some((Ok::<_, StreamError>("late".to_string()), 1))
                }
                _ => None,
            }
        });

        let events = collect(EventBridge::new().run(producer)).await;
        // One tick at t=5s finds 5s of idle; the real event follows at t=9s.
        assert_eq!(events.len(), 2);
        assert!(is_heartbeat(&events[0]));
        assert_eq!(events[1], "late");
    }

    #[tokio::test(start_paused = true)]
    async fn recent_activity_suppresses_the_heartbeat() {
        // Events at t=4s and t=8s keep every 5s-tick inside the idle window.
        let producer = stream::unfold(0u32, |state| async move {
            if state >= 2 {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(4000)).await;
            Some((Ok::<_, StreamError>(format!("evt{state}")), state + 1))
        });

        let events = collect(EventBridge::new().run(producer)).await;
        assert_eq!(events, vec!["evt0".to_string(), "evt1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_all_further_events() {
        let producer = stream::unfold(0u32, |state| async move {
            match state {
                0 => Some((Ok::<_, StreamError>("first".to_string()), 1)),
                _ => {
                    // Would idle long enough for many heartbeats.
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Some((Ok("never".to_string()), state))
                }
            }
        });

        let mut stream = EventBridge::new()
            .with_heartbeat(window(50, 30))
            .run(producer);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, "first");

        stream.cancel();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_events_already_buffered() {
        let producer = stream::iter(vec![
            Ok::<_, StreamError>("e1".to_string()),
            Ok("e2".to_string()),
            Ok("e3".to_string()),
        ]);

        let mut stream = EventBridge::new().run(producer);
        // Give the forwarding task a chance to push every event into the
        // channel before the subscriber polls anything.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        stream.cancel();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_stream_cancels_the_token() {
        let bridge = EventBridge::new();
        let token = bridge.cancellation_token();
        let stream = bridge.run(stream::pending::<Result<String, StreamError>>());
        assert!(!token.is_cancelled());

        drop(stream);
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn producer_error_is_the_terminal_item() {
        let producer = stream::iter(vec![
            Ok("ok".to_string()),
            Err(StreamError::Utf8("bad".to_string())),
        ]);

        let mut stream = EventBridge::new().run(producer);
        assert_eq!(stream.next().await.unwrap().unwrap(), "ok");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn heartbeat_wire_shape() {
        let event = HeartbeatEvent::now();
        let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(value["type"], "heartbeat");
        assert!(value["time"].is_i64());
    }
}

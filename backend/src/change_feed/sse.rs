//! Server-Sent Events framing for feed subscriptions.
//!
//! A subscription stream always starts with the current snapshot, then emits a
//! fresh snapshot whenever the caller-supplied `next` function maps a feed
//! delivery to one. The stream ends when the feed is dropped on shutdown or
//! when the client disconnects.

use super::FeedEvent;
use actix_web::web::Bytes;
use actix_web::HttpResponse;
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use tokio::sync::broadcast::{self, error::RecvError};

/// What a subscription receives from the feed.
#[derive(Debug)]
pub enum Delivery {
    Event(FeedEvent),
    /// Events were dropped because the subscriber fell behind; the snapshot
    /// must be re-read from the store.
    Lagged,
}

/// Logs when a subscription ends, however it ends.
struct SubscriptionGuard {
    label: String,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        log::debug!("subscription closed: {}", self.label);
    }
}

fn frame<T: Serialize>(value: &T) -> Result<Bytes, Infallible> {
    match serde_json::to_string(value) {
        Ok(json) => Ok(Bytes::from(format!("data: {}\n\n", json))),
        Err(e) => {
            log::error!("cannot encode subscription frame: {}", e);
            Ok(Bytes::from_static(b": encode error\n\n"))
        }
    }
}

/// Builds the byte stream for one subscription.
pub fn event_stream<T, F>(
    label: impl Into<String>,
    initial: T,
    rx: broadcast::Receiver<FeedEvent>,
    next: F,
) -> impl Stream<Item = Result<Bytes, Infallible>> + 'static
where
    T: Serialize + 'static,
    F: FnMut(Delivery) -> Option<T> + 'static,
{
    let label = label.into();
    log::debug!("subscription opened: {}", label);
    let guard = SubscriptionGuard { label };

    let head = stream::once(async move { frame(&initial) });
    let tail = stream::unfold((rx, next, guard), |(mut rx, mut next, guard)| async move {
        loop {
            let delivery = match rx.recv().await {
                Ok(event) => Delivery::Event(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("subscription {} lagged by {} events", guard.label, skipped);
                    Delivery::Lagged
                }
                Err(RecvError::Closed) => return None,
            };
            if let Some(value) = next(delivery) {
                let bytes = frame(&value);
                return Some((bytes, (rx, next, guard)));
            }
        }
    });
    head.chain(tail)
}

/// Wraps a subscription stream in a `text/event-stream` response.
pub fn respond<S>(events: S) -> HttpResponse
where
    S: Stream<Item = Result<Bytes, Infallible>> + 'static,
{
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_feed::ChangeFeed;
    use common::model::config::Config;
    use std::sync::Arc;

    async fn frames<S>(events: S) -> Vec<String>
    where
        S: Stream<Item = Result<Bytes, Infallible>>,
    {
        events
            .map(|b| String::from_utf8(b.unwrap().to_vec()).unwrap())
            .collect()
            .await
    }

    fn config_with_interval(ms: u64) -> FeedEvent {
        let mut config = Config::default();
        config.settings.auto_save_interval = ms;
        FeedEvent::ConfigUpdated(Arc::new(config))
    }

    #[tokio::test]
    async fn starts_with_snapshot_and_ends_when_feed_is_dropped() {
        let feed = ChangeFeed::new(8);
        let events = event_stream("test", 0u64, feed.subscribe(), |d| match d {
            Delivery::Event(FeedEvent::ConfigUpdated(c)) => Some(c.settings.auto_save_interval),
            _ => None,
        });

        feed.publish(config_with_interval(1000));
        feed.publish(config_with_interval(2000));
        drop(feed);

        assert_eq!(
            frames(events).await,
            vec!["data: 0\n\n", "data: 1000\n\n", "data: 2000\n\n"]
        );
    }

    #[tokio::test]
    async fn unrelated_events_are_skipped() {
        let feed = ChangeFeed::new(8);
        let events = event_stream("test", "start", feed.subscribe(), |d| match d {
            Delivery::Event(FeedEvent::SubmissionSaved(_)) => Some("saved"),
            _ => None,
        });

        feed.publish(config_with_interval(1000));
        drop(feed);

        assert_eq!(frames(events).await, vec!["data: \"start\"\n\n"]);
    }

    #[tokio::test]
    async fn lagging_subscriber_is_asked_to_resync() {
        let feed = ChangeFeed::new(1);
        let events = event_stream("test", "start", feed.subscribe(), |d| match d {
            Delivery::Lagged => Some("resync"),
            Delivery::Event(_) => Some("event"),
        });

        for ms in [1, 2, 3] {
            feed.publish(config_with_interval(ms));
        }
        drop(feed);

        assert_eq!(
            frames(events).await,
            vec!["data: \"start\"\n\n", "data: \"resync\"\n\n", "data: \"event\"\n\n"]
        );
    }
}

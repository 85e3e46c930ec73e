//! Broadcasts document changes to every open subscription.
//!
//! A single [`ChangeFeed`] is created in `main.rs` and shared through
//! `AppState`. Write handlers publish a [`FeedEvent`] after the store has
//! committed; each Server-Sent Events subscription holds its own
//! `broadcast::Receiver` and turns matching events into frames (see [`sse`]).

pub mod sse;

use common::model::config::Config;
use common::model::submission::Submission;
use std::sync::Arc;
use tokio::sync::broadcast;

/// A committed change to one of the stored documents.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    ConfigUpdated(Arc<Config>),
    SubmissionSaved(Arc<Submission>),
}

/// Cloneable handle to the broadcast channel.
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<FeedEvent>,
}

impl ChangeFeed {
    /// `capacity` is the number of events a slow subscriber may fall behind
    /// before it is told it lagged.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes `event` and returns how many subscribers will see it.
    pub fn publish(&self, event: FeedEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let feed = ChangeFeed::new(4);
        let delivered = feed.publish(FeedEvent::ConfigUpdated(Arc::new(Config::default())));
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_event() {
        let feed = ChangeFeed::new(4);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        let delivered = feed.publish(FeedEvent::ConfigUpdated(Arc::new(Config::default())));
        assert_eq!(delivered, 2);
        assert!(matches!(a.recv().await, Ok(FeedEvent::ConfigUpdated(_))));
        assert!(matches!(b.recv().await, Ok(FeedEvent::ConfigUpdated(_))));
    }
}

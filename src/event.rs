//! Change notification
//!
//! Every mutation of a [`UiConfiguration`](crate::UiConfiguration) sends one
//! [`ConfigEvent`] to every subscriber; a bulk load sends a single
//! [`ConfigEvent::Colors`]. Delivery is synchronous and never blocks: each
//! subscriber owns an unbounded channel that it drains on its own schedule.
//!
//! Subscribers only see events after the mutating call has returned, and the
//! configuration is mutably borrowed for the whole call, so a subscriber cannot
//! re-enter a mutation while an event is being delivered.

use smol::channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::error::{UiConfigError, UiConfigResult};

/// Name carried by the aggregated color event
pub const COLORS_CHANGED: &str = "colors";

/// A configuration change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// A typed configuration variable changed
    Parameter(String),
    /// A single base color, relative color or alias was set
    Color(String),
    /// The color tables were loaded or replaced in bulk
    Colors,
}

impl ConfigEvent {
    /// The name of whatever changed
    pub fn name(&self) -> &str {
        match self {
            ConfigEvent::Parameter(name) | ConfigEvent::Color(name) => name,
            ConfigEvent::Colors => COLORS_CHANGED,
        }
    }
}

/// Fans events out to subscribers
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<Sender<ConfigEvent>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> ConfigEvents {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        ConfigEvents { rx }
    }

    /// Send `event` to every live subscriber, dropping those that went away
    pub fn emit(&mut self, event: ConfigEvent) {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|tx| tx.try_send(event.clone()).is_ok());

        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            tracing::debug!(pruned, event = event.name(), "dropped closed subscribers");
        }
    }
}

/// Receiving end of a subscription
#[derive(Debug)]
pub struct ConfigEvents {
    rx: Receiver<ConfigEvent>,
}

impl ConfigEvents {
    /// Non-blocking attempt to receive an event
    pub fn try_recv(&self) -> UiConfigResult<Option<ConfigEvent>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(UiConfigError::ChannelClosed.into()),
        }
    }

    /// Wait for the next event; `None` once the configuration is gone
    pub async fn recv(&self) -> Option<ConfigEvent> {
        self.rx.recv().await.ok()
    }

    /// Everything queued so far
    pub fn drain(&self) -> Vec<ConfigEvent> {
        std::iter::from_fn(|| self.rx.try_recv().ok()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smol::block_on;

    #[test]
    fn test_event_names() {
        assert_eq!(ConfigEvent::Parameter("font-scale".into()).name(), "font-scale");
        assert_eq!(ConfigEvent::Color("bg".into()).name(), "bg");
        assert_eq!(ConfigEvent::Colors.name(), "colors");
    }

    #[test]
    fn test_broadcast_to_every_subscriber() {
        let mut notifier = Notifier::new();
        let first = notifier.subscribe();
        let second = notifier.subscribe();

        notifier.emit(ConfigEvent::Color("bg".into()));

        assert_eq!(first.drain(), vec![ConfigEvent::Color("bg".into())]);
        assert_eq!(second.try_recv().unwrap(), Some(ConfigEvent::Color("bg".into())));
        assert_eq!(second.try_recv().unwrap(), None);
    }

    #[test]
    fn test_async_recv() {
        let mut notifier = Notifier::new();
        let events = notifier.subscribe();
        notifier.emit(ConfigEvent::Colors);

        let received = block_on(events.recv());
        assert_eq!(received, Some(ConfigEvent::Colors));
    }

    #[test]
    fn test_closed_subscribers_are_pruned() {
        let mut notifier = Notifier::new();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());

        notifier.emit(ConfigEvent::Colors);
        assert_eq!(notifier.subscribers.len(), 1);
        assert_eq!(kept.drain().len(), 1);
    }

    #[test]
    fn test_recv_after_notifier_dropped() {
        let mut notifier = Notifier::new();
        let events = notifier.subscribe();
        notifier.emit(ConfigEvent::Colors);
        drop(notifier);

        assert_eq!(events.try_recv().unwrap(), Some(ConfigEvent::Colors));
        assert!(events.try_recv().is_err());
        assert_eq!(block_on(events.recv()), None);
    }
}

//! Events published to the UI layer.
//!
//! Services never navigate or draw anything themselves. They publish
//! [`UiEvent`]s on an [`EventBus`] and whatever UI is attached reacts.

use tokio::sync::broadcast;
use tracing::trace;

use super::route::Route;

/// Broadcast channel capacity.
const CHANNEL_CAPACITY: usize = 64;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational / success.
    Info,
    /// Failure.
    Destructive,
}

/// A transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short headline.
    pub title: String,
    /// Detail line.
    pub description: String,
    /// Severity.
    pub kind: NoticeKind,
}

impl Notice {
    /// Create an informational notice.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Info,
        }
    }

    /// Create a failure notice.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Destructive,
        }
    }

    /// Whether this notice reports a failure.
    pub fn is_destructive(&self) -> bool {
        self.kind == NoticeKind::Destructive
    }
}

/// Something the UI should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Move to a route.
    Navigate(Route),
    /// Show a notice.
    Notify(Notice),
    /// The server rejected the session token and the session was cleared.
    SessionExpired,
}

/// Fan-out channel for [`UiEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl EventBus {
    /// Create a new bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Get a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// Publish an event.
    ///
    /// Returns the number of receivers that got it. Publishing with nobody
    /// listening is fine.
    pub fn publish(&self, event: UiEvent) -> usize {
        trace!(?event, "publishing ui event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Publish a navigation request.
    pub fn navigate(&self, route: Route) -> usize {
        self.publish(UiEvent::Navigate(route))
    }

    /// Publish a notice.
    pub fn notify(&self, notice: Notice) -> usize {
        self.publish(UiEvent::Notify(notice))
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

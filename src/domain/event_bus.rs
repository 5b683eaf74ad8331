//! In-process fan-out of campaign change notifications.
//!
//! The campaign store is the only publisher. Editors and reviewers each
//! take a receiver when they open and drain it before writing, so that a
//! save never starts from a copy another view has already replaced.

use tokio::sync::broadcast;

use super::CampaignEvent;

/// Shared sender side for [`CampaignEvent`]s; clones publish to the same
/// channel.
///
/// Each receiver buffers at most `capacity` events. A view that falls
/// further behind sees `Lagged` and reloads from the store.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CampaignEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per receiver
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announces a campaign write to every open view.
    ///
    /// Returns how many views were listening. With none open the event is
    /// discarded, which is normal for a headless process.
    pub fn publish(&self, event: CampaignEvent) -> usize {
        match self.sender.send(event) {
            Ok(listeners) => listeners,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(event_type = event.event_type_str(), "no open views, event discarded");
                0
            }
        }
    }

    /// Opens a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CampaignEvent> {
        self.sender.subscribe()
    }

    /// Number of views currently holding a receiver.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

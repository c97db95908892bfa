//! Notices published by a running feed.

use std::ops::Range;

use stashtv_model::PlaybackState;
use tokio::sync::broadcast;

use crate::scheduler::{DisplayFlags, TapFeedback};

/// Something observers of the feed may want to render or log.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedNotice {
    ActiveChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    WindowGrew {
        range: Range<usize>,
        dropped: usize,
    },
    FeedExhausted {
        loaded: usize,
    },
    FetchFailed {
        offset: usize,
        message: String,
    },
    TapFeedbackShown(TapFeedback),
    TapFeedbackHidden {
        index: usize,
    },
    /// An item's stored state changed from a control, not a transition.
    ItemUpdated {
        index: usize,
        state: PlaybackState,
    },
    DisplayChanged(DisplayFlags),
}

/// In-process fan-out of [`FeedNotice`]s. Publishing never blocks and is a
/// no-op while nobody is subscribed.
#[derive(Debug, Clone)]
pub struct NoticeBus {
    sender: broadcast::Sender<FeedNotice>,
}

impl NoticeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedNotice> {
        self.sender.subscribe()
    }

    pub fn publish(&self, notice: FeedNotice) {
        let _ = self.sender.send(notice);
    }

    pub fn publish_all(&self, notices: impl IntoIterator<Item = FeedNotice>) {
        for notice in notices {
            self.publish(notice);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

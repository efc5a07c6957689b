//! Repository event types and channel.
//!
//! Repository operations run fire-and-forget, so their outcomes surface
//! here: every completed refresh, local apply, and failure is broadcast
//! for consumption by view-models. The failure event is emitted on every
//! failed path, so the error observable is always populated.

use tokio::sync::broadcast;

use crate::models::Comment;

/// Type alias for the feed event sender.
pub type FeedEventSender = broadcast::Sender<FeedEvent>;

/// Create a new feed event channel with the specified capacity.
///
/// Returns both the sender and receiver. The sender can be cloned to
/// allow multiple producers, and the receiver can be resubscribed to
/// allow multiple consumers.
pub fn create_event_channel(capacity: usize) -> (FeedEventSender, broadcast::Receiver<FeedEvent>) {
    broadcast::channel(capacity)
}

/// The repository action an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedAction {
    Refresh,
    RefreshPost,
    Like,
    Comment,
    Share,
    Publish,
    Resync,
}

impl FeedAction {
    /// Returns a short label for the action suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedAction::Refresh => "refresh",
            FeedAction::RefreshPost => "refresh-post",
            FeedAction::Like => "like",
            FeedAction::Comment => "comment",
            FeedAction::Share => "share",
            FeedAction::Publish => "publish",
            FeedAction::Resync => "resync",
        }
    }

    /// The user-facing prefix put before a failure message.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            FeedAction::Refresh | FeedAction::RefreshPost | FeedAction::Resync => "获取帖子失败：",
            FeedAction::Like => "点赞失败：",
            FeedAction::Comment => "评论失败：",
            FeedAction::Share => "分享失败：",
            FeedAction::Publish => "发布失败：",
        }
    }
}

impl std::fmt::Display for FeedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event broadcast by the repository.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The post list was brought up to date from the backend
    Refreshed {
        /// How many posts the backend returned
        count: usize,
    },
    /// A post row changed through a local apply
    PostUpdated {
        post_id: String,
    },
    /// A locally composed post entered the store
    PostPublished {
        post_id: String,
    },
    /// A comment was applied locally and submitted
    CommentPosted(Comment),
    /// An action failed; `message` is the fixed user-facing text
    ActionFailed {
        action: FeedAction,
        message: String,
    },
}

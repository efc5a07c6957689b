//! Feed repository: merges the local store with the remote source.
//!
//! The repository owns a serial worker task that applies every store
//! mutation in command order. Public operations are fire-and-forget
//! sends into that worker; callers never block and observe outcomes
//! through the store's watch channel and the [`FeedEvent`] broadcast.
//!
//! Mutating actions are optimistic: the local row changes immediately,
//! the remote call runs from a spawned task, and a remote failure rolls
//! back the snapshot of that row only. `resync` remains the blunt
//! recovery: it overwrites local state with the authoritative remote
//! list.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::events::{self, FeedAction, FeedEvent, FeedEventSender};
use crate::models::{Comment, Post, User};
use crate::store::PostStore;
use crate::traits::RemoteFeed;

/// Commands processed by the repository worker.
///
/// The `Apply*` and `Rollback` variants are internal: spawned remote
/// calls send them back into the queue so every store mutation still
/// happens on the worker, in order.
enum RepoCommand {
    Refresh,
    RefreshPost(String),
    Like(String),
    Comment { post_id: String, content: String },
    Share(String),
    ToggleSave(String),
    ToggleFollow(String),
    Publish(Post),
    Resync,
    Shutdown,
    ApplyFetched { action: FeedAction, posts: Vec<Post> },
    ApplyPost(Post),
    Rollback { action: FeedAction, snapshot: Post, message: String },
}

/// Handle to the feed repository worker.
///
/// Dropping the handle shuts the worker down; in-flight remote calls
/// finish quietly.
pub struct FeedRepository {
    /// Command channel into the worker
    cmd_tx: mpsc::UnboundedSender<RepoCommand>,
    /// Event broadcast shared with the worker
    events: FeedEventSender,
    /// The store the worker mutates
    store: Arc<PostStore>,
}

impl FeedRepository {
    /// Start the repository worker over the given store and remote
    /// source.
    pub fn spawn(store: Arc<PostStore>, remote: Arc<dyn RemoteFeed>, config: &Config) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (events, _) = events::create_event_channel(config.event_capacity);

        tokio::spawn(run_worker_loop(
            Arc::clone(&store),
            remote,
            config.current_user.clone(),
            events.clone(),
            cmd_tx.clone(),
            cmd_rx,
        ));

        Self {
            cmd_tx,
            events,
            store,
        }
    }

    /// The store this repository writes to.
    pub fn store(&self) -> Arc<PostStore> {
        Arc::clone(&self.store)
    }

    /// Subscribe to repository events.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Bring the post list up to date from the backend.
    ///
    /// Fetched rows are merged insert-or-replace, so locally published
    /// posts the backend does not know yet survive.
    pub fn refresh(&self) {
        self.send(RepoCommand::Refresh);
    }

    /// Bring a single post up to date from the backend.
    pub fn refresh_post(&self, post_id: &str) {
        self.send(RepoCommand::RefreshPost(post_id.to_string()));
    }

    /// Toggle the liked flag on a post.
    pub fn like(&self, post_id: &str) {
        self.send(RepoCommand::Like(post_id.to_string()));
    }

    /// Comment on a post as the configured current user.
    pub fn comment(&self, post_id: &str, content: &str) {
        self.send(RepoCommand::Comment {
            post_id: post_id.to_string(),
            content: content.to_string(),
        });
    }

    /// Share a post.
    pub fn share(&self, post_id: &str) {
        self.send(RepoCommand::Share(post_id.to_string()));
    }

    /// Toggle the saved flag on a post. Local-only; the backend surface
    /// has no save endpoint.
    pub fn toggle_save(&self, post_id: &str) {
        self.send(RepoCommand::ToggleSave(post_id.to_string()));
    }

    /// Toggle following the post's author. Local-only; the backend
    /// surface has no follow endpoint.
    pub fn toggle_follow(&self, post_id: &str) {
        self.send(RepoCommand::ToggleFollow(post_id.to_string()));
    }

    /// Publish a composed post: insert it locally and submit it to the
    /// backend. On remote failure the local copy is kept.
    pub fn publish(&self, post: Post) {
        self.send(RepoCommand::Publish(post));
    }

    /// Overwrite local state with the authoritative remote list,
    /// discarding every optimistic delta.
    pub fn resync(&self) {
        self.send(RepoCommand::Resync);
    }

    fn send(&self, cmd: RepoCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("Feed repository worker is gone; command dropped");
        }
    }
}

impl Drop for FeedRepository {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RepoCommand::Shutdown);
    }
}

/// Run the repository worker until shutdown.
async fn run_worker_loop(
    store: Arc<PostStore>,
    remote: Arc<dyn RemoteFeed>,
    current_user: User,
    events: FeedEventSender,
    cmd_tx: mpsc::UnboundedSender<RepoCommand>,
    mut cmd_rx: mpsc::UnboundedReceiver<RepoCommand>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            RepoCommand::Refresh => {
                spawn_fetch(FeedAction::Refresh, &remote, &events, &cmd_tx);
            }

            RepoCommand::Resync => {
                spawn_fetch(FeedAction::Resync, &remote, &events, &cmd_tx);
            }

            RepoCommand::RefreshPost(post_id) => {
                let remote = Arc::clone(&remote);
                let events = events.clone();
                let tx = cmd_tx.clone();
                tokio::spawn(async move {
                    match remote.fetch_post(&post_id).await {
                        Ok(post) => {
                            let _ = tx.send(RepoCommand::ApplyPost(post));
                        }
                        Err(err) => {
                            warn!("Fetching post {} failed: {}", post_id, err);
                            emit_failure(&events, FeedAction::RefreshPost, err.user_message());
                        }
                    }
                });
            }

            RepoCommand::Like(post_id) => {
                let snapshot = match store.get(&post_id) {
                    Some(post) => post,
                    None => {
                        warn!("Ignoring like for unknown post {}", post_id);
                        continue;
                    }
                };
                let mut updated = snapshot.clone();
                updated.toggle_liked();
                apply(&store, &events, updated);

                let remote = Arc::clone(&remote);
                let tx = cmd_tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = remote.like_post(&post_id).await {
                        warn!("Like for {} failed remotely: {}", post_id, err);
                        let _ = tx.send(RepoCommand::Rollback {
                            action: FeedAction::Like,
                            snapshot,
                            message: err.user_message().to_string(),
                        });
                    }
                });
            }

            RepoCommand::Comment { post_id, content } => {
                let snapshot = match store.get(&post_id) {
                    Some(post) => post,
                    None => {
                        warn!("Ignoring comment for unknown post {}", post_id);
                        continue;
                    }
                };
                let mut updated = snapshot.clone();
                updated.record_comment();
                apply(&store, &events, updated);

                let comment = Comment::new(&post_id, &current_user, &content);
                let _ = events.send(FeedEvent::CommentPosted(comment));

                let remote = Arc::clone(&remote);
                let tx = cmd_tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = remote.comment_post(&post_id, &content).await {
                        warn!("Comment on {} failed remotely: {}", post_id, err);
                        let _ = tx.send(RepoCommand::Rollback {
                            action: FeedAction::Comment,
                            snapshot,
                            message: err.user_message().to_string(),
                        });
                    }
                });
            }

            RepoCommand::Share(post_id) => {
                let snapshot = match store.get(&post_id) {
                    Some(post) => post,
                    None => {
                        warn!("Ignoring share for unknown post {}", post_id);
                        continue;
                    }
                };
                let mut updated = snapshot.clone();
                updated.record_share();
                apply(&store, &events, updated);

                let remote = Arc::clone(&remote);
                let tx = cmd_tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = remote.share_post(&post_id).await {
                        warn!("Share of {} failed remotely: {}", post_id, err);
                        let _ = tx.send(RepoCommand::Rollback {
                            action: FeedAction::Share,
                            snapshot,
                            message: err.user_message().to_string(),
                        });
                    }
                });
            }

            RepoCommand::ToggleSave(post_id) => {
                match store.get(&post_id) {
                    Some(mut post) => {
                        post.toggle_saved();
                        apply(&store, &events, post);
                    }
                    None => warn!("Ignoring save for unknown post {}", post_id),
                }
            }

            RepoCommand::ToggleFollow(post_id) => {
                match store.get(&post_id) {
                    Some(mut post) => {
                        post.toggle_followed();
                        apply(&store, &events, post);
                    }
                    None => warn!("Ignoring follow for unknown post {}", post_id),
                }
            }

            RepoCommand::Publish(post) => {
                let post_id = post.id.clone();
                if let Err(e) = store.upsert(post.clone()) {
                    warn!("Failed to persist published post {}: {}", post_id, e);
                }
                info!("Published post {} locally", post_id);
                let _ = events.send(FeedEvent::PostPublished {
                    post_id: post_id.clone(),
                });

                let remote = Arc::clone(&remote);
                let events = events.clone();
                tokio::spawn(async move {
                    if let Err(err) = remote.publish_post(&post).await {
                        // The local copy is kept; publishing degrades to
                        // local-only data.
                        warn!("Publishing {} failed remotely: {}", post_id, err);
                        emit_failure(&events, FeedAction::Publish, err.user_message());
                    }
                });
            }

            RepoCommand::ApplyFetched { action, posts } => {
                let count = posts.len();
                let result = match action {
                    FeedAction::Resync => store.replace_all(posts),
                    _ => store.upsert_many(posts),
                };
                if let Err(e) = result {
                    warn!("Failed to persist fetched posts: {}", e);
                }
                debug!("Applied {} fetched posts ({})", count, action);
                let _ = events.send(FeedEvent::Refreshed { count });
            }

            RepoCommand::ApplyPost(post) => {
                let post_id = post.id.clone();
                if let Err(e) = store.upsert(post) {
                    warn!("Failed to persist fetched post {}: {}", post_id, e);
                }
                let _ = events.send(FeedEvent::PostUpdated { post_id });
            }

            RepoCommand::Rollback {
                action,
                snapshot,
                message,
            } => {
                // Restore only the mutated row; other optimistic edits
                // stay untouched. A row deleted in the meantime stays
                // deleted.
                if store.get(&snapshot.id).is_some() {
                    let post_id = snapshot.id.clone();
                    if let Err(e) = store.upsert(snapshot) {
                        warn!("Failed to persist rollback of {}: {}", post_id, e);
                    }
                    debug!("Rolled back {} after failed {}", post_id, action);
                }
                emit_failure(&events, action, &message);
            }

            RepoCommand::Shutdown => break,
        }
    }

    debug!("Feed repository worker stopped");
}

/// Apply a mutated row and announce it.
fn apply(store: &PostStore, events: &FeedEventSender, post: Post) {
    let post_id = post.id.clone();
    if let Err(e) = store.upsert(post) {
        warn!("Failed to persist update of {}: {}", post_id, e);
    }
    let _ = events.send(FeedEvent::PostUpdated { post_id });
}

/// Fetch the full list in the background and feed the result back into
/// the worker.
fn spawn_fetch(
    action: FeedAction,
    remote: &Arc<dyn RemoteFeed>,
    events: &FeedEventSender,
    cmd_tx: &mpsc::UnboundedSender<RepoCommand>,
) {
    let remote = Arc::clone(remote);
    let events = events.clone();
    let tx = cmd_tx.clone();
    tokio::spawn(async move {
        match remote.fetch_posts().await {
            Ok(posts) => {
                let _ = tx.send(RepoCommand::ApplyFetched { action, posts });
            }
            Err(err) => {
                // The cache stays as it is; the UI keeps stale data.
                warn!("Fetching posts failed ({}): {}", action, err);
                emit_failure(&events, action, err.user_message());
            }
        }
    });
}

fn emit_failure(events: &FeedEventSender, action: FeedAction, message: &str) {
    let _ = events.send(FeedEvent::ActionFailed {
        action,
        message: message.to_string(),
    });
}

//! View-models bridging the repository to observable screen state.
//!
//! Each view-model owns watch channels a frontend can subscribe to and
//! a background task that folds repository events into them. All
//! methods are non-blocking; outcomes arrive through the channels.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::config::Config;
use crate::events::{FeedAction, FeedEvent};
use crate::models::{Comment, DraftError, Post, PostDraft, User};
use crate::repository::FeedRepository;
use crate::store::PostStore;

/// Notice shown when the load-more flow finds nothing further.
pub const NO_MORE_DATA: &str = "没有更多数据";

/// Notice shown after a post was handed to the repository for publishing.
pub const PUBLISH_SUCCESS: &str = "帖子发布成功";

/// Observable state for the feed screen.
///
/// Posts come straight from the store's watch channel; loading, error,
/// notice and has-more are folded from repository events and the
/// view-model's own flows.
pub struct FeedViewModel {
    repository: Arc<FeedRepository>,
    store: Arc<PostStore>,
    current_user: User,
    load_more_delay: Duration,
    loading: Arc<watch::Sender<bool>>,
    has_more: Arc<watch::Sender<bool>>,
    error: Arc<watch::Sender<Option<String>>>,
    notice: Arc<watch::Sender<Option<String>>>,
}

impl FeedViewModel {
    /// Create the view-model and start folding repository events.
    pub fn new(repository: Arc<FeedRepository>, config: &Config) -> Self {
        let store = repository.store();
        let (loading, _) = watch::channel(false);
        let (has_more, _) = watch::channel(true);
        let (error, _) = watch::channel(None);
        let (notice, _) = watch::channel(None);
        let loading = Arc::new(loading);
        let has_more = Arc::new(has_more);
        let error = Arc::new(error);
        let notice = Arc::new(notice);

        tokio::spawn(consume_events(
            repository.subscribe(),
            Arc::clone(&loading),
            Arc::clone(&error),
        ));

        Self {
            repository,
            store,
            current_user: config.current_user.clone(),
            load_more_delay: config.load_more_delay,
            loading,
            has_more,
            error,
            notice,
        }
    }

    /// Observe the ordered post list.
    pub fn watch_posts(&self) -> watch::Receiver<Vec<Post>> {
        self.store.watch_feed()
    }

    /// The current ordered post list.
    pub fn posts(&self) -> Vec<Post> {
        self.store.all()
    }

    /// Observe the loading flag.
    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Whether a load or load-more is in flight.
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Observe the has-more flag.
    pub fn watch_has_more(&self) -> watch::Receiver<bool> {
        self.has_more.subscribe()
    }

    /// Whether the load-more flow may still find further posts.
    pub fn has_more(&self) -> bool {
        *self.has_more.borrow()
    }

    /// Observe the user-facing error message.
    pub fn watch_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// The current user-facing error message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Observe the user-facing notice.
    pub fn watch_notice(&self) -> watch::Receiver<Option<String>> {
        self.notice.subscribe()
    }

    /// The current user-facing notice, if any.
    pub fn notice(&self) -> Option<String> {
        self.notice.borrow().clone()
    }

    /// Dismiss the current error message.
    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    /// Dismiss the current notice.
    pub fn clear_notice(&self) {
        self.notice.send_replace(None);
    }

    /// Load the feed from the backend.
    pub fn load_posts(&self) {
        self.error.send_replace(None);
        self.loading.send_replace(true);
        self.repository.refresh();
    }

    /// Pull-to-refresh: reload and allow load-more again.
    pub fn refresh(&self) {
        self.has_more.send_replace(true);
        self.load_posts();
    }

    /// Overwrite local state with the backend list.
    pub fn resync(&self) {
        self.error.send_replace(None);
        self.loading.send_replace(true);
        self.repository.resync();
    }

    /// Toggle the liked flag on a post.
    pub fn like(&self, post_id: &str) {
        self.repository.like(post_id);
    }

    /// Comment on a post as the configured current user.
    pub fn comment(&self, post_id: &str, content: &str) {
        self.repository.comment(post_id, content);
    }

    /// Share a post.
    pub fn share(&self, post_id: &str) {
        self.repository.share(post_id);
    }

    /// Toggle the saved flag on a post.
    pub fn toggle_save(&self, post_id: &str) {
        self.repository.toggle_save(post_id);
    }

    /// Toggle following a post's author.
    pub fn toggle_follow(&self, post_id: &str) {
        self.repository.toggle_follow(post_id);
    }

    /// Validate a draft and publish it as the configured current user.
    ///
    /// Returns the id of the new post. The post appears in the feed
    /// immediately; the notice reports the hand-off, not backend
    /// confirmation.
    pub fn publish(&self, draft: &PostDraft) -> Result<String, DraftError> {
        draft.validate()?;
        let post = Post::from_draft(draft, &self.current_user);
        let post_id = post.id.clone();
        self.repository.publish(post);
        self.notice.send_replace(Some(PUBLISH_SUCCESS.to_string()));
        Ok(post_id)
    }

    /// Ask for the next page.
    ///
    /// The backend serves a single page, so after a simulated delay the
    /// has-more flag drops and the no-more-data notice is posted. Does
    /// nothing while a load is in flight or when the feed is exhausted.
    pub fn load_more(&self) {
        if *self.loading.borrow() || !*self.has_more.borrow() {
            return;
        }
        self.loading.send_replace(true);

        let loading = Arc::clone(&self.loading);
        let has_more = Arc::clone(&self.has_more);
        let notice = Arc::clone(&self.notice);
        let delay = self.load_more_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            loading.send_replace(false);
            has_more.send_replace(false);
            notice.send_replace(Some(NO_MORE_DATA.to_string()));
        });
    }
}

/// Fold repository events into the loading flag and error message.
async fn consume_events(
    mut events: broadcast::Receiver<FeedEvent>,
    loading: Arc<watch::Sender<bool>>,
    error: Arc<watch::Sender<Option<String>>>,
) {
    loop {
        match events.recv().await {
            Ok(FeedEvent::Refreshed { count }) => {
                debug!("Feed refreshed with {} posts", count);
                loading.send_replace(false);
            }
            Ok(FeedEvent::ActionFailed { action, message }) => {
                warn!("Action {} failed: {}", action, message);
                if matches!(action, FeedAction::Refresh | FeedAction::Resync) {
                    loading.send_replace(false);
                }
                error.send_replace(Some(format!("{}{}", action.failure_prefix(), message)));
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Feed event consumer lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!("Feed event consumer stopped");
}

/// Observable state for a single post's detail screen.
///
/// Tracks one row of the store plus the comments posted to it during
/// this session. A post id the store does not know yields `None`.
pub struct PostDetailViewModel {
    repository: Arc<FeedRepository>,
    post_id: String,
    post: Arc<watch::Sender<Option<Post>>>,
    comments: Arc<watch::Sender<Vec<Comment>>>,
}

impl PostDetailViewModel {
    /// Create the view-model and start tracking the given post.
    pub fn new(repository: Arc<FeedRepository>, post_id: &str) -> Self {
        let store = repository.store();
        let (post, _) = watch::channel(store.get(post_id));
        let (comments, _) = watch::channel(Vec::new());
        let post = Arc::new(post);
        let comments = Arc::new(comments);

        tokio::spawn(track_post(
            post_id.to_string(),
            store.watch_feed(),
            repository.subscribe(),
            Arc::clone(&post),
            Arc::clone(&comments),
        ));

        Self {
            repository,
            post_id: post_id.to_string(),
            post,
            comments,
        }
    }

    /// The id of the tracked post.
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Observe the tracked post.
    pub fn watch_post(&self) -> watch::Receiver<Option<Post>> {
        self.post.subscribe()
    }

    /// The tracked post, if the store knows it.
    pub fn post(&self) -> Option<Post> {
        self.post.borrow().clone()
    }

    /// Observe the comments posted this session.
    pub fn watch_comments(&self) -> watch::Receiver<Vec<Comment>> {
        self.comments.subscribe()
    }

    /// The comments posted this session.
    pub fn comments(&self) -> Vec<Comment> {
        self.comments.borrow().clone()
    }

    /// Bring the tracked post up to date from the backend.
    pub fn load(&self) {
        self.repository.refresh_post(&self.post_id);
    }

    /// Toggle the liked flag on the tracked post.
    pub fn like(&self) {
        self.repository.like(&self.post_id);
    }

    /// Comment on the tracked post.
    pub fn comment(&self, content: &str) {
        self.repository.comment(&self.post_id, content);
    }

    /// Share the tracked post.
    pub fn share(&self) {
        self.repository.share(&self.post_id);
    }

    /// Toggle the saved flag on the tracked post.
    pub fn toggle_save(&self) {
        self.repository.toggle_save(&self.post_id);
    }

    /// Toggle following the tracked post's author.
    pub fn toggle_follow(&self) {
        self.repository.toggle_follow(&self.post_id);
    }
}

/// Mirror one store row and collect its comments.
async fn track_post(
    post_id: String,
    mut feed: watch::Receiver<Vec<Post>>,
    mut events: broadcast::Receiver<FeedEvent>,
    post: Arc<watch::Sender<Option<Post>>>,
    comments: Arc<watch::Sender<Vec<Comment>>>,
) {
    loop {
        tokio::select! {
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                let row = feed
                    .borrow_and_update()
                    .iter()
                    .find(|p| p.id == post_id)
                    .cloned();
                post.send_replace(row);
            }
            event = events.recv() => match event {
                Ok(FeedEvent::CommentPosted(comment)) if comment.post_id == post_id => {
                    comments.send_modify(|list| list.push(comment));
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Detail event consumer lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
    debug!("Detail tracker for {} stopped", post_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockRemoteFeed, RemoteOp};
    use crate::error::ApiError;
    use crate::sample;
    use crate::traits::RemoteFeed;

    fn test_config() -> Config {
        Config::default().with_load_more_delay(Duration::from_millis(10))
    }

    fn setup(posts: Vec<Post>) -> (FeedViewModel, Arc<MockRemoteFeed>, Arc<FeedRepository>) {
        let store = Arc::new(PostStore::in_memory());
        store.upsert_many(posts.clone()).expect("seed store");
        let remote = Arc::new(MockRemoteFeed::with_posts(posts));
        let config = test_config();
        let repository = Arc::new(FeedRepository::spawn(
            store,
            Arc::clone(&remote) as Arc<dyn RemoteFeed>,
            &config,
        ));
        let vm = FeedViewModel::new(Arc::clone(&repository), &config);
        (vm, remote, repository)
    }

    async fn wait_until(mut check: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !check() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for condition");
    }

    #[tokio::test]
    async fn test_load_posts_sets_and_clears_loading() {
        let (vm, _remote, _repo) = setup(sample::sample_posts(3));

        vm.load_posts();
        assert!(vm.is_loading());

        wait_until(|| !vm.is_loading()).await;
        assert_eq!(vm.posts().len(), 3);
        assert_eq!(vm.error_message(), None);
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_prefixed_message() {
        let (vm, remote, _repo) = setup(sample::sample_posts(2));
        remote.set_failure(
            RemoteOp::FetchPosts,
            ApiError::Connection {
                url: "https://api.example.com/posts".to_string(),
                message: "refused".to_string(),
            },
        );

        vm.load_posts();
        wait_until(|| vm.error_message().is_some()).await;

        assert_eq!(
            vm.error_message().as_deref(),
            Some("获取帖子失败：网络连接失败，请检查网络设置")
        );
        assert!(!vm.is_loading());
        // The cached feed is still served
        assert_eq!(vm.posts().len(), 2);

        vm.clear_error();
        assert_eq!(vm.error_message(), None);
    }

    #[tokio::test]
    async fn test_like_failure_surfaces_prefixed_message() {
        let (vm, remote, _repo) = setup(sample::sample_posts(1));
        remote.set_failure(
            RemoteOp::Like,
            ApiError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            },
        );

        vm.like("post_0");
        wait_until(|| vm.error_message().is_some()).await;

        assert_eq!(
            vm.error_message().as_deref(),
            Some("点赞失败：服务器错误，请稍后重试")
        );
        // A failed like never drives the feed loading flag
        assert!(!vm.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_exhausts_feed_after_delay() {
        let (vm, _remote, _repo) = setup(sample::sample_posts(2));
        assert!(vm.has_more());

        vm.load_more();
        assert!(vm.is_loading());

        wait_until(|| !vm.has_more()).await;
        assert!(!vm.is_loading());
        assert_eq!(vm.notice().as_deref(), Some(NO_MORE_DATA));
    }

    #[tokio::test]
    async fn test_load_more_is_guarded_when_exhausted() {
        let (vm, _remote, _repo) = setup(sample::sample_posts(2));

        vm.load_more();
        wait_until(|| !vm.has_more()).await;
        vm.clear_notice();

        vm.load_more();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(!vm.is_loading());
        assert_eq!(vm.notice(), None);
    }

    #[tokio::test]
    async fn test_refresh_resets_has_more() {
        let (vm, _remote, _repo) = setup(sample::sample_posts(2));

        vm.load_more();
        wait_until(|| !vm.has_more()).await;

        vm.refresh();
        assert!(vm.has_more());
        wait_until(|| !vm.is_loading()).await;
    }

    #[tokio::test]
    async fn test_publish_validates_draft() {
        let (vm, _remote, _repo) = setup(Vec::new());

        let err = vm
            .publish(&PostDraft::new("   "))
            .expect_err("blank draft must be rejected");
        assert_eq!(err, DraftError::EmptyContent);
        assert_eq!(err.to_string(), "请输入正文内容");
        assert_eq!(vm.notice(), None);
    }

    #[tokio::test]
    async fn test_publish_inserts_post_and_notices() {
        let (vm, _remote, _repo) = setup(sample::sample_posts(2));

        let post_id = vm
            .publish(&PostDraft::new("今天的天气真好"))
            .expect("valid draft must publish");

        assert!(post_id.starts_with("post_"));
        assert_eq!(vm.notice().as_deref(), Some(PUBLISH_SUCCESS));
        wait_until(|| vm.posts().first().map(|p| p.id.clone()) == Some(post_id.clone())).await;

        let published = &vm.posts()[0];
        assert_eq!(published.content, "今天的天气真好");
        assert_eq!(published.user_id, "user_current");
    }

    #[tokio::test]
    async fn test_detail_tracks_store_row() {
        let (vm, _remote, repo) = setup(sample::sample_posts(3));
        let detail = PostDetailViewModel::new(Arc::clone(&repo), "post_1");

        let before = detail.post().expect("tracked post must exist");
        assert!(!before.is_liked);

        detail.like();
        wait_until(|| detail.post().map(|p| p.is_liked).unwrap_or(false)).await;
        assert_eq!(
            detail.post().expect("tracked post").likes,
            before.likes + 1
        );

        // The feed view sees the same row
        let feed_row = vm
            .posts()
            .into_iter()
            .find(|p| p.id == "post_1")
            .expect("row in feed");
        assert!(feed_row.is_liked);
    }

    #[tokio::test]
    async fn test_detail_collects_session_comments() {
        let (_vm, remote, repo) = setup(sample::sample_posts(1));
        let detail = PostDetailViewModel::new(Arc::clone(&repo), "post_0");
        assert!(detail.comments().is_empty());

        detail.comment("非常有意思");
        wait_until(|| detail.comments().len() == 1).await;

        let comment = &detail.comments()[0];
        assert_eq!(comment.post_id, "post_0");
        assert_eq!(comment.content, "非常有意思");
        assert_eq!(comment.user_id, "user_current");
        wait_until(|| remote.call_count(RemoteOp::Comment) == 1).await;
    }

    #[tokio::test]
    async fn test_detail_load_pulls_backend_row() {
        let (_vm, remote, repo) = setup(sample::sample_posts(2));
        // The backend has moved on since the local copy was stored
        let mut newer = remote.posts().remove(1);
        newer.likes = 9999;
        remote.set_posts(vec![newer]);

        let detail = PostDetailViewModel::new(repo, "post_1");
        detail.load();

        wait_until(|| detail.post().map(|p| p.likes == 9999).unwrap_or(false)).await;
        assert_eq!(remote.call_count(RemoteOp::FetchPost), 1);
    }

    #[tokio::test]
    async fn test_detail_for_unknown_post_is_none() {
        let (_vm, _remote, repo) = setup(sample::sample_posts(1));
        let detail = PostDetailViewModel::new(repo, "missing");

        assert!(detail.post().is_none());
    }
}

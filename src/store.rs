//! Reactive local post store.
//!
//! `PostStore` is the single local table of posts, keyed by id. Reads
//! are ordered by creation time descending. Every mutation publishes
//! the new ordering on a watch channel, so observers see each change
//! without polling, and rewrites the JSON file when the store is
//! persistent.
//!
//! There is no migration strategy: a file that cannot be read or parsed
//! is discarded with a warning and the store starts empty.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::Post;
use crate::sample;

/// Reactive table of posts keyed by id.
pub struct PostStore {
    /// Post rows keyed by id
    posts: RwLock<HashMap<String, Post>>,
    /// Where rows persist; `None` keeps the store in memory
    path: Option<PathBuf>,
    /// Publishes the ordered list after every mutation
    feed_tx: watch::Sender<Vec<Post>>,
}

impl PostStore {
    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_rows(Vec::new(), None)
    }

    /// Create an in-memory store populated with the sample feed.
    pub fn with_sample_data() -> Self {
        Self::from_rows(sample::sample_posts(sample::SAMPLE_POST_COUNT), None)
    }

    /// Open a persistent store backed by the given file.
    ///
    /// A missing file starts empty. An unreadable or unparsable file is
    /// discarded; the next mutation rewrites it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let rows = Self::load_rows(&path);
        debug!("Opened post store at {:?} with {} posts", path, rows.len());
        Self::from_rows(rows, Some(path))
    }

    fn from_rows(rows: Vec<Post>, path: Option<PathBuf>) -> Self {
        let mut posts = HashMap::new();
        for post in rows {
            posts.insert(post.id.clone(), post);
        }
        let (feed_tx, _) = watch::channel(Self::order(&posts));
        Self {
            posts: RwLock::new(posts),
            path,
            feed_tx,
        }
    }

    fn load_rows(path: &Path) -> Vec<Post> {
        if !path.exists() {
            return Vec::new();
        }
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to read post store at {:?}: {}", path, e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Discarding unparsable post store at {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    /// Sort rows by creation time descending; ties break by id so reads
    /// are fully deterministic.
    fn order(posts: &HashMap<String, Post>) -> Vec<Post> {
        let mut list: Vec<Post> = posts.values().cloned().collect();
        list.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }

    /// All posts, newest first.
    pub fn all(&self) -> Vec<Post> {
        Self::order(&self.posts.read().unwrap())
    }

    /// A single post by id.
    pub fn get(&self, id: &str) -> Option<Post> {
        self.posts.read().unwrap().get(id).cloned()
    }

    /// Number of posts in the store.
    pub fn len(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Whether the store holds no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.read().unwrap().is_empty()
    }

    /// Subscribe to the ordered post list.
    ///
    /// `borrow()` is the current snapshot; `changed().await` resolves
    /// after every mutation.
    pub fn watch_feed(&self) -> watch::Receiver<Vec<Post>> {
        self.feed_tx.subscribe()
    }

    /// Insert a post, replacing any row with the same id.
    pub fn upsert(&self, post: Post) -> Result<(), StoreError> {
        let ordered = {
            let mut posts = self.posts.write().unwrap();
            posts.insert(post.id.clone(), post);
            Self::order(&posts)
        };
        self.commit(ordered)
    }

    /// Insert a batch of posts, replacing rows with matching ids.
    /// Rows absent from the batch are kept.
    pub fn upsert_many(&self, batch: Vec<Post>) -> Result<(), StoreError> {
        let ordered = {
            let mut posts = self.posts.write().unwrap();
            for post in batch {
                posts.insert(post.id.clone(), post);
            }
            Self::order(&posts)
        };
        self.commit(ordered)
    }

    /// Replace the whole table with the given rows.
    ///
    /// This is the authoritative overwrite used by re-sync; rows absent
    /// from the batch are dropped.
    pub fn replace_all(&self, batch: Vec<Post>) -> Result<(), StoreError> {
        let ordered = {
            let mut posts = self.posts.write().unwrap();
            posts.clear();
            for post in batch {
                posts.insert(post.id.clone(), post);
            }
            Self::order(&posts)
        };
        self.commit(ordered)
    }

    /// Delete a post by id. Returns whether a row was removed.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let (removed, ordered) = {
            let mut posts = self.posts.write().unwrap();
            let removed = posts.remove(id).is_some();
            (removed, Self::order(&posts))
        };
        if removed {
            self.commit(ordered)?;
        }
        Ok(removed)
    }

    /// Delete every post.
    pub fn clear(&self) -> Result<(), StoreError> {
        {
            let mut posts = self.posts.write().unwrap();
            posts.clear();
        }
        self.commit(Vec::new())
    }

    /// Persist the ordering, then publish it. Observers always see the
    /// in-memory truth even when the write to disk fails.
    fn commit(&self, ordered: Vec<Post>) -> Result<(), StoreError> {
        let persisted = self.persist(&ordered);
        self.feed_tx.send_replace(ordered);
        persisted
    }

    fn persist(&self, ordered: &[Post]) -> Result<(), StoreError> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(ordered)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile as served by the backend.
///
/// Posts embed these fields as a flat denormalized snapshot; this struct
/// exists so callers can work with an author as one value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Avatar image URL
    pub avatar: String,
    /// Short profile text
    #[serde(default)]
    pub bio: String,
    /// Number of accounts following this user
    #[serde(default)]
    pub followers: u32,
    /// Number of accounts this user follows
    #[serde(default)]
    pub following: u32,
}

/// A feed post.
///
/// The author is stored flat on the row (denormalized snapshot) rather
/// than referenced, matching the wire format and the local table layout.
/// Counters are unsigned so they can never go negative; the flag/counter
/// pairs are only ever moved through the toggle methods below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier
    pub id: String,
    /// Author's user id
    pub user_id: String,
    /// Author's display name
    pub name: String,
    /// Author's avatar URL
    pub avatar: String,
    /// Author's profile text
    #[serde(default)]
    pub bio: String,
    /// Author's follower count at snapshot time
    #[serde(default)]
    pub followers: u32,
    /// Author's following count at snapshot time
    #[serde(default)]
    pub following: u32,
    /// Post body text
    pub content: String,
    /// Ordered image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Like counter
    #[serde(default)]
    pub likes: u32,
    /// Comment counter
    #[serde(default)]
    pub comments: u32,
    /// Share counter
    #[serde(default)]
    pub shares: u32,
    /// Save counter. Older payloads omit this field.
    #[serde(default)]
    pub saves: u32,
    /// Whether the current user has liked this post
    #[serde(default)]
    pub is_liked: bool,
    /// Whether the current user follows the author
    #[serde(default)]
    pub is_following: bool,
    /// Whether the current user has saved this post
    #[serde(default)]
    pub is_saved: bool,
    /// When the post was created
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a post with zeroed counters and cleared flags.
    pub fn new(
        id: impl Into<String>,
        author: &User,
        content: impl Into<String>,
        images: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: author.id.clone(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            bio: author.bio.clone(),
            followers: author.followers,
            following: author.following,
            content: content.into(),
            images,
            likes: 0,
            comments: 0,
            shares: 0,
            saves: 0,
            is_liked: false,
            is_following: false,
            is_saved: false,
            created_at,
        }
    }

    /// Build a publishable post from a validated draft, authored by
    /// `author` with a fresh id and the current time.
    pub fn from_draft(draft: &PostDraft, author: &User) -> Self {
        Self::new(
            format!("post_{}", Uuid::new_v4()),
            author,
            draft.content.clone(),
            draft.images.clone(),
            Utc::now(),
        )
    }

    /// Rebuild the author snapshot embedded in this post.
    pub fn author(&self) -> User {
        User {
            id: self.user_id.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            followers: self.followers,
            following: self.following,
        }
    }

    /// Flip the liked flag and move the like counter with it.
    ///
    /// The counter saturates at zero, so a post whose flag and counter
    /// have drifted apart can never underflow.
    pub fn toggle_liked(&mut self) {
        if self.is_liked {
            self.is_liked = false;
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.is_liked = true;
            self.likes = self.likes.saturating_add(1);
        }
    }

    /// Flip the saved flag and move the save counter with it.
    pub fn toggle_saved(&mut self) {
        if self.is_saved {
            self.is_saved = false;
            self.saves = self.saves.saturating_sub(1);
        } else {
            self.is_saved = true;
            self.saves = self.saves.saturating_add(1);
        }
    }

    /// Flip the following flag for the post's author.
    ///
    /// The follower count shown on the post is the author's snapshot, so
    /// it moves in lockstep with the flag.
    pub fn toggle_followed(&mut self) {
        if self.is_following {
            self.is_following = false;
            self.followers = self.followers.saturating_sub(1);
        } else {
            self.is_following = true;
            self.followers = self.followers.saturating_add(1);
        }
    }

    /// Count one new comment on this post.
    pub fn record_comment(&mut self) {
        self.comments = self.comments.saturating_add(1);
    }

    /// Count one new share of this post.
    pub fn record_share(&mut self) {
        self.shares = self.shares.saturating_add(1);
    }
}

/// A comment on a post. Comments are flat, there is no threading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier
    pub id: String,
    /// Id of the post this comment belongs to
    pub post_id: String,
    /// Author's user id
    pub user_id: String,
    /// Author's display name
    pub name: String,
    /// Author's avatar URL
    pub avatar: String,
    /// Comment body text
    pub content: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a comment by `author` on the given post, with a fresh id
    /// and the current time.
    pub fn new(post_id: impl Into<String>, author: &User, content: impl Into<String>) -> Self {
        Self {
            id: format!("comment_{}", Uuid::new_v4()),
            post_id: post_id.into(),
            user_id: author.id.clone(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Compose-screen input for a new post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    /// Post body text
    pub content: String,
    /// Image URLs to attach
    pub images: Vec<String>,
}

impl PostDraft {
    /// Create a draft with body text and no images.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            images: Vec::new(),
        }
    }

    /// Check that the draft can be published.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.content.trim().is_empty() {
            return Err(DraftError::EmptyContent);
        }
        Ok(())
    }
}

/// Why a draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    /// The body text is empty or whitespace
    EmptyContent,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::EmptyContent => write!(f, "请输入正文内容"),
        }
    }
}

impl std::error::Error for DraftError {}

//! Deterministic sample data for development and demos.
//!
//! The generators produce the same entities on every call so list
//! ordering and counter assertions stay stable across runs.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Comment, Post, User};

/// How many posts the default sample feed contains.
pub const SAMPLE_POST_COUNT: usize = 10;

/// Fixed timestamp the sample feed counts down from.
fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 4, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The fixed profile used as the author for compose and comment actions.
pub fn current_user() -> User {
    User {
        id: "user_current".to_string(),
        name: "当前用户".to_string(),
        avatar: "https://picsum.photos/id/1005/100/100".to_string(),
        bio: "当前用户的简介".to_string(),
        followers: 100,
        following: 50,
    }
}

/// The sample author with the given index.
pub fn sample_user(index: usize) -> User {
    User {
        id: format!("user_{}", index),
        name: format!("用户{}", index),
        avatar: format!("https://picsum.photos/id/{}/100/100", index + 1),
        bio: format!("这是用户{}的简介", index),
        followers: 100 + index as u32,
        following: 50 + index as u32,
    }
}

/// Generate `count` sample posts, newest first.
///
/// Post `i` is authored by user `i`, carries one image whose height
/// alternates between 800 and 1200 for layout testing, and is created
/// one minute earlier than post `i - 1`. Every third post starts liked.
pub fn sample_posts(count: usize) -> Vec<Post> {
    let base = base_time();
    (0..count)
        .map(|i| {
            let image = if i % 2 == 0 {
                format!("https://picsum.photos/id/{}/600/800", i + 1)
            } else {
                format!("https://picsum.photos/id/{}/600/1200", i + 1)
            };

            let mut post = Post::new(
                format!("post_{}", i),
                &sample_user(i),
                format!(
                    "这是第{}条帖子的内容，用于测试瀑布流布局和下拉刷新功能。内容长度适中，确保能够在UI上正常显示。",
                    i
                ),
                vec![image],
                base - Duration::minutes(i as i64),
            );
            post.likes = 1000 + i as u32;
            post.comments = 500 + i as u32;
            post.shares = 100 + i as u32;
            post.is_liked = i % 3 == 0;
            post
        })
        .collect()
}

/// Generate `count` sample comments on the given post, newest first.
pub fn sample_comments(post_id: &str, count: usize) -> Vec<Comment> {
    let base = base_time();
    (0..count)
        .map(|i| {
            let author = sample_user(i);
            Comment {
                id: format!("comment_{}", i),
                post_id: post_id.to_string(),
                user_id: author.id,
                name: author.name,
                avatar: author.avatar,
                content: format!("这是第{}条评论", i),
                created_at: base - Duration::minutes(i as i64),
            }
        })
        .collect()
}

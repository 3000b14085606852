// Social API trait: the read and write operations the pipeline needs.

use async_trait::async_trait;

use super::models::Post;
use crate::error::Result;

/// Read/write access to one account's timeline.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Fetch up to `count` posts from `account`'s timeline, newest first,
    /// no newer than `max_id` when given.
    async fn user_timeline(
        &self,
        account: &str,
        count: usize,
        max_id: Option<u64>,
    ) -> Result<Vec<Post>>;

    /// Repost the post with the given id.
    async fn retweet(&self, id: u64) -> Result<()>;

    /// Publish a new post.
    async fn update_status(&self, text: &str) -> Result<()>;
}

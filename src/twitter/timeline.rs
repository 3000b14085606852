// Paginated timeline cursor and eligibility filtering.
//
// Walks an account's history newest-first using max_id paging: each page
// asks for posts no newer than one below the oldest id already seen.

use std::collections::VecDeque;

use tracing::debug;

use super::client::MAX_PAGE_SIZE;
use super::models::Post;
use super::traits::SocialApi;
use crate::error::Result;

/// Leading marker of a repost.
pub const REPOST_MARKER: &str = "RT";
/// Leading marker of a reply.
pub const REPLY_MARKER: char = '@';

/// Whether a post is an original post worth examining: its text starts
/// with neither the repost marker nor the reply marker.
pub fn is_eligible(post: &Post) -> bool {
    !post.text.starts_with(REPOST_MARKER) && !post.text.starts_with(REPLY_MARKER)
}

/// Yields at most `limit` posts from an account's timeline, fetching pages
/// lazily as it is consumed.
pub struct TimelineCursor<'a> {
    api: &'a dyn SocialApi,
    account: String,
    remaining: usize,
    max_id: Option<u64>,
    buffer: VecDeque<Post>,
    exhausted: bool,
}

impl<'a> TimelineCursor<'a> {
    pub fn new(api: &'a dyn SocialApi, account: &str, limit: usize) -> Self {
        Self {
            api,
            account: account.to_string(),
            remaining: limit,
            max_id: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Next post, newest first. `Ok(None)` once `limit` posts were yielded
    /// or the timeline has no more pages.
    pub async fn next(&mut self) -> Result<Option<Post>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }

        match self.buffer.pop_front() {
            Some(post) => {
                self.remaining -= 1;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let page_size = self.remaining.min(MAX_PAGE_SIZE);
        let page = self
            .api
            .user_timeline(&self.account, page_size, self.max_id)
            .await?;

        debug!(
            page_posts = page.len(),
            max_id = ?self.max_id,
            "Fetched timeline page for @{}",
            self.account
        );

        match page.iter().map(|p| p.id).min() {
            Some(oldest) if oldest > 0 => self.max_id = Some(oldest - 1),
            _ => self.exhausted = true,
        }
        self.buffer.extend(page);
        Ok(())
    }
}

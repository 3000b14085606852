// Post model and the v1.1 tweet JSON it is decoded from.

use serde::Deserialize;

/// A simplified post: just the fields the annotation pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: u64,
    /// Screen name of the author
    pub author: String,
    pub text: String,
    /// Whether the authenticated account has already reposted this post
    pub retweeted: bool,
    /// Set when the post is a reply to another post
    pub in_reply_to_status_id: Option<u64>,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_status_id.is_some()
    }
}

/// Canonical web URL for a post on the given account.
pub fn status_url(account: &str, id: u64) -> String {
    format!("https://twitter.com/{account}/status/{id}")
}

// -- Serde types for statuses/user_timeline --

#[derive(Debug, Deserialize)]
pub struct TweetUser {
    pub screen_name: String,
}

/// A tweet as returned by the v1.1 REST API. Extended mode returns
/// `full_text` instead of `text`.
#[derive(Debug, Deserialize)]
pub struct Tweet {
    pub id: u64,
    #[serde(alias = "full_text")]
    pub text: String,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub in_reply_to_status_id: Option<u64>,
    pub user: TweetUser,
}

impl From<Tweet> for Post {
    fn from(tweet: Tweet) -> Self {
        Post {
            id: tweet.id,
            author: tweet.user.screen_name,
            text: tweet.text,
            retweeted: tweet.retweeted,
            in_reply_to_status_id: tweet.in_reply_to_status_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_extended_tweet() {
        let json = r#"{
            "id": 1234567890,
            "id_str": "1234567890",
            "full_text": "Hello world",
            "retweeted": false,
            "in_reply_to_status_id": null,
            "user": {"screen_name": "someone", "id": 42}
        }"#;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        let post = Post::from(tweet);
        assert_eq!(post.id, 1234567890);
        assert_eq!(post.text, "Hello world");
        assert_eq!(post.author, "someone");
        assert!(!post.retweeted);
        assert!(!post.is_reply());
    }

    #[test]
    fn deserialize_reply_with_short_text() {
        let json = r#"{"id": 7, "text": "@x thanks", "retweeted": true,
                       "in_reply_to_status_id": 6, "user": {"screen_name": "a"}}"#;
        let post = Post::from(serde_json::from_str::<Tweet>(json).unwrap());
        assert!(post.retweeted);
        assert!(post.is_reply());
    }

    #[test]
    fn status_url_format() {
        assert_eq!(
            status_url("realDonaldTrump", 99),
            "https://twitter.com/realDonaldTrump/status/99"
        );
    }
}

// Twitter v1.1 REST client: OAuth-signed requests over reqwest.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{Post, Tweet};
use super::oauth::OAuthSigner;
use super::traits::SocialApi;
use crate::config::TwitterCredentials;
use crate::error::{Error, Result};

/// Default REST API root.
pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com/1.1";

/// Largest page the user_timeline endpoint returns.
pub const MAX_PAGE_SIZE: usize = 200;

/// Authenticated client for the Twitter v1.1 REST API.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    signer: OAuthSigner,
}

impl TwitterClient {
    /// Create a new client pointing at the given API root.
    pub fn new(base_url: &str, credentials: TwitterCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tonecheck/0.1 (sentiment-annotator)")
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: OAuthSigner::new(credentials),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Signed GET, deserializing the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        let auth = self.signer.authorization_header("GET", &url, params)?;

        debug!(path = path, "Twitter GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| Error::ExternalApi(format!("GET {path} failed: {e}")))?;

        let response = check_status(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::ExternalApi(format!("Failed to deserialize {path} response: {e}")))
    }

    /// Signed form POST. The response body is not needed.
    async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<()> {
        let url = self.url(path);
        let auth = self.signer.authorization_header("POST", &url, params)?;

        debug!(path = path, "Twitter POST request");

        let response = self
            .client
            .post(&url)
            .form(params)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| Error::ExternalApi(format!("POST {path} failed: {e}")))?;

        check_status(path, response).await?;
        Ok(())
    }
}

async fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::ExternalApi(format!("{path} returned {status}: {body}")))
}

#[async_trait]
impl SocialApi for TwitterClient {
    async fn user_timeline(
        &self,
        account: &str,
        count: usize,
        max_id: Option<u64>,
    ) -> Result<Vec<Post>> {
        let count = count.clamp(1, MAX_PAGE_SIZE).to_string();
        let max_id = max_id.map(|id| id.to_string());

        let mut params: Vec<(&str, &str)> = vec![
            ("count", &count),
            ("screen_name", account),
            ("tweet_mode", "extended"),
        ];
        if let Some(ref id) = max_id {
            params.push(("max_id", id));
        }

        let tweets: Vec<Tweet> = self.get("statuses/user_timeline.json", &params).await?;
        Ok(tweets.into_iter().map(Post::from).collect())
    }

    async fn retweet(&self, id: u64) -> Result<()> {
        self.post(&format!("statuses/retweet/{id}.json"), &[]).await
    }

    async fn update_status(&self, text: &str) -> Result<()> {
        self.post("statuses/update.json", &[("status", text)]).await
    }
}

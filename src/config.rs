use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Account whose timeline is annotated when TONECHECK_TARGET_ACCOUNT is unset.
pub const DEFAULT_TARGET_ACCOUNT: &str = "realDonaldTrump";

/// Where the exported TF-IDF vectorizer lives by default.
pub const DEFAULT_VECTORIZER_PATH: &str = "/tmp/tfidf.json";

/// Twitter OAuth 1.0a user-context credentials.
#[derive(Clone)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Central configuration loaded from environment variables.
///
/// Built once at process start and passed by reference into the
/// pipeline. The .env file is loaded by `main` via dotenvy before this
/// is constructed.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: TwitterCredentials,
    /// Screen name whose timeline is examined and linked in annotations
    pub target_account: String,
    /// SageMaker endpoint name for the sentiment classifier
    pub endpoint_name: String,
    /// Path to the exported TF-IDF vectorizer (JSON)
    pub vectorizer_path: PathBuf,
    /// Directory holding the WordNet corpus used for lemmatization
    pub corpus_dir: PathBuf,
    /// Base URL of the Twitter REST API (v1.1)
    pub twitter_api_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The four Twitter credentials are required; everything else has a
    /// default.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::Config(format!(
                    "{key} not set. Add it to your environment or .env file."
                ))),
            }
        };

        let credentials = TwitterCredentials {
            consumer_key: required("TW_CONSUMER_KEY")?,
            consumer_secret: required("TW_CONSUMER_SECRET")?,
            access_token: required("TW_ACCESS_TOKEN")?,
            access_token_secret: required("TW_ACCESS_TOKEN_SECRET")?,
        };

        Ok(Self {
            credentials,
            target_account: lookup("TONECHECK_TARGET_ACCOUNT")
                .unwrap_or_else(|| DEFAULT_TARGET_ACCOUNT.to_string()),
            endpoint_name: lookup("TONECHECK_ENDPOINT").unwrap_or_default(),
            vectorizer_path: lookup("TONECHECK_VECTORIZER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VECTORIZER_PATH)),
            corpus_dir: lookup("TONECHECK_CORPUS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./")),
            twitter_api_url: lookup("TWITTER_API_URL").unwrap_or_else(|| {
                crate::twitter::client::DEFAULT_TWITTER_API_URL.to_string()
            }),
        })
    }

    /// Check that the inference endpoint is configured.
    /// Call this before any run that will invoke the classifier.
    pub fn require_endpoint(&self) -> Result<()> {
        if self.endpoint_name.trim().is_empty() {
            return Err(Error::Config(
                "TONECHECK_ENDPOINT not set. Set it to the SageMaker endpoint name.".to_string(),
            ));
        }
        Ok(())
    }
}

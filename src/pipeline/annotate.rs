// Annotation pipeline: fetch -> filter -> per-post classify -> repost/annotate.
//
// Each eligible post goes through its own pipeline run. A failure in one
// post (artifact load, vectorization, inference, parsing, or the repost and
// annotate calls) is logged and the loop moves on to the next post. Only a
// failure to fetch the timeline itself ends the run with an error.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::inference::{parse_prediction, InferenceClient, Prediction, Sentiment};
use crate::text::{preprocess, Lemmatizer};
use crate::twitter::models::status_url;
use crate::twitter::timeline::{is_eligible, TimelineCursor};
use crate::twitter::{Post, SocialApi};
use crate::vectorizer::{load_vectorizer, VectorizerModel};

/// Which text is sent through the vectorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorizeInput {
    /// The post's untouched text
    #[default]
    Raw,
    /// The cleaned, lemmatized tokens joined by spaces
    Preprocessed,
}

/// Behavior switches for a run.
#[derive(Debug, Clone, Default)]
pub struct AnnotateOptions {
    pub vectorize_input: VectorizeInput,
    /// Log the repost and annotation instead of sending them
    pub dry_run: bool,
    /// Load the vectorizer once per run instead of once per post
    pub cache_vectorizer: bool,
}

/// What happened to a single eligible post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// Already reposted; nothing was sent
    AlreadyReposted,
    /// Reposted and annotated with the predicted sentiment
    Annotated(Sentiment),
    /// Reposted, but the label has no annotation text
    RepostedOnly(Prediction),
}

/// Per-run tallies, reported in the log only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Posts pulled from the timeline
    pub examined: usize,
    /// Posts dropped as reposts or replies
    pub filtered: usize,
    /// Eligible posts that were already reposted
    pub skipped: usize,
    pub annotated: usize,
    pub reposted_only: usize,
    pub failed: usize,
}

/// Annotation message for a classified post.
pub fn annotation_text(sentiment: Sentiment, url: &str) -> String {
    format!("This is a {} tweet\n{}", sentiment.as_str(), url)
}

/// Drives the pipeline for one account.
pub struct Annotator<'a> {
    api: &'a dyn SocialApi,
    inference: &'a dyn InferenceClient,
    lemmatizer: &'a Lemmatizer,
    config: &'a Config,
    options: AnnotateOptions,
}

impl<'a> Annotator<'a> {
    pub fn new(
        api: &'a dyn SocialApi,
        inference: &'a dyn InferenceClient,
        lemmatizer: &'a Lemmatizer,
        config: &'a Config,
        options: AnnotateOptions,
    ) -> Self {
        Self {
            api,
            inference,
            lemmatizer,
            config,
            options,
        }
    }

    /// Examine the `number` most recent posts and annotate the eligible ones.
    pub async fn run(&self, number: usize) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let candidates = self.collect_candidates(number, &mut summary).await?;
        info!(
            examined = summary.examined,
            eligible = candidates.len(),
            account = %self.config.target_account,
            "Collected candidate posts"
        );

        let shared_model = if self.options.cache_vectorizer {
            match load_vectorizer(&self.config.vectorizer_path) {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!(error = %e, "Shared vectorizer load failed, loading per post");
                    None
                }
            }
        } else {
            None
        };

        for post in &candidates {
            match self.process_post(post, shared_model.as_ref()).await {
                Ok(PostOutcome::AlreadyReposted) => summary.skipped += 1,
                Ok(PostOutcome::Annotated(_)) => summary.annotated += 1,
                Ok(PostOutcome::RepostedOnly(_)) => summary.reposted_only += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        post_id = post.id,
                        kind = e.kind(),
                        error = %e,
                        "Post failed, continuing with next"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            examined = summary.examined,
            filtered = summary.filtered,
            skipped = summary.skipped,
            annotated = summary.annotated,
            reposted_only = summary.reposted_only,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }

    /// Walk the timeline cursor, keeping only eligible posts.
    async fn collect_candidates(
        &self,
        number: usize,
        summary: &mut RunSummary,
    ) -> Result<Vec<Post>> {
        let mut cursor = TimelineCursor::new(self.api, &self.config.target_account, number);
        let mut candidates = Vec::new();

        while let Some(post) = cursor.next().await? {
            summary.examined += 1;
            if is_eligible(&post) {
                candidates.push(post);
            } else {
                debug!(post_id = post.id, "Skipping repost or reply");
                summary.filtered += 1;
            }
        }
        Ok(candidates)
    }

    /// Run one eligible post through classify -> repost -> annotate.
    ///
    /// `shared_model` is used when the vectorizer was loaded once for the
    /// run; otherwise the artifact is loaded fresh for this post.
    pub async fn process_post(
        &self,
        post: &Post,
        shared_model: Option<&VectorizerModel>,
    ) -> Result<PostOutcome> {
        if post.retweeted {
            info!(post_id = post.id, "Already reposted, skipping");
            return Ok(PostOutcome::AlreadyReposted);
        }
        info!(post_id = post.id, "Post has not been reposted");

        let prediction = match shared_model {
            Some(model) => self.classify(post, model).await?,
            None => {
                let model = load_vectorizer(&self.config.vectorizer_path)?;
                self.classify(post, &model).await?
            }
        };
        info!(post_id = post.id, label = prediction.0, "Prediction received");

        self.repost(post).await?;

        let url = status_url(&self.config.target_account, post.id);
        match Sentiment::from_label(prediction) {
            Some(sentiment) => {
                self.annotate(&annotation_text(sentiment, &url)).await?;
                Ok(PostOutcome::Annotated(sentiment))
            }
            None => {
                debug!(post_id = post.id, label = prediction.0, "No annotation for label");
                Ok(PostOutcome::RepostedOnly(prediction))
            }
        }
    }

    async fn classify(&self, post: &Post, model: &VectorizerModel) -> Result<Prediction> {
        let tokens = preprocess(&post.text, self.lemmatizer);
        debug!(raw = %post.text, tokens = ?tokens, "Preprocessed post");

        let input = match self.options.vectorize_input {
            VectorizeInput::Raw => post.text.clone(),
            VectorizeInput::Preprocessed => tokens.join(" "),
        };

        let features = model.transform(&input)?;
        debug!(
            dimensions = features.len(),
            nonzero = features.nnz(),
            "Vectorized post"
        );

        let raw = self
            .inference
            .invoke(&self.config.endpoint_name, &features.to_csv())
            .await?;
        parse_prediction(&raw)
    }

    async fn repost(&self, post: &Post) -> Result<()> {
        if self.options.dry_run {
            info!(post_id = post.id, "Dry run: would repost");
            return Ok(());
        }
        self.api.retweet(post.id).await
    }

    async fn annotate(&self, text: &str) -> Result<()> {
        if self.options.dry_run {
            info!(text = %text, "Dry run: would post annotation");
            return Ok(());
        }
        self.api.update_status(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_text() {
        let url = status_url("acct", 5);
        assert_eq!(
            annotation_text(Sentiment::Positive, &url),
            "This is a positive tweet\nhttps://twitter.com/acct/status/5"
        );
        assert!(annotation_text(Sentiment::Negative, &url).starts_with("This is a negative tweet\n"));
    }
}

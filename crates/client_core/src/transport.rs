use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Comment, CommentId},
    protocol::{CreateCommentRequest, ReplaceCommentRequest, COMMENTS_COLLECTION},
};
use tracing::debug;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote store of comment records. Implementations report transport and
/// status failures as errors; they never touch local session state.
#[async_trait]
pub trait CommentService: Send + Sync {
    async fn list_comments(&self) -> Result<Vec<Comment>>;
    async fn create_comment(&self, request: &CreateCommentRequest) -> Result<Comment>;
    async fn replace_comment(&self, request: &ReplaceCommentRequest) -> Result<Comment>;
    async fn delete_comment(&self, id: CommentId) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpCommentService {
    http: Client,
    collection_url: Url,
}

impl HttpCommentService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let collection_url = collection_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    pub fn item_url(&self, id: CommentId) -> Result<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("comment url cannot carry a path: {}", self.collection_url))?
            .push(&id.to_string());
        Ok(url)
    }
}

fn collection_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())
        .with_context(|| format!("invalid comment service url '{base_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "unsupported scheme '{}' in comment service url '{base_url}'",
            url.scheme()
        ));
    }
    url.path_segments_mut()
        .map_err(|_| anyhow!("comment service url cannot be a base: '{base_url}'"))?
        .pop_if_empty()
        .push(COMMENTS_COLLECTION);
    Ok(url)
}

#[async_trait]
impl CommentService for HttpCommentService {
    async fn list_comments(&self) -> Result<Vec<Comment>> {
        let url = self.collection_url.clone();
        debug!(%url, "comments: GET");
        let comments: Vec<Comment> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("malformed comment list")?;
        Ok(comments)
    }

    async fn create_comment(&self, request: &CreateCommentRequest) -> Result<Comment> {
        let url = self.collection_url.clone();
        debug!(%url, "comments: POST");
        let created: Comment = self
            .http
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("malformed created comment")?;
        Ok(created)
    }

    async fn replace_comment(&self, request: &ReplaceCommentRequest) -> Result<Comment> {
        let url = self.item_url(request.id)?;
        debug!(%url, "comments: PUT");
        let replaced: Comment = self
            .http
            .put(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("malformed replaced comment")?;
        Ok(replaced)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "comments: DELETE");
        self.http.delete(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

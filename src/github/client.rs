//! GitHub API client implementation.
//!
//! This module provides the HTTP client for the issue comment endpoints of
//! the GitHub REST API: listing, creating and deleting comments on the pull
//! request of the current context.

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{ConfigError, GitHubError, Result};

use super::context::PullRequestContext;
use super::publisher::CommentSink;

/// Default GitHub API base URL.
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size used when listing comments.
const PER_PAGE: usize = 100;

/// REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// User agent sent with every request.
const USER_AGENT: &str = concat!("plan-comment/", env!("CARGO_PKG_VERSION"));

/// A comment on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    /// Comment ID.
    pub id: u64,
    /// Comment body.
    #[serde(default)]
    pub body: Option<String>,
}

/// Request body for creating a comment.
#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

/// GitHub API client bound to one pull request.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client.
    client: Client,
    /// API base URL, without trailing slash.
    base_url: String,
    /// API token.
    token: String,
    /// Pull request the comments belong to.
    context: PullRequestContext,
}

impl GitHubClient {
    /// Creates a client for the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(token: &str, context: PullRequestContext) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL, context)
    }

    /// Creates a client for a custom API base URL (GitHub Enterprise, tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the HTTP client cannot be created.
    pub fn with_base_url(token: &str, base_url: &str, context: PullRequestContext) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(GitHubError::AuthenticationFailed {
                message: String::from("API token is empty"),
            }
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitHubError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            context,
        })
    }

    /// Creates a client from `GITHUB_TOKEN` and `GITHUB_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not set or the client cannot be created.
    pub fn from_env(context: PullRequestContext) -> Result<Self> {
        let token = std::env::var(ENV_TOKEN).map_err(|_| ConfigError::MissingEnvVar {
            name: ENV_TOKEN.to_string(),
        })?;
        let base_url = std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_base_url(&token, &base_url, context)
    }

    /// Returns the pull request this client is bound to.
    #[must_use]
    pub const fn context(&self) -> &PullRequestContext {
        &self.context
    }

    fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_url, self.context.owner, self.context.repo, self.context.number
        )
    }

    fn comment_url(&self, id: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/comments/{id}",
            self.base_url, self.context.owner, self.context.repo
        )
    }

    /// Adds the common headers and sends a request.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| GitHubError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        trace!("GitHub responded with {status}");

        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::AuthenticationFailed {
                message: format!("{status}: {body}"),
            }
            .into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::api_error(status.as_u16(), body).into());
        }

        Ok(response)
    }

    /// Lists all comments on the pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails.
    pub async fn list_comments(&self) -> Result<Vec<IssueComment>> {
        let mut comments = Vec::new();
        let mut page = 1;

        loop {
            let url = format!("{}?per_page={PER_PAGE}&page={page}", self.comments_url());
            let response = self.send(self.client.get(&url)).await?;
            let batch: Vec<IssueComment> = response.json().await.map_err(|e| {
                GitHubError::InvalidResponse {
                    message: format!("Failed to parse comments: {e}"),
                }
            })?;

            let last_page = batch.len() < PER_PAGE;
            comments.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }

        debug!("Listed {} comments on {}", comments.len(), self.context);
        Ok(comments)
    }

    /// Creates a comment on the pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_comment(&self, body: &str) -> Result<IssueComment> {
        let request = self
            .client
            .post(self.comments_url())
            .json(&CreateCommentRequest { body });
        let response = self.send(request).await?;

        let comment: IssueComment = response.json().await.map_err(|e| GitHubError::InvalidResponse {
            message: format!("Failed to parse created comment: {e}"),
        })?;

        debug!("Created comment {} on {}", comment.id, self.context);
        Ok(comment)
    }

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_comment(&self, id: u64) -> Result<()> {
        self.send(self.client.delete(self.comment_url(id))).await?;
        debug!("Deleted comment {id} on {}", self.context);
        Ok(())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CommentSink for GitHubClient {
    async fn list_comments(&self) -> Result<Vec<IssueComment>> {
        Self::list_comments(self).await
    }

    async fn create_comment(&self, body: &str) -> Result<IssueComment> {
        Self::create_comment(self, body).await
    }

    async fn delete_comment(&self, id: u64) -> Result<()> {
        Self::delete_comment(self, id).await
    }
}

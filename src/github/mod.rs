//! GitHub integration.
//!
//! This module provides:
//! - Pull request context resolution
//! - A REST client for issue comments
//! - Publishing and purging of reports

mod client;
mod context;
mod publisher;

pub use client::{GitHubClient, IssueComment, ENV_API_URL, ENV_TOKEN};
pub use context::{PullRequestContext, ENV_EVENT_PATH, ENV_REPOSITORY};
pub use publisher::{CommentPublisher, CommentSink};

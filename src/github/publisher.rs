//! Report publishing.
//!
//! Posts finished reports to the pull request and removes reports left by
//! previous runs, recognized by the trailing marker they carry.

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::{GitHubError, Result};

use super::client::IssueComment;

/// Destination of report comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Lists every comment on the pull request.
    async fn list_comments(&self) -> Result<Vec<IssueComment>>;

    /// Posts a new comment.
    async fn create_comment(&self, body: &str) -> Result<IssueComment>;

    /// Removes a comment.
    async fn delete_comment(&self, id: u64) -> Result<()>;
}

/// Publishes reports and purges previous ones.
#[derive(Debug)]
pub struct CommentPublisher<S: CommentSink> {
    sink: S,
}

impl<S: CommentSink> CommentPublisher<S> {
    /// Creates a publisher writing to `sink`.
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Removes every comment whose body contains `marker`.
    ///
    /// A failed deletion is logged and skipped. Returns the number of
    /// comments removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing comments cannot be listed.
    pub async fn purge(&self, marker: &str) -> Result<usize> {
        let comments = self.sink.list_comments().await?;
        let previous: Vec<u64> = comments
            .iter()
            .filter(|c| c.body.as_deref().is_some_and(|body| body.contains(marker)))
            .map(|c| c.id)
            .collect();

        info!("Removing {} previous report(s)", previous.len());

        let mut removed = 0;
        for id in previous {
            match self.sink.delete_comment(id).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to delete previous report {id}: {e}"),
            }
        }
        Ok(removed)
    }

    /// Posts each report as a new comment, in order.
    ///
    /// Every report is attempted even when an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::PublishFailed`] if any report could not be posted.
    pub async fn publish(&self, reports: &[String]) -> Result<usize> {
        let mut failed = 0;
        for (index, report) in reports.iter().enumerate() {
            match self.sink.create_comment(report).await {
                Ok(comment) => info!("Published report {} as comment {}", index + 1, comment.id),
                Err(e) => {
                    error!("Failed to publish report {}: {e}", index + 1);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(GitHubError::PublishFailed {
                failed,
                total: reports.len(),
            }
            .into());
        }
        Ok(reports.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanCommentError;
    use mockall::predicate::eq;

    const MARKER: &str = "<!-- plan-comment:report -->";

    fn comment(id: u64, body: &str) -> IssueComment {
        IssueComment {
            id,
            body: Some(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_purge_deletes_only_marked_comments() {
        let mut sink = MockCommentSink::new();
        sink.expect_list_comments().returning(|| {
            Ok(vec![
                comment(1, "LGTM"),
                comment(2, &format!("report\n{MARKER}")),
                IssueComment { id: 3, body: None },
                comment(4, &format!("other\n{MARKER}")),
            ])
        });
        sink.expect_delete_comment().with(eq(2)).times(1).returning(|_| Ok(()));
        sink.expect_delete_comment().with(eq(4)).times(1).returning(|_| Ok(()));

        let removed = CommentPublisher::new(sink).purge(MARKER).await.unwrap();
        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_purge_continues_after_failed_delete() {
        let mut sink = MockCommentSink::new();
        sink.expect_list_comments()
            .returning(|| Ok(vec![comment(1, MARKER), comment(2, MARKER)]));
        sink.expect_delete_comment()
            .with(eq(1))
            .times(1)
            .returning(|_| Err(GitHubError::api_error(404, "Not Found").into()));
        sink.expect_delete_comment().with(eq(2)).times(1).returning(|_| Ok(()));

        let removed = CommentPublisher::new(sink).purge(MARKER).await.unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_purge_fails_when_listing_fails() {
        let mut sink = MockCommentSink::new();
        sink.expect_list_comments()
            .returning(|| Err(GitHubError::network("connection reset").into()));
        sink.expect_delete_comment().never();

        assert!(CommentPublisher::new(sink).purge(MARKER).await.is_err());
    }

    #[tokio::test]
    async fn test_publish_posts_in_order() {
        let mut sink = MockCommentSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_create_comment()
            .withf(|body| body == "first")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|body| Ok(comment(10, body)));
        sink.expect_create_comment()
            .withf(|body| body == "second")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|body| Ok(comment(11, body)));

        let reports = vec![String::from("first"), String::from("second")];
        let published = CommentPublisher::new(sink).publish(&reports).await.unwrap();
        assert_eq!(published, 2);
    }

    #[tokio::test]
    async fn test_publish_attempts_all_then_fails() {
        let mut sink = MockCommentSink::new();
        sink.expect_create_comment()
            .withf(|body| body == "first")
            .times(1)
            .returning(|_| Err(GitHubError::api_error(422, "Body is too long").into()));
        sink.expect_create_comment()
            .withf(|body| body == "second")
            .times(1)
            .returning(|body| Ok(comment(11, body)));

        let reports = vec![String::from("first"), String::from("second")];
        let err = CommentPublisher::new(sink).publish(&reports).await.unwrap_err();
        assert!(matches!(
            err,
            PlanCommentError::GitHub(GitHubError::PublishFailed { failed: 1, total: 2 })
        ));
    }
}

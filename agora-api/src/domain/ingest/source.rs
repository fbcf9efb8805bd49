//! Forum post sources.

use async_trait::async_trait;
use piazza::{Credentials, PiazzaClient};

use crate::domain::search::{Result, SearchError};

/// A class network worth scraping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub nid: String,
    pub course_number: String,
}

/// A post as the scraper consumes it, before cleaning.
#[derive(Debug, Clone, Default)]
pub struct ForumPost {
    pub title: String,
    pub content: String,
    pub instructor_answer: String,
    pub student_answer: String,
    pub folders: Vec<String>,
    pub private: bool,
}

/// Fetching posts from the forum.
///
/// Abstracts the forum API so the scraper can be tested without a network.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// All classes visible to the logged-in account.
    async fn classes(&self) -> Result<Vec<CourseRef>>;

    /// Fetch one post; `None` when the number does not exist.
    async fn fetch_post(&self, nid: &str, post_number: i32) -> Result<Option<ForumPost>>;

    /// Re-authenticate the underlying session.
    async fn refresh_session(&self) -> Result<()>;
}

/// [`PostSource`] backed by the Piazza API.
pub struct PiazzaPostSource {
    client: PiazzaClient,
    credentials: Credentials,
}

impl PiazzaPostSource {
    pub fn new(client: PiazzaClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl PostSource for PiazzaPostSource {
    async fn classes(&self) -> Result<Vec<CourseRef>> {
        let classes = self
            .client
            .user_classes()
            .await
            .map_err(|e| SearchError::Source(e.to_string()))?;

        Ok(classes
            .into_iter()
            .map(|c| CourseRef {
                nid: c.nid,
                course_number: c.course_number,
            })
            .collect())
    }

    async fn fetch_post(&self, nid: &str, post_number: i32) -> Result<Option<ForumPost>> {
        let post = self
            .client
            .post(nid, post_number)
            .await
            .map_err(|e| SearchError::Source(e.to_string()))?;

        Ok(post.map(|p| ForumPost {
            title: p.title().to_string(),
            content: p.content().to_string(),
            instructor_answer: p.instructor_answer().unwrap_or("").to_string(),
            student_answer: p.endorsed_student_answer().unwrap_or("").to_string(),
            folders: p.folders.clone(),
            private: p.is_private(),
        }))
    }

    async fn refresh_session(&self) -> Result<()> {
        self.client
            .login(&self.credentials)
            .await
            .map_err(|e| SearchError::Source(e.to_string()))
    }
}

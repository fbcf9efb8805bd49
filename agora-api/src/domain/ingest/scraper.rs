//! The scraping loop: fetch, clean, embed, insert.

use std::time::Duration;

use tracing::{info, warn};

use super::sanitize::strip_html;
use super::source::{ForumPost, PostSource};
use crate::config::ScraperSettings;
use crate::domain::search::{Embedder, NewPost, PostRepository, Result};

/// Sentences shorter than this are noise and are not embedded.
const MIN_SENTENCE_LEN: usize = 20;

/// Folder whose posts are administrative and skipped.
const SKIPPED_FOLDER: &str = "regrade";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Only classes whose course number contains this string are scraped.
    pub course_filter: String,
    /// First post number to fetch (inclusive).
    pub first_post: i32,
    /// Last post number to fetch (exclusive).
    pub last_post: i32,
    /// Refresh the session and take the long pause every n-th post.
    pub relogin_every: i32,
    pub post_pause: Duration,
    pub session_pause: Duration,
    pub error_pause: Duration,
}

impl From<&ScraperSettings> for ScrapeConfig {
    fn from(settings: &ScraperSettings) -> Self {
        Self {
            course_filter: settings.course_filter.clone(),
            first_post: settings.first_post,
            last_post: settings.last_post,
            relogin_every: settings.relogin_every,
            post_pause: Duration::from_secs(settings.post_pause_secs),
            session_pause: Duration::from_secs(settings.session_pause_secs),
            error_pause: Duration::from_secs(settings.error_pause_secs),
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct ScrapeStats {
    pub semesters_added: usize,
    pub posts_ingested: usize,
    pub posts_skipped: usize,
    pub embeddings_written: usize,
    pub errors: usize,
}

/// Walks every matching class and writes posts plus embeddings.
///
/// # Type Parameters
///
/// * `E` - Embedder implementation for document embeddings
/// * `R` - PostRepository implementation for persistence
/// * `S` - PostSource implementation for fetching from the forum
pub struct PostScraper<E, R, S>
where
    E: Embedder,
    R: PostRepository,
    S: PostSource,
{
    embedder: E,
    repository: R,
    source: S,
    config: ScrapeConfig,
}

impl<E, R, S> PostScraper<E, R, S>
where
    E: Embedder,
    R: PostRepository,
    S: PostSource,
{
    pub fn new(embedder: E, repository: R, source: S, config: ScrapeConfig) -> Self {
        Self {
            embedder,
            repository,
            source,
            config,
        }
    }

    /// Scrape every class matching the course filter.
    ///
    /// Classes already present in the database are left untouched, so a
    /// rerun after a crash picks up where the previous run gave up.
    pub async fn run(&self) -> Result<ScrapeStats> {
        let mut stats = ScrapeStats::default();

        let classes = self.source.classes().await?;
        let matching: Vec<_> = classes
            .into_iter()
            .filter(|c| c.course_number.contains(&self.config.course_filter))
            .collect();

        info!(classes = matching.len(), filter = %self.config.course_filter, "starting scrape");

        for class in &matching {
            if self
                .repository
                .semester_id_by_code(&class.nid)
                .await?
                .is_some()
            {
                info!(nid = %class.nid, "semester already acquired, skipping");
                continue;
            }

            let semester_name = format!("{}{}", class.course_number, class.nid);
            let semester_id = self
                .repository
                .insert_semester(&semester_name, &class.nid)
                .await?;
            stats.semesters_added += 1;

            info!(nid = %class.nid, semester_id, "scraping class");
            self.scrape_class(&class.nid, semester_id, &mut stats).await;
        }

        info!(
            semesters = stats.semesters_added,
            posts = stats.posts_ingested,
            skipped = stats.posts_skipped,
            embeddings = stats.embeddings_written,
            errors = stats.errors,
            "scrape completed"
        );

        Ok(stats)
    }

    async fn scrape_class(&self, nid: &str, semester_id: i32, stats: &mut ScrapeStats) {
        for post_number in self.config.first_post..self.config.last_post {
            match self.ingest_post(nid, semester_id, post_number, stats).await {
                Ok(true) => stats.posts_ingested += 1,
                Ok(false) => stats.posts_skipped += 1,
                Err(e) => {
                    warn!(post_number, error = %e, "failed to ingest post");
                    stats.errors += 1;
                    tokio::time::sleep(self.config.error_pause).await;
                    if let Err(e) = self.source.refresh_session().await {
                        warn!(error = %e, "session refresh failed");
                    }
                    continue;
                }
            }

            // The forum blocks chatty clients; pause between posts and take
            // a long break with a fresh session at a fixed cadence.
            if post_number % self.config.relogin_every == 0 {
                tokio::time::sleep(self.config.session_pause).await;
                if let Err(e) = self.source.refresh_session().await {
                    warn!(error = %e, "session refresh failed");
                }
            } else {
                tokio::time::sleep(self.config.post_pause).await;
            }
        }
    }

    /// Returns `Ok(true)` when the post was written, `Ok(false)` when it
    /// was filtered out.
    async fn ingest_post(
        &self,
        nid: &str,
        semester_id: i32,
        post_number: i32,
        stats: &mut ScrapeStats,
    ) -> Result<bool> {
        let Some(post) = self.source.fetch_post(nid, post_number).await? else {
            return Ok(false);
        };

        if post.private || post.folders.iter().any(|f| f == SKIPPED_FOLDER) {
            return Ok(false);
        }

        let cleaned = CleanedPost::from(&post);

        let new_post = NewPost {
            semester_id,
            post_id: post_number,
            title: cleaned.title.clone(),
            content: cleaned.content.clone(),
            instructor_answer: cleaned.instructor_answer.clone(),
            student_answer: cleaned.student_answer.clone(),
        };

        let embeddings = self.embed_post(&cleaned).await?;

        self.repository.insert_post(&new_post).await?;
        self.repository
            .insert_embeddings(semester_id, post_number, &embeddings)
            .await?;
        stats.embeddings_written += embeddings.len();

        Ok(true)
    }

    /// One embedding for the title plus one per substantial sentence of
    /// the body and both answers.
    async fn embed_post(&self, post: &CleanedPost) -> Result<Vec<Vec<f32>>> {
        let mut texts = vec![post.title.as_str()];
        texts.extend(sentence_chunks(&post.content));
        texts.extend(sentence_chunks(&post.instructor_answer));
        texts.extend(sentence_chunks(&post.student_answer));

        self.embedder.embed_batch(&texts).await
    }
}

struct CleanedPost {
    title: String,
    content: String,
    instructor_answer: String,
    student_answer: String,
}

impl From<&ForumPost> for CleanedPost {
    fn from(post: &ForumPost) -> Self {
        Self {
            title: strip_html(&post.title),
            content: strip_html(&post.content),
            instructor_answer: strip_html(&post.instructor_answer),
            student_answer: strip_html(&post.student_answer),
        }
    }
}

/// Sentences worth embedding on their own: split on periods, keep those
/// longer than [`MIN_SENTENCE_LEN`].
fn sentence_chunks(text: &str) -> Vec<&str> {
    text.split('.')
        .map(str::trim)
        .filter(|s| s.len() > MIN_SENTENCE_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::search::embedder::MockEmbedder;
    use crate::domain::search::repository::MockPostRepository;
    use crate::domain::search::SearchError;
    use crate::domain::ingest::source::CourseRef;

    #[derive(Clone)]
    struct MockSource {
        classes: Vec<CourseRef>,
        posts: HashMap<(String, i32), ForumPost>,
        failing_posts: Vec<i32>,
        refreshes: Arc<RwLock<usize>>,
    }

    impl MockSource {
        fn new() -> Self {
            Self {
                classes: vec![],
                posts: HashMap::new(),
                failing_posts: vec![],
                refreshes: Arc::new(RwLock::new(0)),
            }
        }

        fn with_class(mut self, nid: &str, course_number: &str) -> Self {
            self.classes.push(CourseRef {
                nid: nid.to_string(),
                course_number: course_number.to_string(),
            });
            self
        }

        fn with_post(mut self, nid: &str, post_number: i32, post: ForumPost) -> Self {
            self.posts.insert((nid.to_string(), post_number), post);
            self
        }

        fn with_failing_post(mut self, post_number: i32) -> Self {
            self.failing_posts.push(post_number);
            self
        }

        fn refresh_count(&self) -> usize {
            *self.refreshes.read().unwrap()
        }
    }

    #[async_trait]
    impl PostSource for MockSource {
        async fn classes(&self) -> Result<Vec<CourseRef>> {
            Ok(self.classes.clone())
        }

        async fn fetch_post(&self, nid: &str, post_number: i32) -> Result<Option<ForumPost>> {
            if self.failing_posts.contains(&post_number) {
                return Err(SearchError::Source("forum hiccup".into()));
            }
            Ok(self.posts.get(&(nid.to_string(), post_number)).cloned())
        }

        async fn refresh_session(&self) -> Result<()> {
            *self.refreshes.write().unwrap() += 1;
            Ok(())
        }
    }

    fn instant_config() -> ScrapeConfig {
        ScrapeConfig {
            course_filter: "360".to_string(),
            first_post: 1,
            last_post: 4,
            relogin_every: 10,
            post_pause: Duration::ZERO,
            session_pause: Duration::ZERO,
            error_pause: Duration::ZERO,
        }
    }

    fn qa_post(title: &str) -> ForumPost {
        ForumPost {
            title: format!("<b>{title}</b>"),
            content: "<p>This sentence is long enough to embed on its own. ok.</p>".to_string(),
            instructor_answer: "Yes, use the chain rule for this derivation.".to_string(),
            student_answer: String::new(),
            folders: vec!["hw1".to_string()],
            private: false,
        }
    }

    #[tokio::test]
    async fn ingests_matching_class_posts() {
        let source = MockSource::new()
            .with_class("net1", "CSCI 360")
            .with_class("net2", "CSCI 201")
            .with_post("net1", 1, qa_post("What is backprop?"))
            .with_post("net1", 2, qa_post("What is a heuristic?"));

        let repo = MockPostRepository::new();
        let scraper = PostScraper::new(
            MockEmbedder::default(),
            repo.clone(),
            source.clone(),
            instant_config(),
        );

        let stats = scraper.run().await.unwrap();

        assert_eq!(stats.semesters_added, 1);
        assert_eq!(stats.posts_ingested, 2);
        assert_eq!(stats.posts_skipped, 1); // post 3 does not exist
        assert_eq!(stats.errors, 0);
        assert_eq!(repo.post_count(), 2);
        // Semester name is the course number glued to the network id.
        assert_eq!(repo.semester_names(), vec!["CSCI 360net1"]);
        // Title is stored without markup.
        assert_eq!(repo.posts()[0].title, "What is backprop?");
    }

    #[tokio::test]
    async fn skips_private_and_regrade_posts() {
        let mut private = qa_post("secret");
        private.private = true;
        let mut regrade = qa_post("regrade me");
        regrade.folders = vec!["regrade".to_string()];

        let source = MockSource::new()
            .with_class("net1", "CSCI 360")
            .with_post("net1", 1, private)
            .with_post("net1", 2, regrade)
            .with_post("net1", 3, qa_post("real question"));

        let repo = MockPostRepository::new();
        let scraper = PostScraper::new(
            MockEmbedder::default(),
            repo.clone(),
            source.clone(),
            instant_config(),
        );

        let stats = scraper.run().await.unwrap();
        assert_eq!(stats.posts_ingested, 1);
        assert_eq!(stats.posts_skipped, 2);
        assert_eq!(repo.post_count(), 1);
    }

    #[tokio::test]
    async fn skips_already_scraped_semesters() {
        let source = MockSource::new()
            .with_class("net1", "CSCI 360")
            .with_post("net1", 1, qa_post("q"));

        let repo = MockPostRepository::new().with_semester("CSCI 360net1", "net1");
        let scraper = PostScraper::new(
            MockEmbedder::default(),
            repo.clone(),
            source.clone(),
            instant_config(),
        );

        let stats = scraper.run().await.unwrap();
        assert_eq!(stats.semesters_added, 0);
        assert_eq!(stats.posts_ingested, 0);
        assert_eq!(repo.post_count(), 0);
    }

    #[tokio::test]
    async fn embeds_title_and_long_sentences() {
        let source = MockSource::new()
            .with_class("net1", "CSCI 360")
            .with_post("net1", 1, qa_post("q"));

        let embedder = MockEmbedder::default();
        let repo = MockPostRepository::new();
        let mut config = instant_config();
        config.last_post = 2;

        let scraper = PostScraper::new(embedder.clone(), repo.clone(), source.clone(), config);
        let stats = scraper.run().await.unwrap();

        // Title + one content sentence + one instructor sentence.
        assert_eq!(embedder.call_count(), 3);
        assert_eq!(stats.embeddings_written, 3);
        assert_eq!(repo.embedding_count(), 3);
    }

    #[tokio::test]
    async fn continues_after_post_errors() {
        let source = MockSource::new()
            .with_class("net1", "CSCI 360")
            .with_post("net1", 1, qa_post("before"))
            .with_failing_post(2)
            .with_post("net1", 3, qa_post("after"));

        let repo = MockPostRepository::new();
        let scraper = PostScraper::new(
            MockEmbedder::default(),
            repo.clone(),
            source.clone(),
            instant_config(),
        );

        let stats = scraper.run().await.unwrap();
        assert_eq!(stats.posts_ingested, 2);
        assert_eq!(stats.errors, 1);
        // The session is refreshed after a failure.
        assert!(source.refresh_count() >= 1);
    }

    #[test]
    fn sentence_chunks_filter_short_fragments() {
        let chunks = sentence_chunks(
            "Short. This sentence is comfortably long enough. Tiny. Another reasonably long sentence here.",
        );
        assert_eq!(
            chunks,
            vec![
                "This sentence is comfortably long enough",
                "Another reasonably long sentence here",
            ]
        );
    }

    #[test]
    fn sentence_chunks_of_empty_text() {
        assert!(sentence_chunks("").is_empty());
    }
}

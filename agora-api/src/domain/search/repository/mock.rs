//! Mock repository implementation for testing.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::search::traits::{PostRepository, Result, SearchError};
use crate::domain::search::types::{NewPost, PostMatch};

#[derive(Debug, Clone)]
struct SemesterRow {
    id: i32,
    name: String,
    code: String,
}

#[derive(Debug, Clone)]
struct EmbeddingRow {
    semester_id: i32,
    post_id: i32,
    vector: Vec<f32>,
}

/// In-memory repository with cosine scoring over stored embeddings.
#[derive(Clone, Default)]
pub struct MockPostRepository {
    semesters: Arc<RwLock<Vec<SemesterRow>>>,
    posts: Arc<RwLock<Vec<NewPost>>>,
    embeddings: Arc<RwLock<Vec<EmbeddingRow>>>,
}

impl MockPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a semester row, returning its id.
    pub fn with_semester(self, name: &str, code: &str) -> Self {
        {
            let mut semesters = self.semesters.write().unwrap();
            let id = semesters.len() as i32 + 1;
            semesters.push(SemesterRow {
                id,
                name: name.to_string(),
                code: code.to_string(),
            });
        }
        self
    }

    pub fn post_count(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    pub fn embedding_count(&self) -> usize {
        self.embeddings.read().unwrap().len()
    }

    pub fn semester_names(&self) -> Vec<String> {
        self.semesters
            .read()
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn posts(&self) -> Vec<NewPost> {
        self.posts.read().unwrap().clone()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

#[async_trait]
impl PostRepository for MockPostRepository {
    async fn similar_posts(&self, embedding: &[f32], limit: i64) -> Result<Vec<PostMatch>> {
        let posts = self.posts.read().unwrap();
        let embeddings = self.embeddings.read().unwrap();

        // One candidate row per stored embedding, mirroring the SQL shape.
        let mut matches: Vec<PostMatch> = embeddings
            .iter()
            .map(|row| {
                let post = posts
                    .iter()
                    .find(|p| p.semester_id == row.semester_id && p.post_id == row.post_id);
                PostMatch {
                    semester_id: row.semester_id,
                    post_id: row.post_id,
                    post_title: post.map(|p| p.title.clone()),
                    post_content: post.map(|p| p.content.clone()),
                    instructor_answer: post.map(|p| p.instructor_answer.clone()),
                    student_answer: post.map(|p| p.student_answer.clone()),
                    similarity: cosine_similarity(embedding, &row.vector),
                }
            })
            .collect();

        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(limit as usize);
        Ok(matches)
    }

    async fn semester_id_by_code(&self, code: &str) -> Result<Option<i32>> {
        Ok(self
            .semesters
            .read()
            .unwrap()
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.id))
    }

    async fn insert_semester(&self, name: &str, code: &str) -> Result<i32> {
        let mut semesters = self.semesters.write().unwrap();
        if semesters.iter().any(|s| s.code == code) {
            return Err(SearchError::Database(format!(
                "duplicate semester code: {code}"
            )));
        }
        let id = semesters.len() as i32 + 1;
        semesters.push(SemesterRow {
            id,
            name: name.to_string(),
            code: code.to_string(),
        });
        Ok(id)
    }

    async fn insert_post(&self, post: &NewPost) -> Result<()> {
        self.posts.write().unwrap().push(post.clone());
        Ok(())
    }

    async fn insert_embeddings(
        &self,
        semester_id: i32,
        post_id: i32,
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        let mut rows = self.embeddings.write().unwrap();
        for vector in embeddings {
            rows.push(EmbeddingRow {
                semester_id,
                post_id,
                vector: vector.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(semester_id: i32, post_id: i32, title: &str) -> NewPost {
        NewPost {
            semester_id,
            post_id,
            title: title.to_string(),
            content: "content".to_string(),
            instructor_answer: String::new(),
            student_answer: String::new(),
        }
    }

    #[tokio::test]
    async fn similar_posts_ranks_by_cosine() {
        let repo = MockPostRepository::new();
        repo.insert_post(&make_post(1, 1, "aligned")).await.unwrap();
        repo.insert_post(&make_post(1, 2, "orthogonal")).await.unwrap();
        repo.insert_embeddings(1, 1, &[vec![1.0, 0.0]]).await.unwrap();
        repo.insert_embeddings(1, 2, &[vec![0.0, 1.0]]).await.unwrap();

        let matches = repo.similar_posts(&[1.0, 0.0], 10).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].post_id, 1);
        assert!(matches[0].similarity > matches[1].similarity);
    }

    #[tokio::test]
    async fn similar_posts_yields_row_per_embedding() {
        let repo = MockPostRepository::new();
        repo.insert_post(&make_post(1, 1, "multi")).await.unwrap();
        repo.insert_embeddings(1, 1, &[vec![1.0, 0.0], vec![0.5, 0.5]])
            .await
            .unwrap();

        let matches = repo.similar_posts(&[1.0, 0.0], 10).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.post_id == 1));
    }

    #[tokio::test]
    async fn semester_lookup_and_duplicate_rejection() {
        let repo = MockPostRepository::new();
        assert_eq!(repo.semester_id_by_code("abc").await.unwrap(), None);

        let id = repo.insert_semester("CSCI 360 fall", "abc").await.unwrap();
        assert_eq!(repo.semester_id_by_code("abc").await.unwrap(), Some(id));

        assert!(repo.insert_semester("again", "abc").await.is_err());
    }

    #[tokio::test]
    async fn respects_limit() {
        let repo = MockPostRepository::new();
        for post_id in 1..=5 {
            repo.insert_post(&make_post(1, post_id, "p")).await.unwrap();
            repo.insert_embeddings(1, post_id, &[vec![1.0, 0.0]])
                .await
                .unwrap();
        }

        let matches = repo.similar_posts(&[1.0, 0.0], 3).await.unwrap();
        assert_eq!(matches.len(), 3);
    }
}

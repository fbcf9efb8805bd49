//! Core types for the search domain.

use serde::Serialize;
use sqlx::FromRow;

/// A post row joined with the similarity of one of its embeddings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostMatch {
    pub semester_id: i32,
    pub post_id: i32,
    pub post_title: Option<String>,
    pub post_content: Option<String>,
    pub instructor_answer: Option<String>,
    pub student_answer: Option<String>,
    /// `1 - cosine distance`, higher is closer.
    pub similarity: f64,
}

/// A scraped post ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub semester_id: i32,
    pub post_id: i32,
    pub title: String,
    pub content: String,
    pub instructor_answer: String,
    pub student_answer: String,
}

//! PostgreSQL repository implementation with pgvector support.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;

use crate::domain::search::traits::{PostRepository, Result};
use crate::domain::search::types::{NewPost, PostMatch};
use crate::sql::SqlBuilder;

/// PostgreSQL-backed repository over the `semesters`, `posts` and
/// `embeddings` tables. Statements are assembled with [`SqlBuilder`];
/// values travel as sqlx binds, vectors through the pgvector codec.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn similar_posts(&self, embedding: &[f32], limit: i64) -> Result<Vec<PostMatch>> {
        // Cosine similarity per stored embedding, then the owning post
        // rows ordered best first. DISTINCT collapses identical rows only;
        // a post keeps one row per distinct similarity score.
        let sql = SqlBuilder::new()
            .with("similarity_embeddings AS")
            .open_paren()
            .select(&[
                "post_id",
                "semester_id",
                "1 - (embedding <=> $1) AS similarity",
            ])
            .from(&["embeddings"])
            .close_paren()
            .select(&[
                "DISTINCT p.semester_id",
                "p.post_id",
                "p.post_title",
                "p.post_content",
                "p.instructor_answer",
                "p.student_answer",
                "se.similarity",
            ])
            .from(&["similarity_embeddings AS se"])
            .left_join("posts AS p")
            .on("p.post_id = se.post_id")
            .and_("p.semester_id = se.semester_id")
            .order_by(&["se.similarity DESC"])
            .limit(limit)
            .build();

        let matches = sqlx::query_as::<_, PostMatch>(&sql)
            .bind(Vector::from(embedding.to_vec()))
            .fetch_all(&self.pool)
            .await?;

        Ok(matches)
    }

    async fn semester_id_by_code(&self, code: &str) -> Result<Option<i32>> {
        let sql = SqlBuilder::new()
            .select(&["semester_id"])
            .from(&["semesters"])
            .where_("semester_piazza_code = $1")
            .build();

        let id = sqlx::query_scalar::<_, i32>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    async fn insert_semester(&self, name: &str, code: &str) -> Result<i32> {
        let sql = SqlBuilder::new()
            .insert_into("semesters", &["semester_name", "semester_piazza_code"])
            .values(&[["$1", "$2"]])
            .build();

        sqlx::query(&sql)
            .bind(name)
            .bind(code)
            .execute(&self.pool)
            .await?;

        // The id is assigned by the sequence; read it back by code.
        let sql = SqlBuilder::new()
            .select(&["semester_id"])
            .from(&["semesters"])
            .where_("semester_piazza_code = $1")
            .build();

        let id = sqlx::query_scalar::<_, i32>(&sql)
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn insert_post(&self, post: &NewPost) -> Result<()> {
        let sql = SqlBuilder::new()
            .insert_into(
                "posts",
                &[
                    "semester_id",
                    "post_id",
                    "post_title",
                    "post_content",
                    "instructor_answer",
                    "student_answer",
                ],
            )
            .values(&[["$1", "$2", "$3", "$4", "$5", "$6"]])
            .build();

        sqlx::query(&sql)
            .bind(post.semester_id)
            .bind(post.post_id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.instructor_answer)
            .bind(&post.student_answer)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_embeddings(
        &self,
        semester_id: i32,
        post_id: i32,
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        let sql = SqlBuilder::new()
            .insert_into("embeddings", &["embedding", "semester_id", "post_id"])
            .values(&[["$1", "$2", "$3"]])
            .build();

        let mut tx = self.pool.begin().await?;

        for embedding in embeddings {
            sqlx::query(&sql)
                .bind(Vector::from(embedding.clone()))
                .bind(semester_id)
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

//! Database and table setup for the ingest binary.
//!
//! The scraper owns the schema: the tables exist to hold what it writes,
//! and the server only reads them.

use sqlx::{Connection, Executor, PgConnection, PgPool};
use tracing::info;

use crate::config::DatabaseSettings;
use crate::domain::search::embedder::GEMINI_DIMENSIONS;
use crate::domain::search::{Result, SearchError};
use crate::sql::SqlBuilder;

const TABLES: [&str; 3] = ["embeddings", "posts", "semesters"];

fn semesters_columns() -> Vec<String> {
    vec![
        "semester_id SERIAL PRIMARY KEY".into(),
        "semester_name VARCHAR(255)".into(),
        "semester_piazza_code TEXT UNIQUE".into(),
    ]
}

fn posts_columns() -> Vec<String> {
    vec![
        "semester_id INT NOT NULL".into(),
        "post_id INT NOT NULL".into(),
        "post_title TEXT".into(),
        "post_content TEXT".into(),
        "instructor_answer TEXT".into(),
        "student_answer TEXT".into(),
        "PRIMARY KEY(semester_id, post_id)".into(),
    ]
}

fn embeddings_columns() -> Vec<String> {
    vec![
        "id SERIAL PRIMARY KEY".into(),
        format!("embedding vector({}) NOT NULL", GEMINI_DIMENSIONS),
        "semester_id INT NOT NULL".into(),
        "post_id INT NOT NULL".into(),
        "FOREIGN KEY(semester_id) REFERENCES semesters(semester_id)".into(),
        "FOREIGN KEY(semester_id, post_id) REFERENCES posts(semester_id, post_id)".into(),
    ]
}

/// Drop and recreate the whole database.
///
/// Runs on a maintenance connection to the server's default database,
/// since a database cannot drop itself.
pub async fn recreate_database(settings: &DatabaseSettings) -> Result<()> {
    let mut conn = PgConnection::connect_with(&settings.without_db())
        .await
        .map_err(|e| SearchError::Database(e.to_string()))?;

    let drop = SqlBuilder::new()
        .drop_database()
        .if_exists(&settings.database_name)
        .build();
    conn.execute(drop.as_str()).await?;

    let create = SqlBuilder::new()
        .create_database(&settings.database_name)
        .build();
    conn.execute(create.as_str()).await?;

    info!(database = %settings.database_name, "recreated database");
    Ok(())
}

/// Drop and recreate the vector extension and all three tables.
pub async fn create_tables(pool: &PgPool) -> Result<()> {
    let extension = SqlBuilder::new()
        .create_extension("IF NOT EXISTS vector")
        .build();
    pool.execute(extension.as_str()).await?;

    // Children first, parents last.
    for table in TABLES {
        let drop = SqlBuilder::new().drop_table().if_exists(table).build();
        pool.execute(drop.as_str()).await?;
    }

    let semesters = SqlBuilder::new()
        .create_table("semesters", &semesters_columns())
        .build();
    pool.execute(semesters.as_str()).await?;

    let posts = SqlBuilder::new()
        .create_table("posts", &posts_columns())
        .build();
    pool.execute(posts.as_str()).await?;

    let embeddings = SqlBuilder::new()
        .create_table("embeddings", &embeddings_columns())
        .build();
    pool.execute(embeddings.as_str()).await?;

    info!("created tables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_column_matches_embedder_dimensions() {
        let columns = embeddings_columns();
        assert!(columns
            .iter()
            .any(|c| c == &format!("embedding vector({}) NOT NULL", GEMINI_DIMENSIONS)));
    }

    #[test]
    fn table_ddl_renders() {
        let sql = SqlBuilder::new()
            .create_table("semesters", &semesters_columns())
            .build();
        assert_eq!(
            sql,
            "CREATE TABLE semesters (semester_id SERIAL PRIMARY KEY, \
             semester_name VARCHAR(255), semester_piazza_code TEXT UNIQUE);"
        );
    }

    #[test]
    fn posts_table_has_composite_key() {
        let sql = SqlBuilder::new()
            .create_table("posts", &posts_columns())
            .build();
        assert!(sql.contains("PRIMARY KEY(semester_id, post_id)"));
    }
}

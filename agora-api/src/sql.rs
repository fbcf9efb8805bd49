//! Fluent SQL statement assembly.
//!
//! [`SqlBuilder`] accumulates clauses through method chaining and renders
//! them as a single statement. It performs no validation; callers own the
//! grammar. Dynamic values belong in `$n` placeholders bound through sqlx
//! at execution time, never spliced into the clause text.
//!
//! ```
//! use agora_api::sql::SqlBuilder;
//!
//! let sql = SqlBuilder::new()
//!     .select(&["post_id", "post_title"])
//!     .from(&["posts"])
//!     .where_("semester_id = $1")
//!     .build();
//! assert_eq!(sql, "SELECT post_id, post_title FROM posts WHERE semester_id = $1;");
//! ```

/// Clause accumulator for PostgreSQL statements.
///
/// Every method appends one clause and returns the builder, so statements
/// read top to bottom like the SQL they produce. [`SqlBuilder::build`]
/// consumes the builder; a fresh one is needed per statement.
#[derive(Debug, Default)]
pub struct SqlBuilder {
    clauses: Vec<String>,
}

fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the accumulated clauses as `clause clause ...;`.
    pub fn build(self) -> String {
        format!("{};", self.clauses.join(" "))
    }

    fn push(mut self, clause: String) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn select<S: AsRef<str>>(self, columns: &[S]) -> Self {
        let list = join(columns);
        self.push(format!("SELECT {}", list))
    }

    pub fn from<S: AsRef<str>>(self, tables: &[S]) -> Self {
        let list = join(tables);
        self.push(format!("FROM {}", list))
    }

    /// CTE header, e.g. `with("similar AS")` followed by a parenthesized
    /// subquery.
    pub fn with(self, table: &str) -> Self {
        self.push(format!("WITH {}", table))
    }

    pub fn where_(self, condition: &str) -> Self {
        self.push(format!("WHERE {}", condition))
    }

    pub fn and_(self, condition: &str) -> Self {
        self.push(format!("AND {}", condition))
    }

    pub fn or_(self, condition: &str) -> Self {
        self.push(format!("OR {}", condition))
    }

    pub fn not(self) -> Self {
        self.push("NOT".to_string())
    }

    pub fn on(self, condition: &str) -> Self {
        self.push(format!("ON {}", condition))
    }

    pub fn left_join(self, table: &str) -> Self {
        self.push(format!("LEFT JOIN {}", table))
    }

    pub fn right_join(self, table: &str) -> Self {
        self.push(format!("RIGHT JOIN {}", table))
    }

    pub fn full_outer_join(self, table: &str) -> Self {
        self.push(format!("FULL OUTER JOIN {}", table))
    }

    pub fn having(self, condition: &str) -> Self {
        self.push(format!("HAVING {}", condition))
    }

    pub fn union(self) -> Self {
        self.push("UNION".to_string())
    }

    pub fn insert_into<S: AsRef<str>>(self, table: &str, columns: &[S]) -> Self {
        let list = join(columns);
        self.push(format!("INSERT INTO {} ({})", table, list))
    }

    pub fn values<R, S>(self, rows: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let rendered = rows
            .iter()
            .map(|row| format!("({})", join(row.as_ref())))
            .collect::<Vec<_>>()
            .join(", ");
        self.push(format!("VALUES {}", rendered))
    }

    pub fn order_by<S: AsRef<str>>(self, columns: &[S]) -> Self {
        let list = join(columns);
        self.push(format!("ORDER BY {}", list))
    }

    pub fn group_by<S: AsRef<str>>(self, columns: &[S]) -> Self {
        let list = join(columns);
        self.push(format!("GROUP BY {}", list))
    }

    pub fn limit(self, limit: i64) -> Self {
        self.push(format!("LIMIT {}", limit))
    }

    pub fn create_table<S: AsRef<str>>(self, table: &str, columns: &[S]) -> Self {
        let list = join(columns);
        self.push(format!("CREATE TABLE {} ({})", table, list))
    }

    pub fn drop_table(self) -> Self {
        self.push("DROP TABLE".to_string())
    }

    pub fn create_database(self, database: &str) -> Self {
        self.push(format!("CREATE DATABASE {}", database))
    }

    pub fn drop_database(self) -> Self {
        self.push("DROP DATABASE".to_string())
    }

    pub fn if_exists(self, name: &str) -> Self {
        self.push(format!("IF EXISTS {}", name))
    }

    pub fn create_extension(self, extension: &str) -> Self {
        self.push(format!("CREATE EXTENSION {}", extension))
    }

    /// Opening parenthesis, for subqueries.
    pub fn open_paren(self) -> Self {
        self.push("(".to_string())
    }

    /// Closing parenthesis.
    pub fn close_paren(self) -> Self {
        self.push(")".to_string())
    }
}

//! One-off forum ingestion.
//!
//! [`PostScraper`] walks a course forum post by post, cleans and embeds the
//! text, and writes posts plus per-sentence embeddings into the database.
//! The walk is sequential; the forum rate-limits aggressively, so the loop
//! sleeps between posts and refreshes its session at a fixed cadence.

mod sanitize;
mod schema;
mod scraper;
mod source;

pub use sanitize::strip_html;
pub use schema::{create_tables, recreate_database};
pub use scraper::{PostScraper, ScrapeConfig, ScrapeStats};
pub use source::{CourseRef, ForumPost, PiazzaPostSource, PostSource};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{join_themes, split_themes, ClassifiedFeedback, FeedbackRecord};

/// Opens the SQLite pool, creating the database file on first use.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedbacks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            productId TEXT NOT NULL,
            rating INTEGER NOT NULL,
            review TEXT NOT NULL,
            sentiment TEXT NOT NULL,
            themes TEXT NOT NULL DEFAULT ''
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Both read endpoints filter on the product
    sqlx::query("CREATE INDEX IF NOT EXISTS ix_feedbacks_productId ON feedbacks (productId);")
        .execute(pool)
        .await?;

    Ok(())
}

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: i64,
    #[sqlx(rename = "productId")]
    product_id: String,
    rating: i64,
    review: String,
    sentiment: String,
    themes: String,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = Error;

    fn try_from(row: FeedbackRow) -> Result<Self> {
        Ok(FeedbackRecord {
            id: row.id,
            product_id: row.product_id,
            rating: row.rating,
            review: row.review,
            sentiment: row.sentiment.parse()?,
            themes: split_themes(&row.themes)?,
        })
    }
}

/// Append-only access to the `feedbacks` table.
///
/// Every call checks out its own pooled connection, which goes back to the
/// pool when the call returns or fails.
#[derive(Clone)]
pub struct FeedbackStore {
    pool: SqlitePool,
}

impl FeedbackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a classified submission and returns it with its new id.
    pub async fn create(&self, feedback: ClassifiedFeedback) -> Result<FeedbackRecord> {
        let mut conn = self.pool.acquire().await?;

        let themes = join_themes(feedback.themes());
        let result = sqlx::query(
            "INSERT INTO feedbacks (productId, rating, review, sentiment, themes) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(feedback.product_id())
        .bind(feedback.rating())
        .bind(feedback.review())
        .bind(feedback.sentiment().as_str())
        .bind(&themes)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        debug!(
            "Stored feedback {} for {}: {} [{}]",
            id,
            feedback.product_id(),
            feedback.sentiment(),
            themes
        );
        Ok(feedback.into_record(id))
    }

    /// All records for `product_id`, oldest first. Unknown products yield an
    /// empty list.
    pub async fn list_by_product(&self, product_id: &str) -> Result<Vec<FeedbackRecord>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<FeedbackRow> = sqlx::query_as(
            r#"SELECT id, productId, rating, review, sentiment, themes
               FROM feedbacks WHERE productId = ? ORDER BY id"#,
        )
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(FeedbackRecord::try_from).collect()
    }
}

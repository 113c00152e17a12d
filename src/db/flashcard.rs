use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct FlashcardStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Flashcard {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// None means uncategorized.
    pub category_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl FlashcardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new flashcard. Returns the flashcard ID.
    pub async fn create(
        &self,
        question: &str,
        answer: &str,
        category_id: Option<i64>,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO flashcards (question, answer, category_id) VALUES (?, ?, ?)")
                .bind(question)
                .bind(answer)
                .bind(category_id)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a flashcard by ID.
    pub async fn get(&self, id: i64) -> Result<Option<Flashcard>, sqlx::Error> {
        let row: Option<Flashcard> = sqlx::query_as(
            "SELECT id, question, answer, category_id, created_at, updated_at
             FROM flashcards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// List all flashcards.
    pub async fn list(&self) -> Result<Vec<Flashcard>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, question, answer, category_id, created_at, updated_at
             FROM flashcards ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Partially update a flashcard; only supplied fields change.
    pub async fn update(
        &self,
        id: i64,
        question: Option<&str>,
        answer: Option<&str>,
        category_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE flashcards SET
                question = COALESCE(?, question),
                answer = COALESCE(?, answer),
                category_id = COALESCE(?, category_id),
                updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(question)
        .bind(answer)
        .bind(category_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a flashcard by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM flashcards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

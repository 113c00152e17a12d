use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct AssignmentStore {
    pool: SqlitePool,
}

/// Links a user to a flashcard assigned to them.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Assignment {
    pub id: i64,
    pub user_id: i64,
    pub flashcard_id: i64,
    pub assigned_at: String,
}

impl AssignmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Assign a flashcard to a user. Returns the assignment ID.
    pub async fn create(&self, user_id: i64, flashcard_id: i64) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO assignments (user_id, flashcard_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(flashcard_id)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get an assignment by ID.
    pub async fn get(&self, id: i64) -> Result<Option<Assignment>, sqlx::Error> {
        let row: Option<Assignment> = sqlx::query_as(
            "SELECT id, user_id, flashcard_id, assigned_at FROM assignments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// List all assignments.
    pub async fn list(&self) -> Result<Vec<Assignment>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, user_id, flashcard_id, assigned_at FROM assignments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// List assignments for one user.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Assignment>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, user_id, flashcard_id, assigned_at
             FROM assignments WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete an assignment by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct ProgressStore {
    pool: SqlitePool,
}

/// Learning status of one user on one flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "NOT_STARTED",
            ProgressStatus::InProgress => "IN_PROGRESS",
            ProgressStatus::Completed => "COMPLETED",
        }
    }

    /// Parse a status from API input. Unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOT_STARTED" => Some(ProgressStatus::NotStarted),
            "IN_PROGRESS" => Some(ProgressStatus::InProgress),
            "COMPLETED" => Some(ProgressStatus::Completed),
            _ => None,
        }
    }

    fn from_db(s: &str) -> Self {
        Self::parse(s).unwrap_or(ProgressStatus::NotStarted)
    }
}

/// A user's progress on one flashcard.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub user_id: i64,
    pub flashcard_id: i64,
    pub status: ProgressStatus,
    pub times_reviewed: i64,
    pub last_reviewed: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ProgressRow {
    id: i64,
    user_id: i64,
    flashcard_id: i64,
    status: String,
    times_reviewed: i64,
    last_reviewed: Option<String>,
}

impl From<ProgressRow> for ProgressRecord {
    fn from(row: ProgressRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            flashcard_id: row.flashcard_id,
            status: ProgressStatus::from_db(&row.status),
            times_reviewed: row.times_reviewed,
            last_reviewed: row.last_reviewed,
        }
    }
}

impl ProgressStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a progress record in the NOT_STARTED state with zero reviews.
    /// Returns the record ID.
    pub async fn create(&self, user_id: i64, flashcard_id: i64) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO progress (user_id, flashcard_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(flashcard_id)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a progress record by ID.
    pub async fn get(&self, id: i64) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let row: Option<ProgressRow> = sqlx::query_as(
            "SELECT id, user_id, flashcard_id, status, times_reviewed, last_reviewed
             FROM progress WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ProgressRecord::from))
    }

    /// List all progress records.
    pub async fn list(&self) -> Result<Vec<ProgressRecord>, sqlx::Error> {
        let rows: Vec<ProgressRow> = sqlx::query_as(
            "SELECT id, user_id, flashcard_id, status, times_reviewed, last_reviewed
             FROM progress ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ProgressRecord::from).collect())
    }

    /// List progress records for one user.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<ProgressRecord>, sqlx::Error> {
        let rows: Vec<ProgressRow> = sqlx::query_as(
            "SELECT id, user_id, flashcard_id, status, times_reviewed, last_reviewed
             FROM progress WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ProgressRecord::from).collect())
    }

    /// Record a review: set the status, increment the review counter, and
    /// stamp the review time. Backward status transitions are permitted.
    pub async fn record_review(
        &self,
        id: i64,
        status: ProgressStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE progress SET
                status = ?,
                times_reviewed = times_reviewed + 1,
                last_reviewed = datetime('now')
             WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a progress record by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM progress WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            ProgressStatus::NotStarted,
            ProgressStatus::InProgress,
            ProgressStatus::Completed,
        ] {
            assert_eq!(ProgressStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(ProgressStatus::parse("DONE"), None);
        assert_eq!(ProgressStatus::parse("completed"), None);
    }
}

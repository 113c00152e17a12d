use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct CategoryStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl CategoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new category. Returns the category ID.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a category by ID.
    pub async fn get(&self, id: i64) -> Result<Option<Category>, sqlx::Error> {
        let row: Option<Category> =
            sqlx::query_as("SELECT id, name, description FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    /// List all categories.
    pub async fn list(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, description FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Check whether a category name is already used.
    pub async fn name_taken(&self, name: &str) -> Result<bool, sqlx::Error> {
        let count: (i32,) = sqlx::query_as("SELECT COUNT(*) FROM categories WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// Partially update a category; only supplied fields change.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET
                name = COALESCE(?, name),
                description = COALESCE(?, description)
             WHERE id = ?",
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a category by ID. Flashcards in the category are orphaned,
    /// not deleted (ON DELETE SET NULL).
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

mod assignment;
mod category;
mod flashcard;
mod progress;
mod user;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use assignment::{Assignment, AssignmentStore};
pub use category::{Category, CategoryStore};
pub use flashcard::{Flashcard, FlashcardStore};
pub use progress::{ProgressRecord, ProgressStatus, ProgressStore};
pub use user::{User, UserRole, UserStore, UserSummary};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path.
    /// Use ":memory:" for an in-memory database.
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };

        let options = SqliteConnectOptions::from_str(&url)?.foreign_keys(true);

        // An in-memory database exists per connection, so the pool must not
        // hand out more than one.
        let max_connections = if path == ":memory:" { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the current schema version.
    async fn get_version(&self) -> Result<i32, sqlx::Error> {
        let result: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_version LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(result.map(|r| r.0).unwrap_or(0))
    }

    /// Set the schema version within a transaction.
    async fn set_version(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        version: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut **tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Run database migrations.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        let version = self.get_version().await?;

        if version < 1 {
            self.migrate_v1().await?;
        }

        Ok(())
    }

    /// Execute a list of queries in a transaction, then set the version.
    async fn run_migration(
        &self,
        version: i32,
        queries: &[&'static str],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for query in queries {
            sqlx::query(*query).execute(&mut *tx).await?;
        }
        Self::set_version(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn migrate_v1(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            1,
            &[
                // Users table
                "CREATE TABLE users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                    password_hash TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'USER',
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                "CREATE INDEX idx_users_email ON users(email)",
                // Categories table
                "CREATE TABLE categories (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT UNIQUE NOT NULL,
                    description TEXT
                )",
                "CREATE INDEX idx_categories_name ON categories(name)",
                // Flashcards table. A NULL category means uncategorized;
                // deleting a category orphans its flashcards.
                "CREATE TABLE flashcards (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    question TEXT NOT NULL,
                    answer TEXT NOT NULL,
                    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                "CREATE INDEX idx_flashcards_category_id ON flashcards(category_id)",
                // Assignments table
                "CREATE TABLE assignments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    flashcard_id INTEGER NOT NULL REFERENCES flashcards(id) ON DELETE CASCADE,
                    assigned_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                "CREATE INDEX idx_assignments_user_id ON assignments(user_id)",
                "CREATE INDEX idx_assignments_flashcard_id ON assignments(flashcard_id)",
                // Progress table
                "CREATE TABLE progress (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    flashcard_id INTEGER NOT NULL REFERENCES flashcards(id) ON DELETE CASCADE,
                    status TEXT NOT NULL DEFAULT 'NOT_STARTED',
                    times_reviewed INTEGER NOT NULL DEFAULT 0,
                    last_reviewed TEXT
                )",
                "CREATE INDEX idx_progress_user_id ON progress(user_id)",
                "CREATE INDEX idx_progress_flashcard_id ON progress(flashcard_id)",
            ],
        )
        .await
    }

    /// Get the user store.
    pub fn users(&self) -> UserStore {
        UserStore::new(self.pool.clone())
    }

    /// Get the category store.
    pub fn categories(&self) -> CategoryStore {
        CategoryStore::new(self.pool.clone())
    }

    /// Get the flashcard store.
    pub fn flashcards(&self) -> FlashcardStore {
        FlashcardStore::new(self.pool.clone())
    }

    /// Get the assignment store.
    pub fn assignments(&self) -> AssignmentStore {
        AssignmentStore::new(self.pool.clone())
    }

    /// Get the progress store.
    pub fn progress(&self) -> ProgressStore {
        ProgressStore::new(self.pool.clone())
    }

    /// Get the underlying connection pool (for tests that need raw SQL access).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = Database::open(":memory:").await.unwrap();

        let id = db
            .users()
            .create("alice@example.com", "digest", UserRole::User)
            .await
            .unwrap();

        let user = db
            .users()
            .get_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, UserRole::User);

        let user = db.users().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn test_duplicate_email_fails() {
        let db = Database::open(":memory:").await.unwrap();

        db.users()
            .create("alice@example.com", "digest", UserRole::User)
            .await
            .unwrap();
        let result = db
            .users()
            .create("alice@example.com", "digest", UserRole::Admin)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let db = Database::open(":memory:").await.unwrap();

        let user_id = db
            .users()
            .create("alice@example.com", "digest", UserRole::Student)
            .await
            .unwrap();
        let card_id = db
            .flashcards()
            .create("Q", "A", None)
            .await
            .unwrap();
        let assignment_id = db.assignments().create(user_id, card_id).await.unwrap();
        let progress_id = db.progress().create(user_id, card_id).await.unwrap();

        db.users().delete(user_id).await.unwrap();

        assert!(db.users().get_by_id(user_id).await.unwrap().is_none());
        assert!(db.assignments().get(assignment_id).await.unwrap().is_none());
        assert!(db.progress().get(progress_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_category_orphans_flashcards() {
        let db = Database::open(":memory:").await.unwrap();

        let cat_id = db.categories().create("Biology", None).await.unwrap();
        let card_id = db
            .flashcards()
            .create("What is a cell?", "The basic unit of life", Some(cat_id))
            .await
            .unwrap();

        db.categories().delete(cat_id).await.unwrap();

        let card = db.flashcards().get(card_id).await.unwrap().unwrap();
        assert_eq!(card.category_id, None);
    }

    #[tokio::test]
    async fn test_record_review_updates_progress() {
        let db = Database::open(":memory:").await.unwrap();

        let user_id = db
            .users()
            .create("alice@example.com", "digest", UserRole::Student)
            .await
            .unwrap();
        let card_id = db.flashcards().create("Q", "A", None).await.unwrap();
        let progress_id = db.progress().create(user_id, card_id).await.unwrap();

        let record = db.progress().get(progress_id).await.unwrap().unwrap();
        assert_eq!(record.status, ProgressStatus::NotStarted);
        assert_eq!(record.times_reviewed, 0);
        assert!(record.last_reviewed.is_none());

        db.progress()
            .record_review(progress_id, ProgressStatus::InProgress)
            .await
            .unwrap();
        db.progress()
            .record_review(progress_id, ProgressStatus::Completed)
            .await
            .unwrap();

        let record = db.progress().get(progress_id).await.unwrap().unwrap();
        assert_eq!(record.status, ProgressStatus::Completed);
        assert_eq!(record.times_reviewed, 2);
        assert!(record.last_reviewed.is_some());
    }
}

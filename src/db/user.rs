use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// User role for authorization. Closed set; role claims are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
    Student,
    Teacher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
            UserRole::Student => "STUDENT",
            UserRole::Teacher => "TEACHER",
        }
    }

    /// Parse a role from API input. Unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(UserRole::User),
            "ADMIN" => Some(UserRole::Admin),
            "STUDENT" => Some(UserRole::Student),
            "TEACHER" => Some(UserRole::Teacher),
            _ => None,
        }
    }

    /// Convert a stored role column. The schema only ever writes values
    /// produced by `as_str`, so anything else maps to the least privilege.
    fn from_db(s: &str) -> Self {
        Self::parse(s).unwrap_or(UserRole::User)
    }
}

/// Full user record. Holds the password digest and is never serialized;
/// responses go through `UserSummary`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Drop the password digest for use in API responses.
    pub fn summary(self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: UserRole::from_db(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Public user shape. Does not expose the password digest.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    id: i64,
    email: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            role: UserRole::from_db(&row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already-hashed password. Returns the user ID.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO users (email, password_hash, role) VALUES (?, ?, ?)")
            .bind(email)
            .bind(password_hash)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, role, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, role, created_at, updated_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Check whether an email is already registered.
    pub async fn email_taken(&self, email: &str) -> Result<bool, sqlx::Error> {
        let count: (i32,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// List all users without password digests.
    pub async fn list(&self) -> Result<Vec<UserSummary>, sqlx::Error> {
        let rows: Vec<UserSummaryRow> = sqlx::query_as(
            "SELECT id, email, role, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    /// Partially update a user; only supplied fields change.
    pub async fn update(
        &self,
        id: i64,
        email: Option<&str>,
        password_hash: Option<&str>,
        role: Option<UserRole>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                role = COALESCE(?, role),
                updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role.map(|r| r.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the role for a user.
    pub async fn set_role(&self, id: i64, role: UserRole) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET role = ?, updated_at = datetime('now') WHERE id = ?")
                .bind(role.as_str())
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user by ID.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Storage seams for accounts, sessions, and guest lists, plus the Postgres
//! implementation used in production.
//!
//! The traits exist so the flow can be exercised against in-memory doubles;
//! `PgStore` implements all of them against the same pool.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::session::{generate_session_token, hash_session_token};

/// A stored account row. The password hash stays inside the store/flow layers
/// and is never serialized outward.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an account. The email must already be normalized and
/// the password already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Outcome of an account insert; the unique constraint on email is the
/// authoritative duplicate check.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(AccountRecord),
    DuplicateEmail,
}

/// Minimal data attached to a valid session token.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub account_id: Uuid,
    pub first_name: String,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub account_id: Uuid,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email_normalized: &str) -> Result<Option<AccountRecord>>;
    async fn insert(&self, account: NewAccount) -> Result<InsertOutcome>;
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<AccountRecord>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session and return the raw token for the cookie.
    async fn set(&self, data: SessionData) -> Result<String>;
    async fn get(&self, token: &str) -> Result<Option<SessionData>>;
    async fn clear(&self, token: &str) -> Result<()>;
}

#[async_trait]
pub trait GuestListStore: Send + Sync {
    async fn list_activities(&self) -> Result<Vec<Activity>>;
    async fn list_subscriptions(&self, account_id: Uuid) -> Result<Vec<Subscription>>;
}

/// Postgres-backed store shared by all auth endpoints.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    session_ttl_seconds: i64,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool, session_ttl_seconds: i64) -> Self {
        Self {
            pool,
            session_ttl_seconds,
        }
    }
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> AccountRecord {
    AccountRecord {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, created_at, updated_at";

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_email(&self, email_normalized: &str) -> Result<Option<AccountRecord>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(email_normalized)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account by email")?;
        Ok(row.as_ref().map(account_from_row))
    }

    async fn insert(&self, account: NewAccount) -> Result<InsertOutcome> {
        let query = format!(
            r"
            INSERT INTO accounts (first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {ACCOUNT_COLUMNS}
        "
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(InsertOutcome::Created(account_from_row(&row))),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::DuplicateEmail),
            Err(err) => Err(err).context("failed to insert account"),
        }
    }

    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<AccountRecord>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account by id")?;
        Ok(row.as_ref().map(account_from_row))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn set(&self, data: SessionData) -> Result<String> {
        // Generate a random token, store only its hash, and return the raw
        // value so the caller can set the session cookie.
        let query = r"
            INSERT INTO sessions (token_hash, account_id, first_name, expires_at)
            VALUES ($1, $2, $3, NOW() + ($4 * INTERVAL '1 second'))
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );

        for _ in 0..3 {
            let token = generate_session_token()?;
            let token_hash = hash_session_token(&token);
            let result = sqlx::query(query)
                .bind(token_hash)
                .bind(data.account_id)
                .bind(&data.first_name)
                .bind(self.session_ttl_seconds)
                .execute(&self.pool)
                .instrument(span.clone())
                .await;

            match result {
                Ok(_) => return Ok(token),
                Err(err) if is_unique_violation(&err) => {}
                Err(err) => return Err(err).context("failed to insert session"),
            }
        }

        Err(anyhow!("failed to generate unique session token"))
    }

    async fn get(&self, token: &str) -> Result<Option<SessionData>> {
        let token_hash = hash_session_token(token);
        let query = r"
            SELECT account_id, first_name
            FROM sessions
            WHERE token_hash = $1
              AND expires_at > NOW()
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup session")?;

        Ok(row.map(|row| SessionData {
            account_id: row.get("account_id"),
            first_name: row.get("first_name"),
        }))
    }

    async fn clear(&self, token: &str) -> Result<()> {
        // Clearing is idempotent; it's fine if no rows are deleted.
        let token_hash = hash_session_token(token);
        let query = "DELETE FROM sessions WHERE token_hash = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete session")?;
        Ok(())
    }
}

#[async_trait]
impl GuestListStore for PgStore {
    async fn list_activities(&self) -> Result<Vec<Activity>> {
        let query = r"
            SELECT id, title, description, starts_at
            FROM activities
            ORDER BY starts_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to list activities")?;

        Ok(rows
            .into_iter()
            .map(|row| Activity {
                id: row.get("id"),
                title: row.get("title"),
                description: row.get("description"),
                starts_at: row.get("starts_at"),
            })
            .collect())
    }

    async fn list_subscriptions(&self, account_id: Uuid) -> Result<Vec<Subscription>> {
        let query = r"
            SELECT id, activity_id, account_id
            FROM subscriptions
            WHERE account_id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(account_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to list subscriptions")?;

        Ok(rows
            .into_iter()
            .map(|row| Subscription {
                id: row.get("id"),
                activity_id: row.get("activity_id"),
                account_id: row.get("account_id"),
            })
            .collect())
    }
}

/// True when the error is a Postgres unique constraint violation (23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().as_deref() == Some("23505");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_outcome_debug_names() {
        assert_eq!(format!("{:?}", InsertOutcome::DuplicateEmail), "DuplicateEmail");
    }

    #[test]
    fn session_data_holds_values() {
        let data = SessionData {
            account_id: Uuid::nil(),
            first_name: "Alice".to_string(),
        };
        assert_eq!(data.account_id, Uuid::nil());
        assert_eq!(data.first_name, "Alice");
    }

    #[test]
    fn unique_violation_only_for_23505() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}

//! SQLite-backed registry of push-notification device tokens.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Originating platform of a device token, inferred from the subscribing
/// request's user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Web => "web",
        }
    }

    /// Substring match; anything unrecognized counts as web.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            Some(ua) if ua.contains("Android") => Self::Android,
            Some(ua) if ua.contains("iPhone") => Self::Ios,
            _ => Self::Web,
        }
    }
}

/// One registered device token. `token` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSubscription {
    pub token: String,
    pub user_id: Option<String>,
    pub platform: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS push_subscriptions (
    token      TEXT PRIMARY KEY,
    user_id    TEXT,
    platform   TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

#[derive(Debug, Clone)]
pub struct SubscriptionRegistry {
    pool: SqlitePool,
}

impl SubscriptionRegistry {
    /// Open (creating if missing) the registry database at `path`.
    pub async fn connect(path: &Path) -> Result<Self, sqlx::Error> {
        let options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", path.display()))?
                .create_if_missing(true)
                .busy_timeout(Duration::from_secs(5))
                .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Ephemeral in-memory registry, used by tests and throwaway setups.
    /// Single-connection so the database outlives pool checkouts.
    pub async fn connect_in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Ok(Self { pool })
    }

    /// Create the schema. Idempotent; runs at every startup.
    pub async fn initialize(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Register `token`, updating the existing row when the token is already
    /// known. `created_at` is preserved across re-subscriptions; `user_id`,
    /// `platform`, and `updated_at` take the latest values.
    pub async fn upsert(
        &self,
        token: &str,
        user_id: Option<&str>,
        platform: Platform,
    ) -> Result<NotificationSubscription, sqlx::Error> {
        let now = Utc::now();

        let subscription = sqlx::query_as::<_, NotificationSubscription>(
            r#"
            INSERT INTO push_subscriptions (token, user_id, platform, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(token) DO UPDATE SET
                user_id    = excluded.user_id,
                platform   = excluded.platform,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(platform.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(platform = platform.as_str(), "subscription upserted");
        Ok(subscription)
    }

    pub async fn find(&self, token: &str) -> Result<Option<NotificationSubscription>, sqlx::Error> {
        sqlx::query_as::<_, NotificationSubscription>(
            "SELECT * FROM push_subscriptions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM push_subscriptions")
            .fetch_one(&self.pool)
            .await
    }
}

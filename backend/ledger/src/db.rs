//! Database layer: pool setup, migrations, and party-scoped lookups.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

use crate::config::Config;
use crate::errors::Result;
use crate::guard;
use crate::types::{Contract, ContractStatus, Job, Profile};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(config: &Config) -> Result<SqlitePool> {
    // Accept bare file paths as well as `sqlite:` URLs.
    let url = if config.database_url.starts_with("sqlite:") {
        config.database_url.clone()
    } else {
        format!("sqlite:{}", config.database_url)
    };

    let options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Profiles
// ─────────────────────────────────────────────────────────

/// Load one profile. Works on the pool or inside an open transaction.
pub async fn profile_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Profile>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, first_name, last_name, profession, balance, kind
        FROM   profiles
        WHERE  id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(profile)
}

// ─────────────────────────────────────────────────────────
// Contract reads
// ─────────────────────────────────────────────────────────

/// Fetch a contract only if `caller_id` is one of its parties.
pub async fn contract_for_party(
    pool: &SqlitePool,
    contract_id: i64,
    caller_id: i64,
) -> Result<Option<Contract>> {
    guard::party_contract(pool, contract_id, caller_id).await
}

/// All non-terminated contracts the caller is a party to.
pub async fn contracts_for_party(pool: &SqlitePool, caller_id: i64) -> Result<Vec<Contract>> {
    let rows = sqlx::query_as::<_, Contract>(
        r#"
        SELECT id, terms, status, client_id, contractor_id
        FROM   contracts
        WHERE  (client_id = ?1 OR contractor_id = ?1)
          AND  status <> ?2
        ORDER  BY id ASC
        "#,
    )
    .bind(caller_id)
    .bind(ContractStatus::Terminated)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Job reads
// ─────────────────────────────────────────────────────────

/// Unpaid jobs on the caller's active (`new` / `in_progress`) contracts.
pub async fn unpaid_jobs_for_party(pool: &SqlitePool, caller_id: i64) -> Result<Vec<Job>> {
    let rows = sqlx::query_as::<_, Job>(
        r#"
        SELECT j.id, j.description, j.price, j.paid, j.payment_date, j.contract_id
        FROM   jobs j
        JOIN   contracts c ON c.id = j.contract_id
        WHERE  j.paid IS NULL
          AND  (c.client_id = ?1 OR c.contractor_id = ?1)
          AND  c.status IN (?2, ?3)
        ORDER  BY j.id ASC
        "#,
    )
    .bind(caller_id)
    .bind(ContractStatus::New)
    .bind(ContractStatus::InProgress)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

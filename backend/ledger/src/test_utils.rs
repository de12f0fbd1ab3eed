//! Shared fixtures for the in-crate test modules.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::seed;
use crate::types::{ContractStatus, Job, Money, Profile};

/// A fresh in-memory database with migrations applied and the demo fixture
/// loaded.
///
/// The pool holds exactly one connection that never expires, because every
/// in-memory SQLite connection is its own database.
pub async fn setup() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    seed::seed_demo_data(&pool)
        .await
        .expect("failed to seed demo data");
    pool
}

/// A seeded database backed by a real file, for tests that need several
/// connections to contend for the write lock.
pub async fn setup_file_backed(dir: &tempfile::TempDir) -> SqlitePool {
    let config = Config {
        database_url: format!("sqlite://{}", dir.path().join("ledger.db").display()),
        api_port: 0,
        max_connections: 4,
        busy_timeout_secs: 10,
        seed_demo_data: true,
    };
    let pool = db::init_pool(&config)
        .await
        .expect("failed to open file-backed database");
    seed::seed_demo_data(&pool)
        .await
        .expect("failed to seed demo data");
    pool
}

pub async fn profile(pool: &SqlitePool, id: i64) -> Profile {
    db::profile_by_id(pool, id)
        .await
        .expect("profile query failed")
        .expect("profile missing")
}

pub async fn job(pool: &SqlitePool, id: i64) -> Job {
    sqlx::query_as::<_, Job>(
        "SELECT id, description, price, paid, payment_date, contract_id FROM jobs WHERE id = ?1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .expect("job missing")
}

pub async fn all_profiles(pool: &SqlitePool) -> Vec<Profile> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, first_name, last_name, profession, balance, kind FROM profiles ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .expect("profile scan failed")
}

pub async fn all_jobs(pool: &SqlitePool) -> Vec<Job> {
    sqlx::query_as::<_, Job>(
        "SELECT id, description, price, paid, payment_date, contract_id FROM jobs ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .expect("job scan failed")
}

pub async fn set_balance(pool: &SqlitePool, profile_id: i64, balance: Money) {
    sqlx::query("UPDATE profiles SET balance = ?1 WHERE id = ?2")
        .bind(balance)
        .bind(profile_id)
        .execute(pool)
        .await
        .expect("balance update failed");
}

pub async fn insert_contract(
    pool: &SqlitePool,
    status: ContractStatus,
    client_id: i64,
    contractor_id: i64,
) -> i64 {
    sqlx::query(
        "INSERT INTO contracts (terms, status, client_id, contractor_id) VALUES ('test', ?1, ?2, ?3)",
    )
    .bind(status)
    .bind(client_id)
    .bind(contractor_id)
    .execute(pool)
    .await
    .expect("contract insert failed")
    .last_insert_rowid()
}

pub async fn insert_job(pool: &SqlitePool, contract_id: i64, price: Money) -> i64 {
    sqlx::query("INSERT INTO jobs (description, price, contract_id) VALUES ('test', ?1, ?2)")
        .bind(price)
        .bind(contract_id)
        .execute(pool)
        .await
        .expect("job insert failed")
        .last_insert_rowid()
}

/// Insert an already-paid job at `paid_at` (Unix milliseconds).
pub async fn insert_paid_job(pool: &SqlitePool, contract_id: i64, price: Money, paid_at: i64) -> i64 {
    sqlx::query(
        "INSERT INTO jobs (description, price, paid, payment_date, contract_id) VALUES ('test', ?1, 1, ?2, ?3)",
    )
    .bind(price)
    .bind(paid_at)
    .bind(contract_id)
    .execute(pool)
    .await
    .expect("paid job insert failed")
    .last_insert_rowid()
}

pub fn dollars(amount: i64) -> Money {
    Money::from_cents(amount * 100)
}

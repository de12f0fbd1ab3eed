//! Demo fixture: four clients, four contractors, nine contracts, fourteen jobs.
//!
//! Loaded at startup when `SEED_DEMO_DATA` is set, and by the test suite.
//! Seeding replaces whatever the three tables held before.

use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::types::{ContractStatus, Money, ProfileKind};

/// Payment time shared by most seeded paid jobs: 2020-08-15T19:11:26.737Z.
const AUG_15: i64 = 1_597_518_686_737;
const DAY_MS: i64 = 86_400_000;

// (id, first_name, last_name, profession, balance in cents, kind)
const PROFILES: &[(i64, &str, &str, Option<&str>, i64, ProfileKind)] = &[
    (1, "Harry", "Potter", None, 115_000, ProfileKind::Client),
    (2, "Mr", "Robot", None, 23_111, ProfileKind::Client),
    (3, "John", "Snow", None, 45_130, ProfileKind::Client),
    (4, "Ash", "Kethcum", None, 130, ProfileKind::Client),
    (5, "John", "Lenon", Some("Musician"), 6_400, ProfileKind::Contractor),
    (6, "Linus", "Torvalds", Some("Programmer"), 121_400, ProfileKind::Contractor),
    (7, "Alan", "Turing", Some("Programmer"), 2_200, ProfileKind::Contractor),
    (8, "Aragorn", "II Elessar Telcontarvalds", Some("Fighter"), 31_400, ProfileKind::Contractor),
];

// (id, status, client_id, contractor_id)
const CONTRACTS: &[(i64, ContractStatus, i64, i64)] = &[
    (1, ContractStatus::Terminated, 1, 5),
    (2, ContractStatus::InProgress, 1, 6),
    (3, ContractStatus::InProgress, 2, 6),
    (4, ContractStatus::InProgress, 2, 7),
    (5, ContractStatus::New, 3, 8),
    (6, ContractStatus::InProgress, 3, 7),
    (7, ContractStatus::InProgress, 4, 7),
    (8, ContractStatus::InProgress, 4, 6),
    (9, ContractStatus::InProgress, 4, 8),
];

// (id, price in cents, payment time if paid, contract_id)
const JOBS: &[(i64, i64, Option<i64>, i64)] = &[
    (1, 20_000, None, 1),
    (2, 20_100, None, 2),
    (3, 20_200, None, 3),
    (4, 20_000, None, 4),
    (5, 20_000, None, 7),
    (6, 202_000, Some(AUG_15), 7),
    (7, 20_000, Some(AUG_15), 2),
    (8, 20_000, Some(AUG_15), 3),
    (9, 20_000, Some(AUG_15 + 2 * DAY_MS), 1),
    (10, 20_000, Some(AUG_15 + 2 * DAY_MS), 5),
    (11, 2_100, Some(AUG_15 - 5 * DAY_MS), 1),
    (12, 2_100, Some(AUG_15), 2),
    (13, 12_100, Some(AUG_15), 3),
    (14, 12_100, Some(AUG_15 - 20 * 3_600_000), 3),
];

/// Replace the contents of every table with the demo fixture.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM jobs").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM contracts").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM profiles").execute(&mut *tx).await?;

    for &(id, first_name, last_name, profession, balance, kind) in PROFILES {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, first_name, last_name, profession, balance, kind)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(profession)
        .bind(Money::from_cents(balance))
        .bind(kind)
        .execute(&mut *tx)
        .await?;
    }

    for &(id, status, client_id, contractor_id) in CONTRACTS {
        sqlx::query(
            r#"
            INSERT INTO contracts (id, terms, status, client_id, contractor_id)
            VALUES (?1, 'bla bla bla', ?2, ?3, ?4)
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(client_id)
        .bind(contractor_id)
        .execute(&mut *tx)
        .await?;
    }

    for &(id, price, paid_at, contract_id) in JOBS {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, description, price, paid, payment_date, contract_id)
            VALUES (?1, 'work', ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id)
        .bind(Money::from_cents(price))
        .bind(paid_at.map(|_| true))
        .bind(paid_at)
        .bind(contract_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        profiles = PROFILES.len(),
        contracts = CONTRACTS.len(),
        jobs = JOBS.len(),
        "Demo data seeded"
    );
    Ok(())
}

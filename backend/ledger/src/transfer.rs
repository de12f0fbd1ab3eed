//! Transfer engine: job settlement and capped deposits.
//!
//! Each operation runs in a single SQLite transaction. The first statement
//! of every transaction is a conditional `UPDATE`, which takes the database
//! write lock before anything is read, so the decision and the write it
//! guards can never interleave with another transfer. Business-rule
//! rejections roll the transaction back before the error is returned; any
//! other early return drops the handle, which also rolls back.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{info, instrument, warn};

use crate::db;
use crate::errors::{LedgerError, Result};
use crate::guard;
use crate::types::{ContractStatus, Job, Money, Profile, ProfileKind};

/// Pay for a job: move its price from the client to the contractor and mark
/// it paid.
///
/// Only the contract's client may settle. Returns the updated job.
#[instrument(skip(pool))]
pub async fn settle_job(pool: &SqlitePool, job_id: i64, caller_id: i64) -> Result<Job> {
    let mut tx = pool.begin().await?;

    let paid_at = Utc::now().timestamp_millis();
    let claimed = sqlx::query(
        r#"
        UPDATE jobs
        SET    paid = 1, payment_date = ?1
        WHERE  id = ?2
          AND  paid IS NULL
          AND  contract_id IN (SELECT id FROM contracts WHERE client_id = ?3)
        "#,
    )
    .bind(paid_at)
    .bind(job_id)
    .bind(caller_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        // Not the caller's job, or someone already paid it.
        let err = match guard::client_job(&mut *tx, job_id, caller_id).await {
            Ok(job) => {
                debug_assert!(job.is_paid(), "unclaimable job {} is unpaid", job.id);
                LedgerError::AlreadySettled(job.id)
            }
            Err(err) => err,
        };
        tx.rollback().await?;
        warn!(error = %err, "Settlement rejected");
        return Err(err);
    }

    let job = guard::client_job(&mut *tx, job_id, caller_id).await?;
    let contractor_id: i64 =
        sqlx::query_scalar("SELECT contractor_id FROM contracts WHERE id = ?1")
            .bind(job.contract_id)
            .fetch_one(&mut *tx)
            .await?;

    let debited = sqlx::query(
        r#"
        UPDATE profiles
        SET    balance = balance - ?1
        WHERE  id = ?2
          AND  balance >= ?1
        "#,
    )
    .bind(job.price)
    .bind(caller_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if debited == 0 {
        let err = LedgerError::InsufficientFunds { price: job.price };
        tx.rollback().await?;
        warn!(error = %err, "Settlement rejected");
        return Err(err);
    }

    let credited = sqlx::query("UPDATE profiles SET balance = balance + ?1 WHERE id = ?2")
        .bind(job.price)
        .bind(contractor_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if credited == 0 {
        tx.rollback().await?;
        return Err(LedgerError::NotFound(format!(
            "Contractor '{contractor_id}' not found"
        )));
    }

    tx.commit().await?;
    info!(contractor_id, price = %job.price, paid_at = ?job.paid_at(), "Job settled");
    Ok(job)
}

/// Top up a contractor's balance on behalf of a client.
///
/// The amount may not exceed a quarter of the total price of all jobs on
/// `in_progress` contracts between exactly this client and contractor. The
/// client's own balance is not touched. Returns the updated contractor.
#[instrument(skip(pool))]
pub async fn deposit_to_contractor(
    pool: &SqlitePool,
    client_id: i64,
    contractor_id: i64,
    amount: Money,
) -> Result<Profile> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidInput(format!(
            "Deposit amount must be positive, got '{amount}'"
        )));
    }

    let mut tx = pool.begin().await?;

    let credited = sqlx::query(
        r#"
        UPDATE profiles
        SET    balance = balance + ?1
        WHERE  id = ?2
          AND  kind = ?4
          AND  ?1 * 4 <= (
                 SELECT COALESCE(SUM(j.price), 0)
                 FROM   jobs j
                 JOIN   contracts c ON c.id = j.contract_id
                 WHERE  c.client_id = ?3
                   AND  c.contractor_id = ?2
                   AND  c.status = ?5
               )
        "#,
    )
    .bind(amount)
    .bind(contractor_id)
    .bind(client_id)
    .bind(ProfileKind::Contractor)
    .bind(ContractStatus::InProgress)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if credited == 0 {
        let err = match db::profile_by_id(&mut *tx, contractor_id).await? {
            None => LedgerError::NotFound(format!("Contractor '{contractor_id}' not found")),
            Some(profile) if profile.kind != ProfileKind::Contractor => {
                LedgerError::InvalidTarget(contractor_id)
            }
            Some(_) => {
                let basis = in_progress_volume(&mut *tx, client_id, contractor_id).await?;
                LedgerError::CapExceeded {
                    amount,
                    contractor_id,
                    cap: basis.quarter(),
                }
            }
        };
        tx.rollback().await?;
        warn!(error = %err, "Deposit rejected");
        return Err(err);
    }

    let contractor = db::profile_by_id(&mut *tx, contractor_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("Contractor '{contractor_id}' not found")))?;

    tx.commit().await?;
    info!(balance = %contractor.balance, "Deposit credited");
    Ok(contractor)
}

/// Total price of every job on `in_progress` contracts between the pair.
pub async fn in_progress_volume<'e, E>(
    executor: E,
    client_id: i64,
    contractor_id: i64,
) -> Result<Money>
where
    E: Executor<'e, Database = Sqlite>,
{
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(j.price), 0)
        FROM   jobs j
        JOIN   contracts c ON c.id = j.contract_id
        WHERE  c.client_id = ?1
          AND  c.contractor_id = ?2
          AND  c.status = ?3
        "#,
    )
    .bind(client_id)
    .bind(contractor_id)
    .bind(ContractStatus::InProgress)
    .fetch_one(executor)
    .await?;
    Ok(Money::from_cents(total))
}

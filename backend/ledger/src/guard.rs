//! Authorization guard.
//!
//! A caller may only see or act on a contract (and its jobs) when it is the
//! client or contractor of record. The check is always part of the query that
//! loads the record, inside whatever transaction the operation runs in, and a
//! failed check looks exactly like a missing record.

use sqlx::{Executor, Sqlite};

use crate::errors::{LedgerError, Result};
use crate::types::{Contract, Job};

/// The error returned for a job that is missing or not the caller's.
pub fn job_not_found(job_id: i64) -> LedgerError {
    LedgerError::NotFound(format!("Job '{job_id}' is not found"))
}

/// Load a job whose contract has `caller_id` as the client.
pub async fn client_job<'e, E>(executor: E, job_id: i64, caller_id: i64) -> Result<Job>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Job>(
        r#"
        SELECT j.id, j.description, j.price, j.paid, j.payment_date, j.contract_id
        FROM   jobs j
        JOIN   contracts c ON c.id = j.contract_id
        WHERE  j.id = ?1
          AND  c.client_id = ?2
        "#,
    )
    .bind(job_id)
    .bind(caller_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| job_not_found(job_id))
}

/// Load a contract if `caller_id` is either party to it.
pub async fn party_contract<'e, E>(
    executor: E,
    contract_id: i64,
    caller_id: i64,
) -> Result<Option<Contract>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let contract = sqlx::query_as::<_, Contract>(
        r#"
        SELECT id, terms, status, client_id, contractor_id
        FROM   contracts
        WHERE  id = ?1
          AND  (client_id = ?2 OR contractor_id = ?2)
        "#,
    )
    .bind(contract_id)
    .bind(caller_id)
    .fetch_optional(executor)
    .await?;
    Ok(contract)
}

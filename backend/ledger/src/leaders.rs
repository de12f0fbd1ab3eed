//! Earnings reports over settled jobs.
//!
//! Both reports scan paid jobs whose payment falls inside an inclusive date
//! window and whose contract is `in_progress` or `completed`. They are plain
//! reads against the pool and never open a transaction.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::errors::{LedgerError, Result};
use crate::types::{ContractStatus, Money, ProfileKind};

/// Number of clients returned when no usable limit is supplied.
pub const DEFAULT_CLIENT_LIMIT: u32 = 2;

/// An inclusive `[start, end]` range of payment times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(LedgerError::InvalidInput(
                "The 'start' date must not be after the 'end' date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Build a window from raw query parameters.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let (Some(start), Some(end)) = (non_blank(start), non_blank(end)) else {
            return Err(LedgerError::InvalidInput(
                "Please set both start/end query params".to_string(),
            ));
        };
        let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
            return Err(LedgerError::InvalidInput(
                "Please set both start/end query params as ISO dates".to_string(),
            ));
        };
        Self::new(start, end)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a caller-supplied date.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff] ±HH:MM`, the same without an
/// offset (read as UTC), and a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f %z"] {
        if let Ok(at) = DateTime::parse_from_str(raw, format) {
            return Some(at.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// Read the `limit` parameter leniently: anything missing, non-numeric or
/// not positive falls back to [`DEFAULT_CLIENT_LIMIT`].
pub fn coerce_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_CLIENT_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub earnings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientSpending {
    pub id: i64,
    pub paid: Money,
    pub full_name: String,
}

/// The contractor profession with the highest total earnings in the window.
///
/// Ties go to the alphabetically first profession. `None` when nothing was
/// paid in the window.
pub async fn best_profession(
    pool: &SqlitePool,
    window: &DateWindow,
) -> Result<Option<ProfessionEarnings>> {
    debug!(start = %window.start, end = %window.end, "Computing best profession");
    let top = sqlx::query_as::<_, ProfessionEarnings>(
        r#"
        SELECT p.profession  AS profession,
               SUM(j.price)  AS earnings
        FROM   jobs j
        JOIN   contracts c ON c.id = j.contract_id
        JOIN   profiles  p ON p.id = c.contractor_id
        WHERE  j.paid = 1
          AND  j.payment_date BETWEEN ?1 AND ?2
          AND  c.status IN (?3, ?4)
          AND  p.kind = ?5
          AND  p.profession IS NOT NULL
        GROUP  BY p.profession
        ORDER  BY earnings DESC, profession ASC
        LIMIT  1
        "#,
    )
    .bind(window.start.timestamp_millis())
    .bind(window.end.timestamp_millis())
    .bind(ContractStatus::InProgress)
    .bind(ContractStatus::Completed)
    .bind(ProfileKind::Contractor)
    .fetch_optional(pool)
    .await?;
    Ok(top)
}

/// Clients ranked by how much they paid in the window, highest first.
///
/// Ties go to the lower client id. Empty when nothing was paid.
pub async fn best_clients(
    pool: &SqlitePool,
    window: &DateWindow,
    limit: u32,
) -> Result<Vec<ClientSpending>> {
    debug!(start = %window.start, end = %window.end, limit, "Computing best clients");
    let rows = sqlx::query_as::<_, ClientSpending>(
        r#"
        SELECT p.id                                AS id,
               SUM(j.price)                        AS paid,
               p.first_name || ' ' || p.last_name  AS full_name
        FROM   jobs j
        JOIN   contracts c ON c.id = j.contract_id
        JOIN   profiles  p ON p.id = c.client_id
        WHERE  j.paid = 1
          AND  j.payment_date BETWEEN ?1 AND ?2
          AND  c.status IN (?3, ?4)
        GROUP  BY p.id
        ORDER  BY SUM(j.price) DESC, p.id ASC
        LIMIT  ?5
        "#,
    )
    .bind(window.start.timestamp_millis())
    .bind(window.end.timestamp_millis())
    .bind(ContractStatus::InProgress)
    .bind(ContractStatus::Completed)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

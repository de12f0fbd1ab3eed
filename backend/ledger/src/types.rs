//! # Types
//!
//! Shared data structures for the ledger: profiles (accounts), contracts and
//! jobs, plus the [`Money`] amount type.
//!
//! ## Design decisions
//!
//! ### Money in minor units
//!
//! Balances and prices are integer cents inside the process and in SQLite.
//! [`Money`] converts to and from [`Decimal`] only at the API boundary, so
//! every comparison the transfer engine makes is exact.
//!
//! ### Contract status
//!
//! [`ContractStatus`] transitions are owned by an external workflow; this
//! crate only reads the status to decide eligibility:
//!
//! ```text
//! New ──► InProgress ──► Completed
//!  └──────────┴──────────► Terminated
//! ```
//!
//! `Terminated` contracts are frozen and hidden from the party listings.
//!
//! ### Paid flag
//!
//! A job's `paid` column is NULL until settlement and `1` afterwards; the
//! payment timestamp is written in the same statement.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A non-fractional count of cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.cents(), 2)
    }

    /// Convert a decimal amount, refusing anything finer than a cent.
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let scaled = amount.checked_mul(Decimal::ONE_HUNDRED)?;
        if !scaled.fract().is_zero() {
            return None;
        }
        scaled.to_i64().map(Money)
    }

    pub fn is_positive(self) -> bool {
        self > Money::ZERO
    }

    /// A quarter of `self`, truncated to whole cents. Used for reporting only.
    pub fn quarter(self) -> Money {
        Money(self.0 / 4)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal().normalize())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Money::from_decimal(amount).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "amount '{amount}' has more than two decimal places"
            ))
        })
    }
}

/// Role of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProfileKind {
    Client,
    Contractor,
}

/// An account holding a balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Only meaningful for contractors.
    pub profession: Option<String>,
    pub balance: Money,
    #[serde(rename = "type")]
    pub kind: ProfileKind,
}

/// Lifecycle status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
    Completed,
}

/// A time-bounded agreement between one client and one contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    pub terms: String,
    pub status: ContractStatus,
    pub client_id: i64,
    pub contractor_id: i64,
}

/// A billable unit of work under a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub description: String,
    pub price: Money,
    /// `None` until settled.
    pub paid: Option<bool>,
    /// Unix milliseconds, set together with `paid`.
    #[serde(serialize_with = "serialize_millis")]
    pub payment_date: Option<i64>,
    pub contract_id: i64,
}

impl Job {
    pub fn is_paid(&self) -> bool {
        self.paid == Some(true)
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.payment_date.and_then(DateTime::from_timestamp_millis)
    }
}

fn serialize_millis<S: Serializer>(millis: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    match millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(at) => serializer.serialize_some(&at.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

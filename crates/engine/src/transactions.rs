//! Ledger transaction primitives.
//!
//! A `Transaction` is a single ledger row owned by exactly one user. The
//! expense side of the ledger is the authoritative source for budget
//! `spent` caches, so every mutation here flows through the consistency
//! logic in `ops`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Frequency};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// How the row entered the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    #[default]
    Manual,
    Receipt,
}

impl TransactionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Receipt => "receipt",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "receipt" => Some(Self::Receipt),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: String,
    pub currency: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub next_due_date: Option<NaiveDate>,
    pub source: TransactionSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub category: String,
    pub currency: String,
    pub date: Date,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub next_due_date: Option<Date>,
    pub source: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            owner_id: ActiveValue::Set(tx.owner_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            category: ActiveValue::Set(tx.category.clone()),
            currency: ActiveValue::Set(tx.currency.clone()),
            date: ActiveValue::Set(tx.date),
            description: ActiveValue::Set(tx.description.clone()),
            merchant: ActiveValue::Set(tx.merchant.clone()),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            is_recurring: ActiveValue::Set(tx.is_recurring),
            frequency: ActiveValue::Set(tx.frequency.map(|f| f.as_str().to_string())),
            next_due_date: ActiveValue::Set(tx.next_due_date),
            source: ActiveValue::Set(tx.source.as_str().to_string()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            owner_id: model.owner_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            category: model.category,
            currency: model.currency,
            date: model.date,
            description: model.description,
            merchant: model.merchant,
            payment_method: model.payment_method,
            is_recurring: model.is_recurring,
            // Lenient on read: an unrecognized frequency behaves like a
            // non-recurring row instead of poisoning every list query.
            frequency: model.frequency.as_deref().and_then(Frequency::parse),
            next_due_date: model.next_due_date,
            source: TransactionSource::parse(&model.source).unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

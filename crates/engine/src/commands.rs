//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Frequency, TransactionKind, TransactionSource};

/// Create a ledger transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub owner_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: String,
    /// Three-letter code; defaults to `USD` when absent.
    pub currency: Option<String>,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    /// Only honored on non-recurring rows; recurring rows always get their
    /// due date projected from `date` + `frequency`.
    pub next_due_date: Option<NaiveDate>,
    pub source: TransactionSource,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        owner_id: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            kind,
            amount_minor,
            category: category.into(),
            currency: None,
            date,
            description: None,
            merchant: None,
            payment_method: None,
            is_recurring: false,
            frequency: None,
            next_due_date: None,
            source: TransactionSource::Manual,
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    #[must_use]
    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurring = true;
        self.frequency = Some(frequency);
        self
    }

    #[must_use]
    pub fn source(mut self, source: TransactionSource) -> Self {
        self.source = source;
        self
    }
}

/// Full-replace update of a ledger transaction.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub owner_id: String,
    pub transaction_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category: String,
    pub currency: Option<String>,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub next_due_date: Option<NaiveDate>,
}

/// Create a budget for one `(category, month, year)` key.
#[derive(Clone, Debug)]
pub struct NewBudgetCmd {
    pub owner_id: String,
    pub category: String,
    pub month: u32,
    pub year: i32,
    pub limit_minor: i64,
    pub alert_threshold_bps: Option<i64>,
}

/// Full-replace update of a budget; moving it to an occupied key is
/// rejected.
#[derive(Clone, Debug)]
pub struct UpdateBudgetCmd {
    pub owner_id: String,
    pub budget_id: Uuid,
    pub category: String,
    pub month: u32,
    pub year: i32,
    pub limit_minor: i64,
    pub alert_threshold_bps: Option<i64>,
}

/// Create a savings goal.
#[derive(Clone, Debug)]
pub struct NewGoalCmd {
    pub owner_id: String,
    pub name: String,
    pub target_minor: i64,
    /// Defaults to 0.
    pub current_minor: Option<i64>,
    pub target_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Update a savings goal. `current_minor` is kept unchanged when absent.
#[derive(Clone, Debug)]
pub struct UpdateGoalCmd {
    pub owner_id: String,
    pub goal_id: Uuid,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: Option<i64>,
    pub target_date: Option<NaiveDate>,
    pub description: Option<String>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionSource {
        Manual,
        Receipt,
    }

    /// Request body for creating a transaction.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category: String,
        /// Three-letter code; defaults to USD.
        pub currency: Option<String>,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub merchant: Option<String>,
        pub payment_method: Option<String>,
        #[serde(default)]
        pub is_recurring: bool,
        pub frequency: Option<Frequency>,
        /// Ignored for recurring transactions: their due date is always
        /// projected from `date` + `frequency`.
        pub next_due_date: Option<NaiveDate>,
    }

    /// Request body for updating a transaction (full replace).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category: String,
        pub currency: Option<String>,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub merchant: Option<String>,
        pub payment_method: Option<String>,
        #[serde(default)]
        pub is_recurring: bool,
        pub frequency: Option<Frequency>,
        pub next_due_date: Option<NaiveDate>,
    }

    /// Query parameters for listing transactions. Date bounds inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub category: Option<String>,
        pub kind: Option<TransactionKind>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    /// Query parameters for the upcoming-recurring window.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UpcomingQuery {
        /// Days ahead, today included; defaults to 3.
        pub days: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod budget {
    use super::*;

    /// Request body for creating a budget.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        pub month: u32,
        pub year: i32,
        pub limit_minor: i64,
        pub alert_threshold_bps: Option<i64>,
    }

    /// Request body for updating a budget (full replace).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub category: String,
        pub month: u32,
        pub year: i32,
        pub limit_minor: i64,
        pub alert_threshold_bps: Option<i64>,
    }

    /// Query parameters for listing the budgets of one period.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetPeriodQuery {
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub month: u32,
        pub year: i32,
        /// First and last day of the period, derived from `(month, year)`.
        pub period_start: NaiveDate,
        pub period_end: NaiveDate,
        pub limit_minor: i64,
        pub spent_minor: i64,
        /// May be negative when the budget is overspent.
        pub remaining_minor: i64,
        /// Basis points (1 bp = 0.01%), rounded half-up.
        pub percent_used_bps: i64,
        pub alert_threshold_bps: Option<i64>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalStatus {
        Active,
        Completed,
    }

    /// Request body for creating a savings goal.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_minor: i64,
        /// Defaults to 0.
        pub current_minor: Option<i64>,
        pub target_date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    /// Request body for updating a savings goal. `current_minor` is kept
    /// unchanged when absent.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: String,
        pub target_minor: i64,
        pub current_minor: Option<i64>,
        pub target_date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    /// Request body for adding a contribution.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalContribute {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub current_minor: i64,
        /// May be negative after an over-contribution.
        pub remaining_minor: i64,
        /// Basis points, unclamped above 100%.
        pub progress_bps: i64,
        pub status: GoalStatus,
        pub target_date: Option<NaiveDate>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }
}

pub mod receipt {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ParseStatus {
        Success,
        Partial,
        Failed,
    }

    /// Request body for uploading a receipt image.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptUpload {
        pub file_name: Option<String>,
        /// Image bytes, standard base64.
        pub data_base64: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptLogView {
        pub id: Uuid,
        pub file_name: Option<String>,
        pub raw_text: String,
        pub parsed_amount_minor: Option<i64>,
        pub parsed_date: Option<NaiveDate>,
        pub parsed_merchant: Option<String>,
        pub parsed_description: Option<String>,
        pub status: ParseStatus,
        pub error_message: Option<String>,
        pub transaction_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptIngestResponse {
        pub log: ReceiptLogView,
        /// Present only when the ingestion created a ledger row.
        pub transaction: Option<super::transaction::TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptLogListResponse {
        pub logs: Vec<ReceiptLogView>,
    }
}

pub mod analytics {
    use super::*;
    use std::collections::BTreeMap;

    /// Request body for the financial advice endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdviceRequest {
        pub query: String,
        pub context: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdviceResponse {
        pub advice: String,
    }

    /// Request body for the spending-pattern analysis endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingAnalysisRequest {
        /// Free-text digest of recent transactions.
        pub summary: String,
    }

    /// Query parameters for currency conversion.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConvertQuery {
        pub from: String,
        pub to: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConvertResponse {
        pub from: String,
        pub to: String,
        pub amount_minor: i64,
        pub converted_minor: i64,
    }

    /// Query parameters for the exchange-rate table.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RatesQuery {
        pub base: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RatesResponse {
        pub base: String,
        pub rates: BTreeMap<String, f64>,
    }
}

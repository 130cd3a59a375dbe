pub use budgets::Budget;
pub use commands::{
    NewBudgetCmd, NewGoalCmd, NewTransactionCmd, UpdateBudgetCmd, UpdateGoalCmd,
    UpdateTransactionCmd,
};
pub use error::EngineError;
pub use extract::{ReceiptFields, extract_fields};
pub use goals::{GoalStatus, SavingsGoal};
pub use ops::{Engine, EngineBuilder, TransactionListFilter};
pub use period::Period;
pub use receipts::{ParseStatus, ReceiptLog};
pub use recurrence::Frequency;
pub use transactions::{Transaction, TransactionKind, TransactionSource};

mod budgets;
mod commands;
mod error;
mod extract;
mod goals;
mod money;
mod ops;
mod period;
mod receipts;
mod recurrence;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

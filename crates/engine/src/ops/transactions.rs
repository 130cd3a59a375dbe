//! Ledger mutations and the consistency orchestration around them.
//!
//! Every write captures the `(category, period, kind)` keys it touches and
//! funnels them into the budget aggregator before the surrounding database
//! transaction commits. A transaction that changes category or crosses a
//! month boundary repairs both the source and the destination budget.

use chrono::{Days, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransactionCmd, Period, ResultEngine, Transaction, TransactionKind,
    UpdateTransactionCmd, recurrence, transactions,
};

use super::{
    Engine, budgets::recompute_budget_in, normalize_currency, normalize_optional_text,
    normalize_required_name, validate_positive_amount, with_tx,
};

/// Filters for listing transactions. Date bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidInput(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let tx = build_transaction(cmd)?;
        with_tx!(self, |db_tx| {
            insert_with_budget_repair(&db_tx, &tx).await?;
            Ok(tx)
        })
    }

    /// Full-replace update.
    ///
    /// The old `(category, date, kind)` triple is captured before the row
    /// changes; if either side of the edit is an expense, the old budget key
    /// is recomputed, and the new key too when it differs.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        validate_positive_amount(cmd.amount_minor, "amount_minor")?;
        let category = normalize_required_name(&cmd.category, "category")?;
        let currency = normalize_currency(cmd.currency.as_deref())?;
        validate_recurrence(cmd.is_recurring, cmd.frequency.is_some())?;

        with_tx!(self, |db_tx| {
            let model = require_transaction(&db_tx, cmd.transaction_id, &cmd.owner_id).await?;
            let old = Transaction::try_from(model)?;

            let updated = Transaction {
                id: old.id,
                owner_id: old.owner_id.clone(),
                kind: cmd.kind,
                amount_minor: cmd.amount_minor,
                category,
                currency,
                date: cmd.date,
                description: normalize_optional_text(cmd.description.as_deref()),
                merchant: normalize_optional_text(cmd.merchant.as_deref()),
                payment_method: normalize_optional_text(cmd.payment_method.as_deref()),
                is_recurring: cmd.is_recurring,
                frequency: cmd.frequency,
                next_due_date: recurrence::project_next_due(
                    cmd.date,
                    cmd.is_recurring,
                    cmd.frequency,
                    cmd.next_due_date,
                ),
                source: old.source,
                created_at: old.created_at,
                updated_at: Utc::now(),
            };
            transactions::ActiveModel::from(&updated).update(&db_tx).await?;

            let old_key = (old.category.clone(), Period::of_date(old.date));
            let new_key = (updated.category.clone(), Period::of_date(updated.date));
            if old.kind == TransactionKind::Expense || updated.kind == TransactionKind::Expense {
                recompute_budget_in(&db_tx, &updated.owner_id, &old_key.0, old_key.1).await?;
                if new_key != old_key {
                    recompute_budget_in(&db_tx, &updated.owner_id, &new_key.0, new_key.1).await?;
                }
            }
            Ok(updated)
        })
    }

    pub async fn delete_transaction(&self, transaction_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_transaction(&db_tx, transaction_id, owner_id).await?;
            let old = Transaction::try_from(model)?;

            transactions::Entity::delete_by_id(old.id.to_string())
                .exec(&db_tx)
                .await?;

            if old.kind == TransactionKind::Expense {
                recompute_budget_in(&db_tx, owner_id, &old.category, Period::of_date(old.date))
                    .await?;
            }
            Ok(())
        })
    }

    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<Transaction> {
        let model = require_transaction(&self.database, transaction_id, owner_id).await?;
        Transaction::try_from(model)
    }

    /// Lists one owner's transactions, newest first.
    pub async fn list_transactions(
        &self,
        owner_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt);
        if let Some(category) = &filter.category {
            query = query.filter(transactions::Column::Category.eq(category));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::Date.lte(to));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Recurring transactions due within `[today, today + horizon_days]`
    /// inclusive, soonest first.
    pub async fn upcoming_recurring(
        &self,
        owner_id: &str,
        today: NaiveDate,
        horizon_days: u32,
    ) -> ResultEngine<Vec<Transaction>> {
        let until = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .ok_or_else(|| EngineError::InvalidInput("horizon out of range".to_string()))?;

        let models = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::IsRecurring.eq(true))
            .filter(transactions::Column::NextDueDate.between(today, until))
            .order_by_asc(transactions::Column::NextDueDate)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}

fn validate_recurrence(is_recurring: bool, has_frequency: bool) -> ResultEngine<()> {
    if is_recurring && !has_frequency {
        return Err(EngineError::InvalidInput(
            "recurring transactions require a frequency".to_string(),
        ));
    }
    Ok(())
}

/// Validates a create command and materializes the row, projecting the due
/// date for recurring transactions.
pub(super) fn build_transaction(cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
    validate_positive_amount(cmd.amount_minor, "amount_minor")?;
    let category = normalize_required_name(&cmd.category, "category")?;
    let currency = normalize_currency(cmd.currency.as_deref())?;
    validate_recurrence(cmd.is_recurring, cmd.frequency.is_some())?;

    let now = Utc::now();
    Ok(Transaction {
        id: Uuid::new_v4(),
        owner_id: cmd.owner_id,
        kind: cmd.kind,
        amount_minor: cmd.amount_minor,
        category,
        currency,
        date: cmd.date,
        description: normalize_optional_text(cmd.description.as_deref()),
        merchant: normalize_optional_text(cmd.merchant.as_deref()),
        payment_method: normalize_optional_text(cmd.payment_method.as_deref()),
        is_recurring: cmd.is_recurring,
        frequency: cmd.frequency,
        next_due_date: recurrence::project_next_due(
            cmd.date,
            cmd.is_recurring,
            cmd.frequency,
            cmd.next_due_date,
        ),
        source: cmd.source,
        created_at: now,
        updated_at: now,
    })
}

/// Inserts a row and repairs the budget its period belongs to, inside the
/// caller's transaction.
pub(super) async fn insert_with_budget_repair<C: ConnectionTrait>(
    db: &C,
    tx: &Transaction,
) -> ResultEngine<()> {
    transactions::ActiveModel::from(tx).insert(db).await?;
    if tx.kind == TransactionKind::Expense {
        recompute_budget_in(db, &tx.owner_id, &tx.category, Period::of_date(tx.date)).await?;
    }
    Ok(())
}

/// Existence first, ownership second.
async fn require_transaction<C: ConnectionTrait>(
    db: &C,
    transaction_id: Uuid,
    owner_id: &str,
) -> ResultEngine<transactions::Model> {
    let model = transactions::Entity::find_by_id(transaction_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
    if model.owner_id != owner_id {
        return Err(EngineError::Forbidden(
            "transaction belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

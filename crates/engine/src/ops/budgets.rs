//! Budget operations and the spent-amount aggregator.
//!
//! `spent_minor` is never incremented in place. Every path that could
//! invalidate it re-derives the full sum from the expense ledger and
//! overwrites the cache, which makes repair idempotent and safe to invoke
//! conservatively.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, EngineError, NewBudgetCmd, Period, ResultEngine, TransactionKind, UpdateBudgetCmd,
    budgets,
};

use super::{Engine, normalize_required_name, validate_positive_amount, with_tx};

impl Engine {
    pub async fn create_budget(&self, cmd: NewBudgetCmd) -> ResultEngine<Budget> {
        let category = normalize_required_name(&cmd.category, "category")?;
        validate_positive_amount(cmd.limit_minor, "limit_minor")?;
        validate_threshold(cmd.alert_threshold_bps)?;
        let period = Period::new(cmd.month, cmd.year)?;

        with_tx!(self, |db_tx| {
            if find_by_key(&db_tx, &cmd.owner_id, &category, period)
                .await?
                .is_some()
            {
                return Err(existing_key(&category, period));
            }

            // Derive the cache before the row is ever readable, so a budget
            // created over an already-populated month starts correct.
            let spent = sum_expenses_in_range(
                &db_tx,
                &cmd.owner_id,
                &category,
                period.start(),
                period.end(),
            )
            .await?;

            let now = Utc::now();
            let budget = Budget {
                id: Uuid::new_v4(),
                owner_id: cmd.owner_id.clone(),
                category,
                period,
                limit_minor: cmd.limit_minor,
                spent_minor: spent,
                alert_threshold_bps: cmd.alert_threshold_bps,
                created_at: now,
                updated_at: now,
            };
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            Ok(budget)
        })
    }

    pub async fn update_budget(&self, cmd: UpdateBudgetCmd) -> ResultEngine<Budget> {
        let category = normalize_required_name(&cmd.category, "category")?;
        validate_positive_amount(cmd.limit_minor, "limit_minor")?;
        validate_threshold(cmd.alert_threshold_bps)?;
        let period = Period::new(cmd.month, cmd.year)?;

        with_tx!(self, |db_tx| {
            let model = require_budget(&db_tx, cmd.budget_id, &cmd.owner_id).await?;
            let current = Budget::try_from(model)?;

            // The duplicate check only runs when the key actually moves;
            // re-saving a budget onto its own key is always allowed.
            let key_changed = current.category != category || current.period != period;
            if key_changed
                && find_by_key(&db_tx, &cmd.owner_id, &category, period)
                    .await?
                    .is_some()
            {
                return Err(existing_key(&category, period));
            }

            let spent = sum_expenses_in_range(
                &db_tx,
                &cmd.owner_id,
                &category,
                period.start(),
                period.end(),
            )
            .await?;

            let updated = Budget {
                id: current.id,
                owner_id: current.owner_id,
                category,
                period,
                limit_minor: cmd.limit_minor,
                spent_minor: spent,
                alert_threshold_bps: cmd.alert_threshold_bps,
                created_at: current.created_at,
                updated_at: Utc::now(),
            };
            budgets::ActiveModel::from(&updated).update(&db_tx).await?;
            Ok(updated)
        })
    }

    pub async fn delete_budget(&self, budget_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_budget(&db_tx, budget_id, owner_id).await?;
            budgets::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Returns a budget. Reads trust the cached `spent_minor`; every write
    /// path keeps it in sync.
    pub async fn budget(&self, budget_id: Uuid, owner_id: &str) -> ResultEngine<Budget> {
        let model = require_budget(&self.database, budget_id, owner_id).await?;
        Budget::try_from(model)
    }

    /// Lists all budgets of one owner, newest first.
    pub async fn list_budgets(&self, owner_id: &str) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::OwnerId.eq(owner_id))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Budget::try_from).collect()
    }

    /// Lists the budgets of one owner for a single period.
    pub async fn list_budgets_for_period(
        &self,
        owner_id: &str,
        month: u32,
        year: i32,
    ) -> ResultEngine<Vec<Budget>> {
        let period = Period::new(month, year)?;
        let models = budgets::Entity::find()
            .filter(budgets::Column::OwnerId.eq(owner_id))
            .filter(budgets::Column::Month.eq(period.month() as i32))
            .filter(budgets::Column::Year.eq(period.year()))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Budget::try_from).collect()
    }

    /// Re-derives the spent cache for one `(category, month, year)` key.
    ///
    /// No-op when the owner has no budget there. Safe to call at any time;
    /// repeated invocations on an unchanged ledger rewrite the same value.
    pub async fn recompute_budget(
        &self,
        owner_id: &str,
        category: &str,
        month: u32,
        year: i32,
    ) -> ResultEngine<()> {
        let period = Period::new(month, year)?;
        with_tx!(self, |db_tx| {
            recompute_budget_in(&db_tx, owner_id, category, period).await
        })
    }
}

fn validate_threshold(alert_threshold_bps: Option<i64>) -> ResultEngine<()> {
    match alert_threshold_bps {
        Some(bps) if bps < 0 => Err(EngineError::InvalidInput(
            "alert_threshold_bps must be >= 0".to_string(),
        )),
        _ => Ok(()),
    }
}

fn existing_key(category: &str, period: Period) -> EngineError {
    EngineError::ExistingKey(format!(
        "budget for {category} {}/{}",
        period.month(),
        period.year()
    ))
}

/// Existence first, ownership second: a row owned by someone else is
/// `Forbidden`, not `KeyNotFound`.
async fn require_budget<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
    owner_id: &str,
) -> ResultEngine<budgets::Model> {
    let model = budgets::Entity::find_by_id(budget_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
    if model.owner_id != owner_id {
        return Err(EngineError::Forbidden(
            "budget belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

async fn find_by_key<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    category: &str,
    period: Period,
) -> ResultEngine<Option<budgets::Model>> {
    Ok(budgets::Entity::find()
        .filter(budgets::Column::OwnerId.eq(owner_id))
        .filter(budgets::Column::Category.eq(category))
        .filter(budgets::Column::Month.eq(period.month() as i32))
        .filter(budgets::Column::Year.eq(period.year()))
        .one(db)
        .await?)
}

/// The aggregator (full re-derivation, never an increment).
///
/// Runs against the caller's open transaction so the cache rewrite commits
/// or rolls back together with the ledger mutation that triggered it.
pub(super) async fn recompute_budget_in<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    category: &str,
    period: Period,
) -> ResultEngine<()> {
    let Some(model) = find_by_key(db, owner_id, category, period).await? else {
        // A category may be tracked by transactions without a budget.
        return Ok(());
    };

    let spent = sum_expenses_in_range(db, owner_id, category, period.start(), period.end()).await?;

    let active = budgets::ActiveModel {
        id: ActiveValue::Set(model.id),
        spent_minor: ActiveValue::Set(spent),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    active.update(db).await?;
    Ok(())
}

/// Sum of expense rows for `(owner, category)` with `date` in
/// `[start, end]` inclusive.
pub(super) async fn sum_expenses_in_range<C: ConnectionTrait>(
    db: &C,
    owner_id: &str,
    category: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> ResultEngine<i64> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
         FROM transactions \
         WHERE owner_id = ? AND category = ? AND kind = ? AND date >= ? AND date <= ?",
        vec![
            owner_id.into(),
            category.into(),
            TransactionKind::Expense.as_str().into(),
            start.into(),
            end.into(),
        ],
    );
    let row = db.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

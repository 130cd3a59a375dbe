//! Budget rows and their derived figures.
//!
//! `spent_minor` is a cache over the expense ledger, rewritten by the
//! aggregator in `ops::budgets` on every mutation that could invalidate it.
//! Reads trust the cache; `remaining`/`percent_used` are derived on demand
//! and never stored.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Period, money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: String,
    pub category: String,
    pub period: Period,
    pub limit_minor: i64,
    pub spent_minor: i64,
    pub alert_threshold_bps: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// May be negative: over-budget is a valid, observable state.
    pub fn remaining_minor(&self) -> i64 {
        self.limit_minor - self.spent_minor
    }

    /// Share of the limit spent, in basis points, rounded half-up.
    pub fn percent_used_bps(&self) -> i64 {
        money::percent_bps(self.spent_minor, self.limit_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub category: String,
    pub month: i32,
    pub year: i32,
    pub limit_minor: i64,
    pub spent_minor: i64,
    pub alert_threshold_bps: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            owner_id: ActiveValue::Set(budget.owner_id.clone()),
            category: ActiveValue::Set(budget.category.clone()),
            month: ActiveValue::Set(budget.period.month() as i32),
            year: ActiveValue::Set(budget.period.year()),
            limit_minor: ActiveValue::Set(budget.limit_minor),
            spent_minor: ActiveValue::Set(budget.spent_minor),
            alert_threshold_bps: ActiveValue::Set(budget.alert_threshold_bps),
            created_at: ActiveValue::Set(budget.created_at),
            updated_at: ActiveValue::Set(budget.updated_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            owner_id: model.owner_id,
            category: model.category,
            period: Period::new(model.month.max(0) as u32, model.year)?,
            limit_minor: model.limit_minor,
            spent_minor: model.spent_minor,
            alert_threshold_bps: model.alert_threshold_bps,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(limit_minor: i64, spent_minor: i64) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            owner_id: "alice@example.com".to_string(),
            category: "Food".to_string(),
            period: Period::new(3, 2024).unwrap(),
            limit_minor,
            spent_minor,
            alert_threshold_bps: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn remaining_may_go_negative() {
        assert_eq!(budget(50_000, 21_050).remaining_minor(), 28_950);
        assert_eq!(budget(50_000, 61_000).remaining_minor(), -11_000);
    }

    #[test]
    fn percent_used_rounds_to_basis_points() {
        assert_eq!(budget(50_000, 21_050).percent_used_bps(), 4210);
    }
}

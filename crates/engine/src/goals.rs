//! Savings goals.
//!
//! A goal is a two-state machine: `active` until `current >= target`,
//! `completed` from then on. The status is re-evaluated on every
//! contribution and every edit, in both directions, so raising the target
//! of a completed goal reopens it.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidInput(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub status: GoalStatus,
    pub target_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Re-derives `status` from the amounts. Runs after every contribution
    /// or edit; moving below the target reopens a completed goal.
    pub fn evaluate_status(&mut self) {
        self.status = if self.current_minor >= self.target_minor {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        };
    }

    /// May be negative after an over-contribution; over-saving is
    /// meaningful to the user, so it is not clamped.
    pub fn remaining_minor(&self) -> i64 {
        self.target_minor - self.current_minor
    }

    /// Progress toward the target in basis points, unclamped above 100%.
    pub fn progress_bps(&self) -> i64 {
        money::percent_bps(self.current_minor, self.target_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub status: String,
    pub target_date: Option<Date>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SavingsGoal> for ActiveModel {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            owner_id: ActiveValue::Set(goal.owner_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_minor: ActiveValue::Set(goal.target_minor),
            current_minor: ActiveValue::Set(goal.current_minor),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
            target_date: ActiveValue::Set(goal.target_date),
            description: ActiveValue::Set(goal.description.clone()),
            created_at: ActiveValue::Set(goal.created_at),
            updated_at: ActiveValue::Set(goal.updated_at),
        }
    }
}

impl TryFrom<Model> for SavingsGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("savings goal not exists".to_string()))?,
            owner_id: model.owner_id,
            name: model.name,
            target_minor: model.target_minor,
            current_minor: model.current_minor,
            status: GoalStatus::try_from(model.status.as_str())?,
            target_date: model.target_date,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target_minor: i64, current_minor: i64) -> SavingsGoal {
        SavingsGoal {
            id: Uuid::new_v4(),
            owner_id: "alice@example.com".to_string(),
            name: "Emergency fund".to_string(),
            target_minor,
            current_minor,
            status: GoalStatus::Active,
            target_date: None,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn completes_at_and_above_target() {
        let mut g = goal(100_000, 99_999);
        g.evaluate_status();
        assert_eq!(g.status, GoalStatus::Active);
        g.current_minor = 100_000;
        g.evaluate_status();
        assert_eq!(g.status, GoalStatus::Completed);
    }

    #[test]
    fn reopens_when_target_moves_up() {
        let mut g = goal(100_000, 110_000);
        g.evaluate_status();
        assert_eq!(g.status, GoalStatus::Completed);
        g.target_minor = 150_000;
        g.evaluate_status();
        assert_eq!(g.status, GoalStatus::Active);
    }

    #[test]
    fn remaining_and_progress_are_unclamped() {
        let g = goal(100_000, 110_000);
        assert_eq!(g.remaining_minor(), -10_000);
        assert_eq!(g.progress_bps(), 11_000);
    }
}

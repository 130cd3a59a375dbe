//! Savings goal operations.

use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, GoalStatus, NewGoalCmd, ResultEngine, SavingsGoal, UpdateGoalCmd, goals};

use super::{
    Engine, normalize_optional_text, normalize_required_name, validate_positive_amount, with_tx,
};

impl Engine {
    pub async fn create_goal(&self, cmd: NewGoalCmd) -> ResultEngine<SavingsGoal> {
        let name = normalize_required_name(&cmd.name, "goal name")?;
        validate_positive_amount(cmd.target_minor, "target_minor")?;
        let current_minor = cmd.current_minor.unwrap_or(0);
        if current_minor < 0 {
            return Err(EngineError::InvalidInput(
                "current_minor must be >= 0".to_string(),
            ));
        }

        let now = Utc::now();
        let mut goal = SavingsGoal {
            id: Uuid::new_v4(),
            owner_id: cmd.owner_id,
            name,
            target_minor: cmd.target_minor,
            current_minor,
            status: GoalStatus::Active,
            target_date: cmd.target_date,
            description: normalize_optional_text(cmd.description.as_deref()),
            created_at: now,
            updated_at: now,
        };
        // A goal seeded at or above its target is already complete.
        goal.evaluate_status();

        goals::ActiveModel::from(&goal).insert(&self.database).await?;
        Ok(goal)
    }

    pub async fn update_goal(&self, cmd: UpdateGoalCmd) -> ResultEngine<SavingsGoal> {
        let name = normalize_required_name(&cmd.name, "goal name")?;
        validate_positive_amount(cmd.target_minor, "target_minor")?;
        if cmd.current_minor.is_some_and(|amount| amount < 0) {
            return Err(EngineError::InvalidInput(
                "current_minor must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = require_goal(&db_tx, cmd.goal_id, &cmd.owner_id).await?;
            let current = SavingsGoal::try_from(model)?;

            let mut updated = SavingsGoal {
                id: current.id,
                owner_id: current.owner_id,
                name,
                target_minor: cmd.target_minor,
                current_minor: cmd.current_minor.unwrap_or(current.current_minor),
                status: current.status,
                target_date: cmd.target_date,
                description: normalize_optional_text(cmd.description.as_deref()),
                created_at: current.created_at,
                updated_at: Utc::now(),
            };
            // Both directions: lowering the saved amount or raising the
            // target reopens a completed goal.
            updated.evaluate_status();

            goals::ActiveModel::from(&updated).update(&db_tx).await?;
            Ok(updated)
        })
    }

    /// Adds a positive contribution and re-evaluates completion.
    pub async fn contribute(
        &self,
        goal_id: Uuid,
        owner_id: &str,
        amount_minor: i64,
    ) -> ResultEngine<SavingsGoal> {
        validate_positive_amount(amount_minor, "amount_minor")?;

        with_tx!(self, |db_tx| {
            let model = require_goal(&db_tx, goal_id, owner_id).await?;
            let mut goal = SavingsGoal::try_from(model)?;

            goal.current_minor += amount_minor;
            goal.updated_at = Utc::now();
            goal.evaluate_status();

            goals::ActiveModel::from(&goal).update(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn delete_goal(&self, goal_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_goal(&db_tx, goal_id, owner_id).await?;
            goals::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn goal(&self, goal_id: Uuid, owner_id: &str) -> ResultEngine<SavingsGoal> {
        let model = require_goal(&self.database, goal_id, owner_id).await?;
        SavingsGoal::try_from(model)
    }

    /// Lists one owner's goals, newest first.
    pub async fn list_goals(&self, owner_id: &str) -> ResultEngine<Vec<SavingsGoal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::OwnerId.eq(owner_id))
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(SavingsGoal::try_from).collect()
    }
}

/// Existence first, ownership second.
async fn require_goal<C: ConnectionTrait>(
    db: &C,
    goal_id: Uuid,
    owner_id: &str,
) -> ResultEngine<goals::Model> {
    let model = goals::Entity::find_by_id(goal_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("savings goal not exists".to_string()))?;
    if model.owner_id != owner_id {
        return Err(EngineError::Forbidden(
            "savings goal belongs to another user".to_string(),
        ));
    }
    Ok(model)
}

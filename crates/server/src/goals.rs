//! Savings goals API endpoints

use api_types::goal::{
    GoalContribute, GoalListResponse, GoalNew, GoalStatus as ApiStatus, GoalUpdate, GoalView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_status_view(status: engine::GoalStatus) -> ApiStatus {
    match status {
        engine::GoalStatus::Active => ApiStatus::Active,
        engine::GoalStatus::Completed => ApiStatus::Completed,
    }
}

fn view(goal: engine::SavingsGoal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name.clone(),
        target_minor: goal.target_minor,
        current_minor: goal.current_minor,
        remaining_minor: goal.remaining_minor(),
        progress_bps: goal.progress_bps(),
        status: map_status_view(goal.status),
        target_date: goal.target_date,
        description: goal.description,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let cmd = engine::NewGoalCmd {
        owner_id: user.email.clone(),
        name: payload.name,
        target_minor: payload.target_minor,
        current_minor: payload.current_minor,
        target_date: payload.target_date,
        description: payload.description,
    };

    let goal = state.engine.create_goal(cmd).await?;
    tracing::info!("savings goal created: {} for user: {}", goal.id, user.email);

    Ok((StatusCode::CREATED, Json(view(goal))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state
        .engine
        .list_goals(&user.email)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(GoalListResponse { goals }))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.goal(id, &user.email).await?;
    Ok(Json(view(goal)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let cmd = engine::UpdateGoalCmd {
        owner_id: user.email.clone(),
        goal_id: id,
        name: payload.name,
        target_minor: payload.target_minor,
        current_minor: payload.current_minor,
        target_date: payload.target_date,
        description: payload.description,
    };

    let goal = state.engine.update_goal(cmd).await?;
    tracing::info!("savings goal updated: {}", goal.id);

    Ok(Json(view(goal)))
}

pub async fn contribute(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalContribute>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .contribute(id, &user.email, payload.amount_minor)
        .await?;
    tracing::info!(
        "contribution added to goal: {id}, amount: {}",
        payload.amount_minor
    );

    Ok(Json(view(goal)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(id, &user.email).await?;
    tracing::info!("savings goal deleted: {id}");

    Ok(StatusCode::NO_CONTENT)
}

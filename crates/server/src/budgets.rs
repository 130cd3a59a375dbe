//! Budgets API endpoints

use api_types::budget::{
    BudgetListResponse, BudgetNew, BudgetPeriodQuery, BudgetUpdate, BudgetView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category.clone(),
        month: budget.period.month(),
        year: budget.period.year(),
        period_start: budget.period.start(),
        period_end: budget.period.end(),
        limit_minor: budget.limit_minor,
        spent_minor: budget.spent_minor,
        remaining_minor: budget.remaining_minor(),
        percent_used_bps: budget.percent_used_bps(),
        alert_threshold_bps: budget.alert_threshold_bps,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let cmd = engine::NewBudgetCmd {
        owner_id: user.email.clone(),
        category: payload.category,
        month: payload.month,
        year: payload.year,
        limit_minor: payload.limit_minor,
        alert_threshold_bps: payload.alert_threshold_bps,
    };

    let budget = state.engine.create_budget(cmd).await?;
    tracing::info!("budget created: {} for user: {}", budget.id, user.email);

    Ok((StatusCode::CREATED, Json(view(budget))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(&user.email)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn list_for_period(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BudgetPeriodQuery>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets_for_period(&user.email, query.month, query.year)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(id, &user.email).await?;
    Ok(Json(view(budget)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let cmd = engine::UpdateBudgetCmd {
        owner_id: user.email.clone(),
        budget_id: id,
        category: payload.category,
        month: payload.month,
        year: payload.year,
        limit_minor: payload.limit_minor,
        alert_threshold_bps: payload.alert_threshold_bps,
    };

    let budget = state.engine.update_budget(cmd).await?;
    tracing::info!("budget updated: {} for user: {}", budget.id, user.email);

    Ok(Json(view(budget)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(id, &user.email).await?;
    tracing::info!("budget deleted: {id} for user: {}", user.email);

    Ok(StatusCode::NO_CONTENT)
}

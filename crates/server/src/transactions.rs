//! Transactions API endpoints

use api_types::transaction::{
    Frequency as ApiFrequency, TransactionKind as ApiKind, TransactionListQuery,
    TransactionListResponse, TransactionNew, TransactionSource as ApiSource, TransactionUpdate,
    TransactionView, UpcomingQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

/// Default window for "due soon", in days.
const DEFAULT_UPCOMING_DAYS: u32 = 3;

fn map_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_kind_view(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_frequency(frequency: ApiFrequency) -> engine::Frequency {
    match frequency {
        ApiFrequency::Daily => engine::Frequency::Daily,
        ApiFrequency::Weekly => engine::Frequency::Weekly,
        ApiFrequency::Monthly => engine::Frequency::Monthly,
        ApiFrequency::Yearly => engine::Frequency::Yearly,
    }
}

fn map_frequency_view(frequency: engine::Frequency) -> ApiFrequency {
    match frequency {
        engine::Frequency::Daily => ApiFrequency::Daily,
        engine::Frequency::Weekly => ApiFrequency::Weekly,
        engine::Frequency::Monthly => ApiFrequency::Monthly,
        engine::Frequency::Yearly => ApiFrequency::Yearly,
    }
}

fn map_source_view(source: engine::TransactionSource) -> ApiSource {
    match source {
        engine::TransactionSource::Manual => ApiSource::Manual,
        engine::TransactionSource::Receipt => ApiSource::Receipt,
    }
}

pub(crate) fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind_view(tx.kind),
        amount_minor: tx.amount_minor,
        category: tx.category,
        currency: tx.currency,
        date: tx.date,
        description: tx.description,
        merchant: tx.merchant,
        payment_method: tx.payment_method,
        is_recurring: tx.is_recurring,
        frequency: tx.frequency.map(map_frequency_view),
        next_due_date: tx.next_due_date,
        source: map_source_view(tx.source),
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let cmd = engine::NewTransactionCmd {
        owner_id: user.email.clone(),
        kind: map_kind(payload.kind),
        amount_minor: payload.amount_minor,
        category: payload.category,
        currency: payload.currency,
        date: payload.date,
        description: payload.description,
        merchant: payload.merchant,
        payment_method: payload.payment_method,
        is_recurring: payload.is_recurring,
        frequency: payload.frequency.map(map_frequency),
        next_due_date: payload.next_due_date,
        source: engine::TransactionSource::Manual,
    };

    let tx = state.engine.create_transaction(cmd).await?;
    tracing::info!("transaction created: {} for user: {}", tx.id, user.email);

    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = engine::TransactionListFilter {
        category: query.category,
        kind: query.kind.map(map_kind),
        from: query.from,
        to: query.to,
    };

    let transactions = state
        .engine
        .list_transactions(&user.email, &filter)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn upcoming(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let days = query.days.unwrap_or(DEFAULT_UPCOMING_DAYS);

    let transactions = state
        .engine
        .upcoming_recurring(&user.email, today, days)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id, &user.email).await?;
    Ok(Json(view(tx)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let cmd = engine::UpdateTransactionCmd {
        owner_id: user.email.clone(),
        transaction_id: id,
        kind: map_kind(payload.kind),
        amount_minor: payload.amount_minor,
        category: payload.category,
        currency: payload.currency,
        date: payload.date,
        description: payload.description,
        merchant: payload.merchant,
        payment_method: payload.payment_method,
        is_recurring: payload.is_recurring,
        frequency: payload.frequency.map(map_frequency),
        next_due_date: payload.next_due_date,
    };

    let tx = state.engine.update_transaction(cmd).await?;
    tracing::info!("transaction updated: {}", tx.id);

    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, &user.email).await?;
    tracing::info!("transaction deleted: {id}");

    Ok(StatusCode::NO_CONTENT)
}

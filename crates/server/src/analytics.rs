//! Analytics API endpoints
//!
//! Thin pass-throughs to the advice and rate collaborators. The clients
//! fall back internally, so these read endpoints never fail because an
//! upstream did.

use api_types::analytics::{
    AdviceRequest, AdviceResponse, ConvertQuery, ConvertResponse, RatesQuery, RatesResponse,
    SpendingAnalysisRequest,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState, user};

pub async fn advice(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AdviceRequest>,
) -> Result<Json<AdviceResponse>, ServerError> {
    if payload.query.trim().is_empty() {
        return Err(ServerError::Generic("query must not be empty".to_string()));
    }

    let advice = state
        .advice
        .financial_advice(&payload.query, payload.context.as_deref())
        .await;

    Ok(Json(AdviceResponse { advice }))
}

pub async fn analyze_spending(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SpendingAnalysisRequest>,
) -> Result<Json<AdviceResponse>, ServerError> {
    if payload.summary.trim().is_empty() {
        return Err(ServerError::Generic(
            "summary must not be empty".to_string(),
        ));
    }

    let advice = state.advice.analyze_spending(&payload.summary).await;

    Ok(Json(AdviceResponse { advice }))
}

pub async fn convert(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<ConvertResponse>, ServerError> {
    if query.from.trim().is_empty() || query.to.trim().is_empty() {
        return Err(ServerError::Generic(
            "from and to currencies are required".to_string(),
        ));
    }

    let converted_minor = state
        .rates
        .convert(&query.from, &query.to, query.amount_minor)
        .await;

    Ok(Json(ConvertResponse {
        from: query.from,
        to: query.to,
        amount_minor: query.amount_minor,
        converted_minor,
    }))
}

pub async fn rates(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<RatesResponse>, ServerError> {
    let base = query.base.unwrap_or_else(|| "USD".to_string());
    let table = state.rates.latest(&base).await;

    Ok(Json(RatesResponse {
        base: table.base,
        rates: table.rates,
    }))
}

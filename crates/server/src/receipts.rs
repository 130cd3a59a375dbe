//! Receipt ingestion API endpoints
//!
//! The upload handler is the boundary between the unreliable OCR
//! collaborator and the core: a provider failure records a `failed` attempt
//! and surfaces as 502, it never leaves half-committed ledger state behind.

use api_types::receipt::{
    ParseStatus as ApiStatus, ReceiptIngestResponse, ReceiptLogListResponse, ReceiptLogView,
    ReceiptUpload,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use base64::Engine as _;
use chrono::Utc;
use engine::EngineError;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions, user};

fn map_status_view(status: engine::ParseStatus) -> ApiStatus {
    match status {
        engine::ParseStatus::Success => ApiStatus::Success,
        engine::ParseStatus::Partial => ApiStatus::Partial,
        engine::ParseStatus::Failed => ApiStatus::Failed,
    }
}

fn view(log: engine::ReceiptLog) -> ReceiptLogView {
    ReceiptLogView {
        id: log.id,
        file_name: log.file_name,
        raw_text: log.raw_text,
        parsed_amount_minor: log.parsed_amount_minor,
        parsed_date: log.parsed_date,
        parsed_merchant: log.parsed_merchant,
        parsed_description: log.parsed_description,
        status: map_status_view(log.status),
        error_message: log.error_message,
        transaction_id: log.transaction_id,
        created_at: log.created_at,
    }
}

pub async fn upload(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ReceiptUpload>,
) -> Result<(StatusCode, Json<ReceiptIngestResponse>), ServerError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.data_base64.as_bytes())
        .map_err(|_| ServerError::Generic("invalid base64 receipt payload".to_string()))?;

    let raw_text = match state.ocr.parse_receipt(&bytes).await {
        Ok(raw_text) => raw_text,
        Err(err) => {
            tracing::error!("receipt OCR failed: {err}");
            state
                .engine
                .record_failed_receipt(&user.email, payload.file_name, &err.to_string())
                .await?;
            return Err(ServerError::Engine(EngineError::Upstream(
                "receipt text extraction failed".to_string(),
            )));
        }
    };

    let today = Utc::now().date_naive();
    let (log, tx) = state
        .engine
        .ingest_receipt(&user.email, payload.file_name, &raw_text, today)
        .await?;
    tracing::info!(
        "receipt ingested: {} ({}) for user: {}",
        log.id,
        log.status.as_str(),
        user.email
    );

    Ok((
        StatusCode::CREATED,
        Json(ReceiptIngestResponse {
            log: view(log),
            transaction: tx.map(transactions::view),
        }),
    ))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReceiptLogView>, ServerError> {
    let log = state.engine.receipt_log(id, &user.email).await?;
    Ok(Json(view(log)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ReceiptLogListResponse>, ServerError> {
    let logs = state
        .engine
        .list_receipt_logs(&user.email)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(ReceiptLogListResponse { logs }))
}

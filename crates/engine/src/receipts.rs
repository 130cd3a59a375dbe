//! Receipt ingestion log.
//!
//! Every ingestion attempt is recorded, including the ones that produced no
//! transaction. `success` means a ledger row was created, `partial` means
//! the text was readable but no amount could be extracted, `failed` means
//! the OCR collaborator itself was unavailable.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Success,
    Partial,
    Failed,
}

impl ParseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for ParseStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "success" => Ok(Self::Success),
            "partial" => Ok(Self::Partial),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidInput(format!(
                "invalid parse status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptLog {
    pub id: Uuid,
    pub owner_id: String,
    pub file_name: Option<String>,
    pub raw_text: String,
    pub parsed_amount_minor: Option<i64>,
    pub parsed_date: Option<NaiveDate>,
    pub parsed_merchant: Option<String>,
    pub parsed_description: Option<String>,
    pub status: ParseStatus,
    pub error_message: Option<String>,
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "receipt_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub file_name: Option<String>,
    pub raw_text: String,
    pub parsed_amount_minor: Option<i64>,
    pub parsed_date: Option<Date>,
    pub parsed_merchant: Option<String>,
    pub parsed_description: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ReceiptLog> for ActiveModel {
    fn from(log: &ReceiptLog) -> Self {
        Self {
            id: ActiveValue::Set(log.id.to_string()),
            owner_id: ActiveValue::Set(log.owner_id.clone()),
            file_name: ActiveValue::Set(log.file_name.clone()),
            raw_text: ActiveValue::Set(log.raw_text.clone()),
            parsed_amount_minor: ActiveValue::Set(log.parsed_amount_minor),
            parsed_date: ActiveValue::Set(log.parsed_date),
            parsed_merchant: ActiveValue::Set(log.parsed_merchant.clone()),
            parsed_description: ActiveValue::Set(log.parsed_description.clone()),
            status: ActiveValue::Set(log.status.as_str().to_string()),
            error_message: ActiveValue::Set(log.error_message.clone()),
            transaction_id: ActiveValue::Set(log.transaction_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(log.created_at),
        }
    }
}

impl TryFrom<Model> for ReceiptLog {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("receipt log not exists".to_string()))?,
            owner_id: model.owner_id,
            file_name: model.file_name,
            raw_text: model.raw_text,
            parsed_amount_minor: model.parsed_amount_minor,
            parsed_date: model.parsed_date,
            parsed_merchant: model.parsed_merchant,
            parsed_description: model.parsed_description,
            status: ParseStatus::try_from(model.status.as_str())?,
            error_message: model.error_message,
            transaction_id: model.transaction_id.and_then(|s| Uuid::parse_str(&s).ok()),
            created_at: model.created_at,
        })
    }
}

//! Receipt ingestion.
//!
//! The OCR collaborator turns file bytes into raw text; this module turns
//! raw text into an expense row when the heuristics find an amount, and
//! records the attempt either way. The log row and the ledger row commit in
//! one database transaction, so a log never points at a transaction that
//! was rolled back.

use chrono::{NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransactionCmd, ParseStatus, ReceiptLog, ResultEngine, Transaction,
    TransactionKind, TransactionSource, extract, receipts,
};

use super::{
    Engine,
    transactions::{build_transaction, insert_with_budget_repair},
    with_tx,
};

/// Category assigned to receipt-derived expenses.
const RECEIPT_CATEGORY: &str = "General";

impl Engine {
    /// Ingests already-extracted receipt text.
    ///
    /// With an amount: creates an expense through the normal create path
    /// (budget repair included) and logs `success`. Without one: logs
    /// `partial` and leaves the ledger untouched.
    pub async fn ingest_receipt(
        &self,
        owner_id: &str,
        file_name: Option<String>,
        raw_text: &str,
        today: NaiveDate,
    ) -> ResultEngine<(ReceiptLog, Option<Transaction>)> {
        let fields = extract::extract_fields(raw_text);
        let description = format!(
            "Receipt from {}",
            fields.merchant.as_deref().unwrap_or("unknown merchant")
        );

        let mut log = ReceiptLog {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            file_name,
            raw_text: raw_text.to_string(),
            parsed_amount_minor: fields.amount_minor,
            parsed_date: fields.date,
            parsed_merchant: fields.merchant.clone(),
            parsed_description: Some(description.clone()),
            status: ParseStatus::Partial,
            error_message: None,
            transaction_id: None,
            created_at: Utc::now(),
        };

        let Some(amount_minor) = fields.amount_minor else {
            log.error_message = Some("could not extract an amount from the receipt".to_string());
            with_tx!(self, |db_tx| {
                receipts::ActiveModel::from(&log).insert(&db_tx).await?;
                Ok::<(), EngineError>(())
            })?;
            return Ok((log, None));
        };

        let mut cmd = NewTransactionCmd::new(
            owner_id,
            TransactionKind::Expense,
            amount_minor,
            RECEIPT_CATEGORY,
            fields.date.unwrap_or(today),
        )
        .description(description)
        .source(TransactionSource::Receipt);
        cmd.merchant = fields.merchant;
        let tx = build_transaction(cmd)?;

        log.status = ParseStatus::Success;
        log.transaction_id = Some(tx.id);

        with_tx!(self, |db_tx| {
            insert_with_budget_repair(&db_tx, &tx).await?;
            receipts::ActiveModel::from(&log).insert(&db_tx).await?;
            Ok::<(), EngineError>(())
        })?;
        Ok((log, Some(tx)))
    }

    /// Records an attempt whose OCR call never produced text.
    ///
    /// Collaborator failures must not poison ledger state; they only leave
    /// a `failed` log behind.
    pub async fn record_failed_receipt(
        &self,
        owner_id: &str,
        file_name: Option<String>,
        error_message: &str,
    ) -> ResultEngine<ReceiptLog> {
        let log = ReceiptLog {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            file_name,
            raw_text: String::new(),
            parsed_amount_minor: None,
            parsed_date: None,
            parsed_merchant: None,
            parsed_description: None,
            status: ParseStatus::Failed,
            error_message: Some(error_message.to_string()),
            transaction_id: None,
            created_at: Utc::now(),
        };
        receipts::ActiveModel::from(&log).insert(&self.database).await?;
        Ok(log)
    }

    pub async fn receipt_log(&self, log_id: Uuid, owner_id: &str) -> ResultEngine<ReceiptLog> {
        let model = receipts::Entity::find_by_id(log_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("receipt log not exists".to_string()))?;
        if model.owner_id != owner_id {
            return Err(EngineError::Forbidden(
                "receipt log belongs to another user".to_string(),
            ));
        }
        ReceiptLog::try_from(model)
    }

    /// Lists one owner's ingestion attempts, newest first.
    pub async fn list_receipt_logs(&self, owner_id: &str) -> ResultEngine<Vec<ReceiptLog>> {
        let models = receipts::Entity::find()
            .filter(receipts::Column::OwnerId.eq(owner_id))
            .order_by_desc(receipts::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(ReceiptLog::try_from).collect()
    }
}

//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Gruzzolo:
//!
//! - `users`: authentication
//! - `transactions`: the ledger, one row per financial event
//! - `budgets`: per-category monthly limits with a cached spent amount
//! - `savings_goals`: contribution targets with a completion status
//! - `receipt_logs`: one row per receipt ingestion attempt

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Email,
    Password,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    OwnerId,
    Kind,
    AmountMinor,
    Category,
    Currency,
    Date,
    Description,
    Merchant,
    PaymentMethod,
    IsRecurring,
    Frequency,
    NextDueDate,
    Source,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    OwnerId,
    Category,
    Month,
    Year,
    LimitMinor,
    SpentMinor,
    AlertThresholdBps,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SavingsGoals {
    Table,
    Id,
    OwnerId,
    Name,
    TargetMinor,
    CurrentMinor,
    Status,
    TargetDate,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ReceiptLogs {
    Table,
    Id,
    OwnerId,
    FileName,
    RawText,
    ParsedAmountMinor,
    ParsedDate,
    ParsedMerchant,
    ParsedDescription,
    Status,
    ErrorMessage,
    TransactionId,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::OwnerId).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Category).string().not_null())
                    .col(ColumnDef::new(Transactions::Currency).string().not_null())
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::Merchant).string())
                    .col(ColumnDef::new(Transactions::PaymentMethod).string())
                    .col(
                        ColumnDef::new(Transactions::IsRecurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Transactions::Frequency).string())
                    .col(ColumnDef::new(Transactions::NextDueDate).date())
                    .col(ColumnDef::new(Transactions::Source).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the aggregator's sum query.
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-owner-category-kind-date")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .col(Transactions::Category)
                    .col(Transactions::Kind)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // Serves the upcoming-recurring window query.
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-owner-recurring-due")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .col(Transactions::IsRecurring)
                    .col(Transactions::NextDueDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::OwnerId).string().not_null())
                    .col(ColumnDef::new(Budgets::Category).string().not_null())
                    .col(ColumnDef::new(Budgets::Month).integer().not_null())
                    .col(ColumnDef::new(Budgets::Year).integer().not_null())
                    .col(ColumnDef::new(Budgets::LimitMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Budgets::SpentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Budgets::AlertThresholdBps).big_integer())
                    .col(
                        ColumnDef::new(Budgets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Budgets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One budget per (owner, category, month, year); the engine checks
        // before insert, the index backstops races.
        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-owner-category-period")
                    .table(Budgets::Table)
                    .col(Budgets::OwnerId)
                    .col(Budgets::Category)
                    .col(Budgets::Month)
                    .col(Budgets::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Savings goals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SavingsGoals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavingsGoals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SavingsGoals::OwnerId).string().not_null())
                    .col(ColumnDef::new(SavingsGoals::Name).string().not_null())
                    .col(
                        ColumnDef::new(SavingsGoals::TargetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SavingsGoals::CurrentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SavingsGoals::Status).string().not_null())
                    .col(ColumnDef::new(SavingsGoals::TargetDate).date())
                    .col(ColumnDef::new(SavingsGoals::Description).string())
                    .col(
                        ColumnDef::new(SavingsGoals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SavingsGoals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-savings-goals-owner")
                    .table(SavingsGoals::Table)
                    .col(SavingsGoals::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Receipt logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ReceiptLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReceiptLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReceiptLogs::OwnerId).string().not_null())
                    .col(ColumnDef::new(ReceiptLogs::FileName).string())
                    .col(ColumnDef::new(ReceiptLogs::RawText).text().not_null())
                    .col(ColumnDef::new(ReceiptLogs::ParsedAmountMinor).big_integer())
                    .col(ColumnDef::new(ReceiptLogs::ParsedDate).date())
                    .col(ColumnDef::new(ReceiptLogs::ParsedMerchant).string())
                    .col(ColumnDef::new(ReceiptLogs::ParsedDescription).string())
                    .col(ColumnDef::new(ReceiptLogs::Status).string().not_null())
                    .col(ColumnDef::new(ReceiptLogs::ErrorMessage).string())
                    .col(ColumnDef::new(ReceiptLogs::TransactionId).string())
                    .col(
                        ColumnDef::new(ReceiptLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-receipt-logs-owner")
                    .table(ReceiptLogs::Table)
                    .col(ReceiptLogs::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReceiptLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingsGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

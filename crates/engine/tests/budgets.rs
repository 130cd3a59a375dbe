use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    Engine, EngineError, NewBudgetCmd, NewTransactionCmd, TransactionKind, UpdateBudgetCmd,
    UpdateTransactionCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn budget_cmd(owner: &str, category: &str, month: u32, year: i32, limit: i64) -> NewBudgetCmd {
    NewBudgetCmd {
        owner_id: owner.to_string(),
        category: category.to_string(),
        month,
        year,
        limit_minor: limit,
        alert_threshold_bps: None,
    }
}

fn expense(owner: &str, category: &str, amount: i64, on: NaiveDate) -> NewTransactionCmd {
    NewTransactionCmd::new(owner, TransactionKind::Expense, amount, category, on)
}

#[tokio::test]
async fn spent_tracks_creates_and_deletes() {
    let engine = engine_with_db().await;

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    assert_eq!(budget.spent_minor, 0);

    engine
        .create_transaction(expense("alice@example.com", "Food", 12_000, date(2024, 3, 5)))
        .await
        .unwrap();
    let second = engine
        .create_transaction(expense("alice@example.com", "Food", 9_050, date(2024, 3, 20)))
        .await
        .unwrap();

    let budget = engine.budget(budget.id, "alice@example.com").await.unwrap();
    assert_eq!(budget.spent_minor, 21_050);
    assert_eq!(budget.remaining_minor(), 28_950);
    assert_eq!(budget.percent_used_bps(), 4210);

    engine
        .delete_transaction(second.id, "alice@example.com")
        .await
        .unwrap();
    let budget = engine.budget(budget.id, "alice@example.com").await.unwrap();
    assert_eq!(budget.spent_minor, 12_000);
    assert_eq!(budget.remaining_minor(), 38_000);
}

#[tokio::test]
async fn budget_created_over_existing_ledger_starts_correct() {
    let engine = engine_with_db().await;

    engine
        .create_transaction(expense("alice@example.com", "Food", 7_500, date(2024, 3, 2)))
        .await
        .unwrap();
    // Boundary days are inside the period.
    engine
        .create_transaction(expense("alice@example.com", "Food", 1_000, date(2024, 3, 1)))
        .await
        .unwrap();
    engine
        .create_transaction(expense("alice@example.com", "Food", 2_000, date(2024, 3, 31)))
        .await
        .unwrap();
    // A neighbouring month stays out.
    engine
        .create_transaction(expense("alice@example.com", "Food", 9_999, date(2024, 4, 1)))
        .await
        .unwrap();

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    assert_eq!(budget.spent_minor, 10_500);
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let engine = engine_with_db().await;

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    engine
        .create_transaction(expense("alice@example.com", "Food", 12_000, date(2024, 3, 5)))
        .await
        .unwrap();

    engine
        .recompute_budget("alice@example.com", "Food", 3, 2024)
        .await
        .unwrap();
    engine
        .recompute_budget("alice@example.com", "Food", 3, 2024)
        .await
        .unwrap();

    let budget = engine.budget(budget.id, "alice@example.com").await.unwrap();
    assert_eq!(budget.spent_minor, 12_000);
}

#[tokio::test]
async fn recompute_without_budget_is_a_noop() {
    let engine = engine_with_db().await;
    engine
        .recompute_budget("alice@example.com", "Untracked", 3, 2024)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_key_is_rejected() {
    let engine = engine_with_db().await;

    engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    let err = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 80_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // A different owner can use the same key.
    engine
        .create_budget(budget_cmd("bob@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
}

#[tokio::test]
async fn update_checks_duplicates_only_when_key_moves() {
    let engine = engine_with_db().await;

    let food = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    engine
        .create_budget(budget_cmd("alice@example.com", "Transport", 3, 2024, 20_000))
        .await
        .unwrap();

    // Same key, new limit: allowed.
    let updated = engine
        .update_budget(UpdateBudgetCmd {
            owner_id: "alice@example.com".to_string(),
            budget_id: food.id,
            category: "Food".to_string(),
            month: 3,
            year: 2024,
            limit_minor: 60_000,
            alert_threshold_bps: Some(8_000),
        })
        .await
        .unwrap();
    assert_eq!(updated.limit_minor, 60_000);

    // Moving onto the Transport key: rejected.
    let err = engine
        .update_budget(UpdateBudgetCmd {
            owner_id: "alice@example.com".to_string(),
            budget_id: food.id,
            category: "Transport".to_string(),
            month: 3,
            year: 2024,
            limit_minor: 60_000,
            alert_threshold_bps: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn moving_budget_to_another_period_rederives_spent() {
    let engine = engine_with_db().await;

    engine
        .create_transaction(expense("alice@example.com", "Food", 4_000, date(2024, 3, 10)))
        .await
        .unwrap();
    engine
        .create_transaction(expense("alice@example.com", "Food", 6_000, date(2024, 4, 10)))
        .await
        .unwrap();

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    assert_eq!(budget.spent_minor, 4_000);

    let moved = engine
        .update_budget(UpdateBudgetCmd {
            owner_id: "alice@example.com".to_string(),
            budget_id: budget.id,
            category: "Food".to_string(),
            month: 4,
            year: 2024,
            limit_minor: 50_000,
            alert_threshold_bps: None,
        })
        .await
        .unwrap();
    assert_eq!(moved.spent_minor, 6_000);
}

#[tokio::test]
async fn category_migration_repairs_both_budgets() {
    let engine = engine_with_db().await;

    let food = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    let transport = engine
        .create_budget(budget_cmd("alice@example.com", "Transport", 3, 2024, 20_000))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(expense("alice@example.com", "Food", 12_000, date(2024, 3, 5)))
        .await
        .unwrap();
    assert_eq!(
        engine.budget(food.id, "alice@example.com").await.unwrap().spent_minor,
        12_000
    );

    engine
        .update_transaction(UpdateTransactionCmd {
            owner_id: "alice@example.com".to_string(),
            transaction_id: tx.id,
            kind: TransactionKind::Expense,
            amount_minor: 12_000,
            category: "Transport".to_string(),
            currency: None,
            date: date(2024, 3, 5),
            description: None,
            merchant: None,
            payment_method: None,
            is_recurring: false,
            frequency: None,
            next_due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(
        engine.budget(food.id, "alice@example.com").await.unwrap().spent_minor,
        0
    );
    assert_eq!(
        engine
            .budget(transport.id, "alice@example.com")
            .await
            .unwrap()
            .spent_minor,
        12_000
    );
}

#[tokio::test]
async fn month_migration_repairs_both_periods() {
    let engine = engine_with_db().await;

    let march = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    let april = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 4, 2024, 50_000))
        .await
        .unwrap();

    let tx = engine
        .create_transaction(expense("alice@example.com", "Food", 8_000, date(2024, 3, 31)))
        .await
        .unwrap();

    engine
        .update_transaction(UpdateTransactionCmd {
            owner_id: "alice@example.com".to_string(),
            transaction_id: tx.id,
            kind: TransactionKind::Expense,
            amount_minor: 8_000,
            category: "Food".to_string(),
            currency: None,
            date: date(2024, 4, 1),
            description: None,
            merchant: None,
            payment_method: None,
            is_recurring: false,
            frequency: None,
            next_due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(
        engine.budget(march.id, "alice@example.com").await.unwrap().spent_minor,
        0
    );
    assert_eq!(
        engine.budget(april.id, "alice@example.com").await.unwrap().spent_minor,
        8_000
    );
}

#[tokio::test]
async fn kind_flip_releases_the_budget() {
    let engine = engine_with_db().await;

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(expense("alice@example.com", "Food", 12_000, date(2024, 3, 5)))
        .await
        .unwrap();

    // Reclassifying an expense as income must repair the old key even
    // though the new kind is not an expense.
    engine
        .update_transaction(UpdateTransactionCmd {
            owner_id: "alice@example.com".to_string(),
            transaction_id: tx.id,
            kind: TransactionKind::Income,
            amount_minor: 12_000,
            category: "Food".to_string(),
            currency: None,
            date: date(2024, 3, 5),
            description: None,
            merchant: None,
            payment_method: None,
            is_recurring: false,
            frequency: None,
            next_due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(
        engine.budget(budget.id, "alice@example.com").await.unwrap().spent_minor,
        0
    );
}

#[tokio::test]
async fn income_never_counts_as_spending() {
    let engine = engine_with_db().await;

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Income,
            30_000,
            "Food",
            date(2024, 3, 5),
        ))
        .await
        .unwrap();

    let budget = engine.budget(budget.id, "alice@example.com").await.unwrap();
    assert_eq!(budget.spent_minor, 0);
}

#[tokio::test]
async fn ownership_is_checked_after_existence() {
    let engine = engine_with_db().await;

    let budget = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 50_000))
        .await
        .unwrap();

    let err = engine.budget(budget.id, "bob@example.com").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .budget(uuid::Uuid::new_v4(), "bob@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn rejects_non_positive_limits_and_bad_periods() {
    let engine = engine_with_db().await;

    let err = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 3, 2024, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_budget(budget_cmd("alice@example.com", "Food", 13, 2024, 50_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

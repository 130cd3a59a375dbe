use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    Engine, EngineError, Frequency, NewTransactionCmd, TransactionKind, TransactionListFilter,
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

#[tokio::test]
async fn create_validates_input() {
    let engine = engine_with_db().await;

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Expense,
            0,
            "Food",
            date(2024, 3, 5),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Expense,
            1_000,
            "   ",
            date(2024, 3, 5),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_transaction(
            NewTransactionCmd::new(
                "alice@example.com",
                TransactionKind::Expense,
                1_000,
                "Food",
                date(2024, 3, 5),
            )
            .currency("EURO"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    // Recurring without a frequency violates the ledger invariant.
    let mut cmd = NewTransactionCmd::new(
        "alice@example.com",
        TransactionKind::Expense,
        1_000,
        "Food",
        date(2024, 3, 5),
    );
    cmd.is_recurring = true;
    let err = engine.create_transaction(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn currency_defaults_to_usd_and_uppercases() {
    let engine = engine_with_db().await;

    let tx = engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Expense,
            1_000,
            "Food",
            date(2024, 3, 5),
        ))
        .await
        .unwrap();
    assert_eq!(tx.currency, "USD");

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(
                "alice@example.com",
                TransactionKind::Expense,
                1_000,
                "Food",
                date(2024, 3, 5),
            )
            .currency("eur"),
        )
        .await
        .unwrap();
    assert_eq!(tx.currency, "EUR");
}

#[tokio::test]
async fn recurring_rows_project_their_due_date() {
    let engine = engine_with_db().await;

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(
                "alice@example.com",
                TransactionKind::Expense,
                4_900,
                "Subscriptions",
                date(2024, 1, 31),
            )
            .recurring(Frequency::Monthly),
        )
        .await
        .unwrap();
    // Month-end clamp: Jan 31 + 1 month lands on leap-day Feb 29.
    assert_eq!(tx.next_due_date, Some(date(2024, 2, 29)));

    let mut cmd = NewTransactionCmd::new(
        "alice@example.com",
        TransactionKind::Expense,
        4_900,
        "Subscriptions",
        date(2024, 1, 31),
    )
    .recurring(Frequency::Monthly);
    // A client-supplied due date is ignored on recurring rows.
    cmd.next_due_date = Some(date(2030, 1, 1));
    let tx = engine.create_transaction(cmd).await.unwrap();
    assert_eq!(tx.next_due_date, Some(date(2024, 2, 29)));
}

#[tokio::test]
async fn non_recurring_rows_keep_the_supplied_due_date() {
    let engine = engine_with_db().await;

    let mut cmd = NewTransactionCmd::new(
        "alice@example.com",
        TransactionKind::Expense,
        4_900,
        "Bills",
        date(2024, 3, 5),
    );
    cmd.next_due_date = Some(date(2024, 3, 20));
    let tx = engine.create_transaction(cmd).await.unwrap();
    assert_eq!(tx.next_due_date, Some(date(2024, 3, 20)));
}

#[tokio::test]
async fn update_reprojects_the_due_date() {
    let engine = engine_with_db().await;

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new(
                "alice@example.com",
                TransactionKind::Expense,
                4_900,
                "Subscriptions",
                date(2024, 1, 15),
            )
            .recurring(Frequency::Monthly),
        )
        .await
        .unwrap();
    assert_eq!(tx.next_due_date, Some(date(2024, 2, 15)));

    let updated = engine
        .update_transaction(UpdateTransactionCmd {
            owner_id: "alice@example.com".to_string(),
            transaction_id: tx.id,
            kind: TransactionKind::Expense,
            amount_minor: 4_900,
            category: "Subscriptions".to_string(),
            currency: None,
            date: date(2024, 1, 31),
            description: None,
            merchant: None,
            payment_method: None,
            is_recurring: true,
            frequency: Some(Frequency::Weekly),
            next_due_date: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.next_due_date, Some(date(2024, 2, 7)));
}

#[tokio::test]
async fn upcoming_window_is_inclusive_and_sorted() {
    let engine = engine_with_db().await;
    let today = date(2024, 3, 15);

    // Daily rows due today, in three days, and in four days (outside).
    for (day, category) in [(14, "due-today"), (17, "due-in-three"), (18, "too-late")] {
        engine
            .create_transaction(
                NewTransactionCmd::new(
                    "alice@example.com",
                    TransactionKind::Expense,
                    1_000,
                    category,
                    date(2024, 3, day),
                )
                .recurring(Frequency::Daily),
            )
            .await
            .unwrap();
    }
    // Non-recurring row with a due date inside the window stays out.
    let mut cmd = NewTransactionCmd::new(
        "alice@example.com",
        TransactionKind::Expense,
        1_000,
        "not-recurring",
        date(2024, 3, 10),
    );
    cmd.next_due_date = Some(date(2024, 3, 16));
    engine.create_transaction(cmd).await.unwrap();

    let upcoming = engine
        .upcoming_recurring("alice@example.com", today, 3)
        .await
        .unwrap();
    let categories: Vec<_> = upcoming.iter().map(|tx| tx.category.as_str()).collect();
    assert_eq!(categories, vec!["due-today", "due-in-three"]);
    assert_eq!(upcoming[0].next_due_date, Some(date(2024, 3, 15)));
    assert_eq!(upcoming[1].next_due_date, Some(date(2024, 3, 18)));
}

#[tokio::test]
async fn list_applies_filters_inclusively() {
    let engine = engine_with_db().await;

    for (amount, category, kind, day) in [
        (1_000, "Food", TransactionKind::Expense, 1),
        (2_000, "Food", TransactionKind::Income, 10),
        (3_000, "Transport", TransactionKind::Expense, 20),
        (4_000, "Food", TransactionKind::Expense, 31),
    ] {
        engine
            .create_transaction(NewTransactionCmd::new(
                "alice@example.com",
                kind,
                amount,
                category,
                date(2024, 3, day),
            ))
            .await
            .unwrap();
    }

    let all = engine
        .list_transactions("alice@example.com", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    // Newest first.
    assert_eq!(all[0].date, date(2024, 3, 31));

    let food_expenses = engine
        .list_transactions(
            "alice@example.com",
            &TransactionListFilter {
                category: Some("Food".to_string()),
                kind: Some(TransactionKind::Expense),
                from: Some(date(2024, 3, 1)),
                to: Some(date(2024, 3, 31)),
            },
        )
        .await
        .unwrap();
    let amounts: Vec<_> = food_expenses.iter().map(|tx| tx.amount_minor).collect();
    assert_eq!(amounts, vec![4_000, 1_000]);

    let err = engine
        .list_transactions(
            "alice@example.com",
            &TransactionListFilter {
                from: Some(date(2024, 4, 1)),
                to: Some(date(2024, 3, 1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn lists_are_scoped_to_one_owner() {
    let engine = engine_with_db().await;

    engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Expense,
            1_000,
            "Food",
            date(2024, 3, 5),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(
            "bob@example.com",
            TransactionKind::Expense,
            2_000,
            "Food",
            date(2024, 3, 6),
        ))
        .await
        .unwrap();

    let mine = engine
        .list_transactions("alice@example.com", &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].amount_minor, 1_000);
}

#[tokio::test]
async fn ownership_is_checked_after_existence() {
    let engine = engine_with_db().await;

    let tx = engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Expense,
            1_000,
            "Food",
            date(2024, 3, 5),
        ))
        .await
        .unwrap();

    let err = engine.transaction(tx.id, "bob@example.com").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .transaction(uuid::Uuid::new_v4(), "alice@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .delete_transaction(tx.id, "bob@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn delete_removes_the_row() {
    let engine = engine_with_db().await;

    let tx = engine
        .create_transaction(NewTransactionCmd::new(
            "alice@example.com",
            TransactionKind::Expense,
            1_000,
            "Food",
            date(2024, 3, 5),
        ))
        .await
        .unwrap();

    engine
        .delete_transaction(tx.id, "alice@example.com")
        .await
        .unwrap();
    let err = engine
        .transaction(tx.id, "alice@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

mod common;

use common::{add_book, add_patron, date, quantity, test_db};
use futures::TryStreamExt;
use stacks_core::{CoreError, LoanPolicy, LoanStatus, Money};
use stacks_db::{Database, DbConfig, ServiceError};
use tempfile::TempDir;

const DUNE: &str = "9780441013593";

async fn library() -> Database {
    let db = test_db().await;
    add_book(&db, DUNE, "Dune", "Science Fiction", &[("Frank", "Herbert")], 2).await;
    add_patron(&db, "ada@example.org", "Lovelace").await;
    add_patron(&db, "bob@example.com", "Babbage").await;
    add_patron(&db, "cy@example.edu", "Cyril").await;
    db
}

/// Copies on the shelf plus copies out on loan.
async fn copies_accounted(db: &Database) -> i64 {
    let on_shelf = quantity(db, DUNE).await;
    assert!(on_shelf >= 0);
    on_shelf + db.loans().count_for_book(DUNE).await.unwrap()
}

fn domain(err: ServiceError) -> CoreError {
    match err {
        ServiceError::Domain(e) => e,
        ServiceError::Store(e) => panic!("unexpected store error: {e}"),
    }
}

#[tokio::test]
async fn test_assign_then_return_same_day_is_free() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());
    let today = date(2024, 3, 1);

    let loan = lending.assign_book("ada@example.org", DUNE, today).await.unwrap();
    assert_eq!(loan.borrow_date, today);
    assert_eq!(loan.due_date, date(2024, 3, 15));
    assert_eq!(quantity(&db, DUNE).await, 1);

    let receipt = lending.return_book("ada@example.org", DUNE, today).await.unwrap();
    assert_eq!(receipt.overdue_days, 0);
    assert!(receipt.charge.is_zero());
    assert_eq!(receipt.loan, loan);
    assert_eq!(quantity(&db, DUNE).await, 2);
}

#[tokio::test]
async fn test_return_one_day_late_charges_one_day() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());

    let loan = lending
        .assign_book("ada@example.org", DUNE, date(2024, 3, 1))
        .await
        .unwrap();
    let late = loan.due_date.succ_opt().unwrap();

    let receipt = lending.return_book("ada@example.org", DUNE, late).await.unwrap();
    assert_eq!(receipt.overdue_days, 1);
    assert_eq!(receipt.charge, Money::from_cents(25));
    assert!(receipt.was_late());
}

#[tokio::test]
async fn test_configured_policy_applies() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::new(7, Money::from_cents(10)));

    let loan = lending
        .assign_book("ada@example.org", DUNE, date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(loan.due_date, date(2024, 1, 8));

    let receipt = lending
        .return_book("ada@example.org", DUNE, date(2024, 1, 11))
        .await
        .unwrap();
    assert_eq!(receipt.overdue_days, 3);
    assert_eq!(receipt.charge, Money::from_cents(30));
}

#[tokio::test]
async fn test_out_of_stock_reports_earliest_due_date() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());

    lending
        .assign_book("bob@example.com", DUNE, date(2024, 3, 5))
        .await
        .unwrap();
    lending
        .assign_book("ada@example.org", DUNE, date(2024, 3, 1))
        .await
        .unwrap();

    let err = lending
        .assign_book("cy@example.edu", DUNE, date(2024, 3, 6))
        .await
        .unwrap_err();

    match domain(err) {
        CoreError::OutOfStock {
            isbn,
            next_available,
        } => {
            assert_eq!(isbn, DUNE);
            assert_eq!(next_available, Some(date(2024, 3, 15)));
        }
        other => panic!("expected OutOfStock, got {other:?}"),
    }
    assert_eq!(quantity(&db, DUNE).await, 0);
}

#[tokio::test]
async fn test_out_of_stock_without_loans_has_no_date() {
    let db = test_db().await;
    add_book(&db, "111", "Rare", "Archive", &[("Old", "Scribe")], 0).await;
    add_patron(&db, "ada@example.org", "Lovelace").await;

    let err = db
        .lending(LoanPolicy::default())
        .assign_book("ada@example.org", "111", date(2024, 3, 1))
        .await
        .unwrap_err();

    assert!(matches!(
        domain(err),
        CoreError::OutOfStock {
            next_available: None,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unknown_book_or_patron_changes_nothing() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());
    let today = date(2024, 3, 1);

    let err = lending.assign_book("ada@example.org", "nope", today).await.unwrap_err();
    assert!(matches!(domain(err), CoreError::BookNotFound(_)));

    let err = lending.assign_book("ghost@example.org", DUNE, today).await.unwrap_err();
    assert!(matches!(domain(err), CoreError::PatronNotFound(_)));

    // Book is checked before patron on return
    let err = lending.return_book("ghost@example.org", "nope", today).await.unwrap_err();
    assert!(matches!(domain(err), CoreError::BookNotFound(_)));

    assert_eq!(quantity(&db, DUNE).await, 2);
    assert_eq!(db.loans().count_for_book(DUNE).await.unwrap(), 0);
}

#[tokio::test]
async fn test_return_without_loan_is_loan_not_found() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());

    let err = lending
        .return_book("ada@example.org", DUNE, date(2024, 3, 1))
        .await
        .unwrap_err();

    assert!(matches!(domain(err), CoreError::LoanNotFound { .. }));
    assert_eq!(quantity(&db, DUNE).await, 2);
}

#[tokio::test]
async fn test_second_loan_of_same_book_is_rejected() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());
    let today = date(2024, 3, 1);

    lending.assign_book("ada@example.org", DUNE, today).await.unwrap();
    let err = lending.assign_book("ada@example.org", DUNE, today).await.unwrap_err();

    assert!(matches!(domain(err), CoreError::AlreadyBorrowed { .. }));
    assert_eq!(quantity(&db, DUNE).await, 1);
}

#[tokio::test]
async fn test_copies_are_conserved() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::default());
    let today = date(2024, 3, 1);

    assert_eq!(copies_accounted(&db).await, 2);

    lending.assign_book("ada@example.org", DUNE, today).await.unwrap();
    assert_eq!(copies_accounted(&db).await, 2);

    lending.assign_book("bob@example.com", DUNE, today).await.unwrap();
    assert_eq!(copies_accounted(&db).await, 2);

    let _ = lending.assign_book("cy@example.edu", DUNE, today).await.unwrap_err();
    assert_eq!(copies_accounted(&db).await, 2);

    lending.return_book("ada@example.org", DUNE, today).await.unwrap();
    assert_eq!(copies_accounted(&db).await, 2);

    lending.assign_book("cy@example.edu", DUNE, today).await.unwrap();
    assert_eq!(copies_accounted(&db).await, 2);
    assert_eq!(quantity(&db, DUNE).await, 0);
}

#[tokio::test]
async fn test_list_overdue_is_strict_and_ordered() {
    let db = library().await;
    add_book(&db, "222", "Mort", "Fantasy", &[("Terry", "Pratchett")], 1).await;
    let lending = db.lending(LoanPolicy::default());

    // Due 03/15, 03/12 and 03/20
    lending.assign_book("ada@example.org", DUNE, date(2024, 3, 1)).await.unwrap();
    lending.assign_book("bob@example.com", "222", date(2024, 2, 27)).await.unwrap();
    lending.assign_book("cy@example.edu", DUNE, date(2024, 3, 6)).await.unwrap();

    let overdue: Vec<_> = lending
        .list_overdue(date(2024, 3, 15))
        .try_collect()
        .await
        .unwrap();

    // Due today is not overdue
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].isbn, "222");

    let overdue: Vec<_> = lending
        .list_overdue(date(2024, 4, 1))
        .try_collect()
        .await
        .unwrap();
    let dues: Vec<_> = overdue.iter().map(|l| l.due_date).collect();
    assert_eq!(dues, vec![date(2024, 3, 12), date(2024, 3, 15), date(2024, 3, 20)]);
}

#[tokio::test]
async fn test_borrowed_by_patron_statuses() {
    let db = library().await;
    add_book(&db, "222", "Mort", "Fantasy", &[("Terry", "Pratchett")], 1).await;
    add_book(&db, "333", "Emma", "Classics", &[("Jane", "Austen")], 1).await;
    let lending = db.lending(LoanPolicy::default());

    lending.assign_book("ada@example.org", DUNE, date(2024, 3, 1)).await.unwrap();
    lending.assign_book("ada@example.org", "222", date(2024, 3, 5)).await.unwrap();
    lending.assign_book("ada@example.org", "333", date(2024, 3, 10)).await.unwrap();

    let items = lending
        .list_borrowed_by_patron("ada@example.org", date(2024, 3, 19))
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "Dune");
    assert_eq!(
        items[0].status,
        LoanStatus::Overdue {
            days: 4,
            charge: Money::from_cents(100)
        }
    );
    assert_eq!(items[1].title, "Mort");
    assert_eq!(items[1].status, LoanStatus::DueToday);
    assert_eq!(items[2].title, "Emma");
    assert_eq!(items[2].status, LoanStatus::Upcoming { days_remaining: 5 });

    let none = lending
        .list_borrowed_by_patron("bob@example.com", date(2024, 3, 19))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_assign_of_last_copy_has_one_winner() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("stacks.db")).max_connections(4))
        .await
        .unwrap();
    add_book(&db, "111", "Only Copy", "Archive", &[("Solo", "Writer")], 1).await;
    add_patron(&db, "ada@example.org", "Lovelace").await;
    add_patron(&db, "bob@example.com", "Babbage").await;

    let today = date(2024, 3, 1);
    let first = db.lending(LoanPolicy::default());
    let second = db.lending(LoanPolicy::default());

    let a = tokio::spawn(async move { first.assign_book("ada@example.org", "111", today).await });
    let b = tokio::spawn(async move { second.assign_book("bob@example.com", "111", today).await });

    let results = [a.await.unwrap(), b.await.unwrap()];

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    for result in results {
        if let Err(err) = result {
            assert!(matches!(domain(err), CoreError::OutOfStock { .. }));
        }
    }

    assert_eq!(quantity(&db, "111").await, 0);
    assert_eq!(db.loans().count_for_book("111").await.unwrap(), 1);

    db.close().await;
}

#[tokio::test]
async fn test_unrepresentable_due_date_is_an_error_not_a_panic() {
    let db = library().await;
    let lending = db.lending(LoanPolicy::new(100_000_000, Money::from_cents(25)));

    let err = lending
        .assign_book("ada@example.org", DUNE, date(2024, 3, 1))
        .await
        .unwrap_err();

    assert!(matches!(domain(err), CoreError::PolicyOutOfRange(_)));
    assert_eq!(quantity(&db, DUNE).await, 2);
    assert_eq!(db.loans().count_for_book(DUNE).await.unwrap(), 0);
}

#[tokio::test]
async fn test_overflowing_charge_keeps_the_loan_open() {
    let db = library().await;
    db.lending(LoanPolicy::default())
        .assign_book("ada@example.org", DUNE, date(2024, 3, 1))
        .await
        .unwrap();

    let greedy = db.lending(LoanPolicy::new(14, Money::from_cents(i64::MAX / 2)));
    let err = greedy
        .return_book("ada@example.org", DUNE, date(2024, 3, 20))
        .await
        .unwrap_err();
    assert!(matches!(domain(err), CoreError::PolicyOutOfRange(_)));

    let err = greedy
        .list_borrowed_by_patron("ada@example.org", date(2024, 3, 20))
        .await
        .unwrap_err();
    assert!(matches!(domain(err), CoreError::PolicyOutOfRange(_)));

    assert_eq!(quantity(&db, DUNE).await, 1);
    assert!(db.loans().get(DUNE, "ada@example.org").await.unwrap().is_some());
}

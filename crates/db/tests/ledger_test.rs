//! Integration tests for the ledger repository.
//!
//! Covers provisioning, allocation, and single-credit debit/refund against a
//! real Postgres database. Each test creates its own accounts.

mod common;

use entryflow_core::ledger::{
    AccountKind, AllocateInput, CreateRetailerInput, DuplicateField, LedgerError,
};
use entryflow_db::{AccountRepository, LedgerRepository};

use common::{balance, create_distributor, create_retailer, profile, setup};

// ============================================================================
// Provisioning
// ============================================================================

#[tokio::test]
async fn test_create_retailer_moves_quota() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 100).await;

    let retailer = create_retailer(&db, &dist, 10).await;

    assert_eq!(retailer.total_amount, 10);
    assert_eq!(retailer.kind(), AccountKind::Retailer);
    assert_eq!(retailer.distributor_id.as_deref(), Some(dist.username.as_str()));
    assert_eq!(retailer.distributor_name.as_deref(), Some(dist.name.as_str()));

    let dist = balance(&db, &dist.username).await;
    assert_eq!(dist.total_amount, 100);
    assert_eq!(dist.used_amount, 10);
    assert_eq!(dist.kind(), AccountKind::Distributor);
    assert_eq!(dist.available(), 90);
}

#[tokio::test]
async fn test_create_retailer_with_zero_amount() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 0).await;

    let retailer = create_retailer(&db, &dist, 0).await;
    assert_eq!(retailer.total_amount, 0);
    assert_eq!(balance(&db, &dist.username).await.used_amount, 0);
}

#[tokio::test]
async fn test_create_retailer_duplicates_rejected() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 100).await;
    let repo = LedgerRepository::new(db.clone());
    let existing = create_retailer(&db, &dist, 5).await;

    let cases = [
        (
            {
                let mut p = profile();
                p.username = existing.username.clone();
                p
            },
            DuplicateField::Username,
        ),
        (
            {
                let mut p = profile();
                p.mobile = existing.mobile.clone();
                p
            },
            DuplicateField::Mobile,
        ),
        (
            {
                let mut p = profile();
                p.email = existing.email.clone();
                p
            },
            DuplicateField::Email,
        ),
    ];

    for (profile, expected) in cases {
        let result = repo
            .create_retailer(CreateRetailerInput {
                distributor_username: dist.username.clone(),
                distributor_name: None,
                profile,
                amount: 5,
            })
            .await;
        assert!(
            matches!(result, Err(LedgerError::DuplicateAccount { field }) if field == expected),
            "expected duplicate {expected}, got {result:?}"
        );
    }

    // Nothing beyond the first retailer was charged.
    assert_eq!(balance(&db, &dist.username).await.used_amount, 5);
}

#[tokio::test]
async fn test_create_retailer_insufficient_quota() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 3).await;
    let profile = profile();
    let username = profile.username.clone();

    let result = LedgerRepository::new(db.clone())
        .create_retailer(CreateRetailerInput {
            distributor_username: dist.username.clone(),
            distributor_name: None,
            profile,
            amount: 4,
        })
        .await;

    assert!(matches!(
        result,
        Err(LedgerError::InsufficientBalance {
            available: 3,
            requested: 4
        })
    ));
    assert_eq!(balance(&db, &dist.username).await.used_amount, 0);
    let missing = AccountRepository::new(db.clone())
        .find_by_username(&username)
        .await
        .unwrap();
    assert!(missing.is_none(), "retailer row must be rolled back");
}

#[tokio::test]
async fn test_create_retailer_unknown_distributor() {
    let Some(db) = setup().await else { return };

    let result = LedgerRepository::new(db.clone())
        .create_retailer(CreateRetailerInput {
            distributor_username: "no_such_distributor".to_string(),
            distributor_name: None,
            profile: profile(),
            amount: 1,
        })
        .await;

    assert!(matches!(result, Err(LedgerError::DistributorNotFound(_))));
}

// ============================================================================
// Allocation
// ============================================================================

#[tokio::test]
async fn test_allocate_by_username_and_mobile() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 50).await;
    let retailer = create_retailer(&db, &dist, 10).await;
    let repo = LedgerRepository::new(db.clone());

    let done = repo
        .allocate(AllocateInput {
            distributor_username: dist.username.clone(),
            retailer: retailer.username.clone(),
            amount: 15,
        })
        .await
        .unwrap();
    assert_eq!(done.retailer.total_amount, 25);
    assert_eq!(done.distributor.used_amount, 25);

    let done = repo
        .allocate(AllocateInput {
            distributor_username: dist.username.clone(),
            retailer: retailer.mobile.clone(),
            amount: 5,
        })
        .await
        .unwrap();
    assert_eq!(done.retailer.username, retailer.username);
    assert_eq!(done.retailer.total_amount, 30);
    assert_eq!(done.distributor.used_amount, 30);
}

#[tokio::test]
async fn test_allocate_exact_available_then_exhausted() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 20).await;
    let retailer = create_retailer(&db, &dist, 12).await;
    let repo = LedgerRepository::new(db.clone());

    let input = AllocateInput {
        distributor_username: dist.username.clone(),
        retailer: retailer.username.clone(),
        amount: 8,
    };

    assert!(repo.allocate(input.clone()).await.is_ok());
    let second = repo.allocate(input).await;
    assert!(matches!(
        second,
        Err(LedgerError::InsufficientBalance {
            available: 0,
            requested: 8
        })
    ));

    assert_eq!(balance(&db, &retailer.username).await.total_amount, 20);
    let dist = balance(&db, &dist.username).await;
    assert_eq!(dist.used_amount, dist.total_amount);
}

#[tokio::test]
async fn test_allocate_missing_parties() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 20).await;
    let retailer = create_retailer(&db, &dist, 1).await;
    let repo = LedgerRepository::new(db.clone());

    let missing_retailer = repo
        .allocate(AllocateInput {
            distributor_username: dist.username.clone(),
            retailer: "nobody".to_string(),
            amount: 1,
        })
        .await;
    assert!(matches!(
        missing_retailer,
        Err(LedgerError::RetailerNotFound(name)) if name == "nobody"
    ));

    let missing_distributor = repo
        .allocate(AllocateInput {
            distributor_username: "ghost".to_string(),
            retailer: retailer.username.clone(),
            amount: 1,
        })
        .await;
    assert!(matches!(
        missing_distributor,
        Err(LedgerError::DistributorNotFound(_))
    ));

    // A distributor is never matched as the retailer side.
    let other = create_distributor(&db, 5).await;
    let wrong_kind = repo
        .allocate(AllocateInput {
            distributor_username: dist.username.clone(),
            retailer: other.username.clone(),
            amount: 1,
        })
        .await;
    assert!(matches!(wrong_kind, Err(LedgerError::RetailerNotFound(_))));
}

#[tokio::test]
async fn test_allocate_rejects_non_positive_amount() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 20).await;
    let retailer = create_retailer(&db, &dist, 1).await;

    let result = LedgerRepository::new(db.clone())
        .allocate(AllocateInput {
            distributor_username: dist.username.clone(),
            retailer: retailer.username.clone(),
            amount: 0,
        })
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidAmount(0))));
}

// ============================================================================
// Debit / refund
// ============================================================================

#[tokio::test]
async fn test_debit_and_refund_one() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 10).await;
    let retailer = create_retailer(&db, &dist, 1).await;
    let repo = LedgerRepository::new(db.clone());

    let before = repo.debit_one(&retailer.username).await.unwrap();
    assert_eq!(before, 1);
    assert_eq!(balance(&db, &retailer.username).await.total_amount, 0);

    let empty = repo.debit_one(&retailer.username).await;
    assert!(matches!(
        empty,
        Err(LedgerError::InsufficientBalance {
            available: 0,
            requested: 1
        })
    ));

    assert_eq!(repo.refund_one(&retailer.username).await.unwrap(), 1);
    assert_eq!(balance(&db, &retailer.username).await.total_amount, 1);

    assert!(matches!(
        repo.debit_one("missing_user").await,
        Err(LedgerError::AccountNotFound(_))
    ));
}

// ============================================================================
// Account queries
// ============================================================================

#[tokio::test]
async fn test_account_queries() {
    let Some(db) = setup().await else { return };
    let dist = create_distributor(&db, 10).await;
    let first = create_retailer(&db, &dist, 1).await;
    let second = create_retailer(&db, &dist, 2).await;
    let repo = AccountRepository::new(db.clone());

    let listed = repo.list_by_distributor(&dist.username).await.unwrap();
    let names: Vec<_> = listed.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, vec![second.username.as_str(), first.username.as_str()]);

    let login = repo
        .find_for_login(&first.username.to_uppercase(), "secret")
        .await
        .unwrap();
    assert_eq!(login.map(|a| a.id), Some(first.id));

    let wrong = repo.find_for_login(&first.username, "nope").await.unwrap();
    assert!(wrong.is_none());
}

use super::*;

#[tokio::test]
async fn clean_ledger_reconciles_with_zero_drift() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 3)
        .await
        .unwrap();
    app.ledger
        .cancel_booking(&booking.id_string(), &alice, 1)
        .await
        .unwrap();

    let report = app.ledger.reconcile(&event_id).await.unwrap();
    assert_eq!(report.drift, 0);
    assert!(!report.repaired);
    assert!(!report.frozen);
    assert_eq!(report.stored_available, 8);
    assert_eq!(report.computed_available, 8);
}

#[tokio::test]
async fn reconcile_repairs_injected_drift_and_is_idempotent() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;

    app.ledger
        .create_booking(&event_id, &customer("alice"), 4)
        .await
        .unwrap();

    // crash between capacity decrement and booking write would leave
    // exactly this shape
    app.corrupt_available(&event_id, 9).await;

    let report = app.ledger.reconcile(&event_id).await.unwrap();
    assert!(report.repaired);
    assert_eq!(report.stored_available, 9);
    assert_eq!(report.computed_available, 6);
    assert_eq!(app.available(&event_id).await, 6);
    app.assert_invariant(&event_id).await;

    // second pass finds nothing to do
    let report = app.ledger.reconcile(&event_id).await.unwrap();
    assert!(!report.repaired);
    assert_eq!(report.drift, 0);
}

#[tokio::test]
async fn consistency_violation_freezes_event_until_reconciled() {
    let app = test_app().await;
    let event_id = app.seed_event(5, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 2)
        .await
        .unwrap();

    // drift upward: the store now believes everything is still available,
    // so the upcoming release would overshoot the total
    app.corrupt_available(&event_id, 5).await;

    let err = app
        .ledger
        .cancel_booking(&booking.id_string(), &alice, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Consistency(_)));
    assert!(app.ledger.is_frozen(&event_id));

    // frozen events refuse further mutations
    let err = app
        .ledger
        .create_booking(&event_id, &customer("bob"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EventFrozen(_)));

    // the booking write never landed, so the booking is still active
    let report = app.ledger.reconcile(&event_id).await.unwrap();
    assert!(report.repaired);
    assert!(!report.frozen);
    assert!(!app.ledger.is_frozen(&event_id));
    assert_eq!(app.available(&event_id).await, 3);
    app.assert_invariant(&event_id).await;

    // and normal operation resumes
    let cancelled = app
        .ledger
        .cancel_booking(&booking.id_string(), &alice, 2)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(app.available(&event_id).await, 5);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn unrepairable_oversell_stays_frozen() {
    let app = test_app().await;
    let event_id = app.seed_event(5, 25.0).await;

    app.ledger
        .create_booking(&event_id, &customer("alice"), 5)
        .await
        .unwrap();

    // shrink the total behind the store's back: active bookings now
    // exceed capacity and no available count can satisfy the invariant
    let thing: surrealdb::RecordId = event_id.parse().unwrap();
    app.db
        .db
        .query("UPDATE $event SET total_tickets = 3")
        .bind(("event", thing))
        .await
        .unwrap();

    let report = app.ledger.reconcile(&event_id).await.unwrap();
    assert!(!report.repaired);
    assert!(report.frozen);
    assert!(report.computed_available < 0);
    assert!(app.ledger.is_frozen(&event_id));
}

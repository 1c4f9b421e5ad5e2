use super::*;

#[tokio::test]
async fn full_cancel_restores_exactly_what_was_consumed() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 3)
        .await
        .unwrap();
    assert_eq!(app.available(&event_id).await, 7);

    let cancelled = app
        .ledger
        .cancel_booking(&booking.id_string(), &alice, 3)
        .await
        .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.quantity, 0);
    assert_eq!(cancelled.cancelled_quantity, 3);
    assert_eq!(cancelled.amount_due, 0.0);
    assert!(cancelled.cancelled_at.is_some());

    // back to the pre-create value
    assert_eq!(app.available(&event_id).await, 10);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn partial_cancel_releases_only_the_cancelled_units() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 3)
        .await
        .unwrap();

    let updated = app
        .ledger
        .cancel_booking(&booking.id_string(), &alice, 1)
        .await
        .unwrap();

    assert_eq!(updated.status, BookingStatus::PartiallyCancelled);
    assert_eq!(updated.quantity, 2);
    assert_eq!(updated.cancelled_quantity, 1);
    // amount recomputed against the snapshot price
    assert_eq!(updated.amount_due, 50.0);
    assert!(updated.cancelled_at.is_none());

    assert_eq!(app.available(&event_id).await, 8);
    app.assert_invariant(&event_id).await;

    // cancelling the rest reaches the terminal state
    let finished = app
        .ledger
        .cancel_booking(&booking.id_string(), &alice, 2)
        .await
        .unwrap();
    assert_eq!(finished.status, BookingStatus::Cancelled);
    assert_eq!(finished.cancelled_quantity, 3);
    assert_eq!(app.available(&event_id).await, 10);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn terminal_booking_rejects_further_cancels_without_touching_capacity() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 2)
        .await
        .unwrap();
    app.ledger
        .cancel_booking(&booking.id_string(), &alice, 2)
        .await
        .unwrap();
    assert_eq!(app.available(&event_id).await, 10);

    // second cancel must not release a second time
    let err = app
        .ledger
        .cancel_booking(&booking.id_string(), &alice, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyCancelled));
    assert_eq!(app.available(&event_id).await, 10);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn cancel_quantity_must_be_within_held_range() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 3)
        .await
        .unwrap();

    for cancel_qty in [0, -2, 4] {
        let err = app
            .ledger
            .cancel_booking(&booking.id_string(), &alice, cancel_qty)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidQuantity { .. }));
    }
    assert_eq!(app.available(&event_id).await, 7);
}

#[tokio::test]
async fn only_the_holder_or_an_admin_may_cancel() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 2)
        .await
        .unwrap();

    let err = app
        .ledger
        .cancel_booking(&booking.id_string(), &customer("mallory"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotBookingHolder));
    assert_eq!(app.available(&event_id).await, 8);

    // the administrative path bypasses the holder check
    let cancelled = app
        .ledger
        .cancel_booking(&booking.id_string(), &admin(), 2)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(app.available(&event_id).await, 10);
}

#[tokio::test]
async fn missing_booking_is_not_found() {
    let app = test_app().await;
    let err = app
        .ledger
        .cancel_booking("booking:nope", &customer("alice"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BookingNotFound(_)));
}

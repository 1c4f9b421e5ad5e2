use super::*;

#[tokio::test]
async fn create_snapshots_price_and_decrements_capacity() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;

    let booking = app
        .ledger
        .create_booking(&event_id, &customer("alice"), 3)
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.quantity, 3);
    assert_eq!(booking.cancelled_quantity, 0);
    assert_eq!(booking.unit_price, 25.0);
    assert_eq!(booking.amount_due, 75.0);
    assert_eq!(booking.ticket_code.len(), 8);
    assert!(booking.cancelled_at.is_none());

    assert_eq!(app.available(&event_id).await, 7);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn rejects_quantity_below_one() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;

    for quantity in [0, -1] {
        let err = app
            .ledger
            .create_booking(&event_id, &customer("alice"), quantity)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidQuantity { .. }));
    }
    assert_eq!(app.available(&event_id).await, 10);
}

#[tokio::test]
async fn rejects_above_per_booking_max() {
    let app = test_app().await;
    let event_id = app.seed_event(100, 25.0).await;

    let err = app
        .ledger
        .create_booking(&event_id, &customer("alice"), MAX_PER_BOOKING + 1)
        .await
        .unwrap_err();
    match err {
        LedgerError::TooManyUnits { max } => assert_eq!(max, MAX_PER_BOOKING),
        other => panic!("unexpected error: {other:?}"),
    }

    // rejection consumed nothing
    assert_eq!(app.available(&event_id).await, 100);
    assert!(
        app.bookings
            .find_active_by_event(&event_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn sold_out_leaves_no_record_behind() {
    let app = test_app().await;
    let event_id = app.seed_event(2, 25.0).await;

    let err = app
        .ledger
        .create_booking(&event_id, &customer("alice"), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SoldOut));

    assert_eq!(app.available(&event_id).await, 2);
    assert!(
        app.bookings
            .find_active_by_event(&event_id)
            .await
            .unwrap()
            .is_empty()
    );
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn unknown_event_is_rejected() {
    let app = test_app().await;
    let err = app
        .ledger
        .create_booking("event:nope", &customer("alice"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EventNotFound(_)));
}

#[tokio::test]
async fn no_oversell_under_concurrent_creates() {
    let app = test_app().await;
    let event_id = app.seed_event(5, 10.0).await;

    let mut handles = Vec::new();
    for i in 0..12 {
        let ledger = app.ledger.clone();
        let event_id = event_id.clone();
        handles.push(tokio::spawn(async move {
            let holder = customer(&format!("buyer{i}"));
            ledger.create_booking(&event_id, &holder, 1).await
        }));
    }

    let mut successes = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(LedgerError::SoldOut) => sold_out += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(successes, 5);
    assert_eq!(sold_out, 7);
    assert_eq!(app.available(&event_id).await, 0);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn later_price_edit_does_not_change_amount_due() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;

    let booking = app
        .ledger
        .create_booking(&event_id, &customer("alice"), 2)
        .await
        .unwrap();

    app.events
        .update_details(
            &event_id,
            EventUpdate {
                ticket_price: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reloaded = app
        .bookings
        .find_by_id(&booking.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.unit_price, 25.0);
    assert_eq!(reloaded.amount_due, 50.0);
}

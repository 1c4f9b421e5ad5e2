use super::*;

use crate::db::models::AccountStatus;

#[tokio::test]
async fn capacity_edit_floor_is_the_sold_count() {
    let app = test_app().await;
    let event_id = app.seed_event(100, 20.0).await;

    // 40 sold across eight holders
    for i in 0..8 {
        app.ledger
            .create_booking(&event_id, &customer(&format!("buyer{i}")), 5)
            .await
            .unwrap();
    }
    assert_eq!(app.available(&event_id).await, 60);

    let err = app.coordinator.set_capacity(&event_id, 39).await.unwrap_err();
    match err {
        LedgerError::BelowSoldCount { sold } => assert_eq!(sold, 40),
        other => panic!("unexpected error: {other:?}"),
    }
    // refused, not adjusted
    assert_eq!(app.available(&event_id).await, 60);

    let event = app.coordinator.set_capacity(&event_id, 41).await.unwrap();
    assert_eq!(event.total_tickets, 41);
    assert_eq!(event.available_tickets, 1);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn capacity_must_stay_positive() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 20.0).await;

    let err = app.coordinator.set_capacity(&event_id, 0).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidQuantity { .. }));
}

#[tokio::test]
async fn deletion_cascade_cancels_every_active_booking() {
    let app = test_app().await;
    let event_id = app.seed_event(20, 15.0).await;

    let mut booking_ids = Vec::new();
    for i in 0..3 {
        let booking = app
            .ledger
            .create_booking(&event_id, &customer(&format!("holder{i}")), 2)
            .await
            .unwrap();
        booking_ids.push(booking.id_string());
    }

    let deletion = app.coordinator.delete_event(&event_id).await.unwrap();
    assert_eq!(deletion.cancelled_bookings, 3);

    // event record is gone
    assert!(app.events.find_by_id(&event_id).await.unwrap().is_none());

    // every booking ended terminal
    for id in &booking_ids {
        let booking = app.bookings.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.quantity, 0);
    }
}

#[tokio::test]
async fn failed_cascade_aborts_and_restores_pre_deletion_state() {
    let app = test_app().await;
    let event_id = app.seed_event(20, 15.0).await;

    let mut booking_ids = Vec::new();
    for i in 0..3 {
        let booking = app
            .ledger
            .create_booking(&event_id, &customer(&format!("holder{i}")), 3)
            .await
            .unwrap();
        booking_ids.push(booking.id_string());
    }
    assert_eq!(app.available(&event_id).await, 11);

    let mut coordinator = AdminCoordinator::new(
        app.db.db.clone(),
        app.inventory.clone(),
        app.ledger.clone(),
    );
    // the cancel of the 2nd booking fails
    coordinator.fail_cancel_at = Some(1);

    let err = coordinator.delete_event(&event_id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Database(_)));

    // event survived, all bookings back to their pre-deletion state
    assert!(app.events.find_by_id(&event_id).await.unwrap().is_some());
    for id in &booking_ids {
        let booking = app.bookings.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.quantity, 3);
        assert_eq!(booking.cancelled_quantity, 0);
    }
    assert_eq!(app.available(&event_id).await, 11);
    app.assert_invariant(&event_id).await;
}

#[tokio::test]
async fn deleting_a_missing_event_is_not_found() {
    let app = test_app().await;
    let err = app.coordinator.delete_event("event:nope").await.unwrap_err();
    assert!(matches!(err, LedgerError::EventNotFound(_)));
}

#[tokio::test]
async fn suspension_never_touches_existing_bookings() {
    let app = test_app().await;
    let event_id = app.seed_event(10, 25.0).await;
    let alice = customer("alice");

    // the coordinator needs a real user record to suspend
    let user = crate::db::repository::UserRepository::new(app.db.db.clone())
        .create(crate::db::models::UserCreate {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "not-a-real-hash".to_string(),
            role: Role::Customer,
            account_status: AccountStatus::Active,
            phone: String::new(),
            address: String::new(),
            profile_image: String::new(),
            last_login: None,
            created_at: now_rfc3339(),
        })
        .await
        .unwrap();

    let booking = app
        .ledger
        .create_booking(&event_id, &alice, 2)
        .await
        .unwrap();

    let suspended = app
        .coordinator
        .set_account_status(&user.id_string(), AccountStatus::Disabled)
        .await
        .unwrap();
    assert_eq!(suspended.account_status, AccountStatus::Disabled);

    // booking still active, still counted, still visible
    let reloaded = app
        .bookings
        .find_by_id(&booking.id_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, BookingStatus::Confirmed);
    assert_eq!(reloaded.quantity, 2);
    assert_eq!(app.available(&event_id).await, 8);
    app.assert_invariant(&event_id).await;
}

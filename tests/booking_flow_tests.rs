//! End-to-end booking flow tests: request, approve, cancel, reschedule, and
//! the cross-entity invariant that no booked slot is ever orphaned.

#![cfg(feature = "local-repo")]

mod support;

use std::sync::Arc;

use fas_rust::api::AppointmentStatus;
use fas_rust::availability::list_open_slots;
use fas_rust::booking::{
    book_slot, release_slot, request_appointment, set_appointment_status, BookingError,
    StatusChange,
};
use fas_rust::db::repositories::LocalRepository;
use fas_rust::db::repository::{AppointmentRepository, AvailabilityRepository};

use support::{
    appointment_request, assert_no_orphaned_bookings, date, faculty, range, settings,
    weekly_commitments, MONDAY,
};

#[tokio::test]
async fn test_student_books_afternoon_slot() {
    // Scenario: student books the 2:00-2:30 PM slot; the appointment becomes
    // approved and re-querying open slots excludes 2:00-2:30 PM.
    let repo = LocalRepository::new();
    repo.store_recurring_commitments(&faculty(), &weekly_commitments())
        .await
        .unwrap();

    let open = list_open_slots(&repo, &settings(), &faculty(), date(MONDAY))
        .await
        .unwrap();
    assert!(open.contains(&"2:00 PM - 2:30 PM".to_string()));

    let appointment = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "2:00 PM - 2:30 PM"),
    )
    .await
    .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);

    book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("2:00 PM - 2:30 PM"),
        &appointment.id,
    )
    .await
    .unwrap();

    let stored = repo.fetch_appointment(&appointment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Approved);

    let open = list_open_slots(&repo, &settings(), &faculty(), date(MONDAY))
        .await
        .unwrap();
    assert!(!open.contains(&"2:00 PM - 2:30 PM".to_string()));

    assert_no_orphaned_bookings(&repo, &faculty(), &[date(MONDAY)]).await;
}

#[tokio::test]
async fn test_booking_exclusivity_under_concurrency() {
    // Two students race for the last open slot: exactly one wins, the other
    // observes SlotUnavailable or TransactionConflict, and the final state
    // has exactly one booked slot and one approved appointment.
    let repo = Arc::new(LocalRepository::new());

    let a = request_appointment(
        repo.as_ref(),
        &settings(),
        appointment_request(MONDAY, "11:00 AM - 11:30 AM"),
    )
    .await
    .unwrap();
    let b = request_appointment(
        repo.as_ref(),
        &settings(),
        appointment_request(MONDAY, "11:00 AM - 11:30 AM"),
    )
    .await
    .unwrap();

    let spawn_booking = |id: fas_rust::api::AppointmentId| {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            book_slot(
                repo.as_ref(),
                &settings(),
                &faculty(),
                date(MONDAY),
                &range("11:00 AM - 11:30 AM"),
                &id,
            )
            .await
        })
    };

    let first = spawn_booking(a.id.clone());
    let second = spawn_booking(b.id.clone());

    let outcomes = [first.await.unwrap(), second.await.unwrap()];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    for outcome in &outcomes {
        if let Err(e) = outcome {
            assert!(
                matches!(
                    e,
                    BookingError::SlotUnavailable { .. } | BookingError::TransactionConflict { .. }
                ),
                "loser must see SlotUnavailable/TransactionConflict, got {}",
                e
            );
        }
    }

    let statuses = [
        repo.fetch_appointment(&a.id).await.unwrap().unwrap().status,
        repo.fetch_appointment(&b.id).await.unwrap().unwrap().status,
    ];
    let approved = statuses
        .iter()
        .filter(|s| **s == AppointmentStatus::Approved)
        .count();
    assert_eq!(approved, 1);

    let slots = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap()
        .slots;
    assert_eq!(slots.booked_count(), 1);

    assert_no_orphaned_bookings(repo.as_ref(), &faculty(), &[date(MONDAY)]).await;
}

#[tokio::test]
async fn test_cancellation_releases_for_the_next_requester() {
    // Release symmetry: approved -> cancelled, then the slot is bookable by
    // someone else.
    let repo = LocalRepository::new();

    let first = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "3:00 PM - 3:30 PM"),
    )
    .await
    .unwrap();
    book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("3:00 PM - 3:30 PM"),
        &first.id,
    )
    .await
    .unwrap();

    set_appointment_status(&repo, &settings(), &first.id, StatusChange::cancel())
        .await
        .unwrap();
    assert_no_orphaned_bookings(&repo, &faculty(), &[date(MONDAY)]).await;

    let second = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "3:00 PM - 3:30 PM"),
    )
    .await
    .unwrap();
    book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("3:00 PM - 3:30 PM"),
        &second.id,
    )
    .await
    .unwrap();

    let stored = repo.fetch_appointment(&second.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Approved);
    assert_no_orphaned_bookings(&repo, &faculty(), &[date(MONDAY)]).await;
}

#[tokio::test]
async fn test_failed_booking_leaves_pre_attempt_state() {
    let repo = LocalRepository::new();

    let winner = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "10:00 AM - 10:30 AM"),
    )
    .await
    .unwrap();
    let loser = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "10:00 AM - 10:30 AM"),
    )
    .await
    .unwrap();

    book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("10:00 AM - 10:30 AM"),
        &winner.id,
    )
    .await
    .unwrap();

    let before = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();

    let result = book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("10:00 AM - 10:30 AM"),
        &loser.id,
    )
    .await;
    assert!(matches!(result, Err(BookingError::SlotUnavailable { .. })));

    // The losing attempt mutated nothing.
    let after = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.version, before.version);
    assert_eq!(
        repo.fetch_appointment(&loser.id).await.unwrap().unwrap().status,
        AppointmentStatus::Pending
    );
}

#[tokio::test]
async fn test_reschedule_flow_across_dates() {
    let repo = LocalRepository::new();

    let appointment = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "2:00 PM - 2:30 PM"),
    )
    .await
    .unwrap();
    book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("2:00 PM - 2:30 PM"),
        &appointment.id,
    )
    .await
    .unwrap();

    // Faculty proposes Tuesday instead; the Monday slot comes free and the
    // Tuesday slot stays open until approval.
    let tuesday = date(support::TUESDAY);
    let proposed = set_appointment_status(
        &repo,
        &settings(),
        &appointment.id,
        StatusChange::reschedule(Some(tuesday), Some(range("2:00 PM - 2:30 PM"))),
    )
    .await
    .unwrap();
    assert_eq!(proposed.status, AppointmentStatus::Reschedule);
    assert_eq!(proposed.date, tuesday);

    let monday_open = list_open_slots(&repo, &settings(), &faculty(), date(MONDAY))
        .await
        .unwrap();
    assert!(monday_open.contains(&"2:00 PM - 2:30 PM".to_string()));

    book_slot(
        &repo,
        &settings(),
        &faculty(),
        tuesday,
        &range("2:00 PM - 2:30 PM"),
        &appointment.id,
    )
    .await
    .unwrap();

    let tuesday_open = list_open_slots(&repo, &settings(), &faculty(), tuesday)
        .await
        .unwrap();
    assert!(!tuesday_open.contains(&"2:00 PM - 2:30 PM".to_string()));

    assert_no_orphaned_bookings(&repo, &faculty(), &[date(MONDAY), tuesday]).await;
}

#[tokio::test]
async fn test_release_slot_direct() {
    let repo = LocalRepository::new();
    let appointment = request_appointment(
        &repo,
        &settings(),
        appointment_request(MONDAY, "4:00 PM - 4:30 PM"),
    )
    .await
    .unwrap();
    book_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("4:00 PM - 4:30 PM"),
        &appointment.id,
    )
    .await
    .unwrap();

    release_slot(
        &repo,
        &settings(),
        &faculty(),
        date(MONDAY),
        &range("4:00 PM - 4:30 PM"),
    )
    .await
    .unwrap();

    let open = list_open_slots(&repo, &settings(), &faculty(), date(MONDAY))
        .await
        .unwrap();
    assert!(open.contains(&"4:00 PM - 4:30 PM".to_string()));
}

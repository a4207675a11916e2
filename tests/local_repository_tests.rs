//! Tests for LocalRepository.
//!
//! Covers the compare-and-swap write semantics, the atomicity of the coupled
//! booking commit, and concurrent access patterns.

#![cfg(feature = "local-repo")]

mod support;

use std::sync::Arc;

use fas_rust::api::{Appointment, AppointmentId, AppointmentStatus, DaySlots, MeetingType, Slot};
use fas_rust::availability::compute_day_slots;
use fas_rust::db::repositories::LocalRepository;
use fas_rust::db::repository::{
    AppointmentRepository, AvailabilityRepository, BookingRepository, RepositoryError,
};

use support::{date, faculty, range, settings, weekly_commitments, MONDAY, TUESDAY};

fn open_day() -> DaySlots {
    compute_day_slots(&settings(), date(MONDAY), &[], None)
}

fn pending_appointment(id: &str, slot: &str) -> Appointment {
    Appointment {
        id: AppointmentId::new(id),
        faculty_id: faculty(),
        date: date(MONDAY),
        time_slot: range(slot),
        purpose: "grade consultation".to_string(),
        meeting_type: MeetingType::Online,
        details: None,
        participants: vec!["student-cruz".to_string()],
        status: AppointmentStatus::Pending,
    }
}

// =========================================================
// Availability records
// =========================================================

#[tokio::test]
async fn test_fetch_day_slots_absent() {
    let repo = LocalRepository::new();
    let stored = repo.fetch_day_slots(&faculty(), date(MONDAY)).await.unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_insert_if_absent_first_writer_wins() {
    let repo = LocalRepository::new();

    let first = open_day();
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &first)
        .await
        .unwrap();
    assert_eq!(stored.slots, first);

    // A second materializer loses and adopts the stored list.
    let mut competing = open_day();
    competing.0.truncate(5);
    let adopted = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &competing)
        .await
        .unwrap();
    assert_eq!(adopted.slots, first);
    assert_eq!(adopted.version, stored.version);
}

#[tokio::test]
async fn test_insert_is_merge_write_per_date() {
    let repo = LocalRepository::new();
    repo.insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();
    repo.insert_day_slots_if_absent(&faculty(), date(TUESDAY), &open_day())
        .await
        .unwrap();

    // Updating one date leaves the other untouched.
    let stored = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    let mut slots = stored.slots.clone();
    slots.slot_mut(&range("7:00 AM - 7:30 AM")).unwrap().booked = true;
    repo.update_day_slots(&faculty(), date(MONDAY), &slots, &stored.version)
        .await
        .unwrap();

    let other = repo
        .fetch_day_slots(&faculty(), date(TUESDAY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(other.slots.booked_count(), 0);
}

#[tokio::test]
async fn test_update_day_slots_requires_materialized_list() {
    let repo = LocalRepository::new();
    let result = repo
        .update_day_slots(&faculty(), date(MONDAY), &open_day(), "etag")
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_day_slots_rejects_stale_version() {
    let repo = LocalRepository::new();
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();

    let mut slots = stored.slots.clone();
    slots.slot_mut(&range("7:00 AM - 7:30 AM")).unwrap().booked = true;
    repo.update_day_slots(&faculty(), date(MONDAY), &slots, &stored.version)
        .await
        .unwrap();

    // The original version tag is stale now.
    let result = repo
        .update_day_slots(&faculty(), date(MONDAY), &stored.slots, &stored.version)
        .await;
    assert!(matches!(result, Err(RepositoryError::VersionConflict { .. })));
}

#[tokio::test]
async fn test_concurrent_cas_updates_exactly_one_wins() {
    let repo = Arc::new(LocalRepository::new());
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..8usize {
        let repo = Arc::clone(&repo);
        let version = stored.version.clone();
        let mut slots = stored.slots.clone();
        handles.push(tokio::spawn(async move {
            // Each writer books a different slot against the same version.
            slots.0[i].booked = true;
            repo.update_day_slots(&faculty(), date(MONDAY), &slots, &version)
                .await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(RepositoryError::VersionConflict { .. }) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(wins, 1);

    let current = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.slots.booked_count(), 1);
}

#[tokio::test]
async fn test_concurrent_materialization_different_faculty() {
    let repo = Arc::new(LocalRepository::new());

    let mut handles = Vec::new();
    for i in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let id = fas_rust::api::FacultyId::new(format!("faculty-{}", i));
            repo.insert_day_slots_if_absent(&id, date(MONDAY), &open_day())
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}

// =========================================================
// Recurring commitments
// =========================================================

#[tokio::test]
async fn test_commitments_default_empty() {
    let repo = LocalRepository::new();
    let commitments = repo.fetch_recurring_commitments(&faculty()).await.unwrap();
    assert!(commitments.is_empty());
}

#[tokio::test]
async fn test_commitments_roundtrip() {
    let repo = LocalRepository::new();
    let weekly = weekly_commitments();
    repo.store_recurring_commitments(&faculty(), &weekly)
        .await
        .unwrap();

    let stored = repo.fetch_recurring_commitments(&faculty()).await.unwrap();
    assert_eq!(stored, weekly);
}

// =========================================================
// Appointments
// =========================================================

#[tokio::test]
async fn test_insert_appointment_rejects_duplicate_id() {
    let repo = LocalRepository::new();
    let appointment = pending_appointment("appt-1", "2:00 PM - 2:30 PM");
    repo.insert_appointment(&appointment).await.unwrap();

    let result = repo.insert_appointment(&appointment).await;
    assert!(matches!(result, Err(RepositoryError::ValidationError { .. })));
}

#[tokio::test]
async fn test_update_status_missing_appointment() {
    let repo = LocalRepository::new();
    let result = repo
        .update_appointment_status(&AppointmentId::new("ghost"), AppointmentStatus::Cancelled)
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
async fn test_list_appointments_sorted_by_date_and_slot() {
    let repo = LocalRepository::new();
    let mut late = pending_appointment("appt-late", "3:00 PM - 3:30 PM");
    late.date = date(TUESDAY);
    let early = pending_appointment("appt-early", "8:00 AM - 8:30 AM");
    let mid = pending_appointment("appt-mid", "2:00 PM - 2:30 PM");

    repo.insert_appointment(&late).await.unwrap();
    repo.insert_appointment(&mid).await.unwrap();
    repo.insert_appointment(&early).await.unwrap();

    let listed = repo.list_appointments_for_faculty(&faculty()).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|a| a.id.value()).collect();
    assert_eq!(ids, vec!["appt-early", "appt-mid", "appt-late"]);
}

#[tokio::test]
async fn test_list_appointments_for_participant() {
    let repo = LocalRepository::new();
    let mine = pending_appointment("appt-mine", "2:00 PM - 2:30 PM");
    let mut other = pending_appointment("appt-other", "3:00 PM - 3:30 PM");
    other.participants = vec!["student-santos".to_string()];

    repo.insert_appointment(&mine).await.unwrap();
    repo.insert_appointment(&other).await.unwrap();

    let listed = repo
        .list_appointments_for_participant("student-cruz")
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id.value(), "appt-mine");
}

// =========================================================
// Coupled booking commit
// =========================================================

#[tokio::test]
async fn test_commit_booking_applies_both_writes() {
    let repo = LocalRepository::new();
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();
    let appointment = pending_appointment("appt-1", "2:00 PM - 2:30 PM");
    repo.insert_appointment(&appointment).await.unwrap();

    let mut slots = stored.slots.clone();
    slots.slot_mut(&range("2:00 PM - 2:30 PM")).unwrap().booked = true;
    let approved = Appointment {
        status: AppointmentStatus::Approved,
        ..appointment.clone()
    };
    repo.commit_booking(&faculty(), date(MONDAY), &slots, &stored.version, &approved)
        .await
        .unwrap();

    let current = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.slots.booked_count(), 1);
    let stored_appt = repo.fetch_appointment(&appointment.id).await.unwrap().unwrap();
    assert_eq!(stored_appt.status, AppointmentStatus::Approved);
}

#[tokio::test]
async fn test_commit_booking_stale_version_writes_nothing() {
    let repo = LocalRepository::new();
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();
    let appointment = pending_appointment("appt-1", "2:00 PM - 2:30 PM");
    repo.insert_appointment(&appointment).await.unwrap();

    // Another writer bumps the version first.
    let mut interleaved = stored.slots.clone();
    interleaved.slot_mut(&range("7:00 AM - 7:30 AM")).unwrap().booked = true;
    repo.update_day_slots(&faculty(), date(MONDAY), &interleaved, &stored.version)
        .await
        .unwrap();

    let mut slots = stored.slots.clone();
    slots.slot_mut(&range("2:00 PM - 2:30 PM")).unwrap().booked = true;
    let approved = Appointment {
        status: AppointmentStatus::Approved,
        ..appointment.clone()
    };
    let result = repo
        .commit_booking(&faculty(), date(MONDAY), &slots, &stored.version, &approved)
        .await;
    assert!(matches!(result, Err(RepositoryError::VersionConflict { .. })));

    // Neither record moved.
    let current = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    assert!(!current.slots.slot(&range("2:00 PM - 2:30 PM")).unwrap().booked);
    let stored_appt = repo.fetch_appointment(&appointment.id).await.unwrap().unwrap();
    assert_eq!(stored_appt.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn test_commit_booking_missing_appointment_writes_nothing() {
    let repo = LocalRepository::new();
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();

    let mut slots = stored.slots.clone();
    slots.slot_mut(&range("2:00 PM - 2:30 PM")).unwrap().booked = true;
    let phantom = pending_appointment("never-inserted", "2:00 PM - 2:30 PM");
    let result = repo
        .commit_booking(&faculty(), date(MONDAY), &slots, &stored.version, &phantom)
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));

    let current = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.slots.booked_count(), 0);
    assert_eq!(current.version, stored.version);
}

#[tokio::test]
async fn test_version_tag_tracks_content() {
    let repo = LocalRepository::new();
    let stored = repo
        .insert_day_slots_if_absent(&faculty(), date(MONDAY), &open_day())
        .await
        .unwrap();

    let mut slots = stored.slots.clone();
    slots.slot_mut(&range("2:00 PM - 2:30 PM")).unwrap().booked = true;
    let new_version = repo
        .update_day_slots(&faculty(), date(MONDAY), &slots, &stored.version)
        .await
        .unwrap();
    assert_ne!(new_version, stored.version);

    // Releasing restores byte-identical content, hence the original tag.
    let mut released = slots.clone();
    released.slot_mut(&range("2:00 PM - 2:30 PM")).unwrap().booked = false;
    let reverted = repo
        .update_day_slots(&faculty(), date(MONDAY), &released, &new_version)
        .await
        .unwrap();
    assert_eq!(reverted, stored.version);
}

#[tokio::test]
async fn test_slot_shape_survives_roundtrip() {
    let repo = LocalRepository::new();
    let day = open_day();
    repo.insert_day_slots_if_absent(&faculty(), date(MONDAY), &day)
        .await
        .unwrap();

    let stored = repo
        .fetch_day_slots(&faculty(), date(MONDAY))
        .await
        .unwrap()
        .unwrap();
    let first: &Slot = &stored.slots.0[0];
    assert_eq!(first.time, range("7:00 AM - 7:30 AM"));
    assert!(first.available);
    assert!(!first.booked);
}

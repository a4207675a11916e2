#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, Weekday};

use fas_rust::api::{
    AppointmentStatus, CommitmentKind, FacultyId, MeetingType, RecurringCommitment, TimeRange,
};
use fas_rust::availability::SchedulingSettings;
use fas_rust::booking::AppointmentRequest;
use fas_rust::db::repository::{
    AppointmentRepository, AvailabilityRepository, FullRepository,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =========================================================
// Domain fixtures
// =========================================================

/// 2026-03-02 is a Monday; the default test date.
pub const MONDAY: &str = "2026-03-02";
pub const TUESDAY: &str = "2026-03-03";
pub const SATURDAY: &str = "2026-03-07";

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

pub fn range(label: &str) -> TimeRange {
    label.parse().expect("valid test time range")
}

pub fn faculty() -> FacultyId {
    FacultyId::new("faculty-reyes")
}

pub fn settings() -> SchedulingSettings {
    SchedulingSettings::default()
}

/// A Monday 9-10 AM class plus a Wednesday consultation hour.
pub fn weekly_commitments() -> Vec<RecurringCommitment> {
    vec![
        RecurringCommitment {
            day_of_week: Weekday::Mon,
            time: range("9:00 AM - 10:00 AM"),
            kind: CommitmentKind::Class,
            subject: Some("CS101".to_string()),
            section: Some("A".to_string()),
            room: Some("Rm 204".to_string()),
        },
        RecurringCommitment::new(
            Weekday::Wed,
            range("1:00 PM - 2:00 PM"),
            CommitmentKind::Consultation,
        ),
    ]
}

pub fn appointment_request(day: &str, slot: &str) -> AppointmentRequest {
    AppointmentRequest {
        faculty_id: faculty(),
        date: date(day),
        time_slot: range(slot),
        purpose: "thesis consultation".to_string(),
        meeting_type: MeetingType::F2f,
        details: None,
        participants: vec!["student-cruz".to_string()],
    }
}

/// Cross-entity invariant check: every booked slot corresponds to exactly
/// one approved appointment at the same coordinates, and vice versa.
pub async fn assert_no_orphaned_bookings(
    repo: &dyn FullRepository,
    faculty_id: &FacultyId,
    dates: &[NaiveDate],
) {
    let appointments = repo
        .list_appointments_for_faculty(faculty_id)
        .await
        .expect("list appointments");

    for &day in dates {
        let Some(stored) = repo.fetch_day_slots(faculty_id, day).await.expect("fetch slots")
        else {
            continue;
        };

        for slot in stored.slots.iter() {
            let approved_here = appointments
                .iter()
                .filter(|a| {
                    a.status == AppointmentStatus::Approved
                        && a.date == day
                        && a.time_slot == slot.time
                })
                .count();
            if slot.booked {
                assert_eq!(
                    approved_here, 1,
                    "booked slot {} on {} should have exactly one approved appointment",
                    slot.time, day
                );
            } else {
                assert_eq!(
                    approved_here, 0,
                    "open slot {} on {} should have no approved appointment",
                    slot.time, day
                );
            }
        }
    }
}

mod common;

use common::{create_test_scheduler, upsert_params};
use jiff::civil::date;
use rota_core::{
    models::WeekdayKey,
    params::{
        AddException, AvailableDates, DeleteSchedule, GenerateSlots, Id, ListSlots,
        RemoveException, SetSlotCapacity, TimeRange,
    },
    SchedulerError,
};

fn generate_params(schedule_id: u64, start: &str, end: &str) -> GenerateSlots {
    GenerateSlots {
        schedule_id,
        start_date: start.to_string(),
        end_date: end.to_string(),
        duration_minutes: 60,
        break_minutes: 0,
        capacity: 2,
    }
}

fn slots_of(schedule_id: u64) -> ListSlots {
    ListSlots {
        schedule_id: Some(schedule_id),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_two_week_scenario() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params(
            "agent-a",
            None,
            &[WeekdayKey::Monday, WeekdayKey::Wednesday],
            &[("09:00", "12:00")],
        ))
        .await
        .expect("Failed to create schedule")
        .schedule;

    let report = scheduler
        .generate_slots(&generate_params(schedule.id, "2024-01-01", "2024-01-14"))
        .await
        .expect("Failed to generate slots");

    assert_eq!(report.slots_created, 12);
    assert_eq!(report.days_without_availability, 10);

    let slots = scheduler.list_slots(&slots_of(schedule.id)).await.unwrap();
    assert_eq!(slots.len(), 12);
    let days: Vec<_> = slots.iter().map(|s| s.date).collect();
    for day in [date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 8), date(2024, 1, 10)] {
        assert_eq!(days.iter().filter(|d| **d == day).count(), 3, "{day}");
    }
    assert!(slots.iter().all(|s| s.capacity == 2 && s.booked_count == 0));
    assert_eq!(
        slots[..3].iter().map(|s| s.interval().to_string()).collect::<Vec<_>>(),
        ["09:00-10:00", "10:00-11:00", "11:00-12:00"]
    );
}

#[tokio::test]
async fn test_regeneration_is_idempotent_and_keeps_bookings() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params(
            "agent-a",
            None,
            &[WeekdayKey::Monday],
            &[("09:00", "12:00"), ("14:00", "17:00")],
        ))
        .await
        .unwrap()
        .schedule;
    let params = generate_params(schedule.id, "2024-01-01", "2024-01-07");

    let first = scheduler.generate_slots(&params).await.unwrap();
    assert_eq!(first.slots_created, 6);

    let slot_id = scheduler.list_slots(&slots_of(schedule.id)).await.unwrap()[0].id;
    assert!(scheduler.claim_seat(&Id { id: slot_id }).await.unwrap());

    let second = scheduler.generate_slots(&params).await.unwrap();
    assert_eq!(second.slots_created, 0);
    assert_eq!(second.slots_unchanged, 6);

    let slot = scheduler
        .get_slot(&Id { id: slot_id })
        .await
        .unwrap()
        .expect("slot exists");
    assert_eq!(slot.booked_count, 1);
}

#[tokio::test]
async fn test_exceptions_drive_generation() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params(
            "agent-a",
            Some("svc-1"),
            &[WeekdayKey::Monday, WeekdayKey::Tuesday],
            &[("09:00", "12:00")],
        ))
        .await
        .unwrap()
        .schedule;

    // Monday closed, Tuesday shortened, Saturday opened
    for (date, available, ranges) in [
        ("2024-01-01", false, None),
        ("2024-01-02", true, Some(vec![TimeRange::new("10:00", "11:00")])),
        ("2024-01-06", true, Some(vec![TimeRange::new("08:00", "10:00")])),
    ] {
        scheduler
            .add_exception(&AddException {
                schedule_id: schedule.id,
                date: date.to_string(),
                available,
                time_ranges: ranges,
                reason: None,
            })
            .await
            .unwrap();
    }

    let dates = scheduler
        .available_dates(&AvailableDates {
            schedule_id: schedule.id,
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-07".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(dates, [date(2024, 1, 2), date(2024, 1, 6)]);

    let report = scheduler
        .generate_slots(&generate_params(schedule.id, "2024-01-01", "2024-01-07"))
        .await
        .unwrap();
    assert_eq!(report.slots_created, 3);
    assert_eq!(report.days_without_availability, 5);

    // Removing the Monday closure restores its weekly hours
    assert!(scheduler
        .remove_exception(&RemoveException {
            schedule_id: schedule.id,
            date: "2024-01-01".to_string(),
        })
        .await
        .unwrap());
    let report = scheduler
        .generate_slots(&generate_params(schedule.id, "2024-01-01", "2024-01-01"))
        .await
        .unwrap();
    assert_eq!(report.slots_created, 3);
}

#[tokio::test]
async fn test_explicit_empty_hours_close_the_day() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params(
            "agent-a",
            None,
            &[WeekdayKey::Monday],
            &[("09:00", "12:00")],
        ))
        .await
        .unwrap()
        .schedule;

    let updated = scheduler
        .add_exception(&AddException {
            schedule_id: schedule.id,
            date: "2024-01-01".to_string(),
            available: true,
            time_ranges: Some(vec![]),
            reason: Some("offsite".to_string()),
        })
        .await
        .expect("Failed to add exception");
    let stored = &updated.exceptions[&date(2024, 1, 1)];
    assert_eq!(stored.intervals, Some(vec![]));

    // Reloaded from storage, the empty list is still not "no list"
    let reloaded = scheduler
        .get_schedule(&Id { id: schedule.id })
        .await
        .unwrap()
        .expect("schedule exists");
    assert_eq!(reloaded.exceptions[&date(2024, 1, 1)].intervals, Some(vec![]));

    let report = scheduler
        .generate_slots(&generate_params(schedule.id, "2024-01-01", "2024-01-01"))
        .await
        .unwrap();
    assert_eq!(report.slots_created, 0);
    assert_eq!(report.days_without_availability, 1);

    let report = scheduler
        .generate_slots(&generate_params(schedule.id, "2024-01-08", "2024-01-08"))
        .await
        .unwrap();
    assert_eq!(report.slots_created, 3);
}

#[tokio::test]
async fn test_overlapping_exception_hours_are_rejected() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params("agent-a", None, &[WeekdayKey::Monday], &[("09:00", "12:00")]))
        .await
        .unwrap()
        .schedule;

    let err = scheduler
        .add_exception(&AddException {
            schedule_id: schedule.id,
            date: "2024-01-01".to_string(),
            available: true,
            time_ranges: Some(vec![
                TimeRange::new("09:00", "11:00"),
                TimeRange::new("10:30", "12:00"),
            ]),
            reason: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::OverlappingIntervals { .. }));

    let err = scheduler
        .upsert_schedule(&upsert_params(
            "agent-a",
            None,
            &[WeekdayKey::Monday],
            &[("09:00", "12:00"), ("11:00", "13:00")],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::OverlappingIntervals { .. }));
}

#[tokio::test]
async fn test_inactive_and_deleted_schedules_cannot_generate() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params("agent-a", None, &[WeekdayKey::Monday], &[("09:00", "10:00")]))
        .await
        .unwrap()
        .schedule;
    let params = generate_params(schedule.id, "2024-01-01", "2024-01-01");
    scheduler.generate_slots(&params).await.unwrap();

    assert!(!scheduler.toggle_schedule(&Id { id: schedule.id }).await.unwrap());
    let err = scheduler.generate_slots(&params).await.unwrap_err();
    assert!(matches!(err, SchedulerError::ScheduleInactiveOrMissing { .. }));
    // Deactivation leaves existing slots in place
    assert_eq!(scheduler.list_slots(&slots_of(schedule.id)).await.unwrap().len(), 1);

    assert!(scheduler.toggle_schedule(&Id { id: schedule.id }).await.unwrap());
    scheduler
        .delete_schedule(&DeleteSchedule {
            id: schedule.id,
            confirmed: true,
        })
        .await
        .unwrap();

    let err = scheduler.generate_slots(&params).await.unwrap_err();
    assert!(matches!(err, SchedulerError::ScheduleInactiveOrMissing { id } if id == schedule.id));
    assert_eq!(scheduler.list_slots(&slots_of(schedule.id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_generation_preconditions() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params("agent-a", None, &[WeekdayKey::Monday], &[("09:00", "10:00")]))
        .await
        .unwrap()
        .schedule;

    let inverted = generate_params(schedule.id, "2024-01-14", "2024-01-01");
    assert!(matches!(
        scheduler.generate_slots(&inverted).await.unwrap_err(),
        SchedulerError::InvalidDateRange { .. }
    ));

    let mut zero_duration = generate_params(schedule.id, "2024-01-01", "2024-01-01");
    zero_duration.duration_minutes = 0;
    assert!(matches!(
        scheduler.generate_slots(&zero_duration).await.unwrap_err(),
        SchedulerError::InvalidParameter { .. }
    ));

    let mut bad_date = generate_params(schedule.id, "2024-13-01", "2024-01-01");
    bad_date.capacity = 0;
    assert!(matches!(
        scheduler.generate_slots(&bad_date).await.unwrap_err(),
        SchedulerError::InvalidParameter { ref field, .. } if field == "start_date"
    ));

    assert!(scheduler
        .list_slots(&ListSlots::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_generation_creates_no_duplicates() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params(
            "agent-a",
            None,
            &WeekdayKey::ALL,
            &[("08:00", "18:00")],
        ))
        .await
        .unwrap()
        .schedule;

    let mut first = generate_params(schedule.id, "2024-01-01", "2024-01-20");
    first.duration_minutes = 15;
    let mut second = generate_params(schedule.id, "2024-01-10", "2024-01-31");
    second.duration_minutes = 15;

    let (a, b) = tokio::join!(scheduler.generate_slots(&first), scheduler.generate_slots(&second));
    let (a, b) = (a.expect("first run"), b.expect("second run"));

    // 31 days × 40 quarter-hours, each key created exactly once
    let distinct = 31 * 40;
    assert_eq!(a.slots_created + b.slots_created, distinct);
    assert_eq!(a.slots_unchanged + b.slots_unchanged, 11 * 40);

    let slots = scheduler.list_slots(&slots_of(schedule.id)).await.unwrap();
    assert_eq!(slots.len() as u32, distinct);
}

#[tokio::test]
async fn test_capacity_edit_cannot_drop_below_bookings() {
    let (_temp_dir, scheduler) = create_test_scheduler().await;
    let schedule = scheduler
        .upsert_schedule(&upsert_params("agent-a", None, &[WeekdayKey::Monday], &[("09:00", "10:00")]))
        .await
        .unwrap()
        .schedule;
    scheduler
        .generate_slots(&generate_params(schedule.id, "2024-01-01", "2024-01-01"))
        .await
        .unwrap();
    let slot_id = scheduler.list_slots(&slots_of(schedule.id)).await.unwrap()[0].id;

    scheduler.claim_seat(&Id { id: slot_id }).await.unwrap();
    scheduler.claim_seat(&Id { id: slot_id }).await.unwrap();

    let err = scheduler
        .set_slot_capacity(&SetSlotCapacity {
            slot_id,
            capacity: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::CapacityBelowBooked { booked: 2, .. }));

    let err = scheduler
        .set_slot_capacity(&SetSlotCapacity {
            slot_id,
            capacity: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidParameter { .. }));

    let raised = scheduler
        .set_slot_capacity(&SetSlotCapacity {
            slot_id,
            capacity: 5,
        })
        .await
        .unwrap();
    assert_eq!((raised.capacity, raised.booked_count), (5, 2));
}

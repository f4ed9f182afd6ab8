use super::*;

// ========================================================================
// Happy path
// ========================================================================

#[test]
fn test_full_lifecycle() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);
    let id = apt.appointment_id.clone();

    let confirmed = manager.confirm(&id, sunday_morning()).unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let started = manager.begin(&id, at(16, 10, 0)).unwrap();
    assert_eq!(started.status, AppointmentStatus::InProgress);

    let completed = manager.complete(&id, at(16, 11, 0)).unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert_eq!(completed.version, 4);
    assert_eq!(completed.created_at, sunday_morning());
    assert_eq!(completed.updated_at, at(16, 11, 0));

    let events = manager.events_for(&id).unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![
            AppointmentEventType::Reserved,
            AppointmentEventType::Confirmed,
            AppointmentEventType::Started,
            AppointmentEventType::Completed,
        ]
    );
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));

    // Completed appointments keep their time in the calendar
    assert_eq!(manager.busy_intervals("staff-1", monday()).unwrap().len(), 1);
}

#[test]
fn test_rebuilt_snapshot_matches_stored() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);
    let id = apt.appointment_id.clone();
    manager
        .reschedule(&id, monday(), 13 * 60, sunday_morning())
        .unwrap();
    manager.confirm(&id, sunday_morning()).unwrap();
    manager.cancel(&id, Some("ill".into()), sunday_morning()).unwrap();

    let stored = manager.get_appointment(&id).unwrap().unwrap();
    let rebuilt = manager.rebuild_snapshot(&id).unwrap();
    assert_eq!(stored, rebuilt);
}

#[test]
fn test_events_are_broadcast_after_commit() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let apt = reserve_haircut(&manager, 10);
    manager.confirm(&apt.appointment_id, sunday_morning()).unwrap();

    let first = rx.try_recv().unwrap();
    assert_eq!(first.event_type, AppointmentEventType::Reserved);
    assert_eq!(first.appointment_id, apt.appointment_id);
    let second = rx.try_recv().unwrap();
    assert_eq!(second.event_type, AppointmentEventType::Confirmed);
    assert!(rx.try_recv().is_err());
}

// ========================================================================
// Rejected transitions
// ========================================================================

#[test]
fn test_begin_requires_confirmation_and_start_time() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);
    let id = apt.appointment_id.clone();

    let err = manager.begin(&id, at(16, 10, 0)).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::InvalidTransition {
            status: AppointmentStatus::Pending,
            transition: Transition::Begin,
            ..
        }
    ));

    manager.confirm(&id, sunday_morning()).unwrap();
    let err = manager.begin(&id, at(16, 9, 59)).unwrap_err();
    assert!(matches!(err, ManagerError::TooEarly { .. }));

    let current = manager.get_appointment(&id).unwrap().unwrap();
    assert_eq!(current.status, AppointmentStatus::Confirmed);
}

#[test]
fn test_complete_requires_in_progress() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);

    let err = manager.complete(&apt.appointment_id, at(16, 11, 0)).unwrap_err();
    assert!(matches!(err, ManagerError::InvalidTransition { .. }));
}

#[test]
fn test_terminal_states_reject_everything() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);
    let id = apt.appointment_id.clone();
    manager.cancel(&id, None, sunday_morning()).unwrap();

    assert!(matches!(
        manager.confirm(&id, sunday_morning()),
        Err(ManagerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        manager.cancel(&id, None, sunday_morning()),
        Err(ManagerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        manager.reschedule(&id, monday(), 12 * 60, sunday_morning()),
        Err(ManagerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        manager.mark_no_show(&id, at(16, 12, 0)),
        Err(ManagerError::InvalidTransition { .. })
    ));
}

#[test]
fn test_in_progress_can_be_cancelled_but_not_moved() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);
    let id = apt.appointment_id.clone();
    manager.confirm(&id, sunday_morning()).unwrap();
    manager.begin(&id, at(16, 10, 0)).unwrap();

    assert!(matches!(
        manager.reschedule(&id, monday(), 14 * 60, at(16, 10, 5)),
        Err(ManagerError::InvalidTransition { .. })
    ));
    // the customer turned up
    assert!(matches!(
        manager.mark_no_show(&id, at(16, 10, 5)),
        Err(ManagerError::InvalidTransition { .. })
    ));

    let cancelled = manager.cancel(&id, None, at(16, 10, 10)).unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(manager.busy_intervals("staff-1", monday()).unwrap().is_empty());
}

#[test]
fn test_no_show_only_after_start() {
    let manager = create_test_manager();
    let apt = reserve_haircut(&manager, 10);
    let id = apt.appointment_id.clone();

    let err = manager.mark_no_show(&id, at(16, 9, 30)).unwrap_err();
    assert!(matches!(err, ManagerError::TooEarly { .. }));

    let no_show = manager.mark_no_show(&id, at(16, 10, 20)).unwrap();
    assert_eq!(no_show.status, AppointmentStatus::NoShow);
    assert!(!no_show.cancellation.unwrap().refundable);
    assert_eq!(manager.busy_intervals("staff-1", monday()).unwrap().len(), 1);
}

#[test]
fn test_unknown_appointment() {
    let manager = create_test_manager();

    let err = manager.confirm("apt-missing", sunday_morning()).unwrap_err();
    assert!(matches!(err, ManagerError::AppointmentNotFound(_)));
    assert!(manager.get_appointment("apt-missing").unwrap().is_none());
    assert!(matches!(
        manager.rebuild_snapshot("apt-missing"),
        Err(ManagerError::AppointmentNotFound(_))
    ));
}

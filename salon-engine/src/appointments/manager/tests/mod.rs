use super::*;
use crate::catalog::InMemoryCatalog;
use crate::policy::SharedPolicy;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use shared::appointment::{AppointmentEventType, AppointmentStatus, CommandErrorCode, Transition};
use shared::models::SalonPolicy;
use shared::calendar::WeeklySchedule;

const HOUR: i64 = 3_600_000;

/// Engine over an in-memory store, with handles to its collaborators
struct TestEngine {
    manager: AppointmentsManager,
    catalog: InMemoryCatalog,
    policy: SharedPolicy,
}

fn weekdays_nine_to_five() -> WeeklySchedule {
    WeeklySchedule::uniform(&[1, 2, 3, 4, 5], 9 * 60, 17 * 60).unwrap()
}

/// Ana and Bruno both cut; only Ana colours
fn test_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    catalog.upsert_staff(StaffMember::new("staff-1", "Ana", weekdays_nine_to_five()));
    catalog.upsert_staff(StaffMember::new("staff-2", "Bruno", weekdays_nine_to_five()));
    catalog.upsert_service(
        Service::new("svc-cut", "Haircut", 60, Decimal::new(3000, 2))
            .with_staff("staff-1")
            .with_staff("staff-2"),
    );
    catalog.upsert_service(Service::new("svc-color", "Colour", 90, Decimal::new(6500, 2)).with_staff("staff-1"));
    catalog
}

fn create_test_engine(policy: SalonPolicy) -> TestEngine {
    let catalog = test_catalog();

    let shared_policy = SharedPolicy::new(policy);
    let storage = AppointmentStorage::open_in_memory().unwrap();
    let manager = AppointmentsManager::with_storage(
        storage,
        EngineConfig::default(),
        Arc::new(catalog.clone()),
        Arc::new(shared_policy.clone()),
    );

    TestEngine {
        manager,
        catalog,
        policy: shared_policy,
    }
}

fn create_test_manager() -> AppointmentsManager {
    create_test_engine(SalonPolicy::default()).manager
}

/// 2026-03-16, a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

/// 2026-03-`d` `h`:`m` UTC in millis
fn at(d: u32, h: u32, m: u32) -> i64 {
    Utc.with_ymd_and_hms(2026, 3, d, h, m, 0)
        .unwrap()
        .timestamp_millis()
}

/// Sunday morning before the test week
fn sunday_morning() -> i64 {
    at(15, 9, 0)
}

fn customer() -> CustomerInfo {
    CustomerInfo::new("Lucia", "600111222")
}

/// Haircut with staff-1 on Monday at `hour`:00, booked on Sunday morning
fn reserve_haircut(manager: &AppointmentsManager, hour: u32) -> AppointmentSnapshot {
    manager
        .reserve("svc-cut", "staff-1", monday(), hour * 60, customer(), sunday_morning())
        .unwrap()
}

fn reserve_cmd(staff_id: &str, minute: u32, now: i64) -> AppointmentCommand {
    AppointmentCommand::new(
        "front-desk",
        AppointmentCommandPayload::Reserve {
            service_id: "svc-cut".to_string(),
            staff_id: staff_id.to_string(),
            date: monday(),
            start_minute: minute,
            customer: customer(),
            notes: None,
        },
    )
    .at(now)
}

fn starts(slots: &[Slot]) -> Vec<u32> {
    slots.iter().map(|s| s.start_minute).collect()
}

mod test_lifecycle;

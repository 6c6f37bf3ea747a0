use bside_nexus::core::hrp::HrpLogic;
use bside_nexus::core::hrp::entries::{NewHrpEvent, month_bounds};
use bside_nexus::core::profiles::ProfileLogic;
use bside_nexus::db::pool::DbPool;
use bside_nexus::errors::{AppError, ErrorKind};
use bside_nexus::models::hrp_entry::{EntryType, HrpEventType};
use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone};

mod common;
use common::{count, open_pool};

fn log_at(pool: &mut DbPool, user: &str, event: HrpEventType, at: &str) -> i64 {
    HrpLogic::log_event(
        pool,
        &NewHrpEvent {
            user_id: user,
            ip_address: "10.0.0.7",
            event_type: event,
            timestamp: Some(at),
            comment: Some("from test"),
        },
        Local::now(),
        45,
    )
    .expect("log event")
    .id
}

#[test]
fn entries_for_date_are_chronological() {
    let (_db, mut pool) = open_pool("hrp_entries_for_date");

    // logged out of order on purpose
    let end = log_at(&mut pool, "U1", HrpEventType::End, "2024-03-15 16:30");
    let start = log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-15 08:05");
    log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-16 08:00");
    log_at(&mut pool, "U2", HrpEventType::Start, "2024-03-15 07:00");

    let entries = HrpLogic::entries_for_date(&pool, "U1", 2024, 3, 15, true).unwrap();
    let order: Vec<i64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(order, vec![start, end]);

    assert_eq!(entries[0].event_type, HrpEventType::Start);
    assert_eq!(entries[0].entry_type, EntryType::Manual);
    assert_eq!(entries[0].ip_address.as_deref(), Some("10.0.0.7"));
    assert_eq!(entries[0].comment.as_deref(), Some("from test"));
    assert_eq!(
        entries[1].logged_at.format("%Y-%m-%d %H:%M").to_string(),
        "2024-03-15 16:30"
    );
}

#[test]
fn entries_without_details_hide_address_and_comment() {
    let (_db, mut pool) = open_pool("hrp_no_details");
    log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-15 08:00");

    let entries = HrpLogic::entries_for_date(&pool, "U1", 2024, 3, 15, false).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ip_address.is_none());
    assert!(entries[0].comment.is_none());
}

#[test]
fn dates_with_entries_lists_distinct_days_of_the_month() {
    let (_db, mut pool) = open_pool("hrp_dates");

    log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-01 08:00");
    log_at(&mut pool, "U1", HrpEventType::End, "2024-03-01 17:00");
    log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-15 08:00");
    log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-31 23:59");
    log_at(&mut pool, "U1", HrpEventType::Start, "2024-04-01 00:00");
    log_at(&mut pool, "U1", HrpEventType::Start, "2024-02-29 08:00");
    log_at(&mut pool, "U2", HrpEventType::Start, "2024-03-20 08:00");

    let days = HrpLogic::dates_with_entries(&pool, "U1", 2024, 3).unwrap();
    assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 15, 31]);

    let dec = HrpLogic::dates_with_entries(&pool, "U1", 2023, 12).unwrap();
    assert!(dec.is_empty());
}

#[test]
fn invalid_calendar_input_is_a_validation_error() {
    let (_db, pool) = open_pool("hrp_bad_dates");

    let err = HrpLogic::dates_with_entries(&pool, "U1", 2024, 13).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = HrpLogic::entries_for_date(&pool, "U1", 2023, 2, 29, false).unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));
}

#[test]
fn month_bounds_roll_over_the_year() {
    let (first, next) = month_bounds(2024, 12).unwrap();
    assert_eq!(first, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    assert_eq!(next, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
}

#[test]
fn live_event_without_timestamp_is_clocked_now() {
    let (_db, mut pool) = open_pool("hrp_live");
    let now = Local::now();

    let entry = HrpLogic::log_event(
        &mut pool,
        &NewHrpEvent {
            user_id: "U1",
            ip_address: "127.0.0.1",
            event_type: HrpEventType::BreakStart,
            timestamp: None,
            comment: None,
        },
        now,
        45,
    )
    .unwrap();

    assert_eq!(entry.entry_type, EntryType::Live);
    assert_eq!(entry.date(), now.date_naive());
}

#[test]
fn future_event_is_rejected_and_nothing_is_written() {
    let (_db, mut pool) = open_pool("hrp_future");
    let far = (Local::now() + Duration::hours(2)).to_rfc3339();

    let err = HrpLogic::log_event(
        &mut pool,
        &NewHrpEvent {
            user_id: "U1",
            ip_address: "127.0.0.1",
            event_type: HrpEventType::Start,
            timestamp: Some(&far),
            comment: None,
        },
        Local::now(),
        45,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::TooFarInFuture(_)));
    assert_eq!(count(&pool, "hrp_event_log"), 0);
}

#[test]
fn correction_appends_a_new_row_and_keeps_the_original() {
    let (_db, mut pool) = open_pool("hrp_correction");
    ProfileLogic::register(&mut pool, "U1", "Ada", "fixed_salary").unwrap();

    let now = Local::now();
    let yesterday = (now - Duration::days(1)).format("%Y-%m-%d").to_string();
    let original = log_at(&mut pool, "U1", HrpEventType::Start, &format!("{yesterday} 08:15"));

    let corrected = HrpLogic::correct_entry(
        &mut pool,
        "U1",
        original,
        &format!("{yesterday} 07:55"),
        None,
        Some("forgot to clock"),
        now,
        45,
    )
    .unwrap();

    assert_ne!(corrected.id, original);
    assert_eq!(corrected.entry_type, EntryType::Correction);
    assert_eq!(corrected.event_type, HrpEventType::Start);
    assert!(corrected.comment.as_deref().unwrap().contains(&format!("#{original}")));
    assert_eq!(count(&pool, "hrp_event_log"), 2);
}

#[test]
fn correction_outside_the_window_is_denied() {
    let (_db, mut pool) = open_pool("hrp_correction_window");
    ProfileLogic::register(&mut pool, "U1", "Ada", "fixed_salary").unwrap();
    ProfileLogic::register(&mut pool, "U2", "Grace", "hourly").unwrap();

    let now = Local::now();
    let old = (now - Duration::days(10)).format("%Y-%m-%d").to_string();
    let recent = (now - Duration::days(1)).format("%Y-%m-%d").to_string();

    let salaried = log_at(&mut pool, "U1", HrpEventType::Start, &format!("{old} 08:00"));
    let err = HrpLogic::correct_entry(
        &mut pool,
        "U1",
        salaried,
        &format!("{old} 09:00"),
        None,
        None,
        now,
        45,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::EditWindowExpired(_)));

    // moving a recent entry into a closed window is denied as well
    let fresh = log_at(&mut pool, "U1", HrpEventType::End, &format!("{recent} 17:00"));
    let err = HrpLogic::correct_entry(
        &mut pool,
        "U1",
        fresh,
        &format!("{old} 17:00"),
        None,
        None,
        now,
        45,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::EditWindowExpired(_)));

    // hourly contracts still may edit a ten-day-old entry
    let hourly = log_at(&mut pool, "U2", HrpEventType::Start, &format!("{old} 08:00"));
    assert!(
        HrpLogic::correct_entry(
            &mut pool,
            "U2",
            hourly,
            &format!("{old} 08:30"),
            None,
            None,
            now,
            45
        )
        .is_ok()
    );
}

#[test]
fn entries_of_other_users_cannot_be_corrected() {
    let (_db, mut pool) = open_pool("hrp_correction_owner");
    ProfileLogic::register(&mut pool, "U2", "Grace", "hourly").unwrap();

    let foreign = log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-15 08:00");
    let err = HrpLogic::correct_entry(
        &mut pool,
        "U2",
        foreign,
        "2024-03-15 08:30",
        None,
        None,
        Local::now(),
        45,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn event_log_rows_cannot_be_updated_or_deleted() {
    let (_db, mut pool) = open_pool("hrp_append_only");
    let id = log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-15 08:00");

    assert!(
        pool.conn
            .execute("UPDATE hrp_event_log SET comment = 'x' WHERE id = ?1", [id])
            .is_err()
    );
    assert!(
        pool.conn
            .execute("DELETE FROM hrp_event_log WHERE id = ?1", [id])
            .is_err()
    );
    assert_eq!(count(&pool, "hrp_event_log"), 1);
}

#[test]
fn sub_second_entries_keep_chronological_order() {
    let (_db, mut pool) = open_pool("hrp_sub_second");

    let later = log_at(&mut pool, "U1", HrpEventType::End, "2024-03-15T08:00:00.900Z");
    let earlier = log_at(&mut pool, "U1", HrpEventType::Start, "2024-03-15T08:00:00.100Z");
    let whole = log_at(&mut pool, "U1", HrpEventType::BreakStart, "2024-03-15T08:00:00Z");

    let day = Local
        .from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
        .date_naive();
    let entries =
        HrpLogic::entries_for_date(&pool, "U1", 2024, day.month(), day.day(), false).unwrap();
    let order: Vec<i64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(order, vec![whole, earlier, later]);
    assert_eq!(entries[1].logged_at.format("%.3f").to_string(), ".100");
}

#[test]
fn failed_log_write_leaves_no_event_row() {
    let (_db, mut pool) = open_pool("hrp_atomic_log");
    pool.conn.execute_batch("DROP TABLE log;").unwrap();

    let result = HrpLogic::log_event(
        &mut pool,
        &NewHrpEvent {
            user_id: "U1",
            ip_address: "127.0.0.1",
            event_type: HrpEventType::Start,
            timestamp: Some("2024-03-15 08:00"),
            comment: None,
        },
        Local::now(),
        45,
    );

    assert!(result.is_err());
    assert_eq!(count(&pool, "hrp_event_log"), 0);
}

#[test]
fn failed_log_write_leaves_no_correction_or_profile_change() {
    let (_db, mut pool) = open_pool("hrp_atomic_correct");
    ProfileLogic::register(&mut pool, "U1", "Ada", "fixed_salary").unwrap();

    let now = Local::now();
    let yesterday = (now - Duration::days(1)).format("%Y-%m-%d").to_string();
    let original = log_at(&mut pool, "U1", HrpEventType::Start, &format!("{yesterday} 08:15"));

    pool.conn.execute_batch("DROP TABLE log;").unwrap();

    let result = HrpLogic::correct_entry(
        &mut pool,
        "U1",
        original,
        &format!("{yesterday} 07:55"),
        None,
        None,
        now,
        45,
    );
    assert!(result.is_err());
    assert_eq!(count(&pool, "hrp_event_log"), 1);

    assert!(ProfileLogic::register(&mut pool, "U1", "Ada", "hourly").is_err());
    let contract: String = pool
        .conn
        .query_row(
            "SELECT contract_type FROM user_profiles WHERE id = 'U1'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(contract, "fixed_salary");
}

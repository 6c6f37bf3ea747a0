use bside_nexus::core::keys::KeyLogic;
use bside_nexus::db::keys::{get_assignment, get_item};
use bside_nexus::errors::{AppError, ErrorKind};
use bside_nexus::models::key_assignment::AssignmentStatus;
use bside_nexus::models::key_item::KeyStatus;
use bside_nexus::models::protocol::ProtocolAction;

mod common;
use common::{count, ids, open_pool, seed_keys};

#[test]
fn issuing_an_available_key_creates_assignment_and_protocol() {
    let (_db, mut pool) = open_pool("issue_scenario");
    seed_keys(&mut pool);

    let protocol_ids = KeyLogic::issue(&mut pool, "U1", &ids(&["K1"]), Some("admin")).unwrap();
    assert_eq!(protocol_ids.len(), 1);

    let details = KeyLogic::protocol_details(&pool, protocol_ids[0]).unwrap();
    assert_eq!(details.protocol.action, ProtocolAction::Issue);
    assert_eq!(details.protocol.acting_user_id.as_deref(), Some("admin"));
    assert_eq!(details.key_item.status, KeyStatus::Issued);

    let assignment = details.assignment.expect("issue links an assignment");
    assert_eq!(assignment.status, AssignmentStatus::Active);
    assert_eq!(assignment.holder_profile_id, "U1");
    assert!(assignment.returned_at.is_none());
    assert_eq!(details.holder.map(|h| h.id), Some("U1".to_string()));

    assert_eq!(count(&pool, "key_assignments"), 1);
    assert_eq!(count(&pool, "key_protocols"), 1);
}

#[test]
fn issuing_an_issued_key_fails_without_protocol() {
    let (_db, mut pool) = open_pool("issue_twice");
    seed_keys(&mut pool);

    KeyLogic::issue(&mut pool, "U1", &ids(&["K1"]), None).unwrap();
    let err = KeyLogic::issue(&mut pool, "U2", &ids(&["K1"]), None).unwrap_err();

    assert!(matches!(err, AppError::ItemNotAvailable(ref k) if k == "K1"));
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert_eq!(count(&pool, "key_protocols"), 1);
    assert_eq!(count(&pool, "key_assignments"), 1);
}

#[test]
fn multi_key_issue_is_all_or_nothing() {
    let (_db, mut pool) = open_pool("issue_atomic");
    seed_keys(&mut pool);

    KeyLogic::issue(&mut pool, "U1", &ids(&["K2"]), None).unwrap();

    let err = KeyLogic::issue(&mut pool, "U2", &ids(&["K1", "K2", "K3"]), None).unwrap_err();
    assert!(matches!(err, AppError::ItemNotAvailable(ref k) if k == "K2"));

    // K1 was checked and written before K2 failed; the rollback undid it
    assert_eq!(get_item(&pool.conn, "K1").unwrap().status, KeyStatus::Available);
    assert_eq!(get_item(&pool.conn, "K3").unwrap().status, KeyStatus::Available);
    assert_eq!(count(&pool, "key_protocols"), 1);

    let ok = KeyLogic::issue(&mut pool, "U2", &ids(&["K1", "K3"]), None).unwrap();
    assert_eq!(ok.len(), 2);
    assert!(ok[0] < ok[1]);
}

#[test]
fn duplicate_key_in_one_request_is_rejected() {
    let (_db, mut pool) = open_pool("issue_duplicate");
    seed_keys(&mut pool);

    let err = KeyLogic::issue(&mut pool, "U1", &ids(&["K1", "K1"]), None).unwrap_err();
    assert!(matches!(err, AppError::ItemNotAvailable(_)));
    assert_eq!(count(&pool, "key_assignments"), 0);
}

#[test]
fn issue_validates_input_and_references() {
    let (_db, mut pool) = open_pool("issue_validation");
    seed_keys(&mut pool);

    let err = KeyLogic::issue(&mut pool, "U1", &[], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = KeyLogic::issue(&mut pool, "  ", &ids(&["K1"]), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = KeyLogic::issue(&mut pool, "U9", &ids(&["K1"]), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = KeyLogic::issue(&mut pool, "U1", &ids(&["K9"]), None).unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "Key item", .. }));

    assert_eq!(count(&pool, "key_protocols"), 0);
}

#[test]
fn returning_twice_fails_with_assignment_not_active() {
    let (_db, mut pool) = open_pool("return_twice");
    seed_keys(&mut pool);

    let issued = KeyLogic::issue(&mut pool, "U1", &ids(&["K1"]), None).unwrap();
    let assignment_id = KeyLogic::protocol_details(&pool, issued[0])
        .unwrap()
        .assignment
        .unwrap()
        .id;

    let returned = KeyLogic::return_keys(&mut pool, &[assignment_id], Some("admin")).unwrap();
    assert_eq!(returned.len(), 1);

    let a = get_assignment(&pool.conn, assignment_id).unwrap();
    assert_eq!(a.status, AssignmentStatus::Returned);
    assert!(a.returned_at.is_some());
    assert_eq!(get_item(&pool.conn, "K1").unwrap().status, KeyStatus::Available);

    let err = KeyLogic::return_keys(&mut pool, &[assignment_id], None).unwrap_err();
    assert!(matches!(err, AppError::AssignmentNotActive(id) if id == assignment_id));
    assert_eq!(count(&pool, "key_protocols"), 2);
}

#[test]
fn returned_key_can_be_issued_again() {
    let (_db, mut pool) = open_pool("reissue");
    seed_keys(&mut pool);

    KeyLogic::issue(&mut pool, "U1", &ids(&["K1"]), None).unwrap();
    let active = KeyLogic::assignments(&pool, Some("U1"), true).unwrap();
    KeyLogic::return_keys(&mut pool, &[active[0].id], None).unwrap();

    KeyLogic::issue(&mut pool, "U2", &ids(&["K1"]), None).unwrap();

    let all = KeyLogic::assignments(&pool, None, false).unwrap();
    assert_eq!(all.len(), 2);
    let active = KeyLogic::assignments(&pool, None, true).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].holder_profile_id, "U2");
}

#[test]
fn lost_then_reactivated_produces_two_protocol_entries_in_order() {
    let (_db, mut pool) = open_pool("lost_reactivate");
    seed_keys(&mut pool);

    KeyLogic::issue(&mut pool, "U2", &ids(&["K3"]), None).unwrap();
    let assignment_id = KeyLogic::assignments(&pool, Some("U2"), true).unwrap()[0].id;

    let lost = KeyLogic::mark_lost(&mut pool, assignment_id, Some("admin")).unwrap();
    assert_eq!(lost.status, AssignmentStatus::Lost);
    assert!(lost.returned_at.is_none());
    assert_eq!(get_item(&pool.conn, "K3").unwrap().status, KeyStatus::Lost);

    // a lost key cannot be issued or marked lost again
    assert!(matches!(
        KeyLogic::issue(&mut pool, "U1", &ids(&["K3"]), None),
        Err(AppError::ItemNotAvailable(_))
    ));
    assert!(matches!(
        KeyLogic::mark_lost(&mut pool, assignment_id, None),
        Err(AppError::AssignmentNotActive(_))
    ));

    let item = KeyLogic::reactivate(&mut pool, "K3", Some("admin")).unwrap();
    assert_eq!(item.status, KeyStatus::Available);

    let actions: Vec<ProtocolAction> = KeyLogic::history(&pool, Some("K3"))
        .unwrap()
        .into_iter()
        .map(|p| p.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            ProtocolAction::Issue,
            ProtocolAction::Lost,
            ProtocolAction::Reactivate
        ]
    );

    let last = KeyLogic::history(&pool, Some("K3")).unwrap().pop().unwrap();
    let details = KeyLogic::protocol_details(&pool, last.id).unwrap();
    assert!(details.assignment.is_none());
    assert!(details.holder.is_none());
}

#[test]
fn reactivating_a_key_that_is_not_lost_fails() {
    let (_db, mut pool) = open_pool("reactivate_available");
    seed_keys(&mut pool);

    let err = KeyLogic::reactivate(&mut pool, "K1", None).unwrap_err();
    assert!(matches!(err, AppError::ItemNotLost(ref k) if k == "K1"));

    KeyLogic::issue(&mut pool, "U1", &ids(&["K1"]), None).unwrap();
    assert!(matches!(
        KeyLogic::reactivate(&mut pool, "K1", None),
        Err(AppError::ItemNotLost(_))
    ));

    assert!(matches!(
        KeyLogic::reactivate(&mut pool, "K404", None),
        Err(AppError::NotFound { .. })
    ));
    assert_eq!(count(&pool, "key_protocols"), 1);
}

#[test]
fn unknown_protocol_is_not_found() {
    let (_db, pool) = open_pool("protocol_missing");
    let err = KeyLogic::protocol_details(&pool, 4711).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn registering_a_key_twice_conflicts() {
    let (_db, mut pool) = open_pool("register_twice");
    seed_keys(&mut pool);

    let err = KeyLogic::register_item(&mut pool, "K1", "again").unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists { .. }));
    assert_eq!(KeyLogic::items(&pool).unwrap().len(), 3);
}

#[test]
fn lifecycle_operations_write_the_internal_log() {
    let (_db, mut pool) = open_pool("key_ttlog");
    seed_keys(&mut pool);

    KeyLogic::issue(&mut pool, "U1", &ids(&["K1", "K2"]), Some("admin")).unwrap();
    let active: Vec<i64> = KeyLogic::assignments(&pool, None, true)
        .unwrap()
        .iter()
        .map(|a| a.id)
        .collect();
    KeyLogic::return_keys(&mut pool, &active, Some("admin")).unwrap();

    let log_rows = |op: &str| -> i64 {
        pool.conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = ?1",
                [op],
                |r| r.get(0),
            )
            .unwrap()
    };

    // one row per call, however many keys it covers
    assert_eq!(log_rows("key_issue"), 1);
    assert_eq!(log_rows("key_return"), 1);

    let target: String = pool
        .conn
        .query_row(
            "SELECT target FROM log WHERE operation = 'key_issue'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(target, "U1");
}

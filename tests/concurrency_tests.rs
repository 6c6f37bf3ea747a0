use bside_nexus::core::keys::KeyLogic;
use bside_nexus::db::initialize::init_db;
use bside_nexus::db::migrate::applied_versions;
use bside_nexus::db::pool::DbPool;
use bside_nexus::errors::AppError;
use std::sync::{Arc, Barrier};
use std::thread;

mod common;
use common::{count, ids, open_pool, seed_keys};

#[test]
fn concurrent_issue_of_the_same_key_has_exactly_one_winner() {
    let (db_path, mut pool) = open_pool("concurrent_issue");
    seed_keys(&mut pool);
    drop(pool);

    const CALLERS: usize = 4;
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let db_path = db_path.clone();
            thread::spawn(move || {
                let mut pool = DbPool::new(&db_path).expect("open db");
                let holder = if i % 2 == 0 { "U1" } else { "U2" };
                barrier.wait();
                KeyLogic::issue(&mut pool, holder, &ids(&["K1"]), None)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "results: {:?}", results);

    for r in results.iter().filter(|r| r.is_err()) {
        assert!(
            matches!(r, Err(AppError::ItemNotAvailable(k)) if k == "K1"),
            "loser saw {:?}",
            r
        );
    }

    let pool = DbPool::new(&db_path).unwrap();
    assert_eq!(count(&pool, "key_protocols"), 1);
    assert_eq!(KeyLogic::assignments(&pool, None, true).unwrap().len(), 1);
}

#[test]
fn concurrent_returns_of_one_assignment_close_it_once() {
    let (db_path, mut pool) = open_pool("concurrent_return");
    seed_keys(&mut pool);
    KeyLogic::issue(&mut pool, "U1", &ids(&["K2"]), None).unwrap();
    let assignment_id = KeyLogic::assignments(&pool, None, true).unwrap()[0].id;
    drop(pool);

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let db_path = db_path.clone();
            thread::spawn(move || {
                let mut pool = DbPool::new(&db_path).expect("open db");
                barrier.wait();
                KeyLogic::return_keys(&mut pool, &[assignment_id], None)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AppError::AssignmentNotActive(_))))
    );

    let pool = DbPool::new(&db_path).unwrap();
    assert_eq!(count(&pool, "key_protocols"), 2);
}

#[test]
fn concurrent_first_open_records_each_migration_once() {
    let db_path = common::setup_test_db("concurrent_migrate");

    const OPENERS: usize = 4;
    let barrier = Arc::new(Barrier::new(OPENERS));

    let handles: Vec<_> = (0..OPENERS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let db_path = db_path.clone();
            thread::spawn(move || {
                let pool = DbPool::new(&db_path).expect("open db");
                barrier.wait();
                init_db(&pool.conn)
            })
        })
        .collect();

    for h in handles {
        h.join().expect("thread panicked").expect("init db");
    }

    let pool = DbPool::new(&db_path).unwrap();
    let versions = applied_versions(&pool.conn).unwrap();
    assert_eq!(
        versions,
        vec![
            "20240301_0001_key_management".to_string(),
            "20240301_0002_hrp_event_log".to_string()
        ]
    );
}

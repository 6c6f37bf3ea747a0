#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use bside_nexus::core::keys::KeyLogic;
use bside_nexus::core::profiles::ProfileLogic;
use bside_nexus::db::initialize::init_db;
use bside_nexus::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const KEY_ROLE: &str = "key_manager";

pub fn bsn() -> Command {
    cargo_bin_cmd!("bsnexus")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_bside_nexus.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh database with schema applied, opened through the library API.
pub fn open_pool(name: &str) -> (String, DbPool) {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    (db_path, pool)
}

/// Profiles U1 (fixed_salary) and U2 (hourly), keys K1..K3.
pub fn seed_keys(pool: &mut DbPool) {
    ProfileLogic::register(pool, "U1", "Ada", "fixed_salary").expect("profile U1");
    ProfileLogic::register(pool, "U2", "Grace", "hourly").expect("profile U2");
    for k in ["K1", "K2", "K3"] {
        KeyLogic::register_item(pool, k, &format!("Door {k}")).expect("key item");
    }
}

pub fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

pub fn count(pool: &DbPool, table: &str) -> i64 {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .expect("count")
}

mod common;

use std::env;
use std::fs;
use std::path::PathBuf;

use calendarGrid::models::login::{LoginRecord, load_login, save_login};
use calendarGrid::service::auth_service::{AuthService, forget, logged_in_user, needs_login};
use chrono::{Duration, TimeZone, Utc};
use common::FakeStore;

fn temp_login_file() -> PathBuf {
    env::temp_dir()
        .join(format!("calendargrid_login_{}", uuid::Uuid::new_v4()))
        .join("login_info.json")
}

#[tokio::test]
async fn verify_compares_plain_password() {
    let store = FakeStore::with_user("minsik", "secret", None);
    let auth = AuthService::new(&store);
    assert!(auth.verify("minsik", "secret").await);
    assert!(!auth.verify("minsik", "Secret").await);
    assert!(!auth.verify("someone", "secret").await);

    store.set_failing(true);
    assert!(!auth.verify("minsik", "secret").await);
}

#[tokio::test]
async fn successful_login_is_remembered_for_ninety_days() {
    let path = temp_login_file();
    let store = FakeStore::with_user("minsik", "secret", None);
    let auth = AuthService::new(&store);
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap();

    assert!(needs_login(&path, now));
    assert!(auth.login(&path, "minsik", "secret", now).await.unwrap());
    assert_eq!(logged_in_user(&path, now).as_deref(), Some("minsik"));
    assert!(!needs_login(&path, now + Duration::days(90)));
    assert!(needs_login(&path, now + Duration::days(91)));

    forget(&path).unwrap();
    assert!(needs_login(&path, now));
    // forgetting twice is fine
    forget(&path).unwrap();
}

#[tokio::test]
async fn failed_login_writes_nothing() {
    let path = temp_login_file();
    let store = FakeStore::with_user("minsik", "secret", None);
    let auth = AuthService::new(&store);
    let now = Utc::now();

    assert!(!auth.login(&path, "minsik", "wrong", now).await.unwrap());
    assert!(!path.exists());
}

#[test]
fn corrupt_login_file_means_login_again() {
    let path = temp_login_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{not json").unwrap();
    assert_eq!(load_login(&path), None);
    assert!(needs_login(&path, Utc::now()));

    fs::write(&path, r#"{"username": "minsik"}"#).unwrap();
    assert!(needs_login(&path, Utc::now()));
}

#[test]
fn login_file_round_trips_through_disk() {
    let path = temp_login_file();
    let record = LoginRecord::new("minsik", Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    save_login(&path, &record).unwrap();
    assert_eq!(load_login(&path), Some(record));
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"lastLogin\""));
}

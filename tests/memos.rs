use koyomi::error::AppError;
use koyomi::models::{memos, users};
use sqlx::SqlitePool;
use time::macros::date;

async fn seed_user(db: &SqlitePool, email: &str) -> i64 {
    users::create(db, "test user", email, "not-a-real-hash")
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "./migrations")]
async fn set_then_get_roundtrip(db: SqlitePool) {
    let user = seed_user(&db, "a@example.com").await;
    let date = date!(2024 - 04 - 01);

    let memo = memos::set(&db, user, date, "remember the milk")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(memo.content, "remember the milk");

    let fetched = memos::get(&db, user, date).await.unwrap().unwrap();
    assert_eq!(fetched.id, memo.id);
    assert_eq!(fetched.content, "remember the milk");
}

#[sqlx::test(migrations = "./migrations")]
async fn set_upserts_in_place(db: SqlitePool) {
    let user = seed_user(&db, "a@example.com").await;
    let date = date!(2024 - 04 - 02);

    let first = memos::set(&db, user, date, "v1").await.unwrap().unwrap();
    let second = memos::set(&db, user, date, "v2").await.unwrap().unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.content, "v2");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM memos;")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn blank_content_deletes(db: SqlitePool) {
    let user = seed_user(&db, "a@example.com").await;
    let date = date!(2024 - 04 - 03);

    memos::set(&db, user, date, "to be removed").await.unwrap();

    let result = memos::set(&db, user, date, "   ").await.unwrap();
    assert!(result.is_none());

    assert!(memos::get(&db, user, date).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_reports_whether_anything_was_removed(db: SqlitePool) {
    let user = seed_user(&db, "a@example.com").await;
    let date = date!(2024 - 04 - 04);

    assert!(!memos::delete(&db, user, date).await.unwrap());

    memos::set(&db, user, date, "note").await.unwrap();

    assert!(memos::delete(&db, user, date).await.unwrap());
    assert!(memos::get(&db, user, date).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn range_listing_is_scoped_to_the_user_and_window(db: SqlitePool) {
    let alice = seed_user(&db, "alice@example.com").await;
    let bob = seed_user(&db, "bob@example.com").await;

    memos::set(&db, alice, date!(2024 - 04 - 10), "in range")
        .await
        .unwrap();
    memos::set(&db, alice, date!(2024 - 04 - 20), "also in range")
        .await
        .unwrap();
    memos::set(&db, alice, date!(2024 - 05 - 01), "out of range")
        .await
        .unwrap();
    memos::set(&db, bob, date!(2024 - 04 - 15), "someone else's")
        .await
        .unwrap();

    let markers = memos::list_range(&db, alice, date!(2024 - 04 - 01), date!(2024 - 04 - 30))
        .await
        .unwrap();

    let dates: Vec<_> = markers.iter().map(|m| m.date).collect();
    assert_eq!(dates, vec![date!(2024 - 04 - 10), date!(2024 - 04 - 20)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn users_do_not_see_each_others_memos(db: SqlitePool) {
    let alice = seed_user(&db, "alice@example.com").await;
    let bob = seed_user(&db, "bob@example.com").await;
    let date = date!(2024 - 04 - 11);

    memos::set(&db, alice, date, "alice's note").await.unwrap();

    assert!(memos::get(&db, bob, date).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_email_registration_conflicts(db: SqlitePool) {
    users::create(&db, "first", "same@example.com", "hash-one")
        .await
        .unwrap();

    let err = users::create(&db, "second", "same@example.com", "hash-two")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

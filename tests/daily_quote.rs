use futures::future::join_all;
use koyomi::daily::{canonical_date, quote_for_date};
use koyomi::models::quotes::{self, NewQuote, PLACEHOLDER_QUOTE_ID};
use sqlx::SqlitePool;
use time::macros::date;

async fn seed_quotes(db: &SqlitePool, n: usize) {
    for i in 0..n {
        quotes::create(
            db,
            &NewQuote {
                text: format!("quote {i}"),
                text_en: None,
                author: format!("author {i}"),
                episode: None,
                episode_en: None,
                episode_short: None,
                episode_short_en: None,
                source_title: None,
                source_url: None,
                tags: None,
            },
        )
        .await
        .unwrap();
    }
}

async fn assignment_count(db: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM daily_quotes;")
        .fetch_one(db)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn repeated_resolution_returns_the_same_quote(db: SqlitePool) {
    seed_quotes(&db, 10).await;

    let date = date!(2024 - 03 - 01);
    let first = quote_for_date(&db, date).await.unwrap();

    for _ in 0..5 {
        let again = quote_for_date(&db, date).await.unwrap();
        assert_eq!(again.id, first.id);
    }

    assert_eq!(assignment_count(&db).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_first_resolutions_converge(db: SqlitePool) {
    seed_quotes(&db, 25).await;

    let date = date!(2024 - 03 - 02);

    let tasks = (0..8).map(|_| {
        let db = db.clone();
        tokio::spawn(async move { quote_for_date(&db, date).await })
    });

    let ids: Vec<i64> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().id)
        .collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM daily_quotes WHERE date = $1;")
        .bind(date)
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let persisted: i64 = sqlx::query_scalar("SELECT quote_id FROM daily_quotes WHERE date = $1;")
        .bind(date)
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(persisted, ids[0]);
}

#[test]
fn canonical_date_normalizes_to_the_utc_day() {
    let midnight = canonical_date("2024-03-01T00:00:00Z").unwrap();
    let evening = canonical_date("2024-03-01T23:59:59Z").unwrap();
    // 08:30 on March 2nd in UTC+9 is still March 1st in UTC
    let offset = canonical_date("2024-03-02T08:30:00+09:00").unwrap();

    assert_eq!(midnight, date!(2024 - 03 - 01));
    assert_eq!(evening, midnight);
    assert_eq!(offset, midnight);
    assert_eq!(canonical_date("2024-03-01").unwrap(), midnight);
}

#[test]
fn canonical_date_rejects_malformed_input() {
    assert!(canonical_date("not-a-date").is_err());
    assert!(canonical_date("2024-13-40").is_err());
    assert!(canonical_date("").is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn same_utc_day_inputs_share_one_assignment(db: SqlitePool) {
    seed_quotes(&db, 5).await;

    let a = quote_for_date(&db, canonical_date("2024-03-01T00:00:00Z").unwrap())
        .await
        .unwrap();
    let b = quote_for_date(&db, canonical_date("2024-03-01T23:59:59Z").unwrap())
        .await
        .unwrap();

    assert_eq!(a.id, b.id);
    assert_eq!(assignment_count(&db).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_pool_returns_placeholder_without_persisting(db: SqlitePool) {
    let date = date!(2024 - 03 - 03);

    let quote = quote_for_date(&db, date).await.unwrap();
    assert_eq!(quote.id, PLACEHOLDER_QUOTE_ID);
    assert_eq!(assignment_count(&db).await, 0);

    // a pool seeded later assigns normally for the same date
    seed_quotes(&db, 3).await;

    let quote = quote_for_date(&db, date).await.unwrap();
    assert_ne!(quote.id, PLACEHOLDER_QUOTE_ID);
    assert_eq!(assignment_count(&db).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn assignments_for_distinct_dates_are_independent(db: SqlitePool) {
    // one quote in the pool: both dates must bind it, through separate rows
    seed_quotes(&db, 1).await;

    let d1 = date!(2024 - 03 - 04);
    let d2 = date!(2024 - 03 - 05);

    let q1 = quote_for_date(&db, d1).await.unwrap();
    let q2 = quote_for_date(&db, d2).await.unwrap();

    assert_eq!(q1.id, q2.id);
    assert_eq!(assignment_count(&db).await, 2);

    // growing the pool never rewrites an existing assignment
    seed_quotes(&db, 10).await;
    let again = quote_for_date(&db, d1).await.unwrap();
    assert_eq!(again.id, q1.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn reset_clears_assignments_and_pool(db: SqlitePool) {
    seed_quotes(&db, 4).await;

    let date = date!(2024 - 03 - 06);
    let before = quote_for_date(&db, date).await.unwrap();
    assert_ne!(before.id, PLACEHOLDER_QUOTE_ID);

    quotes::reset_all(&db).await.unwrap();

    assert_eq!(quotes::count(&db).await.unwrap(), 0);
    assert_eq!(assignment_count(&db).await, 0);

    let after = quote_for_date(&db, date).await.unwrap();
    assert_eq!(after.id, PLACEHOLDER_QUOTE_ID);

    seed_quotes(&db, 2).await;

    let fresh = quote_for_date(&db, date).await.unwrap();
    assert_ne!(fresh.id, PLACEHOLDER_QUOTE_ID);
    assert_eq!(assignment_count(&db).await, 1);
}

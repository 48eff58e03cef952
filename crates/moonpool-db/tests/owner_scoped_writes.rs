#![allow(clippy::expect_used)]
//! Integration tests for owner-scoped operation writes.
//!
//! These need a live PostgreSQL instance. Point `TEST_DATABASE_URL` at an
//! empty database to run them; without the variable each test is a no-op so
//! the suite still passes in environments with no database.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use moonpool_db::db::DbProvider;
use moonpool_db::db::connection::{DbConnection, DbPool, create_pool};
use moonpool_db::db::enums::{OperationStatus, OperationType};
use moonpool_db::db::migrate::run_migrations;
use moonpool_db::db::query::operation as operation_query;
use moonpool_db::db::query::WriteOutcome;
use moonpool_db::db::schema::app_user;
use moonpool_db::model::operation::{DEFAULT_COLOR, NewOperation, OperationChangeset};

// Tests run in parallel; the schema must only be migrated once.
static MIGRATE: std::sync::Once = std::sync::Once::new();

async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    MIGRATE.call_once(|| run_migrations(&url).expect("failed to run migrations"));
    Some(
        create_pool(&url, 4)
            .await
            .expect("failed to create test pool"),
    )
}

async fn seed_user(conn: &mut DbConnection<'_>) -> Uuid {
    let id = Uuid::now_v7();
    diesel::insert_into(app_user::table)
        .values((
            app_user::id.eq(id),
            app_user::email.eq(format!("diver-{id}@example.com")),
            app_user::display_name.eq("Test Diver"),
        ))
        .execute(conn)
        .await
        .expect("failed to seed user");
    id
}

fn new_operation(owner_id: Uuid, title: &str) -> NewOperation<'_> {
    NewOperation {
        id: Uuid::now_v7(),
        owner_id,
        title,
        description: None,
        operation_date: NaiveDate::from_ymd_opt(2025, 8, 26).expect("valid date"),
        start_time: None,
        end_time: None,
        location: None,
        operation_type: OperationType::Dive,
        status: OperationStatus::Scheduled,
        color: DEFAULT_COLOR,
    }
}

fn rename_to(title: &str) -> OperationChangeset {
    OperationChangeset {
        title: Some(title.to_string()),
        updated_at: Some(Utc::now()),
        ..Default::default()
    }
}

#[test_log::test(tokio::test)]
async fn updated_at_strictly_increases_across_updates() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let mut conn = pool.get_connection().await.expect("connection");

    let owner = seed_user(&mut conn).await;
    let op = operation_query::insert(&mut conn, &new_operation(owner, "Bell run 1"))
        .await
        .expect("insert");

    let WriteOutcome::Done(first) =
        operation_query::update_for_owner(&mut conn, op.id, owner, &rename_to("Bell run 2"))
            .await
            .expect("first update")
    else {
        panic!("owner update should succeed");
    };

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let WriteOutcome::Done(second) =
        operation_query::update_for_owner(&mut conn, op.id, owner, &rename_to("Bell run 3"))
            .await
            .expect("second update")
    else {
        panic!("owner update should succeed");
    };

    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.title, "Bell run 3");
}

#[test_log::test(tokio::test)]
async fn non_owner_update_is_forbidden_and_changes_nothing() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let mut conn = pool.get_connection().await.expect("connection");

    let owner = seed_user(&mut conn).await;
    let stranger = seed_user(&mut conn).await;
    let op = operation_query::insert(&mut conn, &new_operation(owner, "Hull survey"))
        .await
        .expect("insert");

    let outcome =
        operation_query::update_for_owner(&mut conn, op.id, stranger, &rename_to("Hijacked"))
            .await
            .expect("update query");
    assert!(matches!(outcome, WriteOutcome::Forbidden));

    let stored = operation_query::find(&mut conn, op.id)
        .await
        .expect("find")
        .expect("row still present");
    assert_eq!(stored.title, "Hull survey");
    assert_eq!(stored.updated_at, op.updated_at);
}

#[test_log::test(tokio::test)]
async fn non_owner_delete_is_forbidden_but_absent_id_is_not_found() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let mut conn = pool.get_connection().await.expect("connection");

    let owner = seed_user(&mut conn).await;
    let stranger = seed_user(&mut conn).await;
    let op = operation_query::insert(&mut conn, &new_operation(owner, "Stage decompression"))
        .await
        .expect("insert");

    let outcome = operation_query::delete_for_owner(&mut conn, op.id, stranger)
        .await
        .expect("delete query");
    assert!(matches!(outcome, WriteOutcome::Forbidden));

    let outcome = operation_query::delete_for_owner(&mut conn, Uuid::now_v7(), stranger)
        .await
        .expect("delete query");
    assert!(matches!(outcome, WriteOutcome::NotFound));

    let outcome = operation_query::delete_for_owner(&mut conn, op.id, owner)
        .await
        .expect("delete query");
    assert!(matches!(outcome, WriteOutcome::Done(())));

    let outcome = operation_query::delete_for_owner(&mut conn, op.id, owner)
        .await
        .expect("delete query");
    assert!(matches!(outcome, WriteOutcome::NotFound));
}

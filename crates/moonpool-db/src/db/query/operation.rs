//! Query composition for `operation`.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::query::WriteOutcome;
use crate::db::schema::operation;
use crate::error::DbResult;
use crate::model::operation::{NewOperation, Operation, OperationChangeset};

/// ## Summary
/// Lists an owner's operations, newest first, optionally bounded by an
/// inclusive date range. Either bound may be given on its own.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_for_owner(
    conn: &mut DbConnection<'_>,
    owner_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> QueryResult<Vec<Operation>> {
    let mut query = operation::table
        .filter(operation::owner_id.eq(owner_id))
        .select(Operation::as_select())
        .order(operation::operation_date.desc())
        .into_boxed();

    if let Some(from) = from {
        query = query.filter(operation::operation_date.ge(from));
    }
    if let Some(to) = to {
        query = query.filter(operation::operation_date.le(to));
    }

    query.load(conn).await
}

/// ## Summary
/// Fetches an operation by id regardless of owner. Callers enforce access.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Operation>> {
    operation::table
        .find(id)
        .select(Operation::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts an operation and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    new_operation: &NewOperation<'_>,
) -> QueryResult<Operation> {
    diesel::insert_into(operation::table)
        .values(new_operation)
        .returning(Operation::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Applies a partial update to an operation the owner holds.
///
/// The changeset must touch at least one column; callers always stamp
/// `updated_at`, which satisfies that.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_for_owner(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    owner_id: Uuid,
    changeset: &OperationChangeset,
) -> DbResult<WriteOutcome<Operation>> {
    let updated = diesel::update(
        operation::table
            .filter(operation::id.eq(id))
            .filter(operation::owner_id.eq(owner_id)),
    )
    .set(changeset)
    .returning(Operation::as_returning())
    .get_result(conn)
    .await
    .optional()?;

    match updated {
        Some(op) => Ok(WriteOutcome::Done(op)),
        None => classify_missing(conn, id).await,
    }
}

/// ## Summary
/// Deletes an operation the owner holds.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_for_owner(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    owner_id: Uuid,
) -> DbResult<WriteOutcome<()>> {
    let deleted = diesel::delete(
        operation::table
            .filter(operation::id.eq(id))
            .filter(operation::owner_id.eq(owner_id)),
    )
    .execute(conn)
    .await?;

    if deleted > 0 {
        Ok(WriteOutcome::Done(()))
    } else {
        classify_missing(conn, id).await
    }
}

/// Distinguishes a row that never existed from one owned by someone else.
async fn classify_missing<T>(conn: &mut DbConnection<'_>, id: Uuid) -> DbResult<WriteOutcome<T>> {
    let exists: bool = diesel::select(diesel::dsl::exists(operation::table.find(id)))
        .get_result(conn)
        .await?;

    Ok(if exists {
        WriteOutcome::Forbidden
    } else {
        WriteOutcome::NotFound
    })
}

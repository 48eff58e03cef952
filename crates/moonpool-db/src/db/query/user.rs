//! Query composition for `app_user`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::app_user;
use crate::model::user::User;

/// ## Summary
/// Fetches a user by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<User>> {
    app_user::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Fetches a user by email address.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_email(conn: &mut DbConnection<'_>, email: &str) -> QueryResult<Option<User>> {
    app_user::table
        .filter(app_user::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

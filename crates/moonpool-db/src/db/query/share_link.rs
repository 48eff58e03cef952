//! Query composition for `share_link`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;
use rand::RngCore;
use uuid::Uuid;

use moonpool_core::error::CoreError;

use crate::db::connection::DbConnection;
use crate::db::query::WriteOutcome;
use crate::db::schema::share_link;
use crate::error::DbResult;
use crate::model::share_link::{NewShareLink, ShareLink};

/// Raw entropy per token before encoding.
const TOKEN_BYTES: usize = 32;

/// Collisions are astronomically unlikely at 256 bits, but the unique index
/// is still the authority; retry a few times before giving up.
const TOKEN_INSERT_ATTEMPTS: u32 = 3;

/// Result of resolving a share token against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(ShareLink),
    NotFound,
    Expired,
}

/// Generates an unguessable URL-safe share token.
#[must_use]
pub fn generate_share_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// ## Summary
/// Creates a share link for the owner, regenerating the token on a unique
/// collision.
///
/// ## Errors
/// Returns an error if the database operation fails or the retry budget is
/// exhausted.
pub async fn create(
    conn: &mut DbConnection<'_>,
    owner_id: Uuid,
    is_public: bool,
    expires_at: Option<DateTime<Utc>>,
) -> DbResult<ShareLink> {
    for _ in 0..TOKEN_INSERT_ATTEMPTS {
        let token = generate_share_token();
        let new_link = NewShareLink {
            id: Uuid::now_v7(),
            owner_id,
            token: &token,
            is_public,
            expires_at,
        };

        match diesel::insert_into(share_link::table)
            .values(&new_link)
            .returning(ShareLink::as_returning())
            .get_result(conn)
            .await
        {
            Ok(link) => return Ok(link),
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                tracing::warn!("Share token collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CoreError::InvariantViolation("share token retry budget exhausted").into())
}

/// ## Summary
/// Lists the owner's share links, newest first.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_for_owner(
    conn: &mut DbConnection<'_>,
    owner_id: Uuid,
) -> QueryResult<Vec<ShareLink>> {
    share_link::table
        .filter(share_link::owner_id.eq(owner_id))
        .select(ShareLink::as_select())
        .order(share_link::created_at.desc())
        .load(conn)
        .await
}

/// ## Summary
/// Fetches one of the owner's share links by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_for_owner(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    owner_id: Uuid,
) -> DbResult<WriteOutcome<ShareLink>> {
    let link = share_link::table
        .find(id)
        .select(ShareLink::as_select())
        .first(conn)
        .await
        .optional()?;

    Ok(match link {
        Some(link) if link.owner_id == owner_id => WriteOutcome::Done(link),
        Some(_) => WriteOutcome::Forbidden,
        None => WriteOutcome::NotFound,
    })
}

/// ## Summary
/// Resolves a share token to its link, reporting expiry distinctly so the
/// caller can answer 410 instead of 404.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn resolve_token(
    conn: &mut DbConnection<'_>,
    token: &str,
    now: DateTime<Utc>,
) -> DbResult<ResolveOutcome> {
    let link = share_link::table
        .filter(share_link::token.eq(token))
        .select(ShareLink::as_select())
        .first(conn)
        .await
        .optional()?;

    Ok(match link {
        None => ResolveOutcome::NotFound,
        Some(link) if link.is_expired(now) => ResolveOutcome::Expired,
        Some(link) => ResolveOutcome::Resolved(link),
    })
}

/// ## Summary
/// Deletes one of the owner's share links, revoking the token immediately.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_for_owner(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    owner_id: Uuid,
) -> DbResult<WriteOutcome<()>> {
    let deleted = diesel::delete(
        share_link::table
            .filter(share_link::id.eq(id))
            .filter(share_link::owner_id.eq(owner_id)),
    )
    .execute(conn)
    .await?;

    if deleted > 0 {
        return Ok(WriteOutcome::Done(()));
    }

    let exists: bool = diesel::select(diesel::dsl::exists(share_link::table.find(id)))
        .get_result(conn)
        .await?;

    Ok(if exists {
        WriteOutcome::Forbidden
    } else {
        WriteOutcome::NotFound
    })
}

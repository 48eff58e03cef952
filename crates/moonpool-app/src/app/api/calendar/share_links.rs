use chrono::{DateTime, Utc};
use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use moonpool_db::db::query::{WriteOutcome, share_link as share_link_query};
use moonpool_db::model::share_link::ShareLink;

use crate::app::api::render_error;
use crate::state::{get_config_from_depot, get_db_from_depot};
use crate::middleware::identity::{Identity, get_identity_from_depot};

/// ## Summary
/// Share link response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub id: Uuid,
    pub token: String,
    pub is_public: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShareLinkResponse {
    fn new(link: ShareLink, origin: &str) -> Self {
        Self {
            share_url: link.share_url(origin),
            id: link.id,
            token: link.token,
            is_public: link.is_public,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// ## Summary
/// Create share link request payload
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareLinkRequest {
    pub is_public: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// ## Summary
/// Embed response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    pub share_url: String,
    pub embed_code: String,
}

/// ## Summary
/// GET /api/operations-calendar/share-links - List the owner's share links.
///
/// ## Errors
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 500 if database operations fail
#[handler]
async fn list_share_links(depot: &mut Depot, res: &mut Response) {
    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Ok(config) = get_config_from_depot(depot) else {
        render_error(
            res,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        );
        return;
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match share_link_query::list_for_owner(&mut conn, user.id).await {
        Ok(links) => {
            let origin = config.server.origin();
            let payload: Vec<ShareLinkResponse> = links
                .into_iter()
                .map(|link| ShareLinkResponse::new(link, &origin))
                .collect();
            res.render(Json(payload));
        }
        Err(e) => {
            error!(error = ?e, "Failed to list share links");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// POST /api/operations-calendar/share-links - Mint a share link.
///
/// The token is generated server-side; clients only choose visibility and
/// an optional expiry.
///
/// ## Errors
/// Returns HTTP 400 on a malformed body
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 500 if database operations fail
#[handler]
async fn create_share_link(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing create share link request");

    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Ok(config) = get_config_from_depot(depot) else {
        render_error(
            res,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        );
        return;
    };

    // An empty body is fine; all fields have defaults
    let create_req: CreateShareLinkRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(_) => CreateShareLinkRequest::default(),
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match share_link_query::create(
        &mut conn,
        user.id,
        create_req.is_public.unwrap_or(true),
        create_req.expires_at,
    )
    .await
    {
        Ok(link) => {
            tracing::info!(share_link_id = %link.id, owner_id = %user.id, "Share link created");
            res.status_code(StatusCode::CREATED);
            res.render(Json(ShareLinkResponse::new(link, &config.server.origin())));
        }
        Err(e) => {
            error!(error = ?e, "Failed to create share link");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// DELETE /`api/operations-calendar/share-links/:id` - Revoke a share link.
///
/// Revocation is immediate; the token stops resolving as soon as the row is
/// gone.
///
/// ## Errors
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 403 if the link belongs to another user
/// Returns HTTP 404 if the id is absent
/// Returns HTTP 500 if database operations fail
#[handler]
async fn delete_share_link(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Some(id) = req.param::<Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid share link id");
        return;
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match share_link_query::delete_for_owner(&mut conn, id, user.id).await {
        Ok(WriteOutcome::Done(())) => {
            tracing::info!(share_link_id = %id, owner_id = %user.id, "Share link deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Ok(WriteOutcome::Forbidden) => {
            render_error(res, StatusCode::FORBIDDEN, "Access denied");
        }
        Ok(WriteOutcome::NotFound) => {
            render_error(res, StatusCode::NOT_FOUND, "Share link not found");
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete share link");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// GET /`api/operations-calendar/share-links/:id/embed` - Derive the share
/// URL and iframe snippet for a link. Purely a formatting operation.
///
/// ## Errors
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 403/404 per ownership
/// Returns HTTP 500 if database operations fail
#[handler]
async fn embed_share_link(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Some(id) = req.param::<Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid share link id");
        return;
    };

    let Ok(config) = get_config_from_depot(depot) else {
        render_error(
            res,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        );
        return;
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match share_link_query::get_for_owner(&mut conn, id, user.id).await {
        Ok(WriteOutcome::Done(link)) => {
            let origin = config.server.origin();
            res.render(Json(EmbedResponse {
                share_url: link.share_url(&origin),
                embed_code: link.embed_code(&origin),
            }));
        }
        Ok(WriteOutcome::Forbidden) => {
            render_error(res, StatusCode::FORBIDDEN, "Access denied");
        }
        Ok(WriteOutcome::NotFound) => {
            render_error(res, StatusCode::NOT_FOUND, "Share link not found");
        }
        Err(e) => {
            error!(error = ?e, "Failed to fetch share link");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("share-links")
        .get(list_share_links)
        .post(create_share_link)
        .push(
            Router::with_path("<id>")
                .delete(delete_share_link)
                .push(Router::with_path("embed").get(embed_share_link)),
        )
}

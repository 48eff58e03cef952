//! External calendar sync gateway.
//!
//! The credential and mapping tables exist, but no provider integration
//! does yet. Every entry point says so instead of pretending to sync, and
//! the status endpoint reports all providers as disconnected.

use chrono::{DateTime, Utc};
use salvo::{Depot, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use moonpool_core::types::SyncProvider;

use crate::app::api::render_error;
use crate::middleware::identity::{Identity, get_identity_from_depot};

/// ## Summary
/// Per-provider sync status payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub provider: &'static str,
    pub connected: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// ## Summary
/// Sync status response payload
#[derive(Debug, Serialize)]
pub struct SyncStatusResponse {
    pub providers: Vec<ProviderStatus>,
}

/// ## Summary
/// GET /api/operations-calendar/sync/status - Report provider connections.
///
/// ## Errors
/// Returns HTTP 401 if not authenticated
#[handler]
async fn sync_status(depot: &mut Depot, res: &mut Response) {
    let Identity::User(_) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let providers = SyncProvider::ALL
        .into_iter()
        .map(|provider| ProviderStatus {
            provider: provider.as_str(),
            connected: false,
            last_synced_at: None,
        })
        .collect();

    res.render(Json(SyncStatusResponse { providers }));
}

/// ## Summary
/// Stub for every provider entry point.
///
/// ## Errors
/// Always returns HTTP 501.
#[handler]
async fn sync_not_implemented(res: &mut Response) {
    render_error(
        res,
        StatusCode::NOT_IMPLEMENTED,
        "Calendar sync is not yet implemented, use iCal export/import instead",
    );
}

fn provider_stub(path: &'static str) -> Router {
    Router::with_path(path)
        .goal(sync_not_implemented)
        .push(Router::with_path("<**rest>").goal(sync_not_implemented))
}

#[must_use]
pub fn routes() -> Vec<Router> {
    let mut routers = vec![Router::with_path("sync/status").get(sync_status)];
    for provider in SyncProvider::ALL {
        routers.push(provider_stub(provider.as_str()));
    }
    routers
}

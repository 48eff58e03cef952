use salvo::Depot;
use tracing::error;
use uuid::Uuid;

use moonpool_db::db::query::user as user_query;
use moonpool_db::model::user::User;

use crate::state::get_db_from_depot;

pub mod depot_keys {
    pub const REQUEST_IDENTITY: &str = "request_identity";
}

/// Who is making this request.
///
/// `Anonymous` covers both requests with no identity hints and requests whose
/// hints do not resolve to a known account. An unknown `userId` or email is
/// never trusted as-is; handlers that need an owner answer 401.
#[derive(Debug, Clone)]
pub enum Identity {
    User(User),
    Anonymous,
}

/// ## Summary
/// Resolves the acting user and stores it in the depot.
///
/// Resolution order: `userId` query param, then `x-user-email` header, then
/// `email` query param. Share tokens are handled by the calendar handlers,
/// not here, so anonymous requests pass through.
///
/// ## Side Effects
/// Inserts an [`Identity`] into the depot under
/// [`depot_keys::REQUEST_IDENTITY`].
///
/// ## Errors
/// Returns HTTP 500/503 if the database cannot be reached during lookup.
pub struct IdentityMiddleware;

#[salvo::async_trait]
impl salvo::Handler for IdentityMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Resolving request identity");

        let provider = match get_db_from_depot(depot) {
            Ok(p) => p,
            Err(e) => {
                error!(error = ?e, "Failed to get database provider from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let mut conn = match provider.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "Failed to get database connection");
                res.status_code(salvo::http::StatusCode::SERVICE_UNAVAILABLE);
                ctrl.skip_rest();
                return;
            }
        };

        let user_id = req.query::<Uuid>("userId");
        let email = req
            .header::<String>("x-user-email")
            .or_else(|| req.query::<String>("email"));

        let lookup = match (user_id, email) {
            (Some(id), _) => user_query::find(&mut conn, id).await,
            (None, Some(email)) => user_query::find_by_email(&mut conn, &email).await,
            (None, None) => Ok(None),
        };

        match lookup {
            Ok(Some(user)) => {
                tracing::debug!(user_id = %user.id, "Request identity resolved");
                depot.insert(depot_keys::REQUEST_IDENTITY, Identity::User(user));
            }
            Ok(None) => {
                depot.insert(depot_keys::REQUEST_IDENTITY, Identity::Anonymous);
            }
            Err(e) => {
                error!(error = ?e, "Identity lookup failed");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Retrieves the resolved identity from the depot. A missing entry is
/// treated as anonymous.
#[must_use]
pub fn get_identity_from_depot(depot: &Depot) -> Identity {
    depot
        .get::<Identity>(depot_keys::REQUEST_IDENTITY)
        .cloned()
        .unwrap_or(Identity::Anonymous)
}

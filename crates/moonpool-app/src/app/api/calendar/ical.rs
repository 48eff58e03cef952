use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use moonpool_core::constants::ICAL_EXPORT_FILENAME;
use moonpool_core::error::CoreError;
use moonpool_db::db::query::operation as operation_query;
use moonpool_db::model::operation::{DEFAULT_COLOR, NewOperation, Operation};
use moonpool_rfc::ical::parse::parse;
use moonpool_rfc::map::{OperationView, ParsedEvent, extract_events, operations_to_ical};

use super::operations::{OperationResponse, parse_date_range};
use crate::app::api::{render_app_error, render_error};
use crate::state::{get_config_from_depot, get_db_from_depot};
use crate::error::AppError;
use crate::middleware::identity::{Identity, get_identity_from_depot};

/// ## Summary
/// Import result payload
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: usize,
    pub total: usize,
    pub operations: Vec<OperationResponse>,
}

/// ## Summary
/// GET /api/operations-calendar/export/ical - Export the acting user's
/// operations as a `text/calendar` attachment.
///
/// ## Errors
/// Returns HTTP 400 for malformed date filters
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 500 if the export cannot be rendered
#[handler]
pub async fn export_ical(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing iCal export request");

    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let (from, to) = match parse_date_range(req) {
        Ok(range) => range,
        Err(e) => {
            render_app_error(res, &e.into());
            return;
        }
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

    let ops = match operation_query::list_for_owner(&mut conn, user.id, from, to).await {
        Ok(ops) => ops,
        Err(e) => {
            error!(error = ?e, "Failed to list operations for export");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    let views: Vec<OperationView<'_>> = ops.iter().map(Operation::to_view).collect();

    let text = match operations_to_ical(&views, &config.calendar.name, &config.calendar.timezone) {
        Ok(text) => text,
        Err(e) => {
            error!(error = %e, "Failed to render iCal export");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    tracing::info!(owner_id = %user.id, events = views.len(), "Exported operations calendar");

    if let Err(e) = res
        .add_header("Content-Type", "text/calendar; charset=utf-8", true)
        .and_then(|res| {
            res.add_header(
                "Content-Disposition",
                format!("attachment; filename=\"{ICAL_EXPORT_FILENAME}\""),
                true,
            )
        })
    {
        error!(error = %e, "Failed to set export headers");
        render_error(
            res,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        );
        return;
    }

    if let Err(e) = res.write_body(text) {
        error!(error = %e, "Failed to write export body");
    }
}

/// ## Summary
/// POST /api/operations-calendar/import/ical - Import a calendar file.
///
/// Accepts a multipart `file` field or a raw `text/calendar` body. A
/// malformed document fails the whole request; a bad individual event is
/// skipped and the response reports `{imported, total}`.
///
/// ## Errors
/// Returns HTTP 400 for an oversized, undecodable, or unparseable document
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 500 if database operations fail
#[handler]
pub async fn import_ical(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing iCal import request");

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

    let timezone: Tz = match config.calendar.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            error!(timezone = %config.calendar.timezone, "Configured timezone is invalid");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
            return;
        }
    };

    let bytes = match read_upload(req).await {
        Ok(bytes) => bytes,
        Err(e) => {
            render_app_error(res, &e.into());
            return;
        }
    };

    let max_bytes = usize::try_from(config.calendar.max_import_bytes).unwrap_or(usize::MAX);
    if bytes.len() > max_bytes {
        render_app_error(
            res,
            &CoreError::validation(
                "file",
                format!("file exceeds the {max_bytes}-byte import limit"),
            )
            .into(),
        );
        return;
    }

    let Ok(text) = String::from_utf8(bytes) else {
        render_app_error(
            res,
            &CoreError::validation("file", "file is not valid UTF-8").into(),
        );
        return;
    };

    let ical = match parse(&text) {
        Ok(ical) => ical,
        Err(e) => {
            // Malformed documents fail the whole import
            render_app_error(res, &AppError::from(moonpool_rfc::error::RfcError::from(e)));
            return;
        }
    };

    let events = extract_events(&ical);
    let total = events.len();

    let max_events = usize::try_from(config.calendar.max_import_events).unwrap_or(usize::MAX);
    if total > max_events {
        render_app_error(
            res,
            &CoreError::validation(
                "file",
                format!(
                    "file contains {total} events, more than the {} allowed",
                    config.calendar.max_import_events
                ),
            )
            .into(),
        );
        return;
    }

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

    // One insert per event; a failure skips that event, never the batch
    let mut operations = Vec::new();
    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unconvertible event");
                continue;
            }
        };

        match insert_event(&mut conn, user.id, &event, timezone).await {
            Ok(op) => operations.push(OperationResponse::from(op)),
            Err(e) => {
                tracing::warn!(error = %e, title = %event.title, "Skipping failed insert");
            }
        }
    }

    let imported = operations.len();
    tracing::info!(owner_id = %user.id, imported, total, "Calendar import finished");

    res.render(Json(ImportResponse {
        success: true,
        imported,
        total,
        operations,
    }));
}

/// Pulls the uploaded document out of the request: multipart `file` field
/// first, then the raw body.
async fn read_upload(req: &mut Request) -> Result<Vec<u8>, CoreError> {
    if let Some(file) = req.file("file").await {
        return tokio::fs::read(file.path())
            .await
            .map_err(|e| CoreError::validation("file", format!("could not read upload: {e}")));
    }

    match req.payload().await {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes.to_vec()),
        _ => Err(CoreError::validation("file", "no calendar file provided")),
    }
}

/// Derives the stored date and time-of-day columns for an imported event.
///
/// An all-day start carries its calendar date as midnight UTC; that date
/// must be read back in UTC. Converting it into the display timezone first
/// would land a day early anywhere west of Greenwich.
fn event_schedule(
    event: &ParsedEvent,
    timezone: Tz,
) -> (NaiveDate, Option<NaiveTime>, Option<NaiveTime>) {
    if event.all_day {
        return (event.start.date_naive(), None, None);
    }

    let local_start = event.start.with_timezone(&timezone);
    let local_end = event.end.with_timezone(&timezone);
    (
        local_start.date_naive(),
        Some(local_start.time()),
        Some(local_end.time()),
    )
}

async fn insert_event(
    conn: &mut moonpool_db::db::connection::DbConnection<'_>,
    owner_id: Uuid,
    event: &ParsedEvent,
    timezone: Tz,
) -> Result<Operation, moonpool_db::error::DbError> {
    let (operation_date, start_time, end_time) = event_schedule(event, timezone);

    let new_operation = NewOperation {
        id: Uuid::now_v7(),
        owner_id,
        title: &event.title,
        description: (!event.description.is_empty()).then_some(event.description.as_str()),
        operation_date,
        start_time,
        end_time,
        location: event.location.as_deref(),
        operation_type: event.operation_type.into(),
        status: moonpool_core::types::OperationStatus::Scheduled.into(),
        color: DEFAULT_COLOR,
    };

    Ok(operation_query::insert(conn, &new_operation).await?)
}

#[must_use]
pub fn export_routes() -> Router {
    Router::with_path("export/ical").get(export_ical)
}


#[must_use]
pub fn import_routes() -> Router {
    Router::with_path("import/ical").post(import_ical)
}

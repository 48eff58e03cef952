use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use salvo::{Depot, Request, Response, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use moonpool_core::error::CoreError;
use moonpool_core::types;
use moonpool_db::db::enums::{OperationStatus, OperationType};
use moonpool_db::db::query::share_link::ResolveOutcome;
use moonpool_db::db::query::{WriteOutcome, operation as operation_query, share_link};
use moonpool_db::model::operation::{DEFAULT_COLOR, NewOperation, Operation, OperationChangeset};

use crate::app::api::{render_app_error, render_error};
use crate::state::get_db_from_depot;
use crate::middleware::identity::{Identity, get_identity_from_depot};

/// ## Summary
/// Operation response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub operation_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub status: OperationStatus,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Operation> for OperationResponse {
    fn from(op: Operation) -> Self {
        Self {
            id: op.id,
            owner_id: op.owner_id,
            title: op.title,
            description: op.description,
            operation_date: op.operation_date,
            start_time: op.start_time,
            end_time: op.end_time,
            location: op.location,
            operation_type: op.operation_type,
            status: op.status,
            color: op.color,
            created_at: op.created_at,
            updated_at: op.updated_at,
        }
    }
}

/// ## Summary
/// Create operation request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub operation_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub operation_type: Option<String>,
    pub status: Option<String>,
    pub color: Option<String>,
}

/// ## Summary
/// Partial update request payload.
///
/// Nullable columns use a double option: an absent field leaves the column
/// untouched, an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperationRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub operation_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(rename = "type")]
    pub operation_type: Option<String>,
    pub status: Option<String>,
    pub color: Option<String>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 instant, taking the date part.
pub(crate) fn parse_date_field(field: &str, raw: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.date_naive());
    }

    Err(CoreError::validation(
        field,
        format!("\"{raw}\" is not a valid date"),
    ))
}

fn parse_time_field(field: &str, raw: &str) -> Result<NaiveTime, CoreError> {
    let trimmed = raw.trim();

    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| CoreError::validation(field, format!("\"{raw}\" is not a valid time of day")))
}

fn parse_type_field(raw: &str) -> Result<types::OperationType, CoreError> {
    types::OperationType::parse(raw)
        .ok_or_else(|| CoreError::validation("type", format!("\"{raw}\" is not a known type")))
}

fn parse_status_field(raw: &str) -> Result<types::OperationStatus, CoreError> {
    types::OperationStatus::parse(raw)
        .ok_or_else(|| CoreError::validation("status", format!("\"{raw}\" is not a known status")))
}

/// Validated form of a create request, ready for insertion.
#[derive(Debug)]
struct ValidatedCreate {
    title: String,
    description: Option<String>,
    operation_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    location: Option<String>,
    operation_type: types::OperationType,
    status: types::OperationStatus,
    color: String,
}

fn validate_create(req: CreateOperationRequest) -> Result<ValidatedCreate, CoreError> {
    let title = match req.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(CoreError::validation("title", "title is required")),
    };

    let operation_date = match &req.operation_date {
        Some(raw) => parse_date_field("operationDate", raw)?,
        None => return Err(CoreError::validation("operationDate", "a date is required")),
    };

    let start_time = req
        .start_time
        .as_deref()
        .map(|raw| parse_time_field("startTime", raw))
        .transpose()?;
    let end_time = req
        .end_time
        .as_deref()
        .map(|raw| parse_time_field("endTime", raw))
        .transpose()?;

    let operation_type = req
        .operation_type
        .as_deref()
        .map(parse_type_field)
        .transpose()?
        .unwrap_or(types::OperationType::Dive);
    let status = req
        .status
        .as_deref()
        .map(parse_status_field)
        .transpose()?
        .unwrap_or(types::OperationStatus::Scheduled);

    Ok(ValidatedCreate {
        title,
        description: req.description,
        operation_date,
        start_time,
        end_time,
        location: req.location,
        operation_type,
        status,
        color: req.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    })
}

fn build_changeset(req: &UpdateOperationRequest) -> Result<OperationChangeset, CoreError> {
    let mut changeset = OperationChangeset {
        updated_at: Some(Utc::now()),
        ..Default::default()
    };

    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(CoreError::validation("title", "title must not be empty"));
        }
        changeset.title = Some(title.clone());
    }
    if let Some(description) = &req.description {
        changeset.description = Some(description.clone());
    }
    if let Some(raw) = &req.operation_date {
        changeset.operation_date = Some(parse_date_field("operationDate", raw)?);
    }
    if let Some(start_time) = &req.start_time {
        changeset.start_time = Some(match start_time {
            Some(raw) => Some(parse_time_field("startTime", raw)?),
            None => None,
        });
    }
    if let Some(end_time) = &req.end_time {
        changeset.end_time = Some(match end_time {
            Some(raw) => Some(parse_time_field("endTime", raw)?),
            None => None,
        });
    }
    if let Some(location) = &req.location {
        changeset.location = Some(location.clone());
    }
    if let Some(raw) = &req.operation_type {
        changeset.operation_type = Some(parse_type_field(raw)?.into());
    }
    if let Some(raw) = &req.status {
        changeset.status = Some(parse_status_field(raw)?.into());
    }
    if let Some(color) = &req.color {
        changeset.color = Some(color.clone());
    }

    Ok(changeset)
}

/// Parses an optional inclusive date range from `startDate`/`endDate` query
/// params.
pub(crate) fn parse_date_range(
    req: &Request,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CoreError> {
    let from = req
        .query::<String>("startDate")
        .map(|raw| parse_date_field("startDate", &raw))
        .transpose()?;
    let to = req
        .query::<String>("endDate")
        .map(|raw| parse_date_field("endDate", &raw))
        .transpose()?;
    Ok((from, to))
}

/// ## Summary
/// GET /api/operations-calendar - List operations.
///
/// With `shareToken`, serves the link owner's operations read-only without
/// authentication. Otherwise the acting user's own operations are returned.
///
/// ## Errors
/// Returns HTTP 400 for malformed date filters
/// Returns HTTP 401 if no identity and no share token
/// Returns HTTP 404/410 for an unknown/expired share token
/// Returns HTTP 500 if database operations fail
#[handler]
pub async fn list_operations(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing list operations request");

    let (from, to) = match parse_date_range(req) {
        Ok(range) => range,
        Err(e) => {
            render_app_error(res, &e.into());
            return;
        }
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

    let owner_id = if let Some(token) = req.query::<String>("shareToken") {
        match share_link::resolve_token(&mut conn, &token, Utc::now()).await {
            Ok(ResolveOutcome::Resolved(link)) => link.owner_id,
            Ok(ResolveOutcome::NotFound) => {
                render_error(res, StatusCode::NOT_FOUND, "Share link not found");
                return;
            }
            Ok(ResolveOutcome::Expired) => {
                render_error(res, StatusCode::GONE, "Share link has expired");
                return;
            }
            Err(e) => {
                error!(error = ?e, "Failed to resolve share token");
                render_error(
                    res,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                );
                return;
            }
        }
    } else {
        match get_identity_from_depot(depot) {
            Identity::User(user) => user.id,
            Identity::Anonymous => {
                render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
                return;
            }
        }
    };

    match operation_query::list_for_owner(&mut conn, owner_id, from, to).await {
        Ok(ops) => {
            let payload: Vec<OperationResponse> =
                ops.into_iter().map(OperationResponse::from).collect();
            res.render(Json(payload));
        }
        Err(e) => {
            error!(error = ?e, "Failed to list operations");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// GET /`api/operations-calendar/:id` - Fetch one operation.
///
/// A real id owned by someone else answers 403, distinguishable from 404.
///
/// ## Errors
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 403 if the operation belongs to another user
/// Returns HTTP 404 if the id is absent
/// Returns HTTP 500 if database operations fail
#[handler]
pub async fn get_operation(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Some(id) = req.param::<Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid operation id");
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

    match operation_query::find(&mut conn, id).await {
        Ok(Some(op)) if op.owner_id == user.id => {
            res.render(Json(OperationResponse::from(op)));
        }
        Ok(Some(_)) => {
            render_error(res, StatusCode::FORBIDDEN, "Access denied");
        }
        Ok(None) => {
            render_error(res, StatusCode::NOT_FOUND, "Operation not found");
        }
        Err(e) => {
            error!(error = ?e, "Failed to fetch operation");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// POST /api/operations-calendar - Create an operation.
///
/// Missing optional fields default: type DIVE, status SCHEDULED, color to
/// the fixed default.
///
/// ## Errors
/// Returns HTTP 400 on validation failure, naming the offending field
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 500 if database operations fail
#[handler]
pub async fn create_operation(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing create operation request");

    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let create_req: CreateOperationRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse create operation request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let validated = match validate_create(create_req) {
        Ok(v) => v,
        Err(e) => {
            render_app_error(res, &e.into());
            return;
        }
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

    let new_operation = NewOperation {
        id: Uuid::now_v7(),
        owner_id: user.id,
        title: &validated.title,
        description: validated.description.as_deref(),
        operation_date: validated.operation_date,
        start_time: validated.start_time,
        end_time: validated.end_time,
        location: validated.location.as_deref(),
        operation_type: validated.operation_type.into(),
        status: validated.status.into(),
        color: &validated.color,
    };

    match operation_query::insert(&mut conn, &new_operation).await {
        Ok(op) => {
            tracing::info!(operation_id = %op.id, owner_id = %user.id, "Operation created");
            res.status_code(StatusCode::CREATED);
            res.render(Json(OperationResponse::from(op)));
        }
        Err(e) => {
            error!(error = ?e, "Failed to create operation");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// PUT /`api/operations-calendar/:id` - Partially update an operation.
///
/// Only fields present in the body are changed; an explicit `null` clears a
/// nullable field. Always refreshes the updated-at timestamp.
///
/// ## Errors
/// Returns HTTP 400 on validation failure
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 403/404 per ownership
/// Returns HTTP 500 if database operations fail
#[handler]
pub async fn update_operation(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing update operation request");

    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Some(id) = req.param::<Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid operation id");
        return;
    };

    let update_req: UpdateOperationRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse update operation request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let changeset = match build_changeset(&update_req) {
        Ok(c) => c,
        Err(e) => {
            render_app_error(res, &e.into());
            return;
        }
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

    match operation_query::update_for_owner(&mut conn, id, user.id, &changeset).await {
        Ok(WriteOutcome::Done(op)) => {
            tracing::info!(operation_id = %op.id, owner_id = %user.id, "Operation updated");
            res.render(Json(OperationResponse::from(op)));
        }
        Ok(WriteOutcome::Forbidden) => {
            render_error(res, StatusCode::FORBIDDEN, "Access denied");
        }
        Ok(WriteOutcome::NotFound) => {
            render_error(res, StatusCode::NOT_FOUND, "Operation not found");
        }
        Err(e) => {
            error!(error = ?e, "Failed to update operation");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

/// ## Summary
/// DELETE /`api/operations-calendar/:id` - Hard-delete an operation.
///
/// Deleting an already-deleted id answers 404.
///
/// ## Errors
/// Returns HTTP 401 if not authenticated
/// Returns HTTP 403/404 per ownership
/// Returns HTTP 500 if database operations fail
#[handler]
pub async fn delete_operation(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Identity::User(user) = get_identity_from_depot(depot) else {
        render_error(res, StatusCode::UNAUTHORIZED, "Authentication required");
        return;
    };

    let Some(id) = req.param::<Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid operation id");
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

    match operation_query::delete_for_owner(&mut conn, id, user.id).await {
        Ok(WriteOutcome::Done(())) => {
            tracing::info!(operation_id = %id, owner_id = %user.id, "Operation deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Ok(WriteOutcome::Forbidden) => {
            render_error(res, StatusCode::FORBIDDEN, "Access denied");
        }
        Ok(WriteOutcome::NotFound) => {
            render_error(res, StatusCode::NOT_FOUND, "Operation not found");
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete operation");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn create_requires_title() {
        let req = CreateOperationRequest {
            title: Some("   ".to_string()),
            description: None,
            operation_date: Some("2025-08-26".to_string()),
            start_time: None,
            end_time: None,
            location: None,
            operation_type: None,
            status: None,
            color: None,
        };
        let err = validate_create(req).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ValidationError { ref field, .. } if field == "title"
        ));
    }

    #[test_log::test]
    fn create_rejects_bad_date_naming_the_field() {
        let req = CreateOperationRequest {
            title: Some("Hull Inspection".to_string()),
            description: None,
            operation_date: Some("not-a-date".to_string()),
            start_time: None,
            end_time: None,
            location: None,
            operation_type: None,
            status: None,
            color: None,
        };
        let err = validate_create(req).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ValidationError { ref field, .. } if field == "operationDate"
        ));
    }

    #[test_log::test]
    fn create_applies_defaults() {
        let req = CreateOperationRequest {
            title: Some("Hull Inspection".to_string()),
            description: None,
            operation_date: Some("2025-08-26".to_string()),
            start_time: None,
            end_time: None,
            location: None,
            operation_type: None,
            status: None,
            color: None,
        };
        let validated = validate_create(req).unwrap();
        assert_eq!(validated.operation_type, types::OperationType::Dive);
        assert_eq!(validated.status, types::OperationStatus::Scheduled);
        assert_eq!(validated.color, DEFAULT_COLOR);
    }

    #[test_log::test]
    fn date_field_accepts_rfc3339_instants() {
        let date = parse_date_field("operationDate", "2025-08-26T09:00:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 26).unwrap());
    }

    #[test_log::test]
    fn time_field_accepts_minutes_precision() {
        assert_eq!(
            parse_time_field("startTime", "06:30").unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert!(parse_time_field("startTime", "25:00").is_err());
    }

    #[test_log::test]
    fn absent_update_fields_leave_columns_untouched() {
        let req: UpdateOperationRequest =
            serde_json::from_str(r#"{"title": "New title"}"#).unwrap();
        let changeset = build_changeset(&req).unwrap();

        assert_eq!(changeset.title.as_deref(), Some("New title"));
        assert_eq!(changeset.description, None);
        assert_eq!(changeset.start_time, None);
        assert!(changeset.updated_at.is_some());
    }

    #[test_log::test]
    fn explicit_null_clears_nullable_fields() {
        let req: UpdateOperationRequest =
            serde_json::from_str(r#"{"location": null, "startTime": null}"#).unwrap();
        let changeset = build_changeset(&req).unwrap();

        assert_eq!(changeset.location, Some(None));
        assert_eq!(changeset.start_time, Some(None));
        assert_eq!(changeset.end_time, None);
    }

    #[test_log::test]
    fn update_rejects_unknown_type() {
        let req: UpdateOperationRequest =
            serde_json::from_str(r#"{"type": "HOLIDAY"}"#).unwrap();
        let err = build_changeset(&req).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ValidationError { ref field, .. } if field == "type"
        ));
    }
}

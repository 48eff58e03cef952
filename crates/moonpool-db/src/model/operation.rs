use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use moonpool_rfc::map::OperationView;

use crate::db::enums::{OperationStatus, OperationType};
use crate::db::schema::operation;

/// Default display color assigned to operations created without one.
pub const DEFAULT_COLOR: &str = "#0EA5E9";

/// A scheduled operation on the calendar.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = operation)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Operation {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub operation_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub operation_type: OperationType,
    pub status: OperationStatus,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Operation {
    /// Borrowed projection used by the iCal export mapping.
    #[must_use]
    pub fn to_view(&self) -> OperationView<'_> {
        OperationView {
            id: self.id,
            title: &self.title,
            description: self.description.as_deref(),
            operation_date: self.operation_date,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location.as_deref(),
            operation_type: self.operation_type.into(),
            status: self.status.into(),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = operation)]
pub struct NewOperation<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub operation_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<&'a str>,
    pub operation_type: OperationType,
    pub status: OperationStatus,
    pub color: &'a str,
}

/// Partial update for an operation.
///
/// Outer `None` leaves a column untouched; `Some(None)` clears a nullable
/// column.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = operation)]
pub struct OperationChangeset {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub operation_date: Option<NaiveDate>,
    pub start_time: Option<Option<NaiveTime>>,
    pub end_time: Option<Option<NaiveTime>>,
    pub location: Option<Option<String>>,
    pub operation_type: Option<OperationType>,
    pub status: Option<OperationStatus>,
    pub color: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

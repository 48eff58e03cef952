use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::{SyncDirection, SyncProvider};
use crate::db::schema::{sync_account, sync_mapping};

/// A linked external calendar account.
///
/// Rows only exist once a provider connection flow completes; the gateway
/// currently never creates them, so status queries report every provider as
/// disconnected.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sync_account)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SyncAccount {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub provider: SyncProvider,
    pub direction: SyncDirection,
    pub refresh_token: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Correlates an operation with its event in an external calendar.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = sync_mapping)]
#[diesel(belongs_to(SyncAccount, foreign_key = account_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SyncMapping {
    pub id: Uuid,
    pub account_id: Uuid,
    pub operation_id: Uuid,
    pub external_event_id: String,
    pub created_at: DateTime<Utc>,
}

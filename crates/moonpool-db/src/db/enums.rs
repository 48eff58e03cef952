//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Operation classification.
///
/// Maps to `operation.operation_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Dive,
    Inspection,
    Maintenance,
    Training,
    Other,
}

impl ToSql<Text, Pg> for OperationType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for OperationType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"DIVE" => Ok(Self::Dive),
            b"INSPECTION" => Ok(Self::Inspection),
            b"MAINTENANCE" => Ok(Self::Maintenance),
            b"TRAINING" => Ok(Self::Training),
            b"OTHER" => Ok(Self::Other),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl OperationType {
    /// Returns the database string representation of this operation type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dive => "DIVE",
            Self::Inspection => "INSPECTION",
            Self::Maintenance => "MAINTENANCE",
            Self::Training => "TRAINING",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OperationType> for moonpool_core::types::OperationType {
    fn from(db_type: OperationType) -> Self {
        match db_type {
            OperationType::Dive => Self::Dive,
            OperationType::Inspection => Self::Inspection,
            OperationType::Maintenance => Self::Maintenance,
            OperationType::Training => Self::Training,
            OperationType::Other => Self::Other,
        }
    }
}

impl From<moonpool_core::types::OperationType> for OperationType {
    fn from(core_type: moonpool_core::types::OperationType) -> Self {
        match core_type {
            moonpool_core::types::OperationType::Dive => Self::Dive,
            moonpool_core::types::OperationType::Inspection => Self::Inspection,
            moonpool_core::types::OperationType::Maintenance => Self::Maintenance,
            moonpool_core::types::OperationType::Training => Self::Training,
            moonpool_core::types::OperationType::Other => Self::Other,
        }
    }
}

/// Operation lifecycle status.
///
/// Maps to `operation.status` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ToSql<Text, Pg> for OperationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for OperationStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"SCHEDULED" => Ok(Self::Scheduled),
            b"IN_PROGRESS" => Ok(Self::InProgress),
            b"COMPLETED" => Ok(Self::Completed),
            b"CANCELLED" => Ok(Self::Cancelled),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl OperationStatus {
    /// Returns the database string representation of this operation status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OperationStatus> for moonpool_core::types::OperationStatus {
    fn from(db_status: OperationStatus) -> Self {
        match db_status {
            OperationStatus::Scheduled => Self::Scheduled,
            OperationStatus::InProgress => Self::InProgress,
            OperationStatus::Completed => Self::Completed,
            OperationStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<moonpool_core::types::OperationStatus> for OperationStatus {
    fn from(core_status: moonpool_core::types::OperationStatus) -> Self {
        match core_status {
            moonpool_core::types::OperationStatus::Scheduled => Self::Scheduled,
            moonpool_core::types::OperationStatus::InProgress => Self::InProgress,
            moonpool_core::types::OperationStatus::Completed => Self::Completed,
            moonpool_core::types::OperationStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// External calendar provider.
///
/// Maps to `sync_account.provider` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum SyncProvider {
    Google,
    Outlook,
    Apple,
}

impl ToSql<Text, Pg> for SyncProvider {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for SyncProvider {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"google" => Ok(Self::Google),
            b"outlook" => Ok(Self::Outlook),
            b"apple" => Ok(Self::Apple),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl SyncProvider {
    /// Returns the database string representation of this provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
        }
    }
}

impl fmt::Display for SyncProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SyncProvider> for moonpool_core::types::SyncProvider {
    fn from(db_provider: SyncProvider) -> Self {
        match db_provider {
            SyncProvider::Google => Self::Google,
            SyncProvider::Outlook => Self::Outlook,
            SyncProvider::Apple => Self::Apple,
        }
    }
}

impl From<moonpool_core::types::SyncProvider> for SyncProvider {
    fn from(core_provider: moonpool_core::types::SyncProvider) -> Self {
        match core_provider {
            moonpool_core::types::SyncProvider::Google => Self::Google,
            moonpool_core::types::SyncProvider::Outlook => Self::Outlook,
            moonpool_core::types::SyncProvider::Apple => Self::Apple,
        }
    }
}

/// Configured sync direction.
///
/// Maps to `sync_account.direction` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    Push,
    Pull,
    Bidirectional,
}

impl ToSql<Text, Pg> for SyncDirection {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for SyncDirection {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"push" => Ok(Self::Push),
            b"pull" => Ok(Self::Pull),
            b"bidirectional" => Ok(Self::Bidirectional),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl SyncDirection {
    /// Returns the database string representation of this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SyncDirection> for moonpool_core::types::SyncDirection {
    fn from(db_direction: SyncDirection) -> Self {
        match db_direction {
            SyncDirection::Push => Self::Push,
            SyncDirection::Pull => Self::Pull,
            SyncDirection::Bidirectional => Self::Bidirectional,
        }
    }
}

impl From<moonpool_core::types::SyncDirection> for SyncDirection {
    fn from(core_direction: moonpool_core::types::SyncDirection) -> Self {
        match core_direction {
            moonpool_core::types::SyncDirection::Push => Self::Push,
            moonpool_core::types::SyncDirection::Pull => Self::Pull,
            moonpool_core::types::SyncDirection::Bidirectional => Self::Bidirectional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_type_serializes_in_wire_form() {
        assert_eq!(
            serde_json::to_string(&OperationType::Dive).unwrap(),
            "\"DIVE\""
        );
        assert_eq!(
            serde_json::from_str::<OperationStatus>("\"IN_PROGRESS\"").unwrap(),
            OperationStatus::InProgress
        );
    }

    #[test]
    fn provider_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SyncProvider::Google).unwrap(),
            "\"google\""
        );
    }

    #[test]
    fn core_conversions_round_trip() {
        for ty in [
            OperationType::Dive,
            OperationType::Inspection,
            OperationType::Maintenance,
            OperationType::Training,
            OperationType::Other,
        ] {
            let core: moonpool_core::types::OperationType = ty.into();
            assert_eq!(OperationType::from(core), ty);
        }
    }
}

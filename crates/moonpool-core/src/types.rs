/// Operation classification without database dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Dive,
    Inspection,
    Maintenance,
    Training,
    Other,
}

impl OperationType {
    /// Calendar tag order used when scanning free text; earlier wins.
    pub const INFERENCE_ORDER: [Self; 4] = [
        Self::Dive,
        Self::Inspection,
        Self::Maintenance,
        Self::Training,
    ];

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

    /// Matches a calendar tag case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DIVE" => Some(Self::Dive),
            "INSPECTION" => Some(Self::Inspection),
            "MAINTENANCE" => Some(Self::Maintenance),
            "TRAINING" => Some(Self::Training),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation lifecycle status without database dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl OperationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Some(Self::Scheduled),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External calendar provider for the sync gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncProvider {
    Google,
    Outlook,
    Apple,
}

impl SyncProvider {
    pub const ALL: [Self; 3] = [Self::Google, Self::Outlook, Self::Apple];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
        }
    }
}

impl std::fmt::Display for SyncProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured direction for external calendar sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncDirection {
    Push,
    Pull,
    Bidirectional,
}

impl SyncDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_type_parse_is_case_insensitive() {
        assert_eq!(OperationType::parse("dive"), Some(OperationType::Dive));
        assert_eq!(
            OperationType::parse(" Inspection "),
            Some(OperationType::Inspection)
        );
        assert_eq!(OperationType::parse("holiday"), None);
    }

    #[test]
    fn operation_type_round_trips_through_as_str() {
        for ty in [
            OperationType::Dive,
            OperationType::Inspection,
            OperationType::Maintenance,
            OperationType::Training,
            OperationType::Other,
        ] {
            assert_eq!(OperationType::parse(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn operation_status_round_trips_through_as_str() {
        for status in [
            OperationStatus::Scheduled,
            OperationStatus::InProgress,
            OperationStatus::Completed,
            OperationStatus::Cancelled,
        ] {
            assert_eq!(OperationStatus::parse(status.as_str()), Some(status));
        }
    }
}

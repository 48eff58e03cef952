use thiserror::Error;

/// Codec layer errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Calendar parse error: {0}")]
    ParseError(#[from] crate::ical::parse::ParseError),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;

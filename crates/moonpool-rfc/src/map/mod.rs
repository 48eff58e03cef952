//! Mapping between operation records and iCalendar documents.

mod export;
mod import;

pub use export::{OperationView, operations_to_ical};
pub use import::{ParsedEvent, extract_events};

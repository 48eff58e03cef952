//! iCalendar support (RFC 5545), reduced to what an operations calendar
//! exchanges: VCALENDAR documents carrying VEVENT components with text,
//! DATE, and DATE-TIME values.

pub mod build;
pub mod core;
pub mod parse;

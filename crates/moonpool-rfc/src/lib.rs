pub mod error;
pub mod ical;
pub mod map;

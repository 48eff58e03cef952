//! iCalendar core models (RFC 5545).
//!
//! Properties keep their wire-form raw value; value interpretation (dates,
//! datetimes, unescaping) happens at the mapping layer so that one bad value
//! never poisons the rest of an otherwise well-formed document.

mod component;
mod datetime;
mod property;

pub use component::{Component, ComponentKind, ICalendar};
pub use datetime::{DateTimeForm, IcalDateTime};
pub use property::{Parameter, Property};

/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const CALENDAR_ROUTE_COMPONENT: &str = "operations-calendar";
pub const CALENDAR_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", CALENDAR_ROUTE_COMPONENT);

/// Public path a share token is served under (relative to the frontend base)
pub const SHARED_CALENDAR_PATH: &str =
    const_str::concat!("/", CALENDAR_ROUTE_COMPONENT, "/shared");

/// Filename used for the iCal export attachment
pub const ICAL_EXPORT_FILENAME: &str = "operations-calendar.ics";

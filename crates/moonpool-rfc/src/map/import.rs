//! VEVENT → `ParsedEvent` extraction.
//!
//! Document-level structure problems are fatal at parse time; everything
//! here is per-event, so one bad event yields one `Err` and the rest of the
//! import proceeds.

use chrono::{DateTime, Duration, Utc};

use moonpool_core::types::OperationType;

use crate::error::{RfcError, RfcResult};
use crate::ical::core::{Component, ICalendar, Property};
use crate::ical::parse::{parse_date, parse_datetime};

/// Default title when a VEVENT has no SUMMARY.
const UNTITLED: &str = "Untitled Event";

/// A calendar event lifted out of an imported document.
///
/// Transient: consumed immediately to build operation records, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub operation_type: OperationType,
    pub all_day: bool,
    pub external_id: Option<String>,
}

/// ## Summary
/// Extracts every VEVENT of a parsed calendar as a [`ParsedEvent`].
///
/// Conversion failures (missing or unparseable DTSTART, bad DTEND) are
/// returned as individual `Err` entries so callers can skip them and report
/// partial success.
#[must_use]
#[tracing::instrument(skip(ical), fields(events = ical.events().len()))]
pub fn extract_events(ical: &ICalendar) -> Vec<RfcResult<ParsedEvent>> {
    ical.events().into_iter().map(map_event).collect()
}

fn map_event(event: &Component) -> RfcResult<ParsedEvent> {
    let dtstart = event
        .get_property("DTSTART")
        .ok_or_else(|| RfcError::InvalidEvent("missing DTSTART".to_string()))?;

    let (start, all_day) = parse_event_time(dtstart)?;

    let end = match event.get_property("DTEND") {
        Some(dtend) => parse_event_time(dtend)?.0,
        None if all_day => start + Duration::days(1),
        None => start + Duration::hours(1),
    };

    let title = event.summary().unwrap_or_else(|| UNTITLED.to_string());
    let description = event.description().unwrap_or_default();
    let operation_type = infer_type(event, &description);
    let external_id = resolve_external_id(event);

    Ok(ParsedEvent {
        title,
        description,
        start,
        end,
        location: event.location(),
        operation_type,
        all_day,
        external_id,
    })
}

/// Resolves a DTSTART/DTEND property to an instant, reporting whether it was
/// a date-only (all-day) value.
fn parse_event_time(prop: &Property) -> RfcResult<(DateTime<Utc>, bool)> {
    let raw = prop.raw_value.trim();

    let is_date_only = prop
        .value_type()
        .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        || (raw.len() == 8 && !raw.contains('T'));

    if is_date_only {
        let date = parse_date(raw, 0, 0)?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| RfcError::InvalidEvent("invalid date".to_string()))?;
        return Ok((midnight.and_utc(), true));
    }

    let dt = parse_datetime(raw, prop.tzid(), 0, 0)?;
    Ok((dt.to_utc()?, false))
}

/// Infers the operation type: an explicit recognized CATEGORIES tag wins,
/// then keyword scanning of the description, then OTHER.
fn infer_type(event: &Component, description: &str) -> OperationType {
    if let Some(categories) = event.get_property("CATEGORIES") {
        for tag in categories.text_value().split(',') {
            if let Some(ty) = OperationType::parse(tag) {
                return ty;
            }
        }
    }

    let upper = description.to_ascii_uppercase();
    for ty in OperationType::INFERENCE_ORDER {
        if upper.contains(ty.as_str()) {
            return ty;
        }
    }

    OperationType::Other
}

/// The UID is the external id, unless a URL property carries a scheme —
/// its path part overrides UID to recover the original operation id.
fn resolve_external_id(event: &Component) -> Option<String> {
    let mut external_id = event.uid();

    if let Some(url) = event.get_property("URL") {
        let raw = url.text_value();
        if let Some(idx) = raw.find("://") {
            external_id = Some(raw[idx + 3..].to_string());
        }
    }

    external_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ical::parse::parse;

    fn wrap(events: &str) -> String {
        format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{events}END:VCALENDAR\r\n")
    }

    fn single_event(body: &str) -> ParsedEvent {
        let input = wrap(&format!("BEGIN:VEVENT\r\n{body}END:VEVENT\r\n"));
        let ical = parse(&input).unwrap();
        let mut events = extract_events(&ical);
        assert_eq!(events.len(), 1);
        events.remove(0).unwrap()
    }

    #[test_log::test]
    fn defaults_apply_for_sparse_event() {
        let event = single_event("DTSTART:20250826T090000Z\r\n");

        assert_eq!(event.title, "Untitled Event");
        assert_eq!(event.description, "");
        assert_eq!(event.operation_type, OperationType::Other);
        assert!(!event.all_day);
        assert_eq!(event.external_id, None);
        // Missing DTEND defaults to start + 1 hour
        assert_eq!((event.end - event.start).num_minutes(), 60);
    }

    #[test_log::test]
    fn date_only_dtstart_is_all_day() {
        let event = single_event("UID:x\r\nDTSTART;VALUE=DATE:20250826\r\n");

        assert!(event.all_day);
        assert_eq!(event.start.to_rfc3339(), "2025-08-26T00:00:00+00:00");
        assert_eq!((event.end - event.start).num_days(), 1);
    }

    #[test_log::test]
    fn bare_date_without_value_param_is_all_day() {
        let event = single_event("DTSTART:20250826\r\n");
        assert!(event.all_day);
    }

    #[test_log::test]
    fn categories_tag_wins_over_description() {
        let event = single_event(
            "DTSTART:20250826T090000Z\r\nCATEGORIES:TRAINING\r\nDESCRIPTION:Routine DIVE work\r\n",
        );
        assert_eq!(event.operation_type, OperationType::Training);
    }

    #[test_log::test]
    fn categories_is_case_insensitive() {
        let event = single_event("DTSTART:20250826T090000Z\r\nCATEGORIES:maintenance\r\n");
        assert_eq!(event.operation_type, OperationType::Maintenance);
    }

    #[test_log::test]
    fn unrecognized_categories_falls_back_to_description_scan() {
        let event = single_event(
            "DTSTART:20250826T090000Z\r\nCATEGORIES:OFFSHORE\r\nDESCRIPTION:Post-storm INSPECTION of moorings\r\n",
        );
        assert_eq!(event.operation_type, OperationType::Inspection);
    }

    #[test_log::test]
    fn description_scan_respects_priority_order() {
        let event = single_event(
            "DTSTART:20250826T090000Z\r\nDESCRIPTION:TRAINING dive for new INSPECTION crew\r\n",
        );
        // DIVE is checked first and "dive" appears in the text
        assert_eq!(event.operation_type, OperationType::Dive);
    }

    #[test_log::test]
    fn url_property_overrides_uid() {
        let event = single_event(
            "UID:mangled-by-google\r\nDTSTART:20250826T090000Z\r\nURL:operations://op-77\r\n",
        );
        assert_eq!(event.external_id.as_deref(), Some("op-77"));
    }

    #[test_log::test]
    fn uid_used_when_url_has_no_scheme() {
        let event = single_event(
            "UID:original-uid\r\nDTSTART:20250826T090000Z\r\nURL:no-scheme-here\r\n",
        );
        assert_eq!(event.external_id.as_deref(), Some("original-uid"));
    }

    #[test_log::test]
    fn missing_dtstart_fails_that_event_only() {
        let input = wrap(
            "BEGIN:VEVENT\r\nUID:ok-1\r\nDTSTART:20250826T090000Z\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:broken\r\nSUMMARY:No start\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:ok-2\r\nDTSTART:20250827T090000Z\r\nEND:VEVENT\r\n",
        );
        let ical = parse(&input).unwrap();
        let events = extract_events(&ical);

        assert_eq!(events.len(), 3);
        assert_eq!(events.iter().filter(|e| e.is_ok()).count(), 2);
        assert!(events[1].is_err());
    }

    #[test_log::test]
    fn unparseable_date_fails_that_event_only() {
        let input = wrap(
            "BEGIN:VEVENT\r\nUID:a\r\nDTSTART:20250826T090000Z\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:b\r\nDTSTART:garbage-date\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:c\r\nDTSTART:20250828T090000Z\r\nEND:VEVENT\r\n",
        );
        let ical = parse(&input).unwrap();
        let events = extract_events(&ical);

        assert_eq!(events.len(), 3);
        assert_eq!(events.iter().filter(|e| e.is_ok()).count(), 2);
        assert!(events[1].is_err());
    }

    #[test_log::test]
    fn timed_event_with_tzid_resolves_to_utc() {
        let event =
            single_event("DTSTART;TZID=Europe/Oslo:20250115T090000\r\nSUMMARY:Winter dive\r\n");
        assert_eq!(event.start.to_rfc3339(), "2025-01-15T08:00:00+00:00");
    }

    #[test_log::test]
    fn round_trip_preserves_titles_and_types() {
        use crate::map::export::{OperationView, operations_to_ical};
        use chrono::{NaiveDate, NaiveTime};
        use moonpool_core::types::OperationStatus;
        use uuid::Uuid;

        let ops = [
            OperationView {
                id: Uuid::now_v7(),
                title: "Hull Inspection",
                description: None,
                operation_date: NaiveDate::from_ymd_opt(2025, 8, 26).unwrap(),
                start_time: None,
                end_time: None,
                location: None,
                operation_type: OperationType::Inspection,
                status: OperationStatus::Scheduled,
            },
            OperationView {
                id: Uuid::now_v7(),
                title: "Sat dive, bell run 2",
                description: Some("Deep water"),
                operation_date: NaiveDate::from_ymd_opt(2025, 8, 27).unwrap(),
                start_time: NaiveTime::from_hms_opt(6, 30, 0),
                end_time: NaiveTime::from_hms_opt(18, 0, 0),
                location: Some("North Sea, Block 16"),
                operation_type: OperationType::Dive,
                status: OperationStatus::InProgress,
            },
        ];

        let text = operations_to_ical(&ops, "Ops", "UTC").unwrap();
        let parsed = parse(&text).unwrap();
        let events: Vec<ParsedEvent> = extract_events(&parsed)
            .into_iter()
            .collect::<RfcResult<_>>()
            .unwrap();

        assert_eq!(events.len(), ops.len());
        for (event, op) in events.iter().zip(&ops) {
            assert_eq!(event.title, op.title);
            assert_eq!(event.operation_type, op.operation_type);
            assert_eq!(event.external_id.as_deref(), Some(op.id.to_string().as_str()));
        }
        assert!(events[0].all_day);
        assert!(!events[1].all_day);
        assert_eq!(events[1].location.as_deref(), Some("North Sea, Block 16"));
    }
}

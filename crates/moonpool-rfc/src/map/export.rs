//! Operation list → VCALENDAR export.
//!
//! Each operation becomes one VEVENT. The operation id rides in the UID and,
//! redundantly, in a `URL:operations://<id>` property so a later import can
//! recover it even when an intermediate calendar application rewrites UIDs.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use moonpool_core::types::{OperationStatus, OperationType};

use crate::error::{RfcError, RfcResult};
use crate::ical::build::serialize;
use crate::ical::core::{Component, ICalendar, Parameter, Property};

/// Borrowed view of an operation record, decoupled from the storage model.
#[derive(Debug, Clone, Copy)]
pub struct OperationView<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub operation_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<&'a str>,
    pub operation_type: OperationType,
    pub status: OperationStatus,
}

/// ## Summary
/// Renders a list of operations as a complete iCalendar document.
///
/// Timed events carry `TZID=<timezone>` local wall-clock stamps (plain UTC
/// form when the timezone is UTC); operations without a start time become
/// all-day events with no DTEND.
///
/// ## Errors
/// Returns an error if `timezone` is not a known IANA identifier.
#[tracing::instrument(skip(ops), fields(count = ops.len(), timezone))]
pub fn operations_to_ical(
    ops: &[OperationView<'_>],
    calendar_name: &str,
    timezone: &str,
) -> RfcResult<String> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| RfcError::UnknownTimezone(timezone.to_string()))?;

    let mut ical = ICalendar::default();
    ical.root.add_property(Property::raw("CALSCALE", "GREGORIAN"));
    ical.root
        .add_property(Property::text("X-WR-CALNAME", calendar_name));
    ical.root
        .add_property(Property::raw("X-WR-TIMEZONE", timezone));

    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for op in ops {
        ical.add_event(build_event(op, tz, timezone, &dtstamp));
    }

    tracing::debug!(events = ops.len(), "Exported operations to iCalendar");

    Ok(serialize(&ical))
}

fn build_event(op: &OperationView<'_>, tz: Tz, tzid: &str, dtstamp: &str) -> Component {
    let mut event = Component::event();

    event.add_property(Property::raw("UID", op.id.to_string()));
    event.add_property(Property::raw("DTSTAMP", dtstamp));
    event.add_property(Property::text("SUMMARY", op.title));
    event.add_property(Property::text(
        "DESCRIPTION",
        &synthesize_description(op.operation_type, op.description, op.status),
    ));
    event.add_property(Property::raw("CATEGORIES", op.operation_type.as_str()));
    event.add_property(Property::raw(
        "STATUS",
        if op.status == OperationStatus::Cancelled {
            "CANCELLED"
        } else {
            "CONFIRMED"
        },
    ));
    event.add_property(Property::raw("URL", format!("operations://{}", op.id)));

    if let Some(location) = op.location {
        event.add_property(Property::text("LOCATION", location));
    }

    if let Some(start_time) = op.start_time {
        let start = op.operation_date.and_time(start_time);
        let end = op.end_time.map_or_else(
            || start + Duration::hours(1),
            |end_time| op.operation_date.and_time(end_time),
        );

        event.add_property(timed_property("DTSTART", start, tz, tzid));
        event.add_property(timed_property("DTEND", end, tz, tzid));
    } else {
        // All-day: date value, no DTEND
        event.add_property(
            Property::raw("DTSTART", op.operation_date.format("%Y%m%d").to_string())
                .with_param(Parameter::value_type("DATE")),
        );
    }

    event
}

fn timed_property(name: &str, local: chrono::NaiveDateTime, tz: Tz, tzid: &str) -> Property {
    if tz == Tz::UTC {
        Property::raw(name, local.format("%Y%m%dT%H%M%SZ").to_string())
    } else {
        Property::raw(name, local.format("%Y%m%dT%H%M%S").to_string())
            .with_param(Parameter::new("TZID", tzid))
    }
}

/// Builds the exported DESCRIPTION: the type line, the stored description
/// (when non-empty), and the status line, newline-joined.
fn synthesize_description(
    operation_type: OperationType,
    description: Option<&str>,
    status: OperationStatus,
) -> String {
    let mut parts = vec![format!("Type: {operation_type}")];
    if let Some(desc) = description
        && !desc.is_empty()
    {
        parts.push(desc.to_string());
    }
    parts.push(format!("Status: {status}"));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(title: &str, ty: OperationType) -> OperationView<'static> {
        OperationView {
            id: Uuid::nil(),
            title: Box::leak(title.to_string().into_boxed_str()),
            description: None,
            operation_date: NaiveDate::from_ymd_opt(2025, 8, 26).unwrap(),
            start_time: None,
            end_time: None,
            location: None,
            operation_type: ty,
            status: OperationStatus::Scheduled,
        }
    }

    #[test_log::test]
    fn all_day_export_has_date_value_and_no_dtend() {
        let ops = [op("Hull Inspection", OperationType::Inspection)];
        let text = operations_to_ical(&ops, "Ops", "UTC").unwrap();

        assert!(text.contains("SUMMARY:Hull Inspection\r\n"));
        assert!(text.contains("CATEGORIES:INSPECTION\r\n"));
        assert!(text.contains("DTSTART;VALUE=DATE:20250826\r\n"));
        assert!(!text.contains("DTEND"));
    }

    #[test_log::test]
    fn timed_export_defaults_end_to_one_hour() {
        let mut o = op("Morning dive", OperationType::Dive);
        o.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        let text = operations_to_ical(&[o], "Ops", "UTC").unwrap();

        assert!(text.contains("DTSTART:20250826T090000Z\r\n"));
        assert!(text.contains("DTEND:20250826T100000Z\r\n"));
    }

    #[test_log::test]
    fn timed_export_in_named_timezone_uses_tzid() {
        let mut o = op("Morning dive", OperationType::Dive);
        o.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        o.end_time = NaiveTime::from_hms_opt(11, 30, 0);
        let text = operations_to_ical(&[o], "Ops", "Europe/Oslo").unwrap();

        assert!(text.contains("DTSTART;TZID=Europe/Oslo:20250826T090000\r\n"));
        assert!(text.contains("DTEND;TZID=Europe/Oslo:20250826T113000\r\n"));
    }

    #[test_log::test]
    fn cancelled_status_is_marked() {
        let mut o = op("Scrubbed dive", OperationType::Dive);
        o.status = OperationStatus::Cancelled;
        let text = operations_to_ical(&[o], "Ops", "UTC").unwrap();

        assert!(text.contains("STATUS:CANCELLED\r\n"));
    }

    #[test_log::test]
    fn uid_and_url_carry_the_operation_id() {
        let ops = [op("Dive", OperationType::Dive)];
        let text = operations_to_ical(&ops, "Ops", "UTC").unwrap();

        let id = Uuid::nil().to_string();
        assert!(text.contains(&format!("UID:{id}\r\n")));
        assert!(text.contains(&format!("URL:operations://{id}\r\n")));
    }

    #[test_log::test]
    fn description_synthesis_wraps_stored_text() {
        assert_eq!(
            synthesize_description(
                OperationType::Dive,
                Some("Check umbilicals"),
                OperationStatus::InProgress
            ),
            "Type: DIVE\nCheck umbilicals\nStatus: IN_PROGRESS"
        );
        assert_eq!(
            synthesize_description(OperationType::Other, None, OperationStatus::Scheduled),
            "Type: OTHER\nStatus: SCHEDULED"
        );
    }

    #[test_log::test]
    fn unknown_timezone_fails_export() {
        let ops = [op("Dive", OperationType::Dive)];
        assert!(matches!(
            operations_to_ical(&ops, "Ops", "Atlantis/Lost"),
            Err(RfcError::UnknownTimezone(_))
        ));
    }

    #[test_log::test]
    fn calendar_metadata_is_present() {
        let text = operations_to_ical(&[], "Dive Ops", "UTC").unwrap();
        assert!(text.contains("X-WR-CALNAME:Dive Ops\r\n"));
        assert!(text.contains("X-WR-TIMEZONE:UTC\r\n"));
    }
}

//! iCalendar document parser (RFC 5545).
//!
//! Parses complete documents into a component tree. Property values are
//! kept raw; interpretation happens in the mapping layer so a single bad
//! value fails one event, not the whole document.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use crate::ical::core::{Component, ComponentKind, ICalendar, Property};

/// Parses an iCalendar document from a string.
///
/// ## Errors
///
/// Returns an error if the document structure is not valid iCalendar
/// (missing or mismatched BEGIN/END, no VCALENDAR wrapper, malformed
/// content lines).
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<ICalendar> {
    tracing::debug!("Parsing iCalendar document");

    let lines = split_lines(input);

    if lines.is_empty() {
        tracing::warn!("Empty iCalendar input");
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1, 1));
    }

    let content_lines: Vec<(usize, Property)> = lines
        .into_iter()
        .map(|(line_num, line)| parse_content_line(&line, line_num).map(|p| (line_num, p)))
        .collect::<ParseResult<_>>()?;

    tracing::trace!(count = content_lines.len(), "Parsed content lines");

    let mut iter = content_lines.into_iter().peekable();

    let Some((line_num, begin)) = iter.next() else {
        return Err(ParseError::new(ParseErrorKind::MissingBegin, 1, 1));
    };
    if begin.name != "BEGIN" {
        return Err(ParseError::new(ParseErrorKind::MissingBegin, line_num, 1));
    }
    let root_name = begin.raw_value.to_ascii_uppercase();
    let root = parse_component_body(&mut iter, line_num, &root_name)?;

    if root.kind != Some(ComponentKind::Calendar) {
        tracing::warn!(component = %root.name, "Root component is not VCALENDAR");
        return Err(
            ParseError::new(ParseErrorKind::MissingBegin, line_num, 1)
                .with_context("expected VCALENDAR"),
        );
    }

    if let Some((line_num, _)) = iter.next() {
        return Err(
            ParseError::new(ParseErrorKind::MismatchedComponent, line_num, 1)
                .with_context("content after END:VCALENDAR"),
        );
    }

    tracing::debug!("iCalendar document parsed successfully");

    Ok(ICalendar { root })
}

/// Parses a component body given that the BEGIN line is already consumed.
fn parse_component_body(
    iter: &mut std::iter::Peekable<impl Iterator<Item = (usize, Property)>>,
    begin_line_num: usize,
    component_name: &str,
) -> ParseResult<Component> {
    let mut component = Component {
        kind: Some(ComponentKind::parse(component_name)),
        name: component_name.to_string(),
        properties: Vec::new(),
        children: Vec::new(),
    };

    let mut last_line_num = begin_line_num;

    loop {
        let Some((line_num, property)) = iter.next() else {
            return Err(
                ParseError::new(ParseErrorKind::MissingEnd, last_line_num, 1)
                    .with_context(format!("missing END:{component_name}")),
            );
        };
        last_line_num = line_num;

        match property.name.as_str() {
            "BEGIN" => {
                let nested_name = property.raw_value.to_ascii_uppercase();
                let nested = parse_component_body(iter, line_num, &nested_name)?;
                component.children.push(nested);
            }
            "END" => {
                let end_name = property.raw_value.to_ascii_uppercase();
                if end_name != component_name {
                    return Err(
                        ParseError::new(ParseErrorKind::MismatchedComponent, line_num, 1)
                            .with_context(format!(
                                "expected END:{component_name}, got END:{end_name}"
                            )),
                    );
                }
                return Ok(component);
            }
            _ => component.properties.push(property),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_VEVENT: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:op-42\r\n\
DTSTAMP:20260123T120000Z\r\n\
DTSTART:20260123T140000Z\r\n\
DTEND:20260123T150000Z\r\n\
SUMMARY:Riser Inspection\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test_log::test]
    fn parse_simple_vevent() {
        let ical = parse(SIMPLE_VEVENT).unwrap();

        assert_eq!(ical.version().as_deref(), Some("2.0"));
        assert_eq!(ical.prodid().as_deref(), Some("-//Test//Test//EN"));

        let events = ical.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid().as_deref(), Some("op-42"));
        assert_eq!(events[0].summary().as_deref(), Some("Riser Inspection"));
    }

    #[test_log::test]
    fn parse_zero_events_is_valid() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
END:VCALENDAR\r\n";

        let ical = parse(input).unwrap();
        assert!(ical.events().is_empty());
    }

    #[test_log::test]
    fn parse_with_folded_summary() {
        // concat! keeps the continuation line's leading space intact
        let input = concat!(
            "BEGIN:VCALENDAR\r\n",
            "VERSION:2.0\r\n",
            "BEGIN:VEVENT\r\n",
            "UID:folded\r\n",
            "SUMMARY:This summary was folded across\r\n",
            "  multiple lines to stay under the octet limit\r\n",
            "END:VEVENT\r\n",
            "END:VCALENDAR\r\n",
        );

        let ical = parse(input).unwrap();
        let summary = ical.events()[0].summary().unwrap();
        assert_eq!(
            summary,
            "This summary was folded across multiple lines to stay under the octet limit"
        );
    }

    #[test_log::test]
    fn parse_with_escaped_text() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:escaped\r\n\
SUMMARY:Dive\\, stage one\r\n\
DESCRIPTION:Line 1\\nLine 2\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let ical = parse(input).unwrap();
        let event = &ical.events()[0];
        assert_eq!(event.summary().as_deref(), Some("Dive, stage one"));
        assert_eq!(event.description().as_deref(), Some("Line 1\nLine 2"));
    }

    #[test_log::test]
    fn parse_nested_alarm_is_kept_as_child() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:alarm\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT15M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let ical = parse(input).unwrap();
        let event = &ical.events()[0];
        assert_eq!(event.children_of_kind(ComponentKind::Alarm).len(), 1);
    }

    #[test_log::test]
    fn parse_missing_begin() {
        assert!(parse("VERSION:2.0\r\n").is_err());
    }

    #[test_log::test]
    fn parse_missing_end_is_fatal() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:x\r\n\
END:VEVENT\r\n";

        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingEnd);
    }

    #[test_log::test]
    fn parse_mismatched_end() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
END:VEVENT\r\n";

        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MismatchedComponent);
    }

    #[test_log::test]
    fn parse_non_calendar_root_is_rejected() {
        let input = "\
BEGIN:VEVENT\r\n\
UID:x\r\n\
END:VEVENT\r\n";

        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingBegin);
    }

    #[test_log::test]
    fn parse_preserves_x_properties() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
X-WR-CALNAME:Operations Calendar\r\n\
END:VCALENDAR\r\n";

        let ical = parse(input).unwrap();
        let prop = ical.root.get_property("X-WR-CALNAME").unwrap();
        assert_eq!(prop.raw_value, "Operations Calendar");
    }

    #[test_log::test]
    fn parse_bad_event_date_is_not_fatal() {
        // A syntactically valid content line with nonsense DTSTART parses;
        // the value is only rejected when the event is mapped.
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:bad-date\r\n\
DTSTART:not-a-date\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let ical = parse(input).unwrap();
        assert_eq!(ical.events().len(), 1);
    }
}

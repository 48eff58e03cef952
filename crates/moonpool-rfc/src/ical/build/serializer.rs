//! Document serialization (RFC 5545 §3.4).

use super::escape::escape_param_value;
use super::fold::fold_line;
use crate::ical::core::{Component, ICalendar, Property};

/// Serializes a complete iCalendar document with CRLF line endings.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    let mut out = String::new();
    serialize_component(&ical.root, &mut out);
    out
}

/// Serializes one component, recursing into children.
pub fn serialize_component(component: &Component, out: &mut String) {
    out.push_str("BEGIN:");
    out.push_str(&component.name);
    out.push_str("\r\n");

    for property in &component.properties {
        serialize_property(property, out);
    }

    for child in &component.children {
        serialize_component(child, out);
    }

    out.push_str("END:");
    out.push_str(&component.name);
    out.push_str("\r\n");
}

/// Serializes one property as a folded content line.
pub fn serialize_property(property: &Property, out: &mut String) {
    let mut line = property.name.clone();

    for param in &property.params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        let values: Vec<String> = param
            .values
            .iter()
            .map(|v| escape_param_value(v))
            .collect();
        line.push_str(&values.join(","));
    }

    line.push(':');
    line.push_str(&property.raw_value);

    out.push_str(&fold_line(&line));
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ical::core::Parameter;

    #[test]
    fn serialize_minimal_calendar() {
        let ical = ICalendar::new("-//Test//Test//EN");
        let text = serialize(&ical);

        assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(text.contains("VERSION:2.0\r\n"));
        assert!(text.contains("PRODID:-//Test//Test//EN\r\n"));
        assert!(text.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn serialize_property_with_params() {
        let prop = Property::raw("DTSTART", "20250826T090000")
            .with_param(Parameter::new("TZID", "Europe/Oslo"));
        let mut out = String::new();
        serialize_property(&prop, &mut out);

        assert_eq!(out, "DTSTART;TZID=Europe/Oslo:20250826T090000\r\n");
    }

    #[test]
    fn serialized_output_reparses() {
        let mut ical = ICalendar::default();
        let mut event = Component::event();
        event.add_property(Property::text("UID", "op-1"));
        event.add_property(Property::text("SUMMARY", "Deck check, pre-dive"));
        ical.add_event(event);

        let text = serialize(&ical);
        let parsed = crate::ical::parse::parse(&text).unwrap();

        assert_eq!(parsed.events().len(), 1);
        assert_eq!(
            parsed.events()[0].summary().as_deref(),
            Some("Deck check, pre-dive")
        );
    }
}

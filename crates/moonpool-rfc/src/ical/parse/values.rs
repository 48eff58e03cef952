//! Value parsers for iCalendar (RFC 5545 §3.3).
#![expect(
    clippy::map_err_ignore,
    reason = "Value parsers intentionally discard error sources; position info is enough"
)]

use chrono::{NaiveDate, NaiveTime};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::ical::core::{DateTimeForm, IcalDateTime};

/// Parses a DATE value (RFC 5545 §3.3.4).
///
/// Format: YYYYMMDD (e.g., "19970714")
///
/// ## Errors
/// Returns an error if the string is not a valid 8-digit calendar date.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorKind::InvalidDate, line, col));
    }

    let year = s[0..4]
        .parse::<i32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line, col))?;
    let month = s[4..6]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line, col))?;
    let day = s[6..8]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate, line, col))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDate, line, col))
}

/// Parses a TIME value (RFC 5545 §3.3.12).
///
/// Format: HHMMSS[Z] (e.g., "133000", "133000Z")
///
/// Returns the time and whether it carried the UTC designator.
///
/// ## Errors
/// Returns an error if the string is not a valid 6-digit time.
pub fn parse_time(s: &str, line: usize, col: usize) -> ParseResult<(NaiveTime, bool)> {
    let (time_str, is_utc) = s
        .strip_suffix('Z')
        .map_or((s, false), |stripped| (stripped, true));

    if time_str.len() != 6 || !time_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorKind::InvalidTime, line, col));
    }

    let hour = time_str[0..2]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidTime, line, col))?;
    let minute = time_str[2..4]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidTime, line, col))?;
    let second = time_str[4..6]
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidTime, line, col))?;

    // Clamp leap seconds rather than rejecting them
    let time = NaiveTime::from_hms_opt(hour, minute, second.min(59))
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidTime, line, col))?;

    Ok((time, is_utc))
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5).
///
/// Format: YYYYMMDD"T"HHMMSS[Z]. The TZID comes from the property
/// parameter, not the value itself.
///
/// ## Errors
/// Returns an error if the string is not a valid datetime.
pub fn parse_datetime(
    s: &str,
    tzid: Option<&str>,
    line: usize,
    col: usize,
) -> ParseResult<IcalDateTime> {
    let t_pos = s
        .find('T')
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidDateTime, line, col))?;

    let date = parse_date(&s[..t_pos], line, col)?;
    let (time, is_utc) = parse_time(&s[t_pos + 1..], line, col + t_pos + 1)?;

    let form = if is_utc {
        DateTimeForm::Utc
    } else if let Some(tz) = tzid {
        DateTimeForm::Zoned {
            tzid: tz.to_string(),
        }
    } else {
        DateTimeForm::Floating
    };

    Ok(IcalDateTime {
        naive: date.and_time(time),
        form,
    })
}

/// Unescapes TEXT values (RFC 5545 §3.3.11).
///
/// `\\` → `\`, `\;` → `;`, `\,` → `,`, `\n`/`\N` → newline.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n' | 'N') => result.push('\n'),
                Some(escaped @ ('\\' | ';' | ',')) => result.push(escaped),
                Some(other) => {
                    // Unknown escape: preserve as-is
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_valid() {
        let date = parse_date("20250826", 1, 1).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 26).unwrap());
    }

    #[test]
    fn parse_date_rejects_bad_input() {
        assert!(parse_date("2025-08-26", 1, 1).is_err());
        assert!(parse_date("20251332", 1, 1).is_err());
        assert!(parse_date("notadate", 1, 1).is_err());
    }

    #[test]
    fn parse_time_with_utc_marker() {
        let (time, is_utc) = parse_time("133000Z", 1, 1).unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(13, 30, 0).unwrap());
        assert!(is_utc);
    }

    #[test]
    fn parse_datetime_floating() {
        let dt = parse_datetime("20250826T090000", None, 1, 1).unwrap();
        assert_eq!(dt.form, DateTimeForm::Floating);
        assert_eq!(dt.naive.and_utc().to_rfc3339(), "2025-08-26T09:00:00+00:00");
    }

    #[test]
    fn parse_datetime_zoned() {
        let dt = parse_datetime("20250826T090000", Some("Europe/Oslo"), 1, 1).unwrap();
        assert_eq!(
            dt.form,
            DateTimeForm::Zoned {
                tzid: "Europe/Oslo".to_string()
            }
        );
    }

    #[test]
    fn parse_datetime_rejects_missing_t() {
        assert!(parse_datetime("20250826090000", None, 1, 1).is_err());
    }

    #[test]
    fn unescape_round_trip_characters() {
        assert_eq!(unescape_text("a\\,b\\;c\\nd\\\\e"), "a,b;c\nd\\e");
        assert_eq!(unescape_text("plain"), "plain");
        assert_eq!(unescape_text("trailing\\"), "trailing\\");
    }
}

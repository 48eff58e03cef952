//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::ical::core::{Parameter, Property};

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Lines starting with SP/HTAB
/// are continuations of the previous line; per RFC 5545 §3.1 unfolding
/// removes the line break and the single whitespace character.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
            } else {
                lines.push((i + 1, continuation.to_string()));
            }
        } else {
            lines.push((i + 1, line.to_string()));
        }
    }

    lines
}

/// Parses a single content line into a [`Property`].
///
/// Format: `name *(";" param) ":" value`
///
/// ## Errors
/// Returns an error if the line is malformed.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<Property> {
    let mut chars = line.char_indices().peekable();
    let mut name_end = 0;
    let mut saw_colon = false;

    // Property name ends at ';' or ':'
    while let Some(&(i, c)) = chars.peek() {
        if c == ';' || c == ':' {
            name_end = i;
            saw_colon = c == ':';
            chars.next();
            break;
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ParseError::new(
                ParseErrorKind::InvalidPropertyName,
                line_num,
                i + 1,
            ));
        }
        chars.next();
    }

    if name_end == 0 {
        return Err(ParseError::new(
            if line.is_empty() || line.starts_with(':') || line.starts_with(';') {
                ParseErrorKind::MissingPropertyName
            } else {
                ParseErrorKind::MissingColon
            },
            line_num,
            1,
        ));
    }

    let name = line[..name_end].to_ascii_uppercase();

    let mut params = Vec::new();
    while !saw_colon {
        let (param, next_is_colon) = parse_parameter(&mut chars, line, line_num)?;
        params.push(param);
        saw_colon = next_is_colon;
    }

    // Value is the remainder after the colon
    let value_start = chars.peek().map_or(line.len(), |&(i, _)| i);
    let value = &line[value_start..];

    Ok(Property {
        name,
        params,
        raw_value: value.to_string(),
    })
}

/// Parses one parameter from the character stream.
///
/// Returns the parameter and whether the terminating character was ':'.
fn parse_parameter(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<(Parameter, bool)> {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);

    // Parameter name runs up to '='
    let mut name_end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c == '=' {
            name_end = i;
            chars.next();
            break;
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(ParseError::new(
                ParseErrorKind::InvalidParameter,
                line_num,
                i + 1,
            ));
        }
        chars.next();
    }

    if name_end == start {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            start + 1,
        ));
    }

    let param_name = line[start..name_end].to_ascii_uppercase();

    // Comma-separated values, possibly quoted
    let mut values = Vec::new();
    loop {
        values.push(parse_param_value(chars, line, line_num)?);

        match chars.next() {
            Some((_, ',')) => {}
            Some((_, ';')) => {
                return Ok((Parameter::with_values(param_name, values), false));
            }
            Some((_, ':')) => {
                return Ok((Parameter::with_values(param_name, values), true));
            }
            Some((i, c)) => {
                return Err(
                    ParseError::new(ParseErrorKind::InvalidParameter, line_num, i + 1)
                        .with_context(format!("unexpected character '{c}'")),
                );
            }
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingColon,
                    line_num,
                    line.len(),
                ));
            }
        }
    }
}

/// Parses a parameter value (possibly quoted).
fn parse_param_value(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> ParseResult<String> {
    let Some(&(start, first)) = chars.peek() else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            line.len(),
        ));
    };

    if first == '"' {
        chars.next();
        let mut value = String::new();

        for (_i, c) in chars.by_ref() {
            if c == '"' {
                return Ok(value);
            }
            value.push(c);
        }

        Err(ParseError::new(
            ParseErrorKind::UnclosedQuote,
            line_num,
            start + 1,
        ))
    } else {
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c == ',' || c == ';' || c == ':' {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        Ok(line[start..end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_unfolds_continuations() {
        let input = "DESCRIPTION:This is a long description\r\n that continues here\r\nUID:x\r\n";
        let lines = split_lines(input);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].1,
            "DESCRIPTION:This is a long descriptionthat continues here"
        );
        assert_eq!(lines[1], (3, "UID:x".to_string()));
    }

    #[test]
    fn split_lines_handles_bare_lf() {
        let input = "SUMMARY:First\n Second\n";
        let lines = split_lines(input);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].1, "SUMMARY:FirstSecond");
    }

    #[test]
    fn parse_simple_line() {
        let prop = parse_content_line("SUMMARY:Hull Inspection", 1).unwrap();
        assert_eq!(prop.name, "SUMMARY");
        assert!(prop.params.is_empty());
        assert_eq!(prop.raw_value, "Hull Inspection");
    }

    #[test]
    fn parse_line_with_params() {
        let prop = parse_content_line("DTSTART;TZID=America/New_York:20260123T120000", 1).unwrap();
        assert_eq!(prop.name, "DTSTART");
        assert_eq!(prop.tzid(), Some("America/New_York"));
        assert_eq!(prop.raw_value, "20260123T120000");
    }

    #[test]
    fn parse_line_with_quoted_param() {
        let prop = parse_content_line("DTSTART;TZID=\"Europe/Oslo\":20260123T120000", 1).unwrap();
        assert_eq!(prop.tzid(), Some("Europe/Oslo"));
    }

    #[test]
    fn parse_line_with_multiple_param_values() {
        let prop = parse_content_line("CATEGORIES;X-ORDER=1,2:DIVE", 1).unwrap();
        assert_eq!(prop.params[0].values, vec!["1", "2"]);
        assert_eq!(prop.raw_value, "DIVE");
    }

    #[test]
    fn parse_line_unclosed_quote() {
        let err = parse_content_line("DTSTART;TZID=\"Unclosed:20260123T120000", 1).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedQuote);
    }

    #[test]
    fn parse_line_missing_colon() {
        assert!(parse_content_line("INVALID", 1).is_err());
    }

    #[test]
    fn parse_line_empty_value() {
        let prop = parse_content_line("DESCRIPTION:", 1).unwrap();
        assert_eq!(prop.raw_value, "");
    }
}

//! TEXT and parameter escaping (RFC 5545 §3.3.11, §3.2).

/// Escapes a TEXT value for the wire.
///
/// Backslash, semicolon, and comma are backslash-escaped; newlines become
/// the literal `\n` sequence.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }

    result
}

/// Escapes a parameter value, quoting when it contains reserved characters.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    if s.contains([':', ';', ',']) {
        let cleaned: String = s.chars().filter(|&c| c != '"').collect();
        format!("\"{cleaned}\"")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_special_characters() {
        assert_eq!(escape_text("a,b;c\nd\\e"), "a\\,b\\;c\\nd\\\\e");
        assert_eq!(escape_text("plain text"), "plain text");
    }

    #[test]
    fn escape_text_drops_carriage_returns() {
        assert_eq!(escape_text("line1\r\nline2"), "line1\\nline2");
    }

    #[test]
    fn escape_param_quotes_reserved() {
        assert_eq!(escape_param_value("Europe/Oslo"), "Europe/Oslo");
        assert_eq!(escape_param_value("a:b"), "\"a:b\"");
    }
}

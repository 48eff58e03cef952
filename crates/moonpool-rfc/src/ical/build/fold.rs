//! Content line folding (RFC 5545 §3.1).

/// Folds a content line at 75 octets, continuing with CRLF + single space.
///
/// Splits at UTF-8 character boundaries so multi-byte sequences are never
/// broken mid-character.
#[must_use]
pub fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;
    // Continuation lines lose one octet to the leading space
    const CONT_LIMIT: usize = 74;

    if line.len() <= LIMIT {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / LIMIT * 3);
    let mut remaining = line;
    let mut limit = LIMIT;

    while remaining.len() > limit {
        let mut split = limit;
        while !remaining.is_char_boundary(split) {
            split -= 1;
        }
        result.push_str(&remaining[..split]);
        result.push_str("\r\n ");
        remaining = &remaining[split..];
        limit = CONT_LIMIT;
    }
    result.push_str(remaining);

    result
}

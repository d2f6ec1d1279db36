//! JSON string-literal escaping.

/// Escapes special characters in a string for use inside a JSON string
/// literal.
///
/// The replacement table covers `\`, `"`, `/`, and the named control
/// characters; any other control character becomes an uppercase `\u00XX`
/// sequence. Everything else passes through unchanged, so escaping is not
/// idempotent: escaping already escaped text doubles its backslashes.
///
/// # Examples
///
/// ```
/// use jw_ser::escape;
///
/// assert_eq!(escape("a\"b"), "a\\\"b");
/// assert_eq!(escape(escape("\\").as_str()), "\\\\\\\\");
/// assert_eq!(escape(""), "");
/// ```
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() * 2);
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '/' => escaped.push_str("\\/"),
            '\u{08}' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\u{0C}' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            ch if ch < ' ' => {
                escaped.push_str(&format!("\\u{:04X}", u32::from(ch)));
            }
            ch => escaped.push(ch),
        }
    }
    escaped
}

//! Indentation and line-break bookkeeping for the writer.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use hashbrown::HashMap;

/// The platform line break, used between entries when formatting.
pub(crate) const LINE_BREAK: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Spaces per nesting level.
const INDENT_WIDTH: usize = 4;

// Depth -> indent string. Append-only; depths are bounded by the recursion
// depth of realistic inputs, so the table never needs eviction.
static INDENTS: LazyLock<RwLock<HashMap<usize, Arc<str>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Returns the cached indent string for `depth`.
pub(crate) fn indent(depth: usize) -> Arc<str> {
    {
        let table = INDENTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = table.get(&depth) {
            return Arc::clone(cached);
        }
    }

    let mut table = INDENTS.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(
        table
            .entry(depth)
            .or_insert_with(|| " ".repeat(depth * INDENT_WIDTH).into()),
    )
}

/// Whether a serialized fragment opens a nested structure.
///
/// Nested map/list fragments carry their own leading indentation; a parent
/// that detects one must not add a second indent prefix.
pub(crate) fn opens_set(fragment: &str) -> bool {
    matches!(
        fragment.trim_start_matches(' ').as_bytes().first(),
        Some(b'{' | b'[')
    )
}

#[cfg(test)]
mod tests {
    use super::{INDENT_WIDTH, indent, opens_set};

    #[test]
    fn indent_grows_four_spaces_per_level() {
        assert_eq!(indent(0).as_ref(), "");
        assert_eq!(indent(1).as_ref(), "    ");
        assert_eq!(indent(3).len(), 3 * INDENT_WIDTH);
    }

    #[test]
    fn indent_is_cached() {
        let first = indent(2);
        let second = indent(2);
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn set_opening_detection() {
        assert!(opens_set("{"));
        assert!(opens_set("    ["));
        assert!(opens_set("{ }"));
        assert!(!opens_set("\"{\""));
        assert!(!opens_set("null"));
        assert!(!opens_set(""));
    }
}

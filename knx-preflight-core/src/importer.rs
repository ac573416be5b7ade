//! Replicas of the importer's internal string handling.
//!
//! The Kaenx Creator importer parses identifiers with fixed substring
//! arithmetic and embeds order numbers in an escaped form of its own. The
//! rule checks only predict its behavior if these helpers reproduce that
//! handling bit-exactly, off-by-ones included; do not "correct" them.

/// Escape an order number the way the importer embeds it in catalog item
/// identifiers: hyphen, space, parentheses, plus, comma, slash and the
/// literal dot each become a `.`-prefixed hex pair.
///
/// The escape marker is itself a dot, so the dot substitution must only
/// ever apply to dots of the input, never to ones inserted by an earlier
/// substitution; mapping per character guarantees that.
///
/// # Examples
/// ```rust
/// use knx_preflight_core::importer::encoded;
///
/// assert_eq!(encoded("A-B.C"), "A.2DB.2EC");
/// assert_eq!(encoded(""), "");
/// ```
pub fn encoded(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '-' => out.push_str(".2D"),
            ' ' => out.push_str(".20"),
            '(' => out.push_str(".28"),
            ')' => out.push_str(".29"),
            '+' => out.push_str(".2B"),
            ',' => out.push_str(".2C"),
            '/' => out.push_str(".2F"),
            '.' => out.push_str(".2E"),
            other => out.push(other),
        }
    }
    out
}

/// The importer's `Substring(LastIndexOf('_') + 1 + offset)` convention.
///
/// Returns the tail of `id` starting `offset` characters past the last
/// `_`. With no `_` present the "last occurrence" sits one before the
/// start, so the tail begins at exactly `offset`. A start at or past the
/// end yields the empty string; emptiness is judged by the caller.
///
/// # Examples
/// ```rust
/// use knx_preflight_core::importer::last_split;
///
/// assert_eq!(last_split("GA_12_5", 0), "5");
/// assert_eq!(last_split("GA_12_5", 2), "");
/// assert_eq!(last_split("no-delimiter", 3), "delimiter");
/// ```
pub fn last_split(id: &str, offset: usize) -> &str {
    let after = match id.rfind('_') {
        Some(pos) => &id[pos + 1..],
        None => id,
    };
    match after.char_indices().nth(offset) {
        Some((idx, _)) => &after[idx..],
        None => "",
    }
}

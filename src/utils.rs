/// Returns at most the first `max_chars` characters of `s`.
///
/// Slices on a char boundary so multi-byte commit messages never panic.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

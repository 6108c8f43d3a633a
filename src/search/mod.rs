//! Literal substring search.
//!
//! Matching is exact and case-sensitive. An empty needle never matches, so
//! neither search nor replacement can produce a zero-width hit.

use std::borrow::Cow;
use std::ops::Range;

/// Byte range of the first occurrence of `needle` in `haystack`.
pub fn find_first(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .find(needle)
        .map(|start| start..start + needle.len())
}

/// Replace every non-overlapping occurrence of `needle`, scanning left to
/// right and resuming after each matched span.
///
/// Returns the substituted text and the number of replacements. The text is
/// borrowed unchanged when nothing matched.
pub fn replace_all<'a>(
    haystack: &'a str,
    needle: &str,
    replacement: &str,
) -> (Cow<'a, str>, usize) {
    if needle.is_empty() {
        return (Cow::Borrowed(haystack), 0);
    }

    let mut out = String::new();
    let mut last = 0;
    let mut count = 0;
    for (idx, matched) in haystack.match_indices(needle) {
        if count == 0 {
            out.reserve(haystack.len());
        }
        out.push_str(&haystack[last..idx]);
        out.push_str(replacement);
        last = idx + matched.len();
        count += 1;
    }

    if count == 0 {
        return (Cow::Borrowed(haystack), 0);
    }
    out.push_str(&haystack[last..]);
    (Cow::Owned(out), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_returns_byte_span() {
        assert_eq!(find_first("hello world", "world"), Some(6..11));
    }

    #[test]
    fn test_find_first_is_case_sensitive() {
        assert_eq!(find_first("Hello", "hello"), None);
    }

    #[test]
    fn test_find_first_empty_needle_never_matches() {
        assert_eq!(find_first("abc", ""), None);
        assert_eq!(find_first("", ""), None);
    }

    #[test]
    fn test_find_first_picks_leftmost() {
        assert_eq!(find_first("abab", "ab"), Some(0..2));
    }

    #[test]
    fn test_replace_all_counts_replacements() {
        let (text, count) = replace_all("foo bar foo baz foo", "foo", "qux");
        assert_eq!(count, 3);
        assert_eq!(text, "qux bar qux baz qux");
    }

    #[test]
    fn test_replace_all_skips_overlapping_candidates() {
        let (text, count) = replace_all("aaa", "aa", "b");
        assert_eq!(count, 1);
        assert_eq!(text, "ba");

        let (text, count) = replace_all("aaaa", "aa", "b");
        assert_eq!(count, 2);
        assert_eq!(text, "bb");
    }

    #[test]
    fn test_replace_all_does_not_rescan_replacement() {
        let (text, count) = replace_all("ab", "a", "aa");
        assert_eq!(count, 1);
        assert_eq!(text, "aab");
    }

    #[test]
    fn test_replace_all_empty_needle_is_noop() {
        let (text, count) = replace_all("abc", "", "x");
        assert_eq!(count, 0);
        assert!(matches!(text, Cow::Borrowed("abc")));
    }

    #[test]
    fn test_replace_all_without_match_borrows() {
        let (text, count) = replace_all("abc", "z", "x");
        assert_eq!(count, 0);
        assert!(matches!(text, Cow::Borrowed("abc")));
    }

    #[test]
    fn test_replace_all_multibyte() {
        let (text, count) = replace_all("你好 世界 世界", "世界", "World");
        assert_eq!(count, 2);
        assert_eq!(text, "你好 World World");
    }
}

//! Search for the markdown split that reproduces a stable HTML prefix.

use chatmark_renderer::MarkdownEngine;

/// Find the longest prefix of `unstable` whose lenient render is `candidate`.
///
/// Prefix lengths are tried from longest to shortest, one character at a
/// time, and only lengths greater than `min_len` are considered. Returns the
/// byte length of the matching prefix.
///
/// The search is linear on purpose: the rendered length is not monotonic in
/// the markdown length, so bisection would only approximate the split.
#[must_use]
pub fn find_stable_split(
    fast: &MarkdownEngine,
    unstable: &str,
    candidate: &str,
    min_len: usize,
) -> Option<usize> {
    if candidate.is_empty() {
        return None;
    }

    unstable
        .char_indices()
        .rev()
        .map(|(index, _)| index)
        .take_while(|&len| len > min_len)
        .find(|&len| fast.render_html(&unstable[..len]) == candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_longest_matching_prefix() {
        let fast = MarkdownEngine::fast();
        let unstable = "# Title\n\nSome ";
        assert_eq!(
            find_stable_split(&fast, unstable, "<h1>Title</h1>", 0),
            Some("# Title\n\n".len())
        );
    }

    #[test]
    fn test_whole_buffer_is_not_a_candidate() {
        let fast = MarkdownEngine::fast();
        assert_eq!(find_stable_split(&fast, "# Title", "<h1>Title</h1>", 0), None);
    }

    #[test]
    fn test_respects_minimum_length() {
        let fast = MarkdownEngine::fast();
        let unstable = "# Title\n\nSome ";
        assert_eq!(find_stable_split(&fast, unstable, "<h1>Title</h1>", 9), None);
        assert_eq!(find_stable_split(&fast, unstable, "<h1>Title</h1>", 8), Some(9));
    }

    #[test]
    fn test_empty_candidate() {
        let fast = MarkdownEngine::fast();
        assert_eq!(find_stable_split(&fast, "abc", "", 0), None);
    }

    #[test]
    fn test_no_match() {
        let fast = MarkdownEngine::fast();
        assert_eq!(find_stable_split(&fast, "para\n\nmore", "<p>other</p>", 0), None);
    }

    #[test]
    fn test_multibyte_prefix_on_char_boundary() {
        let fast = MarkdownEngine::fast();
        let unstable = "héllo wörld\n\nnext";
        let len = find_stable_split(&fast, unstable, "<p>héllo wörld</p>", 0).unwrap();
        assert!(unstable.is_char_boundary(len));
        assert!(unstable[..len].starts_with("héllo wörld"));
    }
}

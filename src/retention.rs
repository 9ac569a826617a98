/// Number of leading positions in an ordered tag list that can never be
/// deleted.
pub const PROTECTED_TAGS: usize = 3;

/// Position-based check for callers that already know the ordinal (e.g. a
/// rendering loop).
pub fn is_protected_at(index: usize) -> bool {
    index < PROTECTED_TAGS
}

/// Whether `tag` is protected given the ordered tag list it belongs to.
///
/// A tag that is not in the list should not occur; it is logged and treated
/// as unprotected.
pub fn is_protected(ordered: &[String], tag: &str) -> bool {
    match ordered.iter().position(|t| t == tag) {
        Some(index) => is_protected_at(index),
        None => {
            eprintln!(
                "[WARN] Tag '{}' not found in ordered list; treating as unprotected",
                tag
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_three_positions_protected() {
        assert!(is_protected_at(0));
        assert!(is_protected_at(1));
        assert!(is_protected_at(2));
        assert!(!is_protected_at(3));
        assert!(!is_protected_at(100));
    }

    #[test]
    fn test_lookup_agrees_with_position_check() {
        let ordered = tags(&["latest", "v1.2", "v1.1", "v1.0", "v0.9"]);
        for (i, tag) in ordered.iter().enumerate() {
            assert_eq!(is_protected(&ordered, tag), is_protected_at(i));
        }
    }

    #[test]
    fn test_missing_tag_is_unprotected() {
        let ordered = tags(&["latest", "v1.2", "v1.1"]);
        assert!(!is_protected(&ordered, "v0.0"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        // Duplicate tag: the first occurrence's position decides
        let ordered = tags(&["a", "b", "c", "a"]);
        assert!(is_protected(&ordered, "a"));
    }
}

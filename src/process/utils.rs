// src/process/utils.rs

/// Collapse every whitespace run (NBSP included) to one space and trim.
pub fn normalize_ws(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a `(...)` annotation (greedy, first `(` to last `)`) and every
/// bracketed citation or note marker such as `[12]` or `[a]`, then trim.
pub fn strip_annotations(raw: &str) -> String {
    let without_parens = regex!(r"\(.*\)").replace_all(raw, "");
    let without_refs = regex!(r"\[\w+\]").replace_all(&without_parens, "");
    normalize_ws(&without_refs)
}

/// The first maximal run of ASCII digits in `raw`, if any.
pub fn first_digits(raw: &str) -> Option<&str> {
    regex!(r"[0-9]+").find(raw).map(|m| m.as_str())
}

/// A cell that carries no value at all.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  Bobby\n   Darin\u{a0}& Co "), "Bobby Darin & Co");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn test_strip_annotations() {
        assert_eq!(strip_annotations("January 6 (2024)[1]"), "January 6");
        assert_eq!(strip_annotations("March 3[a] "), "March 3");
        assert_eq!(strip_annotations("(re-entry) May 1 (x)"), "");
        assert_eq!(strip_annotations("June 9"), "June 9");
    }

    #[test]
    fn test_first_digits() {
        assert_eq!(first_digits("5 weeks"), Some("5"));
        assert_eq!(first_digits("12[3]"), Some("12"));
        assert_eq!(first_digits("(peak) 10 / 7"), Some("10"));
        assert_eq!(first_digits("—"), None);
        assert_eq!(first_digits("٣ weeks"), None);
    }
}

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static REF_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[comment\]: <> \(.*?\)").unwrap());
static HTML_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Remove `[comment]: <> (...)` and `<!-- ... -->` so template text left in
/// comments never reaches extraction.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    match REF_COMMENT_RE.replace_all(text, "") {
        Cow::Borrowed(t) => HTML_COMMENT_RE.replace_all(t, ""),
        Cow::Owned(t) => Cow::Owned(HTML_COMMENT_RE.replace_all(&t, "").into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_comment() {
        let out = strip_comments("a [comment]: <> (Owner Name <id>) b");
        assert_eq!(out, "a  b");
    }

    #[test]
    fn reference_comment_case_insensitive() {
        let out = strip_comments("[COMMENT]: <> (hidden)visible");
        assert_eq!(out, "visible");
    }

    #[test]
    fn reference_comment_non_greedy() {
        let out = strip_comments("[comment]: <> (one) keep (this)");
        assert_eq!(out, " keep (this)");
    }

    #[test]
    fn html_comment_multiline() {
        let out = strip_comments("before\n<!--\n- Jane Doe <jdoe>\n-->\nafter<!-- x -->");
        assert_eq!(out, "before\n\nafter");
    }

    #[test]
    fn untouched_text_is_borrowed() {
        let out = strip_comments("## Heading\nplain");
        assert!(matches!(out, Cow::Borrowed(_)));
    }
}

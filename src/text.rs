// =============================================================================
// Post-body sanitization
// =============================================================================
//
// Social posts come back with markdown link syntax and bare URLs embedded in
// free text. Both are stripped before the text is forwarded to the client:
// `[text](url)` collapses to just `text`, and bare `http(s)://...` URLs are
// removed outright. Cleaning is idempotent — running it twice is a no-op.
// =============================================================================

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Markdown-style link: `[text](url)`.
    static ref MARKDOWN_LINK: Regex =
        Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid markdown link pattern");
    /// Bare URL up to the next whitespace.
    static ref BARE_URL: Regex = Regex::new(r"https?://\S+").expect("valid URL pattern");
}

/// Strip markdown link syntax and bare URLs from post text.
///
/// Markdown links are replaced by their link text; bare URLs are removed
/// without touching the surrounding whitespace, so `"check http://x.com now"`
/// becomes `"check  now"`.
pub fn clean_post_text(text: &str) -> String {
    let without_links = MARKDOWN_LINK.replace_all(text, "$1");
    BARE_URL.replace_all(&without_links, "").into_owned()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_link_collapses_to_text() {
        assert_eq!(clean_post_text("[site](http://x.com) great"), "site great");
    }

    #[test]
    fn bare_url_removed() {
        assert_eq!(clean_post_text("check http://x.com now"), "check  now");
        assert_eq!(clean_post_text("see https://example.com/path?q=1"), "see ");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean_post_text("[site](http://x.com) great, see http://y.com too");
        let twice = clean_post_text(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(clean_post_text("no links here"), "no links here");
        assert_eq!(clean_post_text(""), "");
    }

    #[test]
    fn multiple_links_in_one_body() {
        assert_eq!(
            clean_post_text("[a](http://1.com) and [b](http://2.com)"),
            "a and b"
        );
    }

    #[test]
    fn brackets_without_url_untouched() {
        assert_eq!(clean_post_text("array[0] stays"), "array[0] stays");
    }
}

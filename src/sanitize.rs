//! HTML Sanitizer
//!
//! Untrusted `html_content` is passed through an allow-list sanitizer before
//! it is embedded in a page. Scripts, inline event handlers and
//! `javascript:` URLs never survive; plain formatting markup does.

use ammonia::Builder;

use crate::config::SanitizerConfig;

/// Tags whose content ammonia always drops; they cannot be allow-listed
const CONTENT_STRIPPED_TAGS: [&str; 2] = ["script", "style"];

/// Turns untrusted HTML into HTML that is safe to display
pub trait Sanitize: Send + Sync {
    fn sanitize(&self, raw: &str) -> String;
}

/// Allow-list sanitizer backed by ammonia
#[derive(Debug, Clone)]
pub struct HtmlSanitizer {
    extra_tags: Vec<String>,
    link_rel: Option<String>,
    strip_comments: bool,
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::from_config(&SanitizerConfig::default())
    }
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SanitizerConfig) -> Self {
        let extra_tags = config
            .extra_tags
            .iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty() && !CONTENT_STRIPPED_TAGS.contains(&t.as_str()))
            .collect();

        Self {
            extra_tags,
            link_rel: config.link_rel.clone(),
            strip_comments: config.strip_comments,
        }
    }

    fn builder(&self) -> Builder<'_> {
        let mut builder = Builder::default();
        builder
            .add_tags(self.extra_tags.iter().map(String::as_str))
            .link_rel(self.link_rel.as_deref())
            .strip_comments(self.strip_comments);
        builder
    }
}

impl Sanitize for HtmlSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        self.builder().clean(raw).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_event_handlers() {
        let out = HtmlSanitizer::new().sanitize("<img src=x onerror=alert(1)>");
        assert!(!out.contains("onerror"));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn test_removes_script_with_content() {
        let out = HtmlSanitizer::new().sanitize("<p>Hello</p><script>steal()</script>");
        assert_eq!(out, "<p>Hello</p>");
    }

    #[test]
    fn test_drops_javascript_urls() {
        let out = HtmlSanitizer::new().sanitize(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.contains("javascript:"));
        assert!(out.contains(">x</a>"));
    }

    #[test]
    fn test_keeps_formatting_and_sets_link_rel() {
        let out = HtmlSanitizer::new()
            .sanitize(r#"<h2>Summary</h2><p><strong>Up</strong> 4%</p><a href="https://example.com">more</a>"#);
        assert!(out.contains("<h2>Summary</h2>"));
        assert!(out.contains("<strong>Up</strong>"));
        assert!(out.contains(r#"rel="noopener noreferrer""#));
    }

    #[test]
    fn test_idempotent() {
        let s = HtmlSanitizer::new();
        let inputs = [
            "<p>plain</p>",
            "<div onclick=\"x()\"><b>bold</b><script>bad()</script></div>",
            "<table><tr><td>1</td></tr></table><!-- note -->",
        ];
        for input in inputs {
            let once = s.sanitize(input);
            assert_eq!(s.sanitize(&once), once);
        }
    }

    #[test]
    fn test_extra_tags_allowed_but_script_never() {
        let config = SanitizerConfig {
            extra_tags: vec!["marquee".to_string(), "SCRIPT".to_string()],
            ..Default::default()
        };
        let s = HtmlSanitizer::from_config(&config);
        assert_eq!(s.sanitize("<marquee>hi</marquee>"), "<marquee>hi</marquee>");
        assert_eq!(s.sanitize("<script>x</script>"), "");
    }

    #[test]
    fn test_comments_stripped_by_default() {
        assert_eq!(HtmlSanitizer::new().sanitize("<p>a<!-- b --></p>"), "<p>a</p>");
    }
}

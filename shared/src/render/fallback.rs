//! Error image returned in place of a heatmap.

use super::escape_xml;
use crate::Error;

/// Minimal SVG describing `error`, so an embedded image never shows as broken.
pub fn fallback_document(error: &Error) -> String {
    format!(
        r#"<svg width="400" height="100" viewBox="0 0 400 100" xmlns="http://www.w3.org/2000/svg">
  <text x="10" y="20" fill="red" font-family="monospace">Heatmap Error</text>
  <text x="10" y="40" fill="red" font-family="monospace">{}</text>
</svg>"#,
        escape_xml(&error.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_two_red_texts() {
        let svg = fallback_document(&Error::Source("connection reset".into()));

        assert_eq!(svg.matches(r#"fill="red""#).count(), 2);
        assert!(svg.contains(">Heatmap Error</text>"));
        assert!(svg.contains(">Record source unavailable: connection reset</text>"));
    }

    #[test]
    fn test_fallback_escapes_message() {
        let svg = fallback_document(&Error::Source("<html> & friends".into()));

        assert!(svg.contains("&lt;html&gt; &amp; friends"));
        assert!(!svg.contains("<html>"));
    }
}

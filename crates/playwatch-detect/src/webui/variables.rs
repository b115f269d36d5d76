use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::MalformedResponse;

/// `<p id="name">value<`, name lowercase ASCII letters only.
///
/// This is not an HTML parser. The page is a small fixed fragment and only
/// this exact shape is recognized; nested markup inside a value ends it.
static RE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)<p id="([a-z]+)">(.*?)<"#).unwrap());

/// Variables scraped from one `variables.html` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVariableSet {
    vars: HashMap<String, String>,
}

impl RawVariableSet {
    /// Collect every variable in document order; a repeated name keeps the
    /// last value.
    pub fn extract(text: &str) -> Self {
        let vars = RE_VARIABLE
            .captures_iter(text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect();
        Self { vars }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing key is a malformed response.
    pub fn require(&self, key: &str) -> Result<&str, MalformedResponse> {
        self.get(key).ok_or_else(|| MalformedResponse::missing(key))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawVariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>MPC-HC WebServer - Variables</title></head>
<body class="page-variables">
<p id="file">movie.mkv</p>
<p id="filepatharg">C:%5cmovie.mkv</p>
<p id="filepath">C:\movie.mkv</p>
<p id="state">2</p>
<p id="statestring">Playing</p>
<p id="position">15000</p>
<p id="positionstring">00:00:15</p>
<p id="duration">60000</p>
<p id="durationstring">00:01:00</p>
<p id="volumelevel">100</p>
</body>
</html>"#;

    #[test]
    fn test_extract_page() {
        let vars = RawVariableSet::extract(PAGE);
        assert_eq!(vars.len(), 10);
        assert_eq!(vars.get("filepath"), Some(r"C:\movie.mkv"));
        assert_eq!(vars.get("state"), Some("2"));
        assert_eq!(vars.get("durationstring"), Some("00:01:00"));
        assert_eq!(vars.get("missing"), None);
    }

    #[test]
    fn test_extract_is_idempotent() {
        assert_eq!(RawVariableSet::extract(PAGE), RawVariableSet::extract(PAGE));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let vars = RawVariableSet::extract(r#"<p id="state">1</p><p id="state">2</p>"#);
        assert_eq!(vars.get("state"), Some("2"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_empty_value() {
        let vars = RawVariableSet::extract(r#"<p id="filepath"></p>"#);
        assert_eq!(vars.get("filepath"), Some(""));
    }

    #[test]
    fn test_only_lowercase_names() {
        let vars = RawVariableSet::extract(
            r#"<p id="State">2</p><p id="file_path">x</p><p id="pos1">3</p>"#,
        );
        assert!(vars.is_empty());
    }

    #[test]
    fn test_tag_shape_is_exact() {
        // Extra attributes, single quotes and other tags are not recognized.
        let vars = RawVariableSet::extract(
            r#"<p class="x" id="state">2</p><p id='state'>2</p><div id="state">2</div><P id="state">2</P>"#,
        );
        assert!(vars.is_empty());
    }

    #[test]
    fn test_nested_markup_truncates_value() {
        let vars = RawVariableSet::extract(r#"<p id="file"><b>bold</b></p>"#);
        assert_eq!(vars.get("file"), Some(""));
    }

    #[test]
    fn test_value_does_not_span_lines() {
        let vars = RawVariableSet::extract("<p id=\"file\">first\nsecond</p>");
        assert!(vars.get("file").is_none());
    }

    #[test]
    fn test_require_missing() {
        let vars = RawVariableSet::extract(PAGE);
        let err = vars.require("nope").unwrap_err();
        assert_eq!(err.key, "nope");
    }
}

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::{debug, warn};

use super::RawResponse;

/// `<meta ... charset=X>` with X quoted or bare.
static RE_META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<\s*meta\s+[^>]*charset\s*=\s*(?:['"]([^'"]+)['"]|([^\s'">/;]+))\s*[^>]*>"#)
        .unwrap()
});

static RE_HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^\s"';]+)"#).unwrap());

/// A charset a page may be decoded with.
///
/// `ISO-8859-1` is kept apart from `encoding_rs`, which maps it to
/// windows-1252 and so changes bytes 0x80-0x9F.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Latin1,
    Other(&'static Encoding),
}

impl Charset {
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if LATIN1_LABELS.contains(&label.as_str()) {
            return Some(Self::Latin1);
        }
        Encoding::for_label(label.as_bytes()).map(Self::Other)
    }

    fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Other(encoding) => encoding.decode(bytes).0.into_owned(),
        }
    }
}

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso-ir-100",
    "latin1",
    "latin-1",
    "l1",
    "cp819",
    "ibm819",
];

/// Decode a response body to text.
///
/// The body is first decoded with the default charset: the `Content-Type`
/// charset if given, Latin-1 for a `text/*` type without one, UTF-8 when
/// there is no `Content-Type` at all. If that text declares a charset in a
/// `<meta>` tag, the raw bytes are decoded again with it.
pub fn decode(response: &RawResponse) -> String {
    let fallback = default_charset(response.content_type.as_deref());
    let text = fallback.decode(&response.body);

    let Some(label) = meta_charset(&text) else {
        return text;
    };

    match Charset::from_label(label) {
        Some(charset) if charset == fallback => text,
        Some(charset) => {
            debug!(charset = %label, "Re-decoding with declared charset");
            charset.decode(&response.body)
        }
        None => {
            warn!(charset = %label, "Unknown charset declared, keeping default decoding");
            text
        }
    }
}

/// The first `<meta>` charset declaration in `text`.
pub fn meta_charset(text: &str) -> Option<&str> {
    let caps = RE_META_CHARSET.captures(text)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

fn default_charset(content_type: Option<&str>) -> Charset {
    let Some(content_type) = content_type else {
        return Charset::Other(UTF_8);
    };
    if let Some(charset) = RE_HEADER_CHARSET
        .captures(content_type)
        .and_then(|caps| Charset::from_label(&caps[1]))
    {
        return charset;
    }
    if content_type.trim().to_ascii_lowercase().starts_with("text/") {
        Charset::Latin1
    } else {
        Charset::Other(UTF_8)
    }
}

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use scraper::node::Node;
use scraper::{Html, Selector};

use pagewatch_core::Snapshot;

/// Elements whose text is never visible on a rendered page.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode a raw response body into UTF-8 using: BOM -> Content-Type
/// charset -> chardetng fallback.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<String, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(charset_label) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        // Encoding labels are matched case-insensitively downstream.
        part.trim()
            .to_ascii_lowercase()
            .strip_prefix("charset=")
            .map(|value| value.trim_matches(&[' ', '"', '\''][..]).to_string())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

/// Reduce an HTML document to its title and whitespace-normalized
/// visible text.
///
/// Each visible text node becomes one line with internal whitespace
/// collapsed; blank nodes are dropped. The title may be empty when the
/// document carries none.
pub fn extract_snapshot(html: &str) -> Snapshot {
    let doc = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .map(|node| node.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut lines: Vec<String> = Vec::new();
    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    Snapshot {
        content: lines.join("\n"),
        title,
    }
}

//! Parsing of the `Accept` header into a ranked list of media ranges.
//!
//! The entries are parsed with `hyperx`. The ranking follows the usual
//! content negotiation rules: entries are ordered by their quality value
//! (`q`, defaults to `1`), then by their specificity, and finally by their
//! position in the header. Entries with `q=0` are not acceptable and are
//! dropped. Entries which cannot be parsed are skipped rather than rejected.

use http::header::{self, HeaderMap};
use hyperx::header::{q, Quality, QualityItem};
use mime::{self, Mime};

/// An entry of the `Accept` header with its quality value.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    mime: Mime,
    quality: Quality,
}

impl MediaRange {
    /// Returns the media range of this entry.
    pub fn mime(&self) -> &Mime {
        &self.mime
    }

    /// Returns the quality value of this entry.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Returns `true` if this entry is exactly `type/subtype`.
    pub fn is(&self, type_: &str, subtype: &str) -> bool {
        self.mime.type_() == type_ && self.mime.subtype() == subtype
    }

    fn specificity(&self) -> usize {
        if self.mime.type_() == mime::STAR {
            0
        } else if self.mime.subtype() == mime::STAR {
            1
        } else {
            2 + self.mime.params().count()
        }
    }
}

impl From<QualityItem<Mime>> for MediaRange {
    fn from(item: QualityItem<Mime>) -> MediaRange {
        MediaRange {
            mime: item.item,
            quality: item.quality,
        }
    }
}

/// Parses all `Accept` header values in the map into ranked media ranges.
///
/// A missing header is equivalent to `*/*`.
pub fn media_ranges(headers: &HeaderMap) -> Vec<MediaRange> {
    let mut values = headers.get_all(header::ACCEPT).iter().peekable();
    if values.peek().is_none() {
        return vec![MediaRange {
            mime: mime::STAR_STAR,
            quality: Quality::default(),
        }];
    }

    let mut ranges: Vec<MediaRange> = values
        .filter_map(|value| value.to_str().ok())
        .flat_map(split_elements)
        .filter_map(parse_media_range)
        .filter(|range| range.quality != q(0u16))
        .collect();

    // `sort_by` is stable, so ties keep the order of the header.
    ranges.sort_by(|a, b| {
        b.quality
            .cmp(&a.quality)
            .then_with(|| b.specificity().cmp(&a.specificity()))
    });
    ranges
}

/// Splits a header value at the commas outside of quoted strings.
fn split_elements(value: &str) -> Vec<&str> {
    let mut elements = vec![];
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                elements.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    elements.push(&value[start..]);
    elements
}

fn parse_media_range(element: &str) -> Option<MediaRange> {
    let element = element.trim();
    if element.is_empty() {
        return None;
    }
    match element.parse::<QualityItem<Mime>>() {
        Ok(item) => Some(MediaRange::from(item)),
        Err(..) => {
            trace!("skip a malformed media range: {:?}", element);
            None
        }
    }
}

/// Returns the first entry among the ranked media ranges in the header which
/// is one of the specified `(type, subtype)` candidates.
pub fn preferred<'c>(headers: &HeaderMap, candidates: &[(&'c str, &'c str)]) -> Option<(&'c str, &'c str)> {
    media_ranges(headers).iter().find_map(|range| {
        candidates
            .iter()
            .find(|&&(type_, subtype)| range.is(type_, subtype))
            .cloned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    fn essences(headers: &HeaderMap) -> Vec<String> {
        media_ranges(headers)
            .iter()
            .map(|range| format!("{}/{}", range.mime().type_(), range.mime().subtype()))
            .collect()
    }

    const CANDIDATES: &[(&str, &str)] = &[("text", "html"), ("application", "json")];

    #[test]
    fn missing_header_accepts_anything() {
        assert_eq!(essences(&HeaderMap::new()), vec!["*/*"]);
        assert_eq!(preferred(&HeaderMap::new(), CANDIDATES), None);
    }

    #[test]
    fn browser_prefers_html() {
        let headers = accept(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        );
        assert_eq!(preferred(&headers, CANDIDATES), Some(("text", "html")));
    }

    #[test]
    fn ranks_by_quality() {
        let headers = accept("text/html;q=0.5, application/json");
        assert_eq!(essences(&headers), vec!["application/json", "text/html"]);
        assert_eq!(preferred(&headers, CANDIDATES), Some(("application", "json")));
    }

    #[test]
    fn ranks_by_specificity_on_ties() {
        let headers = accept("*/*, text/*, text/html");
        assert_eq!(essences(&headers), vec!["text/html", "text/*", "*/*"]);
    }

    #[test]
    fn keeps_header_order_on_full_ties() {
        let headers = accept("application/json, text/html");
        assert_eq!(preferred(&headers, CANDIDATES), Some(("application", "json")));
    }

    #[test]
    fn drops_unacceptable_entries() {
        let headers = accept("text/html;q=0, application/json;q=0.1");
        assert_eq!(essences(&headers), vec!["application/json"]);
    }

    #[test]
    fn skips_malformed_entries() {
        let headers = accept("garbage, text/html;q=abc, ,application/json");
        assert_eq!(essences(&headers), vec!["application/json"]);
    }

    #[test]
    fn commas_inside_quoted_parameters() {
        let headers = accept("application/json;profile=\"a,b\", text/html;q=0.5");
        assert_eq!(essences(&headers), vec!["application/json", "text/html"]);
        assert_eq!(preferred(&headers, CANDIDATES), Some(("application", "json")));
    }

    #[test]
    fn splits_elements_outside_quotes() {
        assert_eq!(
            split_elements(r#"a/b;x="1,\"2", c/d"#),
            vec![r#"a/b;x="1,\"2""#, " c/d"]
        );
    }

    #[test]
    fn merges_multiple_header_values() {
        let mut headers = HeaderMap::new();
        headers.append(header::ACCEPT, HeaderValue::from_static("image/png"));
        headers.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert_eq!(preferred(&headers, CANDIDATES), Some(("text", "html")));
    }
}

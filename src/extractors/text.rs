//! Text cleanup and section slicing shared by every extractor
//!
//! SAFER renders values inside inconsistent markup (`<FONT>`, anchors,
//! `&nbsp;` padding, stray comments), so every captured fragment goes
//! through [`clean_text`] before it reaches a record.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Placeholder SAFER prints for "not applicable"
pub const PLACEHOLDER: &str = "--";

/// Strip comments and tags, decode common entities, collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(s, " ");
    let without_tags = TAG_RE.replace_all(&without_comments, " ");
    normalize_ws(&decode_entities(&without_tags))
}

/// Minimal entity decoding for what SAFER actually emits.
///
/// `&amp;` goes last so `&amp;nbsp;` stays literal text.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&NBSP;", " ")
        .replace('\u{a0}', " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Collapse whitespace runs into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Empty out SAFER's "not applicable" markers.
pub fn drop_placeholder(value: String) -> String {
    if value == PLACEHOLDER {
        String::new()
    } else {
        value
    }
}

/// ASCII case-insensitive `find`, starting at byte offset `from`.
///
/// Lowercasing only ASCII keeps byte offsets aligned with the original.
pub fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.get(from..)?.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    hay.find(&needle).map(|pos| pos + from)
}

/// Slice of `html` after the first `start` marker, up to the earliest `ends`
/// boundary found after it (or the end of the document).
pub fn section<'a>(html: &'a str, start: &str, ends: &[&str]) -> Option<&'a str> {
    let begin = find_ci(html, start, 0)? + start.len();
    let end = ends
        .iter()
        .filter_map(|marker| find_ci(html, marker, begin))
        .min()
        .unwrap_or(html.len());
    html.get(begin..end)
}

/// Parse an unsigned count, ignoring thousands separators and noise.
pub fn parse_count(s: &str) -> u32 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Parse a percentage like `"33.3%"` into `0.0..=100.0`.
pub fn parse_rate(s: &str) -> f64 {
    let numeric: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match numeric.parse::<f64>() {
        Ok(v) if v.is_finite() => v.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        let raw = "  <FONT style=\"font-size:80%\">ACME&nbsp;&amp;&nbsp;SONS</FONT> <!-- legacy -->\n  LLC ";
        assert_eq!(clean_text(raw), "ACME & SONS LLC");
    }

    #[test]
    fn test_clean_text_keeps_words_apart_across_tags() {
        assert_eq!(clean_text("123 MAIN ST<br>SPRINGFIELD"), "123 MAIN ST SPRINGFIELD");
        assert_eq!(clean_text("O&#39;Hare"), "O'Hare");
    }

    #[test]
    fn test_section_bounds() {
        let html = "<p>Intro</p>Carrier Operation: <td>X</td> Cargo Carried: <td>Y</td>";
        let s = section(html, "carrier operation:", &["Cargo Carried:"]).unwrap();
        assert_eq!(s, " <td>X</td> ");

        let tail = section(html, "Cargo Carried:", &["Missing marker"]).unwrap();
        assert_eq!(tail, " <td>Y</td>");

        assert!(section(html, "Inspection Type", &[]).is_none());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_count("1,204"), 1204);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count("-3"), 3);
        assert_eq!(parse_rate("33.3%"), 33.3);
        assert_eq!(parse_rate(""), 0.0);
        assert_eq!(parse_rate("250%"), 100.0);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(drop_placeholder("--".to_string()), "");
        assert_eq!(drop_placeholder("None".to_string()), "None");
    }
}

//! Label/value lookup over SAFER's two-column snapshot tables
//!
//! The snapshot page has no semantic markup: a field is a `<TH>` label cell
//! followed by a `<TD>` value cell. Layout varies between anchor-wrapped and
//! plain labels, so lookups go through an ordered pattern table and the first
//! usable value wins. When SAFER changes its markup, only [`LABEL_PATTERNS`]
//! should need updating.

use regex::Regex;

use super::text::{clean_text, PLACEHOLDER};

/// Ordered label patterns. `{label}` is replaced by the escaped label text.
///
/// Labels must open their cell (`>` before them) so `Drivers` does not match
/// inside `Total Drivers`.
pub const LABEL_PATTERNS: &[&str] = &[
    // <TH><A ...>Legal Name:</A></TH> <TD ...>value</TD>
    r"(?is)>\s*{label}\s*:?\s*</a>\s*</th>\s*<td[^>]*>(.*?)</td>",
    // <TH ...>Legal Name:</TH> <TD ...>value</TD>
    r"(?is)>\s*{label}\s*:?\s*</th>\s*<td[^>]*>(.*?)</td>",
    // anything closing after the label, then a queryfield cell
    r#"(?is)>\s*{label}\s*:?(?:\s*</[^>]+>)*\s*<td[^>]*class\s*=\s*["']?queryfield["']?[^>]*>(.*?)</td>"#,
];

/// Looks up labelled values on one snapshot page (or a slice of it).
#[derive(Debug, Clone, Copy)]
pub struct LabelExtractor<'a> {
    html: &'a str,
}

impl<'a> LabelExtractor<'a> {
    pub fn new(html: &'a str) -> Self {
        Self { html }
    }

    /// Value cell next to `label`, cleaned; empty when absent or `--`.
    pub fn lookup(&self, label: &str) -> String {
        LABEL_PATTERNS
            .iter()
            .filter_map(|pattern| self.try_pattern(pattern, label))
            .find(|value| !value.is_empty() && value != PLACEHOLDER)
            .unwrap_or_default()
    }

    /// First non-empty value among several labels for the same concept.
    pub fn lookup_first(&self, labels: &[&str]) -> String {
        labels
            .iter()
            .map(|label| self.lookup(label))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    }

    fn try_pattern(&self, pattern: &str, label: &str) -> Option<String> {
        let re = Regex::new(&pattern.replace("{label}", &regex::escape(label))).ok()?;
        re.captures(self.html)
            .and_then(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
    }
}

/// Convenience wrapper for one-off lookups.
pub fn extract_label(html: &str, label: &str) -> String {
    LabelExtractor::new(html).lookup(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_wrapped_label() {
        let html = r#"
        <TR>
          <TH SCOPE="ROW" ALIGN="LEFT" class="querylabelbkg"><A href="saferhelp.aspx#LegalName" class="querylabel">Legal Name:</A></TH>
          <TD class="queryfield" valign="top" colspan="3">ACME&nbsp;TRUCKING&nbsp;LLC&nbsp;</TD>
        </TR>
        "#;
        assert_eq!(extract_label(html, "Legal Name"), "ACME TRUCKING LLC");
    }

    #[test]
    fn test_plain_label_and_case() {
        let html = r#"<tr><th class="querylabelbkg">usdot status</th>
            <td class="queryfield">  ACTIVE </td></tr>"#;
        assert_eq!(extract_label(html, "USDOT Status"), "ACTIVE");
    }

    #[test]
    fn test_queryfield_fallback() {
        let html = r#"<tr><th><a href="x"><b>Phone:</b></a></th>
            <td class="queryfield">(555) 123-4567</td></tr>"#;
        // The <b> wrapper defeats the anchor and plain header patterns.
        assert_eq!(extract_label(html, "Phone"), "(555) 123-4567");
    }

    #[test]
    fn test_placeholder_is_empty() {
        let html = r#"<th><a>DBA Name:</a></th><td class="queryfield">--</td>"#;
        assert_eq!(extract_label(html, "DBA Name"), "");
    }

    #[test]
    fn test_missing_label() {
        assert_eq!(extract_label("<table></table>", "Legal Name"), "");
    }

    #[test]
    fn test_lookup_first() {
        let html = r#"<th>Total Drivers:</th><td class="queryfield">7</td>"#;
        let labels = LabelExtractor::new(html);
        assert_eq!(labels.lookup("Drivers"), "");
        assert_eq!(labels.lookup_first(&["Drivers", "Total Drivers"]), "7");
    }

    #[test]
    fn test_value_with_nested_markup() {
        let html = r#"<TH><A>MC/MX/FF Number(s):</A></TH>
            <TD class="queryfield"><A HREF="https://li-public.fmcsa.dot.gov">MC-123456</A>&nbsp;</TD>"#;
        assert_eq!(extract_label(html, "MC/MX/FF Number(s)"), "MC-123456");
    }
}

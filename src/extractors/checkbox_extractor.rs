//! Checkbox grids: carrier operation, operation classification, cargo carried
//!
//! SAFER draws a checked box as a cell holding a literal `X`, directly
//! followed by the label cell:
//!
//! ```html
//! <TD class="queryfield" width="4%">X</TD>
//! <TD><FONT style="font-size:80%">Auth. For Hire</FONT></TD>
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::text::{clean_text, section};

pub const CARRIER_OPERATION_LABELS: &[&str] = &[
    "Interstate",
    "Intrastate Only (HM)",
    "Intrastate Only (Non-HM)",
];

pub const OPERATION_CLASSIFICATION_LABELS: &[&str] = &[
    "Auth. For Hire",
    "Exempt For Hire",
    "Private(Property)",
    "Priv. Pass. (Business)",
    "Priv. Pass.(Non-business)",
    "Migrant",
    "U.S. Mail",
    "Fed. Gov't",
    "State Gov't",
    "Local Gov't",
    "Indian Nation",
];

const CLASSIFICATION_START: &str = "Operation Classification:";
const CARRIER_OPERATION_START: &str = "Carrier Operation:";
const CARGO_START: &str = "Cargo Carried:";
const GRID_ENDS: &[&str] = &[
    "Operation Classification:",
    "Carrier Operation:",
    "Cargo Carried:",
    "Inspection Type",
    "US Inspection results",
];

static CHECKED_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<td[^>]*>\s*X\s*</td>\s*<td[^>]*>(.*?)</td>")
        .expect("checkbox pattern is valid")
});

static CHECKED_STYLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<td[^>]*>\s*X\s*</td>\s*<td[^>]*>\s*<font[^>]*>(.*?)</font>")
        .expect("styled checkbox pattern is valid")
});

/// Labels of every checked box in a grid slice, cleaned, in page order.
fn checked_labels(grid: &str) -> Vec<String> {
    CHECKED_LABEL_RE
        .captures_iter(grid)
        .filter_map(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|label| !label.is_empty())
        .collect()
}

/// Grid slice between its heading and the next grid heading.
fn grid<'a>(html: &'a str, start: &str) -> Option<&'a str> {
    let ends: Vec<&str> = GRID_ENDS.iter().copied().filter(|e| *e != start).collect();
    section(html, start, &ends)
}

/// Known labels checked within the grid, in vocabulary order.
fn checked_from_vocabulary(html: &str, start: &str, vocabulary: &[&str]) -> Vec<String> {
    let Some(grid) = grid(html, start) else {
        return Vec::new();
    };
    let checked = checked_labels(grid);

    vocabulary
        .iter()
        .filter(|label| checked.iter().any(|c| c.eq_ignore_ascii_case(label)))
        .map(|label| label.to_string())
        .collect()
}

/// Checked entries of the "Carrier Operation" grid.
pub fn extract_carrier_operation(html: &str) -> Vec<String> {
    checked_from_vocabulary(html, CARRIER_OPERATION_START, CARRIER_OPERATION_LABELS)
}

/// Checked entries of the "Operation Classification" grid.
pub fn extract_operation_classification(html: &str) -> Vec<String> {
    checked_from_vocabulary(html, CLASSIFICATION_START, OPERATION_CLASSIFICATION_LABELS)
}

/// Cargo types are open-ended: whatever styled label follows a checked box.
pub fn extract_cargo_carried(html: &str) -> Vec<String> {
    let Some(grid) = grid(html, CARGO_START) else {
        return Vec::new();
    };

    let mut cargo: Vec<String> = Vec::new();
    for label in CHECKED_STYLED_RE
        .captures_iter(grid)
        .filter_map(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
    {
        if !label.is_empty() && !cargo.contains(&label) {
            cargo.push(label);
        }
    }
    cargo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(checked: bool, label: &str) -> String {
        format!(
            r#"<TR><TD class="queryfield" width="4%">{}</TD><TD><FONT style="font-size:80%">{}</FONT></TD></TR>"#,
            if checked { "X" } else { "&nbsp;" },
            label
        )
    }

    fn page() -> String {
        let mut html = String::new();
        html.push_str("<TH>Operation Classification:</TH><TD><TABLE>");
        html.push_str(&cell(true, "Auth. For Hire"));
        html.push_str(&cell(false, "Exempt For Hire"));
        html.push_str(&cell(true, "Private(Property)"));
        html.push_str(&cell(false, "Interstate"));
        html.push_str("</TABLE></TD>");
        html.push_str("<TH>Carrier Operation:</TH><TD><TABLE>");
        html.push_str(&cell(true, "Interstate"));
        html.push_str(&cell(false, "Intrastate Only (HM)"));
        html.push_str(&cell(true, "Intrastate Only (Non-HM)"));
        html.push_str("</TABLE></TD>");
        html.push_str("<TH>Cargo Carried:</TH><TD><TABLE>");
        html.push_str(&cell(true, "General Freight"));
        html.push_str(&cell(false, "Household Goods"));
        html.push_str(&cell(true, "Fresh Produce"));
        html.push_str(&cell(true, "Other: Hay &amp; Straw"));
        html.push_str("</TABLE></TD>");
        html.push_str("<h4>US Inspection results</h4>");
        html
    }

    #[test]
    fn test_operation_classification() {
        assert_eq!(
            extract_operation_classification(&page()),
            vec!["Auth. For Hire", "Private(Property)"]
        );
    }

    #[test]
    fn test_carrier_operation_is_scoped_to_its_grid() {
        // The unchecked "Interstate" in the classification grid must not leak
        // in, and the checked one here must be found.
        assert_eq!(
            extract_carrier_operation(&page()),
            vec!["Interstate", "Intrastate Only (Non-HM)"]
        );
    }

    #[test]
    fn test_cargo_is_open_ended() {
        assert_eq!(
            extract_cargo_carried(&page()),
            vec!["General Freight", "Fresh Produce", "Other: Hay & Straw"]
        );
    }

    #[test]
    fn test_missing_grids() {
        let html = "<p>Legal Name</p>";
        assert!(extract_carrier_operation(html).is_empty());
        assert!(extract_operation_classification(html).is_empty());
        assert!(extract_cargo_carried(html).is_empty());
    }
}

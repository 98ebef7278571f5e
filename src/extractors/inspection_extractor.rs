//! US inspection summary table
//!
//! ```text
//! Inspection Type | Vehicle | Driver | Hazmat | IEP
//! Inspections     |    3    |   5    |   0    |  0
//! Out of Service  |    1    |   0    |   0    |  0
//! Out of Service %|  33.3%  |   0%   |   0%   |  0%
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::text::{clean_text, parse_count, parse_rate, section};

pub const INSPECTION_SECTION_START: &str = "Inspection Type";
const INSPECTION_SECTION_END: &str = "</table>";

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("row pattern is valid"));

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("cell pattern is valid"));

/// Vehicle / driver / hazmat triple from one table row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Triple<T> {
    pub vehicle: T,
    pub driver: T,
    pub hazmat: T,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InspectionSummary {
    pub inspections: Triple<u32>,
    pub out_of_service: Triple<u32>,
    /// Percentages, 0-100
    pub out_of_service_rate: Triple<f64>,
}

enum RowKind {
    Inspections,
    OutOfService,
    OutOfServiceRate,
}

fn classify_row(label: &str) -> Option<RowKind> {
    let label = label.to_ascii_lowercase();
    if label.contains("out of service") {
        if label.contains('%') {
            Some(RowKind::OutOfServiceRate)
        } else {
            Some(RowKind::OutOfService)
        }
    } else if label.contains("inspections") {
        Some(RowKind::Inspections)
    } else {
        None
    }
}

fn row_label(row_html: &str) -> String {
    // The label lives in a <TH>; if SAFER ever drops it, the text before the
    // first <TD> is the best approximation.
    let head = match row_html.to_ascii_lowercase().find("<td") {
        Some(pos) => &row_html[..pos],
        None => row_html,
    };
    clean_text(head)
}

fn row_cells(row_html: &str) -> Vec<String> {
    CELL_RE
        .captures_iter(row_html)
        .filter_map(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .collect()
}

fn triple<T: Default + Copy>(cells: &[String], parse: fn(&str) -> T) -> Triple<T> {
    let at = |i: usize| cells.get(i).map(|c| parse(c)).unwrap_or_default();
    Triple {
        vehicle: at(0),
        driver: at(1),
        hazmat: at(2),
    }
}

/// Extract the first inspection table on the page; all zeros when absent.
pub fn extract_inspections(html: &str) -> InspectionSummary {
    let mut summary = InspectionSummary::default();

    let Some(table) = section(html, INSPECTION_SECTION_START, &[INSPECTION_SECTION_END]) else {
        return summary;
    };

    for row in ROW_RE.captures_iter(table).filter_map(|c| c.get(1)) {
        let row = row.as_str();
        let Some(kind) = classify_row(&row_label(row)) else {
            continue;
        };
        let cells = row_cells(row);
        match kind {
            RowKind::Inspections => summary.inspections = triple(&cells, parse_count),
            RowKind::OutOfService => summary.out_of_service = triple(&cells, parse_count),
            RowKind::OutOfServiceRate => summary.out_of_service_rate = triple(&cells, parse_rate),
        }
    }

    summary
}

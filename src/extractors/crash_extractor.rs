//! US crash summary row (fatal / injury / tow / total)

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::text::{clean_text, parse_count, section};

pub const CRASH_SECTION_START: &str = "Crashes:";
/// Next major blocks after the US crash table
pub const CRASH_SECTION_ENDS: &[&str] =
    &["Canadian Inspection", "Carrier Safety Rating", "Safety Rating:"];
/// Class SAFER puts on numeric crash cells
pub const CRASH_CELL_CLASS: &str = "queryfield";

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("row pattern is valid"));

static NUMERIC_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?is)<td[^>]*class\s*=\s*["']?{}["']?[^>]*>(.*?)</td>"#,
        CRASH_CELL_CLASS
    ))
    .expect("crash cell pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrashSummary {
    pub fatal: u32,
    pub injury: u32,
    pub tow: u32,
    pub total: u32,
}

/// Extract US crash counts; all zeros when the row is missing or short.
pub fn extract_crashes(html: &str) -> CrashSummary {
    let Some(block) = section(html, CRASH_SECTION_START, CRASH_SECTION_ENDS) else {
        return CrashSummary::default();
    };

    let row = ROW_RE
        .captures_iter(block)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|row| {
            let lower = row.to_ascii_lowercase();
            lower.contains("crashes") && lower.contains(CRASH_CELL_CLASS)
        });

    let Some(row) = row else {
        return CrashSummary::default();
    };

    let counts: Vec<u32> = NUMERIC_CELL_RE
        .captures_iter(row)
        .filter_map(|c| c.get(1))
        .map(|m| parse_count(&clean_text(m.as_str())))
        .collect();

    match counts.as_slice() {
        [fatal, injury, tow, total, ..] => CrashSummary {
            fatal: *fatal,
            injury: *injury,
            tow: *tow,
            total: *total,
        },
        _ => CrashSummary::default(),
    }
}

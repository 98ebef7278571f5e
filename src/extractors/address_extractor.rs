//! Address cells (`physicaladdressvalue`, `mailingaddressvalue`)
//!
//! Uses the scraper crate to find the cell by id, then splits on `<br>`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::text::clean_text;

pub const PHYSICAL_ADDRESS_ID: &str = "physicaladdressvalue";
pub const MAILING_ADDRESS_ID: &str = "mailingaddressvalue";

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

static CITY_STATE_ZIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?),\s*([A-Za-z]{2})\s+(\d{5}(?:-\d{4})?)$")
        .expect("city/state/zip pattern is valid")
});

/// Postal address split into parts; every part is empty when unknown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.zip.is_empty()
    }
}

/// Parse the address cell with the given `id`. Missing cell gives an empty address.
pub fn parse_address(document: &Html, element_id: &str) -> Address {
    let selector = match Selector::parse(&format!(r#"[id="{}"]"#, element_id)) {
        Ok(s) => s,
        Err(_) => return Address::default(),
    };

    match document.select(&selector).next() {
        Some(cell) => parse_address_lines(&cell.inner_html()),
        None => Address::default(),
    }
}

/// Split the inner HTML of an address cell into street and city/state/zip.
pub fn parse_address_lines(inner_html: &str) -> Address {
    let mut lines = LINE_BREAK_RE
        .splitn(inner_html, 2)
        .map(clean_text);

    let street = lines.next().unwrap_or_default();
    let locality = lines.next().unwrap_or_default();

    let mut address = Address {
        street,
        ..Address::default()
    };

    match CITY_STATE_ZIP_RE.captures(&locality) {
        Some(caps) => {
            address.city = caps[1].trim().to_string();
            address.state = caps[2].to_ascii_uppercase();
            address.zip = caps[3].to_string();
        }
        None => address.city = locality,
    }

    address
}

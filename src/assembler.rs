//! Builds a [`CarrierRecord`] from a Company Snapshot page

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::extractors::text::{clean_text, parse_count, section};
use crate::extractors::{
    extract_cargo_carried, extract_carrier_operation, extract_crashes, extract_inspections,
    extract_operation_classification, parse_address, LabelExtractor, MAILING_ADDRESS_ID,
    PHYSICAL_ADDRESS_ID,
};
use crate::identifiers::{canonical_dot, canonical_mc};
use crate::record::{CarrierRecord, NotFound, Verification};

/// Phrases SAFER shows instead of a snapshot (matched case-insensitively)
pub const NO_DATA_MARKERS: &[&str] = &[
    "record not found",
    "no records matching",
    "could not be found",
    "invalid search",
    "returned 0 results",
    "search returned no results",
];

const SAFETY_SECTION_START: &str = "Carrier Safety Rating";
const SAFETY_SECTION_ENDS: &[&str] = &["</table>", "Canadian Inspection"];
const AUTHORITY_BOILERPLATE: &str = "For Licensing and Insurance details";

const STATUS_LABELS: &[&str] = &["USDOT Status", "Operating Status", "Status"];
const AUTHORITY_LABELS: &[&str] = &["Operating Authority Status", "Operating Status"];
const MC_LABELS: &[&str] = &["MC/MX/FF Number(s)", "MC/MX Number", "MC Number"];
const DOT_LABELS: &[&str] = &["USDOT Number", "US DOT#", "USDOT"];
const DRIVER_LABELS: &[&str] = &["Drivers", "Total Drivers"];
const POWER_UNIT_LABELS: &[&str] = &["Power Units", "Total Power Units"];

static PAGE_MC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMC[-\s#]*(\d+)").expect("MC number pattern is valid"));

/// True when the page says there is nothing to show.
pub fn is_no_data_page(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    NO_DATA_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// `ACTIVE` without `INACTIVE`, case-insensitive substring match.
pub fn is_active_status(status: &str) -> bool {
    let upper = status.to_ascii_uppercase();
    upper.contains("ACTIVE") && !upper.contains("INACTIVE")
}

/// Map SAFER's `None` placeholder (dates, ratings) to empty.
fn none_as_empty(value: String) -> String {
    if value.eq_ignore_ascii_case("none") {
        String::new()
    } else {
        value
    }
}

fn authority_status(raw: String) -> String {
    match raw.find(AUTHORITY_BOILERPLATE) {
        Some(pos) => raw[..pos].trim().to_string(),
        None => raw,
    }
}

fn common_authority(operating_authority: &str) -> String {
    let upper = operating_authority.to_ascii_uppercase();
    if upper.contains("NOT AUTHORIZED") {
        "INACTIVE".to_string()
    } else if upper.contains("AUTHORIZED") {
        "ACTIVE".to_string()
    } else {
        String::new()
    }
}

/// First MC-looking number in the SAFER cell (it can list MX/FF numbers too).
fn page_mc_number(raw: &str) -> String {
    PAGE_MC_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| canonical_mc(m.as_str()))
        .unwrap_or_default()
}

/// Turn a snapshot page into a verification outcome.
///
/// `mc` and `dot` are the caller's inputs, echoed back in canonical form when
/// the page is a no-data page and used as fallbacks when the page omits them.
pub fn assemble(html: &str, mc: &str, dot: &str) -> Verification {
    let input_mc = canonical_mc(mc);
    let input_dot = canonical_dot(dot);

    if is_no_data_page(html) {
        return Verification::NotFound(NotFound::new(input_mc, input_dot));
    }

    let labels = LabelExtractor::new(html);

    let legal_name = labels.lookup("Legal Name");
    if legal_name.is_empty() {
        return Verification::NotFound(NotFound::new(input_mc, input_dot));
    }

    let document = Html::parse_document(html);
    let status = labels.lookup_first(STATUS_LABELS);
    let active = is_active_status(&status);
    let operating_authority_status = authority_status(labels.lookup_first(AUTHORITY_LABELS));

    let mc_number = Some(page_mc_number(&labels.lookup_first(MC_LABELS)))
        .filter(|m| !m.is_empty())
        .unwrap_or(input_mc);
    let dot_number = Some(canonical_dot(&labels.lookup_first(DOT_LABELS)))
        .filter(|d| !d.is_empty())
        .unwrap_or(input_dot);

    let inspections = extract_inspections(html);
    let crashes = extract_crashes(html);

    let safety = section(html, SAFETY_SECTION_START, SAFETY_SECTION_ENDS)
        .map(LabelExtractor::new);
    let safety_value = |label: &str| safety.map(|s| s.lookup(label)).unwrap_or_default();

    let record = CarrierRecord {
        found: true,
        active,
        legal_name,
        dba_name: labels.lookup("DBA Name"),
        mc_number,
        dot_number,
        status_code: if active { "A" } else { "I" }.to_string(),
        oos_date: none_as_empty(labels.lookup("Out of Service Date")),
        entity_type: labels.lookup("Entity Type"),
        phone: labels.lookup("Phone"),
        physical_address: parse_address(&document, PHYSICAL_ADDRESS_ID),
        mailing_address: parse_address(&document, MAILING_ADDRESS_ID),
        carrier_operation: extract_carrier_operation(html),
        operation_classification: extract_operation_classification(html),
        cargo_carried: extract_cargo_carried(html),
        common_authority_status: common_authority(&operating_authority_status),
        operating_authority_status,
        mcs150_form_date: none_as_empty(labels.lookup("MCS-150 Form Date")),
        total_power_units: parse_count(&labels.lookup_first(POWER_UNIT_LABELS)),
        total_drivers: parse_count(&labels.lookup_first(DRIVER_LABELS)),
        vehicle_insp: inspections.inspections.vehicle,
        vehicle_oos_insp: inspections.out_of_service.vehicle,
        vehicle_oos_rate: inspections.out_of_service_rate.vehicle,
        driver_insp: inspections.inspections.driver,
        driver_oos_insp: inspections.out_of_service.driver,
        driver_oos_rate: inspections.out_of_service_rate.driver,
        hazmat_insp: inspections.inspections.hazmat,
        hazmat_oos_insp: inspections.out_of_service.hazmat,
        hazmat_oos_rate: inspections.out_of_service_rate.hazmat,
        crash_total: crashes.total,
        fatal_crash: crashes.fatal,
        inj_crash: crashes.injury,
        tow_crash: crashes.tow,
        safety_rating: none_as_empty(safety_value("Rating")),
        safety_rating_date: none_as_empty(safety_value("Rating Date")),
        safety_review_date: none_as_empty(safety_value("Review Date")),
        safety_review_type: none_as_empty(safety_value("Type")),
    };

    Verification::Found(Box::new(finalize(record)))
}

/// Last cleaning pass over every text field.
fn finalize(mut record: CarrierRecord) -> CarrierRecord {
    for field in [
        &mut record.legal_name,
        &mut record.dba_name,
        &mut record.oos_date,
        &mut record.entity_type,
        &mut record.phone,
        &mut record.common_authority_status,
        &mut record.operating_authority_status,
        &mut record.mcs150_form_date,
        &mut record.safety_rating,
        &mut record.safety_rating_date,
        &mut record.safety_review_date,
        &mut record.safety_review_type,
    ] {
        *field = clean_text(field);
    }
    for address in [&mut record.physical_address, &mut record.mailing_address] {
        for part in [&mut address.street, &mut address.city, &mut address.state, &mut address.zip] {
            *part = clean_text(part);
        }
    }
    for list in [
        &mut record.carrier_operation,
        &mut record.operation_classification,
        &mut record.cargo_carried,
    ] {
        list.iter_mut().for_each(|item| *item = clean_text(item));
        list.retain(|item| !item.is_empty());
    }
    record
}

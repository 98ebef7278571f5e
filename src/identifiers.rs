//! MC / USDOT number normalization and validation

use std::ops::RangeInclusive;

use crate::error::RequestError;

pub const MC_DIGITS: RangeInclusive<usize> = 4..=8;
pub const DOT_DIGITS: RangeInclusive<usize> = 5..=9;

/// Keep only ASCII digits: `"MC-1777037 "` becomes `"1777037"`.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonical MC form (`MC` + digits); empty input stays empty.
pub fn canonical_mc(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.is_empty() {
        String::new()
    } else {
        format!("MC{}", digits)
    }
}

/// Canonical DOT form: the bare digit string.
pub fn canonical_dot(raw: &str) -> String {
    digits_only(raw)
}

/// Which SAFER query to run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Dot(String),
    Mc(String),
}

impl LookupKey {
    /// `query_param` value for the SAFER snapshot query
    pub fn query_param(&self) -> &'static str {
        match self {
            LookupKey::Dot(_) => "USDOT",
            LookupKey::Mc(_) => "MC_MX",
        }
    }

    /// Digits sent as `query_string`
    pub fn digits(&self) -> &str {
        match self {
            LookupKey::Dot(d) | LookupKey::Mc(d) => d,
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKey::Dot(d) => write!(f, "USDOT {}", d),
            LookupKey::Mc(d) => write!(f, "MC{}", d),
        }
    }
}

/// Validated identifiers for one verification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierIds {
    /// MC digits, if supplied
    pub mc: Option<String>,
    /// DOT digits, if supplied
    pub dot: Option<String>,
}

impl CarrierIds {
    /// Validate raw inputs. Blank inputs count as absent; anything else must
    /// have the right number of digits once the noise is stripped.
    pub fn parse(mc: Option<&str>, dot: Option<&str>) -> Result<Self, RequestError> {
        let mc = mc.map(str::trim).filter(|s| !s.is_empty());
        let dot = dot.map(str::trim).filter(|s| !s.is_empty());

        if mc.is_none() && dot.is_none() {
            return Err(RequestError::MissingIdentifier);
        }

        let mc = match mc {
            Some(raw) => {
                let digits = digits_only(raw);
                if !MC_DIGITS.contains(&digits.len()) {
                    return Err(RequestError::InvalidMc(raw.to_string()));
                }
                Some(digits)
            }
            None => None,
        };

        let dot = match dot {
            Some(raw) => {
                let digits = digits_only(raw);
                if !DOT_DIGITS.contains(&digits.len()) {
                    return Err(RequestError::InvalidDot(raw.to_string()));
                }
                Some(digits)
            }
            None => None,
        };

        Ok(Self { mc, dot })
    }

    /// DOT lookups are more reliable against SAFER, so they win.
    pub fn lookup_key(&self) -> LookupKey {
        match (&self.dot, &self.mc) {
            (Some(dot), _) => LookupKey::Dot(dot.clone()),
            (None, Some(mc)) => LookupKey::Mc(mc.clone()),
            // parse() guarantees at least one identifier
            (None, None) => LookupKey::Dot(String::new()),
        }
    }

    pub fn mc_number(&self) -> String {
        self.mc.as_deref().map(canonical_mc).unwrap_or_default()
    }

    pub fn dot_number(&self) -> String {
        self.dot.as_deref().map(canonical_dot).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_mc_variants() {
        for raw in ["mc-1777037", "MC1777037", "1777037", " MC 1777037 "] {
            assert_eq!(canonical_mc(raw), "MC1777037", "input {:?}", raw);
        }
        assert_eq!(canonical_mc(""), "");
    }

    #[test]
    fn test_canonical_dot() {
        assert_eq!(canonical_dot("USDOT 12-34-567"), "1234567");
    }

    #[test]
    fn test_valid_mc_lengths() {
        for len in 4..=8 {
            let raw = "7".repeat(len);
            let ids = CarrierIds::parse(Some(&raw), None).unwrap();
            assert_eq!(ids.mc_number(), format!("MC{}", raw));
        }
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(matches!(
            CarrierIds::parse(Some("MC-123"), None),
            Err(RequestError::InvalidMc(_))
        ));
        assert!(matches!(
            CarrierIds::parse(Some("123456789"), None),
            Err(RequestError::InvalidMc(_))
        ));
        assert!(matches!(
            CarrierIds::parse(None, Some("1234")),
            Err(RequestError::InvalidDot(_))
        ));
        assert!(matches!(
            CarrierIds::parse(Some("MC-"), None),
            Err(RequestError::InvalidMc(_))
        ));
    }

    #[test]
    fn test_missing_identifiers() {
        assert!(matches!(
            CarrierIds::parse(None, Some("   ")),
            Err(RequestError::MissingIdentifier)
        ));
    }

    #[test]
    fn test_dot_preferred() {
        let ids = CarrierIds::parse(Some("MC-123456"), Some("1234567")).unwrap();
        assert_eq!(ids.lookup_key(), LookupKey::Dot("1234567".to_string()));
        assert_eq!(ids.lookup_key().query_param(), "USDOT");

        let ids = CarrierIds::parse(Some("MC-123456"), None).unwrap();
        assert_eq!(ids.lookup_key(), LookupKey::Mc("123456".to_string()));
        assert_eq!(ids.lookup_key().query_param(), "MC_MX");
    }
}

//! Locale and currency detection
//!
//! Maps region/city keywords found in the query to the currency used for
//! price filtering and guidance. Table order is the priority contract:
//! when a query names several regions, the earliest *declared* entry wins,
//! not the one appearing first in the text.

use serde::{Deserialize, Serialize};

/// Detected region and its currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionHint {
    /// Region key, e.g. "uae"
    pub region: String,
    /// ISO-style currency code, e.g. "AED"
    pub currency: String,
}

/// Keyword -> (region key, currency code), scanned in declaration order.
/// UAE entries lead; it is the primary market.
const REGION_CURRENCIES: &[(&str, &str, &str)] = &[
    ("dubai", "uae", "AED"),
    ("abu dhabi", "uae", "AED"),
    ("sharjah", "uae", "AED"),
    ("ajman", "uae", "AED"),
    ("uae", "uae", "AED"),
    ("emirates", "uae", "AED"),
    ("دبي", "uae", "AED"),
    ("ابوظبي", "uae", "AED"),
    ("أبوظبي", "uae", "AED"),
    ("الامارات", "uae", "AED"),
    ("riyadh", "ksa", "SAR"),
    ("jeddah", "ksa", "SAR"),
    ("dammam", "ksa", "SAR"),
    ("ksa", "ksa", "SAR"),
    ("saudi", "ksa", "SAR"),
    ("الرياض", "ksa", "SAR"),
    ("جدة", "ksa", "SAR"),
    ("السعودية", "ksa", "SAR"),
    ("doha", "qatar", "QAR"),
    ("qatar", "qatar", "QAR"),
    ("الدوحة", "qatar", "QAR"),
    ("قطر", "qatar", "QAR"),
    ("kuwait", "kuwait", "KWD"),
    ("الكويت", "kuwait", "KWD"),
    ("bahrain", "bahrain", "BHD"),
    ("manama", "bahrain", "BHD"),
    ("البحرين", "bahrain", "BHD"),
    ("muscat", "oman", "OMR"),
    ("oman", "oman", "OMR"),
    ("مسقط", "oman", "OMR"),
    ("cairo", "egypt", "EGP"),
    ("egypt", "egypt", "EGP"),
    ("القاهرة", "egypt", "EGP"),
    ("مصر", "egypt", "EGP"),
];

/// Scan the query for the first table keyword present (in table order).
pub fn detect_region(query: &str) -> Option<RegionHint> {
    let lower = query.to_lowercase();
    REGION_CURRENCIES
        .iter()
        .find(|(keyword, _, _)| lower.contains(keyword))
        .map(|(_, region, currency)| RegionHint {
            region: (*region).to_string(),
            currency: (*currency).to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keyword() {
        let hint = detect_region("best SUV deals in Dubai").unwrap();
        assert_eq!(hint.region, "uae");
        assert_eq!(hint.currency, "AED");
    }

    #[test]
    fn test_declaration_order_wins_over_text_position() {
        // "riyadh" appears first in the text, but the UAE block is
        // declared before the KSA block.
        let hint = detect_region("shipping from Riyadh to Dubai").unwrap();
        assert_eq!(hint.currency, "AED");
    }

    #[test]
    fn test_saudi_keyword() {
        let hint = detect_region("prices in jeddah").unwrap();
        assert_eq!(hint.region, "ksa");
        assert_eq!(hint.currency, "SAR");
    }

    #[test]
    fn test_arabic_keyword() {
        let hint = detect_region("اسعار السيارات في قطر").unwrap();
        assert_eq!(hint.currency, "QAR");
    }

    #[test]
    fn test_no_match() {
        assert!(detect_region("which hatchback is most reliable?").is_none());
    }
}

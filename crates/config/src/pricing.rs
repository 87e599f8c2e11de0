//! Regional price bands
//!
//! Static per-currency tables rendered into model context so price guidance
//! matches the buyer's market. Amounts are in the local currency.

/// Currency used when detection finds nothing or the code is unknown
pub const FALLBACK_CURRENCY: &str = "AED";

/// One price band of a regional market
#[derive(Debug, Clone, Copy)]
pub struct PriceBand {
    pub label: &'static str,
    /// Lower bound; 0.0 for the bottom band
    pub min: f64,
    /// Upper bound; `None` for the open-ended top band
    pub max: Option<f64>,
    pub description: &'static str,
}

const AED_BANDS: &[PriceBand] = &[
    PriceBand {
        label: "Budget",
        min: 0.0,
        max: Some(50_000.0),
        description: "older models and high-mileage daily drivers",
    },
    PriceBand {
        label: "Mid-range",
        min: 50_000.0,
        max: Some(150_000.0),
        description: "recent sedans and compact SUVs in good condition",
    },
    PriceBand {
        label: "Premium",
        min: 150_000.0,
        max: Some(400_000.0),
        description: "new or nearly-new full-size SUVs and German sedans",
    },
    PriceBand {
        label: "Luxury",
        min: 400_000.0,
        max: None,
        description: "luxury and performance vehicles",
    },
];

const SAR_BANDS: &[PriceBand] = &[
    PriceBand {
        label: "Budget",
        min: 0.0,
        max: Some(50_000.0),
        description: "older models and high-mileage daily drivers",
    },
    PriceBand {
        label: "Mid-range",
        min: 50_000.0,
        max: Some(140_000.0),
        description: "recent sedans and compact SUVs in good condition",
    },
    PriceBand {
        label: "Premium",
        min: 140_000.0,
        max: Some(380_000.0),
        description: "new or nearly-new full-size SUVs and German sedans",
    },
    PriceBand {
        label: "Luxury",
        min: 380_000.0,
        max: None,
        description: "luxury and performance vehicles",
    },
];

const QAR_BANDS: &[PriceBand] = &[
    PriceBand {
        label: "Budget",
        min: 0.0,
        max: Some(45_000.0),
        description: "older models and high-mileage daily drivers",
    },
    PriceBand {
        label: "Mid-range",
        min: 45_000.0,
        max: Some(140_000.0),
        description: "recent sedans and compact SUVs in good condition",
    },
    PriceBand {
        label: "Premium",
        min: 140_000.0,
        max: Some(370_000.0),
        description: "new or nearly-new full-size SUVs and German sedans",
    },
    PriceBand {
        label: "Luxury",
        min: 370_000.0,
        max: None,
        description: "luxury and performance vehicles",
    },
];

const KWD_BANDS: &[PriceBand] = &[
    PriceBand {
        label: "Budget",
        min: 0.0,
        max: Some(4_000.0),
        description: "older models and high-mileage daily drivers",
    },
    PriceBand {
        label: "Mid-range",
        min: 4_000.0,
        max: Some(12_000.0),
        description: "recent sedans and compact SUVs in good condition",
    },
    PriceBand {
        label: "Premium",
        min: 12_000.0,
        max: Some(32_000.0),
        description: "new or nearly-new full-size SUVs and German sedans",
    },
    PriceBand {
        label: "Luxury",
        min: 32_000.0,
        max: None,
        description: "luxury and performance vehicles",
    },
];

const EGP_BANDS: &[PriceBand] = &[
    PriceBand {
        label: "Budget",
        min: 0.0,
        max: Some(800_000.0),
        description: "older models and high-mileage daily drivers",
    },
    PriceBand {
        label: "Mid-range",
        min: 800_000.0,
        max: Some(2_500_000.0),
        description: "recent sedans and compact SUVs in good condition",
    },
    PriceBand {
        label: "Premium",
        min: 2_500_000.0,
        max: Some(6_000_000.0),
        description: "new or nearly-new full-size SUVs and German sedans",
    },
    PriceBand {
        label: "Luxury",
        min: 6_000_000.0,
        max: None,
        description: "luxury and performance vehicles",
    },
];

const USD_BANDS: &[PriceBand] = &[
    PriceBand {
        label: "Budget",
        min: 0.0,
        max: Some(15_000.0),
        description: "older models and high-mileage daily drivers",
    },
    PriceBand {
        label: "Mid-range",
        min: 15_000.0,
        max: Some(45_000.0),
        description: "recent sedans and compact SUVs in good condition",
    },
    PriceBand {
        label: "Premium",
        min: 45_000.0,
        max: Some(110_000.0),
        description: "new or nearly-new full-size SUVs and German sedans",
    },
    PriceBand {
        label: "Luxury",
        min: 110_000.0,
        max: None,
        description: "luxury and performance vehicles",
    },
];

/// Resolve the price-band table for a currency code.
///
/// Returns the resolved code alongside the bands; unknown codes fall back
/// to the AED table so guidance is always rendered.
pub fn price_guidance(currency: &str) -> (&'static str, &'static [PriceBand]) {
    match currency.to_ascii_uppercase().as_str() {
        "AED" => ("AED", AED_BANDS),
        "SAR" => ("SAR", SAR_BANDS),
        "QAR" => ("QAR", QAR_BANDS),
        "KWD" => ("KWD", KWD_BANDS),
        "EGP" => ("EGP", EGP_BANDS),
        "USD" => ("USD", USD_BANDS),
        _ => (FALLBACK_CURRENCY, AED_BANDS),
    }
}

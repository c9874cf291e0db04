//! Property-Based Test Generators
//!
//! Proptest strategies for valid claims, and `fake`-backed random claims for
//! tests that just need plausible data.

use fake::faker::lorem::en::Word;
use fake::Fake;
use proptest::prelude::*;

use domain_scoring::ClaimInput;

/// Incident categories the scoring function recognises, plus one it does not
pub const INCIDENT_TYPES: [&str; 5] = ["collision", "theft", "fire", "injury", "vandalism"];

/// Strategy for incident types, mixing known keywords, casing and free text
pub fn incident_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(INCIDENT_TYPES.to_vec()).prop_map(str::to_string),
        proptest::sample::select(INCIDENT_TYPES.to_vec()).prop_map(str::to_uppercase),
        "[a-zA-Z ]{1,24}".prop_filter("non-blank", |s| !s.trim().is_empty()),
    ]
}

/// Strategy for positive claim amounts across all bands
pub fn amount_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.01f64..500.0,
        500.0f64..5_000.0,
        5_000.0f64..20_000.0,
        20_000.0f64..5_000_000.0,
    ]
}

/// Strategy for history scores in [0, 100]
pub fn history_score_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=100.0
}

/// Strategy for claims that pass validation
pub fn valid_claim_strategy() -> impl Strategy<Value = ClaimInput> {
    (
        "CLM-[0-9]{6}",
        "CUST-[0-9]{4}",
        amount_strategy(),
        incident_type_strategy(),
        history_score_strategy(),
    )
        .prop_map(|(claim_id, customer_id, amount, incident_type, history_score)| {
            ClaimInput::new(claim_id, customer_id, amount, incident_type, history_score)
        })
}

/// A random valid claim built with `fake`
pub fn fake_claim() -> ClaimInput {
    let incident = if (0..4u8).fake::<u8>() == 0 {
        Word().fake::<String>()
    } else {
        INCIDENT_TYPES[(0..INCIDENT_TYPES.len()).fake::<usize>()].to_string()
    };

    ClaimInput::new(
        format!("CLM-{:06}", (0..1_000_000u32).fake::<u32>()),
        format!("CUST-{:04}", (0..10_000u32).fake::<u32>()),
        (1.0..100_000.0f64).fake::<f64>(),
        incident,
        (0.0..100.0f64).fake::<f64>(),
    )
}

// Normalizer integration tests
//
// Purpose: End-to-end properties of model reply normalization
// Run with: cargo test --test normalizer_integration_tests

use farm_assistant::{normalize, normalize_detailed, FieldLimits, NormalizedResult, ParseStatus};
use proptest::prelude::*;
use serde_json::json;

fn assert_bounded(result: &NormalizedResult) {
    let limits = FieldLimits::default();
    assert!((0.0..=100.0).contains(&result.confidence));
    assert!(result.diseases.len() <= limits.diseases);
    for disease in &result.diseases {
        assert!((0.0..=100.0).contains(&disease.probability));
        assert!(disease.symptoms.len() <= limits.symptoms);
        assert!(disease.causes.len() <= limits.causes);
        assert!(disease.treatment.organic.len() <= limits.organic_treatments);
        assert!(disease.treatment.chemical.len() <= limits.chemical_treatments);
        assert!(disease.prevention.len() <= limits.prevention);
        assert!(disease.description.chars().count() <= limits.disease_description_chars);
    }
    assert!(result.plant_details.common_names.len() <= limits.common_names);
    assert!(result.plant_details.care_instructions.len() <= limits.care_instructions);
    assert!(result.plant_details.description.chars().count() <= limits.plant_description_chars);
}

// =========================================================================
// Section 1: Scenario
// =========================================================================

#[test]
fn test_truncated_tomato_reply_end_to_end() {
    let raw = "Sure! Here is the analysis:\n```json\n{\n  \"plantName\": \"Tomato\",\n  \"scientificName\": \"Solanum lycopersicum\",\n  \"family\": \"Solanaceae\",\n  \"isHealthy\": false,\n  \"confidence\": 88,\n  \"diseases\": [{\n    \"name\": \"Early Blight\",\n    \"probability\": 76,\n    \"description\": \"Fungal disease causing concentric rings on older leaves\",\n    \"symptoms\": [\"Brown spots\", \"Yellow halo\", \"Leaf drop\"],\n    \"causes\": [\"Alternaria solani\"],\n    \"treatment\": {\n      \"organic\": [\"Neem oil\", \"Copper spray\"],\n      \"chemical\": [\"Mancozeb\"]\n    },\n    \"prevention\": [\"Crop rotation\", \"Mulch\", \"Drip irrig";

    let outcome = normalize_detailed(raw, Some("Tomato"));
    assert_eq!(outcome.status, ParseStatus::Repaired);

    let result = outcome.result;
    assert_eq!(result.plant_name, "Tomato");
    assert_eq!(result.scientific_name, "Solanum lycopersicum");
    assert!(!result.is_healthy);
    assert_eq!(result.confidence, 88.0);
    assert_eq!(result.diseases.len(), 1);

    let blight = &result.diseases[0];
    assert_eq!(blight.name, "Early Blight");
    assert_eq!(blight.symptoms, vec!["Brown spots", "Yellow halo", "Leaf drop"]);
    assert_eq!(blight.treatment.chemical, vec!["Mancozeb"]);
    // The cut string is dropped, the complete ones kept
    assert_eq!(blight.prevention, vec!["Crop rotation", "Mulch"]);
    assert!(result.plant_details.common_names.is_empty());
    assert!(!result.is_sentinel());
}

#[test]
fn test_fenced_reply_with_prose_defaults_missing_lists() {
    let raw = "Here is the result:\n```json\n{\"plantName\":\"Tomato\",\"isHealthy\":false,\"confidence\":82,\"diseases\":[{\"name\":\"Blight\",\"probability\":90}]}\n```";

    let outcome = normalize_detailed(raw, None);
    assert_eq!(outcome.status, ParseStatus::Clean);

    let result = outcome.result;
    assert_eq!(result.plant_name, "Tomato");
    assert!(!result.is_healthy);
    assert_eq!(result.confidence, 82.0);
    assert_eq!(result.diseases.len(), 1);

    let blight = &result.diseases[0];
    assert_eq!(blight.name, "Blight");
    assert_eq!(blight.probability, 90.0);
    assert_eq!(blight.description, "");
    assert!(blight.symptoms.is_empty());
    assert!(blight.causes.is_empty());
    assert!(blight.treatment.organic.is_empty());
    assert!(blight.treatment.chemical.is_empty());
    assert!(blight.prevention.is_empty());
    assert_eq!(result.plant_details, Default::default());
}

#[test]
fn test_unrecoverable_reply_is_sentinel() {
    for raw in ["", "I'm sorry, I can't identify this plant.", "{\"plantNa", "}{"] {
        let result = normalize(raw);
        assert!(result.is_sentinel(), "expected sentinel for {:?}", raw);
        assert_eq!(result.diseases[0].name, "Analysis Failed");
        assert_eq!(result.confidence, 0.0);
    }
}

// =========================================================================
// Section 2: Cleanup
// =========================================================================

#[test]
fn test_fenced_and_bare_replies_agree() {
    let body = r#"{"plantName":"Mango","isHealthy":true,"confidence":95}"#;
    let fenced = format!("```json\n{}\n```", body);
    let plain_fence = format!("```\n{}\n```", body);

    assert_eq!(normalize(&fenced), normalize(body));
    assert_eq!(normalize(&plain_fence), normalize(body));
}

#[test]
fn test_curly_quotes_are_normalized() {
    let raw = "{\u{201C}plantName\u{201D}: \u{201C}Chilli\u{201D}, \u{201C}confidence\u{201D}: 70}";
    let result = normalize(raw);
    assert_eq!(result.plant_name, "Chilli");
    assert_eq!(result.confidence, 70.0);
}

#[test]
fn test_curly_quotes_inside_valid_strings_survive() {
    let raw = "{\"plantName\":\"X\",\"note\":\"he said \u{201C}hi\u{201D}\",\"diseases\":[{\"name\":\"Leaf spot\",\"description\":\"Called \u{201C}tikka\u{201D} locally\"}]}";
    let outcome = normalize_detailed(raw, None);

    assert_eq!(outcome.status, ParseStatus::Clean);
    assert!(!outcome.result.is_sentinel());
    assert_eq!(outcome.result.plant_name, "X");
    assert_eq!(outcome.result.diseases[0].description, "Called \u{201C}tikka\u{201D} locally");
}

#[test]
fn test_braces_inside_strings_do_not_unbalance() {
    let raw = r#"{"plantName":"Rose {hybrid}","diseases":[{"name":"Black spot","description":"Looks like } and { marks"}]} trailing }"#;
    let outcome = normalize_detailed(raw, None);
    assert_eq!(outcome.status, ParseStatus::Clean);
    assert_eq!(outcome.result.plant_name, "Rose {hybrid}");
    assert_eq!(outcome.result.diseases[0].description, "Looks like } and { marks");
}

// =========================================================================
// Section 3: Bounds and Defaults
// =========================================================================

#[test]
fn test_lists_are_bounded() {
    let symptoms: Vec<String> = (1..=10).map(|i| format!("symptom {}", i)).collect();
    let raw = json!({
        "plantName": "Cotton",
        "diseases": [{"name": "Wilt", "symptoms": symptoms, "probability": 180}],
        "plantDetails": {"commonNames": ["Kapas", "Rui", "Cotton"], "description": "x".repeat(500)}
    })
    .to_string();

    let result = normalize(&raw);
    assert_eq!(result.diseases[0].symptoms, symptoms[..4].to_vec());
    assert_eq!(result.diseases[0].probability, 100.0);
    assert_eq!(result.plant_details.common_names, vec!["Kapas", "Rui"]);
    assert_eq!(result.plant_details.description.chars().count(), 100);
    assert_bounded(&result);
}

#[test]
fn test_wrong_types_default() {
    let raw = r#"{"plantName":["Tomato"],"isHealthy":"yes","confidence":"high","diseases":{"name":"x"},"plantDetails":[]}"#;
    let result = normalize(raw);
    assert_eq!(result.plant_name, "");
    assert!(!result.is_healthy);
    assert_eq!(result.confidence, 0.0);
    assert!(result.diseases.is_empty());
    assert_eq!(result.plant_details, Default::default());
}

// =========================================================================
// Section 4: Properties
// =========================================================================

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.()-]{0,260}"
}

fn disease_json() -> impl Strategy<Value = serde_json::Value> {
    (
        text(),
        -50i32..150,
        text(),
        prop::collection::vec(text(), 0..8),
        prop::collection::vec(text(), 0..6),
        prop::collection::vec(text(), 0..6),
    )
        .prop_map(|(name, probability, description, symptoms, causes, organic)| {
            json!({
                "name": name,
                "probability": f64::from(probability) / 2.0,
                "description": description,
                "symptoms": symptoms,
                "causes": causes,
                "treatment": {"organic": organic, "chemical": ["Mancozeb", "Copper oxychloride", "Carbendazim"]},
                "prevention": ["Rotate crops"]
            })
        })
}

fn reply_json() -> impl Strategy<Value = serde_json::Value> {
    (
        text(),
        any::<bool>(),
        -10i32..110,
        prop::collection::vec(disease_json(), 0..7),
        prop::collection::vec(text(), 0..4),
        text(),
    )
        .prop_map(|(plant_name, is_healthy, confidence, diseases, common_names, description)| {
            json!({
                "plantName": plant_name,
                "scientificName": "Solanum lycopersicum",
                "family": "Solanaceae",
                "isHealthy": is_healthy,
                "confidence": f64::from(confidence),
                "diseases": diseases,
                "plantDetails": {"commonNames": common_names, "description": description, "careInstructions": []}
            })
        })
}

/// Any text a model could put in a JSON string, minus fence backticks.
fn free_text(max_chars: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>().prop_filter("no backticks", |c| *c != '`'), 0..=max_chars)
        .prop_map(|chars| chars.into_iter().collect())
}

fn text_list(max_items: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(free_text(24), 0..=max_items)
}

fn percent() -> impl Strategy<Value = f64> {
    (0u32..=200).prop_map(|half| f64::from(half) / 2.0)
}

/// Complete records already within every default limit.
fn conformant_disease() -> impl Strategy<Value = serde_json::Value> {
    let limits = FieldLimits::default();
    (
        free_text(30),
        percent(),
        free_text(limits.disease_description_chars),
        text_list(limits.symptoms),
        text_list(limits.causes),
        text_list(limits.organic_treatments),
        text_list(limits.chemical_treatments),
        text_list(limits.prevention),
    )
        .prop_map(|(name, probability, description, symptoms, causes, organic, chemical, prevention)| {
            json!({
                "name": name,
                "probability": probability,
                "description": description,
                "symptoms": symptoms,
                "causes": causes,
                "treatment": {"organic": organic, "chemical": chemical},
                "prevention": prevention
            })
        })
}

fn conformant_reply() -> impl Strategy<Value = serde_json::Value> {
    let limits = FieldLimits::default();
    (
        (free_text(30), free_text(30), free_text(30)),
        any::<bool>(),
        percent(),
        prop::collection::vec(conformant_disease(), 0..=limits.diseases),
        text_list(limits.common_names),
        free_text(limits.plant_description_chars),
        text_list(limits.care_instructions),
    )
        .prop_map(
            |((plant_name, scientific_name, family), is_healthy, confidence, diseases, common_names, description, care)| {
                json!({
                    "plantName": plant_name,
                    "scientificName": scientific_name,
                    "family": family,
                    "isHealthy": is_healthy,
                    "confidence": confidence,
                    "diseases": diseases,
                    "plantDetails": {
                        "commonNames": common_names,
                        "description": description,
                        "careInstructions": care
                    }
                })
            },
        )
}

proptest! {
    #[test]
    fn prop_valid_reply_matches_direct_parse(reply in conformant_reply()) {
        let text = reply.to_string();
        let direct: NormalizedResult = serde_json::from_str(&text).unwrap();

        let outcome = normalize_detailed(&text, None);
        prop_assert_eq!(outcome.status, ParseStatus::Clean);
        prop_assert_eq!(outcome.result, direct);
    }

    #[test]
    fn prop_normalize_is_total(raw in any::<String>()) {
        let result = normalize(&raw);
        assert_bounded(&result);
    }

    #[test]
    fn prop_truncated_prefixes_never_panic(reply in reply_json(), cut in 0usize..4000) {
        let text = reply.to_string();
        let mut end = cut.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let result = normalize(&text[..end]);
        assert_bounded(&result);
    }

    #[test]
    fn prop_normalized_record_is_a_fixed_point(reply in reply_json()) {
        let first = normalize(&reply.to_string());
        assert_bounded(&first);

        let serialized = serde_json::to_string(&first).unwrap();
        let second = normalize(&serialized);
        prop_assert_eq!(&second, &first);

        let parsed: NormalizedResult = serde_json::from_str(&serialized).unwrap();
        prop_assert_eq!(parsed, first);
    }
}

//! Response Normalizer
//!
//! Turns untrusted, possibly malformed model output into a total
//! [`NormalizedResult`]. The pipeline is:
//!
//! - `extract`: fence/quote cleanup, brace balancing, truncation repair, parse
//! - `types`: schema defaulting and list bounding
//!
//! `normalize` never fails. Unrecoverable input yields the sentinel record,
//! and the reason is reported through [`ParseStatus`] for logging.

pub mod extract;
pub mod types;

pub use extract::{clean_model_text, extract_json, Extracted, NormalizeError};
pub use types::{Disease, FieldLimits, NormalizedResult, PlantDetails, Treatment, FAILED_ANALYSIS_NAME};

/// How a reply was recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    /// Complete JSON object found
    Clean,
    /// Truncated object closed by repair; trailing data may be missing
    Repaired,
    /// Nothing usable; the record is the sentinel
    Failed(NormalizeError),
}

/// A normalized record with the recovery outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub result: NormalizedResult,
    pub status: ParseStatus,
}

/// Normalizer with configurable field limits.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    limits: FieldLimits,
}

impl Normalizer {
    pub fn new(limits: FieldLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FieldLimits {
        &self.limits
    }

    pub fn normalize(&self, raw: &str) -> NormalizedResult {
        self.normalize_detailed(raw, None).result
    }

    /// Normalize and report how the reply was recovered.
    ///
    /// `fallback_plant_name` is the name the user asked about; it fills
    /// `plantName` when the model leaves it out and names the sentinel.
    pub fn normalize_detailed(&self, raw: &str, fallback_plant_name: Option<&str>) -> Normalization {
        let fallback = fallback_plant_name.map(str::trim).unwrap_or("");

        match extract_json(raw) {
            Ok(extracted) => {
                let mut result = NormalizedResult::from_value(&extracted.value, &self.limits);
                if result.plant_name.is_empty() {
                    result.plant_name = fallback.to_string();
                }

                let status = if extracted.repaired {
                    tracing::warn!(
                        plant = fallback,
                        diseases = result.diseases.len(),
                        "Model reply was truncated; kept the fields before the cut"
                    );
                    ParseStatus::Repaired
                } else {
                    ParseStatus::Clean
                };

                Normalization { result, status }
            }
            Err(err) => {
                tracing::warn!(
                    plant = fallback,
                    raw_len = raw.len(),
                    "Model reply unusable, returning failed analysis: {}",
                    err
                );
                Normalization {
                    result: NormalizedResult::sentinel(fallback),
                    status: ParseStatus::Failed(err),
                }
            }
        }
    }
}

/// Normalize with default limits.
pub fn normalize(raw: &str) -> NormalizedResult {
    Normalizer::default().normalize(raw)
}

/// Normalize with default limits and report the recovery outcome.
pub fn normalize_detailed(raw: &str, fallback_plant_name: Option<&str>) -> Normalization {
    Normalizer::default().normalize_detailed(raw, fallback_plant_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_statuses() {
        let n = normalize_detailed("no json here", Some("Okra"));
        assert_eq!(n.status, ParseStatus::Failed(NormalizeError::NoJsonFound));
        assert!(n.result.is_sentinel());
        assert_eq!(n.result.plant_name, "Okra");

        let n = normalize_detailed("{\"plantName\":\"Ok", None);
        assert_eq!(n.status, ParseStatus::Failed(NormalizeError::TruncatedJson));

        let n = normalize_detailed("{\"plantName\":\"a\nb\"}", None);
        assert!(matches!(
            n.status,
            ParseStatus::Failed(NormalizeError::MalformedJson { .. })
        ));
        assert!(n.result.is_sentinel());
    }

    #[test]
    fn test_repaired_status_keeps_identification() {
        let raw = r#"{"plantName":"Tomato","isHealthy":false,"confidence":82,"diseases":[{"name":"Blight","symp"#;
        let n = normalize_detailed(raw, None);
        assert_eq!(n.status, ParseStatus::Repaired);
        assert_eq!(n.result.plant_name, "Tomato");
        assert_eq!(n.result.confidence, 82.0);
        assert_eq!(n.result.diseases[0].name, "Blight");
        assert!(!n.result.is_sentinel());
    }

    #[test]
    fn test_fallback_name_fills_missing_plant_name() {
        let n = normalize_detailed(r#"{"isHealthy":true}"#, Some(" Okra "));
        assert_eq!(n.status, ParseStatus::Clean);
        assert_eq!(n.result.plant_name, "Okra");
        assert!(n.result.is_healthy);
    }

    #[test]
    fn test_custom_limits() {
        let normalizer = Normalizer::new(FieldLimits {
            symptoms: 1,
            ..FieldLimits::default()
        });
        let result = normalizer.normalize(r#"{"diseases":[{"symptoms":["a","b"]}]}"#);
        assert_eq!(result.diseases[0].symptoms, vec!["a"]);
    }
}

//! Disease detection record returned to the UI
//!
//! Every field is always present. Field names are camelCase on the wire and
//! must stay in step with the scanner page of the front end.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{get_array, get_bool, get_object, get_percent, get_text, get_text_capped, get_text_list};

/// Disease name carried by the "analysis failed" record.
pub const FAILED_ANALYSIS_NAME: &str = "Analysis Failed";

const FAILED_ANALYSIS_DESCRIPTION: &str = "Analysis failed";

/// Upper bounds applied while defaulting a parsed reply.
///
/// These cap rendering cost in the UI; they are policy, not correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub diseases: usize,
    pub symptoms: usize,
    pub causes: usize,
    pub organic_treatments: usize,
    pub chemical_treatments: usize,
    pub prevention: usize,
    pub common_names: usize,
    pub care_instructions: usize,
    /// Characters kept from a disease description
    pub disease_description_chars: usize,
    /// Characters kept from the plant description
    pub plant_description_chars: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            diseases: 5,
            symptoms: 4,
            causes: 3,
            organic_treatments: 3,
            chemical_treatments: 2,
            prevention: 4,
            common_names: 2,
            care_instructions: 4,
            disease_description_chars: 200,
            plant_description_chars: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub plant_name: String,
    pub scientific_name: String,
    pub family: String,
    pub is_healthy: bool,
    /// 0-100
    pub confidence: f64,
    pub diseases: Vec<Disease>,
    pub plant_details: PlantDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub name: String,
    /// 0-100
    pub probability: f64,
    pub description: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub treatment: Treatment,
    pub prevention: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub organic: Vec<String>,
    pub chemical: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDetails {
    pub common_names: Vec<String>,
    pub description: String,
    pub care_instructions: Vec<String>,
}

impl NormalizedResult {
    /// Build the record from a parsed reply, defaulting every missing or
    /// wrong-typed field. Strings are kept as given; only over-long lists
    /// and descriptions are cut.
    pub fn from_value(data: &Value, limits: &FieldLimits) -> Self {
        let diseases = get_array(data, "diseases")
            .iter()
            .filter(|d| d.is_object())
            .take(limits.diseases)
            .map(|d| Disease::from_value(d, limits))
            .collect();

        let plant_details = get_object(data, "plantDetails")
            .map(|d| PlantDetails::from_value(d, limits))
            .unwrap_or_default();

        Self {
            plant_name: get_text(data, "plantName"),
            scientific_name: get_text(data, "scientificName"),
            family: get_text(data, "family"),
            is_healthy: get_bool(data, "isHealthy"),
            confidence: get_percent(data, "confidence"),
            diseases,
            plant_details,
        }
    }

    /// The "analysis failed" record.
    pub fn sentinel(plant_name: &str) -> Self {
        let common_names = if plant_name.is_empty() {
            Vec::new()
        } else {
            vec![plant_name.to_string()]
        };

        Self {
            plant_name: plant_name.to_string(),
            scientific_name: "Unknown".to_string(),
            family: "Unknown".to_string(),
            is_healthy: false,
            confidence: 0.0,
            diseases: vec![Disease {
                name: FAILED_ANALYSIS_NAME.to_string(),
                probability: 0.0,
                description: "Unable to complete analysis".to_string(),
                symptoms: vec!["Analysis failed".to_string()],
                causes: vec!["Processing error".to_string()],
                treatment: Treatment {
                    organic: vec!["Try again with a clearer image".to_string()],
                    chemical: Vec::new(),
                },
                prevention: vec!["Ensure good image quality".to_string()],
            }],
            plant_details: PlantDetails {
                common_names,
                description: FAILED_ANALYSIS_DESCRIPTION.to_string(),
                care_instructions: vec!["Please try again".to_string()],
            },
        }
    }

    /// True for records produced by [`NormalizedResult::sentinel`].
    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel(&self.plant_name)
    }
}

impl Disease {
    fn from_value(data: &Value, limits: &FieldLimits) -> Self {
        let treatment = get_object(data, "treatment")
            .map(|t| Treatment {
                organic: get_text_list(t, "organic", limits.organic_treatments),
                chemical: get_text_list(t, "chemical", limits.chemical_treatments),
            })
            .unwrap_or_default();

        Self {
            name: get_text(data, "name"),
            probability: get_percent(data, "probability"),
            description: get_text_capped(data, "description", limits.disease_description_chars),
            symptoms: get_text_list(data, "symptoms", limits.symptoms),
            causes: get_text_list(data, "causes", limits.causes),
            treatment,
            prevention: get_text_list(data, "prevention", limits.prevention),
        }
    }
}

impl PlantDetails {
    fn from_value(data: &Value, limits: &FieldLimits) -> Self {
        Self {
            common_names: get_text_list(data, "commonNames", limits.common_names),
            description: get_text_capped(data, "description", limits.plant_description_chars),
            care_instructions: get_text_list(data, "careInstructions", limits.care_instructions),
        }
    }
}

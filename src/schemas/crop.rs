//! Crop recommendation reply

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MAX_LIST_ITEMS;
use crate::normalizer::{extract_json, NormalizeError};
use crate::utils::{get_array, get_percent, get_str_list, get_string};

/// The prompt asks for the top five crops.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop_name: String,
    pub scientific_name: String,
    pub family: String,
    /// 0-100
    pub suitability_score: f64,
    pub reasons: Vec<String>,
    pub planting_time: String,
    pub harvest_time: String,
    pub water_requirements: String,
    pub soil_requirements: String,
    pub climate_requirements: String,
    pub market_value: String,
    pub yield_expectation: String,
    pub care_instructions: Vec<String>,
    pub pest_management: Vec<String>,
    pub disease_resistance: Vec<String>,
    pub economic_benefits: Vec<String>,
    pub challenges: Vec<String>,
    pub alternative_crops: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendationResponse {
    pub recommendations: Vec<CropRecommendation>,
    pub summary: String,
    pub best_season: String,
    pub general_advice: String,
}

impl CropRecommendation {
    fn from_value(data: &Value) -> Self {
        let list = |key: &str| get_str_list(data, key, MAX_LIST_ITEMS);

        Self {
            crop_name: get_string(data, "cropName"),
            scientific_name: get_string(data, "scientificName"),
            family: get_string(data, "family"),
            suitability_score: get_percent(data, "suitabilityScore"),
            reasons: list("reasons"),
            planting_time: get_string(data, "plantingTime"),
            harvest_time: get_string(data, "harvestTime"),
            water_requirements: get_string(data, "waterRequirements"),
            soil_requirements: get_string(data, "soilRequirements"),
            climate_requirements: get_string(data, "climateRequirements"),
            market_value: get_string(data, "marketValue"),
            yield_expectation: get_string(data, "yieldExpectation"),
            care_instructions: list("careInstructions"),
            pest_management: list("pestManagement"),
            disease_resistance: list("diseaseResistance"),
            economic_benefits: list("economicBenefits"),
            challenges: list("challenges"),
            alternative_crops: list("alternativeCrops"),
        }
    }
}

impl CropRecommendationResponse {
    pub fn from_value(data: &Value) -> Self {
        let mut recommendations: Vec<CropRecommendation> = get_array(data, "recommendations")
            .iter()
            .filter(|r| r.is_object())
            .map(CropRecommendation::from_value)
            .filter(|r| !r.crop_name.is_empty())
            .take(MAX_RECOMMENDATIONS)
            .collect();

        // Best match first
        recommendations.sort_by(|a, b| b.suitability_score.total_cmp(&a.suitability_score));

        Self {
            recommendations,
            summary: get_string(data, "summary"),
            best_season: get_string(data, "bestSeason"),
            general_advice: get_string(data, "generalAdvice"),
        }
    }

    /// Parse a model reply. A reply without a single named crop is rejected.
    pub fn parse(raw: &str) -> Result<Self, NormalizeError> {
        let extracted = extract_json(raw)?;
        let response = Self::from_value(&extracted.value);
        if response.recommendations.is_empty() {
            return Err(NormalizeError::MalformedJson {
                message: "reply contains no crop recommendations".to_string(),
            });
        }
        Ok(response)
    }

    /// Parse a model reply, falling back to the generic paddy advice.
    pub fn parse_or_fallback(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|err| {
            tracing::warn!("Crop recommendation reply unusable, using fallback: {}", err);
            Self::fallback()
        })
    }

    /// Generic recommendation served when the model is unavailable.
    pub fn fallback() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            recommendations: vec![CropRecommendation {
                crop_name: "Rice".to_string(),
                scientific_name: "Oryza sativa".to_string(),
                family: "Poaceae".to_string(),
                suitability_score: 75.0,
                reasons: strings(&["Suitable for high humidity and rainfall conditions"]),
                planting_time: "June-July".to_string(),
                harvest_time: "October-November".to_string(),
                water_requirements: "High - requires standing water".to_string(),
                soil_requirements: "Clay loam with good water retention".to_string(),
                climate_requirements: "Warm and humid climate".to_string(),
                market_value: "₹2,000-3,000 per quintal".to_string(),
                yield_expectation: "4-6 tonnes per hectare".to_string(),
                care_instructions: strings(&["Regular water management", "Proper spacing", "Weed control"]),
                pest_management: strings(&["Use resistant varieties", "Crop rotation", "Biological control"]),
                disease_resistance: strings(&["Blast resistant varieties available"]),
                economic_benefits: strings(&["High market demand", "Government support"]),
                challenges: strings(&["High water requirement", "Labor intensive"]),
                alternative_crops: strings(&["Wheat", "Maize", "Sugarcane"]),
            }],
            summary: "Based on your conditions, rice cultivation is recommended".to_string(),
            best_season: "Kharif (Monsoon)".to_string(),
            general_advice: "Consider soil testing and water availability before finalizing crop selection"
                .to_string(),
        }
    }
}

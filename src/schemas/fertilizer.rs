//! Fertilizer recommendation reply

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MAX_LIST_ITEMS;
use crate::normalizer::{extract_json, NormalizeError};
use crate::utils::{get_array, get_str, get_str_list, get_string};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FertilizerKind {
    Organic,
    #[default]
    Chemical,
    Biofertilizer,
}

impl FertilizerKind {
    /// Unknown labels are treated as chemical, the most common case.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        if label.contains("bio") {
            FertilizerKind::Biofertilizer
        } else if label.contains("organic") {
            FertilizerKind::Organic
        } else {
            FertilizerKind::Chemical
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerRecommendation {
    pub fertilizer_name: String,
    #[serde(rename = "type")]
    pub kind: FertilizerKind,
    pub npk_ratio: String,
    pub application_rate: String,
    pub application_method: String,
    pub timing: String,
    pub frequency: String,
    pub cost: String,
    pub benefits: Vec<String>,
    pub precautions: Vec<String>,
    pub alternatives: Vec<String>,
    pub expected_results: String,
    pub soil_improvement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerSchedule {
    pub stage: String,
    pub fertilizers: Vec<FertilizerRecommendation>,
    pub total_cost: String,
    pub application_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilizerResponse {
    pub recommendations: Vec<FertilizerRecommendation>,
    pub schedule: Vec<FertilizerSchedule>,
    pub soil_analysis: String,
    pub general_advice: String,
    pub cost_estimate: String,
    pub expected_yield: String,
    pub warnings: Vec<String>,
}

fn fertilizers(data: &Value, key: &str) -> Vec<FertilizerRecommendation> {
    get_array(data, key)
        .iter()
        .filter(|f| f.is_object())
        .map(FertilizerRecommendation::from_value)
        .filter(|f| !f.fertilizer_name.is_empty())
        .take(MAX_LIST_ITEMS)
        .collect()
}

impl FertilizerRecommendation {
    fn from_value(data: &Value) -> Self {
        Self {
            fertilizer_name: get_string(data, "fertilizerName"),
            kind: get_str(data, "type")
                .map(FertilizerKind::from_label)
                .unwrap_or_default(),
            npk_ratio: get_string(data, "npkRatio"),
            application_rate: get_string(data, "applicationRate"),
            application_method: get_string(data, "applicationMethod"),
            timing: get_string(data, "timing"),
            frequency: get_string(data, "frequency"),
            cost: get_string(data, "cost"),
            benefits: get_str_list(data, "benefits", MAX_LIST_ITEMS),
            precautions: get_str_list(data, "precautions", MAX_LIST_ITEMS),
            alternatives: get_str_list(data, "alternatives", MAX_LIST_ITEMS),
            expected_results: get_string(data, "expectedResults"),
            soil_improvement: get_string(data, "soilImprovement"),
        }
    }
}

impl FertilizerSchedule {
    fn from_value(data: &Value) -> Self {
        Self {
            stage: get_string(data, "stage"),
            fertilizers: fertilizers(data, "fertilizers"),
            total_cost: get_string(data, "totalCost"),
            application_notes: get_string(data, "applicationNotes"),
        }
    }
}

impl FertilizerResponse {
    pub fn from_value(data: &Value) -> Self {
        let schedule = get_array(data, "schedule")
            .iter()
            .filter(|s| s.is_object())
            .map(FertilizerSchedule::from_value)
            .filter(|s| !s.stage.is_empty())
            .take(MAX_LIST_ITEMS)
            .collect();

        Self {
            recommendations: fertilizers(data, "recommendations"),
            schedule,
            soil_analysis: get_string(data, "soilAnalysis"),
            general_advice: get_string(data, "generalAdvice"),
            cost_estimate: get_string(data, "costEstimate"),
            expected_yield: get_string(data, "expectedYield"),
            warnings: get_str_list(data, "warnings", MAX_LIST_ITEMS),
        }
    }

    /// Parse a model reply. A reply without a single named fertilizer is rejected.
    pub fn parse(raw: &str) -> Result<Self, NormalizeError> {
        let extracted = extract_json(raw)?;
        let response = Self::from_value(&extracted.value);
        if response.recommendations.is_empty() {
            return Err(NormalizeError::MalformedJson {
                message: "reply contains no fertilizer recommendations".to_string(),
            });
        }
        Ok(response)
    }

    pub fn parse_or_fallback(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|err| {
            tracing::warn!("Fertilizer reply unusable, using fallback: {}", err);
            Self::fallback()
        })
    }

    /// Balanced NPK plan served when the model is unavailable.
    pub fn fallback() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            recommendations: vec![FertilizerRecommendation {
                fertilizer_name: "NPK 19:19:19".to_string(),
                kind: FertilizerKind::Chemical,
                npk_ratio: "19:19:19".to_string(),
                application_rate: "50-75 kg per hectare".to_string(),
                application_method: "Broadcast or band placement".to_string(),
                timing: "At planting and 30 days after".to_string(),
                frequency: "2-3 times per season".to_string(),
                cost: "₹2,500-3,500 per 50kg bag".to_string(),
                benefits: strings(&["Balanced nutrition", "Easy application", "Quick results"]),
                precautions: strings(&["Don't over-apply", "Keep away from children", "Store in dry place"]),
                alternatives: strings(&["Organic compost", "Vermicompost", "Farmyard manure"]),
                expected_results: "20-30% yield increase".to_string(),
                soil_improvement: "Maintains soil fertility".to_string(),
            }],
            schedule: vec![FertilizerSchedule {
                stage: "Planting".to_string(),
                fertilizers: Vec::new(),
                total_cost: "₹5,000-7,500 per hectare".to_string(),
                application_notes: "Apply at time of planting".to_string(),
            }],
            soil_analysis: "Soil needs balanced nutrition for optimal growth".to_string(),
            general_advice: "Regular soil testing recommended".to_string(),
            cost_estimate: "₹5,000-10,000 per hectare".to_string(),
            expected_yield: "15-25% improvement".to_string(),
            warnings: strings(&["Follow recommended rates", "Test soil regularly"]),
        }
    }
}

//! Pathologist analysis reply (upload endpoint)
//!
//! Shape: an `identification` block plus four solution tabs, each a titled
//! list of `{heading, text}` sections.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::MAX_LIST_ITEMS;
use crate::normalizer::{extract_json, NormalizeError};
use crate::utils::{get_array, get_bool, get_object, get_percent, get_string};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extract(#[from] NormalizeError),

    #[error("reply has neither an identification block nor solution tabs")]
    MissingSections,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub is_healthy: bool,
    pub disease_name: String,
    pub scientific_name: String,
    /// 0-100
    pub confidence_score: f64,
    pub short_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionSection {
    pub heading: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionTab {
    pub title: String,
    pub content: Vec<SolutionSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionTabs {
    pub about_disease: SolutionTab,
    pub organic_solutions: SolutionTab,
    pub chemical_solutions: SolutionTab,
    pub preventive_measures: SolutionTab,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseAnalysis {
    pub identification: Identification,
    pub solution_tabs: SolutionTabs,
}

impl Identification {
    fn from_value(data: &Value) -> Self {
        Self {
            is_healthy: get_bool(data, "isHealthy"),
            disease_name: get_string(data, "diseaseName"),
            scientific_name: get_string(data, "scientificName"),
            confidence_score: get_percent(data, "confidenceScore"),
            short_description: get_string(data, "shortDescription"),
        }
    }
}

impl SolutionTab {
    fn from_value(data: Option<&Value>) -> Self {
        let Some(data) = data else {
            return Self::default();
        };

        let content = get_array(data, "content")
            .iter()
            .map(|section| SolutionSection {
                heading: get_string(section, "heading"),
                text: get_string(section, "text"),
            })
            .filter(|s| !s.heading.is_empty() || !s.text.is_empty())
            .take(MAX_LIST_ITEMS)
            .collect();

        Self {
            title: get_string(data, "title"),
            content,
        }
    }
}

impl DiseaseAnalysis {
    /// Parse a model reply. Unlike the other schemas this one has no generic
    /// fallback, so a reply missing both top-level blocks is an error.
    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        let extracted = extract_json(raw)?;
        let data = &extracted.value;

        let identification = get_object(data, "identification");
        let tabs = get_object(data, "solutionTabs");
        if identification.is_none() && tabs.is_none() {
            return Err(AnalysisError::MissingSections);
        }

        let tab = |key: &str| SolutionTab::from_value(tabs.and_then(|t| get_object(t, key)));

        Ok(Self {
            identification: identification.map(Identification::from_value).unwrap_or_default(),
            solution_tabs: SolutionTabs {
                about_disease: tab("aboutDisease"),
                organic_solutions: tab("organicSolutions"),
                chemical_solutions: tab("chemicalSolutions"),
                preventive_measures: tab("preventiveMeasures"),
            },
        })
    }
}

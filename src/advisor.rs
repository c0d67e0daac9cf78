//! Feature-level operations over a [`GenerativeModel`]
//!
//! The advisor builds prompts, picks the generation preset and turns the raw
//! reply into typed results. Structured features never fail: the normalizer
//! sentinel or the schema fallback stands in for a bad reply. Free-text
//! advice propagates model errors so the caller can report them.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::conditions::{CropPreferences, FertilizerData, FertilizerHistory, SoilData, WeatherData};
use crate::language::Language;
use crate::model_client::{GenerationConfig, GenerationRequest, GenerativeModel, ModelError};
use crate::normalizer::{NormalizeError, Normalization, Normalizer, NormalizedResult, ParseStatus};
use crate::prompts;
use crate::schemas::{AnalysisError, CropRecommendationResponse, DiseaseAnalysis, FertilizerResponse};

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("could not parse model analysis: {source}")]
    Analysis {
        #[source]
        source: AnalysisError,
        raw: String,
    },
}

/// Image handed to the model, already base64-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub mime_type: String,
    pub data_base64: String,
}

#[derive(Clone)]
pub struct Advisor {
    model: Arc<dyn GenerativeModel>,
    normalizer: Normalizer,
}

impl Advisor {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self::with_normalizer(model, Normalizer::default())
    }

    pub fn with_normalizer(model: Arc<dyn GenerativeModel>, normalizer: Normalizer) -> Self {
        Self { model, normalizer }
    }

    // ========================================================================
    // Disease
    // ========================================================================

    /// Detect diseases on a plant image. Always yields a result; any model or
    /// parse failure produces the sentinel for `plant_name`.
    pub async fn detect_plant_disease(
        &self,
        image: &ImageInput,
        plant_name: &str,
        language: Language,
    ) -> Normalization {
        let request = GenerationRequest::text(prompts::disease_detection(plant_name, language))
            .image(&image.mime_type, image.data_base64.clone())
            .config(GenerationConfig::disease());

        match self.model.generate(request).await {
            Ok(raw) => {
                let normalization = self.normalizer.normalize_detailed(&raw, Some(plant_name));
                info!(
                    plant = plant_name,
                    status = ?normalization.status,
                    diseases = normalization.result.diseases.len(),
                    "Disease detection complete"
                );
                normalization
            }
            Err(e) => {
                warn!(plant = plant_name, error = %e, "Disease detection request failed");
                // No reply text means no JSON to recover
                Normalization {
                    result: NormalizedResult::sentinel(plant_name),
                    status: ParseStatus::Failed(NormalizeError::NoJsonFound),
                }
            }
        }
    }

    /// Full pathologist analysis for the upload endpoint.
    pub async fn analyze_with_pathologist(
        &self,
        image: &ImageInput,
        plant_name: &str,
        location: Option<&str>,
    ) -> Result<DiseaseAnalysis, AdvisorError> {
        let request = GenerationRequest::text(prompts::pathologist_analysis(plant_name, location))
            .image(&image.mime_type, image.data_base64.clone())
            .config(GenerationConfig::pathologist());

        let raw = self.model.generate(request).await?;
        DiseaseAnalysis::parse(&raw).map_err(|source| {
            warn!(plant = plant_name, error = %source, "Pathologist reply could not be parsed");
            AdvisorError::Analysis { source, raw }
        })
    }

    pub async fn disease_advice(
        &self,
        disease_name: &str,
        plant_name: Option<&str>,
        additional_context: Option<&str>,
        language: Language,
    ) -> Result<String, AdvisorError> {
        let prompt = prompts::disease_advice(disease_name, plant_name, additional_context, language);
        self.text(prompt, GenerationConfig::chat()).await
    }

    // ========================================================================
    // Conversation
    // ========================================================================

    pub async fn farming_advice(&self, question: &str, language: Language) -> Result<String, AdvisorError> {
        self.text(prompts::farming_advice(question, language), GenerationConfig::chat())
            .await
    }

    /// Short spoken-style reply for the voice assistant.
    pub async fn assistant_reply(&self, question: &str, language: Language) -> Result<String, AdvisorError> {
        self.text(prompts::assistant_question(question, language), GenerationConfig::chat())
            .await
    }

    // ========================================================================
    // Crops
    // ========================================================================

    pub async fn crop_recommendations(
        &self,
        weather: &WeatherData,
        soil: Option<&SoilData>,
        preferences: Option<&CropPreferences>,
        language: Language,
    ) -> CropRecommendationResponse {
        let prompt = prompts::crop_recommendations(weather, soil, preferences, language);
        match self.text(prompt, GenerationConfig::planning()).await {
            Ok(raw) => CropRecommendationResponse::parse_or_fallback(&raw),
            Err(e) => {
                warn!(location = %weather.location, error = %e, "Crop recommendation failed, using fallback");
                CropRecommendationResponse::fallback()
            }
        }
    }

    pub async fn crop_details(&self, crop_name: &str, weather: &WeatherData, language: Language) -> String {
        let prompt = prompts::crop_details(crop_name, weather, language);
        match self.text(prompt, GenerationConfig::planning()).await {
            Ok(details) => details,
            Err(e) => {
                warn!(crop = crop_name, error = %e, "Crop details unavailable");
                format!("Detailed information about {crop_name} is currently unavailable. Please try again later.")
            }
        }
    }

    // ========================================================================
    // Fertilizer
    // ========================================================================

    pub async fn fertilizer_recommendations(
        &self,
        data: &FertilizerData,
        history: Option<&FertilizerHistory>,
        language: Language,
    ) -> FertilizerResponse {
        let prompt = prompts::fertilizer_recommendations(data, history, language);
        match self.text(prompt, GenerationConfig::planning()).await {
            Ok(raw) => FertilizerResponse::parse_or_fallback(&raw),
            Err(e) => {
                warn!(crop = %data.crop_name, error = %e, "Fertilizer recommendation failed, using fallback");
                FertilizerResponse::fallback()
            }
        }
    }

    pub async fn fertilizer_details(&self, fertilizer_name: &str, crop_name: &str, language: Language) -> String {
        let prompt = prompts::fertilizer_details(fertilizer_name, crop_name, language);
        match self.text(prompt, GenerationConfig::planning()).await {
            Ok(details) => details,
            Err(e) => {
                warn!(fertilizer = fertilizer_name, error = %e, "Fertilizer details unavailable");
                format!(
                    "Detailed information about {fertilizer_name} for {crop_name} is currently unavailable. Please try again later."
                )
            }
        }
    }

    async fn text(&self, prompt: String, config: GenerationConfig) -> Result<String, AdvisorError> {
        let request = GenerationRequest::text(prompt).config(config);
        Ok(self.model.generate(request).await?)
    }
}

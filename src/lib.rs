//! Farm assistant backend
//!
//! Turns free-form generative-model replies into typed, bounded records for
//! a farming web UI.
//!
//! - `normalizer/`: JSON extraction, truncation repair and the disease record
//! - `schemas/`: crop, fertilizer and pathologist reply schemas
//! - `prompts`, `language`, `conditions`: prompt text and its inputs
//! - `model_client`, `advisor`: model access and feature operations (`api`)
//! - `store`, `api_server`: forecast/advice cache and the HTTP API (`api`)
//!
//! The normalizer and schemas need only serde; everything that does I/O is
//! behind the default `api` feature.

pub mod conditions;
pub mod crop_catalog;
pub mod language;
pub mod normalizer;
pub mod prompts;
pub mod schemas;
pub mod utils;

#[cfg(feature = "api")]
pub mod advisor;
#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod config;
#[cfg(feature = "api")]
pub mod model_client;
#[cfg(feature = "api")]
pub mod store;

// Re-export commonly used types
pub use language::Language;
pub use normalizer::{
    normalize, normalize_detailed, FieldLimits, NormalizeError, Normalization, NormalizedResult, Normalizer,
    ParseStatus,
};
pub use schemas::{CropRecommendationResponse, DiseaseAnalysis, FertilizerResponse};

#[cfg(feature = "api")]
pub use advisor::{Advisor, AdvisorError, ImageInput};
#[cfg(feature = "api")]
pub use api_server::{create_router, AppError, AppState};
#[cfg(feature = "api")]
pub use config::ServerConfig;
#[cfg(feature = "api")]
pub use model_client::{GeminiClient, GenerationConfig, GenerationRequest, GenerativeModel, ModelError, Part};
#[cfg(feature = "api")]
pub use store::{CachedForecast, ForecastCache, KeyValueStore, MemoryStore};

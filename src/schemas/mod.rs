//! Secondary reply schemas
//!
//! Each schema reuses the normalizer's JSON extraction and then defaults its
//! own fields:
//! - `crop`: crop recommendations for given weather/soil
//! - `fertilizer`: fertilizer plan and schedule
//! - `analysis`: pathologist analysis for uploaded images

pub mod analysis;
pub mod crop;
pub mod fertilizer;

pub use analysis::{AnalysisError, DiseaseAnalysis, Identification, SolutionSection, SolutionTab, SolutionTabs};
pub use crop::{CropRecommendation, CropRecommendationResponse};
pub use fertilizer::{FertilizerKind, FertilizerRecommendation, FertilizerResponse, FertilizerSchedule};

/// Cap for free-form string lists in secondary schemas.
pub const MAX_LIST_ITEMS: usize = 10;

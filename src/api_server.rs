// Axum API server module
//
// Purpose: REST API over the farming advisor (disease detection, advice,
// crop and fertilizer planning, forecast cache) for the web UI

use anyhow::Context;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::advisor::{Advisor, AdvisorError, ImageInput};
use crate::conditions::{CropPreferences, FertilizerData, FertilizerHistory, SoilData, WeatherData};
use crate::config::ServerConfig;
use crate::crop_catalog;
use crate::language::Language;
use crate::model_client::{GeminiClient, GenerativeModel, ModelError};
use crate::normalizer::NormalizedResult;
use crate::schemas::{CropRecommendationResponse, FertilizerResponse};
use crate::store::{CachedForecast, ForecastCache, KeyValueStore, MemoryStore};

/// Room for multipart boundaries and text fields on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Forecast age accepted when the client does not say.
const DEFAULT_FORECAST_MAX_AGE: Duration = Duration::from_secs(30 * 60);

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<Advisor>,
    pub store: Arc<dyn KeyValueStore>,
    pub forecasts: ForecastCache,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing Gemini client ({})...", config.gemini_model);
        if !config.has_api_key() {
            tracing::warn!("GEMINI_API_KEY is not set; model-backed endpoints will fail");
        }
        let model = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            config.model_timeout,
        )
        .context("failed to build HTTP client for the model API")?;

        Ok(Self::with_model(config, Arc::new(model)))
    }

    /// State over any model implementation.
    pub fn with_model(config: ServerConfig, model: Arc<dyn GenerativeModel>) -> Self {
        tracing::info!("Initializing Moka store ({} entries)...", config.cache_capacity);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new(config.cache_capacity));

        Self {
            advisor: Arc::new(Advisor::new(model)),
            forecasts: ForecastCache::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    // base64 grows the image by a third
    let inline_image_limit = state.config.max_upload_bytes / 3 * 4 + FORM_OVERHEAD_BYTES;

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Disease endpoints (image bodies get their own limits)
        .route(
            "/api/analyze",
            post(analyze_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/disease/detect",
            post(detect_disease).layer(DefaultBodyLimit::max(inline_image_limit)),
        )

        // Advice and assistant
        .route("/api/advice/disease", post(disease_advice))
        .route("/api/advice/farming", post(farming_advice))
        .route("/api/assistant/ask", post(assistant_ask))

        // Crop planning
        .route("/api/crops/recommend", post(recommend_crops))
        .route("/api/crops/details", post(crop_details))
        .route("/api/crops/catalog", get(crop_catalog_handler))

        // Fertilizer planning
        .route("/api/fertilizer/recommend", post(recommend_fertilizer))
        .route("/api/fertilizer/details", post(fertilizer_details))

        // Forecast cache
        .route(
            "/api/weather/cache",
            get(get_cached_forecast).put(put_cached_forecast),
        )

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectRequest {
    image_base64: String,
    plant_name: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiseaseAdviceRequest {
    disease_name: String,
    #[serde(default)]
    plant_name: Option<String>,
    #[serde(default)]
    additional_context: Option<String>,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
struct QuestionRequest {
    question: String,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
struct CropRecommendRequest {
    weather: WeatherData,
    #[serde(default)]
    soil: Option<SoilData>,
    #[serde(default)]
    preferences: Option<CropPreferences>,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CropDetailsRequest {
    crop_name: String,
    weather: WeatherData,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FertilizerRecommendRequest {
    data: FertilizerData,
    #[serde(default)]
    additional_info: Option<FertilizerHistory>,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FertilizerDetailsRequest {
    fertilizer_name: String,
    crop_name: String,
    #[serde(default)]
    language: Language,
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastQuery {
    lat: f64,
    lon: f64,
    #[serde(default)]
    max_age_secs: Option<u64>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Multipart upload: `image`, `plantName`, optional `location`.
async fn analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut image: Option<ImageInput> = None;
    let mut plant_name = String::new();
    let mut location: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }
                if bytes.len() > state.config.max_upload_bytes {
                    return Err(too_large(state.config.max_upload_bytes));
                }
                if !mime_type.starts_with("image/") {
                    return Err(AppError::BadRequest("Uploaded file must be an image".to_string()));
                }
                image = Some(ImageInput {
                    mime_type,
                    data_base64: BASE64.encode(&bytes),
                });
            }
            "plantName" => plant_name = field.text().await?.trim().to_string(),
            "location" => location = Some(field.text().await?),
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;
    if plant_name.is_empty() {
        return Err(AppError::BadRequest("Plant name is required".to_string()));
    }

    tracing::info!("Analyzing upload for {} ({})", plant_name, image.mime_type);
    let analysis = state
        .advisor
        .analyze_with_pathologist(&image, &plant_name, location.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "analysis": analysis
    })))
}

/// JSON detection with an inline base64 image (plain or data URL).
/// Model failures still answer 200 with the sentinel record.
async fn detect_disease(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<NormalizedResult>, AppError> {
    let Json(req) = payload?;

    let plant_name = req.plant_name.trim();
    if plant_name.is_empty() {
        return Err(AppError::BadRequest("Plant name is required".to_string()));
    }

    let (url_mime, data) = split_data_url(&req.image_base64);
    let decoded = BASE64
        .decode(data)
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 image: {}", e)))?;
    if decoded.is_empty() {
        return Err(AppError::BadRequest("No image data provided".to_string()));
    }
    if decoded.len() > state.config.max_upload_bytes {
        return Err(too_large(state.config.max_upload_bytes));
    }

    let mime_type = req
        .mime_type
        .as_deref()
        .or(url_mime)
        .unwrap_or("image/jpeg")
        .to_string();
    let image = ImageInput {
        mime_type,
        data_base64: data.to_string(),
    };

    let outcome = state
        .advisor
        .detect_plant_disease(&image, plant_name, req.language)
        .await;
    Ok(Json(outcome.result))
}

async fn disease_advice(
    State(state): State<AppState>,
    payload: Result<Json<DiseaseAdviceRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let disease = required(&req.disease_name, "diseaseName")?;
    let plant = req.plant_name.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let context = req.additional_context.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let key = format!(
        "advice:disease:{}:{}:{}:{}",
        req.language.code(),
        disease.to_lowercase(),
        plant.unwrap_or("").to_lowercase(),
        context.unwrap_or("")
    );
    let advice = cached_text(
        &state,
        key,
        state.advisor.disease_advice(disease, plant, context, req.language),
    )
    .await?;

    Ok(Json(json!({ "advice": advice })))
}

async fn farming_advice(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let question = required(&req.question, "question")?;

    let key = format!("advice:farming:{}:{}", req.language.code(), question.to_lowercase());
    let advice = cached_text(&state, key, state.advisor.farming_advice(question, req.language)).await?;

    Ok(Json(json!({ "advice": advice })))
}

async fn assistant_ask(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let question = required(&req.question, "question")?;

    let reply = state.advisor.assistant_reply(question, req.language).await?;

    Ok(Json(json!({
        "reply": reply,
        "speechLocale": req.language.speech_locale()
    })))
}

async fn recommend_crops(
    State(state): State<AppState>,
    payload: Result<Json<CropRecommendRequest>, JsonRejection>,
) -> Result<Json<CropRecommendationResponse>, AppError> {
    let Json(req) = payload?;

    let response = state
        .advisor
        .crop_recommendations(&req.weather, req.soil.as_ref(), req.preferences.as_ref(), req.language)
        .await;
    Ok(Json(response))
}

async fn crop_details(
    State(state): State<AppState>,
    payload: Result<Json<CropDetailsRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let crop = required(&req.crop_name, "cropName")?;

    let details = state.advisor.crop_details(crop, &req.weather, req.language).await;
    Ok(Json(json!({ "details": details })))
}

async fn crop_catalog_handler(
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;

    match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let crops = crop_catalog::search_crops(q);
            Ok(Json(json!({
                "query": q,
                "count": crops.len(),
                "crops": crops
            })))
        }
        None => Ok(Json(json!({
            "count": crop_catalog::all_crops().len(),
            "categories": crop_catalog::crops_by_category()
        }))),
    }
}

async fn recommend_fertilizer(
    State(state): State<AppState>,
    payload: Result<Json<FertilizerRecommendRequest>, JsonRejection>,
) -> Result<Json<FertilizerResponse>, AppError> {
    let Json(req) = payload?;
    required(&req.data.crop_name, "data.cropName")?;

    let response = state
        .advisor
        .fertilizer_recommendations(&req.data, req.additional_info.as_ref(), req.language)
        .await;
    Ok(Json(response))
}

async fn fertilizer_details(
    State(state): State<AppState>,
    payload: Result<Json<FertilizerDetailsRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;
    let fertilizer = required(&req.fertilizer_name, "fertilizerName")?;
    let crop = required(&req.crop_name, "cropName")?;

    let details = state.advisor.fertilizer_details(fertilizer, crop, req.language).await;
    Ok(Json(json!({ "details": details })))
}

async fn get_cached_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;

    let key = ForecastCache::build_key(query.lat, query.lon);
    let max_age = query
        .max_age_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_FORECAST_MAX_AGE);
    let entry = state.forecasts.load(&key).await;
    let stale = ForecastCache::is_stale_now(entry.as_ref(), max_age);

    Ok(Json(json!({
        "key": key,
        "entry": entry,
        "stale": stale
    })))
}

async fn put_cached_forecast(
    State(state): State<AppState>,
    payload: Result<Json<CachedForecast>, JsonRejection>,
) -> Result<Json<CachedForecast>, AppError> {
    let Json(entry) = payload?;
    required(&entry.key, "key")?;
    if ForecastCache::parse_key(&entry.key).is_none() {
        return Err(AppError::BadRequest(format!(
            "key must be \"lat,lon\" with three decimals, e.g. \"{}\"",
            ForecastCache::build_key(16.6987, 74.4563)
        )));
    }

    let saved = state
        .forecasts
        .save(entry)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store forecast: {}", e)))?;
    Ok(Json(saved))
}

// ============================================================================
// Helpers
// ============================================================================

/// Serve advice text from the store, otherwise generate and remember it.
/// Failures are not cached.
async fn cached_text<F>(state: &AppState, key: String, generate: F) -> Result<String, AppError>
where
    F: Future<Output = Result<String, AdvisorError>>,
{
    if let Some(Value::String(text)) = state.store.get(&key).await {
        tracing::debug!("Advice cache hit: {}", key);
        return Ok(text);
    }

    let text = generate.await?;
    state
        .store
        .set(&key, Value::String(text.clone()), Some(state.config.cache_ttl))
        .await;
    Ok(text)
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(value)
}

/// `data:<mime>;base64,<payload>` or a bare payload.
fn split_data_url(input: &str) -> (Option<&str>, &str) {
    let input = input.trim();
    if let Some((meta, data)) = input.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        let mime = meta.strip_suffix(";base64").unwrap_or(meta);
        return (Some(mime).filter(|m| !m.is_empty()), data);
    }
    (None, input)
}

fn too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!("Image exceeds the {} MB limit", limit / (1024 * 1024)))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    PayloadTooLarge(String),
    Upstream(String),
    /// Model answered but the reply could not be parsed
    UnparsedModelOutput { message: String, raw_response: String },
    Internal(String),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::Model(ModelError::MissingApiKey) => AppError::Internal(ModelError::MissingApiKey.to_string()),
            AdvisorError::Model(e) => {
                tracing::error!("Model request failed: {}", e);
                AppError::Upstream(e.public_message())
            }
            AdvisorError::Analysis { source, raw } => AppError::UnparsedModelOutput {
                message: format!("Failed to parse model response: {}", source),
                raw_response: raw,
            },
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": msg })),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, json!({ "error": msg })),
            AppError::UnparsedModelOutput { message, raw_response } => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "rawResponse": raw_response }),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

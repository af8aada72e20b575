//! HTTP surface: routing, request/response schemas, and error mapping.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::config::ModerationConfig;
use crate::engine::{self, Analysis, ModerationEngine};
use crate::score::Label;
use crate::sentiment::Method;
use crate::validate;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<ModerationEngine>,
}

impl AppState {
    pub fn new(engine: Arc<ModerationEngine>) -> Self {
        Self { engine }
    }

    pub fn from_config(config: Arc<ModerationConfig>) -> Self {
        Self::new(Arc::new(ModerationEngine::new(config)))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/methods", get(methods))
        .route("/compare", get(compare))
        .route("/validate", post(validate_text))
        .route("/validate/batch", post(validate_batch))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Handler-level error: user-correctable input problems map to 400,
/// anything unexpected to 500 with the message echoed.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error interno del servidor: {e}"),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub sentiment_method: Option<String>,
}

fn default_language() -> String {
    "es".to_string()
}

#[derive(Debug, Serialize)]
pub struct MethodInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub score_range: [f32; 2],
    pub default: bool,
}

impl MethodInfo {
    fn for_method(method: Method, config: &ModerationConfig) -> Self {
        Self {
            name: method.as_str(),
            description: method.description(),
            score_range: method.score_bounds(),
            default: method == config.default_method(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub original_text: String,
    pub is_offensive: bool,
    pub has_profanity: bool,
    pub emotion_score: f32,
    pub emotion_label: Label,
    pub profanity_count: usize,
    pub suggestions: Vec<String>,
    pub corrected_text: String,
    pub confidence: f32,
    pub sentiment_method: &'static str,
    pub method_info: MethodInfo,
    pub processing_time: f64,
}

async fn validate_text(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    counter!("validate_requests_total").increment(1);
    let started = Instant::now();
    let config = state.engine.config();

    let validation = validate::validate(&req.text, config.service.max_text_length);
    if let Some(message) = validation.first_message() {
        counter!("validate_rejections_total").increment(1);
        return Err(ApiError::BadRequest(message));
    }

    let method = resolve_method(req.sentiment_method.as_deref(), config)?;
    let analysis = state.engine.analyze(&req.text, method).await;

    let elapsed = started.elapsed();
    debug!(
        target: "moderation",
        language = %req.language,
        method = method.as_str(),
        elapsed = %engine::format_elapsed(elapsed),
        "validate handled"
    );

    Ok(Json(ValidateResponse {
        original_text: req.text,
        is_offensive: analysis.verdict.is_offensive,
        has_profanity: analysis.profanity.has_profanity(),
        emotion_score: analysis.sentiment.raw_score,
        emotion_label: analysis.sentiment.label,
        profanity_count: analysis.profanity.count,
        suggestions: analysis.suggestions,
        corrected_text: analysis.corrected_text,
        confidence: analysis.verdict.confidence,
        sentiment_method: method.as_str(),
        method_info: MethodInfo::for_method(method, config),
        processing_time: elapsed.as_secs_f64(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_offensive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profanity_count: Option<usize>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    fn ok(text: String, analysis: &Analysis) -> Self {
        Self {
            text,
            is_offensive: Some(analysis.verdict.is_offensive),
            emotion_score: Some(analysis.sentiment.raw_score),
            emotion_label: Some(analysis.sentiment.label),
            profanity_count: Some(analysis.profanity.count),
            valid: true,
            error: None,
        }
    }

    fn invalid(text: String, message: String) -> Self {
        Self {
            text,
            is_offensive: None,
            emotion_score: None,
            emotion_label: None,
            profanity_count: None,
            valid: false,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub method: &'static str,
    pub total_texts: usize,
    pub valid_texts: usize,
    pub results: Vec<BatchItemResult>,
}

async fn validate_batch(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
    Json(texts): Json<Vec<String>>,
) -> Result<Json<BatchResponse>, ApiError> {
    counter!("batch_requests_total").increment(1);
    let config = state.engine.config();

    if texts.len() > config.service.max_batch_items {
        return Err(ApiError::BadRequest(format!(
            "Demasiados textos en el lote (máximo {})",
            config.service.max_batch_items
        )));
    }

    let method = resolve_method(query.method.as_deref(), config)?;

    let total_texts = texts.len();
    let mut valid_texts = 0usize;
    let mut results = Vec::with_capacity(total_texts);

    // One bad item must not fail the batch; it is marked and skipped.
    for text in texts {
        let validation = validate::validate(&text, config.service.max_text_length);
        if let Some(message) = validation.first_message() {
            results.push(BatchItemResult::invalid(text, message));
            continue;
        }
        let analysis = state.engine.analyze(&text, method).await;
        valid_texts += 1;
        results.push(BatchItemResult::ok(text, &analysis));
    }

    Ok(Json(BatchResponse {
        method: method.as_str(),
        total_texts,
        valid_texts,
        results,
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let config = state.engine.config();
    Json(json!({
        "status": "healthy",
        "models_loaded": true,
        "gpu_available": false,
        "available_methods": method_names(),
        "default_method": config.default_method().as_str(),
    }))
}

async fn methods(State(state): State<AppState>) -> Json<Value> {
    let config = state.engine.config();
    let entries: Vec<Value> = Method::ALL
        .iter()
        .map(|&m| {
            json!({
                "name": m.as_str(),
                "description": m.description(),
                "score_range": m.score_bounds(),
                "default": m == config.default_method(),
                "thresholds": config.thresholds_for(m),
            })
        })
        .collect();
    Json(json!({
        "methods": entries,
        "default_method": config.default_method().as_str(),
    }))
}

async fn compare(State(state): State<AppState>) -> Json<Value> {
    let config = state.engine.config();
    Json(json!({
        "comparison": [
            {
                "method": "stars",
                "granularity": "five ordered buckets from a star rating",
                "score_range": Method::Stars.score_bounds(),
                "best_for": "short opinionated posts",
                "cost": "low",
            },
            {
                "method": "valence",
                "granularity": "signed polarity with negation handling",
                "score_range": Method::Valence.score_bounds(),
                "best_for": "texts with negated phrasing",
                "cost": "low",
            },
            {
                "method": "ratio",
                "granularity": "positive share of opinion words",
                "score_range": Method::Ratio.score_bounds(),
                "best_for": "quick polarity checks",
                "cost": "lowest",
            },
        ],
        "default_method": config.default_method().as_str(),
    }))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "API de Validación de Textos para Redes Sociales",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/validate": "POST - Valida un texto",
            "/validate/batch": "POST - Valida una lista de textos",
            "/health": "GET - Estado de salud de la API",
            "/methods": "GET - Métodos de análisis configurados",
            "/compare": "GET - Comparación de métodos",
        },
    }))
}

fn resolve_method(requested: Option<&str>, config: &ModerationConfig) -> Result<Method, ApiError> {
    match requested {
        None => Ok(config.default_method()),
        Some(id) => Method::parse(id).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Método de sentimiento desconocido `{id}`. Métodos disponibles: {}",
                method_names().join(", ")
            ))
        }),
    }
}

fn method_names() -> Vec<&'static str> {
    Method::ALL.iter().map(|m| m.as_str()).collect()
}

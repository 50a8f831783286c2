use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{Character, DataError, DataRegistry, Effect};
use crate::recovery::{
    build_recovery_table, calculate, effect_combinations, CalculationError, CalculationResult,
    CharacterStats, RecoveryTableRow,
};
use crate::server::AppState;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("data not available: {0}")]
    NotReady(#[from] DataError),

    #[error("unknown character '{0}'")]
    UnknownCharacter(String),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("route not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnknownCharacter(_) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Calculation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// `loading`, `ready` or `failed`.
    pub data: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_loaded_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters_version: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.registry.try_get();
    Json(HealthResponse {
        status: "ok",
        service: "quickref-api",
        version: env!("CARGO_PKG_VERSION"),
        data: state.registry.status().as_str(),
        data_loaded_at: registry.as_ref().map(|r| r.loaded_at_rfc3339()),
        effects_version: registry.as_ref().and_then(|r| r.effects.data_version.clone()),
        characters_version: registry
            .as_ref()
            .and_then(|r| r.characters.data_version.clone()),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectsResponse {
    pub effects: Vec<Effect>,
}

pub async fn effects(State(state): State<AppState>) -> Result<Json<EffectsResponse>, ApiError> {
    let registry = state.registry.ready().await?;
    Ok(Json(EffectsResponse {
        effects: registry.effects.effects.clone(),
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct CharactersResponse {
    pub characters: Vec<Character>,
}

pub async fn characters(
    State(state): State<AppState>,
) -> Result<Json<CharactersResponse>, ApiError> {
    let registry = state.registry.ready().await?;
    Ok(Json(CharactersResponse {
        characters: registry.characters.characters.clone(),
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    pub character: String,
    #[serde(default)]
    pub ally: Option<String>,
    #[serde(default)]
    pub effects: Vec<u32>,
}

/// Resolve names against the catalogs and run the calculator.
/// Effect ids missing from the effect catalog are dropped before calculating.
pub fn calculate_payload(
    registry: &DataRegistry,
    request: &CalculateRequest,
) -> Result<CalculationResult, ApiError> {
    let acting = find_character(registry, &request.character)?;
    let ally = match request.ally.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(find_character(registry, name)?),
        _ => None,
    };
    let effect_ids = registry.effects.known_ids(&request.effects);

    let result = calculate(
        Some(CharacterStats::from(acting)),
        ally.map(CharacterStats::from),
        &effect_ids,
    )?;
    Ok(result)
}

fn find_character<'a>(registry: &'a DataRegistry, name: &str) -> Result<&'a Character, ApiError> {
    registry
        .characters
        .find(name)
        .ok_or_else(|| ApiError::UnknownCharacter(name.to_string()))
}

pub async fn calculate_recovery(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculationResult>, ApiError> {
    let Json(request) = payload
        .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {}", err.body_text())))?;
    let registry = state.registry.ready().await?;
    calculate_payload(&registry, &request).map(Json)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    pub rows: Vec<RecoveryTableRow>,
}

/// Recovery table for one character (by name) or for the whole catalog.
pub fn table_payload(
    registry: &DataRegistry,
    character: Option<&str>,
) -> Result<TableResponse, ApiError> {
    let combinations = effect_combinations();
    match character.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => {
            let found = find_character(registry, name)?;
            Ok(TableResponse {
                character: Some(found.name.clone()),
                rows: build_recovery_table(std::slice::from_ref(found), &combinations),
            })
        }
        None => Ok(TableResponse {
            character: None,
            rows: build_recovery_table(&registry.characters.characters, &combinations),
        }),
    }
}

pub async fn recovery_table(
    State(state): State<AppState>,
    query: Result<Query<TableQuery>, QueryRejection>,
) -> Result<Json<TableResponse>, ApiError> {
    let Query(query) =
        query.map_err(|err| ApiError::BadRequest(format!("Invalid request: {}", err.body_text())))?;
    let registry = state.registry.ready().await?;
    let response = tokio::task::spawn_blocking(move || {
        table_payload(&registry, query.character.as_deref())
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(response))
}

pub async fn route_not_found() -> ApiError {
    ApiError::NotFound
}

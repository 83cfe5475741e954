use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::state::AppState;

use super::{SkillCategory, SkillEntry, SkillsCatalog};

const DEFAULT_SUGGEST_LIMIT: usize = 10;

#[derive(Deserialize)]
pub struct SuggestQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// GET /api/v1/skills/suggest?q=...&limit=...
pub async fn handle_suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestQuery>,
) -> Json<SuggestResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_SUGGEST_LIMIT);
    Json(SuggestResponse {
        suggestions: state.skills.suggest(&params.q, limit),
    })
}

#[derive(Deserialize)]
pub struct NormalizeRequest {
    pub skills: Vec<String>,
}

#[derive(Serialize)]
pub struct NormalizeResponse {
    pub skills: Vec<SkillEntry>,
    pub category_stats: BTreeMap<String, usize>,
}

/// POST /api/v1/skills/normalize
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(req): Json<NormalizeRequest>,
) -> Json<NormalizeResponse> {
    let skills = state.skills.normalize_skills_list(&req.skills);
    let category_stats = SkillsCatalog::category_stats(&skills);
    Json(NormalizeResponse {
        skills,
        category_stats,
    })
}

#[derive(Deserialize)]
pub struct RegisterAliasRequest {
    pub canonical: String,
    pub alias: String,
    pub category: SkillCategory,
}

/// POST /api/v1/skills/aliases
pub async fn handle_register_alias(
    State(state): State<AppState>,
    Json(req): Json<RegisterAliasRequest>,
) -> Result<StatusCode, AppError> {
    if req.canonical.trim().is_empty() || req.alias.trim().is_empty() {
        return Err(AppError::Validation(
            "canonical and alias must not be empty".to_string(),
        ));
    }

    state
        .skills
        .register_alias(req.canonical.trim(), req.alias.trim(), req.category);
    Ok(StatusCode::CREATED)
}

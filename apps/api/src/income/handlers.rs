//! Axum route handlers for the Income API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::income::comparator::IncomeAnalysisResult;
use crate::income::data::EducationLevel;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeIncomeRequest {
    pub user_income: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub education_level: Option<EducationLevel>,
}

/// POST /api/v1/income/analyze
///
/// Compares the income against every benchmark the inputs resolve to.
/// Unknown locations simply produce fewer comparisons.
pub async fn handle_analyze_income(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeIncomeRequest>,
) -> Result<Json<IncomeAnalysisResult>, AppError> {
    if !request.user_income.is_finite() {
        return Err(AppError::Validation("user_income must be a finite number".to_string()));
    }

    let result = state.income_comparator.analyze_income(
        request.user_income,
        request.location.as_deref(),
        request.education_level,
    );

    Ok(Json(result))
}

//! Axum route handlers for the Jobs API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::jobs::report::{AdvancementReport, AdvancementRequest};
use crate::state::AppState;

const MAX_MIN_SALARY_INCREASE: f64 = 5.0;

/// POST /api/v1/jobs/advancement
///
/// Runs the full advancement search. Provider outages come back as a
/// degraded `search_metadata.status`, not as an error.
pub async fn handle_find_advancement_jobs(
    State(state): State<AppState>,
    Json(request): Json<AdvancementRequest>,
) -> Result<Json<AdvancementReport>, AppError> {
    validate_request(&request)?;
    let report = state.job_matcher.find_income_advancement_jobs(&request).await;
    Ok(Json(report))
}

fn validate_request(request: &AdvancementRequest) -> Result<(), AppError> {
    if !request.current_salary.is_finite() {
        return Err(AppError::Validation(
            "current_salary must be a finite number".to_string(),
        ));
    }

    if let Some(min) = request.min_salary_increase {
        if !min.is_finite() || !(0.0..=MAX_MIN_SALARY_INCREASE).contains(&min) {
            return Err(AppError::Validation(format!(
                "min_salary_increase must be between 0 and {MAX_MIN_SALARY_INCREASE}, got {min}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn request(min_salary_increase: Option<f64>) -> AdvancementRequest {
        AdvancementRequest {
            user_id: Uuid::new_v4(),
            resume_text: String::new(),
            current_salary: 60_000.0,
            target_locations: vec![],
            education_level: None,
            remote_preference: false,
            min_salary_increase,
        }
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(validate_request(&request(None)).is_ok());
        assert!(validate_request(&request(Some(0.0))).is_ok());
        assert!(validate_request(&request(Some(5.0))).is_ok());
        assert!(validate_request(&request(Some(-0.1))).is_err());
        assert!(validate_request(&request(Some(5.5))).is_err());
        assert!(validate_request(&request(Some(f64::NAN))).is_err());
    }
}

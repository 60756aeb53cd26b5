//! Search parameters — target salary and query generation for one request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jobs::models::{CareerField, ExperienceLevel};
use crate::resume::parser::ResumeAnalysis;

/// Every target salary is at least this multiple of current salary.
pub const MIN_TARGET_MULTIPLIER: f64 = 1.15;
pub const DEFAULT_MIN_SALARY_INCREASE: f64 = 0.15;
pub const MAX_SEARCH_QUERIES: usize = 10;

const TARGET_ROUNDING: f64 = 500.0;
const LONG_TENURE_YEARS: u32 = 10;
const LONG_TENURE_UPLIFT: f64 = 0.02;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParameters {
    pub current_salary: f64,
    pub target_salary_min: f64,
    pub primary_field: CareerField,
    pub experience_level: ExperienceLevel,
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub remote_preference: bool,
    pub min_salary_increase: f64,
    /// Reference time for posting freshness checks.
    pub searched_at: DateTime<Utc>,
}

impl SearchParameters {
    pub fn from_resume(
        resume: &ResumeAnalysis,
        current_salary: f64,
        locations: Vec<String>,
        remote_preference: bool,
        min_salary_increase: f64,
        searched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            current_salary,
            target_salary_min: calculate_target_salary(current_salary, resume),
            primary_field: resume.primary_field,
            experience_level: resume.experience_level,
            skills: resume.skills.clone(),
            locations: locations
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            remote_preference,
            min_salary_increase,
            searched_at,
        }
    }
}

/// Minimum salary worth searching for.
///
/// Seniority raises the multiplier (entry 1.15 up to executive 1.25), ten or
/// more years adds 0.02, and the result is rounded up to the next $500 so it
/// never drops below 1.15 × current. Non-positive salaries yield 0.
pub fn calculate_target_salary(current_salary: f64, resume: &ResumeAnalysis) -> f64 {
    if !current_salary.is_finite() || current_salary <= 0.0 {
        return 0.0;
    }

    let mut multiplier = match resume.experience_level {
        ExperienceLevel::Entry => MIN_TARGET_MULTIPLIER,
        ExperienceLevel::Mid => 1.18,
        ExperienceLevel::Senior => 1.20,
        ExperienceLevel::Executive => 1.25,
    };
    if resume.years_experience.unwrap_or(0) >= LONG_TENURE_YEARS {
        multiplier += LONG_TENURE_UPLIFT;
    }

    ((current_salary * multiplier) / TARGET_ROUNDING).ceil() * TARGET_ROUNDING
}

/// Qualifier templates per level; `{}` is replaced with the title.
fn level_templates(level: ExperienceLevel) -> &'static [&'static str] {
    match level {
        ExperienceLevel::Entry => &["Junior {}", "Entry Level {}"],
        ExperienceLevel::Mid => &["{}", "{} II"],
        ExperienceLevel::Senior => &["Senior {}", "Lead {}"],
        ExperienceLevel::Executive => &["Director of {}", "Head of {}"],
    }
}

/// Field title variants crossed with qualifiers for the user's level and the
/// next level up. Case-insensitive dedup, order preserved, capped at 10.
pub fn generate_search_queries(params: &SearchParameters) -> Vec<String> {
    let mut levels = vec![params.experience_level];
    if params.experience_level.next() != params.experience_level {
        levels.push(params.experience_level.next());
    }

    let mut queries: Vec<String> = Vec::new();
    // Next level first: the search is for advancement.
    for level in levels.iter().rev() {
        for title in params.primary_field.title_variants() {
            for template in level_templates(*level) {
                let query = template.replace("{}", title);
                if !queries.iter().any(|q| q.eq_ignore_ascii_case(&query)) {
                    queries.push(query);
                }
            }
        }
    }

    queries.truncate(MAX_SEARCH_QUERIES);
    queries
}

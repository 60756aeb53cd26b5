//! Response shapes for the advancement search, plus insight text.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::income::comparator::{calculate_percentile, ComparisonGroup, IncomeAnalysisResult};
use crate::income::data::{DemographicIncomeStore, EducationLevel};
use crate::income::narrative::{currency, ordinal};
use crate::jobs::models::JobPosting;
use crate::jobs::params::SearchParameters;
use crate::jobs::scoring::{JobScore, ScoreFactor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancementRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub resume_text: String,
    pub current_salary: f64,
    #[serde(default)]
    pub target_locations: Vec<String>,
    #[serde(default)]
    pub education_level: Option<EducationLevel>,
    #[serde(default)]
    pub remote_preference: bool,
    /// Overrides the configured minimum raise for this request.
    #[serde(default)]
    pub min_salary_increase: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOpportunity {
    pub rank: usize,
    pub job: JobPosting,
    pub overall_score: f64,
    pub salary_increase_percentage: f64,
    pub score_breakdown: BTreeMap<ScoreFactor, f64>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

impl JobOpportunity {
    pub fn from_score(rank: usize, score: &JobScore<'_>) -> Self {
        Self {
            rank,
            job: score.job.clone(),
            overall_score: score.overall_score,
            salary_increase_percentage: round1(score.salary_increase * 100.0),
            score_breakdown: score.score_breakdown.clone(),
            recommendations: score.recommendations.clone(),
            risk_factors: score.risk_factors.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Completed,
    Partial,
    NoResults,
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub provider: String,
    pub queries: Vec<String>,
    pub status: SearchStatus,
    pub message: Option<String>,
    pub failed_queries: usize,
    pub total_jobs_found: usize,
    pub unique_jobs: usize,
    pub jobs_scored: usize,
    pub jobs_meeting_threshold: usize,
    pub jobs_returned: usize,
    pub average_overall_score: f64,
    pub average_salary_increase: f64, // percent
    pub target_salary: f64,
    pub min_salary_increase: f64,
    pub searched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LargestGap {
    pub comparison_group: ComparisonGroup,
    pub group_name: String,
    pub income_gap: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemographicAnalysis {
    pub location: Option<String>,
    pub education_level: Option<EducationLevel>,
    pub overall_percentile: f64,
    pub benchmarks_trailing: usize,
    pub benchmarks_total: usize,
    pub largest_gap: Option<LargestGap>,
    pub target_salary: f64,
    /// National percentile the user would reach at the target salary.
    pub target_salary_percentile: f64,
}

impl DemographicAnalysis {
    pub fn build(
        income: &IncomeAnalysisResult,
        params: &SearchParameters,
        store: &DemographicIncomeStore,
    ) -> Self {
        Self {
            location: income.location.clone(),
            education_level: income.education_level,
            overall_percentile: income.overall_percentile,
            benchmarks_trailing: income.benchmarks_trailing(),
            benchmarks_total: income.comparisons.len(),
            largest_gap: income.largest_gap().map(|c| LargestGap {
                comparison_group: c.comparison_group,
                group_name: c.group_name.clone(),
                income_gap: c.income_gap,
            }),
            target_salary: params.target_salary_min,
            target_salary_percentile: calculate_percentile(
                params.target_salary_min,
                &store.national.overall,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancementReport {
    pub user_id: Uuid,
    pub job_opportunities: Vec<JobOpportunity>,
    pub income_analysis: IncomeAnalysisResult,
    pub demographic_analysis: DemographicAnalysis,
    pub insights: Vec<String>,
    pub search_metadata: SearchMetadata,
}

pub fn build_insights(
    opportunities: &[JobOpportunity],
    income: &IncomeAnalysisResult,
    demographics: &DemographicAnalysis,
    metadata: &SearchMetadata,
) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(top) = opportunities.first() {
        insights.push(format!(
            "Top match: {} at {} pays about {:.0}% more than your current salary.",
            top.job.title, top.job.company, top.salary_increase_percentage
        ));
        insights.push(format!(
            "{} role(s) meet your {:.0}% raise target, averaging a {:.1}% increase.",
            opportunities.len(),
            metadata.min_salary_increase * 100.0,
            metadata.average_salary_increase
        ));
    } else if matches!(metadata.status, SearchStatus::Completed | SearchStatus::NoResults) {
        insights.push(
            "No roles cleared your raise target this time. Widen your locations or enable remote search."
                .to_string(),
        );
    }

    if demographics.target_salary > 0.0 {
        let national = income
            .comparison(ComparisonGroup::NationalMedian)
            .map(|c| c.percentile_rank)
            .unwrap_or(income.overall_percentile);
        insights.push(format!(
            "Reaching {} would move you from the {} to about the {} national percentile.",
            currency(demographics.target_salary.round() as i64),
            ordinal(national),
            ordinal(demographics.target_salary_percentile)
        ));
    }

    if let Some(gap) = &demographics.largest_gap {
        insights.push(format!(
            "Your largest gap is {} against {}.",
            currency(gap.income_gap),
            gap.group_name
        ));
    }

    if matches!(metadata.status, SearchStatus::Partial | SearchStatus::Unavailable) {
        insights.push(
            "Live job search was limited this time. Try again later for a fuller list.".to_string(),
        );
    }

    insights
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Six-factor job scoring.
//!
//! Each factor is an independent pure function returning a value in [0, 1].
//! `ScoringWeights::combine` folds them into `overall_score`; the default
//! weights sum to 1.0 so the overall score stays in [0, 1] as well.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::income::location::normalize_location;
use crate::jobs::models::{CompanyTier, ExperienceLevel, JobPosting};
use crate::jobs::params::SearchParameters;
use crate::resume::parser::ResumeAnalysis;

/// Salary increase at which the salary factor saturates.
const SALARY_SATURATION: f64 = 0.50;
/// Skills factor when the user listed no skills.
const NEUTRAL_SKILLS_SCORE: f64 = 0.5;

/// Reliability proxy per company tier.
pub const COMPANY_TIER_SCORES: &[(CompanyTier, f64)] = &[
    (CompanyTier::Fortune500, 1.0),
    (CompanyTier::LargeEnterprise, 0.9),
    (CompanyTier::GrowthCompany, 0.75),
    (CompanyTier::MidMarket, 0.65),
    (CompanyTier::Unknown, 0.5),
    (CompanyTier::Startup, 0.45),
];

const HIGH_GROWTH_INDUSTRIES: &[&str] = &[
    "technology", "software", "fintech", "healthcare", "health tech", "renewable energy",
    "clean energy", "biotech", "data", "cybersecurity", "e-commerce", "artificial intelligence",
];

const GROWTH_LANGUAGE: &[&str] = &[
    "growth", "promotion", "career development", "mentorship", "training", "advancement",
    "tuition", "learning budget",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub salary_improvement: f64,
    pub skills_alignment: f64,
    pub career_progression: f64,
    pub company_stability: f64,
    pub location_compatibility: f64,
    pub growth_potential: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            salary_improvement: 0.35,
            skills_alignment: 0.25,
            career_progression: 0.20,
            company_stability: 0.10,
            location_compatibility: 0.05,
            growth_potential: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.salary_improvement
            + self.skills_alignment
            + self.career_progression
            + self.company_stability
            + self.location_compatibility
            + self.growth_potential
    }

    /// Σ(sub_score × weight). No clamping: sub-scores are already in [0, 1].
    pub fn combine(&self, scores: &SubScores) -> f64 {
        self.salary_improvement * scores.salary_improvement
            + self.skills_alignment * scores.skills_alignment
            + self.career_progression * scores.career_progression
            + self.company_stability * scores.company_stability
            + self.location_compatibility * scores.location_compatibility
            + self.growth_potential * scores.growth_potential
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    SalaryImprovement,
    SkillsAlignment,
    CareerProgression,
    CompanyStability,
    LocationCompatibility,
    GrowthPotential,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub salary_improvement: f64,
    pub skills_alignment: f64,
    pub career_progression: f64,
    pub company_stability: f64,
    pub location_compatibility: f64,
    pub growth_potential: f64,
}

impl SubScores {
    pub fn compute(job: &JobPosting, params: &SearchParameters, resume: &ResumeAnalysis) -> Self {
        Self {
            salary_improvement: salary_improvement_score(job, params),
            skills_alignment: skills_alignment_score(job, params),
            career_progression: career_progression_score(job, params),
            company_stability: company_stability_score(job.company_tier),
            location_compatibility: location_compatibility_score(job, params),
            growth_potential: growth_potential_score(job, resume),
        }
    }

    pub fn breakdown(&self) -> BTreeMap<ScoreFactor, f64> {
        BTreeMap::from([
            (ScoreFactor::SalaryImprovement, self.salary_improvement),
            (ScoreFactor::SkillsAlignment, self.skills_alignment),
            (ScoreFactor::CareerProgression, self.career_progression),
            (ScoreFactor::CompanyStability, self.company_stability),
            (ScoreFactor::LocationCompatibility, self.location_compatibility),
            (ScoreFactor::GrowthPotential, self.growth_potential),
        ])
    }
}

/// Score for one posting. Borrows the posting; the matcher never mutates it.
#[derive(Debug, Clone, Serialize)]
pub struct JobScore<'a> {
    pub job: &'a JobPosting,
    pub overall_score: f64,
    pub salary_improvement_score: f64,
    pub skills_alignment_score: f64,
    pub career_progression_score: f64,
    pub company_stability_score: f64,
    pub location_compatibility_score: f64,
    pub growth_potential_score: f64,
    /// Raw (midpoint − current) / current, used by threshold filtering.
    pub salary_increase: f64,
    pub score_breakdown: BTreeMap<ScoreFactor, f64>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

impl<'a> JobScore<'a> {
    pub fn new(job: &'a JobPosting, scores: SubScores, weights: &ScoringWeights, current_salary: f64) -> Self {
        Self {
            job,
            overall_score: weights.combine(&scores),
            salary_improvement_score: scores.salary_improvement,
            skills_alignment_score: scores.skills_alignment,
            career_progression_score: scores.career_progression,
            company_stability_score: scores.company_stability,
            location_compatibility_score: scores.location_compatibility,
            growth_potential_score: scores.growth_potential,
            salary_increase: salary_increase(job, current_salary),
            score_breakdown: scores.breakdown(),
            recommendations: Vec::new(),
            risk_factors: Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Factor functions
// ────────────────────────────────────────────────────────────────────────────

/// Raw fractional raise the posting's midpoint represents.
/// Non-positive current salary counts any paying job as a full raise.
pub fn salary_increase(job: &JobPosting, current_salary: f64) -> f64 {
    let midpoint = job.salary_range.midpoint();
    if current_salary <= 0.0 {
        return if midpoint > 0.0 { 1.0 } else { 0.0 };
    }
    (midpoint - current_salary) / current_salary
}

pub fn salary_improvement_score(job: &JobPosting, params: &SearchParameters) -> f64 {
    let increase = salary_increase(job, params.current_salary);
    if increase <= 0.0 {
        return 0.0;
    }
    (increase / SALARY_SATURATION).clamp(0.0, 1.0)
}

/// |requested ∩ job.skills| / |requested|, case-insensitive.
pub fn skills_alignment_score(job: &JobPosting, params: &SearchParameters) -> f64 {
    let requested: BTreeSet<String> = params
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if requested.is_empty() {
        return NEUTRAL_SKILLS_SCORE;
    }

    let matched = requested.iter().filter(|s| job.skills.contains(s)).count();
    (matched as f64 / requested.len() as f64).clamp(0.0, 1.0)
}

/// Seniority of the posting: the stated level, raised by any title token.
pub fn job_level(job: &JobPosting) -> ExperienceLevel {
    match ExperienceLevel::from_title(&job.title) {
        Some(from_title) => from_title.max(job.experience_level),
        None => job.experience_level,
    }
}

pub fn career_progression_score(job: &JobPosting, params: &SearchParameters) -> f64 {
    match job_level(job).rank() - params.experience_level.rank() {
        1 => 0.9,
        0 => 0.6,
        d if d >= 2 => 0.5,
        -1 => 0.3,
        _ => 0.1,
    }
}

pub fn company_stability_score(tier: CompanyTier) -> f64 {
    COMPANY_TIER_SCORES
        .iter()
        .find(|(t, _)| *t == tier)
        .map(|(_, score)| *score)
        .unwrap_or(0.5)
}

/// Canonical metro (or the city part of "City, ST") used for comparison.
fn location_key(location: &str) -> String {
    let normalized = normalize_location(location);
    let city = normalized
        .split_once(',')
        .map_or(normalized.as_str(), |(city, _)| city);
    city.trim().to_lowercase()
}

/// Exact match after normalization; "LA" never matches "Atlanta, GA".
pub fn location_matches(job: &JobPosting, params: &SearchParameters) -> bool {
    let job_location = location_key(&job.location);
    if job_location.is_empty() {
        return false;
    }
    params
        .locations
        .iter()
        .any(|target| location_key(target) == job_location)
}

pub fn location_compatibility_score(job: &JobPosting, params: &SearchParameters) -> f64 {
    let location_match = location_matches(job, params);
    let remote_match = job.remote_work && params.remote_preference;

    match (location_match, remote_match) {
        (true, true) => 1.0,
        (true, false) => 0.8,
        (false, true) => 0.7,
        (false, false) if job.remote_work => 0.5,
        (false, false) if params.locations.is_empty() => 0.5,
        (false, false) => 0.2,
    }
}

pub fn growth_potential_score(job: &JobPosting, resume: &ResumeAnalysis) -> f64 {
    let mut score: f64 = 0.3;

    if job.field == resume.primary_field {
        score += 0.3;
    }

    let industry = job.industry.to_lowercase();
    if HIGH_GROWTH_INDUSTRIES.iter().any(|i| industry.contains(i)) {
        score += 0.2;
    }

    let description = job.description.to_lowercase();
    if GROWTH_LANGUAGE.iter().any(|g| description.contains(g)) {
        score += 0.1;
    }

    if job.company_tier == CompanyTier::GrowthCompany {
        score += 0.1;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::{CareerField, SalaryRange, SkillSet};
    use crate::jobs::params::DEFAULT_MIN_SALARY_INCREASE;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(title: &str, min: f64, max: f64) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Atlanta, GA".to_string(),
            salary_range: SalaryRange::new(min, max),
            description: String::new(),
            requirements: vec![],
            skills: SkillSet::from(vec!["sql".to_string(), "tableau".to_string()]),
            experience_level: ExperienceLevel::Mid,
            field: CareerField::DataAnalysis,
            industry: "Retail".to_string(),
            remote_work: false,
            source: Default::default(),
            posted_date: None,
            company_tier: CompanyTier::Unknown,
            company_size: None,
            glassdoor_rating: None,
        }
    }

    fn params(skills: &[&str], locations: &[&str], remote: bool) -> SearchParameters {
        SearchParameters {
            current_salary: 75_000.0,
            target_salary_min: 86_500.0,
            primary_field: CareerField::DataAnalysis,
            experience_level: ExperienceLevel::Mid,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
            remote_preference: remote,
            min_salary_increase: DEFAULT_MIN_SALARY_INCREASE,
            searched_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        let posting = job("Senior Data Analyst", 95_000.0, 115_000.0);
        let p = params(&["SQL", "Python"], &["Atlanta"], false);
        let resume = ResumeAnalysis {
            primary_field: CareerField::DataAnalysis,
            ..ResumeAnalysis::default()
        };
        let weights = ScoringWeights::default();
        let score = JobScore::new(&posting, SubScores::compute(&posting, &p, &resume), &weights, p.current_salary);

        let expected = 0.35 * score.salary_improvement_score
            + 0.25 * score.skills_alignment_score
            + 0.20 * score.career_progression_score
            + 0.10 * score.company_stability_score
            + 0.05 * score.location_compatibility_score
            + 0.05 * score.growth_potential_score;
        assert!((score.overall_score - expected).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&score.overall_score));
        assert_eq!(score.score_breakdown.len(), 6);
    }

    #[test]
    fn test_salary_score_zero_when_not_a_raise() {
        let p = params(&[], &[], false);
        assert_eq!(salary_improvement_score(&job("Analyst", 60_000.0, 70_000.0), &p), 0.0);
        assert_eq!(salary_improvement_score(&job("Analyst", 75_000.0, 75_000.0), &p), 0.0);
    }

    #[test]
    fn test_salary_score_saturates_at_fifty_percent() {
        let p = params(&[], &[], false);
        assert_eq!(salary_improvement_score(&job("Analyst", 112_500.0, 112_500.0), &p), 1.0);
        assert_eq!(salary_improvement_score(&job("Analyst", 200_000.0, 220_000.0), &p), 1.0);
        let partial = salary_improvement_score(&job("Analyst", 90_000.0, 90_000.0), &p);
        assert!((partial - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_skills_alignment_over_requested() {
        let posting = job("Analyst", 90_000.0, 100_000.0);
        assert_eq!(skills_alignment_score(&posting, &params(&["SQL", "Python"], &[], false)), 0.5);
        assert_eq!(skills_alignment_score(&posting, &params(&["sql", "TABLEAU"], &[], false)), 1.0);
        assert_eq!(skills_alignment_score(&posting, &params(&[], &[], false)), NEUTRAL_SKILLS_SCORE);
    }

    #[test]
    fn test_career_progression_one_step_up_is_high() {
        let p = params(&[], &[], false);
        assert!(career_progression_score(&job("Senior Data Analyst", 0.0, 0.0), &p) >= 0.7);
        assert_eq!(career_progression_score(&job("Data Analyst", 0.0, 0.0), &p), 0.6);
        assert_eq!(career_progression_score(&job("Director of Analytics", 0.0, 0.0), &p), 0.5);

        let mut junior = job("Junior Data Analyst", 0.0, 0.0);
        junior.experience_level = ExperienceLevel::Entry;
        assert_eq!(career_progression_score(&junior, &p), 0.3);
    }

    #[test]
    fn test_company_tiers_ordered() {
        assert_eq!(company_stability_score(CompanyTier::Fortune500), 1.0);
        assert!(company_stability_score(CompanyTier::Fortune500) > company_stability_score(CompanyTier::GrowthCompany));
        assert!(company_stability_score(CompanyTier::Unknown) > company_stability_score(CompanyTier::Startup));
        assert_eq!(COMPANY_TIER_SCORES.len(), 6);
    }

    #[test]
    fn test_location_and_remote_combination() {
        let mut posting = job("Analyst", 0.0, 0.0);
        assert_eq!(location_compatibility_score(&posting, &params(&[], &["atl"], false)), 0.8);
        posting.remote_work = true;
        assert!(location_compatibility_score(&posting, &params(&[], &["ATLANTA"], true)) >= 0.8);
        assert_eq!(location_compatibility_score(&posting, &params(&[], &["Houston"], true)), 0.7);
        posting.remote_work = false;
        assert_eq!(location_compatibility_score(&posting, &params(&[], &["Houston"], true)), 0.2);
        assert_eq!(location_compatibility_score(&posting, &params(&[], &[], false)), 0.5);
    }

    #[test]
    fn test_short_target_does_not_match_longer_city() {
        let mut posting = job("Analyst", 0.0, 0.0);
        let la = params(&[], &["LA"], false);
        assert!(!location_matches(&posting, &la));
        assert_eq!(location_compatibility_score(&posting, &la), 0.2);

        posting.location = "Dallas, TX".to_string();
        assert!(!location_matches(&posting, &la));
        assert!(location_matches(&posting, &params(&[], &["dfw"], false)));

        posting.location = "Boise, ID".to_string();
        assert!(location_matches(&posting, &params(&[], &["boise"], false)));
        assert!(!location_matches(&posting, &params(&[], &["ID"], false)));
    }

    #[test]
    fn test_growth_potential_bounded() {
        let mut posting = job("Analyst", 0.0, 0.0);
        posting.industry = "Fintech".to_string();
        posting.description = "Clear promotion path and mentorship".to_string();
        posting.company_tier = CompanyTier::GrowthCompany;
        let resume = ResumeAnalysis {
            primary_field: CareerField::DataAnalysis,
            ..ResumeAnalysis::default()
        };
        let score = growth_potential_score(&posting, &resume);
        assert!((score - 1.0).abs() < 1e-9);

        let unrelated = ResumeAnalysis {
            primary_field: CareerField::Sales,
            ..ResumeAnalysis::default()
        };
        assert!(growth_potential_score(&job("Analyst", 0.0, 0.0), &unrelated) >= 0.3);
    }
}

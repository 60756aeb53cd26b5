//! Intelligent Job Matcher — finds postings that pay meaningfully more.
//!
//! Pipeline per request: parse resume → build search parameters → run every
//! query against the provider → dedup → score → salary threshold → rank →
//! truncate. A failing provider degrades the report status; it never fails
//! the request.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::income::comparator::IncomeComparator;
use crate::income::narrative::currency;
use crate::jobs::models::{CompanyTier, JobPosting};
use crate::jobs::params::{generate_search_queries, SearchParameters, DEFAULT_MIN_SALARY_INCREASE};
use crate::jobs::report::{
    build_insights, round1, AdvancementReport, AdvancementRequest, DemographicAnalysis,
    JobOpportunity, SearchMetadata, SearchStatus,
};
use crate::jobs::scoring::{
    job_level, location_matches, salary_increase, JobScore, ScoringWeights, SubScores,
};
use crate::jobs::search::JobSearchProvider;
use crate::resume::parser::{ResumeAnalysis, ResumeParser};

pub const DEFAULT_MAX_RESULTS: usize = 20;

const STRONG_RAISE: f64 = 0.30;
const LOW_GLASSDOOR_RATING: f64 = 3.5;
const LOW_SKILLS_OVERLAP: f64 = 0.4;
const WIDE_BAND_RATIO: f64 = 0.5;
const STALE_POSTING_DAYS: i64 = 30;
const MAX_SKILL_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone)]
pub struct MatcherSettings {
    pub weights: ScoringWeights,
    pub min_salary_increase: f64,
    pub max_results: usize,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_salary_increase: DEFAULT_MIN_SALARY_INCREASE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

pub struct IntelligentJobMatcher {
    provider: Arc<dyn JobSearchProvider>,
    resume_parser: Arc<dyn ResumeParser>,
    comparator: Arc<IncomeComparator>,
    settings: MatcherSettings,
}

/// Raw provider output for one request.
struct SearchOutcome {
    postings: Vec<JobPosting>,
    failed_queries: usize,
    last_error: Option<String>,
}

impl IntelligentJobMatcher {
    pub fn new(
        provider: Arc<dyn JobSearchProvider>,
        resume_parser: Arc<dyn ResumeParser>,
        comparator: Arc<IncomeComparator>,
        settings: MatcherSettings,
    ) -> Self {
        let weight_sum = settings.weights.sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            warn!("Scoring weights sum to {weight_sum:.3}; overall scores may leave [0, 1]");
        }
        Self {
            provider,
            resume_parser,
            comparator,
            settings,
        }
    }

    pub async fn find_income_advancement_jobs(&self, request: &AdvancementRequest) -> AdvancementReport {
        let resume = self.resume_parser.parse_resume(&request.resume_text);
        let min_salary_increase = request
            .min_salary_increase
            .unwrap_or(self.settings.min_salary_increase);

        let params = SearchParameters::from_resume(
            &resume,
            request.current_salary,
            request.target_locations.clone(),
            request.remote_preference,
            min_salary_increase,
            Utc::now(),
        );
        let queries = generate_search_queries(&params);

        info!(
            user_id = %request.user_id,
            field = ?params.primary_field,
            level = ?params.experience_level,
            queries = queries.len(),
            "Searching for income advancement jobs"
        );

        let outcome = self.run_queries(&queries, &params).await;
        let total_jobs_found = outcome.postings.len();

        let unique = deduplicate_jobs(outcome.postings);
        let scored = self.score_jobs(&unique, &params, &resume);
        let jobs_scored = scored.len();

        let mut kept = filter_by_salary_threshold(scored, &params);
        let jobs_meeting_threshold = kept.len();
        rank_jobs(&mut kept);
        kept.truncate(self.settings.max_results);

        let opportunities: Vec<JobOpportunity> = kept
            .iter()
            .enumerate()
            .map(|(i, score)| JobOpportunity::from_score(i + 1, score))
            .collect();

        let (status, message) = search_status(
            queries.len(),
            outcome.failed_queries,
            outcome.last_error.as_deref(),
            total_jobs_found,
            jobs_meeting_threshold,
            min_salary_increase,
        );

        let education = request.education_level.or(resume.education_level);
        let income_analysis = self.comparator.analyze_income(
            request.current_salary,
            params.locations.first().map(String::as_str),
            education,
        );
        let demographic_analysis =
            DemographicAnalysis::build(&income_analysis, &params, self.comparator.store());

        let metadata = SearchMetadata {
            provider: self.provider.name().to_string(),
            queries,
            status,
            message,
            failed_queries: outcome.failed_queries,
            total_jobs_found,
            unique_jobs: unique.len(),
            jobs_scored,
            jobs_meeting_threshold,
            jobs_returned: opportunities.len(),
            average_overall_score: average(opportunities.iter().map(|o| o.overall_score)),
            average_salary_increase: round1(average(
                opportunities.iter().map(|o| o.salary_increase_percentage),
            )),
            target_salary: params.target_salary_min,
            min_salary_increase,
            searched_at: params.searched_at,
        };

        let insights = build_insights(&opportunities, &income_analysis, &demographic_analysis, &metadata);

        info!(
            user_id = %request.user_id,
            status = ?metadata.status,
            found = total_jobs_found,
            returned = metadata.jobs_returned,
            "Income advancement search finished"
        );

        AdvancementReport {
            user_id: request.user_id,
            job_opportunities: opportunities,
            income_analysis,
            demographic_analysis,
            insights,
            search_metadata: metadata,
        }
    }

    async fn run_queries(&self, queries: &[String], params: &SearchParameters) -> SearchOutcome {
        let mut outcome = SearchOutcome {
            postings: Vec::new(),
            failed_queries: 0,
            last_error: None,
        };

        for query in queries {
            match self.provider.search(query, params).await {
                Ok(mut postings) => outcome.postings.append(&mut postings),
                Err(e) => {
                    warn!(query = %query, provider = self.provider.name(), "Job search failed: {e}");
                    outcome.failed_queries += 1;
                    outcome.last_error = Some(e.to_string());
                }
            }
        }

        outcome
    }

    /// Scores every posting and attaches recommendations and risk factors.
    /// Output order matches input order.
    pub fn score_jobs<'a>(
        &self,
        jobs: &'a [JobPosting],
        params: &SearchParameters,
        resume: &ResumeAnalysis,
    ) -> Vec<JobScore<'a>> {
        jobs.iter()
            .map(|job| {
                let scores = SubScores::compute(job, params, resume);
                let mut score = JobScore::new(job, scores, &self.settings.weights, params.current_salary);
                score.recommendations = generate_job_recommendations(job, params);
                score.risk_factors = identify_job_risk_factors(job, params);
                score
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline stages
// ────────────────────────────────────────────────────────────────────────────

/// Drops repeats of (title, company, location), compared trimmed and
/// case-insensitive. The first occurrence wins and order is preserved.
pub fn deduplicate_jobs(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    jobs.into_iter()
        .filter(|job| {
            seen.insert((
                job.title.trim().to_lowercase(),
                job.company.trim().to_lowercase(),
                job.location.trim().to_lowercase(),
            ))
        })
        .collect()
}

/// Keeps postings whose midpoint raise meets `params.min_salary_increase`.
pub fn filter_by_salary_threshold<'a>(
    scored: Vec<JobScore<'a>>,
    params: &SearchParameters,
) -> Vec<JobScore<'a>> {
    scored
        .into_iter()
        .filter(|s| s.salary_increase >= params.min_salary_increase)
        .collect()
}

/// Overall score descending, then salary increase descending. The sort is
/// stable so remaining ties keep provider order.
fn rank_jobs(scored: &mut [JobScore<'_>]) {
    scored.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.salary_increase
                    .partial_cmp(&a.salary_increase)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
}

fn search_status(
    total_queries: usize,
    failed: usize,
    last_error: Option<&str>,
    total_jobs_found: usize,
    jobs_meeting_threshold: usize,
    min_salary_increase: f64,
) -> (SearchStatus, Option<String>) {
    if total_queries > 0 && failed == total_queries {
        let reason = last_error.unwrap_or("no response");
        return (
            SearchStatus::Unavailable,
            Some(format!("Job search is temporarily unavailable: {reason}")),
        );
    }
    if failed > 0 {
        return (
            SearchStatus::Partial,
            Some(format!("{failed} of {total_queries} searches failed; results may be incomplete.")),
        );
    }
    if total_jobs_found == 0 {
        return (
            SearchStatus::NoResults,
            Some("No postings matched the generated searches.".to_string()),
        );
    }
    if jobs_meeting_threshold == 0 {
        return (
            SearchStatus::Completed,
            Some(format!(
                "No postings met the {:.0}% salary increase threshold.",
                min_salary_increase * 100.0
            )),
        );
    }
    (SearchStatus::Completed, None)
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recommendations and risks
// ────────────────────────────────────────────────────────────────────────────

/// Job skills the user has not listed, in sorted order.
fn missing_skills<'a>(job: &'a JobPosting, params: &SearchParameters) -> Vec<&'a str> {
    let have: HashSet<String> = params.skills.iter().map(|s| s.trim().to_lowercase()).collect();
    job.skills.iter().filter(|s| !have.contains(*s)).collect()
}

pub fn generate_job_recommendations(job: &JobPosting, params: &SearchParameters) -> Vec<String> {
    let mut recommendations = Vec::new();
    let increase = salary_increase(job, params.current_salary);

    if increase >= STRONG_RAISE {
        recommendations.push(format!(
            "Pays about {:.0}% more than your current salary. Prioritize this application.",
            increase * 100.0
        ));
    } else if increase >= params.min_salary_increase {
        recommendations.push(format!(
            "Clears your {:.0}% raise target at roughly {:.0}% above current pay.",
            params.min_salary_increase * 100.0,
            increase * 100.0
        ));
    }

    let missing = missing_skills(job, params);
    if !job.skills.is_empty() && missing.is_empty() {
        recommendations.push(
            "You cover every listed skill. Lead with them in your resume summary.".to_string(),
        );
    } else if !missing.is_empty() {
        let shown: Vec<&str> = missing.into_iter().take(MAX_SKILL_SUGGESTIONS).collect();
        recommendations.push(format!(
            "Build or highlight experience in: {}.",
            shown.join(", ")
        ));
    }

    if job_level(job).rank() == params.experience_level.rank() + 1 {
        recommendations.push(format!(
            "This is a step up to {:?} level. Frame your experience around ownership and results.",
            job_level(job)
        ));
    }

    if job.remote_work && params.remote_preference {
        recommendations.push("Fully remote role that matches your remote preference.".to_string());
    }

    if params.target_salary_min > 0.0 && job.salary_range.midpoint() >= params.target_salary_min {
        recommendations.push(format!(
            "Negotiate toward the top of the band ({}).",
            currency(job.salary_range.max_salary().round() as i64)
        ));
    }

    if matches!(job.company_tier, CompanyTier::Fortune500 | CompanyTier::LargeEnterprise) {
        recommendations.push(
            "Large employer: ask about structured promotion cycles and total benefits value."
                .to_string(),
        );
    }

    recommendations
}

pub fn identify_job_risk_factors(job: &JobPosting, params: &SearchParameters) -> Vec<String> {
    let mut risks = Vec::new();

    if job.company_tier == CompanyTier::Startup {
        risks.push("Startup employer: pay may lean on equity and stability is lower.".to_string());
    }

    if let Some(rating) = job.glassdoor_rating {
        if rating < LOW_GLASSDOOR_RATING {
            risks.push(format!(
                "Glassdoor rating of {rating:.1} suggests employee satisfaction concerns."
            ));
        }
    }

    if !job.skills.is_empty() {
        let matched = job.skills.len() - missing_skills(job, params).len();
        if (matched as f64 / job.skills.len() as f64) < LOW_SKILLS_OVERLAP {
            risks.push("You match fewer than 40% of the listed skills.".to_string());
        }
    }

    let midpoint = job.salary_range.midpoint();
    if midpoint > 0.0 && job.salary_range.range_width() > WIDE_BAND_RATIO * midpoint {
        risks.push(format!(
            "Wide salary band. The offer may land near {}.",
            currency(job.salary_range.min_salary().round() as i64)
        ));
    }

    if let Some(posted) = job.posted_date {
        let age_days = (params.searched_at - posted).num_days();
        if age_days > STALE_POSTING_DAYS {
            risks.push(format!("Posted {age_days} days ago. The role may already be filled."));
        }
    }

    if params.target_salary_min > 0.0 && midpoint < params.target_salary_min {
        risks.push(format!(
            "Band midpoint is below your target salary of {}.",
            currency(params.target_salary_min.round() as i64)
        ));
    }

    if !job.remote_work && !params.locations.is_empty() && !location_matches(job, params) {
        risks.push(format!(
            "{} is outside your target locations. Relocation may be required.",
            if job.location.trim().is_empty() { "The location" } else { job.location.trim() }
        ));
    }

    risks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::data::DemographicIncomeStore;
    use crate::jobs::models::{CareerField, ExperienceLevel, SalaryRange, SkillSet};
    use crate::jobs::search::{JobSearchError, StaticJobSearchProvider};
    use crate::resume::parser::KeywordResumeParser;
    use async_trait::async_trait;
    use chrono::Duration;
    use uuid::Uuid;

    const RESUME: &str = "Data Analyst\n5 years of experience with SQL, Tableau and Python dashboards.\nBachelor of Science";

    fn job(title: &str, company: &str, min: f64, max: f64) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: company.to_string(),
            location: "Atlanta, GA".to_string(),
            salary_range: SalaryRange::new(min, max),
            description: String::new(),
            requirements: vec![],
            skills: SkillSet::from(vec!["sql".to_string(), "tableau".to_string()]),
            experience_level: ExperienceLevel::Mid,
            field: CareerField::DataAnalysis,
            industry: "Technology".to_string(),
            remote_work: false,
            source: Default::default(),
            posted_date: None,
            company_tier: CompanyTier::Unknown,
            company_size: None,
            glassdoor_rating: None,
        }
    }

    fn params() -> SearchParameters {
        SearchParameters {
            current_salary: 75_000.0,
            target_salary_min: 86_500.0,
            primary_field: CareerField::DataAnalysis,
            experience_level: ExperienceLevel::Mid,
            skills: vec!["SQL".to_string(), "Tableau".to_string()],
            locations: vec!["Atlanta".to_string()],
            remote_preference: false,
            min_salary_increase: DEFAULT_MIN_SALARY_INCREASE,
            searched_at: Utc::now(),
        }
    }

    fn matcher(provider: Arc<dyn JobSearchProvider>) -> IntelligentJobMatcher {
        IntelligentJobMatcher::new(
            provider,
            Arc::new(KeywordResumeParser),
            Arc::new(IncomeComparator::new(Arc::new(DemographicIncomeStore::default()))),
            MatcherSettings::default(),
        )
    }

    fn request() -> AdvancementRequest {
        AdvancementRequest {
            user_id: Uuid::new_v4(),
            resume_text: RESUME.to_string(),
            current_salary: 75_000.0,
            target_locations: vec!["Atlanta".to_string()],
            education_level: None,
            remote_preference: false,
            min_salary_increase: None,
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl JobSearchProvider for FailingProvider {
        async fn search(
            &self,
            _query: &str,
            _params: &SearchParameters,
        ) -> Result<Vec<JobPosting>, JobSearchError> {
            Err(JobSearchError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_threshold_keeps_forty_percent_drops_five() {
        let jobs = vec![
            job("Senior Data Analyst", "Acme", 100_000.0, 110_000.0),
            job("Data Analyst", "Beta", 78_750.0, 78_750.0),
        ];
        let p = params();
        let m = matcher(Arc::new(StaticJobSearchProvider::default()));
        let scored = m.score_jobs(&jobs, &p, &ResumeAnalysis::default());
        let kept = filter_by_salary_threshold(scored, &p);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].job.company, "Acme");
        assert!((kept[0].salary_increase - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_raising_threshold_never_adds_jobs() {
        let jobs: Vec<JobPosting> = (0..10)
            .map(|i| job("Data Analyst", &format!("Co{i}"), 70_000.0 + i as f64 * 5_000.0, 80_000.0 + i as f64 * 5_000.0))
            .collect();
        let m = matcher(Arc::new(StaticJobSearchProvider::default()));
        let mut previous = usize::MAX;
        for threshold in [0.0, 0.1, 0.2, 0.3, 0.5] {
            let p = SearchParameters {
                min_salary_increase: threshold,
                ..params()
            };
            let kept = filter_by_salary_threshold(m.score_jobs(&jobs, &p, &ResumeAnalysis::default()), &p);
            assert!(kept.len() <= previous);
            assert!(kept.iter().all(|s| s.salary_increase >= threshold));
            previous = kept.len();
        }
    }

    #[test]
    fn test_dedup_first_wins_and_idempotent() {
        let mut duplicate = job(" data analyst ", "ACME", 1.0, 2.0);
        duplicate.location = "atlanta, ga".to_string();
        let jobs = vec![
            job("Data Analyst", "Acme", 90_000.0, 100_000.0),
            duplicate,
            job("Data Analyst", "Beta", 90_000.0, 100_000.0),
        ];
        let once = deduplicate_jobs(jobs);
        assert_eq!(once.len(), 2);
        assert_eq!(once[0].salary_range.min_salary(), 90_000.0);
        let twice = deduplicate_jobs(once.clone());
        let ids = |jobs: &[JobPosting]| jobs.iter().map(|j| j.id).collect::<Vec<_>>();
        assert_eq!(ids(&twice), ids(&once));
    }

    #[test]
    fn test_score_jobs_does_not_mutate_postings() {
        let jobs = vec![job("Senior Data Analyst", "Acme", 95_000.0, 105_000.0)];
        let before = serde_json::to_value(&jobs).unwrap();
        let m = matcher(Arc::new(StaticJobSearchProvider::default()));
        let scored = m.score_jobs(&jobs, &params(), &ResumeAnalysis::default());
        assert_eq!(scored.len(), 1);
        assert!(!scored[0].recommendations.is_empty());
        assert_eq!(serde_json::to_value(&jobs).unwrap(), before);
    }

    #[test]
    fn test_risk_factors() {
        let p = params();
        let mut risky = job("Data Analyst", "Tiny", 60_000.0, 130_000.0);
        risky.company_tier = CompanyTier::Startup;
        risky.glassdoor_rating = Some(2.9);
        risky.skills = SkillSet::from(vec!["java".to_string(), "go".to_string(), "rust".to_string()]);
        risky.posted_date = Some(p.searched_at - Duration::days(45));
        risky.location = "Denver, CO".to_string();

        let risks = identify_job_risk_factors(&risky, &p);
        for needle in ["Startup", "Glassdoor", "40%", "Wide salary band", "45 days", "outside your target"] {
            assert!(risks.iter().any(|r| r.contains(needle)), "missing {needle}: {risks:?}");
        }

        let safe = job("Senior Data Analyst", "Acme", 100_000.0, 110_000.0);
        assert!(identify_job_risk_factors(&safe, &p).is_empty());

        let elsewhere = SearchParameters {
            locations: vec!["LA".to_string()],
            ..params()
        };
        assert!(identify_job_risk_factors(&safe, &elsewhere)
            .iter()
            .any(|r| r.contains("outside your target")));
    }

    #[test]
    fn test_recommendations_name_missing_skills() {
        let mut posting = job("Senior Data Analyst", "Acme", 100_000.0, 110_000.0);
        posting.skills = SkillSet::from(vec!["sql".to_string(), "python".to_string()]);
        let recs = generate_job_recommendations(&posting, &params());
        assert!(recs.iter().any(|r| r.contains("Prioritize")));
        assert!(recs.iter().any(|r| r.contains("python")));
        assert!(recs.iter().any(|r| r.contains("step up")));
    }

    #[tokio::test]
    async fn test_end_to_end_ranks_and_filters() {
        let provider = StaticJobSearchProvider::new(vec![
            job("Senior Data Analyst", "Acme", 100_000.0, 110_000.0),
            job("Senior Data Analyst", "Acme", 100_000.0, 110_000.0),
            job("Data Analyst", "Beta", 90_000.0, 95_000.0),
            job("Data Analyst", "Gamma", 76_000.0, 78_000.0),
            job("Registered Nurse", "Hospital", 120_000.0, 130_000.0),
        ]);
        let report = matcher(Arc::new(provider)).find_income_advancement_jobs(&request()).await;

        let meta = &report.search_metadata;
        assert_eq!(meta.status, SearchStatus::Completed);
        assert_eq!(meta.provider, "static");
        assert_eq!(meta.unique_jobs, 3);
        assert_eq!(meta.jobs_returned, 2);
        assert!(meta.target_salary >= 86_250.0);

        let opps = &report.job_opportunities;
        assert_eq!(opps[0].rank, 1);
        assert_eq!(opps[0].job.company, "Acme");
        assert!(opps.windows(2).all(|w| w[0].overall_score >= w[1].overall_score));
        assert!(opps.iter().all(|o| o.salary_increase_percentage >= 15.0));
        assert!(!report.insights.is_empty());
        assert_eq!(report.demographic_analysis.location.as_deref(), Some("Atlanta"));
    }

    #[tokio::test]
    async fn test_failing_provider_reports_unavailable() {
        let report = matcher(Arc::new(FailingProvider)).find_income_advancement_jobs(&request()).await;
        let meta = &report.search_metadata;
        assert_eq!(meta.status, SearchStatus::Unavailable);
        assert_eq!(meta.failed_queries, meta.queries.len());
        assert!(report.job_opportunities.is_empty());
        assert!(!report.income_analysis.comparisons.is_empty());
    }

    #[tokio::test]
    async fn test_empty_provider_reports_no_results() {
        let report = matcher(Arc::new(StaticJobSearchProvider::default()))
            .find_income_advancement_jobs(&request())
            .await;
        assert_eq!(report.search_metadata.status, SearchStatus::NoResults);
        assert_eq!(report.search_metadata.average_overall_score, 0.0);
    }

    #[test]
    fn test_partial_status_when_some_queries_fail() {
        let (status, message) = search_status(4, 1, Some("timeout"), 3, 1, 0.15);
        assert_eq!(status, SearchStatus::Partial);
        assert!(message.unwrap().contains("1 of 4"));
    }
}

//! Income Comparator — places a user's income within demographic benchmarks.
//!
//! Always compares against the national and African-American national
//! medians and the fixed "25-35" age bracket. Education and metro
//! comparisons are added when those inputs resolve to a known benchmark.
//! Bad inputs shrink the comparison set; they never produce an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::income::data::{DemographicIncomeData, DemographicIncomeStore, EducationLevel, GroupBenchmarks};
use crate::income::location::{canonical_metro, normalize_location};
use crate::income::narrative::{self, GapBand};

pub const MIN_PERCENTILE: f64 = 0.1;
pub const MAX_PERCENTILE: f64 = 99.9;

/// Positive-gap percentage at which the gap half of the opportunity score saturates.
const OPPORTUNITY_GAP_SATURATION_PCT: f64 = 40.0;
const MAX_ACTION_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonGroup {
    NationalMedian,
    AfricanAmerican,
    AgeBracket,
    AfricanAmericanAge,
    EducationLevel,
    AfricanAmericanEducation,
    MetroArea,
    AfricanAmericanMetro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeComparison {
    pub comparison_group: ComparisonGroup,
    pub group_name: String,
    pub user_income: f64,
    pub median_income: f64,
    pub percentile_rank: f64,     // 0.1 – 99.9
    pub income_gap: i64,          // positive = user below benchmark
    pub gap_percentage: f64,
    pub context_message: String,
    pub motivational_insight: String,
    pub action_item: String,
    pub confidence_level: f64,    // 0.0 – 1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeAnalysisResult {
    pub user_income: f64,
    pub location: Option<String>,
    pub education_level: Option<EducationLevel>,
    pub comparisons: Vec<IncomeComparison>,
    pub overall_percentile: f64,
    pub career_opportunity_score: f64, // 0 – 100
    pub summary: String,
    pub action_plan: Vec<String>,
    pub next_steps: Vec<String>,
}

impl IncomeAnalysisResult {
    pub fn comparison(&self, group: ComparisonGroup) -> Option<&IncomeComparison> {
        self.comparisons.iter().find(|c| c.comparison_group == group)
    }

    /// Comparison with the largest positive gap, if the user trails any benchmark.
    pub fn largest_gap(&self) -> Option<&IncomeComparison> {
        self.comparisons
            .iter()
            .filter(|c| c.income_gap > 0)
            .max_by_key(|c| c.income_gap)
    }

    pub fn benchmarks_trailing(&self) -> usize {
        self.comparisons.iter().filter(|c| c.income_gap > 0).count()
    }
}

pub struct IncomeComparator {
    store: Arc<DemographicIncomeStore>,
}

impl IncomeComparator {
    pub fn new(store: Arc<DemographicIncomeStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DemographicIncomeStore {
        &self.store
    }

    pub fn analyze_income(
        &self,
        user_income: f64,
        location: Option<&str>,
        education_level: Option<EducationLevel>,
    ) -> IncomeAnalysisResult {
        let user_income = if user_income.is_finite() {
            user_income
        } else {
            warn!("Non-finite income {user_income} treated as 0");
            0.0
        };

        let store = &self.store;
        let mut comparisons = Vec::with_capacity(8);
        push_pair(
            &mut comparisons,
            &store.national,
            (ComparisonGroup::NationalMedian, ComparisonGroup::AfricanAmerican),
            user_income,
        );
        push_pair(
            &mut comparisons,
            &store.age_bracket,
            (ComparisonGroup::AgeBracket, ComparisonGroup::AfricanAmericanAge),
            user_income,
        );

        if let Some(level) = education_level {
            match store.education(level) {
                Some(benchmarks) => push_pair(
                    &mut comparisons,
                    benchmarks,
                    (ComparisonGroup::EducationLevel, ComparisonGroup::AfricanAmericanEducation),
                    user_income,
                ),
                None => debug!("No education benchmark for {level:?}, skipping"),
            }
        }

        let location = location.map(str::trim).filter(|l| !l.is_empty());
        if let Some(raw) = location {
            match canonical_metro(raw).and_then(|metro| store.metro(metro)) {
                Some(benchmarks) => push_pair(
                    &mut comparisons,
                    benchmarks,
                    (ComparisonGroup::MetroArea, ComparisonGroup::AfricanAmericanMetro),
                    user_income,
                ),
                None => debug!("No metro benchmark for location '{raw}', skipping"),
            }
        }

        let overall_percentile = round1(
            comparisons.iter().map(|c| c.percentile_rank).sum::<f64>() / comparisons.len() as f64,
        );
        let career_opportunity_score = career_opportunity_score(&comparisons, overall_percentile);

        let mut result = IncomeAnalysisResult {
            user_income,
            location: location.map(normalize_location),
            education_level,
            comparisons,
            overall_percentile,
            career_opportunity_score,
            summary: String::new(),
            action_plan: Vec::new(),
            next_steps: Vec::new(),
        };

        result.summary = narrative::summary(
            overall_percentile,
            result.benchmarks_trailing(),
            result.comparisons.len(),
            result
                .largest_gap()
                .map(|c| (c.group_name.as_str(), c.income_gap)),
        );
        result.action_plan = build_action_plan(&result.comparisons);
        result.next_steps = narrative::next_steps(
            career_opportunity_score,
            result.comparison(ComparisonGroup::MetroArea).is_some(),
            education_level.is_some(),
        );

        debug!(
            "Income analysis: income={} comparisons={} overall_percentile={} opportunity={}",
            user_income,
            result.comparisons.len(),
            result.overall_percentile,
            result.career_opportunity_score
        );

        result
    }
}

fn push_pair(
    comparisons: &mut Vec<IncomeComparison>,
    benchmarks: &GroupBenchmarks,
    groups: (ComparisonGroup, ComparisonGroup),
    user_income: f64,
) {
    comparisons.push(compare(groups.0, &benchmarks.overall, user_income));
    comparisons.push(compare(groups.1, &benchmarks.african_american, user_income));
}

fn compare(group: ComparisonGroup, data: &DemographicIncomeData, user_income: f64) -> IncomeComparison {
    let percentile_rank = calculate_percentile(user_income, data);
    let income_gap = (data.median_income - user_income).round() as i64;
    let gap_percentage = if data.median_income > 0.0 {
        round1(income_gap as f64 / data.median_income * 100.0)
    } else {
        0.0
    };
    let band = GapBand::from_gap(income_gap);

    IncomeComparison {
        comparison_group: group,
        group_name: data.group_name.clone(),
        user_income,
        median_income: data.median_income,
        percentile_rank,
        income_gap,
        gap_percentage,
        context_message: narrative::context_message(&data.group_name, percentile_rank, income_gap),
        motivational_insight: narrative::motivational_insight(band, &data.group_name, income_gap),
        action_item: narrative::action_item(band, &data.group_name),
        confidence_level: confidence_level(data.sample_size),
    }
}

/// Interpolates `income` into the benchmark distribution.
///
/// Piecewise-linear through (0, 0), (p25, 25), (median, 50), (p75, 75).
/// Above p75 the rank approaches 100 as `75 + 25 * (1 - p75 / income)`.
/// Monotonic in `income`; clamped to [0.1, 99.9].
pub fn calculate_percentile(income: f64, data: &DemographicIncomeData) -> f64 {
    let anchors = [
        (0.0, 0.0),
        (data.percentile_25, 25.0),
        (data.median_income, 50.0),
        (data.percentile_75, 75.0),
    ];

    let raw = if income <= 0.0 {
        0.0
    } else if income > data.percentile_75 {
        75.0 + 25.0 * (1.0 - data.percentile_75 / income)
    } else {
        anchors
            .windows(2)
            .find(|w| w[1].0 > w[0].0 && income <= w[1].0)
            .map(|w| {
                let ((x0, y0), (x1, y1)) = (w[0], w[1]);
                y0 + (y1 - y0) * (income - x0) / (x1 - x0)
            })
            .unwrap_or(75.0)
    };

    round1(raw).clamp(MIN_PERCENTILE, MAX_PERCENTILE)
}

/// 0–100. Above 50 only when the user trails at least one benchmark.
fn career_opportunity_score(comparisons: &[IncomeComparison], overall_percentile: f64) -> f64 {
    let trailing: Vec<&IncomeComparison> = comparisons.iter().filter(|c| c.income_gap > 0).collect();

    if trailing.is_empty() || comparisons.is_empty() {
        return round1(((100.0 - overall_percentile) / 2.0).clamp(0.0, 50.0));
    }

    let trailing_share = trailing.len() as f64 / comparisons.len() as f64;
    let mean_gap_pct =
        trailing.iter().map(|c| c.gap_percentage).sum::<f64>() / trailing.len() as f64;
    let gap_component = (mean_gap_pct / OPPORTUNITY_GAP_SATURATION_PCT).clamp(0.0, 1.0);

    round1((50.0 * trailing_share + 50.0 * gap_component).clamp(0.0, 100.0))
}

/// Largest gaps first, duplicates dropped.
fn build_action_plan(comparisons: &[IncomeComparison]) -> Vec<String> {
    let mut ordered: Vec<&IncomeComparison> = comparisons.iter().collect();
    ordered.sort_by(|a, b| b.income_gap.cmp(&a.income_gap));

    let mut plan: Vec<String> = Vec::new();
    for comparison in ordered {
        if plan.len() == MAX_ACTION_ITEMS {
            break;
        }
        if !plan.contains(&comparison.action_item) {
            plan.push(comparison.action_item.clone());
        }
    }
    plan
}

fn confidence_level(sample_size: u32) -> f64 {
    let n = sample_size as f64;
    ((n / (n + 2_000.0) * 100.0).round() / 100.0).clamp(0.5, 0.99)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

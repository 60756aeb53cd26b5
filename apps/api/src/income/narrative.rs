//! Text templates for income comparisons. Pure string building, no scoring.

/// Gap at or above this amount is reported as a large gap.
pub const LARGE_GAP_THRESHOLD: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapBand {
    Ahead,
    SmallGap,
    LargeGap,
}

impl GapBand {
    pub fn from_gap(income_gap: i64) -> Self {
        if income_gap <= 0 {
            GapBand::Ahead
        } else if income_gap >= LARGE_GAP_THRESHOLD {
            GapBand::LargeGap
        } else {
            GapBand::SmallGap
        }
    }
}

pub fn context_message(group_name: &str, percentile_rank: f64, income_gap: i64) -> String {
    if income_gap > 0 {
        format!(
            "Your income is at the {} percentile for {group_name}, {} below the median.",
            ordinal(percentile_rank),
            currency(income_gap)
        )
    } else if income_gap < 0 {
        format!(
            "Your income is at the {} percentile for {group_name}, {} above the median.",
            ordinal(percentile_rank),
            currency(-income_gap)
        )
    } else {
        format!("Your income matches the {group_name} median.")
    }
}

pub fn motivational_insight(band: GapBand, group_name: &str, income_gap: i64) -> String {
    match band {
        GapBand::LargeGap => format!(
            "Closing the {} gap with {group_name} is a realistic two-to-three year goal with a targeted move.",
            currency(income_gap)
        ),
        GapBand::SmallGap => format!(
            "You are within {} of the {group_name} median. One raise or role change closes it.",
            currency(income_gap)
        ),
        GapBand::Ahead => format!(
            "You are already out-earning the typical {group_name} worker. Protect that lead and build wealth with it."
        ),
    }
}

pub fn action_item(band: GapBand, group_name: &str) -> String {
    match band {
        GapBand::LargeGap => format!(
            "Target roles paying at least the {group_name} median and apply to three this month."
        ),
        GapBand::SmallGap => {
            "Prepare a market-rate case and request a compensation review with your manager.".to_string()
        }
        GapBand::Ahead => {
            "Automate saving the difference between your pay and the median into investments.".to_string()
        }
    }
}

pub fn summary(
    overall_percentile: f64,
    benchmarks_trailing: usize,
    benchmarks_total: usize,
    largest_gap: Option<(&str, i64)>,
) -> String {
    let position = format!(
        "Across {benchmarks_total} benchmarks your income sits around the {} percentile.",
        ordinal(overall_percentile)
    );

    match largest_gap {
        Some((group_name, gap)) if gap > 0 => format!(
            "{position} You trail {benchmarks_trailing} of them; the largest gap is {} against {group_name}.",
            currency(gap)
        ),
        _ => format!("{position} You are at or above every benchmark compared."),
    }
}

pub fn next_steps(
    career_opportunity_score: f64,
    has_location: bool,
    has_education: bool,
) -> Vec<String> {
    let mut steps = Vec::new();

    if career_opportunity_score >= 60.0 {
        steps.push("Run an income advancement job search targeting a 15%+ raise.".to_string());
        steps.push("Update your resume with quantified results before applying.".to_string());
    } else {
        steps.push("Benchmark your pay annually to keep your lead.".to_string());
    }

    if !has_location {
        steps.push("Add your metro area to compare against local pay.".to_string());
    }
    if !has_education {
        steps.push("Add your education level to compare against peers with similar credentials.".to_string());
    }

    steps.push("Review your budget to direct new income toward savings goals.".to_string());
    steps
}

/// "$12,345" with thousands separators.
pub fn currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn ordinal(percentile: f64) -> String {
    let n = percentile.round().clamp(0.0, 100.0) as u32;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_band_threshold() {
        assert_eq!(GapBand::from_gap(-500), GapBand::Ahead);
        assert_eq!(GapBand::from_gap(0), GapBand::Ahead);
        assert_eq!(GapBand::from_gap(9_999), GapBand::SmallGap);
        assert_eq!(GapBand::from_gap(10_000), GapBand::LargeGap);
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(currency(0), "$0");
        assert_eq!(currency(950), "$950");
        assert_eq!(currency(12_345), "$12,345");
        assert_eq!(currency(1_234_567), "$1,234,567");
        assert_eq!(currency(-4_000), "-$4,000");
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal(1.0), "1st");
        assert_eq!(ordinal(12.2), "12th");
        assert_eq!(ordinal(22.0), "22nd");
        assert_eq!(ordinal(43.4), "43rd");
    }

    #[test]
    fn test_context_message_direction() {
        assert!(context_message("Atlanta Metro", 40.0, 5_000).contains("below"));
        assert!(context_message("Atlanta Metro", 60.0, -5_000).contains("above"));
    }

    #[test]
    fn test_next_steps_prompt_for_missing_inputs() {
        let steps = next_steps(70.0, false, false);
        assert!(steps.iter().any(|s| s.contains("metro area")));
        assert!(steps.iter().any(|s| s.contains("education")));
        assert!(steps[0].contains("job search"));
    }
}

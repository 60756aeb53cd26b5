//! Demographic income benchmarks.
//!
//! The store is built once at startup (built-in table or a JSON file) and is
//! read-only afterwards, so it is shared behind an `Arc` without locking.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Age bracket used for every age-based comparison.
pub const AGE_BRACKET: &str = "25-35";

const DEFAULT_YEAR: u16 = 2023;
const DEFAULT_SOURCE: &str = "U.S. Census Bureau, American Community Survey 2023";

#[derive(Debug, Error)]
pub enum IncomeDataError {
    #[error("Failed to read income data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse income data file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid benchmark '{group}': {reason}")]
    Invalid { group: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    SomeCollege,
    Bachelors,
    Masters,
    Doctorate,
}

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::SomeCollege => "Some College",
            EducationLevel::Bachelors => "Bachelor's Degree",
            EducationLevel::Masters => "Master's Degree",
            EducationLevel::Doctorate => "Doctorate",
        }
    }
}

/// Income distribution summary for one demographic group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicIncomeData {
    pub group_name: String,
    pub median_income: f64,
    pub mean_income: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub sample_size: u32,
    pub year: u16,
    pub source: String,
}

impl DemographicIncomeData {
    fn validate(&self) -> Result<(), IncomeDataError> {
        let invalid = |reason: &str| IncomeDataError::Invalid {
            group: self.group_name.clone(),
            reason: reason.to_string(),
        };

        if self.percentile_25.is_nan() || self.percentile_25 <= 0.0 {
            return Err(invalid("percentile_25 must be positive"));
        }
        if self.percentile_25 > self.median_income {
            return Err(invalid("percentile_25 exceeds median_income"));
        }
        if self.median_income > self.percentile_75 {
            return Err(invalid("median_income exceeds percentile_75"));
        }
        Ok(())
    }
}

/// Overall benchmark for a dimension plus its African-American counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBenchmarks {
    pub overall: DemographicIncomeData,
    pub african_american: DemographicIncomeData,
}

impl GroupBenchmarks {
    fn validate(&self) -> Result<(), IncomeDataError> {
        self.overall.validate()?;
        self.african_american.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicIncomeStore {
    pub national: GroupBenchmarks,
    pub age_bracket: GroupBenchmarks,
    pub education: BTreeMap<EducationLevel, GroupBenchmarks>,
    /// Keyed by canonical metro name, as produced by `normalize_location`.
    pub metro_areas: BTreeMap<String, GroupBenchmarks>,
}

impl DemographicIncomeStore {
    /// Loads the store from a JSON file. A broken file is a startup error.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, IncomeDataError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let store: Self = serde_json::from_str(&raw)?;
        store.validate()?;
        info!(
            "Loaded income benchmarks from {} ({} education levels, {} metro areas)",
            path.as_ref().display(),
            store.education.len(),
            store.metro_areas.len()
        );
        Ok(store)
    }

    pub fn validate(&self) -> Result<(), IncomeDataError> {
        self.national.validate()?;
        self.age_bracket.validate()?;
        for benchmarks in self.education.values() {
            benchmarks.validate()?;
        }
        for benchmarks in self.metro_areas.values() {
            benchmarks.validate()?;
        }
        Ok(())
    }

    pub fn education(&self, level: EducationLevel) -> Option<&GroupBenchmarks> {
        self.education.get(&level)
    }

    pub fn metro(&self, canonical_name: &str) -> Option<&GroupBenchmarks> {
        self.metro_areas.get(canonical_name)
    }
}

impl Default for DemographicIncomeStore {
    /// Built-in benchmark table (full-time workers, individual earnings).
    fn default() -> Self {
        let national = GroupBenchmarks {
            overall: benchmark("National Median", 56_000.0, 74_000.0, 35_000.0, 90_000.0, 150_000),
            african_american: benchmark(
                "African American National",
                45_000.0,
                56_000.0,
                28_000.0,
                70_000.0,
                18_000,
            ),
        };

        let age_bracket = GroupBenchmarks {
            overall: benchmark(
                &format!("Ages {AGE_BRACKET}"),
                52_000.0,
                62_000.0,
                33_000.0,
                78_000.0,
                40_000,
            ),
            african_american: benchmark(
                &format!("African American Ages {AGE_BRACKET}"),
                42_000.0,
                50_000.0,
                27_000.0,
                62_000.0,
                5_200,
            ),
        };

        // (level, median, mean, p25, p75, sample) overall then African American
        let education_rows = [
            (EducationLevel::HighSchool, (40_000.0, 46_000.0, 28_000.0, 55_000.0, 38_000), (34_000.0, 39_000.0, 24_000.0, 46_000.0, 5_600)),
            (EducationLevel::SomeCollege, (46_000.0, 54_000.0, 32_000.0, 64_000.0, 31_000), (39_000.0, 45_000.0, 27_000.0, 54_000.0, 4_900)),
            (EducationLevel::Bachelors, (70_000.0, 88_000.0, 48_000.0, 100_000.0, 42_000), (58_000.0, 69_000.0, 40_000.0, 82_000.0, 4_100)),
            (EducationLevel::Masters, (86_000.0, 102_000.0, 62_000.0, 120_000.0, 19_000), (72_000.0, 83_000.0, 52_000.0, 98_000.0, 1_900)),
            (EducationLevel::Doctorate, (110_000.0, 131_000.0, 80_000.0, 150_000.0, 4_000), (92_000.0, 104_000.0, 66_000.0, 128_000.0, 420)),
        ];

        let education = education_rows
            .into_iter()
            .map(|(level, overall, aa)| {
                let label = level.label();
                (
                    level,
                    GroupBenchmarks {
                        overall: benchmark(label, overall.0, overall.1, overall.2, overall.3, overall.4),
                        african_american: benchmark(
                            &format!("African American, {label}"),
                            aa.0,
                            aa.1,
                            aa.2,
                            aa.3,
                            aa.4,
                        ),
                    },
                )
            })
            .collect();

        // (metro, overall median, African American median, overall sample, AA sample)
        let metro_rows = [
            ("Atlanta", 62_000.0, 48_000.0, 9_800, 3_100),
            ("Baltimore", 62_000.0, 48_000.0, 4_300, 1_500),
            ("Charlotte", 58_000.0, 45_000.0, 3_900, 900),
            ("Chicago", 63_000.0, 44_000.0, 13_000, 2_400),
            ("Dallas", 60_000.0, 46_000.0, 11_500, 1_700),
            ("Houston", 58_000.0, 45_000.0, 10_900, 1_800),
            ("Miami", 52_000.0, 40_000.0, 9_200, 1_600),
            ("New York City", 70_000.0, 52_000.0, 28_000, 4_200),
            ("Philadelphia", 60_000.0, 44_000.0, 9_100, 1_900),
            ("Washington DC", 82_000.0, 62_000.0, 9_700, 2_600),
        ];

        let metro_areas = metro_rows
            .into_iter()
            .map(|(metro, median, aa_median, sample, aa_sample)| {
                (
                    metro.to_string(),
                    GroupBenchmarks {
                        overall: metro_benchmark(&format!("{metro} Metro"), median, sample),
                        african_american: metro_benchmark(
                            &format!("African American, {metro} Metro"),
                            aa_median,
                            aa_sample,
                        ),
                    },
                )
            })
            .collect();

        Self {
            national,
            age_bracket,
            education,
            metro_areas,
        }
    }
}

fn benchmark(
    group_name: &str,
    median_income: f64,
    mean_income: f64,
    percentile_25: f64,
    percentile_75: f64,
    sample_size: u32,
) -> DemographicIncomeData {
    DemographicIncomeData {
        group_name: group_name.to_string(),
        median_income,
        mean_income,
        percentile_25,
        percentile_75,
        sample_size,
        year: DEFAULT_YEAR,
        source: DEFAULT_SOURCE.to_string(),
    }
}

/// Metro tables only publish medians; quartiles follow the national spread.
fn metro_benchmark(group_name: &str, median_income: f64, sample_size: u32) -> DemographicIncomeData {
    benchmark(
        group_name,
        median_income,
        (median_income * 1.25).round(),
        (median_income * 0.62).round(),
        (median_income * 1.58).round(),
        sample_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_store_is_valid() {
        let store = DemographicIncomeStore::default();
        assert!(store.validate().is_ok());
        assert_eq!(store.education.len(), 5);
        assert!(store.metro("Atlanta").is_some());
        assert!(store.metro("Washington DC").is_some());
    }

    #[test]
    fn test_quartiles_bracket_median() {
        let store = DemographicIncomeStore::default();
        for benchmarks in store.metro_areas.values() {
            let o = &benchmarks.overall;
            assert!(o.percentile_25 <= o.median_income && o.median_income <= o.percentile_75);
        }
    }

    #[test]
    fn test_validate_rejects_inverted_quartiles() {
        let mut store = DemographicIncomeStore::default();
        store.national.overall.percentile_25 = 100_000.0;
        let err = store.validate().unwrap_err();
        assert!(err.to_string().contains("National Median"));
    }

    #[test]
    fn test_store_json_round_trip_keeps_enum_keys() {
        let store = DemographicIncomeStore::default();
        let json = serde_json::to_string(&store).unwrap();
        assert!(json.contains("\"bachelors\""));
        let parsed: DemographicIncomeStore = serde_json::from_str(&json).unwrap();
        assert!(parsed.education(EducationLevel::Bachelors).is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DemographicIncomeStore::from_json_file("/nonexistent/mingus/benchmarks.json")
            .unwrap_err();
        assert!(matches!(err, IncomeDataError::Io(_)));
    }
}

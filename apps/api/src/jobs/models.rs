use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Ordinal seniority ladder: Entry < Mid < Senior < Executive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn rank(self) -> i32 {
        match self {
            ExperienceLevel::Entry => 0,
            ExperienceLevel::Mid => 1,
            ExperienceLevel::Senior => 2,
            ExperienceLevel::Executive => 3,
        }
    }

    /// One step up the ladder; Executive stays Executive.
    pub fn next(self) -> Self {
        match self {
            ExperienceLevel::Entry => ExperienceLevel::Mid,
            ExperienceLevel::Mid => ExperienceLevel::Senior,
            ExperienceLevel::Senior | ExperienceLevel::Executive => ExperienceLevel::Executive,
        }
    }

    /// Reads a seniority token out of a job title ("Senior", "Lead", "Director", ...).
    pub fn from_title(title: &str) -> Option<Self> {
        let lower = title.to_lowercase();
        let has = |tokens: &[&str]| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| tokens.contains(&word))
        };

        if has(&["director", "vp", "vice", "head", "chief"]) {
            Some(ExperienceLevel::Executive)
        } else if has(&["senior", "sr", "lead", "principal", "staff", "manager"]) {
            Some(ExperienceLevel::Senior)
        } else if has(&["junior", "jr", "intern", "entry", "trainee", "assistant"]) {
            Some(ExperienceLevel::Entry)
        } else if has(&["ii", "iii", "specialist"]) {
            Some(ExperienceLevel::Mid)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerField {
    Technology,
    DataAnalysis,
    Finance,
    Healthcare,
    Marketing,
    Sales,
    Operations,
    ProjectManagement,
    Education,
    #[default]
    General,
}

impl CareerField {
    /// Job titles searched for this field, most common first.
    pub fn title_variants(self) -> &'static [&'static str] {
        match self {
            CareerField::Technology => &["Software Engineer", "Software Developer", "Systems Engineer"],
            CareerField::DataAnalysis => &["Data Analyst", "Business Intelligence Analyst", "Data Scientist"],
            CareerField::Finance => &["Financial Analyst", "Accountant", "Finance Manager"],
            CareerField::Healthcare => &["Healthcare Administrator", "Clinical Analyst", "Health Services Manager"],
            CareerField::Marketing => &["Marketing Specialist", "Marketing Analyst", "Digital Marketing Manager"],
            CareerField::Sales => &["Account Executive", "Sales Manager", "Business Development Representative"],
            CareerField::Operations => &["Operations Analyst", "Operations Manager", "Supply Chain Analyst"],
            CareerField::ProjectManagement => &["Project Manager", "Program Manager", "Scrum Master"],
            CareerField::Education => &["Instructional Designer", "Training Specialist", "Education Program Manager"],
            CareerField::General => &["Business Analyst", "Operations Coordinator", "Administrative Manager"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    #[serde(rename = "linkedin")]
    LinkedIn,
    Indeed,
    Glassdoor,
    ZipRecruiter,
    CompanyWebsite,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyTier {
    Fortune500,
    LargeEnterprise,
    GrowthCompany,
    MidMarket,
    Startup,
    #[default]
    Unknown,
}

// ────────────────────────────────────────────────────────────────────────────
// Value objects
// ────────────────────────────────────────────────────────────────────────────

/// Pay band with `min_salary <= max_salary`. Reversed inputs are swapped,
/// both on construction and when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSalaryRange")]
pub struct SalaryRange {
    min_salary: f64,
    max_salary: f64,
}

#[derive(Deserialize)]
struct RawSalaryRange {
    min_salary: f64,
    max_salary: f64,
}

impl From<RawSalaryRange> for SalaryRange {
    fn from(raw: RawSalaryRange) -> Self {
        SalaryRange::new(raw.min_salary, raw.max_salary)
    }
}

impl SalaryRange {
    pub fn new(min_salary: f64, max_salary: f64) -> Self {
        if min_salary > max_salary {
            Self {
                min_salary: max_salary,
                max_salary: min_salary,
            }
        } else {
            Self {
                min_salary,
                max_salary,
            }
        }
    }

    pub fn min_salary(&self) -> f64 {
        self.min_salary
    }

    pub fn max_salary(&self) -> f64 {
        self.max_salary
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_salary + self.max_salary) / 2.0
    }

    pub fn range_width(&self) -> f64 {
        self.max_salary - self.min_salary
    }
}

/// Lowercased, deduplicated skill names. Serialized as a sorted list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(&skill.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SkillSet(
            iter.into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(skills: SkillSet) -> Self {
        skills.0.into_iter().collect()
    }
}

/// A job listing as returned by the search provider. Read-only to the matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub salary_range: SalaryRange,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub field: CareerField,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub remote_work: bool,
    #[serde(default)]
    pub source: JobSource,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub company_tier: CompanyTier,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub glassdoor_rating: Option<f64>,
}

//! Resume Parser — turns free-form resume text into a `ResumeAnalysis`.
//!
//! `ResumeParser` is the seam for a real parsing service. `KeywordResumeParser`
//! is the default: pure-Rust, deterministic, keyword driven. Malformed or
//! empty text produces default fields, never an error.

use serde::{Deserialize, Serialize};

use crate::income::data::EducationLevel;
use crate::jobs::models::{CareerField, ExperienceLevel};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub primary_field: CareerField,
    pub experience_level: ExperienceLevel,
    pub years_experience: Option<u32>,
    pub skills: Vec<String>,
    pub education_level: Option<EducationLevel>,
    pub current_title: Option<String>,
}

/// Carried in `AppState` as `Arc<dyn ResumeParser>`.
pub trait ResumeParser: Send + Sync {
    fn parse_resume(&self, text: &str) -> ResumeAnalysis;
}

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Keyword votes per field. The field with the most hits wins.
const FIELD_KEYWORDS: &[(CareerField, &[&str])] = &[
    (CareerField::Technology, &["software", "developer", "engineer", "programming", "backend", "frontend", "devops", "cloud"]),
    (CareerField::DataAnalysis, &["data", "analytics", "sql", "tableau", "power bi", "dashboard", "statistics", "business intelligence"]),
    (CareerField::Finance, &["finance", "financial", "accounting", "accountant", "budget", "audit", "cpa", "forecasting"]),
    (CareerField::Healthcare, &["healthcare", "clinical", "patient", "hospital", "medical", "nursing", "ehr"]),
    (CareerField::Marketing, &["marketing", "seo", "campaign", "brand", "social media", "content strategy"]),
    (CareerField::Sales, &["sales", "quota", "account executive", "pipeline", "crm", "business development"]),
    (CareerField::Operations, &["operations", "logistics", "supply chain", "inventory", "process improvement"]),
    (CareerField::ProjectManagement, &["project manager", "program manager", "pmp", "scrum", "agile", "stakeholder"]),
    (CareerField::Education, &["teacher", "curriculum", "instructional", "training", "classroom", "education"]),
];

/// Skills recognized in resume text, written in display case.
const SKILL_VOCABULARY: &[&str] = &[
    "SQL", "Python", "R", "Excel", "Tableau", "Power BI", "Java", "JavaScript", "TypeScript",
    "Rust", "Go", "C#", "AWS", "Azure", "Docker", "Kubernetes", "Git", "Salesforce",
    "HubSpot", "SEO", "Google Analytics", "QuickBooks", "SAP", "Jira", "Agile", "Scrum",
    "Machine Learning", "Statistics", "Project Management", "Budgeting", "Forecasting",
    "Financial Modeling", "Data Visualization", "Leadership", "Communication", "Negotiation",
    "Customer Service", "Epic", "HIPAA", "Supply Chain", "Lean", "Six Sigma",
];

/// Checked highest first so "Master's" beats a mentioned "bachelor's".
const EDUCATION_KEYWORDS: &[(EducationLevel, &[&str])] = &[
    (EducationLevel::Doctorate, &["ph.d", "phd", "doctorate", "doctor of"]),
    (EducationLevel::Masters, &["master's", "masters", "master of", "mba", "m.s.", "m.a."]),
    (EducationLevel::Bachelors, &["bachelor's", "bachelors", "bachelor of", "b.s.", "b.a.", "bs in", "ba in"]),
    (EducationLevel::SomeCollege, &["associate's", "associate degree", "associate of", "some college"]),
    (EducationLevel::HighSchool, &["high school", "ged"]),
];

// ────────────────────────────────────────────────────────────────────────────
// KeywordResumeParser
// ────────────────────────────────────────────────────────────────────────────

pub struct KeywordResumeParser;

impl ResumeParser for KeywordResumeParser {
    fn parse_resume(&self, text: &str) -> ResumeAnalysis {
        let lower = text.to_lowercase();
        let current_title = detect_current_title(text);
        let years_experience = detect_years_experience(&lower);

        let title_level = current_title.as_deref().and_then(ExperienceLevel::from_title);
        let years_level = years_experience.map(level_for_years);
        let experience_level = match (title_level, years_level) {
            (Some(a), Some(b)) => a.max(b),
            (Some(level), None) | (None, Some(level)) => level,
            (None, None) => ExperienceLevel::Entry,
        };

        ResumeAnalysis {
            primary_field: detect_field(&lower),
            experience_level,
            years_experience,
            skills: detect_skills(&lower),
            education_level: detect_education(&lower),
            current_title,
        }
    }
}

fn detect_field(lower: &str) -> CareerField {
    let mut best = (CareerField::General, 0usize);
    for (field, keywords) in FIELD_KEYWORDS {
        let hits: usize = keywords.iter().map(|k| lower.matches(k).count()).sum();
        // strict > keeps the earlier field on ties
        if hits > best.1 {
            best = (*field, hits);
        }
    }
    best.0
}

fn detect_skills(lower: &str) -> Vec<String> {
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| contains_word(lower, &skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

fn detect_education(lower: &str) -> Option<EducationLevel> {
    EDUCATION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_word(lower, k)))
        .map(|(level, _)| *level)
}

/// Largest "N years" / "N+ years" figure in the text, capped at 50.
fn detect_years_experience(lower: &str) -> Option<u32> {
    let words: Vec<&str> = lower.split_whitespace().collect();
    words
        .windows(2)
        .filter(|w| w[1].starts_with("year") || w[1].starts_with("yrs"))
        .filter_map(|w| w[0].trim_end_matches('+').parse::<u32>().ok())
        .filter(|years| *years <= 50)
        .max()
}

fn level_for_years(years: u32) -> ExperienceLevel {
    match years {
        0..=2 => ExperienceLevel::Entry,
        3..=6 => ExperienceLevel::Mid,
        7..=14 => ExperienceLevel::Senior,
        _ => ExperienceLevel::Executive,
    }
}

/// First short line that reads like a job title.
fn detect_current_title(text: &str) -> Option<String> {
    const TITLE_WORDS: &[&str] = &[
        "analyst", "engineer", "developer", "manager", "specialist", "coordinator",
        "accountant", "director", "associate", "consultant", "administrator", "scientist",
        "designer", "executive", "representative", "teacher", "nurse",
    ];

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.split_whitespace().count() <= 6)
        .find(|line| {
            let lower = line.to_lowercase();
            TITLE_WORDS.iter().any(|w| contains_word(&lower, w))
        })
        .map(str::to_string)
}

/// Word-boundary containment so "r" does not match inside "marketing".
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        let is_boundary = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
        is_boundary(before) && is_boundary(after)
    })
}

use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; the job search provider is disabled when
/// `JOB_SEARCH_URL` is unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub job_search_url: Option<String>,
    pub job_search_api_key: Option<String>,
    /// Replaces the built-in demographic benchmark table when set.
    pub income_data_path: Option<String>,
    pub min_salary_increase: f64,
    pub max_job_results: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let min_salary_increase: f64 = parse_env("MIN_SALARY_INCREASE", 0.15)?;
        if !(0.0..=5.0).contains(&min_salary_increase) {
            anyhow::bail!("MIN_SALARY_INCREASE must be between 0 and 5, got {min_salary_increase}");
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            job_search_url: optional_env("JOB_SEARCH_URL"),
            job_search_api_key: optional_env("JOB_SEARCH_API_KEY"),
            income_data_path: optional_env("INCOME_DATA_PATH"),
            min_salary_increase,
            max_job_results: parse_env("MAX_JOB_RESULTS", 20)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            job_search_url: None,
            job_search_api_key: None,
            income_data_path: None,
            min_salary_increase: 0.15,
            max_job_results: 20,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert!((config.min_salary_increase - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.max_job_results, 20);
        assert!(config.job_search_url.is_none());
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u16 = parse_env("MINGUS_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}

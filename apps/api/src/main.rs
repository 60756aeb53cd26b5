mod config;
mod errors;
mod income;
mod jobs;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::income::comparator::IncomeComparator;
use crate::income::data::DemographicIncomeStore;
use crate::jobs::matcher::{IntelligentJobMatcher, MatcherSettings};
use crate::jobs::scoring::ScoringWeights;
use crate::jobs::search::{HttpJobSearchProvider, JobSearchProvider, StaticJobSearchProvider};
use crate::resume::parser::KeywordResumeParser;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MINGUS API v{}", env!("CARGO_PKG_VERSION"));

    // Demographic benchmarks: built-in table unless a file overrides it
    let store = match &config.income_data_path {
        Some(path) => {
            let store = DemographicIncomeStore::from_json_file(path)?;
            info!("Loaded income benchmarks from {path}");
            store
        }
        None => DemographicIncomeStore::default(),
    };
    let income_comparator = Arc::new(IncomeComparator::new(Arc::new(store)));

    let provider: Arc<dyn JobSearchProvider> = match &config.job_search_url {
        Some(url) => {
            info!("Job search provider: {url}");
            Arc::new(HttpJobSearchProvider::new(
                url.clone(),
                config.job_search_api_key.clone(),
            )?)
        }
        None => {
            warn!("JOB_SEARCH_URL not set; job advancement searches will return no results");
            Arc::new(StaticJobSearchProvider::default())
        }
    };

    let job_matcher = Arc::new(IntelligentJobMatcher::new(
        provider,
        Arc::new(KeywordResumeParser),
        income_comparator.clone(),
        MatcherSettings {
            weights: ScoringWeights::default(),
            min_salary_increase: config.min_salary_increase,
            max_results: config.max_job_results,
        },
    ));

    let state = AppState {
        config: config.clone(),
        income_comparator,
        job_matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

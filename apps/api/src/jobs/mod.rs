pub mod handlers;
pub mod matcher;
pub mod models;
pub mod params;
pub mod report;
pub mod scoring;
pub mod search;

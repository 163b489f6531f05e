//! Shared domain records and configuration for revscope.

pub mod app_config;
pub mod config;
pub mod products;
pub mod rating;
pub mod reviews;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    PriceInfo, ProductRecord, RatingInfo, Specifications, NOT_AVAILABLE, UNKNOWN_NAME,
};
pub use rating::parse_star_rating;
pub use reviews::{AnalysisResult, ReviewCollection, ReviewRecord, SAMPLE_SIZE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

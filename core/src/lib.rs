//! Interest-over-time aggregation for a fixed set of search terms.
//!
//! The [`TrendFetcher`] queries a [`TrendsApi`] once per term over a rolling
//! 30-day [`TimeWindow`] and reshapes the timelines into a term-keyed
//! [`ResultMap`]. Entry points (the lambda and the local server) only build a
//! fetcher from [`Config`] and hand its result to [`respond`].

pub mod auth;
pub mod client;
pub mod config;
pub mod fetcher;
pub mod window;

pub use auth::{ServiceAccount, StaticToken, TokenSource};
pub use client::{GoogleTrendsClient, InterestQuery, Timeline, TimelinePoint, TrendsApi};
pub use config::{Config, Credentials};
pub use fetcher::{respond, ResultMap, TermResult, TrendFetcher, FAILURE_MESSAGE, SEARCH_TERMS};
pub use window::{TimeWindow, WINDOW_DAYS};

pub type Result<T> = std::result::Result<T, TrendError>;


#[derive(thiserror::Error, Debug)]
pub enum TrendError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

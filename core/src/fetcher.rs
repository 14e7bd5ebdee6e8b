//! Fan-out over the tracked terms and the HTTP response contract.

use std::sync::Arc;

use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::client::{GoogleTrendsClient, InterestQuery, Timeline, TrendsApi};
use crate::{auth, Config, Result, TimeWindow, TrendError};

pub const SEARCH_TERMS: [&str; 4] = [
    "buy gold",
    "bitcoin investment",
    "stock market investment",
    "real estate investment",
];

pub const GEO: &str = "US";

pub const FAILURE_MESSAGE: &str = "Failed to fetch trend data";


/// Index-aligned timeline of one term: `values[i]` was observed at `dates[i]`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct TermResult {
    pub dates: Vec<String>,
    pub values: Vec<Option<serde_json::Number>>,
}

impl From<Timeline> for TermResult {
    fn from(timeline: Timeline) -> Self {
        let (dates, values) = timeline.timeline_data
            .into_iter()
            .map(|point| {
                let value = point.first_value().cloned();
                (point.time, value)
            })
            .unzip();

        Self { dates, values }
    }
}

/// Term-keyed results, kept in the order of the configured term list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMap(Vec<(String, TermResult)>);

impl ResultMap {
    pub fn get(&self, term: &str) -> Option<&TermResult> {
        self.0.iter().find(|(t, _)| t == term).map(|(_, r)| r)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(t, _)| t.as_str())
    }

}

impl Serialize for ResultMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (term, result) in &self.0 {
            map.serialize_entry(term, result)?;
        }
        map.end()
    }
}


#[derive(Clone)]
pub struct TrendFetcher {
    api: Arc<dyn TrendsApi>,
    terms: &'static [&'static str],
}

impl TrendFetcher {
    pub fn new(api: Arc<dyn TrendsApi>) -> Self {
        Self { api, terms: &SEARCH_TERMS }
    }

    /// Builds the authenticated Google client. Fails on bad credential material.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::new();
        let tokens = auth::token_source(http.clone(), &config.credentials, &config.token_url)?;
        let api = GoogleTrendsClient::new_w_client(http, config.api_base_url.clone(), Arc::from(tokens));

        Ok(Self::new(Arc::new(api)))
    }

    /// Queries every term concurrently. The first failing term fails the whole batch.
    pub async fn fetch(&self, window: TimeWindow) -> Result<ResultMap> {
        tracing::info!(start = %window.start, end = %window.end, terms = self.terms.len(), "fetching trends");

        let requests = self.terms.iter().map(|&term| self.fetch_term(term, window));
        let results = futures::future::try_join_all(requests).await?;

        Ok(ResultMap(self.terms.iter().map(|t| t.to_string()).zip(results).collect()))
    }

    pub async fn fetch_recent(&self) -> Result<ResultMap> {
        self.fetch(TimeWindow::last_30_days()).await
    }

    /// One full invocation: fetch the last 30 days and render the response.
    pub async fn handle(&self) -> Response<String> {
        respond(self.fetch_recent().await)
    }

    async fn fetch_term(&self, term: &str, window: TimeWindow) -> Result<TermResult> {
        let query = InterestQuery {
            keyword: term.to_string(),
            start_time: window.start_param(),
            end_time: window.end_param(),
            geo: GEO.to_string(),
        };

        let timeline = self.api.interest_over_time(&query).await?;
        Ok(TermResult::from(timeline))
    }
}


/// 200 with the JSON map and open CORS, or the generic 500. The cause is only logged.
pub fn respond(result: Result<ResultMap>) -> Response<String> {
    let body = result.and_then(|map| serde_json::to_string(&map).map_err(TrendError::from));

    match body {
        Ok(body) => {
            let mut res = Response::new(body);
            let headers = res.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            res
        }
        Err(e) => {
            tracing::error!(error = %e, details = ?e, "failed to fetch trend data");

            let mut res = Response::new(serde_json::json!({ "error": FAILURE_MESSAGE }).to_string());
            *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            res
        }
    }
}

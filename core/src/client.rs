use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::TokenSource;
use crate::{Result, TrendError};

/// Parameters of one interest-over-time request.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterestQuery {
    pub keyword: String,
    pub start_time: String,
    pub end_time: String,
    pub geo: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub timeline_data: Vec<TimelinePoint>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    #[serde(default)]
    pub value: Vec<serde_json::Number>,
}

impl TimelinePoint {
    /// Only the first value channel is meaningful for single-keyword queries.
    pub fn first_value(&self) -> Option<&serde_json::Number> {
        self.value.first()
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(de)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}


/// The external interest-over-time collaborator, shared read-only across requests.
#[async_trait]
pub trait TrendsApi: Send + Sync {
    async fn interest_over_time(&self, query: &InterestQuery) -> Result<Timeline>;
}

#[derive(Clone)]
pub struct GoogleTrendsClient {
    client: reqwest::Client,
    base_url: Arc<String>,
    tokens: Arc<dyn TokenSource>,
}

impl GoogleTrendsClient {
    pub fn new_w_client(client: reqwest::Client, base_url: String, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
            tokens,
        }
    }

    pub fn new(base_url: String, tokens: Arc<dyn TokenSource>) -> Self {
        Self::new_w_client(reqwest::Client::new(), base_url, tokens)
    }
}

#[async_trait]
impl TrendsApi for GoogleTrendsClient {
    async fn interest_over_time(&self, query: &InterestQuery) -> Result<Timeline> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/interestOverTime", self.base_url);

        tracing::debug!(keyword = %query.keyword, start = %query.start_time, end = %query.end_time, "requesting interest over time");

        let res = self.client.get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TrendError::Upstream { status: status.as_u16(), body });
        }

        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice::<Timeline>(&bytes)?)
    }
}

//! REST client for the external object-graph query engine.
//!
//! Every primitive is a `POST {base}/query/{primitive}` carrying the scoped
//! identity and the translated query; the engine answers with the result
//! JSON or a non-2xx status.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use vantage_core::error::CoreError;
use vantage_core::identity::ScopedIdentity;
use vantage_core::query::{
    BookmarkQuery, CountQuery, DistributionItem, DistributionQuery, ElementPage, ListQuery,
    NumberResult, TimeSeries, TimeSeriesQuery,
};
use vantage_widgets::QueryEngine;

/// HTTP client for one query engine deployment.
pub struct HttpQueryEngine {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the query engine REST layer.
#[derive(Debug, thiserror::Error)]
pub enum QueryEngineError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code.
    #[error("Query engine error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

impl From<QueryEngineError> for CoreError {
    fn from(err: QueryEngineError) -> Self {
        CoreError::Upstream(err.to_string())
    }
}

#[derive(Serialize)]
struct QueryEnvelope<'a, Q: Serialize> {
    identity: &'a ScopedIdentity,
    query: &'a Q,
}

impl HttpQueryEngine {
    /// * `api_url` - Base HTTP URL without trailing slash, e.g. `http://host:9200`.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, QueryEngineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    async fn call<Q, R>(
        &self,
        primitive: &str,
        identity: &ScopedIdentity,
        query: &Q,
    ) -> Result<R, QueryEngineError>
    where
        Q: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/query/{}", self.api_url, primitive))
            .json(&QueryEnvelope { identity, query })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<R>().await?)
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, QueryEngineError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(QueryEngineError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl QueryEngine for HttpQueryEngine {
    async fn stix_core_objects_number(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
    ) -> Result<NumberResult, CoreError> {
        Ok(self.call("stixCoreObjectsNumber", identity, query).await?)
    }

    async fn stix_relationships_number(
        &self,
        identity: &ScopedIdentity,
        query: &CountQuery,
    ) -> Result<NumberResult, CoreError> {
        Ok(self.call("stixRelationshipsNumber", identity, query).await?)
    }

    async fn stix_core_objects_distribution(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        Ok(self.call("stixCoreObjectsDistribution", identity, query).await?)
    }

    async fn stix_core_objects_distribution_by_entity(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        Ok(self
            .call("stixCoreObjectsDistributionByEntity", identity, query)
            .await?)
    }

    async fn stix_relationships_distribution(
        &self,
        identity: &ScopedIdentity,
        query: &DistributionQuery,
    ) -> Result<Vec<DistributionItem>, CoreError> {
        Ok(self
            .call("stixRelationshipsDistribution", identity, query)
            .await?)
    }

    async fn stix_core_objects_multi_time_series(
        &self,
        identity: &ScopedIdentity,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<TimeSeries>, CoreError> {
        Ok(self
            .call("stixCoreObjectsMultiTimeSeries", identity, query)
            .await?)
    }

    async fn stix_relationships_multi_time_series(
        &self,
        identity: &ScopedIdentity,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<TimeSeries>, CoreError> {
        Ok(self
            .call("stixRelationshipsMultiTimeSeries", identity, query)
            .await?)
    }

    async fn stix_core_objects(
        &self,
        identity: &ScopedIdentity,
        query: &ListQuery,
    ) -> Result<ElementPage, CoreError> {
        Ok(self.call("stixCoreObjects", identity, query).await?)
    }

    async fn stix_relationships(
        &self,
        identity: &ScopedIdentity,
        query: &ListQuery,
    ) -> Result<ElementPage, CoreError> {
        Ok(self.call("stixRelationships", identity, query).await?)
    }

    async fn bookmarks(
        &self,
        identity: &ScopedIdentity,
        query: &BookmarkQuery,
    ) -> Result<ElementPage, CoreError> {
        Ok(self.call("bookmarks", identity, query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_engine_is_an_upstream_failure() {
        // Port 9 (discard) on loopback refuses connections in test sandboxes.
        let engine =
            HttpQueryEngine::new("http://127.0.0.1:9".to_string(), Duration::from_secs(2))
                .unwrap();
        let identity =
            ScopedIdentity::build(1, "k", &[], &Default::default(), &Default::default());

        let err = engine
            .stix_core_objects_number(&identity, &CountQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Upstream(_)));
    }
}

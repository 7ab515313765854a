//! HTTP JSON client for the billing platform's query actions
//!
//! Posts ZOQL statements to `action/query`, follows `action/queryMore`
//! pages, and decodes the records. The session token is issued by the
//! platform's login call, which happens outside this crate.

use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use zpricing_core::{
    config::ApiConfig, models::QueryRecord, traits::QueryService, AppError, AppResult,
};

use crate::statement::ZoqlQuery;
use crate::types::{decode_records, QueryMoreRequest, QueryRequest, QueryResponse};

/// Client for the billing platform's query endpoint
pub struct HttpQueryClient {
    http_client: Client,
    base_url: String,
    session_token: String,
    timeout_ms: u64,
    max_pages: u32,
}

impl std::fmt::Debug for HttpQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpQueryClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl HttpQueryClient {
    /// Create a new query client
    ///
    /// # Arguments
    ///
    /// * `base_url` - REST root (e.g. "https://apisandbox.zuora.com/rest/v1")
    /// * `session_token` - token returned by the platform's login
    /// * `timeout_ms` - per-request timeout in milliseconds
    /// * `max_pages` - upper bound on pages followed for one statement
    pub fn new(
        base_url: &str,
        session_token: &str,
        timeout_ms: u64,
        max_pages: u32,
    ) -> AppResult<Self> {
        if session_token.trim().is_empty() {
            return Err(AppError::Config("session token is empty".to_string()));
        }

        let http_client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: session_token.to_string(),
            timeout_ms,
            max_pages: max_pages.max(1),
        })
    }

    /// Create a client from the `api` configuration section
    pub fn from_config(config: &ApiConfig) -> AppResult<Self> {
        let token = config
            .session_token
            .as_deref()
            .ok_or_else(|| AppError::Config("api.session_token not set".to_string()))?;

        Self::new(&config.base_url, token, config.timeout_ms, config.max_pages)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/action/{}", self.base_url, action)
    }

    fn authorization(&self) -> String {
        format!("ZSession {}", self.session_token)
    }

    /// POST one action and decode the query envelope
    #[instrument(skip(self, body))]
    async fn post_action<T>(&self, action: &str, body: &T) -> AppResult<QueryResponse>
    where
        T: Serialize + std::fmt::Debug,
    {
        let response = self
            .http_client
            .post(self.action_url(action))
            .header(header::AUTHORIZATION, self.authorization())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_ms)
                } else {
                    AppError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Query endpoint HTTP error: status={}", status);
            return Err(AppError::Http(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            AppError::Serialization(format!("Failed to read response body: {}", e))
        })?;

        debug!("Query response: {}", body);

        let envelope: QueryResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::Serialization(format!("Failed to parse JSON: {} - Body: {}", e, body))
        })?;

        if let Some(fault) = envelope.fault() {
            error!("Query fault: {}", fault);
            return Err(fault);
        }

        Ok(envelope)
    }
}

#[async_trait]
impl QueryService for HttpQueryClient {
    #[instrument(skip(self))]
    async fn query(&self, statement: &str) -> AppResult<Vec<QueryRecord>> {
        let object = ZoqlQuery::parse_simple(statement).map(|q| q.object().to_string());

        let mut page = self
            .post_action(
                "query",
                &QueryRequest {
                    query_string: statement.to_string(),
                },
            )
            .await?;

        let expected = page.size;
        let mut raw = std::mem::take(&mut page.records);
        let mut pages = 1;

        while let Some(locator) = page.next_locator().map(str::to_string) {
            if pages >= self.max_pages {
                error!(
                    "Query still incomplete after {} pages: {}",
                    pages, statement
                );
                return Err(AppError::Query(format!(
                    "result exceeds {} pages",
                    self.max_pages
                )));
            }

            page = self
                .post_action(
                    "queryMore",
                    &QueryMoreRequest {
                        query_locator: locator,
                    },
                )
                .await?;
            raw.append(&mut page.records);
            pages += 1;
        }

        if raw.len() != expected {
            warn!(
                "Query reported size {} but returned {} records",
                expected,
                raw.len()
            );
        }

        decode_records(raw, object.as_deref())
    }
}

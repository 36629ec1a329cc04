//! # API Client
//!
//! Typed access to the backend's timeline and request-log endpoints.

use std::time::Duration;

use reqwest::{Client as HttpClient, Url};

use crate::config::ConsoleConfig;
use crate::history::ChangeRecord;
use crate::observability::{Event, Logger};

use super::cursor::{PageSource, TimelinePage};
use super::envelope::{Envelope, Pagination};
use super::errors::{ClientError, ClientResult};
use super::request_log::{RequestLogDetail, RequestStats};

const TIMELINE_PATH: &str = "private/api/timeline";
const REQUEST_LOGS_PATH: &str = "private/api/requests/logs";
const REQUEST_STATS_PATH: &str = "private/api/requests/stats";

/// Client for the CMS backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    token: Option<String>,
    http: HttpClient,
}

impl ApiClient {
    /// Build a client from configuration
    pub fn new(config: &ConsoleConfig) -> ClientResult<Self> {
        let base_url = parse_base_url(&config.api_base_url)?;
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            token: config.token.clone(),
            http,
        })
    }

    /// One page of a resource's timeline, ordered by sequence
    pub async fn timeline_page(
        &self,
        resource_name: &str,
        resource_id: &str,
        limit: u32,
        page: u32,
    ) -> ClientResult<TimelinePage> {
        let limit_str = limit.to_string();
        let page_str = page.to_string();
        Logger::info(
            Event::TimelineFetch.as_str(),
            &[
                ("limit", limit_str.as_str()),
                ("page", page_str.as_str()),
                ("resource_id", resource_id),
                ("resource_name", resource_name),
            ],
        );

        let envelope = self
            .get(
                TIMELINE_PATH,
                &[
                    ("resource_id", resource_id),
                    ("resource_name", resource_name),
                    ("limit", limit_str.as_str()),
                    ("page", page_str.as_str()),
                    ("order", "id"),
                ],
            )
            .await?;

        let pagination = envelope.pagination.unwrap_or(Pagination {
            total: 0,
            page,
            limit,
        });
        let records: Vec<ChangeRecord> = envelope.into_data()?;

        let loaded_page = pagination.page.to_string();
        let loaded_records = records.len().to_string();
        let total = pagination.total.to_string();
        Logger::info(
            Event::TimelinePageLoaded.as_str(),
            &[
                ("page", loaded_page.as_str()),
                ("records", loaded_records.as_str()),
                ("total", total.as_str()),
            ],
        );

        Ok(TimelinePage {
            records,
            pagination,
        })
    }

    /// A request log entry with the history entries it produced
    pub async fn request_log(&self, request_id: &str) -> ClientResult<RequestLogDetail> {
        Logger::info(Event::RequestLogFetch.as_str(), &[("request_id", request_id)]);

        let path = format!("{}/{}", REQUEST_LOGS_PATH, request_id);
        self.get(&path, &[]).await?.into_data()
    }

    /// Request statistics for the last day
    pub async fn request_stats(&self) -> ClientResult<RequestStats> {
        Logger::info(Event::StatsFetch.as_str(), &[]);
        self.get(REQUEST_STATS_PATH, &[]).await?.into_data()
    }

    /// Page source over one resource's timeline
    pub fn timeline<'a>(&'a self, resource_name: &'a str, resource_id: &'a str) -> ResourceTimeline<'a> {
        ResourceTimeline {
            client: self,
            resource_name,
            resource_id,
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<Envelope> {
        let url = self.base_url.join(path).map_err(|e| ClientError::InvalidBaseUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })?;

        let mut request = self.http.get(url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = Envelope::from_body(&body)
                .ok()
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            Logger::warn(
                Event::BackendError.as_str(),
                &[
                    ("message", message.as_str()),
                    ("path", path),
                    ("status", status.as_str()),
                ],
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Envelope::from_body(&body)
    }
}

/// Timeline endpoint bound to one resource
#[derive(Debug, Clone, Copy)]
pub struct ResourceTimeline<'a> {
    client: &'a ApiClient,
    resource_name: &'a str,
    resource_id: &'a str,
}

impl PageSource for ResourceTimeline<'_> {
    async fn fetch_page(&self, page: u32, limit: u32) -> ClientResult<TimelinePage> {
        self.client
            .timeline_page(self.resource_name, self.resource_id, limit, page)
            .await
    }
}

/// Parse the base URL, making sure relative joins keep its path.
fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

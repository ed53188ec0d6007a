//! Paginated event fetcher for the FDSN `query` endpoint.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::models::{BoundingBox, EventFeature};

/// FDSN offsets are 1-based
const FIRST_OFFSET: usize = 1;

/// Time window and envelope of one event search
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub start_time: String,
    pub end_time: String,
    pub bbox: BoundingBox,
    /// Page size
    pub limit: usize,
}

impl EventQuery {
    /// Query string parameters for the page starting at `offset`
    pub fn params(&self, offset: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", "geojson".to_string()),
            ("starttime", self.start_time.clone()),
            ("endtime", self.end_time.clone()),
        ];
        params.extend(self.bbox.query_params());
        params.push(("orderby", "time-asc".to_string()));
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", offset.to_string()));
        params
    }
}

#[derive(Debug, Deserialize)]
struct EventPage {
    #[serde(default)]
    features: Vec<EventFeature>,
}

/// Fetches event pages from the USGS service
pub struct UsgsClient {
    client: Client,
    endpoint: Url,
}

impl UsgsClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|source| FetchError::Endpoint {
            url: config.endpoint.clone(),
            source,
        })?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for one page
    pub fn page_url(&self, query: &EventQuery, offset: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(query.params(offset).iter().map(|(k, v)| (*k, v.as_str())));
        url
    }

    /// Fetch a single page of events
    pub async fn fetch_page(
        &self,
        query: &EventQuery,
        offset: usize,
    ) -> Result<Vec<EventFeature>, FetchError> {
        let url = self.page_url(query, offset);
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                offset,
                body,
            });
        }

        let page: EventPage = response.json().await?;
        Ok(page.features)
    }

    /// Fetch every page of the query, in service order
    pub async fn fetch_all(&self, query: &EventQuery) -> Result<Vec<EventFeature>, FetchError> {
        info!(
            "Fetching events from {} to {} within {}",
            query.start_time, query.end_time, query.bbox
        );

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));

        let result = collect_pages(query.limit, |offset| {
            let pb = pb.clone();
            async move {
                pb.set_message(format!("fetching offset {}", offset));
                let batch = self.fetch_page(query, offset).await?;
                pb.set_message(format!("fetched {} events at offset {}", batch.len(), offset));
                Ok::<_, FetchError>(batch)
            }
        })
        .await;

        pb.finish_and_clear();
        let events = result?;
        info!("Fetched {} events in total", events.len());
        Ok(events)
    }
}

/// Drive a paged source until it returns a page shorter than `limit`.
///
/// `fetch` receives the 1-based offset of each page.
pub async fn collect_pages<T, E, F, Fut>(limit: usize, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut all = Vec::new();
    let mut offset = FIRST_OFFSET;

    loop {
        let batch = fetch(offset).await?;
        let batch_len = batch.len();
        all.extend(batch);

        info!("Fetched {} events (total so far: {})", batch_len, all.len());

        if batch_len < limit {
            break;
        }
        offset += limit;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> EventQuery {
        EventQuery {
            start_time: "2025-03-28".to_string(),
            end_time: "2025-06-01T00:00:00".to_string(),
            bbox: BoundingBox::new(-67.3, -65.2, 17.9, 18.5),
            limit: 20_000,
        }
    }

    #[test]
    fn test_query_params() {
        let params = query().params(20_001);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("format"), Some("geojson"));
        assert_eq!(get("starttime"), Some("2025-03-28"));
        assert_eq!(get("endtime"), Some("2025-06-01T00:00:00"));
        assert_eq!(get("minlongitude"), Some("-67.300000"));
        assert_eq!(get("maxlongitude"), Some("-65.200000"));
        assert_eq!(get("minlatitude"), Some("17.900000"));
        assert_eq!(get("maxlatitude"), Some("18.500000"));
        assert_eq!(get("orderby"), Some("time-asc"));
        assert_eq!(get("limit"), Some("20000"));
        assert_eq!(get("offset"), Some("20001"));
    }

    #[test]
    fn test_page_url() {
        let client = UsgsClient::new(&FetchConfig::default()).unwrap();
        let url = client.page_url(&query(), 1);
        assert_eq!(url.host_str(), Some("earthquake.usgs.gov"));
        assert_eq!(url.path(), "/fdsnws/event/1/query");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("starttime".to_string(), "2025-03-28".to_string())));
        assert!(pairs.contains(&("endtime".to_string(), "2025-06-01T00:00:00".to_string())));
        assert!(pairs.contains(&("offset".to_string(), "1".to_string())));
    }

    #[test]
    fn test_bad_endpoint() {
        let config = FetchConfig {
            endpoint: "not a url".to_string(),
            ..FetchConfig::default()
        };
        assert!(matches!(
            UsgsClient::new(&config),
            Err(FetchError::Endpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_short_page() {
        let mut offsets = Vec::new();
        let pages: Result<Vec<u32>, ()> = collect_pages(3, |offset| {
            offsets.push(offset);
            let batch = match offset {
                1 => vec![1, 2, 3],
                4 => vec![4, 5, 6],
                7 => vec![7],
                _ => vec![],
            };
            async move { Ok(batch) }
        })
        .await;

        assert_eq!(pages.unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(offsets, vec![1, 4, 7]);
    }

    #[tokio::test]
    async fn test_collect_pages_exact_multiple_needs_empty_page() {
        let mut calls = 0;
        let pages: Result<Vec<u32>, ()> = collect_pages(2, |offset| {
            calls += 1;
            let batch = if offset < 5 { vec![0, 0] } else { vec![] };
            async move { Ok(batch) }
        })
        .await;

        assert_eq!(pages.unwrap().len(), 4);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_error() {
        let pages: Result<Vec<u32>, &str> = collect_pages(1, |offset| async move {
            if offset == 1 {
                Ok(vec![1])
            } else {
                Err("boom")
            }
        })
        .await;
        assert_eq!(pages, Err("boom"));
    }
}

use std::time::Duration;

use geo::{GeoPoint, ResolvedAddress};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::GeoSourceError;
use crate::source::{BoxFuture, GeoSource, Suggestion};

const SOURCE_ID: &str = "nominatim";
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Public OpenStreetMap geocoding fallback.
///
/// `GET {base}/search?format=json&q=...&limit=N`. The service requires an
/// identifying `User-Agent`; coordinates arrive as strings. An optional
/// minimum interval between requests spaces calls out client-side
/// (off by default, matching the fixed-debounce-only behavior upstream).
pub struct NominatimSource {
    base_url: String,
    user_agent: String,
    client: reqwest::Client,
    request_timeout: Duration,
    min_interval: Option<Duration>,
    last_request: Mutex<Option<Instant>>,
}

#[derive(Deserialize)]
struct SearchItem {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    place_id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
}

impl NominatimSource {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            client: reqwest::Client::new(),
            request_timeout,
            min_interval: None,
            last_request: Mutex::new(None),
        }
    }

    /// Enable client-side spacing between consecutive requests.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = Some(min_interval);
        self
    }

    async fn throttle(&self) {
        let Some(min_interval) = self.min_interval else {
            return;
        };
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, GeoSourceError> {
        self.throttle().await;

        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(GeoSourceError::network)?;

        if !resp.status().is_success() {
            return Err(GeoSourceError::Network(format!(
                "nominatim returned {}",
                resp.status()
            )));
        }

        let items: Vec<SearchItem> = resp.json().await.map_err(GeoSourceError::network)?;
        let mut out = Vec::new();
        for item in items {
            let (Ok(lat), Ok(lng)) = (item.lat.parse::<f64>(), item.lon.parse::<f64>()) else {
                continue;
            };
            let point = GeoPoint::new(lat, lng);
            if !point.is_valid() {
                continue;
            }
            let formatted = item.display_name.unwrap_or_else(|| query.to_string());
            let mut address = ResolvedAddress::new(point, formatted, SOURCE_ID);
            if let Some(id) = item.place_id {
                address = address.with_external_id(id.to_string());
            }
            out.push(Suggestion {
                address,
                name: item.name,
            });
        }
        Ok(out)
    }
}

impl GeoSource for NominatimSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn resolve(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> BoxFuture<'_, Result<ResolvedAddress, GeoSourceError>> {
        let query = query.to_owned();
        let cancel = cancel.clone();
        Box::pin(async move {
            let fut = async {
                let mut matches = self.search(&query, 1).await?;
                match matches.drain(..).next() {
                    Some(suggestion) => Ok(suggestion.address),
                    None => Err(GeoSourceError::NotFound),
                }
            };
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(GeoSourceError::Cancelled),
                out = fut => out,
            }
        })
    }

    fn suggest(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> BoxFuture<'_, Result<Vec<Suggestion>, GeoSourceError>> {
        let query = query.to_owned();
        let cancel = cancel.clone();
        Box::pin(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(GeoSourceError::Cancelled),
                out = self.search(&query, limit) => out,
            }
        })
    }
}

use std::time::Duration;

use geo::{GeoPoint, ResolvedAddress};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::GeoSourceError;
use crate::source::{BoxFuture, GeoSource, Suggestion};

const SOURCE_ID: &str = "backend";

/// First-party geocoding proxy.
///
/// `POST {base}/api/geocode` with `{"address": ...}` for resolution and
/// `GET {base}/api/autocomplete?q=...` for suggestions.
pub struct BackendSource {
    base_url: String,
    client: reqwest::Client,
    request_timeout: Duration,
}

#[derive(Serialize)]
struct GeocodeRequest<'a> {
    address: &'a str,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    lat: Option<f64>,
    lng: Option<f64>,
    formatted_address: Option<String>,
    #[serde(default)]
    place_id: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct AutocompleteItem {
    lat: Option<f64>,
    lng: Option<f64>,
    formatted_address: Option<String>,
    #[serde(default)]
    place_id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
}

/// Place ids arrive as strings or numbers depending on the upstream
/// provider behind the proxy.
fn external_id(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

impl BackendSource {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            request_timeout,
        }
    }

    async fn fetch_geocode(&self, query: &str) -> Result<ResolvedAddress, GeoSourceError> {
        let url = format!("{}/api/geocode", self.base_url);
        let resp = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&GeocodeRequest { address: query })
            .send()
            .await
            .map_err(GeoSourceError::network)?;

        if !resp.status().is_success() {
            return Err(GeoSourceError::Network(format!(
                "backend geocode returned {}",
                resp.status()
            )));
        }

        let body: GeocodeResponse = resp.json().await.map_err(GeoSourceError::network)?;
        let (Some(lat), Some(lng)) = (body.lat, body.lng) else {
            return Err(GeoSourceError::NotFound);
        };
        let point = GeoPoint::new(lat, lng);
        if !point.is_valid() {
            return Err(GeoSourceError::NotFound);
        }

        let formatted = body
            .formatted_address
            .unwrap_or_else(|| query.to_string());
        let mut resolved = ResolvedAddress::new(point, formatted, SOURCE_ID);
        if let Some(id) = external_id(body.place_id) {
            resolved = resolved.with_external_id(id);
        }
        Ok(resolved)
    }

    async fn fetch_suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, GeoSourceError> {
        let url = format!("{}/api/autocomplete", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(GeoSourceError::network)?;

        if !resp.status().is_success() {
            return Err(GeoSourceError::Network(format!(
                "backend autocomplete returned {}",
                resp.status()
            )));
        }

        let items: Vec<AutocompleteItem> = resp.json().await.map_err(GeoSourceError::network)?;
        let mut out = Vec::new();
        for item in items {
            if out.len() >= limit {
                break;
            }
            let (Some(lat), Some(lng)) = (item.lat, item.lng) else {
                continue;
            };
            let point = GeoPoint::new(lat, lng);
            if !point.is_valid() {
                continue;
            }
            let formatted = item
                .formatted_address
                .unwrap_or_else(|| query.to_string());
            let mut address = ResolvedAddress::new(point, formatted, SOURCE_ID);
            if let Some(id) = external_id(item.place_id) {
                address = address.with_external_id(id);
            }
            out.push(Suggestion {
                address,
                name: item.name,
            });
        }
        Ok(out)
    }
}

impl GeoSource for BackendSource {
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
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(GeoSourceError::Cancelled),
                out = self.fetch_geocode(&query) => out,
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
                out = self.fetch_suggestions(&query, limit) => out,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::external_id;
    use serde_json::json;

    #[test]
    fn external_id_accepts_strings_and_numbers() {
        assert_eq!(external_id(Some(json!("abc"))), Some("abc".to_string()));
        assert_eq!(external_id(Some(json!(42))), Some("42".to_string()));
        assert_eq!(external_id(Some(json!(""))), None);
        assert_eq!(external_id(Some(json!(null))), None);
        assert_eq!(external_id(None), None);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let src = super::BackendSource::new(
            "http://localhost:8000/",
            std::time::Duration::from_secs(5),
        );
        assert_eq!(src.base_url, "http://localhost:8000");
    }
}

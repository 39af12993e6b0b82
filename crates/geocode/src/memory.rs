use std::collections::HashMap;
use std::time::Duration;

use geo::ResolvedAddress;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::GeoSourceError;
use crate::source::{BoxFuture, GeoSource, Suggestion};

/// In-memory geocoding source for tests and offline development.
///
/// Records every query it receives so tests can assert call order and
/// counts; failures and artificial latency are scripted per instance.
pub struct MemorySource {
    id: String,
    entries: Mutex<HashMap<String, ResolvedAddress>>,
    fail_with: Mutex<Option<GeoSourceError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Mutex::new(HashMap::new()),
            fail_with: Mutex::new(None),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn insert(&self, query: impl Into<String>, address: ResolvedAddress) {
        self.entries.lock().await.insert(query.into(), address);
    }

    /// Make every subsequent call fail with `err`.
    pub async fn fail_with(&self, err: GeoSourceError) {
        *self.fail_with.lock().await = Some(err);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn lookup(&self, query: &str) -> Result<Option<ResolvedAddress>, GeoSourceError> {
        self.calls.lock().await.push(query.to_string());
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if let Some(err) = self.fail_with.lock().await.clone() {
            return Err(err);
        }
        Ok(self.entries.lock().await.get(query).cloned())
    }
}

impl GeoSource for MemorySource {
    fn id(&self) -> &str {
        &self.id
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
                match self.lookup(&query).await? {
                    Some(address) => Ok(address),
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
        _limit: usize,
        cancel: &CancellationToken,
    ) -> BoxFuture<'_, Result<Vec<Suggestion>, GeoSourceError>> {
        let query = query.to_owned();
        let cancel = cancel.clone();
        Box::pin(async move {
            let fut = async {
                let hit = self.lookup(&query).await?;
                Ok(hit
                    .map(|address| {
                        vec![Suggestion {
                            address,
                            name: None,
                        }]
                    })
                    .unwrap_or_default())
            };
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(GeoSourceError::Cancelled),
                out = fut => out,
            }
        })
    }
}

use std::sync::Arc;

use geo::ResolvedAddress;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::error::GeoSourceError;
use crate::source::{GeoSource, Suggestion};

/// All configured sources were exhausted without a match.
///
/// Carries the last source error so callers can distinguish "address
/// does not exist" from "every provider was unreachable".
#[derive(Debug, Clone, Error)]
#[error("all geocoding sources failed: {last}")]
pub struct ResolutionFailed {
    pub last: GeoSourceError,
}

/// Ordered-fallback resolution over interchangeable geocoding sources.
///
/// Sources are tried in the order given; the first success wins. A source
/// error (including timeout) is logged and the next source is tried.
/// There are no per-source retries: re-querying the same failing provider
/// rarely helps for geocoding failures, so retrying belongs to the caller.
pub struct AddressResolver {
    sources: Vec<Arc<dyn GeoSource>>,
}

impl AddressResolver {
    pub fn new(sources: Vec<Arc<dyn GeoSource>>) -> Self {
        Self { sources }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Resolve a final-form address, e.g. on form submission.
    ///
    /// Each call is an independent single flight; concurrent submissions
    /// are not deduplicated.
    pub async fn resolve_address(&self, query: &str) -> Result<ResolvedAddress, ResolutionFailed> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolutionFailed {
                last: GeoSourceError::NotFound,
            });
        }

        let cancel = CancellationToken::new();
        let mut last = GeoSourceError::NotFound;
        for source in &self.sources {
            match source.resolve(query, &cancel).await {
                Ok(resolved) => return Ok(resolved),
                Err(err) => {
                    tracing::warn!(
                        source = source.id(),
                        error = %err,
                        "geocoding source failed, trying next"
                    );
                    last = err;
                }
            }
        }
        Err(ResolutionFailed { last })
    }

    /// Suggestion lookup with the same priority order.
    ///
    /// A source returning an empty list falls through to the next one;
    /// all-empty yields an empty list, never an error. Only cancellation
    /// propagates, so a superseded caller stops immediately.
    pub async fn suggest(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Suggestion>, GeoSourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        for source in &self.sources {
            match source.suggest(query, limit, cancel).await {
                Ok(items) if !items.is_empty() => return Ok(items),
                Ok(_) => continue,
                Err(GeoSourceError::Cancelled) => return Err(GeoSourceError::Cancelled),
                Err(err) => {
                    tracing::debug!(
                        source = source.id(),
                        error = %err,
                        "suggestion source failed, trying next"
                    );
                }
            }
        }
        Ok(Vec::new())
    }
}

use std::future::Future;
use std::pin::Pin;

use geo::ResolvedAddress;
use tokio_util::sync::CancellationToken;

use crate::error::GeoSourceError;

/// Type alias for a boxed future that can be sent between tasks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One autocomplete candidate from a suggestion source.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub address: ResolvedAddress,
    /// Short display name for the place, when the provider has one.
    pub name: Option<String>,
}

/// A single geocoding provider.
///
/// Implementations must be `Send + Sync` for use across async tasks and
/// return boxed futures for dyn-compatibility. Sources are interchangeable
/// variants selected by priority order, never by type-specific logic.
///
/// Cancelling via the token must abort the request at the transport, not
/// merely ignore its eventual result, so at most one completed callback
/// exists per query generation.
pub trait GeoSource: Send + Sync {
    /// Stable identifier used in logs and on `ResolvedAddress::source_id`.
    fn id(&self) -> &str;

    /// Resolve a free-text address to a single best match.
    fn resolve(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> BoxFuture<'_, Result<ResolvedAddress, GeoSourceError>>;

    /// Return up to `limit` live suggestions for a partial query.
    ///
    /// An empty list is a valid answer, not an error.
    fn suggest(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> BoxFuture<'_, Result<Vec<Suggestion>, GeoSourceError>>;
}

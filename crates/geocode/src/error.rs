use thiserror::Error;

/// Failure taxonomy for a single geocoding source call.
///
/// `Cancelled` marks supersession by a newer request and is always
/// swallowed internally; it is never a user-facing failure.
#[derive(Debug, Clone, Error)]
pub enum GeoSourceError {
    /// The provider answered but had no match for the query.
    #[error("no geocoding match for query")]
    NotFound,
    /// Transport failure or timeout talking to the provider.
    #[error("geocoding transport failure: {0}")]
    Network(String),
    /// The request was superseded and aborted at the transport.
    #[error("geocoding request cancelled")]
    Cancelled,
}

impl GeoSourceError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GeoSourceError::Cancelled)
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        GeoSourceError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::GeoSourceError;

    #[test]
    fn cancelled_is_distinguishable() {
        assert!(GeoSourceError::Cancelled.is_cancelled());
        assert!(!GeoSourceError::NotFound.is_cancelled());
        assert!(!GeoSourceError::Network("timeout".into()).is_cancelled());
    }
}

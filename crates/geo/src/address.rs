use crate::point::GeoPoint;

/// A geocoded address as produced by a resolution source.
///
/// Consumed, never mutated: the coordinate is handed back to the
/// donation layer for storage and flows into marker lists as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    pub point: GeoPoint,
    /// Provider's canonical rendering of the address.
    pub formatted_address: String,
    /// Which source produced this result (e.g. "backend", "nominatim").
    pub source_id: String,
    /// Provider-specific place identifier, when one exists.
    pub external_id: Option<String>,
}

impl ResolvedAddress {
    pub fn new(
        point: GeoPoint,
        formatted_address: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            point,
            formatted_address: formatted_address.into(),
            source_id: source_id.into(),
            external_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

use geo::GeoPoint;

/// Surface-assigned identity of a rendered marker.
///
/// Valid only for the surface that issued it, and only until the marker
/// is removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// One mappable location.
///
/// `id` is stable per logical location and is what reconciliation diffs
/// against; the point may be invalid (an unresolved address), in which
/// case the renderer skips the marker rather than failing the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub point: GeoPoint,
    pub label: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

impl Marker {
    pub fn new(id: impl Into<String>, point: GeoPoint, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            point,
            label: label.into(),
            description: None,
            address: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Text body bound to a marker's popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

impl PopupContent {
    /// `None` when the marker carries no text at all; such markers get no
    /// popup bound.
    pub fn from_marker(marker: &Marker) -> Option<Self> {
        let has_text = !marker.label.is_empty()
            || marker.description.as_deref().is_some_and(|s| !s.is_empty())
            || marker.address.as_deref().is_some_and(|s| !s.is_empty());
        if !has_text {
            return None;
        }
        Some(Self {
            title: marker.label.clone(),
            description: marker.description.clone(),
            address: marker.address.clone(),
        })
    }
}

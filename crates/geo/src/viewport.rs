use crate::point::GeoPoint;

/// World-default view used before any marker has fixed the viewport, and
/// as the fallback for degenerate marker sets.
pub const WORLD_DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 20.5937,
    lng: 78.9629,
};
pub const WORLD_DEFAULT_ZOOM: u8 = 5;

/// Zoom applied when centering on a single resolved location.
pub const FOCUS_ZOOM: u8 = 15;

/// Visible map state: center point plus zoom level.
///
/// Derived from the marker set on every reconciliation unless the caller
/// supplies an explicit override.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapViewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl MapViewport {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self { center, zoom }
    }

    pub fn world_default() -> Self {
        Self::new(WORLD_DEFAULT_CENTER, WORLD_DEFAULT_ZOOM)
    }
}

use std::time::Duration;

use geo::{GeoBounds, GeoPoint};

use crate::marker::{Marker, MarkerHandle, PopupContent};

/// Base tile/background layer, attached exactly once per surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

/// Imperative drawing surface a `MapRenderer` drives.
///
/// Implementations adapt a concrete map widget; `MemorySurface` records
/// every call for tests. The renderer is the sole caller: no other
/// component mutates a surface once it is handed over.
pub trait MapSurface: Send {
    fn add_tile_layer(&mut self, layer: &TileLayer);
    fn remove_tile_layer(&mut self);
    fn add_marker(&mut self, marker: &Marker) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn bind_popup(&mut self, handle: MarkerHandle, content: &PopupContent);
    /// Open the popup bound to `handle` after `delay`, once layout has
    /// settled. A surface without a popup bound at `handle` ignores this.
    fn open_popup_after(&mut self, handle: MarkerHandle, delay: Duration);
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32);
    /// Release all native rendering resources. Terminal: no further calls
    /// are made after this.
    fn destroy(&mut self);
}

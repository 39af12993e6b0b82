use std::sync::Arc;
use std::time::Duration;

use geo::{GeoBounds, GeoPoint};
use parking_lot::Mutex;

use crate::marker::{Marker, MarkerHandle, PopupContent};
use crate::surface::{MapSurface, TileLayer};

/// One recorded surface mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AddTileLayer(TileLayer),
    RemoveTileLayer,
    AddMarker {
        handle: MarkerHandle,
        id: String,
        point: GeoPoint,
    },
    RemoveMarker(MarkerHandle),
    BindPopup {
        handle: MarkerHandle,
        title: String,
    },
    OpenPopupAfter {
        handle: MarkerHandle,
        delay: Duration,
    },
    SetView {
        center: GeoPoint,
        zoom: u8,
    },
    FitBounds {
        bounds: GeoBounds,
        padding_px: u32,
    },
    Destroy,
}

/// Recording surface for tests and offline development.
///
/// Keeps the full operation log plus derived state (live markers, tile
/// layer count, last viewport) so tests assert outcomes without replaying
/// the log by hand.
#[derive(Default)]
pub struct MemorySurface {
    ops: Vec<SurfaceOp>,
    next_handle: u64,
    live: Vec<MarkerHandle>,
    tile_layers: usize,
    destroyed: bool,
    last_view: Option<(GeoPoint, u8)>,
    last_fit: Option<(GeoBounds, u32)>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn live_marker_count(&self) -> usize {
        self.live.len()
    }

    pub fn tile_layer_count(&self) -> usize {
        self.tile_layers
    }

    pub fn destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn last_view(&self) -> Option<(GeoPoint, u8)> {
        self.last_view
    }

    pub fn last_fit(&self) -> Option<(GeoBounds, u32)> {
        self.last_fit
    }

    pub fn popup_open_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::OpenPopupAfter { .. }))
            .count()
    }
}

impl MapSurface for MemorySurface {
    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.tile_layers += 1;
        self.ops.push(SurfaceOp::AddTileLayer(layer.clone()));
    }

    fn remove_tile_layer(&mut self) {
        self.tile_layers = self.tile_layers.saturating_sub(1);
        self.ops.push(SurfaceOp::RemoveTileLayer);
    }

    fn add_marker(&mut self, marker: &Marker) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.live.push(handle);
        self.ops.push(SurfaceOp::AddMarker {
            handle,
            id: marker.id.clone(),
            point: marker.point,
        });
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.live.retain(|h| *h != handle);
        self.ops.push(SurfaceOp::RemoveMarker(handle));
    }

    fn bind_popup(&mut self, handle: MarkerHandle, content: &PopupContent) {
        self.ops.push(SurfaceOp::BindPopup {
            handle,
            title: content.title.clone(),
        });
    }

    fn open_popup_after(&mut self, handle: MarkerHandle, delay: Duration) {
        self.ops.push(SurfaceOp::OpenPopupAfter { handle, delay });
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.last_view = Some((center, zoom));
        self.ops.push(SurfaceOp::SetView { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
        self.last_fit = Some((bounds, padding_px));
        self.ops.push(SurfaceOp::FitBounds { bounds, padding_px });
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.ops.push(SurfaceOp::Destroy);
    }
}

/// Clonable handle over one shared `MemorySurface`.
///
/// Lets a test keep inspecting the surface after handing a boxed clone to
/// a renderer.
#[derive(Clone, Default)]
pub struct SharedMemorySurface(Arc<Mutex<MemorySurface>>);

impl SharedMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&MemorySurface) -> R) -> R {
        f(&self.0.lock())
    }

    pub fn live_marker_count(&self) -> usize {
        self.0.lock().live_marker_count()
    }

    pub fn tile_layer_count(&self) -> usize {
        self.0.lock().tile_layer_count()
    }

    pub fn destroyed(&self) -> bool {
        self.0.lock().destroyed()
    }

    pub fn last_view(&self) -> Option<(GeoPoint, u8)> {
        self.0.lock().last_view()
    }

    pub fn last_fit(&self) -> Option<(GeoBounds, u32)> {
        self.0.lock().last_fit()
    }

    pub fn popup_open_count(&self) -> usize {
        self.0.lock().popup_open_count()
    }
}

impl MapSurface for SharedMemorySurface {
    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.0.lock().add_tile_layer(layer);
    }

    fn remove_tile_layer(&mut self) {
        self.0.lock().remove_tile_layer();
    }

    fn add_marker(&mut self, marker: &Marker) -> MarkerHandle {
        self.0.lock().add_marker(marker)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.0.lock().remove_marker(handle);
    }

    fn bind_popup(&mut self, handle: MarkerHandle, content: &PopupContent) {
        self.0.lock().bind_popup(handle, content);
    }

    fn open_popup_after(&mut self, handle: MarkerHandle, delay: Duration) {
        self.0.lock().open_popup_after(handle, delay);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.0.lock().set_view(center, zoom);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
        self.0.lock().fit_bounds(bounds, padding_px);
    }

    fn destroy(&mut self) {
        self.0.lock().destroy();
    }
}

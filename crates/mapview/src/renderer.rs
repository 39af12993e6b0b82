use std::time::Duration;

use geo::{FOCUS_ZOOM, GeoPoint, MapViewport, WORLD_DEFAULT_CENTER, WORLD_DEFAULT_ZOOM};

use crate::marker::{Marker, MarkerHandle, PopupContent};
use crate::surface::{MapSurface, TileLayer};
use crate::viewport::{ViewportPlan, plan_viewport};

/// Tile source, viewport constants and timing for one renderer.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub tile_url_template: String,
    pub tile_attribution: String,
    pub tile_max_zoom: u8,
    pub focus_zoom: u8,
    pub world_center: GeoPoint,
    pub world_zoom: u8,
    pub fit_padding_px: u32,
    /// Delay before auto-opening a single marker's popup, letting the
    /// surface finish laying out.
    pub popup_open_delay: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "&copy; OpenStreetMap contributors".to_string(),
            tile_max_zoom: 19,
            focus_zoom: FOCUS_ZOOM,
            world_center: WORLD_DEFAULT_CENTER,
            world_zoom: WORLD_DEFAULT_ZOOM,
            fit_padding_px: 20,
            popup_open_delay: Duration::from_millis(300),
        }
    }
}

impl RenderConfig {
    fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url_template.clone(),
            attribution: self.tile_attribution.clone(),
            max_zoom: self.tile_max_zoom,
        }
    }
}

/// Owns one map surface and reconciles it against successive marker lists.
///
/// Reconciliation is full replace: every tracked marker is removed, then
/// the new set is added. Cheap at this list size; incremental diffing is
/// a possible future change if lists grow. The tile layer is attached once
/// per surface lifetime, and disposal is unconditional.
pub struct MapRenderer {
    surface: Box<dyn MapSurface>,
    config: RenderConfig,
    tracked: Vec<MarkerHandle>,
    tile_layer_attached: bool,
    viewport_set: bool,
    disposed: bool,
}

impl MapRenderer {
    pub fn new(surface: Box<dyn MapSurface>, config: RenderConfig) -> Self {
        Self {
            surface,
            config,
            tracked: Vec::new(),
            tile_layer_attached: false,
            viewport_set: false,
            disposed: false,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.tracked.len()
    }

    /// Reconcile the surface to show exactly `markers`.
    ///
    /// Markers with an invalid point are skipped, never an error. The
    /// viewport follows the marker set unless `viewport` overrides it.
    pub fn render(&mut self, markers: &[Marker], viewport: Option<MapViewport>) {
        if self.disposed {
            tracing::warn!("render on a disposed map renderer ignored");
            return;
        }

        if !self.tile_layer_attached {
            self.surface.add_tile_layer(&self.config.tile_layer());
            self.tile_layer_attached = true;
        }

        for handle in self.tracked.drain(..) {
            self.surface.remove_marker(handle);
        }

        let mut points = Vec::new();
        let mut sole: Option<(MarkerHandle, bool)> = None;
        for marker in markers {
            if !marker.point.is_valid() {
                tracing::debug!(marker = %marker.id, "skipping marker with invalid point");
                continue;
            }
            let handle = self.surface.add_marker(marker);
            let popup = PopupContent::from_marker(marker);
            if let Some(content) = &popup {
                self.surface.bind_popup(handle, content);
            }
            if self.tracked.is_empty() {
                sole = Some((handle, popup.is_some()));
            }
            self.tracked.push(handle);
            points.push(marker.point);
        }

        match viewport {
            Some(v) => {
                self.surface.set_view(v.center, v.zoom);
                self.viewport_set = true;
            }
            None => match plan_viewport(&points, &self.config, self.viewport_set) {
                ViewportPlan::Keep => {}
                ViewportPlan::Center { center, zoom } => {
                    self.surface.set_view(center, zoom);
                    self.viewport_set = true;
                }
                ViewportPlan::Fit { bounds, padding_px } => {
                    self.surface.fit_bounds(bounds, padding_px);
                    self.viewport_set = true;
                }
            },
        }

        // Multi-marker sets never auto-open popups.
        if self.tracked.len() == 1 {
            if let Some((handle, true)) = sole {
                self.surface
                    .open_popup_after(handle, self.config.popup_open_delay);
            }
        }
    }

    /// Tear the surface down. Runs even if nothing was ever rendered;
    /// further renders are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for handle in self.tracked.drain(..) {
            self.surface.remove_marker(handle);
        }
        if self.tile_layer_attached {
            self.surface.remove_tile_layer();
            self.tile_layer_attached = false;
        }
        self.surface.destroy();
    }
}

impl Drop for MapRenderer {
    fn drop(&mut self) {
        self.dispose();
    }
}

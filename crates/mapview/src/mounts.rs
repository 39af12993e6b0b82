use std::collections::HashMap;
use std::collections::hash_map::Entry;

use geo::MapViewport;

use crate::marker::Marker;
use crate::renderer::{MapRenderer, RenderConfig};
use crate::surface::MapSurface;

/// Where a map should be rendered: a stable mount identity plus optional
/// sizing hint for the surface factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub id: String,
    pub height_px: Option<u32>,
}

impl MountSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            height_px: None,
        }
    }

    pub fn with_height_px(mut self, height_px: u32) -> Self {
        self.height_px = Some(height_px);
        self
    }
}

/// Creates a fresh surface for a mount the registry has not seen before.
pub type SurfaceFactory = Box<dyn Fn(&MountSpec) -> Box<dyn MapSurface> + Send + Sync>;

/// One renderer per logical mount id.
///
/// Rendering an id the registry already tracks reconciles the existing
/// surface; exactly one surface is created per mount and disposed exactly
/// once on dismount.
pub struct MountRegistry {
    factory: SurfaceFactory,
    config: RenderConfig,
    mounts: HashMap<String, MapRenderer>,
}

impl MountRegistry {
    pub fn new(factory: SurfaceFactory, config: RenderConfig) -> Self {
        Self {
            factory,
            config,
            mounts: HashMap::new(),
        }
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.mounts.contains_key(id)
    }

    pub fn render(&mut self, spec: &MountSpec, markers: &[Marker], viewport: Option<MapViewport>) {
        let renderer = match self.mounts.entry(spec.id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(mount = %spec.id, "creating map surface");
                entry.insert(MapRenderer::new((self.factory)(spec), self.config.clone()))
            }
        };
        renderer.render(markers, viewport);
    }

    /// Dispose the mount's surface. Returns false for an unknown id.
    pub fn dismount(&mut self, id: &str) -> bool {
        match self.mounts.remove(id) {
            Some(mut renderer) => {
                renderer.dispose();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MountRegistry, MountSpec};
    use crate::marker::Marker;
    use crate::memory_surface::SharedMemorySurface;
    use crate::renderer::RenderConfig;
    use geo::GeoPoint;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn registry() -> (MountRegistry, Arc<Mutex<Vec<SharedMemorySurface>>>) {
        let created: Arc<Mutex<Vec<SharedMemorySurface>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&created);
        let registry = MountRegistry::new(
            Box::new(move |_spec| {
                let surface = SharedMemorySurface::new();
                log.lock().push(surface.clone());
                Box::new(surface)
            }),
            RenderConfig::default(),
        );
        (registry, created)
    }

    fn marker(id: &str) -> Marker {
        Marker::new(id, GeoPoint::new(12.97, 77.59), "Cooked meals")
    }

    #[test]
    fn same_mount_reuses_its_surface() {
        let (mut registry, created) = registry();
        let spec = MountSpec::new("donation-map");

        registry.render(&spec, &[marker("d1")], None);
        registry.render(&spec, &[marker("d1"), marker("d2")], None);

        assert_eq!(created.lock().len(), 1);
        assert_eq!(registry.mount_count(), 1);
    }

    #[test]
    fn distinct_mounts_get_distinct_surfaces() {
        let (mut registry, created) = registry();
        registry.render(&MountSpec::new("donor-map"), &[marker("d1")], None);
        registry.render(&MountSpec::new("browse-map"), &[marker("d2")], None);

        assert_eq!(created.lock().len(), 2);
        assert_eq!(registry.mount_count(), 2);
    }

    #[test]
    fn dismount_disposes_exactly_once() {
        let (mut registry, created) = registry();
        let spec = MountSpec::new("donation-map");
        registry.render(&spec, &[marker("d1")], None);

        assert!(registry.dismount("donation-map"));
        assert!(!registry.dismount("donation-map"));

        let surfaces = created.lock();
        assert!(surfaces[0].destroyed());
        assert_eq!(surfaces[0].live_marker_count(), 0);
    }
}

use std::sync::Arc;

use anchor::{AnchorHost, AnchorSynchronizer};
use autocomplete::{AutocompleteConfig, AutocompleteController};
use geo::{MapViewport, ResolvedAddress};
use geocode::{
    AddressResolver, BackendSource, GeoSource, NominatimSource, ResolutionFailed, Suggestion,
};
use mapview::{Marker, MountRegistry, MountSpec, SurfaceFactory};
use parking_lot::Mutex;

use crate::config::LocationConfig;

/// One handle a dashboard holds for everything location-related.
///
/// Owns the resolver, the map mounts and the current anchor attempt.
/// Autocomplete controllers are handed out per input and own their own
/// timers. At most one anchor attempt runs at a time: starting a new one
/// cancels its predecessor, so a stale target is never scrolled to.
pub struct LocationContext {
    config: LocationConfig,
    resolver: Arc<AddressResolver>,
    mounts: Mutex<MountRegistry>,
    anchor_host: Arc<dyn AnchorHost>,
    anchor_attempt: Mutex<Option<AnchorSynchronizer>>,
}

impl LocationContext {
    /// Wire sources in priority order from the config: the first-party
    /// backend when configured, then the public fallback.
    pub fn new(
        config: LocationConfig,
        surface_factory: SurfaceFactory,
        anchor_host: Arc<dyn AnchorHost>,
    ) -> Self {
        let mut sources: Vec<Arc<dyn GeoSource>> = Vec::new();
        if let Some(base_url) = &config.backend_api_url {
            sources.push(Arc::new(BackendSource::new(
                base_url.clone(),
                config.request_timeout,
            )));
        }
        let mut nominatim = NominatimSource::new(
            config.nominatim_url.clone(),
            config.user_agent.clone(),
            config.request_timeout,
        );
        if let Some(min_interval) = config.nominatim_min_interval {
            nominatim = nominatim.with_min_interval(min_interval);
        }
        sources.push(Arc::new(nominatim));

        let resolver = Arc::new(AddressResolver::new(sources));
        Self::with_resolver(config, resolver, surface_factory, anchor_host)
    }

    /// Same wiring with an injected resolver, for tests and offline use.
    pub fn with_resolver(
        config: LocationConfig,
        resolver: Arc<AddressResolver>,
        surface_factory: SurfaceFactory,
        anchor_host: Arc<dyn AnchorHost>,
    ) -> Self {
        let mounts = Mutex::new(MountRegistry::new(surface_factory, config.render.clone()));
        Self {
            config,
            resolver,
            mounts,
            anchor_host,
            anchor_attempt: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &LocationConfig {
        &self.config
    }

    pub fn source_count(&self) -> usize {
        self.resolver.source_count()
    }

    /// Final-form resolution, e.g. on donation submission. The caller
    /// offers a degraded path (save without coordinates) on failure.
    pub async fn resolve_address(&self, query: &str) -> Result<ResolvedAddress, ResolutionFailed> {
        self.resolver.resolve_address(query).await
    }

    /// Bind live suggestions to one text input. Dropping the returned
    /// controller detaches it and cancels anything pending.
    pub fn attach_autocomplete(
        &self,
        on_select: impl Fn(Vec<Suggestion>) + Send + Sync + 'static,
    ) -> AutocompleteController {
        let config = AutocompleteConfig {
            debounce: self.config.debounce,
            min_query_len: self.config.min_query_len,
            suggest_limit: self.config.suggest_limit,
        };
        AutocompleteController::new(config, Arc::clone(&self.resolver), on_select)
    }

    /// Reconcile the mount's map to show `markers`.
    pub fn render_map(
        &self,
        spec: &MountSpec,
        markers: &[Marker],
        viewport: Option<MapViewport>,
    ) {
        self.mounts.lock().render(spec, markers, viewport);
    }

    pub fn dismount(&self, id: &str) -> bool {
        self.mounts.lock().dismount(id)
    }

    pub fn mount_count(&self) -> usize {
        self.mounts.lock().mount_count()
    }

    /// Start scrolling toward `target` once it exists in the rendered
    /// output. Replaces and cancels any attempt already running.
    pub fn sync_anchor(&self, target: impl Into<String>) {
        let target = target.into();
        tracing::debug!(target_id = %target, "starting anchor attempt");
        let attempt = AnchorSynchronizer::spawn(
            Arc::clone(&self.anchor_host),
            target,
            self.config.anchor.clone(),
        );
        // Dropping the previous attempt cancels it.
        *self.anchor_attempt.lock() = Some(attempt);
    }

    pub fn cancel_anchor(&self) {
        *self.anchor_attempt.lock() = None;
    }

    pub fn anchor_target(&self) -> Option<String> {
        self.anchor_attempt
            .lock()
            .as_ref()
            .map(|a| a.target().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::LocationContext;
    use crate::config::LocationConfig;
    use anchor::{AnchorHost, BoxFuture};
    use geo::{GeoPoint, ResolvedAddress};
    use geocode::{AddressResolver, MemorySource};
    use mapview::{Marker, MountSpec, SharedMemorySurface};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    struct IdleHost;

    impl AnchorHost for IdleHost {
        fn locate(&self, _target_id: &str) -> bool {
            false
        }

        fn scroll_into_view(&self, _target_id: &str) {}

        fn next_frame(&self) -> BoxFuture<'_, ()> {
            Box::pin(tokio::time::sleep(Duration::from_millis(16)))
        }
    }

    fn context_with(
        source: Arc<MemorySource>,
    ) -> (LocationContext, Arc<Mutex<Vec<SharedMemorySurface>>>) {
        let created: Arc<Mutex<Vec<SharedMemorySurface>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&created);
        let context = LocationContext::with_resolver(
            LocationConfig::default(),
            Arc::new(AddressResolver::new(vec![source])),
            Box::new(move |_spec| {
                let surface = SharedMemorySurface::new();
                log.lock().push(surface.clone());
                Box::new(surface)
            }),
            Arc::new(IdleHost),
        );
        (context, created)
    }

    #[tokio::test]
    async fn backend_url_adds_a_priority_source() {
        let with_backend = LocationContext::new(
            LocationConfig {
                backend_api_url: Some("http://localhost:8000".to_string()),
                ..LocationConfig::default()
            },
            Box::new(|_spec| Box::new(SharedMemorySurface::new())),
            Arc::new(IdleHost),
        );
        assert_eq!(with_backend.source_count(), 2);

        let fallback_only = LocationContext::new(
            LocationConfig::default(),
            Box::new(|_spec| Box::new(SharedMemorySurface::new())),
            Arc::new(IdleHost),
        );
        assert_eq!(fallback_only.source_count(), 1);
    }

    #[tokio::test]
    async fn resolve_then_render_flows_a_point_onto_the_map() {
        let source = Arc::new(MemorySource::new("mem"));
        source
            .insert(
                "MG Road, Bengaluru",
                ResolvedAddress::new(GeoPoint::new(12.97, 77.59), "MG Road, Bengaluru", "mem"),
            )
            .await;
        let (context, created) = context_with(source);

        let resolved = context.resolve_address("MG Road, Bengaluru").await.unwrap();
        let marker = Marker::new("d1", resolved.point, "Cooked meals")
            .with_address(resolved.formatted_address.clone());
        context.render_map(&MountSpec::new("donation-map"), &[marker], None);

        let surfaces = created.lock();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].live_marker_count(), 1);
        assert!(context.dismount("donation-map"));
        assert!(surfaces[0].destroyed());
    }

    #[tokio::test(start_paused = true)]
    async fn new_anchor_attempt_replaces_the_previous_target() {
        let source = Arc::new(MemorySource::new("mem"));
        let (context, _created) = context_with(source);

        context.sync_anchor("donor-map");
        assert_eq!(context.anchor_target().as_deref(), Some("donor-map"));

        context.sync_anchor("browse-map");
        assert_eq!(context.anchor_target().as_deref(), Some("browse-map"));

        context.cancel_anchor();
        assert!(context.anchor_target().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn attached_autocomplete_uses_the_shared_resolver() {
        let source = Arc::new(MemorySource::new("mem"));
        source
            .insert(
                "cafe",
                ResolvedAddress::new(GeoPoint::new(12.97, 77.59), "Cafe, Bengaluru", "mem"),
            )
            .await;
        let (context, _created) = context_with(source.clone());

        let delivered: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&delivered);
        let controller = context.attach_autocomplete(move |items| log.lock().push(items.len()));

        controller.on_input("cafe");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(source.calls().await, vec!["cafe"]);
        assert_eq!(delivered.lock().as_slice(), &[1]);
    }
}

use std::sync::Arc;
use std::time::Duration;

use geocode::{AddressResolver, Suggestion};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::state::{AutocompleteState, Effect};

/// Timing and sizing knobs for one bound input.
#[derive(Debug, Clone)]
pub struct AutocompleteConfig {
    /// Trailing-edge debounce after the last keystroke.
    pub debounce: Duration,
    /// Queries shorter than this never reach a source.
    pub min_query_len: usize,
    /// Upper bound on suggestions delivered per query.
    pub suggest_limit: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_len: 3,
            suggest_limit: 5,
        }
    }
}

type SuggestionSink = Arc<dyn Fn(Vec<Suggestion>) + Send + Sync>;

/// Binds the debounce machine to real timers and a resolver.
///
/// `on_input` is cheap and non-blocking: it advances the machine and, if
/// a query is due, spawns a task that sleeps out the debounce window,
/// issues the query, and delivers the result through the sink. Superseded
/// tasks are cancelled at the transport and their responses dropped.
///
/// Must be used from within a tokio runtime.
pub struct AutocompleteController {
    inner: Arc<Inner>,
}

struct Inner {
    config: AutocompleteConfig,
    resolver: Arc<AddressResolver>,
    sink: SuggestionSink,
    state: Mutex<AutocompleteState>,
    flight: Mutex<Option<CancellationToken>>,
}

impl AutocompleteController {
    pub fn new(
        config: AutocompleteConfig,
        resolver: Arc<AddressResolver>,
        sink: impl Fn(Vec<Suggestion>) + Send + Sync + 'static,
    ) -> Self {
        let state = AutocompleteState::new(config.min_query_len);
        Self {
            inner: Arc::new(Inner {
                config,
                resolver,
                sink: Arc::new(sink),
                state: Mutex::new(state),
                flight: Mutex::new(None),
            }),
        }
    }

    /// Feed the current full text of the input after a keystroke.
    ///
    /// Input below the minimum length cancels anything pending without a
    /// callback; the caller's suggestion list is left as it was.
    pub fn on_input(&self, text: &str) {
        let (effects, generation) = {
            let mut state = self.inner.state.lock();
            let effects = state.on_input(text);
            (effects, state.generation())
        };

        let mut armed = false;
        for effect in effects {
            match effect {
                Effect::DisarmTimer | Effect::AbortFlight { .. } => {
                    if let Some(token) = self.inner.flight.lock().take() {
                        token.cancel();
                    }
                }
                Effect::ArmTimer => armed = true,
                Effect::IssueQuery { .. } => {}
            }
        }

        if !armed {
            return;
        }

        let token = CancellationToken::new();
        *self.inner.flight.lock() = Some(token.clone());
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_flight(token, generation).await;
        });
    }

    /// Cancel any armed timer or in-flight query without clearing the
    /// caller's suggestion list, e.g. when a suggestion was selected.
    pub fn cancel(&self) {
        if let Some(token) = self.inner.flight.lock().take() {
            token.cancel();
        }
    }
}

impl Inner {
    /// One debounce-then-query flight. `generation` is the machine's
    /// generation when this flight was armed: the timer event carries it
    /// so a flight whose cancellation raced a newer keystroke can never
    /// consume that keystroke's pending query.
    async fn run_flight(self: Arc<Self>, token: CancellationToken, generation: u64) {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(self.config.debounce) => {}
        }

        let Some(Effect::IssueQuery { query, .. }) = self.state.lock().on_timer(generation) else {
            return;
        };

        let out = self
            .resolver
            .suggest(&query, self.config.suggest_limit, &token)
            .await;

        if !self.state.lock().on_response(generation) {
            return;
        }

        match out {
            Ok(items) => (self.sink)(items),
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                tracing::debug!(error = %err, "suggestion query failed");
                (self.sink)(Vec::new());
            }
        }
    }
}

impl Drop for AutocompleteController {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::{AutocompleteConfig, AutocompleteController};
    use geo::{GeoPoint, ResolvedAddress};
    use geocode::{AddressResolver, MemorySource, Suggestion};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn harness(
        source: Arc<MemorySource>,
    ) -> (AutocompleteController, Arc<Mutex<Vec<Vec<Suggestion>>>>) {
        let resolver = Arc::new(AddressResolver::new(vec![source]));
        let delivered: Arc<Mutex<Vec<Vec<Suggestion>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_log = Arc::clone(&delivered);
        let controller = AutocompleteController::new(
            AutocompleteConfig::default(),
            resolver,
            move |items| sink_log.lock().push(items),
        );
        (controller, delivered)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_query_for_the_final_text() {
        let source = Arc::new(MemorySource::new("mem"));
        source
            .insert(
                "cafe",
                ResolvedAddress::new(GeoPoint::new(12.97, 77.59), "Cafe, Bengaluru", "mem"),
            )
            .await;
        let (controller, delivered) = harness(source.clone());

        controller.on_input("caf");
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.on_input("cafe");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(source.calls().await, vec!["cafe"]);
        let log = delivered.lock();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].len(), 1);
        assert_eq!(log[0][0].address.formatted_address, "Cafe, Bengaluru");
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_neither_queries_nor_calls_back() {
        let source = Arc::new(MemorySource::new("mem"));
        let (controller, delivered) = harness(source.clone());

        controller.on_input("ca");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(source.call_count().await, 0);
        assert!(delivered.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_mid_flight_drops_the_stale_response() {
        // Slow source: the first query is still in flight when the second
        // keystroke lands, so its response must never be delivered.
        let source = Arc::new(MemorySource::new("mem").with_delay(Duration::from_millis(300)));
        source
            .insert(
                "cafe",
                ResolvedAddress::new(GeoPoint::new(12.97, 77.59), "Cafe", "mem"),
            )
            .await;
        source
            .insert(
                "cafes",
                ResolvedAddress::new(GeoPoint::new(28.61, 77.21), "Cafes", "mem"),
            )
            .await;
        let (controller, delivered) = harness(source.clone());

        controller.on_input("cafe");
        tokio::time::sleep(Duration::from_millis(550)).await;
        // First query in flight now.
        controller.on_input("cafes");
        tokio::time::sleep(Duration::from_secs(2)).await;

        let log = delivered.lock();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0][0].address.formatted_address, "Cafes");
    }

    #[tokio::test(start_paused = true)]
    async fn no_match_delivers_an_empty_list() {
        let source = Arc::new(MemorySource::new("mem"));
        let (controller, delivered) = harness(source.clone());

        controller.on_input("nowhere");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(source.call_count().await, 1);
        let log = delivered.lock();
        assert_eq!(log.as_slice(), &[Vec::new()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_pending_query_silently() {
        let source = Arc::new(MemorySource::new("mem"));
        let (controller, delivered) = harness(source.clone());

        controller.on_input("cafe");
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(source.call_count().await, 0);
        assert!(delivered.lock().is_empty());
    }
}

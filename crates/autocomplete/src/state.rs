/// Controller phase for one bound input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No pending timer, no pending request.
    Idle,
    /// Trailing-edge debounce timer armed; each keystroke rearms it.
    Debouncing,
    /// A request carrying the current generation is in flight.
    Querying,
}

/// Side effects the driver must execute after feeding an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// (Re)arm the debounce timer.
    ArmTimer,
    /// Cancel the armed timer.
    DisarmTimer,
    /// Abort the in-flight request for `generation` at the transport.
    AbortFlight { generation: u64 },
    /// Issue the query, tagging the request with `generation`.
    IssueQuery { query: String, generation: u64 },
}

/// Debounce/cancel state machine for autocomplete input.
///
/// Pure and synchronous: callers feed keystroke/timer/response events and
/// execute the returned effects. The generation counter is the staleness
/// guard: it advances on every keystroke, and only a response carrying
/// the current generation is ever applied, regardless of arrival order.
#[derive(Debug)]
pub struct AutocompleteState {
    phase: Phase,
    generation: u64,
    min_query_len: usize,
    pending: Option<String>,
}

impl AutocompleteState {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            min_query_len,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Feed one keystroke. Supersedes any armed timer or in-flight
    /// request; queries below the minimum length return to `Idle`.
    pub fn on_input(&mut self, text: &str) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.phase {
            Phase::Debouncing => effects.push(Effect::DisarmTimer),
            Phase::Querying => effects.push(Effect::AbortFlight {
                generation: self.generation,
            }),
            Phase::Idle => {}
        }

        self.generation += 1;
        let query = text.trim();
        if query.chars().count() < self.min_query_len {
            self.phase = Phase::Idle;
            self.pending = None;
            return effects;
        }

        self.pending = Some(query.to_string());
        self.phase = Phase::Debouncing;
        effects.push(Effect::ArmTimer);
        effects
    }

    /// The debounce timer armed for `flight_generation` fired.
    ///
    /// Yields nothing unless that generation is still current: a timer
    /// whose cancellation was not yet observed when a newer keystroke
    /// landed must not consume the newer keystroke's pending query.
    pub fn on_timer(&mut self, flight_generation: u64) -> Option<Effect> {
        if self.phase != Phase::Debouncing || flight_generation != self.generation {
            return None;
        }
        let query = self.pending.take()?;
        self.phase = Phase::Querying;
        Some(Effect::IssueQuery {
            query,
            generation: self.generation,
        })
    }

    /// A response for `generation` arrived (success or failure).
    ///
    /// Returns true when it matches the current in-flight generation and
    /// its result may be delivered; stale responses return false and are
    /// discarded silently.
    pub fn on_response(&mut self, generation: u64) -> bool {
        if self.phase == Phase::Querying && generation == self.generation {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }
}

use std::time::Duration;

/// Timing and retry bounds for one scroll-to-target attempt.
#[derive(Debug, Clone)]
pub struct AnchorConfig {
    /// Delay before the first presence check.
    pub initial_delay: Duration,
    /// Interval between presence checks while polling.
    pub poll_interval: Duration,
    /// Presence checks after the initial one before giving up.
    pub max_attempts: u32,
    /// Frame boundaries to wait after the target appears, letting layout
    /// settle before scrolling.
    pub settle_frames: u32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(50),
            poll_interval: Duration::from_millis(50),
            max_attempts: 10,
            settle_frames: 2,
        }
    }
}

/// Terminal result of one attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnchorOutcome {
    Scrolled,
    /// The target never appeared within the attempt bound. Not an error.
    Abandoned,
    Cancelled,
}

/// What the driver must do next after feeding an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// Sleep for the given duration, then report a presence check.
    ScheduleTimer(Duration),
    /// Wait one frame boundary, then report it.
    RequestFrame,
    /// Scroll the target into view; the attempt is over.
    Scroll,
    /// The attempt is over without scrolling.
    Stop(AnchorOutcome),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    InitialDelay,
    Polling { attempts_remaining: u32 },
    Settling { frames_remaining: u32 },
    Done,
}

/// Bounded wait-then-scroll state machine.
///
/// Pure and synchronous: the driver executes the returned actions and
/// reports their completion back. Timer events carry the presence check
/// result; frame events carry nothing. Events arriving in a phase that
/// did not request them yield `None` and change nothing.
#[derive(Debug)]
pub struct AnchorWait {
    phase: Phase,
    config: AnchorConfig,
}

impl AnchorWait {
    pub fn new(config: AnchorConfig) -> (Self, AnchorAction) {
        let initial_delay = config.initial_delay;
        (
            Self {
                phase: Phase::InitialDelay,
                config,
            },
            AnchorAction::ScheduleTimer(initial_delay),
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// A scheduled timer fired and the target's presence was checked.
    pub fn on_timer(&mut self, target_present: bool) -> Option<AnchorAction> {
        match self.phase {
            Phase::InitialDelay => {
                if target_present {
                    self.start_settling()
                } else {
                    self.phase = Phase::Polling {
                        attempts_remaining: self.config.max_attempts,
                    };
                    Some(AnchorAction::ScheduleTimer(self.config.poll_interval))
                }
            }
            Phase::Polling { attempts_remaining } => {
                if target_present {
                    self.start_settling()
                } else if attempts_remaining <= 1 {
                    self.phase = Phase::Done;
                    Some(AnchorAction::Stop(AnchorOutcome::Abandoned))
                } else {
                    self.phase = Phase::Polling {
                        attempts_remaining: attempts_remaining - 1,
                    };
                    Some(AnchorAction::ScheduleTimer(self.config.poll_interval))
                }
            }
            Phase::Settling { .. } | Phase::Done => None,
        }
    }

    /// A requested frame boundary passed.
    pub fn on_frame(&mut self) -> Option<AnchorAction> {
        match self.phase {
            Phase::Settling { frames_remaining } if frames_remaining <= 1 => {
                self.phase = Phase::Done;
                Some(AnchorAction::Scroll)
            }
            Phase::Settling { frames_remaining } => {
                self.phase = Phase::Settling {
                    frames_remaining: frames_remaining - 1,
                };
                Some(AnchorAction::RequestFrame)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.phase = Phase::Done;
    }

    fn start_settling(&mut self) -> Option<AnchorAction> {
        if self.config.settle_frames == 0 {
            self.phase = Phase::Done;
            return Some(AnchorAction::Scroll);
        }
        self.phase = Phase::Settling {
            frames_remaining: self.config.settle_frames,
        };
        Some(AnchorAction::RequestFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::{AnchorAction, AnchorConfig, AnchorOutcome, AnchorWait, Phase};
    use std::time::Duration;

    fn machine() -> (AnchorWait, AnchorAction) {
        AnchorWait::new(AnchorConfig::default())
    }

    #[test]
    fn found_on_first_check_settles_two_frames_then_scrolls() {
        let (mut m, first) = machine();
        assert_eq!(first, AnchorAction::ScheduleTimer(Duration::from_millis(50)));

        assert_eq!(m.on_timer(true), Some(AnchorAction::RequestFrame));
        assert_eq!(m.phase(), Phase::Settling { frames_remaining: 2 });

        assert_eq!(m.on_frame(), Some(AnchorAction::RequestFrame));
        assert_eq!(m.on_frame(), Some(AnchorAction::Scroll));
        assert!(m.is_done());
    }

    #[test]
    fn exhausting_all_attempts_abandons() {
        let (mut m, _) = machine();

        // Initial miss enters polling with the full attempt budget.
        assert_eq!(
            m.on_timer(false),
            Some(AnchorAction::ScheduleTimer(Duration::from_millis(50)))
        );
        for _ in 0..9 {
            assert_eq!(
                m.on_timer(false),
                Some(AnchorAction::ScheduleTimer(Duration::from_millis(50)))
            );
        }
        assert_eq!(
            m.on_timer(false),
            Some(AnchorAction::Stop(AnchorOutcome::Abandoned))
        );
        assert!(m.is_done());
    }

    #[test]
    fn found_mid_poll_switches_to_settling() {
        let (mut m, _) = machine();
        m.on_timer(false);
        m.on_timer(false);

        assert_eq!(m.on_timer(true), Some(AnchorAction::RequestFrame));
        assert_eq!(m.phase(), Phase::Settling { frames_remaining: 2 });
    }

    #[test]
    fn stray_events_are_inert() {
        let (mut m, _) = machine();
        // Frame event while still waiting on the timer.
        assert_eq!(m.on_frame(), None);

        m.on_timer(true);
        // Timer event while settling.
        assert_eq!(m.on_timer(true), None);
        assert_eq!(m.phase(), Phase::Settling { frames_remaining: 2 });
    }

    #[test]
    fn cancel_makes_every_event_inert() {
        let (mut m, _) = machine();
        m.cancel();
        assert!(m.is_done());
        assert_eq!(m.on_timer(true), None);
        assert_eq!(m.on_frame(), None);
    }

    #[test]
    fn zero_settle_frames_scrolls_immediately_on_find() {
        let config = AnchorConfig {
            settle_frames: 0,
            ..AnchorConfig::default()
        };
        let (mut m, _) = AnchorWait::new(config);
        assert_eq!(m.on_timer(true), Some(AnchorAction::Scroll));
        assert!(m.is_done());
    }
}

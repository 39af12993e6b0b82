//! Scroll-to-target synchronization for mounts that appear asynchronously.
//!
//! A caller flips "show the map" state before the mount exists in the
//! rendered output, so an immediate scroll fails. The wait is modeled as
//! an explicit bounded state machine (`AnchorWait`); `AnchorSynchronizer`
//! drives it with real timers and frame waits, with one owned
//! cancellation handle per attempt.

pub mod driver;
pub mod wait;

pub use driver::{AnchorHost, AnchorSynchronizer, BoxFuture};
pub use wait::{AnchorAction, AnchorConfig, AnchorOutcome, AnchorWait, Phase};

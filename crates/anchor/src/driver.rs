use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::wait::{AnchorAction, AnchorConfig, AnchorOutcome, AnchorWait};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Rendered-output access the synchronizer needs: presence checks,
/// scrolling, and frame-boundary waits.
pub trait AnchorHost: Send + Sync {
    fn locate(&self, target_id: &str) -> bool;
    /// Scroll the target into view, centered and smooth.
    fn scroll_into_view(&self, target_id: &str);
    fn next_frame(&self) -> BoxFuture<'_, ()>;
}

/// One running scroll-to-target attempt.
///
/// Owns the attempt's cancellation handle; dropping the synchronizer
/// cancels the attempt, so a superseded attempt can never scroll to a
/// stale target.
///
/// Must be spawned from within a tokio runtime.
pub struct AnchorSynchronizer {
    target: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<AnchorOutcome>>,
}

impl AnchorSynchronizer {
    pub fn spawn(host: Arc<dyn AnchorHost>, target: impl Into<String>, config: AnchorConfig) -> Self {
        let target = target.into();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            host,
            target.clone(),
            config,
            cancel.clone(),
        ));
        Self {
            target,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the attempt to finish and report how it ended.
    pub async fn join(mut self) -> AnchorOutcome {
        let Some(handle) = self.handle.take() else {
            return AnchorOutcome::Cancelled;
        };
        match handle.await {
            Ok(outcome) => outcome,
            Err(_) => AnchorOutcome::Cancelled,
        }
    }
}

impl Drop for AnchorSynchronizer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    host: Arc<dyn AnchorHost>,
    target: String,
    config: AnchorConfig,
    cancel: CancellationToken,
) -> AnchorOutcome {
    let (mut machine, mut action) = AnchorWait::new(config);
    loop {
        match action {
            AnchorAction::ScheduleTimer(delay) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return AnchorOutcome::Cancelled,
                    _ = tokio::time::sleep(delay) => {}
                }
                let present = host.locate(&target);
                let Some(next) = machine.on_timer(present) else {
                    return AnchorOutcome::Cancelled;
                };
                action = next;
            }
            AnchorAction::RequestFrame => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return AnchorOutcome::Cancelled,
                    _ = host.next_frame() => {}
                }
                let Some(next) = machine.on_frame() else {
                    return AnchorOutcome::Cancelled;
                };
                action = next;
            }
            AnchorAction::Scroll => {
                host.scroll_into_view(&target);
                return AnchorOutcome::Scrolled;
            }
            AnchorAction::Stop(outcome) => {
                if outcome == AnchorOutcome::Abandoned {
                    tracing::warn!(target_id = %target, "anchor target never appeared, giving up");
                }
                return outcome;
            }
        }
    }
}

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use brief_core::{Project, ProjectId};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Cadence and failure budget of one status watch.
#[derive(Debug, Clone)]
pub struct PollerSettings {
    /// Time between successive fetches.
    pub interval: Duration,
    /// Consecutive failed fetches after which the watch gives up.
    pub max_failures: u32,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_failures: 5,
        }
    }
}

/// What a watch delivers to its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A fresh snapshot. A terminal snapshot is the watch's last delivery.
    Snapshot(Project),
    /// One fetch failed; the watch keeps its cadence.
    FetchFailed(ApiError),
    /// The watch stopped itself after `failures` consecutive failed fetches.
    Abandoned { failures: u32 },
}

/// Receives watch deliveries. Implementations must be cheap; they run on the
/// watch task.
pub trait PollSink: Send + Sync {
    fn deliver(&self, event: PollEvent);
}

impl PollSink for tokio::sync::mpsc::UnboundedSender<PollEvent> {
    fn deliver(&self, event: PollEvent) {
        let _ = self.send(event);
    }
}

/// Cancellation handle for a running watch. Dropping it cancels the watch;
/// cancelling twice is harmless.
#[derive(Debug)]
pub struct PollerHandle {
    token: CancellationToken,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Starts a status watch for `project_id` on the given runtime.
///
/// The watch fetches once right away and then keeps a fixed cadence. Fetches
/// are strictly sequential: a slow response delays the next tick instead of
/// overlapping it.
pub fn spawn_status_watch<S>(
    runtime: &Handle,
    client: ApiClient,
    project_id: ProjectId,
    settings: PollerSettings,
    sink: S,
) -> PollerHandle
where
    S: PollSink + 'static,
{
    let token = CancellationToken::new();
    let watch = token.clone();
    runtime.spawn(async move {
        run_watch(client, project_id, settings, sink, watch).await;
    });
    PollerHandle { token }
}

async fn run_watch<S>(
    client: ApiClient,
    project_id: ProjectId,
    settings: PollerSettings,
    sink: S,
    token: CancellationToken,
) where
    S: PollSink,
{
    // The first tick completes immediately, so the watch starts with a fetch.
    let mut interval = time::interval(settings.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures: u32 = 0;

    loop {
        // Biased so that cancellation wins over a tick that is already due.
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = interval.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            fetched = client.project(&project_id) => fetched,
        };
        // A fetch that raced the cancellation must not be delivered.
        if token.is_cancelled() {
            return;
        }

        match fetched {
            Ok(project) => {
                failures = 0;
                let terminal = project.status.is_terminal();
                sink.deliver(PollEvent::Snapshot(project));
                if terminal {
                    return;
                }
            }
            Err(err) => {
                failures += 1;
                if failures >= settings.max_failures {
                    sink.deliver(PollEvent::Abandoned { failures });
                    return;
                }
                sink.deliver(PollEvent::FetchFailed(err));
            }
        }
    }
}

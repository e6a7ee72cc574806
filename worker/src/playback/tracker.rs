use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use super::job::{GreetingJob, PlaybackContext, PlaybackOutcome, run_greeting};

/// How long finished sessions stay queryable
pub const FINISHED_SESSION_RETENTION: Duration = Duration::from_secs(10 * 60);

/// Lifecycle of one session's greeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// Accepted; synthesizing or joining the room
    Pending,
    /// Frames are being delivered
    Playing,
    Completed {
        frames_delivered: usize,
        samples_delivered: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
        frames_delivered: usize,
    },
    Cancelled {
        frames_delivered: usize,
    },
}

impl PlaybackStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Playing)
    }
}

impl From<PlaybackOutcome> for PlaybackStatus {
    fn from(outcome: PlaybackOutcome) -> Self {
        match outcome {
            PlaybackOutcome::Completed {
                frames_delivered,
                samples_delivered,
            } => Self::Completed {
                frames_delivered,
                samples_delivered,
            },
            PlaybackOutcome::Skipped { reason } => Self::Skipped { reason },
            PlaybackOutcome::Failed {
                reason,
                frames_delivered,
            } => Self::Failed {
                reason,
                frames_delivered,
            },
            PlaybackOutcome::Cancelled { frames_delivered } => {
                Self::Cancelled { frames_delivered }
            }
        }
    }
}

/// Point-in-time view of a tracked session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub room_name: String,
    #[serde(flatten)]
    pub status: PlaybackStatus,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Session '{0}' already has a greeting in progress")]
    SessionActive(String),

    #[error("Worker is shutting down")]
    ShuttingDown,
}

/// Result of a cancellation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelResult {
    Cancelled,
    AlreadyFinished,
    NotFound,
}

struct TrackedSession {
    room_name: String,
    status: PlaybackStatus,
    cancel: CancellationToken,
    finished_at: Option<Instant>,
}

/// Runs greetings in the background and keeps their status queryable.
///
/// Each session gets a child of the tracker's shutdown token, so a single
/// session can be cancelled on its own and [`PlaybackTracker::cancel_all`]
/// stops everything.
pub struct PlaybackTracker {
    sessions: DashMap<String, TrackedSession>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl Default for PlaybackTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackTracker {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            shutdown: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    /// Register the session and start its greeting on a background task.
    ///
    /// Returns as soon as the task is spawned; playback is never awaited here.
    pub fn spawn(
        self: &Arc<Self>,
        ctx: PlaybackContext,
        job: GreetingJob,
    ) -> Result<(), PlaybackError> {
        if self.shutdown.is_cancelled() {
            return Err(PlaybackError::ShuttingDown);
        }
        self.prune_finished();

        let session_id = job.session.session_id.clone();
        let cancel = self.shutdown.child_token();

        match self.sessions.entry(session_id.clone()) {
            Entry::Occupied(entry) if !entry.get().status.is_terminal() => {
                return Err(PlaybackError::SessionActive(session_id));
            }
            entry => {
                entry.insert(TrackedSession {
                    room_name: job.session.room_name.clone(),
                    status: PlaybackStatus::Pending,
                    cancel: cancel.clone(),
                    finished_at: None,
                });
            }
        }

        let tracker = Arc::clone(self);
        self.tasks.spawn(async move {
            let playing = {
                let tracker = Arc::clone(&tracker);
                let session_id = session_id.clone();
                move || tracker.set_status(&session_id, PlaybackStatus::Playing)
            };

            let outcome = AssertUnwindSafe(run_greeting(&ctx, &job, &cancel, playing))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    error!(session_id = %session_id, "Greeting task panicked");
                    PlaybackOutcome::Failed {
                        reason: "playback task panicked".to_string(),
                        frames_delivered: 0,
                    }
                });

            log_outcome(&session_id, &job.session.room_name, &outcome);
            tracker.set_status(&session_id, outcome.into());
        });

        Ok(())
    }

    fn set_status(&self, session_id: &str, status: PlaybackStatus) {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            if status.is_terminal() {
                entry.finished_at = Some(Instant::now());
            }
            entry.status = status;
        }
    }

    fn prune_finished(&self) {
        self.sessions.retain(|_, session| {
            session
                .finished_at
                .is_none_or(|at| at.elapsed() < FINISHED_SESSION_RETENTION)
        });
    }

    pub fn status(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.sessions.get(session_id).map(|session| SessionSnapshot {
            session_id: session_id.to_string(),
            room_name: session.room_name.clone(),
            status: session.status.clone(),
        })
    }

    /// Cancel one session's in-flight greeting
    pub fn cancel(&self, session_id: &str) -> CancelResult {
        match self.sessions.get(session_id) {
            None => CancelResult::NotFound,
            Some(session) if session.status.is_terminal() => CancelResult::AlreadyFinished,
            Some(session) => {
                session.cancel.cancel();
                info!(session_id = %session_id, "Greeting cancellation requested");
                CancelResult::Cancelled
            }
        }
    }

    /// Cancel every in-flight greeting and refuse new ones
    pub fn cancel_all(&self) -> usize {
        let active = self.active_count();
        self.shutdown.cancel();
        self.tasks.close();
        active
    }

    /// Wait for background greetings to finish closing their tracks
    ///
    /// Returns `false` if the grace period ran out first.
    pub async fn wait_for_shutdown(&self, grace: Duration) -> bool {
        self.tasks.close();
        tokio::time::timeout(grace, self.tasks.wait()).await.is_ok()
    }

    pub fn active_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|session| !session.status.is_terminal())
            .count()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

fn log_outcome(session_id: &str, room_name: &str, outcome: &PlaybackOutcome) {
    match outcome {
        PlaybackOutcome::Completed {
            frames_delivered,
            samples_delivered,
        } => info!(
            session_id = %session_id,
            room = %room_name,
            frames_delivered,
            samples_delivered,
            "Greeting completed"
        ),
        PlaybackOutcome::Skipped { reason } => info!(
            session_id = %session_id,
            room = %room_name,
            reason = %reason,
            "Greeting skipped"
        ),
        PlaybackOutcome::Failed {
            reason,
            frames_delivered,
        } => warn!(
            session_id = %session_id,
            room = %room_name,
            reason = %reason,
            frames_delivered,
            "Greeting failed"
        ),
        PlaybackOutcome::Cancelled { frames_delivered } => info!(
            session_id = %session_id,
            room = %room_name,
            frames_delivered,
            "Greeting cancelled"
        ),
    }
}

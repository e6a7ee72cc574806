//! Background greeting playback.
//!
//! A session-start request becomes a [`GreetingJob`]; the [`PlaybackTracker`]
//! runs it on its own task through [`run_greeting`] (synthesize, segment,
//! publish, pace, close) and records how it ended.

mod job;
mod tracker;

#[cfg(test)]
mod test_support;

pub use job::{GreetingJob, PlaybackContext, PlaybackOutcome, TRACK_CLOSE_TIMEOUT, run_greeting};
pub use tracker::{
    CancelResult, FINISHED_SESSION_RETENTION, PlaybackError, PlaybackStatus, PlaybackTracker,
    SessionSnapshot,
};

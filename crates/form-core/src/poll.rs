//! Availability polling for the public collaborator.
//!
//! While a form is not active and nothing has been submitted, its status is
//! re-fetched on a fixed interval. Polling is suspended during a submission
//! attempt so a status refresh never races the attempt.

use std::time::Duration;

use tracing::{debug, info, warn};

use form_model::{FormError, FormStatus, Result};

/// Interval between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Why a watch stopped polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The form was observed as active.
    Opened,
    /// A submission succeeded.
    Submitted,
    /// A failed submission revealed the form is no longer accepting responses.
    StatusChanged(FormStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Watching,
    /// A submission is in flight.
    Suspended,
    Stopped(StopReason),
}

/// State machine behind the public page's refresh loop.
#[derive(Debug, Clone)]
pub struct AvailabilityWatch {
    interval: Duration,
    state: WatchState,
    resume_to: WatchState,
}

impl AvailabilityWatch {
    /// Start watching a form last seen with `status`.
    pub fn new(status: FormStatus) -> Self {
        Self::with_interval(status, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(status: FormStatus, interval: Duration) -> Self {
        let state = if status.accepts_responses() {
            WatchState::Stopped(StopReason::Opened)
        } else {
            WatchState::Watching
        };
        Self {
            interval,
            state,
            resume_to: state,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn should_poll(&self) -> bool {
        self.state == WatchState::Watching
    }

    /// Record a fetched status. Ignored unless the watch is polling.
    pub fn observe(&mut self, status: FormStatus) -> WatchState {
        if self.should_poll() && status.accepts_responses() {
            info!(%status, "form is now accepting responses");
            self.state = WatchState::Stopped(StopReason::Opened);
        }
        self.state
    }

    /// Suspend polling for a submission attempt.
    ///
    /// # Errors
    ///
    /// `Conflict` when an attempt is already in flight, a response was already
    /// submitted, or the form was found closed.
    pub fn begin_submission(&mut self) -> Result<()> {
        match self.state {
            WatchState::Suspended => Err(FormError::conflict("a submission is already in progress")),
            WatchState::Stopped(StopReason::Submitted) => {
                Err(FormError::conflict("a response was already submitted"))
            }
            WatchState::Stopped(StopReason::StatusChanged(status)) => Err(FormError::conflict(
                format!("form is not accepting responses (status: {status})"),
            )),
            WatchState::Watching | WatchState::Stopped(StopReason::Opened) => {
                self.resume_to = self.state;
                self.state = WatchState::Suspended;
                debug!("polling suspended for submission");
                Ok(())
            }
        }
    }

    pub fn submission_succeeded(&mut self) {
        self.state = WatchState::Stopped(StopReason::Submitted);
    }

    /// End a failed attempt.
    ///
    /// `observed` is the status reported alongside the failure, if any. A
    /// status that no longer accepts responses stops the watch; otherwise the
    /// watch returns to where it was before the attempt.
    pub fn submission_failed(&mut self, observed: Option<FormStatus>) -> WatchState {
        if self.state != WatchState::Suspended {
            return self.state;
        }
        self.state = match observed {
            Some(status) if !status.accepts_responses() => {
                WatchState::Stopped(StopReason::StatusChanged(status))
            }
            _ => self.resume_to,
        };
        debug!(state = ?self.state, "submission attempt ended without a response");
        self.state
    }
}

/// Poll until the form opens, the watch stops or `max_polls` fetches are made.
///
/// `fetch` returns the current status; `sleep` is called with the watch
/// interval between fetches. Transient fetch failures are logged and count as
/// a poll; any other error ends the wait.
pub fn wait_until_open<F, S>(
    watch: &mut AvailabilityWatch,
    mut fetch: F,
    mut sleep: S,
    max_polls: Option<usize>,
) -> Result<WatchState>
where
    F: FnMut() -> Result<FormStatus>,
    S: FnMut(Duration),
{
    let mut polls = 0usize;
    while watch.should_poll() {
        if max_polls.is_some_and(|max| polls >= max) {
            break;
        }
        if polls > 0 {
            sleep(watch.interval());
        }
        polls += 1;
        match fetch() {
            Ok(status) => {
                debug!(poll = polls, %status, "form status fetched");
                watch.observe(status);
            }
            Err(error @ FormError::Transient { .. }) => {
                warn!(poll = polls, %error, "status fetch failed, will retry");
            }
            Err(error) => return Err(error),
        }
    }
    Ok(watch.state())
}

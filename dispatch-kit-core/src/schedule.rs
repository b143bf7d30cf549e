//! Invocation cadence for watcher-style async action creators.

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Invocation cadence for a watcher-style async action creator.
///
/// The pending action is dispatched on every call regardless of cadence;
/// the schedule only governs when (and whether) the payload-stage
/// operation runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Execute the operation on every call.
    #[default]
    None,
    /// Delay each call by the window. A newer call inside the window
    /// supersedes the older one, so only the last call's operation ever
    /// fulfills or rejects.
    Debounce(Duration),
    /// Execute immediately, then suppress execution for the window. The
    /// latest call arriving inside the window runs on the trailing edge
    /// and re-opens the window.
    Throttle(Duration),
}

impl Schedule {
    /// The scheduling window, when one applies.
    pub fn window(&self) -> Option<Duration> {
        match self {
            Schedule::None => None,
            Schedule::Debounce(window) | Schedule::Throttle(window) => Some(*window),
        }
    }
}

/// Book-keeping shared between a creator group and its spawned tasks.
///
/// The lock is held for bookkeeping only, never across an await.
pub(crate) struct ScheduleState<A> {
    inner: Mutex<Inner<A>>,
}

struct Inner<A> {
    /// Monotonic per-call sequence; the latest call wins under debounce.
    seq: u64,
    /// Cancels the previous debounced call's delayed work.
    cancel: CancellationToken,
    /// Whether a throttle window is currently open.
    cooling: bool,
    /// Latest call parked during an open throttle window.
    trailing: Option<A>,
}

impl<A> ScheduleState<A> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                seq: 0,
                cancel: CancellationToken::new(),
                cooling: false,
                trailing: None,
            }),
        }
    }

    /// Advance the sequence, cancel the previous call's delayed work, and
    /// hand out this call's sequence number and fresh token.
    pub(crate) fn supersede(&self) -> (u64, CancellationToken) {
        let mut inner = self.inner.lock().unwrap();
        inner.seq += 1;
        let token = CancellationToken::new();
        let previous = std::mem::replace(&mut inner.cancel, token.clone());
        previous.cancel();
        (inner.seq, token)
    }

    /// Sequence number of the most recent call.
    pub(crate) fn latest_seq(&self) -> u64 {
        self.inner.lock().unwrap().seq
    }

    /// Claim the leading edge of a throttle window.
    ///
    /// Hands `arg` back when the window is closed, opening it; otherwise
    /// parks `arg` in the trailing slot (latest wins) and returns `None`.
    pub(crate) fn try_lead(&self, arg: A) -> Option<A> {
        let mut inner = self.inner.lock().unwrap();
        if inner.cooling {
            inner.trailing = Some(arg);
            None
        } else {
            inner.cooling = true;
            Some(arg)
        }
    }

    /// Take the parked trailing call at the end of a window, or close the
    /// window when nothing is parked.
    pub(crate) fn take_trailing(&self) -> Option<A> {
        let mut inner = self.inner.lock().unwrap();
        let parked = inner.trailing.take();
        if parked.is_none() {
            inner.cooling = false;
        }
        parked
    }
}

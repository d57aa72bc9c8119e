//! Tick-driven waits with cancellation
//!
//! A [`Wait`] is polled once per tick by whoever owns it (usually a
//! behavior from its `update` callback). It resolves on elapsed simulated
//! time, elapsed ticks, or a predicate, and is rejected once its
//! [`CancellationToken`] is cancelled. The engine keeps no list of waits;
//! a cancelled waiter drops its own state.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::task::Poll;

/// Shared cancellation flag
///
/// Clones observe the same flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    /// Create an uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every wait holding a clone of this token
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A wait was cancelled before it resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("wait cancelled")]
pub struct WaitCancelled;

enum Condition {
    Seconds(f32),
    Ticks(u32),
    Until(Box<dyn FnMut() -> bool>),
}

/// A pending wait
pub struct Wait {
    condition: Condition,
    token: CancellationToken,
    settled: Option<Result<(), WaitCancelled>>,
}

impl fmt::Debug for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let condition = match &self.condition {
            Condition::Seconds(s) => format!("Seconds({s})"),
            Condition::Ticks(t) => format!("Ticks({t})"),
            Condition::Until(_) => "Until(..)".to_string(),
        };
        f.debug_struct("Wait")
            .field("condition", &condition)
            .field("settled", &self.settled)
            .finish()
    }
}

impl Wait {
    /// Resolve after `seconds` of simulated time
    pub fn seconds(seconds: f32, token: CancellationToken) -> Self {
        Self::with_condition(Condition::Seconds(seconds), token)
    }

    /// Resolve after `ticks` polls
    pub fn ticks(ticks: u32, token: CancellationToken) -> Self {
        Self::with_condition(Condition::Ticks(ticks), token)
    }

    /// Resolve on the first poll where `predicate` returns true
    pub fn until<F>(predicate: F, token: CancellationToken) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        Self::with_condition(Condition::Until(Box::new(predicate)), token)
    }

    fn with_condition(condition: Condition, token: CancellationToken) -> Self {
        Self {
            condition,
            token,
            settled: None,
        }
    }

    /// Advance by one tick of `delta_sec`
    ///
    /// Cancellation is checked first. Once settled, further polls keep
    /// returning the same outcome.
    pub fn poll(&mut self, delta_sec: f32) -> Poll<Result<(), WaitCancelled>> {
        if let Some(outcome) = self.settled {
            return Poll::Ready(outcome);
        }
        if self.token.is_cancelled() {
            self.settled = Some(Err(WaitCancelled));
            return Poll::Ready(Err(WaitCancelled));
        }

        let done = match &mut self.condition {
            Condition::Seconds(remaining) => {
                *remaining -= delta_sec;
                *remaining <= 0.0
            }
            Condition::Ticks(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            Condition::Until(predicate) => predicate(),
        };

        if done {
            self.settled = Some(Ok(()));
            Poll::Ready(Ok(()))
        } else {
            Poll::Pending
        }
    }

    /// Whether the wait has resolved or been rejected
    pub fn is_settled(&self) -> bool {
        self.settled.is_some()
    }
}

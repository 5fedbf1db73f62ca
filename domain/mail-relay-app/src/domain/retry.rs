//! Bounded retry with exponential backoff.
//!
//! A delivery moves through [`RetryState`]: it starts `Attempting(1)`, and
//! each failed attempt either enters `Backoff` or, once the attempt ceiling is
//! reached, `Exhausted`. Waits only ever happen between attempts.

use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const DEFAULT_MULTIPLIER: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, initial_backoff: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            multiplier,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait inserted after the given (1-based) failed attempt.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }

    pub fn start<E>(&self) -> RetryState<E> {
        RetryState::Attempting { attempt: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState<E> {
    Attempting { attempt: u32 },
    Backoff { attempt: u32, wait: Duration, error: E },
    Success { attempt: u32 },
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryState<E> {
    pub fn on_success(self) -> Self {
        match self {
            RetryState::Attempting { attempt } => RetryState::Success { attempt },
            other => other,
        }
    }

    pub fn on_failure(self, policy: &RetryPolicy, error: E) -> Self {
        match self {
            RetryState::Attempting { attempt } if attempt >= policy.max_attempts => {
                RetryState::Exhausted {
                    attempts: attempt,
                    last_error: error,
                }
            }
            RetryState::Attempting { attempt } => RetryState::Backoff {
                attempt,
                wait: policy.backoff_after(attempt),
                error,
            },
            other => other,
        }
    }

    pub fn after_backoff(self) -> Self {
        match self {
            RetryState::Backoff { attempt, .. } => RetryState::Attempting {
                attempt: attempt + 1,
            },
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RetryState::Success { .. } | RetryState::Exhausted { .. }
        )
    }
}

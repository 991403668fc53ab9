//! Retry
//!
//! Bounded polling for eventually-consistent state: background bulk jobs,
//! slow checkbox toggles, and anything else the backend settles into
//! asynchronously. Waits are plain blocking sleeps; a scenario runs on one
//! thread and has nothing better to do in the meantime.

use std::{thread, time::Duration};

use thiserror::Error;
use tracing::{debug, trace};

/// Error raised when a polling loop runs out of attempts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetryError {
    /// The condition never became true within the attempt budget. The
    /// polled action is not reported as possibly succeeded; the scenario
    /// aborts.
    #[error("{message} (gave up after {attempts} attempts)")]
    Exhausted {
        /// Caller-supplied description of what was being waited for
        message: String,

        /// The attempt budget that was exhausted
        attempts: u32,
    },
}

/// A bounded polling budget: how many attempts, and how long to sleep
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and inter-attempt
    /// delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Polls `predicate` up to the attempt budget, running
    /// `corrective_action` (a UI/API fix-up step) and sleeping after each
    /// false evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Exhausted`] with `failure_message` when the
    /// predicate never becomes true.
    pub fn retry_until<P, A>(
        &self,
        failure_message: &str,
        mut predicate: P,
        mut corrective_action: A,
    ) -> Result<(), RetryError>
    where
        P: FnMut() -> bool,
        A: FnMut(),
    {
        for attempt in 1..=self.max_attempts {
            if predicate() {
                debug!(attempt, "condition met");
                return Ok(());
            }

            trace!(attempt, "condition not met; applying corrective action");
            corrective_action();
            thread::sleep(self.delay);
        }

        Err(RetryError::Exhausted {
            message: failure_message.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Polls `predicate` up to the attempt budget with no corrective
    /// action, sleeping between checks. For asynchronous backend jobs
    /// ("bulk update completed") where there is nothing to fix, only to
    /// wait for.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Exhausted`] with `failure_message` when the
    /// predicate never becomes true.
    pub fn wait_until<P>(&self, failure_message: &str, mut predicate: P) -> Result<(), RetryError>
    where
        P: FnMut() -> bool,
    {
        self.retry_until(failure_message, &mut predicate, || {})
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use testresult::TestResult;

    use super::*;

    fn immediate(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[test]
    fn succeeds_on_first_attempt_without_corrective_action() -> TestResult {
        let mut corrections = 0;

        immediate(3).retry_until("never", || true, || corrections += 1)?;

        assert_eq!(corrections, 0, "no correction should run on success");

        Ok(())
    }

    #[test]
    fn runs_corrective_action_until_condition_holds() -> TestResult {
        let corrections = Cell::new(0);

        immediate(5).retry_until(
            "condition never settled",
            || corrections.get() >= 2,
            || corrections.set(corrections.get() + 1),
        )?;

        assert_eq!(corrections.get(), 2, "two corrections should have run");

        Ok(())
    }

    #[test]
    fn exhaustion_reports_message_and_attempts() {
        let result = immediate(4).retry_until("stock toggle never applied", || false, || {});

        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                message: "stock toggle never applied".to_string(),
                attempts: 4,
            })
        );
    }

    #[test]
    fn exhaustion_message_is_descriptive() {
        let result = immediate(2).wait_until("bulk update never completed", || false);
        let message = result.map_or_else(|error| error.to_string(), |()| String::new());

        assert_eq!(
            message,
            "bulk update never completed (gave up after 2 attempts)"
        );
    }

    #[test]
    fn wait_until_polls_without_corrective_action() -> TestResult {
        let mut checks = 0;

        immediate(5).wait_until("job never finished", || {
            checks += 1;
            checks == 3
        })?;

        assert_eq!(checks, 3, "predicate should have been polled three times");

        Ok(())
    }

    #[test]
    fn zero_attempt_budget_fails_immediately() {
        let result = immediate(0).wait_until("nothing", || true);

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 0, .. })));
    }
}

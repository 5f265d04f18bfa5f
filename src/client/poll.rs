//! Cancellable status polling.
//!
//! A poll loop fetches immediately, then again every [`PollPolicy::interval`]
//! until the fetched value is terminal, the policy gives up, or its
//! [`PollHandle`] is cancelled. The handle is checked again after every fetch,
//! so a response that arrives after cancellation is never delivered.
use std::fmt::Display;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Interval between two status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Revocable token shared between a poll loop and its owner.
#[derive(Debug, Clone, Default)]
pub struct PollHandle {
    // `true` once cancelled
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl PollHandle {
    /// Create an active handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the handle has not been cancelled yet.
    pub fn is_active(&self) -> bool {
        let (lock, _) = &*self.inner;
        !*lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the loop and wake it if it is sleeping between attempts.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    /// Sleep for up to `timeout`, returning early on cancellation.
    ///
    /// Returns whether the handle is still active afterwards.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }
}

/// Limits of a poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two fetches
    pub interval: Duration,
    /// Total number of fetches before giving up, `None` for no limit
    pub max_attempts: Option<usize>,
    /// Number of failed fetches in a row before giving up, `None` for no limit
    pub max_consecutive_failures: Option<usize>,
}

impl Default for PollPolicy {
    /// One hour of polling at the default interval, or five failures in a row.
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(900),
            max_consecutive_failures: Some(5),
        }
    }
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T, E> {
    /// The last fetched value was terminal
    Finished(T),
    /// The handle was cancelled
    Cancelled,
    /// Too many fetches failed in a row; holds the last error
    TooManyFailures(E),
    /// The attempt limit was reached; holds the last successful value, if any
    AttemptsExhausted(Option<T>),
}

/// Run a poll loop on the current thread.
///
/// `on_update` sees every successfully fetched value, including the terminal
/// one. A failed fetch is logged and retried at the next tick.
pub fn poll_until<T, E, F, D, U>(
    handle: &PollHandle,
    policy: &PollPolicy,
    mut fetch: F,
    is_done: D,
    mut on_update: U,
) -> PollOutcome<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
    D: Fn(&T) -> bool,
    U: FnMut(&T),
{
    let mut attempts = 0;
    let mut failures = 0;
    let mut last = None;

    loop {
        if !handle.is_active() {
            return PollOutcome::Cancelled;
        }
        attempts += 1;
        let result = fetch();
        if !handle.is_active() {
            debug!("Discarding poll result {attempts} received after cancellation");
            return PollOutcome::Cancelled;
        }

        match result {
            Ok(value) => {
                failures = 0;
                on_update(&value);
                if is_done(&value) {
                    debug!("Polling finished after {attempts} attempt(s)");
                    return PollOutcome::Finished(value);
                }
                last = Some(value);
            }
            Err(e) => {
                failures += 1;
                warn!("Poll attempt {attempts} failed: {e}");
                if policy
                    .max_consecutive_failures
                    .is_some_and(|max| failures >= max)
                {
                    return PollOutcome::TooManyFailures(e);
                }
            }
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            warn!("Giving up after {attempts} poll attempts");
            return PollOutcome::AttemptsExhausted(last);
        }
        if !handle.wait(policy.interval) {
            return PollOutcome::Cancelled;
        }
    }
}

/// Owner of at most one background poll loop.
///
/// Watching a new target cancels the loop of the previous one, and dropping
/// the watcher cancels whatever it is still polling.
pub struct StatusWatcher<T, E> {
    policy: PollPolicy,
    current: Option<(PollHandle, JoinHandle<PollOutcome<T, E>>)>,
}

impl<T, E> StatusWatcher<T, E>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Create a watcher that polls with `policy`.
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    /// Start polling on a background thread, replacing any running loop.
    pub fn watch<F, D, U>(&mut self, fetch: F, is_done: D, on_update: U) -> PollHandle
    where
        F: FnMut() -> Result<T, E> + Send + 'static,
        D: Fn(&T) -> bool + Send + 'static,
        U: FnMut(&T) + Send + 'static,
    {
        self.stop();

        let handle = PollHandle::new();
        let loop_handle = handle.clone();
        let policy = self.policy.clone();
        let thread = thread::spawn(move || {
            poll_until(&loop_handle, &policy, fetch, is_done, on_update)
        });
        self.current = Some((handle.clone(), thread));
        handle
    }

    /// Block until the current loop ends and return its outcome.
    ///
    /// Returns `None` if nothing is being watched or the loop panicked.
    pub fn wait(&mut self) -> Option<PollOutcome<T, E>> {
        let (_, thread) = self.current.take()?;
        thread.join().ok()
    }

    /// Cancel the current loop without waiting for it.
    pub fn stop(&mut self) {
        if let Some((handle, _)) = self.current.take() {
            handle.cancel();
        }
    }

    /// Whether a loop is running and not cancelled.
    pub fn is_watching(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(handle, thread)| handle.is_active() && !thread.is_finished())
    }
}

impl<T, E> Drop for StatusWatcher<T, E> {
    fn drop(&mut self) {
        if let Some((handle, _)) = self.current.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    fn fast_policy() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts: Some(50),
            max_consecutive_failures: Some(3),
        }
    }

    #[test]
    fn default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(4));
        assert_eq!(policy.max_consecutive_failures, Some(5));
    }

    #[test]
    fn finishes_on_terminal_value() {
        let mut n = 0;
        let mut seen = Vec::new();
        let outcome = poll_until(
            &PollHandle::new(),
            &fast_policy(),
            || -> Result<usize, String> {
                n += 1;
                Ok(n)
            },
            |&v| v == 3,
            |&v| seen.push(v),
        );
        assert_eq!(outcome, PollOutcome::Finished(3));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn failures_are_retried() {
        let mut responses = vec![Ok(2), Err("offline"), Err("offline"), Ok(1)];
        let outcome = poll_until(
            &PollHandle::new(),
            &fast_policy(),
            || responses.pop().unwrap_or(Err("exhausted")),
            |&v| v == 2,
            |_| {},
        );
        assert_eq!(outcome, PollOutcome::Finished(2));
    }

    #[test]
    fn gives_up_after_consecutive_failures() {
        let mut calls = 0;
        let outcome = poll_until(
            &PollHandle::new(),
            &fast_policy(),
            || -> Result<(), &str> {
                calls += 1;
                Err("Request timed out. Check API connectivity.")
            },
            |_| true,
            |_| {},
        );
        assert_eq!(
            outcome,
            PollOutcome::TooManyFailures("Request timed out. Check API connectivity.")
        );
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let policy = PollPolicy {
            max_attempts: Some(4),
            ..fast_policy()
        };
        let mut n = 0;
        let outcome = poll_until(
            &PollHandle::new(),
            &policy,
            || -> Result<usize, String> {
                n += 1;
                Ok(n)
            },
            |_| false,
            |_| {},
        );
        assert_eq!(outcome, PollOutcome::AttemptsExhausted(Some(4)));
    }

    #[test]
    fn cancelled_handle_never_fetches() {
        let handle = PollHandle::new();
        handle.cancel();
        let mut calls = 0;
        let outcome = poll_until(
            &handle,
            &fast_policy(),
            || -> Result<(), String> {
                calls += 1;
                Ok(())
            },
            |_| true,
            |_| {},
        );
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(calls, 0);
    }

    #[test]
    fn late_result_is_discarded() {
        let handle = PollHandle::new();
        let canceller = handle.clone();
        let mut delivered = 0;
        let outcome = poll_until(
            &handle,
            &fast_policy(),
            || -> Result<u8, String> {
                // Cancelled while the request is in flight
                canceller.cancel();
                Ok(1)
            },
            |_| true,
            |_| delivered += 1,
        );
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert_eq!(delivered, 0);
    }

    #[test]
    fn cancel_interrupts_wait() {
        let handle = PollHandle::new();
        let sleeper = handle.clone();
        let start = Instant::now();
        let sleeping = thread::spawn(move || sleeper.wait(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        handle.cancel();
        assert!(!sleeping.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn uncancelled_wait_times_out_active() {
        assert!(PollHandle::new().wait(Duration::from_millis(1)));
    }

    #[test]
    fn watcher_returns_outcome() {
        let mut watcher: StatusWatcher<usize, String> = StatusWatcher::new(fast_policy());
        let mut n = 0;
        watcher.watch(
            move || {
                n += 1;
                Ok(n)
            },
            |&v| v >= 2,
            |_| {},
        );
        assert_eq!(watcher.wait(), Some(PollOutcome::Finished(2)));
        assert!(!watcher.is_watching());
        assert_eq!(watcher.wait(), None);
    }

    #[test]
    fn watching_again_cancels_previous_loop() {
        let policy = PollPolicy {
            interval: Duration::from_millis(5),
            max_attempts: None,
            max_consecutive_failures: None,
        };
        let mut watcher: StatusWatcher<(), String> = StatusWatcher::new(policy);
        let first = watcher.watch(|| Ok(()), |_| false, |_| {});
        assert!(first.is_active());

        let second = watcher.watch(|| Ok(()), |_| false, |_| {});
        assert!(!first.is_active());
        assert!(second.is_active());

        watcher.stop();
        assert!(!second.is_active());
    }

    #[test]
    fn dropping_watcher_cancels_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let policy = PollPolicy {
            interval: Duration::from_millis(2),
            max_attempts: None,
            max_consecutive_failures: None,
        };
        let handle = {
            let mut watcher: StatusWatcher<(), String> = StatusWatcher::new(policy);
            watcher.watch(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
                |_| false,
                |_| {},
            )
        };
        assert!(!handle.is_active());

        // The loop notices the cancellation and stops fetching
        thread::sleep(Duration::from_millis(50));
        let settled = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), settled);
    }
}

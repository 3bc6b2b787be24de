//! Tests for the retry executor.

use std::sync::atomic::{AtomicU32, Ordering};

use super::*;
use crate::test_support::RecordingSleeper;
use rstest::{fixture, rstest};

#[derive(Debug, PartialEq, Eq)]
enum FakeError {
    Transient,
    Permanent,
}

impl Display for FakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

fn is_transient(error: &FakeError) -> bool {
    *error == FakeError::Transient
}

#[fixture]
fn sleeper() -> Arc<RecordingSleeper> {
    Arc::new(RecordingSleeper::default())
}

fn executor(sleeper: &Arc<RecordingSleeper>, attempts: u32) -> RetryExecutor {
    RetryExecutor::with_runtime(
        RetryPolicy::new(attempts, Duration::from_millis(100), Duration::from_millis(250)),
        sleeper.clone(),
        Arc::new(NoJitter),
    )
}

#[rstest]
#[tokio::test]
async fn succeeds_after_transient_failures(sleeper: Arc<RecordingSleeper>) {
    let counter = AtomicU32::new(0);
    let calls = &counter;
    let result = executor(&sleeper, 3)
        .execute(
            "flaky",
            move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(FakeError::Transient)
                } else {
                    Ok(7)
                }
            },
            is_transient,
        )
        .await;

    assert_eq!(result, Ok(7));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[rstest]
#[tokio::test]
async fn gives_up_after_max_attempts(sleeper: Arc<RecordingSleeper>) {
    let counter = AtomicU32::new(0);
    let calls = &counter;
    let result: Result<(), FakeError> = executor(&sleeper, 4)
        .execute(
            "down",
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Transient)
            },
            is_transient,
        )
        .await;

    assert_eq!(result, Err(FakeError::Transient));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        sleeper.recorded(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(250),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn permanent_errors_are_not_retried(sleeper: Arc<RecordingSleeper>) {
    let counter = AtomicU32::new(0);
    let calls = &counter;
    let result: Result<(), FakeError> = executor(&sleeper, 5)
        .execute(
            "invalid",
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Permanent)
            },
            is_transient,
        )
        .await;

    assert_eq!(result, Err(FakeError::Permanent));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(sleeper.recorded().is_empty());
}

#[rstest]
fn policy_always_allows_one_attempt() {
    let policy = RetryPolicy::new(0, Duration::from_millis(10), Duration::ZERO);
    assert_eq!(policy.max_attempts(), 1);
    assert_eq!(policy.base_delay(1), Duration::from_millis(10));
}

#[rstest]
fn random_jitter_stays_within_a_quarter() {
    let base = Duration::from_millis(400);
    for attempt in 1..50 {
        let delay = RandomJitter.jittered_delay(base, attempt);
        assert!(delay >= base && delay <= Duration::from_millis(500));
    }
}

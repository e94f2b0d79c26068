//! Integration tests for bounded polling
//!
//! Simulates a remote job that flips to a terminal state after a number of
//! checks, the way an asynchronous action batch does.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashops_common::{poll_until, PollError, PollPolicy, PollStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoteState {
    Pending,
    Completed,
}

struct RemoteJob {
    checks_until_done: Option<u32>,
    checks: Mutex<u32>,
}

impl RemoteJob {
    fn finishing_after(checks: u32) -> Self {
        Self { checks_until_done: Some(checks), checks: Mutex::new(0) }
    }

    fn never_finishing() -> Self {
        Self { checks_until_done: None, checks: Mutex::new(0) }
    }

    async fn check(&self) -> Result<RemoteState, String> {
        let mut checks = self.checks.lock().map_err(|e| e.to_string())?;
        *checks += 1;
        match self.checks_until_done {
            Some(limit) if *checks >= limit => Ok(RemoteState::Completed),
            _ => Ok(RemoteState::Pending),
        }
    }

    fn checks(&self) -> u32 {
        *self.checks.lock().unwrap()
    }
}

async fn wait_for(job: &RemoteJob, policy: &PollPolicy) -> Result<RemoteState, PollError<String>> {
    poll_until(policy, |_| async {
        match job.check().await? {
            RemoteState::Pending => Ok(PollStep::Pending),
            done => Ok(PollStep::Ready(done)),
        }
    })
    .await
}

#[tokio::test]
async fn completes_within_budget() {
    let job = RemoteJob::finishing_after(3);
    let policy = PollPolicy::fixed(6, Duration::from_millis(1));

    let state = wait_for(&job, &policy).await.unwrap();

    assert_eq!(state, RemoteState::Completed);
    assert_eq!(job.checks(), 3);
}

#[tokio::test]
async fn never_terminal_job_gives_up_after_budget() {
    let job = RemoteJob::never_finishing();
    let policy = PollPolicy::fixed(5, Duration::from_millis(2));

    let started = Instant::now();
    let result = wait_for(&job, &policy).await;

    assert!(matches!(result, Err(PollError::Exhausted { attempts: 5 })));
    assert_eq!(job.checks(), 5);
    assert!(started.elapsed() >= Duration::from_millis(8));
}

#[tokio::test]
async fn wait_first_sleeps_before_initial_probe() {
    let job = RemoteJob::finishing_after(1);
    let policy = PollPolicy::fixed(1, Duration::from_millis(20)).wait_first();

    let started = Instant::now();
    wait_for(&job, &policy).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(20));
}

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded polling of export task status.
//!
//! Each task runs through a small state machine:
//!
//! ```text
//!   SUBMITTED ──> POLLING ──(COMPLETED)──────────────> COMPLETED
//!                  │   ^
//!                  │   └──(other code, attempts < retries: sleep)
//!                  └──────(other code, attempts >= retries)──> EXHAUSTED
//! ```
//!
//! A task that never completes is checked `retries + 1` times with `retries`
//! sleeps in between, so the time spent waiting is bounded by
//! `retries * interval`. Running out of budget is an outcome, not an error.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::LogsClient;
use crate::types::{ExportStatus, TaskId};

pub const DEFAULT_POLL_RETRIES: u32 = 10;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Suspends the current export between status checks.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub retries: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            retries: DEFAULT_POLL_RETRIES,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Submitted,
    Polling { attempts: u32 },
    Completed,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollResult {
    /// `Completed`, or `TimedOut` when the budget ran out.
    pub status: ExportStatus,
    /// Number of status queries made.
    pub checks: u32,
    /// Last status the service reported, if any query succeeded.
    pub last_status: Option<ExportStatus>,
}

pub struct StatusPoller<'a, C: ?Sized, S: ?Sized> {
    client: &'a C,
    sleeper: &'a S,
    policy: PollPolicy,
}

impl<'a, C, S> StatusPoller<'a, C, S>
where
    C: LogsClient + ?Sized,
    S: Sleeper + ?Sized,
{
    pub fn new(client: &'a C, sleeper: &'a S, policy: PollPolicy) -> Self {
        StatusPoller {
            client,
            sleeper,
            policy,
        }
    }

    pub async fn poll(&self, task_id: &TaskId) -> PollResult {
        let mut state = PollState::Submitted;
        let mut checks = 0;
        let mut last_status = None;

        loop {
            state = match state {
                PollState::Submitted => PollState::Polling { attempts: 0 },
                PollState::Polling { attempts } => {
                    checks += 1;
                    match self.client.describe_export_task(task_id).await {
                        Ok(ExportStatus::Completed) => {
                            last_status = Some(ExportStatus::Completed);
                            PollState::Completed
                        }
                        observed => {
                            match observed {
                                Ok(status) => {
                                    debug!("Export task {task_id} is {status} (check {checks})");
                                    last_status = Some(status);
                                }
                                Err(e) => {
                                    warn!("Failed to query export task {task_id}: {e}");
                                }
                            }
                            if attempts >= self.policy.retries {
                                PollState::Exhausted
                            } else {
                                self.sleeper.sleep(self.policy.interval).await;
                                PollState::Polling {
                                    attempts: attempts + 1,
                                }
                            }
                        }
                    }
                }
                PollState::Completed => {
                    return PollResult {
                        status: ExportStatus::Completed,
                        checks,
                        last_status,
                    };
                }
                PollState::Exhausted => {
                    warn!(
                        "Export task {task_id} did not complete after {checks} checks, giving up"
                    );
                    return PollResult {
                        status: ExportStatus::TimedOut,
                        checks,
                        last_status,
                    };
                }
            };
        }
    }
}

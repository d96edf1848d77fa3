// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Exports CloudWatch log groups to cold storage and reports the outcome.
//!
//! A run walks the log group listing page by page. For each group it starts an
//! export task over a fixed time window, polls the task under a bounded retry
//! budget and records the outcome. When the listing is exhausted the ordered
//! report is published as a single notification.
//!
//! - [`lister`]: page-at-a-time log group enumeration
//! - [`submitter`]: export task creation and destination prefixes
//! - [`poller`]: bounded status polling
//! - [`report`]: outcome aggregation and rendering
//! - [`notifier`]: report delivery
//! - [`orchestrator`]: the run itself
//!
//! Service access goes through the [`client::LogsClient`] and
//! [`client::NotificationClient`] traits; nothing in this crate reads the
//! process environment.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod client;
pub mod error;
pub mod lister;
pub mod notifier;
pub mod orchestrator;
pub mod poller;
pub mod report;
pub mod submitter;
pub mod types;
pub mod window;

#[cfg(any(test, feature = "test-util"))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod test_support;

pub use error::{DeliveryError, ExportError, ServiceError, SubmissionError, WindowError};
pub use orchestrator::{ExportSettings, Orchestrator};
pub use poller::{PollPolicy, Sleeper, TokioSleeper};
pub use window::TimeWindow;

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Drives one export run end to end.
//!
//! Pages are fetched one at a time and every group on a page is submitted and
//! polled before the next page is requested, so discovery order, processing
//! order and report order are the same. Only listing and publishing failures
//! abort a run; a group whose task cannot be created is reported and skipped.

use tracing::{info, info_span, warn, Instrument};

use crate::client::{LogsClient, NotificationClient};
use crate::error::ExportError;
use crate::lister::{PageLister, MAX_PAGE_SIZE};
use crate::notifier::{Notifier, DEFAULT_SUBJECT};
use crate::poller::{PollPolicy, Sleeper, StatusPoller};
use crate::report::{Report, ReportAggregator};
use crate::submitter::ExportSubmitter;
use crate::types::{GroupOutcome, LogGroupName, NotificationReceipt};
use crate::window::TimeWindow;

/// Plain values the pipeline needs, resolved before the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Bucket the export tasks write to.
    pub destination_root: String,
    /// Topic the report is published to.
    pub topic: String,
    pub subject: String,
    pub page_size: u32,
    pub poll: PollPolicy,
}

impl ExportSettings {
    pub fn new(destination_root: impl Into<String>, topic: impl Into<String>) -> Self {
        ExportSettings {
            destination_root: destination_root.into(),
            topic: topic.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            page_size: MAX_PAGE_SIZE,
            poll: PollPolicy::default(),
        }
    }
}

pub struct Orchestrator<'a, L: ?Sized, N: ?Sized, S: ?Sized> {
    logs: &'a L,
    notifications: &'a N,
    sleeper: &'a S,
    settings: &'a ExportSettings,
}

impl<'a, L, N, S> Orchestrator<'a, L, N, S>
where
    L: LogsClient + ?Sized,
    N: NotificationClient + ?Sized,
    S: Sleeper + ?Sized,
{
    pub fn new(
        logs: &'a L,
        notifications: &'a N,
        sleeper: &'a S,
        settings: &'a ExportSettings,
    ) -> Self {
        Orchestrator {
            logs,
            notifications,
            sleeper,
            settings,
        }
    }

    /// Exports every log group over `window` and publishes the report.
    pub async fn run(&self, window: &TimeWindow) -> Result<NotificationReceipt, ExportError> {
        let report = self.export_all(window).await?;
        let summary = report.summary();
        info!(
            "Export run finished: {} log groups, {} completed, {} timed out, {} failed",
            summary.total, summary.completed, summary.timed_out, summary.failed
        );

        let receipt = Notifier::new(self.notifications, &self.settings.topic)
            .publish(&report, &self.settings.subject)
            .await?;
        info!("Published export report, {receipt}");
        Ok(receipt)
    }

    /// Runs the export for every discovered group and returns the report
    /// without publishing it.
    pub async fn export_all(&self, window: &TimeWindow) -> Result<Report, ExportError> {
        info!(
            "Exporting log groups from {} to {} into {}",
            window.start_label(),
            window.end_label(),
            self.settings.destination_root
        );

        let lister = PageLister::new(self.logs, self.settings.page_size);
        let mut aggregator = ReportAggregator::new();
        let mut token = None;
        let mut pages = 0_usize;

        loop {
            let (names, next_token) = lister.list_page(token.as_ref()).await?;
            pages += 1;
            if pages > 1 {
                info!("Page {pages}: {} log groups", names.len());
            }

            for name in &names {
                let outcome = self
                    .export_group(name, window)
                    .instrument(info_span!("export", log_group = %name))
                    .await;
                aggregator.append(outcome);
            }

            match next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        info!("Listed {pages} pages, {} log groups", aggregator.len());
        Ok(aggregator.render())
    }

    async fn export_group(&self, name: &LogGroupName, window: &TimeWindow) -> GroupOutcome {
        let submitter = ExportSubmitter::new(self.logs);
        let task = match submitter
            .submit(name, window, &self.settings.destination_root)
            .await
        {
            Ok(task) => task,
            Err(e) => {
                warn!("{e}");
                return GroupOutcome::submission_failed(name, &e);
            }
        };

        let poller = StatusPoller::new(self.logs, self.sleeper, self.settings.poll);
        let result = poller.poll(&task.task_id).await;
        GroupOutcome::from_poll(&task, result)
    }
}

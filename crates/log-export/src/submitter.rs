// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::debug;

use crate::client::LogsClient;
use crate::error::SubmissionError;
use crate::types::{ExportTask, ExportTaskRequest, LogGroupName};
use crate::window::TimeWindow;

const PREFIX_ROOT: &str = "cloudwatchlogs_";

/// Bucket-relative prefix the export for `name` over `window` is written to.
///
/// Depends only on its inputs, so re-running the same window lands in the
/// same place.
pub fn destination_prefix(name: &LogGroupName, window: &TimeWindow) -> String {
    format!("{PREFIX_ROOT}{name}/{}", window.start_label())
}

/// Starts export tasks, one log group at a time.
pub struct ExportSubmitter<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: LogsClient + ?Sized> ExportSubmitter<'a, C> {
    pub fn new(client: &'a C) -> Self {
        ExportSubmitter { client }
    }

    pub async fn submit(
        &self,
        name: &LogGroupName,
        window: &TimeWindow,
        destination_root: &str,
    ) -> Result<ExportTask, SubmissionError> {
        let request = ExportTaskRequest {
            task_name: name.to_string(),
            log_group_name: name.clone(),
            from_millis: window.start_millis(),
            to_millis: window.end_millis(),
            destination: destination_root.to_string(),
            destination_prefix: destination_prefix(name, window),
        };

        let task_id = self
            .client
            .create_export_task(&request)
            .await
            .map_err(|source| SubmissionError {
                log_group: name.to_string(),
                source,
            })?;
        debug!(
            task_id = %task_id,
            "Created export task for {name} -> {}/{}",
            request.destination, request.destination_prefix
        );

        Ok(ExportTask {
            task_id,
            log_group_name: request.log_group_name,
            window: *window,
            destination: request.destination,
            destination_prefix: request.destination_prefix,
        })
    }
}

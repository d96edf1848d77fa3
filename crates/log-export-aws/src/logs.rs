// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! CloudWatch Logs through the AWS SDK.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatchlogs::{config, Client};
use tracing::debug;

use log_export::client::LogsClient;
use log_export::types::{
    ExportStatus, ExportTaskRequest, LogGroupName, LogGroupPage, PaginationToken, TaskId,
    UnknownStatusCode,
};
use log_export::ServiceError;

use crate::error::{malformed, service_error};

pub struct CloudWatchLogsClient {
    client: Client,
}

impl CloudWatchLogsClient {
    /// Builds the client from shared SDK settings. `endpoint_url` replaces
    /// the regional endpoint, e.g. for a local emulator.
    pub fn new(sdk: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = config::Builder::from(sdk);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url);
        }
        CloudWatchLogsClient {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl LogsClient for CloudWatchLogsClient {
    async fn list_log_groups(
        &self,
        limit: u32,
        token: Option<&PaginationToken>,
    ) -> Result<LogGroupPage, ServiceError> {
        const OP: &str = "DescribeLogGroups";
        let output = self
            .client
            .describe_log_groups()
            .limit(i32::try_from(limit).unwrap_or(i32::MAX))
            .set_next_token(token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| service_error(OP, e))?;

        let names = output
            .log_groups()
            .iter()
            .map(|group| {
                group
                    .log_group_name()
                    .and_then(LogGroupName::new)
                    .ok_or_else(|| malformed(OP, "log group without a name"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        // an empty token is treated as the end of the listing
        let next_token = output.next_token().and_then(PaginationToken::new);
        debug!(
            "{OP} returned {} log groups, more pages: {}",
            names.len(),
            next_token.is_some()
        );
        Ok(LogGroupPage { names, next_token })
    }

    async fn create_export_task(
        &self,
        request: &ExportTaskRequest,
    ) -> Result<TaskId, ServiceError> {
        const OP: &str = "CreateExportTask";
        let output = self
            .client
            .create_export_task()
            .task_name(&request.task_name)
            .log_group_name(request.log_group_name.as_str())
            .from(request.from_millis)
            .to(request.to_millis)
            .destination(&request.destination)
            .destination_prefix(&request.destination_prefix)
            .send()
            .await
            .map_err(|e| service_error(OP, e))?;
        output
            .task_id()
            .and_then(TaskId::new)
            .ok_or_else(|| malformed(OP, "missing taskId"))
    }

    async fn describe_export_task(&self, task_id: &TaskId) -> Result<ExportStatus, ServiceError> {
        const OP: &str = "DescribeExportTasks";
        let output = self
            .client
            .describe_export_tasks()
            .task_id(task_id.as_str())
            .send()
            .await
            .map_err(|e| service_error(OP, e))?;
        let code = output
            .export_tasks()
            .first()
            .ok_or_else(|| malformed(OP, format!("no export task with id {task_id}")))?
            .status()
            .and_then(|status| status.code())
            .ok_or_else(|| malformed(OP, format!("export task {task_id} has no status code")))?;
        code.as_str()
            .parse()
            .map_err(|e: UnknownStatusCode| malformed(OP, e.to_string()))
    }
}

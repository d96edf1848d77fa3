// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Seams to the remote services the exporter drives.
//!
//! Implementations are expected to validate responses at the boundary and
//! report anything they cannot turn into the typed results below as
//! [`ServiceError::MalformedResponse`].

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{
    ExportStatus, ExportTaskRequest, LogGroupPage, NotificationReceipt, PaginationToken, TaskId,
};

#[async_trait]
pub trait LogsClient: Send + Sync {
    /// Fetches one page of log groups. `token` is `None` for the first page.
    async fn list_log_groups(
        &self,
        limit: u32,
        token: Option<&PaginationToken>,
    ) -> Result<LogGroupPage, ServiceError>;

    async fn create_export_task(&self, request: &ExportTaskRequest)
        -> Result<TaskId, ServiceError>;

    async fn describe_export_task(&self, task_id: &TaskId) -> Result<ExportStatus, ServiceError>;
}

#[async_trait]
pub trait NotificationClient: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotificationReceipt, ServiceError>;
}

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Value types shared by every stage of the export pipeline.

use std::fmt;
use std::str::FromStr;

use crate::window::TimeWindow;

/// Name of a log group, as reported by the logging service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogGroupName(String);

impl LogGroupName {
    /// Returns `None` for an empty name; the service never reports one.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque cursor handed back by the listing call when more pages exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationToken(String);

impl PaginationToken {
    /// An empty token means "no more pages" and maps to `None`.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a service-side export task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of the log group listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogGroupPage {
    pub names: Vec<LogGroupName>,
    pub next_token: Option<PaginationToken>,
}

/// Everything the logging service needs to start an export task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTaskRequest {
    pub task_name: String,
    pub log_group_name: LogGroupName,
    pub from_millis: i64,
    pub to_millis: i64,
    pub destination: String,
    pub destination_prefix: String,
}

/// An export task accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTask {
    pub task_id: TaskId,
    pub log_group_name: LogGroupName,
    pub window: TimeWindow,
    pub destination: String,
    pub destination_prefix: String,
}

/// Status of an export task.
///
/// Every variant except `TimedOut` mirrors a code returned by the logging
/// service. `TimedOut` is produced locally when the poll budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportStatus {
    Pending,
    PendingCancel,
    Running,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
}

impl ExportStatus {
    pub fn code(self) -> &'static str {
        match self {
            ExportStatus::Pending => "PENDING",
            ExportStatus::PendingCancel => "PENDING_CANCEL",
            ExportStatus::Running => "RUNNING",
            ExportStatus::Completed => "COMPLETED",
            ExportStatus::Failed => "FAILED",
            ExportStatus::Cancelled => "CANCELLED",
            ExportStatus::TimedOut => "TIMED_OUT",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export status code '{0}'")]
pub struct UnknownStatusCode(pub String);

impl FromStr for ExportStatus {
    type Err = UnknownStatusCode;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "PENDING" => Ok(ExportStatus::Pending),
            "PENDING_CANCEL" => Ok(ExportStatus::PendingCancel),
            "RUNNING" => Ok(ExportStatus::Running),
            "COMPLETED" => Ok(ExportStatus::Completed),
            "FAILED" => Ok(ExportStatus::Failed),
            "CANCELLED" => Ok(ExportStatus::Cancelled),
            // TIMED_OUT is never sent by the service
            other => Err(UnknownStatusCode(other.to_string())),
        }
    }
}

/// Final result for one log group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub log_group_name: LogGroupName,
    pub final_status: ExportStatus,
    /// `None` when the task could not be created.
    pub task_id: Option<TaskId>,
    pub detail: OutcomeDetail,
}

/// What the report says about a group beyond its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeDetail {
    /// The data landed under this bucket-relative location.
    Exported { destination: String, prefix: String },
    /// The service still reported a failed or cancelled task when polling
    /// gave up.
    Rejected { checks: u32 },
    /// Polling gave up before the task completed.
    NotCompleted {
        checks: u32,
        last_status: Option<ExportStatus>,
    },
    /// The export task was never created.
    SubmissionFailed(String),
}

/// Acknowledgement returned by the notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReceipt {
    pub message_id: String,
}

impl fmt::Display for NotificationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId: {}", self.message_id)
    }
}

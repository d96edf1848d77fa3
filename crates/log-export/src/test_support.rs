// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Scripted in-memory clients shared by the unit and integration tests.
//!
//! Available to other crates and to `tests/` through the `test-util` feature.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{LogsClient, NotificationClient};
use crate::error::ServiceError;
use crate::poller::Sleeper;
use crate::types::{
    ExportStatus, ExportTaskRequest, LogGroupName, LogGroupPage, NotificationReceipt,
    PaginationToken, TaskId,
};

/// Serves a fixed list of pages and per-task status sequences.
///
/// Pages are chained with `page-<n>` tokens and tasks are named
/// `task-<log group>`. A status sequence is replayed in order and its last
/// entry repeats once exhausted; tasks without a sequence report `COMPLETED`.
#[derive(Default)]
pub struct ScriptedLogsClient {
    pages: Vec<Vec<String>>,
    statuses: HashMap<String, Vec<ExportStatus>>,
    failing_submissions: HashSet<String>,
    fail_listing_at: Option<usize>,
    list_tokens: Mutex<Vec<Option<String>>>,
    requests: Mutex<Vec<ExportTaskRequest>>,
    describes: Mutex<HashMap<String, usize>>,
}

impl ScriptedLogsClient {
    pub fn from_pages(pages: Vec<Vec<String>>) -> Self {
        ScriptedLogsClient {
            pages,
            ..Default::default()
        }
    }

    pub fn with_pages(self, pages: &[&[&str]]) -> Self {
        ScriptedLogsClient {
            pages: pages
                .iter()
                .map(|page| page.iter().map(|n| (*n).to_string()).collect())
                .collect(),
            ..self
        }
    }

    pub fn with_statuses(mut self, task: &str, statuses: &[ExportStatus]) -> Self {
        self.statuses.insert(task.to_string(), statuses.to_vec());
        self
    }

    pub fn fail_submission_for(mut self, group: &str) -> Self {
        self.failing_submissions.insert(group.to_string());
        self
    }

    pub fn fail_listing_at(mut self, page: usize) -> Self {
        self.fail_listing_at = Some(page);
        self
    }

    pub fn list_tokens(&self) -> Vec<Option<String>> {
        self.list_tokens.lock().unwrap().clone()
    }

    pub fn export_requests(&self) -> Vec<ExportTaskRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn exported_groups(&self) -> Vec<String> {
        self.export_requests()
            .iter()
            .map(|r| r.log_group_name.to_string())
            .collect()
    }

    pub fn describe_calls(&self) -> u32 {
        self.describes.lock().unwrap().values().sum::<usize>() as u32
    }

    pub fn describe_count(&self, task: &str) -> usize {
        self.describes
            .lock()
            .unwrap()
            .get(task)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LogsClient for ScriptedLogsClient {
    async fn list_log_groups(
        &self,
        _limit: u32,
        token: Option<&PaginationToken>,
    ) -> Result<LogGroupPage, ServiceError> {
        self.list_tokens
            .lock()
            .unwrap()
            .push(token.map(|t| t.as_str().to_string()));
        let index = match token {
            None => 0,
            Some(t) => t.as_str().trim_start_matches("page-").parse().unwrap(),
        };
        if self.fail_listing_at == Some(index) {
            return Err(ServiceError::Transport {
                operation: "DescribeLogGroups",
                message: "connection reset".to_string(),
            });
        }
        let names = self
            .pages
            .get(index)
            .map(|p| p.iter().filter_map(|n| LogGroupName::new(n.as_str())).collect())
            .unwrap_or_default();
        let next_token = if index + 1 < self.pages.len() {
            PaginationToken::new(format!("page-{}", index + 1))
        } else {
            None
        };
        Ok(LogGroupPage { names, next_token })
    }

    async fn create_export_task(
        &self,
        request: &ExportTaskRequest,
    ) -> Result<TaskId, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if self
            .failing_submissions
            .contains(request.log_group_name.as_str())
        {
            return Err(ServiceError::Status {
                operation: "CreateExportTask",
                status: 400,
                body: "InvalidParameterException".to_string(),
            });
        }
        Ok(TaskId::new(format!("task-{}", request.log_group_name)).unwrap())
    }

    async fn describe_export_task(&self, task_id: &TaskId) -> Result<ExportStatus, ServiceError> {
        let mut describes = self.describes.lock().unwrap();
        let seen = describes.entry(task_id.to_string()).or_default();
        *seen += 1;
        match self.statuses.get(task_id.as_str()) {
            Some(sequence) => Ok(sequence[(*seen - 1).min(sequence.len() - 1)]),
            None if task_id.as_str().starts_with("task-") => Ok(ExportStatus::Completed),
            None => Err(ServiceError::Status {
                operation: "DescribeExportTasks",
                status: 400,
                body: "ResourceNotFoundException".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, String, String)>>,
    reject: bool,
}

impl RecordingNotifier {
    pub fn rejecting() -> Self {
        RecordingNotifier {
            reject: true,
            ..Default::default()
        }
    }

    /// `(topic, subject, body)` of every accepted publish.
    pub fn published(&self) -> Vec<(String, String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationClient for RecordingNotifier {
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotificationReceipt, ServiceError> {
        if self.reject {
            return Err(ServiceError::Status {
                operation: "Publish",
                status: 403,
                body: "AuthorizationError".to_string(),
            });
        }
        let mut published = self.published.lock().unwrap();
        published.push((topic.to_string(), subject.to_string(), body.to_string()));
        Ok(NotificationReceipt {
            message_id: format!("msg-{}", published.len()),
        })
    }
}

/// Records requested sleeps without waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

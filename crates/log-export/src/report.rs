// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-group outcomes and the report built from them.
//!
//! Outcomes are kept in the order they were appended, which the orchestrator
//! guarantees is discovery order. Three kinds of failure render differently so
//! a reader can tell them apart:
//!
//! ```text
//! /aws/lambda/api: COMPLETED task=a1 destination=cold/cloudwatchlogs_/aws/lambda/api/2024-05-01T06:00:00+00:00
//! /aws/lambda/jobs: FAILED task=b2 reported by the service after 11 status checks
//! /aws/lambda/etl: did not complete within 11 status checks (last status RUNNING) task=c3
//! /aws/lambda/old: export submission failed: ...
//! ```

use std::fmt;

use crate::error::SubmissionError;
use crate::poller::PollResult;
use crate::types::{ExportStatus, ExportTask, GroupOutcome, LogGroupName, OutcomeDetail};

/// Body published when the enumeration found nothing to export.
pub const EMPTY_REPORT_LINE: &str = "no log groups discovered";

impl GroupOutcome {
    pub fn from_poll(task: &ExportTask, result: PollResult) -> Self {
        let (final_status, detail) = match (result.status, result.last_status) {
            (ExportStatus::Completed, _) => (
                ExportStatus::Completed,
                OutcomeDetail::Exported {
                    destination: task.destination.clone(),
                    prefix: task.destination_prefix.clone(),
                },
            ),
            (_, Some(status @ (ExportStatus::Failed | ExportStatus::Cancelled))) => (
                status,
                OutcomeDetail::Rejected {
                    checks: result.checks,
                },
            ),
            (_, last_status) => (
                ExportStatus::TimedOut,
                OutcomeDetail::NotCompleted {
                    checks: result.checks,
                    last_status,
                },
            ),
        };
        GroupOutcome {
            log_group_name: task.log_group_name.clone(),
            final_status,
            task_id: Some(task.task_id.clone()),
            detail,
        }
    }

    pub fn submission_failed(name: &LogGroupName, error: &SubmissionError) -> Self {
        GroupOutcome {
            log_group_name: name.clone(),
            final_status: ExportStatus::Failed,
            task_id: None,
            detail: OutcomeDetail::SubmissionFailed(error.source.to_string()),
        }
    }
}

impl fmt::Display for GroupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.log_group_name;
        let task = self
            .task_id
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        match &self.detail {
            OutcomeDetail::Exported {
                destination,
                prefix,
            } => write!(
                f,
                "{name}: {} task={task} destination={destination}/{prefix}",
                self.final_status
            ),
            OutcomeDetail::Rejected { checks } => write!(
                f,
                "{name}: {} task={task} reported by the service after {checks} status checks",
                self.final_status
            ),
            OutcomeDetail::NotCompleted {
                checks,
                last_status,
            } => {
                let last = last_status.map_or("unknown", ExportStatus::code);
                write!(
                    f,
                    "{name}: did not complete within {checks} status checks (last status {last}) task={task}"
                )
            }
            OutcomeDetail::SubmissionFailed(reason) => {
                write!(f, "{name}: export submission failed: {reason}")
            }
        }
    }
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
}

/// Accumulates outcomes in append order.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    outcomes: Vec<GroupOutcome>,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, outcome: GroupOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            match outcome.final_status {
                ExportStatus::Completed => summary.completed += 1,
                ExportStatus::TimedOut => summary.timed_out += 1,
                _ => summary.failed += 1,
            }
        }
        summary
    }

    pub fn render(self) -> Report {
        let summary = self.summary();
        let lines = self.outcomes.iter().map(ToString::to_string).collect();
        Report {
            outcomes: self.outcomes,
            lines,
            summary,
        }
    }
}

/// The finished, read-only report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<GroupOutcome>,
    lines: Vec<String>,
    summary: ReportSummary,
}

impl Report {
    pub fn outcomes(&self) -> &[GroupOutcome] {
        &self.outcomes
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn summary(&self) -> ReportSummary {
        self.summary
    }

    /// One line per outcome, newline separated, no trailing newline.
    pub fn body(&self) -> String {
        if self.lines.is_empty() {
            return EMPTY_REPORT_LINE.to_string();
        }
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::types::TaskId;
    use crate::window::TimeWindow;
    use chrono::{TimeZone, Utc};

    fn name(s: &str) -> LogGroupName {
        LogGroupName::new(s).unwrap()
    }

    fn task(group: &str) -> ExportTask {
        ExportTask {
            task_id: TaskId::new(format!("task-{group}")).unwrap(),
            log_group_name: name(group),
            window: TimeWindow::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 2, 6, 0, 0).unwrap(),
            )
            .unwrap(),
            destination: "cold".to_string(),
            destination_prefix: format!("cloudwatchlogs_{group}/2024-05-01T06:00:00+00:00"),
        }
    }

    fn poll(status: ExportStatus, checks: u32, last: Option<ExportStatus>) -> PollResult {
        PollResult {
            status,
            checks,
            last_status: last,
        }
    }

    #[test]
    fn test_completed_line() {
        let outcome = GroupOutcome::from_poll(
            &task("A"),
            poll(ExportStatus::Completed, 1, Some(ExportStatus::Completed)),
        );
        assert_eq!(
            outcome.to_string(),
            "A: COMPLETED task=task-A destination=cold/cloudwatchlogs_A/2024-05-01T06:00:00+00:00"
        );
    }

    #[test]
    fn test_timed_out_line_is_explicit() {
        let outcome = GroupOutcome::from_poll(
            &task("C"),
            poll(ExportStatus::TimedOut, 3, Some(ExportStatus::Running)),
        );
        assert_eq!(outcome.final_status, ExportStatus::TimedOut);
        assert_eq!(
            outcome.to_string(),
            "C: did not complete within 3 status checks (last status RUNNING) task=task-C"
        );
    }

    #[test]
    fn test_timed_out_without_any_status() {
        let outcome = GroupOutcome::from_poll(&task("C"), poll(ExportStatus::TimedOut, 2, None));
        assert_eq!(
            outcome.to_string(),
            "C: did not complete within 2 status checks (last status unknown) task=task-C"
        );
    }

    #[test]
    fn test_service_failure_is_distinct_from_timeout() {
        let outcome = GroupOutcome::from_poll(
            &task("D"),
            poll(ExportStatus::TimedOut, 11, Some(ExportStatus::Failed)),
        );
        assert_eq!(outcome.final_status, ExportStatus::Failed);
        assert_eq!(
            outcome.to_string(),
            "D: FAILED task=task-D reported by the service after 11 status checks"
        );
    }

    #[test]
    fn test_submission_failure_line() {
        let error = SubmissionError {
            log_group: "E".to_string(),
            source: ServiceError::Status {
                operation: "CreateExportTask",
                status: 400,
                body: "LimitExceededException".to_string(),
            },
        };
        let outcome = GroupOutcome::submission_failed(&name("E"), &error);
        assert_eq!(outcome.task_id, None);
        assert_eq!(
            outcome.to_string(),
            "E: export submission failed: CreateExportTask returned HTTP 400: LimitExceededException"
        );
    }

    #[test]
    fn test_render_preserves_order_without_trailing_newline() {
        let mut aggregator = ReportAggregator::new();
        for group in ["B", "A", "C"] {
            aggregator.append(GroupOutcome::from_poll(
                &task(group),
                poll(ExportStatus::Completed, 1, Some(ExportStatus::Completed)),
            ));
        }
        let report = aggregator.render();
        let body = report.body();

        assert_eq!(body.lines().count(), 3);
        assert!(!body.ends_with('\n'));
        let order: Vec<&str> = report
            .outcomes()
            .iter()
            .map(|o| o.log_group_name.as_str())
            .collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert!(body.starts_with("B: COMPLETED"));
    }

    #[test]
    fn test_empty_report_has_marker_body() {
        let report = ReportAggregator::new().render();
        assert_eq!(report.body(), EMPTY_REPORT_LINE);
        assert_eq!(report.summary(), ReportSummary::default());
    }

    #[test]
    fn test_summary_counts() {
        let mut aggregator = ReportAggregator::new();
        aggregator.append(GroupOutcome::from_poll(
            &task("A"),
            poll(ExportStatus::Completed, 1, Some(ExportStatus::Completed)),
        ));
        aggregator.append(GroupOutcome::from_poll(
            &task("B"),
            poll(ExportStatus::TimedOut, 3, Some(ExportStatus::Pending)),
        ));
        aggregator.append(GroupOutcome::from_poll(
            &task("C"),
            poll(ExportStatus::TimedOut, 3, Some(ExportStatus::Cancelled)),
        ));

        assert_eq!(
            aggregator.summary(),
            ReportSummary {
                total: 3,
                completed: 1,
                timed_out: 1,
                failed: 1,
            }
        );
    }
}

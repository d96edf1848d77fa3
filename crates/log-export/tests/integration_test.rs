// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{TimeZone, Utc};
use log_export::test_support::{RecordingNotifier, RecordingSleeper, ScriptedLogsClient};
use log_export::types::ExportStatus;
use log_export::{ExportError, ExportSettings, Orchestrator, PollPolicy, TimeWindow};
use proptest::prelude::*;
use std::time::Duration;

const TOPIC: &str = "arn:aws:sns:us-west-1:123456789012:log-exports";

fn window() -> TimeWindow {
    TimeWindow::lookback(Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap(), 36, 12).unwrap()
}

fn settings(retries: u32) -> ExportSettings {
    ExportSettings {
        poll: PollPolicy {
            retries,
            interval: Duration::from_secs(10),
        },
        ..ExportSettings::new("cloudwatch-logs-coldstorage", TOPIC)
    }
}

#[tokio::test]
async fn test_single_page_two_groups() {
    let logs = ScriptedLogsClient::default().with_pages(&[&["A", "B"]]);
    let notifications = RecordingNotifier::default();
    let sleeper = RecordingSleeper::default();
    let settings = settings(10);

    let receipt = Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .run(&window())
        .await
        .expect("run should succeed");

    assert_eq!(receipt.message_id, "msg-1");
    let published = notifications.published();
    assert_eq!(published.len(), 1);
    let (topic, subject, body) = &published[0];
    assert_eq!(topic, TOPIC);
    assert_eq!(subject, "CloudWatch Logs Export Results");
    assert_eq!(
        body,
        "A: COMPLETED task=task-A destination=cloudwatch-logs-coldstorage/cloudwatchlogs_A/2024-05-01T06:00:00+00:00\n\
         B: COMPLETED task=task-B destination=cloudwatch-logs-coldstorage/cloudwatchlogs_B/2024-05-01T06:00:00+00:00"
    );
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn test_group_that_never_completes_is_reported() {
    let logs = ScriptedLogsClient::default().with_pages(&[&["C"]]).with_statuses("task-C", &[ExportStatus::Pending]);
    let notifications = RecordingNotifier::default();
    let sleeper = RecordingSleeper::default();
    let settings = settings(2);

    Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .run(&window())
        .await
        .expect("run should still publish");

    let published = notifications.published();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].2,
        "C: did not complete within 3 status checks (last status PENDING) task=task-C"
    );
    assert_eq!(logs.describe_count("task-C"), 3);
    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_secs(10), Duration::from_secs(10)]
    );
}

#[tokio::test]
async fn test_second_page_groups_are_processed_once() {
    let logs = ScriptedLogsClient::default().with_pages(&[&["A"], &["B"]]);
    let notifications = RecordingNotifier::default();
    let sleeper = RecordingSleeper::default();
    let settings = settings(10);

    Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .run(&window())
        .await
        .unwrap();

    assert_eq!(logs.list_tokens().len(), 2);
    assert_eq!(logs.exported_groups(), vec!["A", "B"]);
    let body = notifications.published()[0].2.clone();
    assert_eq!(body.lines().count(), 2);
    assert!(body.lines().next().unwrap().starts_with("A: COMPLETED"));
    assert!(body.lines().nth(1).unwrap().starts_with("B: COMPLETED"));
}

#[tokio::test]
async fn test_submission_failure_does_not_abort_run() {
    let logs = ScriptedLogsClient::default()
        .with_pages(&[&["A", "B"], &["C"]])
        .fail_submission_for("B");
    let notifications = RecordingNotifier::default();
    let sleeper = RecordingSleeper::default();
    let settings = settings(10);

    Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .run(&window())
        .await
        .unwrap();

    let body = notifications.published()[0].2.clone();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("A: COMPLETED"));
    assert_eq!(
        lines[1],
        "B: export submission failed: CreateExportTask returned HTTP 400: InvalidParameterException"
    );
    assert!(lines[2].starts_with("C: COMPLETED"));
    assert_eq!(logs.describe_count("task-B"), 0);
}

#[tokio::test]
async fn test_explicit_failure_and_timeout_are_distinguishable() {
    let logs = ScriptedLogsClient::default().with_pages(&[&["failed", "slow"]])
        .with_statuses("task-failed", &[ExportStatus::Running, ExportStatus::Failed])
        .with_statuses("task-slow", &[ExportStatus::Running]);
    let notifications = RecordingNotifier::default();
    let sleeper = RecordingSleeper::default();
    let settings = settings(1);

    let report = Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .export_all(&window())
        .await
        .unwrap();

    let statuses: Vec<ExportStatus> = report.outcomes().iter().map(|o| o.final_status).collect();
    assert_eq!(statuses, vec![ExportStatus::Failed, ExportStatus::TimedOut]);
    assert_eq!(
        report.lines()[0],
        "failed: FAILED task=task-failed reported by the service after 2 status checks"
    );
}

#[tokio::test]
async fn test_publish_failure_is_fatal() {
    let logs = ScriptedLogsClient::default().with_pages(&[&["A"]]);
    let notifications = RecordingNotifier::rejecting();
    let sleeper = RecordingSleeper::default();
    let settings = settings(10);

    let result = Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .run(&window())
        .await;

    match result {
        Err(ExportError::Delivery(e)) => assert_eq!(e.topic, TOPIC),
        other => panic!("expected delivery error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rerun_with_same_window_reuses_prefixes() {
    let window = window();
    let settings = settings(10);
    let mut runs = Vec::new();

    for _ in 0..2 {
        let logs =
            ScriptedLogsClient::default().with_pages(&[&["/aws/lambda/api"], &["/ecs/worker"]]);
        let notifications = RecordingNotifier::default();
        let sleeper = RecordingSleeper::default();
        Orchestrator::new(&logs, &notifications, &sleeper, &settings)
            .run(&window)
            .await
            .unwrap();
        runs.push(
            logs.export_requests()
                .into_iter()
                .map(|r| r.destination_prefix)
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(runs[0], runs[1]);
    assert_eq!(
        runs[0],
        vec![
            "cloudwatchlogs_/aws/lambda/api/2024-05-01T06:00:00+00:00",
            "cloudwatchlogs_/ecs/worker/2024-05-01T06:00:00+00:00",
        ]
    );
}

#[tokio::test]
async fn test_empty_listing_still_publishes() {
    let logs = ScriptedLogsClient::default().with_pages(&[&[]]);
    let notifications = RecordingNotifier::default();
    let sleeper = RecordingSleeper::default();
    let settings = settings(10);

    Orchestrator::new(&logs, &notifications, &sleeper, &settings)
        .run(&window())
        .await
        .unwrap();

    assert_eq!(notifications.published()[0].2, "no log groups discovered");
}

fn unique_pages() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(0_u32..1_000, 0..6), 1..6).prop_map(|pages| {
        let mut next = 0;
        pages
            .into_iter()
            .map(|page| {
                page.into_iter()
                    .map(|salt| {
                        next += 1;
                        format!("/group/{next}-{salt}")
                    })
                    .collect()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_report_lists_every_group_once_in_discovery_order(pages in unique_pages()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let expected: Vec<String> = pages.iter().flatten().cloned().collect();
        let page_count = pages.len();
        let logs = ScriptedLogsClient::from_pages(pages);
        let notifications = RecordingNotifier::default();
        let sleeper = RecordingSleeper::default();
        let settings = settings(3);

        let report = runtime
            .block_on(
                Orchestrator::new(&logs, &notifications, &sleeper, &settings)
                    .export_all(&window()),
            )
            .unwrap();

        let reported: Vec<String> = report
            .outcomes()
            .iter()
            .map(|o| o.log_group_name.to_string())
            .collect();
        prop_assert_eq!(&reported, &expected);
        prop_assert_eq!(logs.exported_groups(), expected);
        prop_assert_eq!(logs.list_tokens().len(), page_count);
    }
}

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::{debug, error};

use crate::client::NotificationClient;
use crate::error::DeliveryError;
use crate::report::Report;
use crate::types::NotificationReceipt;

pub const DEFAULT_SUBJECT: &str = "CloudWatch Logs Export Results";

/// Publishes a finished report to one topic. Nothing is retried here.
pub struct Notifier<'a, N: ?Sized> {
    client: &'a N,
    topic: &'a str,
}

impl<'a, N: NotificationClient + ?Sized> Notifier<'a, N> {
    pub fn new(client: &'a N, topic: &'a str) -> Self {
        Notifier { client, topic }
    }

    pub async fn publish(
        &self,
        report: &Report,
        subject: &str,
    ) -> Result<NotificationReceipt, DeliveryError> {
        let body = report.body();
        debug!(
            "Publishing export report ({} lines) to {}",
            report.lines().len(),
            self.topic
        );
        self.client
            .publish(self.topic, subject, &body)
            .await
            .map_err(|source| {
                error!("Export report was not delivered to {}: {source}", self.topic);
                DeliveryError {
                    topic: self.topic.to_string(),
                    source,
                }
            })
    }
}

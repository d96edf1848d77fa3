// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sns::{config, Client};
use tracing::debug;

use log_export::client::NotificationClient;
use log_export::types::NotificationReceipt;
use log_export::ServiceError;

use crate::error::{malformed, service_error};

const OPERATION: &str = "Publish";

pub struct SnsClient {
    client: Client,
}

impl SnsClient {
    pub fn new(sdk: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = config::Builder::from(sdk);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url);
        }
        SnsClient {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl NotificationClient for SnsClient {
    async fn publish(
        &self,
        topic: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotificationReceipt, ServiceError> {
        debug!("Publishing {} bytes to {topic}", body.len());
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|e| service_error(OPERATION, e))?;
        let message_id = output
            .message_id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed(OPERATION, "missing MessageId"))?;
        Ok(NotificationReceipt {
            message_id: message_id.to_string(),
        })
    }
}

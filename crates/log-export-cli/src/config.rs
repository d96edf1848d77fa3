// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::str::FromStr;
use std::time::Duration;

use log_export::lister::MAX_PAGE_SIZE;
use log_export::notifier::DEFAULT_SUBJECT;
use log_export::poller::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_RETRIES};
use log_export::{ExportSettings, PollPolicy};

const DEFAULT_REGION: &str = "us-west-1";
const DEFAULT_BUCKET: &str = "cloudwatch-logs-coldstorage";
const DEFAULT_PROFILE: &str = "localadmin";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the binary needs, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub region: String,
    pub topic_arn: String,
    pub bucket: String,
    pub profile: String,
    pub subject: String,
    pub poll_retries: u32,
    pub poll_interval: Duration,
    pub page_size: u32,
    pub logs_endpoint: Option<String>,
    pub sns_endpoint: Option<String>,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl ExportConfig {
    pub fn from_env() -> Result<ExportConfig, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<ExportConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = ExportConfig {
            region: get("LOGS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            topic_arn: get("LOGS_SNS_TOPIC").ok_or(ConfigError::Missing("LOGS_SNS_TOPIC"))?,
            bucket: get("LOGS_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            profile: get("LOGS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            subject: get("LOGS_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            poll_retries: parse(
                "LOGS_POLL_RETRIES",
                get("LOGS_POLL_RETRIES"),
                "a non-negative integer",
            )?
            .unwrap_or(DEFAULT_POLL_RETRIES),
            poll_interval: parse(
                "LOGS_POLL_INTERVAL_SECS",
                get("LOGS_POLL_INTERVAL_SECS"),
                "a number of seconds",
            )?
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs),
            page_size: parse("LOGS_PAGE_SIZE", get("LOGS_PAGE_SIZE"), "an integer")?
                .unwrap_or(MAX_PAGE_SIZE),
            logs_endpoint: endpoint("LOGS_ENDPOINT_URL", get("LOGS_ENDPOINT_URL"))?,
            sns_endpoint: endpoint("SNS_ENDPOINT_URL", get("SNS_ENDPOINT_URL"))?,
            http_timeout: parse(
                "LOGS_HTTP_TIMEOUT_SECS",
                get("LOGS_HTTP_TIMEOUT_SECS"),
                "a number of seconds",
            )?
            .map_or(DEFAULT_HTTP_TIMEOUT, Duration::from_secs),
            log_level: get("LOG_EXPORT_LOG_LEVEL")
                .map_or_else(|| "info".to_string(), |level| level.to_lowercase()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::Invalid {
                name: "LOGS_PAGE_SIZE",
                expected: "between 1 and 50",
                value: self.page_size.to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "LOGS_HTTP_TIMEOUT_SECS",
                expected: "greater than zero",
                value: "0".to_string(),
            });
        }
        if !self.topic_arn.starts_with("arn:") {
            return Err(ConfigError::Invalid {
                name: "LOGS_SNS_TOPIC",
                expected: "a topic ARN",
                value: self.topic_arn.clone(),
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            destination_root: self.bucket.clone(),
            topic: self.topic_arn.clone(),
            subject: self.subject.clone(),
            page_size: self.page_size,
            poll: PollPolicy {
                retries: self.poll_retries,
                interval: self.poll_interval,
            },
        }
    }
}

/// Endpoint overrides must be absolute http(s) URLs.
fn endpoint(name: &'static str, value: Option<String>) -> Result<Option<String>, ConfigError> {
    value
        .map(|v| {
            let url = v.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(ConfigError::Invalid {
                    name,
                    expected: "an http or https URL",
                    value: v,
                })
            }
        })
        .transpose()
}

fn parse<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
                name,
                expected,
                value: v,
            })
        })
        .transpose()
}

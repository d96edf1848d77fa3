// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Failure reported by (or while talking to) a remote service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request to {operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} returned a malformed response: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },
}

/// The export task for one log group could not be created.
#[derive(Debug, thiserror::Error)]
#[error("export task for log group '{log_group}' was not created: {source}")]
pub struct SubmissionError {
    pub log_group: String,
    #[source]
    pub source: ServiceError,
}

/// The report could not be handed to the notification channel.
#[derive(Debug, thiserror::Error)]
#[error("failed to publish export report to '{topic}': {source}")]
pub struct DeliveryError {
    pub topic: String,
    #[source]
    pub source: ServiceError,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("window start {start} is not before window end {end}")]
    Empty { start: String, end: String },

    #[error("window end {end} is newer than the staleness bound allows (latest {latest})")]
    TooRecent { end: String, latest: String },

    #[error("offset of {0} hours is out of range")]
    OutOfRange(u32),
}

/// Errors that abort an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to list log groups: {0}")]
    Listing(#[from] ServiceError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("invalid export window: {0}")]
    Window(#[from] WindowError),
}

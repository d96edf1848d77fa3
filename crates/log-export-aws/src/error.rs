// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::error::Error;
use tracing::error;

use log_export::ServiceError;

/// Maps an SDK failure onto the exporter's service error.
///
/// Error responses keep their HTTP status and `code: message`. A successful
/// response the SDK could not parse is malformed. Anything else (timeouts,
/// connection failures, request construction) is transport.
pub(crate) fn service_error<E>(operation: &'static str, err: SdkError<E>) -> ServiceError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(context) if context.raw().status().is_success() => {
            ServiceError::MalformedResponse {
                operation,
                message: DisplayErrorContext(context.err()).to_string(),
            }
        }
        SdkError::ServiceError(context) => {
            let status = context.raw().status().as_u16();
            let source = context.err();
            let body = match (source.code(), source.message()) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (Some(code), None) => code.to_string(),
                _ => DisplayErrorContext(source).to_string(),
            };
            error!("{operation} failed with status {status}: {body}");
            ServiceError::Status {
                operation,
                status,
                body,
            }
        }
        unparsed @ SdkError::ResponseError(_) => ServiceError::MalformedResponse {
            operation,
            message: DisplayErrorContext(&unparsed).to_string(),
        },
        other => ServiceError::Transport {
            operation,
            message: DisplayErrorContext(&other).to_string(),
        },
    }
}

pub(crate) fn malformed(operation: &'static str, message: impl Into<String>) -> ServiceError {
    ServiceError::MalformedResponse {
        operation,
        message: message.into(),
    }
}

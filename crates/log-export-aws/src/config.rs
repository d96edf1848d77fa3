// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared SDK configuration for the service clients.
//!
//! Credentials and region resolution follow the SDK's default chain for the
//! named profile: environment variables, then the shared config and
//! credentials files (including `[profile name]` sections, SSO and
//! assume-role profiles), then container and instance metadata.

use aws_config::{timeout::TimeoutConfig, BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_sdk_cloudwatchlogs::config::Region;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("no credentials provider is configured")]
    NotConfigured,

    #[error("could not load credentials for profile '{profile}': {message}")]
    Unavailable { profile: String, message: String },
}

/// Loads the SDK configuration for `profile`, with an explicit region and a
/// per-attempt timeout applied to every call.
pub async fn load_sdk_config(profile: &str, region: &str, timeout: Duration) -> SdkConfig {
    debug!("Loading AWS configuration for profile '{profile}' in {region}");
    aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .region(Region::new(region.to_string()))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_attempt_timeout(timeout)
                .build(),
        )
        .load()
        .await
}

/// Resolves credentials once up front, so a missing or broken profile fails
/// the run before any listing starts.
pub async fn resolve_credentials(
    config: &SdkConfig,
    profile: &str,
) -> Result<Credentials, CredentialsError> {
    let provider = config
        .credentials_provider()
        .ok_or(CredentialsError::NotConfigured)?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| CredentialsError::Unavailable {
            profile: profile.to_string(),
            message: DisplayErrorContext(&e).to_string(),
        })
}

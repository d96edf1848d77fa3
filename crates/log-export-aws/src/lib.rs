// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! AWS implementations of the exporter's service clients.
//!
//! Configuration and credentials come from the SDK's default provider chain
//! for a named profile; both clients are built from the same [`SdkConfig`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
mod error;
pub mod logs;
pub mod sns;

pub use aws_config::SdkConfig;
pub use config::{load_sdk_config, resolve_credentials, CredentialsError};
pub use logs::CloudWatchLogsClient;
pub use sns::SnsClient;

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Export time window.
//!
//! The logging service only guarantees that ingested events are exportable
//! after a bounded delay (the staleness bound), so a window must end at least
//! that far in the past. The window is carried as UTC instants and exposed in
//! the two shapes the pipeline needs: epoch milliseconds for the export request
//! and a human readable RFC 3339 stamp for destination prefixes.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::error::WindowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::Empty {
                start: stamp(start),
                end: stamp(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Builds the window `[now - hours_back, now - staleness_bound_hours)`.
    pub fn lookback(
        now: DateTime<Utc>,
        hours_back: u32,
        staleness_bound_hours: u32,
    ) -> Result<Self, WindowError> {
        let start = hours_before(now, hours_back)?;
        let end = hours_before(now, staleness_bound_hours)?;
        let window = Self::new(start, end)?;
        window.check_staleness(now, staleness_bound_hours)?;
        Ok(window)
    }

    /// Fails when the window ends closer to `now` than the staleness bound.
    pub fn check_staleness(
        &self,
        now: DateTime<Utc>,
        staleness_bound_hours: u32,
    ) -> Result<(), WindowError> {
        let latest = hours_before(now, staleness_bound_hours)?;
        if self.end > latest {
            return Err(WindowError::TooRecent {
                end: stamp(self.end),
                latest: stamp(latest),
            });
        }
        Ok(())
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    /// RFC 3339 start stamp, e.g. `2024-05-01T06:00:00+00:00`.
    pub fn start_label(&self) -> String {
        stamp(self.start)
    }

    pub fn end_label(&self) -> String {
        stamp(self.end)
    }
}

fn hours_before(now: DateTime<Utc>, hours: u32) -> Result<DateTime<Utc>, WindowError> {
    now.checked_sub_signed(Duration::hours(i64::from(hours)))
        .ok_or(WindowError::OutOfRange(hours))
}

fn stamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::debug;

use crate::client::LogsClient;
use crate::error::ServiceError;
use crate::types::{LogGroupName, PaginationToken};

/// Largest page `DescribeLogGroups` will return.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Walks the log group listing one page at a time.
pub struct PageLister<'a, C: ?Sized> {
    client: &'a C,
    page_size: u32,
}

impl<'a, C: LogsClient + ?Sized> PageLister<'a, C> {
    pub fn new(client: &'a C, page_size: u32) -> Self {
        PageLister {
            client,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Returns the names on the page and the token for the next one, if any.
    /// Service order is preserved. Errors are not retried here.
    pub async fn list_page(
        &self,
        token: Option<&PaginationToken>,
    ) -> Result<(Vec<LogGroupName>, Option<PaginationToken>), ServiceError> {
        let page = self.client.list_log_groups(self.page_size, token).await?;
        debug!(
            "Listed {} log groups (first page: {}, more pages: {})",
            page.names.len(),
            token.is_none(),
            page.next_token.is_some()
        );
        Ok((page.names, page.next_token))
    }
}

//! Offset pagination for collection fields

use crate::rest::QueryParams;
use crate::{GatewayError, Result};

/// `limit`/`skip` arguments of a collection field
///
/// Either may be omitted; omitted arguments are not forwarded upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageArgs {
    /// Maximum number of items to return
    pub limit: Option<i32>,

    /// Number of items to skip
    pub skip: Option<i32>,
}

impl PageArgs {
    pub fn new(limit: Option<i32>, skip: Option<i32>) -> Self {
        Self { limit, skip }
    }

    /// Validate pagination arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            if limit < 0 {
                return Err(GatewayError::InvalidArgument(
                    "'limit' must be non-negative".to_string(),
                ));
            }
        }

        if let Some(skip) = self.skip {
            if skip < 0 {
                return Err(GatewayError::InvalidArgument(
                    "'skip' must be non-negative".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Upstream query parameters (`_limit`, `_skip`) for the provided arguments
    pub fn to_query(&self) -> Result<QueryParams> {
        self.validate()?;

        let mut query = QueryParams::new();
        if let Some(limit) = self.limit {
            query.insert("_limit".to_string(), limit.to_string());
        }
        if let Some(skip) = self.skip {
            query.insert("_skip".to_string(), skip.to_string());
        }
        Ok(query)
    }
}

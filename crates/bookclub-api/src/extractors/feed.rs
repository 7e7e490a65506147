//! Feed cursor extractor
//!
//! Reads `before`, `after` and `limit` from the query string. Cursors are
//! message ids; the limit is clamped by the service.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use bookclub_service::dto::FeedCursor;
use serde::Deserialize;

use crate::response::ApiError;

/// Raw feed query parameters
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub before: Option<i64>,
    #[serde(default)]
    pub after: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Validated keyset cursor
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedQuery(pub FeedCursor);

impl TryFrom<FeedParams> for FeedQuery {
    type Error = ApiError;

    fn try_from(params: FeedParams) -> Result<Self, Self::Error> {
        if params.before.is_some_and(|id| id <= 0) {
            return Err(ApiError::invalid_query("Invalid 'before' cursor"));
        }
        if params.after.is_some_and(|id| id < 0) {
            return Err(ApiError::invalid_query("Invalid 'after' cursor"));
        }

        Ok(FeedQuery(FeedCursor {
            before: params.before,
            after: params.after,
            limit: params.limit,
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for FeedQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<FeedParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        FeedQuery::try_from(params)
    }
}

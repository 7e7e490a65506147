//! Keyset feed helpers shared by club and conversation listings

use bookclub_core::traits::MessageQuery;

use crate::dto::{FeedCursor, PaginatedResponse};

/// Build the repository query for a cursor, applying the feed's default size
pub(crate) fn message_query<I: From<i64>>(cursor: FeedCursor, default_limit: i64) -> MessageQuery<I> {
    MessageQuery {
        before: cursor.before.map(I::from),
        after: cursor.after.map(I::from),
        limit: cursor.limit.unwrap_or(default_limit),
    }
}

/// Wrap a newest-first page with its cursors
pub(crate) fn page<T>(items: Vec<T>, limit: i64, id_of: impl Fn(&T) -> i64) -> PaginatedResponse<T> {
    let after = items.first().map(&id_of);
    let before = items.last().map(&id_of);
    let has_more = i64::try_from(items.len()).unwrap_or(i64::MAX) >= limit;
    PaginatedResponse::new(items, before, after, has_more, limit)
}

//! Per-user post throttle
//!
//! Club and direct message posts share one keyed limiter, so a user's
//! budget is spent across both. Only posts that are about to be stored
//! are counted.

use std::num::NonZeroU32;

use bookclub_common::AppError;
use bookclub_core::UserId;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;

use super::error::ServiceResult;

/// Keyed rate limiter over message posting
pub struct PostThrottle {
    limiter: Option<DefaultKeyedRateLimiter<UserId>>,
}

impl PostThrottle {
    /// Allow `per_minute` posts per user; zero disables the throttle
    pub fn per_minute(per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(per_minute).map(|n| RateLimiter::keyed(Quota::per_minute(n)));
        Self { limiter }
    }

    /// Spend one post from the user's budget
    pub fn check(&self, user_id: UserId) -> ServiceResult<()> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        limiter.check_key(&user_id).map_err(|_| {
            warn!(user_id = %user_id, "Post throttled");
            AppError::RateLimitExceeded.into()
        })
    }

    /// Drop state for users whose budget has fully refilled
    pub fn retain_recent(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
        }
    }
}

impl std::fmt::Debug for PostThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostThrottle")
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

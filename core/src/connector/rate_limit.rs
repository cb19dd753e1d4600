/*
 * rate_limit.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of flattr-rs.
 *
 * flattr-rs is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * flattr-rs is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with flattr-rs.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Request quota reported by the API in `X-RateLimit-*` headers.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tracing::trace;

/// Quota as of the last response. A field is `None` when its header was
/// absent from that response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub current: Option<u64>,
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimit {
    /// Read the quota from response headers.
    pub fn from_headers(headers: &[(String, String)]) -> RateLimit {
        let number = |name: &str| -> Option<u64> {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .and_then(|(_, v)| v.trim().parse().ok())
        };
        RateLimit {
            limit: number("X-RateLimit-Limit"),
            remaining: number("X-RateLimit-Remaining"),
            current: number("X-RateLimit-Current"),
            reset: number("X-RateLimit-Reset")
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Shared, updatable `RateLimit`. Clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct RateLimitTracker {
    inner: Arc<Mutex<RateLimit>>,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored quota with what these headers say.
    pub fn update(&self, headers: &[(String, String)]) {
        let limit = RateLimit::from_headers(headers);
        trace!(
            limit = ?limit.limit,
            remaining = ?limit.remaining,
            current = ?limit.current,
            "rate limit"
        );
        if let Ok(mut current) = self.inner.lock() {
            *current = limit;
        }
    }

    pub fn get(&self) -> RateLimit {
        match self.inner.lock() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/*
 * blocking.rs
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

//! Blocking wrappers: each call runs one request to completion on the
//! calling thread, on a private current-thread runtime.
//!
//! Do not call these from inside an async context; use the services directly
//! there.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::connector::{Connector, RateLimit};
use crate::error::Result;
use crate::model::{
    Activity, ActivityType, AutoSubmission, Category, Flattr, FlattrResult, Language, SearchQuery,
    SearchResult, Submission, Subscription, Thing, ThingId, User, UserId,
};
use crate::oauth::AccessToken;
use crate::request::FlattrRequest;
use crate::service::{FlattrService, OpenService};

fn runtime() -> Result<Arc<Runtime>> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(Arc::new(runtime))
}

/// Generates `pub fn name(&self, args) -> Result<T>` forwarding to the async service.
macro_rules! blocking {
    ($( $(#[$meta:meta])* fn $name:ident(&self $(, $arg:ident : $ty:ty)*) -> $out:ty; )*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self $(, $arg: $ty)*) -> Result<$out> {
                self.runtime.block_on(self.inner.$name($($arg),*))
            }
        )*
    };
}

#[derive(Debug, Clone)]
pub struct BlockingOpenService {
    inner: OpenService,
    runtime: Arc<Runtime>,
}

impl BlockingOpenService {
    pub fn new(connector: Connector) -> Result<Self> {
        Ok(Self {
            inner: OpenService::new(connector),
            runtime: runtime()?,
        })
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.inner.rate_limit()
    }

    blocking! {
        fn get_thing(&self, id: &ThingId) -> Thing;
        fn get_things(&self, ids: &[ThingId]) -> Vec<Thing>;
        fn get_things_by_user(&self, user: &UserId) -> Vec<Thing>;
        fn lookup(&self, url: &str) -> Option<Thing>;
        fn search(&self, query: &SearchQuery) -> SearchResult;
        fn get_categories(&self) -> Vec<Category>;
        fn get_languages(&self) -> Vec<Language>;
        fn get_user(&self, user: &UserId) -> User;
        fn get_flattrs_by_user(&self, user: &UserId) -> Vec<Flattr>;
        fn get_flattrs_by_thing(&self, id: &ThingId) -> Vec<Flattr>;
        fn get_activities(&self, user: &UserId, kind: ActivityType) -> Vec<Activity>;
    }
}

#[derive(Debug, Clone)]
pub struct BlockingFlattrService {
    inner: FlattrService,
    runtime: Arc<Runtime>,
}

impl BlockingFlattrService {
    pub fn new(connector: Connector, token: AccessToken) -> Result<Self> {
        Ok(Self {
            inner: FlattrService::new(connector, token),
            runtime: runtime()?,
        })
    }

    /// The public calls, made with this user's token, on the same runtime.
    pub fn open(&self) -> BlockingOpenService {
        BlockingOpenService {
            inner: self.inner.open().clone(),
            runtime: self.runtime.clone(),
        }
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.inner.rate_limit()
    }

    pub fn execute<R: FlattrRequest>(&self, request: &R) -> Result<R::Output> {
        self.runtime.block_on(request.execute(&self.inner))
    }

    blocking! {
        fn get_myself(&self) -> User;
        fn get_my_things(&self) -> Vec<Thing>;
        fn get_my_flattrs(&self) -> Vec<Flattr>;
        /// Invalid submissions fail without a network call.
        fn create(&self, submission: &Submission) -> ThingId;
        fn update(&self, thing: &Thing) -> ();
        fn delete(&self, id: &ThingId) -> ();
        fn flattr(&self, id: &ThingId) -> FlattrResult;
        fn flattr_url(&self, url: &str) -> FlattrResult;
        fn flattr_auto(&self, submission: &AutoSubmission) -> FlattrResult;
        fn get_my_subscriptions(&self) -> Vec<Subscription>;
        fn subscribe(&self, id: &ThingId) -> ();
        fn unsubscribe(&self, id: &ThingId) -> ();
        fn toggle_subscription(&self, id: &ThingId) -> ();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, FlattrError};

    #[test]
    fn test_blocking_validation() {
        let service =
            BlockingFlattrService::new(Connector::new("http://127.0.0.1:9/"), AccessToken::new("t")).unwrap();
        let mut submission = Submission::new("http://example.com", "A title", "A description");
        submission.tags = vec!["a,b".to_string()];
        let err = service.create(&submission).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
    }

    #[test]
    fn test_blocking_transport_error() {
        // Nothing listens on the discard port.
        let service = BlockingOpenService::new(
            Connector::new("http://127.0.0.1:9/").with_timeouts(crate::protocol::http::Timeouts {
                connect: std::time::Duration::from_secs(2),
                read: std::time::Duration::from_secs(2),
            }),
        )
        .unwrap();
        let err = service.get_categories().unwrap_err();
        assert!(matches!(err, FlattrError::Io(_)));
        assert_eq!(err.kind(), None);
    }
}

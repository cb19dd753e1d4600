/*
 * request.rs
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

//! One struct per operation, each executable against a `FlattrService`.
//!
//! Requests are plain data, so they can be built in one place, queued, and
//! handed to `task::spawn` or a blocking wrapper.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Activity, ActivityType, AutoSubmission, Category, Flattr, FlattrResult, Language, SearchQuery,
    SearchResult, Submission, Subscription, Thing, ThingId, User, UserId,
};
use crate::service::FlattrService;

#[async_trait]
pub trait FlattrRequest: Send + Sync {
    type Output: Send + 'static;

    async fn execute(&self, service: &FlattrService) -> Result<Self::Output>;
}

/// Declares a request struct and its `FlattrRequest` impl.
macro_rules! request {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident : $ty:ty),* $(,)? } -> $out:ty,
        |$req:ident, $svc:ident| $body:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        #[async_trait]
        impl FlattrRequest for $name {
            type Output = $out;

            async fn execute(&self, $svc: &FlattrService) -> Result<$out> {
                let $req = self;
                $body.await
            }
        }
    };
}

request!(GetThing { id: ThingId } -> Thing, |r, s| s.open().get_thing(&r.id));
request!(GetThings { ids: Vec<ThingId> } -> Vec<Thing>, |r, s| s.open().get_things(&r.ids));
request!(
    GetThingsByUser { user: UserId } -> Vec<Thing>,
    |r, s| s.open().get_things_by_user(&r.user)
);
request!(
    /// Thing registered for a URL, if any.
    Lookup { url: String } -> Option<Thing>,
    |r, s| s.open().lookup(&r.url)
);
request!(Search { query: SearchQuery } -> SearchResult, |r, s| s.open().search(&r.query));
request!(GetCategories {} -> Vec<Category>, |_r, s| s.open().get_categories());
request!(GetLanguages {} -> Vec<Language>, |_r, s| s.open().get_languages());
request!(GetUser { user: UserId } -> User, |r, s| s.open().get_user(&r.user));
request!(
    GetFlattrsByUser { user: UserId } -> Vec<Flattr>,
    |r, s| s.open().get_flattrs_by_user(&r.user)
);
request!(
    GetFlattrsByThing { id: ThingId } -> Vec<Flattr>,
    |r, s| s.open().get_flattrs_by_thing(&r.id)
);
request!(
    GetActivities { user: UserId, kind: ActivityType } -> Vec<Activity>,
    |r, s| s.open().get_activities(&r.user, r.kind)
);
request!(GetMyself {} -> User, |_r, s| s.get_myself());
request!(GetMyThings {} -> Vec<Thing>, |_r, s| s.get_my_things());
request!(GetMyFlattrs {} -> Vec<Flattr>, |_r, s| s.get_my_flattrs());
request!(
    /// Register a thing; invalid submissions fail without a network call.
    CreateThing { submission: Submission } -> ThingId,
    |r, s| s.create(&r.submission)
);
request!(UpdateThing { thing: Thing } -> (), |r, s| s.update(&r.thing));
request!(DeleteThing { id: ThingId } -> (), |r, s| s.delete(&r.id));
request!(FlattrThing { id: ThingId } -> FlattrResult, |r, s| s.flattr(&r.id));
request!(FlattrUrl { url: String } -> FlattrResult, |r, s| s.flattr_url(&r.url));
request!(
    FlattrAuto { submission: AutoSubmission } -> FlattrResult,
    |r, s| s.flattr_auto(&r.submission)
);
request!(GetMySubscriptions {} -> Vec<Subscription>, |_r, s| s.get_my_subscriptions());
request!(Subscribe { id: ThingId } -> (), |r, s| s.subscribe(&r.id));
request!(Unsubscribe { id: ThingId } -> (), |r, s| s.unsubscribe(&r.id));
request!(ToggleSubscription { id: ThingId } -> (), |r, s| s.toggle_subscription(&r.id));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::Connector;
    use crate::error::{ErrorKind, FlattrError};
    use crate::oauth::AccessToken;

    // Port 9 (discard) on localhost: any request that reaches the network fails.
    fn offline_service() -> FlattrService {
        FlattrService::new(Connector::new("http://127.0.0.1:9/"), AccessToken::new("t"))
    }

    #[tokio::test]
    async fn test_invalid_submission_fails_before_network() {
        let request = CreateThing {
            submission: Submission::new("http://example.com", "Title here", "four"),
        };
        let err = request.execute(&offline_service()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
        match err {
            FlattrError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("description")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_auto_submission_fails_before_network() {
        let request = FlattrAuto {
            submission: AutoSubmission::new("", "http://example.com"),
        };
        let err = request.execute(&offline_service()).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
    }
}

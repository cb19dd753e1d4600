/*
 * open.rs
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

//! Read-only calls that need no authorization.

use tracing::debug;

use crate::connector::{objects, ApiUrl, Connection, Connector, RateLimit, RateLimitTracker};
use crate::error::{FlattrError, Result};
use crate::model::{
    Activity, ActivityType, Category, Flattr, FlattrObject, Language, SearchQuery, SearchResult,
    Thing, ThingId, User, UserId,
};
use crate::oauth::AccessToken;
use crate::protocol::http::Method;

/// Calls on the public part of the API. Built with a token (see
/// `FlattrService`), responses also carry the caller's relation to each
/// thing, e.g. `Thing::flattred`.
#[derive(Debug, Clone)]
pub struct OpenService {
    connector: Connector,
    token: Option<AccessToken>,
    rate_limit: RateLimitTracker,
}

impl OpenService {
    pub fn new(connector: Connector) -> Self {
        Self {
            connector,
            token: None,
            rate_limit: RateLimitTracker::new(),
        }
    }

    pub(crate) fn with_token(connector: Connector, token: AccessToken) -> Self {
        Self {
            connector,
            token: Some(token),
            rate_limit: RateLimitTracker::new(),
        }
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Quota reported by the last response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.get()
    }

    /// Start a request carrying the token and rate-limit tracking.
    pub(crate) fn request(&self, method: Method, template: &str) -> Connection {
        self.connector
            .create(method)
            .call(template)
            .token(self.token.as_ref())
            .rate_limit(&self.rate_limit)
    }

    pub async fn get_thing(&self, id: &ThingId) -> Result<Thing> {
        let obj = self
            .request(Method::Get, "things/:id")
            .parameter("id", id)
            .single_result()
            .await?;
        Thing::from_object(&obj)
    }

    /// Several things in one call, in the order the server returns them.
    pub async fn get_things(&self, ids: &[ThingId]) -> Result<Vec<Thing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.iter().map(ThingId::as_str).collect::<Vec<_>>().join(",");
        let objs = self
            .request(Method::Get, "things/:ids")
            .parameter("ids", joined)
            .result()
            .await?;
        things(&objs)
    }

    pub async fn get_things_by_user(&self, user: &UserId) -> Result<Vec<Thing>> {
        let objs = self
            .request(Method::Get, "users/:username/things")
            .parameter("username", user)
            .result()
            .await?;
        things(&objs)
    }

    /// The thing registered for a URL, or `None` if there is none.
    pub async fn lookup(&self, url: &str) -> Result<Option<Thing>> {
        let reply = self
            .request(Method::Get, "things/lookup")
            .query("url", url)
            .execute()
            .await?;
        // The API may answer with a redirect to the thing itself.
        if (300..400).contains(&reply.status) {
            let location = reply
                .header("Location")
                .ok_or_else(|| FlattrError::marshal("redirect without Location"))?;
            let lookup_url = format!("{}/things/lookup", self.connector.base_url().trim_end_matches('/'));
            let location = ApiUrl::parse(&lookup_url)?.resolve(location);
            debug!(%location, "lookup redirected");
            let obj = self
                .connector
                .create(Method::Get)
                .url(location)
                .token(self.token.as_ref())
                .rate_limit(&self.rate_limit)
                .single_result()
                .await?;
            return Thing::from_object(&obj).map(Some);
        }
        let mut objs = objects(&reply)?;
        match objs.len() {
            0 => Ok(None),
            1 => {
                let obj = objs.remove(0);
                if obj.opt_str("message") == Some("not_found") || !obj.has("id") {
                    Ok(None)
                } else {
                    Thing::from_object(&obj).map(Some)
                }
            }
            n => Err(FlattrError::marshal(format!("lookup returned {} objects", n))),
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let mut conn = self.request(Method::Get, "things/search");
        for (name, value) in query.to_params() {
            conn = conn.query(name, value);
        }
        SearchResult::from_object(&conn.single_result().await?)
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let objs = self.request(Method::Get, "categories").result().await?;
        objs.iter().map(Category::from_object).collect()
    }

    pub async fn get_languages(&self) -> Result<Vec<Language>> {
        let objs = self.request(Method::Get, "languages").result().await?;
        objs.iter().map(Language::from_object).collect()
    }

    pub async fn get_user(&self, user: &UserId) -> Result<User> {
        let obj = self
            .request(Method::Get, "users/:username")
            .parameter("username", user)
            .single_result()
            .await?;
        User::from_object(&obj)
    }

    /// Flattrs a user has made.
    pub async fn get_flattrs_by_user(&self, user: &UserId) -> Result<Vec<Flattr>> {
        let objs = self
            .request(Method::Get, "users/:username/flattrs")
            .parameter("username", user)
            .result()
            .await?;
        objs.iter().map(Flattr::from_object).collect()
    }

    /// Flattrs a thing has received.
    pub async fn get_flattrs_by_thing(&self, id: &ThingId) -> Result<Vec<Flattr>> {
        let objs = self
            .request(Method::Get, "things/:id/flattrs")
            .parameter("id", id)
            .result()
            .await?;
        objs.iter().map(Flattr::from_object).collect()
    }

    /// Activity stream of a user.
    pub async fn get_activities(&self, user: &UserId, kind: ActivityType) -> Result<Vec<Activity>> {
        let stream = self
            .request(Method::Get, "users/:username/activities")
            .parameter("username", user)
            .query("type", kind.as_str())
            .single_result()
            .await?;
        Ok(stream.get_objects("items").into_iter().map(Activity::new).collect())
    }
}

pub(crate) fn things(objs: &[FlattrObject]) -> Result<Vec<Thing>> {
    objs.iter().map(Thing::from_object).collect()
}

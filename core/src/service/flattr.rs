/*
 * flattr.rs
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

//! Calls acting on behalf of an authorized user.

use tracing::debug;

use crate::connector::{Connector, RateLimit};
use crate::error::{FlattrError, Result};
use crate::model::{
    AutoSubmission, Flattr, FlattrObject, FlattrResult, Submission, Subscription, Thing, ThingId,
    User,
};
use crate::oauth::AccessToken;
use crate::protocol::http::Method;
use crate::service::open::{things, OpenService};

#[derive(Debug, Clone)]
pub struct FlattrService {
    open: OpenService,
}

impl FlattrService {
    pub fn new(connector: Connector, token: AccessToken) -> Self {
        Self {
            open: OpenService::with_token(connector, token),
        }
    }

    /// The public calls, made with this user's token.
    pub fn open(&self) -> &OpenService {
        &self.open
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.open.rate_limit()
    }

    pub async fn get_myself(&self) -> Result<User> {
        let obj = self.open.request(Method::Get, "user").single_result().await?;
        User::from_object(&obj)
    }

    pub async fn get_my_things(&self) -> Result<Vec<Thing>> {
        let objs = self.open.request(Method::Get, "user/things").result().await?;
        things(&objs)
    }

    pub async fn get_my_flattrs(&self) -> Result<Vec<Flattr>> {
        let objs = self.open.request(Method::Get, "user/flattrs").result().await?;
        objs.iter().map(Flattr::from_object).collect()
    }

    /// Register a new thing. The submission is checked before anything is sent.
    pub async fn create(&self, submission: &Submission) -> Result<ThingId> {
        submission.validate()?;
        let obj = self
            .open
            .request(Method::Post, "things")
            .data(submission.to_object())
            .single_result()
            .await?;
        let id = obj
            .opt_text("id")
            .ok_or_else(|| FlattrError::marshal("create returned no thing id"))?;
        debug!(%id, "thing created");
        Ok(ThingId::new(id))
    }

    /// Store the owner-editable fields of `thing`.
    pub async fn update(&self, thing: &Thing) -> Result<()> {
        if thing.id.is_empty() {
            return Err(FlattrError::validation("id", "thing has no id"));
        }
        self.open
            .request(Method::Patch, "things/:id")
            .parameter("id", &thing.id)
            .data(thing.to_update_object())
            .result()
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &ThingId) -> Result<()> {
        self.open
            .request(Method::Delete, "things/:id")
            .parameter("id", id)
            .result()
            .await?;
        Ok(())
    }

    pub async fn flattr(&self, id: &ThingId) -> Result<FlattrResult> {
        let obj = self
            .open
            .request(Method::Post, "things/:id/flattr")
            .parameter("id", id)
            .result()
            .await?;
        Ok(first_result(&obj))
    }

    /// Flattr whatever is registered at `url`; unknown URLs may be
    /// registered on the fly when they are auto-submit URLs.
    pub async fn flattr_url(&self, url: &str) -> Result<FlattrResult> {
        let mut data = FlattrObject::new();
        data.put("url", url);
        let obj = self
            .open
            .request(Method::Post, "flattr")
            .data(data)
            .result()
            .await?;
        Ok(first_result(&obj))
    }

    /// Flattr an auto-submission, registering it if needed.
    pub async fn flattr_auto(&self, submission: &AutoSubmission) -> Result<FlattrResult> {
        let url = submission.to_url()?;
        self.flattr_url(&url).await
    }

    pub async fn get_my_subscriptions(&self) -> Result<Vec<Subscription>> {
        let objs = self
            .open
            .request(Method::Get, "user/subscriptions")
            .result()
            .await?;
        objs.iter().map(Subscription::from_object).collect()
    }

    pub async fn subscribe(&self, id: &ThingId) -> Result<()> {
        self.subscription_call(Method::Post, id).await
    }

    pub async fn unsubscribe(&self, id: &ThingId) -> Result<()> {
        self.subscription_call(Method::Delete, id).await
    }

    /// Pause a running subscription, or resume a paused one.
    pub async fn toggle_subscription(&self, id: &ThingId) -> Result<()> {
        self.subscription_call(Method::Put, id).await
    }

    async fn subscription_call(&self, method: Method, id: &ThingId) -> Result<()> {
        self.open
            .request(method, "things/:id/subscriptions")
            .parameter("id", id)
            .result()
            .await?;
        Ok(())
    }
}

fn first_result(objs: &[FlattrObject]) -> FlattrResult {
    objs.first().map(FlattrResult::from_object).unwrap_or_default()
}

/*
 * mod.rs
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

//! The legacy XML REST API, signed with OAuth 1.0.
//!
//! Every call is an OAuth-signed GET or POST whose reply is an XML document
//! wrapped in `<flattr_response>`. Replies are streamed through the parsers
//! in `crate::xml`. Failures come back as `<error><code/><message/></error>`.

use tracing::{debug, warn};

use crate::config::FlattrConfig;
use crate::connector::{Connection, Connector};
use crate::error::{FlattrError, Result};
use crate::model::{
    Category, ClickCount, ClickedThing, Language, RegisteredThing, Submission, Subscription, Thing,
    ThingId, User,
};
use crate::oauth::{AccessToken, ConsumerKey, Oauth1Signer};
use crate::protocol::http::Method;
use crate::xml::{
    parse_all, parse_one, CategoryParser, ClickCountParser, ClickedThingParser, ErrorParser,
    LanguageParser, RegisteredThingParser, SubscriptionParser, ThingParser, UserParser,
};

#[derive(Debug, Clone)]
pub struct LegacyService {
    connector: Connector,
    signer: Oauth1Signer,
}

impl LegacyService {
    /// `token` must carry its secret.
    pub fn new(config: &FlattrConfig, consumer: ConsumerKey, token: AccessToken) -> Result<Self> {
        if token.secret.is_none() {
            return Err(FlattrError::Auth("legacy API token has no secret".to_string()));
        }
        Ok(Self {
            connector: Connector::legacy(config),
            signer: Oauth1Signer::new(consumer).with_token(token),
        })
    }

    fn request(&self, method: Method, template: &str) -> Connection {
        self.connector
            .create(method)
            .call(template)
            .signer(self.signer.clone())
    }

    /// Body of a successful reply; an error document becomes its `FlattrError`.
    async fn xml(&self, conn: Connection) -> Result<Vec<u8>> {
        let reply = conn.execute().await?;
        if reply.is_success() {
            return Ok(reply.body);
        }
        let error = match parse_all(&reply.body, ErrorParser::default()) {
            Ok(mut bodies) if !bodies.is_empty() => bodies.remove(0).into_error(&reply.status_line),
            _ => FlattrError::Http {
                status: reply.status,
                status_line: reply.status_line.clone(),
            },
        };
        warn!(status = reply.status, error = %error, "legacy API call failed");
        Err(error)
    }

    pub async fn get_myself(&self) -> Result<User> {
        let body = self.xml(self.request(Method::Get, "user/me")).await?;
        parse_one(&body, UserParser::default())
    }

    /// User by legacy numeric id.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let body = self
            .xml(self.request(Method::Get, "user/get/id/:id").parameter("id", id))
            .await?;
        parse_one(&body, UserParser::default())
    }

    pub async fn get_thing(&self, id: &ThingId) -> Result<Thing> {
        let body = self
            .xml(self.request(Method::Get, "thing/get/id/:id").parameter("id", id))
            .await?;
        parse_one(&body, ThingParser::default())
    }

    /// Things registered by the user with this legacy id.
    pub async fn get_things_by_user(&self, user_id: &str) -> Result<Vec<Thing>> {
        let body = self
            .xml(self.request(Method::Get, "thing/listbyuser/id/:id").parameter("id", user_id))
            .await?;
        parse_all(&body, ThingParser::default())
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let body = self.xml(self.request(Method::Get, "categories/list")).await?;
        parse_all(&body, CategoryParser::default())
    }

    pub async fn get_languages(&self) -> Result<Vec<Language>> {
        let body = self.xml(self.request(Method::Get, "languages/list")).await?;
        parse_all(&body, LanguageParser::default())
    }

    /// Things the caller clicked in the given month.
    pub async fn get_clicked_things(&self, year: i32, month: u32) -> Result<Vec<ClickedThing>> {
        if !(1..=12).contains(&month) {
            return Err(FlattrError::validation("month", format!("{} is not a month", month)));
        }
        let period = format!("{:04}{:02}", year, month);
        let body = self
            .xml(self.request(Method::Get, "user/clicks").query("period", period))
            .await?;
        parse_all(&body, ClickedThingParser::default())
    }

    /// Who clicked a thing, and how often.
    pub async fn get_click_counts(&self, id: &ThingId) -> Result<Vec<ClickCount>> {
        let body = self
            .xml(self.request(Method::Get, "thing/clicks/id/:id").parameter("id", id))
            .await?;
        parse_all(&body, ClickCountParser::default())
    }

    /// Register a thing. The submission is checked before anything is sent.
    pub async fn register(&self, submission: &Submission) -> Result<RegisteredThing> {
        submission.validate()?;
        let data = String::from_utf8(submission.to_legacy_xml()?)
            .map_err(|_| FlattrError::marshal("submission XML is not UTF-8"))?;
        let body = self
            .xml(self.request(Method::Post, "thing/register").form("data", data))
            .await?;
        let registered = parse_one(&body, RegisteredThingParser::default())?;
        debug!(id = %registered.id, "thing registered");
        Ok(registered)
    }

    pub async fn click(&self, id: &ThingId) -> Result<()> {
        self.xml(self.request(Method::Post, "thing/click").form("id", id))
            .await?;
        Ok(())
    }

    pub async fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        let body = self.xml(self.request(Method::Get, "subscription/list")).await?;
        parse_all(&body, SubscriptionParser::default())
    }
}

/*
 * user.rs
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

//! A Flattr user profile.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::thing::opt_string;
use crate::model::{FlattrObject, UserId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct User {
    pub username: UserId,
    pub resource: Option<String>,
    pub link: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub avatar: Option<String>,
    pub about: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Only visible to the user themself.
    pub email: Option<String>,
    pub url: Option<String>,
    pub registered: Option<DateTime<Utc>>,
    /// Legacy numeric user id.
    pub legacy_id: Option<String>,
    /// Legacy count of registered things.
    pub thing_count: Option<u64>,
}

impl User {
    pub fn from_object(obj: &FlattrObject) -> Result<User> {
        Ok(User {
            username: UserId::new(obj.get_str("username")?),
            resource: obj.opt_str("resource").map(str::to_string),
            link: obj.opt_str("link").map(str::to_string),
            firstname: opt_string(obj, "firstname"),
            lastname: opt_string(obj, "lastname"),
            avatar: opt_string(obj, "avatar"),
            about: opt_string(obj, "about"),
            city: opt_string(obj, "city"),
            country: opt_string(obj, "country"),
            email: opt_string(obj, "email"),
            url: opt_string(obj, "url"),
            registered: obj.opt_time("registered_at"),
            legacy_id: obj.opt_text("legacy_id"),
            thing_count: obj.opt_i64("thing_count").and_then(|n| u64::try_from(n).ok()),
        })
    }

    pub fn to_object(&self) -> FlattrObject {
        let mut o = FlattrObject::new();
        o.put("type", "user");
        o.put("username", self.username.as_str());
        o.put_opt("resource", self.resource.clone());
        o.put_opt("link", self.link.clone());
        o.put_opt("firstname", self.firstname.clone());
        o.put_opt("lastname", self.lastname.clone());
        o.put_opt("avatar", self.avatar.clone());
        o.put_opt("about", self.about.clone());
        o.put_opt("city", self.city.clone());
        o.put_opt("country", self.country.clone());
        o.put_opt("email", self.email.clone());
        o.put_opt("url", self.url.clone());
        o.put_time("registered_at", self.registered);
        o.put_opt("legacy_id", self.legacy_id.clone());
        o.put_opt("thing_count", self.thing_count);
        o
    }
}

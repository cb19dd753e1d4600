/*
 * activity.rs
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

//! Activity stream entries.
//!
//! Activities follow the activitystrea.ms JSON format, which is open ended,
//! so the raw object is kept and the common properties are read on demand.

use chrono::{DateTime, Utc};

use crate::model::FlattrObject;

/// Direction of the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    /// Flattrs received by the user's things.
    Incoming,
    /// Flattrs made by the user.
    Outgoing,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Incoming => "incoming",
            ActivityType::Outgoing => "outgoing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    data: FlattrObject,
}

impl Activity {
    pub fn new(data: FlattrObject) -> Self {
        Self { data }
    }

    pub fn id(&self) -> Option<&str> {
        self.data.opt_str("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.data.opt_str("title")
    }

    /// e.g. `like`, `post`.
    pub fn verb(&self) -> Option<&str> {
        self.data.opt_str("verb")
    }

    /// RFC 3339 timestamp in `published`.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.data
            .opt_str("published")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn actor_name(&self) -> Option<String> {
        let actor = self.data.opt_object("actor")?;
        actor
            .opt_str("displayName")
            .or_else(|| actor.opt_str("username"))
            .map(str::to_string)
    }

    pub fn actor_url(&self) -> Option<String> {
        self.data.opt_object("actor")?.opt_str("url").map(str::to_string)
    }

    pub fn object_title(&self) -> Option<String> {
        self.data
            .opt_object("object")?
            .opt_str("displayName")
            .map(str::to_string)
    }

    pub fn object_url(&self) -> Option<String> {
        self.data.opt_object("object")?.opt_str("url").map(str::to_string)
    }

    pub fn raw(&self) -> &FlattrObject {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_getters() {
        let a = Activity::new(
            FlattrObject::from_value(json!({
                "published": "2011-11-07T10:12:43+01:00",
                "title": "pthulin flattred \"Acme\"",
                "verb": "like",
                "actor": {"displayName": "pthulin", "url": "https://flattr.com/profile/pthulin"},
                "object": {"displayName": "Acme", "url": "https://flattr.com/thing/1"},
                "id": "tag:flattr.com,2011-11-07:pthulin/flattr/1"
            }))
            .unwrap(),
        );
        assert_eq!(a.verb(), Some("like"));
        assert_eq!(a.actor_name().as_deref(), Some("pthulin"));
        assert_eq!(a.object_url().as_deref(), Some("https://flattr.com/thing/1"));
        assert_eq!(a.published().map(|t| t.timestamp()), Some(1320657163));
    }
}

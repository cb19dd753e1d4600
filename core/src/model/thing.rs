/*
 * thing.rs
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

//! A Thing: content registered on Flattr that can be flattred.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{CategoryId, FlattrObject, LanguageId, ThingId, UserId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Thing {
    pub id: ThingId,
    /// API URL of this thing.
    pub resource: Option<String>,
    /// Web page of this thing on flattr.com.
    pub link: Option<String>,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub language: Option<LanguageId>,
    pub category: Option<CategoryId>,
    pub owner: Option<UserId>,
    pub tags: Vec<String>,
    pub hidden: bool,
    pub image: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub last_flattr: Option<DateTime<Utc>>,
    pub flattrs: u64,
    pub flattrs_user_count: u64,
    /// Whether the authenticated user has flattred it.
    pub flattred: bool,
    /// Legacy numeric id; the legacy API's `id` is an opaque string.
    pub int_id: Option<i64>,
    /// Legacy relation to the caller: `owner`, `clicked`, `ok`, `inactive`.
    pub status: Option<String>,
}

impl Thing {
    pub fn from_object(obj: &FlattrObject) -> Result<Thing> {
        Ok(Thing {
            id: ThingId::new(obj.get_text("id")?),
            resource: obj.opt_str("resource").map(str::to_string),
            link: obj.opt_str("link").map(str::to_string),
            url: obj.opt_str("url").unwrap_or_default().to_string(),
            title: obj.opt_str("title").unwrap_or_default().to_string(),
            description: opt_string(obj, "description"),
            language: obj.opt_str("language").map(LanguageId::new),
            category: obj.opt_str("category").map(CategoryId::new),
            owner: obj.opt_username("owner").map(UserId::new),
            tags: obj.get_strings("tags"),
            hidden: obj.get_bool("hidden"),
            image: opt_string(obj, "image"),
            created: obj.opt_time("created_at"),
            updated: obj.opt_time("updated_at"),
            last_flattr: obj.opt_time("last_flattr_at"),
            flattrs: obj.opt_i64("flattrs").unwrap_or(0).max(0) as u64,
            flattrs_user_count: obj.opt_i64("flattrs_user_count").unwrap_or(0).max(0) as u64,
            flattred: obj.get_bool("flattred"),
            int_id: obj.opt_i64("int_id"),
            status: opt_string(obj, "status"),
        })
    }

    /// Wire form as returned by the API.
    pub fn to_object(&self) -> FlattrObject {
        let mut o = FlattrObject::new();
        o.put("type", "thing");
        o.put("id", self.id.as_str());
        o.put_opt("resource", self.resource.clone());
        o.put_opt("link", self.link.clone());
        o.put("url", self.url.as_str());
        o.put("title", self.title.as_str());
        o.put_opt("description", self.description.clone());
        o.put_opt("language", self.language.as_ref().map(|l| l.as_str().to_string()));
        o.put_opt("category", self.category.as_ref().map(|c| c.as_str().to_string()));
        if let Some(owner) = &self.owner {
            let mut user = FlattrObject::new();
            user.put("type", "user");
            user.put("username", owner.as_str());
            o.put_object("owner", user);
        }
        o.put_strings("tags", &self.tags);
        o.put("hidden", self.hidden);
        o.put_opt("image", self.image.clone());
        o.put_time("created_at", self.created);
        o.put_time("updated_at", self.updated);
        o.put_time("last_flattr_at", self.last_flattr);
        o.put("flattrs", self.flattrs);
        o.put("flattrs_user_count", self.flattrs_user_count);
        o.put("flattred", self.flattred);
        o.put_opt("int_id", self.int_id);
        o.put_opt("status", self.status.clone());
        o
    }

    /// Body for `PATCH things/:id`: the fields an owner may change.
    pub fn to_update_object(&self) -> FlattrObject {
        let mut o = FlattrObject::new();
        o.put("title", self.title.as_str());
        o.put_opt("description", self.description.clone());
        o.put_opt("category", self.category.as_ref().map(|c| c.as_str().to_string()));
        o.put_opt("language", self.language.as_ref().map(|l| l.as_str().to_string()));
        o.put("tags", self.tags.join(","));
        o.put("hidden", self.hidden);
        o
    }
}

/// String property as sent, empty strings included.
pub(crate) fn opt_string(obj: &FlattrObject, key: &str) -> Option<String> {
    obj.opt_str(key).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_values;
    use crate::xml::{parse_one, ThingParser};
    use chrono::TimeZone;

    const THING_JSON: &str = r#"{"type":"thing","resource":"https://api.flattr.com/rest/v2/things/423405","link":"https://flattr.com/thing/423405","id":423405,"flattrs":1,"flattrs_user_count":1,"url":"http://blog.example.com/post","language":"en_GB","category":"text","owner":{"type":"user","resource":"https://api.flattr.com/rest/v2/users/smgt","link":"https://flattr.com/profile/smgt","username":"smgt"},"hidden":false,"created_at":1319704532,"tags":["rust","flattr"],"title":"A post","description":"Some words","image":"","flattred":true}"#;

    fn parse_thing(doc: &[u8]) -> Thing {
        let value = parse_values(doc).unwrap().remove(0);
        Thing::from_object(&FlattrObject::from_value(value).unwrap()).unwrap()
    }

    #[test]
    fn test_from_api_json() {
        let t = parse_thing(THING_JSON.as_bytes());
        assert_eq!(t.id.as_str(), "423405");
        assert_eq!(t.owner, Some(UserId::new("smgt")));
        assert_eq!(t.language, Some(LanguageId::new("en_GB")));
        assert_eq!(t.category, Some(CategoryId::new("text")));
        assert_eq!(t.tags, vec!["rust", "flattr"]);
        assert_eq!(t.image.as_deref(), Some(""));
        assert_eq!(t.created, Utc.timestamp_opt(1319704532, 0).single());
        assert!(t.flattred);
        assert_eq!(t.flattrs, 1);
    }

    #[test]
    fn test_wire_round_trip() {
        let t = parse_thing(THING_JSON.as_bytes());
        let again = parse_thing(&t.to_object().to_json());
        assert_eq!(again, t);
    }

    #[test]
    fn test_leading_zero_id_and_empty_text_survive() {
        let t = Thing {
            id: ThingId::new("007"),
            url: "http://example.com/".into(),
            title: "Bond".into(),
            description: Some(String::new()),
            image: Some(String::new()),
            ..Default::default()
        };
        let o = t.to_object();
        assert_eq!(o.opt_str("id"), Some("007"));
        assert_eq!(parse_thing(&o.to_json()), t);
    }

    #[test]
    fn test_legacy_thing_round_trip() {
        let xml = b"<flattr_response><thing><id>4a0c2b0e11b5a</id><int_id>42</int_id><created>1277297003</created><url>http://example.com/one</url><title>First thing</title><story>A story</story><clicks>12</clicks><status>owner</status><user><id>3</id><username>alice</username></user><category><id>text</id><name>Text</name></category><language><id>en_GB</id><name>English</name></language><tags><tag>rust</tag></tags></thing></flattr_response>";
        let t = parse_one(xml, ThingParser::default()).unwrap();
        assert_eq!(t.int_id, Some(42));
        assert_eq!(t.status.as_deref(), Some("owner"));
        let again = parse_thing(&t.to_object().to_json());
        assert_eq!(again, t);
    }

    #[test]
    fn test_update_body_joins_tags() {
        let t = Thing {
            title: "Title".into(),
            tags: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let o = t.to_update_object();
        assert_eq!(o.opt_str("tags"), Some("a,b"));
        assert!(!o.has("url"));
    }
}

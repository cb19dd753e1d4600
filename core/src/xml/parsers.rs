/*
 * parsers.rs
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

//! One model parser per legacy response shape.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{FlattrError, Result};
use crate::model::{
    Category, CategoryId, ClickCount, ClickedThing, Language, LanguageId,
    RegisteredThing, Subscription, Thing, ThingId, User, UserId,
};
use crate::xml::XmlModelParser;

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Legacy timestamps are epoch seconds or `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(secs) = text.parse::<i64>() {
        return if secs > 0 {
            Utc.timestamp_opt(secs, 0).single()
        } else {
            None
        };
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|t| t.and_utc())
}

fn parse_count<T: std::str::FromStr + Default>(name: &str, text: &str) -> Result<T> {
    if text.is_empty() {
        return Ok(T::default());
    }
    text.parse()
        .map_err(|_| FlattrError::marshal(format!("<{}> is not a number: '{}'", name, text)))
}

/// `<thing>` elements with nested `<user>`, `<category>`, `<language>` and `<tags>`.
#[derive(Default)]
pub struct ThingParser {
    current: Thing,
    in_user: bool,
    in_category: bool,
    in_language: bool,
    in_tags: bool,
}

impl XmlModelParser for ThingParser {
    type Item = Thing;

    fn start_element(&mut self, name: &str) {
        match name {
            "user" => self.in_user = true,
            "category" => self.in_category = true,
            "language" => self.in_language = true,
            "tags" => self.in_tags = true,
            _ => {}
        }
    }

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<Thing>> {
        if self.in_user {
            match name {
                "username" => self.current.owner = Some(UserId::new(text)),
                "user" => self.in_user = false,
                _ => {}
            }
            return Ok(None);
        }
        if self.in_category {
            match name {
                "id" => self.current.category = non_empty(Some(text.as_str())).map(CategoryId::new),
                // Flat form: <category>text</category>
                "category" => {
                    self.in_category = false;
                    if self.current.category.is_none() {
                        self.current.category = non_empty(Some(text.as_str())).map(CategoryId::new);
                    }
                }
                _ => {}
            }
            return Ok(None);
        }
        if self.in_language {
            match name {
                "id" => self.current.language = non_empty(Some(text.as_str())).map(LanguageId::new),
                "language" => {
                    self.in_language = false;
                    if self.current.language.is_none() {
                        self.current.language = non_empty(Some(text.as_str())).map(LanguageId::new);
                    }
                }
                _ => {}
            }
            return Ok(None);
        }
        if self.in_tags {
            match name {
                "tag" if !text.is_empty() => self.current.tags.push(text),
                "tags" => self.in_tags = false,
                _ => {}
            }
            return Ok(None);
        }
        match name {
            "id" => self.current.id = ThingId::new(text),
            "int_id" => self.current.int_id = text.parse().ok(),
            "url" => self.current.url = text,
            "link" => self.current.link = non_empty(Some(text.as_str())),
            "title" => self.current.title = text,
            "story" => self.current.description = non_empty(Some(text.as_str())),
            "clicks" => self.current.flattrs = parse_count(name, &text)?,
            "created" => self.current.created = parse_time(&text),
            "status" => {
                self.current.flattred = text == "clicked";
                self.current.status = non_empty(Some(text.as_str()));
            }
            "hidden" => self.current.hidden = text == "1" || text == "true",
            "thing" => return Ok(Some(std::mem::take(&mut self.current))),
            _ => {}
        }
        Ok(None)
    }
}

/// `<user>` profile elements.
#[derive(Default)]
pub struct UserParser {
    current: User,
}

impl XmlModelParser for UserParser {
    type Item = User;

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<User>> {
        let value = non_empty(Some(text.as_str()));
        match name {
            "id" => self.current.legacy_id = value,
            "username" => self.current.username = UserId::new(text),
            "firstname" => self.current.firstname = value,
            "lastname" => self.current.lastname = value,
            "gravatar" => self.current.avatar = value,
            "description" => self.current.about = value,
            "city" => self.current.city = value,
            "country" => self.current.country = value,
            "url" => self.current.url = value,
            "email" => self.current.email = value,
            "thingcount" => self.current.thing_count = Some(parse_count(name, &text)?),
            "user" => {
                let user = std::mem::take(&mut self.current);
                if user.username.is_empty() {
                    return Err(FlattrError::marshal("user without username"));
                }
                return Ok(Some(user));
            }
            _ => {}
        }
        Ok(None)
    }
}

/// Shared shape of `<category>` and `<language>`: an id and a display name.
#[derive(Default)]
struct IdName {
    id: String,
    name: String,
}

impl IdName {
    fn end(&mut self, element: &str, name: &str, text: String) -> Option<(String, String)> {
        match name {
            "id" => self.id = text,
            "name" => self.name = text,
            _ if name == element => {
                let done = std::mem::take(self);
                return Some((done.id, done.name));
            }
            _ => {}
        }
        None
    }
}

#[derive(Default)]
pub struct CategoryParser(IdName);

impl XmlModelParser for CategoryParser {
    type Item = Category;

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<Category>> {
        Ok(self.0.end("category", name, text).map(|(id, name)| Category {
            id: CategoryId::new(id),
            name,
        }))
    }
}

#[derive(Default)]
pub struct LanguageParser(IdName);

impl XmlModelParser for LanguageParser {
    type Item = Language;

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<Language>> {
        Ok(self.0.end("language", name, text).map(|(id, name)| Language {
            id: LanguageId::new(id),
            name,
        }))
    }
}

/// `<click>` entries of `thing/clicks`.
#[derive(Default)]
pub struct ClickCountParser {
    current: ClickCount,
}

impl XmlModelParser for ClickCountParser {
    type Item = ClickCount;

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<ClickCount>> {
        match name {
            "user" | "username" => self.current.user = UserId::new(text),
            "count" => self.current.count = parse_count(name, &text)?,
            "click" => return Ok(Some(std::mem::take(&mut self.current))),
            _ => {}
        }
        Ok(None)
    }
}

/// `<thing>` entries of `user/clicks`.
#[derive(Default)]
pub struct ClickedThingParser {
    current: ClickedThing,
    in_user: bool,
}

impl XmlModelParser for ClickedThingParser {
    type Item = ClickedThing;

    fn start_element(&mut self, name: &str) {
        if name == "user" {
            self.in_user = true;
        }
    }

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<ClickedThing>> {
        if self.in_user {
            match name {
                "username" => self.current.owner = Some(UserId::new(text)),
                "user" => self.in_user = false,
                _ => {}
            }
            return Ok(None);
        }
        match name {
            "id" => self.current.thing = ThingId::new(text),
            "url" => self.current.url = text,
            "title" => self.current.title = text,
            "click_time" => self.current.clicked = parse_time(&text),
            "thing" => return Ok(Some(std::mem::take(&mut self.current))),
            _ => {}
        }
        Ok(None)
    }
}

/// The `<thing>` answer to `thing/register`.
#[derive(Default)]
pub struct RegisteredThingParser {
    current: RegisteredThing,
}

impl XmlModelParser for RegisteredThingParser {
    type Item = RegisteredThing;

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<RegisteredThing>> {
        match name {
            "id" => self.current.id = ThingId::new(text),
            "int_id" => self.current.int_id = text.parse().ok(),
            "url" => self.current.url = text,
            "title" => self.current.title = text,
            "story" => self.current.story = non_empty(Some(text.as_str())),
            "created" => self.current.created = parse_time(&text),
            "status" => self.current.status = non_empty(Some(text.as_str())),
            "clicks" => self.current.clicks = parse_count(name, &text)?,
            "thing" => return Ok(Some(std::mem::take(&mut self.current))),
            _ => {}
        }
        Ok(None)
    }
}

/// `<subscription>` entries; the nested `<thing>` goes to a `ThingParser`.
#[derive(Default)]
pub struct SubscriptionParser {
    current: Subscription,
    thing: ThingParser,
    in_thing: bool,
}

impl XmlModelParser for SubscriptionParser {
    type Item = Subscription;

    fn start_element(&mut self, name: &str) {
        if self.in_thing {
            self.thing.start_element(name);
        } else if name == "thing" {
            self.in_thing = true;
        }
    }

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<Subscription>> {
        if self.in_thing {
            if let Some(thing) = self.thing.end_element(name, text)? {
                self.current.thing = thing;
                self.in_thing = false;
            }
            return Ok(None);
        }
        match name {
            "created" => self.current.created = parse_time(&text),
            "started" => self.current.started = parse_time(&text),
            "months" => self.current.months = Some(parse_count(name, &text)?),
            "monthsleft" => self.current.months_left = Some(parse_count(name, &text)?),
            "subscription" => {
                let mut sub = std::mem::take(&mut self.current);
                sub.active = sub.months_left.map_or(true, |m| m > 0);
                return Ok(Some(sub));
            }
            _ => {}
        }
        Ok(None)
    }
}

/// Error document of the legacy API: `<error><code/><message/></error>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn into_error(self, status_line: &str) -> FlattrError {
        FlattrError::from_api(&self.code, &self.message, status_line)
    }
}

#[derive(Default)]
pub struct ErrorParser {
    current: ErrorBody,
}

impl XmlModelParser for ErrorParser {
    type Item = ErrorBody;

    fn end_element(&mut self, name: &str, text: String) -> Result<Option<ErrorBody>> {
        match name {
            "code" => self.current.code = text,
            "message" => self.current.message = text,
            "error" if !self.current.code.is_empty() => {
                return Ok(Some(std::mem::take(&mut self.current)))
            }
            _ => {}
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::xml::{parse_all, parse_one, XmlStream};

    const THINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<flattr_response version="0.5">
  <thing>
    <id>4a0c2b0e11b5a</id>
    <int_id>46</int_id>
    <created>1277297003</created>
    <language><id>en_GB</id><name>English</name></language>
    <url>http://example.com/one</url>
    <title>First thing</title>
    <story>A story &amp; more</story>
    <clicks>12</clicks>
    <status>clicked</status>
    <user><id>3</id><username>alice</username></user>
    <category><id>text</id><name>Written text</name></category>
    <tags><tag>rust</tag><tag>xml</tag></tags>
  </thing>
  <thing>
    <id>4a0c2b0e11b5b</id>
    <url>http://example.com/two</url>
    <title>Second thing</title>
    <clicks>0</clicks>
    <status>ok</status>
    <user><username>bob</username></user>
  </thing>
</flattr_response>"#;

    #[test]
    fn test_things_in_order() {
        let mut stream = XmlStream::from_bytes(THINGS.as_bytes(), ThingParser::default());
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.id.as_str(), "4a0c2b0e11b5a");
        assert_eq!(first.int_id, Some(46));
        assert_eq!(first.created.map(|t| t.timestamp()), Some(1277297003));
        assert_eq!(first.language.as_ref().map(LanguageId::as_str), Some("en_GB"));
        assert_eq!(first.category.as_ref().map(CategoryId::as_str), Some("text"));
        assert_eq!(first.owner.as_ref().map(UserId::as_str), Some("alice"));
        assert_eq!(first.description.as_deref(), Some("A story & more"));
        assert_eq!(first.tags, vec!["rust".to_string(), "xml".to_string()]);
        assert_eq!(first.flattrs, 12);
        assert!(first.flattred);
        let second = stream.next().unwrap().unwrap();
        assert_eq!(second.title, "Second thing");
        assert_eq!(second.owner.as_ref().map(UserId::as_str), Some("bob"));
        assert!(second.tags.is_empty());
        assert!(!second.flattred);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_user() {
        let xml = b"<flattr_response><user><id>3</id><username>alice</username><firstname>Alice</firstname><lastname></lastname><gravatar>http://g.example/a</gravatar><description>Hi</description><thingcount>4</thingcount></user></flattr_response>";
        let user = parse_one(xml, UserParser::default()).unwrap();
        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(user.legacy_id.as_deref(), Some("3"));
        assert_eq!(user.firstname.as_deref(), Some("Alice"));
        assert_eq!(user.lastname, None);
        assert_eq!(user.avatar.as_deref(), Some("http://g.example/a"));
        assert_eq!(user.about.as_deref(), Some("Hi"));
        assert_eq!(user.thing_count, Some(4));
    }

    #[test]
    fn test_categories_and_languages() {
        let xml = b"<r><categories><category><id>text</id><name>Text</name></category><category><id>audio</id><name>Audio</name></category></categories></r>";
        let cats = parse_all(xml, CategoryParser::default()).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[1].id.as_str(), "audio");
        assert_eq!(cats[1].name, "Audio");
        let xml = b"<r><languages><language><id>sv_SE</id><name>Swedish</name></language></languages></r>";
        let langs = parse_all(xml, LanguageParser::default()).unwrap();
        assert_eq!(langs[0].id.as_str(), "sv_SE");
    }

    #[test]
    fn test_click_counts() {
        let xml = b"<r><clicks><click><user>alice</user><count>3</count></click><click><user>bob</user><count>1</count></click></clicks></r>";
        let counts = parse_all(xml, ClickCountParser::default()).unwrap();
        assert_eq!(counts[0], ClickCount { user: UserId::new("alice"), count: 3 });
        assert_eq!(counts[1].count, 1);
        let bad = b"<r><click><user>x</user><count>many</count></click></r>";
        assert!(matches!(parse_all(bad, ClickCountParser::default()), Err(FlattrError::Marshal(_))));
    }

    #[test]
    fn test_clicked_things() {
        let xml = b"<r><thing><id>abc</id><url>http://e.example</url><title>T</title><user><id>9</id><username>carol</username></user><click_time>2011-05-01 10:00:00</click_time></thing></r>";
        let clicked = parse_one(xml, ClickedThingParser::default()).unwrap();
        assert_eq!(clicked.thing.as_str(), "abc");
        assert_eq!(clicked.owner.as_ref().map(UserId::as_str), Some("carol"));
        assert_eq!(clicked.clicked.map(|t| t.timestamp()), Some(1304244000));
    }

    #[test]
    fn test_registered_thing() {
        let xml = b"<flattr_response><thing><id>xyz</id><int_id>7</int_id><url>http://e.example</url><title>New</title><story>Long story</story><status>owner</status><clicks>0</clicks></thing></flattr_response>";
        let reg = parse_one(xml, RegisteredThingParser::default()).unwrap();
        assert_eq!(reg.id.as_str(), "xyz");
        assert_eq!(reg.int_id, Some(7));
        assert_eq!(reg.story.as_deref(), Some("Long story"));
        assert_eq!(reg.status.as_deref(), Some("owner"));
    }

    #[test]
    fn test_subscriptions_delegate_thing() {
        let xml = b"<r><subscription><thing><id>t1</id><title>Sub</title><created>100</created><user><username>dan</username></user></thing><created>200</created><started>300</started><months>6</months><monthsleft>0</monthsleft></subscription></r>";
        let subs = parse_all(xml, SubscriptionParser::default()).unwrap();
        assert_eq!(subs.len(), 1);
        let sub = &subs[0];
        assert_eq!(sub.thing.id.as_str(), "t1");
        assert_eq!(sub.thing.created.map(|t| t.timestamp()), Some(100));
        assert_eq!(sub.created.map(|t| t.timestamp()), Some(200));
        assert_eq!(sub.months, Some(6));
        assert_eq!(sub.months_left, Some(0));
        assert!(!sub.active);
    }

    #[test]
    fn test_error_body() {
        let xml = b"<flattr_response><error><code>not_found</code><message>No such thing</message></error></flattr_response>";
        let body = parse_one(xml, ErrorParser::default()).unwrap();
        let err = body.into_error("HTTP/1.1 404 Not Found");
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(err.code(), Some("not_found"));
    }
}

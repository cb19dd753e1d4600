/*
 * submission.rs
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

//! Payloads for registering things, checked before anything is sent.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::{FlattrError, Result};
use crate::model::{CategoryId, FlattrObject, LanguageId, UserId};

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 5;
pub const DESCRIPTION_MAX: usize = 1000;

const AUTO_SUBMIT_URL: &str = "https://flattr.com/submit/auto";

/// A thing to be created through the API.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Submission {
    pub url: String,
    pub title: String,
    pub description: String,
    pub category: Option<CategoryId>,
    pub language: Option<LanguageId>,
    pub tags: Vec<String>,
    pub hidden: bool,
}

impl Submission {
    pub fn new(url: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_url(&self.url)?;
        check_length("title", &self.title, TITLE_MIN, TITLE_MAX)?;
        check_length("description", &self.description, DESCRIPTION_MIN, DESCRIPTION_MAX)?;
        check_tags(&self.tags)
    }

    /// JSON body for `POST things`.
    pub fn to_object(&self) -> FlattrObject {
        let mut o = FlattrObject::new();
        o.put("url", self.url.as_str());
        o.put("title", self.title.as_str());
        o.put("description", self.description.as_str());
        o.put_opt("category", self.category.as_ref().map(|c| c.as_str().to_string()));
        o.put_opt("language", self.language.as_ref().map(|l| l.as_str().to_string()));
        if !self.tags.is_empty() {
            o.put("tags", self.tags.join(","));
        }
        o.put("hidden", self.hidden);
        o
    }

    /// XML body for the legacy `thing/register` call.
    pub fn to_legacy_xml(&self) -> Result<Vec<u8>> {
        let mut w = Writer::new(Vec::new());
        start(&mut w, "thing")?;
        text_element(&mut w, "url", &self.url)?;
        text_element(&mut w, "title", &self.title)?;
        if let Some(c) = &self.category {
            text_element(&mut w, "category", c.as_str())?;
        }
        if let Some(l) = &self.language {
            text_element(&mut w, "language", l.as_str())?;
        }
        text_element(&mut w, "hidden", if self.hidden { "1" } else { "0" })?;
        start(&mut w, "tags")?;
        for tag in &self.tags {
            text_element(&mut w, "tag", tag)?;
        }
        end(&mut w, "tags")?;
        text_element(&mut w, "description", &self.description)?;
        end(&mut w, "thing")?;
        Ok(w.into_inner())
    }
}

/// A thing registered on the fly when someone first flattrs its URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoSubmission {
    pub user: UserId,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub language: Option<LanguageId>,
    pub tags: Vec<String>,
    pub hidden: bool,
}

impl AutoSubmission {
    pub fn new(user: impl Into<UserId>, url: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.user.is_empty() {
            return Err(FlattrError::validation("user", "owner is required"));
        }
        check_url(&self.url)?;
        if let Some(title) = &self.title {
            check_length("title", title, TITLE_MIN, TITLE_MAX)?;
        }
        if let Some(description) = &self.description {
            check_length("description", description, DESCRIPTION_MIN, DESCRIPTION_MAX)?;
        }
        check_tags(&self.tags)
    }

    /// The `submit/auto` URL for this submission.
    pub fn to_url(&self) -> Result<String> {
        self.validate()?;
        let mut params: Vec<(&str, String)> = vec![
            ("user_id", self.user.as_str().to_string()),
            ("url", self.url.clone()),
        ];
        if let Some(t) = &self.title {
            params.push(("title", t.clone()));
        }
        if let Some(d) = &self.description {
            params.push(("description", d.clone()));
        }
        if let Some(l) = &self.language {
            params.push(("language", l.as_str().to_string()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        if self.hidden {
            params.push(("hidden", "1".to_string()));
        }
        if let Some(c) = &self.category {
            params.push(("category", c.as_str().to_string()));
        }
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, NON_ALPHANUMERIC)))
            .collect();
        Ok(format!("{}?{}", AUTO_SUBMIT_URL, query.join("&")))
    }
}

fn check_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(FlattrError::validation("url", format!("not an http(s) URL: '{}'", url))),
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(FlattrError::validation(
            field,
            format!("length {} outside {}..={}", len, min, max),
        ));
    }
    Ok(())
}

fn check_tags(tags: &[String]) -> Result<()> {
    match tags.iter().find(|t| t.contains(',')) {
        Some(tag) => Err(FlattrError::validation("tags", format!("tag '{}' contains a comma", tag))),
        None => Ok(()),
    }
}

fn xml_err(e: impl std::fmt::Display) -> FlattrError {
    FlattrError::marshal(format!("cannot write XML: {}", e))
}

fn start(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name))).map_err(xml_err)
}

fn end(w: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)
}

fn text_element(w: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(text))).map_err(xml_err)?;
    end(w, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn valid() -> Submission {
        Submission::new("http://example.com/post", "A fine post", "About fine things")
    }

    fn field_of(err: FlattrError) -> Option<String> {
        match err {
            FlattrError::Validation { field, .. } => field,
            other => panic!("not a validation error: {:?}", other),
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_title_bounds() {
        let mut s = valid();
        s.title = "abcd".into();
        assert_eq!(field_of(s.validate().unwrap_err()).as_deref(), Some("title"));
        s.title = "abcde".into();
        assert!(s.validate().is_ok());
        s.title = "x".repeat(100);
        assert!(s.validate().is_ok());
        s.title = "x".repeat(101);
        assert_eq!(field_of(s.validate().unwrap_err()).as_deref(), Some("title"));
    }

    #[test]
    fn test_description_bounds() {
        let mut s = valid();
        s.description = "abcd".into();
        let err = s.validate().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
        assert_eq!(field_of(err).as_deref(), Some("description"));
        s.description = "y".repeat(1001);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_tags_without_commas() {
        let mut s = valid();
        s.tags = vec!["rust".into(), "a,b".into()];
        assert_eq!(field_of(s.validate().unwrap_err()).as_deref(), Some("tags"));
    }

    #[test]
    fn test_url_scheme() {
        let mut s = valid();
        s.url = "ftp://example.com".into();
        assert_eq!(field_of(s.validate().unwrap_err()).as_deref(), Some("url"));
    }

    #[test]
    fn test_legacy_xml_body() {
        let mut s = valid();
        s.tags = vec!["a".into(), "b&c".into()];
        s.category = Some(CategoryId::new("text"));
        let xml = String::from_utf8(s.to_legacy_xml().unwrap()).unwrap();
        assert_eq!(
            xml,
            "<thing><url>http://example.com/post</url><title>A fine post</title><category>text</category><hidden>0</hidden><tags><tag>a</tag><tag>b&amp;c</tag></tags><description>About fine things</description></thing>"
        );
    }

    #[test]
    fn test_auto_submission_url() {
        let mut a = AutoSubmission::new("alice", "http://example.com/a b");
        a.title = Some("Hello world".into());
        a.tags = vec!["x".into(), "y".into()];
        a.hidden = true;
        assert_eq!(
            a.to_url().unwrap(),
            "https://flattr.com/submit/auto?user_id=alice&url=http%3A%2F%2Fexample%2Ecom%2Fa%20b&title=Hello%20world&tags=x%2Cy&hidden=1"
        );
        a.title = Some("Hi".into());
        assert!(a.to_url().is_err());
    }
}

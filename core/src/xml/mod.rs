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

//! Streaming element parser for the legacy XML API.
//!
//! `XmlStream` pulls events from quick-xml and keeps one text buffer per open
//! element. When an element closes, its trimmed text goes to the model
//! parser's `end_element`, which returns an item once a whole object has been
//! seen. The stream is an iterator over those items, in document order.

mod parsers;

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{FlattrError, Result};

pub use parsers::{
    CategoryParser, ClickCountParser, ClickedThingParser, ErrorBody, ErrorParser, LanguageParser,
    RegisteredThingParser, SubscriptionParser, ThingParser, UserParser,
};

/// Turns element events into model objects.
pub trait XmlModelParser {
    type Item;

    /// Called for each opening tag; use it to track nested context.
    fn start_element(&mut self, _name: &str) {}

    /// Called for each closing tag with the element's own text.
    /// Returns `Some` when an object is complete.
    fn end_element(&mut self, name: &str, text: String) -> Result<Option<Self::Item>>;
}

enum Step<T> {
    Item(T),
    Continue,
    Eof,
}

pub struct XmlStream<R: BufRead, P: XmlModelParser> {
    reader: Reader<R>,
    buf: Vec<u8>,
    texts: Vec<String>,
    parser: P,
    done: bool,
}

impl<'a, P: XmlModelParser> XmlStream<&'a [u8], P> {
    pub fn from_bytes(data: &'a [u8], parser: P) -> Self {
        Self::new(data, parser)
    }
}

impl<R: BufRead, P: XmlModelParser> XmlStream<R, P> {
    pub fn new(input: R, parser: P) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            texts: Vec::new(),
            parser,
            done: false,
        }
    }

    /// Current element nesting depth.
    pub fn depth(&self) -> usize {
        self.texts.len()
    }

    fn step(&mut self) -> Result<Step<P::Item>> {
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(e) => {
                let name = element_name(e.local_name().as_ref())?;
                self.parser.start_element(&name);
                self.texts.push(String::new());
                Ok(Step::Continue)
            }
            Event::Empty(e) => {
                let name = element_name(e.local_name().as_ref())?;
                self.parser.start_element(&name);
                Ok(to_step(self.parser.end_element(&name, String::new())?))
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| FlattrError::marshal(e.to_string()))?;
                if let Some(top) = self.texts.last_mut() {
                    top.push_str(&text);
                }
                Ok(Step::Continue)
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if let Some(top) = self.texts.last_mut() {
                    top.push_str(&text);
                }
                Ok(Step::Continue)
            }
            Event::End(e) => {
                let name = element_name(e.local_name().as_ref())?;
                let text = self.texts.pop().unwrap_or_default();
                Ok(to_step(self.parser.end_element(&name, text.trim().to_string())?))
            }
            Event::Eof => {
                if !self.texts.is_empty() {
                    return Err(FlattrError::marshal("unexpected end of XML document"));
                }
                Ok(Step::Eof)
            }
            _ => Ok(Step::Continue),
        }
    }
}

fn to_step<T>(item: Option<T>) -> Step<T> {
    match item {
        Some(item) => Step::Item(item),
        None => Step::Continue,
    }
}

fn element_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|_| FlattrError::marshal("element name is not UTF-8"))
}

impl<R: BufRead, P: XmlModelParser> Iterator for XmlStream<R, P> {
    type Item = Result<P::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.step() {
                Ok(Step::Item(item)) => return Some(Ok(item)),
                Ok(Step::Continue) => {}
                Ok(Step::Eof) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Parse a whole document into a list.
pub fn parse_all<P: XmlModelParser>(data: &[u8], parser: P) -> Result<Vec<P::Item>> {
    XmlStream::from_bytes(data, parser).collect()
}

/// Parse a document expected to hold exactly one object.
pub fn parse_one<P: XmlModelParser>(data: &[u8], parser: P) -> Result<P::Item> {
    let mut items = parse_all(data, parser)?;
    match items.len() {
        1 => Ok(items.remove(0)),
        n => Err(FlattrError::marshal(format!("expected one object, got {}", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects `<name>` texts.
    struct Names;

    impl XmlModelParser for Names {
        type Item = String;

        fn end_element(&mut self, name: &str, text: String) -> Result<Option<String>> {
            Ok(if name == "name" { Some(text) } else { None })
        }
    }

    #[test]
    fn test_document_order_then_end() {
        let xml = b"<list><a><name>one</name></a><a><name> two </name></a><name>three</name></list>";
        let mut stream = XmlStream::from_bytes(&xml[..], Names);
        assert_eq!(stream.next().unwrap().unwrap(), "one");
        assert_eq!(stream.next().unwrap().unwrap(), "two");
        assert_eq!(stream.next().unwrap().unwrap(), "three");
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = b"<r><name>a &amp; b</name><name><![CDATA[<x>]]></name><name/></r>";
        let items = parse_all(xml, Names).unwrap();
        assert_eq!(items, vec!["a & b".to_string(), "<x>".to_string(), String::new()]);
    }

    #[test]
    fn test_parent_text_excludes_children() {
        struct Outer;
        impl XmlModelParser for Outer {
            type Item = String;
            fn end_element(&mut self, name: &str, text: String) -> Result<Option<String>> {
                Ok(if name == "outer" { Some(text) } else { None })
            }
        }
        let items = parse_all(b"<outer>left<inner>x</inner>right</outer>", Outer).unwrap();
        assert_eq!(items, vec!["leftright".to_string()]);
    }

    #[test]
    fn test_malformed_is_error() {
        let mut stream = XmlStream::from_bytes(&b"<r><name>x</nam></r>"[..], Names);
        let first = stream.next().unwrap();
        assert!(matches!(first, Err(FlattrError::Marshal(_))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_parse_one_requires_single() {
        assert!(parse_one(b"<r/>", Names).is_err());
        assert_eq!(parse_one(b"<name>x</name>", Names).unwrap(), "x");
    }
}

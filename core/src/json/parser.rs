/*
 * parser.rs
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

//! Push-model JSON parser: feed bytes with `receive()`, events go to a handler.
//!
//! Only complete tokens are consumed. A token cut off at the end of the buffer
//! (an open string, a number that may continue, a partial literal) stays in the
//! buffer; append more data and call `receive()` again. `close()` flushes the
//! remainder and checks that exactly one complete document was seen.

use bytes::{Buf, BytesMut};

use crate::json::error::JsonError;
use crate::json::handler::JsonContentHandler;
use crate::json::number::JsonNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// What the grammar allows next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Root value.
    Value,
    /// Value after `[`: a value or `]`.
    FirstElement,
    /// Value after `:` or `,` in an array.
    Element,
    /// After `{`: a key or `}`.
    FirstKey,
    /// After `,` in an object.
    Key,
    Colon,
    /// After a value inside a container: `,` or the closing bracket.
    Separator,
    /// Root value complete.
    Done,
}

enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Colon,
    Comma,
    Str(String),
    Number(JsonNumber),
    Bool(bool),
    Null,
}

/// Outcome of scanning one token from the front of the buffer.
enum Scan {
    Token(Token, usize),
    /// Token incomplete; wait for more bytes.
    Partial,
}

pub struct JsonParser {
    stack: Vec<Frame>,
    state: State,
    /// Bytes consumed so far, for error offsets.
    offset: usize,
    bom_checked: bool,
    closed: bool,
}

impl JsonParser {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            state: State::Value,
            offset: 0,
            bom_checked: false,
            closed: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True once the root value has been fully parsed.
    pub fn is_complete(&self) -> bool {
        self.state == State::Done
    }

    /// Consume as many complete tokens from `buf` as possible.
    pub fn receive<H: JsonContentHandler + ?Sized>(
        &mut self,
        buf: &mut BytesMut,
        handler: &mut H,
    ) -> Result<(), JsonError> {
        if self.closed {
            return Err(JsonError::new("receive after close", self.offset));
        }
        self.drain(buf, handler, false)
    }

    /// End of input: parse what is left in `buf` and validate the document.
    pub fn close<H: JsonContentHandler + ?Sized>(
        &mut self,
        buf: &mut BytesMut,
        handler: &mut H,
    ) -> Result<(), JsonError> {
        if self.closed {
            return Ok(());
        }
        self.drain(buf, handler, true)?;
        self.closed = true;
        match self.state {
            State::Done => Ok(()),
            State::Value => Err(JsonError::new("no data", self.offset)),
            _ => Err(JsonError::new("unclosed structure", self.offset)),
        }
    }

    fn drain<H: JsonContentHandler + ?Sized>(
        &mut self,
        buf: &mut BytesMut,
        handler: &mut H,
        at_end: bool,
    ) -> Result<(), JsonError> {
        if !self.bom_checked {
            if buf.len() < 3 && !at_end && buf.first() == Some(&0xef) {
                return Ok(());
            }
            if buf.starts_with(&[0xef, 0xbb, 0xbf]) {
                buf.advance(3);
                self.offset += 3;
            }
            self.bom_checked = true;
        }
        loop {
            let ws = buf
                .iter()
                .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
                .count();
            buf.advance(ws);
            self.offset += ws;
            if buf.is_empty() {
                return Ok(());
            }
            if self.state == State::Done {
                return Err(JsonError::new("trailing data after document", self.offset));
            }
            match scan(buf, at_end, self.offset)? {
                Scan::Partial if at_end => {
                    return Err(JsonError::new("truncated token", self.offset));
                }
                Scan::Partial => return Ok(()),
                Scan::Token(token, len) => {
                    self.apply(token, handler)?;
                    buf.advance(len);
                    self.offset += len;
                }
            }
        }
    }

    fn apply<H: JsonContentHandler + ?Sized>(
        &mut self,
        token: Token,
        handler: &mut H,
    ) -> Result<(), JsonError> {
        let expects_value = matches!(
            self.state,
            State::Value | State::FirstElement | State::Element
        );
        match token {
            Token::BeginObject if expects_value => {
                handler.start_object();
                self.stack.push(Frame::Object);
                self.state = State::FirstKey;
            }
            Token::BeginArray if expects_value => {
                handler.start_array();
                self.stack.push(Frame::Array);
                self.state = State::FirstElement;
            }
            Token::EndObject
                if self.stack.last() == Some(&Frame::Object)
                    && matches!(self.state, State::FirstKey | State::Separator) =>
            {
                self.stack.pop();
                handler.end_object();
                self.after_value();
            }
            Token::EndArray
                if self.stack.last() == Some(&Frame::Array)
                    && matches!(self.state, State::FirstElement | State::Separator) =>
            {
                self.stack.pop();
                handler.end_array();
                self.after_value();
            }
            Token::Str(s) if matches!(self.state, State::FirstKey | State::Key) => {
                handler.key(&s);
                self.state = State::Colon;
            }
            Token::Colon if self.state == State::Colon => {
                self.state = State::Element;
            }
            Token::Comma if self.state == State::Separator => {
                self.state = match self.stack.last() {
                    Some(Frame::Object) => State::Key,
                    _ => State::Element,
                };
            }
            Token::Str(s) if expects_value => {
                handler.string_value(&s);
                self.after_value();
            }
            Token::Number(n) if expects_value => {
                handler.number_value(n);
                self.after_value();
            }
            Token::Bool(b) if expects_value => {
                handler.boolean_value(b);
                self.after_value();
            }
            Token::Null if expects_value => {
                handler.null_value();
                self.after_value();
            }
            _ => return Err(JsonError::new("unexpected token", self.offset)),
        }
        Ok(())
    }

    fn after_value(&mut self) {
        self.state = if self.stack.is_empty() {
            State::Done
        } else {
            State::Separator
        };
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

fn scan(data: &[u8], at_end: bool, offset: usize) -> Result<Scan, JsonError> {
    let single = |t: Token| -> Result<Scan, JsonError> { Ok(Scan::Token(t, 1)) };
    match data[0] {
        b'{' => single(Token::BeginObject),
        b'}' => single(Token::EndObject),
        b'[' => single(Token::BeginArray),
        b']' => single(Token::EndArray),
        b':' => single(Token::Colon),
        b',' => single(Token::Comma),
        b'"' => scan_string(data, offset),
        b't' => scan_literal(data, b"true", Token::Bool(true), offset),
        b'f' => scan_literal(data, b"false", Token::Bool(false), offset),
        b'n' => scan_literal(data, b"null", Token::Null, offset),
        b'-' | b'0'..=b'9' => scan_number(data, at_end, offset),
        other => Err(JsonError::new(
            format!("unexpected character '{}'", other as char),
            offset,
        )),
    }
}

fn scan_literal(data: &[u8], word: &[u8], token: Token, offset: usize) -> Result<Scan, JsonError> {
    let n = word.len().min(data.len());
    if data[..n] != word[..n] {
        return Err(JsonError::new("invalid literal", offset));
    }
    if n < word.len() {
        return Ok(Scan::Partial);
    }
    Ok(Scan::Token(token, word.len()))
}

fn scan_number(data: &[u8], at_end: bool, offset: usize) -> Result<Scan, JsonError> {
    let len = data
        .iter()
        .take_while(|b| matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))
        .count();
    if len == data.len() && !at_end {
        return Ok(Scan::Partial);
    }
    let text = std::str::from_utf8(&data[..len])
        .map_err(|_| JsonError::new("invalid number", offset))?;
    if !valid_number(text) {
        return Err(JsonError::new(format!("invalid number '{}'", text), offset));
    }
    let number = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().map(JsonNumber::F64).ok()
    } else {
        text.parse::<i64>()
            .map(JsonNumber::I64)
            .or_else(|_| text.parse::<f64>().map(JsonNumber::F64))
            .ok()
    };
    number
        .map(|n| Scan::Token(Token::Number(n), len))
        .ok_or_else(|| JsonError::new(format!("invalid number '{}'", text), offset))
}

/// Grammar check: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
fn valid_number(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if b.get(i) == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(b.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == b.len()
}

fn scan_string(data: &[u8], offset: usize) -> Result<Scan, JsonError> {
    let mut out: Vec<u8> = Vec::new();
    let mut i = 1;
    loop {
        let Some(&b) = data.get(i) else {
            return Ok(Scan::Partial);
        };
        match b {
            b'"' => {
                let s = String::from_utf8(out)
                    .map_err(|_| JsonError::new("invalid UTF-8 in string", offset))?;
                return Ok(Scan::Token(Token::Str(s), i + 1));
            }
            b'\\' => {
                let Some(&esc) = data.get(i + 1) else {
                    return Ok(Scan::Partial);
                };
                let simple = match esc {
                    b'"' => Some(b'"'),
                    b'\\' => Some(b'\\'),
                    b'/' => Some(b'/'),
                    b'b' => Some(0x08),
                    b'f' => Some(0x0c),
                    b'n' => Some(b'\n'),
                    b'r' => Some(b'\r'),
                    b't' => Some(b'\t'),
                    b'u' => None,
                    _ => return Err(JsonError::new("invalid escape", offset + i)),
                };
                if let Some(c) = simple {
                    out.push(c);
                    i += 2;
                    continue;
                }
                let Some(unit) = hex4(data, i + 2, offset)? else {
                    return Ok(Scan::Partial);
                };
                let (ch, used) = if (0xd800..0xdc00).contains(&unit) {
                    // high surrogate: expect \uDC00..DFFF next
                    if data.len() < i + 12 {
                        return Ok(Scan::Partial);
                    }
                    if data[i + 6] != b'\\' || data[i + 7] != b'u' {
                        return Err(JsonError::new("unpaired surrogate", offset + i));
                    }
                    let low = hex4(data, i + 8, offset)?.unwrap_or(0);
                    if !(0xdc00..0xe000).contains(&low) {
                        return Err(JsonError::new("unpaired surrogate", offset + i));
                    }
                    let cp = 0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00);
                    (char::from_u32(cp), 12)
                } else {
                    (char::from_u32(unit), 6)
                };
                let ch = ch.ok_or_else(|| JsonError::new("invalid code point", offset + i))?;
                let mut tmp = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
                i += used;
            }
            0x00..=0x1f => {
                return Err(JsonError::new("control character in string", offset + i));
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
}

fn hex4(data: &[u8], at: usize, offset: usize) -> Result<Option<u32>, JsonError> {
    if data.len() < at + 4 {
        return Ok(None);
    }
    let s = std::str::from_utf8(&data[at..at + 4])
        .map_err(|_| JsonError::new("invalid \\u escape", offset + at))?;
    u32::from_str_radix(s, 16)
        .map(Some)
        .map_err(|_| JsonError::new("invalid \\u escape", offset + at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl JsonContentHandler for Recorder {
        fn start_object(&mut self) {
            self.events.push("{".into());
        }
        fn end_object(&mut self) {
            self.events.push("}".into());
        }
        fn start_array(&mut self) {
            self.events.push("[".into());
        }
        fn end_array(&mut self) {
            self.events.push("]".into());
        }
        fn key(&mut self, key: &str) {
            self.events.push(format!("k:{}", key));
        }
        fn string_value(&mut self, value: &str) {
            self.events.push(format!("s:{}", value));
        }
        fn number_value(&mut self, number: JsonNumber) {
            self.events.push(format!("n:{}", number.as_f64()));
        }
        fn boolean_value(&mut self, value: bool) {
            self.events.push(format!("b:{}", value));
        }
        fn null_value(&mut self) {
            self.events.push("null".into());
        }
    }

    fn parse_all(chunks: &[&[u8]]) -> Result<Vec<String>, JsonError> {
        let mut parser = JsonParser::new();
        let mut handler = Recorder::default();
        let mut buf = BytesMut::new();
        for chunk in chunks {
            buf.extend_from_slice(chunk);
            parser.receive(&mut buf, &mut handler)?;
        }
        parser.close(&mut buf, &mut handler)?;
        Ok(handler.events)
    }

    #[test]
    fn test_thing_document_events() {
        let events = parse_all(&[br#"{"id":423405,"title":"Hello","tags":["a","b"],"hidden":false,"image":null}"#]).unwrap();
        assert_eq!(
            events,
            vec![
                "{", "k:id", "n:423405", "k:title", "s:Hello", "k:tags", "[", "s:a", "s:b", "]",
                "k:hidden", "b:false", "k:image", "null", "}"
            ]
        );
    }

    #[test]
    fn test_split_across_chunks() {
        let events = parse_all(&[b"[{\"ti", b"tle\":\"Sm\\u00f", b"6rg\"},12", b"34]"]).unwrap();
        assert_eq!(events, vec!["[", "{", "k:title", "s:Sm\u{f6}rg", "}", "n:1234", "]"]);
    }

    #[test]
    fn test_root_number_needs_close() {
        let events = parse_all(&[b"42"]).unwrap();
        assert_eq!(events, vec!["n:42"]);
    }

    #[test]
    fn test_surrogate_pair() {
        let events = parse_all(&[br#"["\ud83d\ude00"]"#]).unwrap();
        assert_eq!(events[1], "s:\u{1F600}");
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(parse_all(&[b"{\"a\" 1}"]).is_err());
        assert!(parse_all(&[b"[1,]"]).is_err());
        assert!(parse_all(&[b"{\"a\":1"]).is_err());
        assert!(parse_all(&[b"01"]).is_err());
        assert!(parse_all(&[b"{} {}"]).is_err());
        assert!(parse_all(&[b""]).is_err());
        assert!(parse_all(&[b"[tru"]).is_err());
    }
}

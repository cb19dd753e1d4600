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

//! HTTP/1.1 response push parser: status line, headers, then a body framed by
//! Content-Length, chunked encoding, or connection close.

use bytes::{Buf, BytesMut};
use std::io;

/// Parse events. The connection implements this and forwards to a `ResponseHandler`.
pub trait H1ResponseHandler {
    fn status(&mut self, code: u16, reason: Option<&str>);
    fn header(&mut self, name: &str, value: &str);
    /// End of the header block; `has_body` is false for bodiless responses.
    fn headers_complete(&mut self, has_body: bool);
    fn body_chunk(&mut self, data: &[u8]);
    fn trailer(&mut self, name: &str, value: &str);
    /// Body finished (or there was none); the response is complete.
    fn complete(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    StatusLine,
    Headers,
    Body,
    /// Body runs until the peer closes the connection.
    BodyUntilClose,
    ChunkSize,
    ChunkData,
    ChunkDataEnd,
    ChunkTrailer,
    Done,
}

pub struct ResponseParser {
    state: ParseState,
    status: u16,
    /// Response to a HEAD request: headers only.
    head_request: bool,
    content_length: Option<u64>,
    chunked: bool,
    remaining: u64,
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Split off one CRLF-terminated line, without the CRLF.
fn take_line(buf: &mut BytesMut) -> Option<BytesMut> {
    let end = find_crlf(buf)?;
    let line = buf.split_to(end);
    buf.advance(2);
    Some(line)
}

fn split_header(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    Some((line[..colon].trim(), line[colon + 1..].trim()))
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::StatusLine,
            status: 0,
            head_request: false,
            content_length: None,
            chunked: false,
            remaining: 0,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Prepare for a new response. `head_request` suppresses the body.
    pub fn reset(&mut self, head_request: bool) {
        *self = Self::new();
        self.head_request = head_request;
    }

    /// Consume as much of `buf` as possible. Incomplete lines stay in `buf`.
    pub fn receive<H: H1ResponseHandler>(
        &mut self,
        buf: &mut BytesMut,
        handler: &mut H,
    ) -> io::Result<()> {
        loop {
            match self.state {
                ParseState::StatusLine => {
                    let Some(line) = take_line(buf) else { return Ok(()) };
                    let line = std::str::from_utf8(&line)
                        .map_err(|_| invalid("status line is not UTF-8"))?;
                    let mut parts = line.splitn(3, ' ');
                    let version = parts.next().unwrap_or_default();
                    if !version.starts_with("HTTP/1.") {
                        return Err(invalid("not an HTTP/1.x response"));
                    }
                    let code = parts
                        .next()
                        .and_then(|s| s.parse::<u16>().ok())
                        .ok_or_else(|| invalid("bad status code"))?;
                    let reason = parts.next().map(str::trim).filter(|r| !r.is_empty());
                    self.status = code;
                    handler.status(code, reason);
                    self.state = ParseState::Headers;
                }
                ParseState::Headers => {
                    let Some(line) = take_line(buf) else { return Ok(()) };
                    if line.is_empty() {
                        self.end_headers(handler);
                        continue;
                    }
                    let line = std::str::from_utf8(&line)
                        .map_err(|_| invalid("header is not UTF-8"))?;
                    if let Some((name, value)) = split_header(line) {
                        if name.eq_ignore_ascii_case("content-length") {
                            let len = value.parse().map_err(|_| invalid("bad Content-Length"))?;
                            self.content_length = Some(len);
                        } else if name.eq_ignore_ascii_case("transfer-encoding") {
                            self.chunked = value.to_ascii_lowercase().contains("chunked");
                        }
                        handler.header(name, value);
                    }
                }
                ParseState::Body => {
                    if buf.is_empty() {
                        return Ok(());
                    }
                    let n = (self.remaining.min(buf.len() as u64)) as usize;
                    let chunk = buf.split_to(n);
                    handler.body_chunk(&chunk);
                    self.remaining -= n as u64;
                    if self.remaining == 0 {
                        self.finish(handler);
                    }
                }
                ParseState::BodyUntilClose => {
                    if !buf.is_empty() {
                        let chunk = buf.split();
                        handler.body_chunk(&chunk);
                    }
                    return Ok(());
                }
                ParseState::ChunkSize => {
                    let Some(line) = take_line(buf) else { return Ok(()) };
                    let line = std::str::from_utf8(&line)
                        .map_err(|_| invalid("chunk size is not UTF-8"))?;
                    let hex = line.split(';').next().unwrap_or_default().trim();
                    let size =
                        u64::from_str_radix(hex, 16).map_err(|_| invalid("bad chunk size"))?;
                    if size == 0 {
                        self.state = ParseState::ChunkTrailer;
                    } else {
                        self.remaining = size;
                        self.state = ParseState::ChunkData;
                    }
                }
                ParseState::ChunkData => {
                    if buf.is_empty() {
                        return Ok(());
                    }
                    let n = (self.remaining.min(buf.len() as u64)) as usize;
                    let chunk = buf.split_to(n);
                    handler.body_chunk(&chunk);
                    self.remaining -= n as u64;
                    if self.remaining == 0 {
                        self.state = ParseState::ChunkDataEnd;
                    }
                }
                ParseState::ChunkDataEnd => {
                    if buf.len() < 2 {
                        return Ok(());
                    }
                    if &buf[..2] != b"\r\n" {
                        return Err(invalid("missing CRLF after chunk"));
                    }
                    buf.advance(2);
                    self.state = ParseState::ChunkSize;
                }
                ParseState::ChunkTrailer => {
                    let Some(line) = take_line(buf) else { return Ok(()) };
                    if line.is_empty() {
                        self.finish(handler);
                        continue;
                    }
                    let line = std::str::from_utf8(&line)
                        .map_err(|_| invalid("trailer is not UTF-8"))?;
                    if let Some((name, value)) = split_header(line) {
                        handler.trailer(name, value);
                    }
                }
                ParseState::Done => return Ok(()),
            }
        }
    }

    /// The peer closed the connection. Completes a body framed by close;
    /// anywhere else the response was truncated.
    pub fn eof<H: H1ResponseHandler>(&mut self, handler: &mut H) -> io::Result<()> {
        match self.state {
            ParseState::BodyUntilClose => {
                self.finish(handler);
                Ok(())
            }
            ParseState::Done => Ok(()),
            _ => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before end of response",
            )),
        }
    }

    fn end_headers<H: H1ResponseHandler>(&mut self, handler: &mut H) {
        let bodiless = self.head_request
            || self.status == 204
            || self.status == 304
            || (100..200).contains(&self.status);
        if bodiless {
            handler.headers_complete(false);
            self.finish(handler);
        } else if self.chunked {
            handler.headers_complete(true);
            self.state = ParseState::ChunkSize;
        } else if let Some(len) = self.content_length {
            handler.headers_complete(len > 0);
            if len == 0 {
                self.finish(handler);
            } else {
                self.remaining = len;
                self.state = ParseState::Body;
            }
        } else {
            handler.headers_complete(true);
            self.state = ParseState::BodyUntilClose;
        }
    }

    fn finish<H: H1ResponseHandler>(&mut self, handler: &mut H) {
        handler.complete();
        self.state = ParseState::Done;
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        status: Option<(u16, Option<String>)>,
        headers: Vec<(String, String)>,
        has_body: Option<bool>,
        body: Vec<u8>,
        trailers: Vec<(String, String)>,
        complete: bool,
    }

    impl H1ResponseHandler for Collect {
        fn status(&mut self, code: u16, reason: Option<&str>) {
            self.status = Some((code, reason.map(str::to_string)));
        }
        fn header(&mut self, name: &str, value: &str) {
            self.headers.push((name.into(), value.into()));
        }
        fn headers_complete(&mut self, has_body: bool) {
            self.has_body = Some(has_body);
        }
        fn body_chunk(&mut self, data: &[u8]) {
            self.body.extend_from_slice(data);
        }
        fn trailer(&mut self, name: &str, value: &str) {
            self.trailers.push((name.into(), value.into()));
        }
        fn complete(&mut self) {
            self.complete = true;
        }
    }

    fn feed_bytewise(parser: &mut ResponseParser, data: &[u8], h: &mut Collect) {
        let mut buf = BytesMut::new();
        for b in data {
            buf.extend_from_slice(&[*b]);
            parser.receive(&mut buf, h).unwrap();
        }
    }

    #[test]
    fn test_content_length_bytewise() {
        let mut p = ResponseParser::new();
        let mut h = Collect::default();
        feed_bytewise(
            &mut p,
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\r\n[]",
            &mut h,
        );
        assert_eq!(h.status, Some((200, Some("OK".to_string()))));
        assert_eq!(h.headers.len(), 2);
        assert_eq!(h.body, b"[]");
        assert!(h.complete);
        assert!(p.is_done());
    }

    #[test]
    fn test_chunked_with_trailer() {
        let mut p = ResponseParser::new();
        let mut h = Collect::default();
        let mut buf = BytesMut::from(
            &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5;ext=1\r\npedia\r\n0\r\nX-Done: yes\r\n\r\n"[..],
        );
        p.receive(&mut buf, &mut h).unwrap();
        assert_eq!(h.body, b"Wikipedia");
        assert_eq!(h.trailers, vec![("X-Done".to_string(), "yes".to_string())]);
        assert!(h.complete);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_no_content() {
        let mut p = ResponseParser::new();
        let mut h = Collect::default();
        let mut buf = BytesMut::from(&b"HTTP/1.1 204 No Content\r\n\r\n"[..]);
        p.receive(&mut buf, &mut h).unwrap();
        assert_eq!(h.has_body, Some(false));
        assert!(h.complete);
    }

    #[test]
    fn test_head_ignores_content_length() {
        let mut p = ResponseParser::new();
        p.reset(true);
        let mut h = Collect::default();
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n"[..]);
        p.receive(&mut buf, &mut h).unwrap();
        assert!(h.complete);
    }

    #[test]
    fn test_body_until_close() {
        let mut p = ResponseParser::new();
        let mut h = Collect::default();
        let mut buf = BytesMut::from(&b"HTTP/1.0 500 Oops\r\n\r\npartial"[..]);
        p.receive(&mut buf, &mut h).unwrap();
        assert!(!h.complete);
        p.eof(&mut h).unwrap();
        assert!(h.complete);
        assert_eq!(h.body, b"partial");
    }

    #[test]
    fn test_truncated_is_error() {
        let mut p = ResponseParser::new();
        let mut h = Collect::default();
        let mut buf = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nab"[..]);
        p.receive(&mut buf, &mut h).unwrap();
        assert_eq!(p.eof(&mut h).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_bad_status_line() {
        let mut p = ResponseParser::new();
        let mut h = Collect::default();
        let mut buf = BytesMut::from(&b"SSH-2.0-OpenSSH\r\n"[..]);
        assert!(p.receive(&mut buf, &mut h).is_err());
    }
}

/*
 * handler.rs
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

//! Response event callbacks, and a handler that buffers the whole response.
//!
//! Events: `ok`/`error` (status) → `header` (×n) → `start_body` → `body_chunk` (×n)
//! → `end_body` → `complete`. On transport failure only `failed` is called.

use crate::protocol::http::response::Response;

pub trait ResponseHandler {
    /// 2xx status received.
    fn ok(&mut self, response: Response);

    /// Any other status received.
    fn error(&mut self, response: Response);

    /// Response or trailer header. Names may repeat.
    fn header(&mut self, name: &str, value: &str);

    /// Not called for responses without a body (204, 304, HEAD).
    fn start_body(&mut self);

    fn body_chunk(&mut self, data: &[u8]);

    fn end_body(&mut self);

    fn complete(&mut self);

    fn failed(&mut self, error: &std::io::Error);
}

/// A fully received response.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    pub status: u16,
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub complete: bool,
}

impl BufferedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl ResponseHandler for BufferedResponse {
    fn ok(&mut self, response: Response) {
        self.status = response.code;
        self.status_line = response.status_line();
    }

    fn error(&mut self, response: Response) {
        self.ok(response);
    }

    fn header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn start_body(&mut self) {}

    fn body_chunk(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }

    fn end_body(&mut self) {}

    fn complete(&mut self) {
        self.complete = true;
    }

    fn failed(&mut self, _error: &std::io::Error) {
        self.complete = false;
    }
}

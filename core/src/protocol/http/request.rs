/*
 * request.rs
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

//! HTTP request: method, target, headers, optional body.

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }

    /// Whether a body is normally sent with this method.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request ready to be written to a connection.
///
/// Headers keep insertion order; setting a header that is already present
/// (compared case-insensitively) replaces its value.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub method: Method,
    /// Origin-form target: path plus query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&mut self, data: Vec<u8>) -> &mut Self {
        self.body = Some(data);
        self
    }

    /// Serialise the request head and body for HTTP/1.1.
    pub fn to_bytes(&self, host_header: &str) -> Vec<u8> {
        let mut head = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\n",
            self.method.as_str(),
            self.path,
            host_header
        );
        for (k, v) in &self.headers {
            head.push_str(k);
            head.push_str(": ");
            head.push_str(v);
            head.push_str("\r\n");
        }
        let body_len = self.body.as_ref().map_or(0, Vec::len);
        if self.body.is_some() || self.method.has_body() {
            head.push_str(&format!("Content-Length: {}\r\n", body_len));
        }
        head.push_str("Connection: close\r\n\r\n");
        let mut out = head.into_bytes();
        if let Some(body) = &self.body {
            out.extend_from_slice(body);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_replace_case_insensitive() {
        let mut req = RequestBuilder::new(Method::Get, "/");
        req.header("Accept", "text/xml");
        req.header("accept", "application/json");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.get_header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn test_to_bytes() {
        let mut req = RequestBuilder::new(Method::Post, "/rest/v2/things?x=1");
        req.header("Content-Type", "application/json");
        req.body(b"{}".to_vec());
        let text = String::from_utf8(req.to_bytes("api.example.com")).unwrap();
        assert_eq!(
            text,
            "POST /rest/v2/things?x=1 HTTP/1.1\r\nHost: api.example.com\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}"
        );
        let get = RequestBuilder::new(Method::Get, "/a");
        let text = String::from_utf8(get.to_bytes("h")).unwrap();
        assert!(!text.contains("Content-Length"));
    }
}

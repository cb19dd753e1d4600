/*
 * url.rs
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

//! URL splitting and percent-encoding for request targets.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{FlattrError, Result};

/// RFC 3986 unreserved characters stay as they are; everything else is escaped.
/// This is also the encoding OAuth 1.0 signatures require.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Path segments may also carry commas (`things/1,2,3`).
const SEGMENT: &AsciiSet = &UNRESERVED.remove(b',');

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

pub fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}

pub fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// `a=1&b=2` with both sides encoded.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string or form body into pairs.
pub fn decode_pairs(s: &str) -> Vec<(String, String)> {
    s.split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode(k), decode(v)),
            None => (decode(pair), String::new()),
        })
        .collect()
}

/// An absolute http(s) URL split for connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    pub secure: bool,
    pub host: String,
    pub port: u16,
    /// Path without the query, starting with `/`.
    pub path: String,
    /// Query pairs already present in the URL.
    pub query: Vec<(String, String)>,
}

impl ApiUrl {
    pub fn parse(url: &str) -> Result<ApiUrl> {
        let (secure, rest) = if let Some(rest) = url.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(FlattrError::InvalidRequest(format!("not an http(s) URL: {}", url)));
        };
        let rest = rest.split('#').next().unwrap_or_default();
        let (authority, path_query) = match rest.find(['/', '?']) {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) => {
                let port = p
                    .parse::<u16>()
                    .map_err(|_| FlattrError::InvalidRequest(format!("invalid port in URL: {}", url)))?;
                (h, port)
            }
            None => (authority, if secure { 443 } else { 80 }),
        };
        if host.is_empty() {
            return Err(FlattrError::InvalidRequest(format!("no host in URL: {}", url)));
        }
        let (path, query) = match path_query.split_once('?') {
            Some((p, q)) => (p, decode_pairs(q)),
            None => (path_query, Vec::new()),
        };
        Ok(ApiUrl {
            secure,
            host: host.to_string(),
            port,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
        })
    }

    /// Scheme and authority, without a trailing slash.
    pub fn origin(&self) -> String {
        let default_port = if self.secure { 443 } else { 80 };
        let scheme = if self.secure { "https" } else { "http" };
        if self.port == default_port {
            format!("{}://{}", scheme, self.host.to_ascii_lowercase())
        } else {
            format!("{}://{}:{}", scheme, self.host.to_ascii_lowercase(), self.port)
        }
    }

    /// Scheme, authority and path: the OAuth 1.0 base string URI.
    pub fn base(&self) -> String {
        format!("{}{}", self.origin(), self.path)
    }

    /// Absolute form of `reference` (e.g. a `Location` header) seen from this URL.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }
        if let Some(rest) = reference.strip_prefix("//") {
            let scheme = if self.secure { "https" } else { "http" };
            return format!("{}://{}", scheme, rest);
        }
        if reference.starts_with('/') {
            return format!("{}{}", self.origin(), reference);
        }
        let dir = match self.path.rfind('/') {
            Some(i) => &self.path[..=i],
            None => "/",
        };
        format!("{}{}{}", self.origin(), dir, reference)
    }

    /// Origin-form request target.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, encode_pairs(&self.query))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_ports() {
        let u = ApiUrl::parse("https://api.flattr.com/rest/v2/things/1").unwrap();
        assert!(u.secure);
        assert_eq!(u.host, "api.flattr.com");
        assert_eq!(u.port, 443);
        assert_eq!(u.path, "/rest/v2/things/1");
        let u = ApiUrl::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(u.port, 8080);
        assert_eq!(u.path, "/");
    }

    #[test]
    fn test_parse_query() {
        let u = ApiUrl::parse("https://h.example/p?a=1&b=x%20y&c").unwrap();
        assert_eq!(
            u.query,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x y".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
        assert_eq!(u.target(), "/p?a=1&b=x%20y&c=");
        assert_eq!(u.base(), "https://h.example/p");
    }

    #[test]
    fn test_reject_other_schemes() {
        assert!(matches!(ApiUrl::parse("ftp://h/x"), Err(FlattrError::InvalidRequest(_))));
        assert!(ApiUrl::parse("https://:80/").is_err());
        assert!(ApiUrl::parse("https://h:notaport/").is_err());
    }

    #[test]
    fn test_encode_unreserved() {
        assert_eq!(encode("a-b.c_d~e f/g"), "a-b.c_d~e%20f%2Fg");
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode_segment("1,2/3"), "1,2%2F3");
    }

    #[test]
    fn test_resolve_location() {
        let base = ApiUrl::parse("https://api.flattr.com/rest/v2/things/lookup?url=x").unwrap();
        assert_eq!(
            base.resolve("https://api.flattr.com/rest/v2/things/1"),
            "https://api.flattr.com/rest/v2/things/1"
        );
        assert_eq!(base.resolve("/rest/v2/things/1"), "https://api.flattr.com/rest/v2/things/1");
        assert_eq!(base.resolve("1"), "https://api.flattr.com/rest/v2/things/1");
        assert_eq!(base.resolve("//cdn.example.com/a"), "https://cdn.example.com/a");
        let local = ApiUrl::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(local.resolve("/things/2"), "http://127.0.0.1:8080/things/2");
    }
}

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

//! Request building and execution against the REST API.
//!
//! A `Connector` holds the base URL and transport settings. `create` starts a
//! `Connection`, a one-shot builder: set the path, parameters, body and
//! credentials, then `result()` for parsed JSON objects or `execute()` for
//! the raw reply.
//!
//! ```no_run
//! # async fn demo(connector: flattr_core::connector::Connector) -> flattr_core::Result<()> {
//! use flattr_core::protocol::http::Method;
//! let thing = connector
//!     .create(Method::Get)
//!     .call("things/:id")
//!     .parameter("id", "423405")
//!     .single_result()
//!     .await?;
//! assert!(thing.has("id"));
//! # Ok(()) }
//! ```

mod classify;
mod rate_limit;
mod url;

use std::io::Read;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::config::FlattrConfig;
use crate::error::{FlattrError, Result};
use crate::json::parse_values;
use crate::model::FlattrObject;
use crate::oauth::{AccessToken, ConsumerKey, Oauth1Signer};
use crate::protocol::http::{BufferedResponse, HttpClient, Method, RequestBuilder, Timeouts};

pub use classify::json_error;
pub use rate_limit::{RateLimit, RateLimitTracker};
pub use url::{decode, decode_pairs, encode, encode_pairs, encode_segment, ApiUrl};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Settings shared by every connection made from it.
#[derive(Debug, Clone)]
pub struct Connector {
    base_url: String,
    user_agent: String,
    timeouts: Timeouts,
    accept: &'static str,
}

impl Connector {
    pub fn new(base_url: impl Into<String>) -> Self {
        let config = FlattrConfig::default();
        let timeouts = config.timeouts();
        Self {
            base_url: base_url.into(),
            user_agent: config.user_agent,
            timeouts,
            accept: JSON,
        }
    }

    /// Connector for the JSON API described by `config`.
    pub fn from_config(config: &FlattrConfig) -> Self {
        Self {
            base_url: config.api_base.clone(),
            user_agent: config.user_agent.clone(),
            timeouts: config.timeouts(),
            accept: JSON,
        }
    }

    /// Connector for the legacy XML API described by `config`.
    pub fn legacy(config: &FlattrConfig) -> Self {
        Self {
            base_url: config.legacy_base.clone(),
            user_agent: config.user_agent.clone(),
            timeouts: config.timeouts(),
            accept: "text/xml",
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request with the given method.
    pub fn create(&self, method: Method) -> Connection {
        Connection {
            connector: self.clone(),
            method,
            url: None,
            call: None,
            params: Vec::new(),
            query: Vec::new(),
            form: Vec::new(),
            body: None,
            auth: Auth::None,
            rate_limit: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Auth {
    None,
    Bearer(String),
    Basic(String),
    OAuth1(Oauth1Signer),
}

#[derive(Debug, Clone)]
enum Body {
    Json(FlattrObject),
    Raw { content_type: String, data: Vec<u8> },
}

/// One request under construction.
#[derive(Debug, Clone)]
pub struct Connection {
    connector: Connector,
    method: Method,
    url: Option<String>,
    call: Option<String>,
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    body: Option<Body>,
    auth: Auth,
    rate_limit: Option<RateLimitTracker>,
}

/// A received reply with its body already inflated.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Request ready to go on the wire.
struct Prepared {
    url: ApiUrl,
    request: RequestBuilder,
}

impl Connection {
    /// Absolute URL, used as is.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Path template relative to the base URL, e.g. `things/:id/flattrs`.
    pub fn call(mut self, template: impl Into<String>) -> Self {
        self.call = Some(template.into());
        self
    }

    /// Value for a `:name` placeholder in the path template.
    pub fn parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn query_opt(self, name: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Form field for an `application/x-www-form-urlencoded` body.
    pub fn form(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.form.push((name.into(), value.to_string()));
        self
    }

    /// JSON body.
    pub fn data(mut self, data: FlattrObject) -> Self {
        self.body = Some(Body::Json(data));
        self
    }

    /// Body sent as is.
    pub fn raw_body(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.body = Some(Body::Raw {
            content_type: content_type.into(),
            data,
        });
        self
    }

    /// Bearer token. `None` leaves the request anonymous.
    pub fn token(mut self, token: Option<&AccessToken>) -> Self {
        if let Some(t) = token {
            self.auth = Auth::Bearer(t.token.clone());
        }
        self
    }

    /// Consumer key and secret as HTTP Basic credentials.
    pub fn key(mut self, key: &ConsumerKey) -> Self {
        let credentials = format!("{}:{}", key.key, key.secret);
        self.auth = Auth::Basic(BASE64.encode(credentials));
        self
    }

    /// Sign with OAuth 1.0 (HMAC-SHA1).
    pub fn signer(mut self, signer: Oauth1Signer) -> Self {
        self.auth = Auth::OAuth1(signer);
        self
    }

    /// Record the `X-RateLimit-*` headers of the reply in `tracker`.
    pub fn rate_limit(mut self, tracker: &RateLimitTracker) -> Self {
        self.rate_limit = Some(tracker.clone());
        self
    }

    /// Full URL: the explicit one, or the base URL plus the resolved template.
    fn resolve_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        let template = self
            .call
            .as_deref()
            .ok_or_else(|| FlattrError::InvalidRequest("no URL or call path set".to_string()))?;
        let mut path = Vec::new();
        for segment in template.split('/') {
            match segment.strip_prefix(':') {
                Some(name) => {
                    let value = self
                        .params
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v)
                        .ok_or_else(|| {
                            FlattrError::InvalidRequest(format!(
                                "unresolved path parameter ':{}' in '{}'",
                                name, template
                            ))
                        })?;
                    path.push(encode_segment(value));
                }
                None => path.push(segment.to_string()),
            }
        }
        let base = self.connector.base_url.trim_end_matches('/');
        Ok(format!("{}/{}", base, path.join("/").trim_start_matches('/')))
    }

    fn prepare(&self) -> Result<Prepared> {
        let mut url = ApiUrl::parse(&self.resolve_url()?)?;
        url.query.extend(self.query.iter().cloned());

        let mut request = RequestBuilder::new(self.method, url.target());
        request
            .header("User-Agent", self.connector.user_agent.as_str())
            .header("Accept", self.connector.accept)
            .header("Accept-Encoding", "gzip");

        match &self.body {
            Some(Body::Json(data)) => {
                request.header("Content-Type", JSON).body(data.to_json());
            }
            Some(Body::Raw { content_type, data }) => {
                request.header("Content-Type", content_type.as_str()).body(data.clone());
            }
            None if !self.form.is_empty() => {
                request
                    .header("Content-Type", FORM)
                    .body(encode_pairs(&self.form).into_bytes());
            }
            None => {}
        }

        match &self.auth {
            Auth::None => {}
            Auth::Bearer(token) => {
                request.header("Authorization", format!("Bearer {}", token));
            }
            Auth::Basic(credentials) => {
                request.header("Authorization", format!("Basic {}", credentials));
            }
            Auth::OAuth1(signer) => {
                // Form fields are signed; JSON and raw bodies are not.
                let mut signed = url.query.clone();
                if self.body.is_none() {
                    signed.extend(self.form.iter().cloned());
                }
                let header = signer.authorization_header(self.method, &url.base(), &signed)?;
                request.header("Authorization", header);
            }
        }
        Ok(Prepared { url, request })
    }

    /// Send the request and return the reply whatever its status.
    pub async fn execute(self) -> Result<Reply> {
        let Prepared { url, request } = self.prepare()?;
        debug!(method = %self.method, host = %url.host, path = %url.path, "request");

        let mut conn = HttpClient::connect(&url.host, url.port, url.secure, self.connector.timeouts).await?;
        let mut response = BufferedResponse::default();
        conn.send(&request, &mut response).await?;
        conn.close().await;
        debug!(status = response.status, bytes = response.body.len(), "response");

        if let Some(tracker) = &self.rate_limit {
            tracker.update(&response.headers);
        }
        let body = inflate(&response)?;
        Ok(Reply {
            status: response.status,
            status_line: response.status_line,
            headers: response.headers,
            body,
        })
    }

    /// Parsed JSON objects in document order: each element of a root array,
    /// the root object alone, or nothing for an empty body.
    pub async fn result(self) -> Result<Vec<FlattrObject>> {
        let reply = self.execute().await?;
        objects(&reply)
    }

    /// Exactly one JSON object.
    pub async fn single_result(self) -> Result<FlattrObject> {
        let mut objects = self.result().await?;
        match objects.len() {
            1 => Ok(objects.remove(0)),
            n => Err(FlattrError::marshal(format!("expected a single object, got {}", n))),
        }
    }
}

/// Objects of a JSON reply, or its classified error.
pub fn objects(reply: &Reply) -> Result<Vec<FlattrObject>> {
    if !reply.is_success() {
        return Err(json_error(reply));
    }
    if reply.status == 204 || reply.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    parse_values(&reply.body)?
        .into_iter()
        .map(FlattrObject::from_value)
        .collect()
}

fn inflate(response: &BufferedResponse) -> Result<Vec<u8>> {
    let gzip = response
        .header("Content-Encoding")
        .is_some_and(|v| v.to_ascii_lowercase().contains("gzip"));
    if !gzip || response.body.is_empty() {
        return Ok(response.body.clone());
    }
    let mut out = Vec::with_capacity(response.body.len() * 4);
    GzDecoder::new(response.body.as_slice())
        .read_to_end(&mut out)
        .map_err(|e| FlattrError::marshal(format!("bad gzip body: {}", e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> Connector {
        Connector::new("https://api.flattr.com/rest/v2/")
    }

    #[test]
    fn test_new_takes_default_settings() {
        let defaults = FlattrConfig::default();
        let c = connector();
        assert_eq!(c.base_url(), "https://api.flattr.com/rest/v2/");
        assert_eq!(c.user_agent, defaults.user_agent);
        assert_eq!(c.timeouts, defaults.timeouts());
        assert_eq!(c.accept, JSON);
    }

    #[test]
    fn test_template_substitution() {
        let c = connector()
            .create(Method::Get)
            .call("users/:username/things")
            .parameter("username", "a b");
        assert_eq!(
            c.resolve_url().unwrap(),
            "https://api.flattr.com/rest/v2/users/a%20b/things"
        );
    }

    #[test]
    fn test_unresolved_parameter() {
        let c = connector().create(Method::Get).call("things/:id");
        let err = c.resolve_url().unwrap_err();
        assert!(matches!(err, FlattrError::InvalidRequest(_)));
        assert!(err.to_string().contains(":id"));
    }

    #[test]
    fn test_prepare_headers_and_query() {
        let token = AccessToken::new("tok");
        let c = connector()
            .create(Method::Get)
            .call("things/search")
            .query("query", "open source")
            .query("page", 2)
            .token(Some(&token));
        let p = c.prepare().unwrap();
        assert_eq!(p.url.host, "api.flattr.com");
        assert_eq!(p.request.path, "/rest/v2/things/search?query=open%20source&page=2");
        assert_eq!(p.request.get_header("Authorization"), Some("Bearer tok"));
        assert_eq!(p.request.get_header("Accept-Encoding"), Some("gzip"));
        assert_eq!(p.request.get_header("Accept"), Some("application/json"));
        assert!(p.request.body.is_none());
    }

    #[test]
    fn test_prepare_form_and_basic() {
        let key = ConsumerKey::new("id", "secret");
        let c = connector()
            .create(Method::Post)
            .url("https://flattr.com/oauth/token")
            .form("grant_type", "authorization_code")
            .form("code", "a/b")
            .key(&key);
        let p = c.prepare().unwrap();
        assert_eq!(p.request.get_header("Authorization"), Some("Basic aWQ6c2VjcmV0"));
        assert_eq!(p.request.get_header("Content-Type"), Some(FORM));
        assert_eq!(p.request.body.as_deref(), Some(&b"grant_type=authorization_code&code=a%2Fb"[..]));
    }

    #[test]
    fn test_prepare_json_body() {
        let mut data = FlattrObject::new();
        data.put("url", "http://example.com");
        let p = connector().create(Method::Post).call("flattr").data(data).prepare().unwrap();
        assert_eq!(p.request.get_header("Content-Type"), Some(JSON));
        assert_eq!(p.request.body.as_deref(), Some(&br#"{"url":"http://example.com"}"#[..]));
    }

    fn reply(status: u16, body: &str) -> Reply {
        Reply {
            status,
            status_line: format!("HTTP {}", status),
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_objects_document_order() {
        let objs = objects(&reply(200, r#"[{"id":1},{"id":2},{"id":3}]"#)).unwrap();
        let ids: Vec<i64> = objs.iter().filter_map(|o| o.opt_i64("id")).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(objects(&reply(200, r#"{"id":9}"#)).unwrap().len(), 1);
        assert!(objects(&reply(204, "")).unwrap().is_empty());
        assert!(objects(&reply(200, " \r\n")).unwrap().is_empty());
    }

    #[test]
    fn test_objects_rejects_scalars() {
        assert!(matches!(objects(&reply(200, "[1,2]")), Err(FlattrError::Marshal(_))));
    }
}

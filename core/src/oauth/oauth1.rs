/*
 * oauth1.rs
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

//! OAuth 1.0 (RFC 5849) HMAC-SHA1 request signing and the PIN flow used by
//! the legacy API.
//!
//! 1. `request_token` obtains a temporary token (callback `oob` for PIN entry).
//! 2. The user opens `authorize_url` and is shown a verifier.
//! 3. `access_token` trades the temporary token and verifier for a token
//!    with a secret, which then signs every legacy request.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::debug;

use crate::config::FlattrConfig;
use crate::connector::{decode_pairs, encode, Connector, Reply};
use crate::error::{FlattrError, Result};
use crate::oauth::{AccessToken, ConsumerKey, LegacyScope};
use crate::protocol::http::Method;

type HmacSha1 = Hmac<Sha1>;

/// Signs requests for one consumer and, once authorized, one token.
#[derive(Clone)]
pub struct Oauth1Signer {
    consumer: ConsumerKey,
    token: Option<AccessToken>,
    callback: Option<String>,
    verifier: Option<String>,
}

impl fmt::Debug for Oauth1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oauth1Signer")
            .field("consumer", &self.consumer)
            .field("token", &self.token)
            .finish()
    }
}

impl Oauth1Signer {
    pub fn new(consumer: ConsumerKey) -> Self {
        Self {
            consumer,
            token: None,
            callback: None,
            verifier: None,
        }
    }

    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn with_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.verifier = Some(verifier.into());
        self
    }

    /// `Authorization` header value for a request. `params` are the query
    /// and form parameters that go into the signature.
    pub fn authorization_header(
        &self,
        method: Method,
        base_url: &str,
        params: &[(String, String)],
    ) -> Result<String> {
        let mut nonce = [0u8; 16];
        getrandom::getrandom(&mut nonce)
            .map_err(|e| FlattrError::Auth(format!("no randomness for nonce: {}", e)))?;
        let nonce: String = nonce.iter().map(|b| format!("{:02x}", b)).collect();
        let timestamp = Utc::now().timestamp().to_string();
        self.sign(method, base_url, params, &nonce, &timestamp)
    }

    fn oauth_params(&self, nonce: &str, timestamp: &str) -> Vec<(String, String)> {
        let mut p = vec![
            ("oauth_consumer_key".to_string(), self.consumer.key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        if let Some(token) = &self.token {
            p.push(("oauth_token".to_string(), token.token.clone()));
        }
        if let Some(callback) = &self.callback {
            p.push(("oauth_callback".to_string(), callback.clone()));
        }
        if let Some(verifier) = &self.verifier {
            p.push(("oauth_verifier".to_string(), verifier.clone()));
        }
        p
    }

    /// Header value with a fixed nonce and timestamp.
    pub fn sign(
        &self,
        method: Method,
        base_url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth = self.oauth_params(nonce, timestamp);
        let mut all = oauth.clone();
        all.extend(params.iter().cloned());
        let token_secret = self
            .token
            .as_ref()
            .and_then(|t| t.secret.as_deref())
            .unwrap_or_default();
        let signature = signature(method, base_url, &all, &self.consumer.secret, token_secret)?;
        oauth.push(("oauth_signature".to_string(), signature));
        let fields: Vec<String> = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

/// Signature base string: method, base URL and sorted parameters, each encoded.
pub fn base_string(method: Method, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}&{}&{}", method.as_str(), encode(base_url), encode(&normalized))
}

pub fn signature(
    method: Method,
    base_url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let base = base_string(method, base_url, params);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| FlattrError::Auth(format!("bad signing key: {}", e)))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Temporary credentials from step 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
}

/// Drives the legacy PIN authorization.
#[derive(Debug, Clone)]
pub struct LegacyAuthenticator {
    consumer: ConsumerKey,
    connector: Connector,
    oauth_base: String,
}

impl LegacyAuthenticator {
    pub fn new(consumer: ConsumerKey, config: &FlattrConfig) -> Self {
        Self {
            consumer,
            connector: Connector::from_config(config),
            oauth_base: config.legacy_oauth_base.trim_end_matches('/').to_string(),
        }
    }

    /// Step 1. `callback` defaults to `oob` (out of band: the user copies a PIN).
    pub async fn request_token(&self, callback: Option<&str>) -> Result<RequestToken> {
        let signer = Oauth1Signer::new(self.consumer.clone()).with_callback(callback.unwrap_or("oob"));
        let reply = self
            .connector
            .create(Method::Post)
            .url(format!("{}/request_token", self.oauth_base))
            .signer(signer)
            .execute()
            .await?;
        let pairs = form_reply(&reply)?;
        debug!("received request token");
        Ok(RequestToken {
            token: required(&pairs, "oauth_token")?,
            secret: required(&pairs, "oauth_token_secret")?,
        })
    }

    /// Step 2: page where the user grants access.
    pub fn authorize_url(&self, request_token: &RequestToken, scopes: &[LegacyScope]) -> String {
        let mut url = format!(
            "{}/authenticate?oauth_token={}",
            self.oauth_base,
            encode(&request_token.token)
        );
        if !scopes.is_empty() {
            let scope: Vec<&str> = scopes.iter().map(LegacyScope::as_str).collect();
            url.push_str("&access_scope=");
            url.push_str(&encode(&scope.join(",")));
        }
        url
    }

    /// Step 3: exchange the verifier (PIN) for an access token.
    pub async fn access_token(&self, request_token: &RequestToken, verifier: &str) -> Result<AccessToken> {
        let temporary = AccessToken::with_secret(request_token.token.clone(), request_token.secret.clone());
        let signer = Oauth1Signer::new(self.consumer.clone())
            .with_token(temporary)
            .with_verifier(verifier);
        let reply = self
            .connector
            .create(Method::Post)
            .url(format!("{}/access_token", self.oauth_base))
            .signer(signer)
            .execute()
            .await?;
        let pairs = form_reply(&reply)?;
        Ok(AccessToken::with_secret(
            required(&pairs, "oauth_token")?,
            required(&pairs, "oauth_token_secret")?,
        ))
    }
}

fn form_reply(reply: &Reply) -> Result<Vec<(String, String)>> {
    let body = String::from_utf8_lossy(&reply.body);
    if !reply.is_success() {
        return Err(FlattrError::Auth(format!("{}: {}", reply.status_line, body.trim())));
    }
    Ok(decode_pairs(body.trim()))
}

fn required(pairs: &[(String, String)], name: &str) -> Result<String> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| FlattrError::Auth(format!("missing {} in token response", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(p: &[(&str, &str)]) -> Vec<(String, String)> {
        p.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    // Published HMAC-SHA1 example request.
    #[test]
    fn test_known_signature() {
        let consumer = ConsumerKey::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        );
        let token = AccessToken::with_secret(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let signer = Oauth1Signer::new(consumer).with_token(token);
        let header = signer.sign(
            Method::Post,
            "https://api.twitter.com/1.1/statuses/update.json",
            &pairs(&[
                ("include_entities", "true"),
                ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ]),
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            "1318622958",
        ).unwrap();
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.ends_with("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(!header.contains("status="));
    }

    #[test]
    fn test_base_string_sorts_encoded() {
        let base = base_string(
            Method::Get,
            "http://h.example/p",
            &pairs(&[("b", "2"), ("a", "x y"), ("a", "1")]),
        );
        assert_eq!(base, "GET&http%3A%2F%2Fh.example%2Fp&a%3D1%26a%3Dx%2520y%26b%3D2");
    }

    #[test]
    fn test_callback_and_verifier_included() {
        let signer = Oauth1Signer::new(ConsumerKey::new("k", "s"))
            .with_callback("oob")
            .with_verifier("1234");
        let header = signer.sign(Method::Post, "https://h/x", &[], "n", "1").unwrap();
        assert!(header.contains("oauth_callback=\"oob\""));
        assert!(header.contains("oauth_verifier=\"1234\""));
        assert!(!header.contains("oauth_token="));
    }

    #[test]
    fn test_authorize_url() {
        let auth = LegacyAuthenticator::new(ConsumerKey::new("k", "s"), &FlattrConfig::default());
        let rt = RequestToken {
            token: "abc".into(),
            secret: "def".into(),
        };
        assert_eq!(
            auth.authorize_url(&rt, &[LegacyScope::Read, LegacyScope::Click]),
            "https://api.flattr.com/oauth/authenticate?oauth_token=abc&access_scope=read%2Cclick"
        );
    }
}

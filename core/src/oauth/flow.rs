/*
 * flow.rs
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

//! OAuth2 authorization code flow against flattr.com.
//!
//! 1. Send the user to `authorization_url` (response type `code`).
//! 2. Flattr redirects back with `code` and the `state` we sent.
//! 3. `fetch_access_token` POSTs the code to the token endpoint, with the
//!    consumer key as HTTP Basic credentials.
//!
//! `authorize_native` does all three for desktop apps: it listens on an
//! ephemeral `http://localhost:{port}` for the redirect.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::debug;

use crate::config::FlattrConfig;
use crate::connector::{decode_pairs, encode, Connector};
use crate::error::{FlattrError, Result};
use crate::oauth::{AccessToken, ConsumerKey, Scope};
use crate::protocol::http::Method;

#[derive(Debug, Clone)]
pub struct FlattrAuthenticator {
    consumer: ConsumerKey,
    connector: Connector,
    authorize_url: String,
    token_url: String,
    redirect_uri: Option<String>,
    scopes: Vec<Scope>,
}

impl FlattrAuthenticator {
    pub fn new(consumer: ConsumerKey, config: &FlattrConfig) -> Self {
        Self {
            consumer,
            connector: Connector::from_config(config),
            authorize_url: config.oauth_authorize_url.clone(),
            token_url: config.oauth_token_url.clone(),
            redirect_uri: None,
            scopes: Vec::new(),
        }
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn with_scopes(mut self, scopes: &[Scope]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Page the user must visit to grant access. `state` is echoed back in the redirect.
    pub fn authorization_url(&self, state: Option<&str>) -> String {
        let mut url = format!(
            "{}?response_type=code&client_id={}",
            self.authorize_url,
            encode(&self.consumer.key)
        );
        if let Some(redirect) = &self.redirect_uri {
            url.push_str("&redirect_uri=");
            url.push_str(&encode(redirect));
        }
        if !self.scopes.is_empty() {
            url.push_str("&scope=");
            url.push_str(&encode(&Scope::join(&self.scopes)));
        }
        if let Some(state) = state {
            url.push_str("&state=");
            url.push_str(&encode(state));
        }
        url
    }

    /// Exchange an authorization code for an access token.
    pub async fn fetch_access_token(&self, code: &str) -> Result<AccessToken> {
        let mut conn = self
            .connector
            .create(Method::Post)
            .url(self.token_url.as_str())
            .key(&self.consumer)
            .form("grant_type", "authorization_code")
            .form("code", code);
        if let Some(redirect) = &self.redirect_uri {
            conn = conn.form("redirect_uri", redirect);
        }
        let response = conn.single_result().await?;
        let token = response
            .opt_str("access_token")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FlattrError::Auth("no access_token in token response".to_string()))?;
        debug!(token_type = response.opt_str("token_type").unwrap_or("bearer"), "received access token");
        Ok(AccessToken::new(token))
    }

    /// Full native-app flow. `on_auth_url` receives the URL to open in a browser;
    /// this returns once the redirect has arrived and the code is exchanged.
    pub async fn authorize_native(&self, on_auth_url: impl FnOnce(&str) + Send) -> Result<AccessToken> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let flow = self.clone().with_redirect_uri(format!("http://localhost:{}", port));
        let state = generate_state()?;
        on_auth_url(&flow.authorization_url(Some(&state)));

        let (mut socket, _addr) = listener.accept().await?;
        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..n]);
        let params = request_query(&request);
        let param = |name: &str| params.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone());

        if param("state").as_deref() != Some(state.as_str()) {
            let _ = socket.write_all(page(400, "State mismatch. Please try again.").as_bytes()).await;
            return Err(FlattrError::Auth("OAuth2 state mismatch".to_string()));
        }
        if let Some(error) = param("error") {
            let desc = param("error_description").unwrap_or_else(|| error.clone());
            let _ = socket.write_all(page(200, &desc).as_bytes()).await;
            return Err(FlattrError::from_api(&error, &desc, "OAuth2 redirect"));
        }
        let Some(code) = param("code") else {
            let _ = socket.write_all(page(400, "No authorization code.").as_bytes()).await;
            return Err(FlattrError::Auth("no code in OAuth2 redirect".to_string()));
        };
        let _ = socket
            .write_all(page(200, "Authorization successful. You can close this window.").as_bytes())
            .await;
        drop(socket);

        flow.fetch_access_token(&code).await
    }
}

/// 16 random bytes, base64url.
fn generate_state() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| FlattrError::Auth(format!("no randomness for state: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Query pairs of the request line `GET /path?k=v HTTP/1.1`.
fn request_query(request: &str) -> Vec<(String, String)> {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|target| target.split_once('?'))
        .map(|(_, query)| decode_pairs(query))
        .unwrap_or_default()
}

fn page(status: u16, message: &str) -> String {
    let reason = if status == 200 { "OK" } else { "Bad Request" };
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nConnection: close\r\n\r\n<html><body><p>{}</p></body></html>",
        status,
        reason,
        html_escape(message)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

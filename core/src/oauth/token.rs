/*
 * token.rs
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

//! Credentials: application keys, access tokens and scopes.

use std::fmt;

/// An access token. OAuth 1.0 tokens also carry a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub secret: Option<String>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: None,
        }
    }

    pub fn with_secret(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: Some(secret.into()),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// The application's client id and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerKey {
    pub key: String,
    pub secret: String,
}

impl ConsumerKey {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for ConsumerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerKey")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// Permissions requested during OAuth2 authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Flattr things and manage subscriptions.
    Flattr,
    /// Create, update and delete things.
    Thing,
    /// Read the user's email address.
    Email,
    /// Read private profile data.
    ExtendedRead,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Flattr => "flattr",
            Scope::Thing => "thing",
            Scope::Email => "email",
            Scope::ExtendedRead => "extendedread",
        }
    }

    /// Space-separated, as the `scope` parameter expects.
    pub fn join(scopes: &[Scope]) -> String {
        scopes.iter().map(Scope::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// Permissions of the legacy OAuth 1.0 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyScope {
    Read,
    ReadExtended,
    Click,
    Publish,
}

impl LegacyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyScope::Read => "read",
            LegacyScope::ReadExtended => "readextended",
            LegacyScope::Click => "click",
            LegacyScope::Publish => "publish",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secrets() {
        let t = AccessToken::with_secret("abc", "def");
        let k = ConsumerKey::new("client", "hunter2");
        let out = format!("{:?} {:?}", t, k);
        assert!(!out.contains("abc"));
        assert!(!out.contains("def"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("client"));
    }

    #[test]
    fn test_scope_join() {
        assert_eq!(Scope::join(&[Scope::Flattr, Scope::Thing]), "flattr thing");
        assert_eq!(Scope::join(&[]), "");
    }
}

/*
 * config.rs
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

//! Client configuration: endpoints, user agent, timeouts and optional
//! credentials.
//!
//! Defaults point at the production API. Values can be overridden from the
//! environment or kept in an XML file (read and written with quick_xml):
//!
//! ```xml
//! <flattr>
//!   <api-base>https://api.flattr.com/rest/v2/</api-base>
//!   <user-agent>my-app/1.0</user-agent>
//!   <timeout>30</timeout>
//!   <consumer><key>..</key><secret>..</secret></consumer>
//!   <token><value>..</value><secret>..</secret></token>
//! </flattr>
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::{FlattrError, Result};
use crate::oauth::{AccessToken, ConsumerKey};
use crate::protocol::http::Timeouts;

pub const DEFAULT_API_BASE: &str = "https://api.flattr.com/rest/v2/";
pub const DEFAULT_LEGACY_BASE: &str = "https://api.flattr.com/rest/0.5/";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://flattr.com/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://flattr.com/oauth/token";
pub const DEFAULT_LEGACY_OAUTH_BASE: &str = "https://api.flattr.com/oauth/";

pub const ENV_API_BASE: &str = "FLATTR_API_BASE";
pub const ENV_LEGACY_BASE: &str = "FLATTR_LEGACY_BASE";
pub const ENV_USER_AGENT: &str = "FLATTR_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "FLATTR_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattrConfig {
    pub api_base: String,
    pub legacy_base: String,
    pub oauth_authorize_url: String,
    pub oauth_token_url: String,
    pub legacy_oauth_base: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    /// Read timeout per socket read.
    pub timeout_secs: u64,
    pub consumer: Option<ConsumerKey>,
    pub access_token: Option<AccessToken>,
}

impl Default for FlattrConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            legacy_base: DEFAULT_LEGACY_BASE.to_string(),
            oauth_authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            oauth_token_url: DEFAULT_TOKEN_URL.to_string(),
            legacy_oauth_base: DEFAULT_LEGACY_OAUTH_BASE.to_string(),
            user_agent: format!("flattr_core/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 15,
            timeout_secs: 30,
            consumer: None,
            access_token: None,
        }
    }
}

impl FlattrConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            read: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Defaults overridden by `FLATTR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env(|name| std::env::var(name).ok())
    }

    /// Override fields from a variable lookup.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_API_BASE) {
            self.api_base = v;
        }
        if let Some(v) = get(ENV_LEGACY_BASE) {
            self.legacy_base = v;
        }
        if let Some(v) = get(ENV_USER_AGENT) {
            self.user_agent = v;
        }
        if let Some(v) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_secs(ENV_TIMEOUT_SECS, &v)?;
        }
        Ok(self)
    }

    /// Read an XML configuration file. Elements left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FlattrError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_xml(&content)
    }

    pub fn from_xml(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut config = FlattrConfig::default();
        let mut path: Vec<String> = Vec::new();
        let mut consumer = (String::new(), String::new());
        let mut token = (String::new(), None::<String>);

        loop {
            match reader.read_event_into(&mut buf) {
                Err(e) => return Err(FlattrError::Config(format!("XML parse error: {}", e))),
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    path.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| FlattrError::Config(e.to_string()))?
                        .trim()
                        .to_string();
                    let names: Vec<&str> = path.iter().map(String::as_str).collect();
                    match names.as_slice() {
                        [_, "api-base"] => config.api_base = text,
                        [_, "legacy-base"] => config.legacy_base = text,
                        [_, "authorize-url"] => config.oauth_authorize_url = text,
                        [_, "token-url"] => config.oauth_token_url = text,
                        [_, "legacy-oauth-base"] => config.legacy_oauth_base = text,
                        [_, "user-agent"] => config.user_agent = text,
                        [_, "timeout"] => config.timeout_secs = parse_secs("timeout", &text)?,
                        [_, "connect-timeout"] => {
                            config.connect_timeout_secs = parse_secs("connect-timeout", &text)?
                        }
                        [_, "consumer", "key"] => consumer.0 = text,
                        [_, "consumer", "secret"] => consumer.1 = text,
                        [_, "token", "value"] => token.0 = text,
                        [_, "token", "secret"] => token.1 = Some(text),
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => {
                    path.pop();
                }
                _ => {}
            }
            buf.clear();
        }
        if !consumer.0.is_empty() {
            config.consumer = Some(ConsumerKey::new(consumer.0, consumer.1));
        }
        if !token.0.is_empty() {
            config.access_token = Some(AccessToken {
                token: token.0,
                secret: token.1,
            });
        }
        Ok(config)
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut writer = Writer::new_with_indent(&mut out, b' ', 2);
        let w = &mut writer;
        write(w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(w, Event::Start(BytesStart::new("flattr")))?;
        text_element(w, "api-base", &self.api_base)?;
        text_element(w, "legacy-base", &self.legacy_base)?;
        text_element(w, "authorize-url", &self.oauth_authorize_url)?;
        text_element(w, "token-url", &self.oauth_token_url)?;
        text_element(w, "legacy-oauth-base", &self.legacy_oauth_base)?;
        text_element(w, "user-agent", &self.user_agent)?;
        text_element(w, "timeout", &self.timeout_secs.to_string())?;
        text_element(w, "connect-timeout", &self.connect_timeout_secs.to_string())?;
        if let Some(consumer) = &self.consumer {
            write(w, Event::Start(BytesStart::new("consumer")))?;
            text_element(w, "key", &consumer.key)?;
            text_element(w, "secret", &consumer.secret)?;
            write(w, Event::End(BytesEnd::new("consumer")))?;
        }
        if let Some(token) = &self.access_token {
            write(w, Event::Start(BytesStart::new("token")))?;
            text_element(w, "value", &token.token)?;
            if let Some(secret) = &token.secret {
                text_element(w, "secret", secret)?;
            }
            write(w, Event::End(BytesEnd::new("token")))?;
        }
        write(w, Event::End(BytesEnd::new("flattr")))?;
        Ok(out)
    }

    /// Write the file, readable by the owner only since it may hold secrets.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_xml()?)?;
        #[cfg(unix)]
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        Ok(())
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| FlattrError::Config(format!("{} is not a number of seconds: '{}'", name, value)))
}

fn write(w: &mut Writer<&mut Vec<u8>>, event: Event<'_>) -> Result<()> {
    w.write_event(event).map_err(|e| FlattrError::Config(e.to_string()))
}

fn text_element(w: &mut Writer<&mut Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write(w, Event::Start(BytesStart::new(name)))?;
    write(w, Event::Text(BytesText::new(text)))?;
    write(w, Event::End(BytesEnd::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = FlattrConfig::default();
        assert_eq!(c.api_base, "https://api.flattr.com/rest/v2/");
        assert_eq!(c.legacy_base, "https://api.flattr.com/rest/0.5/");
        assert_eq!(c.timeouts().read, Duration::from_secs(30));
        assert!(c.user_agent.starts_with("flattr_core/"));
    }

    #[test]
    fn test_env_overrides() {
        let c = FlattrConfig::default()
            .apply_env(|name| match name {
                ENV_API_BASE => Some("http://127.0.0.1:9000/".to_string()),
                ENV_TIMEOUT_SECS => Some("5".to_string()),
                ENV_USER_AGENT => Some("  ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(c.api_base, "http://127.0.0.1:9000/");
        assert_eq!(c.timeout_secs, 5);
        assert!(c.user_agent.starts_with("flattr_core/"));

        let err = FlattrConfig::default()
            .apply_env(|name| (name == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, FlattrError::Config(_)));
    }

    #[test]
    fn test_xml_partial() {
        let xml = "<flattr><user-agent>app/2 &amp; more</user-agent><consumer><key>k</key><secret>s</secret></consumer></flattr>";
        let c = FlattrConfig::from_xml(xml).unwrap();
        assert_eq!(c.user_agent, "app/2 & more");
        assert_eq!(c.api_base, DEFAULT_API_BASE);
        assert_eq!(c.consumer, Some(ConsumerKey::new("k", "s")));
        assert_eq!(c.access_token, None);
    }

    #[test]
    fn test_xml_round_trip() {
        let mut c = FlattrConfig::default();
        c.timeout_secs = 7;
        c.consumer = Some(ConsumerKey::new("key", "sec<ret"));
        c.access_token = Some(AccessToken::with_secret("tok", "tsec"));
        let xml = c.to_xml().unwrap();
        let back = FlattrConfig::from_xml(std::str::from_utf8(&xml).unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("flattr_core_cfg_{}", std::process::id()));
        let path = dir.join("flattr.xml");
        let mut c = FlattrConfig::default();
        c.api_base = "http://localhost:1/".to_string();
        c.save(&path).unwrap();
        assert_eq!(FlattrConfig::load(&path).unwrap(), c);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_xml() {
        assert!(matches!(FlattrConfig::from_xml("<flattr><timeout>x</timeout></flattr>"), Err(FlattrError::Config(_))));
        assert!(FlattrConfig::from_xml("<flattr><a></b></flattr>").is_err());
    }
}

/*
 * factory.rs
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

//! Process-wide factory: one configuration, shared by every connector,
//! service and authenticator it builds.

use std::sync::OnceLock;

use tracing::debug;

use crate::blocking::{BlockingFlattrService, BlockingOpenService};
use crate::config::FlattrConfig;
use crate::connector::Connector;
use crate::error::{FlattrError, Result};
use crate::legacy::LegacyService;
use crate::oauth::{AccessToken, ConsumerKey, FlattrAuthenticator, LegacyAuthenticator};
use crate::service::{FlattrService, OpenService};

static INSTANCE: OnceLock<FlattrFactory> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct FlattrFactory {
    config: FlattrConfig,
}

impl FlattrFactory {
    pub fn new(config: FlattrConfig) -> Self {
        Self { config }
    }

    /// The shared factory. The first call reads `FLATTR_*` from the
    /// environment; a bad value there falls back to the defaults.
    pub fn instance() -> &'static FlattrFactory {
        INSTANCE.get_or_init(|| {
            let config = FlattrConfig::from_env().unwrap_or_else(|e| {
                debug!("ignoring environment: {}", e);
                FlattrConfig::default()
            });
            FlattrFactory::new(config)
        })
    }

    /// Install `config` as the shared factory. Fails once `instance()` has
    /// been initialised.
    pub fn init(config: FlattrConfig) -> Result<&'static FlattrFactory> {
        INSTANCE
            .set(FlattrFactory::new(config))
            .map_err(|_| FlattrError::Config("factory already initialised".to_string()))?;
        Ok(Self::instance())
    }

    pub fn config(&self) -> &FlattrConfig {
        &self.config
    }

    pub fn connector(&self) -> Connector {
        Connector::from_config(&self.config)
    }

    pub fn open_service(&self) -> OpenService {
        OpenService::new(self.connector())
    }

    pub fn flattr_service(&self, token: AccessToken) -> FlattrService {
        FlattrService::new(self.connector(), token)
    }

    /// Authenticated service with the token from the configuration.
    pub fn default_flattr_service(&self) -> Result<FlattrService> {
        let token = self
            .config
            .access_token
            .clone()
            .ok_or_else(|| FlattrError::Config("no access token configured".to_string()))?;
        Ok(self.flattr_service(token))
    }

    pub fn blocking_open_service(&self) -> Result<BlockingOpenService> {
        BlockingOpenService::new(self.connector())
    }

    pub fn blocking_flattr_service(&self, token: AccessToken) -> Result<BlockingFlattrService> {
        BlockingFlattrService::new(self.connector(), token)
    }

    /// `token` must carry its secret.
    pub fn legacy_service(&self, token: AccessToken) -> Result<LegacyService> {
        LegacyService::new(&self.config, self.consumer()?, token)
    }

    pub fn authenticator(&self) -> Result<FlattrAuthenticator> {
        Ok(FlattrAuthenticator::new(self.consumer()?, &self.config))
    }

    pub fn legacy_authenticator(&self) -> Result<LegacyAuthenticator> {
        Ok(LegacyAuthenticator::new(self.consumer()?, &self.config))
    }

    fn consumer(&self) -> Result<ConsumerKey> {
        self.config
            .consumer
            .clone()
            .ok_or_else(|| FlattrError::Config("no consumer key configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_is_shared() {
        let a = FlattrFactory::instance() as *const FlattrFactory;
        let b = FlattrFactory::instance() as *const FlattrFactory;
        assert_eq!(a, b);
        assert!(FlattrFactory::init(FlattrConfig::default()).is_err());
    }

    #[test]
    fn test_connector_uses_config() {
        let config = FlattrConfig {
            api_base: "http://localhost:8080/rest/v2/".to_string(),
            ..FlattrConfig::default()
        };
        let factory = FlattrFactory::new(config);
        assert_eq!(factory.connector().base_url(), "http://localhost:8080/rest/v2/");
    }

    #[test]
    fn test_missing_credentials() {
        let factory = FlattrFactory::new(FlattrConfig::default());
        assert!(matches!(factory.authenticator(), Err(FlattrError::Config(_))));
        assert!(matches!(factory.default_flattr_service(), Err(FlattrError::Config(_))));
        let token = AccessToken::with_secret("t", "s");
        assert!(matches!(factory.legacy_service(token), Err(FlattrError::Config(_))));
    }

    #[test]
    fn test_services_with_credentials() {
        let config = FlattrConfig {
            consumer: Some(ConsumerKey::new("key", "secret")),
            access_token: Some(AccessToken::new("token")),
            ..FlattrConfig::default()
        };
        let factory = FlattrFactory::new(config);
        assert!(factory.authenticator().is_ok());
        assert!(factory.legacy_authenticator().is_ok());
        assert!(factory.default_flattr_service().is_ok());
        let err = factory.legacy_service(AccessToken::new("no-secret")).unwrap_err();
        assert!(matches!(err, FlattrError::Auth(_)));
    }
}

/*
 * lib.rs
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

//! Client library for the Flattr REST API.
//!
//! `connector` builds and executes requests against the v2 JSON API,
//! `service` wraps it in typed operations, and `legacy` talks to the older
//! XML API through the streaming parsers in `xml`. `oauth` obtains tokens
//! for both. `task` and `blocking` run requests in the background or on the
//! calling thread; `factory` ties everything to one shared configuration.

pub mod blocking;
pub mod config;
pub mod connector;
pub mod error;
pub mod factory;
pub mod json;
pub mod legacy;
pub mod model;
pub mod net;
pub mod oauth;
pub mod protocol;
pub mod request;
pub mod service;
pub mod task;
pub mod xml;

pub use blocking::{BlockingFlattrService, BlockingOpenService};
pub use config::FlattrConfig;
pub use connector::{Connection, Connector, RateLimit, RateLimitTracker};
pub use error::{ErrorKind, FlattrError, Result};
pub use factory::FlattrFactory;
pub use legacy::LegacyService;
pub use oauth::{AccessToken, ConsumerKey, FlattrAuthenticator, LegacyAuthenticator, Scope};
pub use request::FlattrRequest;
pub use service::{FlattrService, OpenService};
pub use task::{spawn, TaskHandle, TaskRunner};

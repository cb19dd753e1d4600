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

//! Authentication: OAuth2 for the JSON API, OAuth 1.0 for the legacy API.

mod flow;
mod oauth1;
mod token;

pub use flow::FlattrAuthenticator;
pub use oauth1::{base_string, signature, LegacyAuthenticator, Oauth1Signer, RequestToken};
pub use token::{AccessToken, ConsumerKey, LegacyScope, Scope};

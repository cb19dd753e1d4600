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

//! Minimal async HTTP/1.1 client with push-parsed responses.
//!
//! - Callback response API: `ResponseHandler` with `ok`/`error`, `header`,
//!   `start_body`, `body_chunk`, `end_body`, `complete`, `failed`.
//! - Buffers: `bytes` crate (`BytesMut` for the parse buffer).
//! - One request per connection (`Connection: close`).

mod handler;
mod request;
mod response;

pub mod client;
pub mod connection;
pub mod parser;

pub use client::{HttpClient, Timeouts};
pub use connection::{HttpConnection, HttpStream};
pub use handler::{BufferedResponse, ResponseHandler};
pub use parser::H1ResponseHandler;
pub use request::{Method, RequestBuilder};
pub use response::Response;

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

//! Push JSON parsing and writing.
//!
//! Response bodies are fed through `JsonParser` into a `JsonContentHandler`;
//! the connector uses `TreeBuilder` to turn them into `FlattrObject`s.
//! Request bodies are produced with `JsonWriter`.

mod error;
mod handler;
mod number;
mod parser;
mod tree;
mod writer;

pub use error::JsonError;
pub use handler::JsonContentHandler;
pub use number::JsonNumber;
pub use parser::JsonParser;
pub use tree::TreeBuilder;
pub use writer::JsonWriter;

use bytes::BytesMut;
use serde_json::Value;

/// Parse a complete document held in memory. Returns the root value, or each
/// element of a root array.
pub fn parse_values(data: &[u8]) -> Result<Vec<Value>, JsonError> {
    let mut parser = JsonParser::new();
    let mut builder = TreeBuilder::new();
    let mut buf = BytesMut::from(data);
    parser.close(&mut buf, &mut builder)?;
    Ok(builder.into_values())
}

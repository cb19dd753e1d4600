/*
 * handler.rs
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

//! Event callbacks for the push JSON parser.

use crate::json::number::JsonNumber;

/// Receives parse events in document order. String data is only valid for the
/// duration of the call.
pub trait JsonContentHandler {
    fn start_object(&mut self);
    fn end_object(&mut self);
    fn start_array(&mut self);
    fn end_array(&mut self);
    /// Property name; the next event is its value.
    fn key(&mut self, key: &str);
    fn string_value(&mut self, value: &str);
    fn number_value(&mut self, number: JsonNumber);
    fn boolean_value(&mut self, value: bool);
    fn null_value(&mut self);
}

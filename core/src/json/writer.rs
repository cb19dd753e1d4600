/*
 * writer.rs
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

//! Streaming JSON writer for request bodies.

use bytes::{BufMut, BytesMut};
use serde_json::Value;

use crate::json::number::JsonNumber;

/// Appends compact JSON to a `BytesMut`. Callers are trusted to emit a
/// well-formed sequence (key before each object member).
pub struct JsonWriter {
    buf: BytesMut,
    /// Per open container: whether a member has been written yet.
    has_member: Vec<bool>,
    after_key: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(512),
            has_member: Vec::new(),
            after_key: false,
        }
    }

    /// Take the written bytes, leaving the writer empty.
    pub fn take_buffer(&mut self) -> BytesMut {
        self.has_member.clear();
        self.after_key = false;
        std::mem::take(&mut self.buf)
    }

    fn separator(&mut self) {
        if self.after_key {
            self.after_key = false;
            return;
        }
        if let Some(has) = self.has_member.last_mut() {
            if *has {
                self.buf.put_u8(b',');
            }
            *has = true;
        }
    }

    pub fn write_start_object(&mut self) {
        self.separator();
        self.buf.put_u8(b'{');
        self.has_member.push(false);
    }

    pub fn write_end_object(&mut self) {
        self.has_member.pop();
        self.buf.put_u8(b'}');
    }

    pub fn write_start_array(&mut self) {
        self.separator();
        self.buf.put_u8(b'[');
        self.has_member.push(false);
    }

    pub fn write_end_array(&mut self) {
        self.has_member.pop();
        self.buf.put_u8(b']');
    }

    pub fn write_key(&mut self, key: &str) {
        self.separator();
        escape_into(&mut self.buf, key);
        self.buf.put_u8(b':');
        self.after_key = true;
    }

    pub fn write_string(&mut self, value: &str) {
        self.separator();
        escape_into(&mut self.buf, value);
    }

    pub fn write_number(&mut self, number: JsonNumber) {
        self.separator();
        let text = match number {
            JsonNumber::I64(n) => n.to_string(),
            JsonNumber::F64(f) if f.is_finite() => f.to_string(),
            JsonNumber::F64(_) => "null".to_string(),
        };
        self.buf.put_slice(text.as_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.separator();
        self.buf.put_slice(if value { b"true" } else { b"false" });
    }

    pub fn write_null(&mut self) {
        self.separator();
        self.buf.put_slice(b"null");
    }

    /// Write a whole value tree.
    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => self.write_number(JsonNumber::I64(i)),
                None => self.write_number(JsonNumber::F64(n.as_f64().unwrap_or(0.0))),
            },
            Value::String(s) => self.write_string(s),
            Value::Array(items) => {
                self.write_start_array();
                for item in items {
                    self.write_value(item);
                }
                self.write_end_array();
            }
            Value::Object(map) => {
                self.write_start_object();
                for (k, v) in map {
                    self.write_key(k);
                    self.write_value(v);
                }
                self.write_end_object();
            }
        }
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(buf: &mut BytesMut, s: &str) {
    buf.put_u8(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.put_slice(b"\\\""),
            '\\' => buf.put_slice(b"\\\\"),
            '\n' => buf.put_slice(b"\\n"),
            '\r' => buf.put_slice(b"\\r"),
            '\t' => buf.put_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                buf.put_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut tmp = [0u8; 4];
                buf.put_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
    buf.put_u8(b'"');
}

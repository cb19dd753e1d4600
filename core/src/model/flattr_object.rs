/*
 * flattr_object.rs
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

//! `FlattrObject`: one JSON object from an API response, with typed getters.
//!
//! Every model type is built from one of these, and request bodies are
//! assembled in one before being written out.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{FlattrError, Result};
use crate::json::JsonWriter;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattrObject {
    data: Map<String, Value>,
}

impl FlattrObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(FlattrError::marshal(format!(
                "expected JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Present and not null.
    pub fn has(&self, key: &str) -> bool {
        self.data.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.opt_str(key).ok_or_else(|| missing(key))
    }

    pub fn opt_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Strings and numbers both read as text (ids come as either).
    pub fn opt_text(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Result<String> {
        self.opt_text(key).ok_or_else(|| missing(key))
    }

    pub fn opt_i64(&self, key: &str) -> Option<i64> {
        match self.data.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_i64(&self, key: &str) -> Result<i64> {
        self.opt_i64(key).ok_or_else(|| missing(key))
    }

    /// Missing means false. `1`/`0` are accepted as well as booleans.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.data.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
            Some(Value::String(s)) => s == "true" || s == "1",
            _ => false,
        }
    }

    /// Unix timestamp in seconds.
    pub fn opt_time(&self, key: &str) -> Option<DateTime<Utc>> {
        self.opt_i64(key)
            .filter(|&secs| secs > 0)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    pub fn opt_object(&self, key: &str) -> Option<FlattrObject> {
        match self.data.get(key)? {
            Value::Object(map) => Some(FlattrObject { data: map.clone() }),
            _ => None,
        }
    }

    pub fn get_object(&self, key: &str) -> Result<FlattrObject> {
        self.opt_object(key).ok_or_else(|| missing(key))
    }

    /// Objects of an array property; non-object elements are skipped.
    pub fn get_objects(&self, key: &str) -> Vec<FlattrObject> {
        match self.data.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_object())
                .map(|m| FlattrObject { data: m.clone() })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_strings(&self, key: &str) -> Vec<String> {
        match self.data.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Username of a user reference: either an embedded user object or a bare string.
    pub fn opt_username(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::Object(map) => map.get("username").and_then(Value::as_str).map(str::to_string),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Put only when `Some`.
    pub fn put_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.put(key, v);
        }
    }

    pub fn put_time(&mut self, key: &str, value: Option<DateTime<Utc>>) {
        self.put_opt(key, value.map(|t| t.timestamp()));
    }

    pub fn put_strings(&mut self, key: &str, values: &[String]) {
        self.put(key, Value::Array(values.iter().cloned().map(Value::String).collect()));
    }

    pub fn put_object(&mut self, key: &str, value: FlattrObject) {
        self.put(key, value.into_value());
    }

    /// Compact JSON encoding.
    pub fn to_json(&self) -> Vec<u8> {
        let mut w = JsonWriter::new();
        w.write_start_object();
        for (k, v) in &self.data {
            w.write_key(k);
            w.write_value(v);
        }
        w.write_end_object();
        w.take_buffer().to_vec()
    }
}

fn missing(key: &str) -> FlattrError {
    FlattrError::marshal(format!("missing or mistyped property '{}'", key))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

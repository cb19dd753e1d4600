/*
 * tree.rs
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

//! Builds `serde_json::Value` trees from parse events.
//!
//! A root array is treated as a stream: each element is handed out as soon as
//! its closing bracket arrives, so long result lists are available in
//! document order without holding the whole array as one value.

use serde_json::{Map, Value};

use crate::json::handler::JsonContentHandler;
use crate::json::number::JsonNumber;

enum Open {
    Object(Map<String, Value>, Option<String>),
    Array(Vec<Value>),
}

/// Collects the root value, or each element of a root array.
#[derive(Default)]
pub struct TreeBuilder {
    stack: Vec<Open>,
    root_is_array: bool,
    pending_key: Option<String>,
    values: Vec<Value>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the document root was an array.
    pub fn root_is_array(&self) -> bool {
        self.root_is_array
    }

    /// Completed values: the root, or the root array's elements in order.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn push_value(&mut self, value: Value) {
        let root_level = self.stack.len() == 1 && self.root_is_array;
        match self.stack.last_mut() {
            Some(Open::Object(map, key)) => {
                if let Some(k) = key.take() {
                    map.insert(k, value);
                }
            }
            Some(Open::Array(items)) => {
                if root_level {
                    self.values.push(value);
                } else {
                    items.push(value);
                }
            }
            None => self.values.push(value),
        }
    }

    fn open(&mut self, container: Open) {
        if self.stack.is_empty() && matches!(container, Open::Array(_)) {
            self.root_is_array = true;
        }
        if let (Some(Open::Object(_, key)), Some(k)) = (self.stack.last_mut(), self.pending_key.take()) {
            *key = Some(k);
        }
        self.stack.push(container);
    }

    fn close(&mut self) {
        let value = match self.stack.pop() {
            Some(Open::Object(map, _)) => Value::Object(map),
            Some(Open::Array(items)) => Value::Array(items),
            None => return,
        };
        if self.stack.is_empty() && self.root_is_array {
            // root array closed; its elements were already emitted
            return;
        }
        self.push_value(value);
    }

    fn scalar(&mut self, value: Value) {
        if let (Some(Open::Object(_, key)), Some(k)) = (self.stack.last_mut(), self.pending_key.take()) {
            *key = Some(k);
        }
        self.push_value(value);
    }
}

impl JsonContentHandler for TreeBuilder {
    fn start_object(&mut self) {
        self.open(Open::Object(Map::new(), None));
    }

    fn end_object(&mut self) {
        self.close();
    }

    fn start_array(&mut self) {
        self.open(Open::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        self.close();
    }

    fn key(&mut self, key: &str) {
        self.pending_key = Some(key.to_string());
    }

    fn string_value(&mut self, value: &str) {
        self.scalar(Value::String(value.to_string()));
    }

    fn number_value(&mut self, number: JsonNumber) {
        self.scalar(number.into());
    }

    fn boolean_value(&mut self, value: bool) {
        self.scalar(Value::Bool(value));
    }

    fn null_value(&mut self) {
        self.scalar(Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonParser;
    use bytes::BytesMut;
    use serde_json::json;

    fn build(doc: &str) -> (bool, Vec<Value>) {
        let mut parser = JsonParser::new();
        let mut builder = TreeBuilder::new();
        let mut buf = BytesMut::from(doc.as_bytes());
        parser.close(&mut buf, &mut builder).unwrap();
        (builder.root_is_array(), builder.into_values())
    }

    #[test]
    fn test_root_object() {
        let (is_array, values) = build(r#"{"id":1,"owner":{"username":"bob"},"tags":["a"]}"#);
        assert!(!is_array);
        assert_eq!(values, vec![json!({"id": 1, "owner": {"username": "bob"}, "tags": ["a"]})]);
    }

    #[test]
    fn test_root_array_elements_in_order() {
        let (is_array, values) = build(r#"[{"id":"text"},{"id":"images","sub":[1,[2]]},3]"#);
        assert!(is_array);
        assert_eq!(
            values,
            vec![json!({"id": "text"}), json!({"id": "images", "sub": [1, [2]]}), json!(3)]
        );
    }

    #[test]
    fn test_empty_root_array() {
        let (is_array, values) = build("[]");
        assert!(is_array);
        assert!(values.is_empty());
    }
}

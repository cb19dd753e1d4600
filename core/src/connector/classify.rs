/*
 * classify.rs
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

//! Turning unsuccessful replies into `FlattrError`s.

use tracing::warn;

use crate::connector::Reply;
use crate::error::FlattrError;
use crate::json::parse_values;
use crate::model::FlattrObject;

/// Map a non-2xx JSON reply to an error. The body's `error` code picks the
/// kind; without a readable body only the status line is kept.
pub fn json_error(reply: &Reply) -> FlattrError {
    let body = parse_values(&reply.body)
        .ok()
        .and_then(|mut values| if values.len() == 1 { values.pop() } else { None })
        .and_then(|value| FlattrObject::from_value(value).ok());
    let error = match body.as_ref().and_then(|b| b.opt_str("error").map(|code| (b, code))) {
        Some((body, code)) => {
            let description = body
                .opt_str("error_description")
                .or_else(|| body.opt_str("description"))
                .unwrap_or_default();
            FlattrError::from_api(code, description, &reply.status_line)
        }
        None => FlattrError::Http {
            status: reply.status,
            status_line: reply.status_line.clone(),
        },
    };
    warn!(status = reply.status, error = %error, "API call failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn reply(status: u16, status_line: &str, body: &str) -> Reply {
        Reply {
            status,
            status_line: status_line.to_string(),
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_known_code() {
        let err = json_error(&reply(
            403,
            "HTTP 403 Forbidden",
            r#"{"error":"flattr_once","error_description":"You have already flattred this thing"}"#,
        ));
        assert_eq!(err.kind(), Some(ErrorKind::Forbidden));
        assert_eq!(err.code(), Some("flattr_once"));
    }

    #[test]
    fn test_unknown_code_is_service() {
        let err = json_error(&reply(500, "HTTP 500 Internal Server Error", r#"{"error":"oops"}"#));
        match err {
            FlattrError::Service { code, status_line, .. } => {
                assert_eq!(code, "oops");
                assert_eq!(status_line, "HTTP 500 Internal Server Error");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_body_keeps_status_line() {
        for body in ["", "<html>bad gateway</html>", r#"{"message":"no code"}"#] {
            match json_error(&reply(502, "HTTP 502 Bad Gateway", body)) {
                FlattrError::Http { status, status_line } => {
                    assert_eq!(status, 502);
                    assert_eq!(status_line, "HTTP 502 Bad Gateway");
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}

/*
 * error.rs
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

//! Errors raised by the connector, the parsers and the services.
//!
//! The remote API reports failures as an HTTP status plus a JSON (or, for the
//! legacy API, XML) body carrying an `error` code and a description. The code
//! selects one of a closed set of kinds; anything unrecognised is a generic
//! service error, and a body we cannot read at all leaves only the status line.

use thiserror::Error;

use crate::json::JsonError;

/// Closed taxonomy of remote API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Not allowed: already flattred, own thing, missing scope, bad token.
    Forbidden,
    /// The account has no means left to flattr.
    NoMoney,
    NotFound,
    RateLimitExceeded,
    /// The request parameters were rejected.
    Validation,
    /// Any other reported error.
    Service,
}

impl ErrorKind {
    /// Map an API `error` code to its kind. Unknown codes are `Service`.
    pub fn from_code(code: &str) -> ErrorKind {
        match code {
            "forbidden" | "flattr_once" | "flattr_owner" | "thing_owner" | "insufficient_scope"
            | "unauthorized" | "subscribed" | "invalid_token" => ErrorKind::Forbidden,
            "no_money" | "no_means" => ErrorKind::NoMoney,
            "not_found" => ErrorKind::NotFound,
            "rate_limit_exceeded" => ErrorKind::RateLimitExceeded,
            "validation" | "invalid_parameters" | "invalid_request" => ErrorKind::Validation,
            _ => ErrorKind::Service,
        }
    }
}

/// Error from any Flattr operation.
#[derive(Debug, Error)]
pub enum FlattrError {
    #[error("forbidden ({code}): {description}")]
    Forbidden { code: String, description: String },

    #[error("no money ({code}): {description}")]
    NoMoney { code: String, description: String },

    #[error("not found ({code}): {description}")]
    NotFound { code: String, description: String },

    #[error("rate limit exceeded ({code}): {description}")]
    RateLimitExceeded { code: String, description: String },

    /// Rejected by the server, or by local checks before sending. `field`
    /// names the offending property when known.
    #[error("validation failed ({code}){}: {description}", field_suffix(.field))]
    Validation {
        code: String,
        description: String,
        field: Option<String>,
    },

    /// An error code we do not map, with the raw status line.
    #[error("{status_line}: {code}: {description}")]
    Service {
        code: String,
        description: String,
        status_line: String,
    },

    /// Non-success status without a readable error body.
    #[error("{status_line}")]
    Http { status: u16, status_line: String },

    /// The response could not be turned into the expected model.
    #[error("malformed response: {0}")]
    Marshal(String),

    /// The request could not be built (bad URL, unresolved path parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// OAuth handshake failure outside the API error format.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Unreadable configuration file or environment value.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(f) => format!(" on {}", f),
        None => String::new(),
    }
}

impl FlattrError {
    /// Build the error for an API code, description and status line.
    pub fn from_api(code: &str, description: &str, status_line: &str) -> FlattrError {
        let code_s = code.to_string();
        let description = description.to_string();
        match ErrorKind::from_code(code) {
            ErrorKind::Forbidden => FlattrError::Forbidden { code: code_s, description },
            ErrorKind::NoMoney => FlattrError::NoMoney { code: code_s, description },
            ErrorKind::NotFound => FlattrError::NotFound { code: code_s, description },
            ErrorKind::RateLimitExceeded => {
                FlattrError::RateLimitExceeded { code: code_s, description }
            }
            ErrorKind::Validation => FlattrError::Validation {
                code: code_s,
                description,
                field: None,
            },
            ErrorKind::Service => FlattrError::Service {
                code: code_s,
                description,
                status_line: status_line.to_string(),
            },
        }
    }

    /// Local validation failure on one field.
    pub fn validation(field: &str, description: impl Into<String>) -> FlattrError {
        FlattrError::Validation {
            code: "validation".to_string(),
            description: description.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn marshal(msg: impl Into<String>) -> FlattrError {
        FlattrError::Marshal(msg.into())
    }

    /// Kind of a remote API failure; `None` for transport and local errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FlattrError::Forbidden { .. } => Some(ErrorKind::Forbidden),
            FlattrError::NoMoney { .. } => Some(ErrorKind::NoMoney),
            FlattrError::NotFound { .. } => Some(ErrorKind::NotFound),
            FlattrError::RateLimitExceeded { .. } => Some(ErrorKind::RateLimitExceeded),
            FlattrError::Validation { .. } => Some(ErrorKind::Validation),
            FlattrError::Service { .. } => Some(ErrorKind::Service),
            _ => None,
        }
    }

    /// The API error code, when the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            FlattrError::Forbidden { code, .. }
            | FlattrError::NoMoney { code, .. }
            | FlattrError::NotFound { code, .. }
            | FlattrError::RateLimitExceeded { code, .. }
            | FlattrError::Validation { code, .. }
            | FlattrError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<JsonError> for FlattrError {
    fn from(e: JsonError) -> Self {
        FlattrError::Marshal(format!("invalid JSON: {}", e))
    }
}

impl From<quick_xml::Error> for FlattrError {
    fn from(e: quick_xml::Error) -> Self {
        FlattrError::Marshal(format!("invalid XML: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, FlattrError>;

/*
 * legacy.rs
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

//! Shapes only the legacy XML API returns.

use chrono::{DateTime, Utc};

use crate::model::{ThingId, UserId};

/// How many times one user clicked a thing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickCount {
    pub user: UserId,
    pub count: u32,
}

/// A thing the caller clicked during a period.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClickedThing {
    pub thing: ThingId,
    pub url: String,
    pub title: String,
    pub owner: Option<UserId>,
    pub clicked: Option<DateTime<Utc>>,
}

/// Response of `thing/register`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisteredThing {
    pub id: ThingId,
    pub int_id: Option<i64>,
    pub url: String,
    pub title: String,
    pub story: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub clicks: u64,
}

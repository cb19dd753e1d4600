/*
 * subscription.rs
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

//! A recurring monthly flattr of one thing.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{FlattrObject, Thing};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subscription {
    pub thing: Thing,
    pub created: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    /// False while paused.
    pub active: bool,
    /// Legacy: total months subscribed.
    pub months: Option<u32>,
    /// Legacy: months left before expiry.
    pub months_left: Option<u32>,
}

impl Subscription {
    pub fn from_object(obj: &FlattrObject) -> Result<Subscription> {
        Ok(Subscription {
            thing: Thing::from_object(&obj.get_object("thing")?)?,
            created: obj.opt_time("created_at"),
            started: obj.opt_time("started_at"),
            active: obj.get_bool("active"),
            months: None,
            months_left: None,
        })
    }
}

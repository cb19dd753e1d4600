/*
 * flattr.rs
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

//! A single flattr: one user's donation to one thing.

use chrono::{DateTime, Utc};

use crate::error::{FlattrError, Result};
use crate::model::{FlattrObject, Thing, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Flattr {
    pub thing: Thing,
    pub owner: UserId,
    pub created: Option<DateTime<Utc>>,
}

impl Flattr {
    pub fn from_object(obj: &FlattrObject) -> Result<Flattr> {
        let owner = obj
            .opt_username("owner")
            .ok_or_else(|| FlattrError::marshal("flattr without owner"))?;
        Ok(Flattr {
            thing: Thing::from_object(&obj.get_object("thing")?)?,
            owner: UserId::new(owner),
            created: obj.opt_time("created_at"),
        })
    }
}

/// Server acknowledgement of a flattr, create or delete call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlattrResult {
    pub message: String,
    pub description: String,
}

impl FlattrResult {
    pub fn from_object(obj: &FlattrObject) -> FlattrResult {
        FlattrResult {
            message: obj.opt_str("message").unwrap_or_default().to_string(),
            description: obj.opt_str("description").unwrap_or_default().to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.message == "ok"
    }
}

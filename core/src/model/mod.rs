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

//! Value objects exchanged with the API.

mod activity;
mod category;
mod flattr;
mod flattr_object;
mod ids;
mod legacy;
mod search;
mod submission;
mod subscription;
mod thing;
mod user;

pub use activity::{Activity, ActivityType};
pub use category::{Category, Language};
pub use flattr::{Flattr, FlattrResult};
pub use flattr_object::FlattrObject;
pub use ids::{CategoryId, LanguageId, ThingId, UserId};
pub use legacy::{ClickCount, ClickedThing, RegisteredThing};
pub use search::{SearchOrder, SearchQuery, SearchResult};
pub use submission::{
    AutoSubmission, Submission, DESCRIPTION_MAX, DESCRIPTION_MIN, TITLE_MAX, TITLE_MIN,
};
pub use subscription::Subscription;
pub use thing::Thing;
pub use user::User;

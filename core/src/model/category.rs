/*
 * category.rs
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

//! Categories and languages: id plus a display name.

use crate::error::Result;
use crate::model::{CategoryId, FlattrObject, LanguageId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
}

impl Category {
    pub fn from_object(obj: &FlattrObject) -> Result<Category> {
        Ok(Category {
            id: CategoryId::new(obj.get_str("id")?),
            name: obj.opt_str("text").unwrap_or_default().to_string(),
        })
    }

    pub fn to_object(&self) -> FlattrObject {
        let mut o = FlattrObject::new();
        o.put("id", self.id.as_str());
        o.put("text", self.name.as_str());
        o
    }
}

impl Language {
    pub fn from_object(obj: &FlattrObject) -> Result<Language> {
        Ok(Language {
            id: LanguageId::new(obj.get_str("id")?),
            name: obj.opt_str("text").unwrap_or_default().to_string(),
        })
    }

    pub fn to_object(&self) -> FlattrObject {
        let mut o = FlattrObject::new();
        o.put("id", self.id.as_str());
        o.put("text", self.name.as_str());
        o
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let c = Category {
            id: CategoryId::new("text"),
            name: "Text".into(),
        };
        let o = crate::json::parse_values(&c.to_object().to_json()).unwrap().remove(0);
        assert_eq!(Category::from_object(&FlattrObject::from_value(o).unwrap()).unwrap(), c);

        let l = Language {
            id: LanguageId::new("sv_SE"),
            name: "Svenska".into(),
        };
        let o = crate::json::parse_values(&l.to_object().to_json()).unwrap().remove(0);
        assert_eq!(Language::from_object(&FlattrObject::from_value(o).unwrap()).unwrap(), l);
    }
}

/*
 * search.rs
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

//! Thing search parameters and results.

use crate::error::Result;
use crate::model::{CategoryId, FlattrObject, LanguageId, Thing, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    Trend,
    Flattrs,
    FlattrsMonth,
    FlattrsWeek,
    FlattrsDay,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Trend => "trend",
            SearchOrder::Flattrs => "flattrs",
            SearchOrder::FlattrsMonth => "flattrs_month",
            SearchOrder::FlattrsWeek => "flattrs_week",
            SearchOrder::FlattrsDay => "flattrs_day",
        }
    }
}

/// Filters for `things/search`. Unset fields are not sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
    /// Matched with the boolean syntax of the API (`a & b`, `a | b`, `!c`).
    pub tags: Option<String>,
    pub languages: Vec<LanguageId>,
    pub categories: Vec<CategoryId>,
    pub user: Option<UserId>,
    pub sort: Option<SearchOrder>,
    /// Results per page.
    pub count: Option<u32>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn language(mut self, language: impl Into<LanguageId>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn category(mut self, category: impl Into<CategoryId>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn user(mut self, user: impl Into<UserId>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn sort(mut self, sort: SearchOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: u32, count: u32) -> Self {
        self.page = Some(page);
        self.count = Some(count);
        self
    }

    /// Query string pairs in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = &self.query {
            params.push(("query", q.clone()));
        }
        if let Some(t) = &self.tags {
            params.push(("tags", t.clone()));
        }
        if !self.languages.is_empty() {
            let v: Vec<&str> = self.languages.iter().map(LanguageId::as_str).collect();
            params.push(("language", v.join(",")));
        }
        if !self.categories.is_empty() {
            let v: Vec<&str> = self.categories.iter().map(CategoryId::as_str).collect();
            params.push(("category", v.join(",")));
        }
        if let Some(u) = &self.user {
            params.push(("user", u.as_str().to_string()));
        }
        if let Some(s) = self.sort {
            params.push(("sort", s.as_str().to_string()));
        }
        if let Some(c) = self.count {
            params.push(("count", c.to_string()));
        }
        if let Some(p) = self.page {
            params.push(("page", p.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    /// Matches across all pages.
    pub total: u64,
    /// Things on this page.
    pub items: u64,
    pub page: u32,
    pub things: Vec<Thing>,
}

impl SearchResult {
    pub fn from_object(obj: &FlattrObject) -> Result<SearchResult> {
        let things = obj
            .get_objects("things")
            .iter()
            .map(Thing::from_object)
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchResult {
            total: obj.opt_i64("total_items").unwrap_or(0).max(0) as u64,
            items: obj.opt_i64("items").unwrap_or(things.len() as i64).max(0) as u64,
            page: obj.opt_i64("page").unwrap_or(1).max(0) as u32,
            things,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_values;

    #[test]
    fn test_params() {
        let q = SearchQuery::new()
            .query("music")
            .language("en_GB")
            .language("sv_SE")
            .category("audio")
            .sort(SearchOrder::FlattrsWeek)
            .page(3, 20);
        assert_eq!(
            q.to_params(),
            vec![
                ("query", "music".to_string()),
                ("language", "en_GB,sv_SE".to_string()),
                ("category", "audio".to_string()),
                ("sort", "flattrs_week".to_string()),
                ("count", "20".to_string()),
                ("page", "3".to_string()),
            ]
        );
        assert!(SearchQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_result() {
        let json = br#"{"total_items":42,"items":1,"page":2,"things":[{"type":"thing","id":7,"url":"http://a.example","title":"Seven"}]}"#;
        let value = parse_values(json).unwrap().remove(0);
        let result = SearchResult::from_object(&FlattrObject::from_value(value).unwrap()).unwrap();
        assert_eq!(result.total, 42);
        assert_eq!(result.items, 1);
        assert_eq!(result.page, 2);
        assert_eq!(result.things[0].id.as_str(), "7");
        assert_eq!(result.things[0].title, "Seven");
    }
}

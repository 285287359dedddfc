//! Filter, sort and paginate a snapshot of posts.
//!
//! [`paginate`] never fails: a page past the end is clamped to the last page,
//! and an empty result is reported as page 1 of 0.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::post::Post;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 50;
pub const MIN_SEARCH_LEN: usize = 3;

/// Field a listing is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Id,
    Title,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
        }
    }

    fn compare(self, a: &Post, b: &Post) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Title => a.title.cmp(&b.title),
        }
    }
}

impl FromStr for OrderBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing parameters, already range-checked by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Case-insensitive title substring.
    pub search: Option<String>,
    pub per_page: usize,
    pub page: usize,
    pub order_by: OrderBy,
    pub direction: Direction,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            search: None,
            per_page: DEFAULT_PER_PAGE,
            page: 1,
            order_by: OrderBy::default(),
            direction: Direction::default(),
        }
    }
}

/// One window of a filtered, sorted listing plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub order_by: OrderBy,
    pub direction: Direction,
    pub search: Option<String>,
    pub items: Vec<Post>,
}

/// Filters `records` by case-insensitive title substring, sorts and returns
/// one page.
///
/// The sort is stable, and `desc` reverses the comparator rather than the
/// output, so posts that compare equal keep their insertion order in both
/// directions. `page` is clamped to `1..=total_pages` instead of failing;
/// with no matches the result is page 1 of 0 with no items. `per_page` of 0
/// is treated as 1.
pub fn paginate(records: &[Post], query: &PageQuery) -> Page {
    let per_page = query.per_page.max(1);
    let needle = query.search.as_deref().map(str::to_lowercase);

    let mut matches: Vec<&Post> = records
        .iter()
        .filter(|post| {
            needle
                .as_deref()
                .is_none_or(|needle| post.title.to_lowercase().contains(needle))
        })
        .collect();

    let total = matches.len();
    let total_pages = total.div_ceil(per_page);
    let page = if total_pages == 0 { 1 } else { query.page.clamp(1, total_pages) };

    // `sort_by` is stable; reversing the comparator (not the output) keeps
    // ties in their filtered order for both directions.
    matches.sort_by(|a, b| {
        let ord = query.order_by.compare(a, b);
        match query.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });

    let items = matches
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    Page {
        page,
        per_page,
        total,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
        order_by: query.order_by,
        direction: query.direction,
        search: query.search.clone(),
        items,
    }
}

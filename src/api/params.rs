//! Typed extraction of path and query parameters.
//!
//! Query strings are deserialized into parameter structs and bounded with the
//! same `validator` rules the request bodies use, so one 422 lists every
//! out-of-range parameter at once. A value that does not even parse (a word
//! where a number belongs, an unknown `order_by`) fails deserialization and is
//! reported on its own.

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::pagination::{Direction, OrderBy, PageQuery};
use crate::request::Request;
use crate::validation::ValidationError;

/// Query parameters of `GET /posts`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub(crate) struct ListParams {
    #[validate(length(min = 3, message = "search must be at least 3 characters"))]
    search: Option<String>,
    /// Older spelling of `search`; `search` wins when both are given.
    #[validate(length(min = 3, message = "search must be at least 3 characters"))]
    query: Option<String>,
    #[validate(range(min = 1, max = 50))]
    per_page: Option<usize>,
    #[validate(range(min = 1))]
    page: Option<usize>,
    order_by: Option<OrderBy>,
    direction: Option<Direction>,
}

impl ListParams {
    fn into_page_query(self) -> PageQuery {
        let defaults = PageQuery::default();
        PageQuery {
            search: self.search.or(self.query),
            per_page: self.per_page.unwrap_or(defaults.per_page),
            page: self.page.unwrap_or(defaults.page),
            order_by: self.order_by.unwrap_or(defaults.order_by),
            direction: self.direction.unwrap_or(defaults.direction),
        }
    }
}

/// Query parameters of the single-post routes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewParams {
    #[serde(deserialize_with = "loose_bool")]
    include_content: Option<bool>,
}

/// Reads `search` (or `query`), `per_page`, `page`, `order_by` and
/// `direction`, with defaults for whatever is absent.
pub(crate) fn page_query(req: &Request) -> Result<PageQuery, ValidationError> {
    let params: ListParams = req.query().map_err(|e| ValidationError::query(&e))?;
    params.validate().map_err(|e| ValidationError::scoped("query", &e))?;
    Ok(params.into_page_query())
}

/// `include_content` flag, `default` when absent.
pub(crate) fn include_content(req: &Request, default: bool) -> Result<bool, ValidationError> {
    let params: ViewParams = req.query().map_err(|e| ValidationError::query(&e))?;
    Ok(params.include_content.unwrap_or(default))
}

/// `post_id` path segment: a positive integer.
pub(crate) fn post_id(req: &Request) -> Result<u64, ValidationError> {
    let raw = req.param("post_id").unwrap_or_default();
    match raw.parse::<u64>() {
        Ok(0) => Err(ValidationError::single(
            "path.post_id",
            "greater_than_equal",
            "post_id must be at least 1",
        )),
        Ok(id) => Ok(id),
        Err(_) => Err(ValidationError::single(
            "path.post_id",
            "int_parsing",
            format!("post_id must be an integer, got {raw:?}"),
        )),
    }
}

/// Parses a loosely-spelled boolean (`true/false`, `1/0`, `yes/no`, `on/off`).
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn loose_bool<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    let raw = String::deserialize(de)?;
    parse_bool(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::invalid_value(Unexpected::Str(&raw), &"a boolean"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;

    use super::*;
    use crate::pagination::{MAX_PER_PAGE, MIN_SEARCH_LEN};

    fn request(uri: &str) -> Request {
        let (parts, ()) = http::Request::get(uri).body(()).unwrap().into_parts();
        Request::new(parts, Bytes::new(), HashMap::new())
    }

    fn parse(raw: &str) -> Result<PageQuery, ValidationError> {
        page_query(&request(&format!("/posts?{raw}")))
    }

    #[test]
    fn defaults_when_nothing_given() {
        assert_eq!(page_query(&request("/posts")).unwrap(), PageQuery::default());
        assert_eq!(parse("").unwrap(), PageQuery::default());
    }

    #[test]
    fn reads_every_parameter() {
        let q = parse("search=post&per_page=5&page=2&order_by=title&direction=desc").unwrap();
        assert_eq!(q.search.as_deref(), Some("post"));
        assert_eq!((q.per_page, q.page), (5, 2));
        assert_eq!(q.order_by, OrderBy::Title);
        assert_eq!(q.direction, Direction::Desc);
    }

    #[test]
    fn decodes_plus_and_percent_escapes() {
        assert_eq!(parse("search=hola+mundo").unwrap().search.as_deref(), Some("hola mundo"));
        assert_eq!(parse("search=caf%C3%A9").unwrap().search.as_deref(), Some("café"));
    }

    #[test]
    fn query_is_an_alias_for_search() {
        assert_eq!(parse("query=hola").unwrap().search.as_deref(), Some("hola"));
        assert_eq!(parse("query=hola&search=post").unwrap().search.as_deref(), Some("post"));
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        assert_eq!(parse("utm_source=feed").unwrap(), PageQuery::default());
    }

    #[test]
    fn per_page_bounds() {
        let err = parse("per_page=0").unwrap_err();
        assert!(err.has_field("query.per_page"));
        assert_eq!(err.violations()[0].code, "range");
        assert!(parse("per_page=51").unwrap_err().has_field("query.per_page"));
        assert_eq!(parse(&format!("per_page={MAX_PER_PAGE}")).unwrap().per_page, MAX_PER_PAGE);
        assert!(parse(&format!("per_page={}", MAX_PER_PAGE + 1)).is_err());
        assert_eq!(parse("per_page=1").unwrap().per_page, 1);
    }

    #[test]
    fn page_must_be_positive_integer() {
        assert!(parse("page=0").unwrap_err().has_field("query.page"));
        assert!(parse("page=-1").unwrap_err().has_field("query"));
        assert!(parse("page=abc").unwrap_err().has_field("query"));
        assert!(parse("page=99999999999999999999999").unwrap_err().has_field("query"));
        assert_eq!(parse("page=999").unwrap().page, 999);
    }

    #[test]
    fn unknown_keywords_are_rejected() {
        let err = parse("order_by=content").unwrap_err();
        assert_eq!(err.violations()[0].code, "query_invalid");
        assert!(parse("direction=sideways").is_err());
    }

    #[test]
    fn short_search_is_rejected() {
        let err = parse("search=ab").unwrap_err();
        assert!(err.has_field("query.search"));
        assert_eq!(err.violations()[0].message, "search must be at least 3 characters");
        assert!(parse("search=").unwrap_err().has_field("query.search"));
        assert!(parse(&format!("search={}", "x".repeat(MIN_SEARCH_LEN))).is_ok());
        assert!(parse("query=ab").unwrap_err().has_field("query.query"));
    }

    #[test]
    fn reports_all_range_problems_at_once() {
        let err = parse("per_page=99&page=0&search=ab").unwrap_err();
        assert_eq!(err.violations().len(), 3);
        assert!(err.has_field("query.per_page"));
        assert!(err.has_field("query.page"));
        assert!(err.has_field("query.search"));
    }

    #[test]
    fn include_content_flag() {
        assert_eq!(include_content(&request("/posts/1?include_content=false"), true), Ok(false));
        assert_eq!(include_content(&request("/posts/1?include_content=YES"), false), Ok(true));
        assert_eq!(include_content(&request("/posts/1"), true), Ok(true));
        assert!(include_content(&request("/posts/1?include_content=x"), false).is_err());
    }

    #[test]
    fn loose_booleans() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}

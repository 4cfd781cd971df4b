//! Query-string -> typed list parameters (page, per_page, sort, resource filters).

use crate::error::ParseError;
use std::collections::HashMap;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 15;
pub const MAX_PER_PAGE: i64 = 100;

/// Per-page default and ceiling. Configurable per deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListLimits {
    pub default_per_page: i64,
    pub max_per_page: i64,
}

impl Default for ListLimits {
    fn default() -> Self {
        ListLimits {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl ListLimits {
    /// `page` <= 0 becomes 1.
    pub fn normalize_page(&self, page: i64) -> i64 {
        if page <= 0 {
            DEFAULT_PAGE
        } else {
            page
        }
    }

    /// `per_page` <= 0 becomes the default; above the max is clamped to the max.
    pub fn normalize_per_page(&self, per_page: i64) -> i64 {
        if per_page <= 0 {
            self.default_per_page
        } else {
            per_page.min(self.max_per_page)
        }
    }
}

/// Multi-valued query map. Lookups return the first value for a key, like a
/// form decoder would.
#[derive(Clone, Debug, Default)]
pub struct QueryMap {
    values: HashMap<String, Vec<String>>,
}

impl QueryMap {
    pub fn new() -> Self {
        QueryMap::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// First value for `key`, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// First non-empty value for `key`. Empty values count as "not supplied".
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|s| !s.is_empty())
    }

    /// Optional string filter: `None` when absent or empty.
    pub fn string(&self, key: &str) -> Option<String> {
        self.non_empty(key).map(str::to_string)
    }

    /// Optional boolean filter. Accepts 1/t/true and 0/f/false (any case).
    pub fn bool(&self, key: &str) -> Result<Option<bool>, ParseError> {
        let Some(raw) = self.non_empty(key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" => Ok(Some(true)),
            "0" | "f" | "false" => Ok(Some(false)),
            _ => Err(ParseError {
                field: key.to_string(),
                value: raw.to_string(),
                expected: "boolean",
            }),
        }
    }
}

impl FromIterator<(String, String)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Resource-specific filter shape decoded from the query map.
///
/// Unset fields stay `None` so stores can tell "no filter" from "filter on
/// empty/false". Unknown keys are ignored.
pub trait ListFilters: Default + Send + Sync + Sized {
    fn from_query(query: &QueryMap) -> Result<Self, ParseError>;
}

/// Decoded list request: normalized paging, raw sort, typed filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListParams<F> {
    pub page: i64,
    pub per_page: i64,
    /// Raw `<field>_<asc|desc>`; resolved against each store's whitelist.
    pub sort: Option<String>,
    pub filters: F,
}

impl<F: Default> Default for ListParams<F> {
    fn default() -> Self {
        ListParams {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            filters: F::default(),
        }
    }
}

impl<F> ListParams<F> {
    /// Rows to skip. Saturates at `i64::MAX` for huge pages, which simply yields an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.per_page.max(0))
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Decode list parameters. Paging never fails: absent, non-numeric or
/// non-positive values fall back to defaults. Only typed filters can fail.
pub fn parse_list_params<F: ListFilters>(
    query: &QueryMap,
    limits: &ListLimits,
) -> Result<ListParams<F>, ParseError> {
    let page = parse_int(query.first("page"))
        .map(|p| limits.normalize_page(p))
        .unwrap_or(DEFAULT_PAGE);
    let per_page = parse_int(query.first("per_page"))
        .map(|p| limits.normalize_per_page(p))
        .unwrap_or(limits.default_per_page);
    let sort = query.string("sort");
    let filters = F::from_query(query)?;
    Ok(ListParams {
        page,
        per_page,
        sort,
        filters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Flags {
        name: Option<String>,
        active: Option<bool>,
    }

    impl ListFilters for Flags {
        fn from_query(query: &QueryMap) -> Result<Self, ParseError> {
            Ok(Flags {
                name: query.string("name"),
                active: query.bool("active")?,
            })
        }
    }

    fn query(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn parse(pairs: &[(&str, &str)]) -> Result<ListParams<Flags>, ParseError> {
        parse_list_params(&query(pairs), &ListLimits::default())
    }

    #[test]
    fn defaults_when_empty() {
        let p = parse(&[]).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, DEFAULT_PER_PAGE);
        assert_eq!(p.sort, None);
        assert_eq!(p.filters, Flags::default());
    }

    #[test]
    fn bad_paging_falls_back() {
        for raw in ["0", "-3", "abc", "", "1.5"] {
            let p = parse(&[("page", raw), ("per_page", raw)]).unwrap();
            assert_eq!(p.page, 1, "page {:?}", raw);
            assert_eq!(p.per_page, DEFAULT_PER_PAGE, "per_page {:?}", raw);
        }
    }

    #[test]
    fn per_page_is_clamped() {
        let p = parse(&[("per_page", "200")]).unwrap();
        assert_eq!(p.per_page, MAX_PER_PAGE);
        let p = parse(&[("per_page", "100")]).unwrap();
        assert_eq!(p.per_page, 100);
        let p = parse(&[("page", "4"), ("per_page", "7")]).unwrap();
        assert_eq!((p.page, p.per_page), (4, 7));
        assert_eq!(p.offset(), 21);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let p = parse(&[("page", "9223372036854775807"), ("per_page", "100")]).unwrap();
        assert_eq!(p.page, i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn custom_limits() {
        let limits = ListLimits {
            default_per_page: 10,
            max_per_page: 50,
        };
        let p: ListParams<Flags> = parse_list_params(&query(&[("per_page", "80")]), &limits).unwrap();
        assert_eq!(p.per_page, 50);
        let p: ListParams<Flags> = parse_list_params(&query(&[]), &limits).unwrap();
        assert_eq!(p.per_page, 10);
    }

    #[test]
    fn sort_is_passed_through_unvalidated() {
        let p = parse(&[("sort", "bogus_sideways")]).unwrap();
        assert_eq!(p.sort.as_deref(), Some("bogus_sideways"));
    }

    #[test]
    fn filters_distinguish_absent_from_false() {
        let p = parse(&[("active", "false"), ("name", "iron"), ("unknown", "x")]).unwrap();
        assert_eq!(p.filters.active, Some(false));
        assert_eq!(p.filters.name.as_deref(), Some("iron"));
        let p = parse(&[("name", "")]).unwrap();
        assert_eq!(p.filters, Flags::default());
    }

    #[test]
    fn first_value_wins() {
        let p = parse(&[("name", "a"), ("name", "b"), ("page", "2"), ("page", "9")]).unwrap();
        assert_eq!(p.filters.name.as_deref(), Some("a"));
        assert_eq!(p.page, 2);
    }

    #[test]
    fn invalid_bool_is_parse_error() {
        let err = parse(&[("active", "maybe")]).unwrap_err();
        assert_eq!(err.field, "active");
        assert_eq!(err.value, "maybe");
        assert!(parse(&[("active", "TRUE")]).unwrap().filters.active.unwrap());
        assert!(!parse(&[("active", "0")]).unwrap().filters.active.unwrap());
    }
}

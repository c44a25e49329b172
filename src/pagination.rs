use serde::{Deserialize, Serialize};

/// Fallback page number when the request carries none.
pub const DEFAULT_PAGE: f64 = 1.0;
/// Fallback page size when the request carries none.
pub const DEFAULT_LIMIT: f64 = 12.0;
/// Largest page size a request may ask for.
pub const MAX_LIMIT: f64 = 100.0;

/// A query value as it arrives off the wire, before any numeric reading
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// Already numeric, as in a json body
    Num(f64),
    /// Anything else; query-string values always land here
    Text(String),
}

impl RawNumber {
    /// Loose numeric reading: strings are parsed after trimming,
    /// unparsable input becomes NaN
    fn as_f64(&self) -> f64 {
        match self {
            Self::Num(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

/// Url parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Requested page number, in whatever shape the client sent it
    pub page: Option<RawNumber>,
    /// Requested page size, in whatever shape the client sent it
    pub limit: Option<RawNumber>,
}

/// Fallbacks substituted for absent or unusable parameters
#[derive(Debug, Clone, Copy)]
pub struct PageDefaults {
    /// Page used when the request carries no usable `page`
    pub page: f64,
    /// Limit used when the request carries no usable `limit`
    pub limit: f64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

/// A sanitized pagination window
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pagination {
    /// 1-based page number, bounded from below only
    pub page: f64,
    /// Page size, always within `[1, MAX_LIMIT]`
    pub limit: f64,
    /// Entries to pass over before the window starts, `(page - 1) * limit`
    pub skip: f64,
}

impl PageQuery {
    /// Sanitize the raw request against `defaults`.
    ///
    /// Never fails: every input, however malformed, yields a well-formed
    /// window. Absent, unparsable and zero parameters fall back to the
    /// defaults; negative ones are raised to 1; `limit` is capped at
    /// [`MAX_LIMIT`]. Fractional values pass through unrounded, so `skip`
    /// may be fractional too. `page` has no upper bound.
    #[must_use]
    pub fn normalize(&self, defaults: PageDefaults) -> Pagination {
        let page = pick(self.page.as_ref(), defaults.page).max(1.0);
        let limit = pick(self.limit.as_ref(), defaults.limit).clamp(1.0, MAX_LIMIT);
        Pagination { page, limit, skip: (page - 1.0) * limit }
    }
}

/// Zero, NaN and absent all count as "not provided"; negative values do not
#[allow(clippy::float_cmp)]
fn pick(raw: Option<&RawNumber>, default: f64) -> f64 {
    match raw.map(RawNumber::as_f64) {
        Some(n) if n != 0.0 && !n.is_nan() => n,
        _ => default,
    }
}

/// A page of results together with the window that produced it
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    /// The selected window of items
    pub items: T,
    /// Number of items before windowing
    pub total: usize,
    /// Number of pages needed to cover `total`
    pub total_pages: f64,
    /// Window the items were selected with
    #[serde(flatten)]
    pub window: Pagination,
}

impl<T> Paged<T> {
    /// Wrap a selected window with its pagination metadata
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(items: T, total: usize, window: Pagination) -> Self {
        let total_pages = (total as f64 / window.limit).ceil();
        Self { items, total, total_pages, window }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn num(n: f64) -> Option<RawNumber> {
        Some(RawNumber::Num(n))
    }

    fn text(s: &str) -> Option<RawNumber> {
        Some(RawNumber::Text(s.to_string()))
    }

    fn normalize(page: Option<RawNumber>, limit: Option<RawNumber>) -> Pagination {
        PageQuery { page, limit }.normalize(PageDefaults::default())
    }

    #[test]
    fn missing_fields_use_defaults() {
        let p = PageQuery::default().normalize(PageDefaults::default());
        assert_eq!(p, Pagination { page: 1.0, limit: 12.0, skip: 0.0 });
    }

    #[test]
    fn zero_counts_as_absent() {
        let p = normalize(num(0.0), num(0.0));
        assert_eq!(p, Pagination { page: 1.0, limit: 12.0, skip: 0.0 });
    }

    #[test]
    fn negative_zero_counts_as_absent() {
        let p = normalize(num(-0.0), num(-0.0));
        assert_eq!(p, Pagination { page: 1.0, limit: 12.0, skip: 0.0 });
    }

    #[test]
    fn negative_values_are_raised_to_one() {
        let p = normalize(num(-3.0), num(-5.0));
        assert_eq!(p, Pagination { page: 1.0, limit: 1.0, skip: 0.0 });
    }

    #[test]
    fn limit_is_capped() {
        let p = normalize(num(2.0), num(500.0));
        assert_eq!(p, Pagination { page: 2.0, limit: 100.0, skip: 100.0 });
    }

    #[test]
    fn page_has_no_upper_bound() {
        let p = normalize(num(999_999.0), num(10.0));
        assert_eq!(p, Pagination { page: 999_999.0, limit: 10.0, skip: 9_999_980.0 });
    }

    #[test]
    fn non_numeric_text_falls_back() {
        let p = normalize(text("abc"), text("xyz"));
        assert_eq!(p, Pagination { page: 1.0, limit: 12.0, skip: 0.0 });
    }

    #[test]
    fn numeric_text_is_parsed() {
        let p = normalize(text("3"), text("25"));
        assert_eq!(p, Pagination { page: 3.0, limit: 25.0, skip: 50.0 });
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let p = normalize(text(" 7 "), text("\t20\n"));
        assert_eq!(p, Pagination { page: 7.0, limit: 20.0, skip: 120.0 });
    }

    #[test]
    fn empty_text_counts_as_absent() {
        let p = normalize(text(""), text("   "));
        assert_eq!(p, Pagination { page: 1.0, limit: 12.0, skip: 0.0 });
    }

    #[test]
    fn fractional_values_pass_through() {
        let p = normalize(num(2.5), num(12.0));
        assert_eq!(p, Pagination { page: 2.5, limit: 12.0, skip: 18.0 });
    }

    #[test]
    fn normalizing_twice_is_a_noop() {
        let first = normalize(num(37.0), num(250.0));
        let again = normalize(num(first.page), num(first.limit));
        assert_eq!(first, again);
    }

    #[test]
    fn custom_defaults_apply() {
        let defaults = PageDefaults { page: 1.0, limit: 50.0 };
        let p = PageQuery::default().normalize(defaults);
        assert_eq!(p, Pagination { page: 1.0, limit: 50.0, skip: 0.0 });
    }

    #[test]
    fn json_numbers_and_strings_both_deserialize() {
        let query: PageQuery =
            serde_json::from_value(serde_json::json!({ "page": "2", "limit": 500 })).unwrap();
        let p = query.normalize(PageDefaults::default());
        assert_eq!(p, Pagination { page: 2.0, limit: 100.0, skip: 100.0 });
    }

    #[test]
    fn null_and_unknown_keys_are_tolerated() {
        let query: PageQuery =
            serde_json::from_value(serde_json::json!({ "page": null, "sort": "name" })).unwrap();
        let p = query.normalize(PageDefaults::default());
        assert_eq!(p, Pagination { page: 1.0, limit: 12.0, skip: 0.0 });
    }

    #[test]
    fn total_pages_rounds_up() {
        let window = normalize(None, None);
        let paged = Paged::new(Vec::<u8>::new(), 25, window);
        assert_eq!(paged.total_pages, 3.0);
        assert_eq!(paged.total, 25);
    }
}

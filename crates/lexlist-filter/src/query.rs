//! Filter set ↔ URL query string mapping.
//!
//! Only keys declared by the schema are read or written. Every other query
//! segment is carried through untouched, so lists sharing a URL (or
//! unrelated parameters such as `tab=state`) never clobber each other.

use std::collections::HashSet;

use lexlist_model::{FilterSchema, FilterSet, FilterValue};
use url::Url;
use url::form_urlencoded;

/// Read a filter set from a raw query string.
///
/// - a missing key yields the field's default
/// - `key=` yields an explicit empty value (overriding a default)
/// - an unparseable number falls back to the default
/// - the first occurrence of a repeated key wins
pub fn parse_filters(schema: &FilterSchema, query: Option<&str>) -> FilterSet {
    let mut filters = schema.defaults();
    let Some(query) = query else {
        return filters;
    };

    let mut seen = HashSet::new();
    for (key, raw) in form_urlencoded::parse(query.as_bytes()) {
        let Some(field) = schema.field(&key) else {
            continue;
        };
        if !seen.insert(field.key.as_str()) {
            continue;
        }
        match FilterValue::parse(field.kind, &raw) {
            Some(value) => {
                filters.insert(&field.key, value);
            }
            None => {
                tracing::debug!(key = %field.key, raw = %raw, "ignoring unparseable filter value");
            }
        }
    }
    filters
}

/// Rewrite `query` so its schema keys describe `filters`.
///
/// Non-schema segments keep their original text and order; schema keys are
/// appended after them in schema order. Values equal to the field default
/// are omitted. Returns `None` when the resulting query is empty.
pub fn merge_filters_into_query(
    schema: &FilterSchema,
    query: Option<&str>,
    filters: &FilterSet,
) -> Option<String> {
    let mut segments: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !schema.contains(&segment_key(segment)))
        .map(str::to_string)
        .collect();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut wrote_any = false;
    for field in schema.fields() {
        let value = filters.get(&field.key);
        if *value == field.default {
            continue;
        }
        // An empty value only reaches this point when it overrides a default.
        serializer.append_pair(&field.key, &value.to_query_value().unwrap_or_default());
        wrote_any = true;
    }
    if wrote_any {
        segments.push(serializer.finish());
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("&"))
    }
}

/// Copy of `url` with its query rewritten for `filters`.
pub fn apply_filters_to_url(schema: &FilterSchema, url: &Url, filters: &FilterSet) -> Url {
    let mut next = url.clone();
    let query = merge_filters_into_query(schema, url.query(), filters);
    next.set_query(query.as_deref());
    next
}

/// Decoded key of one `key=value` segment.
fn segment_key(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexlist_model::FilterField;

    fn schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("q").with_highlight(),
            FilterField::select("court"),
            FilterField::number("year"),
            FilterField::select("sort").with_default("date"),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_missing_keys_use_defaults() {
        let filters = parse_filters(&schema(), None);
        assert_eq!(filters, FilterSet::new().with("sort", "date"));
    }

    #[test]
    fn test_parse_reads_schema_keys_only() {
        let filters = parse_filters(
            &schema(),
            Some("tab=state&q=right+to+privacy&year=2017&court=SC"),
        );
        assert_eq!(
            filters,
            FilterSet::new()
                .with("q", "right to privacy")
                .with("year", 2017_i64)
                .with("court", "SC")
                .with("sort", "date")
        );
    }

    #[test]
    fn test_parse_explicit_empty_overrides_default() {
        let filters = parse_filters(&schema(), Some("sort="));
        assert!(filters.get("sort").is_empty());
    }

    #[test]
    fn test_parse_bad_number_and_duplicates() {
        let filters = parse_filters(&schema(), Some("year=20x9&q=first&q=second"));
        assert!(filters.get("year").is_empty());
        assert_eq!(filters.get("q"), &FilterValue::from("first"));
    }

    #[test]
    fn test_merge_preserves_foreign_segments_verbatim() {
        let query = merge_filters_into_query(
            &schema(),
            Some("tab=state&q=old&utm_source=a%20b&page"),
            &FilterSet::new().with("q", "bail & bond").with("sort", "date"),
        );
        insta::assert_snapshot!(query.unwrap(), @"tab=state&utm_source=a%20b&page&q=bail+%26+bond");
    }

    #[test]
    fn test_merge_writes_empty_when_overriding_default() {
        let filters = FilterSet::new().with("year", 1999_i64);
        let query = merge_filters_into_query(&schema(), None, &filters);
        insta::assert_snapshot!(query.unwrap(), @"year=1999&sort=");
    }

    #[test]
    fn test_merge_defaults_only_is_none() {
        let query = merge_filters_into_query(&schema(), Some("q=x"), &schema().defaults());
        assert_eq!(query, None);
    }

    #[test]
    fn test_apply_filters_to_url() {
        let url = Url::parse("https://example.test/judgments?tab=central#top").unwrap();
        let next = apply_filters_to_url(
            &schema(),
            &url,
            &FilterSet::new().with("court", "HC").with("sort", "date"),
        );
        assert_eq!(
            next.as_str(),
            "https://example.test/judgments?tab=central&court=HC#top"
        );
    }
}

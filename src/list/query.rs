use std::collections::BTreeMap;

use url::form_urlencoded;

use super::ListError;

/// One filter a list screen exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Name used by callers and sent to the API
    pub name: &'static str,
    /// Query-string key in the shareable URL
    pub url_key: &'static str,
    /// Sentinel meaning "unset"; never written to the URL or the API
    pub default: &'static str,
}

impl FilterSpec {
    pub const fn new(name: &'static str, url_key: &'static str, default: &'static str) -> Self {
        Self { name, url_key, default }
    }
}

/// Declared configuration of a paginated, filterable listing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScreen {
    pub name: &'static str,
    /// Route pattern; `:id` is substituted per instance
    pub path: &'static str,
    /// API path pattern; `:id` is substituted per instance
    pub api_path: &'static str,
    pub page_size: u32,
    pub filters: &'static [FilterSpec],
}

impl ListScreen {
    pub fn filter(&self, name: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.name == name)
    }

    pub fn resolve_path(&self, id: Option<&str>) -> String {
        substitute(self.path, id)
    }

    pub fn resolve_api_path(&self, id: Option<&str>) -> String {
        substitute(self.api_path, id)
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name).collect()
    }
}

fn substitute(pattern: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => pattern.replace(":id", id),
        None => pattern.to_string(),
    }
}

/// The URL-visible half of a list's state: current page and every filter's
/// value (defaults included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn defaults(screen: &ListScreen) -> Self {
        Self {
            page: 1,
            filters: screen
                .filters
                .iter()
                .map(|f| (f.name.to_string(), f.default.to_string()))
                .collect(),
        }
    }

    /// Parse a query string (with or without a leading `?`). Missing or
    /// unparseable keys take their defaults; unrecognized keys are ignored.
    pub fn from_query_string(screen: &ListScreen, query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.clone())
        };

        let mut parsed = Self::defaults(screen);
        parsed.page = lookup("page")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        for spec in screen.filters {
            if let Some(value) = lookup(spec.url_key) {
                parsed.filters.insert(spec.name.to_string(), value);
            }
        }
        parsed
    }

    /// Canonical minimal query string: non-default filters in declared
    /// order, then `page` when it is not 1. Empty when everything is default.
    pub fn to_query_string(&self, screen: &ListScreen) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (spec, value) in self.active_filters(screen) {
            serializer.append_pair(spec.url_key, value);
        }
        if self.page != 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        serializer.finish()
    }

    /// Parameters for the list request: page, fixed page size, and every
    /// non-default filter keyed by filter name.
    pub fn to_api_params(&self, screen: &ListScreen) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), screen.page_size.to_string()),
        ];
        params.extend(
            self.active_filters(screen)
                .map(|(spec, value)| (spec.name.to_string(), value.to_string())),
        );
        params
    }

    pub fn filter_value(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Set a filter, normalizing empty values to the default. Returns whether
    /// the value changed.
    pub(crate) fn set_filter(&mut self, screen: &ListScreen, name: &str, value: &str) -> Result<bool, ListError> {
        let spec = screen
            .filter(name)
            .ok_or_else(|| ListError::UnknownFilter {
                screen: screen.name,
                name: name.to_string(),
            })?;
        let value = if value.trim().is_empty() { spec.default } else { value };
        let previous = self.filters.insert(spec.name.to_string(), value.to_string());
        Ok(previous.as_deref() != Some(value))
    }

    fn active_filters<'a>(&'a self, screen: &'a ListScreen) -> impl Iterator<Item = (&'a FilterSpec, &'a str)> + 'a {
        screen.filters.iter().filter_map(move |spec| {
            self.filters
                .get(spec.name)
                .map(String::as_str)
                .filter(|v| *v != spec.default)
                .map(|v| (spec, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::screens::{APPLICANTS, JOBS};

    #[test]
    fn missing_keys_take_defaults() {
        let q = ListQuery::from_query_string(&JOBS, "");
        assert_eq!(q, ListQuery::defaults(&JOBS));
        assert_eq!(q.page, 1);
        assert_eq!(q.filter_value("status"), Some("all"));
    }

    #[test]
    fn parses_url_keys_and_ignores_unknown() {
        let q = ListQuery::from_query_string(&JOBS, "?status=open&verified=pending&page=3&utm=x");
        assert_eq!(q.page, 3);
        assert_eq!(q.filter_value("status"), Some("open"));
        assert_eq!(q.filter_value("verification"), Some("pending"));
        assert_eq!(q.filter_value("category"), Some("all"));
    }

    #[test]
    fn bad_page_values_fall_back_to_one() {
        for raw in ["page=0", "page=-2", "page=abc", "page="] {
            assert_eq!(ListQuery::from_query_string(&JOBS, raw).page, 1, "{}", raw);
        }
    }

    #[test]
    fn canonical_string_omits_defaults() {
        let mut q = ListQuery::defaults(&JOBS);
        assert_eq!(q.to_query_string(&JOBS), "");

        q.set_filter(&JOBS, "category", "Design & UX").unwrap();
        q.page = 2;
        assert_eq!(q.to_query_string(&JOBS), "category=Design+%26+UX&page=2");
    }

    #[test]
    fn reparsing_canonical_output_is_stable() {
        let samples = [
            "",
            "page=4",
            "status=closed",
            "job=abc123&status=shortlisted&page=9",
            "status=a%3Db%26c",
        ];
        for raw in samples {
            let q = ListQuery::from_query_string(&APPLICANTS, raw);
            let canonical = q.to_query_string(&APPLICANTS);
            assert_eq!(ListQuery::from_query_string(&APPLICANTS, &canonical), q, "{}", raw);
        }
    }

    #[test]
    fn api_params_use_filter_names() {
        let q = ListQuery::from_query_string(&APPLICANTS, "job=j-1&page=2");
        assert_eq!(
            q.to_api_params(&APPLICANTS),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("jobId".to_string(), "j-1".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let mut q = ListQuery::defaults(&JOBS);
        let err = q.set_filter(&JOBS, "salary", "high").unwrap_err();
        assert!(err.to_string().contains("salary"));
    }

    #[test]
    fn empty_value_resets_to_default() {
        let mut q = ListQuery::from_query_string(&JOBS, "status=open");
        assert!(q.set_filter(&JOBS, "status", "").unwrap());
        assert_eq!(q.filter_value("status"), Some("all"));
    }
}

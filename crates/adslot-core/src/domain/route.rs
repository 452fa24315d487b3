use derive_more::Display;

///
/// Location
/// What the navigation context reports for the current route.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    #[must_use]
    pub fn route_key(&self) -> RouteKey {
        RouteKey::new(&self.path, &self.query)
    }
}

///
/// RouteKey
///
/// Dedup token for a client-side route: path plus query string.
/// Never persisted.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct RouteKey(String);

impl RouteKey {
    /// Build a key from a path and an optional raw query string (with or
    /// without the leading `?`).
    #[must_use]
    pub fn new(path: &str, query: &str) -> Self {
        let path = if path.is_empty() { "/" } else { path };
        let query = query.strip_prefix('?').unwrap_or(query);

        if query.is_empty() {
            Self(path.to_string())
        } else {
            Self(format!("{path}?{query}"))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_part_of_the_key() {
        assert_eq!(RouteKey::new("/markets", "").as_str(), "/markets");
        assert_eq!(RouteKey::new("/markets", "?page=2").as_str(), "/markets?page=2");
        assert_eq!(RouteKey::new("/markets", "page=2"), RouteKey::new("/markets", "?page=2"));
        assert_ne!(RouteKey::new("/markets", "page=2"), RouteKey::new("/markets", "page=3"));
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(RouteKey::new("", "").as_str(), "/");
    }
}

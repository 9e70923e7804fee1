use std::fmt;

/// Ordered key/value view over an `application/x-www-form-urlencoded` query
/// string. Keys are unique; the first occurrence of a key fixes its position
/// and the last occurrence wins its value. Bare keys (`flag`, no `=`) are
/// written back bare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    /// Parses a raw query string. A leading `?` is ignored.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut params = Self::default();

        for segment in raw.split('&').filter(|segment| !segment.is_empty()) {
            let bare = !segment.contains('=');
            if let Some((key, value)) = form_urlencoded::parse(segment.as_bytes()).next() {
                params.insert(key.into_owned(), (!bare).then(|| value.into_owned()));
            }
        }

        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    /// Replaces the value of `key` in place, or appends it when missing.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key.into(), Some(value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref().unwrap_or("")))
    }

    fn insert(&mut self, key: String, value: Option<String>) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            for chunk in form_urlencoded::byte_serialize(key.as_bytes()) {
                f.write_str(chunk)?;
            }
            if let Some(value) = value {
                f.write_str("=")?;
                for chunk in form_urlencoded::byte_serialize(value.as_bytes()) {
                    f.write_str(chunk)?;
                }
            }
        }
        Ok(())
    }
}

/// Returns `params` with `key` set to `value`, every other pair untouched.
pub fn form_url_query(params: &str, key: &str, value: &str) -> String {
    let mut query = QueryParams::parse(params);
    query.set(key, value);
    query.to_string()
}

/// Returns `params` without any of `keys_to_remove`.
pub fn remove_keys_from_query(params: &str, keys_to_remove: &[&str]) -> String {
    let mut query = QueryParams::parse(params);
    for key in keys_to_remove {
        query.remove(key);
    }
    query.to_string()
}

/// Joins a path and an encoded query string, dropping the `?` for an empty query.
pub fn url_with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Reads a 1-based page number; anything missing, malformed or below 1 is page 1.
pub fn parse_page(value: Option<&str>) -> u32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

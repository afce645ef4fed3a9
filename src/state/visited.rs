use std::collections::HashSet;

/// URLs already scheduled during one seed's traversal
///
/// A fresh registry is created for every seed, so a URL reached from two
/// seeds is visited once per seed. It is owned by the traversal and is not
/// synchronized.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    urls: HashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Marks a URL as visited; returns false if it already was
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

//! Ordered tag sets.

/// An ordered mapping of tag key to tag value.
///
/// Keys are unique. Inserting a key that is already present replaces its
/// value without moving it, so the rendered tag order always follows first
/// insertion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TagSet {
    entries: Vec<(String, String)>,
}

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style variant of [`TagSet::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up the value for a tag key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TagSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let tags = TagSet::new()
            .with("statistics", "Count_by_Codec")
            .with("library_name", "Movies")
            .with("library_id", "abc123");

        let keys: Vec<_> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["statistics", "library_name", "library_id"]);
    }

    #[test]
    fn test_duplicate_key_replaced_in_place() {
        let mut tags = TagSet::new().with("a", "1").with("b", "2");
        tags.insert("a", "3");

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("a"), Some("3"));
        assert_eq!(tags.iter().next(), Some(("a", "3")));
    }

    #[test]
    fn test_from_iter() {
        let tags: TagSet = [("language", "English"), ("language", "French")]
            .into_iter()
            .collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("language"), Some("French"));
        assert!(tags.get("missing").is_none());
    }
}

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Anything stored in a [`Catalog`] exposes a string id.
pub trait Identified {
    /// The authored id of this entry.
    fn id(&self) -> &str;
}

/// An id-keyed arena that preserves authoring order.
///
/// Scenes, quests, and stages reference each other only by id, so graph
/// cycles never turn into ownership cycles. When an id is authored twice the
/// first entry wins lookups; the duplicates stay visible to validation.
#[derive(Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Catalog<T> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in authoring order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// The first entry in authoring order.
    pub fn first(&self) -> Option<&T> {
        self.entries.first()
    }

    /// All entries in authoring order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Identified> Catalog<T> {
    /// Append an entry, indexing it unless its id is already taken.
    pub fn push(&mut self, entry: T) {
        let position = self.entries.len();
        self.index.entry(entry.id().to_string()).or_insert(position);
        self.entries.push(entry);
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Whether an entry with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids that appear more than once, in the order the repeats occur.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, e)| self.index.get(e.id()) != Some(i))
            .map(|(_, e)| e.id())
            .collect()
    }
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<T: Identified> From<Vec<T>> for Catalog<T> {
    fn from(entries: Vec<T>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.push(entry);
        }
        catalog
    }
}

impl<T: Identified> FromIterator<T> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.push(entry);
        }
        catalog
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Catalogs travel as plain JSON arrays, matching the authoring tool's export.
impl<T: Serialize> Serialize for Catalog<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Identified> Deserialize<'de> for Catalog<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Catalog::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Entry {
        id: String,
        label: u32,
    }

    impl Identified for Entry {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn entry(id: &str, label: u32) -> Entry {
        Entry {
            id: id.to_string(),
            label,
        }
    }

    #[test]
    fn lookup_by_id() {
        let catalog: Catalog<Entry> = vec![entry("a", 1), entry("b", 2)].into();
        assert_eq!(catalog.get("b").unwrap().label, 2);
        assert!(catalog.get("c").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn first_duplicate_wins() {
        let catalog: Catalog<Entry> = vec![entry("a", 1), entry("b", 2), entry("a", 3)].into();
        assert_eq!(catalog.get("a").unwrap().label, 1);
        assert_eq!(catalog.duplicate_ids(), vec!["a"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn preserves_authoring_order() {
        let catalog: Catalog<Entry> = vec![entry("z", 1), entry("a", 2)].into();
        let ids: Vec<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn serializes_as_array() {
        let catalog: Catalog<Entry> = vec![entry("a", 1)].into();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"[{"id":"a","label":1}]"#);

        let back: Catalog<Entry> = serde_json::from_str(&json).unwrap();
        assert!(back.contains("a"));
    }
}

//! Symbol map model
//!
//! Every extraction produces a [`SymbolMap`] before anything is rendered.
//! The map keeps source order so that the gallery lists symbols the way the
//! file declares them.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// A single symbol name and the image reference it points to
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Display name (the object key)
    pub name: String,

    /// Image reference exactly as written in the source
    pub url: String,
}

/// Ordered mapping from symbol name to image reference
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// the position of the first occurrence, matching object-literal semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    entries: Vec<SymbolEntry>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value if the key existed
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<String> {
        let name = name.into();
        let url = url.into();

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.url, url)),
            None => {
                self.entries.push(SymbolEntry { name, url });
                None
            }
        }
    }

    /// Look up the image reference for a symbol
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.url.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in source order
    pub fn iter(&self) -> std::slice::Iter<'_, SymbolEntry> {
        self.entries.iter()
    }

    /// Symbol names in source order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl<'a> IntoIterator for &'a SymbolMap {
    type Item = &'a SymbolEntry;
    type IntoIter = std::slice::Iter<'a, SymbolEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for SymbolMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SymbolMap::new();
        for (name, url) in iter {
            map.insert(name, url);
        }
        map
    }
}

/// Serializes as a JSON object, preserving source order
impl Serialize for SymbolMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.url)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut map = SymbolMap::new();
        map.insert("zeta", "z.svg");
        map.insert("alpha", "a.svg");
        map.insert("mid", "m.svg");

        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let mut map = SymbolMap::new();
        map.insert("a", "1.svg");
        map.insert("b", "2.svg");
        let previous = map.insert("a", "3.svg");

        assert_eq!(previous, Some("1.svg".to_string()));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some("3.svg"));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_get_missing() {
        let map: SymbolMap = vec![("logo", "//cdn/logo.svg")].into_iter().collect();
        assert_eq!(map.get("icon"), None);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let map: SymbolMap = vec![("logo", "//cdn/logo.svg"), ("icon", "https://x/icon.svg")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"logo":"//cdn/logo.svg","icon":"https://x/icon.svg"}"#
        );
    }

    #[test]
    fn test_empty_map_serializes_to_empty_object() {
        let json = serde_json::to_string(&SymbolMap::new()).unwrap();
        assert_eq!(json, "{}");
    }
}

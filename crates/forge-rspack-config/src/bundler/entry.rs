use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Bundler `entry` option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// A single module
    Single(String),
    /// Several modules in one bundle
    Many(Vec<String>),
    /// Named bundles
    Named(IndexMap<String, EntryValue>),
}

/// Value of a named entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Single(String),
    Many(Vec<String>),
}

impl Entry {
    /// Named entry from `(bundle name, sources)` pairs, keeping insertion order
    pub fn named<I>(bundles: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        Entry::Named(
            bundles
                .into_iter()
                .map(|(name, sources)| (name, EntryValue::Many(sources)))
                .collect(),
        )
    }

    /// Apply `f` to every module specifier
    pub fn map_paths(self, mut f: impl FnMut(String) -> String) -> Self {
        match self {
            Entry::Single(path) => Entry::Single(f(path)),
            Entry::Many(paths) => Entry::Many(paths.into_iter().map(&mut f).collect()),
            Entry::Named(map) => Entry::Named(
                map.into_iter()
                    .map(|(name, value)| (name, value.map_paths(&mut f)))
                    .collect(),
            ),
        }
    }

    /// Bundle names, when the entry is named
    pub fn names(&self) -> Vec<&str> {
        match self {
            Entry::Named(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Sources of a named bundle
    pub fn sources(&self, name: &str) -> Option<Vec<&str>> {
        match self {
            Entry::Named(map) => map.get(name).map(EntryValue::paths),
            _ => None,
        }
    }
}

impl EntryValue {
    fn map_paths(self, f: &mut impl FnMut(String) -> String) -> Self {
        match self {
            EntryValue::Single(path) => EntryValue::Single(f(path)),
            EntryValue::Many(paths) => EntryValue::Many(paths.into_iter().map(f).collect()),
        }
    }

    pub fn paths(&self) -> Vec<&str> {
        match self {
            EntryValue::Single(path) => vec![path.as_str()],
            EntryValue::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
    }
}

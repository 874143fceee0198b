use indexmap::IndexMap;

use crate::error::ValidationError;

/// Key/value pairs displayed in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    entries: IndexMap<String, String>,
    inline: bool,
}

impl Map {
    /// Build a map from ordered pairs. A repeated key keeps its first
    /// position and takes the last value.
    pub fn new<I, K, V>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let entries: IndexMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();
        if entries.is_empty() {
            return Err(ValidationError::EmptyMap);
        }
        Ok(Self {
            entries,
            inline: false,
        })
    }

    /// Lay all pairs out on a single line instead of one per line.
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let map = Map::new([("zeta", 1), ("alpha", 2), ("mid", 3)]).unwrap();
        let keys: Vec<_> = map.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn values_are_stringified() {
        let map = Map::new([("ok", true)]).unwrap();
        assert_eq!(map.entries().next(), Some(("ok", "true")));
    }

    #[test]
    fn empty_map_rejected() {
        let result = Map::new(Vec::<(String, String)>::new());
        assert!(matches!(result, Err(ValidationError::EmptyMap)));
    }
}

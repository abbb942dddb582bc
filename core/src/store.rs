use std::collections::HashMap;

use crate::version::Version;

/// Mapping from key to its version chain, newest version first.
///
/// The store performs no visibility reasoning of its own (`spec.md` §4.2);
/// callers decide which entries are live or visible and mark them finished
/// by writing directly into the `&mut Version` yielded by
/// [`Store::chain_mut`].
#[derive(Debug, Default)]
pub struct Store {
    chains: HashMap<String, Vec<Version>>,
}

impl Store {
    pub fn new() -> Self {
        Store { chains: HashMap::new() }
    }

    /// Prepends `version` to the chain for `key`, creating the chain if
    /// this is the first version ever written for it.
    pub fn append(&mut self, key: &str, version: Version) {
        self.chains.entry(key.to_string()).or_default().insert(0, version);
    }

    /// The chain for `key`, newest-first. Empty if the key has never been
    /// written.
    pub fn chain(&self, key: &str) -> &[Version] {
        self.chains.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable access to the chain for `key`, for walking and invalidating
    /// versions. Empty if the key has never been written.
    pub fn chain_mut(&mut self, key: &str) -> &mut [Version] {
        self.chains.get_mut(key).map(Vec::as_mut_slice).unwrap_or(&mut [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_has_empty_chain() {
        let store = Store::new();
        assert!(store.chain("x").is_empty());
    }

    #[test]
    fn append_prepends_newest_first() {
        let mut store = Store::new();
        store.append("x", Version::new("a".to_string(), 1));
        store.append("x", Version::new("b".to_string(), 2));
        store.append("x", Version::new("c".to_string(), 3));

        let values: Vec<&str> = store.chain("x").iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["c", "b", "a"]);
    }

    #[test]
    fn chain_mut_can_mark_a_version_finished() {
        let mut store = Store::new();
        store.append("x", Version::new("a".to_string(), 1));
        store.chain_mut("x")[0].finish = 2;
        assert_eq!(store.chain("x")[0].finish, 2);
    }

    #[test]
    fn chains_for_different_keys_are_independent() {
        let mut store = Store::new();
        store.append("x", Version::new("a".to_string(), 1));
        store.append("y", Version::new("b".to_string(), 1));
        assert_eq!(store.chain("x").len(), 1);
        assert_eq!(store.chain("y").len(), 1);
    }
}

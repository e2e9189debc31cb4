// Write-once set of (origin, seq) pairs that protects the flood from
// looping. Deliberately unbounded (see DESIGN.md); capping it with an
// LRU is named in the redesign guidance but not built.

use std::collections::HashSet;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct SeenLsaSet {
    inner: Mutex<HashSet<(String, u32)>>,
}

impl SeenLsaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` if absent. Returns `true` when this call performed
    /// the insertion (first sighting), `false` if it was already seen.
    pub async fn insert_if_new(&self, key: (String, u32)) -> bool {
        self.inner.lock().await.insert(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_insertion_of_the_same_key_is_rejected() {
        let seen = SeenLsaSet::new();
        assert!(seen.insert_if_new(("r2".to_string(), 5)).await);
        assert!(!seen.insert_if_new(("r2".to_string(), 5)).await);
        assert!(seen.insert_if_new(("r2".to_string(), 6)).await);
    }
}

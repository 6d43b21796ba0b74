use std::collections::{BTreeMap, HashMap};

/// In-memory `localStorage`, one bucket per origin.
#[derive(Debug, Default, Clone)]
pub struct StorageRegistry {
    /// Map from origin to ordered key/value pairs.
    pub buckets: HashMap<String, BTreeMap<String, String>>,
}

impl StorageRegistry {
    #[inline]
    pub fn get_bucket_mut(&mut self, origin: &str) -> &mut BTreeMap<String, String> {
        self.buckets.entry(origin.to_owned()).or_default()
    }

    #[inline]
    pub fn get_bucket(&self, origin: &str) -> Option<&BTreeMap<String, String>> {
        self.buckets.get(origin)
    }

    pub fn get_item(&self, origin: &str, key: &str) -> Option<&str> {
        self.get_bucket(origin)
            .and_then(|bucket| bucket.get(key))
            .map(String::as_str)
    }

    pub fn set_item(&mut self, origin: &str, key: &str, value: &str) {
        self.get_bucket_mut(origin)
            .insert(key.to_owned(), value.to_owned());
    }

    pub fn remove_item(&mut self, origin: &str, key: &str) {
        if let Some(bucket) = self.buckets.get_mut(origin) {
            bucket.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StorageRegistry;

    #[test]
    fn origins_do_not_share_items() {
        let mut storage = StorageRegistry::default();
        storage.set_item("https://a.example", "cookiesAccepted", "true");
        assert_eq!(storage.get_item("https://a.example", "cookiesAccepted"), Some("true"));
        assert_eq!(storage.get_item("https://b.example", "cookiesAccepted"), None);
        storage.remove_item("https://a.example", "cookiesAccepted");
        assert_eq!(storage.get_item("https://a.example", "cookiesAccepted"), None);
    }
}

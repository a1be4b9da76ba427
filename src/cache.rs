//! This module provides a memoized photo lookup for notes

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::front_matter::extract_photo_field;
use crate::resolver::ImageResolver;
use crate::settings::Settings;
use crate::traits::Vault;

/// What is known about the photo of a note.
///
/// A note that is not in the cache yet simply has no entry: there is no "pending" state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CachedPhoto {
    /// The note has a photo, displayable with this locator
    Resolved(String),
    /// The note has no photo, or there is no note at this path
    Absent,
}

impl CachedPhoto {
    pub fn locator(&self) -> Option<&str> {
        match self {
            CachedPhoto::Resolved(locator) => Some(locator),
            CachedPhoto::Absent => None,
        }
    }

    pub fn into_locator(self) -> Option<String> {
        match self {
            CachedPhoto::Resolved(locator) => Some(locator),
            CachedPhoto::Absent => None,
        }
    }
}

/// Caches the photo of every note, keyed by note path
///
/// Entries never expire. They must be explicitly invalidated whenever a note is changed (see [`PhotoCache::invalidate`]).
///
/// Concurrent lookups of the same uncached path are not merged: each of them extracts the photo on its own, and the last one to finish is stored.
pub struct PhotoCache<V: ?Sized> {
    vault: Arc<V>,
    settings: RwLock<Arc<Settings>>,
    entries: Mutex<HashMap<String, CachedPhoto>>,
}

impl<V: Vault + ?Sized> PhotoCache<V> {
    pub fn new(vault: Arc<V>, settings: Arc<Settings>) -> Self {
        Self {
            vault,
            settings: RwLock::new(settings),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the photo locator of the note at `note_path`, or `None` if it has no photo.
    ///
    /// Known paths are answered straight from the cache, without querying the vault.
    pub async fn get(&self, note_path: &str) -> Option<String> {
        self.lookup(note_path).into_locator()
    }

    /// Same as [`Self::get`], but tells "no photo" entries apart
    pub fn lookup(&self, note_path: &str) -> CachedPhoto {
        if let Some(entry) = self.cached(note_path) {
            log::trace!("Photo cache hit for {}", note_path);
            return entry;
        }

        log::debug!("Photo cache miss for {}", note_path);
        let entry = self.extract(note_path);
        self.entries.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(note_path.to_string(), entry.clone());
        entry
    }

    /// Returns the cached entry for this path, without computing anything
    pub fn cached(&self, note_path: &str) -> Option<CachedPhoto> {
        self.entries.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(note_path)
            .cloned()
    }

    fn extract(&self, note_path: &str) -> CachedPhoto {
        let file = match self.vault.find_file_by_path(note_path) {
            None => return CachedPhoto::Absent,
            Some(file) => file,
        };

        let settings = self.settings();
        let front_matter = self.vault.front_matter(&file);
        match extract_photo_field(front_matter.as_ref(), settings.photo_field_names.as_slice()) {
            None => CachedPhoto::Absent,
            Some(raw) => {
                let resolver = ImageResolver::new(&*self.vault);
                CachedPhoto::Resolved(resolver.resolve(raw, file.path()))
            },
        }
    }

    /// Forget the entry of a path, so that the next lookup reads the current metadata again
    pub fn invalidate(&self, note_path: &str) {
        let removed = self.entries.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(note_path);
        if removed.is_some() {
            log::debug!("Invalidated the photo of {}", note_path);
        }
    }

    pub fn clear_all(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        log::debug!("Clearing {} cached photos", entries.len());
        entries.clear();
    }

    /// Replace the settings used for future extractions.
    ///
    /// This does not clear the cache: call [`Self::clear_all`] for already cached entries to use the new settings.
    pub fn update_settings(&self, settings: Arc<Settings>) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use crate::memory_vault::MemoryVault;

    fn setup() -> (Arc<MemoryVault>, PhotoCache<MemoryVault>) {
        let vault = Arc::new(MemoryVault::new());
        vault.add_file("photos/a.png");
        vault.add_note_with_front_matter("daily/2024-03-05.md", json!({"image": "[[a.png]]"}), "Some words");
        vault.add_note_with_front_matter("daily/2024-03-06.md", json!({"tags": ["x"]}), "No photo here");
        let cache = PhotoCache::new(vault.clone(), Arc::new(Settings::default()));
        (vault, cache)
    }

    #[tokio::test]
    async fn lookups_are_memoized() {
        let (vault, cache) = setup();

        assert_eq!(cache.get("daily/2024-03-05.md").await.as_deref(), Some("app://local/photos/a.png"));
        assert_eq!(vault.metadata_lookups(), 1);
        assert_eq!(cache.get("daily/2024-03-05.md").await.as_deref(), Some("app://local/photos/a.png"));
        assert_eq!(cache.get("daily/2024-03-05.md").await.as_deref(), Some("app://local/photos/a.png"));
        assert_eq!(vault.metadata_lookups(), 1);
    }

    #[tokio::test]
    async fn absence_is_cached() {
        let (vault, cache) = setup();

        assert_eq!(cache.get("daily/2024-03-06.md").await, None);
        assert_eq!(cache.cached("daily/2024-03-06.md"), Some(CachedPhoto::Absent));
        assert_eq!(cache.get("daily/2024-03-06.md").await, None);
        assert_eq!(vault.metadata_lookups(), 1);

        // No note at all: the vault is not even asked for metadata
        assert_eq!(cache.get("daily/1999-01-01.md").await, None);
        assert_eq!(cache.cached("daily/1999-01-01.md"), Some(CachedPhoto::Absent));
        assert_eq!(vault.metadata_lookups(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn invalidation_recomputes() {
        let (vault, cache) = setup();

        assert!(cache.get("daily/2024-03-05.md").await.is_some());
        cache.invalidate("daily/2024-03-05.md");
        assert_eq!(cache.cached("daily/2024-03-05.md"), None);
        assert!(cache.get("daily/2024-03-05.md").await.is_some());
        assert_eq!(vault.metadata_lookups(), 2);

        vault.set_front_matter("daily/2024-03-05.md", json!({"image": ""}));
        assert!(cache.get("daily/2024-03-05.md").await.is_some(), "stale until invalidated");
        cache.invalidate("daily/2024-03-05.md");
        assert_eq!(cache.get("daily/2024-03-05.md").await, None);
    }

    #[tokio::test]
    async fn settings_update_does_not_clear() {
        let (_vault, cache) = setup();
        assert!(cache.get("daily/2024-03-05.md").await.is_some());

        let settings = Settings { photo_field_names: vec!["banner".to_string()], ..Settings::default() };
        cache.update_settings(Arc::new(settings));
        assert!(cache.get("daily/2024-03-05.md").await.is_some());

        cache.clear_all();
        assert!(cache.is_empty());
        assert_eq!(cache.get("daily/2024-03-05.md").await, None);
    }

    #[tokio::test]
    async fn dangling_reference_still_counts_as_photo() {
        let vault = Arc::new(MemoryVault::new());
        vault.add_note_with_front_matter("n.md", json!({"cover": ["[[gone.png]]"]}), "");
        let cache = PhotoCache::new(vault.clone(), Arc::new(Settings::default()));
        assert_eq!(cache.lookup("n.md"), CachedPhoto::Resolved("[[gone.png]]".to_string()));
    }
}

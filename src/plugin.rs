//! Ties the photo cache, the calendar source and the refresh logic to the lifecycle of the host plugin

use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::PhotoCache;
use crate::date_format::MomentFormatter;
use crate::event::VaultEvent;
use crate::periodic::PeriodicNoteConfigProvider;
use crate::refresh::{RefreshScheduler, REFRESH_DEBOUNCE};
use crate::settings::Settings;
use crate::source::CalendarSource;
use crate::traits::Vault;

/// One instance of the calendar, for the whole life of the plugin
pub struct PhotoCalendar<V: ?Sized> {
    settings: RwLock<Arc<Settings>>,
    cache: Arc<PhotoCache<V>>,
    source: CalendarSource<V>,
    refresh: RefreshScheduler,
}

impl<V: Vault + ?Sized> PhotoCalendar<V> {
    /// `on_refresh` is called (debounced) whenever the calendar should be rendered again
    pub fn new<F>(vault: Arc<V>, settings: Settings, periodic: Arc<dyn PeriodicNoteConfigProvider>, on_refresh: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let settings = Arc::new(settings);
        let cache = Arc::new(PhotoCache::new(vault.clone(), settings.clone()));
        let formatter = Arc::new(MomentFormatter::new(settings.week_start));
        let source = CalendarSource::new(vault, cache.clone(), settings.clone(), periodic, formatter);

        Self {
            settings: RwLock::new(settings),
            cache,
            source,
            refresh: RefreshScheduler::new(on_refresh),
        }
    }

    pub fn source(&self) -> &CalendarSource<V> {
        &self.source
    }

    pub fn cache(&self) -> &PhotoCache<V> {
        &self.cache
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_refresh_pending(&self) -> bool {
        self.refresh.is_pending()
    }

    /// Forget what this event made outdated, and schedule a refresh
    pub fn handle_vault_event(&self, event: &VaultEvent) {
        log::debug!("Vault event: {}", event);
        for path in event.affected_paths() {
            self.cache.invalidate(path);
        }
        self.refresh.schedule(REFRESH_DEBOUNCE);
    }

    /// Apply new settings.
    ///
    /// The photo cache is cleared when the photo fields changed, so that every photo is looked for in the new fields.
    /// Other changes keep the cache.
    pub fn update_settings(&self, settings: Settings) {
        let previous = self.settings();
        let settings = Arc::new(settings);

        if previous.week_start != settings.week_start {
            self.source.set_formatter(Arc::new(MomentFormatter::new(settings.week_start)));
        }
        self.source.update_settings(settings.clone());
        if previous.photo_field_names != settings.photo_field_names {
            log::info!("Photo fields changed to {:?}", settings.photo_field_names);
            self.cache.clear_all();
        }

        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        self.refresh.schedule(REFRESH_DEBOUNCE);
    }

    /// Release everything, when the plugin is unloaded
    pub fn shutdown(&self) {
        self.refresh.cancel();
        self.cache.clear_all();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;
    use crate::memory_vault::MemoryVault;
    use crate::periodic::DefaultPeriodicNotes;
    use crate::cache::CachedPhoto;

    fn setup() -> (Arc<MemoryVault>, PhotoCalendar<MemoryVault>, Arc<AtomicUsize>) {
        let vault = Arc::new(MemoryVault::new());
        vault.add_note_with_front_matter("a.md", json!({"image": "https://x.test/a.jpg", "banner": "https://x.test/b.jpg"}), "");
        vault.add_note_with_front_matter("b.md", json!({"cover": "https://x.test/c.jpg"}), "");

        let refreshes = Arc::new(AtomicUsize::new(0));
        let counter = refreshes.clone();
        let calendar = PhotoCalendar::new(vault.clone(), Settings::default(), Arc::new(DefaultPeriodicNotes), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (vault, calendar, refreshes)
    }

    #[tokio::test(start_paused = true)]
    async fn events_invalidate_and_refresh_once() {
        let (_vault, calendar, refreshes) = setup();
        calendar.cache().lookup("a.md");
        calendar.cache().lookup("b.md");

        calendar.handle_vault_event(&VaultEvent::Modified("a.md".to_string()));
        calendar.handle_vault_event(&VaultEvent::Renamed { old_path: "b.md".to_string(), new_path: "c.md".to_string() });
        assert_eq!(calendar.cache().cached("a.md"), None);
        assert_eq!(calendar.cache().cached("b.md"), None);
        assert!(calendar.is_refresh_pending());

        tokio::time::sleep(REFRESH_DEBOUNCE + Duration::from_millis(10)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn photo_field_changes_clear_the_cache() {
        let (_vault, calendar, _refreshes) = setup();
        assert_eq!(calendar.cache().lookup("a.md"), CachedPhoto::Resolved("https://x.test/a.jpg".to_string()));

        calendar.update_settings(Settings { show_week_nums: true, ..Settings::default() });
        assert_eq!(calendar.cache().len(), 1);

        calendar.update_settings(Settings { photo_field_names: vec!["banner".to_string()], ..Settings::default() });
        assert!(calendar.cache().is_empty());
        assert_eq!(calendar.cache().lookup("a.md"), CachedPhoto::Resolved("https://x.test/b.jpg".to_string()));
        assert_eq!(calendar.settings().photo_field_names, vec!["banner"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_releases_everything() {
        let (_vault, calendar, refreshes) = setup();
        calendar.cache().lookup("a.md");
        calendar.handle_vault_event(&VaultEvent::Created("d.md".to_string()));

        calendar.shutdown();
        assert!(calendar.cache().is_empty());
        tokio::time::sleep(REFRESH_DEBOUNCE * 2).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    }
}

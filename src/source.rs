//! Computes the metadata of calendar cells, by combining notes, photos and dots

use std::error::Error;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;

use crate::cache::PhotoCache;
use crate::date_format::DateFormatter;
use crate::dots::DotQuantizer;
use crate::metadata::{ClassTags, DayMetadata};
use crate::note::NoteFile;
use crate::periodic::{Granularity, PeriodicNoteConfigProvider, PeriodicNotes};
use crate::settings::Settings;
use crate::traits::Vault;

/// The data source of the calendar renderer
pub struct CalendarSource<V: ?Sized> {
    vault: Arc<V>,
    cache: Arc<PhotoCache<V>>,
    settings: RwLock<Arc<Settings>>,
    periodic: Arc<dyn PeriodicNoteConfigProvider>,
    formatter: RwLock<Arc<dyn DateFormatter>>,
}

impl<V: Vault + ?Sized> CalendarSource<V> {
    pub fn new(
        vault: Arc<V>,
        cache: Arc<PhotoCache<V>>,
        settings: Arc<Settings>,
        periodic: Arc<dyn PeriodicNoteConfigProvider>,
        formatter: Arc<dyn DateFormatter>,
    ) -> Self {
        Self { vault, cache, settings: RwLock::new(settings), periodic, formatter: RwLock::new(formatter) }
    }

    pub fn cache(&self) -> &Arc<PhotoCache<V>> {
        &self.cache
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Use a new settings snapshot, for this source and its photo cache.
    ///
    /// Cached photos are kept, see [`PhotoCache::update_settings`]
    pub fn update_settings(&self, settings: Arc<Settings>) {
        self.cache.update_settings(settings.clone());
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Use another date formatter, e.g. because the week start changed
    pub fn set_formatter(&self, formatter: Arc<dyn DateFormatter>) {
        *self.formatter.write().unwrap_or_else(PoisonError::into_inner) = formatter;
    }

    pub fn periodic_notes(&self, granularity: Granularity) -> PeriodicNotes<'_, V> {
        let formatter = self.formatter.read().unwrap_or_else(PoisonError::into_inner).clone();
        PeriodicNotes::new(&*self.vault, formatter, self.periodic.as_ref(), granularity)
    }

    pub async fn get_daily_metadata(&self, date: NaiveDate) -> Result<DayMetadata, Box<dyn Error>> {
        let note = self.periodic_notes(Granularity::Day).note_for(date);
        self.metadata_for(note).await
    }

    pub async fn get_weekly_metadata(&self, date: NaiveDate) -> Result<DayMetadata, Box<dyn Error>> {
        let note = self.periodic_notes(Granularity::Week).note_for(date);
        self.metadata_for(note).await
    }

    async fn metadata_for(&self, note: Option<NoteFile>) -> Result<DayMetadata, Box<dyn Error>> {
        let note = match note {
            None => return Ok(DayMetadata::empty()),
            Some(note) => note,
        };
        log::trace!("Computing metadata of {}", note);

        let settings = self.settings();
        let quantizer = DotQuantizer::new(&*self.vault);
        let mut classes = ClassTags::HAS_NOTE;

        if settings.show_photos == false {
            let dots = quantizer.dots_for(&note, &settings).await?;
            return Ok(DayMetadata::new(classes, dots, None));
        }

        match self.cache.get(note.path()).await {
            Some(photo) => {
                // A photo replaces the dots
                classes |= ClassTags::HAS_PHOTO;
                Ok(DayMetadata::new(classes, Vec::new(), Some(photo)))
            },
            None => {
                let dots = quantizer.dots_for(&note, &settings).await?;
                Ok(DayMetadata::new(classes, dots, None))
            },
        }
    }
}

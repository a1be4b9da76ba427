//! Daily and weekly notes: where they live and how they are named

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_format::DateFormatter;
use crate::note::NoteFile;
use crate::traits::FileIndex;
use crate::utils::{is_in_folder, normalize_path};

pub const DEFAULT_DAILY_FORMAT: &str = "YYYY-MM-DD";
pub const DEFAULT_WEEKLY_FORMAT: &str = "GGGG-[W]ww";

/// The granularity of a periodic note
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
}

impl Granularity {
    pub fn default_format(&self) -> &'static str {
        match self {
            Granularity::Day => DEFAULT_DAILY_FORMAT,
            Granularity::Week => DEFAULT_WEEKLY_FORMAT,
        }
    }
}

/// Where periodic notes are stored and how they are named.
///
/// This is usually owned by another plugin of the host. Missing or empty values fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicNoteConfig {
    pub folder: Option<String>,
    pub format: Option<String>,
    pub template: Option<String>,
}

/// The external source of periodic note configurations
pub trait PeriodicNoteConfigProvider: Send + Sync {
    fn config(&self, granularity: Granularity) -> Option<PeriodicNoteConfig>;
}

/// Always uses the built-in defaults
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPeriodicNotes;

impl PeriodicNoteConfigProvider for DefaultPeriodicNotes {
    fn config(&self, _granularity: Granularity) -> Option<PeriodicNoteConfig> {
        None
    }
}

/// Fixed configurations, e.g. read from the settings of the host
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticPeriodicNotes {
    pub daily: Option<PeriodicNoteConfig>,
    pub weekly: Option<PeriodicNoteConfig>,
}

impl PeriodicNoteConfigProvider for StaticPeriodicNotes {
    fn config(&self, granularity: Granularity) -> Option<PeriodicNoteConfig> {
        match granularity {
            Granularity::Day => self.daily.clone(),
            Granularity::Week => self.weekly.clone(),
        }
    }
}

/// A configuration where defaults have been applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub folder: String,
    pub format: String,
    pub template: Option<String>,
}

impl ResolvedConfig {
    fn resolve(config: Option<PeriodicNoteConfig>, granularity: Granularity) -> Self {
        let config = config.unwrap_or_default();
        let non_empty = |value: Option<String>| value.filter(|v| v.trim().is_empty() == false);

        Self {
            folder: normalize_path(&config.folder.unwrap_or_default()),
            format: non_empty(config.format).unwrap_or_else(|| granularity.default_format().to_string()),
            template: non_empty(config.template).map(|t| normalize_path(&t)),
        }
    }
}

/// Finds the periodic notes of one granularity
pub struct PeriodicNotes<'v, V: ?Sized> {
    index: &'v V,
    formatter: Arc<dyn DateFormatter>,
    config: ResolvedConfig,
    granularity: Granularity,
}

impl<'v, V: FileIndex + ?Sized> PeriodicNotes<'v, V> {
    pub fn new(index: &'v V, formatter: Arc<dyn DateFormatter>, provider: &dyn PeriodicNoteConfigProvider, granularity: Granularity) -> Self {
        Self {
            index,
            formatter,
            config: ResolvedConfig::resolve(provider.config(granularity), granularity),
            granularity,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The file name (without extension) of the note for `date`
    pub fn note_name(&self, date: NaiveDate) -> String {
        self.formatter.format(date, &self.config.format)
    }

    /// Where the note for `date` is (or would be created)
    pub fn note_path(&self, date: NaiveDate) -> String {
        let name = self.note_name(date);
        let name = name.split('/')
            .map(|segment| sanitize_filename::sanitize(segment))
            .collect::<Vec<_>>()
            .join("/");

        if self.config.folder.is_empty() {
            normalize_path(&format!("{}.md", name))
        } else {
            normalize_path(&format!("{}/{}.md", self.config.folder, name))
        }
    }

    /// Every note of this granularity, keyed by file name.
    ///
    /// Those are the notes in the configured folder (or below) whose name is a valid date for the configured format.
    pub fn all_notes(&self) -> HashMap<String, NoteFile> {
        self.index.list_all_note_files()
            .into_iter()
            .filter(|file| is_in_folder(file.path(), &self.config.folder))
            .filter(|file| self.formatter.parse_strict(file.basename(), &self.config.format).is_some())
            .map(|file| (file.basename().to_string(), file))
            .collect()
    }

    /// Returns the note for `date`, if it exists
    pub fn note_for(&self, date: NaiveDate) -> Option<NoteFile> {
        match self.granularity {
            Granularity::Day => self.index.find_file_by_path(&self.note_path(date)),
            Granularity::Week => {
                let name = self.note_name(date);
                self.all_notes().remove(&name)
            },
        }
    }
}
